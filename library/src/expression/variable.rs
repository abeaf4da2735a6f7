use super::operation::Operation;
use super::types::ValueType;
use crate::loader::image::Image;

/// Opaque handle to a variable of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Var {
    pub(crate) session: u64,
    pub(crate) index: usize,
    pub(crate) value_type: ValueType,
}

impl Var {
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn is_image(&self) -> bool {
        self.value_type == ValueType::Vector4
    }

    pub fn is_scalar(&self) -> bool {
        self.value_type == ValueType::Scalar
    }
}

/// Where the value of a variable comes from.
#[derive(Debug, Clone)]
pub enum Origin {
    /// Sampled from the texture at this index of the session.
    Texture(usize),
    /// Packed from four scalar variables (r, g, b, a).
    Channels([usize; 4]),
    /// Defined by an operation; the only producer a variable can have.
    Operation(Operation),
    /// Literal whose name is its source text.
    Literal,
}

#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub value_type: ValueType,
    pub origin: Origin,
}

impl Variable {
    pub fn producer(&self) -> Option<&Operation> {
        match &self.origin {
            Origin::Operation(operation) => Some(operation),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.producer().is_none()
    }

    pub fn needs_declaration(&self) -> bool {
        !matches!(self.origin, Origin::Literal)
    }
}

/// Source image bound to a sampler uniform.
#[derive(Debug, Clone)]
pub struct Texture {
    pub sampler_name: String,
    pub image: Image,
    /// Texture unit assigned at draw time.
    pub unit: Option<u32>,
}

impl Texture {
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}
