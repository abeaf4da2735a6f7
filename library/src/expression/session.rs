use super::operation::{ArithmeticOperator, ComparisonFunction, Operation};
use super::types::{format_number, Channel, ValueType};
use super::variable::{Origin, Texture, Var, Variable};
use crate::error::LibraryError;
use crate::loader::image::Image;
use log::trace;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Ordered registry of every variable built for one computation.
///
/// Registration order is declaration order in the generated program. Every
/// builder registers its operands' results before its own, so the order
/// always respects dependencies.
#[derive(Debug)]
pub struct Session {
    id: u64,
    variables: Vec<Variable>,
    textures: Vec<Texture>,
    texture_cache: HashMap<Uuid, usize>,
    name_counter: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            variables: Vec::new(),
            textures: Vec::new(),
            texture_cache: HashMap::new(),
            name_counter: 0,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn textures(&self) -> &[Texture] {
        &self.textures
    }

    pub(crate) fn textures_mut(&mut self) -> &mut [Texture] {
        &mut self.textures
    }

    pub fn variable(&self, var: Var) -> &Variable {
        &self.variables[self.resolve(var)]
    }

    /// Index of `var` in this session. Handles of other sessions are a
    /// programming error.
    pub fn resolve(&self, var: Var) -> usize {
        assert_eq!(
            var.session, self.id,
            "variable {:?} belongs to another compute session",
            var
        );
        var.index
    }

    fn unique_name(&mut self, prefix: &str) -> String {
        self.name_counter += 1;
        format!("{}_{}", prefix, self.name_counter)
    }

    fn register(&mut self, name: String, value_type: ValueType, origin: Origin) -> Var {
        let index = self.variables.len();
        trace!("Registering {} ({:?})", name, value_type);
        self.variables.push(Variable {
            name,
            value_type,
            origin,
        });
        Var {
            session: self.id,
            index,
            value_type,
        }
    }

    fn register_operation(&mut self, operation: Operation) -> Result<Var, LibraryError> {
        let value_type = operation.result_type(&self.variables)?;
        let name = self.unique_name(value_type.name_prefix());
        Ok(self.register(name, value_type, Origin::Operation(operation)))
    }

    fn resolve_all(&self, operands: &[Var]) -> Vec<usize> {
        operands.iter().map(|&var| self.resolve(var)).collect()
    }

    pub fn load_image(&mut self, image: &Image) -> Var {
        if let Some(&index) = self.texture_cache.get(&image.id()) {
            let variable = &self.variables[index];
            return Var {
                session: self.id,
                index,
                value_type: variable.value_type,
            };
        }

        let name = self.unique_name(ValueType::Vector4.name_prefix());
        let sampler_name = self.unique_name("sampler");
        let texture_index = self.textures.len();
        self.textures.push(Texture {
            sampler_name,
            image: image.clone(),
            unit: None,
        });
        let var = self.register(name, ValueType::Vector4, Origin::Texture(texture_index));
        self.texture_cache.insert(image.id(), var.index);
        var
    }

    pub fn load_number(&mut self, value: f64) -> Result<Var, LibraryError> {
        let literal = format_number(value)?;
        Ok(self.register(literal, ValueType::Scalar, Origin::Literal))
    }

    pub fn arithmetic(
        &mut self,
        operator: ArithmeticOperator,
        operands: &[Var],
    ) -> Result<Var, LibraryError> {
        let operands = self.resolve_all(operands);
        self.register_operation(Operation::Arithmetic { operator, operands })
    }

    pub fn add(&mut self, operands: &[Var]) -> Result<Var, LibraryError> {
        self.arithmetic(ArithmeticOperator::Add, operands)
    }

    pub fn subtract(&mut self, operands: &[Var]) -> Result<Var, LibraryError> {
        self.arithmetic(ArithmeticOperator::Subtract, operands)
    }

    pub fn multiply(&mut self, operands: &[Var]) -> Result<Var, LibraryError> {
        self.arithmetic(ArithmeticOperator::Multiply, operands)
    }

    pub fn divide(&mut self, operands: &[Var]) -> Result<Var, LibraryError> {
        self.arithmetic(ArithmeticOperator::Divide, operands)
    }

    pub fn comparison(
        &mut self,
        function: ComparisonFunction,
        operands: &[Var],
    ) -> Result<Var, LibraryError> {
        let operands = self.resolve_all(operands);
        self.register_operation(Operation::Comparison { function, operands })
    }

    pub fn min(&mut self, operands: &[Var]) -> Result<Var, LibraryError> {
        self.comparison(ComparisonFunction::Min, operands)
    }

    pub fn max(&mut self, operands: &[Var]) -> Result<Var, LibraryError> {
        self.comparison(ComparisonFunction::Max, operands)
    }

    pub fn normalize(&mut self, operand: Var) -> Result<Var, LibraryError> {
        let operand = self.resolve(operand);
        self.register_operation(Operation::Normalize { operand })
    }

    pub fn get_channel(&mut self, image: Var, channel: Channel) -> Result<Var, LibraryError> {
        let image = self.resolve(image);
        self.register_operation(Operation::Channel { image, channel })
    }

    pub fn get_grayscale(&mut self, image: Var, weights: [f64; 3]) -> Result<Var, LibraryError> {
        let image = self.resolve(image);
        let weights = [
            format_number(weights[0])?,
            format_number(weights[1])?,
            format_number(weights[2])?,
        ];
        self.register_operation(Operation::Grayscale { image, weights })
    }

    pub fn compose_from_channels(
        &mut self,
        red: Var,
        green: Var,
        blue: Var,
        alpha: Var,
    ) -> Result<Var, LibraryError> {
        let channels = [red, green, blue, alpha];
        if let Some(position) = channels.iter().position(|var| !var.is_scalar()) {
            return Err(LibraryError::InvalidOperation(format!(
                "channel {} of a composed image must be a scalar",
                Channel::ALL[position].swizzle()
            )));
        }
        let indices = [
            self.resolve(red),
            self.resolve(green),
            self.resolve(blue),
            self.resolve(alpha),
        ];
        let name = self.unique_name(ValueType::Vector4.name_prefix());
        Ok(self.register(name, ValueType::Vector4, Origin::Channels(indices)))
    }
}
