use crate::error::LibraryError;
use log::warn;

/// Equal red, green and blue weights for grayscale reduction.
pub const DEFAULT_GRAYSCALE_WEIGHTS: [f64; 3] = [1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0];

/// Smallest magnitude a literal keeps. Anything below would have been printed
/// in exponential notation and is flushed to zero.
const MIN_LITERAL_MAGNITUDE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Scalar,
    Vector4,
}

impl ValueType {
    pub fn shader_type(&self) -> &'static str {
        match self {
            ValueType::Scalar => "float",
            ValueType::Vector4 => "float4",
        }
    }

    pub(crate) fn name_prefix(&self) -> &'static str {
        match self {
            ValueType::Scalar => "value",
            ValueType::Vector4 => "color",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
    Alpha,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Red, Channel::Green, Channel::Blue, Channel::Alpha];

    pub fn swizzle(&self) -> char {
        match self {
            Channel::Red => 'r',
            Channel::Green => 'g',
            Channel::Blue => 'b',
            Channel::Alpha => 'a',
        }
    }
}

impl TryFrom<usize> for Channel {
    type Error = LibraryError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Channel::ALL.get(index).copied().ok_or_else(|| {
            LibraryError::InvalidArgument(format!("channel index {} is outside 0..3", index))
        })
    }
}

/// Formats a number as a float literal of the shader language.
///
/// Integral values always carry a fractional part so the compiler never
/// infers an integer type.
pub fn format_number(value: f64) -> Result<String, LibraryError> {
    if !value.is_finite() {
        return Err(LibraryError::InvalidArgument(format!(
            "{} can not be used as a shader literal",
            value
        )));
    }
    if value.abs() > f32::MAX as f64 {
        return Err(LibraryError::InvalidArgument(format!(
            "{} is outside the range of a shader float",
            value
        )));
    }
    if value.trunc() == value {
        return Ok(format!("{:.1}", value));
    }
    if value.abs() < MIN_LITERAL_MAGNITUDE {
        warn!("{} is converted to zero.", value);
        return Ok("0.0".to_string());
    }
    Ok(value.to_string())
}
