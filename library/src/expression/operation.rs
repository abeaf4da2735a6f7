use super::types::{Channel, ValueType};
use super::variable::Variable;
use crate::error::LibraryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithmeticOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            ArithmeticOperator::Add => "+",
            ArithmeticOperator::Subtract => "-",
            ArithmeticOperator::Multiply => "*",
            ArithmeticOperator::Divide => "/",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonFunction {
    Min,
    Max,
}

impl ComparisonFunction {
    pub fn name(&self) -> &'static str {
        match self {
            ComparisonFunction::Min => "min",
            ComparisonFunction::Max => "max",
        }
    }
}

/// Producer of a variable. Operands are indices into the session's variables,
/// all of which are registered before the operation's result.
#[derive(Debug, Clone)]
pub enum Operation {
    Arithmetic {
        operator: ArithmeticOperator,
        operands: Vec<usize>,
    },
    Comparison {
        function: ComparisonFunction,
        operands: Vec<usize>,
    },
    Normalize {
        operand: usize,
    },
    Channel {
        image: usize,
        channel: Channel,
    },
    Grayscale {
        image: usize,
        weights: [String; 3],
    },
}

impl Operation {
    pub fn operands(&self) -> Vec<usize> {
        match self {
            Operation::Arithmetic { operands, .. } | Operation::Comparison { operands, .. } => {
                operands.clone()
            }
            Operation::Normalize { operand } => vec![*operand],
            Operation::Channel { image, .. } | Operation::Grayscale { image, .. } => vec![*image],
        }
    }

    /// Checks the operand types and infers the result type.
    pub fn result_type(&self, variables: &[Variable]) -> Result<ValueType, LibraryError> {
        let types: Vec<ValueType> = self
            .operands()
            .iter()
            .map(|&index| variables[index].value_type)
            .collect();

        match self {
            Operation::Arithmetic { operator, .. } => {
                if types.len() < 2 {
                    return Err(LibraryError::InvalidOperation(format!(
                        "'{}' needs at least two operands, got {}",
                        operator.symbol(),
                        types.len()
                    )));
                }
                if *operator == ArithmeticOperator::Divide && scalar_before_vector(&types) {
                    return Err(LibraryError::InvalidOperation(
                        "Value of type float can not be divided by value of type vec4.".to_string(),
                    ));
                }
                Ok(widest_type(&types))
            }
            Operation::Comparison { function, .. } => {
                let first = types.first().copied().ok_or_else(|| {
                    LibraryError::InvalidOperation(format!(
                        "'{}' needs at least one operand",
                        function.name()
                    ))
                })?;
                if types.iter().any(|t| *t != first) {
                    return Err(LibraryError::InvalidOperation(format!(
                        "'{}' needs operands of one type, got {:?}",
                        function.name(),
                        types
                    )));
                }
                Ok(first)
            }
            Operation::Normalize { .. } => Ok(types[0]),
            Operation::Channel { .. } | Operation::Grayscale { .. } => {
                if types[0] != ValueType::Vector4 {
                    return Err(LibraryError::InvalidOperation(
                        "channels can only be read from an image".to_string(),
                    ));
                }
                Ok(ValueType::Scalar)
            }
        }
    }

    /// Right-hand side of the declaration, with operand names resolved.
    pub fn expression(&self, result_type: ValueType, variables: &[Variable]) -> String {
        let name = |index: usize| variables[index].name.as_str();
        match self {
            Operation::Arithmetic { operator, operands } => operands
                .iter()
                .map(|&index| {
                    let operand = &variables[index];
                    if operand.value_type == ValueType::Scalar && result_type == ValueType::Vector4 {
                        broadcast(&operand.name)
                    } else {
                        operand.name.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(format!(" {} ", operator.symbol()).as_str()),
            Operation::Comparison { function, operands } => {
                let mut names = operands.iter().map(|&index| name(index).to_string());
                let first = names.next().unwrap_or_default();
                names.fold(first, |reduced, next| {
                    format!("{}({}, {})", function.name(), reduced, next)
                })
            }
            Operation::Normalize { operand } => format!("normalize({})", name(*operand)),
            Operation::Channel { image, channel } => {
                format!("{}.{}", name(*image), channel.swizzle())
            }
            Operation::Grayscale { image, weights } => Channel::ALL[..3]
                .iter()
                .zip(weights.iter())
                .map(|(channel, weight)| {
                    format!("{}.{} * {}", name(*image), channel.swizzle(), weight)
                })
                .collect::<Vec<_>>()
                .join(" + "),
        }
    }

    /// The full declaration statement of `result`.
    pub fn statement(&self, result: &Variable, variables: &[Variable]) -> String {
        format!(
            "{} {} = {};",
            result.value_type.shader_type(),
            result.name,
            self.expression(result.value_type, variables)
        )
    }
}

/// `float4(s, s, s, 1.0)`, the vector form of a scalar operand.
pub fn broadcast(scalar: &str) -> String {
    format!("float4({0}, {0}, {0}, 1.0)", scalar)
}

fn widest_type(types: &[ValueType]) -> ValueType {
    if types.contains(&ValueType::Vector4) {
        ValueType::Vector4
    } else {
        ValueType::Scalar
    }
}

fn scalar_before_vector(types: &[ValueType]) -> bool {
    match types.iter().position(|t| *t == ValueType::Scalar) {
        Some(first_scalar) => types[first_scalar..].contains(&ValueType::Vector4),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::variable::Origin;

    fn var(name: &str, value_type: ValueType) -> Variable {
        Variable {
            name: name.to_string(),
            value_type,
            origin: Origin::Literal,
        }
    }

    fn fixtures() -> Vec<Variable> {
        vec![
            var("color_1", ValueType::Vector4),
            var("color_2", ValueType::Vector4),
            var("value_3", ValueType::Scalar),
            var("0.5", ValueType::Scalar),
        ]
    }

    #[test]
    fn test_arithmetic_widens_to_vector() {
        let variables = fixtures();
        let op = Operation::Arithmetic {
            operator: ArithmeticOperator::Add,
            operands: vec![0, 2],
        };
        assert_eq!(op.result_type(&variables).unwrap(), ValueType::Vector4);
        assert_eq!(
            op.expression(ValueType::Vector4, &variables),
            "color_1 + float4(value_3, value_3, value_3, 1.0)"
        );
    }

    #[test]
    fn test_scalar_arithmetic_stays_scalar() {
        let variables = fixtures();
        let op = Operation::Arithmetic {
            operator: ArithmeticOperator::Multiply,
            operands: vec![2, 3, 2],
        };
        assert_eq!(op.result_type(&variables).unwrap(), ValueType::Scalar);
        assert_eq!(
            op.expression(ValueType::Scalar, &variables),
            "value_3 * 0.5 * value_3"
        );
    }

    #[test]
    fn test_divide_rejects_scalar_before_vector() {
        let variables = fixtures();
        let invalid = Operation::Arithmetic {
            operator: ArithmeticOperator::Divide,
            operands: vec![2, 0],
        };
        assert!(matches!(
            invalid.result_type(&variables),
            Err(LibraryError::InvalidOperation(_))
        ));

        let sandwiched = Operation::Arithmetic {
            operator: ArithmeticOperator::Divide,
            operands: vec![0, 3, 1],
        };
        assert!(sandwiched.result_type(&variables).is_err());

        let valid = Operation::Arithmetic {
            operator: ArithmeticOperator::Divide,
            operands: vec![0, 1, 2, 3],
        };
        assert_eq!(valid.result_type(&variables).unwrap(), ValueType::Vector4);
    }

    #[test]
    fn test_subtract_allows_scalar_first() {
        let variables = fixtures();
        let op = Operation::Arithmetic {
            operator: ArithmeticOperator::Subtract,
            operands: vec![3, 0],
        };
        assert_eq!(op.result_type(&variables).unwrap(), ValueType::Vector4);
    }

    #[test]
    fn test_single_operand_arithmetic_rejected() {
        let variables = fixtures();
        let op = Operation::Arithmetic {
            operator: ArithmeticOperator::Add,
            operands: vec![0],
        };
        assert!(op.result_type(&variables).is_err());
    }

    #[test]
    fn test_comparison_requires_same_types() {
        let variables = fixtures();
        let mixed = Operation::Comparison {
            function: ComparisonFunction::Min,
            operands: vec![0, 2],
        };
        assert!(matches!(
            mixed.result_type(&variables),
            Err(LibraryError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_comparison_folds_left() {
        let variables = fixtures();
        let op = Operation::Comparison {
            function: ComparisonFunction::Max,
            operands: vec![0, 1, 0],
        };
        assert_eq!(op.result_type(&variables).unwrap(), ValueType::Vector4);
        assert_eq!(
            op.expression(ValueType::Vector4, &variables),
            "max(max(color_1, color_2), color_1)"
        );
    }

    #[test]
    fn test_channel_reads_need_image() {
        let variables = fixtures();
        let op = Operation::Channel {
            image: 2,
            channel: Channel::Green,
        };
        assert!(op.result_type(&variables).is_err());

        let op = Operation::Channel {
            image: 1,
            channel: Channel::Green,
        };
        assert_eq!(op.result_type(&variables).unwrap(), ValueType::Scalar);
        assert_eq!(op.expression(ValueType::Scalar, &variables), "color_2.g");
    }

    #[test]
    fn test_grayscale_expression() {
        let variables = fixtures();
        let op = Operation::Grayscale {
            image: 0,
            weights: ["0.25".into(), "0.5".into(), "0.25".into()],
        };
        let result = var("value_9", ValueType::Scalar);
        assert_eq!(
            op.statement(&result, &variables),
            "float value_9 = color_1.r * 0.25 + color_1.g * 0.5 + color_1.b * 0.25;"
        );
    }
}
