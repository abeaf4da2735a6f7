//! Typed expression graph over images and scalars.

pub mod operation;
pub mod session;
pub mod types;
pub mod variable;

pub use operation::{ArithmeticOperator, ComparisonFunction, Operation};
pub use session::Session;
pub use types::{format_number, Channel, ValueType, DEFAULT_GRAYSCALE_WEIGHTS};
pub use variable::{Origin, Texture, Var, Variable};
