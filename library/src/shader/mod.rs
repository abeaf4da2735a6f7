pub mod generator;

pub use generator::{generate, ShaderSources, vertex_source, RESOLUTION_UNIFORM};
