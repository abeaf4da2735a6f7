pub mod cli;
pub mod config;
pub mod error;
pub mod expression;
pub mod image_calc;
pub mod loader;
pub mod rendering;
pub mod shader;
pub mod util;

pub use cli::run;
pub use config::{ComputeConfig, TextureFilter};
pub use error::LibraryError;
pub use expression::{Channel, ValueType, Var, DEFAULT_GRAYSCALE_WEIGHTS};
pub use image_calc::ImageCalc;
pub use loader::image::{load_image, Image};
pub use rendering::{ComputeContext, ContextState, RenderDevice, SkiaDevice};
pub use shader::ShaderSources;
