use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Shader build failed: {0}")]
    ShaderBuild(String),
    #[error("Texture error: {0}")]
    Texture(String),
    #[error("Rendering error: {0}")]
    Render(String),
    #[error("Compute context is not bound")]
    NotBound,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Encoding error: {0}")]
    Encoding(String),
}

impl LibraryError {
    /// Errors after which the session can not be reused and has to be rebuilt.
    pub fn is_fatal_to_session(&self) -> bool {
        matches!(
            self,
            LibraryError::ShaderBuild(_) | LibraryError::Texture(_) | LibraryError::Render(_)
        )
    }
}
