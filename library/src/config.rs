use crate::error::LibraryError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Texture sampling filter used when source images are uploaded.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextureFilter {
    #[default]
    Linear,
    Nearest,
}

/// Settings for one compute session. `width` and `height` are the working
/// dimensions of the rendering surface; every result buffer has this size.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ComputeConfig {
    pub width: u32,
    pub height: u32,
    pub filter: TextureFilter,
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            filter: TextureFilter::Linear,
        }
    }
}

impl ComputeConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_filter(mut self, filter: TextureFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, LibraryError> {
        let config: ComputeConfig = toml::from_str(toml_str)
            .map_err(|e| LibraryError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LibraryError> {
        let path = path.as_ref();
        debug!("Loading compute config from {}", path.display());
        let toml_str = fs::read_to_string(path)?;
        Self::from_toml_str(&toml_str)
    }

    pub fn validate(&self) -> Result<(), LibraryError> {
        if self.width == 0 || self.height == 0 {
            return Err(LibraryError::InvalidArgument(format!(
                "working dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Size in bytes of one RGBA8 result buffer.
    pub fn pixel_buffer_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml_defaults_filter() {
        let config = ComputeConfig::from_toml_str("width = 640\nheight = 480\n").unwrap();
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 480);
        assert_eq!(config.filter, TextureFilter::Linear);
        assert_eq!(config.pixel_buffer_len(), 640 * 480 * 4);
    }

    #[test]
    fn test_from_toml_nearest_filter() {
        let config =
            ComputeConfig::from_toml_str("width = 2\nheight = 2\nfilter = \"nearest\"\n").unwrap();
        assert_eq!(config.filter, TextureFilter::Nearest);
        assert_eq!(config, ComputeConfig::new(2, 2).with_filter(TextureFilter::Nearest));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let err = ComputeConfig::from_toml_str("width = 0\nheight = 4\n").unwrap_err();
        assert!(matches!(err, LibraryError::InvalidArgument(_)));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = ComputeConfig::from_toml_str("width = \"wide\"").unwrap_err();
        assert!(matches!(err, LibraryError::Config(_)));
    }
}
