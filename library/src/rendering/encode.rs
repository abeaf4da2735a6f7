use crate::error::LibraryError;
use base64::{engine::general_purpose, Engine as _};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

pub const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Encodes a top-left origin RGBA8 buffer as PNG.
pub fn pixels_to_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, LibraryError> {
    let expected = width as usize * height as usize * 4;
    if pixels.len() != expected {
        return Err(LibraryError::Encoding(format!(
            "pixel buffer has {} bytes, expected {} for {}x{}",
            pixels.len(),
            expected,
            width,
            height
        )));
    }
    let mut png_bytes = Vec::new();
    PngEncoder::new(&mut png_bytes).write_image(pixels, width, height, ExtendedColorType::Rgba8)?;
    Ok(png_bytes)
}

pub fn pixels_to_data_url(pixels: &[u8], width: u32, height: u32) -> Result<String, LibraryError> {
    let png_bytes = pixels_to_png(pixels, width, height)?;
    Ok(format!(
        "{}{}",
        DATA_URL_PREFIX,
        general_purpose::STANDARD.encode(png_bytes)
    ))
}

/// Decodes a PNG data URL produced by [`pixels_to_data_url`].
pub fn decode_data_url(data_url: &str) -> Result<RgbaImage, LibraryError> {
    let payload = data_url.strip_prefix(DATA_URL_PREFIX).ok_or_else(|| {
        LibraryError::Encoding("expected a base64 PNG data URL".to_string())
    })?;
    let bytes = general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| LibraryError::Encoding(format!("invalid base64 in data URL: {}", e)))?;
    Ok(image::load_from_memory(&bytes)?.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_has_png_prefix() {
        let url = pixels_to_data_url(&[10, 20, 30, 255], 1, 1).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        assert!(url.len() > DATA_URL_PREFIX.len());
    }

    #[test]
    fn test_decoded_data_url_keeps_pixels() {
        let pixels = vec![
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 12, 34, 56, 78,
        ];
        let url = pixels_to_data_url(&pixels, 2, 2).unwrap();
        let decoded = decode_data_url(&url).unwrap();
        assert_eq!(decoded.dimensions(), (2, 2));
        assert_eq!(decoded.as_raw(), &pixels);
    }

    #[test]
    fn test_rejects_foreign_data_url() {
        let result = decode_data_url("data:text/plain;base64,aGVsbG8=");
        assert!(matches!(result, Err(LibraryError::Encoding(_))));
    }

    #[test]
    fn test_rejects_mismatched_buffer() {
        assert!(matches!(
            pixels_to_png(&[0, 0, 0], 1, 1),
            Err(LibraryError::Encoding(_))
        ));
    }
}
