use crate::error::LibraryError;
use image::RgbaImage;
use log::debug;
use lru::LruCache;
use once_cell::sync::Lazy;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

const IMAGE_CACHE_SIZE: usize = 32;

static IMAGE_CACHE: Lazy<Mutex<LruCache<String, Image>>> = Lazy::new(|| {
  let capacity = NonZeroUsize::new(IMAGE_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN);
  Mutex::new(LruCache::new(capacity))
});

/// Decodes a photograph from disk. Loading the same path again returns the
/// cached image with the same identity, so a compute session reuses its texture.
pub fn load_image(path: impl AsRef<Path>) -> Result<Image, LibraryError> {
  let key = path.as_ref().to_string_lossy().into_owned();
  if let Some(image) = IMAGE_CACHE
    .lock()
    .unwrap_or_else(|e| e.into_inner())
    .get(&key)
    .cloned()
  {
    return Ok(image);
  }

  debug!("Decoding image {}", key);
  let image = Image::from_rgba_image(image::open(path.as_ref())?.to_rgba8());

  IMAGE_CACHE
    .lock()
    .unwrap_or_else(|e| e.into_inner())
    .put(key, image.clone());

  Ok(image)
}

/// Decoded RGBA8 bitmap. Clones share the identity of the original, which is
/// what a compute session deduplicates textures by.
#[derive(Clone, Debug)]
pub struct Image {
  id: Uuid,
  pub width: u32,
  pub height: u32,
  pub data: Vec<u8>,
}

impl Image {
  pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, LibraryError> {
    let expected = width as usize * height as usize * 4;
    if width == 0 || height == 0 || data.len() != expected {
      return Err(LibraryError::InvalidArgument(format!(
        "RGBA buffer of {} bytes does not match {}x{}",
        data.len(),
        width,
        height
      )));
    }
    Ok(Self {
      id: Uuid::new_v4(),
      width,
      height,
      data,
    })
  }

  /// Image filled with a single RGBA color.
  pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, LibraryError> {
    let data = rgba.repeat(width as usize * height as usize);
    Self::new(width, height, data)
  }

  pub fn from_rgba_image(image: RgbaImage) -> Self {
    Self {
      id: Uuid::new_v4(),
      width: image.width(),
      height: image.height(),
      data: image.into_raw(),
    }
  }

  pub fn to_rgba_image(&self) -> Option<RgbaImage> {
    RgbaImage::from_raw(self.width, self.height, self.data.clone())
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn dimensions(&self) -> (u32, u32) {
    (self.width, self.height)
  }
}
