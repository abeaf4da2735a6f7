use crate::config::TextureFilter;
use crate::error::LibraryError;
use crate::loader::image::Image;
use crate::rendering::device::{ProgramHandle, RenderDevice, TextureBinding, TextureHandle};
use crate::rendering::quantize_channel;
use crate::shader::{ShaderSources, RESOLUTION_UNIFORM};
use log::debug;
use skia_safe::images::raster_from_data;
use skia_safe::runtime_effect::ChildPtr;
use skia_safe::surfaces;
use skia_safe::{
    AlphaType, BlendMode, Color, ColorType, Data, FilterMode, ISize, Image as SkImage, ImageInfo,
    Matrix, MipmapMode, Paint, RuntimeEffect, SamplingOptions, Surface, TileMode,
};

const FLOAT_CHANNEL_BYTES: usize = 4;

/// Runs compute programs as Skia runtime effects.
///
/// The surface stores float channels so values outside 0..1 survive until
/// readback, where they are clamped and quantized.
pub struct SkiaDevice {
    surface: Option<Surface>,
    width: u32,
    height: u32,
    sampling: SamplingOptions,
    textures: Vec<SkImage>,
    programs: Vec<RuntimeEffect>,
}

impl Default for SkiaDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl SkiaDevice {
    pub fn new() -> Self {
        Self {
            surface: None,
            width: 0,
            height: 0,
            sampling: SamplingOptions::new(FilterMode::Linear, MipmapMode::None),
            textures: Vec::new(),
            programs: Vec::new(),
        }
    }

    fn surface_info(&self) -> ImageInfo {
        ImageInfo::new(
            ISize::new(self.width as i32, self.height as i32),
            ColorType::RGBAF32,
            AlphaType::Premul,
            None,
        )
    }

    fn resolution_uniforms(&self, effect: &RuntimeEffect) -> Vec<u8> {
        let mut data = vec![0u8; effect.uniform_size()];
        let mut write_f32 = |offset: usize, val: f32| {
            if offset + 4 <= data.len() {
                data[offset..offset + 4].copy_from_slice(&val.to_le_bytes());
            }
        };
        for uniform in effect.uniforms() {
            if uniform.name() == RESOLUTION_UNIFORM {
                write_f32(uniform.offset(), self.width as f32);
                write_f32(uniform.offset() + 4, self.height as f32);
            }
        }
        data
    }
}

impl RenderDevice for SkiaDevice {
    fn bind(&mut self, width: u32, height: u32, filter: TextureFilter) -> Result<(), LibraryError> {
        self.width = width;
        self.height = height;
        self.sampling = match filter {
            TextureFilter::Linear => SamplingOptions::new(FilterMode::Linear, MipmapMode::None),
            TextureFilter::Nearest => SamplingOptions::new(FilterMode::Nearest, MipmapMode::None),
        };
        let surface = surfaces::raster(&self.surface_info(), None, None)
            .ok_or_else(|| LibraryError::Render("Cannot create Skia surface".to_string()))?;
        self.surface = Some(surface);
        debug!("SkiaDevice bound to a {}x{} surface", width, height);
        Ok(())
    }

    fn create_texture(&mut self, image: &Image) -> Result<TextureHandle, LibraryError> {
        // Channel data is passed through as stored, without premultiplying.
        let info = ImageInfo::new(
            ISize::new(image.width as i32, image.height as i32),
            ColorType::RGBA8888,
            AlphaType::Premul,
            None,
        );
        let sk_data = Data::new_copy(image.data.as_slice());
        let sk_image = raster_from_data(&info, sk_data, (image.width * 4) as usize)
            .ok_or_else(|| {
                LibraryError::Texture(format!(
                    "Failed to upload {}x{} image",
                    image.width, image.height
                ))
            })?;
        self.textures.push(sk_image);
        Ok(TextureHandle(self.textures.len() - 1))
    }

    fn build_program(&mut self, sources: &ShaderSources) -> Result<ProgramHandle, LibraryError> {
        let effect = RuntimeEffect::make_for_shader(sources.linked(), None)
            .map_err(|error| LibraryError::ShaderBuild(format!("Failed to compile SkSL: {}", error)))?;
        self.programs.push(effect);
        Ok(ProgramHandle(self.programs.len() - 1))
    }

    fn draw(
        &mut self,
        program: ProgramHandle,
        textures: &[TextureBinding],
    ) -> Result<(), LibraryError> {
        let effect = self
            .programs
            .get(program.0)
            .ok_or_else(|| LibraryError::Render(format!("Unknown program {}", program.0)))?;

        let mut children = Vec::with_capacity(effect.children().len());
        for child in effect.children() {
            let binding = textures
                .iter()
                .find(|binding| binding.sampler_name == child.name())
                .ok_or_else(|| {
                    LibraryError::Texture(format!("No texture bound to '{}'", child.name()))
                })?;
            let image = self.textures.get(binding.texture.0).ok_or_else(|| {
                LibraryError::Texture(format!("Unknown texture {}", binding.texture.0))
            })?;
            // Scale the image onto the unit square so it is sampled by UV.
            let to_uv = Matrix::scale((1.0 / image.width() as f32, 1.0 / image.height() as f32));
            let shader = image
                .to_shader((TileMode::Clamp, TileMode::Clamp), self.sampling, &to_uv)
                .ok_or_else(|| {
                    LibraryError::Texture(format!("Failed to sample '{}'", binding.sampler_name))
                })?;
            children.push(ChildPtr::from(shader));
        }

        let uniforms = Data::new_copy(&self.resolution_uniforms(effect));
        let shader = effect
            .make_shader(uniforms, &children, None)
            .ok_or_else(|| LibraryError::Render("Failed to create runtime shader".to_string()))?;

        let surface = self.surface.as_mut().ok_or(LibraryError::NotBound)?;
        let canvas = surface.canvas();
        canvas.clear(Color::TRANSPARENT);
        let mut paint = Paint::default();
        paint.set_shader(shader);
        paint.set_blend_mode(BlendMode::Src);
        canvas.draw_paint(&paint);
        Ok(())
    }

    fn read_pixels(&mut self) -> Result<Vec<u8>, LibraryError> {
        let info = self.surface_info();
        let row_bytes = self.width as usize * 4 * FLOAT_CHANNEL_BYTES;
        let mut buffer = vec![0u8; self.height as usize * row_bytes];
        // Raster surfaces finish drawing before returning, so reading is the barrier.
        let surface = self.surface.as_mut().ok_or(LibraryError::NotBound)?;
        if !surface.read_pixels(&info, &mut buffer, row_bytes, (0, 0)) {
            return Err(LibraryError::Render(
                "Failed to read surface pixels".to_string(),
            ));
        }
        Ok(buffer
            .chunks_exact(FLOAT_CHANNEL_BYTES)
            .map(|bytes| quantize_channel(f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])))
            .collect())
    }

    fn release(&mut self) {
        debug!(
            "SkiaDevice releasing {} texture(s) and {} program(s)",
            self.textures.len(),
            self.programs.len()
        );
        self.programs.clear();
        self.textures.clear();
        self.surface = None;
    }
}
