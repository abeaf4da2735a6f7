use crate::config::TextureFilter;
use crate::error::LibraryError;
use crate::loader::image::Image;
use crate::shader::ShaderSources;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub usize);

/// A texture bound to the sampler uniform of the program at `unit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureBinding {
    pub sampler_name: String,
    pub texture: TextureHandle,
    pub unit: u32,
}

/// The rendering context a compute session draws with.
///
/// Everything a device allocates is owned by it until `release`.
pub trait RenderDevice {
    /// Acquires a surface of `width` x `height` pixels.
    fn bind(&mut self, width: u32, height: u32, filter: TextureFilter) -> Result<(), LibraryError>;

    /// Uploads `image` with clamp-to-edge wrapping.
    fn create_texture(&mut self, image: &Image) -> Result<TextureHandle, LibraryError>;

    /// Compiles and links both stages. Failures carry the compiler diagnostic.
    fn build_program(&mut self, sources: &ShaderSources) -> Result<ProgramHandle, LibraryError>;

    /// Draws `program` over the whole surface.
    fn draw(
        &mut self,
        program: ProgramHandle,
        textures: &[TextureBinding],
    ) -> Result<(), LibraryError>;

    /// Blocks until drawing has finished and returns the surface as RGBA8,
    /// `width * height * 4` bytes with a top-left origin.
    fn read_pixels(&mut self) -> Result<Vec<u8>, LibraryError>;

    /// Frees the surface, programs and textures.
    fn release(&mut self);
}
