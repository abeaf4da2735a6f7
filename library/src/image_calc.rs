use crate::config::ComputeConfig;
use crate::error::LibraryError;
use crate::expression::{Channel, Var, DEFAULT_GRAYSCALE_WEIGHTS};
use crate::loader::image::Image;
use crate::rendering::{ComputeContext, ContextState, RenderDevice, SkiaDevice};
use crate::shader::{generate, ShaderSources};
use image::RgbaImage;

/// Per-pixel image calculator.
///
/// Builder methods only record the expression. Nothing is compiled or drawn
/// until the first render call, and one calculator renders exactly once:
/// build a new one for the next computation.
///
/// ```no_run
/// use imagecalc::{ComputeConfig, Image, ImageCalc};
///
/// let mut calc = ImageCalc::new(ComputeConfig::new(2, 2))?;
/// let a = calc.load_image(&Image::solid(2, 2, [255, 0, 0, 255])?);
/// let b = calc.load_image(&Image::solid(2, 2, [0, 255, 0, 255])?);
/// let sum = calc.add(&[a, b])?;
/// let pixels = calc.render_to_pixel_array(sum)?;
/// assert_eq!(&pixels[0..4], &[255, 255, 0, 255]);
/// # Ok::<(), imagecalc::LibraryError>(())
/// ```
pub struct ImageCalc<D: RenderDevice = SkiaDevice> {
    context: ComputeContext<D>,
}

impl ImageCalc<SkiaDevice> {
    pub fn new(config: ComputeConfig) -> Result<Self, LibraryError> {
        Self::with_device(config, SkiaDevice::new())
    }
}

impl<D: RenderDevice> ImageCalc<D> {
    /// Creates a calculator drawing with `device` and binds it.
    pub fn with_device(config: ComputeConfig, device: D) -> Result<Self, LibraryError> {
        let mut context = ComputeContext::new(config, device)?;
        context.bind()?;
        Ok(Self { context })
    }

    pub fn state(&self) -> ContextState {
        self.context.state()
    }

    pub fn config(&self) -> &ComputeConfig {
        self.context.config()
    }

    pub fn device(&self) -> &D {
        self.context.device()
    }

    /// The program `result` would be rendered with.
    pub fn shader_sources(&self, result: Var) -> ShaderSources {
        generate(self.context.session(), result)
    }

    pub fn load_image(&mut self, image: &Image) -> Var {
        self.context.session_mut().load_image(image)
    }

    pub fn load_number(&mut self, value: f64) -> Result<Var, LibraryError> {
        self.context.session_mut().load_number(value)
    }

    pub fn add(&mut self, operands: &[Var]) -> Result<Var, LibraryError> {
        self.context.session_mut().add(operands)
    }

    pub fn subtract(&mut self, operands: &[Var]) -> Result<Var, LibraryError> {
        self.context.session_mut().subtract(operands)
    }

    pub fn multiply(&mut self, operands: &[Var]) -> Result<Var, LibraryError> {
        self.context.session_mut().multiply(operands)
    }

    pub fn divide(&mut self, operands: &[Var]) -> Result<Var, LibraryError> {
        self.context.session_mut().divide(operands)
    }

    pub fn min(&mut self, operands: &[Var]) -> Result<Var, LibraryError> {
        self.context.session_mut().min(operands)
    }

    pub fn max(&mut self, operands: &[Var]) -> Result<Var, LibraryError> {
        self.context.session_mut().max(operands)
    }

    pub fn normalize(&mut self, operand: Var) -> Result<Var, LibraryError> {
        self.context.session_mut().normalize(operand)
    }

    pub fn get_channel(&mut self, image: Var, channel: Channel) -> Result<Var, LibraryError> {
        self.context.session_mut().get_channel(image, channel)
    }

    pub fn get_grayscale(&mut self, image: Var) -> Result<Var, LibraryError> {
        self.get_weighted_grayscale(image, DEFAULT_GRAYSCALE_WEIGHTS)
    }

    pub fn get_weighted_grayscale(
        &mut self,
        image: Var,
        weights: [f64; 3],
    ) -> Result<Var, LibraryError> {
        self.context.session_mut().get_grayscale(image, weights)
    }

    pub fn compose_from_channels(
        &mut self,
        red: Var,
        green: Var,
        blue: Var,
        alpha: Var,
    ) -> Result<Var, LibraryError> {
        self.context
            .session_mut()
            .compose_from_channels(red, green, blue, alpha)
    }

    /// RGBA8 pixels, `width * height * 4` bytes, row-major from the top-left.
    pub fn render_to_pixel_array(&mut self, result: Var) -> Result<&[u8], LibraryError> {
        self.context.render_pixels(result)
    }

    /// The result as a `data:image/png;base64,` URL.
    pub fn render_to_data_url(&mut self, result: Var) -> Result<&str, LibraryError> {
        self.context.render_data_url(result)
    }

    pub fn render_to_image<F>(&mut self, result: Var, on_load: F) -> Result<RgbaImage, LibraryError>
    where
        F: FnOnce(&RgbaImage),
    {
        self.context.render_image(result, on_load)
    }

    /// The result as an [`Image`] that another calculator can load.
    pub fn render_to_framebuffer(&mut self, result: Var) -> Result<Image, LibraryError> {
        self.context.render_framebuffer(result)
    }

    /// Frees the device and the expression. The calculator can not be used afterwards.
    pub fn purge(&mut self) {
        self.context.purge();
    }
}
