use crate::config::ComputeConfig;
use crate::error::LibraryError;
use crate::expression::{Session, Var};
use crate::loader::image::Image;
use crate::rendering::device::{RenderDevice, TextureBinding};
use crate::rendering::encode::{decode_data_url, pixels_to_data_url};
use crate::shader::generate;
use crate::util::timing::ScopedTimer;
use image::RgbaImage;
use log::{debug, error, info, trace, warn};

const PURGED: &str = "compute context used after purge";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Unbound,
    Bound,
    Rendered,
    Purged,
}

/// Artifacts of the single draw of a context. Derived forms are filled on
/// first request.
struct RenderedResult {
    result: Var,
    pixels: Vec<u8>,
    data_url: Option<String>,
    image: Option<RgbaImage>,
    framebuffer: Option<Image>,
}

impl RenderedResult {
    fn data_url(&mut self, width: u32, height: u32) -> Result<&str, LibraryError> {
        let data_url = match self.data_url.take() {
            Some(data_url) => data_url,
            None => pixels_to_data_url(&self.pixels, width, height)?,
        };
        Ok(self.data_url.insert(data_url).as_str())
    }

    fn image(&mut self, width: u32, height: u32) -> Result<&RgbaImage, LibraryError> {
        let image = match self.image.take() {
            Some(image) => image,
            None => decode_data_url(self.data_url(width, height)?)?,
        };
        Ok(&*self.image.insert(image))
    }
}

/// Owns a render device and the session drawn with it.
///
/// The first render request lowers the session to one program, draws it once
/// and reads the pixels back. Every later request is served from that result.
pub struct ComputeContext<D: RenderDevice> {
    state: ContextState,
    config: ComputeConfig,
    device: D,
    session: Option<Session>,
    rendered: Option<RenderedResult>,
}

impl<D: RenderDevice> ComputeContext<D> {
    pub fn new(config: ComputeConfig, device: D) -> Result<Self, LibraryError> {
        config.validate()?;
        Ok(Self {
            state: ContextState::Unbound,
            config,
            device,
            session: Some(Session::new()),
            rendered: None,
        })
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    pub fn config(&self) -> &ComputeConfig {
        &self.config
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn session(&self) -> &Session {
        match &self.session {
            Some(session) => session,
            None => panic!("{}", PURGED),
        }
    }

    pub fn session_mut(&mut self) -> &mut Session {
        match &mut self.session {
            Some(session) => session,
            None => panic!("{}", PURGED),
        }
    }

    /// Acquires the device surface. Binding twice is a no-op.
    pub fn bind(&mut self) -> Result<(), LibraryError> {
        match self.state {
            ContextState::Unbound => {
                self.device
                    .bind(self.config.width, self.config.height, self.config.filter)?;
                self.state = ContextState::Bound;
                debug!(
                    "Compute context bound ({}x{}, {:?} filtering)",
                    self.config.width, self.config.height, self.config.filter
                );
                Ok(())
            }
            ContextState::Bound | ContextState::Rendered => Ok(()),
            ContextState::Purged => panic!("{}", PURGED),
        }
    }

    /// Releases the device and drops the session. Safe to call in any state.
    pub fn purge(&mut self) {
        if self.state == ContextState::Purged {
            return;
        }
        self.device.release();
        self.session = None;
        self.rendered = None;
        self.state = ContextState::Purged;
        debug!("Compute context purged");
    }

    pub fn render_pixels(&mut self, result: Var) -> Result<&[u8], LibraryError> {
        let rendered = self.ensure_rendered(result)?;
        Ok(&rendered.pixels)
    }

    pub fn render_data_url(&mut self, result: Var) -> Result<&str, LibraryError> {
        let (width, height) = (self.config.width, self.config.height);
        self.ensure_rendered(result)?.data_url(width, height)
    }

    /// Decodes the data URL into an image, hands it to `on_load` and returns it.
    /// `on_load` runs on every call.
    pub fn render_image<F>(&mut self, result: Var, on_load: F) -> Result<RgbaImage, LibraryError>
    where
        F: FnOnce(&RgbaImage),
    {
        let (width, height) = (self.config.width, self.config.height);
        let image = self.ensure_rendered(result)?.image(width, height)?.clone();
        on_load(&image);
        Ok(image)
    }

    /// The rendered pixels as an [`Image`] that can be loaded into another session.
    pub fn render_framebuffer(&mut self, result: Var) -> Result<Image, LibraryError> {
        let (width, height) = (self.config.width, self.config.height);
        let rendered = self.ensure_rendered(result)?;
        let framebuffer = match rendered.framebuffer.take() {
            Some(framebuffer) => framebuffer,
            None => Image::new(width, height, rendered.pixels.clone())?,
        };
        Ok(rendered.framebuffer.insert(framebuffer).clone())
    }

    fn ensure_rendered(&mut self, result: Var) -> Result<&mut RenderedResult, LibraryError> {
        match self.state {
            ContextState::Purged => panic!("{}", PURGED),
            ContextState::Unbound => return Err(LibraryError::NotBound),
            ContextState::Bound | ContextState::Rendered => {}
        }
        let result_index = self.session().resolve(result);

        if self.rendered.is_none() {
            match self.run_program(result) {
                Ok(pixels) => {
                    self.rendered = Some(RenderedResult {
                        result,
                        pixels,
                        data_url: None,
                        image: None,
                        framebuffer: None,
                    });
                    self.state = ContextState::Rendered;
                }
                Err(e) => {
                    error!("Compute render failed, purging context: {}", e);
                    self.purge();
                    return Err(e);
                }
            }
        }

        let rendered = self
            .rendered
            .as_mut()
            .ok_or_else(|| LibraryError::Render("no rendered result".to_string()))?;
        if rendered.result != result {
            warn!(
                "Render requested for variable {} after the context already rendered another; returning the cached result",
                result_index
            );
        }
        Ok(rendered)
    }

    fn run_program(&mut self, result: Var) -> Result<Vec<u8>, LibraryError> {
        let Self {
            config,
            device,
            session,
            ..
        } = self;
        let session = match session {
            Some(session) => session,
            None => panic!("{}", PURGED),
        };
        let _timer = ScopedTimer::debug_lazy(|| {
            format!("Compute render of {} variable(s)", session.variables().len())
        });

        let sources = generate(session, result);
        trace!("Coordinate stage:\n{}", sources.vertex);
        trace!("Fragment stage:\n{}", sources.fragment);

        let program = {
            let _timer = ScopedTimer::debug("Program build");
            device.build_program(&sources)?
        };

        let mut bindings = Vec::with_capacity(session.textures().len());
        for (unit, texture) in session.textures_mut().iter_mut().enumerate() {
            let (width, height) = texture.dimensions();
            trace!("Uploading {} ({}x{}) to unit {}", texture.sampler_name, width, height, unit);
            let handle = device.create_texture(&texture.image)?;
            texture.unit = Some(unit as u32);
            bindings.push(TextureBinding {
                sampler_name: texture.sampler_name.clone(),
                texture: handle,
                unit: unit as u32,
            });
        }
        debug!("Uploaded {} texture(s)", bindings.len());

        device.draw(program, &bindings)?;
        let pixels = device.read_pixels()?;
        if pixels.len() != config.pixel_buffer_len() {
            return Err(LibraryError::Render(format!(
                "readback returned {} bytes, expected {}",
                pixels.len(),
                config.pixel_buffer_len()
            )));
        }
        info!(
            "Rendered {} variable(s) to a {}x{} buffer",
            session.variables().len(),
            config.width,
            config.height
        );
        Ok(pixels)
    }
}

impl<D: RenderDevice> Drop for ComputeContext<D> {
    fn drop(&mut self) {
        self.purge();
    }
}
