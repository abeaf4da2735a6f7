//! Execution of generated programs: one draw and one readback per context.

pub mod device;
pub mod encode;
pub mod engine;
pub mod skia_device;

pub use device::{ProgramHandle, RenderDevice, TextureBinding, TextureHandle};
pub use engine::{ComputeContext, ContextState};
pub use skia_device::SkiaDevice;

/// Converts one float channel to 8 bits: clamp to 0..1, scale, round half away from zero.
pub fn quantize_channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
