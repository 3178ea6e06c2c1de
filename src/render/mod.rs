mod common;
mod gpu;
mod shared;

pub use common::{CameraParams, LightParams};
pub use gpu::Renderer;
