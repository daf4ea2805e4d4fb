mod blit;
mod buffers;
mod context;
mod layer;
mod shapes;

pub use blit::BlitPipeline;
pub use buffers::{ShapeBuffers, ShapeInstance, SHAPE_CAPSULE, SHAPE_RADIAL};
pub use context::GpuContext;
pub use layer::LayerTexture;
pub use shapes::ShapeRenderer;
