mod batch;
mod painter;
mod surface;

pub use batch::{premultiplied, ShapeBatch};
pub use painter::{paint_pulses, paint_traces, PaintStyle};
pub use surface::Surface2d;
