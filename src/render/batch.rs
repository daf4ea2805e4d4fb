use crate::gpu::{ShapeInstance, SHAPE_CAPSULE, SHAPE_RADIAL};
use crate::render::surface::{Color, Point, Surface2d};

/// Straight 8-bit RGBA to premultiplied floats, still sRGB-encoded
pub fn premultiplied(color: Color) -> [f32; 4] {
    let alpha = color[3] as f32 / 255.0;
    [
        color[0] as f32 / 255.0 * alpha,
        color[1] as f32 / 255.0 * alpha,
        color[2] as f32 / 255.0 * alpha,
        alpha,
    ]
}

/// Records drawing calls as GPU shape instances.
///
/// Nothing is rasterised here: the instances are uploaded as-is and shaded by
/// `shapes.wgsl`. A `clear` drops everything recorded so far and becomes the
/// colour the window is cleared to.
#[derive(Debug, Default)]
pub struct ShapeBatch {
    width: u32,
    height: u32,
    clear_color: Option<Color>,
    shapes: Vec<ShapeInstance>,
}

impl ShapeBatch {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Start a new recording at the given size, keeping the allocation
    pub fn reset(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.clear_color = None;
        self.shapes.clear();
    }

    pub fn shapes(&self) -> &[ShapeInstance] {
        &self.shapes
    }

    pub fn clear_color(&self) -> Option<Color> {
        self.clear_color
    }

    fn push_capsule(&mut self, start: Point, end: Point, radius: f32, color: Color) {
        self.shapes.push(ShapeInstance {
            start: [start.0, start.1],
            end: [end.0, end.1],
            color: premultiplied(color),
            outer_color: [0.0; 4],
            radius,
            inner_radius: 0.0,
            kind: SHAPE_CAPSULE,
            _padding: 0,
        });
    }
}

impl Surface2d for ShapeBatch {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        self.shapes.clear();
        self.clear_color = Some(color);
    }

    fn stroke_polyline(&mut self, points: &[Point], width: f32, color: Color) {
        if width <= 0.0 {
            return;
        }
        let radius = width / 2.0;

        match points {
            [] => {}
            [single] => self.push_capsule(*single, *single, radius, color),
            _ => {
                for pair in points.windows(2) {
                    self.push_capsule(pair[0], pair[1], radius, color);
                }
            }
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        if radius > 0.0 {
            self.push_capsule(center, center, radius, color);
        }
    }

    fn fill_radial_gradient(
        &mut self,
        center: Point,
        inner_radius: f32,
        outer_radius: f32,
        inner: Color,
        outer: Color,
    ) {
        if outer_radius <= 0.0 {
            return;
        }
        self.shapes.push(ShapeInstance {
            start: [center.0, center.1],
            end: [center.0, center.1],
            color: premultiplied(inner),
            outer_color: premultiplied(outer),
            radius: outer_radius,
            inner_radius: inner_radius.clamp(0.0, outer_radius),
            kind: SHAPE_RADIAL,
            _padding: 0,
        });
    }
}
