/// Straight-alpha RGBA, 0-255 per channel
pub type Color = [u8; 4];

/// Pixel-space point
pub type Point = (f32, f32);

/// The drawing operations the board needs from a 2D target.
///
/// All coordinates are in pixels.
pub trait Surface2d {
    fn size(&self) -> (u32, u32);

    /// Fill the whole surface with `color`
    fn clear(&mut self, color: Color);

    /// Stroke an open polyline of the given width
    fn stroke_polyline(&mut self, points: &[Point], width: f32, color: Color);

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);

    /// Fill the disc of `outer_radius`: `inner` up to `inner_radius`, then a
    /// linear blend to `outer` at the rim
    fn fill_radial_gradient(
        &mut self,
        center: Point,
        inner_radius: f32,
        outer_radius: f32,
        inner: Color,
        outer: Color,
    );
}

/// Fully transparent black, the usual end stop of a glow
pub const TRANSPARENT: Color = [0, 0, 0, 0];
