use crate::board::Trace;
use crate::config::{
    BACKGROUND_COLOR, GLOW_SCALE, PULSE_COLOR, PULSE_GLOW_COLOR, PULSE_RADIUS, TRACE_COLOR,
    TRACE_WIDTH, VIA_RADIUS,
};
use crate::render::surface::{Color, Point, Surface2d, TRANSPARENT};

/// Colours and sizes for the board
#[derive(Clone, Debug)]
pub struct PaintStyle {
    pub background: Color,
    pub trace_color: Color,
    pub trace_width: f32,
    pub via_radius: f32,
    pub pulse_color: Color,
    pub pulse_glow_color: Color,
    pub pulse_radius: f32,
    /// Glow radius as a multiple of `pulse_radius`
    pub glow_scale: f32,
}

impl Default for PaintStyle {
    fn default() -> Self {
        Self {
            background: BACKGROUND_COLOR,
            trace_color: TRACE_COLOR,
            trace_width: TRACE_WIDTH,
            via_radius: VIA_RADIUS,
            pulse_color: PULSE_COLOR,
            pulse_glow_color: PULSE_GLOW_COLOR,
            pulse_radius: PULSE_RADIUS,
            glow_scale: GLOW_SCALE,
        }
    }
}

/// Static layer: background, every trace, and a via at both ends of each
pub fn paint_traces<S: Surface2d + ?Sized>(
    surface: &mut S,
    traces: &[Trace],
    cell_size: f32,
    style: &PaintStyle,
) {
    surface.clear(style.background);

    for trace in traces {
        let points: Vec<Point> = trace.points().iter().map(|p| p.to_pixels(cell_size)).collect();
        let (Some(&start), Some(&end)) = (points.first(), points.last()) else {
            continue;
        };
        surface.stroke_polyline(&points, style.trace_width, style.trace_color);
        surface.fill_circle(start, style.via_radius, style.trace_color);
        surface.fill_circle(end, style.via_radius, style.trace_color);
    }
}

/// Glow plus solid core for each pulse position
pub fn paint_pulses<S: Surface2d + ?Sized>(
    surface: &mut S,
    positions: &[Point],
    style: &PaintStyle,
) {
    let glow_radius = style.pulse_radius * style.glow_scale;

    for &position in positions {
        surface.fill_radial_gradient(
            position,
            0.0,
            glow_radius,
            style.pulse_glow_color,
            TRANSPARENT,
        );
        surface.fill_circle(position, style.pulse_radius, style.pulse_color);
    }
}
