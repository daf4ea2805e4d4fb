/// Size of one grid cell in pixels (grid coordinate * CELL_SIZE = pixel coordinate)
pub const CELL_SIZE: f32 = 20.0;

/// Initial window size in logical pixels
pub const WINDOW_WIDTH: u32 = 1280;
pub const WINDOW_HEIGHT: u32 = 800;

/// Quiet period after the last resize event before the board is regenerated
pub const RESIZE_DEBOUNCE_MS: u64 = 250;

// ============================================
// Trace Generation
// ============================================

/// Random-walk attempts per generation pass (a budget, not a target count)
pub const TRACE_ATTEMPTS: usize = 800;

/// Longest trace in grid points
pub const MAX_TRACE_LENGTH: usize = 40;

/// Shorter walks are discarded
pub const MIN_TRACE_LENGTH: usize = 4;

/// Probability of trying to keep the current heading before turning
pub const STRAIGHT_CHANCE: f64 = 0.95;

// ============================================
// Pulses
// ============================================

/// One pulse per this many traces
pub const PULSE_DENSITY_RATIO: usize = 10;

/// Pool floor regardless of trace count
pub const MIN_PULSE_COUNT: usize = 5;

/// Pixels per frame
pub const BASE_SPEED: f32 = 0.3;

/// Pixels per frame while the pointer is close
pub const HOVER_SPEED: f32 = 1.0;

/// Pointer distance (pixels) that switches a pulse to HOVER_SPEED
pub const HOVER_DISTANCE: f32 = 80.0;

// ============================================
// Appearance
// ============================================

pub const TRACE_WIDTH: f32 = 2.0;
pub const VIA_RADIUS: f32 = 3.0;
pub const PULSE_RADIUS: f32 = 2.5;

/// Glow radius as a multiple of PULSE_RADIUS
pub const GLOW_SCALE: f32 = 5.0;

/// Colors as straight-alpha RGBA
pub const BACKGROUND_COLOR: [u8; 4] = [13, 13, 20, 255];
pub const TRACE_COLOR: [u8; 4] = [137, 180, 250, 26];
pub const PULSE_COLOR: [u8; 4] = [137, 180, 250, 255];
pub const PULSE_GLOW_COLOR: [u8; 4] = [137, 180, 250, 102];
