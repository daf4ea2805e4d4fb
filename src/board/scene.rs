use rand::Rng;

use crate::board::generator::{GeneratorConfig, TraceGenerator};
use crate::board::grid::OccupancyGrid;
use crate::board::pulse::{Pulse, PulseAnimator, PulseConfig, PulseFrame};
use crate::board::trace::Trace;

/// Everything needed to lay out and animate one board
#[derive(Clone, Debug, Default)]
pub struct BoardConfig {
    pub generator: GeneratorConfig,
    pub pulses: PulseConfig,
}

/// Owns the grid, the trace set, the pulse pool and the pointer.
///
/// Traces are static between regenerations; pulses move on every `step`.
pub struct Board {
    generator: TraceGenerator,
    animator: PulseAnimator,
    grid: OccupancyGrid,
    traces: Vec<Trace>,
    pointer: Option<(f32, f32)>,
    size_px: (u32, u32),
}

impl Board {
    pub fn new(config: BoardConfig) -> Self {
        Self {
            generator: TraceGenerator::new(config.generator),
            animator: PulseAnimator::new(config.pulses),
            grid: OccupancyGrid::new(0, 0),
            traces: Vec::new(),
            pointer: None,
            size_px: (0, 0),
        }
    }

    /// Grid dimensions covering a viewport, rounding partial cells up
    pub fn grid_dims(&self, width_px: u32, height_px: u32) -> (usize, usize) {
        let cell = self.animator.config().cell_size;
        if cell <= 0.0 {
            return (0, 0);
        }
        (
            (width_px as f32 / cell).ceil() as usize,
            (height_px as f32 / cell).ceil() as usize,
        )
    }

    /// Throw away all traces and pulses and build a new board for the
    /// viewport. Traces are fully committed before any pulse is seeded.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, width_px: u32, height_px: u32, rng: &mut R) {
        let (cols, rows) = self.grid_dims(width_px, height_px);
        self.size_px = (width_px, height_px);
        self.grid.clear(cols, rows);

        let attempts = self.generator.config().attempts;
        self.traces = self.generator.generate(attempts, &mut self.grid, rng);
        self.animator.seed(&self.traces, rng);

        log::info!(
            "Board {}x{} px ({}x{} cells): {} traces, {} pulses",
            width_px,
            height_px,
            cols,
            rows,
            self.traces.len(),
            self.animator.pulses().len()
        );
    }

    pub fn set_pointer(&mut self, pointer: Option<(f32, f32)>) {
        self.pointer = pointer;
    }

    #[cfg(test)]
    pub fn pointer(&self) -> Option<(f32, f32)> {
        self.pointer
    }

    /// One animation frame; returns a draw position per live pulse
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<PulseFrame> {
        self.animator.step(&self.traces, self.pointer, rng)
    }

    #[cfg(test)]
    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    pub fn pulses(&self) -> &[Pulse] {
        self.animator.pulses()
    }

    pub fn cell_size(&self) -> f32 {
        self.animator.config().cell_size
    }

    pub fn size_px(&self) -> (u32, u32) {
        self.size_px
    }
}
