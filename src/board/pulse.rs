use rand::Rng;

use crate::board::trace::Trace;
use crate::config::{
    BASE_SPEED, CELL_SIZE, HOVER_DISTANCE, HOVER_SPEED, MIN_PULSE_COUNT, PULSE_DENSITY_RATIO,
};

/// Where a live pulse is drawn this frame, in pixels
pub type PulseFrame = (f32, f32);

/// Pulse pool and motion parameters
#[derive(Clone, Debug)]
pub struct PulseConfig {
    /// Pixels per grid cell, used to measure segments in pixel space
    pub cell_size: f32,
    /// One pulse per this many traces
    pub density_ratio: usize,
    pub min_count: usize,
    /// Pixels per frame
    pub base_speed: f32,
    /// Pixels per frame when the pointer is within `hover_distance`
    pub hover_speed: f32,
    pub hover_distance: f32,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
            density_ratio: PULSE_DENSITY_RATIO,
            min_count: MIN_PULSE_COUNT,
            base_speed: BASE_SPEED,
            hover_speed: HOVER_SPEED,
            hover_distance: HOVER_DISTANCE,
        }
    }
}

/// A token travelling along one trace.
///
/// `trace` is an index into the current trace set; the pulse does not own
/// the trace and an index that no longer resolves makes the pulse invalid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pulse {
    pub trace: usize,
    /// Index of the first point of the segment being travelled
    pub segment: usize,
    /// Fraction of the current segment covered, in [0, 1)
    pub progress: f32,
}

/// Outcome of moving one pulse by one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PulseUpdate {
    /// Still on its trace; carries the pixel position to draw this frame
    Traveling((f32, f32)),
    /// Ran off the end of the last segment
    Completed,
    /// Bound trace is gone or too short to travel
    Invalid,
}

impl Pulse {
    pub fn new(trace: usize) -> Self {
        Self {
            trace,
            segment: 0,
            progress: 0.0,
        }
    }

    /// Pixel endpoints of the segment the pulse is on
    fn segment_pixels(&self, traces: &[Trace], cell_size: f32) -> Option<((f32, f32), (f32, f32))> {
        let points = traces.get(self.trace)?.points();
        if points.len() < 2 {
            return None;
        }
        let start = points.get(self.segment)?.to_pixels(cell_size);
        let end = points.get(self.segment + 1)?.to_pixels(cell_size);
        Some((start, end))
    }

    /// Current pixel position, interpolated along the segment
    pub fn position(&self, traces: &[Trace], cell_size: f32) -> Option<(f32, f32)> {
        let ((x0, y0), (x1, y1)) = self.segment_pixels(traces, cell_size)?;
        Some((
            x0 + (x1 - x0) * self.progress,
            y0 + (y1 - y0) * self.progress,
        ))
    }

    /// Move one frame along the bound trace.
    ///
    /// The position reported is where the pulse was at the start of the frame,
    /// and the hover check uses that same position.
    pub fn advance(
        &mut self,
        traces: &[Trace],
        pointer: Option<(f32, f32)>,
        config: &PulseConfig,
    ) -> PulseUpdate {
        let Some(((x0, y0), (x1, y1))) = self.segment_pixels(traces, config.cell_size) else {
            return PulseUpdate::Invalid;
        };

        let position = (
            x0 + (x1 - x0) * self.progress,
            y0 + (y1 - y0) * self.progress,
        );
        let speed = speed_at(position, pointer, config);

        let segment_length = (x1 - x0).hypot(y1 - y0);
        if segment_length > 0.0 {
            self.progress += speed / segment_length;
        }

        if self.progress >= 1.0 {
            self.progress = 0.0;
            self.segment += 1;
            let segments = traces.get(self.trace).map_or(0, Trace::segment_count);
            if self.segment >= segments {
                return PulseUpdate::Completed;
            }
        }

        PulseUpdate::Traveling(position)
    }
}

/// Hover speed when the pointer is strictly closer than `hover_distance`
pub fn speed_at(position: (f32, f32), pointer: Option<(f32, f32)>, config: &PulseConfig) -> f32 {
    match pointer {
        Some((px, py)) if (position.0 - px).hypot(position.1 - py) < config.hover_distance => {
            config.hover_speed
        }
        _ => config.base_speed,
    }
}

/// Fixed-size pool of pulses that replaces finished or broken pulses in place
pub struct PulseAnimator {
    config: PulseConfig,
    pulses: Vec<Pulse>,
}

impl PulseAnimator {
    pub fn new(config: PulseConfig) -> Self {
        Self {
            config,
            pulses: Vec::new(),
        }
    }

    pub fn config(&self) -> &PulseConfig {
        &self.config
    }

    pub fn pulses(&self) -> &[Pulse] {
        &self.pulses
    }

    /// Pool size for a given trace count
    pub fn target_count(&self, trace_count: usize) -> usize {
        let ratio = self.config.density_ratio.max(1);
        self.config.min_count.max(trace_count / ratio)
    }

    /// Replace the pool with a fresh one sized to the trace set.
    /// With no traces the pool stays empty.
    pub fn seed<R: Rng + ?Sized>(&mut self, traces: &[Trace], rng: &mut R) {
        let count = self.target_count(traces.len());
        self.pulses.clear();
        self.pulses
            .extend((0..count).filter_map(|_| Self::spawn(traces, &mut *rng)));
    }

    /// A pulse at the start of a uniformly chosen trace, or None if there are
    /// no traces to bind to.
    pub fn spawn<R: Rng + ?Sized>(traces: &[Trace], rng: &mut R) -> Option<Pulse> {
        if traces.is_empty() {
            return None;
        }
        Some(Pulse::new(rng.gen_range(0..traces.len())))
    }

    /// Run one animation frame over the whole pool and return one draw
    /// position per live pulse. Completed and invalid pulses are swapped for
    /// a new spawn in the same slot, which draws at its trace's start.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        traces: &[Trace],
        pointer: Option<(f32, f32)>,
        rng: &mut R,
    ) -> Vec<PulseFrame> {
        let config = &self.config;
        let mut frames = Vec::with_capacity(self.pulses.len());

        self.pulses.retain_mut(|pulse| match pulse.advance(traces, pointer, config) {
            PulseUpdate::Traveling(position) => {
                frames.push(position);
                true
            }
            PulseUpdate::Completed | PulseUpdate::Invalid => {
                let Some(fresh) = Self::spawn(traces, &mut *rng) else {
                    return false;
                };
                *pulse = fresh;
                match fresh.position(traces, config.cell_size) {
                    Some(position) => frames.push(position),
                    // Single-point trace: its first point is the only place to draw
                    None => {
                        if let Some(first) = traces.get(fresh.trace).and_then(Trace::first) {
                            frames.push(first.to_pixels(config.cell_size));
                        }
                    }
                }
                true
            }
        });

        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::trace::GridPos;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config() -> PulseConfig {
        PulseConfig {
            cell_size: 20.0,
            density_ratio: 10,
            min_count: 5,
            base_speed: 0.3,
            hover_speed: 1.0,
            hover_distance: 80.0,
        }
    }

    fn line(points: &[(i32, i32)]) -> Trace {
        Trace::new(points.iter().map(|&(x, y)| GridPos::new(x, y)).collect())
    }

    #[test]
    fn test_pool_size_follows_density() {
        let animator = PulseAnimator::new(config());
        assert_eq!(animator.target_count(0), 5);
        assert_eq!(animator.target_count(49), 5);
        assert_eq!(animator.target_count(100), 10);
        assert_eq!(animator.target_count(129), 12);
    }

    #[test]
    fn test_seed_without_traces_leaves_pool_empty() {
        let mut animator = PulseAnimator::new(config());
        let mut rng = StdRng::seed_from_u64(0);
        animator.seed(&[], &mut rng);
        assert!(animator.pulses().is_empty());
        assert!(PulseAnimator::spawn(&[], &mut rng).is_none());
    }

    #[test]
    fn test_seed_binds_to_existing_traces() {
        let traces: Vec<Trace> = (0..30).map(|i| line(&[(0, i * 2), (5, i * 2)])).collect();
        let mut animator = PulseAnimator::new(config());
        let mut rng = StdRng::seed_from_u64(1);
        animator.seed(&traces, &mut rng);

        assert_eq!(animator.pulses().len(), 5);
        for pulse in animator.pulses() {
            assert!(pulse.trace < traces.len());
            assert_eq!(pulse.segment, 0);
            assert_eq!(pulse.progress, 0.0);
        }
    }

    #[test]
    fn test_hundred_pixel_segment_completes_on_frame_334() {
        let traces = vec![line(&[(0, 0), (5, 0)])];
        let config = config();
        let mut pulse = Pulse::new(0);

        assert!(matches!(pulse.advance(&traces, None, &config), PulseUpdate::Traveling(_)));
        assert!((pulse.progress - 0.003).abs() < 1e-6);

        for frame in 2..=333 {
            let update = pulse.advance(&traces, None, &config);
            assert!(matches!(update, PulseUpdate::Traveling(_)), "frame {} ended early", frame);
        }
        assert_eq!(pulse.advance(&traces, None, &config), PulseUpdate::Completed);
    }

    #[test]
    fn test_progress_wraps_into_next_segment() {
        let traces = vec![line(&[(0, 0), (1, 0), (2, 0)])];
        let config = config();
        let mut pulse = Pulse::new(0);
        let mut last = 0.0;

        loop {
            let update = pulse.advance(&traces, None, &config);
            assert!(matches!(update, PulseUpdate::Traveling(_)));
            if pulse.segment == 1 {
                assert_eq!(pulse.progress, 0.0);
                break;
            }
            assert!(pulse.progress >= last, "progress went backwards");
            assert!(pulse.progress < 1.0);
            last = pulse.progress;
        }
    }

    #[test]
    fn test_reported_position_interpolates_segment() {
        let traces = vec![line(&[(1, 1), (1, 3)])];
        let pulse = Pulse {
            trace: 0,
            segment: 0,
            progress: 0.25,
        };
        assert_eq!(pulse.position(&traces, 20.0), Some((20.0, 30.0)));
    }

    #[test]
    fn test_pointer_on_pulse_uses_hover_speed() {
        let traces = vec![line(&[(0, 0), (5, 0)])];
        let config = config();
        let mut pulse = Pulse {
            trace: 0,
            segment: 0,
            progress: 0.5,
        };

        let here = pulse.position(&traces, config.cell_size).unwrap();
        assert_eq!(here, (50.0, 0.0));
        assert_eq!(speed_at(here, Some(here), &config), config.hover_speed);
        assert_eq!(speed_at(here, Some((50.0, 80.0)), &config), config.base_speed);
        assert_eq!(speed_at(here, None, &config), config.base_speed);

        pulse.advance(&traces, Some(here), &config);
        assert!((pulse.progress - 0.51).abs() < 1e-6);
    }

    #[test]
    fn test_zero_length_segment_does_not_move() {
        let traces = vec![line(&[(2, 2), (2, 2)])];
        let mut pulse = Pulse::new(0);
        let update = pulse.advance(&traces, None, &config());
        assert_eq!(update, PulseUpdate::Traveling((40.0, 40.0)));
        assert_eq!(pulse.progress, 0.0);
    }

    #[test]
    fn test_short_or_missing_trace_is_invalid() {
        let traces = vec![line(&[(0, 0)])];
        let config = config();
        assert_eq!(Pulse::new(0).advance(&traces, None, &config), PulseUpdate::Invalid);
        assert_eq!(Pulse::new(3).advance(&traces, None, &config), PulseUpdate::Invalid);
    }

    #[test]
    fn test_step_keeps_pool_size() {
        let traces: Vec<Trace> = (0..20)
            .map(|i| line(&[(0, i * 2), (1, i * 2), (2, i * 2 + 1)]))
            .collect();
        let mut animator = PulseAnimator::new(config());
        let mut rng = StdRng::seed_from_u64(7);
        animator.seed(&traces, &mut rng);
        let size = animator.pulses().len();

        // Long enough for every pulse to finish and respawn several times
        for _ in 0..1_000 {
            let frames = animator.step(&traces, Some((10.0, 10.0)), &mut rng);
            assert_eq!(animator.pulses().len(), size);
            assert_eq!(frames.len(), size, "one draw position per live pulse");
        }
    }

    #[test]
    fn test_step_heals_pulses_on_broken_traces() {
        let good = vec![line(&[(0, 0), (3, 0)]), line(&[(0, 4), (0, 8)])];
        let mut animator = PulseAnimator::new(config());
        animator.pulses = vec![Pulse::new(9), Pulse::new(0)];
        let mut rng = StdRng::seed_from_u64(3);

        let frames = animator.step(&good, None, &mut rng);
        assert_eq!(frames.len(), 2);
        assert!(animator.pulses().iter().all(|p| p.trace < good.len()));
    }

    #[test]
    fn test_respawn_on_single_point_trace_draws_at_that_point() {
        let traces = vec![line(&[(2, 3)])];
        let config = config();
        let cell = config.cell_size;
        let mut animator = PulseAnimator::new(config);
        animator.pulses = vec![Pulse::new(0)];
        let mut rng = StdRng::seed_from_u64(5);

        let frames: Vec<PulseFrame> = animator.step(&traces, None, &mut rng);
        assert_eq!(frames, vec![(2.0 * cell, 3.0 * cell)]);
        assert_eq!(animator.pulses().len(), 1);
    }

    #[test]
    fn test_step_drops_pulses_when_traces_vanish() {
        let mut animator = PulseAnimator::new(config());
        animator.pulses = vec![Pulse::new(0), Pulse::new(1)];
        let mut rng = StdRng::seed_from_u64(4);

        let frames = animator.step(&[], None, &mut rng);
        assert!(frames.is_empty());
        assert!(animator.pulses().is_empty());
    }
}
