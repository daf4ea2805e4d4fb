use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::grid::OccupancyGrid;
use crate::board::trace::{Direction, GridPos, Trace};
use crate::config::{MAX_TRACE_LENGTH, MIN_TRACE_LENGTH, STRAIGHT_CHANCE, TRACE_ATTEMPTS};

/// Tunables for the random walk
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub attempts: usize,
    pub max_trace_length: usize,
    pub min_trace_length: usize,
    /// Probability in [0, 1] of trying the current heading first
    pub straight_chance: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            attempts: TRACE_ATTEMPTS,
            max_trace_length: MAX_TRACE_LENGTH,
            min_trace_length: MIN_TRACE_LENGTH,
            straight_chance: STRAIGHT_CHANCE,
        }
    }
}

/// Cells already used by the walk in progress. Kept apart from the
/// occupancy grid: this one stops a trace crossing itself, the grid keeps
/// traces away from each other.
struct Visited(HashSet<GridPos>);

impl Visited {
    fn starting_at(pos: GridPos) -> Self {
        let mut set = HashSet::new();
        set.insert(pos);
        Self(set)
    }

    fn contains(&self, pos: GridPos) -> bool {
        self.0.contains(&pos)
    }

    fn insert(&mut self, pos: GridPos) {
        self.0.insert(pos);
    }
}

/// Builds PCB-looking traces by straight-biased random walks with a
/// one-cell clearance around everything already committed.
pub struct TraceGenerator {
    config: GeneratorConfig,
}

impl TraceGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run `attempts` independent walks from random starts. Accepted traces
    /// are committed to `grid` as they are found, so later walks avoid them.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        attempts: usize,
        grid: &mut OccupancyGrid,
        rng: &mut R,
    ) -> Vec<Trace> {
        let mut traces = Vec::new();
        if grid.cols() == 0 || grid.rows() == 0 {
            return traces;
        }

        for _ in 0..attempts {
            let start = GridPos::new(
                rng.gen_range(0..grid.cols()) as i32,
                rng.gen_range(0..grid.rows()) as i32,
            );
            let heading = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];

            if let Some(trace) = self.grow(grid, start, heading, rng) {
                traces.push(trace);
            }
        }

        log::debug!(
            "Generated {} traces from {} attempts ({} cells occupied)",
            traces.len(),
            attempts,
            grid.occupied_count()
        );

        traces
    }

    /// One attempt from a fixed start and heading. Returns the trace (already
    /// committed to `grid`) or None if the start is blocked or the walk ended
    /// shorter than the minimum length.
    pub fn grow<R: Rng + ?Sized>(
        &self,
        grid: &mut OccupancyGrid,
        start: GridPos,
        heading: Direction,
        rng: &mut R,
    ) -> Option<Trace> {
        if !grid.in_bounds(start) || !grid.is_clear_around(start) {
            return None;
        }

        let mut path = vec![start];
        let mut visited = Visited::starting_at(start);
        let mut current = start;
        let mut heading = heading;

        let can_enter = |pos: GridPos, visited: &Visited| {
            grid.in_bounds(pos) && !visited.contains(pos) && grid.is_clear_around(pos)
        };

        for _ in 1..self.config.max_trace_length {
            let mut next = None;

            if rng.gen_bool(self.config.straight_chance) {
                let ahead = current.step(heading);
                if can_enter(ahead, &visited) {
                    next = Some((ahead, heading));
                }
            }

            if next.is_none() {
                let turns: Vec<(GridPos, Direction)> =
                    [heading.clockwise(), heading.counter_clockwise()]
                        .into_iter()
                        .map(|dir| (current.step(dir), dir))
                        .filter(|&(pos, _)| can_enter(pos, &visited))
                        .collect();
                next = turns.choose(rng).copied();
            }

            // Dead end
            let Some((pos, dir)) = next else { break };

            path.push(pos);
            visited.insert(pos);
            current = pos;
            heading = dir;
        }

        if path.len() < self.config.min_trace_length {
            return None;
        }

        grid.commit(&path);
        Some(Trace::new(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn straight_only(max: usize, min: usize) -> TraceGenerator {
        TraceGenerator::new(GeneratorConfig {
            attempts: 1,
            max_trace_length: max,
            min_trace_length: min,
            straight_chance: 1.0,
        })
    }

    fn pos(x: i32, y: i32) -> GridPos {
        GridPos::new(x, y)
    }

    #[test]
    fn test_forced_start_runs_straight_east() {
        let generator = straight_only(5, 2);
        let mut grid = OccupancyGrid::new(10, 10);
        let mut rng = StdRng::seed_from_u64(1);

        let trace = generator
            .grow(&mut grid, pos(0, 0), Direction::East, &mut rng)
            .expect("open grid should accept the trace");

        assert_eq!(trace.points(), &[pos(0, 0), pos(1, 0), pos(2, 0), pos(3, 0), pos(4, 0)]);
        assert_eq!(grid.occupied_count(), 5);
    }

    #[test]
    fn test_start_next_to_committed_row_is_rejected() {
        let generator = straight_only(5, 2);
        let mut grid = OccupancyGrid::new(10, 10);
        let row: Vec<GridPos> = (0..10).map(|x| pos(x, 0)).collect();
        grid.commit(&row);
        let mut rng = StdRng::seed_from_u64(2);

        for dir in Direction::ALL {
            assert!(generator.grow(&mut grid, pos(0, 1), dir, &mut rng).is_none());
        }
        assert_eq!(grid.occupied_count(), 10, "rejected attempts must not commit");
    }

    #[test]
    fn test_walk_towards_committed_row_turns_away_or_stops() {
        let generator = straight_only(6, 2);
        let mut grid = OccupancyGrid::new(10, 10);
        let row: Vec<GridPos> = (0..10).map(|x| pos(x, 0)).collect();
        grid.commit(&row);

        // From the left edge heading north: ahead and NE are inside the
        // buffer, NW is off the grid, so the walk dead-ends at length 1.
        let mut rng = StdRng::seed_from_u64(3);
        assert!(generator.grow(&mut grid, pos(0, 2), Direction::North, &mut rng).is_none());

        // Heading NE from the middle: both NE and N are blocked, only the
        // east turn is open, and the trace then runs along row 2.
        let trace = generator
            .grow(&mut grid, pos(4, 2), Direction::NorthEast, &mut rng)
            .expect("east turn is available");
        assert_eq!(trace.points()[1], pos(5, 2));
        assert!(trace.points().iter().all(|p| p.y >= 2));
    }

    #[test]
    fn test_short_walk_is_discarded_without_commit() {
        let generator = straight_only(10, 4);
        let mut grid = OccupancyGrid::new(3, 3);
        let mut rng = StdRng::seed_from_u64(4);

        // Three cells east along the top edge, then every option is off the grid
        let result = generator.grow(&mut grid, pos(0, 0), Direction::East, &mut rng);
        assert!(result.is_none());
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_failed_straight_roll_turns_one_notch() {
        let generator = TraceGenerator::new(GeneratorConfig {
            attempts: 1,
            max_trace_length: 12,
            min_trace_length: 2,
            straight_chance: 0.0,
        });

        for seed in 0..50 {
            let mut grid = OccupancyGrid::new(40, 40);
            let mut rng = StdRng::seed_from_u64(seed);
            let trace = generator
                .grow(&mut grid, pos(20, 20), Direction::East, &mut rng)
                .expect("open grid always allows the first turn");

            let mut heading = Direction::East;
            for pair in trace.points().windows(2) {
                let offset = (pair[1].x - pair[0].x, pair[1].y - pair[0].y);
                let dir = Direction::ALL
                    .into_iter()
                    .find(|d| d.offset() == offset)
                    .expect("consecutive points are one king move apart");
                assert!(
                    dir == heading.clockwise() || dir == heading.counter_clockwise(),
                    "seed {}: {:?} after heading {:?}",
                    seed,
                    dir,
                    heading
                );
                heading = dir;
            }
        }
    }

    #[test]
    fn test_empty_grid_yields_nothing() {
        let generator = TraceGenerator::new(GeneratorConfig::default());
        let mut grid = OccupancyGrid::new(0, 0);
        let mut rng = StdRng::seed_from_u64(5);
        assert!(generator.generate(100, &mut grid, &mut rng).is_empty());
    }

    fn generated(seed: u64) -> (Vec<Trace>, OccupancyGrid, GeneratorConfig) {
        let config = GeneratorConfig::default();
        let generator = TraceGenerator::new(config.clone());
        let mut grid = OccupancyGrid::new(64, 40);
        let mut rng = StdRng::seed_from_u64(seed);
        let traces = generator.generate(config.attempts, &mut grid, &mut rng);
        (traces, grid, config)
    }

    #[test]
    fn test_traces_keep_clearance_from_each_other() {
        for seed in 0..5 {
            let (traces, _, _) = generated(seed);
            assert!(!traces.is_empty());
            for (i, a) in traces.iter().enumerate() {
                for b in &traces[i + 1..] {
                    for &p in a.points() {
                        for &q in b.points() {
                            assert!(p.chebyshev(q) > 1, "traces touch at {:?} / {:?}", p, q);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_traces_are_self_avoiding_and_bounded() {
        for seed in 10..15 {
            let (traces, _, config) = generated(seed);
            for trace in &traces {
                let unique: HashSet<GridPos> = trace.points().iter().copied().collect();
                assert_eq!(unique.len(), trace.len(), "trace revisits a cell");
                assert!(trace.len() >= config.min_trace_length);
                assert!(trace.len() <= config.max_trace_length);
                for pair in trace.points().windows(2) {
                    assert_eq!(pair[0].chebyshev(pair[1]), 1, "steps must be king moves");
                }
            }
        }
    }

    #[test]
    fn test_grid_matches_committed_traces() {
        let (traces, grid, _) = generated(42);
        let committed: HashSet<GridPos> = traces
            .iter()
            .flat_map(|t| t.points().iter().copied())
            .collect();

        for y in 0..grid.rows() as i32 {
            for x in 0..grid.cols() as i32 {
                let p = pos(x, y);
                assert_eq!(grid.is_occupied(p), committed.contains(&p), "mismatch at {:?}", p);
            }
        }
    }
}
