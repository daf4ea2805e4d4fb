/// A cell coordinate on the generation grid.
///
/// Signed so that neighbours of edge cells can be formed and then rejected
/// by a bounds check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one step in `dir`
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Chebyshev (king-move) distance
    #[cfg(test)]
    pub fn chebyshev(self, other: Self) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Pixel-space position of this cell's corner
    pub fn to_pixels(self, cell_size: f32) -> (f32, f32) {
        (self.x as f32 * cell_size, self.y as f32 * cell_size)
    }
}

/// The eight compass headings, in clockwise order starting from north.
/// Screen coordinates: y grows downwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// 45 degree turn to the right
    pub fn clockwise(self) -> Self {
        Self::ALL[(self.index() + 1) % 8]
    }

    /// 45 degree turn to the left
    pub fn counter_clockwise(self) -> Self {
        Self::ALL[(self.index() + 7) % 8]
    }
}

/// One generated wire: an ordered, self-avoiding run of grid cells.
#[derive(Clone, Debug, PartialEq)]
pub struct Trace {
    points: Vec<GridPos>,
}

impl Trace {
    pub fn new(points: Vec<GridPos>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[GridPos] {
        &self.points
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of straight spans between consecutive points
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn first(&self) -> Option<GridPos> {
        self.points.first().copied()
    }

    #[cfg(test)]
    pub fn last(&self) -> Option<GridPos> {
        self.points.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turns_are_inverse() {
        for dir in Direction::ALL {
            assert_eq!(dir.clockwise().counter_clockwise(), dir);
            assert_eq!(dir.counter_clockwise().clockwise(), dir);
        }
    }

    #[test]
    fn test_turns_wrap_around() {
        assert_eq!(Direction::NorthWest.clockwise(), Direction::North);
        assert_eq!(Direction::North.counter_clockwise(), Direction::NorthWest);
        assert_eq!(Direction::East.clockwise(), Direction::SouthEast);
    }

    #[test]
    fn test_offsets_are_unit_king_moves() {
        let origin = GridPos::new(5, 5);
        for dir in Direction::ALL {
            assert_eq!(origin.chebyshev(origin.step(dir)), 1, "{:?}", dir);
        }
    }

    #[test]
    fn test_segment_count() {
        assert_eq!(Trace::new(vec![]).segment_count(), 0);
        assert_eq!(Trace::new(vec![GridPos::new(0, 0)]).segment_count(), 0);
        let t = Trace::new(vec![GridPos::new(0, 0), GridPos::new(1, 0), GridPos::new(2, 1)]);
        assert_eq!(t.segment_count(), 2);
        assert_eq!(t.first(), Some(GridPos::new(0, 0)));
        assert_eq!(t.last(), Some(GridPos::new(2, 1)));
    }
}
