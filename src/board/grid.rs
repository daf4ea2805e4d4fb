use crate::board::trace::GridPos;

/// Which cells are taken by committed traces
pub struct OccupancyGrid {
    cols: usize,
    rows: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Create an all-free grid
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![false; cols * rows],
        }
    }

    /// Drop every committed cell and resize
    pub fn clear(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.cells.clear();
        self.cells.resize(cols * rows, false);
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.cols && (pos.y as usize) < self.rows
    }

    fn index(&self, pos: GridPos) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| pos.y as usize * self.cols + pos.x as usize)
    }

    /// Out-of-bounds cells read as free
    pub fn is_occupied(&self, pos: GridPos) -> bool {
        self.index(pos).map_or(false, |i| self.cells[i])
    }

    /// True iff no in-bounds cell of the 3x3 block centred on `pos` is taken.
    /// Cells past the edge are left out of the check.
    pub fn is_clear_around(&self, pos: GridPos) -> bool {
        for dy in -1..=1 {
            for dx in -1..=1 {
                if self.is_occupied(GridPos::new(pos.x + dx, pos.y + dy)) {
                    return false;
                }
            }
        }
        true
    }

    /// Mark the path's cells as taken, skipping any that fall outside
    pub fn commit(&mut self, path: &[GridPos]) {
        for &pos in path {
            if let Some(i) = self.index(pos) {
                self.cells[i] = true;
            }
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}
