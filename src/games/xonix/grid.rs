use thiserror::Error;

use super::config::XonixConfig;
use super::state::{GridPos, Vec2};

/// State of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty = 0,
    Claimed = 1,
    Border = 2,
    Trail = 3,
}

impl Cell {
    pub fn is_safe(self) -> bool {
        matches!(self, Cell::Border | Cell::Claimed)
    }
}

/// Upper bound on `cols * rows`.
pub const MAX_CELLS: u64 = 1 << 24;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("grid of {cols}x{rows} cells leaves no claimable area inside a {border}-cell border")]
    TooSmall { cols: u32, rows: u32, border: u32 },
    #[error("grid of {cols}x{rows} cells exceeds the {max} cell limit", max = MAX_CELLS)]
    TooLarge { cols: u32, rows: u32 },
    #[error("cell size must be positive, got {0}")]
    InvalidCellSize(f32),
}

pub struct TerritoryGrid {
    /// Width of the grid in cells
    cols: u32,
    /// Height of the grid in cells
    rows: u32,
    /// Thickness of the permanent frame in cells
    border: u32,
    /// Side length of a cell in pixels
    cell_size: f32,
    /// Row-major cell states
    cells: Vec<Cell>,
    /// Number of `Claimed` cells, maintained on every write
    claimed: usize,
    /// Non-border cell count, fixed for the grid's lifetime
    total_claimable: usize,
}

impl TerritoryGrid {
    pub fn new(cols: u32, rows: u32, border: u32, cell_size: f32) -> Result<Self, GridError> {
        if !frame_fits(cols, rows, border) {
            return Err(GridError::TooSmall { cols, rows, border });
        }
        if cols as u64 * rows as u64 > MAX_CELLS {
            return Err(GridError::TooLarge { cols, rows });
        }
        if !(cell_size > 0.0) {
            return Err(GridError::InvalidCellSize(cell_size));
        }

        let mut grid = Self {
            cols,
            rows,
            border,
            cell_size,
            cells: vec![Cell::Empty; (cols * rows) as usize],
            claimed: 0,
            total_claimable: ((cols - border * 2) * (rows - border * 2)) as usize,
        };
        grid.reset();
        Ok(grid)
    }

    pub fn from_config(config: &XonixConfig) -> Result<Self, GridError> {
        Self::new(
            config.grid_cols,
            config.grid_rows,
            config.border_size,
            config.cell_size,
        )
    }

    /// Rebuilds the border frame and empties everything inside it.
    pub fn reset(&mut self) {
        for y in 0..self.rows as i32 {
            for x in 0..self.cols as i32 {
                let pos = GridPos::new(x, y);
                let idx = self.index_unchecked(pos);
                let cell = if self.is_border_cell(pos) {
                    Cell::Border
                } else {
                    Cell::Empty
                };
                self.cells[idx] = cell;
            }
        }
        self.claimed = 0;
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.cols, self.rows)
    }

    pub fn border_size(&self) -> u32 {
        self.border
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.cols && (pos.y as u32) < self.rows
    }

    fn index_unchecked(&self, pos: GridPos) -> usize {
        (pos.y as u32 * self.cols + pos.x as u32) as usize
    }

    pub(crate) fn index_of(&self, pos: GridPos) -> Option<usize> {
        self.in_bounds(pos).then(|| self.index_unchecked(pos))
    }

    pub(crate) fn pos_of(&self, index: usize) -> GridPos {
        let cols = self.cols as usize;
        GridPos::new((index % cols) as i32, (index / cols) as i32)
    }

    /// Whether `pos` lies in the fixed frame, by geometry alone.
    pub fn is_border_cell(&self, pos: GridPos) -> bool {
        let border = self.border as i32;
        pos.x < border
            || pos.y < border
            || pos.x >= self.cols as i32 - border
            || pos.y >= self.rows as i32 - border
    }

    /// Cell state, or `None` outside the grid.
    pub fn get(&self, pos: GridPos) -> Option<Cell> {
        self.index_of(pos).map(|idx| self.cells[idx])
    }

    /// Writes a cell state. Out-of-bounds positions and the border frame are left untouched.
    pub fn set(&mut self, pos: GridPos, cell: Cell) {
        let Some(idx) = self.index_of(pos) else {
            return;
        };
        let old = self.cells[idx];
        if old == Cell::Border || cell == Cell::Border || old == cell {
            return;
        }
        self.cells[idx] = cell;

        match (old, cell) {
            (Cell::Claimed, _) => self.claimed -= 1,
            (_, Cell::Claimed) => self.claimed += 1,
            _ => {}
        }
    }

    pub fn pixel_to_cell(&self, point: Vec2) -> GridPos {
        GridPos::new(
            (point.x / self.cell_size).floor() as i32,
            (point.y / self.cell_size).floor() as i32,
        )
    }

    pub fn cell_to_pixel_center(&self, pos: GridPos) -> Vec2 {
        Vec2::new(
            pos.x as f32 * self.cell_size + self.cell_size / 2.0,
            pos.y as f32 * self.cell_size + self.cell_size / 2.0,
        )
    }

    pub fn is_safe(&self, pos: GridPos) -> bool {
        self.get(pos).is_some_and(Cell::is_safe)
    }

    pub fn is_trail(&self, pos: GridPos) -> bool {
        self.get(pos) == Some(Cell::Trail)
    }

    pub fn is_empty(&self, pos: GridPos) -> bool {
        self.get(pos) == Some(Cell::Empty)
    }

    /// Marks an `Empty` cell as `Trail`; any other cell is left alone.
    pub fn mark_trail(&mut self, pos: GridPos) -> bool {
        if self.is_empty(pos) {
            self.set(pos, Cell::Trail);
            true
        } else {
            false
        }
    }

    /// Reverts every `Trail` cell to `Empty`.
    pub fn clear_all_trail(&mut self) -> usize {
        let mut cleared = 0;
        for cell in self.cells.iter_mut().filter(|c| **c == Cell::Trail) {
            *cell = Cell::Empty;
            cleared += 1;
        }
        cleared
    }

    /// Turns every `Trail` cell into `Claimed`, returning how many changed.
    pub fn commit_trail_as_claimed(&mut self) -> usize {
        let mut committed = 0;
        for cell in self.cells.iter_mut().filter(|c| **c == Cell::Trail) {
            *cell = Cell::Claimed;
            committed += 1;
        }
        self.claimed += committed;
        committed
    }

    pub fn claimed_count(&self) -> usize {
        self.claimed
    }

    pub fn total_claimable(&self) -> usize {
        self.total_claimable
    }

    /// Claimed share of the non-border area, in `[0, 1]`.
    pub fn fill_fraction(&self) -> f32 {
        self.claimed as f32 / self.total_claimable as f32
    }

    pub fn count(&self, state: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == state).count()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// Whether a `border`-cell frame leaves at least one cell inside.
pub(crate) fn frame_fits(cols: u32, rows: u32, border: u32) -> bool {
    border
        .checked_mul(2)
        .is_some_and(|frame| cols > frame && rows > frame)
}

impl std::fmt::Debug for TerritoryGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerritoryGrid")
            .field("cols", &self.cols)
            .field("rows", &self.rows)
            .field("border", &self.border)
            .field("claimed", &self.claimed)
            .field("total_claimable", &self.total_claimable)
            .finish()
    }
}
