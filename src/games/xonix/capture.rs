use super::enemy::{Enemy, EnemyKind};
use super::grid::{Cell, TerritoryGrid};
use super::state::GridPos;

/// Multi-source flood fill that turns enclosed empty space into territory.
///
/// Buffers are kept between captures and only reallocated when the grid
/// dimensions change.
#[derive(Debug, Default)]
pub struct CaptureEngine {
    /// Row-major; true once a cell is known to be reachable by an enemy
    visited: Vec<bool>,
    /// FIFO of row-major indices, consumed by `cursor`; each cell enters at most once
    queue: Vec<usize>,
}

impl CaptureEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims every empty cell no roaming enemy can reach, then the trail.
    ///
    /// Returns the number of interior cells claimed, excluding the trail
    /// itself. An empty trail is a no-op.
    pub fn capture(&mut self, grid: &mut TerritoryGrid, trail: &[GridPos], enemies: &[Enemy]) -> usize {
        if trail.is_empty() {
            return 0;
        }

        let (cols, rows) = grid.dimensions();
        let len = (cols * rows) as usize;
        self.visited.clear();
        self.visited.resize(len, false);
        if self.queue.capacity() < len {
            self.queue.reserve(len - self.queue.len());
        }

        for enemy in enemies.iter().filter(|e| e.kind == EnemyKind::Roaming) {
            let start = grid.pixel_to_cell(enemy.position);
            self.flood_from(grid, start);
        }

        let mut claimed = 0;
        for idx in 0..len {
            let pos = grid.pos_of(idx);
            if !self.visited[idx] && grid.get(pos) == Some(Cell::Empty) {
                grid.set(pos, Cell::Claimed);
                claimed += 1;
            }
        }

        let outline = grid.commit_trail_as_claimed();
        tracing::info!(
            "Captured {} cells ({} trail), fill now {:.1}%",
            claimed,
            outline,
            grid.fill_fraction() * 100.0
        );
        claimed
    }

    /// Breadth-first search over 4-connected `Empty` cells from `start`.
    fn flood_from(&mut self, grid: &TerritoryGrid, start: GridPos) {
        let Some(start_idx) = grid.index_of(start) else {
            return;
        };
        if self.visited[start_idx] || grid.get(start) != Some(Cell::Empty) {
            return;
        }

        self.queue.clear();
        self.visited[start_idx] = true;
        self.queue.push(start_idx);

        let mut cursor = 0;
        while cursor < self.queue.len() {
            let pos = grid.pos_of(self.queue[cursor]);
            cursor += 1;

            for next in pos.neighbors() {
                let Some(idx) = grid.index_of(next) else {
                    continue;
                };
                if !self.visited[idx] && grid.get(next) == Some(Cell::Empty) {
                    self.visited[idx] = true;
                    self.queue.push(idx);
                }
            }
        }
    }
}
