use super::collision::DeathCause;
use super::config::XonixConfig;
use super::grid::TerritoryGrid;
use super::state::{Direction, GridPos, Vec2};

/// Result of one [`Player::advance`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// No direction set
    Idle,
    Moving,
    Death(DeathCause),
    /// Returned to the safe zone; carries the trail drawn on the way
    Capture(Vec<GridPos>),
}

#[derive(Debug, Clone)]
pub struct Player {
    /// Continuous position in pixels
    pub position: Vec2,
    /// Current movement direction
    pub direction: Direction,
    /// Pixels per reference frame before boosts
    pub speed: f32,
    pub size: f32,
    /// Immune to enemies and to its own trail while set
    pub shielded: bool,
    /// Doubles speed while set
    pub speed_boost: bool,
    /// Whether the player is out in unclaimed territory
    drawing: bool,
    /// Cells drawn since leaving the safe zone, oldest first
    trail: Vec<GridPos>,
    spawn: Vec2,
    min_bound: Vec2,
    max_bound: Vec2,
}

impl Player {
    pub fn new(config: &XonixConfig) -> Self {
        let half_cell = config.cell_size / 2.0;
        // Centre of the innermost top border row, horizontally centred.
        let spawn = Vec2::new(
            config.canvas_width / 2.0,
            config.cell_size * config.border_size.saturating_sub(1) as f32 + half_cell,
        );
        Self {
            position: spawn,
            direction: Direction::None,
            speed: config.player_speed,
            size: config.player_size,
            shielded: false,
            speed_boost: false,
            drawing: false,
            trail: Vec::new(),
            spawn,
            min_bound: Vec2::new(half_cell, half_cell),
            max_bound: Vec2::new(
                config.canvas_width - half_cell,
                config.canvas_height - half_cell,
            ),
        }
    }

    /// Back to the spawn point with no trail, direction, or effects.
    pub fn reset(&mut self) {
        self.position = self.spawn;
        self.direction = Direction::None;
        self.shielded = false;
        self.speed_boost = false;
        self.drawing = false;
        self.trail.clear();
    }

    pub fn spawn_point(&self) -> Vec2 {
        self.spawn
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn trail(&self) -> &[GridPos] {
        &self.trail
    }

    pub fn cell(&self, grid: &TerritoryGrid) -> GridPos {
        grid.pixel_to_cell(self.position)
    }

    /// Applies a direction intent. `Direction::None` stops the player.
    ///
    /// Returns `false` when the input was rejected: reversing the current
    /// direction while drawing would run straight back over the trail.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if direction == Direction::None {
            self.stop();
            return true;
        }
        if self.drawing && direction.is_opposite(&self.direction) {
            return false;
        }
        self.direction = direction;
        true
    }

    pub fn stop(&mut self) {
        self.direction = Direction::None;
    }

    pub fn current_speed(&self) -> f32 {
        if self.speed_boost {
            self.speed * 2.0
        } else {
            self.speed
        }
    }

    fn clamp(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.min_bound.x, self.max_bound.x),
            point.y.clamp(self.min_bound.y, self.max_bound.y),
        )
    }

    /// Moves one tick and drives the Idle/Drawing state machine.
    ///
    /// Every cell crossed along the movement axis is visited in order, so a
    /// displacement longer than a cell still leaves a gap-free trail and still
    /// detects self-intersection. On `Death` the position is left unchanged.
    pub fn advance(&mut self, grid: &mut TerritoryGrid, time_scale: f32) -> MoveOutcome {
        if self.direction == Direction::None {
            return MoveOutcome::Idle;
        }

        let step = self.current_speed() * time_scale;
        let target = self.clamp(self.position + self.direction.unit() * step);
        let start_cell = grid.pixel_to_cell(self.position);
        let end_cell = grid.pixel_to_cell(target);

        let mut prev_safe = grid.is_safe(start_cell);
        let mut committed: Option<GridPos> = None;

        for cell in cells_between(start_cell, end_cell) {
            if self.drawing
                && grid.is_trail(cell)
                && self.trail.last() != Some(&cell)
                && !self.shielded
            {
                tracing::debug!("Player crossed own trail at {:?}", cell);
                return MoveOutcome::Death(DeathCause::SelfIntersection);
            }

            let safe = grid.is_safe(cell);

            if !self.drawing && prev_safe && !safe {
                self.drawing = true;
                self.trail.clear();
                tracing::debug!("Player left safe zone at {:?}", cell);
            }

            if self.drawing && safe {
                self.position = if cell == end_cell {
                    target
                } else {
                    self.position_in(grid, cell, target)
                };
                if let Some(head) = committed {
                    self.snap_to_center(grid, head);
                }
                self.drawing = false;
                self.stop();
                let trail = std::mem::take(&mut self.trail);
                tracing::debug!("Player returned to safe zone with {} trail cells", trail.len());
                return MoveOutcome::Capture(trail);
            }

            // Each trail cell is recorded once; a shielded crossing adds nothing.
            if self.drawing && grid.mark_trail(cell) {
                self.trail.push(cell);
                committed = Some(cell);
            }

            prev_safe = safe;
        }

        self.position = target;
        if let Some(head) = committed {
            self.snap_to_center(grid, head);
        }
        MoveOutcome::Moving
    }

    /// `target` with its movement-axis coordinate pulled back to `cell`'s centre.
    fn position_in(&self, grid: &TerritoryGrid, cell: GridPos, target: Vec2) -> Vec2 {
        let center = grid.cell_to_pixel_center(cell);
        if self.direction.is_horizontal() {
            Vec2::new(center.x, target.y)
        } else {
            Vec2::new(target.x, center.y)
        }
    }

    /// Aligns the off-axis coordinate with the centre of `cell`.
    fn snap_to_center(&mut self, grid: &TerritoryGrid, cell: GridPos) {
        let center = grid.cell_to_pixel_center(cell);
        if self.direction.is_horizontal() {
            self.position.y = center.y;
        }
        if self.direction.is_vertical() {
            self.position.x = center.x;
        }
    }
}

/// Cells after `start` up to and including `end`, one orthogonal step at a
/// time. A move that stays inside one cell yields just that cell.
fn cells_between(start: GridPos, end: GridPos) -> Vec<GridPos> {
    let mut cells = Vec::new();
    let mut current = start;
    while current != end {
        if current.x != end.x {
            current.x += (end.x - current.x).signum();
        } else {
            current.y += (end.y - current.y).signum();
        }
        cells.push(current);
    }
    if cells.is_empty() {
        cells.push(end);
    }
    cells
}
