use std::f32::consts::TAU;

use rand::Rng;

use super::config::XonixConfig;
use super::grid::{Cell, TerritoryGrid};
use super::state::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    /// Bounces around the unclaimed field
    Roaming,
    /// Confined to border and claimed cells
    Patrolling,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyKind,
    /// Centre of the bounding box in pixels
    pub position: Vec2,
    /// Unit heading
    pub velocity: Vec2,
    /// Pixels per reference frame, already scaled for the level
    pub base_speed: f32,
    pub size: f32,
    pub frozen: bool,
    pub slowed: bool,
}

impl Enemy {
    pub fn roaming(position: Vec2, velocity: Vec2, base_speed: f32, size: f32) -> Self {
        Self::new(EnemyKind::Roaming, position, velocity, base_speed, size)
    }

    pub fn patrolling(position: Vec2, velocity: Vec2, base_speed: f32, size: f32) -> Self {
        Self::new(EnemyKind::Patrolling, position, velocity, base_speed, size)
    }

    fn new(kind: EnemyKind, position: Vec2, velocity: Vec2, base_speed: f32, size: f32) -> Self {
        Self {
            kind,
            position,
            velocity: velocity.normalized(),
            base_speed,
            size,
            frozen: false,
            slowed: false,
        }
    }

    pub fn effective_speed(&self) -> f32 {
        if self.frozen {
            0.0
        } else if self.slowed {
            self.base_speed * 0.5
        } else {
            self.base_speed
        }
    }

    pub fn update(&mut self, grid: &TerritoryGrid, time_scale: f32) {
        let step = self.effective_speed() * time_scale;
        if step == 0.0 {
            return;
        }
        match self.kind {
            EnemyKind::Roaming => self.update_roaming(grid, step),
            EnemyKind::Patrolling => self.update_patrolling(grid, step),
        }
    }

    /// Each axis is tested on its own against the current value of the other
    /// axis; a blocked axis reflects and holds still for this tick.
    fn update_roaming(&mut self, grid: &TerritoryGrid, step: f32) {
        let half = self.size / 2.0;
        let (width, height) = canvas_size(grid);
        let candidate = self.position + self.velocity * step;

        let open = |point: Vec2| grid.get(grid.pixel_to_cell(point)) == Some(Cell::Empty);
        let x_clear = open(Vec2::new(candidate.x, self.position.y))
            && candidate.x > half
            && candidate.x < width - half;
        let y_clear = open(Vec2::new(self.position.x, candidate.y))
            && candidate.y > half
            && candidate.y < height - half;

        if x_clear {
            self.position.x = candidate.x;
        } else {
            self.velocity.x = -self.velocity.x;
        }
        if y_clear {
            self.position.y = candidate.y;
        } else {
            self.velocity.y = -self.velocity.y;
        }

        if !grid.is_empty(grid.pixel_to_cell(self.position)) {
            self.escape_to_empty(grid);
        }
    }

    /// Jumps to the centre of the first empty orthogonal neighbour, if any.
    fn escape_to_empty(&mut self, grid: &TerritoryGrid) {
        let cell = grid.pixel_to_cell(self.position);
        if let Some(free) = cell.neighbors().into_iter().find(|n| grid.is_empty(*n)) {
            self.position = grid.cell_to_pixel_center(free);
            tracing::debug!("Enemy escaped from {:?} to {:?}", cell, free);
        }
    }

    fn update_patrolling(&mut self, grid: &TerritoryGrid, step: f32) {
        let half = self.size / 2.0;
        let (width, height) = canvas_size(grid);
        let candidate = self.position + self.velocity * step;

        let in_bounds = |point: Vec2| {
            point.x >= half && point.x <= width - half && point.y >= half && point.y <= height - half
        };
        let allowed = |point: Vec2| in_bounds(point) && corners_safe(grid, point, half);

        let bounce_x = !allowed(Vec2::new(candidate.x, self.position.y));
        let bounce_y = !allowed(Vec2::new(self.position.x, candidate.y));
        let can_move = !bounce_x && !bounce_y && allowed(candidate);

        if bounce_x {
            self.velocity.x = -self.velocity.x;
        }
        if bounce_y {
            self.velocity.y = -self.velocity.y;
        }
        if can_move {
            self.position = candidate;
        }

        self.position.x = self.position.x.clamp(half, width - half);
        self.position.y = self.position.y.clamp(half, height - half);
    }

    /// Whether all four bounding-box corners at `center` sit on safe cells.
    pub fn corners_safe(&self, grid: &TerritoryGrid, center: Vec2) -> bool {
        corners_safe(grid, center, self.size / 2.0)
    }

    /// Samples the centre and the four edge midpoints against `Trail` cells.
    pub fn touches_trail(&self, grid: &TerritoryGrid) -> bool {
        let half = self.size / 2.0;
        let p = self.position;
        [
            p,
            Vec2::new(p.x - half, p.y),
            Vec2::new(p.x + half, p.y),
            Vec2::new(p.x, p.y - half),
            Vec2::new(p.x, p.y + half),
        ]
        .into_iter()
        .any(|point| grid.is_trail(grid.pixel_to_cell(point)))
    }
}

fn corners_safe(grid: &TerritoryGrid, center: Vec2, half: f32) -> bool {
    [
        Vec2::new(center.x - half, center.y - half),
        Vec2::new(center.x + half, center.y - half),
        Vec2::new(center.x - half, center.y + half),
        Vec2::new(center.x + half, center.y + half),
    ]
    .into_iter()
    .all(|corner| grid.is_safe(grid.pixel_to_cell(corner)))
}

fn canvas_size(grid: &TerritoryGrid) -> (f32, f32) {
    let (cols, rows) = grid.dimensions();
    (cols as f32 * grid.cell_size(), rows as f32 * grid.cell_size())
}

/// Creates the enemy roster for a 1-based level.
///
/// Roaming enemies start at random points well inside the field with a random
/// heading. Patrolling enemies cycle through fixed border points away from the
/// player's spawn at the top centre.
pub fn spawn_for_level<R: Rng>(config: &XonixConfig, level: u32, rng: &mut R) -> Vec<Enemy> {
    let level_config = config.level(level);
    let multiplier = config.level_speed_multiplier(level);
    let mut enemies = Vec::new();

    let inset = config.cell_size * (config.border_size + 5) as f32;
    let span_x = config.canvas_width - config.cell_size * (config.border_size + 10) as f32;
    let span_y = config.canvas_height - config.cell_size * (config.border_size + 10) as f32;

    for _ in 0..level_config.roaming_enemies {
        let position = Vec2::new(
            random_in_span(rng, inset, span_x, config.canvas_width / 2.0),
            random_in_span(rng, inset, span_y, config.canvas_height / 2.0),
        );
        let angle = rng.gen_range(0.0..TAU);
        enemies.push(Enemy::roaming(
            position,
            Vec2::new(angle.cos(), angle.sin()),
            config.roaming_speed * multiplier,
            config.enemy_size,
        ));
    }

    let spawn_points = patrol_spawn_points(config);
    for i in 0..level_config.patrolling_enemies as usize {
        let primary = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let secondary = if rng.gen_bool(0.5) { 0.3 } else { -0.3 };
        let velocity = if rng.gen_bool(0.5) {
            Vec2::new(primary, secondary)
        } else {
            Vec2::new(secondary, primary)
        };
        enemies.push(Enemy::patrolling(
            spawn_points[i % spawn_points.len()],
            velocity,
            config.patrolling_speed * config.patrolling_speed_factor * multiplier,
            config.enemy_size,
        ));
    }

    tracing::debug!(
        "Spawned {} roaming and {} patrolling enemies for level {}",
        level_config.roaming_enemies,
        level_config.patrolling_enemies,
        level
    );
    enemies
}

fn random_in_span<R: Rng>(rng: &mut R, start: f32, span: f32, fallback: f32) -> f32 {
    if span > 0.0 {
        start + rng.gen_range(0.0..span)
    } else {
        fallback
    }
}

/// Bottom-left, bottom-right, left-middle, right-middle.
fn patrol_spawn_points(config: &XonixConfig) -> [Vec2; 4] {
    let band = config.border_pixels() / 2.0;
    let (w, h) = (config.canvas_width, config.canvas_height);
    [
        Vec2::new(band, h - band),
        Vec2::new(w - band, h - band),
        Vec2::new(band, h / 2.0),
        Vec2::new(w - band, h / 2.0),
    ]
}

/// Moves patrolling enemies to the lower corners and lower sides, far from
/// the player's respawn point. Roaming enemies are left where they are.
pub fn reposition_patrollers(enemies: &mut [Enemy], config: &XonixConfig) {
    let band = config.border_pixels() / 2.0;
    let (w, h) = (config.canvas_width, config.canvas_height);
    let safe_points = [
        Vec2::new(band, h - band),
        Vec2::new(w - band, h - band),
        Vec2::new(band, h * 0.7),
        Vec2::new(w - band, h * 0.7),
    ];

    for (i, enemy) in enemies
        .iter_mut()
        .filter(|e| e.kind == EnemyKind::Patrolling)
        .enumerate()
    {
        enemy.position = safe_points[i % safe_points.len()];
    }
}
