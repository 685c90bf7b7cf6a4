use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::traits::TickRate;

use super::grid::{MAX_CELLS, frame_fits};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid of {cols}x{rows} cells is too small for a border of {border} cells")]
    GridTooSmall { cols: u32, rows: u32, border: u32 },
    #[error("canvas {canvas_width}x{canvas_height} px does not match {cols}x{rows} cells of {cell_size} px")]
    CanvasMismatch {
        canvas_width: f32,
        canvas_height: f32,
        cols: u32,
        rows: u32,
        cell_size: f32,
    },
    #[error("grid of {cols}x{rows} cells exceeds the {max} cell limit", max = MAX_CELLS)]
    GridTooLarge { cols: u32, rows: u32 },
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("level table is empty")]
    NoLevels,
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-level difficulty entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Fill fraction in `[0, 1]` needed to complete the level
    pub fill_required: f32,
    pub roaming_enemies: u32,
    pub patrolling_enemies: u32,
}

impl LevelConfig {
    pub const fn new(fill_required: f32, roaming_enemies: u32, patrolling_enemies: u32) -> Self {
        Self {
            fill_required,
            roaming_enemies,
            patrolling_enemies,
        }
    }
}

/// Timed effect lengths in milliseconds of simulation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpDurations {
    pub speed_ms: u64,
    pub freeze_ms: u64,
    pub shield_ms: u64,
    pub slow_mo_ms: u64,
}

impl Default for PowerUpDurations {
    fn default() -> Self {
        Self {
            speed_ms: 5000,
            freeze_ms: 3000,
            shield_ms: 5000,
            slow_mo_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XonixConfig {
    /// Playfield width in pixels
    pub canvas_width: f32,
    /// Playfield height in pixels
    pub canvas_height: f32,
    /// Side length of one grid cell in pixels
    pub cell_size: f32,
    /// Grid width in cells
    pub grid_cols: u32,
    /// Grid height in cells
    pub grid_rows: u32,
    /// Width of the permanent border frame in cells
    pub border_size: u32,
    /// Simulation tick rate in Hz
    pub tick_rate_hz: u32,
    /// Frame rate the per-tick speeds are expressed against
    pub reference_fps: u32,
    /// Player speed in pixels per reference frame
    pub player_speed: f32,
    pub player_size: f32,
    pub enemy_size: f32,
    /// Roaming enemy speed in pixels per reference frame at level 1
    pub roaming_speed: f32,
    /// Patrolling enemy speed in pixels per reference frame at level 1
    pub patrolling_speed: f32,
    /// Extra multiplier applied on top of `patrolling_speed`
    pub patrolling_speed_factor: f32,
    /// Speed increase per level above the first (0.1 = +10%)
    pub speed_step_per_level: f32,
    /// Added to the summed radii when testing player/enemy contact
    pub collision_slack: f32,
    pub initial_lives: u32,
    pub death_cooldown_ms: u64,
    pub powerup_size: f32,
    /// Chance per tick that a new power-up appears
    pub powerup_spawn_chance: f64,
    pub max_powerups: usize,
    pub powerup_durations: PowerUpDurations,
    pub score_per_percent: u64,
    pub level_bonus: u64,
    pub levels: Vec<LevelConfig>,
}

impl XonixConfig {
    pub fn with_grid_size(cols: u32, rows: u32) -> Self {
        let defaults = Self::default();
        Self {
            grid_cols: cols,
            grid_rows: rows,
            canvas_width: cols as f32 * defaults.cell_size,
            canvas_height: rows as f32 * defaults.cell_size,
            ..defaults
        }
    }

    /// Parses a RON document; omitted fields keep their defaults.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_ron_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !frame_fits(self.grid_cols, self.grid_rows, self.border_size) {
            return Err(ConfigError::GridTooSmall {
                cols: self.grid_cols,
                rows: self.grid_rows,
                border: self.border_size,
            });
        }
        if self.grid_cols as u64 * self.grid_rows as u64 > MAX_CELLS {
            return Err(ConfigError::GridTooLarge {
                cols: self.grid_cols,
                rows: self.grid_rows,
            });
        }
        if !(self.cell_size > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "cell_size",
                reason: format!("must be positive, got {}", self.cell_size),
            });
        }
        if !(1..=1000).contains(&self.tick_rate_hz) {
            return Err(ConfigError::InvalidValue {
                field: "tick_rate_hz",
                reason: format!("must be within 1..=1000, got {}", self.tick_rate_hz),
            });
        }
        if self.reference_fps == 0 {
            return Err(ConfigError::InvalidValue {
                field: "reference_fps",
                reason: "must be at least 1".to_string(),
            });
        }
        let expected_width = self.grid_cols as f32 * self.cell_size;
        let expected_height = self.grid_rows as f32 * self.cell_size;
        if (expected_width - self.canvas_width).abs() > f32::EPSILON
            || (expected_height - self.canvas_height).abs() > f32::EPSILON
        {
            return Err(ConfigError::CanvasMismatch {
                canvas_width: self.canvas_width,
                canvas_height: self.canvas_height,
                cols: self.grid_cols,
                rows: self.grid_rows,
                cell_size: self.cell_size,
            });
        }
        if !(0.0..=1.0).contains(&self.powerup_spawn_chance) {
            return Err(ConfigError::InvalidValue {
                field: "powerup_spawn_chance",
                reason: format!("{} is outside [0, 1]", self.powerup_spawn_chance),
            });
        }
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        if let Some(level) = self
            .levels
            .iter()
            .find(|l| !(0.0..=1.0).contains(&l.fill_required))
        {
            return Err(ConfigError::InvalidValue {
                field: "levels.fill_required",
                reason: format!("{} is outside [0, 1]", level.fill_required),
            });
        }
        Ok(())
    }

    /// Level entry for a 1-based level number; levels past the table reuse the last entry.
    pub fn level(&self, level: u32) -> LevelConfig {
        let index = (level.max(1) as usize - 1).min(self.levels.len().saturating_sub(1));
        self.levels
            .get(index)
            .copied()
            .unwrap_or(LevelConfig::new(1.0, 0, 0))
    }

    pub fn level_speed_multiplier(&self, level: u32) -> f32 {
        1.0 + level.saturating_sub(1) as f32 * self.speed_step_per_level
    }

    pub fn border_pixels(&self) -> f32 {
        self.cell_size * self.border_size as f32
    }

    /// Ratio between the tick length and a reference frame.
    pub fn time_scale(&self) -> f32 {
        self.reference_fps as f32 / self.tick_rate_hz as f32
    }
}

impl TickRate for XonixConfig {
    fn tick_duration(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.tick_rate_hz.max(1) as u64)
    }
}

impl Default for XonixConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,
            cell_size: 10.0,
            grid_cols: 80,
            grid_rows: 60,
            border_size: 2,
            tick_rate_hz: 60,
            reference_fps: 60,
            player_speed: 6.0,
            player_size: 8.0,
            enemy_size: 8.0,
            roaming_speed: 4.0,
            patrolling_speed: 3.0,
            patrolling_speed_factor: 1.2,
            speed_step_per_level: 0.1,
            collision_slack: 4.0,
            initial_lives: 3,
            death_cooldown_ms: 1000,
            powerup_size: 12.0,
            powerup_spawn_chance: 0.002,
            max_powerups: 3,
            powerup_durations: PowerUpDurations::default(),
            score_per_percent: 100,
            level_bonus: 1000,
            levels: default_levels(),
        }
    }
}

pub fn default_levels() -> Vec<LevelConfig> {
    vec![
        LevelConfig::new(0.50, 1, 1),
        LevelConfig::new(0.55, 2, 1),
        LevelConfig::new(0.60, 2, 2),
        LevelConfig::new(0.65, 3, 2),
        LevelConfig::new(0.70, 3, 3),
        LevelConfig::new(0.75, 4, 3),
        LevelConfig::new(0.80, 4, 4),
        LevelConfig::new(0.80, 5, 5),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = XonixConfig::default();
        assert_eq!(config.grid_cols, 80);
        assert_eq!(config.grid_rows, 60);
        assert_eq!(config.tick_rate_hz, 60);
        assert_eq!(config.tick_duration(), Duration::from_nanos(16_666_666));
        assert_eq!(config.ticks_per_second(), 60);
        assert!((config.time_scale() - 1.0).abs() < f32::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_level_lookup_clamps_to_last_entry() {
        let config = XonixConfig::default();
        assert_eq!(config.level(1), LevelConfig::new(0.50, 1, 1));
        assert_eq!(config.level(0), LevelConfig::new(0.50, 1, 1));
        assert_eq!(config.level(8), LevelConfig::new(0.80, 5, 5));
        assert_eq!(config.level(42), LevelConfig::new(0.80, 5, 5));
    }

    #[test]
    fn test_level_speed_multiplier() {
        let config = XonixConfig::default();
        assert!((config.level_speed_multiplier(1) - 1.0).abs() < 1e-6);
        assert!((config.level_speed_multiplier(3) - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_grid_smaller_than_border_frame() {
        let mut config = XonixConfig::with_grid_size(4, 10);
        config.border_size = 2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridTooSmall { cols: 4, rows: 10, border: 2 })
        ));
    }

    #[test]
    fn test_rejects_canvas_mismatch() {
        let config = XonixConfig {
            canvas_width: 640.0,
            ..XonixConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::CanvasMismatch { .. })));
    }

    #[test]
    fn test_rejects_empty_level_table() {
        let config = XonixConfig {
            levels: Vec::new(),
            ..XonixConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoLevels)));
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = XonixConfig::from_ron_str("(tick_rate_hz: 30, initial_lives: 5)").unwrap();
        assert_eq!(config.tick_rate_hz, 30);
        assert_eq!(config.initial_lives, 5);
        assert_eq!(config.grid_cols, 80);
        assert!((config.time_scale() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_malformed_ron_is_parse_error() {
        let result = XonixConfig::from_ron_str("(tick_rate_hz: \"fast\")");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_rejects_tick_rate_out_of_range() {
        for hz in [0, 1001] {
            let config = XonixConfig {
                tick_rate_hz: hz,
                ..XonixConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidValue { field: "tick_rate_hz", .. })
            ));
        }
    }

    #[test]
    fn test_huge_border_is_rejected_without_overflow() {
        let result = XonixConfig::from_ron_str("(border_size: 3000000000)");
        assert!(matches!(
            result,
            Err(ConfigError::GridTooSmall { border: 3_000_000_000, .. })
        ));
    }

    #[test]
    fn test_oversized_grid_is_rejected() {
        let result = XonixConfig::from_ron_str(
            "(grid_cols: 70000, grid_rows: 70000, canvas_width: 700000.0, canvas_height: 700000.0)",
        );
        assert!(matches!(
            result,
            Err(ConfigError::GridTooLarge { cols: 70000, rows: 70000 })
        ));
    }

    #[test]
    fn test_rejects_bad_spawn_chance() {
        for chance in [f64::NAN, -0.1, 1.5, f64::INFINITY] {
            let config = XonixConfig {
                powerup_spawn_chance: chance,
                ..XonixConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidValue { field: "powerup_spawn_chance", .. })
            ));
        }
    }

    #[test]
    fn test_with_grid_size_keeps_canvas_consistent() {
        let config = XonixConfig::with_grid_size(10, 10);
        assert_eq!(config.canvas_width, 100.0);
        assert_eq!(config.canvas_height, 100.0);
        assert!(config.validate().is_ok());
    }
}
