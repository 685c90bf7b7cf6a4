use rand::Rng;

use super::config::XonixConfig;
use super::enemy::Enemy;
use super::grid::TerritoryGrid;
use super::player::Player;
use super::state::Vec2;

const SPAWN_ATTEMPTS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    /// Doubles player speed
    Speed,
    /// Stops every enemy
    Freeze,
    /// Player immune to enemies and its own trail
    Shield,
    /// Halves enemy speed
    SlowMo,
    /// Extra life, applied instantly by the caller
    Life,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Speed,
        PowerUpKind::Freeze,
        PowerUpKind::Shield,
        PowerUpKind::SlowMo,
        PowerUpKind::Life,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub position: Vec2,
    pub size: f32,
}

impl PowerUp {
    pub fn touches(&self, player: &Player) -> bool {
        self.position.distance(player.position) < (self.size + player.size) / 2.0
    }
}

/// End times of the running effects, in simulation milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveEffects {
    pub speed: Option<u64>,
    pub freeze: Option<u64>,
    pub shield: Option<u64>,
    pub slow_mo: Option<u64>,
}

#[derive(Debug, Default)]
pub struct PowerUpManager {
    power_ups: Vec<PowerUp>,
    effects: ActiveEffects,
}

impl PowerUpManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.power_ups.clear();
        self.effects = ActiveEffects::default();
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    pub fn effects(&self) -> ActiveEffects {
        self.effects
    }

    /// Spawns, collects, and expires power-ups for one tick.
    ///
    /// Returns the kinds collected this tick so the caller can react to
    /// instant ones such as [`PowerUpKind::Life`].
    pub fn update<R: Rng>(
        &mut self,
        grid: &TerritoryGrid,
        player: &mut Player,
        enemies: &mut [Enemy],
        now_ms: u64,
        config: &XonixConfig,
        rng: &mut R,
    ) -> Vec<PowerUpKind> {
        // NaN would panic in gen_bool.
        let chance = if config.powerup_spawn_chance.is_nan() {
            0.0
        } else {
            config.powerup_spawn_chance.clamp(0.0, 1.0)
        };
        if self.power_ups.len() < config.max_powerups && rng.gen_bool(chance) {
            self.spawn(grid, config, rng);
        }

        let mut collected = Vec::new();
        let mut remaining = Vec::with_capacity(self.power_ups.len());
        for power_up in self.power_ups.drain(..) {
            if power_up.touches(player) {
                collected.push(power_up.kind);
            } else {
                remaining.push(power_up);
            }
        }
        self.power_ups = remaining;

        for &kind in &collected {
            self.activate(kind, player, enemies, now_ms, config);
        }

        self.expire(player, enemies, now_ms);
        collected
    }

    fn spawn<R: Rng>(&mut self, grid: &TerritoryGrid, config: &XonixConfig, rng: &mut R) {
        let inset = config.cell_size * (config.border_size + 3) as f32;
        let span_x = config.canvas_width - config.cell_size * (config.border_size + 6) as f32;
        let span_y = config.canvas_height - config.cell_size * (config.border_size + 6) as f32;
        if span_x <= 0.0 || span_y <= 0.0 {
            return;
        }

        for _ in 0..SPAWN_ATTEMPTS {
            let position = Vec2::new(
                inset + rng.gen_range(0.0..span_x),
                inset + rng.gen_range(0.0..span_y),
            );
            if grid.is_empty(grid.pixel_to_cell(position)) {
                let kind = PowerUpKind::ALL[rng.gen_range(0..PowerUpKind::ALL.len())];
                tracing::debug!("Spawned {:?} power-up at {:?}", kind, position);
                self.power_ups.push(PowerUp {
                    kind,
                    position,
                    size: config.powerup_size,
                });
                return;
            }
        }
    }

    fn activate(
        &mut self,
        kind: PowerUpKind,
        player: &mut Player,
        enemies: &mut [Enemy],
        now_ms: u64,
        config: &XonixConfig,
    ) {
        let durations = &config.powerup_durations;
        tracing::debug!("Collected {:?} power-up", kind);
        match kind {
            PowerUpKind::Speed => {
                self.effects.speed = Some(now_ms + durations.speed_ms);
                player.speed_boost = true;
            }
            PowerUpKind::Freeze => {
                self.effects.freeze = Some(now_ms + durations.freeze_ms);
                enemies.iter_mut().for_each(|e| e.frozen = true);
            }
            PowerUpKind::Shield => {
                self.effects.shield = Some(now_ms + durations.shield_ms);
                player.shielded = true;
            }
            PowerUpKind::SlowMo => {
                self.effects.slow_mo = Some(now_ms + durations.slow_mo_ms);
                enemies.iter_mut().for_each(|e| e.slowed = true);
            }
            PowerUpKind::Life => {}
        }
    }

    fn expire(&mut self, player: &mut Player, enemies: &mut [Enemy], now_ms: u64) {
        if take_expired(&mut self.effects.speed, now_ms) {
            player.speed_boost = false;
            tracing::debug!("Speed boost expired");
        }
        if take_expired(&mut self.effects.freeze, now_ms) {
            enemies.iter_mut().for_each(|e| e.frozen = false);
            tracing::debug!("Freeze expired");
        }
        if take_expired(&mut self.effects.shield, now_ms) {
            player.shielded = false;
            tracing::debug!("Shield expired");
        }
        if take_expired(&mut self.effects.slow_mo, now_ms) {
            enemies.iter_mut().for_each(|e| e.slowed = false);
            tracing::debug!("Slow-mo expired");
        }
    }

    #[cfg(test)]
    fn place(&mut self, power_up: PowerUp) {
        self.power_ups.push(power_up);
    }
}

fn take_expired(effect: &mut Option<u64>, now_ms: u64) -> bool {
    match *effect {
        Some(end) if now_ms >= end => {
            *effect = None;
            true
        }
        _ => false,
    }
}
