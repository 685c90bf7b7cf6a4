pub mod capture;
pub mod collision;
pub mod config;
pub mod enemy;
pub mod grid;
pub mod player;
pub mod powerup;
pub mod state;

use std::time::Duration;

use prost::Message;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::game::traits::{Game, GameError, TickRate, TickResult};
use crate::protocol::xonix as proto;

pub use capture::CaptureEngine;
pub use collision::{DeathCause, check_enemy_collision, check_trail_collision};
pub use config::{ConfigError, LevelConfig, PowerUpDurations, XonixConfig};
pub use enemy::{Enemy, EnemyKind};
pub use grid::{Cell, GridError, TerritoryGrid};
pub use player::{MoveOutcome, Player};
pub use powerup::{PowerUp, PowerUpKind, PowerUpManager};
pub use state::{Direction, GridPos, Vec2, direction_from_proto, direction_to_proto};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    /// Simulation and its clock are held until resumed
    Paused,
    /// Waiting for the caller to start the next level
    LevelComplete,
    GameOver,
}

#[derive(Debug, Clone, PartialEq)]
pub enum XonixEvent {
    Captured {
        cells: usize,
        trail: usize,
        score: u64,
    },
    PowerUpCollected(PowerUpKind),
    Death {
        cause: DeathCause,
        lives_left: u32,
    },
    LevelComplete {
        level: u32,
        fill: f32,
    },
    GameOver {
        score: u64,
    },
}

impl From<ConfigError> for GameError {
    fn from(err: ConfigError) -> Self {
        GameError::Setup(Box::new(err))
    }
}

impl From<GridError> for GameError {
    fn from(err: GridError) -> Self {
        GameError::Setup(Box::new(err))
    }
}

const NANOS_PER_MILLI: u64 = 1_000_000;

pub struct XonixGame {
    config: XonixConfig,
    grid: TerritoryGrid,
    player: Player,
    enemies: Vec<Enemy>,
    capture: CaptureEngine,
    power_ups: PowerUpManager,
    rng: ChaCha8Rng,
    phase: Phase,
    /// Current tick number
    tick: u64,
    /// Simulation clock in nanoseconds, advanced only while playing
    clock_ns: u64,
    /// Simulation is skipped until the clock reaches this
    cooldown_until_ns: u64,
    level: u32,
    score: u64,
    lives: u32,
}

impl XonixGame {
    pub fn new(seed: u64) -> Result<Self, GameError> {
        Self::with_config(XonixConfig::default(), seed)
    }

    pub fn with_config(config: XonixConfig, seed: u64) -> Result<Self, GameError> {
        config.validate()?;
        let grid = TerritoryGrid::from_config(&config)?;
        let mut game = Self {
            player: Player::new(&config),
            grid,
            enemies: Vec::new(),
            capture: CaptureEngine::new(),
            power_ups: PowerUpManager::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            phase: Phase::Playing,
            tick: 0,
            clock_ns: 0,
            cooldown_until_ns: 0,
            level: 1,
            score: 0,
            lives: config.initial_lives,
            config,
        };
        game.start_level(1);
        Ok(game)
    }

    /// Resets the field for a 1-based level. Score and lives carry over.
    pub fn start_level(&mut self, level: u32) {
        self.level = level.max(1);
        self.grid.reset();
        self.player.reset();
        self.power_ups.reset();
        self.enemies = enemy::spawn_for_level(&self.config, self.level, &mut self.rng);
        self.cooldown_until_ns = self.clock_ns;
        self.phase = Phase::Playing;

        tracing::info!(
            "Level {} started, {:.0}% fill required",
            self.level,
            self.config.level(self.level).fill_required * 100.0
        );
    }

    pub fn next_level(&mut self) -> Result<(), GameError> {
        if self.phase != Phase::LevelComplete {
            return Err(GameError::InvalidState(format!(
                "level {} is not complete",
                self.level
            )));
        }
        self.start_level(self.level + 1);
        Ok(())
    }

    /// Puts the player back at the spawn point and moves patrolling enemies
    /// away from it, then pauses the simulation for the death cooldown.
    pub fn handle_death_recovery(&mut self) {
        self.player.reset();
        enemy::reposition_patrollers(&mut self.enemies, &self.config);
        self.cooldown_until_ns = self
            .clock_ns
            .saturating_add(self.config.death_cooldown_ms.saturating_mul(NANOS_PER_MILLI));
    }

    /// Switches between playing and paused. Other phases cannot be paused.
    pub fn toggle_pause(&mut self) -> Result<Phase, GameError> {
        self.phase = match self.phase {
            Phase::Playing => Phase::Paused,
            Phase::Paused => Phase::Playing,
            other => {
                return Err(GameError::InvalidState(format!("cannot pause in {:?}", other)));
            }
        };
        tracing::debug!("Phase now {:?}", self.phase);
        Ok(self.phase)
    }

    pub fn set_direction(&mut self, direction: Direction) -> bool {
        self.player.set_direction(direction)
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &XonixConfig {
        &self.config
    }

    pub fn grid(&self) -> &TerritoryGrid {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn power_ups(&self) -> &PowerUpManager {
        &self.power_ups
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn in_cooldown(&self) -> bool {
        self.clock_ns < self.cooldown_until_ns
    }

    /// Simulation time in whole milliseconds.
    pub fn clock_ms(&self) -> u64 {
        self.clock_ns / NANOS_PER_MILLI
    }

    fn on_capture(&mut self, trail: &[GridPos], result: &mut TickResult<XonixEvent>) {
        let cells = self.capture.capture(&mut self.grid, trail, &self.enemies);
        let fraction = cells as f64 / self.grid.total_claimable() as f64;
        let gained = (fraction * 100.0 * self.config.score_per_percent as f64).floor() as u64;
        self.score += gained;

        result.events.push(XonixEvent::Captured {
            cells,
            trail: trail.len(),
            score: gained,
        });
        result.broadcast = Some(self.encode_state());
    }

    fn on_death(&mut self, cause: DeathCause, result: &mut TickResult<XonixEvent>) {
        self.lives = self.lives.saturating_sub(1);
        let cleared = self.grid.clear_all_trail();
        tracing::info!(
            "Player died ({:?}), {} trail cells cleared, {} lives left",
            cause,
            cleared,
            self.lives
        );
        result.events.push(XonixEvent::Death {
            cause,
            lives_left: self.lives,
        });

        if self.lives == 0 {
            self.player.reset();
            self.phase = Phase::GameOver;
            tracing::info!("Game over with score {}", self.score);
            result.events.push(XonixEvent::GameOver { score: self.score });
        } else {
            self.handle_death_recovery();
        }
        result.broadcast = Some(self.encode_state());
    }

    fn snapshot(&self) -> proto::XonixSnapshot {
        let (cols, rows) = self.grid.dimensions();
        let phase = match self.phase {
            Phase::Playing if self.in_cooldown() => proto::Phase::Cooldown,
            Phase::Playing => proto::Phase::Playing,
            Phase::Paused => proto::Phase::Paused,
            Phase::LevelComplete => proto::Phase::LevelComplete,
            Phase::GameOver => proto::Phase::GameOver,
        };

        let effects = self.power_ups.effects();
        let now_ms = self.clock_ms();
        let remaining = |end: Option<u64>| end.map(|end| end.saturating_sub(now_ms));
        let effects = [
            (proto::PowerUpKind::Speed, remaining(effects.speed)),
            (proto::PowerUpKind::Freeze, remaining(effects.freeze)),
            (proto::PowerUpKind::Shield, remaining(effects.shield)),
            (proto::PowerUpKind::SlowMo, remaining(effects.slow_mo)),
        ]
        .into_iter()
        .filter_map(|(kind, remaining)| {
            remaining.map(|remaining_ms| proto::EffectSnapshot {
                kind: kind as i32,
                remaining_ms,
            })
        })
        .collect();

        proto::XonixSnapshot {
            tick: self.tick,
            level: self.level,
            score: self.score,
            lives: self.lives,
            fill_fraction: self.grid.fill_fraction(),
            fill_required: self.config.level(self.level).fill_required,
            phase: phase as i32,
            cols,
            rows,
            cells: self.grid.cells().iter().map(|cell| *cell as u8).collect(),
            player: Some(proto::PlayerSnapshot {
                x: self.player.position.x,
                y: self.player.position.y,
                direction: direction_to_proto(self.player.direction),
                drawing: self.player.is_drawing(),
                trail_length: self.player.trail().len() as u32,
                shielded: self.player.shielded,
                speed_boost: self.player.speed_boost,
            }),
            enemies: self
                .enemies
                .iter()
                .map(|enemy| proto::EnemySnapshot {
                    kind: match enemy.kind {
                        EnemyKind::Roaming => proto::EnemyKind::Roaming,
                        EnemyKind::Patrolling => proto::EnemyKind::Patrolling,
                    } as i32,
                    x: enemy.position.x,
                    y: enemy.position.y,
                    frozen: enemy.frozen,
                    slowed: enemy.slowed,
                })
                .collect(),
            power_ups: self
                .power_ups
                .power_ups()
                .iter()
                .map(|power_up| proto::PowerUpSnapshot {
                    kind: power_up_to_proto(power_up.kind) as i32,
                    x: power_up.position.x,
                    y: power_up.position.y,
                })
                .collect(),
            effects,
        }
    }
}

fn power_up_to_proto(kind: PowerUpKind) -> proto::PowerUpKind {
    match kind {
        PowerUpKind::Speed => proto::PowerUpKind::Speed,
        PowerUpKind::Freeze => proto::PowerUpKind::Freeze,
        PowerUpKind::Shield => proto::PowerUpKind::Shield,
        PowerUpKind::SlowMo => proto::PowerUpKind::SlowMo,
        PowerUpKind::Life => proto::PowerUpKind::Life,
    }
}

impl Game for XonixGame {
    type Event = XonixEvent;

    fn tick(&mut self) -> TickResult<XonixEvent> {
        self.tick += 1;
        let mut result = TickResult::default();
        if self.phase != Phase::Playing {
            return result;
        }

        self.clock_ns += self.config.tick_duration().as_nanos() as u64;
        if self.in_cooldown() {
            return result;
        }
        tracing::trace!("Tick {}", self.tick);

        let scale = self.config.time_scale();

        // Step 1: timed effects, so a shield protects on the tick it is collected
        let now_ms = self.clock_ms();
        let collected = self.power_ups.update(
            &self.grid,
            &mut self.player,
            &mut self.enemies,
            now_ms,
            &self.config,
            &mut self.rng,
        );
        for kind in collected {
            if kind == PowerUpKind::Life {
                self.lives += 1;
                tracing::info!("Extra life, {} lives", self.lives);
            }
            result.events.push(XonixEvent::PowerUpCollected(kind));
        }

        // Step 2: player movement and capture
        match self.player.advance(&mut self.grid, scale) {
            MoveOutcome::Death(cause) => {
                self.on_death(cause, &mut result);
                return result;
            }
            MoveOutcome::Capture(trail) => self.on_capture(&trail, &mut result),
            MoveOutcome::Idle | MoveOutcome::Moving => {}
        }

        // Step 3: enemies, and roaming enemies cutting the trail
        let mut trail_cut = false;
        for enemy in &mut self.enemies {
            enemy.update(&self.grid, scale);
            if check_trail_collision(&self.player, enemy, &self.grid) {
                trail_cut = true;
                break;
            }
        }
        if trail_cut {
            self.on_death(DeathCause::TrailCut, &mut result);
            return result;
        }

        // Step 4: contact
        if check_enemy_collision(&self.player, &self.enemies, self.config.collision_slack) {
            self.on_death(DeathCause::EnemyContact, &mut result);
            return result;
        }

        // Step 5: level completion
        let fill = self.grid.fill_fraction();
        if fill >= self.config.level(self.level).fill_required {
            self.score += self.config.level_bonus;
            self.phase = Phase::LevelComplete;
            tracing::info!(
                "Level {} complete at {:.1}% fill, score {}",
                self.level,
                fill * 100.0,
                self.score
            );
            result.events.push(XonixEvent::LevelComplete {
                level: self.level,
                fill,
            });
            result.broadcast = Some(self.encode_state());
        }

        result
    }

    fn handle_input(&mut self, input: &[u8]) -> Result<(), GameError> {
        if self.phase == Phase::GameOver {
            return Err(GameError::InvalidState("game is over".to_string()));
        }

        let xonix_input = proto::XonixInput::decode(input)
            .map_err(|e| GameError::InvalidInput(format!("Failed to decode input: {}", e)))?;
        proto::Direction::try_from(xonix_input.direction).map_err(|_| {
            GameError::InvalidInput(format!("Unknown direction {}", xonix_input.direction))
        })?;

        if xonix_input.toggle_pause {
            self.toggle_pause()?;
        }

        let direction = direction_from_proto(xonix_input.direction);
        if !self.set_direction(direction) {
            tracing::debug!("Ignored reversal to {:?} while drawing", direction);
        }
        Ok(())
    }

    fn encode_state(&self) -> Vec<u8> {
        self.snapshot().encode_to_vec()
    }

    fn tick_rate(&self) -> Duration {
        self.config.tick_duration()
    }

    fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 20x20 cells, 1-cell border, one cell per tick, no random power-ups.
    fn small_config(roaming: u32, patrolling: u32) -> XonixConfig {
        let mut config = XonixConfig::with_grid_size(20, 20);
        config.border_size = 1;
        config.player_speed = 10.0;
        config.powerup_spawn_chance = 0.0;
        config.levels = vec![LevelConfig::new(0.9, roaming, patrolling)];
        config
    }

    fn game_with(config: XonixConfig) -> XonixGame {
        XonixGame::with_config(config, 7).unwrap()
    }

    fn input(direction: proto::Direction) -> Vec<u8> {
        proto::XonixInput {
            direction: direction as i32,
            toggle_pause: false,
        }
        .encode_to_vec()
    }

    fn run(game: &mut XonixGame, ticks: usize) -> Vec<XonixEvent> {
        (0..ticks).flat_map(|_| game.tick().events).collect()
    }

    #[test]
    fn test_game_creation() {
        let game = XonixGame::new(1).unwrap();
        assert_eq!(game.current_tick(), 0);
        assert_eq!(game.level(), 1);
        assert_eq!(game.lives(), 3);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.enemies().len(), 2);
        assert_eq!(game.grid().claimed_count(), 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = XonixConfig::with_grid_size(4, 4);
        config.border_size = 2;
        let Err(GameError::Setup(source)) = XonixGame::with_config(config, 0) else {
            panic!("undersized grid accepted");
        };
        assert!(matches!(
            source.downcast_ref::<ConfigError>(),
            Some(ConfigError::GridTooSmall { .. })
        ));
    }

    #[test]
    fn test_tick_increments() {
        let mut game = XonixGame::new(1).unwrap();
        game.tick();
        game.tick();
        assert_eq!(game.current_tick(), 2);
    }

    #[test]
    fn test_tick_rate() {
        let game = XonixGame::new(1).unwrap();
        assert_eq!(game.tick_rate(), Duration::from_nanos(16_666_666));
    }

    #[test]
    fn test_clock_keeps_pace_with_tick_rate() {
        let mut game = game_with(small_config(0, 0));
        run(&mut game, 600);
        // Ten simulated seconds, within rounding of the per-tick duration.
        assert_eq!(game.clock_ms(), 9_999);
    }

    #[test]
    fn test_same_seed_same_roster() {
        let a = XonixGame::new(99).unwrap();
        let b = XonixGame::new(99).unwrap();
        let positions = |g: &XonixGame| g.enemies().iter().map(|e| e.position).collect::<Vec<_>>();
        assert_eq!(positions(&a), positions(&b));
    }

    #[test]
    fn test_handle_input_rejects_garbage() {
        let mut game = XonixGame::new(1).unwrap();
        assert!(matches!(
            game.handle_input(&[0xff, 0xff, 0xff]),
            Err(GameError::InvalidInput(_))
        ));
        let unknown = proto::XonixInput {
            direction: 9,
            toggle_pause: false,
        }
        .encode_to_vec();
        assert!(matches!(game.handle_input(&unknown), Err(GameError::InvalidInput(_))));
    }

    #[test]
    fn test_handle_input_sets_direction() {
        let mut game = XonixGame::new(1).unwrap();
        game.handle_input(&input(proto::Direction::Down)).unwrap();
        assert_eq!(game.player().direction, Direction::Down);
        game.handle_input(&input(proto::Direction::None)).unwrap();
        assert_eq!(game.player().direction, Direction::None);
    }

    #[test]
    fn test_capture_without_roaming_enemies_fills_field() {
        let mut game = game_with(small_config(0, 0));
        // Spawn is (100, 5) in cell (10, 0); one step down leaves the border.
        game.set_direction(Direction::Down);
        let events = run(&mut game, 19);

        let captured = events.iter().find_map(|e| match e {
            XonixEvent::Captured { cells, trail, score } => Some((*cells, *trail, *score)),
            _ => None,
        });
        // 18 trail cells down column 10, everything else claimed.
        assert_eq!(captured, Some((324 - 18, 18, 9444)));
        assert_eq!(game.grid().fill_fraction(), 1.0);
        assert!(events.iter().any(|e| matches!(e, XonixEvent::LevelComplete { level: 1, .. })));
        assert_eq!(game.phase(), Phase::LevelComplete);
        assert_eq!(game.score(), 9444 + 1000);
        assert!(!game.player().is_drawing());
    }

    #[test]
    fn test_level_complete_waits_for_next_level() {
        let mut game = game_with(small_config(0, 0));
        assert!(matches!(game.next_level(), Err(GameError::InvalidState(_))));

        game.set_direction(Direction::Down);
        run(&mut game, 19);
        assert_eq!(game.phase(), Phase::LevelComplete);
        let tick_events = game.tick().events;
        assert!(tick_events.is_empty());

        game.next_level().unwrap();
        assert_eq!(game.level(), 2);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.grid().claimed_count(), 0);
        assert!(game.score() > 0);
    }

    #[test]
    fn test_self_intersection_costs_a_life() {
        let mut game = game_with(small_config(0, 0));
        game.set_direction(Direction::Down);
        run(&mut game, 3);
        game.set_direction(Direction::Right);
        run(&mut game, 1);
        game.set_direction(Direction::Up);
        run(&mut game, 1);
        game.set_direction(Direction::Left);
        let events = run(&mut game, 1);

        assert_eq!(
            events,
            vec![XonixEvent::Death {
                cause: DeathCause::SelfIntersection,
                lives_left: 2
            }]
        );
        assert_eq!(game.grid().count(Cell::Trail), 0);
        assert_eq!(game.player().position, game.player().spawn_point());
        assert!(game.player().trail().is_empty());
        assert!(game.in_cooldown());
    }

    #[test]
    fn test_death_cooldown_pauses_simulation() {
        let mut game = game_with(small_config(0, 0));
        game.handle_death_recovery();
        game.set_direction(Direction::Down);
        let start = game.player().position;

        // 1000 ms is just over 60 ticks at 60 Hz.
        run(&mut game, 60);
        assert_eq!(game.player().position, start);
        assert!(game.in_cooldown());
        run(&mut game, 1);
        assert!(!game.in_cooldown());
        assert_ne!(game.player().position, start);
    }

    #[test]
    fn test_pause_freezes_simulation_and_clock() {
        let mut game = game_with(small_config(0, 0));
        game.set_direction(Direction::Down);
        run(&mut game, 2);
        let (position, clock) = (game.player().position, game.clock_ms());

        assert_eq!(game.toggle_pause().unwrap(), Phase::Paused);
        assert!(run(&mut game, 30).is_empty());
        assert_eq!(game.current_tick(), 32);
        assert_eq!(game.player().position, position);
        assert_eq!(game.clock_ms(), clock);
        let snapshot = proto::XonixSnapshot::decode(game.encode_state().as_slice()).unwrap();
        assert_eq!(snapshot.phase, proto::Phase::Paused as i32);

        let resume = proto::XonixInput {
            direction: proto::Direction::Down as i32,
            toggle_pause: true,
        }
        .encode_to_vec();
        game.handle_input(&resume).unwrap();
        assert_eq!(game.phase(), Phase::Playing);
        run(&mut game, 1);
        assert_ne!(game.player().position, position);
        assert!(game.clock_ms() > clock);
    }

    #[test]
    fn test_pause_only_applies_while_playing() {
        let mut game = game_with(small_config(0, 0));
        game.set_direction(Direction::Down);
        run(&mut game, 19);
        assert_eq!(game.phase(), Phase::LevelComplete);
        assert!(matches!(game.toggle_pause(), Err(GameError::InvalidState(_))));
        assert_eq!(game.phase(), Phase::LevelComplete);
    }

    #[test]
    fn test_steered_loop_captures_the_side_without_an_enemy() {
        let mut config = XonixConfig::with_grid_size(10, 10);
        config.border_size = 1;
        config.player_speed = 10.0;
        config.powerup_spawn_chance = 0.0;
        config.levels = vec![LevelConfig::new(0.95, 1, 0)];
        let mut game = game_with(config);

        // Frozen roamer in the upper pocket; the two bottom rows already belong to the player.
        game.enemies[0].position = game.grid.cell_to_pixel_center(GridPos::new(2, 2));
        game.enemies[0].frozen = true;
        for y in 7..9 {
            for x in 1..9 {
                game.grid.set(GridPos::new(x, y), Cell::Claimed);
            }
        }

        // Spawn (50, 5): along the top border to the corner, down the left
        // border to row 4, then across the field to the right border.
        let mut events = Vec::new();
        for (direction, ticks) in [
            (proto::Direction::Left, 5),
            (proto::Direction::Down, 4),
            (proto::Direction::Right, 9),
        ] {
            game.handle_input(&input(direction)).unwrap();
            events.extend(run(&mut game, ticks));
        }

        let captures: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                XonixEvent::Captured { cells, trail, .. } => Some((*cells, *trail)),
                _ => None,
            })
            .collect();
        assert_eq!(captures, vec![(16, 8)]);
        assert_eq!(game.player().cell(game.grid()), GridPos::new(9, 4));
        assert!(!game.player().is_drawing());

        assert_eq!(game.grid().count(Cell::Trail), 0);
        assert_eq!(game.grid().count(Cell::Empty), 24);
        for y in 1..4 {
            for x in 1..9 {
                assert_eq!(game.grid().get(GridPos::new(x, y)), Some(Cell::Empty));
            }
        }
        assert_eq!(game.grid().claimed_count(), 40);
        assert_eq!(game.grid().count(Cell::Claimed), 40);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.lives(), 3);
    }

    #[test]
    fn test_patroller_contact_on_border_kills() {
        let mut game = game_with(small_config(0, 1));
        let spawn = game.player().spawn_point();
        game.enemies[0].position = spawn;
        game.enemies[0].velocity = Vec2::new(1.0, 0.0);
        let events = run(&mut game, 1);
        assert!(events.contains(&XonixEvent::Death {
            cause: DeathCause::EnemyContact,
            lives_left: 2
        }));
    }

    #[test]
    fn test_roaming_enemy_cuts_trail() {
        let mut game = game_with(small_config(1, 0));
        game.enemies[0].position = Vec2::new(150.0, 150.0);
        game.enemies[0].frozen = true;
        game.set_direction(Direction::Down);
        run(&mut game, 4);
        assert!(game.player().is_drawing());

        // Park the frozen roamer on the first trail cell.
        let cell = game.player().trail()[0];
        game.enemies[0].position = game.grid().cell_to_pixel_center(cell);

        let events = run(&mut game, 1);
        assert!(events.contains(&XonixEvent::Death {
            cause: DeathCause::TrailCut,
            lives_left: 2
        }));
        assert_eq!(game.grid().count(Cell::Trail), 0);
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut config = small_config(0, 1);
        config.initial_lives = 1;
        let mut game = game_with(config);
        game.enemies[0].position = game.player().spawn_point();

        let events = run(&mut game, 1);
        assert!(events.iter().any(|e| matches!(e, XonixEvent::GameOver { .. })));
        assert!(game.is_game_over());
        assert!(run(&mut game, 5).is_empty());
        assert!(matches!(
            game.handle_input(&input(proto::Direction::Down)),
            Err(GameError::InvalidState(_))
        ));
    }

    #[test]
    fn test_snapshot_round_trips_field() {
        let mut game = game_with(small_config(1, 1));
        game.set_direction(Direction::Down);
        run(&mut game, 3);

        let snapshot = proto::XonixSnapshot::decode(game.encode_state().as_slice()).unwrap();
        assert_eq!(snapshot.tick, 3);
        assert_eq!((snapshot.cols, snapshot.rows), (20, 20));
        assert_eq!(snapshot.cells.len(), 400);
        assert_eq!(
            snapshot.cells.iter().filter(|&&c| c == Cell::Trail as u8).count(),
            game.player().trail().len()
        );
        assert_eq!(snapshot.enemies.len(), 2);
        let player = snapshot.player.unwrap();
        assert!(player.drawing);
        assert_eq!(player.direction, proto::Direction::Down as i32);
        assert_eq!(snapshot.phase, proto::Phase::Playing as i32);
    }

    #[test]
    fn test_grid_changes_are_broadcast() {
        let mut game = game_with(small_config(0, 0));
        assert!(game.tick().broadcast.is_none());
        game.set_direction(Direction::Down);
        let broadcasts = (0..19).filter(|_| game.tick().broadcast.is_some()).count();
        // Capture and level completion land on the same tick; the second replaces the first.
        assert_eq!(broadcasts, 1);
    }
}
