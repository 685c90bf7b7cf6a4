use xonix_server::games::xonix::{Direction, GridPos, XonixGame};

/// Steers on an unchanged cell before the pilot gives up on its leg.
const STALL_TICKS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leg {
    Descend,
    Cross,
    Ascend,
    /// Back up to the top border after reaching the bottom on safe ground
    Climb,
    /// Slide along safe ground for the remaining ticks
    Shift(u32),
}

/// Scripted input source that carves rectangular strips off the claimed edge.
///
/// Each strip goes down `depth` cells past the last safe cell, sideways
/// `width` cells, and back up until the player is safe again. Between strips
/// it slides sideways and turns around near the side walls. A column that is
/// claimed all the way down sends it back to the top border.
#[derive(Debug)]
pub struct Autopilot {
    depth: i32,
    width: i32,
    shift_ticks: u32,
    heading: Direction,
    leg: Leg,
    origin: Option<GridPos>,
    last_cell: Option<GridPos>,
    stalled: u32,
    restarts: u32,
}

impl Autopilot {
    pub fn new(depth: u32, width: u32) -> Self {
        Self {
            depth: depth.max(1) as i32,
            width: width.max(1) as i32,
            shift_ticks: 3,
            heading: Direction::Right,
            leg: Leg::Descend,
            origin: None,
            last_cell: None,
            stalled: 0,
            restarts: 0,
        }
    }

    /// Back to the first leg, e.g. after a death or a new level.
    pub fn restart(&mut self) {
        // Slide a different distance before each first strip so a deadly
        // column under the spawn is not replayed forever.
        self.restarts += 1;
        self.leg = Leg::Shift(self.shift_ticks * (self.restarts % 4));
        self.origin = None;
        self.last_cell = None;
        self.stalled = 0;
    }

    /// Direction to feed the game before the next tick.
    pub fn steer(&mut self, game: &XonixGame) -> Direction {
        let grid = game.grid();
        let player = game.player();
        let cell = player.cell(grid);
        let drawing = player.is_drawing();
        let safe = !drawing && grid.is_safe(cell);
        let (_, rows) = grid.dimensions();
        let border = grid.border_size() as i32;

        if self.last_cell == Some(cell) {
            self.stalled += 1;
        } else {
            self.last_cell = Some(cell);
            self.stalled = 0;
        }
        if self.stalled >= STALL_TICKS {
            tracing::debug!("Autopilot stalled at {:?} in {:?}", cell, self.leg);
            self.stalled = 0;
            self.heading = flip(self.heading);
            self.leg = Leg::Shift(self.shift_ticks);
            return self.heading;
        }

        match self.leg {
            Leg::Descend => {
                // Depth counts from the last safe cell on the way down.
                if safe {
                    self.origin = Some(cell);
                }
                let origin = *self.origin.get_or_insert(cell);
                let at_bottom = cell.y >= rows as i32 - border - 1;
                if at_bottom && safe {
                    self.leg = Leg::Climb;
                    return Direction::Up;
                }
                if cell.y - origin.y >= self.depth || at_bottom {
                    self.turn_if_near_wall(game, cell);
                    self.leg = Leg::Cross;
                    return self.heading;
                }
                Direction::Down
            }
            Leg::Cross => {
                let origin = *self.origin.get_or_insert(cell);
                if safe {
                    self.leg = Leg::Shift(self.shift_ticks);
                    return self.heading;
                }
                if (cell.x - origin.x).abs() >= self.width {
                    self.leg = Leg::Ascend;
                    return Direction::Up;
                }
                self.heading
            }
            Leg::Ascend => {
                if safe {
                    self.leg = Leg::Shift(self.shift_ticks);
                    return self.heading;
                }
                Direction::Up
            }
            Leg::Climb => {
                if safe && cell.y < border.max(1) {
                    self.leg = Leg::Shift(self.shift_ticks);
                    return self.heading;
                }
                Direction::Up
            }
            // Sliding off safe ground: close the loop straight up.
            Leg::Shift(_) if drawing => {
                self.leg = Leg::Ascend;
                Direction::Up
            }
            Leg::Shift(0) => {
                self.origin = Some(cell);
                self.leg = Leg::Descend;
                Direction::Down
            }
            Leg::Shift(remaining) => {
                self.turn_if_near_wall(game, cell);
                self.leg = Leg::Shift(remaining - 1);
                self.heading
            }
        }
    }

    fn turn_if_near_wall(&mut self, game: &XonixGame, cell: GridPos) {
        let (cols, _) = game.grid().dimensions();
        let border = game.grid().border_size() as i32;
        let right_limit = cols as i32 - border - 1 - self.width;
        let left_limit = border + self.width;
        if self.heading == Direction::Right && cell.x >= right_limit {
            self.heading = Direction::Left;
        } else if self.heading == Direction::Left && cell.x <= left_limit {
            self.heading = Direction::Right;
        }
    }
}

fn flip(heading: Direction) -> Direction {
    match heading {
        Direction::Left => Direction::Right,
        _ => Direction::Left,
    }
}
