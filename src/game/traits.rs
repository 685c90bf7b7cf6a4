use std::time::Duration;

use thiserror::Error;

pub trait TickRate {
    fn tick_duration(&self) -> Duration;

    fn ticks_per_second(&self) -> u32 {
        (1.0 / self.tick_duration().as_secs_f64()) as u32
    }
}

#[derive(Debug, Error)]
pub enum GameError {
    /// Invalid input received
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Game is not in a valid state for the operation
    #[error("Invalid state: {0}")]
    InvalidState(String),
    /// The game could not be built from its configuration
    #[error("Setup failed: {0}")]
    Setup(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub struct TickResult<E> {
    /// Encoded state for downstream readers, set when the field changed
    pub broadcast: Option<Vec<u8>>,
    pub events: Vec<E>,
}

impl<E> Default for TickResult<E> {
    fn default() -> Self {
        Self {
            broadcast: None,
            events: Vec::new(),
        }
    }
}

pub trait Game: Send + Sync {
    type Event;

    fn tick(&mut self) -> TickResult<Self::Event>;
    fn handle_input(&mut self, input: &[u8]) -> Result<(), GameError>;
    fn encode_state(&self) -> Vec<u8>;
    fn tick_rate(&self) -> Duration;
    fn is_game_over(&self) -> bool {
        false
    }
}
