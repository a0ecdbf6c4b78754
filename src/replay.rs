//! Game replay and viewing system.
//!
//! Because Zone Wreck games are 100% deterministic, replay requires only:
//! - `config: GameConfig` - The rules the game was played under
//! - `decisions: Vec<Decision>` - Every accepted decision, in order
//!
//! No state deltas needed. To view turn N, re-run the session from the first
//! decision up to the start of turn N. Recordings live in memory only.
//!
//! # Time Travel
//!
//! - **Forward**: Submit the next recorded decision
//! - **Backward**: Re-run from the start to the previous decision
//! - **Jump to turn N**: Re-run from the start until turn N begins

mod render;

pub use render::render_ascii;

use thiserror::Error;

use crate::config::{ConfigError, GameConfig};
use crate::error::Rejection;
use crate::runner::GameResult;
use crate::session::{Decision, Event, Session};

/// Minimal recording - just config and decisions.
///
/// Because the game is deterministic, this is all we need to replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    /// Game configuration.
    pub config: GameConfig,
    /// Accepted decisions in submission order.
    pub decisions: Vec<Decision>,
}

impl Recording {
    /// Create a new recording.
    #[must_use]
    pub fn new(config: GameConfig, decisions: Vec<Decision>) -> Self {
        Self { config, decisions }
    }

    /// Create from a finished game (convenience).
    #[must_use]
    pub fn from_result(config: GameConfig, result: &GameResult) -> Self {
        Self::new(config, result.decisions.clone())
    }
}

/// Error type for replay operations.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The recorded config is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A recorded decision was refused, so the recording does not match
    /// these rules.
    #[error("recorded decision {index} was rejected: {rejection}")]
    Rejected {
        /// Position of the decision in the recording.
        index: usize,
        /// Why the session refused it.
        rejection: Rejection,
    },
    /// Turn number out of bounds.
    #[error("turn {requested} out of bounds (last: {last_turn})")]
    TurnOutOfBounds {
        /// Requested turn.
        requested: u32,
        /// Last turn the recording reaches.
        last_turn: u32,
    },
    /// Already before the first decision.
    #[error("start of recording")]
    StartOfRecording,
    /// No decisions left to apply.
    #[error("end of recording")]
    EndOfRecording,
}

/// Replay engine - steps through a recorded game deterministically.
#[derive(Debug, Clone)]
pub struct ReplayEngine {
    /// The recording being replayed.
    recording: Recording,
    /// Session before the first decision.
    initial: Session,
    /// Session after `position` decisions.
    session: Session,
    /// Number of recorded decisions applied.
    position: usize,
}

impl ReplayEngine {
    /// Create a new replay engine from a recording, before the first decision.
    ///
    /// # Errors
    ///
    /// Returns an error if the recorded config is invalid.
    pub fn new(recording: Recording) -> Result<Self, ReplayError> {
        let initial = Session::new(recording.config)?;
        Ok(Self {
            recording,
            session: initial.clone(),
            initial,
            position: 0,
        })
    }

    /// Create a new replay engine at the start of a specific turn.
    ///
    /// # Errors
    ///
    /// Returns an error if the recording never reaches `turn` or a decision
    /// is rejected on the way.
    pub fn new_at_turn(recording: Recording, turn: u32) -> Result<Self, ReplayError> {
        let mut engine = Self::new(recording)?;
        engine.seek_turn(turn)?;
        Ok(engine)
    }

    /// Get the recording.
    #[must_use]
    pub const fn recording(&self) -> &Recording {
        &self.recording
    }

    /// Current session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Current turn number.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.session.turn()
    }

    /// Number of recorded decisions applied so far.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Check if every recorded decision has been applied.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.position >= self.recording.decisions.len()
    }

    /// Apply the next recorded decision.
    ///
    /// # Errors
    ///
    /// Returns an error at the end of the recording, or if the decision is
    /// rejected.
    pub fn step_forward(&mut self) -> Result<Vec<Event>, ReplayError> {
        let decision = *self
            .recording
            .decisions
            .get(self.position)
            .ok_or(ReplayError::EndOfRecording)?;

        let events = self
            .session
            .submit(decision)
            .map_err(|rejection| ReplayError::Rejected {
                index: self.position,
                rejection,
            })?;
        self.position += 1;
        Ok(events)
    }

    /// Step back one decision.
    ///
    /// This replays from the start to (`position` - 1).
    ///
    /// # Errors
    ///
    /// Returns an error if already at the start.
    pub fn step_backward(&mut self) -> Result<(), ReplayError> {
        let target = self
            .position
            .checked_sub(1)
            .ok_or(ReplayError::StartOfRecording)?;
        self.rewind();
        while self.position < target {
            self.step_forward()?;
        }
        Ok(())
    }

    /// Jump to the start of `turn`.
    ///
    /// This replays from the start until the session reaches the turn. If the
    /// recording ends or the game finishes before then, the engine stays at
    /// its last position and an error is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the turn is never reached or a decision is rejected.
    pub fn seek_turn(&mut self, turn: u32) -> Result<(), ReplayError> {
        self.rewind();
        while self.session.turn() < turn {
            if self.is_finished() || self.session.is_over() {
                return Err(ReplayError::TurnOutOfBounds {
                    requested: turn,
                    last_turn: self.session.turn(),
                });
            }
            self.step_forward()?;
        }
        Ok(())
    }

    /// Apply every remaining decision, returning the events they caused.
    ///
    /// # Errors
    ///
    /// Returns an error if a decision is rejected.
    pub fn run_to_end(&mut self) -> Result<Vec<Event>, ReplayError> {
        let mut events = Vec::new();
        while !self.is_finished() {
            events.extend(self.step_forward()?);
        }
        Ok(events)
    }

    /// Render current state to ASCII for terminal viewing.
    #[must_use]
    pub fn render_ascii(&self) -> String {
        render_ascii(self.session.game(), self.session.turn())
    }

    fn rewind(&mut self) {
        self.session.clone_from(&self.initial);
        self.position = 0;
    }
}
