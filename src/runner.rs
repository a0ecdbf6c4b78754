//! Game runner for Zone Wreck.
//!
//! Provides a pure function interface: `(config, decisions) -> GameResult`
//!
//! The runner drives a [`Session`] to completion:
//! - Asks a [`DecisionSource`] for each pending request
//! - Counts rejected decisions and asks again
//! - Records every accepted decision for replay
//! - Stops when a reserve runs out or the decision cap is hit

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ConfigError, GameConfig};
use crate::game::Color;
use crate::session::{Decision, Request, Session};

/// Default cap on decisions per game.
pub const DEFAULT_MAX_DECISIONS: usize = 100_000;

/// Something that answers the session's requests.
pub trait DecisionSource {
    /// Next decision for `request`, or `None` if the source has nothing left.
    fn decide(&mut self, request: &Request) -> Option<Decision>;
}

/// Replays a fixed list of decisions in order, ignoring the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScriptedSource {
    decisions: Vec<Decision>,
    #[serde(skip)]
    next: usize,
}

impl ScriptedSource {
    /// Create a source from decisions.
    #[must_use]
    pub fn new(decisions: Vec<Decision>) -> Self {
        Self { decisions, next: 0 }
    }

    /// Parse a JSON array of decisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not a list of decisions.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Decisions not yet handed out.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.decisions.len() - self.next
    }
}

impl DecisionSource for ScriptedSource {
    fn decide(&mut self, _request: &Request) -> Option<Decision> {
        let decision = self.decisions.get(self.next).copied()?;
        self.next += 1;
        Some(decision)
    }
}

impl<F> DecisionSource for F
where
    F: FnMut(&Request) -> Option<Decision>,
{
    fn decide(&mut self, request: &Request) -> Option<Decision> {
        self(request)
    }
}

/// Final result of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResult {
    /// The winning color.
    pub winner: Color,
    /// Turns started, including the one the game ended in.
    pub turns_played: u32,
    /// Final reserves, White then Black.
    pub reserves: [i64; 2],
    /// Live pieces, White then Black.
    pub pieces: [usize; 2],
    /// Number of decisions the session rejected.
    pub rejections: usize,
    /// Accepted decisions in order.
    pub decisions: Vec<Decision>,
}

/// Error type for runner operations.
#[derive(Debug, Error)]
pub enum RunError {
    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The source ran out of decisions before the game ended.
    #[error("decision source exhausted after {decisions} decisions on turn {turn}")]
    SourceExhausted {
        /// Decisions submitted so far.
        decisions: usize,
        /// Turn in progress.
        turn: u32,
    },
    /// The game did not finish within the decision cap.
    #[error("game still running after {0} decisions")]
    DecisionLimit(usize),
}

/// Run a complete game.
///
/// Rejected decisions are counted and the same request is asked again, so a
/// source that keeps answering illegally eventually hits `max_decisions`.
///
/// # Determinism
///
/// Given the same config and the same decisions, this function always
/// produces the same `GameResult`.
///
/// # Errors
///
/// Returns an error if the config is invalid, the source runs dry, or the
/// game is still running after `max_decisions` submissions.
pub fn run_game<S: DecisionSource + ?Sized>(
    config: GameConfig,
    source: &mut S,
    max_decisions: usize,
) -> Result<GameResult, RunError> {
    let mut session = Session::new(config)?;
    let mut decisions = Vec::new();
    let mut rejections = 0;
    let mut submitted = 0;

    while !session.is_over() {
        if submitted >= max_decisions {
            return Err(RunError::DecisionLimit(submitted));
        }

        let request = session.pending();
        let decision = source
            .decide(&request)
            .ok_or(RunError::SourceExhausted {
                decisions: submitted,
                turn: session.turn(),
            })?;
        submitted += 1;

        match session.submit(decision) {
            Ok(_) => decisions.push(decision),
            Err(_) => rejections += 1,
        }
    }

    let Some(winner) = session.winner() else {
        return Err(RunError::DecisionLimit(submitted));
    };
    let game = session.game();
    let result = GameResult {
        winner,
        turns_played: session.turn() + 1,
        reserves: Color::ALL.map(|c| game.player(c).reserve),
        pieces: Color::ALL.map(|c| game.player(c).piece_count()),
        rejections,
        decisions,
    };

    tracing::info!(
        %winner,
        turns = result.turns_played,
        rejections,
        "game finished"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Coord, StatLine};

    fn small_config(reserve: i64) -> GameConfig {
        GameConfig {
            board_size: 3,
            starting_reserve: reserve,
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_scripted_game_to_completion() {
        let mut source = ScriptedSource::new(vec![
            Decision::place(StatLine::new(3, 4, 4, 2, 0), 0),
        ]);
        let result = run_game(small_config(10), &mut source, 10).unwrap();

        assert_eq!(result.winner, Color::Black);
        assert_eq!(result.turns_played, 1);
        assert_eq!(result.reserves, [0, 10]);
        assert_eq!(result.pieces, [1, 0]);
        assert_eq!(result.rejections, 0);
        assert_eq!(result.decisions.len(), 1);
    }

    #[test]
    fn test_rejections_counted_not_recorded() {
        let mut source = ScriptedSource::new(vec![
            Decision::move_piece(Coord::new(2, 0), Coord::new(1, 0)),
            Decision::place(StatLine::new(1, 9, 9, 9, 9), 0),
            Decision::place(StatLine::new(3, 4, 4, 2, 0), 0),
        ]);
        let result = run_game(small_config(10), &mut source, 10).unwrap();

        assert_eq!(result.rejections, 2);
        assert_eq!(result.decisions.len(), 1);
    }

    #[test]
    fn test_source_exhausted() {
        let mut source = ScriptedSource::new(vec![Decision::Skip]);
        let err = run_game(GameConfig::default(), &mut source, 10).unwrap_err();
        assert!(matches!(
            err,
            RunError::SourceExhausted {
                decisions: 1,
                turn: 0
            }
        ));
    }

    #[test]
    fn test_decision_limit() {
        let mut always_skip = |_: &Request| Some(Decision::Skip);
        let err = run_game(GameConfig::default(), &mut always_skip, 50).unwrap_err();
        assert!(matches!(err, RunError::DecisionLimit(50)));
    }

    #[test]
    fn test_invalid_config() {
        let config = GameConfig {
            starting_reserve: 0,
            ..GameConfig::default()
        };
        let err = run_game(config, &mut ScriptedSource::default(), 10).unwrap_err();
        assert!(matches!(err, RunError::Config(ConfigError::StartingReserve(0))));
    }

    #[test]
    fn test_closure_source_sees_requests() {
        // Place one cheap piece per turn on the first open column, never move
        let mut source = |request: &Request| match request {
            Request::Placement { columns, .. } => Some(
                columns
                    .first()
                    .map_or(Decision::Skip, |&col| {
                        Decision::place(StatLine::new(5, 5, 5, 5, 5), col)
                    }),
            ),
            Request::Move { .. } | Request::Finished { .. } => Some(Decision::Skip),
        };
        let config = GameConfig {
            max_placements_per_turn: Some(1),
            ..GameConfig::default()
        };
        let result = run_game(config, &mut source, 1000).unwrap();

        // 20 points per piece: White empties its reserve on its seventh placement
        assert_eq!(result.winner, Color::Black);
        assert_eq!(result.reserves[0], 0);
        assert_eq!(result.pieces, [7, 6]);
        assert_eq!(result.turns_played, 13);
    }

    #[test]
    fn test_scripted_source_json() {
        let source = ScriptedSource::from_json(r#"[{"kind": "skip"}, {"kind": "skip"}]"#).unwrap();
        assert_eq!(source.remaining(), 2);
    }
}
