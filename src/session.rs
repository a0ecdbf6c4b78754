//! Turn and phase controller.
//!
//! A [`Session`] is a synchronous request/response state machine. The caller
//! asks what the engine is waiting for with [`Session::pending`], then
//! submits a [`Decision`]. Accepted decisions return the [`Event`]s they
//! caused; rejected ones return a [`Rejection`] and change nothing.
//!
//! Each turn runs placement (zero or more pieces, ended by a skip or the
//! configured cap), then exactly one move or a skip. The win check runs
//! after every accepted action, so the game ends the moment a reserve runs
//! out. Otherwise the turn passes to the other player.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, GameConfig};
use crate::error::{DecisionResult, Rejection};
use crate::game::{
    Color, Coord, Game, MoveResult, Placement, StatLine, allocate_with_budget,
    legal_destinations, open_zone_columns,
};

/// A player decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decision {
    /// Buy a piece and place it in the player's zone.
    Place {
        /// Power rating.
        power: i32,
        /// Attack points.
        attack: i32,
        /// Health points.
        health: i32,
        /// Speed points.
        speed: i32,
        /// Distance points.
        distance: i32,
        /// Column of the zone row to place on.
        column: u16,
    },
    /// Move a piece.
    Move {
        /// Cell of the piece to move.
        from: Coord,
        /// Destination cell.
        to: Coord,
    },
    /// End the placement phase, or pass on moving.
    Skip,
}

impl Decision {
    /// Build a placement decision from a stat line.
    #[must_use]
    pub const fn place(stats: StatLine, column: u16) -> Self {
        Decision::Place {
            power: stats.power,
            attack: stats.attack,
            health: stats.health,
            speed: stats.speed,
            distance: stats.distance,
            column,
        }
    }

    /// Build a move decision.
    #[must_use]
    pub const fn move_piece(from: Coord, to: Coord) -> Self {
        Decision::Move { from, to }
    }

    /// Short name used in rejections and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Decision::Place { .. } => "place",
            Decision::Move { .. } => "move",
            Decision::Skip => "skip",
        }
    }
}

/// Where the session is within a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// The current player may place pieces.
    Placement,
    /// The current player may move one piece.
    Movement,
    /// A reserve ran out.
    Finished {
        /// The opponent of the exhausted player.
        winner: Color,
    },
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Placement => write!(f, "placement"),
            Phase::Movement => write!(f, "movement"),
            Phase::Finished { winner } => write!(f, "game over ({winner} won)"),
        }
    }
}

/// Legal destinations for one piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveOption {
    /// Where the piece stands.
    pub from: Coord,
    /// Where it may go.
    pub to: Vec<Coord>,
}

/// What the session is waiting for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "request", rename_all = "snake_case")]
pub enum Request {
    /// A placement or a skip.
    Placement {
        /// Player to decide.
        player: Color,
        /// Their remaining reserve.
        reserve: i64,
        /// Free columns in their zone row.
        columns: Vec<u16>,
        /// Placements still allowed this turn, if capped.
        remaining: Option<u32>,
    },
    /// A move or a skip.
    Move {
        /// Player to decide.
        player: Color,
        /// Every legal move, grouped by piece.
        moves: Vec<MoveOption>,
    },
    /// Nothing more to decide.
    Finished {
        /// Winner of the game.
        winner: Color,
    },
}

/// Something that happened as the result of a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// A piece entered the board.
    Placed {
        /// Placing player.
        player: Color,
        /// Placement details.
        placement: Placement,
    },
    /// The placement phase ended.
    PlacementEnded {
        /// Player whose phase ended.
        player: Color,
    },
    /// A piece moved, possibly fighting or invading.
    Moved {
        /// Moving player.
        player: Color,
        /// Move details.
        result: MoveResult,
    },
    /// The player passed on moving.
    MoveSkipped {
        /// Passing player.
        player: Color,
    },
    /// The turn passed to the other player.
    TurnPassed {
        /// Player now to act.
        next: Color,
        /// Number of the new turn (0-indexed).
        turn: u32,
    },
    /// A reserve ran out.
    GameOver {
        /// Winner of the game.
        winner: Color,
    },
}

/// A running game driven by decisions.
#[derive(Debug, Clone)]
pub struct Session {
    /// Board, players and reserves.
    game: Game,
    /// Configuration the game was created with.
    config: GameConfig,
    /// Current phase.
    phase: Phase,
    /// Current turn number (0-indexed).
    turn: u32,
    /// Placements made in the current turn.
    placements: u32,
}

impl Session {
    /// Start a new game.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let game = Game::new(&config)?;
        Ok(Self {
            game,
            config,
            phase: Phase::Placement,
            turn: 0,
            placements: 0,
        })
    }

    /// The game state.
    #[must_use]
    pub const fn game(&self) -> &Game {
        &self.game
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// The current turn number (0-indexed).
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// The winner, once the game is over.
    #[must_use]
    pub const fn winner(&self) -> Option<Color> {
        match self.phase {
            Phase::Finished { winner } => Some(winner),
            Phase::Placement | Phase::Movement => None,
        }
    }

    /// Check if the game is over.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        matches!(self.phase, Phase::Finished { .. })
    }

    /// Describe the decision the session is waiting for, with its legal options.
    #[must_use]
    pub fn pending(&self) -> Request {
        let player = self.game.current_turn();
        match self.phase {
            Phase::Placement => Request::Placement {
                player,
                reserve: self.game.player(player).reserve,
                columns: open_zone_columns(self.game.board(), player),
                remaining: self
                    .config
                    .max_placements_per_turn
                    .map(|cap| cap.saturating_sub(self.placements)),
            },
            Phase::Movement => {
                let moves = self
                    .game
                    .player(player)
                    .pieces
                    .values()
                    .filter_map(|piece| {
                        let from = piece.position?;
                        let to = legal_destinations(self.game.board(), piece);
                        (!to.is_empty()).then_some(MoveOption { from, to })
                    })
                    .collect();
                Request::Move { player, moves }
            }
            Phase::Finished { winner } => Request::Finished { winner },
        }
    }

    /// Submit a decision for the current player.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] if the decision is not legal right now. The
    /// session is unchanged and the same request stays pending.
    pub fn submit(&mut self, decision: Decision) -> DecisionResult<Vec<Event>> {
        let result = match (self.phase, decision) {
            (Phase::Finished { .. }, _) => Err(Rejection::GameOver),
            (
                Phase::Placement,
                Decision::Place {
                    power,
                    attack,
                    health,
                    speed,
                    distance,
                    column,
                },
            ) => self.place(StatLine::new(power, attack, health, speed, distance), column),
            (Phase::Placement, Decision::Skip) => {
                self.phase = Phase::Movement;
                Ok(vec![Event::PlacementEnded {
                    player: self.game.current_turn(),
                }])
            }
            (Phase::Movement, Decision::Move { from, to }) => self.move_piece(from, to),
            (Phase::Movement, Decision::Skip) => {
                let mut events = vec![Event::MoveSkipped {
                    player: self.game.current_turn(),
                }];
                self.end_turn(&mut events);
                Ok(events)
            }
            (phase @ (Phase::Placement | Phase::Movement), decision) => Err(Rejection::WrongPhase {
                phase,
                decision: decision.name(),
            }),
        };

        if let Err(rejection) = &result {
            tracing::warn!(
                player = %self.game.current_turn(),
                decision = decision.name(),
                %rejection,
                "decision rejected"
            );
        }
        result
    }

    fn place(&mut self, stats: StatLine, column: u16) -> DecisionResult<Vec<Event>> {
        let player = self.game.current_turn();
        let piece = allocate_with_budget(stats, player, self.game.budget_per_power())?;
        let position = Coord::new(self.game.board().zone_row(player), column);
        let placement = self
            .game
            .add_piece_to_zone(player, piece, position)
            .map_err(Rejection::Placement)?;

        self.placements += 1;
        let mut events = vec![Event::Placed { player, placement }];

        if self.check_winner(&mut events) {
            return Ok(events);
        }

        if self
            .config
            .max_placements_per_turn
            .is_some_and(|cap| self.placements >= cap)
        {
            self.phase = Phase::Movement;
            events.push(Event::PlacementEnded { player });
        }
        Ok(events)
    }

    fn move_piece(&mut self, from: Coord, to: Coord) -> DecisionResult<Vec<Event>> {
        let player = self.game.current_turn();
        let result = self
            .game
            .move_piece(player, from, to)
            .map_err(Rejection::Move)?;

        let mut events = vec![Event::Moved { player, result }];
        self.end_turn(&mut events);
        Ok(events)
    }

    /// Run the win check; returns `true` if the game just ended.
    fn check_winner(&mut self, events: &mut Vec<Event>) -> bool {
        match self.game.check_winner() {
            Some(winner) => {
                self.phase = Phase::Finished { winner };
                events.push(Event::GameOver { winner });
                true
            }
            None => false,
        }
    }

    fn end_turn(&mut self, events: &mut Vec<Event>) {
        if self.check_winner(events) {
            return;
        }

        self.game.switch_turn();
        self.turn += 1;
        self.placements = 0;
        self.phase = Phase::Placement;

        let next = self.game.current_turn();
        tracing::debug!(%next, turn = self.turn, "turn passed");
        events.push(Event::TurnPassed {
            next,
            turn: self.turn,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CombatOutcome, Illegal, MoveKind, StatError};

    fn new_session() -> Session {
        Session::new(GameConfig::default()).unwrap()
    }

    fn small_session(reserve: i64) -> Session {
        Session::new(GameConfig {
            board_size: 3,
            starting_reserve: reserve,
            ..GameConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_initial_request() {
        let session = new_session();
        assert_eq!(
            session.pending(),
            Request::Placement {
                player: Color::White,
                reserve: 140,
                columns: (0..8).collect(),
                remaining: None,
            }
        );
    }

    #[test]
    fn test_full_turn_cycle() {
        let mut session = new_session();

        let events = session
            .submit(Decision::place(StatLine::new(3, 3, 3, 3, 3), 2))
            .unwrap();
        assert!(matches!(events[0], Event::Placed { player: Color::White, .. }));
        assert_eq!(session.phase(), Phase::Placement);

        session.submit(Decision::Skip).unwrap();
        assert_eq!(session.phase(), Phase::Movement);

        let events = session
            .submit(Decision::move_piece(Coord::new(7, 2), Coord::new(6, 2)))
            .unwrap();
        assert_eq!(
            events.last(),
            Some(&Event::TurnPassed {
                next: Color::Black,
                turn: 1
            })
        );
        assert_eq!(session.game().current_turn(), Color::Black);
        assert_eq!(session.phase(), Phase::Placement);
    }

    #[test]
    fn test_multiple_placements_per_turn() {
        let mut session = new_session();
        for col in 0..3 {
            session
                .submit(Decision::place(StatLine::new(1, 1, 1, 1, 1), col))
                .unwrap();
        }
        assert_eq!(session.game().player(Color::White).piece_count(), 3);
        assert_eq!(session.game().player(Color::White).reserve, 128);
    }

    #[test]
    fn test_placement_cap_advances_phase() {
        let mut session = Session::new(GameConfig {
            max_placements_per_turn: Some(1),
            ..GameConfig::default()
        })
        .unwrap();

        let events = session
            .submit(Decision::place(StatLine::new(1, 1, 1, 1, 1), 0))
            .unwrap();
        assert_eq!(
            events.last(),
            Some(&Event::PlacementEnded {
                player: Color::White
            })
        );
        assert_eq!(session.phase(), Phase::Movement);
    }

    #[test]
    fn test_rejections_leave_state_unchanged() {
        let mut session = new_session();
        session
            .submit(Decision::place(StatLine::new(2, 2, 2, 2, 2), 0))
            .unwrap();
        let before = session.game().clone();
        let request = session.pending();

        assert_eq!(
            session.submit(Decision::place(StatLine::new(1, 5, 0, 0, 0), 1)),
            Err(Rejection::Stat(StatError::BudgetExceeded {
                spent: 5,
                budget: 4
            }))
        );
        assert!(matches!(
            session.submit(Decision::place(StatLine::new(2, 2, 2, 2, 2), 0)),
            Err(Rejection::Placement(Illegal::Occupied { .. }))
        ));
        assert!(matches!(
            session.submit(Decision::place(StatLine::new(2, 2, 2, 2, 2), 8)),
            Err(Rejection::Placement(Illegal::OutOfBounds { .. }))
        ));
        assert!(matches!(
            session.submit(Decision::move_piece(Coord::new(7, 0), Coord::new(6, 0))),
            Err(Rejection::WrongPhase { .. })
        ));

        assert_eq!(session.game(), &before);
        assert_eq!(session.pending(), request);
    }

    #[test]
    fn test_illegal_move_keeps_movement_phase() {
        let mut session = new_session();
        session
            .submit(Decision::place(StatLine::new(2, 2, 2, 2, 1), 0))
            .unwrap();
        session.submit(Decision::Skip).unwrap();

        assert!(matches!(
            session.submit(Decision::move_piece(Coord::new(7, 0), Coord::new(5, 0))),
            Err(Rejection::Move(Illegal::OutOfRange { .. }))
        ));
        assert!(matches!(
            session.submit(Decision::place(StatLine::new(1, 1, 1, 1, 1), 1)),
            Err(Rejection::WrongPhase { .. })
        ));
        assert_eq!(session.phase(), Phase::Movement);
        assert_eq!(session.game().current_turn(), Color::White);
    }

    #[test]
    fn test_move_request_lists_options() {
        let mut session = new_session();
        session
            .submit(Decision::place(StatLine::new(1, 1, 1, 1, 1), 0))
            .unwrap();
        session.submit(Decision::Skip).unwrap();

        let Request::Move { player, moves } = session.pending() else {
            panic!("expected a move request");
        };
        assert_eq!(player, Color::White);
        assert_eq!(
            moves,
            vec![MoveOption {
                from: Coord::new(7, 0),
                to: vec![Coord::new(6, 0), Coord::new(6, 1)],
            }]
        );
    }

    #[test]
    fn test_self_exhaustion_by_placement() {
        let mut session = small_session(10);
        let events = session
            .submit(Decision::place(StatLine::new(3, 4, 4, 2, 0), 0))
            .unwrap();

        assert_eq!(
            events.last(),
            Some(&Event::GameOver {
                winner: Color::Black
            })
        );
        assert_eq!(session.winner(), Some(Color::Black));
        assert_eq!(session.pending(), Request::Finished { winner: Color::Black });
        assert_eq!(session.submit(Decision::Skip), Err(Rejection::GameOver));
    }

    #[test]
    fn test_reserve_reaching_exactly_zero_ends_game() {
        let mut session = small_session(10);
        let events = session
            .submit(Decision::place(StatLine::new(3, 4, 4, 2, 0), 0))
            .unwrap();
        assert!(events.contains(&Event::GameOver {
            winner: Color::Black
        }));

        let mut session = small_session(11);
        let events = session
            .submit(Decision::place(StatLine::new(3, 4, 4, 2, 0), 0))
            .unwrap();
        assert!(!events.iter().any(|e| matches!(e, Event::GameOver { .. })));
        assert!(!session.is_over());
    }

    #[test]
    fn test_invasion_ends_game_for_opponent() {
        let mut session = small_session(10);
        // White: cost 6, reserve 4, attack 3
        session
            .submit(Decision::place(StatLine::new(2, 3, 1, 0, 2), 1))
            .unwrap();
        session.submit(Decision::Skip).unwrap();
        session.submit(Decision::Skip).unwrap();

        // Black: cost 8, reserve 2
        session
            .submit(Decision::place(StatLine::new(2, 1, 6, 0, 1), 0))
            .unwrap();
        session.submit(Decision::Skip).unwrap();
        session.submit(Decision::Skip).unwrap();

        // White invades Black's row unopposed
        session.submit(Decision::Skip).unwrap();
        let events = session
            .submit(Decision::move_piece(Coord::new(2, 1), Coord::new(0, 1)))
            .unwrap();

        let Event::Moved { result, .. } = events[0] else {
            panic!("expected a move event");
        };
        assert_eq!(result.kind, MoveKind::Invasion);
        assert_eq!(session.game().player(Color::Black).reserve, -1);
        assert_eq!(session.game().player(Color::White).reserve, 4);
        assert_eq!(session.winner(), Some(Color::White));
        assert_eq!(events.last(), Some(&Event::GameOver { winner: Color::White }));
    }

    #[test]
    fn test_combat_through_session() {
        let mut session = small_session(140);
        session
            .submit(Decision::place(StatLine::new(10, 4, 10, 2, 2), 1))
            .unwrap();
        session.submit(Decision::Skip).unwrap();
        session.submit(Decision::Skip).unwrap();

        session
            .submit(Decision::place(StatLine::new(10, 3, 8, 1, 2), 1))
            .unwrap();
        session.submit(Decision::Skip).unwrap();
        session.submit(Decision::Skip).unwrap();

        session.submit(Decision::Skip).unwrap();
        let events = session
            .submit(Decision::move_piece(Coord::new(2, 1), Coord::new(0, 1)))
            .unwrap();
        let Event::Moved { result, .. } = events[0] else {
            panic!("expected a move event");
        };
        assert_eq!(
            result.combat.map(|c| c.outcome),
            Some(CombatOutcome::AttackerWins)
        );
        assert_eq!(session.game().player(Color::Black).piece_count(), 0);
        assert_eq!(session.game().player(Color::Black).reserve, 140 - 14);
        assert_eq!(session.game().current_turn(), Color::Black);
    }

    #[test]
    fn test_first_player_from_config() {
        let session = Session::new(GameConfig {
            first_player: Color::Black,
            ..GameConfig::default()
        })
        .unwrap();
        assert!(matches!(
            session.pending(),
            Request::Placement {
                player: Color::Black,
                ..
            }
        ));
    }

    #[test]
    fn test_decision_json() {
        let decisions: Vec<Decision> = serde_json::from_str(
            r#"[
                {"kind": "place", "power": 2, "attack": 2, "health": 2, "speed": 2, "distance": 2, "column": 4},
                {"kind": "skip"},
                {"kind": "move", "from": {"row": 7, "col": 4}, "to": {"row": 6, "col": 4}}
            ]"#,
        )
        .unwrap();
        assert_eq!(decisions[0], Decision::place(StatLine::new(2, 2, 2, 2, 2), 4));
        assert_eq!(decisions[1], Decision::Skip);
        assert_eq!(
            decisions[2],
            Decision::move_piece(Coord::new(7, 4), Coord::new(6, 4))
        );
    }
}
