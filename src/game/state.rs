//! Game state management.

use serde::Serialize;

use crate::config::{ConfigError, GameConfig};
use crate::game::{
    Board, Color, CombatOutcome, CombatReport, Coord, Illegal, MoveKind, Occupant, Piece,
    PieceId, Player, ReserveCharge, apply_charge, assert_invariants, check_move,
    check_placement, invasion_charge, placement_charge, resolve_combat,
};

/// A successful placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    /// Identifier assigned to the new piece.
    pub piece: PieceId,
    /// Cell the piece was placed on.
    pub position: Coord,
    /// Reserve deducted from the placer.
    pub charge: ReserveCharge,
}

/// A successful move, including any combat it triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveResult {
    /// The piece that moved.
    pub piece: PieceId,
    /// Where it started.
    pub from: Coord,
    /// Requested destination.
    pub to: Coord,
    /// What kind of move it was.
    pub kind: MoveKind,
    /// Fight report when the destination was occupied.
    pub combat: Option<CombatReport>,
    /// Invasion penalty charged to the opponent.
    pub charge: Option<ReserveCharge>,
}

/// Complete game state.
///
/// The board holds `(id, owner)` references into the two players' piece
/// sets. Every mutation below keeps both sides in step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Game {
    /// The game board.
    pub(crate) board: Board,
    /// White then Black.
    pub(crate) players: [Player; 2],
    /// Whose turn it is.
    pub(crate) current_turn: Color,
    /// Stat points per power used for allocation.
    pub(crate) budget_per_power: i32,
    /// Set once a reserve runs out.
    pub(crate) winner: Option<Color>,
    /// Next piece identifier to hand out.
    next_piece_id: u32,
}

impl Game {
    /// Create a new game with an empty board and full reserves.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::new(config.board_size).ok_or(ConfigError::BoardSize(config.board_size))?;

        Ok(Self {
            board,
            players: [
                Player::new(Color::White, config.starting_reserve),
                Player::new(Color::Black, config.starting_reserve),
            ],
            current_turn: config.first_player,
            budget_per_power: config.budget_per_power,
            winner: None,
            next_piece_id: 0,
        })
    }

    /// The game board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Get a player by color.
    #[must_use]
    pub const fn player(&self, color: Color) -> &Player {
        &self.players[color.index()]
    }

    fn player_mut(&mut self, color: Color) -> &mut Player {
        &mut self.players[color.index()]
    }

    /// Both players, White first.
    #[must_use]
    pub const fn players(&self) -> &[Player; 2] {
        &self.players
    }

    /// Color whose turn it is.
    #[must_use]
    pub const fn current_turn(&self) -> Color {
        self.current_turn
    }

    /// Color waiting for its turn.
    #[must_use]
    pub const fn opponent(&self) -> Color {
        self.current_turn.opponent()
    }

    /// Stat points granted per power.
    #[must_use]
    pub const fn budget_per_power(&self) -> i32 {
        self.budget_per_power
    }

    /// The winner, once the game is over.
    #[must_use]
    pub const fn winner(&self) -> Option<Color> {
        self.winner
    }

    /// Check if the game is over.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Get the piece standing on a cell.
    #[must_use]
    pub fn piece_at(&self, coord: Coord) -> Option<&Piece> {
        self.board
            .get(coord)
            .and_then(|occupant| self.player(occupant.owner).piece(occupant.id))
    }

    /// Place `piece` for `color` at `position`.
    ///
    /// Charges the placer the piece's stat total. The reserve may go to zero
    /// or below; the win check decides what that means.
    ///
    /// # Errors
    ///
    /// Returns the rule that forbids the placement. State is unchanged.
    pub fn add_piece_to_zone(
        &mut self,
        color: Color,
        mut piece: Piece,
        position: Coord,
    ) -> Result<Placement, Illegal> {
        if piece.owner != color {
            return Err(Illegal::NotYourPiece {
                coord: position,
                owner: piece.owner,
            });
        }
        check_placement(&self.board, color, position)?;

        let id = PieceId(self.next_piece_id);
        self.next_piece_id += 1;

        let charge = placement_charge(&piece);
        piece.position = Some(position);
        self.board.set(position, Occupant { id, owner: color });
        let player = self.player_mut(color);
        player.pieces.insert(id, piece);
        apply_charge(player, charge);

        tracing::debug!(%color, piece = %id, %position, cost = charge.amount(), "piece placed");
        assert_invariants(self);

        Ok(Placement {
            piece: id,
            position,
            charge,
        })
    }

    /// Move `color`'s piece from `from` to `to`.
    ///
    /// Empty destinations relocate the piece (charging the opponent on an
    /// invasion). Enemy-held destinations start combat: the loser leaves the
    /// board and the mover only relocates if it won.
    ///
    /// # Errors
    ///
    /// Returns the rule that forbids the move. State is unchanged.
    pub fn move_piece(&mut self, color: Color, from: Coord, to: Coord) -> Result<MoveResult, Illegal> {
        let occupant = self.board.get(from).ok_or(Illegal::NoPiece { coord: from })?;
        if occupant.owner != color {
            return Err(Illegal::NotYourPiece {
                coord: from,
                owner: occupant.owner,
            });
        }

        let mover = self
            .player(color)
            .piece(occupant.id)
            .ok_or(Illegal::NoPiece { coord: from })?;
        let kind = check_move(&self.board, mover, to)?;

        let mut result = MoveResult {
            piece: occupant.id,
            from,
            to,
            kind,
            combat: None,
            charge: None,
        };

        match kind {
            MoveKind::Advance => self.relocate(occupant, from, to),
            MoveKind::Invasion => {
                let charge = invasion_charge(mover);
                self.relocate(occupant, from, to);
                apply_charge(self.player_mut(color.opponent()), charge);
                result.charge = Some(charge);
                tracing::debug!(%color, piece = %occupant.id, %to, penalty = charge.amount(), "zone invaded");
            }
            MoveKind::Attack { defender } => {
                let enemy = color.opponent();
                let defending = self
                    .player(enemy)
                    .piece(defender)
                    .ok_or(Illegal::NoPiece { coord: to })?;
                let report = resolve_combat(mover, defending);
                self.apply_combat(occupant, defender, from, to, &report);
                result.combat = Some(report);
            }
        }

        tracing::debug!(%color, piece = %occupant.id, %from, %to, ?kind, "piece moved");
        assert_invariants(self);
        Ok(result)
    }

    fn relocate(&mut self, occupant: Occupant, from: Coord, to: Coord) {
        self.board.clear(from);
        self.board.set(to, occupant);
        if let Some(piece) = self.player_mut(occupant.owner).pieces.get_mut(&occupant.id) {
            piece.position = Some(to);
        }
    }

    /// Remove a piece from its owner's set and from the board in one step.
    fn remove_piece(&mut self, owner: Color, id: PieceId) {
        if let Some(piece) = self.player_mut(owner).pieces.remove(&id) {
            if let Some(position) = piece.position {
                self.board.clear(position);
            }
        }
    }

    fn set_health(&mut self, owner: Color, id: PieceId, health: i32) {
        if let Some(piece) = self.player_mut(owner).pieces.get_mut(&id) {
            piece.health = health;
        }
    }

    fn apply_combat(
        &mut self,
        mover: Occupant,
        defender: PieceId,
        from: Coord,
        to: Coord,
        report: &CombatReport,
    ) {
        let enemy = mover.owner.opponent();
        self.set_health(mover.owner, mover.id, report.attacker_health);
        self.set_health(enemy, defender, report.defender_health);

        match report.outcome {
            CombatOutcome::AttackerWins => {
                self.remove_piece(enemy, defender);
                self.relocate(mover, from, to);
            }
            CombatOutcome::DefenderWins => self.remove_piece(mover.owner, mover.id),
            CombatOutcome::Stalemate => {}
        }
    }

    /// Pass the turn to the other player.
    pub fn switch_turn(&mut self) {
        self.current_turn = self.current_turn.opponent();
    }

    /// Check the win condition.
    ///
    /// The acting player's reserve is looked at first, so a player who
    /// bankrupts themselves loses even if the opponent is also out. Once a
    /// winner is set it never changes.
    pub fn check_winner(&mut self) -> Option<Color> {
        if self.winner.is_some() {
            return self.winner;
        }

        let acting = self.current_turn;
        for color in [acting, acting.opponent()] {
            if self.player(color).is_exhausted() {
                let winner = color.opponent();
                tracing::info!(%winner, loser = %color, reserve = self.player(color).reserve, "reserve exhausted");
                self.winner = Some(winner);
                break;
            }
        }
        self.winner
    }
}
