//! Placement and movement legality.
//!
//! Every rule check lives here and returns a tagged reason on failure, so the
//! turn controller never re-derives a rule on its own.

use serde::Serialize;
use thiserror::Error;

use crate::game::{Board, Color, Coord, Piece, PieceId};

/// Why a placement or move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Illegal {
    /// The target cell is off the board.
    #[error("{coord} is off the board")]
    OutOfBounds {
        /// Offending coordinate.
        coord: Coord,
    },
    /// Placement outside the placer's zone row.
    #[error("{coord} is outside {color}'s zone")]
    OutsideZone {
        /// Offending coordinate.
        coord: Coord,
        /// Color that tried to place.
        color: Color,
    },
    /// Placement onto an occupied cell.
    #[error("{coord} is occupied")]
    Occupied {
        /// Offending coordinate.
        coord: Coord,
    },
    /// No piece stands on the source cell.
    #[error("no piece at {coord}")]
    NoPiece {
        /// Source coordinate.
        coord: Coord,
    },
    /// The source piece belongs to the other player.
    #[error("piece at {coord} belongs to {owner}")]
    NotYourPiece {
        /// Source coordinate.
        coord: Coord,
        /// Actual owner.
        owner: Color,
    },
    /// The piece is still in reserve.
    #[error("piece is not on the board")]
    NotOnBoard,
    /// Destination further away than the piece's distance stat.
    #[error("destination is {needed} away but range is {range}")]
    OutOfRange {
        /// Chebyshev distance to the destination.
        needed: i32,
        /// The piece's distance stat.
        range: i32,
    },
    /// Empty-cell moves must advance toward the opponent.
    #[error("moves onto empty cells must advance")]
    NotForward,
    /// Destination holds a piece of the mover's own color.
    #[error("{coord} holds a friendly piece")]
    FriendlyFire {
        /// Destination coordinate.
        coord: Coord,
    },
}

/// What a legal move does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MoveKind {
    /// Plain advance onto an empty cell.
    Advance,
    /// Advance onto an empty cell in the opponent's zone.
    Invasion,
    /// Destination holds an enemy piece; combat follows.
    Attack {
        /// The defending piece.
        defender: PieceId,
    },
}

/// Check whether `color` may place a piece at `coord`.
///
/// # Errors
///
/// Returns the reason the placement is illegal.
pub fn check_placement(board: &Board, color: Color, coord: Coord) -> Result<(), Illegal> {
    if !board.in_bounds(coord) {
        return Err(Illegal::OutOfBounds { coord });
    }
    if !board.is_in_zone(coord, color) {
        return Err(Illegal::OutsideZone { coord, color });
    }
    if !board.is_empty(coord) {
        return Err(Illegal::Occupied { coord });
    }
    Ok(())
}

/// Check whether `piece` may move to `dest`.
///
/// The order of checks matters: range first, then occupancy, then direction.
/// Attacks ignore direction.
///
/// # Errors
///
/// Returns the reason the move is illegal.
pub fn check_move(board: &Board, piece: &Piece, dest: Coord) -> Result<MoveKind, Illegal> {
    let start = piece.position.ok_or(Illegal::NotOnBoard)?;

    if !board.in_bounds(dest) {
        return Err(Illegal::OutOfBounds { coord: dest });
    }

    let needed = start.chebyshev(dest);
    if needed > piece.distance {
        return Err(Illegal::OutOfRange {
            needed,
            range: piece.distance,
        });
    }

    match board.get(dest) {
        None => {
            let (dv, _) = start.delta_to(dest);
            if dv.signum() != piece.owner.forward() {
                return Err(Illegal::NotForward);
            }
            if board.is_in_zone(dest, piece.owner.opponent()) {
                Ok(MoveKind::Invasion)
            } else {
                Ok(MoveKind::Advance)
            }
        }
        Some(occupant) if occupant.owner != piece.owner => Ok(MoveKind::Attack {
            defender: occupant.id,
        }),
        Some(_) => Err(Illegal::FriendlyFire { coord: dest }),
    }
}

/// Boolean form of [`check_move`].
#[must_use]
pub fn is_valid_move(board: &Board, piece: &Piece, dest: Coord) -> bool {
    check_move(board, piece, dest).is_ok()
}

/// Every destination `piece` can legally reach, in row-major order.
#[must_use]
pub fn legal_destinations(board: &Board, piece: &Piece) -> Vec<Coord> {
    let Some(start) = piece.position else {
        return Vec::new();
    };

    // Only cells within range can pass the range check
    let reach = u16::try_from(piece.distance.max(0)).unwrap_or(u16::MAX);
    let last = board.size() - 1;
    let rows = start.row.saturating_sub(reach)..=start.row.saturating_add(reach).min(last);

    rows.flat_map(|row| {
        let cols = start.col.saturating_sub(reach)..=start.col.saturating_add(reach).min(last);
        cols.map(move |col| Coord::new(row, col))
    })
    .filter(|&dest| is_valid_move(board, piece, dest))
    .collect()
}

/// Columns of `color`'s zone row that are free for placement.
#[must_use]
pub fn open_zone_columns(board: &Board, color: Color) -> Vec<u16> {
    let row = board.zone_row(color);
    (0..board.size())
        .filter(|&col| board.is_empty(Coord::new(row, col)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Occupant, StatLine, allocate};

    fn piece_at(color: Color, coord: Coord, distance: i32) -> Piece {
        let mut piece = allocate(StatLine::new(10, 4, 4, 4, distance), color).unwrap();
        piece.position = Some(coord);
        piece
    }

    fn put(board: &mut Board, id: u32, owner: Color, coord: Coord) {
        board.set(
            coord,
            Occupant {
                id: PieceId(id),
                owner,
            },
        );
    }

    #[test]
    fn test_placement_in_zone() {
        let board = Board::new(8).unwrap();
        assert!(check_placement(&board, Color::Black, Coord::new(0, 3)).is_ok());
        assert!(check_placement(&board, Color::White, Coord::new(7, 3)).is_ok());
    }

    #[test]
    fn test_placement_outside_zone() {
        let board = Board::new(8).unwrap();
        assert_eq!(
            check_placement(&board, Color::Black, Coord::new(1, 3)),
            Err(Illegal::OutsideZone {
                coord: Coord::new(1, 3),
                color: Color::Black
            })
        );
        assert!(check_placement(&board, Color::White, Coord::new(0, 3)).is_err());
    }

    #[test]
    fn test_placement_occupied() {
        let mut board = Board::new(8).unwrap();
        put(&mut board, 1, Color::Black, Coord::new(0, 3));
        assert_eq!(
            check_placement(&board, Color::Black, Coord::new(0, 3)),
            Err(Illegal::Occupied {
                coord: Coord::new(0, 3)
            })
        );
    }

    #[test]
    fn test_placement_out_of_bounds() {
        let board = Board::new(8).unwrap();
        assert!(matches!(
            check_placement(&board, Color::Black, Coord::new(0, 8)),
            Err(Illegal::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_forward_moves() {
        let board = Board::new(8).unwrap();
        let white = piece_at(Color::White, Coord::new(7, 3), 2);
        assert_eq!(
            check_move(&board, &white, Coord::new(6, 3)),
            Ok(MoveKind::Advance)
        );
        assert_eq!(
            check_move(&board, &white, Coord::new(5, 5)),
            Ok(MoveKind::Advance)
        );

        let black = piece_at(Color::Black, Coord::new(0, 3), 1);
        assert_eq!(
            check_move(&board, &black, Coord::new(1, 2)),
            Ok(MoveKind::Advance)
        );
    }

    #[test]
    fn test_sideways_and_backward_rejected() {
        let board = Board::new(8).unwrap();
        let white = piece_at(Color::White, Coord::new(5, 3), 2);
        assert_eq!(
            check_move(&board, &white, Coord::new(5, 4)),
            Err(Illegal::NotForward)
        );
        assert_eq!(
            check_move(&board, &white, Coord::new(6, 3)),
            Err(Illegal::NotForward)
        );

        let black = piece_at(Color::Black, Coord::new(3, 3), 2);
        assert_eq!(
            check_move(&board, &black, Coord::new(2, 3)),
            Err(Illegal::NotForward)
        );
    }

    #[test]
    fn test_out_of_range_regardless_of_occupancy() {
        let mut board = Board::new(8).unwrap();
        let white = piece_at(Color::White, Coord::new(7, 0), 2);
        put(&mut board, 9, Color::Black, Coord::new(4, 0));

        assert_eq!(
            check_move(&board, &white, Coord::new(4, 0)),
            Err(Illegal::OutOfRange {
                needed: 3,
                range: 2
            })
        );
        assert_eq!(
            check_move(&board, &white, Coord::new(7, 3)),
            Err(Illegal::OutOfRange {
                needed: 3,
                range: 2
            })
        );
    }

    #[test]
    fn test_attack_ignores_direction() {
        let mut board = Board::new(8).unwrap();
        let white = piece_at(Color::White, Coord::new(4, 4), 1);
        put(&mut board, 7, Color::Black, Coord::new(5, 4));
        put(&mut board, 8, Color::Black, Coord::new(4, 5));

        assert_eq!(
            check_move(&board, &white, Coord::new(5, 4)),
            Ok(MoveKind::Attack {
                defender: PieceId(7)
            })
        );
        assert_eq!(
            check_move(&board, &white, Coord::new(4, 5)),
            Ok(MoveKind::Attack {
                defender: PieceId(8)
            })
        );
    }

    #[test]
    fn test_friendly_destination_rejected() {
        let mut board = Board::new(8).unwrap();
        let white = piece_at(Color::White, Coord::new(4, 4), 2);
        put(&mut board, 1, Color::White, Coord::new(4, 4));
        put(&mut board, 2, Color::White, Coord::new(3, 4));

        assert!(matches!(
            check_move(&board, &white, Coord::new(3, 4)),
            Err(Illegal::FriendlyFire { .. })
        ));
        // Standing still lands on itself
        assert!(matches!(
            check_move(&board, &white, Coord::new(4, 4)),
            Err(Illegal::FriendlyFire { .. })
        ));
    }

    #[test]
    fn test_invasion_detected() {
        let board = Board::new(8).unwrap();
        let white = piece_at(Color::White, Coord::new(1, 2), 1);
        assert_eq!(
            check_move(&board, &white, Coord::new(0, 2)),
            Ok(MoveKind::Invasion)
        );

        let black = piece_at(Color::Black, Coord::new(5, 2), 2);
        assert_eq!(
            check_move(&board, &black, Coord::new(7, 1)),
            Ok(MoveKind::Invasion)
        );
    }

    #[test]
    fn test_unplaced_piece_cannot_move() {
        let board = Board::new(8).unwrap();
        let piece = allocate(StatLine::new(1, 1, 1, 1, 1), Color::White).unwrap();
        assert_eq!(
            check_move(&board, &piece, Coord::new(6, 0)),
            Err(Illegal::NotOnBoard)
        );
        assert!(legal_destinations(&board, &piece).is_empty());
    }

    #[test]
    fn test_legal_destinations() {
        let mut board = Board::new(8).unwrap();
        let white = piece_at(Color::White, Coord::new(7, 0), 1);
        put(&mut board, 1, Color::White, Coord::new(7, 0));
        put(&mut board, 2, Color::Black, Coord::new(7, 1));

        let dests = legal_destinations(&board, &white);
        assert_eq!(
            dests,
            vec![Coord::new(6, 0), Coord::new(6, 1), Coord::new(7, 1)]
        );
    }

    #[test]
    fn test_open_zone_columns() {
        let mut board = Board::new(4).unwrap();
        put(&mut board, 1, Color::Black, Coord::new(0, 2));
        assert_eq!(open_zone_columns(&board, Color::Black), vec![0, 1, 3]);
        assert_eq!(open_zone_columns(&board, Color::White), vec![0, 1, 2, 3]);
    }
}
