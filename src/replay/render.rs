//! ASCII renderer for terminal viewing.

use std::fmt::Write as _;

use crate::game::{Color, Coord, Game};

/// Render game state to plain ASCII.
///
/// Output format:
/// ```text
/// Turn 4 (White to act)          [White: 122] [Black: 126]
///      0 1 2
///    ┌───────┐
///  0 │ B . . │
///  1 │ . W . │
///  2 │ . . . │
///    └───────┘
///
/// Legend: W=White  B=Black  .=Empty  White zone=row 2  Black zone=row 0
/// ```
#[must_use]
pub fn render_ascii(game: &Game, turn: u32) -> String {
    let mut output = String::new();

    render_header(&mut output, game, turn);
    render_board(&mut output, game);

    let board = game.board();
    let _ = writeln!(
        output,
        "\nLegend: W=White  B=Black  .=Empty  White zone=row {}  Black zone=row {}",
        board.zone_row(Color::White),
        board.zone_row(Color::Black)
    );

    if let Some(winner) = game.winner() {
        let _ = writeln!(output, "Winner: {winner}");
    }

    output
}

/// Render the header line with turn number and reserves.
fn render_header(output: &mut String, game: &Game, turn: u32) {
    let label = format!("Turn {turn} ({} to act)", game.current_turn());
    let _ = write!(output, "{label:<32}");
    for color in Color::ALL {
        let _ = write!(output, "[{color}: {}] ", game.player(color).reserve);
    }
    output.push('\n');
}

/// Render the board grid with row and column indices.
fn render_board(output: &mut String, game: &Game) {
    let board = game.board();
    let size = board.size();
    let width = usize::from(size) * 2 + 1;

    output.push_str("     ");
    for col in 0..size {
        let _ = write!(output, "{} ", col % 10);
    }
    output.push('\n');

    let _ = writeln!(output, "   ┌{}┐", "─".repeat(width));
    for row in 0..size {
        let _ = write!(output, "{row:>2} │ ");
        for col in 0..size {
            output.push(cell_symbol(game, Coord::new(row, col)));
            output.push(' ');
        }
        output.push_str("│\n");
    }
    let _ = writeln!(output, "   └{}┘", "─".repeat(width));
}

fn cell_symbol(game: &Game, coord: Coord) -> char {
    game.board()
        .get(coord)
        .map_or('.', |occupant| occupant.owner.symbol())
}
