//! Win and draw detection.

use crate::board::{Board, CellId, Mark};

pub type Line = [CellId; 3];

/// Every winning line, in the order they are checked: rows, columns, diagonals.
pub const WIN_LINES: [Line; 8] = [
    // Rows
    [CellId::A1, CellId::B1, CellId::C1],
    [CellId::A2, CellId::B2, CellId::C2],
    [CellId::A3, CellId::B3, CellId::C3],
    // Columns
    [CellId::A1, CellId::A2, CellId::A3],
    [CellId::B1, CellId::B2, CellId::B3],
    [CellId::C1, CellId::C2, CellId::C3],
    // Diagonals
    [CellId::A1, CellId::B2, CellId::C3],
    [CellId::C1, CellId::B2, CellId::A3],
];

/// Returns the first line fully held by `mark`, if any.
pub fn detect(board: &Board, mark: Mark) -> Option<Line> {
    WIN_LINES
        .into_iter()
        .find(|line| line.iter().all(|&cell| board[cell] == Some(mark)))
}

/// True when no cell is empty. Only meaningful after [`detect`] found nothing.
pub fn is_draw(board: &Board) -> bool {
    board.is_full()
}
