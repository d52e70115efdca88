use std::{
    fmt::Display,
    ops::{Index, IndexMut, Not},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

pub const NUM_CELLS: u8 = 9;

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Mark {
    #[default]
    X,
    O,
}

impl Not for Mark {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

impl FromStr for Mark {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" | "X" => Ok(Mark::X),
            "o" | "O" => Ok(Mark::O),
            _ => Err(format!("unknown mark `{s}`, expected x or o")),
        }
    }
}

// row:
// 1: 0 1 2
// 2: 3 4 5
// 3: 6 7 8
//    A B C : column
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct CellId(u8);
impl CellId {
    pub const A1: CellId = CellId(0);
    pub const B1: CellId = CellId(1);
    pub const C1: CellId = CellId(2);
    pub const A2: CellId = CellId(3);
    pub const B2: CellId = CellId(4);
    pub const C2: CellId = CellId(5);
    pub const A3: CellId = CellId(6);
    pub const B3: CellId = CellId(7);
    pub const C3: CellId = CellId(8);

    pub const fn new(index: u8) -> Option<Self> {
        if index >= NUM_CELLS {
            None
        } else {
            Some(Self(index))
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub fn all() -> impl Iterator<Item = CellId> {
        (0..NUM_CELLS).map(CellId)
    }
}

impl Display for CellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let column = (b'A' + self.0 % 3) as char;
        write!(f, "{}{}", column, self.0 / 3 + 1)
    }
}

impl FromStr for CellId {
    type Err = ();

    /// Accepts a raw index (`"4"`) or a coordinate (`"b2"`, `"B2"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(index) = s.parse::<u8>() {
            return CellId::new(index).ok_or(());
        }

        let mut chars = s.chars();
        let (Some(column), Some(row), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(());
        };
        let column = match column.to_ascii_lowercase() {
            'a' => 0,
            'b' => 1,
            'c' => 2,
            _ => return Err(()),
        };
        let row = match row {
            '1' => 0,
            '2' => 1,
            '3' => 2,
            _ => return Err(()),
        };
        CellId::new(row * 3 + column).ok_or(())
    }
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Board {
    cells: [Option<Mark>; 9],
}

impl Board {
    pub fn from_cells(cells: [Option<Mark>; 9]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Option<Mark>; 9] {
        &self.cells
    }

    pub fn mark(&mut self, cell: CellId, mark: Mark) {
        self[cell] = Some(mark);
    }

    pub fn is_empty_at(&self, cell: CellId) -> bool {
        self[cell].is_none()
    }

    pub fn empty_cells(&self) -> Vec<CellId> {
        CellId::all().filter(|&cell| self.is_empty_at(cell)).collect()
    }

    pub fn mark_count(&self) -> u8 {
        self.cells.iter().flatten().count() as u8
    }

    pub fn is_full(&self) -> bool {
        self.mark_count() == NUM_CELLS
    }
}

impl Index<CellId> for Board {
    type Output = Option<Mark>;

    fn index(&self, cell: CellId) -> &Self::Output {
        &self.cells[cell.index()]
    }
}

impl IndexMut<CellId> for Board {
    fn index_mut(&mut self, cell: CellId) -> &mut Self::Output {
        &mut self.cells[cell.index()]
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "   ABC")?;
        writeln!(f, " ╭─────")?;
        for (i, row) in self.cells.chunks_exact(3).enumerate() {
            write!(f, "{}│ ", i + 1)?;
            for cell in row {
                match cell {
                    Some(mark) => write!(f, "{mark}")?,
                    None => write!(f, "-")?,
                };
            }
            if i < 2 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Builds a board from a 9-character picture: `X`, `O`, anything else empty.
#[cfg(test)]
pub(crate) fn board(picture: &str) -> Board {
    let mut cells = [None; 9];
    for (cell, c) in cells.iter_mut().zip(picture.chars()) {
        *cell = match c {
            'X' => Some(Mark::X),
            'O' => Some(Mark::O),
            _ => None,
        };
    }
    Board::from_cells(cells)
}
