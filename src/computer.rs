//! Move selection for the computer-controlled mark.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    board::{Board, CellId, Mark},
    win,
};

pub trait Opponent: Send {
    /// Picks an empty cell for `mark`, or `None` if the board is full.
    fn select_move(&mut self, board: &Board, mark: Mark) -> Option<CellId>;
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, clap::ValueEnum)]
pub enum Strategy {
    Random,
    #[default]
    Tactical,
}

impl Strategy {
    pub fn opponent(self) -> Box<dyn Opponent> {
        match self {
            Strategy::Random => Box::new(RandomOpponent::new()),
            Strategy::Tactical => Box::new(TacticalOpponent::new()),
        }
    }
}

/// Plays any empty cell, uniformly.
#[derive(Debug)]
pub struct RandomOpponent {
    rng: StdRng,
}

impl RandomOpponent {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomOpponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Opponent for RandomOpponent {
    fn select_move(&mut self, board: &Board, _mark: Mark) -> Option<CellId> {
        board.empty_cells().choose(&mut self.rng).copied()
    }
}

/// Wins when it can, blocks when it must, likes the centre, otherwise random.
#[derive(Debug, Default)]
pub struct TacticalOpponent {
    fallback: RandomOpponent,
}

impl TacticalOpponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            fallback: RandomOpponent::seeded(seed),
        }
    }

    fn completing_move(board: &Board, mark: Mark) -> Option<CellId> {
        board.empty_cells().into_iter().find(|&cell| {
            let mut next = board.clone();
            next.mark(cell, mark);
            win::detect(&next, mark).is_some()
        })
    }
}

impl Opponent for TacticalOpponent {
    fn select_move(&mut self, board: &Board, mark: Mark) -> Option<CellId> {
        Self::completing_move(board, mark)
            .or_else(|| Self::completing_move(board, !mark))
            .or_else(|| board.is_empty_at(CellId::B2).then_some(CellId::B2))
            .or_else(|| self.fallback.select_move(board, mark))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::board;

    #[test]
    fn random_only_picks_empty_cells() {
        let mut opponent = RandomOpponent::seeded(7);
        let b = board("XOXOX-OX-");
        for _ in 0..50 {
            let cell = opponent.select_move(&b, Mark::O).unwrap();
            assert!(b.is_empty_at(cell));
        }
    }

    #[test]
    fn full_board_has_no_move() {
        let b = board("XOXXOOOXX");
        assert_eq!(RandomOpponent::seeded(1).select_move(&b, Mark::O), None);
        assert_eq!(TacticalOpponent::seeded(1).select_move(&b, Mark::O), None);
    }

    #[test]
    fn tactical_takes_the_win() {
        let b = board("OO-XX-X--");
        assert_eq!(
            TacticalOpponent::seeded(1).select_move(&b, Mark::O),
            Some(CellId::C1)
        );
    }

    #[test]
    fn tactical_blocks_the_opponent() {
        let b = board("XX--O----");
        assert_eq!(
            TacticalOpponent::seeded(1).select_move(&b, Mark::O),
            Some(CellId::C1)
        );
    }

    #[test]
    fn tactical_prefers_the_centre() {
        let b = board("X--------");
        assert_eq!(
            TacticalOpponent::seeded(1).select_move(&b, Mark::O),
            Some(CellId::B2)
        );
    }

    #[test]
    fn tactical_falls_back_to_a_legal_cell() {
        let b = board("X---O---X");
        let cell = TacticalOpponent::seeded(3).select_move(&b, Mark::O).unwrap();
        assert!(b.is_empty_at(cell));
    }

    #[test]
    fn strategies_build_working_opponents() {
        for strategy in [Strategy::Random, Strategy::Tactical] {
            let mut opponent = strategy.opponent();
            let cell = opponent.select_move(&Board::default(), Mark::X).unwrap();
            assert!(cell.index() < 9);
        }
    }
}
