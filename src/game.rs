use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::{
    board::{Board, CellId, Mark},
    history::{HistoryEntry, HistoryStore},
    mute::MutePreference,
    storage::Storage,
    win::{self, Line},
};

pub const FIRST_TURN: Mark = Mark::X;
pub const COMPUTER_NAME: &str = "Computer";
pub const DRAW_MESSAGE: &str = "It's a Draw!";

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Running,
    Won,
    Draw,
}

/// Who plays: two people at one keyboard, or one person against the computer.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Friends,
    Computer(Mark),
}

impl Mode {
    pub fn computer(self) -> Option<Mark> {
        match self {
            Mode::Friends => None,
            Mode::Computer(mark) => Some(mark),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct PlayerNames {
    pub x: String,
    pub o: String,
}

impl Default for PlayerNames {
    fn default() -> Self {
        Self {
            x: Mark::X.to_string(),
            o: Mark::O.to_string(),
        }
    }
}

impl PlayerNames {
    pub fn get(&self, mark: Mark) -> &str {
        match mark {
            Mark::X => &self.x,
            Mark::O => &self.o,
        }
    }

    fn set(&mut self, mark: Mark, name: String) {
        match mark {
            Mark::X => self.x = name,
            Mark::O => self.o = name,
        }
    }
}

/// Snapshot of a game handed to front-ends.
#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub current: Mark,
    pub status: Status,
    pub winning_line: Option<Line>,
    pub player_names: PlayerNames,
    pub computer: Option<Mark>,
    pub is_muted: bool,
}

impl GameState {
    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    /// `"X wins!"`, or `"(X) Annie wins!"` when the winner has a name of their own.
    pub fn win_message(&self, mark: Mark) -> String {
        let name = self.player_names.get(mark);
        if name == mark.to_string() {
            format!("{mark} wins!")
        } else {
            format!("({mark}) {name} wins!")
        }
    }

    /// Line shown above the board.
    pub fn status_text(&self) -> String {
        let mark = self.current;
        match self.status {
            Status::Won => self.win_message(mark),
            Status::Draw => DRAW_MESSAGE.to_string(),
            Status::Running => {
                let name = self.player_names.get(mark);
                if name == mark.to_string() {
                    format!("{mark}'s turn")
                } else {
                    format!("{name}'s turn ({mark})")
                }
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum MoveOutcome {
    /// The move broke a rule and nothing changed.
    Ignored,
    Continued,
    /// The game ended. `entry` is `None` if the result could not be saved.
    Concluded { entry: Option<HistoryEntry> },
}

#[derive(Debug)]
pub struct Game<S: Storage> {
    state: GameState,
    history: HistoryStore<S>,
    mute: MutePreference<S>,
}

impl<S: Storage> Game<S> {
    pub fn new(storage: S) -> Self {
        let mute = MutePreference::load(storage.clone());
        let mut game = Game {
            state: GameState {
                is_muted: mute.is_muted(),
                ..GameState::default()
            },
            history: HistoryStore::new(storage),
            mute,
        };
        game.reset();
        game
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn whos_turn(&self) -> Mark {
        self.state.current
    }

    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.state.board = Board::default();
        self.state.current = FIRST_TURN;
        self.state.status = Status::Running;
        self.state.winning_line = None;
        debug!("new game");
    }

    /// Applies the names and opponent chosen before a game. Blank names fall
    /// back to the mark itself; a computer-controlled mark is always "Computer".
    #[instrument(skip(self))]
    pub fn setup(&mut self, mode: Mode, names: PlayerNames) {
        self.state.player_names = PlayerNames::default();
        for mark in [Mark::X, Mark::O] {
            let name = names.get(mark).trim();
            if !name.is_empty() {
                self.state.player_names.set(mark, name.to_string());
            }
        }

        self.state.computer = mode.computer();
        if let Some(mark) = self.state.computer {
            self.state.player_names.set(mark, COMPUTER_NAME.to_string());
        }
        info!(
            x = %self.state.player_names.x,
            o = %self.state.player_names.o,
            computer = ?self.state.computer,
            "players set up"
        );
    }

    /// Whether the computer should play the next move.
    pub fn computer_due(&self) -> bool {
        self.state.is_running() && self.state.computer == Some(self.state.current)
    }

    /// Marks cell `index` for the current player. Moves on a finished game,
    /// an occupied cell or an index outside the board are ignored.
    #[instrument(skip(self), fields(mark = %self.state.current))]
    pub fn apply_move(&mut self, index: usize) -> MoveOutcome {
        let Some(cell) = u8::try_from(index).ok().and_then(CellId::new) else {
            return MoveOutcome::Ignored;
        };
        if !self.is_valid_move(cell) {
            return MoveOutcome::Ignored;
        }

        let mark = self.state.current;
        self.state.board.mark(cell, mark);

        if let Some(line) = win::detect(&self.state.board, mark) {
            self.state.status = Status::Won;
            self.state.winning_line = Some(line);
            let result = self.state.win_message(mark);
            info!(%result, "game won");
            return self.conclude(result);
        }

        if win::is_draw(&self.state.board) {
            self.state.status = Status::Draw;
            info!("game drawn");
            return self.conclude(DRAW_MESSAGE.to_string());
        }

        self.next_turn();
        MoveOutcome::Continued
    }

    fn is_valid_move(&self, cell: CellId) -> bool {
        self.state.is_running() && self.state.board.is_empty_at(cell)
    }

    fn next_turn(&mut self) {
        self.state.current = !self.state.current;
    }

    fn conclude(&mut self, result: String) -> MoveOutcome {
        let entry = HistoryEntry::now(result);
        let entry = match self.history.record(entry.clone()) {
            Ok(()) => Some(entry),
            Err(e) => {
                warn!("match result not saved: {e}");
                None
            }
        };
        MoveOutcome::Concluded { entry }
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.load()
    }

    pub fn clear_history(&mut self) -> bool {
        match self.history.clear() {
            Ok(()) => true,
            Err(e) => {
                warn!("match history not cleared: {e}");
                false
            }
        }
    }

    pub fn is_muted(&self) -> bool {
        self.mute.is_muted()
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.state.is_muted = self.mute.toggle();
        self.state.is_muted
    }

    #[cfg(test)]
    pub(crate) fn set_position(&mut self, board: Board, current: Mark) {
        self.state.board = board;
        self.state.current = current;
    }
}
