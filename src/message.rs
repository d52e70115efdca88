use crate::{
    game::{GameState, Mode, PlayerNames},
    history::HistoryEntry,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Request {
    Setup { mode: Mode, names: PlayerNames },
    Reset,
    PlayTurn(u8),
    GetGameInfo,
    ToggleMute,
    GetHistory,
    ClearHistory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Response {
    GameInfo(GameState),
    Muted(bool),
    History(Vec<HistoryEntry>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Notification {
    Updated(GameState),
    HistoryRecorded(HistoryEntry),
    HistoryCleared,
}

impl From<GameState> for Notification {
    fn from(value: GameState) -> Self {
        Notification::Updated(value)
    }
}

impl From<HistoryEntry> for Notification {
    fn from(value: HistoryEntry) -> Self {
        Notification::HistoryRecorded(value)
    }
}
