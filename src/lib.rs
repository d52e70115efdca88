pub mod board;
pub mod computer;
pub mod config;
pub mod error;
pub mod game;
pub mod history;
pub mod message;
pub mod mute;
pub mod session;
pub mod storage;
pub mod term;
pub mod win;
