use std::{io::Write, str::FromStr, time::Duration};

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::{
    board::CellId,
    computer::Opponent,
    game::{Game, GameState, Mode, PlayerNames, Status},
    history::HistoryEntry,
    message::{Notification, Request, Response},
    session,
    storage::Storage,
};

const HELP: &str = "Enter a cell (a1..c3 or 0..8), r to restart, m to toggle sound, \
                    h for history, c to clear history, q to quit.";

/// Plays in the terminal until stdin closes or the player quits.
pub async fn play<S: Storage>(
    game: Game<S>,
    opponent: Box<dyn Opponent>,
    delay: Duration,
    mode: Mode,
    names: PlayerNames,
) -> anyhow::Result<()> {
    let (handle, mut notifications, _session) = session::spawn(game, opponent, delay);

    println!("{HELP}");
    let history = handle.request(Request::GetHistory).await?;
    if let Response::History(history) = history {
        print_history(&history);
    }
    handle.request(Request::Setup { mode, names }).await?;

    let printer = tokio::spawn(async move {
        while let Some(notification) = notifications.recv().await {
            show(notification);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => {}
            "q" | "quit" => break,
            "r" | "restart" => {
                handle.reset().await?;
            }
            "m" | "mute" => {
                if let Response::Muted(muted) = handle.request(Request::ToggleMute).await? {
                    println!("Sound {}.", if muted { "off" } else { "on" });
                }
            }
            "h" | "history" => {
                if let Response::History(history) = handle.request(Request::GetHistory).await? {
                    print_history(&history);
                }
            }
            "c" | "clear" => {
                handle.request(Request::ClearHistory).await?;
            }
            "?" | "help" => println!("{HELP}"),
            input => match CellId::from_str(input) {
                Ok(cell) => {
                    let before = handle.state().await?;
                    let after = handle.play_turn(cell.index() as u8).await?;
                    if after == before {
                        println!("Can't play {cell} right now. Try again.");
                    }
                }
                Err(()) => println!("Invalid input! Try again."),
            },
        }
    }

    debug!("leaving terminal game");
    printer.abort();
    Ok(())
}

fn show(notification: Notification) {
    match notification {
        Notification::Updated(state) => render(&state),
        Notification::HistoryRecorded(entry) => {
            println!("Saved to history: {} ({})", entry.result, entry.timestamp)
        }
        Notification::HistoryCleared => println!("History cleared."),
    }
}

fn render(state: &GameState) {
    println!("\n{}\n", state.board);
    println!("{}", state.status_text());
    match state.status {
        Status::Won => {
            if let Some(line) = state.winning_line {
                let cells: Vec<_> = line.iter().map(CellId::to_string).collect();
                println!("Winning line: {}", cells.join(" "));
            }
            ring_bell(state);
            println!("Enter r to play again.");
        }
        Status::Draw => println!("Enter r to play again."),
        Status::Running => {}
    }
}

// The terminal bell is the only sound this front-end makes.
fn ring_bell(state: &GameState) {
    if state.is_muted {
        return;
    }
    let mut stdout = std::io::stdout();
    let _ = stdout.write_all(b"\x07");
    let _ = stdout.flush();
}

fn print_history(history: &[HistoryEntry]) {
    if history.is_empty() {
        println!("No games played yet.");
        return;
    }
    println!("Past games (newest first):");
    for entry in history {
        println!("  {:<24} {}", entry.timestamp, entry.result);
    }
}
