//! Event loop that owns a [`Game`] and drives the computer opponent.
//!
//! Requests from the front-end and the computer's delayed turn arrive on one
//! channel and are handled one at a time, so the game has a single writer.
//! The delayed turn is never cancelled: when it fires it checks that the
//! computer is still due to move in the same position it was scheduled for,
//! and does nothing otherwise.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use crate::{
    computer::Opponent,
    error::SessionError,
    game::{Game, GameState, MoveOutcome},
    message::{Notification, Request, Response},
    storage::Storage,
};

pub const DEFAULT_COMPUTER_DELAY: Duration = Duration::from_millis(500);

const INBOX_CAPACITY: usize = 32;

#[derive(Debug)]
enum Command {
    Request(Request, oneshot::Sender<Response>),
    /// Carries the position generation the turn was scheduled in.
    ComputerTurn(u64),
}

/// Front-end side of a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Command>,
}

impl SessionHandle {
    pub async fn request(&self, request: Request) -> Result<Response, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(Command::Request(request, tx))
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    pub async fn play_turn(&self, index: u8) -> Result<GameState, SessionError> {
        self.game_info(Request::PlayTurn(index)).await
    }

    pub async fn reset(&self) -> Result<GameState, SessionError> {
        self.game_info(Request::Reset).await
    }

    pub async fn state(&self) -> Result<GameState, SessionError> {
        self.game_info(Request::GetGameInfo).await
    }

    async fn game_info(&self, request: Request) -> Result<GameState, SessionError> {
        match self.request(request).await? {
            Response::GameInfo(state) => Ok(state),
            _ => Err(SessionError::UnexpectedResponse),
        }
    }
}

pub struct Session<S: Storage> {
    game: Game<S>,
    opponent: Box<dyn Opponent>,
    delay: Duration,
    /// Bumped on every reset and every accepted move.
    generation: u64,
    inbox: mpsc::Receiver<Command>,
    outbox: mpsc::WeakSender<Command>,
    notifications: mpsc::UnboundedSender<Notification>,
}

/// Starts a session on the current tokio runtime. It stops once every
/// [`SessionHandle`] is dropped.
pub fn spawn<S: Storage>(
    game: Game<S>,
    opponent: Box<dyn Opponent>,
    delay: Duration,
) -> (
    SessionHandle,
    mpsc::UnboundedReceiver<Notification>,
    JoinHandle<()>,
) {
    let (tx, inbox) = mpsc::channel(INBOX_CAPACITY);
    let (notifications, notification_rx) = mpsc::unbounded_channel();
    let session = Session {
        game,
        opponent,
        delay,
        generation: 0,
        inbox,
        outbox: tx.downgrade(),
        notifications,
    };
    let task = tokio::spawn(session.run());
    (SessionHandle { tx }, notification_rx, task)
}

impl<S: Storage> Session<S> {
    async fn run(mut self) {
        info!(delay_ms = self.delay.as_millis() as u64, "game session started");
        // covers a game configured with the computer moving first
        self.schedule_computer_turn();

        while let Some(command) = self.inbox.recv().await {
            match command {
                Command::Request(request, reply) => {
                    let rsp = self.handle(request);
                    // the requester may have given up waiting
                    let _ = reply.send(rsp);
                }
                Command::ComputerTurn(generation) => self.computer_turn(generation),
            }
        }
        info!("game session closed");
    }

    #[instrument(skip(self))]
    fn handle(&mut self, request: Request) -> Response {
        match request {
            Request::Setup { mode, names } => {
                self.game.setup(mode, names);
                self.game.reset();
                self.generation += 1;
                self.publish_state();
                self.schedule_computer_turn();
            }
            Request::Reset => {
                self.game.reset();
                self.generation += 1;
                self.publish_state();
                self.schedule_computer_turn();
            }
            Request::PlayTurn(index) => {
                if self.game.computer_due() {
                    debug!("ignoring move during the computer's turn");
                } else {
                    let outcome = self.game.apply_move(index as usize);
                    self.publish(outcome);
                    self.schedule_computer_turn();
                }
            }
            Request::GetGameInfo => {}
            Request::ToggleMute => {
                let muted = self.game.toggle_mute();
                self.publish_state();
                return Response::Muted(muted);
            }
            Request::GetHistory => return Response::History(self.game.history()),
            Request::ClearHistory => {
                if self.game.clear_history() {
                    self.notify(Notification::HistoryCleared);
                }
                return Response::History(self.game.history());
            }
        }
        Response::GameInfo(self.game.state().clone())
    }

    fn schedule_computer_turn(&self) {
        if !self.game.computer_due() {
            return;
        }

        let outbox = self.outbox.clone();
        let delay = self.delay;
        let generation = self.generation;
        debug!(?delay, generation, "computer turn scheduled");
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(outbox) = outbox.upgrade() {
                let _ = outbox.send(Command::ComputerTurn(generation)).await;
            }
        });
    }

    fn computer_turn(&mut self, generation: u64) {
        // a reset, a new game or the end of the game may have happened while waiting
        if generation != self.generation || !self.game.computer_due() {
            debug!(generation, current = self.generation, "computer turn no longer due");
            return;
        }

        let mark = self.game.whos_turn();
        let Some(cell) = self.opponent.select_move(&self.game.state().board, mark) else {
            return;
        };
        info!(%mark, %cell, "computer plays");
        let outcome = self.game.apply_move(cell.index());
        self.publish(outcome);
        self.schedule_computer_turn();
    }

    fn publish(&mut self, outcome: MoveOutcome) {
        if outcome != MoveOutcome::Ignored {
            self.generation += 1;
        }
        match outcome {
            MoveOutcome::Ignored => {}
            MoveOutcome::Continued => self.publish_state(),
            MoveOutcome::Concluded { entry } => {
                self.publish_state();
                if let Some(entry) = entry {
                    self.notify(entry);
                }
            }
        }
    }

    fn publish_state(&self) {
        self.notify(self.game.state().clone());
    }

    fn notify(&self, notification: impl Into<Notification>) {
        // nobody listening is fine
        let _ = self.notifications.send(notification.into());
    }
}
