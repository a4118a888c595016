use std::time::{Duration, Instant};

use bevy_tasks::{AsyncComputeTaskPool, Task, TaskPool};
use futures_lite::future::{block_on, poll_once};
use log::{debug, info, warn};
use othello_core::{Board, GameOutcome, Move, Player};
use othello_engine::{resolve_move, OthelloAI, SearchConfig, SearchResult, StopSignal};

use crate::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    AwaitingHumanMove,
    AiSearchInFlight,
    GameOver,
}

/// Position and side to move, saved before every applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSnapshot {
    pub board: Board,
    pub to_move: Player,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// The human's colour; the AI plays the other one.
    pub human: Player,
    pub search: SearchConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            human: Player::Black,
            search: SearchConfig::default(),
        }
    }
}

struct PendingSearch {
    task: Task<SearchResult>,
    stop: StopSignal,
    deadline: Instant,
}

/// One human-versus-AI game.
///
/// Owns the authoritative board and the undo history. At most one AI search
/// runs at a time, on its own copy of the board.
pub struct Session {
    board: Board,
    to_move: Player,
    human: Player,
    ai_side: Player,
    ai: OthelloAI,
    state: SessionState,
    history: Vec<GameSnapshot>,
    pending: Option<PendingSearch>,
    outcome: Option<GameOutcome>,
}

impl Session {
    /// Starts from the standard opening with Black to move.
    pub fn new(config: SessionConfig) -> Self {
        Self::from_position(config, Board::new(), Player::Black)
    }

    /// Starts from an arbitrary position, resolving passes and game end immediately.
    pub fn from_position(config: SessionConfig, board: Board, to_move: Player) -> Self {
        let mut session = Self {
            board,
            to_move,
            human: config.human,
            ai_side: config.human.opponent(),
            ai: OthelloAI::with_config(config.search),
            state: SessionState::AwaitingHumanMove,
            history: Vec::new(),
            pending: None,
            outcome: None,
        };
        session.settle();
        session
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Player {
        self.to_move
    }

    pub fn human(&self) -> Player {
        self.human
    }

    pub fn ai(&self) -> Player {
        self.ai_side
    }

    /// Legal moves for the side to move, for highlighting.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.state == SessionState::GameOver {
            return Vec::new();
        }
        self.board.legal_moves(self.to_move)
    }

    /// Disc counts as (black, white).
    pub fn score(&self) -> (u32, u32) {
        self.board.score()
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Time left before the in-flight search falls back to its best-so-far.
    pub fn time_remaining(&self) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|pending| pending.deadline.saturating_duration_since(Instant::now()))
    }

    pub fn submit_human_move(&mut self, mv: Move) -> Result<(), SessionError> {
        match self.state {
            SessionState::GameOver => return Err(SessionError::GameOver),
            SessionState::AiSearchInFlight => return Err(SessionError::SearchInFlight),
            SessionState::AwaitingHumanMove => {}
        }
        if self.to_move != self.human {
            return Err(SessionError::NotHumanTurn);
        }

        let mut next = self.board;
        let undo = next.apply_move(mv, self.human)?;

        self.history.push(self.snapshot());
        self.board = next;
        info!("{} (human) plays {} flipping {}", self.human, mv, undo.flip_count());

        self.to_move = self.human.opponent();
        self.settle();
        Ok(())
    }

    /// Applies the AI's move once its search has finished. Call once per host tick.
    ///
    /// Returns the move played, if any.
    pub fn poll_search(&mut self) -> Option<Move> {
        let pending = self.pending.as_mut()?;
        let result = block_on(poll_once(&mut pending.task))?;
        self.pending = None;

        let side = self.ai_side;
        let Some(mv) = resolve_move(&result, &self.board, side) else {
            warn!("{} has no move to play", side);
            self.to_move = side.opponent();
            self.settle();
            return None;
        };

        let snapshot = self.snapshot();
        match self.board.apply_move(mv, side) {
            Ok(undo) => {
                self.history.push(snapshot);
                info!(
                    "{} (AI) plays {} flipping {} (score {}, {} nodes)",
                    side,
                    mv,
                    undo.flip_count(),
                    result.score,
                    result.nodes
                );
            }
            Err(err) => {
                warn!("discarding AI move {}: {}", mv, err);
                self.enter_turn();
                return None;
            }
        }

        self.to_move = side.opponent();
        self.settle();
        Some(mv)
    }

    /// Takes back the most recent move.
    ///
    /// An in-flight search is cancelled first, and this blocks until the
    /// search task has actually stopped.
    pub fn undo(&mut self) -> Result<(), SessionError> {
        if self.history.is_empty() {
            return Err(SessionError::NothingToUndo);
        }

        self.cancel_search();

        let Some(snapshot) = self.history.pop() else {
            return Err(SessionError::NothingToUndo);
        };
        self.board = snapshot.board;
        self.to_move = snapshot.to_move;
        self.outcome = None;
        info!("undo: {} to move, {} moves in history", self.to_move, self.history.len());

        self.enter_turn();
        Ok(())
    }

    fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board,
            to_move: self.to_move,
        }
    }

    // Applies pass and game-end rules for `to_move`, then starts that turn
    fn settle(&mut self) {
        if !self.board.has_legal_move(self.to_move) {
            let other = self.to_move.opponent();
            if !self.board.has_legal_move(other) {
                self.finish();
                return;
            }
            info!("{} has no legal move and passes", self.to_move);
            self.to_move = other;
        }
        self.enter_turn();
    }

    fn enter_turn(&mut self) {
        if self.to_move == self.ai_side {
            if let Err(err) = self.spawn_search() {
                warn!("could not start AI search: {}", err);
            }
        } else {
            self.state = SessionState::AwaitingHumanMove;
        }
    }

    fn finish(&mut self) {
        let (black, white) = self.board.score();
        let outcome = GameOutcome::from_counts(black, white);
        info!("game over: {} ({} - {})", outcome, black, white);
        self.outcome = Some(outcome);
        self.state = SessionState::GameOver;
    }

    fn spawn_search(&mut self) -> Result<(), SessionError> {
        if self.pending.is_some() {
            return Err(SessionError::SearchInFlight);
        }

        let stop = StopSignal::new();
        let deadline = self.ai.deadline_from_now();
        let search = self
            .ai
            .think(self.board, self.human, self.ai_side, deadline, stop.clone());
        let task = AsyncComputeTaskPool::get_or_init(TaskPool::default).spawn(search);
        debug!("AI search started for {}", self.ai_side);

        self.pending = Some(PendingSearch {
            task,
            stop,
            deadline,
        });
        self.state = SessionState::AiSearchInFlight;
        Ok(())
    }

    fn cancel_search(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        pending.stop.stop();
        // Wait for the task to acknowledge; whatever it produced is stale
        if block_on(pending.task.cancel()).is_some() {
            debug!("discarded a search result that finished during cancellation");
        }
        debug!("AI search cancelled");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.as_ref() {
            pending.stop.stop();
        }
    }
}
