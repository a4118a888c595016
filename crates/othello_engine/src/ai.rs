use std::future::Future;
use std::time::{Duration, Instant};

use log::warn;
use othello_core::{Board, Move, Player};

use crate::search::{search_until, SearchConfig, SearchResult, StopSignal, MAX_DEPTH, MIN_DEPTH};

/// The computer opponent: a search configuration plus the move-selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OthelloAI {
    config: SearchConfig,
}

impl OthelloAI {
    pub fn new(depth: u8) -> Self {
        OthelloAI {
            config: SearchConfig::with_depth(depth),
        }
    }

    pub fn with_config(config: SearchConfig) -> Self {
        OthelloAI {
            config: SearchConfig {
                depth: config.depth.clamp(MIN_DEPTH, MAX_DEPTH),
                ..config
            },
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn set_max_time(&mut self, duration: Duration) {
        self.config.time_limit = duration;
    }

    pub fn set_depth(&mut self, depth: u8) {
        self.config.depth = depth.clamp(MIN_DEPTH, MAX_DEPTH);
    }

    /// Deadline for a search that starts now.
    pub fn deadline_from_now(&self) -> Instant {
        Instant::now() + self.config.time_limit
    }

    /// Builds a self-contained search future over its own copy of `board`,
    /// suitable for spawning on a task pool.
    pub fn think(
        &self,
        board: Board,
        human: Player,
        ai: Player,
        deadline: Instant,
        stop: StopSignal,
    ) -> impl Future<Output = SearchResult> + Send + 'static {
        let config = self.config;
        async move { search_until(&board, human, ai, &config, deadline, Some(stop)).await }
    }
}

impl Default for OthelloAI {
    fn default() -> Self {
        OthelloAI {
            config: SearchConfig::default(),
        }
    }
}

/// The move `side` should play given a finished search.
///
/// Falls back to the first legal move in row-major order when the search
/// produced nothing usable, so a side with a legal move always gets one.
pub fn resolve_move(result: &SearchResult, board: &Board, side: Player) -> Option<Move> {
    if result.timed_out {
        warn!(
            "search for {} timed out after {} nodes, best so far {:?}",
            side, result.nodes, result.best_move
        );
    }

    if let Some(mv) = result.best_move {
        if board.is_legal(mv, side) {
            return Some(mv);
        }
        warn!("search returned {} which is not legal for {}", mv, side);
    }

    let fallback = board.legal_moves(side).into_iter().next();
    if let Some(mv) = fallback {
        warn!("no usable search move for {}, falling back to {}", side, mv);
    }
    fallback
}
