// Depth-limited minimax with alpha-beta pruning, time-boxed and cooperatively cancellable
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_lite::future::yield_now;
use log::debug;
use othello_core::{Board, Move, Player};
use rayon::prelude::*;

use crate::evaluation::{evaluate_position, EvalWeights};

// Search parameters
pub const DEFAULT_DEPTH: u8 = 4; // Plies searched before leaf evaluation
pub const MIN_DEPTH: u8 = 1;
pub const MAX_DEPTH: u8 = 12;
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(30);
pub const DEFAULT_YIELD_INTERVAL: u64 = 1000; // Nodes expanded between yields to the executor

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub depth: u8,
    pub time_limit: Duration,
    pub yield_interval: u64,
    pub weights: EvalWeights,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            time_limit: DEFAULT_TIME_LIMIT,
            yield_interval: DEFAULT_YIELD_INTERVAL,
            weights: EvalWeights::default(),
        }
    }
}

impl SearchConfig {
    pub fn with_depth(depth: u8) -> Self {
        Self {
            depth: depth.clamp(MIN_DEPTH, MAX_DEPTH),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub score: i32,
    /// `None` when the AI had no legal move or the search could not finish one branch.
    pub best_move: Option<Move>,
    pub timed_out: bool,
    pub nodes: u64,
}

/// Shared flag asking a running search to stop at its next node.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

// What one node reports to its parent
#[derive(Debug, Clone, Copy)]
struct Node {
    score: i32,
    best_move: Option<Move>,
    timed_out: bool,
}

impl Node {
    fn leaf(score: i32) -> Self {
        Self {
            score,
            best_move: None,
            timed_out: false,
        }
    }

    fn expired() -> Self {
        Self {
            score: 0,
            best_move: None,
            timed_out: true,
        }
    }
}

// State for one top-level search; never shared between searches
struct SearchContext {
    ai: Player,
    human: Player,
    weights: EvalWeights,
    deadline: Instant,
    yield_interval: u64,
    nodes: u64,
    stop: Option<StopSignal>,
}

impl SearchContext {
    fn should_stop(&self) -> bool {
        Instant::now() >= self.deadline
            || self.stop.as_ref().map_or(false, StopSignal::is_stopped)
    }
}

type NodeFuture<'a> = Pin<Box<dyn Future<Output = Node> + Send + 'a>>;

/// Searches `board` for the AI's best move with the configured depth and time limit.
pub async fn search(board: &Board, human: Player, ai: Player, config: &SearchConfig) -> SearchResult {
    let deadline = Instant::now() + config.time_limit;
    search_until(board, human, ai, config, deadline, None).await
}

/// Like [`search`] but against an explicit deadline, optionally watching `stop`.
///
/// The board is copied once; the caller's board is never touched.
pub async fn search_until(
    board: &Board,
    human: Player,
    ai: Player,
    config: &SearchConfig,
    deadline: Instant,
    stop: Option<StopSignal>,
) -> SearchResult {
    if !board.has_legal_move(ai) {
        return SearchResult {
            score: evaluate_position(board, ai, &config.weights),
            best_move: None,
            timed_out: false,
            nodes: 0,
        };
    }

    let start_time = Instant::now();
    let mut ctx = SearchContext {
        ai,
        human,
        weights: config.weights,
        deadline,
        yield_interval: config.yield_interval.max(1),
        nodes: 0,
        stop,
    };
    let mut scratch = *board;

    let root = alpha_beta(&mut ctx, &mut scratch, config.depth, true, i32::MIN, i32::MAX).await;

    debug!(
        "search depth {} finished in {:?}: {} nodes, score {}, move {:?}, timed out {}",
        config.depth,
        start_time.elapsed(),
        ctx.nodes,
        root.score,
        root.best_move,
        root.timed_out
    );

    SearchResult {
        score: root.score,
        best_move: root.best_move,
        timed_out: root.timed_out,
        nodes: ctx.nodes,
    }
}

fn alpha_beta<'a>(
    ctx: &'a mut SearchContext,
    board: &'a mut Board,
    depth: u8,
    maximizing: bool,
    mut alpha: i32,
    mut beta: i32,
) -> NodeFuture<'a> {
    Box::pin(async move {
        ctx.nodes += 1;
        if ctx.nodes % ctx.yield_interval == 0 {
            yield_now().await;
        }
        if ctx.should_stop() {
            return Node::expired();
        }

        if depth == 0 {
            return Node::leaf(evaluate_position(board, ctx.ai, &ctx.weights));
        }

        let mover = if maximizing { ctx.ai } else { ctx.human };
        let moves = board.legal_moves(mover);
        if moves.is_empty() {
            return Node::leaf(evaluate_position(board, ctx.ai, &ctx.weights));
        }

        let mut best_score = if maximizing { i32::MIN } else { i32::MAX };
        let mut best_move = None;
        let mut timed_out = false;

        for mv in moves {
            let Ok(undo) = board.apply_move(mv, mover) else {
                continue;
            };
            let child = alpha_beta(&mut *ctx, &mut *board, depth - 1, !maximizing, alpha, beta).await;
            board.unmake_move(&undo);

            // Placeholder scores from an expired child are never compared
            if child.timed_out {
                timed_out = true;
                break;
            }

            // Strict comparisons: the first move found keeps ties
            if maximizing {
                if child.score > best_score {
                    best_score = child.score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(child.score);
            } else {
                if child.score < best_score {
                    best_score = child.score;
                    best_move = Some(mv);
                }
                beta = beta.min(child.score);
            }

            if beta <= alpha {
                break;
            }
        }

        Node {
            score: if best_move.is_some() { best_score } else { 0 },
            best_move,
            timed_out,
        }
    })
}

/// Plain minimax without pruning or time limit.
///
/// Root moves are scored in parallel; the winner is picked in row-major order
/// with the same tie-break as [`search`], so both agree on score and move.
pub fn minimax(
    board: &Board,
    human: Player,
    ai: Player,
    depth: u8,
    weights: &EvalWeights,
) -> SearchResult {
    let moves = board.legal_moves(ai);
    if depth == 0 || moves.is_empty() {
        return SearchResult {
            score: evaluate_position(board, ai, weights),
            best_move: None,
            timed_out: false,
            nodes: 1,
        };
    }

    let scored: Vec<(Move, i32, u64)> = moves
        .par_iter()
        .filter_map(|&mv| {
            let mut child = *board;
            child.apply_move(mv, ai).ok()?;
            let mut nodes = 0;
            let score = minimax_node(&mut child, depth - 1, false, human, ai, weights, &mut nodes);
            Some((mv, score, nodes))
        })
        .collect();

    let mut result = SearchResult {
        score: i32::MIN,
        best_move: None,
        timed_out: false,
        nodes: 1,
    };
    for (mv, score, nodes) in scored {
        result.nodes += nodes;
        if score > result.score {
            result.score = score;
            result.best_move = Some(mv);
        }
    }
    result
}

fn minimax_node(
    board: &mut Board,
    depth: u8,
    maximizing: bool,
    human: Player,
    ai: Player,
    weights: &EvalWeights,
    nodes: &mut u64,
) -> i32 {
    *nodes += 1;
    if depth == 0 {
        return evaluate_position(board, ai, weights);
    }

    let mover = if maximizing { ai } else { human };
    let moves = board.legal_moves(mover);
    if moves.is_empty() {
        return evaluate_position(board, ai, weights);
    }

    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for mv in moves {
        let Ok(undo) = board.apply_move(mv, mover) else {
            continue;
        };
        let score = minimax_node(board, depth - 1, !maximizing, human, ai, weights, nodes);
        board.unmake_move(&undo);
        best = if maximizing { best.max(score) } else { best.min(score) };
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_lite::future::{block_on, poll_once};

    fn config(depth: u8) -> SearchConfig {
        SearchConfig {
            depth,
            ..SearchConfig::default()
        }
    }

    #[test]
    fn finds_a_legal_opening_move() {
        let board = Board::new();
        let result = block_on(search(&board, Player::White, Player::Black, &config(4)));
        assert!(!result.timed_out);
        let mv = result.best_move.expect("a move");
        assert!(board.legal_moves(Player::Black).contains(&mv));
        assert!(result.nodes > 1);
    }

    #[test]
    fn expired_deadline_times_out_without_move() {
        let board = Board::new();
        let result = block_on(search_until(
            &board,
            Player::White,
            Player::Black,
            &config(4),
            Instant::now(),
            None,
        ));
        assert!(result.timed_out);
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn stop_signal_aborts_like_a_timeout() {
        let stop = StopSignal::new();
        stop.stop();
        let result = block_on(search_until(
            &Board::new(),
            Player::White,
            Player::Black,
            &config(6),
            Instant::now() + Duration::from_secs(30),
            Some(stop),
        ));
        assert!(result.timed_out);
        assert_eq!(result.best_move, None);
    }

    #[test]
    fn stopping_mid_search_keeps_the_best_finished_root_move() {
        let board = Board::new();
        let mut cfg = config(2);
        // Every node yields once, so each poll advances exactly one node
        cfg.yield_interval = 1;
        let stop = StopSignal::new();
        let mut running = Box::pin(search_until(
            &board,
            Player::White,
            Player::Black,
            &cfg,
            Instant::now() + Duration::from_secs(30),
            Some(stop.clone()),
        ));

        // Root, d3, and White's three replies to d3 take six polls; by the
        // eighth the second root move is underway.
        for poll in 0..8 {
            assert!(
                block_on(poll_once(&mut running)).is_none(),
                "search finished early at poll {poll}"
            );
        }
        stop.stop();
        let result = block_on(running);

        assert!(result.timed_out);
        let mv = result.best_move.expect("first root move was finished");
        assert!(board.legal_moves(Player::Black).contains(&mv));
        assert_eq!(mv, Move::new(2, 3).unwrap());
        assert!(result.nodes < minimax(&board, Player::White, Player::Black, 2, &cfg.weights).nodes);
    }

    #[test]
    fn running_search_notices_the_stop_signal() {
        let stop = StopSignal::new();
        let remote = stop.clone();
        let worker = std::thread::spawn(move || {
            block_on(search_until(
                &Board::new(),
                Player::White,
                Player::Black,
                &config(MAX_DEPTH),
                Instant::now() + Duration::from_secs(60),
                Some(remote),
            ))
        });

        std::thread::sleep(Duration::from_millis(50));
        let stopped_at = Instant::now();
        stop.stop();
        let result = worker.join().unwrap();

        assert!(result.timed_out);
        assert!(result.nodes > 0);
        assert!(stopped_at.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn no_legal_move_at_root_returns_evaluation() {
        let board = Board::from_rows(&[
            "BBBBBBBB",
            "........",
            "........",
            "........",
            "........",
            "........",
            "........",
            "........",
        ])
        .unwrap();
        let cfg = config(4);
        let result = block_on(search(&board, Player::Black, Player::White, &cfg));
        assert_eq!(result.best_move, None);
        assert!(!result.timed_out);
        assert_eq!(result.score, evaluate_position(&board, Player::White, &cfg.weights));
    }

    #[test]
    fn yielding_does_not_change_the_result() {
        let board = Board::new();
        let mut every_node = config(4);
        every_node.yield_interval = 1;
        let mut rarely = config(4);
        rarely.yield_interval = u64::MAX;

        let a = block_on(search(&board, Player::White, Player::Black, &every_node));
        let b = block_on(search(&board, Player::White, Player::Black, &rarely));
        assert_eq!((a.score, a.best_move), (b.score, b.best_move));
    }

    #[test]
    fn pruning_matches_plain_minimax_from_the_start() {
        let board = Board::new();
        for depth in 1..=4 {
            let cfg = config(depth);
            let pruned = block_on(search(&board, Player::White, Player::Black, &cfg));
            let full = minimax(&board, Player::White, Player::Black, depth, &cfg.weights);
            assert_eq!((pruned.score, pruned.best_move), (full.score, full.best_move), "depth {depth}");
            assert!(pruned.nodes <= full.nodes);
        }
    }

    #[test]
    fn caller_board_is_untouched() {
        let board = Board::new();
        let copy = board;
        let _ = block_on(search(&board, Player::White, Player::Black, &config(3)));
        assert_eq!(board, copy);
    }
}
