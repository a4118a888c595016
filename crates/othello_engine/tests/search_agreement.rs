//! Alpha-beta must agree with exhaustive minimax on score and chosen move.

use futures_lite::future::block_on;
use othello_core::{Board, Player};
use othello_engine::{minimax, search, EvalWeights, FeatureWeights, SearchConfig};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Plays `plies` random moves from the opening, passing when stuck.
fn random_position(seed: u64, plies: usize) -> (Board, Player) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut board = Board::new();
    let mut to_move = Player::Black;

    for _ in 0..plies {
        let moves = board.legal_moves(to_move);
        match moves.choose(&mut rng) {
            Some(&mv) => {
                board.apply_move(mv, to_move).unwrap();
            }
            None if !board.has_legal_move(to_move.opponent()) => break,
            None => {}
        }
        to_move = to_move.opponent();
    }
    (board, to_move)
}

fn assert_agree(board: &Board, ai: Player, config: &SearchConfig) {
    let pruned = block_on(search(board, ai.opponent(), ai, config));
    let full = minimax(board, ai.opponent(), ai, config.depth, &config.weights);
    assert!(!pruned.timed_out);
    assert_eq!(
        (pruned.score, pruned.best_move),
        (full.score, full.best_move),
        "depth {} for {ai}\n{board}",
        config.depth
    );
}

#[test]
fn agrees_on_random_midgame_positions() {
    let config = SearchConfig {
        depth: 3,
        ..SearchConfig::default()
    };
    for seed in 0..12 {
        let (board, to_move) = random_position(seed, 10 + seed as usize * 3);
        assert_agree(&board, to_move, &config);
    }
}

#[test]
fn agrees_near_the_end_of_the_game() {
    let config = SearchConfig {
        depth: 4,
        ..SearchConfig::default()
    };
    for seed in 50..54 {
        let (board, to_move) = random_position(seed, 52);
        assert_agree(&board, to_move, &config);
    }
}

#[test]
fn agrees_with_flat_material_weights() {
    // Many ties: exercises the first-found tie-break on both sides.
    let config = SearchConfig {
        depth: 3,
        weights: EvalWeights::uniform(FeatureWeights {
            material: 1,
            mobility: 0,
            corners: 0,
            edges: 0,
            near_corner_penalty: 0,
        }),
        ..SearchConfig::default()
    };
    for seed in 20..26 {
        let (board, to_move) = random_position(seed, 8);
        assert_agree(&board, to_move, &config);
    }
}
