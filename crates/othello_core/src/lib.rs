// Othello rules: board representation, move generation, flipping
pub mod board;
pub mod disc;
pub mod error;
pub mod moves;
pub mod position;

// Re-export main types for convenience
pub use board::{Board, GameOutcome, Undo};
pub use disc::{Cell, Player};
pub use error::GameError;
pub use moves::{Move, DIRECTIONS};
pub use position::{Position, BOARD_SIZE};
