use std::fmt;

use crate::{Board, GameError, Player, Position};

/// The eight ray directions as (row step, column step).
pub const DIRECTIONS: [(i8, i8); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Placing a disc on `position`. Whose disc it is comes from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    pub position: Position,
}

impl Move {
    pub fn new(row: u8, col: u8) -> Option<Self> {
        Position::new(row, col).map(Self::at)
    }

    pub fn at(position: Position) -> Self {
        Self { position }
    }

    pub fn from_algebraic(notation: &str) -> Option<Self> {
        Position::from_algebraic(notation).map(Self::at)
    }

    pub fn row(&self) -> u8 {
        self.position.row
    }

    pub fn col(&self) -> u8 {
        self.position.col
    }

    /// A move is valid if the cell is empty and at least one ray captures.
    pub fn is_valid(&self, board: &Board, player: Player) -> bool {
        board.get(self.position).is_empty()
            && DIRECTIONS
                .iter()
                .any(|&dir| run_length(board, self.position, player, dir) > 0)
    }

    /// Every opponent disc this move would flip, ray by ray in `DIRECTIONS` order.
    /// Empty when the move is illegal.
    pub fn captures(&self, board: &Board, player: Player) -> Vec<Position> {
        let mut flipped = Vec::new();
        if !board.get(self.position).is_empty() {
            return flipped;
        }

        for &(dr, dc) in DIRECTIONS.iter() {
            let run = run_length(board, self.position, player, (dr, dc));
            let mut pos = self.position;
            for _ in 0..run {
                match pos.offset(dr, dc) {
                    Some(next) => {
                        flipped.push(next);
                        pos = next;
                    }
                    None => break,
                }
            }
        }

        flipped
    }
}

impl From<Position> for Move {
    fn from(position: Position) -> Self {
        Self::at(position)
    }
}

impl TryFrom<(u8, u8)> for Move {
    type Error = GameError;

    fn try_from((row, col): (u8, u8)) -> Result<Self, Self::Error> {
        Move::new(row, col).ok_or(GameError::OutOfBounds { row, col })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.position, f)
    }
}

/// Length of the opponent run starting next to `from` in direction `dir`,
/// if that run is closed by one of `player`'s discs; 0 otherwise.
fn run_length(board: &Board, from: Position, player: Player, (dr, dc): (i8, i8)) -> usize {
    let own = player.disc();
    let opponent = player.opponent().disc();

    let mut run = 0;
    let mut cursor = from.offset(dr, dc);
    while let Some(pos) = cursor {
        let cell = board.get(pos);
        if cell == opponent {
            run += 1;
            cursor = pos.offset(dr, dc);
        } else if cell == own {
            return run;
        } else {
            return 0;
        }
    }

    // Ran off the board without closing the run.
    0
}
