use std::fmt;

use log::trace;

use crate::{Cell, GameError, Move, Player, Position, BOARD_SIZE};

const CELLS: usize = BOARD_SIZE as usize;

/// Final result once neither side can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOutcome {
    BlackWins,
    WhiteWins,
    Tie,
}

impl GameOutcome {
    pub fn from_counts(black: u32, white: u32) -> Self {
        if black > white {
            GameOutcome::BlackWins
        } else if white > black {
            GameOutcome::WhiteWins
        } else {
            GameOutcome::Tie
        }
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            GameOutcome::BlackWins => Some(Player::Black),
            GameOutcome::WhiteWins => Some(Player::White),
            GameOutcome::Tie => None,
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::BlackWins => write!(f, "Black wins"),
            GameOutcome::WhiteWins => write!(f, "White wins"),
            GameOutcome::Tie => write!(f, "Tie"),
        }
    }
}

/// Everything needed to take back one `apply_move`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Undo {
    pub placed: Position,
    pub player: Player,
    pub flipped: Vec<Position>,
}

impl Undo {
    pub fn flip_count(&self) -> usize {
        self.flipped.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Cell; CELLS]; CELLS],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The standard opening: White on d4/e5, Black on e4/d5.
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_initial_position();
        board
    }

    pub fn empty() -> Self {
        Self {
            cells: [[Cell::Empty; CELLS]; CELLS],
        }
    }

    pub fn setup_initial_position(&mut self) {
        self.cells = [[Cell::Empty; CELLS]; CELLS];
        self.cells[3][3] = Cell::White;
        self.cells[3][4] = Cell::Black;
        self.cells[4][3] = Cell::Black;
        self.cells[4][4] = Cell::White;
    }

    /// Builds a board from eight rows of `.`, `B` and `W`, top row first.
    pub fn from_rows(rows: &[&str; CELLS]) -> Result<Self, GameError> {
        let mut board = Self::empty();
        for (row, line) in rows.iter().enumerate() {
            let line = line.trim();
            if line.chars().count() != CELLS {
                return Err(GameError::MalformedRow { row, text: line.to_string() });
            }
            for (col, c) in line.chars().enumerate() {
                board.cells[row][col] = Cell::from_symbol(c)
                    .ok_or_else(|| GameError::MalformedRow { row, text: line.to_string() })?;
            }
        }
        Ok(board)
    }

    pub fn get(&self, pos: Position) -> Cell {
        let (row, col) = pos.index();
        self.cells[row][col]
    }

    pub fn set(&mut self, pos: Position, cell: Cell) {
        let (row, col) = pos.index();
        self.cells[row][col] = cell;
    }

    /// Legal placements for `player` in row-major order.
    pub fn legal_moves(&self, player: Player) -> Vec<Move> {
        Position::all()
            .map(Move::at)
            .filter(|mv| mv.is_valid(self, player))
            .collect()
    }

    pub fn has_legal_move(&self, player: Player) -> bool {
        Position::all().any(|pos| Move::at(pos).is_valid(self, player))
    }

    pub fn legal_move_count(&self, player: Player) -> usize {
        Position::all()
            .filter(|&pos| Move::at(pos).is_valid(self, player))
            .count()
    }

    pub fn is_legal(&self, mv: Move, player: Player) -> bool {
        mv.is_valid(self, player)
    }

    /// Places `player`'s disc and flips every captured run.
    ///
    /// Illegal moves are rejected and leave the board untouched.
    pub fn apply_move(&mut self, mv: Move, player: Player) -> Result<Undo, GameError> {
        let pos = mv.position;
        if !self.get(pos).is_empty() {
            return Err(GameError::Occupied(pos));
        }

        let flipped = mv.captures(self, player);
        if flipped.is_empty() {
            return Err(GameError::NoFlips(pos));
        }

        let disc = player.disc();
        self.set(pos, disc);
        for &captured in &flipped {
            self.set(captured, disc);
        }
        trace!("{} plays {} flipping {}", player, pos, flipped.len());

        Ok(Undo {
            placed: pos,
            player,
            flipped,
        })
    }

    /// Reverses an `apply_move` that returned `undo`. Must be the most recent one.
    pub fn unmake_move(&mut self, undo: &Undo) {
        let opponent = undo.player.opponent().disc();
        for &pos in &undo.flipped {
            self.set(pos, opponent);
        }
        self.set(undo.placed, Cell::Empty);
    }

    /// Disc counts as (black, white).
    pub fn score(&self) -> (u32, u32) {
        self.cells
            .iter()
            .flatten()
            .fold((0, 0), |(black, white), cell| match cell {
                Cell::Black => (black + 1, white),
                Cell::White => (black, white + 1),
                Cell::Empty => (black, white),
            })
    }

    pub fn count(&self, player: Player) -> u32 {
        let disc = player.disc();
        self.cells.iter().flatten().filter(|&&cell| cell == disc).count() as u32
    }

    pub fn disc_count(&self) -> u32 {
        let (black, white) = self.score();
        black + white
    }

    pub fn is_full(&self) -> bool {
        self.disc_count() == (CELLS * CELLS) as u32
    }

    /// `Some` once neither side has a legal move.
    pub fn outcome(&self) -> Option<GameOutcome> {
        if self.has_legal_move(Player::Black) || self.has_legal_move(Player::White) {
            return None;
        }
        let (black, white) = self.score();
        Some(GameOutcome::from_counts(black, white))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.iter() {
            let line: String = row.iter().map(|cell| cell.symbol()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
