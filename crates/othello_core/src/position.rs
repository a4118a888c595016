use std::fmt;

pub const BOARD_SIZE: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: u8, // 0-7, top to bottom
    pub col: u8, // 0-7, a-h
}

impl Position {
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Parses "d3"-style notation: column letter a-h, row digit 1-8.
    pub fn from_algebraic(notation: &str) -> Option<Self> {
        let mut chars = notation.chars();
        let (Some(col), Some(row), None) = (chars.next(), chars.next(), chars.next()) else {
            return None;
        };

        let col = col.to_ascii_lowercase();
        if !('a'..='h').contains(&col) || !('1'..='8').contains(&row) {
            return None;
        }

        Some(Self {
            row: (row as u8) - b'1',
            col: (col as u8) - b'a',
        })
    }

    /// Steps one cell in direction `(dr, dc)`, or `None` off the board.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if (0..BOARD_SIZE as i8).contains(&row) && (0..BOARD_SIZE as i8).contains(&col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// All 64 cells in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Position { row, col }))
    }

    pub(crate) fn index(self) -> (usize, usize) {
        (self.row as usize, self.col as usize)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col) as char, self.row + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algebraic_notation_round_trips() {
        let d3 = Position::from_algebraic("d3").unwrap();
        assert_eq!(d3, Position { row: 2, col: 3 });
        assert_eq!(d3.to_string(), "d3");
        assert_eq!(Position::from_algebraic("H8"), Position::new(7, 7));
    }

    #[test]
    fn rejects_bad_notation() {
        assert_eq!(Position::from_algebraic("i1"), None);
        assert_eq!(Position::from_algebraic("a9"), None);
        assert_eq!(Position::from_algebraic("a10"), None);
        assert_eq!(Position::from_algebraic(""), None);
        assert_eq!(Position::new(8, 0), None);
    }

    #[test]
    fn offset_stays_on_board() {
        let corner = Position::new(0, 0).unwrap();
        assert_eq!(corner.offset(-1, 0), None);
        assert_eq!(corner.offset(1, 1), Position::new(1, 1));
    }

    #[test]
    fn all_is_row_major() {
        let cells: Vec<_> = Position::all().take(9).collect();
        assert_eq!(cells[7], Position { row: 0, col: 7 });
        assert_eq!(cells[8], Position { row: 1, col: 0 });
        assert_eq!(Position::all().count(), 64);
    }
}
