use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("({row}, {col}) is off the board")]
    OutOfBounds { row: u8, col: u8 },
    #[error("{0} is already occupied")]
    Occupied(Position),
    #[error("{0} does not flip any disc")]
    NoFlips(Position),
    #[error("row {row} is not eight cells of '.', 'B' or 'W': {text:?}")]
    MalformedRow { row: usize, text: String },
}
