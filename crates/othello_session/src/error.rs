use othello_core::GameError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("the game is over")]
    GameOver,
    #[error("the AI is still thinking")]
    SearchInFlight,
    #[error("it is not the human player's turn")]
    NotHumanTurn,
    #[error("no move to undo")]
    NothingToUndo,
    #[error("illegal move: {0}")]
    IllegalMove(#[from] GameError),
}
