use crate::field::Position;
use thiserror::Error;

/// Everything that can go wrong when creating or driving a game.
///
/// Note that ignored actions (opening a cell after the game has ended, flagging before it has started) are not errors:
/// such actions simply leave the state as is.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    /// A board must have at least one cell.
    #[error("board size must be at least 1")]
    InvalidSize,
    /// The action targets a cell that is beyond the board's bounds.
    #[error("position {0:?} is outside of the board")]
    InvalidPosition(Position),
    /// The provided rows are empty or of different lengths.
    #[error("board rows do not form a rectangular grid")]
    InvalidBoardShape,
    /// More mines were requested than there are cells available for them.
    #[error("cannot place {requested} mines, only {available} cells are available")]
    TooManyMines { requested: u16, available: u16 },
    /// The same mine position is listed twice.
    #[error("mine at {0:?} is listed more than once")]
    DuplicateMine(Position),
    /// Mines are only ever placed by the first opened cell.
    #[error("an unstarted game cannot have mines")]
    MinesBeforeStart,
}

pub type Result<T> = std::result::Result<T, GameError>;
