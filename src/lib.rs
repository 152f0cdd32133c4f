//! A Minesweeper game engine.
//!
//! The engine is a pure state machine: [`initialize_game`] creates a fresh [`GameState`] and [`update_game`] applies a
//! single player [`Action`] to a state, returning a new one. The input state is never modified, so a frontend only
//! has to hold on to the latest returned value.
//!
//! ```
//! use sweeper::{initialize_game, update_game, Action, GameStatus};
//!
//! let state = initialize_game(10)?;
//! let state = update_game(&state, Action::OpenCell((4, 4)))?;
//!
//! // the first opened cell is never a mine
//! assert_ne!(state.status(), GameStatus::Lose);
//! # Ok::<(), sweeper::GameError>(())
//! ```

mod error;
pub mod field;

pub use error::{GameError, Result};

use field::cell::CellContent;
use field::{Board, Position};
use log::{debug, info, trace};
use rand::Rng;
use std::collections::HashSet;

/// The status of a game.
///
/// The status only ever moves forward: `Unstarted → Ongoing → Win | Lose`. A board that gets fully solved by the very
/// first reveal goes straight from `Unstarted` to `Win`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum GameStatus {
    /// The board has been created, but no cell has been opened yet, so there are no mines either.
    #[default]
    Unstarted,
    /// An ongoing game.
    Ongoing,
    /// Every safe cell is open and every mine is flagged.
    Win,
    /// A mine has been opened.
    Lose,
}

impl GameStatus {
    /// Checks whether the game has ended. No action has any effect on a finished game.
    pub fn is_finished(&self) -> bool {
        matches!(self, GameStatus::Win | GameStatus::Lose)
    }

    /// The message a frontend shows to the player for the status.
    pub fn message(&self) -> &'static str {
        match self {
            GameStatus::Unstarted => "Open any cell to start the game",
            GameStatus::Ongoing => "Flag every mine and open every other cell",
            GameStatus::Win => "You won! Congratulations!",
            GameStatus::Lose => "You lost... Wanna try again?",
        }
    }
}

/// Describes all the possible actions a player can take.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Action {
    /// A request to open a cell by its position. This is the primary interaction (a left click).
    OpenCell(Position),
    /// A request to toggle the flag of a cell by its position. This is the secondary interaction (a right click or a
    /// long press).
    PlaceFlag(Position),
}

impl Action {
    /// Returns the position of the cell the action targets.
    pub fn position(&self) -> Position {
        match self {
            Action::OpenCell(position) | Action::PlaceFlag(position) => *position,
        }
    }
}

/// A snapshot of a game: the board as the player sees it, where the mines are and the game's status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub(crate) board: Board,
    /// Empty until the first cell gets opened and never changed after that.
    pub(crate) mine_positions: Vec<Position>,
    pub(crate) status: GameStatus,
}

impl GameState {
    /// Assembles a state out of explicitly provided parts. Useful to resume a game or to set up a particular position.
    ///
    /// Fails if a mine lies beyond the board ([`GameError::InvalidPosition`]), if a mine is listed twice
    /// ([`GameError::DuplicateMine`]) or if an unstarted game already has mines ([`GameError::MinesBeforeStart`]).
    pub fn from_parts(board: Board, mine_positions: Vec<Position>, status: GameStatus) -> Result<Self> {
        if status == GameStatus::Unstarted && !mine_positions.is_empty() {
            return Err(GameError::MinesBeforeStart);
        }

        let mut seen = HashSet::with_capacity(mine_positions.len());
        for &position in &mine_positions {
            if !board.contains(position) {
                return Err(GameError::InvalidPosition(position));
            }
            if !seen.insert(position) {
                return Err(GameError::DuplicateMine(position));
            }
        }

        Ok(GameState {
            board,
            mine_positions,
            status,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn mine_positions(&self) -> &[Position] {
        &self.mine_positions
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns the board's height and width.
    pub fn dimensions(&self) -> (u8, u8) {
        self.board.dimensions()
    }

    /// Returns the content of a cell by its position or [`None`] if there's no cell at the given position.
    pub fn cell(&self, position: Position) -> Option<CellContent> {
        self.board.get(position)
    }

    /// The total number of the currently flagged cells.
    pub fn flag_count(&self) -> usize {
        self.board.count(CellContent::Flag)
    }

    /// The number of mines hidden in the board. Before the game starts, that's the number of mines that will be placed
    /// by the first reveal.
    pub fn mine_count(&self) -> usize {
        match self.status {
            GameStatus::Unstarted => field::mine_count_for(self.dimensions()) as usize,
            _ => self.mine_positions.len(),
        }
    }
}

/// Creates a new game with a `size × size` board of closed cells.
///
/// No mines are placed yet: that happens on the first [`Action::OpenCell`], so the first opened cell is always safe.
///
/// Fails with [`GameError::InvalidSize`] if `size` is 0.
pub fn initialize_game(size: u8) -> Result<GameState> {
    if size == 0 {
        return Err(GameError::InvalidSize);
    }

    Ok(GameState {
        board: Board::new(size),
        mine_positions: Vec::new(),
        status: GameStatus::Unstarted,
    })
}

/// Applies the action to the state and returns the resulting state. Mines, if it's time to place them, are drawn from
/// the thread-local random generator.
///
/// See [`update_game_with_rng`] for the details.
pub fn update_game(state: &GameState, action: Action) -> Result<GameState> {
    update_game_with_rng(state, action, &mut rand::thread_rng())
}

/// Applies the action to the state and returns the resulting state, drawing the mines from the provided generator.
///
/// - [`Action::OpenCell`] on a finished game changes nothing. Opening a mine loses the game and reveals all the
///   mines. Opening the first cell of an unstarted game places the mines anywhere but on that cell and starts the
///   game. Otherwise the cell is revealed along with every safe region connected to it.
/// - [`Action::PlaceFlag`] only has an effect on an ongoing game, where it toggles the flag of a closed cell. Revealed
///   cells can't be flagged.
///
/// The win condition is checked after every action, whichever it is.
///
/// Fails with [`GameError::InvalidPosition`] if the action targets a cell beyond the board. The passed state is never
/// modified.
pub fn update_game_with_rng<R: Rng>(state: &GameState, action: Action, rng: &mut R) -> Result<GameState> {
    let position = action.position();
    if !state.board.contains(position) {
        return Err(GameError::InvalidPosition(position));
    }

    let mut next = state.clone();

    match action {
        Action::OpenCell(position) => {
            if next.status.is_finished() {
                trace!("ignoring {action:?}: the game has already ended");
                return Ok(next);
            }

            if next.mine_positions.contains(&position) {
                for &mine in &next.mine_positions {
                    next.board[mine] = CellContent::Mine;
                }
                next.status = GameStatus::Lose;
                info!("mine opened at {position:?}, the game is lost");
                return Ok(next);
            }

            if next.status == GameStatus::Unstarted {
                let dimensions = next.dimensions();
                let count = field::mine_count_for(dimensions);
                next.mine_positions = field::random_mine_positions(dimensions, count, &[position], rng)?;
                next.status = GameStatus::Ongoing;
                debug!("placed {count} mines on a {dimensions:?} board, excepting {position:?}");
            }

            next.board = field::expand_cell(&next, position);
        }
        Action::PlaceFlag(position) => {
            if next.status != GameStatus::Ongoing {
                trace!("ignoring {action:?}: the game is not ongoing");
                return Ok(next);
            }

            next.board[position] = next.board[position].toggled_flag();
        }
    }

    if is_game_won(&next) {
        next.status = GameStatus::Win;
        info!("the game is won");
    }

    Ok(next)
}

/// Checks the win condition: no cell is left closed and every mine is flagged.
pub fn is_game_won(state: &GameState) -> bool {
    state.board.count(CellContent::Unopened) == 0
        && state
            .mine_positions
            .iter()
            .all(|&mine| state.board[mine] == CellContent::Flag)
}
