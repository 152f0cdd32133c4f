use std::fmt::{Display, Formatter};

/// The content of a single cell of the board, as the player sees it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum CellContent {
    /// A closed cell. It may or may not conceal a mine.
    #[default]
    Unopened,
    /// A closed cell the player has marked as a suspected mine.
    Flag,
    /// A revealed mine. Only ever shown once the game is lost.
    Mine,
    /// A revealed safe cell.
    ///
    /// The value is the amount of mines among the (up to) 8 adjacent cells.
    Revealed(u8),
}

impl CellContent {
    /// Checks whether the cell is still closed and not flagged.
    pub fn is_unopened(&self) -> bool {
        *self == CellContent::Unopened
    }

    /// Checks whether the cell is flagged.
    pub fn is_flagged(&self) -> bool {
        *self == CellContent::Flag
    }

    /// Checks whether the cell has been revealed (either as a number or as a mine).
    pub fn is_revealed(&self) -> bool {
        matches!(self, CellContent::Revealed(_) | CellContent::Mine)
    }

    /// Returns the amount of mines around the cell, or `None` if the cell hasn't been revealed as a number.
    pub fn get_mines_around_amount(&self) -> Option<u8> {
        if let CellContent::Revealed(mines_around_amount) = self {
            Some(*mines_around_amount)
        } else {
            None
        }
    }

    /// Returns the content the cell takes after its flag is toggled.
    ///
    /// Only closed cells can be flagged or un-flagged. Revealed cells are returned as is.
    pub fn toggled_flag(self) -> Self {
        match self {
            CellContent::Unopened => CellContent::Flag,
            CellContent::Flag => CellContent::Unopened,
            other => other,
        }
    }
}

/// The `Display` implementation renders the cell's glyph. Closed cells and cells with no mines around are blank, so
/// the frontends are expected to tell them apart with styling.
impl Display for CellContent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CellContent::Unopened => write!(f, " "),
            CellContent::Flag => write!(f, "🚩"),
            CellContent::Mine => write!(f, "💣"),
            CellContent::Revealed(0) => write!(f, " "),
            CellContent::Revealed(n) => write!(f, "{n}"),
        }
    }
}
