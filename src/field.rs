pub mod cell;

use crate::{GameError, GameState, Result};
use cell::CellContent;
use rand::Rng;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::ops::{Index, IndexMut};

/// A cell's position on the board: `(row_index, column_index)`, both 0-based.
pub type Position = (u8, u8);

/// One in five cells of a board conceals a mine.
const CELLS_PER_MINE: u16 = 5;

/// The board representation.
///
/// The board is a grid (a 2D vector) of cell contents, where the top level represents rows and the nested vector of each
/// row represents the cells of that row. Games always start on a square board, but nothing in the algorithms below
/// relies on that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: Vec<Vec<CellContent>>,
}

impl Board {
    /// Creates a `size × size` board with every cell closed.
    pub fn new(size: u8) -> Self {
        Board {
            grid: vec![vec![CellContent::Unopened; size as usize]; size as usize],
        }
    }

    /// Creates a board out of explicitly provided rows.
    ///
    /// Fails with [`GameError::InvalidBoardShape`] unless the rows are non-empty, all of the same length and fit into
    /// the [`Position`] coordinates.
    pub fn from_rows(grid: Vec<Vec<CellContent>>) -> Result<Self> {
        let rows_amount = grid.len();
        let columns_amount = grid.first().map(|row| row.len()).unwrap_or(0);

        if rows_amount == 0
            || columns_amount == 0
            || rows_amount > u8::MAX as usize
            || columns_amount > u8::MAX as usize
            || grid.iter().any(|row| row.len() != columns_amount)
        {
            return Err(GameError::InvalidBoardShape);
        }

        Ok(Board { grid })
    }

    /// Returns the board's height (the number of rows), width (the number of columns) and the two values multiplied,
    /// which is effectively the total number of cells.
    pub fn get_size(&self) -> (u8, u8, u16) {
        let rows_amount = self.grid.len() as u8;
        let columns_amount = self.grid.first().map(|row| row.len()).unwrap_or(0) as u8;
        let cells_amount = rows_amount as u16 * columns_amount as u16;

        (rows_amount, columns_amount, cells_amount)
    }

    /// Returns the board's height and width.
    pub fn dimensions(&self) -> (u8, u8) {
        let (rows_amount, columns_amount, _) = self.get_size();
        (rows_amount, columns_amount)
    }

    /// Checks whether the position lies within the board.
    pub fn contains(&self, (row_index, column_index): Position) -> bool {
        let (rows_amount, columns_amount) = self.dimensions();
        row_index < rows_amount && column_index < columns_amount
    }

    /// Returns the content of a cell by its position or [`None`] if there's no cell at the given position.
    pub fn get(&self, (row_index, column_index): Position) -> Option<CellContent> {
        self.grid
            .get(row_index as usize)
            .and_then(|row| row.get(column_index as usize))
            .copied()
    }

    /// Returns the rows of the board.
    pub fn rows(&self) -> &[Vec<CellContent>] {
        &self.grid
    }

    /// Iterates over all the cells in row-major order together with their positions.
    pub fn iter(&self) -> impl Iterator<Item = (Position, CellContent)> + '_ {
        self.grid.iter().enumerate().flat_map(|(row_index, row)| {
            row.iter()
                .enumerate()
                .map(move |(column_index, cell)| ((row_index as u8, column_index as u8), *cell))
        })
    }

    /// Counts the cells that hold exactly the given content.
    pub fn count(&self, content: CellContent) -> usize {
        self.grid.iter().flatten().filter(|cell| **cell == content).count()
    }
}

impl Index<Position> for Board {
    type Output = CellContent;

    fn index(&self, (row_index, column_index): Position) -> &Self::Output {
        &self.grid[row_index as usize][column_index as usize]
    }
}

impl IndexMut<Position> for Board {
    fn index_mut(&mut self, (row_index, column_index): Position) -> &mut Self::Output {
        &mut self.grid[row_index as usize][column_index as usize]
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>3}", "")?;
        for column_index in 0..self.dimensions().1 {
            write!(f, "{:^3}", column_index)?;
        }
        writeln!(f)?;

        for (row_index, row) in self.grid.iter().enumerate() {
            write!(f, "{:>3}", row_index)?;

            for cell in row {
                // closed cells are blank in the glyph set, a text board needs them visible
                match cell {
                    CellContent::Unopened => write!(f, "{:^3}", "#")?,
                    CellContent::Flag | CellContent::Mine => write!(f, " {}", cell)?,
                    CellContent::Revealed(_) => write!(f, "{:^3}", cell.to_string())?,
                }
            }

            writeln!(f)?;
        }

        Ok(())
    }
}

/// The amount of mines a board with the given dimensions gets: a fifth of all its cells, rounded down.
pub fn mine_count_for((rows_amount, columns_amount): (u8, u8)) -> u16 {
    (rows_amount as u16 * columns_amount as u16) / CELLS_PER_MINE
}

/// Returns the positions of the cells adjacent to the given one, in row-major order.
///
/// The positions beyond the board's bounds are left out, as is the position itself.
pub fn surrounding_positions(
    (rows_amount, columns_amount): (u8, u8),
    (row_index, column_index): Position,
) -> Vec<Position> {
    // widen to avoid underflow on the first row/column and overflow on the last ones
    let (row_index, column_index) = (row_index as i16, column_index as i16);
    let (rows_amount, columns_amount) = (rows_amount as i16, columns_amount as i16);

    (-1..=1)
        .flat_map(|row_delta| (-1..=1).map(move |column_delta| (row_delta, column_delta)))
        .filter(|&delta| delta != (0, 0))
        .map(|(row_delta, column_delta)| (row_index + row_delta, column_index + column_delta))
        .filter(|&(row, column)| (0..rows_amount).contains(&row) && (0..columns_amount).contains(&column))
        .map(|(row, column)| (row as u8, column as u8))
        .collect()
}

/// Picks `count` distinct random positions on a board with the given dimensions, none of which is in `excluded`.
///
/// Positions are sampled uniformly one at a time until enough distinct ones are collected, so the result comes in the
/// order the positions were drawn.
///
/// Fails with [`GameError::TooManyMines`] if there are fewer non-excluded cells than requested mines.
pub fn random_mine_positions<R: Rng>(
    (rows_amount, columns_amount): (u8, u8),
    count: u16,
    excluded: &[Position],
    rng: &mut R,
) -> Result<Vec<Position>> {
    let excluded: HashSet<Position> = excluded
        .iter()
        .copied()
        .filter(|&(row_index, column_index)| row_index < rows_amount && column_index < columns_amount)
        .collect();
    let available = (rows_amount as u16 * columns_amount as u16) - excluded.len() as u16;

    if count > available {
        return Err(GameError::TooManyMines {
            requested: count,
            available,
        });
    }

    let mut taken = HashSet::with_capacity(count as usize);
    let mut positions = Vec::with_capacity(count as usize);

    while positions.len() < count as usize {
        let position = (rng.gen_range(0..rows_amount), rng.gen_range(0..columns_amount));

        if !excluded.contains(&position) && taken.insert(position) {
            positions.push(position);
        }
    }

    Ok(positions)
}

/// Reveals the cell at `start` and, transitively, every cell reachable from it through cells with no mines around.
///
/// Each visited cell gets overwritten with the number of its adjacent mines. Only cells with zero mines around spread
/// the reveal further, and only to the neighbours that are closed in the original board: flagged and already revealed
/// cells stop the expansion.
///
/// The start is expected not to be a mine. The state itself is left untouched; the updated board is returned.
pub fn expand_cell(state: &GameState, start: Position) -> Board {
    let original = &state.board;
    let dimensions = original.dimensions();
    let mines: HashSet<Position> = state.mine_positions.iter().copied().collect();

    let mut board = original.clone();
    let mut visited = HashSet::from([start]);
    let mut frontier = vec![start];

    while let Some(position) = frontier.pop() {
        let neighbours = surrounding_positions(dimensions, position);
        let mines_around = neighbours.iter().filter(|pos| mines.contains(pos)).count() as u8;

        board[position] = CellContent::Revealed(mines_around);

        if mines_around == 0 {
            for neighbour in neighbours {
                if original[neighbour].is_unopened() && visited.insert(neighbour) {
                    frontier.push(neighbour);
                }
            }
        }
    }

    board
}

#[cfg(test)]
mod test {
    use crate::GameStatus;
    use rand::{rngs::StdRng, SeedableRng};
    use super::cell::CellContent::{Flag, Revealed, Unopened};
    use super::*;

    fn ongoing_state(board: Vec<Vec<CellContent>>, mine_positions: Vec<Position>) -> GameState {
        GameState {
            board: Board::from_rows(board).unwrap(),
            mine_positions,
            status: GameStatus::Ongoing,
        }
    }

    #[test]
    fn new_board_is_square_and_closed() {
        let board = Board::new(4);

        assert_eq!(board.get_size(), (4, 4, 16));
        assert_eq!(board.rows().len(), 4);
        assert!(board.rows().iter().all(|row| row.len() == 4));
        assert_eq!(board.count(Unopened), 16);
    }

    #[test]
    fn from_rows_rejects_ragged_or_empty_grids() {
        assert_eq!(Board::from_rows(vec![]), Err(GameError::InvalidBoardShape));
        assert_eq!(Board::from_rows(vec![vec![]]), Err(GameError::InvalidBoardShape));
        assert_eq!(
            Board::from_rows(vec![vec![Unopened, Unopened], vec![Unopened]]),
            Err(GameError::InvalidBoardShape)
        );
    }

    #[test]
    fn from_rows_accepts_rectangular_grids() {
        let board = Board::from_rows(vec![vec![Unopened, Unopened]; 3]).unwrap();

        assert_eq!(board.get_size(), (3, 2, 6));
        assert!(board.contains((2, 1)));
        assert!(!board.contains((1, 2)));
    }

    #[test]
    fn get_returns_none_for_non_existing_cells() {
        let board = Board::new(3);

        assert_eq!(board.get((2, 2)), Some(Unopened));
        assert_eq!(board.get((3, 0)), None);
        assert_eq!(board.get((0, 10)), None);
    }

    #[test]
    fn iter_walks_the_board_in_row_major_order() {
        let board = Board::from_rows(vec![vec![Revealed(0), Flag], vec![Unopened, Revealed(1)]]).unwrap();

        assert_eq!(
            board.iter().collect::<Vec<_>>(),
            [
                ((0, 0), Revealed(0)),
                ((0, 1), Flag),
                ((1, 0), Unopened),
                ((1, 1), Revealed(1))
            ]
        );
    }

    #[test]
    fn mine_count_is_a_fifth_of_the_cells_rounded_down() {
        assert_eq!(mine_count_for((1, 1)), 0);
        assert_eq!(mine_count_for((2, 2)), 0);
        assert_eq!(mine_count_for((3, 3)), 1);
        assert_eq!(mine_count_for((10, 10)), 20);
        assert_eq!(mine_count_for((16, 16)), 51);
    }

    #[test]
    fn surrounding_positions_skip_out_of_bounds_cells() {
        assert_eq!(surrounding_positions((2, 2), (0, 0)), [(0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn surrounding_positions_of_a_center_cell() {
        assert_eq!(
            surrounding_positions((3, 3), (1, 1)),
            [(0, 0), (0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)]
        );
    }

    #[test]
    fn surrounding_positions_of_the_last_cell() {
        assert_eq!(surrounding_positions((3, 3), (2, 2)), [(1, 1), (1, 2), (2, 1)]);
        assert_eq!(surrounding_positions((3, 2), (2, 1)), [(1, 0), (1, 1), (2, 0)]);
        assert!(surrounding_positions((1, 1), (0, 0)).is_empty());
    }

    #[test]
    fn random_mine_positions_returns_the_requested_amount() {
        let mut rng = StdRng::seed_from_u64(7);
        let positions = random_mine_positions((10, 10), 30, &[], &mut rng).unwrap();

        assert_eq!(positions.len(), 30);
        assert!(positions.iter().all(|&(row, column)| row < 10 && column < 10));

        let distinct: HashSet<_> = positions.iter().collect();
        assert_eq!(distinct.len(), 30);
    }

    #[test]
    fn random_mine_positions_avoids_excluded_positions() {
        let excluded = [(0, 0), (2, 2), (9, 9)];

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let positions = random_mine_positions((10, 10), 30, &excluded, &mut rng).unwrap();

            assert!(positions.iter().all(|pos| !excluded.contains(pos)));
        }
    }

    #[test]
    fn random_mine_positions_can_fill_every_free_cell() {
        let mut rng = StdRng::seed_from_u64(1);
        let positions = random_mine_positions((3, 3), 8, &[(1, 1)], &mut rng).unwrap();

        let distinct: HashSet<_> = positions.into_iter().collect();
        assert_eq!(distinct.len(), 8);
        assert!(!distinct.contains(&(1, 1)));
    }

    #[test]
    fn random_mine_positions_fails_when_there_are_not_enough_cells() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = random_mine_positions((3, 3), 9, &[(1, 1)], &mut rng);

        assert_eq!(
            result,
            Err(GameError::TooManyMines {
                requested: 9,
                available: 8
            })
        );
    }

    #[test]
    fn random_mine_positions_is_reproducible_with_the_same_seed() {
        let first = random_mine_positions((8, 8), 12, &[(4, 4)], &mut StdRng::seed_from_u64(42)).unwrap();
        let second = random_mine_positions((8, 8), 12, &[(4, 4)], &mut StdRng::seed_from_u64(42)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn expand_cell_opens_a_whole_board_without_mines() {
        let state = ongoing_state(vec![vec![Unopened, Unopened], vec![Unopened, Unopened]], vec![]);
        let board = expand_cell(&state, (0, 0));

        assert_eq!(board.count(Revealed(0)), 4);
    }

    #[test]
    fn expand_cell_does_not_cross_flags() {
        let state = ongoing_state(vec![vec![Unopened, Unopened], vec![Unopened, Flag]], vec![]);
        let board = expand_cell(&state, (0, 0));

        assert_eq!(board[(1, 1)], Flag);
        assert_eq!(board.count(Revealed(0)), 3);
    }

    #[test]
    fn expand_cell_stops_at_cells_with_mines_around() {
        let state = ongoing_state(vec![vec![Unopened, Unopened]; 3], vec![(2, 1)]);
        let board = expand_cell(&state, (0, 0));

        assert_eq!(
            board.rows(),
            [
                vec![Revealed(0), Revealed(0)],
                vec![Revealed(1), Revealed(1)],
                vec![Unopened, Unopened],
            ]
        );
    }

    #[test]
    fn expand_cell_reveals_a_numbered_start_without_spreading() {
        let state = ongoing_state(
            vec![
                vec![Unopened, Unopened, Unopened],
                vec![Unopened, Unopened, Unopened],
                vec![Unopened, Unopened, Unopened],
            ],
            vec![(0, 0)],
        );
        let board = expand_cell(&state, (1, 1));

        assert_eq!(board[(1, 1)], Revealed(1));
        assert_eq!(board.count(Unopened), 8);
    }

    #[test]
    fn expand_cell_overwrites_a_flagged_start() {
        let state = ongoing_state(vec![vec![Flag, Unopened], vec![Unopened, Unopened]], vec![]);
        let board = expand_cell(&state, (0, 0));

        assert_eq!(board.count(Revealed(0)), 4);
    }

    #[test]
    fn expand_cell_leaves_the_state_untouched() {
        let state = ongoing_state(vec![vec![Unopened, Unopened], vec![Unopened, Unopened]], vec![]);
        let before = state.clone();
        expand_cell(&state, (1, 1));

        assert_eq!(state, before);
    }

    #[test]
    fn board_displays_closed_and_revealed_cells() {
        let board = Board::from_rows(vec![vec![Revealed(0), Revealed(2)], vec![Unopened, Flag]]).unwrap();

        assert_eq!(board.to_string(), "    0  1 \n  0    2 \n  1 #  🚩\n");
    }
}
