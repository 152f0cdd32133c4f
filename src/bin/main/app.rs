//! The terminal application

use crate::game_ui::{render_game, CELL_HEIGHT, CELL_WIDTH};
use crate::tui::Render;
use crate::update::{ControlsSupport, MoveCursorDirection};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::layout::Rect;
use ratatui::Frame;
use std::cmp;
use sweeper::field::Position;
use sweeper::{initialize_game, update_game_with_rng, Action, GameError, GameState};

/// The terminal application
#[derive(Debug)]
pub struct App {
    /// The latest state returned by the engine. The app never edits it, it only replaces it.
    pub state: GameState,
    /// The length of the board's side, kept to start new games of the same size.
    pub size: u8,
    /// The position of the currently selected cell relative to the whole board.
    pub cursor_position: Position,
    /// The first row and column of the board that fit into the screen. The whole board rarely fits into a terminal,
    /// so the rendered part slides along with the cursor.
    pub window_offset: (u8, u8),
    /// The screen area the visible part of the grid was last rendered to. Used to find the cell under the mouse.
    pub grid_area: Rect,
    /// Indicates that the main application loop should be broken on the next tick and thus the app should quit.
    pub should_quit: bool,
    rng: StdRng,
}

impl App {
    /// Creates the app with a fresh game. With a seed, every mine layout of the session is reproducible.
    pub fn new(size: u8, seed: Option<u64>) -> Result<App, GameError> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(App {
            state: initialize_game(size)?,
            size,
            cursor_position: (0, 0),
            window_offset: (0, 0),
            grid_area: Rect::default(),
            should_quit: false,
            rng,
        })
    }

    /// Hands the action over to the engine and keeps the state it returns.
    fn apply(&mut self, action: Action) -> Result<(), GameError> {
        let before = self.state.status();
        self.state = update_game_with_rng(&self.state, action, &mut self.rng)?;

        if self.state.status() != before {
            log::info!("{action:?}: {before:?} -> {:?}", self.state.status());
        }

        Ok(())
    }

    /// Handles a mouse click: the left button opens the cell under the pointer, the right one toggles its flag.
    pub fn click(&mut self, mouse_event: MouseEvent) -> Result<(), GameError> {
        let MouseEventKind::Down(button) = mouse_event.kind else {
            return Ok(());
        };

        let Some(position) = self.cell_at(mouse_event.column, mouse_event.row) else {
            return Ok(());
        };

        self.cursor_position = position;

        match button {
            MouseButton::Left => self.perform_main_action(),
            MouseButton::Right => self.perform_secondary_action(),
            MouseButton::Middle => Ok(()),
        }
    }

    /// Finds the board position of the cell rendered at the given terminal coordinates, if any.
    fn cell_at(&self, column: u16, row: u16) -> Option<Position> {
        let area = self.grid_area;
        if column < area.x || row < area.y || column >= area.right() || row >= area.bottom() {
            return None;
        }

        let row_index = (row - area.y) / CELL_HEIGHT + self.window_offset.0 as u16;
        let column_index = (column - area.x) / CELL_WIDTH + self.window_offset.1 as u16;
        let position = (u8::try_from(row_index).ok()?, u8::try_from(column_index).ok()?);

        self.state.board().contains(position).then_some(position)
    }

    /// Quit the application altogether.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

impl ControlsSupport for App {
    fn move_cursor(&mut self, direction: MoveCursorDirection) {
        use MoveCursorDirection::*;

        let (rows_amount, columns_amount) = self.state.dimensions();
        let (cy, cx) = self.cursor_position;

        self.cursor_position = match direction {
            Up => (cy.saturating_sub(1), cx),
            Left => (cy, cx.saturating_sub(1)),
            Down => (cmp::min(cy + 1, rows_amount - 1), cx),
            Right => (cy, cmp::min(cx + 1, columns_amount - 1)),
        };
    }

    /// Opens the selected cell. Once the game has ended, starts a new one instead.
    fn perform_main_action(&mut self) -> Result<(), GameError> {
        if self.state.status().is_finished() {
            return self.reset();
        }

        self.apply(Action::OpenCell(self.cursor_position))
    }

    /// Toggles the flag of the selected cell.
    fn perform_secondary_action(&mut self) -> Result<(), GameError> {
        self.apply(Action::PlaceFlag(self.cursor_position))
    }

    fn reset(&mut self) -> Result<(), GameError> {
        self.state = initialize_game(self.size)?;
        log::info!("new {0}x{0} game", self.size);
        Ok(())
    }

    fn leave(&mut self) {
        self.quit();
    }
}

impl Render for App {
    fn render(&mut self, frame: &mut Frame) {
        render_game(self, frame);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crossterm::event::KeyModifiers;
    use sweeper::field::cell::CellContent;
    use sweeper::field::Board;
    use sweeper::GameStatus;

    fn mouse_down(button: MouseButton, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(button),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn the_cursor_stays_within_the_board() {
        let mut app = App::new(3, Some(0)).unwrap();

        app.move_cursor(MoveCursorDirection::Up);
        app.move_cursor(MoveCursorDirection::Left);
        assert_eq!(app.cursor_position, (0, 0));

        for _ in 0..5 {
            app.move_cursor(MoveCursorDirection::Down);
            app.move_cursor(MoveCursorDirection::Right);
        }
        assert_eq!(app.cursor_position, (2, 2));
    }

    #[test]
    fn flags_are_ignored_before_the_first_reveal() {
        let mut app = App::new(5, Some(0)).unwrap();

        app.perform_secondary_action().unwrap();
        assert_eq!(app.state.cell((0, 0)), Some(CellContent::Unopened));
        assert_eq!(app.state.status(), GameStatus::Unstarted);
    }

    #[test]
    fn main_action_on_a_finished_game_starts_a_new_one() {
        let mut app = App::new(6, Some(4)).unwrap();
        app.perform_main_action().unwrap();

        app.cursor_position = app.state.mine_positions()[0];
        app.perform_main_action().unwrap();
        assert_eq!(app.state.status(), GameStatus::Lose);

        app.perform_main_action().unwrap();
        assert_eq!(app.state.status(), GameStatus::Unstarted);
        assert!(app.state.mine_positions().is_empty());
    }

    #[test]
    fn the_same_seed_gives_the_same_layout() {
        let mut first = App::new(10, Some(77)).unwrap();
        let mut second = App::new(10, Some(77)).unwrap();

        first.perform_main_action().unwrap();
        second.perform_main_action().unwrap();
        assert_eq!(first.state, second.state);
    }

    #[test]
    fn clicks_map_to_the_cell_under_the_pointer() {
        let mut app = App::new(10, Some(5)).unwrap();
        app.grid_area = Rect::new(10, 5, CELL_WIDTH * 4, CELL_HEIGHT * 4);
        app.window_offset = (2, 3);

        // left of the grid
        app.click(mouse_down(MouseButton::Left, 9, 5)).unwrap();
        assert_eq!(app.state.status(), GameStatus::Unstarted);

        // the second visible row, the third visible column
        app.click(mouse_down(MouseButton::Left, 10 + CELL_WIDTH * 2, 5 + CELL_HEIGHT)).unwrap();
        assert_eq!(app.cursor_position, (3, 5));
        assert_eq!(app.state.status(), GameStatus::Ongoing);
    }

    #[test]
    fn right_clicks_flag_the_cell_under_the_pointer() {
        let mut app = App::new(10, Some(5)).unwrap();
        app.state = GameState::from_parts(Board::new(10), vec![(9, 9)], GameStatus::Ongoing).unwrap();
        app.grid_area = Rect::new(0, 0, CELL_WIDTH * 5, CELL_HEIGHT * 5);
        app.window_offset = (2, 3);

        app.click(mouse_down(MouseButton::Right, CELL_WIDTH, 0)).unwrap();

        assert_eq!(app.cursor_position, (2, 4));
        assert_eq!(app.state.cell((2, 4)), Some(CellContent::Flag));
    }
}
