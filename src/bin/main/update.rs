//! The terminal application updater.

use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use sweeper::GameError;

/// The controls the app supports. Every key binding ends up calling one of these.
pub trait ControlsSupport {
    fn move_cursor(&mut self, direction: MoveCursorDirection);
    fn perform_main_action(&mut self) -> Result<(), GameError>;
    fn perform_secondary_action(&mut self) -> Result<(), GameError>;
    fn reset(&mut self) -> Result<(), GameError>;
    fn leave(&mut self);
}

/// The available directions to move the cursor to.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MoveCursorDirection {
    Up,
    Left,
    Down,
    Right,
}

pub fn update(app: &mut App, key_event: KeyEvent) -> Result<(), GameError> {
    use MoveCursorDirection::*;

    match key_event.code {
        KeyCode::Up | KeyCode::Char('i') | KeyCode::Char('w') => app.move_cursor(Up),
        KeyCode::Left | KeyCode::Char('j') | KeyCode::Char('a') => app.move_cursor(Left),
        KeyCode::Down | KeyCode::Char('k') | KeyCode::Char('s') => app.move_cursor(Down),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => app.move_cursor(Right),
        KeyCode::Enter | KeyCode::Char(' ') => app.perform_main_action()?,
        KeyCode::Char('f') => app.perform_secondary_action()?,
        KeyCode::Char('r') => app.reset()?,
        KeyCode::Esc | KeyCode::Char('q') => app.leave(),
        KeyCode::Char('c') => {
            if key_event.modifiers == KeyModifiers::CONTROL {
                app.leave();
            }
        }
        _ => {}
    };

    Ok(())
}
