//! The terminal user interface: sets the terminal up, draws the app and restores the terminal afterwards.

use crate::event::EventHandler;
use color_eyre::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};
use std::io::Stderr;
use std::panic;

pub type CrosstermTerminal = Terminal<CrosstermBackend<Stderr>>;

/// Anything that knows how to draw itself into a frame.
pub trait Render {
    fn render(&mut self, frame: &mut Frame);
}

pub struct Tui {
    terminal: CrosstermTerminal,
    pub events: EventHandler,
}

impl Tui {
    pub fn new(terminal: CrosstermTerminal, events: EventHandler) -> Self {
        Tui { terminal, events }
    }

    /// Switches the terminal to raw mode, the alternate screen and mouse capture.
    ///
    /// A panic hook is installed as well, so that the terminal gets restored before the panic message is printed.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        crossterm::execute!(std::io::stderr(), EnterAlternateScreen, EnableMouseCapture)?;

        let panic_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic| {
            if let Err(err) = Self::reset() {
                log::error!("couldn't restore the terminal: {err}");
            }
            panic_hook(panic);
        }));

        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        Ok(())
    }

    pub fn draw(&mut self, app: &mut impl Render) -> Result<()> {
        self.terminal.draw(|frame| app.render(frame))?;
        Ok(())
    }

    /// Restores the terminal to its original state.
    pub fn exit(&mut self) -> Result<()> {
        Self::reset()?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    fn reset() -> Result<()> {
        terminal::disable_raw_mode()?;
        crossterm::execute!(std::io::stderr(), LeaveAlternateScreen, DisableMouseCapture)?;
        Ok(())
    }
}
