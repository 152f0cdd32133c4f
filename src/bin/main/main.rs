pub mod app;
pub mod event;
pub mod game_ui;
pub mod logging;
pub mod tui;
pub mod update;

use app::App;
use clap::Parser;
use color_eyre::Result;
use event::{Event, EventHandler};
use ratatui::{backend::CrosstermBackend, Terminal};
use tui::Tui;
use update::update;

const DEFAULT_SIZE: u8 = 10;
const MAX_SIZE: i64 = 50;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The length of the board's side, in cells.
    #[arg(short, long, default_value_t = DEFAULT_SIZE, value_parser = clap::value_parser!(u8).range(1..=MAX_SIZE))]
    size: u8,
    /// Seed for the mine layouts. Each new game draws from the same seeded sequence, so a session is reproducible.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    logging::init_logging();

    let args = Args::parse();
    log::info!("starting a {0}x{0} game, seed: {1:?}", args.size, args.seed);

    // Create the terminal application.
    let mut app = App::new(args.size, args.seed)?;

    // Initialize the terminal user interface.
    let backend = CrosstermBackend::new(std::io::stderr());
    let terminal = Terminal::new(backend)?;
    let events = EventHandler::new(250);
    let mut tui = Tui::new(terminal, events);
    tui.enter()?;

    // Start the main loop.
    while !app.should_quit {
        // Render the user interface.
        tui.draw(&mut app)?;
        // Handle events.
        match tui.events.next()? {
            Event::Tick => {}
            Event::Key(key_event) => update(&mut app, key_event)?,
            Event::Mouse(mouse_event) => app.click(mouse_event)?,
            Event::Resize(_, _) => {}
        };
    }

    // Exit the user interface.
    tui.exit()?;
    Ok(())
}
