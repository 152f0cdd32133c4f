//! The terminal events handler.

use color_eyre::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Terminal events.
#[derive(Clone, Copy, Debug)]
pub enum Event {
    /// Emitted every tick when nothing else happened.
    Tick,
    /// A key press.
    Key(KeyEvent),
    /// A mouse click, move or scroll.
    Mouse(MouseEvent),
    /// The terminal has been resized to the given columns and rows.
    Resize(u16, u16),
}

/// Polls the terminal for events on a separate thread and hands them over through a channel.
#[derive(Debug)]
pub struct EventHandler {
    receiver: mpsc::Receiver<Event>,
    #[allow(dead_code)]
    handler: thread::JoinHandle<()>,
}

impl EventHandler {
    /// Spawns the polling thread. `tick_rate` is in milliseconds.
    pub fn new(tick_rate: u64) -> Self {
        let tick_rate = Duration::from_millis(tick_rate);
        let (sender, receiver) = mpsc::channel();

        let handler = thread::spawn(move || {
            let mut last_tick = Instant::now();

            loop {
                let timeout = tick_rate.saturating_sub(last_tick.elapsed());

                let polled = match event::poll(timeout) {
                    Ok(polled) => polled,
                    Err(err) => {
                        log::error!("couldn't poll the terminal events: {err}");
                        return;
                    }
                };

                if polled {
                    let forwarded = match event::read() {
                        // releases are reported too on some platforms, only presses matter
                        Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                            sender.send(Event::Key(key))
                        }
                        Ok(CrosstermEvent::Mouse(mouse)) => sender.send(Event::Mouse(mouse)),
                        Ok(CrosstermEvent::Resize(width, height)) => sender.send(Event::Resize(width, height)),
                        Ok(_) => Ok(()),
                        Err(err) => {
                            log::error!("couldn't read a terminal event: {err}");
                            return;
                        }
                    };

                    // the receiver is gone, the app is shutting down
                    if forwarded.is_err() {
                        return;
                    }
                }

                if last_tick.elapsed() >= tick_rate {
                    if sender.send(Event::Tick).is_err() {
                        return;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        EventHandler { receiver, handler }
    }

    /// Blocks until the next event arrives.
    pub fn next(&self) -> Result<Event> {
        Ok(self.receiver.recv()?)
    }
}
