//! A minimal file logger. The terminal is owned by the UI, so the log records go to a file instead.

use log::{LevelFilter, Metadata, Record};
use std::env;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;

const DEFAULT_LOG_FILE: &str = "sweeper.log";

struct FileLogger {
    file: Mutex<File>,
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{} [{}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Initialize logging with a level taken from the `SWEEPER_LOG` environment variable. Nothing is logged unless the
/// variable is set; the records are appended to the file named by `SWEEPER_LOG_FILE` (`sweeper.log` by default).
pub fn init_logging() {
    let Some(level) = env::var("SWEEPER_LOG")
        .ok()
        .and_then(|lvl| lvl.parse::<LevelFilter>().ok())
    else {
        return;
    };

    let path = env::var("SWEEPER_LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        eprintln!("couldn't open the log file {path}, logging is disabled");
        return;
    };

    let logger = Box::new(FileLogger {
        file: Mutex::new(file),
    });
    let _ = log::set_boxed_logger(logger).map(|()| log::set_max_level(level));
}
