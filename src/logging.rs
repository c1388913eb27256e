//! File-backed backend for the `log` facade.
//!
//! The terminal belongs to the outline view while it runs, so diagnostics go
//! to a file instead of stderr.

use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Appends one line per record to a file.
pub struct FileLogger {
    file: Mutex<File>,
    level: LevelFilter,
}

impl FileLogger {
    /// Open (or create) `path` for appending.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened.
    pub fn open(path: &Path, level: LevelFilter) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
            level,
        })
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |d| d.as_secs_f64());
        if let Ok(mut file) = self.file.lock() {
            // A failed log write has nowhere better to go.
            let _ = writeln!(
                file,
                "{stamp:.3} {:<5} {}: {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

#[must_use]
/// Parse a level name such as `"debug"`; unknown names fall back to `Info`.
pub fn parse_level(name: &str) -> LevelFilter {
    name.trim().parse().unwrap_or(LevelFilter::Info)
}

/// Install a [`FileLogger`] writing to `path` as the global logger.
///
/// An empty path leaves logging disabled.
///
/// # Errors
///
/// Fails if the file cannot be opened or a logger is already installed.
pub fn init(path: &str, level: &str) -> io::Result<()> {
    if path.is_empty() {
        return Ok(());
    }
    let level = parse_level(level);
    let logger = FileLogger::open(Path::new(path), level)?;
    log::set_boxed_logger(Box::new(logger)).map_err(io::Error::other)?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
#[path = "tests/logging.rs"]
mod tests;
