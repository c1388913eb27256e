//! Configuration to acknowledge user preferences as well as set defaults.
//!
//! Specifically, we try to find an outliner.toml, and if present we load settings from there.
//! This provides the store location, debounce timings, logging and display preferences.

use facet::Facet;
use std::fs;
use std::time::Duration;

/// File looked for in the working directory.
pub const CONFIG_FILE: &str = "outliner.toml";

#[derive(Facet, Clone, Debug)]
/// User preferences loaded from outliner.toml or falling back to defaults.
pub struct Config {
    #[facet(default = "outline.json".to_string())]
    /// JSON record file used when no path is given on the command line.
    pub store_path: String,
    #[facet(default = 750)]
    /// Quiet period before edited text is written into the tree.
    pub submit_debounce_ms: u64,
    #[facet(default = 2000)]
    /// Quiet period before changes are synchronised to the store.
    pub sync_debounce_ms: u64,
    #[facet(default = "outliner.log".to_string())]
    /// Log destination; empty disables logging.
    pub log_file: String,
    #[facet(default = "info".to_string())]
    /// Maximum log level.
    pub log_level: String,
    #[facet(default = 2)]
    /// Columns of indentation per outline level.
    pub indent_width: usize,
    #[facet(default = true)]
    /// Enable the Meta+J/K/H/L shortcuts.
    pub vim_bindings: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: "outline.json".to_string(),
            submit_debounce_ms: 750,
            sync_debounce_ms: 2000,
            log_file: "outliner.log".to_string(),
            log_level: "info".to_string(),
            indent_width: 2,
            vim_bindings: true,
        }
    }
}

impl Config {
    #[must_use]
    /// Load configuration from outliner.toml if present.
    pub fn load() -> Self {
        fs::read_to_string(CONFIG_FILE)
            .map(|contents| Self::parse(&contents))
            .unwrap_or_default()
    }

    #[must_use]
    /// Parse TOML, falling back to the defaults when it is malformed.
    pub fn parse(contents: &str) -> Self {
        facet_toml::from_str::<Self>(contents).unwrap_or_default()
    }

    #[must_use]
    /// Text submission debounce.
    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_debounce_ms)
    }

    #[must_use]
    /// Store synchronisation debounce.
    pub fn sync_delay(&self) -> Duration {
        Duration::from_millis(self.sync_debounce_ms)
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
