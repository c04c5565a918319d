//! Driver configuration.
//!
//! Loaded from `rascal.toml` in the working directory when present. Every
//! field has a default, so the file is optional and may be partial.

use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prompt before each read() when stdin is interactive.
    pub prompt: bool,
    /// Print the final symbol table after the run.
    pub show_symbols: bool,
    /// Print the generated pseudo-instruction trace after the run.
    pub show_trace: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prompt: true,
            show_symbols: true,
            show_trace: true,
        }
    }
}

impl Config {
    /// Read a config file, falling back to defaults when it is missing or
    /// malformed. A malformed file is reported, not fatal.
    pub fn load_or_default(path: &Path) -> Config {
        match fs::read_to_string(path) {
            Ok(text) => match toml::from_str(&text) {
                Ok(config) => config,
                Err(e) => {
                    warn!("ignoring malformed {}: {}", path.display(), e);
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_all_on() {
        let config = Config::default();
        assert!(config.prompt);
        assert!(config.show_symbols);
        assert!(config.show_trace);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str("show_trace = false").unwrap();
        assert!(config.prompt);
        assert!(config.show_symbols);
        assert!(!config.show_trace);
    }
}
