//! Construction parameters for a [`Board`](crate::Board).

use fivetwelve_core::GRID_SIZE;
use serde::{Deserialize, Serialize};

/// Board dimensions and randomness source settings.
///
/// Missing fields fall back to a 4x4 board with an entropy-seeded RNG, so an
/// empty configuration file is valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Number of rows in the grid.
    pub rows: usize,
    /// Number of columns in the grid.
    pub columns: usize,
    /// Seed for tile placement; `None` draws one from the operating system.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: GRID_SIZE,
            columns: GRID_SIZE,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn empty_document_yields_defaults() {
        let config: Config = toml::from_str("").expect("parse");
        assert_eq!(config, Config::default());
        assert_eq!((config.rows, config.columns), (4, 4));
    }

    #[test]
    fn partial_document_keeps_remaining_defaults() {
        let config: Config = toml::from_str("columns = 6\nseed = 99\n").expect("parse");
        assert_eq!(config.rows, 4);
        assert_eq!(config.columns, 6);
        assert_eq!(config.seed, Some(99));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Config>("colums = 6\n").is_err());
    }
}
