use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::game::Blinds;

pub const CONFIG_ENV: &str = "HOLDEM_CONFIG";
pub const SEED_ENV: &str = "HOLDEM_SEED";
pub const SMALL_BLIND_ENV: &str = "HOLDEM_SMALL_BLIND";
pub const BIG_BLIND_ENV: &str = "HOLDEM_BIG_BLIND";

/// Most seats a single deck can serve: 2 hole cards each plus 5 board
/// cards and 3 burns.
pub const MAX_SEATS: usize = 22;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableConfig {
    pub seats: usize,
    pub small_blind: u32,
    pub big_blind: u32,
    /// Seed for the deck RNG; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            seats: 9,
            small_blind: 10,
            big_blind: 20,
            seed: None,
        }
    }
}

/// Partial config as read from TOML; missing keys keep their defaults.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    seats: Option<usize>,
    small_blind: Option<u32>,
    big_blind: Option<u32>,
    seed: Option<u64>,
}

impl TableConfig {
    pub fn blinds(&self) -> Blinds {
        Blinds {
            small: self.small_blind,
            big: self.big_blind,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seats < 2 || self.seats > MAX_SEATS {
            return Err(ConfigError::Invalid(format!(
                "seats must be in 2..={MAX_SEATS}, got {}",
                self.seats
            )));
        }
        if self.small_blind == 0 || self.big_blind == 0 {
            return Err(ConfigError::Invalid("blinds must be positive".into()));
        }
        if self.small_blind > self.big_blind {
            return Err(ConfigError::Invalid(format!(
                "small blind {} exceeds big blind {}",
                self.small_blind, self.big_blind
            )));
        }
        Ok(())
    }

    /// Overlays the keys present in a TOML document onto `self`.
    pub fn merge_toml(mut self, s: &str) -> Result<Self, ConfigError> {
        let f: FileConfig = toml::from_str(s)?;
        if let Some(v) = f.seats {
            self.seats = v;
        }
        if let Some(v) = f.small_blind {
            self.small_blind = v;
        }
        if let Some(v) = f.big_blind {
            self.big_blind = v;
        }
        if let Some(v) = f.seed {
            self.seed = Some(v);
        }
        Ok(self)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg = Self::default().merge_toml(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    /// Defaults, then the file named by `HOLDEM_CONFIG`, then individual
    /// environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut cfg = Self::default();

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let s = fs::read_to_string(path)?;
            cfg = cfg.merge_toml(&s)?;
        }
        if let Some(seed) = env_number(SEED_ENV)? {
            cfg.seed = Some(seed);
        }
        if let Some(small) = env_number(SMALL_BLIND_ENV)? {
            cfg.small_blind = small;
        }
        if let Some(big) = env_number(BIG_BLIND_ENV)? {
            cfg.big_blind = big;
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

fn env_number<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(v) if !v.is_empty() => v
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("Invalid {key}: {v:?}"))),
        _ => Ok(None),
    }
}
