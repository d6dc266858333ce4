//! Match configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::MAX_SIZE;
use crate::error::{Error, Result};
use crate::game::{Match, Variant};

/// Board size used when none is given.
pub const DEFAULT_SIZE: usize = 7;

/// Settings for a new [`Match`].
///
/// Missing JSON fields fall back to [`MatchConfig::default`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub variant: Variant,
    pub size: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            variant: Variant::HeadToHead,
            size: DEFAULT_SIZE,
        }
    }
}

impl MatchConfig {
    pub fn new(variant: Variant, size: usize) -> Self {
        MatchConfig { variant, size }
    }

    /// Check that the size is playable.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 || self.size > MAX_SIZE {
            return Err(Error::SizeOutOfRange {
                size: self.size,
                max: MAX_SIZE,
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

impl Match {
    pub fn from_config(config: &MatchConfig) -> Result<Match> {
        config.validate()?;
        Match::new(config.variant, config.size)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::HeadToHead => write!(f, "head_to_head"),
            Variant::Teams => write!(f, "teams"),
        }
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "head_to_head" | "1v1" => Ok(Variant::HeadToHead),
            "teams" | "2v2" => Ok(Variant::Teams),
            _ => Err(format!(
                "invalid variant '{}', expected head_to_head or teams",
                s
            )),
        }
    }
}
