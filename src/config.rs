//! Startup configuration
//!
//! The only external surface is two optional positional arguments for the
//! brick grid; anything malformed is fatal before game state exists.

use thiserror::Error;

use crate::consts::{DEFAULT_BRICKS_PER_ROW, DEFAULT_NUM_ROWS};

/// Brick grid dimensions for one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub num_rows: u32,
    pub bricks_per_row: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_rows: DEFAULT_NUM_ROWS,
            bricks_per_row: DEFAULT_BRICKS_PER_ROW,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("expected no arguments or `num_rows bricks_per_row`, got {0} argument(s)")]
    WrongArity(usize),
    #[error("invalid {name} {value:?}: expected a positive integer")]
    InvalidCount { name: &'static str, value: String },
}

impl GameConfig {
    /// Parse the positional arguments (program name already stripped).
    /// Defaults to a 7x8 grid when no arguments are given.
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let args: Vec<String> = args.into_iter().collect();
        match args.as_slice() {
            [] => Ok(Self::default()),
            [rows, bricks] => Ok(Self {
                num_rows: parse_count("num_rows", rows)?,
                bricks_per_row: parse_count("bricks_per_row", bricks)?,
            }),
            other => Err(ConfigError::WrongArity(other.len())),
        }
    }

    pub fn total_bricks(&self) -> u32 {
        self.num_rows * self.bricks_per_row
    }
}

fn parse_count(name: &'static str, value: &str) -> Result<u32, ConfigError> {
    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidCount {
            name,
            value: value.to_string(),
        }),
    }
}
