use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("grid extent must be positive, got {cols}x{rows}")]
    NonPositiveExtent { cols: i32, rows: i32 },

    #[error("grid extent {cols}x{rows} exceeds the maximum of {max} per axis")]
    ExtentTooLarge { cols: i32, rows: i32, max: i32 },

    #[error("tick length must be at least 1ms")]
    ZeroTickLength,

    #[error("wanderer move interval must be at least 1 tick")]
    ZeroMoveInterval,

    #[error("wanderer direction-change range is invalid: min={min_ms}ms max={max_ms}ms")]
    InvalidDirectionChangeRange { min_ms: u64, max_ms: u64 },

    #[error("wanderer spawn clearance {clearance} is unreachable; farthest cell from the start is {reach} away")]
    UnreachableSpawnClearance { clearance: i32, reach: i32 },

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, SimError>;
