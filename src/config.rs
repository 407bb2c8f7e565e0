use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    COLLECTIBLE_COUNT, GRID_COLS, GRID_ROWS, INVINCIBLE_DURATION_MS, MAX_GRID_EXTENT,
    POWER_UP_COUNT, SPEED_BOOST_DURATION_MS, TICK_MS, WANDERER_COUNT,
    WANDERER_DIRECTION_CHANGE_MAX_MS, WANDERER_DIRECTION_CHANGE_MIN_MS,
    WANDERER_MOVE_INTERVAL_TICKS, WANDERER_SPAWN_CLEARANCE,
};
use crate::error::ConfigError;
use crate::grid::Grid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationConfig {
    pub cols: i32,
    pub rows: i32,
    pub collectible_count: usize,
    pub power_up_count: usize,
    pub wanderer_count: usize,
    pub tick_ms: u64,
    pub invincible_duration_ms: u64,
    pub speed_boost_duration_ms: u64,
    pub wanderer_move_interval_ticks: u32,
    pub wanderer_direction_change_min_ms: u64,
    pub wanderer_direction_change_max_ms: u64,
    /// Minimum Manhattan distance between a freshly spawned wanderer and the
    /// player's start cell. Zero disables the check.
    pub wanderer_spawn_clearance: i32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cols: GRID_COLS,
            rows: GRID_ROWS,
            collectible_count: COLLECTIBLE_COUNT,
            power_up_count: POWER_UP_COUNT,
            wanderer_count: WANDERER_COUNT,
            tick_ms: TICK_MS,
            invincible_duration_ms: INVINCIBLE_DURATION_MS,
            speed_boost_duration_ms: SPEED_BOOST_DURATION_MS,
            wanderer_move_interval_ticks: WANDERER_MOVE_INTERVAL_TICKS,
            wanderer_direction_change_min_ms: WANDERER_DIRECTION_CHANGE_MIN_MS,
            wanderer_direction_change_max_ms: WANDERER_DIRECTION_CHANGE_MAX_MS,
            wanderer_spawn_clearance: WANDERER_SPAWN_CLEARANCE,
        }
    }
}

impl SimulationConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols <= 0 || self.rows <= 0 {
            return Err(ConfigError::NonPositiveExtent {
                cols: self.cols,
                rows: self.rows,
            });
        }
        if self.cols > MAX_GRID_EXTENT || self.rows > MAX_GRID_EXTENT {
            return Err(ConfigError::ExtentTooLarge {
                cols: self.cols,
                rows: self.rows,
                max: MAX_GRID_EXTENT,
            });
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTickLength);
        }
        if self.wanderer_move_interval_ticks == 0 {
            return Err(ConfigError::ZeroMoveInterval);
        }
        if self.wanderer_direction_change_min_ms == 0
            || self.wanderer_direction_change_min_ms > self.wanderer_direction_change_max_ms
        {
            return Err(ConfigError::InvalidDirectionChangeRange {
                min_ms: self.wanderer_direction_change_min_ms,
                max_ms: self.wanderer_direction_change_max_ms,
            });
        }
        if self.wanderer_count > 0 && self.wanderer_spawn_clearance > 0 {
            let grid = self.grid();
            let start = grid.center();
            let reach = grid.farthest_corner(start).manhattan(start);
            if self.wanderer_spawn_clearance > reach {
                return Err(ConfigError::UnreachableSpawnClearance {
                    clearance: self.wanderer_spawn_clearance,
                    reach,
                });
            }
        }
        Ok(())
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.cols, self.rows)
    }
}
