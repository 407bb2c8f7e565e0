pub const GRID_COLS: i32 = 40;
pub const GRID_ROWS: i32 = 30;
pub const MAX_GRID_EXTENT: i32 = 4_096;

pub const TICK_MS: u64 = 16;

pub const COLLECTIBLE_COUNT: usize = 100;
pub const POWER_UP_COUNT: usize = 5;
pub const WANDERER_COUNT: usize = 4;

pub const COLLECTIBLE_POINTS: u32 = 10;
pub const POWER_UP_POINTS: u32 = 50;

pub const INVINCIBLE_DURATION_MS: u64 = 8_000;
pub const SPEED_BOOST_DURATION_MS: u64 = 5_000;

pub const WANDERER_MOVE_INTERVAL_TICKS: u32 = 10;
pub const WANDERER_DIRECTION_CHANGE_MIN_MS: u64 = 5_000;
pub const WANDERER_DIRECTION_CHANGE_MAX_MS: u64 = 15_000;
pub const WANDERER_SPAWN_CLEARANCE: i32 = 3;
pub const WANDERER_SPAWN_ATTEMPTS: usize = 24;

pub fn ms_to_ticks(ms: u64, tick_ms: u64) -> u32 {
    if tick_ms == 0 {
        return 1;
    }
    let ticks = ms.div_ceil(tick_ms).max(1);
    u32::try_from(ticks).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ms_to_ticks_rounds_up_and_never_returns_zero() {
        assert_eq!(ms_to_ticks(5_000, 16), 313);
        assert_eq!(ms_to_ticks(16, 16), 1);
        assert_eq!(ms_to_ticks(17, 16), 2);
        assert_eq!(ms_to_ticks(0, 16), 1);
        assert_eq!(ms_to_ticks(100, 0), 1);
    }
}
