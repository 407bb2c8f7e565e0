use crate::grid::Grid;
use crate::rng::RandomSource;
use crate::types::{Direction, Position, WandererView};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WandererTiming {
    pub move_interval: u32,
    pub direction_change_min: u32,
    pub direction_change_max: u32,
}

impl WandererTiming {
    fn roll_direction_interval(&self, rng: &mut dyn RandomSource) -> u32 {
        let ticks = rng.random_range(
            u64::from(self.direction_change_min),
            u64::from(self.direction_change_max),
        );
        u32::try_from(ticks).unwrap_or(u32::MAX).max(1)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WandererStep {
    Idle,
    Moved,
    /// The step would have left the grid; position kept, direction resampled.
    Bounced,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wanderer {
    pub id: u32,
    pub position: Position,
    pub direction: Direction,
    pub move_accumulator: u32,
    pub move_interval: u32,
    pub direction_change_accumulator: u32,
    pub direction_change_interval: u32,
}

impl Wanderer {
    pub fn spawn(
        id: u32,
        position: Position,
        timing: &WandererTiming,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let direction = rng.random_direction();
        let direction_change_interval = timing.roll_direction_interval(rng);
        Self {
            id,
            position,
            direction,
            move_accumulator: 0,
            move_interval: timing.move_interval.max(1),
            direction_change_accumulator: 0,
            direction_change_interval,
        }
    }

    pub fn advance(
        &mut self,
        grid: &Grid,
        timing: &WandererTiming,
        rng: &mut dyn RandomSource,
    ) -> WandererStep {
        self.direction_change_accumulator = self.direction_change_accumulator.saturating_add(1);
        if self.direction_change_accumulator >= self.direction_change_interval {
            self.direction = rng.random_direction();
            self.direction_change_accumulator = 0;
            self.direction_change_interval = timing.roll_direction_interval(rng);
        }

        self.move_accumulator = self.move_accumulator.saturating_add(1);
        if self.move_accumulator < self.move_interval {
            return WandererStep::Idle;
        }
        self.move_accumulator = 0;

        match grid.offset_bounded(self.position, self.direction) {
            Some(next) => {
                self.position = next;
                WandererStep::Moved
            }
            None => {
                self.direction = rng.random_direction();
                WandererStep::Bounced
            }
        }
    }

    pub fn view(&self) -> WandererView {
        WandererView {
            id: self.id,
            position: self.position,
            direction: self.direction,
        }
    }
}
