use super::*;

use crate::constants::WANDERER_SPAWN_ATTEMPTS;

impl Simulation {
    pub(super) fn spawn_entities(&mut self) {
        for _ in 0..self.config.collectible_count {
            let position = self.random_cell();
            let id = self.make_id();
            self.collectibles.push(Collectible { id, position });
        }

        for _ in 0..self.config.power_up_count {
            let position = self.random_cell();
            let kind_idx = self.rng.random_int(PowerUpKind::ALL.len() as u32) as usize;
            let kind = PowerUpKind::ALL[kind_idx];
            let id = self.make_id();
            self.power_ups.push(PowerUp { id, position, kind });
        }

        for _ in 0..self.config.wanderer_count {
            let position = self.pick_wanderer_spawn_position();
            let id = self.make_id();
            let wanderer = Wanderer::spawn(id, position, &self.timing, self.rng.as_mut());
            self.wanderers.push(wanderer);
        }
    }

    pub(super) fn random_cell(&mut self) -> Position {
        let col = self.rng.random_int(self.grid.cols as u32) as i32;
        let row = self.rng.random_int(self.grid.rows as u32) as i32;
        Position::new(col, row)
    }

    /// Falls back to the farthest corner, which config validation guarantees
    /// is far enough.
    pub(super) fn pick_wanderer_spawn_position(&mut self) -> Position {
        let clearance = self.config.wanderer_spawn_clearance;
        let player = self.player.position;
        for _ in 0..WANDERER_SPAWN_ATTEMPTS {
            let cell = self.random_cell();
            if clearance <= 0 || cell.manhattan(player) >= clearance {
                return cell;
            }
        }
        self.grid.farthest_corner(player)
    }
}
