use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::constants::ms_to_ticks;
use crate::effects::EffectManager;
use crate::error::ConfigError;
use crate::grid::Grid;
use crate::rng::RandomSource;
use crate::types::{
    CollectibleView, Direction, EffectKind, Phase, PlayerView, Position, PowerUpKind,
    PowerUpView, SimEvent, Snapshot,
};
use crate::wanderer::{Wanderer, WandererStep, WandererTiming};

mod collision_system;
mod spawn_system;

#[derive(Clone, Debug)]
struct Player {
    position: Position,
    facing: Direction,
    score: u32,
    effects: EffectManager,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Collectible {
    id: u32,
    position: Position,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PowerUp {
    id: u32,
    position: Position,
    kind: PowerUpKind,
}

#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    grid: Grid,
    timing: WandererTiming,
    rng: Box<dyn RandomSource>,

    phase: Phase,
    player: Player,
    collectibles: Vec<Collectible>,
    power_ups: Vec<PowerUp>,
    wanderers: Vec<Wanderer>,
    pending_command: Option<Direction>,
    events: Vec<SimEvent>,

    tick_counter: u64,
    now_ms: u64,
    next_id_counter: u32,
}

impl Simulation {
    pub fn new(
        config: SimulationConfig,
        rng: impl RandomSource + 'static,
    ) -> Result<Self, ConfigError> {
        let mut simulation = Self::pending(config, rng)?;
        simulation.start();
        Ok(simulation)
    }

    pub fn pending(
        config: SimulationConfig,
        rng: impl RandomSource + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = config.grid();
        let timing = WandererTiming {
            move_interval: config.wanderer_move_interval_ticks,
            direction_change_min: ms_to_ticks(
                config.wanderer_direction_change_min_ms,
                config.tick_ms,
            ),
            direction_change_max: ms_to_ticks(
                config.wanderer_direction_change_max_ms,
                config.tick_ms,
            ),
        };

        let mut simulation = Self {
            config,
            grid,
            timing,
            rng: Box::new(rng),
            phase: Phase::NotStarted,
            player: Player {
                position: grid.center(),
                facing: Direction::Right,
                score: 0,
                effects: EffectManager::new(),
            },
            collectibles: Vec::new(),
            power_ups: Vec::new(),
            wanderers: Vec::new(),
            pending_command: None,
            events: Vec::new(),
            tick_counter: 0,
            now_ms: 0,
            next_id_counter: 1,
        };
        simulation.spawn_entities();
        debug!(
            cols = grid.cols,
            rows = grid.rows,
            collectibles = simulation.collectibles.len(),
            power_ups = simulation.power_ups.len(),
            wanderers = simulation.wanderers.len(),
            "simulation created"
        );
        Ok(simulation)
    }

    pub fn start(&mut self) -> bool {
        if self.phase != Phase::NotStarted {
            return false;
        }
        self.phase = Phase::Running;
        info!("simulation started");
        true
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.player.score
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_counter
    }

    pub fn is_effect_active(&self, kind: EffectKind, now_ms: u64) -> bool {
        self.player.effects.is_active(kind, now_ms)
    }

    /// Records the next movement intent. The last command before a tick wins;
    /// commands outside `Running` are dropped.
    pub fn handle_player_command(&mut self, direction: Direction) {
        if self.phase != Phase::Running {
            return;
        }
        self.pending_command = Some(direction);
    }

    /// Advances one step and returns the resulting snapshot. Outside
    /// `Running` this is a no-op that only reports the current state.
    pub fn tick(&mut self, now_ms: u64) -> Snapshot {
        if self.phase != Phase::Running {
            return self.snapshot();
        }
        self.tick_counter += 1;
        self.now_ms = now_ms;

        self.expire_effects(now_ms);
        self.update_player(now_ms);
        self.update_wanderers();
        self.resolve_collisions(now_ms);
        self.snapshot()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick_counter,
            now_ms: self.now_ms,
            cols: self.grid.cols,
            rows: self.grid.rows,
            phase: self.phase,
            score: self.player.score,
            player: PlayerView {
                position: self.player.position,
                facing: self.player.facing,
                score: self.player.score,
                effects: self.player.effects.views(),
            },
            collectibles: self
                .collectibles
                .iter()
                .map(|c| CollectibleView {
                    id: c.id,
                    position: c.position,
                })
                .collect(),
            power_ups: self
                .power_ups
                .iter()
                .map(|p| PowerUpView {
                    id: p.id,
                    position: p.position,
                    kind: p.kind,
                })
                .collect(),
            wanderers: self.wanderers.iter().map(Wanderer::view).collect(),
        }
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    fn expire_effects(&mut self, now_ms: u64) {
        for kind in self.player.effects.tick(now_ms) {
            debug!(?kind, now_ms, "effect ended");
            self.events.push(SimEvent::EffectEnded { kind });
        }
    }

    fn update_player(&mut self, now_ms: u64) {
        if let Some(direction) = self.pending_command.take() {
            self.step_player(direction);
        }
        // Speed boost injects one uncontrolled extra step per tick.
        if self.player.effects.is_active(EffectKind::SpeedBoost, now_ms) {
            let direction = self.rng.random_direction();
            self.step_player(direction);
        }
    }

    fn step_player(&mut self, direction: Direction) {
        self.player.position = self.grid.offset_wrapped(self.player.position, direction);
        self.player.facing = direction;
    }

    fn update_wanderers(&mut self) {
        for wanderer in &mut self.wanderers {
            let step = wanderer.advance(&self.grid, &self.timing, self.rng.as_mut());
            if step == WandererStep::Bounced {
                debug!(
                    wanderer = wanderer.id,
                    col = wanderer.position.col,
                    row = wanderer.position.row,
                    "wanderer bounced off edge"
                );
            }
        }
    }

    fn effect_duration_ms(&self, kind: EffectKind) -> u64 {
        match kind {
            EffectKind::Invincible => self.config.invincible_duration_ms,
            EffectKind::SpeedBoost => self.config.speed_boost_duration_ms,
        }
    }

    fn make_id(&mut self) -> u32 {
        let id = self.next_id_counter;
        self.next_id_counter = self.next_id_counter.saturating_add(1);
        id
    }
}
