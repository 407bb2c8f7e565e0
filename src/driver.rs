use tracing::info;

use crate::clock::Clock;
use crate::config::SimulationConfig;
use crate::engine::Simulation;
use crate::error::Result;
use crate::rng::Rng;
use crate::types::{Direction, SimEvent, Snapshot};

pub trait EventSink {
    fn on_event(&mut self, event: &SimEvent);
}

impl<F: FnMut(&SimEvent)> EventSink for F {
    fn on_event(&mut self, event: &SimEvent) {
        self(event)
    }
}

pub struct TickDriver<C: Clock> {
    config: SimulationConfig,
    clock: C,
    seeds: Rng,
    simulation: Simulation,
    sinks: Vec<Box<dyn EventSink>>,
    restarts: u32,
}

impl<C: Clock> TickDriver<C> {
    pub fn new(config: SimulationConfig, clock: C, seed: u32) -> Result<Self> {
        let mut seeds = Rng::new(seed);
        let simulation = Simulation::pending(config.clone(), Rng::new(seeds.next_u32()))?;
        Ok(Self {
            config,
            clock,
            seeds,
            simulation,
            sinks: Vec::new(),
            restarts: 0,
        })
    }

    pub fn subscribe(&mut self, sink: impl EventSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn start(&mut self) -> bool {
        self.simulation.start()
    }

    pub fn handle_player_command(&mut self, direction: Direction) {
        self.simulation.handle_player_command(direction);
    }

    pub fn tick(&mut self) -> Snapshot {
        let now_ms = self.clock.now_ms();
        let snapshot = self.simulation.tick(now_ms);
        self.dispatch_events();
        snapshot
    }

    pub fn restart(&mut self) -> Result<Snapshot> {
        self.dispatch_events();
        let seed = self.seeds.next_u32();
        self.simulation = Simulation::new(self.config.clone(), Rng::new(seed))?;
        self.restarts += 1;
        info!(seed, restarts = self.restarts, "simulation restarted");
        Ok(self.simulation.snapshot())
    }

    pub fn snapshot(&self) -> Snapshot {
        self.simulation.snapshot()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    fn dispatch_events(&mut self) {
        let events = self.simulation.drain_events();
        if events.is_empty() {
            return;
        }
        for sink in &mut self.sinks {
            for event in &events {
                sink.on_event(event);
            }
        }
    }
}
