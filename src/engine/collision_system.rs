use super::*;

use crate::constants::{COLLECTIBLE_POINTS, POWER_UP_POINTS};
use crate::types::EatenKind;

impl Simulation {
    pub(super) fn resolve_collisions(&mut self, now_ms: u64) {
        let at = self.player.position;

        self.consume_collectibles(at);
        self.consume_power_ups(at, now_ms);

        let invincible = self.player.effects.is_active(EffectKind::Invincible, now_ms);
        if !invincible && self.has_wanderer_at(at) {
            self.finish(Phase::Lost);
            return;
        }

        if self.collectibles.is_empty() && self.power_ups.is_empty() {
            self.finish(Phase::Won);
        }
    }

    fn consume_collectibles(&mut self, at: Position) {
        let before = self.collectibles.len();
        self.collectibles.retain(|collectible| collectible.position != at);
        let eaten = before - self.collectibles.len();
        for _ in 0..eaten {
            self.player.score = self.player.score.saturating_add(COLLECTIBLE_POINTS);
            self.events.push(SimEvent::EntityEaten {
                kind: EatenKind::Collectible,
                at,
            });
        }
        if eaten > 0 {
            debug!(
                col = at.col,
                row = at.row,
                eaten,
                score = self.player.score,
                "collectible eaten"
            );
        }
    }

    fn consume_power_ups(&mut self, at: Position, now_ms: u64) {
        let (taken, kept): (Vec<PowerUp>, Vec<PowerUp>) = std::mem::take(&mut self.power_ups)
            .into_iter()
            .partition(|power_up| power_up.position == at);
        self.power_ups = kept;

        for power_up in taken {
            self.player.score = self.player.score.saturating_add(POWER_UP_POINTS);
            self.events.push(SimEvent::EntityEaten {
                kind: EatenKind::PowerUp {
                    kind: power_up.kind,
                },
                at,
            });
            debug!(kind = ?power_up.kind, score = self.player.score, "power-up eaten");

            for &effect in power_up.kind.granted_effects() {
                let duration_ms = self.effect_duration_ms(effect);
                let expires_at_ms = self.player.effects.activate(effect, duration_ms, now_ms);
                debug!(kind = ?effect, expires_at_ms, "effect started");
                self.events.push(SimEvent::EffectStarted {
                    kind: effect,
                    expires_at_ms,
                });
            }
        }
    }

    pub(super) fn has_wanderer_at(&self, at: Position) -> bool {
        self.wanderers.iter().any(|wanderer| wanderer.position == at)
    }

    /// One-way transition into a terminal phase. Repeated calls are ignored.
    pub(super) fn finish(&mut self, phase: Phase) {
        if self.phase.is_terminal() || !phase.is_terminal() {
            return;
        }
        self.phase = phase;
        self.pending_command = None;
        let score = self.player.score;
        match phase {
            Phase::Lost => {
                info!(score, tick = self.tick_counter, "game over");
                self.events.push(SimEvent::GameOver { score });
            }
            Phase::Won => {
                info!(score, tick = self.tick_counter, "game won");
                self.events.push(SimEvent::GameWon { score });
            }
            Phase::NotStarted | Phase::Running => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::SimulationConfig;
    use crate::engine::{Collectible, Simulation};
    use crate::rng::Rng;
    use crate::types::{Phase, Position, SimEvent};
    use crate::wanderer::Wanderer;

    fn make_engine() -> Simulation {
        let config = SimulationConfig {
            cols: 6,
            rows: 6,
            collectible_count: 0,
            power_up_count: 0,
            wanderer_count: 0,
            ..SimulationConfig::default()
        };
        Simulation::new(config, Rng::new(17)).expect("valid config")
    }

    #[test]
    fn finish_is_idempotent_and_one_way() {
        let mut engine = make_engine();
        engine.finish(Phase::Lost);
        engine.finish(Phase::Won);
        engine.finish(Phase::Lost);
        assert_eq!(engine.phase(), Phase::Lost);
        let events = engine.drain_events();
        assert_eq!(events, vec![SimEvent::GameOver { score: 0 }]);
    }

    #[test]
    fn finish_ignores_non_terminal_targets() {
        let mut engine = make_engine();
        engine.finish(Phase::NotStarted);
        assert_eq!(engine.phase(), Phase::Running);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn collision_check_without_entities_at_cell_changes_nothing() {
        let mut engine = make_engine();
        engine.collectibles.push(Collectible {
            id: 99,
            position: Position::new(0, 0),
        });
        engine.resolve_collisions(0);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.phase(), Phase::Running);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn has_wanderer_at_matches_exact_cell_only() {
        let mut engine = make_engine();
        let mut rng = Rng::new(3);
        let timing = engine.timing;
        engine.wanderers.push(Wanderer::spawn(
            1,
            Position::new(2, 2),
            &timing,
            &mut rng,
        ));
        assert!(engine.has_wanderer_at(Position::new(2, 2)));
        assert!(!engine.has_wanderer_at(Position::new(2, 3)));
        assert!(!engine.has_wanderer_at(Position::new(3, 2)));
    }
}
