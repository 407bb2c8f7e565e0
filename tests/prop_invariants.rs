//! Property tests for movement bounds, scoring and terminal phases.

use proptest::prelude::*;

use treat_chase::config::SimulationConfig;
use treat_chase::engine::Simulation;
use treat_chase::grid::Grid;
use treat_chase::rng::Rng;
use treat_chase::types::{Direction, EatenKind, Position, SimEvent};

const TICK: u64 = 16;

fn direction() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::CARDINALS.to_vec())
}

fn opposite(direction: Direction) -> Direction {
    match direction {
        Direction::Up => Direction::Down,
        Direction::Down => Direction::Up,
        Direction::Left => Direction::Right,
        Direction::Right => Direction::Left,
    }
}

fn small_config(cols: i32, rows: i32) -> SimulationConfig {
    SimulationConfig {
        cols,
        rows,
        collectible_count: 12,
        power_up_count: 3,
        wanderer_count: 3,
        wanderer_move_interval_ticks: 2,
        wanderer_direction_change_min_ms: 32,
        wanderer_direction_change_max_ms: 400,
        wanderer_spawn_clearance: 2,
        ..SimulationConfig::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Wrapped steps stay on the board and are undone by the opposite step.
    #[test]
    fn prop_wrap_stays_in_bounds_and_reverses(
        cols in 1i32..60,
        rows in 1i32..60,
        col in 0i32..60,
        row in 0i32..60,
        dir in direction()
    ) {
        let grid = Grid::new(cols, rows);
        let from = Position::new(col % cols, row % rows);
        let to = grid.offset_wrapped(from, dir);
        prop_assert!(grid.in_bounds(to));
        prop_assert_eq!(grid.offset_wrapped(to, opposite(dir)), from);
    }

    /// Bounded steps never produce an off-board cell.
    #[test]
    fn prop_bounded_step_never_leaves_grid(
        cols in 1i32..40,
        rows in 1i32..40,
        col in 0i32..40,
        row in 0i32..40,
        dir in direction()
    ) {
        let grid = Grid::new(cols, rows);
        let from = Position::new(col % cols, row % rows);
        match grid.offset_bounded(from, dir) {
            Some(to) => {
                prop_assert!(grid.in_bounds(to));
                prop_assert_eq!(to.manhattan(from), 1);
            }
            None => {
                let (dc, dr) = dir.delta();
                prop_assert!(!grid.in_bounds(Position::new(from.col + dc, from.row + dr)));
            }
        }
    }

    /// Across arbitrary play: everything stays on the board, the score never
    /// drops, and the score always matches what was eaten.
    #[test]
    fn prop_play_keeps_bounds_and_score_consistent(
        seed in any::<u32>(),
        cols in 3i32..16,
        rows in 3i32..16,
        commands in prop::collection::vec(prop::option::of(direction()), 1..300)
    ) {
        let mut sim = Simulation::new(small_config(cols, rows), Rng::new(seed)).unwrap();
        let grid = sim.grid();
        let mut previous_score = 0u32;
        let mut expected_score = 0u32;

        for (idx, command) in commands.iter().enumerate() {
            if let Some(dir) = command {
                sim.handle_player_command(*dir);
            }
            let snapshot = sim.tick((idx as u64 + 1) * TICK);

            prop_assert!(grid.in_bounds(snapshot.player.position));
            for wanderer in &snapshot.wanderers {
                prop_assert!(grid.in_bounds(wanderer.position));
            }
            prop_assert!(snapshot.score >= previous_score);
            previous_score = snapshot.score;

            for event in sim.drain_events() {
                if let SimEvent::EntityEaten { kind, .. } = event {
                    expected_score += match kind {
                        EatenKind::Collectible => 10,
                        EatenKind::PowerUp { .. } => 50,
                    };
                }
            }
            prop_assert_eq!(snapshot.score, expected_score);
        }
    }

    /// Once Lost or Won, nothing moves and no events are produced.
    #[test]
    fn prop_terminal_phase_freezes_state(
        seed in any::<u32>(),
        commands in prop::collection::vec(direction(), 1..40)
    ) {
        let config = SimulationConfig {
            cols: 5,
            rows: 5,
            collectible_count: 3,
            power_up_count: 0,
            wanderer_count: 6,
            wanderer_move_interval_ticks: 1,
            wanderer_spawn_clearance: 0,
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::new(config, Rng::new(seed)).unwrap();
        let mut now = 0u64;
        while !sim.phase().is_terminal() && now < 200_000 {
            now += TICK;
            sim.tick(now);
        }
        prop_assume!(sim.phase().is_terminal());
        sim.drain_events();
        let frozen = sim.snapshot();

        for dir in commands {
            now += TICK;
            sim.handle_player_command(dir);
            prop_assert_eq!(sim.tick(now), frozen.clone());
            prop_assert!(sim.drain_events().is_empty());
        }
    }
}
