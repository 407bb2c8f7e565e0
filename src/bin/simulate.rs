use chrono::{SecondsFormat, Utc};
use clap::Parser;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use treat_chase::clock::{Clock, ManualClock};
use treat_chase::config::SimulationConfig;
use treat_chase::driver::TickDriver;
use treat_chase::render::render_text;
use treat_chase::rng::{RandomSource, Rng};
use treat_chase::types::{Direction, EatenKind, Phase, Position, SimEvent, Snapshot};

const AUTOPILOT_INTERVAL_TICKS: u64 = 6;
const AUTOPILOT_GREEDY_PROBABILITY: f32 = 0.75;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Base seed. Scenario `n` runs with `seed + n`.
    #[arg(long)]
    seed: Option<u64>,
    /// Tick budget per scenario.
    #[arg(long, default_value_t = 20_000)]
    ticks: u64,
    #[arg(long, default_value_t = 3)]
    scenarios: usize,
    /// JSON file with `SimulationConfig` overrides.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
    /// Print the final frame of every scenario to stderr.
    #[arg(long)]
    render: bool,
}

#[derive(Clone, Debug)]
struct Scenario {
    name: String,
    seed: u32,
    tick_budget: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventCounts {
    collectibles_eaten: u32,
    power_ups_eaten: u32,
    effects_started: u32,
    effects_ended: u32,
}

impl EventCounts {
    fn record(&mut self, event: &SimEvent) {
        match event {
            SimEvent::EntityEaten {
                kind: EatenKind::Collectible,
                ..
            } => self.collectibles_eaten += 1,
            SimEvent::EntityEaten {
                kind: EatenKind::PowerUp { .. },
                ..
            } => self.power_ups_eaten += 1,
            SimEvent::EffectStarted { .. } => self.effects_started += 1,
            SimEvent::EffectEnded { .. } => self.effects_ended += 1,
            SimEvent::GameOver { .. } | SimEvent::GameWon { .. } => {}
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioResultLine {
    scenario: String,
    seed: u32,
    phase: Phase,
    ticks: u64,
    duration_ms: u64,
    score: u32,
    #[serde(flatten)]
    counts: EventCounts,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    tick: u64,
    message: String,
}

#[derive(Clone, Debug)]
struct ScenarioRunResult {
    result: ScenarioResultLine,
    anomaly_records: Vec<AnomalyRecord>,
    final_frame: Snapshot,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunSummary {
    started_at: String,
    finished_at: String,
    scenario_count: usize,
    anomaly_count: usize,
    average_score: u32,
    average_ticks: u64,
    phase_counts: BTreeMap<String, usize>,
    scenarios: Vec<ScenarioResultLine>,
}

#[derive(Debug, Default)]
struct AnomalyLog {
    messages: Vec<String>,
    records: Vec<AnomalyRecord>,
    seen: HashSet<String>,
}

impl AnomalyLog {
    fn push(&mut self, tick: u64, message: String) {
        self.records.push(AnomalyRecord {
            tick,
            message: message.clone(),
        });
        if self.seen.insert(message.clone()) {
            self.messages.push(message);
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid simulation config");
            std::process::exit(2);
        }
    };
    let scenarios = resolve_scenarios(&cli);
    let started_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut has_anomaly = false;
    let mut results = Vec::new();
    let mut total_anomalies = 0usize;

    for scenario in scenarios {
        info!(scenario = %scenario.name, seed = scenario.seed, "scenario started");
        let run = match run_scenario(&scenario, &config) {
            Ok(run) => run,
            Err(err) => {
                error!(scenario = %scenario.name, error = %err, "scenario setup failed");
                std::process::exit(2);
            }
        };

        for anomaly in &run.anomaly_records {
            warn!(
                scenario = %scenario.name,
                seed = scenario.seed,
                tick = anomaly.tick,
                message = %anomaly.message,
                "anomaly detected"
            );
        }
        has_anomaly |= !run.result.anomalies.is_empty();
        total_anomalies += run.anomaly_records.len();

        info!(
            scenario = %scenario.name,
            phase = ?run.result.phase,
            ticks = run.result.ticks,
            score = run.result.score,
            "scenario finished"
        );
        if cli.render {
            eprint!("{}", render_text(&run.final_frame));
        }

        match serde_json::to_string(&run.result) {
            Ok(line) => println!("{line}"),
            Err(err) => error!(error = %err, "scenario result did not serialize"),
        }
        results.push(run.result);
    }

    let finished_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let summary = build_run_summary(started_at, finished_at, results, total_anomalies);

    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(err) = write_summary(path, &summary) {
            error!(path = %path.display(), error = %err, "summary write failed");
            std::process::exit(2);
        }
    }

    info!(
        scenarios = summary.scenario_count,
        anomalies = summary.anomaly_count,
        average_score = summary.average_score,
        "run finished"
    );

    if has_anomaly {
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> treat_chase::error::Result<SimulationConfig> {
    match path {
        Some(path) => Ok(SimulationConfig::load(path)?),
        None => Ok(SimulationConfig::default()),
    }
}

fn resolve_scenarios(cli: &Cli) -> Vec<Scenario> {
    let base = cli.seed.unwrap_or_else(|| rand::random::<u32>() as u64);
    (0..cli.scenarios)
        .map(|idx| {
            let seed = normalize_seed(base.wrapping_add(idx as u64));
            Scenario {
                name: format!("scenario-{}-seed{}", idx + 1, seed),
                seed,
                tick_budget: cli.ticks.max(1),
            }
        })
        .collect()
}

fn normalize_seed(seed: u64) -> u32 {
    seed as u32
}

fn run_scenario(
    scenario: &Scenario,
    config: &SimulationConfig,
) -> treat_chase::error::Result<ScenarioRunResult> {
    let clock = ManualClock::new(0);
    let mut driver = TickDriver::new(config.clone(), clock, scenario.seed)?;
    let counts: Rc<RefCell<EventCounts>> = Rc::default();
    let sink_counts = Rc::clone(&counts);
    driver.subscribe(move |event: &SimEvent| sink_counts.borrow_mut().record(event));
    driver.start();

    let mut autopilot = Rng::new(scenario.seed ^ 0x9e37_79b9);
    let mut anomalies = AnomalyLog::default();
    let mut previous = driver.snapshot();

    while previous.phase == Phase::Running && previous.tick < scenario.tick_budget {
        if previous.tick % AUTOPILOT_INTERVAL_TICKS == 0 {
            driver.handle_player_command(autopilot_command(&previous, &mut autopilot));
        }
        driver.clock().advance(config.tick_ms);
        let snapshot = driver.tick();
        for message in collect_snapshot_anomalies(&previous, &snapshot) {
            anomalies.push(snapshot.tick, message);
        }
        previous = snapshot;
    }

    if previous.phase.is_terminal() {
        // A finished game must ignore further commands and ticks.
        driver.handle_player_command(Direction::Up);
        driver.clock().advance(config.tick_ms);
        let after = driver.tick();
        if after != previous {
            anomalies.push(
                after.tick,
                format!("state changed after terminal phase {:?}", previous.phase),
            );
        }
    }

    let final_counts = *counts.borrow();
    Ok(ScenarioRunResult {
        result: ScenarioResultLine {
            scenario: scenario.name.clone(),
            seed: scenario.seed,
            phase: previous.phase,
            ticks: previous.tick,
            duration_ms: driver.clock().now_ms(),
            score: previous.score,
            counts: final_counts,
            anomalies: anomalies.messages,
        },
        anomaly_records: anomalies.records,
        final_frame: previous,
    })
}

fn autopilot_command(snapshot: &Snapshot, rng: &mut Rng) -> Direction {
    if rng.bool(AUTOPILOT_GREEDY_PROBABILITY) {
        let from = snapshot.player.position;
        let nearest = snapshot
            .collectibles
            .iter()
            .map(|c| c.position)
            .chain(snapshot.power_ups.iter().map(|p| p.position))
            .min_by_key(|target| target.manhattan(from));
        if let Some(target) = nearest {
            return direction_toward(from, target);
        }
    }
    rng.random_direction()
}

fn direction_toward(from: Position, to: Position) -> Direction {
    let dc = to.col - from.col;
    let dr = to.row - from.row;
    if dc.abs() >= dr.abs() {
        if dc >= 0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dr >= 0 {
        Direction::Down
    } else {
        Direction::Up
    }
}

fn collect_snapshot_anomalies(previous: &Snapshot, current: &Snapshot) -> Vec<String> {
    let mut anomalies = Vec::new();
    let in_bounds =
        |p: Position| p.col >= 0 && p.row >= 0 && p.col < current.cols && p.row < current.rows;

    if !in_bounds(current.player.position) {
        anomalies.push(format!(
            "player out of bounds: ({}, {})",
            current.player.position.col, current.player.position.row
        ));
    }
    for wanderer in &current.wanderers {
        if !in_bounds(wanderer.position) {
            anomalies.push(format!(
                "wanderer {} out of bounds: ({}, {})",
                wanderer.id, wanderer.position.col, wanderer.position.row
            ));
        }
    }
    if current.score < previous.score {
        anomalies.push(format!(
            "score decreased: {} -> {}",
            previous.score, current.score
        ));
    }
    if current.score != current.player.score {
        anomalies.push(format!(
            "score mismatch: {} vs player {}",
            current.score, current.player.score
        ));
    }
    if previous.phase.is_terminal() && current.phase != previous.phase {
        anomalies.push(format!(
            "phase changed after terminal: {:?} -> {:?}",
            previous.phase, current.phase
        ));
    }
    anomalies
}

fn phase_key(phase: Phase) -> String {
    match phase {
        Phase::NotStarted => "not_started",
        Phase::Running => "running",
        Phase::Lost => "lost",
        Phase::Won => "won",
    }
    .to_string()
}

fn build_run_summary(
    started_at: String,
    finished_at: String,
    scenarios: Vec<ScenarioResultLine>,
    anomaly_count: usize,
) -> RunSummary {
    let scenario_count = scenarios.len();
    let mut phase_counts = BTreeMap::new();
    for scenario in &scenarios {
        *phase_counts.entry(phase_key(scenario.phase)).or_insert(0) += 1;
    }
    let (average_score, average_ticks) = if scenario_count == 0 {
        (0, 0)
    } else {
        let total_score: u64 = scenarios.iter().map(|s| s.score as u64).sum();
        let total_ticks: u64 = scenarios.iter().map(|s| s.ticks).sum();
        (
            (total_score / scenario_count as u64) as u32,
            total_ticks / scenario_count as u64,
        )
    };
    RunSummary {
        started_at,
        finished_at,
        scenario_count,
        anomaly_count,
        average_score,
        average_ticks,
        phase_counts,
        scenarios,
    }
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).map_err(io::Error::other)?;
    std::fs::write(path, summary_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use treat_chase::types::PlayerView;

    fn make_result(phase: Phase, score: u32, ticks: u64) -> ScenarioResultLine {
        ScenarioResultLine {
            scenario: "test".to_string(),
            seed: 42,
            phase,
            ticks,
            duration_ms: ticks * 16,
            score,
            counts: EventCounts::default(),
            anomalies: Vec::new(),
        }
    }

    fn make_snapshot(score: u32, phase: Phase, player: Position) -> Snapshot {
        Snapshot {
            tick: 1,
            now_ms: 16,
            cols: 5,
            rows: 5,
            phase,
            score,
            player: PlayerView {
                position: player,
                facing: Direction::Right,
                score,
                effects: Vec::new(),
            },
            collectibles: Vec::new(),
            power_ups: Vec::new(),
            wanderers: Vec::new(),
        }
    }

    #[test]
    fn build_run_summary_averages_and_counts_phases() {
        let summary = build_run_summary(
            "a".to_string(),
            "b".to_string(),
            vec![
                make_result(Phase::Won, 1_000, 300),
                make_result(Phase::Lost, 200, 100),
                make_result(Phase::Lost, 0, 50),
            ],
            0,
        );
        assert_eq!(summary.scenario_count, 3);
        assert_eq!(summary.average_score, 400);
        assert_eq!(summary.average_ticks, 150);
        assert_eq!(summary.phase_counts.get("lost"), Some(&2));
        assert_eq!(summary.phase_counts.get("won"), Some(&1));
    }

    #[test]
    fn build_run_summary_handles_no_scenarios() {
        let summary = build_run_summary("a".to_string(), "b".to_string(), Vec::new(), 0);
        assert_eq!(summary.average_score, 0);
        assert_eq!(summary.average_ticks, 0);
        assert!(summary.phase_counts.is_empty());
    }

    #[test]
    fn write_summary_returns_error_when_parent_does_not_exist() {
        let target = std::env::temp_dir()
            .join(format!("treat-chase-missing-{}", rand::random::<u64>()))
            .join("summary.json");
        let summary = build_run_summary(
            "a".to_string(),
            "b".to_string(),
            vec![make_result(Phase::Won, 10, 5)],
            0,
        );
        assert!(write_summary(&target, &summary).is_err());
    }

    #[test]
    fn anomaly_log_keeps_records_and_deduplicates_messages() {
        let mut log = AnomalyLog::default();
        log.push(10, "same anomaly".to_string());
        log.push(11, "same anomaly".to_string());
        assert_eq!(log.messages.len(), 1);
        assert_eq!(log.records.len(), 2);
        assert_eq!(log.records[1].tick, 11);
    }

    #[test]
    fn snapshot_anomalies_flag_bounds_score_and_phase() {
        let previous = make_snapshot(50, Phase::Lost, Position::new(1, 1));
        let current = make_snapshot(40, Phase::Running, Position::new(5, 0));
        let anomalies = collect_snapshot_anomalies(&previous, &current);
        assert_eq!(anomalies.len(), 3);
        assert!(anomalies[0].starts_with("player out of bounds"));
        assert!(anomalies[1].starts_with("score decreased"));
        assert!(anomalies[2].starts_with("phase changed after terminal"));
    }

    #[test]
    fn direction_toward_prefers_longer_axis() {
        let from = Position::new(2, 2);
        assert_eq!(direction_toward(from, Position::new(6, 3)), Direction::Right);
        assert_eq!(direction_toward(from, Position::new(1, 9)), Direction::Down);
        assert_eq!(direction_toward(from, Position::new(2, 0)), Direction::Up);
    }

    #[test]
    fn scenarios_use_consecutive_seeds() {
        let cli = Cli::parse_from(["simulate", "--seed", "41", "--scenarios", "2"]);
        let scenarios = resolve_scenarios(&cli);
        assert_eq!(scenarios.len(), 2);
        assert_eq!(scenarios[0].seed, 41);
        assert_eq!(scenarios[1].seed, 42);
    }

    #[test]
    fn scenario_run_is_clean_and_deterministic() {
        let config = SimulationConfig::default();
        let scenario = Scenario {
            name: "det".to_string(),
            seed: 77,
            tick_budget: 3_000,
        };
        let first = run_scenario(&scenario, &config).expect("valid");
        let second = run_scenario(&scenario, &config).expect("valid");
        assert!(first.result.anomalies.is_empty(), "{:?}", first.result.anomalies);
        assert_eq!(first.result.ticks, second.result.ticks);
        assert_eq!(first.result.score, second.result.score);
        assert_eq!(first.result.counts, second.result.counts);
        assert_eq!(
            first.result.score,
            first.result.counts.collectibles_eaten * 10 + first.result.counts.power_ups_eaten * 50
        );
    }
}
