//! Satoshi's Dungeon headless simulator
//!
//! Plays seeded runs with a simple autopilot, using the same `Game::tick`
//! the real front end drives, and prints a summary per run.
//!
//! Usage:
//!   cargo run --bin simulator -- [OPTIONS]
//!
//! Options:
//!   --runs N          Number of runs with incrementing seeds (default: 5)
//!   --seed N          RNG seed (default: 42)
//!   --max-seconds N   Game-time cap per run (default: 600)
//!   --config FILE     Load a GameConfig JSON file
//!   --persist         Use ~/.satoshi-dungeon/progress.json instead of memory
//!   --quiet           Only the final summary line

use std::path::PathBuf;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::SeedableRng;
use satoshi_dungeon::core::constants::TICK_STEP_MS;
use satoshi_dungeon::entities::{EntityClass, EntityRegistry, Vec2};
use satoshi_dungeon::progress::{JsonFileStore, MemoryStore, ProgressStore};
use satoshi_dungeon::upgrades::{next_cost, UpgradeId};
use satoshi_dungeon::{Game, GameConfig, GameEvent, PlayerInput, RunPhase};
use tracing_subscriber::EnvFilter;

// ── CLI Configuration ────────────────────────────────────────────────

struct SimConfig {
    runs: u64,
    seed: u64,
    max_seconds: u64,
    config_path: Option<PathBuf>,
    persist: bool,
    quiet: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            runs: 5,
            seed: 42,
            max_seconds: 600,
            config_path: None,
            persist: false,
            quiet: false,
        }
    }
}

fn parse_args() -> SimConfig {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match parse_arg_list(&args) {
        Ok(Some(config)) => config,
        Ok(None) => {
            print_usage();
            std::process::exit(0);
        }
        Err(message) => {
            eprintln!("{message}");
            print_usage();
            std::process::exit(1);
        }
    }
}

/// Parse the arguments after the program name. `Ok(None)` means help was
/// requested.
fn parse_arg_list(args: &[String]) -> Result<Option<SimConfig>, String> {
    let mut config = SimConfig::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                config.runs = flag_value(args, i, "--runs")?;
            }
            "--seed" => {
                i += 1;
                config.seed = flag_value(args, i, "--seed")?;
            }
            "--max-seconds" => {
                i += 1;
                config.max_seconds = flag_value(args, i, "--max-seconds")?;
            }
            "--config" => {
                i += 1;
                config.config_path = Some(flag_value(args, i, "--config")?);
            }
            "--persist" => config.persist = true,
            "--quiet" => config.quiet = true,
            "--help" | "-h" => return Ok(None),
            other => return Err(format!("Unknown argument: {other}")),
        }
        i += 1;
    }
    Ok(Some(config))
}

fn flag_value<T: FromStr>(args: &[String], i: usize, flag: &str) -> Result<T, String> {
    let raw = args.get(i).ok_or_else(|| format!("{flag} requires a value"))?;
    raw.parse().map_err(|_| format!("Invalid value for {flag}: {raw}"))
}

fn print_usage() {
    eprintln!(
        "Satoshi's Dungeon Headless Simulator\n\
         \n\
         Usage: simulator [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --runs N          Number of runs with incrementing seeds (default: 5)\n\
         \x20 --seed N          RNG seed (default: 42)\n\
         \x20 --max-seconds N   Game-time cap per run (default: 600)\n\
         \x20 --config FILE     Load a GameConfig JSON file\n\
         \x20 --persist         Save progress to ~/.satoshi-dungeon/progress.json\n\
         \x20 --quiet           Only final summary line\n\
         \x20 --help, -h        Show this help"
    );
}

// ── Autopilot ────────────────────────────────────────────────────────

const KITE_DISTANCE: f32 = 120.0;

#[derive(Debug, Default)]
struct RunReport {
    seconds: u64,
    score: u64,
    level: u32,
    kills: u32,
    bosses_killed: u32,
    powerups: u32,
    crits: u32,
    achievements: u32,
    died: bool,
}

fn nearest(registry: &EntityRegistry, class: EntityClass, from: Vec2) -> Option<Vec2> {
    let mut best: Option<(f32, Vec2)> = None;
    registry.for_each(class, |entity| {
        let distance = entity.position.distance(from);
        if best.map_or(true, |(d, _)| distance < d) {
            best = Some((distance, entity.position));
        }
    });
    best.map(|(_, position)| position)
}

/// Decide this frame's movement and input.
fn drive(game: &mut Game) {
    let Some(player) = game.registry().player().and_then(|id| game.registry().position(id))
    else {
        return;
    };
    let registry = game.registry();
    let target = nearest(registry, EntityClass::Boss, player)
        .or_else(|| nearest(registry, EntityClass::Enemy, player));
    let threat = nearest(registry, EntityClass::Enemy, player);
    let pickup = nearest(registry, EntityClass::Powerup, player);

    let movement = match (threat, pickup) {
        (Some(enemy), _) if enemy.distance(player) < KITE_DISTANCE => (player - enemy).normalized(),
        (_, Some(powerup)) => (powerup - player).normalized(),
        _ => (game.arena_bounds().center() - player).scale(0.01),
    };
    game.set_movement(movement);

    let input = match target {
        Some(point) if game.run().can_afford_attack() => PlayerInput::Attack { point },
        _ => PlayerInput::Mine,
    };
    game.push_input(input);
}

fn play_run(game: &mut Game, rng: &mut StdRng, max_seconds: u64) -> RunReport {
    let mut report = RunReport::default();
    game.start_run(rng);
    let max_ms = max_seconds * 1000;
    let mut elapsed = 0;

    while elapsed < max_ms {
        if let RunPhase::ChoosingPerk(choices) = game.phase() {
            if let Some(perk) = choices.first().copied() {
                if let Err(e) = game.select_perk(perk) {
                    tracing::warn!(error = %e, "autopilot failed to pick a perk");
                    break;
                }
            }
        }
        drive(game);
        let result = game.tick(TICK_STEP_MS, rng);
        elapsed += TICK_STEP_MS;

        for event in &result.events {
            match event {
                GameEvent::EnemyHit { crit: true, .. } | GameEvent::BossHit { crit: true, .. } => {
                    report.crits += 1
                }
                GameEvent::AchievementUnlocked { .. } => report.achievements += 1,
                _ => {}
            }
        }
        if result.run_ended().is_some() {
            report.died = true;
            break;
        }
    }

    let summary = match game.phase() {
        RunPhase::Ended(summary) => *summary,
        _ => game.run().summary(),
    };
    report.seconds = elapsed / 1000;
    report.score = summary.score;
    report.level = summary.level;
    report.kills = summary.kills;
    report.bosses_killed = summary.bosses_killed;
    report.powerups = summary.powerups_collected;
    report
}

/// Spend leftover score on the cheapest affordable upgrade until nothing is
/// affordable.
fn buy_upgrades(game: &mut Game) -> Vec<UpgradeId> {
    let mut bought = Vec::new();
    loop {
        let score = game.run().score;
        let cheapest = UpgradeId::ALL
            .into_iter()
            .filter_map(|id| next_cost(id, game.progress()).map(|cost| (cost, id)))
            .filter(|(cost, _)| *cost <= score)
            .min();
        let Some((_, id)) = cheapest else {
            break;
        };
        match game.purchase_upgrade(id) {
            Ok(_) => bought.push(id),
            Err(_) => break,
        }
    }
    bought
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let sim = parse_args();
    let game_config = match &sim.config_path {
        Some(path) => match GameConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        None => GameConfig::default(),
    };
    let store: Box<dyn ProgressStore> = if sim.persist {
        match JsonFileStore::default_location() {
            Ok(store) => Box::new(store),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    } else {
        Box::new(MemoryStore::new())
    };

    let mut game = Game::new(game_config, store);
    let mut best_score = 0;
    let mut total_kills = 0u64;
    let mut total_levels = 0u64;

    for run in 0..sim.runs {
        let mut rng = StdRng::seed_from_u64(sim.seed.wrapping_add(run));
        let report = play_run(&mut game, &mut rng, sim.max_seconds);
        let bought = buy_upgrades(&mut game);

        best_score = best_score.max(report.score);
        total_kills += report.kills as u64;
        total_levels += report.level as u64;

        if !sim.quiet {
            println!(
                "run {:>3} | {:>4}s | {} | score {:>6} | level {:>2} | kills {:>4} | \
                 bosses {} | powerups {:>2} | crits {:>3} | achievements {} | bought {:?}",
                run + 1,
                report.seconds,
                if report.died { "died  " } else { "capped" },
                report.score,
                report.level,
                report.kills,
                report.bosses_killed,
                report.powerups,
                report.crits,
                report.achievements,
                bought.iter().map(|id| id.key()).collect::<Vec<_>>(),
            );
        }
    }

    let runs = sim.runs.max(1);
    println!(
        "{} runs | best score {} | avg level {:.1} | avg kills {:.1} | achievements {}/{}{}",
        sim.runs,
        best_score,
        total_levels as f64 / runs as f64,
        total_kills as f64 / runs as f64,
        game.progress().unlocked_count(),
        satoshi_dungeon::achievements::ALL_ACHIEVEMENTS.len(),
        if game.save_pending() { " | save pending" } else { "" },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn test_parse_value_flags() {
        let config = parse_arg_list(&args(&["--runs", "3", "--seed", "7", "--quiet"]))
            .unwrap()
            .unwrap();
        assert_eq!(config.runs, 3);
        assert_eq!(config.seed, 7);
        assert_eq!(config.max_seconds, 600);
        assert!(config.quiet);
    }

    #[test]
    fn test_trailing_value_flag_is_an_error() {
        for flag in ["--runs", "--seed", "--max-seconds", "--config"] {
            let result = parse_arg_list(&args(&["--quiet", flag]));
            assert_eq!(result.err(), Some(format!("{flag} requires a value")));
        }
    }

    #[test]
    fn test_malformed_value_is_an_error() {
        let result = parse_arg_list(&args(&["--runs", "many"]));
        assert_eq!(result.err(), Some("Invalid value for --runs: many".to_string()));
    }

    #[test]
    fn test_help_and_unknown_flags() {
        assert!(matches!(parse_arg_list(&args(&["-h"])), Ok(None)));
        assert!(parse_arg_list(&args(&["--fast"])).is_err());
    }
}
