use crate::config::{DifficultyTable, GameConfig};
use crate::error::ConfigError;
use crate::heuristic::Controller;
use crate::world::World;
use atomic_float::AtomicF64;
use chrono::Utc;
use dashmap::DashMap;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResult {
    pub difficulty: String,
    pub games: usize,
    pub mean: f64,
    pub min: u32,
    pub max: u32,
    pub scores: Vec<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    pub profiles: Vec<ProfileResult>,
    /// Mean of the per-profile means.
    pub overall_mean: f64,
}

impl BenchmarkReport {
    pub fn from_profiles(profiles: Vec<ProfileResult>) -> Self {
        let overall_mean = if profiles.is_empty() {
            0.0
        } else {
            profiles.iter().map(|p| p.mean).sum::<f64>() / profiles.len() as f64
        };
        BenchmarkReport {
            profiles,
            overall_mean,
        }
    }
}

/// Seed for game `index`: derived from `base` when given, random otherwise.
fn game_seed(base: Option<u64>, index: usize) -> u64 {
    match base {
        Some(base) => base.wrapping_add(index as u64),
        None => rand::random(),
    }
}

/// Plays one game with no renderer attached and returns the primary score.
pub fn run_headless(
    config: &GameConfig,
    seed: u64,
    primary: &dyn Controller,
    enemy: &dyn Controller,
) -> Result<u32, ConfigError> {
    let mut world = World::new(config, seed)?;
    Ok(world.run_to_completion(primary, enemy))
}

/// Plays `games` games of one profile spread over `num_threads` workers.
/// Each game owns its seeded world, so the scores do not depend on how the
/// games get scheduled.
pub fn run_profile(
    difficulty: &str,
    config: &GameConfig,
    games: usize,
    base_seed: Option<u64>,
    num_threads: usize,
    primary: Arc<dyn Controller>,
    enemy: Arc<dyn Controller>,
) -> Result<ProfileResult, ConfigError> {
    config.validate()?;

    let next_game = Arc::new(AtomicUsize::new(0));
    let scores: Arc<DashMap<usize, u32>> = Arc::new(DashMap::new());
    let total = Arc::new(AtomicF64::new(0.0));

    let handles: Vec<_> = (0..num_threads.clamp(1, games.max(1)))
        .map(|_| {
            let next_game = Arc::clone(&next_game);
            let scores = Arc::clone(&scores);
            let total = Arc::clone(&total);
            let primary = Arc::clone(&primary);
            let enemy = Arc::clone(&enemy);
            let config = config.clone();
            thread::spawn(move || loop {
                let index = next_game.fetch_add(1, Ordering::Relaxed);
                if index >= games {
                    break;
                }
                let seed = game_seed(base_seed, index);
                match run_headless(&config, seed, primary.as_ref(), enemy.as_ref()) {
                    Ok(score) => {
                        scores.insert(index, score);
                        let sum = total.fetch_add(f64::from(score), Ordering::Relaxed)
                            + f64::from(score);
                        let done = scores.len();
                        if done % 100 == 0 {
                            info!(games = done, avg = sum / done as f64, "progress");
                        }
                    }
                    Err(e) => warn!("game {} could not start: {}", index, e),
                }
            })
        })
        .collect();

    for handle in handles {
        if let Err(e) = handle.join() {
            warn!("benchmark worker panicked: {:?}", e);
        }
    }

    let mut ordered: Vec<(usize, u32)> = scores.iter().map(|e| (*e.key(), *e.value())).collect();
    ordered.sort_unstable_by_key(|&(index, _)| index);
    let scores: Vec<u32> = ordered.into_iter().map(|(_, score)| score).collect();

    let played = scores.len();
    let mean = if played == 0 {
        0.0
    } else {
        total.load(Ordering::Relaxed) / played as f64
    };
    let result = ProfileResult {
        difficulty: difficulty.to_string(),
        games: played,
        mean,
        min: scores.iter().copied().min().unwrap_or(0),
        max: scores.iter().copied().max().unwrap_or(0),
        scores,
    };
    info!(
        difficulty,
        games = result.games,
        mean = result.mean,
        min = result.min,
        max = result.max,
        "profile finished"
    );
    Ok(result)
}

/// Runs every profile in `table`, in name order.
pub fn run_all(
    table: &DifficultyTable,
    games: usize,
    base_seed: Option<u64>,
    num_threads: usize,
    primary: Arc<dyn Controller>,
    enemy: Arc<dyn Controller>,
) -> Result<BenchmarkReport, ConfigError> {
    let profiles = table
        .difficulties
        .iter()
        .map(|(name, config)| {
            run_profile(
                name,
                config,
                games,
                base_seed,
                num_threads,
                Arc::clone(&primary),
                Arc::clone(&enemy),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(BenchmarkReport::from_profiles(profiles))
}

/// Writes the report as `<timestamp>_<uuid>.json` under `dir`.
pub fn write_report(report: &BenchmarkReport, dir: &Path) -> Result<PathBuf, std::io::Error> {
    std::fs::create_dir_all(dir)?;

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S%.6f").to_string();
    let file_name = format!("{}_{}.json", timestamp, Uuid::new_v4());
    let path = dir.join(file_name);

    let mut file = File::create(&path)?;
    let json_data = serde_json::to_string_pretty(report)?;
    file.write_all(json_data.as_bytes())?;

    info!(path = %path.display(), "benchmark report written");
    Ok(path)
}
