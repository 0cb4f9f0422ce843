use crate::pilot::create_pilot;
use crate::runner::{run_pilot, write_tape, RunMetrics};
use crate::util::seed_to_hex;
use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

pub struct SweepConfig {
    pub pilot_id: String,
    pub seeds: Vec<u32>,
    pub max_frames: u32,
    pub out_dir: Option<PathBuf>,
    pub save_top: usize,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SeedOutcome {
    pub seed: u32,
    pub seed_hex: String,
    pub final_score: u32,
    pub ship_alive: bool,
    pub rocks_remaining: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct SavedTapeRecord {
    pub rank: usize,
    pub seed_hex: String,
    pub score: u32,
    pub path: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct SweepReport {
    pub pilot_id: String,
    pub max_frames: u32,
    pub seed_count: usize,
    pub avg_score: f64,
    pub max_score: u32,
    pub survival_rate: f64,
    pub outcomes: Vec<SeedOutcome>,
    pub saved_tapes: Vec<SavedTapeRecord>,
}

struct InternalRun {
    metrics: RunMetrics,
    tape: Vec<u8>,
}

pub fn run_sweep(config: SweepConfig) -> Result<SweepReport> {
    if config.seeds.is_empty() {
        return Err(anyhow!("sweep requires at least one seed"));
    }
    if create_pilot(&config.pilot_id).is_none() {
        return Err(anyhow!("unknown pilot '{}'", config.pilot_id));
    }

    let run_one = |seed: &u32| -> Result<InternalRun> {
        // Pilots carry per-run state, so each seed gets a fresh instance.
        let mut pilot = create_pilot(&config.pilot_id)
            .ok_or_else(|| anyhow!("unknown pilot '{}'", config.pilot_id))?;
        let artifact = run_pilot(pilot.as_mut(), *seed, config.max_frames)?;
        Ok(InternalRun {
            metrics: artifact.metrics,
            tape: artifact.tape,
        })
    };

    let runs: Vec<InternalRun> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed building sweep thread pool")?;
        pool.install(|| {
            config
                .seeds
                .par_iter()
                .map(run_one)
                .collect::<Result<Vec<_>>>()
        })
    } else {
        config.seeds.par_iter().map(run_one).collect::<Result<Vec<_>>>()
    }?;

    let seed_count = runs.len();
    let total_score: u64 = runs.iter().map(|run| run.metrics.final_score as u64).sum();
    let max_score = runs
        .iter()
        .map(|run| run.metrics.final_score)
        .max()
        .unwrap_or(0);
    let survivors = runs.iter().filter(|run| run.metrics.ship_alive).count();

    let outcomes: Vec<SeedOutcome> = runs
        .iter()
        .map(|run| SeedOutcome {
            seed: run.metrics.seed,
            seed_hex: seed_to_hex(run.metrics.seed),
            final_score: run.metrics.final_score,
            ship_alive: run.metrics.ship_alive,
            rocks_remaining: run.metrics.rocks_remaining,
        })
        .collect();

    let mut saved_tapes = Vec::new();
    if let Some(out_dir) = &config.out_dir {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("failed creating {}", out_dir.display()))?;

        let mut ranked: Vec<&InternalRun> = runs.iter().collect();
        ranked.sort_by(|a, b| b.metrics.final_score.cmp(&a.metrics.final_score));

        for (rank, run) in ranked.iter().take(config.save_top).enumerate() {
            let file_name = format!(
                "{}-{}-score{}.tape",
                config.pilot_id,
                seed_to_hex(run.metrics.seed).replace("0x", "seed"),
                run.metrics.final_score
            );
            let path = out_dir.join(file_name);
            write_tape(&path, &run.tape)?;
            saved_tapes.push(SavedTapeRecord {
                rank: rank + 1,
                seed_hex: seed_to_hex(run.metrics.seed),
                score: run.metrics.final_score,
                path: path.display().to_string(),
            });
        }
    }

    let report = SweepReport {
        pilot_id: config.pilot_id,
        max_frames: config.max_frames,
        seed_count,
        avg_score: total_score as f64 / seed_count as f64,
        max_score,
        survival_rate: survivors as f64 / seed_count as f64,
        outcomes,
        saved_tapes,
    };

    if let Some(out_dir) = &config.out_dir {
        let summary_path = out_dir.join("summary.json");
        let encoded = serde_json::to_vec_pretty(&report)?;
        fs::write(&summary_path, encoded)
            .with_context(|| format!("failed writing {}", summary_path.display()))?;
        log::info!("wrote sweep summary {}", summary_path.display());
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::seed_sequence;

    #[test]
    fn sweep_aggregates_across_seeds() {
        let report = run_sweep(SweepConfig {
            pilot_id: "spinner".to_string(),
            seeds: seed_sequence(0xA57E_0001, 4),
            max_frames: 240,
            out_dir: None,
            save_top: 0,
            jobs: Some(2),
        })
        .unwrap();

        assert_eq!(report.seed_count, 4);
        assert_eq!(report.outcomes.len(), 4);
        assert!(report.avg_score <= report.max_score as f64);
        assert!(report.saved_tapes.is_empty());
    }

    #[test]
    fn sweep_rejects_empty_seed_list() {
        let config = SweepConfig {
            pilot_id: "drifter".to_string(),
            seeds: Vec::new(),
            max_frames: 60,
            out_dir: None,
            save_top: 0,
            jobs: None,
        };
        assert!(run_sweep(config).is_err());
    }

    #[test]
    fn sweep_saves_top_tapes_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let report = run_sweep(SweepConfig {
            pilot_id: "cruiser".to_string(),
            seeds: seed_sequence(0x0BAD_F00D, 3),
            max_frames: 180,
            out_dir: Some(dir.path().to_path_buf()),
            save_top: 2,
            jobs: None,
        })
        .unwrap();

        assert_eq!(report.saved_tapes.len(), 2);
        assert!(report.saved_tapes[0].score >= report.saved_tapes[1].score);
        assert!(dir.path().join("summary.json").exists());
        for saved in &report.saved_tapes {
            assert!(PathBuf::from(&saved.path).exists());
        }
    }
}
