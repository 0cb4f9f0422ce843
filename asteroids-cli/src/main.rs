use anyhow::{anyhow, Result};
use asteroids_core::constants::MAX_FRAMES_DEFAULT;
use asteroids_core::tape::{parse_tape, verify_tape};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

mod pilot;
mod runner;
mod sweep;
mod util;

use pilot::{create_pilot, describe_pilots, pilot_ids};
use runner::{run_pilot, write_tape};
use sweep::{run_sweep, SweepConfig};
use util::{parse_seed, seed_sequence, seed_to_hex};

#[derive(Parser, Debug)]
#[command(name = "asteroids-cli")]
#[command(about = "Deterministic Asteroids tape generation, replay, and seed sweeps")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available scripted pilots
    ListPilots,
    /// Drive one pilot on one seed and write a verifiable tape
    Run {
        #[arg(long)]
        pilot: String,
        #[arg(long)]
        seed: String,
        #[arg(long, default_value_t = 3_600)]
        max_frames: u32,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Print run metrics as JSON instead of key=value lines
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Verify an existing tape by replaying its inputs
    Replay {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = MAX_FRAMES_DEFAULT)]
        max_frames: u32,
    },
    /// Run one pilot across many seeds and aggregate the results
    Sweep {
        #[arg(long)]
        pilot: String,
        #[arg(long)]
        seed_start: Option<String>,
        #[arg(long, default_value_t = 12)]
        seed_count: u32,
        #[arg(long, default_value_t = 3_600)]
        max_frames: u32,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long, default_value_t = 4)]
        save_top: usize,
        #[arg(long)]
        jobs: Option<usize>,
    },
}

fn timestamp_suffix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

fn main() -> Result<()> {
    env_logger::init();
    let Cli { command } = Cli::parse();

    match command {
        Commands::ListPilots => {
            for (id, description) in describe_pilots() {
                println!("{id:12} {description}");
            }
        }
        Commands::Run {
            pilot,
            seed,
            max_frames,
            output,
            json,
        } => {
            if create_pilot(&pilot).is_none() {
                let available = pilot_ids().join(", ");
                return Err(anyhow!("unknown pilot '{pilot}'. available: {available}"));
            }
            let seed = parse_seed(&seed)?;
            let mut driver = create_pilot(&pilot).expect("pilot existence checked above");
            let artifact = run_pilot(driver.as_mut(), seed, max_frames)?;

            let output_path = output.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "tapes/{}-{}-score{}.tape",
                    pilot,
                    seed_to_hex(seed).replace("0x", "seed"),
                    artifact.metrics.final_score
                ))
            });
            write_tape(&output_path, &artifact.tape)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&artifact.metrics)?);
            } else {
                println!("pilot={}", artifact.metrics.pilot_id);
                println!("seed={}", seed_to_hex(seed));
                println!("frames={}", artifact.metrics.frame_count);
                println!("score={}", artifact.metrics.final_score);
                println!("ship_alive={}", artifact.metrics.ship_alive);
                println!("rocks_remaining={}", artifact.metrics.rocks_remaining);
                println!("rng={:#010x}", artifact.metrics.final_rng_state);
            }
            println!("output={}", output_path.display());
        }
        Commands::Replay { input, max_frames } => {
            let bytes = fs::read(&input)?;
            let tape = parse_tape(&bytes, max_frames)?;
            let result = verify_tape(&bytes, max_frames)?;
            println!("input={}", input.display());
            println!("seed={}", seed_to_hex(tape.header.seed));
            println!("frame_count={}", tape.header.frame_count);
            println!("final_score={}", result.final_score);
            println!("final_rng_state={:#010x}", result.final_rng_state);
            println!("verified=true");
        }
        Commands::Sweep {
            pilot,
            seed_start,
            seed_count,
            max_frames,
            out_dir,
            save_top,
            jobs,
        } => {
            let start = match seed_start.as_deref() {
                Some(text) => parse_seed(text)?,
                None => timestamp_suffix() as u32,
            };
            let seeds = seed_sequence(start, seed_count);

            let out_dir = out_dir
                .unwrap_or_else(|| PathBuf::from(format!("sweeps/{pilot}-{}", timestamp_suffix())));

            let report = run_sweep(SweepConfig {
                pilot_id: pilot,
                seeds,
                max_frames,
                out_dir: Some(out_dir.clone()),
                save_top,
                jobs,
            })?;

            println!("pilot={}", report.pilot_id);
            println!("seeds={}", report.seed_count);
            println!("avg_score={:.2}", report.avg_score);
            println!("max_score={}", report.max_score);
            println!("survival_rate={:.0}%", report.survival_rate * 100.0);
            println!("out_dir={}", out_dir.display());
            for saved in &report.saved_tapes {
                println!(
                    "  #{:02} {} score={} {}",
                    saved.rank, saved.seed_hex, saved.score, saved.path
                );
            }
        }
    }

    Ok(())
}
