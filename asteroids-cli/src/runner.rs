use crate::pilot::Pilot;
use anyhow::{anyhow, Context, Result};
use asteroids_core::input::encode_input_byte;
use asteroids_core::sim::{LiveGame, RockSize};
use asteroids_core::tape::{serialize_tape, verify_tape};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize)]
pub struct RunMetrics {
    pub pilot_id: String,
    pub seed: u32,
    pub max_frames: u32,
    pub frame_count: u32,
    pub final_score: u32,
    pub final_rng_state: u32,
    pub ship_alive: bool,
    pub rocks_remaining: usize,
    pub large_rocks: usize,
    pub medium_rocks: usize,
    pub small_rocks: usize,
    pub action_frames: u32,
    pub turn_frames: u32,
    pub thrust_frames: u32,
    pub fire_frames: u32,
}

#[derive(Clone, Debug)]
pub struct RunArtifact {
    pub metrics: RunMetrics,
    pub inputs: Vec<u8>,
    pub tape: Vec<u8>,
}

pub fn run_pilot(pilot: &mut dyn Pilot, seed: u32, max_frames: u32) -> Result<RunArtifact> {
    if max_frames == 0 {
        return Err(anyhow!("max_frames must be > 0"));
    }

    pilot.reset(seed);

    let mut game = LiveGame::new(seed);
    let mut inputs = Vec::with_capacity(max_frames as usize);

    for _ in 0..max_frames {
        let snapshot = game.snapshot();
        let input = pilot.next_input(&snapshot);
        let byte = encode_input_byte(input);
        inputs.push(byte);
        game.step(byte);
    }

    let result = game.result();
    let tape = serialize_tape(seed, &inputs, result.final_score, result.final_rng_state);
    verify_tape(&tape, max_frames)
        .map_err(|err| anyhow!("generated tape failed verification: {err}"))?;

    let final_world = game.snapshot();

    let mut action_frames = 0u32;
    let mut turn_frames = 0u32;
    let mut thrust_frames = 0u32;
    let mut fire_frames = 0u32;
    for byte in &inputs {
        if *byte != 0 {
            action_frames += 1;
        }
        if (*byte & 0x03) != 0 {
            turn_frames += 1;
        }
        if (*byte & 0x0C) != 0 {
            thrust_frames += 1;
        }
        if (*byte & 0x10) != 0 {
            fire_frames += 1;
        }
    }

    log::debug!(
        "run complete: pilot={} seed={:#010x} score={} frames={}",
        pilot.id(),
        seed,
        result.final_score,
        result.frame_count
    );

    Ok(RunArtifact {
        metrics: RunMetrics {
            pilot_id: pilot.id().to_string(),
            seed,
            max_frames,
            frame_count: result.frame_count,
            final_score: result.final_score,
            final_rng_state: result.final_rng_state,
            ship_alive: final_world.ship.alive,
            rocks_remaining: final_world.rocks.len(),
            large_rocks: final_world.rock_count(RockSize::Large),
            medium_rocks: final_world.rock_count(RockSize::Medium),
            small_rocks: final_world.rock_count(RockSize::Small),
            action_frames,
            turn_frames,
            thrust_frames,
            fire_frames,
        },
        inputs,
        tape,
    })
}

pub fn write_tape(path: &Path, tape: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed creating {}", parent.display()))?;
        }
    }
    fs::write(path, tape).with_context(|| format!("failed writing {}", path.display()))?;
    log::info!("wrote tape {} ({} bytes)", path.display(), tape.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pilot::create_pilot;
    use asteroids_core::tape::parse_tape;

    #[test]
    fn drifter_run_produces_a_verifiable_tape() {
        let mut pilot = create_pilot("drifter").unwrap();
        let artifact = run_pilot(pilot.as_mut(), 0xA57E_0001, 300).unwrap();

        assert_eq!(artifact.metrics.frame_count, 300);
        assert_eq!(artifact.metrics.final_score, 0);
        assert_eq!(artifact.metrics.action_frames, 0);
        assert_eq!(artifact.inputs.len(), 300);
        assert!(verify_tape(&artifact.tape, 300).is_ok());
    }

    #[test]
    fn spinner_presses_fire_on_alternating_ticks() {
        let mut pilot = create_pilot("spinner").unwrap();
        let artifact = run_pilot(pilot.as_mut(), 7, 100).unwrap();

        assert!(artifact.metrics.fire_frames > 0);
        assert!(artifact.metrics.fire_frames < 100);
        assert_eq!(artifact.metrics.turn_frames, artifact.metrics.action_frames);
    }

    #[test]
    fn identical_runs_yield_identical_tapes() {
        let mut a = create_pilot("cruiser").unwrap();
        let mut b = create_pilot("cruiser").unwrap();
        let run_a = run_pilot(a.as_mut(), 0x1234_5678, 500).unwrap();
        let run_b = run_pilot(b.as_mut(), 0x1234_5678, 500).unwrap();
        assert_eq!(run_a.tape, run_b.tape);
    }

    #[test]
    fn zero_frames_is_rejected() {
        let mut pilot = create_pilot("drifter").unwrap();
        assert!(run_pilot(pilot.as_mut(), 1, 0).is_err());
    }

    #[test]
    fn written_tape_round_trips_through_the_filesystem() {
        let mut pilot = create_pilot("spinner").unwrap();
        let artifact = run_pilot(pilot.as_mut(), 0xFEED_BEEF, 120).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs").join("spinner.tape");
        write_tape(&path, &artifact.tape).unwrap();

        let bytes = fs::read(&path).unwrap();
        let tape = parse_tape(&bytes, 120).unwrap();
        assert_eq!(tape.header.seed, 0xFEED_BEEF);
        assert_eq!(tape.header.frame_count, 120);
    }
}
