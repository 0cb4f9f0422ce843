//! The simulation world: entities, tick loop, and deterministic replay.

use serde::Serialize;

use crate::constants::{
    BULLET_LIFE, BULLET_RADIUS, BULLET_SPEED, INITIAL_ROCK_COUNT, LARGE_ROCK_RADIUS,
    LARGE_ROCK_SPEED, LARGE_ROCK_SPIN, LARGE_SPLIT_MEDIUM_DY, LARGE_SPLIT_SMALL_DY,
    MEDIUM_ROCK_RADIUS, MEDIUM_ROCK_SPIN, MEDIUM_SPLIT_OFFSET, SHIP_RADIUS, SHIP_START_ANGLE,
    SHIP_THRUST_AMOUNT, SHIP_TURN_AMOUNT, SMALL_ROCK_RADIUS, SMALL_ROCK_SPIN, SPAWN_HEADING_MAX,
    SPAWN_HEADING_MIN, SPAWN_X_MAX, SPAWN_X_MIN, SPAWN_Y_MAX, SPAWN_Y_MIN, WORLD_HEIGHT,
    WORLD_WIDTH,
};
use crate::input::{decode_input_byte, FrameInput};
use crate::math::{heading_velocity, overlaps, thrust_vector, wrap_position, Vec2};
use crate::rng::SeededRng;

mod game;

use game::Game;

/// Rock size tiers, ordered by fragmentation: Large → Medium → Small → gone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RockSize {
    Large,
    Medium,
    Small,
}

#[derive(Clone, Copy, Debug)]
struct Ship {
    position: Vec2,
    velocity: Vec2,
    angle: f32,
    radius: f32,
    alive: bool,
}

#[derive(Clone, Copy, Debug)]
struct Bullet {
    position: Vec2,
    velocity: Vec2,
    angle: f32,
    radius: f32,
    alive: bool,
    life: i32,
}

#[derive(Clone, Copy, Debug)]
struct Rock {
    position: Vec2,
    velocity: Vec2,
    angle: f32,
    spin: f32,
    radius: f32,
    size: RockSize,
    alive: bool,
}

/// Where and how the initial large rocks spawn. The defaults reproduce the
/// original game's constrained region near one corner; ranges are inclusive
/// integer draws.
#[derive(Clone, Copy, Debug)]
pub struct SpawnConfig {
    pub initial_rocks: u32,
    pub x_range: (i32, i32),
    pub y_range: (i32, i32),
    pub heading_range: (i32, i32),
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            initial_rocks: INITIAL_ROCK_COUNT,
            x_range: (SPAWN_X_MIN, SPAWN_X_MAX),
            y_range: (SPAWN_Y_MIN, SPAWN_Y_MAX),
            heading_range: (SPAWN_HEADING_MIN, SPAWN_HEADING_MAX),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ShipSnapshot {
    pub position: Vec2,
    pub velocity: Vec2,
    pub angle: f32,
    pub radius: f32,
    pub alive: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RockSnapshot {
    pub position: Vec2,
    pub velocity: Vec2,
    pub angle: f32,
    pub spin: f32,
    pub radius: f32,
    pub size: RockSize,
    pub alive: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BulletSnapshot {
    pub position: Vec2,
    pub velocity: Vec2,
    pub angle: f32,
    pub radius: f32,
    pub alive: bool,
    pub life: i32,
}

/// Read-only view of the whole world for one frame, consumed by render
/// collaborators and pilots.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub frame_count: u32,
    pub score: u32,
    pub rng_state: u32,
    pub ship: ShipSnapshot,
    pub rocks: Vec<RockSnapshot>,
    pub bullets: Vec<BulletSnapshot>,
}

impl WorldSnapshot {
    pub fn rock_count(&self, size: RockSize) -> usize {
        self.rocks.iter().filter(|rock| rock.size == size).count()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ReplayResult {
    pub final_score: u32,
    pub final_rng_state: u32,
    pub frame_count: u32,
}

/// An owned, steppable game. Drivers feed one input byte per tick and read
/// snapshots back.
pub struct LiveGame {
    game: Game,
}

impl LiveGame {
    pub fn new(seed: u32) -> Self {
        Self::with_config(seed, SpawnConfig::default())
    }

    pub fn with_config(seed: u32, spawn: SpawnConfig) -> Self {
        Self {
            game: Game::new(seed, spawn),
        }
    }

    pub fn step(&mut self, input_byte: u8) {
        self.game.step(input_byte);
    }

    pub fn step_input(&mut self, input: FrameInput) {
        self.game.step_decoded(input);
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        self.game.world_snapshot()
    }

    pub fn result(&self) -> ReplayResult {
        self.game.result()
    }

    pub fn score(&self) -> u32 {
        self.game.score()
    }

    pub fn frame_count(&self) -> u32 {
        self.game.frame_count()
    }
}

/// Re-run a recorded input stream from a seed. Same seed and inputs always
/// produce the same result.
pub fn replay(seed: u32, inputs: &[u8]) -> ReplayResult {
    replay_with_config(seed, SpawnConfig::default(), inputs)
}

pub fn replay_with_config(seed: u32, spawn: SpawnConfig, inputs: &[u8]) -> ReplayResult {
    let mut game = Game::new(seed, spawn);
    for input in inputs {
        game.step(*input);
    }
    game.result()
}
