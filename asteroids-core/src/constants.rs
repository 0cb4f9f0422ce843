//! Game tuning constants.
//!
//! All motion is frame-count based: speeds are world units per tick, spins
//! are degrees per tick. Changing the frame rate changes apparent game speed.

// World dimensions (screen-space units)
pub const WORLD_WIDTH: f32 = 800.0;
pub const WORLD_HEIGHT: f32 = 600.0;

// Ship
pub const SHIP_TURN_AMOUNT: f32 = 3.0; // degrees per tick
pub const SHIP_THRUST_AMOUNT: f32 = 0.25; // velocity impulse per tick held
pub const SHIP_RADIUS: f32 = 30.0;
pub const SHIP_START_ANGLE: f32 = 1.0;

// Bullets. The collision radius is intentionally large relative to the
// sprite; hits are meant to feel generous.
pub const BULLET_RADIUS: f32 = 30.0;
pub const BULLET_SPEED: f32 = 10.0;
pub const BULLET_LIFE: i32 = 60; // ticks

// Rock tiers
pub const INITIAL_ROCK_COUNT: u32 = 5;

pub const LARGE_ROCK_SPIN: f32 = 1.0;
pub const LARGE_ROCK_SPEED: f32 = 1.5;
pub const LARGE_ROCK_RADIUS: f32 = 15.0;

pub const MEDIUM_ROCK_SPIN: f32 = -2.0;
pub const MEDIUM_ROCK_RADIUS: f32 = 5.0;

pub const SMALL_ROCK_SPIN: f32 = 5.0;
pub const SMALL_ROCK_RADIUS: f32 = 2.0;

// Fragmentation velocity offsets. Large splits push children apart on the
// y-axis only; medium splits offset both axes. The asymmetry is part of the
// game's feel and must not be "fixed".
pub const LARGE_SPLIT_MEDIUM_DY: f32 = 2.0;
pub const LARGE_SPLIT_SMALL_DY: f32 = 5.0;
pub const MEDIUM_SPLIT_OFFSET: f32 = 1.5;

// Default large-rock spawn region (inclusive integer draws). Far smaller
// than the world, so the initial field clusters near one corner; drivers
// that want a spread-out field override `SpawnConfig`.
pub const SPAWN_X_MIN: i32 = 1;
pub const SPAWN_X_MAX: i32 = 50;
pub const SPAWN_Y_MIN: i32 = 1;
pub const SPAWN_Y_MAX: i32 = 150;
pub const SPAWN_HEADING_MIN: i32 = 1;
pub const SPAWN_HEADING_MAX: i32 = 50;

// Tape format
pub const TAPE_MAGIC: u32 = 0x524F_434B; // "ROCK"
pub const TAPE_VERSION: u8 = 1;
pub const TAPE_HEADER_SIZE: usize = 16;
pub const TAPE_FOOTER_SIZE: usize = 12;
pub const MAX_FRAMES_DEFAULT: u32 = 108_000; // 30 min at 60fps
