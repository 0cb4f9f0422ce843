//! Motion-model math: 2D vectors, toroidal wrap, direction vectors, and the
//! square collision envelope.

use serde::{Deserialize, Serialize};

use crate::constants::{WORLD_HEIGHT, WORLD_WIDTH};

/// Plain x/y pair, used for both positions and velocities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Wrap one axis back into `[0, extent]`. A coordinate past the upper bound
/// is reduced by the extent; one below zero is increased by it.
#[inline]
pub fn wrap_axis(value: f32, extent: f32) -> f32 {
    if value > extent {
        value - extent
    } else if value < 0.0 {
        value + extent
    } else {
        value
    }
}

/// Toroidal wrap against the world bounds. Each axis is checked
/// independently, so a position out of bounds on both axes gets both
/// corrections in the same tick.
#[inline]
pub fn wrap_position(position: Vec2) -> Vec2 {
    Vec2 {
        x: wrap_axis(position.x, WORLD_WIDTH),
        y: wrap_axis(position.y, WORLD_HEIGHT),
    }
}

/// Impulse along a facing angle: "up" at angle 0, so the x-component is the
/// negated sine. Used for ship thrust and bullet muzzle velocity.
#[inline]
pub fn thrust_vector(angle_deg: f32, magnitude: f32) -> Vec2 {
    let radians = angle_deg.to_radians();
    Vec2 {
        x: -radians.sin() * magnitude,
        y: radians.cos() * magnitude,
    }
}

/// Velocity from a spawn heading: standard cos/sin convention, distinct from
/// the thrust axis convention above.
#[inline]
pub fn heading_velocity(heading_deg: f32, speed: f32) -> Vec2 {
    let radians = heading_deg.to_radians();
    Vec2 {
        x: radians.cos() * speed,
        y: radians.sin() * speed,
    }
}

/// Square collision envelope sized by the summed radii: a hit is
/// `|dx| < r1+r2 && |dy| < r1+r2`. Not a true circle test, and deltas are
/// not wrapped across the torus; both quirks are part of the game's hit
/// shape and are kept as-is.
#[inline]
pub fn overlaps(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    let max_dist = a_radius + b_radius;
    (a.x - b.x).abs() < max_dist && (a.y - b.y).abs() < max_dist
}
