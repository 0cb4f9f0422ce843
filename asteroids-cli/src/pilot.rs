//! Scripted pilots: stand-ins for the human input collaborator. Each pilot
//! turns a world snapshot into the set of controls held for the next tick.

use asteroids_core::input::FrameInput;
use asteroids_core::sim::WorldSnapshot;

pub trait Pilot {
    fn id(&self) -> &'static str;
    fn reset(&mut self, seed: u32);
    fn next_input(&mut self, world: &WorldSnapshot) -> FrameInput;
}

/// Never touches the controls. Useful as a do-nothing baseline and for
/// lifetime/drift measurements.
pub struct Drifter;

impl Pilot for Drifter {
    fn id(&self) -> &'static str {
        "drifter"
    }

    fn reset(&mut self, _seed: u32) {}

    fn next_input(&mut self, _world: &WorldSnapshot) -> FrameInput {
        FrameInput::default()
    }
}

/// Holds a turn and taps fire every other tick. Fire is edge-triggered in
/// the sim, so the release tick between presses is what makes each press
/// count.
pub struct Spinner {
    tick: u32,
    turn_left: bool,
}

impl Spinner {
    pub fn new() -> Self {
        Self {
            tick: 0,
            turn_left: true,
        }
    }
}

impl Pilot for Spinner {
    fn id(&self) -> &'static str {
        "spinner"
    }

    fn reset(&mut self, seed: u32) {
        self.tick = 0;
        self.turn_left = seed & 1 == 0;
    }

    fn next_input(&mut self, world: &WorldSnapshot) -> FrameInput {
        self.tick += 1;
        if !world.ship.alive {
            return FrameInput::default();
        }

        FrameInput {
            left: self.turn_left,
            right: !self.turn_left,
            thrust: false,
            reverse: false,
            fire: self.tick % 2 == 0,
        }
    }
}

/// Burns the engine for a short opening burst, then spins and taps fire.
/// Covers thrust, turn, and fire paths in one run.
pub struct Cruiser {
    tick: u32,
}

impl Cruiser {
    pub fn new() -> Self {
        Self { tick: 0 }
    }
}

impl Pilot for Cruiser {
    fn id(&self) -> &'static str {
        "cruiser"
    }

    fn reset(&mut self, _seed: u32) {
        self.tick = 0;
    }

    fn next_input(&mut self, world: &WorldSnapshot) -> FrameInput {
        self.tick += 1;
        if !world.ship.alive {
            return FrameInput::default();
        }

        if self.tick <= 30 {
            return FrameInput {
                thrust: true,
                ..FrameInput::default()
            };
        }

        FrameInput {
            left: true,
            fire: self.tick % 3 == 0,
            ..FrameInput::default()
        }
    }
}

pub fn pilot_ids() -> Vec<&'static str> {
    vec!["drifter", "spinner", "cruiser"]
}

pub fn describe_pilots() -> Vec<(&'static str, &'static str)> {
    vec![
        ("drifter", "never touches the controls"),
        ("spinner", "holds a turn and taps fire every other tick"),
        ("cruiser", "opening thrust burst, then spins and taps fire"),
    ]
}

pub fn create_pilot(id: &str) -> Option<Box<dyn Pilot>> {
    match id {
        "drifter" => Some(Box::new(Drifter)),
        "spinner" => Some(Box::new(Spinner::new())),
        "cruiser" => Some(Box::new(Cruiser::new())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_pilot_can_be_created() {
        for id in pilot_ids() {
            let pilot = create_pilot(id).expect("listed pilot must exist");
            assert_eq!(pilot.id(), id);
        }
    }

    #[test]
    fn unknown_pilot_is_rejected() {
        assert!(create_pilot("warp-daemon").is_none());
    }
}
