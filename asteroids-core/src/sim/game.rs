use super::*;

#[derive(Clone)]
pub(super) struct Game {
    score: u32,
    frame_count: u32,
    ship: Ship,
    rocks: Vec<Rock>,
    bullets: Vec<Bullet>,
    fire_latch: bool,
    prune_mask: u8,
    spawn: SpawnConfig,
    rng: SeededRng,
}

const PRUNE_ROCKS: u8 = 1 << 0;
const PRUNE_BULLETS: u8 = 1 << 1;

impl Game {
    pub(super) fn new(seed: u32, spawn: SpawnConfig) -> Self {
        let mut game = Self {
            score: 0,
            frame_count: 0,
            ship: Ship {
                position: Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0),
                velocity: Vec2::ZERO,
                angle: SHIP_START_ANGLE,
                radius: SHIP_RADIUS,
                alive: true,
            },
            rocks: Vec::with_capacity(spawn.initial_rocks as usize * 4),
            bullets: Vec::new(),
            fire_latch: false,
            prune_mask: 0,
            spawn,
            rng: SeededRng::new(seed),
        };

        for _ in 0..game.spawn.initial_rocks {
            let rock = game.spawn_large_rock();
            game.rocks.push(rock);
        }

        game
    }

    pub(super) fn step(&mut self, input_byte: u8) {
        self.step_decoded(decode_input_byte(input_byte));
    }

    /// One simulation tick, phases in fixed order: ship controls, rock
    /// motion, bullet motion and expiry, purge, collision resolution, ship
    /// motion. Bullets that expire in the advance phase are dropped by the
    /// same tick's purge; entities killed in the collision phase stay in
    /// their collections (alive = false) until the next tick's purge.
    pub(super) fn step_decoded(&mut self, input: FrameInput) {
        self.frame_count += 1;

        let fired = self.apply_ship_controls(input);
        self.update_rocks();
        self.update_bullets(fired);
        self.prune_dead();
        self.handle_collisions();

        // The ship keeps drifting after death; only its controls stop.
        self.ship.position = wrap_position(self.ship.position);
        self.ship.position.x += self.ship.velocity.x;
        self.ship.position.y += self.ship.velocity.y;
    }

    /// Applies held controls and reports whether a bullet should be fired
    /// this tick. Fire is edge-triggered: the latch clears only when the
    /// fire bit is released, so holding the key fires exactly once. All
    /// actions are gated on the ship being alive.
    fn apply_ship_controls(&mut self, input: FrameInput) -> bool {
        if !input.fire {
            self.fire_latch = false;
        }

        if !self.ship.alive {
            return false;
        }

        if input.left {
            self.ship.angle += SHIP_TURN_AMOUNT;
        }
        if input.right {
            self.ship.angle -= SHIP_TURN_AMOUNT;
        }
        if input.thrust {
            let impulse = thrust_vector(self.ship.angle, SHIP_THRUST_AMOUNT);
            self.ship.velocity.x += impulse.x;
            self.ship.velocity.y += impulse.y;
        }
        if input.reverse {
            let impulse = thrust_vector(self.ship.angle, SHIP_THRUST_AMOUNT);
            self.ship.velocity.x -= impulse.x;
            self.ship.velocity.y -= impulse.y;
        }

        let fired = input.fire && !self.fire_latch;
        if input.fire {
            self.fire_latch = true;
        }

        fired
    }

    fn update_rocks(&mut self) {
        for rock in &mut self.rocks {
            rock.position = wrap_position(rock.position);
            rock.position.x += rock.velocity.x;
            rock.position.y += rock.velocity.y;
            rock.angle += rock.spin;
        }
    }

    /// Moves and ages existing bullets, then materializes a bullet fired this
    /// tick. The new bullet is appended after the sweep so its 60 life ticks
    /// start counting next tick.
    fn update_bullets(&mut self, fired: bool) {
        for bullet in &mut self.bullets {
            bullet.position = wrap_position(bullet.position);
            bullet.position.x += bullet.velocity.x;
            bullet.position.y += bullet.velocity.y;
            bullet.life -= 1;
            if bullet.life <= 0 {
                bullet.alive = false;
                self.prune_mask |= PRUNE_BULLETS;
            }
        }

        if fired {
            self.bullets.push(Bullet {
                position: self.ship.position,
                velocity: thrust_vector(self.ship.angle, BULLET_SPEED),
                angle: self.ship.angle,
                radius: BULLET_RADIUS,
                alive: true,
                life: BULLET_LIFE,
            });
        }
    }

    /// Mark-then-compact removal: deaths only ever set the alive flag; this
    /// pass rebuilds the live collections in stable order. Calling it again
    /// with no intervening deaths is a no-op.
    fn prune_dead(&mut self) {
        if self.prune_mask == 0 {
            return;
        }

        if (self.prune_mask & PRUNE_ROCKS) != 0 {
            self.rocks.retain(|rock| rock.alive);
        }
        if (self.prune_mask & PRUNE_BULLETS) != 0 {
            self.bullets.retain(|bullet| bullet.alive);
        }

        self.prune_mask = 0;
    }

    fn handle_collisions(&mut self) {
        for bullet_index in 0..self.bullets.len() {
            if !self.bullets[bullet_index].alive {
                continue;
            }

            let (bullet_pos, bullet_radius) = {
                let bullet = &self.bullets[bullet_index];
                (bullet.position, bullet.radius)
            };

            for rock_index in 0..self.rocks.len() {
                let rock = &self.rocks[rock_index];
                if !rock.alive {
                    continue;
                }

                if overlaps(bullet_pos, bullet_radius, rock.position, rock.radius) {
                    self.bullets[bullet_index].alive = false;
                    self.prune_mask |= PRUNE_BULLETS;
                    self.score = self.score.saturating_add(1);
                    self.fragment_rock(rock_index);
                    break;
                }
            }
        }

        if !self.ship.alive {
            return;
        }

        for rock in &mut self.rocks {
            if !rock.alive {
                continue;
            }

            if overlaps(
                self.ship.position,
                self.ship.radius,
                rock.position,
                rock.radius,
            ) {
                // Ship impact kills the rock outright: no fragments, no score.
                self.ship.alive = false;
                rock.alive = false;
                self.prune_mask |= PRUNE_ROCKS;
                break;
            }
        }
    }

    /// One-shot fragmentation. The parent is marked dead and its children
    /// join the shared collection immediately, inheriting the parent's
    /// position and x-velocity; the per-tier y (and, for medium splits, x)
    /// offsets push them apart.
    fn fragment_rock(&mut self, rock_index: usize) {
        let (size, position, velocity) = {
            let rock = &mut self.rocks[rock_index];
            rock.alive = false;
            (rock.size, rock.position, rock.velocity)
        };
        self.prune_mask |= PRUNE_ROCKS;

        match size {
            RockSize::Large => {
                self.rocks.push(make_rock(
                    RockSize::Medium,
                    position,
                    Vec2::new(velocity.x, velocity.y + LARGE_SPLIT_MEDIUM_DY),
                ));
                self.rocks.push(make_rock(
                    RockSize::Medium,
                    position,
                    Vec2::new(velocity.x, velocity.y - LARGE_SPLIT_MEDIUM_DY),
                ));
                self.rocks.push(make_rock(
                    RockSize::Small,
                    position,
                    Vec2::new(velocity.x, velocity.y + LARGE_SPLIT_SMALL_DY),
                ));
            }
            RockSize::Medium => {
                self.rocks.push(make_rock(
                    RockSize::Small,
                    position,
                    Vec2::new(
                        velocity.x + MEDIUM_SPLIT_OFFSET,
                        velocity.y + MEDIUM_SPLIT_OFFSET,
                    ),
                ));
                self.rocks.push(make_rock(
                    RockSize::Small,
                    position,
                    Vec2::new(
                        velocity.x - MEDIUM_SPLIT_OFFSET,
                        velocity.y - MEDIUM_SPLIT_OFFSET,
                    ),
                ));
            }
            RockSize::Small => {}
        }
    }

    /// Large rocks draw x, y, then heading from the spawn config, in that
    /// order, and derive velocity from the heading.
    fn spawn_large_rock(&mut self) -> Rock {
        let x = self.rng.next_between(self.spawn.x_range.0, self.spawn.x_range.1);
        let y = self.rng.next_between(self.spawn.y_range.0, self.spawn.y_range.1);
        let heading = self
            .rng
            .next_between(self.spawn.heading_range.0, self.spawn.heading_range.1);

        Rock {
            position: Vec2::new(x as f32, y as f32),
            velocity: heading_velocity(heading as f32, LARGE_ROCK_SPEED),
            angle: 0.0,
            spin: LARGE_ROCK_SPIN,
            radius: LARGE_ROCK_RADIUS,
            size: RockSize::Large,
            alive: true,
        }
    }

    pub(super) fn world_snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            frame_count: self.frame_count,
            score: self.score,
            rng_state: self.rng.state(),
            ship: ShipSnapshot {
                position: self.ship.position,
                velocity: self.ship.velocity,
                angle: self.ship.angle,
                radius: self.ship.radius,
                alive: self.ship.alive,
            },
            rocks: self
                .rocks
                .iter()
                .map(|rock| RockSnapshot {
                    position: rock.position,
                    velocity: rock.velocity,
                    angle: rock.angle,
                    spin: rock.spin,
                    radius: rock.radius,
                    size: rock.size,
                    alive: rock.alive,
                })
                .collect(),
            bullets: self
                .bullets
                .iter()
                .map(|bullet| BulletSnapshot {
                    position: bullet.position,
                    velocity: bullet.velocity,
                    angle: bullet.angle,
                    radius: bullet.radius,
                    alive: bullet.alive,
                    life: bullet.life,
                })
                .collect(),
        }
    }

    #[inline]
    pub(super) fn result(&self) -> ReplayResult {
        ReplayResult {
            final_score: self.score,
            final_rng_state: self.rng.state(),
            frame_count: self.frame_count,
        }
    }

    #[inline]
    pub(super) fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    pub(super) fn frame_count(&self) -> u32 {
        self.frame_count
    }
}

fn make_rock(size: RockSize, position: Vec2, velocity: Vec2) -> Rock {
    let (radius, spin) = match size {
        RockSize::Large => (LARGE_ROCK_RADIUS, LARGE_ROCK_SPIN),
        RockSize::Medium => (MEDIUM_ROCK_RADIUS, MEDIUM_ROCK_SPIN),
        RockSize::Small => (SMALL_ROCK_RADIUS, SMALL_ROCK_SPIN),
    };

    Rock {
        position,
        velocity,
        angle: 0.0,
        spin,
        radius,
        size,
        alive: true,
    }
}
