//! The player's airplane: input-driven movement, firing cooldown, its own
//! bullet pool, and the score/health counters.

use nalgebra::Vector3;

use crate::config::{PlayerConfig, ScoringConfig};
use crate::entities::{Capabilities, Entity, RenderHandle};
use crate::input::{KeySnapshot, BINDINGS};
use crate::resources::SharedTracker;
use crate::timer::SpawnTimer;

pub struct Player {
    pub entity: Entity,
    pub health: i32,
    pub score: u32,
    bullets: Vec<Entity>,
    cooldown: SpawnTimer,
    pressed: KeySnapshot,
    config: PlayerConfig,
    scoring: ScoringConfig,
    frame_bound: f32,
    tracker: SharedTracker,
}

impl Player {
    pub fn new(
        handle: RenderHandle,
        config: PlayerConfig,
        scoring: ScoringConfig,
        bullet_interval_ms: f64,
        frame_bound: f32,
        tracker: SharedTracker,
    ) -> Self {
        let entity = Entity::new(handle, Capabilities::MOVABLE | Capabilities::COLLIDABLE)
            .at(Vector3::new(0.0, 0.0, config.depth));
        Self {
            entity,
            health: config.start_health,
            score: 0,
            bullets: Vec::new(),
            cooldown: SpawnTimer::new(bullet_interval_ms),
            pressed: KeySnapshot::default(),
            config,
            scoring,
            frame_bound,
            tracker,
        }
    }

    pub fn position(&self) -> Vector3<f32> {
        self.entity.position
    }

    pub fn bullets(&self) -> &[Entity] {
        &self.bullets
    }

    pub fn bullets_mut(&mut self) -> &mut [Entity] {
        &mut self.bullets
    }

    /// Keys seen on the most recent `process_input`.
    pub fn pressed(&self) -> &KeySnapshot {
        &self.pressed
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    // ── Movement ─────────────────────────────────────────────────────────────

    /// Would `displacement` keep the airplane inside the play bounds?
    pub fn displacement_valid(&self, displacement: &Vector3<f32>) -> bool {
        let next = self.entity.position + displacement;
        let c = &self.config;
        (c.min_x..=c.max_x).contains(&next.x) && (c.min_y..=c.max_y).contains(&next.y)
    }

    /// Apply every held direction binding.  A step that would leave the
    /// bounds is dropped whole; the rest still apply.
    pub fn process_input(&mut self, delta_time: f64, keys: KeySnapshot) {
        let step = (delta_time as f32) * self.config.speed;
        let mut moving = false;

        for binding in BINDINGS.iter() {
            if !binding.codes.iter().any(|&code| keys.is_pressed(code)) {
                continue;
            }
            let Some(direction) = binding.direction else {
                continue;
            };
            moving = true;

            let displacement = direction.unit() * step;
            if self.displacement_valid(&displacement) {
                self.entity.displace(displacement);
            }
            if let Some(sign) = direction.tilt() {
                self.entity
                    .rotate(Vector3::new(0.0, sign * self.config.tilt, 0.0));
            }
        }

        if !moving {
            self.entity.rotate_none();
        }
        self.pressed = keys;
    }

    // ── Firing ───────────────────────────────────────────────────────────────

    /// Cooldown gate: should a new bullet be requested at `now`?
    pub fn fire(&mut self, now: f64) -> bool {
        self.cooldown.fire_at(now)
    }

    pub fn add_bullet(&mut self, handle: RenderHandle) {
        let mut bullet = Entity::new(handle, Capabilities::MOVABLE | Capabilities::COLLIDABLE)
            .at(self.entity.position);
        bullet.scale = self.entity.scale / 2.0;
        self.tracker.borrow_mut().track(handle);
        self.bullets.push(bullet);
    }

    /// Move live bullets up by `velocity`, then sweep retired and
    /// off-frame bullets out of the pool, keeping survivors in order.
    pub fn update_bullets(&mut self, velocity: f32) {
        let up = Vector3::new(0.0, velocity, 0.0);
        for bullet in self.bullets.iter_mut().filter(|b| !b.is_retired()) {
            bullet.displace(up);
        }

        let bound = self.frame_bound;
        let tracker = &self.tracker;
        self.bullets.retain_mut(|bullet| {
            if bullet.is_retired() || bullet.out_of_frame(bound) {
                bullet.retire();
                tracker.borrow_mut().dispose(bullet.handle);
                return false;
            }
            true
        });
    }

    // ── Scoring ──────────────────────────────────────────────────────────────

    pub fn hit_coin(&mut self) {
        self.score += self.scoring.coin;
    }

    pub fn hit_enemy(&mut self) {
        self.score += self.scoring.enemy;
    }

    pub fn hit_bullet(&mut self) {
        self.health = (self.health - self.scoring.bullet_damage).max(0);
    }

    /// Back to a fresh airplane for a new game.
    pub fn reset(&mut self) {
        self.entity.position = Vector3::new(0.0, 0.0, self.config.depth);
        self.entity.rotate_none();
        self.health = self.config.start_health;
        self.score = 0;
        self.pressed.clear();
        self.cooldown.reset();

        let mut tracker = self.tracker.borrow_mut();
        for bullet in self.bullets.drain(..) {
            tracker.dispose(bullet.handle);
        }
    }
}
