//! Homogeneous "move until off-screen, then retire" pools: background
//! scenery, coins and enemy bullets.

use std::f32::consts::PI;

use nalgebra::Vector3;
use rand::Rng;

use crate::entities::{Capabilities, Entity, EntityClass, RenderHandle, RenderView};
use crate::resources::SharedTracker;

/// Background tiles sit behind the play plane.
pub const SCENERY_Z: f32 = -1.0;
/// Default depth of the play plane; see `Pool::on_plane`.
pub const PLAY_Z: f32 = 1.0;
/// New scenery and coins appear just above the visible field.
pub const SPAWN_Y: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scenery {
    Lighthouse,
    Mountain,
}

impl Scenery {
    pub fn random(rng: &mut impl Rng) -> Self {
        if rng.gen_bool(0.5) {
            Scenery::Lighthouse
        } else {
            Scenery::Mountain
        }
    }

    pub fn asset(self) -> &'static str {
        match self {
            Scenery::Lighthouse => "lighthouse.glb",
            Scenery::Mountain => "mountain.glb",
        }
    }
}

/// Per-pool behavior: where members spawn and how they move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolKind {
    Background,
    Coins,
    EnemyBullets,
}

impl PoolKind {
    fn capabilities(self) -> Capabilities {
        match self {
            PoolKind::Background => Capabilities::MOVABLE,
            PoolKind::Coins => {
                Capabilities::MOVABLE | Capabilities::COLLIDABLE | Capabilities::SPINNING
            }
            PoolKind::EnemyBullets => Capabilities::MOVABLE | Capabilities::COLLIDABLE,
        }
    }

    fn class(self) -> EntityClass {
        match self {
            PoolKind::Background => EntityClass::Scenery,
            PoolKind::Coins => EntityClass::Coin,
            PoolKind::EnemyBullets => EntityClass::EnemyBullet,
        }
    }
}

pub struct Pool {
    kind: PoolKind,
    members: Vec<Entity>,
    /// Spawn depth for `add`.
    depth: f32,
    frame_bound: f32,
    tracker: SharedTracker,
}

impl Pool {
    pub fn new(kind: PoolKind, frame_bound: f32, tracker: SharedTracker) -> Self {
        let depth = match kind {
            PoolKind::Background => SCENERY_Z,
            PoolKind::Coins | PoolKind::EnemyBullets => PLAY_Z,
        };
        Self {
            kind,
            members: Vec::new(),
            depth,
            frame_bound,
            tracker,
        }
    }

    /// Move the play plane to `z`.  Background scenery stays behind it.
    pub fn on_plane(mut self, z: f32) -> Self {
        if self.kind != PoolKind::Background {
            self.depth = z;
        }
        self
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn kind(&self) -> PoolKind {
        self.kind
    }

    pub fn members(&self) -> &[Entity] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.members.iter().filter(|m| !m.is_retired()).count()
    }

    /// Spawn at a random x across the field, just above the top edge.
    pub fn add(&mut self, handle: RenderHandle, rng: &mut impl Rng) {
        let x = rng.gen_range(-1.0..1.0);
        let mut entity = Entity::new(handle, self.kind.capabilities())
            .at(Vector3::new(x, SPAWN_Y, self.depth));
        if self.kind == PoolKind::Coins {
            entity.rotation.x = PI / 2.0;
        }
        self.push(entity);
    }

    /// Spawn at an explicit position, e.g. an enemy's muzzle.
    pub fn add_at(&mut self, handle: RenderHandle, position: Vector3<f32>) {
        let mut entity = Entity::new(handle, self.kind.capabilities()).at(position);
        if self.kind == PoolKind::EnemyBullets {
            entity.rotation.x = PI;
        }
        self.push(entity);
    }

    fn push(&mut self, entity: Entity) {
        self.tracker.borrow_mut().track(entity.handle);
        self.members.push(entity);
    }

    /// Move every live member down by `velocity`; spinners follow `time`.
    /// Members leaving the frame are retired and disposed on the spot, then
    /// all retired members are swept out.
    pub fn update(&mut self, velocity: f32, time: f32) {
        let down = Vector3::new(0.0, -velocity, 0.0);
        let bound = self.frame_bound;

        for member in self.members.iter_mut().filter(|m| !m.is_retired()) {
            if member.capabilities.contains(Capabilities::MOVABLE) {
                member.displace(down);
            }
            if member.capabilities.contains(Capabilities::SPINNING) {
                member.rotation.y = time;
            }
            if member.out_of_frame(bound) && member.retire() {
                self.tracker.borrow_mut().dispose(member.handle);
            }
        }

        self.members.retain(|m| !m.is_retired());
    }

    /// Retire and dispose one member.  No-op if it already retired.
    pub fn retire(&mut self, index: usize) -> bool {
        let Some(member) = self.members.get_mut(index) else {
            return false;
        };
        if !member.retire() {
            return false;
        }
        self.tracker.borrow_mut().dispose(member.handle);
        true
    }

    /// First live member within `threshold` of `position` is retired and
    /// disposed.  First match in pool order, not the closest.
    pub fn check_collision(&mut self, position: &Vector3<f32>, threshold: f32) -> bool {
        match self
            .members
            .iter()
            .position(|m| m.colliding(position, threshold))
        {
            Some(index) => self.retire(index),
            None => false,
        }
    }

    pub fn reset(&mut self) {
        let mut tracker = self.tracker.borrow_mut();
        for member in self.members.drain(..) {
            if !member.is_retired() {
                tracker.dispose(member.handle);
            }
        }
    }

    pub fn views(&self) -> impl Iterator<Item = RenderView> + '_ {
        let class = self.kind.class();
        self.members
            .iter()
            .filter(|m| !m.is_retired())
            .map(move |m| RenderView {
                handle: m.handle,
                class,
                position: m.position,
                rotation: m.rotation,
                scale: m.scale,
            })
    }
}
