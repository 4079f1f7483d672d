//! Game entity types shared by every pool.
//!
//! An entity is a positioned, retirable object wrapping an opaque render
//! handle.  The simulation owns position and rotation; the renderer only
//! reads them back through the handle.

use bitflags::bitflags;
use nalgebra::Vector3;

// ── Render handles ───────────────────────────────────────────────────────────

/// Opaque identifier for a renderable owned by the external engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderHandle(pub u64);

/// Hands out fresh, never-reused render handles.
#[derive(Debug, Default)]
pub struct HandleAllocator {
    next: u64,
}

impl HandleAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> RenderHandle {
        self.next += 1;
        RenderHandle(self.next)
    }

    pub fn allocate_many(&mut self, count: usize) -> Vec<RenderHandle> {
        (0..count).map(|_| self.allocate()).collect()
    }
}

// ── Capabilities ─────────────────────────────────────────────────────────────

bitflags! {
    /// What the owning pool is allowed to do with an entity each tick.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// Displaced by its pool every tick.
        const MOVABLE = 1 << 0;
        /// Participates in distance-threshold collision tests.
        const COLLIDABLE = 1 << 1;
        /// Spins continuously for show; no gameplay effect.
        const SPINNING = 1 << 2;
    }
}

// ── Entity ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Entity {
    pub handle: RenderHandle,
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: f32,
    pub capabilities: Capabilities,
    retired: bool,
}

impl Entity {
    pub fn new(handle: RenderHandle, capabilities: Capabilities) -> Self {
        Self {
            handle,
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
            scale: 1.0,
            capabilities,
            retired: false,
        }
    }

    pub fn at(mut self, position: Vector3<f32>) -> Self {
        self.position = position;
        self
    }

    pub fn is_retired(&self) -> bool {
        self.retired
    }

    /// Mark the entity inert.  Returns `true` only on the first call, so
    /// callers can tie disposal and scoring to that single transition.
    pub fn retire(&mut self) -> bool {
        if self.retired {
            return false;
        }
        self.retired = true;
        true
    }

    pub fn displace(&mut self, displacement: Vector3<f32>) {
        self.position += displacement;
    }

    pub fn rotate(&mut self, rotation: Vector3<f32>) {
        self.rotation = rotation;
    }

    pub fn rotate_none(&mut self) {
        self.rotation = Vector3::zeros();
    }

    /// Distance test against `position`.  Retired or non-collidable
    /// entities never collide.
    pub fn colliding(&self, position: &Vector3<f32>, threshold: f32) -> bool {
        !self.retired
            && self.capabilities.contains(Capabilities::COLLIDABLE)
            && (self.position - position).norm() < threshold
    }

    /// Outside the vertical band the camera can see.
    pub fn out_of_frame(&self, bound: f32) -> bool {
        self.position.y.abs() > bound
    }
}

// ── Session state ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// Waiting for the start key.
    Ready,
    Active,
    /// Health ran out; waiting for acknowledgement.
    Over,
}

/// What kind of object a renderable view describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityClass {
    Player,
    PlayerBullet,
    Scenery,
    Coin,
    Enemy,
    EnemyBullet,
    FlightPath,
}

/// Read-only snapshot of one live entity for the renderer.
#[derive(Clone, Copy, Debug)]
pub struct RenderView {
    pub handle: RenderHandle,
    pub class: EntityClass,
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: f32,
}
