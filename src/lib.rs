//! Simulation core of an arcade flight shooter.
//!
//! Rendering, asset loading and keyboard capture belong to the host; this
//! crate owns the entity pools, enemy waves, spawn timers, collisions and
//! the game state machine.  See `compute::Game` for the per-frame entry
//! point.

pub mod compute;
pub mod config;
pub mod curve;
pub mod entities;
pub mod error;
pub mod input;
pub mod player;
pub mod pools;
pub mod resources;
pub mod timer;
pub mod waves;

pub use compute::{Game, Hud, SpawnRequest};
pub use config::GameConfig;
pub use entities::{GameStatus, RenderHandle};
pub use error::{ConfigError, SimError};
