//! Resource tracking for renderables owned by the external engine.
//!
//! Pools never reach into a global scene; each one is handed a tracker at
//! construction and calls `dispose` when it retires a member.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::entities::RenderHandle;

pub trait ResourceTracker {
    /// Start tracking the resources behind `handle`.
    fn track(&mut self, handle: RenderHandle);

    /// Release one handle's resources.  Returns `false` if it was not tracked.
    fn dispose(&mut self, handle: RenderHandle) -> bool;

    /// Release everything still tracked.
    fn dispose_all(&mut self);
}

/// Tracker shared between the pools of one game session.
pub type SharedTracker = Rc<RefCell<dyn ResourceTracker>>;

/// Records what is live and what has been released, so the renderer can
/// drop released handles from its scene once per frame.
#[derive(Debug, Default)]
pub struct SceneTracker {
    live: BTreeSet<RenderHandle>,
    released: Vec<RenderHandle>,
    disposed_total: usize,
}

impl SceneTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Rc<RefCell<SceneTracker>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn is_live(&self, handle: RenderHandle) -> bool {
        self.live.contains(&handle)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn disposed_total(&self) -> usize {
        self.disposed_total
    }

    /// Handles released since the last call.
    pub fn take_released(&mut self) -> Vec<RenderHandle> {
        std::mem::take(&mut self.released)
    }
}

impl ResourceTracker for SceneTracker {
    fn track(&mut self, handle: RenderHandle) {
        self.live.insert(handle);
    }

    fn dispose(&mut self, handle: RenderHandle) -> bool {
        if !self.live.remove(&handle) {
            log::warn!("dispose of untracked handle {:?}", handle);
            return false;
        }
        log::trace!("disposed {:?}", handle);
        self.released.push(handle);
        self.disposed_total += 1;
        true
    }

    fn dispose_all(&mut self) {
        let live = std::mem::take(&mut self.live);
        self.disposed_total += live.len();
        self.released.extend(live);
    }
}
