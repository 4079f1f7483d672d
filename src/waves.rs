//! Enemy waves: fixed-size formations flying a shared curve, each enemy
//! trailing the one ahead by a constant progress offset.

use nalgebra::Vector3;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::GameConfig;
use crate::curve::{choose_kind, Curve, CurveKind, ReferenceFrame};
use crate::entities::{Capabilities, Entity, EntityClass, RenderHandle, RenderView};
use crate::error::{ConfigError, SimError};
use crate::pools::PLAY_Z;
use crate::resources::SharedTracker;
use crate::timer::SpawnTimer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveStage {
    /// Created, progress offsets assigned, not yet advanced.
    Spawning,
    Active,
    /// Every enemy retired; resources released.
    Complete,
}

#[derive(Clone, Debug)]
pub struct WaveEnemy {
    pub entity: Entity,
    /// Curve parameter accumulator.  The enemy leaves the curve at 1.
    pub progress: f32,
}

pub struct EnemyWave {
    kind: CurveKind,
    curve: Curve,
    frame: ReferenceFrame,
    path: RenderHandle,
    enemies: Vec<WaveEnemy>,
    stage: WaveStage,
    released: bool,
    fire_timer: SpawnTimer,
    tracker: SharedTracker,
}

impl EnemyWave {
    /// `path` is the flight-path visual; one enemy per handle in `enemies`.
    pub fn new(
        kind: CurveKind,
        curve: Curve,
        path: RenderHandle,
        enemies: Vec<RenderHandle>,
        stagger: f32,
        fire_timer: SpawnTimer,
        tracker: SharedTracker,
    ) -> Self {
        let frame = ReferenceFrame::at_depth(PLAY_Z);
        {
            let mut t = tracker.borrow_mut();
            t.track(path);
            for &handle in &enemies {
                t.track(handle);
            }
        }

        let enemies = enemies
            .into_iter()
            .enumerate()
            .map(|(i, handle)| {
                let progress = i as f32 * stagger;
                let entity = Entity::new(handle, Capabilities::MOVABLE | Capabilities::COLLIDABLE)
                    .at(frame.to_world(curve.sample(progress)));
                WaveEnemy { entity, progress }
            })
            .collect();

        Self {
            kind,
            curve,
            frame,
            path,
            enemies,
            stage: WaveStage::Spawning,
            released: false,
            fire_timer,
            tracker,
        }
    }

    /// Fly the wave in `frame` instead of the default play plane.  Enemies
    /// are re-placed at their starting progress.
    pub fn in_frame(mut self, frame: ReferenceFrame) -> Self {
        self.frame = frame;
        for enemy in &mut self.enemies {
            enemy.entity.position = frame.to_world(self.curve.sample(enemy.progress));
        }
        self
    }

    pub fn kind(&self) -> CurveKind {
        self.kind
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    pub fn frame(&self) -> &ReferenceFrame {
        &self.frame
    }

    pub fn enemies(&self) -> &[WaveEnemy] {
        &self.enemies
    }

    pub fn stage(&self) -> WaveStage {
        self.stage
    }

    pub fn is_complete(&self) -> bool {
        self.stage == WaveStage::Complete
    }

    pub fn live_count(&self) -> usize {
        self.enemies.iter().filter(|e| !e.entity.is_retired()).count()
    }

    /// Advance every live enemy along the curve by `advance`.
    ///
    /// Enemies are placed at the midpoint between the curve sample at their
    /// progress and the one `advance` ahead.  Returns muzzle positions for
    /// enemy bullets fired this tick.
    pub fn update(
        &mut self,
        advance: f32,
        time: f32,
        now: f64,
        rng: &mut impl Rng,
    ) -> Vec<Vector3<f32>> {
        if self.is_complete() {
            return Vec::new();
        }

        let mut still_active = false;
        for enemy in self.enemies.iter_mut().filter(|e| !e.entity.is_retired()) {
            if enemy.progress >= 1.0 {
                if enemy.entity.retire() {
                    self.tracker.borrow_mut().dispose(enemy.entity.handle);
                }
                continue;
            }
            still_active = true;

            let current = self.frame.to_world(self.curve.sample(enemy.progress));
            let ahead = self.frame.to_world(self.curve.sample(enemy.progress + advance));
            enemy.entity.position = (current + ahead) / 2.0;
            enemy.entity.rotation.z = time;
            enemy.progress += advance;
        }

        if !still_active {
            log::debug!("{:?} wave complete", self.kind);
            self.release();
            return Vec::new();
        }
        self.stage = WaveStage::Active;

        let mut muzzles = Vec::new();
        if self.fire_timer.fire(now, rng) {
            let shooters: Vec<&WaveEnemy> = self
                .enemies
                .iter()
                .filter(|e| !e.entity.is_retired() && e.entity.position.y.abs() <= 1.0)
                .collect();
            if let Some(shooter) = shooters.choose(rng) {
                muzzles.push(shooter.entity.position);
            }
        }
        muzzles
    }

    /// Retire the first live enemy within `threshold` of `position`.
    fn strike(&mut self, position: &Vector3<f32>, threshold: f32) -> bool {
        if self.is_complete() {
            return false;
        }
        let Some(enemy) = self
            .enemies
            .iter_mut()
            .find(|e| e.entity.colliding(position, threshold))
        else {
            return false;
        };
        if enemy.entity.retire() {
            self.tracker.borrow_mut().dispose(enemy.entity.handle);
            return true;
        }
        false
    }

    /// Did the airplane at `position` fly into an enemy?
    pub fn check_plane_collision(&mut self, position: &Vector3<f32>, threshold: f32) -> bool {
        self.strike(position, threshold)
    }

    /// Did a player bullet at `position` hit an enemy?
    pub fn check_bullet_collision(&mut self, position: &Vector3<f32>, threshold: f32) -> bool {
        self.strike(position, threshold)
    }

    /// Tear the wave down whatever its stage.
    pub fn reset(&mut self) {
        self.release();
    }

    fn release(&mut self) {
        self.stage = WaveStage::Complete;
        if self.released {
            return;
        }
        self.released = true;

        let mut tracker = self.tracker.borrow_mut();
        tracker.dispose(self.path);
        for enemy in &mut self.enemies {
            if enemy.entity.retire() {
                tracker.dispose(enemy.entity.handle);
            }
        }
    }

    pub fn views(&self) -> impl Iterator<Item = RenderView> + '_ {
        let path = (!self.released).then(|| RenderView {
            handle: self.path,
            class: EntityClass::FlightPath,
            position: self.frame.origin,
            rotation: Vector3::zeros(),
            scale: self.frame.scale,
        });
        path.into_iter().chain(
            self.enemies
                .iter()
                .filter(|e| !e.entity.is_retired())
                .map(|e| RenderView {
                    handle: e.entity.handle,
                    class: EntityClass::Enemy,
                    position: e.entity.position,
                    rotation: e.entity.rotation,
                    scale: e.entity.scale,
                }),
        )
    }
}

// ── Manager ──────────────────────────────────────────────────────────────────

pub struct WaveManager {
    waves: Vec<EnemyWave>,
    weights: Vec<(CurveKind, u32)>,
    wave_size: usize,
    stagger: f32,
    fire_interval_ms: f64,
    fire_jitter_ms: f64,
    /// Depth of the plane every wave flies in.
    play_z: f32,
    tracker: SharedTracker,
}

impl WaveManager {
    pub fn new(config: &GameConfig, tracker: SharedTracker) -> Result<Self, ConfigError> {
        let weights = config.curve_weights()?;
        Ok(Self {
            waves: Vec::new(),
            weights,
            wave_size: config.waves.size,
            stagger: config.waves.stagger,
            fire_interval_ms: config.timers.enemy_fire_interval_ms,
            fire_jitter_ms: config.timers.enemy_fire_jitter_ms,
            play_z: config.player.depth,
            tracker,
        })
    }

    pub fn wave_size(&self) -> usize {
        self.wave_size
    }

    /// Handles a wave delivery must carry: the path visual plus one per enemy.
    pub fn handles_per_wave(&self) -> usize {
        self.wave_size + 1
    }

    pub fn waves(&self) -> &[EnemyWave] {
        &self.waves
    }

    pub fn len(&self) -> usize {
        self.waves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    fn fire_timer(&self) -> SpawnTimer {
        SpawnTimer::with_jitter(self.fire_interval_ms, self.fire_jitter_ms)
    }

    /// Create a wave on a weighted-random curve.  `handles[0]` is the
    /// path visual, the rest become enemies.
    pub fn add_wave(
        &mut self,
        handles: Vec<RenderHandle>,
        rng: &mut impl Rng,
    ) -> Result<(), SimError> {
        let Some(kind) = choose_kind(&self.weights, rng) else {
            log::error!("no curve type configured for enemy waves");
            return Err(SimError::UnknownCurve(String::new()));
        };
        let curve = Curve::random(kind, rng);
        self.add_wave_on(kind, curve, handles)
    }

    /// Create a wave for a curve family given by name.
    pub fn add_named_wave(
        &mut self,
        name: &str,
        handles: Vec<RenderHandle>,
        rng: &mut impl Rng,
    ) -> Result<(), SimError> {
        let kind = name.parse::<CurveKind>().map_err(|e| {
            log::error!("unknown enemy movement {:?}", name);
            e
        })?;
        let curve = Curve::random(kind, rng);
        self.add_wave_on(kind, curve, handles)
    }

    /// Create a wave on an explicit curve.
    pub fn add_wave_on(
        &mut self,
        kind: CurveKind,
        curve: Curve,
        mut handles: Vec<RenderHandle>,
    ) -> Result<(), SimError> {
        let expected = self.handles_per_wave();
        if handles.len() != expected {
            return Err(SimError::HandleCount {
                expected,
                got: handles.len(),
            });
        }
        let enemies = handles.split_off(1);
        let path = handles[0];

        log::debug!("spawning {:?} wave of {}", kind, enemies.len());
        let wave = EnemyWave::new(
            kind,
            curve,
            path,
            enemies,
            self.stagger,
            self.fire_timer(),
            self.tracker.clone(),
        )
        .in_frame(ReferenceFrame::at_depth(self.play_z));
        self.waves.push(wave);
        Ok(())
    }

    /// Advance every wave and drop the ones that completed.  Returns the
    /// muzzle positions of enemy bullets fired this tick.
    pub fn update(
        &mut self,
        advance: f32,
        time: f32,
        now: f64,
        rng: &mut impl Rng,
    ) -> Vec<Vector3<f32>> {
        let mut muzzles = Vec::new();
        for wave in &mut self.waves {
            muzzles.extend(wave.update(advance, time, now, rng));
        }
        self.waves.retain(|w| !w.is_complete());
        muzzles
    }

    pub fn check_plane_collision(&mut self, position: &Vector3<f32>, threshold: f32) -> bool {
        self.waves
            .iter_mut()
            .any(|w| w.check_plane_collision(position, threshold))
    }

    pub fn check_bullet_collision(&mut self, position: &Vector3<f32>, threshold: f32) -> bool {
        self.waves
            .iter_mut()
            .any(|w| w.check_bullet_collision(position, threshold))
    }

    pub fn reset(&mut self) {
        for wave in &mut self.waves {
            wave.reset();
        }
        self.waves.clear();
    }

    pub fn views(&self) -> impl Iterator<Item = RenderView> + '_ {
        self.waves.iter().flat_map(|w| w.views())
    }
}
