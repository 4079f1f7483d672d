//! The per-frame simulation: spawn scheduling, movement, collision
//! resolution and the Ready → Active → Over state machine.
//!
//! All randomness comes through an injected `rng`, so callers control
//! determinism.  Models are loaded by the host: `tick` returns
//! `SpawnRequest`s and the host answers each with `deliver` once the
//! renderables exist.

use nalgebra::Vector3;
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{EntityClass, GameStatus, RenderHandle, RenderView};
use crate::error::{ConfigError, SimError};
use crate::input::{KeySnapshot, START_KEY};
use crate::player::Player;
use crate::pools::{Pool, PoolKind, Scenery};
use crate::resources::SharedTracker;
use crate::timer::SpawnTimer;
use crate::waves::WaveManager;

// ── Host boundary ────────────────────────────────────────────────────────────

/// A model the host should load and hand back through `Game::deliver`.
#[derive(Clone, Debug, PartialEq)]
pub enum SpawnRequest {
    PlayerBullet,
    Scenery(Scenery),
    Coin,
    /// Path visual plus `enemies` jets, delivered together.
    EnemyWave { enemies: usize },
    EnemyBullet { position: Vector3<f32> },
}

impl SpawnRequest {
    pub fn handle_count(&self) -> usize {
        match self {
            SpawnRequest::EnemyWave { enemies } => enemies + 1,
            _ => 1,
        }
    }

    pub fn asset(&self) -> &'static str {
        match self {
            SpawnRequest::PlayerBullet => "bullet.glb",
            SpawnRequest::Scenery(scenery) => scenery.asset(),
            SpawnRequest::Coin => "star.glb",
            SpawnRequest::EnemyWave { .. } => "enemy-jet.gltf",
            SpawnRequest::EnemyBullet { .. } => "enemy-bullet.gltf",
        }
    }
}

/// Values shown on the heads-up display.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Hud {
    pub elapsed_secs: u64,
    pub health: i32,
    pub score: u32,
}

// ── Spawn scheduler ──────────────────────────────────────────────────────────

struct Scheduler {
    background: SpawnTimer,
    waves: SpawnTimer,
    coins: SpawnTimer,
}

impl Scheduler {
    fn new(config: &GameConfig) -> Self {
        let t = &config.timers;
        Self {
            background: SpawnTimer::new(t.background_interval_ms),
            waves: SpawnTimer::with_jitter(t.wave_interval_ms, t.wave_jitter_ms),
            coins: SpawnTimer::new(t.coin_interval_ms),
        }
    }

    fn reset(&mut self) {
        self.background.reset();
        self.waves.reset();
        self.coins.reset();
    }
}

// ── Game ─────────────────────────────────────────────────────────────────────

pub struct Game {
    config: GameConfig,
    status: GameStatus,
    player: Player,
    background: Pool,
    coins: Pool,
    enemy_bullets: Pool,
    waves: WaveManager,
    scheduler: Scheduler,
    tracker: SharedTracker,
    /// Host timestamp of the previous frame.
    previous_time: f64,
    /// Game clock in ms; runs slow while the player is idle.
    run_time: f64,
    hud: Hud,
    final_score: Option<u32>,
    /// Start key state on the previous frame, for edge detection.
    start_held: bool,
}

impl Game {
    /// `player_handle` is the airplane model, loaded once up front.
    pub fn new(
        config: GameConfig,
        player_handle: RenderHandle,
        tracker: SharedTracker,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let bound = config.motion.frame_bound;
        let play_z = config.player.depth;
        let player = Player::new(
            player_handle,
            config.player.clone(),
            config.scoring.clone(),
            config.timers.bullet_interval_ms,
            bound,
            tracker.clone(),
        );
        let waves = WaveManager::new(&config, tracker.clone())?;

        Ok(Self {
            scheduler: Scheduler::new(&config),
            player,
            background: Pool::new(PoolKind::Background, bound, tracker.clone()),
            coins: Pool::new(PoolKind::Coins, bound, tracker.clone()).on_plane(play_z),
            enemy_bullets: Pool::new(PoolKind::EnemyBullets, bound, tracker.clone())
                .on_plane(play_z),
            waves,
            tracker,
            status: GameStatus::Ready,
            previous_time: 0.0,
            run_time: 0.0,
            hud: Hud::default(),
            final_score: None,
            start_held: false,
            config,
        })
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn background(&self) -> &Pool {
        &self.background
    }

    pub fn coins(&self) -> &Pool {
        &self.coins
    }

    pub fn coins_mut(&mut self) -> &mut Pool {
        &mut self.coins
    }

    pub fn enemy_bullets(&self) -> &Pool {
        &self.enemy_bullets
    }

    pub fn enemy_bullets_mut(&mut self) -> &mut Pool {
        &mut self.enemy_bullets
    }

    pub fn waves(&self) -> &WaveManager {
        &self.waves
    }

    pub fn waves_mut(&mut self) -> &mut WaveManager {
        &mut self.waves
    }

    pub fn hud(&self) -> Hud {
        self.hud
    }

    /// Score at the moment the last game ended.
    pub fn final_score(&self) -> Option<u32> {
        self.final_score
    }

    pub fn run_time(&self) -> f64 {
        self.run_time
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.run_time / 1000.0
    }

    // ── State machine ────────────────────────────────────────────────────────

    /// One display frame at host time `now` (ms).  While Active this runs
    /// the update pipeline then applies input; otherwise a fresh press of
    /// the start key walks Ready → Active and Over → Ready.
    pub fn frame(&mut self, now: f64, keys: KeySnapshot, rng: &mut impl Rng) -> Vec<SpawnRequest> {
        let start_down = keys.is_pressed(START_KEY);
        let start_pressed = start_down && !self.start_held;
        self.start_held = start_down;

        match self.status {
            GameStatus::Active => {
                let delta = now - self.previous_time;
                let requests = self.tick(delta, &keys, rng);
                if self.status == GameStatus::Active {
                    self.process_input(delta, keys);
                }
                self.previous_time = now;
                requests
            }
            GameStatus::Ready if start_pressed => {
                self.start(now);
                Vec::new()
            }
            GameStatus::Over if start_pressed => {
                self.acknowledge();
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    /// Ready/Over → Active: wipe every pool, wave, timer and the player.
    pub fn start(&mut self, now: f64) {
        self.waves.reset();
        self.coins.reset();
        self.player.reset();
        self.background.reset();
        self.enemy_bullets.reset();
        self.scheduler.reset();

        self.previous_time = now;
        self.run_time = 0.0;
        self.final_score = None;
        self.hud = Hud {
            elapsed_secs: 0,
            health: self.player.health,
            score: 0,
        };
        self.status = GameStatus::Active;
        log::info!("game started");
    }

    /// Over → Ready.
    pub fn acknowledge(&mut self) {
        if self.status == GameStatus::Over {
            self.status = GameStatus::Ready;
            log::info!("ready for a new game");
        }
    }

    fn game_over(&mut self) {
        self.status = GameStatus::Over;
        self.final_score = Some(self.player.score);
        log::info!("game over, final score {}", self.player.score);
    }

    pub fn process_input(&mut self, delta_time: f64, keys: KeySnapshot) {
        if self.status == GameStatus::Active {
            self.player.process_input(delta_time, keys);
        }
    }

    // ── Pipeline ─────────────────────────────────────────────────────────────

    /// Run one Active tick of `delta_ms` host time.  Does nothing in any
    /// other state.
    pub fn tick(
        &mut self,
        delta_ms: f64,
        keys: &KeySnapshot,
        rng: &mut impl Rng,
    ) -> Vec<SpawnRequest> {
        if self.status != GameStatus::Active {
            return Vec::new();
        }

        let motion = self.config.motion.clone();
        let thresholds = self.config.collision.clone();

        let delta = if keys.any_motion() {
            delta_ms
        } else {
            delta_ms / motion.slow_motion_divisor
        };
        let now = self.run_time;
        let mut requests = Vec::new();

        // 1. scheduled spawns
        if self.player.fire(now) {
            requests.push(SpawnRequest::PlayerBullet);
        }
        if self.scheduler.background.fire_at(now) {
            requests.push(SpawnRequest::Scenery(Scenery::random(rng)));
        }
        if self.scheduler.waves.fire(now, rng) {
            requests.push(SpawnRequest::EnemyWave {
                enemies: self.waves.wave_size(),
            });
        }
        if self.scheduler.coins.fire_at(now) {
            requests.push(SpawnRequest::Coin);
        }

        // 2. movement
        let bullet_velocity = delta as f32 * motion.bullet_factor;
        self.player.update_bullets(bullet_velocity);

        let scenery_velocity = delta as f32 * motion.scenery_factor;
        self.background.update(scenery_velocity, 0.0);

        let enemy_velocity = scenery_velocity / motion.enemy_divisor;
        let time = self.elapsed_seconds() as f32;
        for position in self.waves.update(enemy_velocity, time, now, rng) {
            requests.push(SpawnRequest::EnemyBullet { position });
        }

        // 3. enemy bullets against the player and the player's bullets
        self.enemy_bullets
            .update(motion.enemy_bullet_multiplier * enemy_velocity, 0.0);
        self.resolve_enemy_bullets(
            thresholds.enemy_bullet_vs_player,
            thresholds.enemy_bullet_vs_bullet,
        );

        // 4. lethal contact; checked before any scoring this tick
        let plane = self.player.position();
        if self
            .waves
            .check_plane_collision(&plane, thresholds.plane_vs_enemy)
        {
            self.player.health = 0;
        }
        if self.player.is_dead() {
            self.publish_hud();
            self.game_over();
            return requests;
        }

        // 5. scoring
        let waves = &mut self.waves;
        let mut kills = 0;
        for bullet in self.player.bullets_mut() {
            if bullet.is_retired() {
                continue;
            }
            if waves.check_bullet_collision(&bullet.position, thresholds.bullet_vs_enemy) {
                bullet.retire();
                kills += 1;
            }
        }
        for _ in 0..kills {
            self.player.hit_enemy();
        }

        if self.coins.check_collision(&plane, thresholds.player_vs_coin) {
            self.player.hit_coin();
        }
        self.coins.update(enemy_velocity, time);

        // 6. clock and HUD
        self.run_time += delta;
        self.publish_hud();

        if !requests.is_empty() {
            log::debug!("spawn requests: {:?}", requests);
        }
        requests
    }

    fn publish_hud(&mut self) {
        self.hud = Hud {
            elapsed_secs: self.elapsed_seconds() as u64,
            health: self.player.health,
            score: self.player.score,
        };
    }

    fn resolve_enemy_bullets(&mut self, vs_player: f32, vs_bullet: f32) {
        for i in 0..self.enemy_bullets.len() {
            let member = &self.enemy_bullets.members()[i];
            if member.is_retired() {
                continue;
            }
            let position = member.position;

            if self.player.entity.colliding(&position, vs_player) {
                self.player.hit_bullet();
                self.enemy_bullets.retire(i);
                continue;
            }

            // A player bullet and an enemy bullet cancel each other out.
            if let Some(shot) = self
                .player
                .bullets_mut()
                .iter_mut()
                .find(|b| b.colliding(&position, vs_bullet))
            {
                shot.retire();
                self.enemy_bullets.retire(i);
            }
        }
    }

    /// Hand over renderables for an earlier request.  Deliveries that
    /// arrive outside an Active game are tracked and released at once.
    pub fn deliver(
        &mut self,
        request: &SpawnRequest,
        handles: Vec<RenderHandle>,
        rng: &mut impl Rng,
    ) -> Result<(), SimError> {
        let expected = request.handle_count();
        if handles.len() != expected {
            return Err(SimError::HandleCount {
                expected,
                got: handles.len(),
            });
        }

        if self.status != GameStatus::Active {
            log::warn!("late delivery for {:?} while {:?}", request, self.status);
            let mut tracker = self.tracker.borrow_mut();
            for handle in handles {
                tracker.track(handle);
                tracker.dispose(handle);
            }
            return Ok(());
        }

        match request {
            SpawnRequest::PlayerBullet => self.player.add_bullet(handles[0]),
            SpawnRequest::Scenery(_) => self.background.add(handles[0], rng),
            SpawnRequest::Coin => self.coins.add(handles[0], rng),
            SpawnRequest::EnemyBullet { position } => {
                self.enemy_bullets.add_at(handles[0], *position)
            }
            SpawnRequest::EnemyWave { .. } => self.waves.add_wave(handles, rng)?,
        }
        Ok(())
    }

    /// Every live renderable, for the external renderer.
    pub fn views(&self) -> Vec<RenderView> {
        let mut views = vec![RenderView {
            handle: self.player.entity.handle,
            class: EntityClass::Player,
            position: self.player.entity.position,
            rotation: self.player.entity.rotation,
            scale: self.player.entity.scale,
        }];
        views.extend(self.background.views());
        views.extend(self.player.bullets().iter().filter(|b| !b.is_retired()).map(|b| {
            RenderView {
                handle: b.handle,
                class: EntityClass::PlayerBullet,
                position: b.position,
                rotation: b.rotation,
                scale: b.scale,
            }
        }));
        views.extend(self.waves.views());
        views.extend(self.enemy_bullets.views());
        views.extend(self.coins.views());
        views
    }
}
