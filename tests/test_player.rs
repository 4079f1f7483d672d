use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use nalgebra::Vector3;

use flight_shooter::config::{PlayerConfig, ScoringConfig};
use flight_shooter::entities::RenderHandle;
use flight_shooter::input::{key_code, KeySnapshot, KEY_LEFT, KEY_UP};
use flight_shooter::player::Player;
use flight_shooter::resources::{SceneTracker, SharedTracker};

fn make_player() -> (Player, Rc<RefCell<SceneTracker>>) {
    let tracker = SceneTracker::shared();
    let shared: SharedTracker = tracker.clone();
    let player = Player::new(
        RenderHandle(1),
        PlayerConfig::default(),
        ScoringConfig::default(),
        1000.0,
        2.0,
        shared,
    );
    (player, tracker)
}

fn held(codes: &[u8]) -> KeySnapshot {
    KeySnapshot::from_pressed(codes)
}

// ── construction ──────────────────────────────────────────────────────────────

#[test]
fn new_player_starts_centered_with_full_health() {
    let (p, _) = make_player();
    assert_eq!(p.position(), Vector3::new(0.0, 0.0, 1.0));
    assert_eq!(p.health, 100);
    assert_eq!(p.score, 0);
    assert!(p.bullets().is_empty());
}

// ── process_input ─────────────────────────────────────────────────────────────

#[test]
fn up_key_moves_by_speed_times_delta() {
    let (mut p, _) = make_player();
    p.process_input(100.0, held(&[key_code('W')]));
    assert_relative_eq!(p.position().y, 0.1, epsilon = 1e-6);
    assert_relative_eq!(p.position().x, 0.0);
}

#[test]
fn arrow_keys_share_the_letter_bindings() {
    let (mut a, _) = make_player();
    let (mut b, _) = make_player();
    a.process_input(50.0, held(&[key_code('W')]));
    b.process_input(50.0, held(&[KEY_UP]));
    assert_eq!(a.position(), b.position());
}

#[test]
fn diagonal_applies_both_axes() {
    let (mut p, _) = make_player();
    p.process_input(100.0, held(&[key_code('S'), key_code('D')]));
    assert_relative_eq!(p.position().x, 0.1, epsilon = 1e-6);
    assert_relative_eq!(p.position().y, -0.1, epsilon = 1e-6);
}

#[test]
fn sideways_movement_tilts_and_release_levels_out() {
    let (mut p, _) = make_player();
    p.process_input(10.0, held(&[KEY_LEFT]));
    assert!(p.entity.rotation.y < 0.0);

    p.process_input(10.0, held(&[key_code('D')]));
    assert!(p.entity.rotation.y > 0.0);

    p.process_input(10.0, KeySnapshot::new());
    assert_eq!(p.entity.rotation, Vector3::zeros());
}

#[test]
fn reserved_key_moves_nothing_and_levels_out() {
    let (mut p, _) = make_player();
    p.process_input(10.0, held(&[key_code('A')]));
    p.process_input(100.0, held(&[key_code('X')]));
    assert_relative_eq!(p.position().x, -0.01, epsilon = 1e-6);
    assert_eq!(p.entity.rotation, Vector3::zeros());
}

#[test]
fn step_leaving_bounds_is_rejected() {
    let (mut p, _) = make_player();
    p.entity.position.x = 0.85;
    p.process_input(100.0, held(&[key_code('D')]));
    assert_relative_eq!(p.position().x, 0.85);
}

#[test]
fn step_near_the_edge_is_accepted() {
    let (mut p, _) = make_player();
    p.entity.position.y = -0.75;
    p.process_input(100.0, held(&[key_code('S')]));
    assert_relative_eq!(p.position().y, -0.85, epsilon = 1e-6);
}

#[test]
fn rejected_axis_does_not_block_the_other() {
    let (mut p, _) = make_player();
    p.entity.position = Vector3::new(-0.88, 0.0, 1.0);
    p.process_input(100.0, held(&[key_code('A'), key_code('W')]));
    assert_relative_eq!(p.position().x, -0.88);
    assert_relative_eq!(p.position().y, 0.1, epsilon = 1e-6);
}

#[test]
fn position_stays_in_bounds_under_any_input() {
    let (mut p, _) = make_player();
    let combos: [&[u8]; 6] = [
        &[key_code('W')],
        &[key_code('A')],
        &[key_code('W'), key_code('D')],
        &[key_code('S')],
        &[key_code('S'), key_code('A')],
        &[key_code('D')],
    ];
    for i in 0..600 {
        let keys = held(combos[(i / 37) % combos.len()]);
        p.process_input(17.0 + (i % 5) as f64 * 13.0, keys);
        let pos = p.position();
        assert!((-0.9..=0.9).contains(&pos.x), "x escaped: {}", pos.x);
        assert!((-0.9..=0.9).contains(&pos.y), "y escaped: {}", pos.y);
    }
}

#[test]
fn pressed_keys_are_remembered() {
    let (mut p, _) = make_player();
    p.process_input(1.0, held(&[key_code('W')]));
    assert!(p.pressed().is_pressed(key_code('W')));
}

// ── firing & bullets ──────────────────────────────────────────────────────────

#[test]
fn fire_respects_cooldown() {
    let (mut p, _) = make_player();
    assert!(p.fire(0.0));
    assert!(!p.fire(500.0));
    assert!(p.fire(1000.0));
}

#[test]
fn add_bullet_spawns_at_player_and_tracks_it() {
    let (mut p, tracker) = make_player();
    p.entity.position = Vector3::new(0.3, -0.2, 1.0);
    p.add_bullet(RenderHandle(7));
    assert_eq!(p.bullets().len(), 1);
    assert_eq!(p.bullets()[0].position, Vector3::new(0.3, -0.2, 1.0));
    assert!(tracker.borrow().is_live(RenderHandle(7)));
}

#[test]
fn update_bullets_moves_them_up() {
    let (mut p, _) = make_player();
    p.add_bullet(RenderHandle(2));
    p.update_bullets(0.25);
    assert_relative_eq!(p.bullets()[0].position.y, 0.25);
}

#[test]
fn update_bullets_sweeps_off_frame_and_retired_in_order() {
    let (mut p, tracker) = make_player();
    for id in 2..=5 {
        p.add_bullet(RenderHandle(id));
    }
    p.bullets_mut()[0].position.y = 1.95;
    p.bullets_mut()[2].retire();

    p.update_bullets(0.1);

    let survivors: Vec<_> = p.bullets().iter().map(|b| b.handle).collect();
    assert_eq!(survivors, vec![RenderHandle(3), RenderHandle(5)]);
    let t = tracker.borrow();
    assert!(!t.is_live(RenderHandle(2)));
    assert!(!t.is_live(RenderHandle(4)));
    assert_eq!(t.disposed_total(), 2);
}

#[test]
fn sweep_never_disposes_twice() {
    let (mut p, tracker) = make_player();
    p.add_bullet(RenderHandle(2));
    p.bullets_mut()[0].retire();
    p.update_bullets(0.1);
    p.update_bullets(0.1);
    assert_eq!(tracker.borrow().disposed_total(), 1);
}

// ── scoring ───────────────────────────────────────────────────────────────────

#[test]
fn hits_adjust_score_and_health() {
    let (mut p, _) = make_player();
    p.hit_coin();
    p.hit_enemy();
    p.hit_bullet();
    assert_eq!(p.score, 30);
    assert_eq!(p.health, 90);
}

#[test]
fn health_never_drops_below_zero() {
    let (mut p, _) = make_player();
    p.health = 5;
    p.hit_bullet();
    assert_eq!(p.health, 0);
    assert!(p.is_dead());
}

// ── reset ─────────────────────────────────────────────────────────────────────

#[test]
fn reset_restores_initial_state_and_disposes_bullets() {
    let (mut p, tracker) = make_player();
    p.process_input(100.0, held(&[key_code('A')]));
    p.add_bullet(RenderHandle(2));
    p.add_bullet(RenderHandle(3));
    p.hit_bullet();
    p.hit_coin();
    assert!(p.fire(0.0));

    p.reset();

    assert_eq!(p.position(), Vector3::new(0.0, 0.0, 1.0));
    assert_eq!(p.health, 100);
    assert_eq!(p.score, 0);
    assert!(p.bullets().is_empty());
    assert!(!p.pressed().is_pressed(key_code('A')));
    assert_eq!(tracker.borrow().disposed_total(), 2);
    // cooldown is cleared too
    assert!(p.fire(1.0));
}
