use flight_shooter::timer::SpawnTimer;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// ── deterministic ─────────────────────────────────────────────────────────────

#[test]
fn cooldown_fires_then_waits_full_interval() {
    let mut timer = SpawnTimer::new(1000.0);
    assert!(timer.fire_at(0.0));
    assert!(!timer.fire_at(500.0));
    assert!(timer.fire_at(1000.0));
}

#[test]
fn cooldown_just_short_of_interval_does_not_fire() {
    let mut timer = SpawnTimer::new(1000.0);
    assert!(timer.fire_at(200.0));
    assert!(!timer.fire_at(1199.9));
    assert!(timer.fire_at(1200.0));
    assert_eq!(timer.last_fired_at(), Some(1200.0));
}

#[test]
fn successive_fires_are_at_least_an_interval_apart() {
    let mut rng = seeded_rng();
    let mut timer = SpawnTimer::new(250.0);
    let mut now = 0.0;
    let mut last_fire: Option<f64> = None;

    for _ in 0..2000 {
        now += rng.gen_range(0.0..120.0);
        if timer.fire_at(now) {
            if let Some(prev) = last_fire {
                assert!(now - prev >= 250.0, "fired {}ms after previous", now - prev);
            }
            last_fire = Some(now);
        }
    }
    assert!(last_fire.is_some());
}

#[test]
fn reset_allows_immediate_fire() {
    let mut timer = SpawnTimer::new(1000.0);
    assert!(timer.fire_at(5000.0));
    assert!(!timer.fire_at(5100.0));
    timer.reset();
    assert_eq!(timer.last_fired_at(), None);
    assert!(timer.fire_at(5200.0));
}

// ── jittered ──────────────────────────────────────────────────────────────────

#[test]
fn zero_jitter_matches_deterministic_timer() {
    let mut rng = seeded_rng();
    let mut jittered = SpawnTimer::with_jitter(1000.0, 0.0);
    let mut plain = SpawnTimer::new(1000.0);

    let mut now = 0.0;
    for _ in 0..500 {
        now += rng.gen_range(0.0..300.0);
        assert_eq!(jittered.fire(now, &mut rng), plain.fire_at(now));
    }
}

#[test]
fn zero_jitter_never_fires_early() {
    let mut rng = seeded_rng();
    let mut timer = SpawnTimer::with_jitter(1000.0, 0.0);
    assert!(timer.fire(0.0, &mut rng));
    for t in 1..1000 {
        assert!(!timer.fire(t as f64, &mut rng));
    }
    assert!(timer.fire(1000.0, &mut rng));
}

#[test]
fn jitter_never_fires_before_interval_minus_jitter() {
    let mut rng = seeded_rng();
    let mut timer = SpawnTimer::with_jitter(1000.0, 300.0);
    let mut now = 0.0;
    let mut last_fire = 0.0;
    assert!(timer.fire(now, &mut rng));

    for _ in 0..5000 {
        now += 10.0;
        if timer.fire(now, &mut rng) {
            assert!(now - last_fire >= 700.0, "fired after {}ms", now - last_fire);
            last_fire = now;
        }
    }
}

#[test]
fn jitter_always_fires_once_interval_has_passed() {
    let mut rng = seeded_rng();
    for _ in 0..100 {
        let mut timer = SpawnTimer::with_jitter(1000.0, 300.0);
        assert!(timer.fire(0.0, &mut rng));
        assert!(timer.fire(1000.5, &mut rng));
    }
}

#[test]
fn jitter_sometimes_fires_early() {
    let mut rng = seeded_rng();
    let mut early = 0;
    for _ in 0..200 {
        let mut timer = SpawnTimer::with_jitter(1000.0, 400.0);
        assert!(timer.fire(0.0, &mut rng));
        // gap is 100ms, below most draws from [0, 400)
        if timer.fire(900.0, &mut rng) {
            early += 1;
        }
    }
    assert!(early > 100, "only {} early fires", early);
    assert!(early < 200);
}
