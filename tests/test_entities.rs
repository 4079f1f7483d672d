use nalgebra::Vector3;

use flight_shooter::entities::{Capabilities, Entity, HandleAllocator, RenderHandle};
use flight_shooter::resources::{ResourceTracker, SceneTracker};

fn collidable(handle: u64, at: Vector3<f32>) -> Entity {
    Entity::new(RenderHandle(handle), Capabilities::MOVABLE | Capabilities::COLLIDABLE).at(at)
}

#[test]
fn allocator_never_repeats_a_handle() {
    let mut handles = HandleAllocator::new();
    let first = handles.allocate();
    let batch = handles.allocate_many(4);
    assert_eq!(batch.len(), 4);
    assert!(!batch.contains(&first));
    let mut all = batch.clone();
    all.push(first);
    all.sort();
    all.dedup();
    assert_eq!(all.len(), 5);
}

#[test]
fn retire_reports_only_the_first_transition() {
    let mut e = collidable(1, Vector3::zeros());
    assert!(!e.is_retired());
    assert!(e.retire());
    assert!(e.is_retired());
    assert!(!e.retire());
}

#[test]
fn collision_is_strictly_inside_the_threshold() {
    let e = collidable(1, Vector3::new(0.0, 0.05, 0.0));
    assert!(e.colliding(&Vector3::zeros(), 0.1));
    assert!(!e.colliding(&Vector3::new(0.0, 0.5, 0.0), 0.1));
    assert!(!e.colliding(&Vector3::new(0.0, 0.25, 0.0), 0.2));
}

#[test]
fn retired_and_decorative_entities_never_collide() {
    let mut e = collidable(1, Vector3::zeros());
    e.retire();
    assert!(!e.colliding(&Vector3::zeros(), 1.0));

    let scenery = Entity::new(RenderHandle(2), Capabilities::MOVABLE);
    assert!(!scenery.colliding(&Vector3::zeros(), 1.0));
}

#[test]
fn frame_check_looks_at_height_only() {
    let e = collidable(1, Vector3::new(5.0, -1.5, 0.0));
    assert!(!e.out_of_frame(2.0));
    assert!(e.out_of_frame(1.0));
}

#[test]
fn tracker_releases_each_handle_once() {
    let mut tracker = SceneTracker::new();
    tracker.track(RenderHandle(1));
    tracker.track(RenderHandle(2));
    assert_eq!(tracker.live_count(), 2);

    assert!(tracker.dispose(RenderHandle(1)));
    assert!(!tracker.dispose(RenderHandle(1)));
    assert!(!tracker.dispose(RenderHandle(9)));
    assert_eq!(tracker.disposed_total(), 1);
    assert_eq!(tracker.take_released(), vec![RenderHandle(1)]);
    assert!(tracker.take_released().is_empty());

    tracker.dispose_all();
    assert_eq!(tracker.live_count(), 0);
    assert_eq!(tracker.disposed_total(), 2);
    assert_eq!(tracker.take_released(), vec![RenderHandle(2)]);
}
