use arcade2d::*;
use parking_lot::Mutex;
use std::sync::Arc;

fn spawn_box(world: &mut PhysicsWorld, x: f32, y: f32) -> EntityId {
    world
        .spawn(Entity::builder().position(x, y).size(10.0, 10.0))
        .expect("valid box")
}

type PairLog = Arc<Mutex<Vec<(EntityId, EntityId)>>>;

fn recorder() -> (PairLog, impl FnMut(&mut PhysicsWorld, EntityId, EntityId) + Send + 'static) {
    let log: PairLog = Arc::default();
    let sink = Arc::clone(&log);
    (log, move |_: &mut PhysicsWorld, a: EntityId, b: EntityId| sink.lock().push((a, b)))
}

#[test]
fn touching_edges_do_not_overlap() {
    let mut world = PhysicsWorld::new();
    let a = spawn_box(&mut world, 0.0, 0.0);
    let b = spawn_box(&mut world, 10.0, 0.0);
    let (log, on_overlap) = recorder();
    world.register_overlap(a, b, on_overlap);

    assert_eq!(world.update(), 0);
    world.entity_mut(b).unwrap().set_position(9.0, 0.0);
    assert_eq!(world.update(), 1);
    assert_eq!(*log.lock(), vec![(a, b)]);
}

#[test]
fn group_members_added_later_are_seen() {
    let mut world = PhysicsWorld::new();
    let player = spawn_box(&mut world, 0.0, 0.0);
    let coins = world.create_group();
    let (log, on_overlap) = recorder();
    world.register_overlap(coins, player, on_overlap);
    assert_eq!(world.update(), 0);

    let coin = spawn_box(&mut world, 5.0, 5.0);
    world.add(coins, coin);
    assert_eq!(world.update(), 1);
    assert_eq!(*log.lock(), vec![(coin, player)]);
}

#[test]
fn pairs_are_reported_in_registration_order() {
    let mut world = PhysicsWorld::new();
    let player = spawn_box(&mut world, 0.0, 0.0);
    let coins = world.create_group();
    let coin = spawn_box(&mut world, 5.0, 5.0);
    world.add(coins, coin);
    let (log, on_overlap) = recorder();
    world.register_overlap(player, coins, on_overlap);

    world.update();
    assert_eq!(*log.lock(), vec![(player, coin)]);
}

#[test]
fn duplicate_registrations_fire_independently() {
    let mut world = PhysicsWorld::new();
    let a = spawn_box(&mut world, 0.0, 0.0);
    let b = spawn_box(&mut world, 5.0, 0.0);
    let (log, on_overlap) = recorder();
    world.register_overlap(a, b, on_overlap);
    let (again, on_again) = recorder();
    world.register_overlap(a, b, on_again);

    assert_eq!(world.update(), 2);
    assert_eq!(log.lock().len(), 1);
    assert_eq!(again.lock().len(), 1);
}

#[test]
fn persisting_overlaps_fire_every_frame() {
    let mut world = PhysicsWorld::new();
    let a = spawn_box(&mut world, 0.0, 0.0);
    let b = spawn_box(&mut world, 5.0, 0.0);
    let (log, on_overlap) = recorder();
    world.register_overlap(a, b, on_overlap);

    for _ in 0..3 {
        world.step(1.0 / 60.0);
    }
    assert_eq!(log.lock().len(), 3);
}

#[test]
fn group_pairs_report_only_the_first_intersection() {
    let mut world = PhysicsWorld::new();
    let left = world.create_group();
    let right = world.create_group();
    let a1 = spawn_box(&mut world, 0.0, 0.0);
    let a2 = spawn_box(&mut world, 2.0, 0.0);
    let b1 = spawn_box(&mut world, 4.0, 0.0);
    let b2 = spawn_box(&mut world, 6.0, 0.0);
    world.add(left, a1);
    world.add(left, a2);
    world.add(right, b1);
    world.add(right, b2);
    let (log, on_overlap) = recorder();
    world.register_overlap(left, right, on_overlap);

    assert_eq!(world.update(), 1);
    assert_eq!(*log.lock(), vec![(a1, b1)]);
}

#[test]
fn empty_groups_never_overlap() {
    let mut world = PhysicsWorld::new();
    let a = spawn_box(&mut world, 0.0, 0.0);
    let empty = world.create_group();
    let other = world.create_group();
    world.register_overlap(a, empty, |_, _, _| panic!("empty group overlapped"));
    world.register_overlap(empty, other, |_, _, _| panic!("empty groups overlapped"));

    assert_eq!(world.update(), 0);
    assert_eq!(world.overlap(Node::Group(empty), Node::Entity(a)), None);
}

#[test]
fn a_group_overlapping_itself_pairs_distinct_members() {
    let mut world = PhysicsWorld::new();
    let crowd = world.create_group();
    let x = spawn_box(&mut world, 0.0, 0.0);
    world.add(crowd, x);
    let (log, on_overlap) = recorder();
    world.register_overlap(crowd, crowd, on_overlap);
    assert_eq!(world.update(), 0);

    let y = spawn_box(&mut world, 3.0, 3.0);
    world.add(crowd, y);
    assert_eq!(world.update(), 1);
    assert_eq!(*log.lock(), vec![(x, y)]);
}

#[test]
fn spatial_index_overlaps_use_nearby_cells() {
    let mut world = PhysicsWorld::new();
    let index = world.create_spatial_index_with_cell_size(32.0).unwrap();
    let player = spawn_box(&mut world, 100.0, 100.0);
    let far = spawn_box(&mut world, 500.0, 500.0);
    let near = spawn_box(&mut world, 104.0, 96.0);
    world.add(index, far);
    world.add(index, near);
    let (log, on_overlap) = recorder();
    world.register_overlap(player, index, on_overlap);

    assert_eq!(world.update(), 1);
    assert_eq!(*log.lock(), vec![(player, near)]);
}

#[test]
fn callbacks_may_destroy_what_they_touch() {
    let mut world = PhysicsWorld::new();
    let player = spawn_box(&mut world, 0.0, 0.0);
    let coins = world.create_group();
    for offset in [2.0, 4.0] {
        let coin = spawn_box(&mut world, offset, 0.0);
        world.add(coins, coin);
    }
    let collected = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&collected);
    world.register_overlap(player, coins, move |world, _, coin| {
        sink.lock().push(coin);
        world.destroy(coin);
    });

    assert_eq!(world.update(), 1);
    assert_eq!(world.update(), 1);
    assert_eq!(world.update(), 0);
    assert_eq!(collected.lock().len(), 2);
    assert!(world.collection(coins).unwrap().is_empty());
    assert_eq!(world.entity_count(), 1);
}

#[test]
fn destroying_inside_a_callback_keeps_later_registrations_live() {
    let mut world = PhysicsWorld::new();
    let player = spawn_box(&mut world, 0.0, 0.0);
    let coin = spawn_box(&mut world, 4.0, 0.0);
    let a = spawn_box(&mut world, 100.0, 100.0);
    let b = spawn_box(&mut world, 104.0, 100.0);
    let c = spawn_box(&mut world, 200.0, 200.0);
    let d = spawn_box(&mut world, 204.0, 200.0);
    world.register_overlap(player, coin, |world, _, coin| {
        world.destroy(coin);
    });
    let (log, on_overlap) = recorder();
    world.register_overlap(a, b, on_overlap);
    let (later, on_later) = recorder();
    world.register_overlap(c, d, on_later);

    assert_eq!(world.update(), 3);
    assert_eq!(*log.lock(), vec![(a, b)]);
    assert_eq!(*later.lock(), vec![(c, d)]);
    assert_eq!(world.physics().registry.overlaps().len(), 2);

    assert_eq!(world.update(), 2);
    assert_eq!(log.lock().len(), 2);
}

#[test]
fn pairs_destroyed_earlier_in_the_pass_do_not_fire() {
    let mut world = PhysicsWorld::new();
    let player = spawn_box(&mut world, 0.0, 0.0);
    let coin = spawn_box(&mut world, 4.0, 0.0);
    world.register_overlap(player, coin, |world, player, _| {
        world.destroy(player);
    });
    world.register_overlap(coin, player, |_, _, _| panic!("destroyed player overlapped"));

    assert_eq!(world.update(), 1);
    assert!(!world.is_alive(Node::Entity(player)));
    assert!(world.physics().registry.overlaps().is_empty());
}
