use arcade2d::*;
use parking_lot::Mutex;
use std::sync::Arc;

fn spawn_box(world: &mut PhysicsWorld, x: f32, y: f32, w: f32, h: f32, pushable: bool) -> EntityId {
    world
        .spawn(Entity::builder().position(x, y).size(w, h).pushable(pushable))
        .expect("valid box")
}

type PairLog = Arc<Mutex<Vec<(EntityId, EntityId)>>>;

fn recorder() -> (PairLog, impl FnMut(&mut PhysicsWorld, EntityId, EntityId) + Send + 'static) {
    let log: PairLog = Arc::default();
    let sink = Arc::clone(&log);
    (log, move |_: &mut PhysicsWorld, a: EntityId, b: EntityId| sink.lock().push((a, b)))
}

#[test]
fn immovable_mover_pushes_a_pushable_target() {
    let mut world = PhysicsWorld::new();
    let a = spawn_box(&mut world, 10.0, 0.0, 32.0, 32.0, false);
    let b = spawn_box(&mut world, 40.0, 0.0, 32.0, 32.0, true);
    world.entity_mut(a).unwrap().set_velocity(100.0, 0.0);
    let (log, on_collide) = recorder();
    world.register_collider(a, b, on_collide);

    world.update_entity(a, 0.0);

    let (pusher, pushed) = (world.entity(a).unwrap(), world.entity(b).unwrap());
    assert_eq!(pushed.x(), 42.0);
    assert_eq!(pushed.velocity.x, 0.0);
    assert_eq!(pusher.x(), 10.0);
    assert_eq!(pusher.velocity.x, 100.0);
    assert_eq!(pushed.touching().left, Some(a));
    assert_eq!(pusher.touching().right, Some(b));
    assert_eq!(*log.lock(), vec![(a, b)]);
}

#[test]
fn immovable_pairs_move_the_mover_by_default() {
    let mut world = PhysicsWorld::new();
    let a = spawn_box(&mut world, 10.0, 0.0, 32.0, 32.0, false);
    let b = spawn_box(&mut world, 40.0, 0.0, 32.0, 32.0, false);
    world.register_collider(a, b, |_, _, _| {});

    world.update_entity(a, 0.0);
    assert_eq!(world.entity(a).unwrap().x(), 8.0);
    assert_eq!(world.entity(b).unwrap().x(), 40.0);
}

#[test]
fn immovable_pairs_can_be_ignored() {
    let config = PhysicsConfig {
        immovable_pairs: ImmovablePairPolicy::Ignore,
        ..PhysicsConfig::default()
    };
    let mut world = PhysicsWorld::with_config(config).unwrap();
    let a = spawn_box(&mut world, 10.0, 0.0, 32.0, 32.0, false);
    let b = spawn_box(&mut world, 40.0, 0.0, 32.0, 32.0, false);
    let (log, on_collide) = recorder();
    world.register_collider(a, b, on_collide);

    world.update_entity(a, 0.0);
    assert_eq!(world.entity(a).unwrap().x(), 10.0);
    assert!(!world.entity(a).unwrap().touching().any());
    assert!(log.lock().is_empty());
}

#[test]
fn group_targets_include_members_added_later() {
    let mut world = PhysicsWorld::new();
    let walls = world.create_group();
    let player = spawn_box(&mut world, 0.0, 0.0, 32.0, 32.0, true);
    let (log, on_collide) = recorder();
    world.register_collider(player, walls, on_collide);

    let wall = spawn_box(&mut world, 40.0, 0.0, 32.0, 32.0, false);
    world.add(walls, wall);
    world.entity_mut(player).unwrap().set_velocity(100.0, 0.0);
    world.update_entity(player, 0.1);

    assert_eq!(world.entity(player).unwrap().x(), 8.0);
    assert_eq!(*log.lock(), vec![(player, wall)]);
}

#[test]
fn group_movers_register_members_added_later() {
    let mut world = PhysicsWorld::new();
    let movers = world.create_group();
    let inner = world.create_group();
    world.add(movers, inner);
    let wall = spawn_box(&mut world, 40.0, 0.0, 32.0, 32.0, false);
    let (log, on_collide) = recorder();
    world.register_collider(movers, wall, on_collide);

    let early = spawn_box(&mut world, 10.0, 0.0, 32.0, 32.0, true);
    let late = spawn_box(&mut world, 60.0, 0.0, 32.0, 32.0, true);
    world.add(movers, early);
    world.add(inner, late);
    assert!(world.physics().registry.collider(early).is_some());
    assert!(world.physics().registry.collider(late).is_some());
    assert!(world.physics().registry.collider(wall).is_none());

    world.update_entity(early, 0.0);
    world.update_entity(late, 0.0);
    assert_eq!(world.entity(early).unwrap().x(), 8.0);
    assert_eq!(world.entity(late).unwrap().x(), 72.0);
    assert_eq!(*log.lock(), vec![(early, wall), (late, wall)]);
}

#[test]
fn first_registration_keeps_its_callback() {
    let mut world = PhysicsWorld::new();
    let player = spawn_box(&mut world, 10.0, 0.0, 32.0, 32.0, true);
    let left = spawn_box(&mut world, 40.0, 0.0, 32.0, 32.0, false);
    let right = spawn_box(&mut world, -40.0, 0.0, 32.0, 32.0, false);
    let (first, on_first) = recorder();
    let (second, on_second) = recorder();
    world.register_collider(player, left, on_first);
    world.register_collider(player, right, on_second);

    world.update_entity(player, 0.0);
    assert_eq!(first.lock().len(), 1);
    assert!(second.lock().is_empty());
    assert_eq!(world.physics().registry.collider(player).unwrap().targets().len(), 2);
}

#[test]
fn resolution_never_leaves_the_pair_interpenetrating() {
    let mut world = PhysicsWorld::new();
    let block = spawn_box(&mut world, 100.0, 100.0, 32.0, 32.0, false);
    let probe = spawn_box(&mut world, 0.0, 0.0, 20.0, 20.0, true);
    world.register_collider(probe, block, |_, _, _| {});

    for dx in (-18..32).step_by(2) {
        for dy in (-18..32).step_by(2) {
            world
                .entity_mut(probe)
                .unwrap()
                .set_position(100.0 + dx as f32, 100.0 + dy as f32)
                .set_velocity(0.0, 0.0);
            world.update_entity(probe, 0.0);

            let (probe_box, block_box) = (
                world.entity(probe).unwrap().aabb(),
                world.entity(block).unwrap().aabb(),
            );
            assert!(!probe_box.intersects(&block_box), "offset ({dx}, {dy})");
            assert!(world.entity(probe).unwrap().touching().any(), "offset ({dx}, {dy})");
        }
    }
    assert_eq!(world.entity(block).unwrap().position, Vec2::new(100.0, 100.0));
}

#[test]
fn callbacks_can_mutate_the_world() {
    let mut world = PhysicsWorld::new();
    let ball = spawn_box(&mut world, 0.0, 0.0, 10.0, 10.0, true);
    let paddle = spawn_box(&mut world, -20.0, 15.0, 60.0, 10.0, false);
    world.entity_mut(ball).unwrap().set_velocity(0.0, 80.0);
    world.register_collider(ball, paddle, |world, ball, _| {
        if let Some(ball) = world.entity_mut(ball) {
            ball.set_velocity(0.0, -80.0);
        }
    });

    world.update_entity(ball, 0.1);
    let ball = world.entity(ball).unwrap();
    assert_eq!(ball.max_y(), 15.0);
    assert_eq!(ball.velocity.y, -80.0);
}

#[test]
fn re_entrant_callbacks_are_skipped() {
    let mut world = PhysicsWorld::new();
    let player = spawn_box(&mut world, 0.0, 0.0, 32.0, 32.0, true);
    let wall = spawn_box(&mut world, 40.0, 0.0, 32.0, 32.0, false);
    let calls = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&calls);
    world.register_collider(player, wall, move |world, player, _| {
        *counter.lock() += 1;
        if let Some(entity) = world.entity_mut(player) {
            entity.set_position(20.0, 0.0);
        }
        world.update_entity(player, 0.0);
    });

    world.entity_mut(player).unwrap().set_velocity(100.0, 0.0);
    world.update_entity(player, 0.1);
    assert_eq!(*calls.lock(), 1);
    assert_eq!(world.entity(player).unwrap().x(), 8.0);
}
