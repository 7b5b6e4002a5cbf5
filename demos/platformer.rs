use arcade2d::*;

const GRAVITY: f32 = 900.0;

fn main() {
    let mut world = PhysicsWorld::new();
    let level = world.create_spatial_index();

    for column in 0..40 {
        let tile = world
            .spawn(Entity::builder().position(column as f32 * 32.0, 400.0).size(32.0, 32.0))
            .expect("tile");
        world.add(level, tile);
    }
    let wall = world
        .spawn(Entity::builder().position(640.0, 336.0).size(32.0, 64.0))
        .expect("wall");
    world.add(level, wall);

    let player = world
        .spawn(
            Entity::builder()
                .position(64.0, 300.0)
                .size(24.0, 32.0)
                .velocity(180.0, 0.0)
                .pushable(true),
        )
        .expect("player");
    world.register_collider(player, level, |world, player, other| {
        let blocked = world
            .entity(player)
            .is_some_and(|body| body.touching().right == Some(other));
        if blocked {
            println!("player blocked by {:?}", other);
        }
    });

    let dt = 1.0 / 60.0;
    for frame in 0..240 {
        if let Some(body) = world.entity_mut(player) {
            body.apply_force(0.0, GRAVITY * dt);
            if body.touching().down.is_some() && frame % 60 == 0 {
                body.apply_force(0.0, -420.0);
            }
        }
        world.step(dt);
    }

    if let Some(body) = world.entity(player) {
        println!(
            "Player after 4 seconds: position {:?}, grounded: {}",
            body.position,
            body.touching().down.is_some()
        );
    }
}
