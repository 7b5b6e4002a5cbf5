use std::sync::Arc;

use arcade2d::*;
use parking_lot::Mutex;

fn main() {
    let mut world = PhysicsWorld::new();
    let coins = world.create_group();
    let score = Arc::new(Mutex::new(0u32));

    let player = world
        .spawn(Entity::builder().position(0.0, 0.0).size(16.0, 16.0).velocity(120.0, 0.0))
        .expect("player");

    let tally = Arc::clone(&score);
    world.observe(coins, move |world, coin| {
        let tally = Arc::clone(&tally);
        world.register_overlap(player, coin, move |world, _, coin| {
            *tally.lock() += 1;
            world.destroy(coin);
        });
    });

    for slot in 1..=5 {
        let coin = world
            .spawn(Entity::builder().position(slot as f32 * 48.0, 4.0).size(8.0, 8.0))
            .expect("coin");
        world.add(coins, coin);
    }

    for _ in 0..180 {
        world.step(1.0 / 60.0);
    }

    println!(
        "Collected {} coins, {} left",
        score.lock(),
        world.collection(coins).map_or(0, |group| group.len())
    );
}
