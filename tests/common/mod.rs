#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use meteor_shooter::assets::Assets;
use meteor_shooter::compute::init_state;
use meteor_shooter::entities::{Entity, EntityId, GameState, Meteor};
use meteor_shooter::sprite::Sprite;

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// `w × h` sprite of one solid colour.
pub fn block(w: usize, h: usize) -> Sprite {
    let row = "W".repeat(w);
    let text = vec![row; h].join("\n");
    Sprite::parse(&text).unwrap()
}

/// Solid squares everywhere: player 100×100, meteor 20×20, laser 10×50 world px,
/// three explosion frames.
pub fn block_assets() -> Assets {
    Assets {
        player: Arc::new(block(20, 20)),
        meteor: Arc::new(block(4, 4)),
        laser: Arc::new(block(2, 10)),
        star: Arc::new(block(1, 1)),
        explosion: Arc::new(vec![block(2, 2), block(3, 3), block(4, 4)]),
    }
}

/// The sprites shipped with the game.
pub fn shipped_assets() -> Assets {
    Assets::load(&Path::new(env!("CARGO_MANIFEST_DIR")).join("assets")).unwrap()
}

/// Fresh session started at `now` with block sprites.
pub fn make_state(now: u64) -> GameState {
    init_state(&block_assets(), now, &mut seeded_rng())
}

/// Motionless, non-spinning meteor centred on `center`.
pub fn still_meteor(state: &mut GameState, center: Vec2, now: u64) -> EntityId {
    let meteor = Meteor::new(
        Arc::clone(&state.assets.meteor),
        center,
        Vec2::new(0.0, 1.0),
        0.0,
        0.0,
        now,
    );
    state.entities.insert(Entity::Meteor(meteor))
}
