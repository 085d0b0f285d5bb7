//! Per-frame game logic.
//!
//! Functions take the current `GameState` mutably plus the frame's clock
//! reading (`now`, ms) and elapsed seconds (`dt`). Randomness comes through an
//! injected RNG and side effects (sounds) are reported as `GameEvent`s, so the
//! whole loop is reproducible under test with a seeded RNG.

use std::sync::Arc;

use glam::Vec2;
use rand::Rng;
use slotmap::SlotMap;

use crate::assets::Assets;
use crate::config::*;
use crate::entities::{
    DisplayMessage, Entity, EntityId, Explosion, GameEvent, GameState, GameStatus, Laser,
    Lifecycle, Meteor, Player, Star,
};
use crate::geometry::FRect;
use crate::input::FrameInput;
use crate::sprite::{Mask, Sprite};
use crate::timer::IntervalTimer;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Fresh session: player centred, full lives, a new starfield, spawn timer
/// counting from `now`.
pub fn init_state(assets: &Assets, now: u64, rng: &mut impl Rng) -> GameState {
    let mut entities = SlotMap::with_key();
    for star in starfield(&assets.star, rng) {
        entities.insert(Entity::Star(star));
    }

    log::info!("session started at {} ms", now);

    GameState {
        player: Player::new(
            Arc::clone(&assets.player),
            Vec2::new(WINDOW_WIDTH / 2.0, WINDOW_HEIGHT / 2.0),
        ),
        entities,
        spawn_timer: IntervalTimer::new(METEOR_SPAWN_INTERVAL_MS, now),
        assets: assets.clone(),
        started_at: now,
        ended_at: None,
        status: GameStatus::Playing,
        frame: 0,
    }
}

/// `STAR_COUNT` stars scattered over the window.
pub fn starfield(image: &Arc<Sprite>, rng: &mut impl Rng) -> Vec<Star> {
    (0..STAR_COUNT)
        .map(|_| {
            let x = rng.gen_range(0..=WINDOW_WIDTH as i32) as f32;
            let y = rng.gen_range(0..=WINDOW_HEIGHT as i32) as f32;
            Star::new(Arc::clone(image), Vec2::new(x, y))
        })
        .collect()
}

// ── Player ───────────────────────────────────────────────────────────────────

/// Unit vector from the held direction keys; zero when idle or when opposite
/// keys cancel out. Diagonals are as fast as straight moves.
pub fn player_direction(input: &FrameInput) -> Vec2 {
    let x = input.right as i32 - input.left as i32;
    let y = input.down as i32 - input.up as i32;
    Vec2::new(x as f32, y as f32).normalize_or_zero()
}

/// Integrate movement for one frame, keeping the ship's centre on screen.
pub fn move_player(state: &mut GameState, input: &FrameInput, dt: f32) {
    let player = &mut state.player;
    player.direction = player_direction(input);
    let center = player.rect.center() + player.direction * player.speed * dt;
    player.rect.set_center(Vec2::new(
        center.x.clamp(0.0, WINDOW_WIDTH),
        center.y.clamp(0.0, WINDOW_HEIGHT),
    ));
}

/// Fire a laser from the ship's nose unless the gun is cooling down.
pub fn player_shoot(
    state: &mut GameState,
    now: u64,
    events: &mut Vec<GameEvent>,
) -> Option<EntityId> {
    if !state.player.can_shoot() {
        return None;
    }
    let laser = Laser::new(Arc::clone(&state.assets.laser), state.player.rect.midtop());
    let id = state.entities.insert(Entity::Laser(laser));
    state.player.cooldown.start(now);
    events.push(GameEvent::LaserFired);
    Some(id)
}

/// Movement, then firing on a fresh press, then cooldown bookkeeping.
pub fn update_player(
    state: &mut GameState,
    input: &FrameInput,
    now: u64,
    dt: f32,
    events: &mut Vec<GameEvent>,
) {
    move_player(state, input, dt);
    if input.fire {
        player_shoot(state, now, events);
    }
    state.player.cooldown.update(now);
}

// ── Spawner ──────────────────────────────────────────────────────────────────

/// One meteor above the top edge with randomised heading, speed and spin.
pub fn spawn_meteor(state: &mut GameState, now: u64, rng: &mut impl Rng) -> EntityId {
    let x = rng.gen_range(0..=WINDOW_WIDTH as i32) as f32;
    let y = rng.gen_range(METEOR_SPAWN_Y_MIN..=METEOR_SPAWN_Y_MAX) as f32;
    let direction = Vec2::new(rng.gen_range(METEOR_DIR_X_MIN..=METEOR_DIR_X_MAX), 1.0);
    let speed = rng.gen_range(METEOR_SPEED_MIN..=METEOR_SPEED_MAX) as f32;
    let rotation_speed = rng.gen_range(METEOR_ROTATION_MIN..=METEOR_ROTATION_MAX) as f32;

    let meteor = Meteor::new(
        Arc::clone(&state.assets.meteor),
        Vec2::new(x, y),
        direction,
        speed,
        rotation_speed,
        now,
    );
    state.entities.insert(Entity::Meteor(meteor))
}

/// One meteor per elapsed spawn interval. Returns how many were spawned.
pub fn spawn_meteors(state: &mut GameState, now: u64, rng: &mut impl Rng) -> u32 {
    let due = state.spawn_timer.poll(now);
    for _ in 0..due {
        spawn_meteor(state, now, rng);
    }
    due
}

// ── Entity lifecycle ─────────────────────────────────────────────────────────

/// Advance every arena entity and drop the ones that expired.
pub fn update_entities(state: &mut GameState, dt: f32, now: u64) {
    state
        .entities
        .retain(|_, entity| entity.update(dt, now) == Lifecycle::Alive);
}

// ── Collisions ───────────────────────────────────────────────────────────────

/// Pixel-exact overlap of two masked rects. Offsets are snapped to the sprite
/// pixel grid.
pub fn masks_collide(a_rect: &FRect, a_mask: &Mask, b_rect: &FRect, b_mask: &Mask) -> bool {
    if !a_rect.collides(b_rect) {
        return false;
    }
    let offset = (
        ((b_rect.x - a_rect.x) / PIXEL_SIZE).round() as i32,
        ((b_rect.y - a_rect.y) / PIXEL_SIZE).round() as i32,
    );
    a_mask.overlap(b_mask, offset).is_some()
}

/// Player ↔ meteors (mask), then lasers ↔ meteors (bounding box).
///
/// Every meteor touching the player is destroyed, but the player loses a
/// single life per frame however many there were.
pub fn resolve_collisions(state: &mut GameState, now: u64, events: &mut Vec<GameEvent>) {
    // ── Player ↔ meteors ─────────────────────────────────────────────────────
    let player_rect = state.player.rect;
    let hits: Vec<EntityId> = state
        .meteors()
        .filter(|(_, m)| masks_collide(&player_rect, state.player.mask(), &m.rect, &m.mask))
        .map(|(id, _)| id)
        .collect();

    if !hits.is_empty() {
        for id in &hits {
            state.entities.remove(*id);
        }
        let player = &mut state.player;
        player.lives = player.lives.saturating_sub(1);
        let lives = player.lives;
        log::debug!("player hit by {} meteor(s), {} lives left", hits.len(), lives);

        let message = DisplayMessage::new(
            format!("Taking Damage!!!\nLives left: {}", lives),
            player_rect.center(),
            DAMAGE_MESSAGE_MS,
            now,
        );
        state.entities.insert(Entity::Message(message));
        events.push(GameEvent::PlayerHit {
            lives,
            meteors: hits.len(),
        });

        if lives == 0 && state.status == GameStatus::Playing {
            state.status = GameStatus::GameOver;
            state.ended_at = Some(now);
            log::info!("game over, score {}", score(state, now));
            events.push(GameEvent::GameOver);
        }
    }

    // ── Lasers ↔ meteors ─────────────────────────────────────────────────────
    let lasers: Vec<(EntityId, FRect)> = state.lasers().map(|(id, l)| (id, l.rect)).collect();
    for (laser_id, laser_rect) in lasers {
        let hit: Vec<EntityId> = state
            .meteors()
            .filter(|(_, m)| m.rect.collides(&laser_rect))
            .map(|(id, _)| id)
            .collect();
        if hit.is_empty() {
            continue;
        }
        for id in &hit {
            state.entities.remove(*id);
        }
        state.entities.remove(laser_id);

        let at = laser_rect.midtop();
        let explosion = Explosion::new(Arc::clone(&state.assets.explosion), at);
        state.entities.insert(Entity::Explosion(explosion));
        events.push(GameEvent::MeteorDestroyed {
            at,
            meteors: hit.len(),
        });
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the session by one frame: spawn, move everything, let the player
/// act, then resolve collisions. Does nothing once the game is over.
pub fn tick(
    state: &mut GameState,
    input: &FrameInput,
    now: u64,
    dt: f32,
    rng: &mut impl Rng,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.status != GameStatus::Playing {
        return events;
    }
    state.frame += 1;

    spawn_meteors(state, now, rng);
    update_entities(state, dt, now);
    update_player(state, input, now, dt, &mut events);
    resolve_collisions(state, now, &mut events);

    events
}

/// Survival score: tenths of a second since the session started, frozen at
/// game over.
pub fn score(state: &GameState, now: u64) -> u64 {
    state.ended_at.unwrap_or(now).saturating_sub(state.started_at) / 100
}
