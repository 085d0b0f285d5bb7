//! Game entity types.
//!
//! Transient entities (stars, lasers, meteors, explosions, floating text) live
//! in one arena keyed by stable `EntityId` handles. Each variant knows only its
//! own motion and expiry rule; interactions between entities are in `compute`.

use std::sync::Arc;

use glam::Vec2;
use slotmap::{new_key_type, SlotMap};

use crate::assets::Assets;
use crate::config::{
    DAMAGE_MESSAGE_SPEED, EXPLOSION_FPS, FIRE_COOLDOWN_MS, LASER_SPEED, MESSAGE_FONT_SIZE,
    METEOR_LIFETIME_MS, PLAYER_LIVES, PLAYER_SPEED,
};
use crate::geometry::{text_extent, FRect};
use crate::sprite::{Mask, Rgb, Sprite};
use crate::timer::{IntervalTimer, Timer};

new_key_type! {
    pub struct EntityId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// Result of an entity's per-frame update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Alive,
    Expired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Star,
    Laser,
    Meteor,
    Explosion,
    Message,
}

/// What the renderer should draw for an entity.
#[derive(Clone, Copy, Debug)]
pub enum Visual<'a> {
    Sprite(&'a Sprite),
    Text {
        text: &'a str,
        color: Rgb,
        size: f32,
    },
}

/// Things that happened during a frame, for audio and logging.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    LaserFired,
    /// A laser destroyed one or more meteors.
    MeteorDestroyed { at: Vec2, meteors: usize },
    /// The player lost a life. `meteors` is how many overlapped in that frame.
    PlayerHit { lives: u32, meteors: usize },
    GameOver,
}

// ── Star ──────────────────────────────────────────────────────────────────────

/// Decorative background star. Never moves, never expires.
#[derive(Clone, Debug)]
pub struct Star {
    pub rect: FRect,
    image: Arc<Sprite>,
}

impl Star {
    pub fn new(image: Arc<Sprite>, center: Vec2) -> Self {
        Self {
            rect: FRect::from_center(center, image.world_size()),
            image,
        }
    }

    pub fn image(&self) -> &Sprite {
        &self.image
    }
}

// ── Laser ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Laser {
    pub rect: FRect,
    image: Arc<Sprite>,
}

impl Laser {
    /// A laser whose bottom edge sits at `midbottom`.
    pub fn new(image: Arc<Sprite>, midbottom: Vec2) -> Self {
        Self {
            rect: FRect::from_midbottom(midbottom, image.world_size()),
            image,
        }
    }

    /// Flies straight up; gone once fully above the screen.
    pub fn update(&mut self, dt: f32) -> Lifecycle {
        self.rect.y -= LASER_SPEED * dt;
        if self.rect.bottom() < 0.0 {
            Lifecycle::Expired
        } else {
            Lifecycle::Alive
        }
    }
}

// ── Meteor ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Meteor {
    base: Arc<Sprite>,
    /// `base` rotated by `rotation`; regenerated every update.
    pub image: Sprite,
    pub mask: Mask,
    pub rect: FRect,
    /// Not normalised: y is always 1, x in [-0.7, 0.5].
    pub direction: Vec2,
    pub speed: f32,
    /// Degrees, counter-clockwise.
    pub rotation: f32,
    /// Degrees per second.
    pub rotation_speed: f32,
    pub spawned_at: u64,
    pub lifetime: u64,
}

impl Meteor {
    pub fn new(
        base: Arc<Sprite>,
        center: Vec2,
        direction: Vec2,
        speed: f32,
        rotation_speed: f32,
        now: u64,
    ) -> Self {
        let image = (*base).clone();
        Self {
            mask: image.mask(),
            rect: FRect::from_center(center, image.world_size()),
            image,
            base,
            direction,
            speed,
            rotation: 0.0,
            rotation_speed,
            spawned_at: now,
            lifetime: METEOR_LIFETIME_MS,
        }
    }

    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.spawned_at)
    }

    /// Spin, re-centre the grown/shrunk rotated image on the old centre, then
    /// move. Expires once its lifetime has elapsed.
    pub fn update(&mut self, dt: f32, now: u64) -> Lifecycle {
        self.rotation = (self.rotation + self.rotation_speed * dt) % 360.0;
        let center = self.rect.center();
        self.image = self.base.rotated(self.rotation);
        self.mask = self.image.mask();
        self.rect = FRect::from_center(center, self.image.world_size());

        self.rect.translate(self.direction * self.speed * dt);

        if self.age(now) >= self.lifetime {
            Lifecycle::Expired
        } else {
            Lifecycle::Alive
        }
    }
}

// ── Explosion ─────────────────────────────────────────────────────────────────

/// One-shot frame animation, removed after the last frame.
#[derive(Clone, Debug)]
pub struct Explosion {
    frames: Arc<Vec<Sprite>>,
    progress: f32,
    pub rect: FRect,
}

impl Explosion {
    pub fn new(frames: Arc<Vec<Sprite>>, center: Vec2) -> Self {
        let size = frames.first().map(Sprite::world_size).unwrap_or(Vec2::ZERO);
        Self {
            frames,
            progress: 0.0,
            rect: FRect::from_center(center, size),
        }
    }

    pub fn frame_index(&self) -> usize {
        self.progress as usize
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn current_frame(&self) -> Option<&Sprite> {
        self.frames.get(self.frame_index())
    }

    /// Advances at `EXPLOSION_FPS`, but never by more than one frame per call
    /// so a slow frame cannot skip part of the animation.
    pub fn update(&mut self, dt: f32) -> Lifecycle {
        let shown = self.progress.floor();
        self.progress = (self.progress + EXPLOSION_FPS * dt).min(shown + 1.0);
        match self.current_frame().map(Sprite::world_size) {
            Some(size) => {
                let center = self.rect.center();
                self.rect = FRect::from_center(center, size);
                Lifecycle::Alive
            }
            None => Lifecycle::Expired,
        }
    }
}

// ── Floating text ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct DisplayMessage {
    pub text: String,
    pub color: Rgb,
    pub font_size: f32,
    pub rect: FRect,
    /// px/s, negative drifts up.
    pub y_speed: f32,
    pub duration: u64,
    pub started_at: u64,
}

impl DisplayMessage {
    pub fn new(text: impl Into<String>, center: Vec2, duration: u64, now: u64) -> Self {
        let text = text.into();
        let size = text_extent(&text, MESSAGE_FONT_SIZE);
        Self {
            text,
            color: Rgb::RED,
            font_size: MESSAGE_FONT_SIZE,
            rect: FRect::from_center(center, size),
            y_speed: DAMAGE_MESSAGE_SPEED,
            duration,
            started_at: now,
        }
    }

    pub fn update(&mut self, dt: f32, now: u64) -> Lifecycle {
        self.rect.y += self.y_speed * dt;
        if now.saturating_sub(self.started_at) > self.duration {
            Lifecycle::Expired
        } else {
            Lifecycle::Alive
        }
    }
}

// ── Entity union ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub enum Entity {
    Star(Star),
    Laser(Laser),
    Meteor(Meteor),
    Explosion(Explosion),
    Message(DisplayMessage),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Star(_) => EntityKind::Star,
            Entity::Laser(_) => EntityKind::Laser,
            Entity::Meteor(_) => EntityKind::Meteor,
            Entity::Explosion(_) => EntityKind::Explosion,
            Entity::Message(_) => EntityKind::Message,
        }
    }

    pub fn update(&mut self, dt: f32, now: u64) -> Lifecycle {
        match self {
            Entity::Star(_) => Lifecycle::Alive,
            Entity::Laser(laser) => laser.update(dt),
            Entity::Meteor(meteor) => meteor.update(dt, now),
            Entity::Explosion(explosion) => explosion.update(dt),
            Entity::Message(message) => message.update(dt, now),
        }
    }

    pub fn bounds(&self) -> FRect {
        match self {
            Entity::Star(star) => star.rect,
            Entity::Laser(laser) => laser.rect,
            Entity::Meteor(meteor) => meteor.rect,
            Entity::Explosion(explosion) => explosion.rect,
            Entity::Message(message) => message.rect,
        }
    }

    /// `None` only for an explosion that has run past its last frame.
    pub fn visual(&self) -> Option<Visual<'_>> {
        match self {
            Entity::Star(star) => Some(Visual::Sprite(&star.image)),
            Entity::Laser(laser) => Some(Visual::Sprite(&laser.image)),
            Entity::Meteor(meteor) => Some(Visual::Sprite(&meteor.image)),
            Entity::Explosion(explosion) => explosion.current_frame().map(Visual::Sprite),
            Entity::Message(message) => Some(Visual::Text {
                text: &message.text,
                color: message.color,
                size: message.font_size,
            }),
        }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub rect: FRect,
    /// Length 0 or 1.
    pub direction: Vec2,
    pub speed: f32,
    /// Active while the gun is cooling down.
    pub cooldown: Timer,
    pub lives: u32,
    image: Arc<Sprite>,
    mask: Mask,
}

impl Player {
    pub fn new(image: Arc<Sprite>, center: Vec2) -> Self {
        Self {
            rect: FRect::from_center(center, image.world_size()),
            direction: Vec2::ZERO,
            speed: PLAYER_SPEED,
            cooldown: Timer::new(FIRE_COOLDOWN_MS),
            lives: PLAYER_LIVES,
            mask: image.mask(),
            image,
        }
    }

    pub fn can_shoot(&self) -> bool {
        !self.cooldown.is_active()
    }

    pub fn image(&self) -> &Sprite {
        &self.image
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// One play session, from pressing Start to losing the last life.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub entities: SlotMap<EntityId, Entity>,
    pub spawn_timer: IntervalTimer,
    pub assets: Assets,
    pub started_at: u64,
    /// Set when the last life is lost; freezes the score.
    pub ended_at: Option<u64>,
    pub status: GameStatus,
    pub frame: u64,
}

impl GameState {
    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.values().filter(|e| e.kind() == kind).count()
    }

    pub fn meteors(&self) -> impl Iterator<Item = (EntityId, &Meteor)> {
        self.entities.iter().filter_map(|(id, e)| match e {
            Entity::Meteor(m) => Some((id, m)),
            _ => None,
        })
    }

    pub fn lasers(&self) -> impl Iterator<Item = (EntityId, &Laser)> {
        self.entities.iter().filter_map(|(id, e)| match e {
            Entity::Laser(l) => Some((id, l)),
            _ => None,
        })
    }

    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.entities.values().filter(move |e| e.kind() == kind)
    }
}
