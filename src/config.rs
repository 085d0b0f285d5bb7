//! Game constants and the few runtime knobs read from the environment.

use std::path::PathBuf;
use std::time::Duration;

// ── Window ────────────────────────────────────────────────────────────────────

/// Logical play-area size in world pixels. The terminal is a scaled view of it.
pub const WINDOW_WIDTH: f32 = 1280.0;
pub const WINDOW_HEIGHT: f32 = 720.0;

/// World pixels covered by one pixel of a sprite bitmap.
pub const PIXEL_SIZE: f32 = 5.0;

// ── Player ────────────────────────────────────────────────────────────────────

pub const PLAYER_SPEED: f32 = 300.0;
pub const PLAYER_LIVES: u32 = 5;
/// Minimum milliseconds between two shots.
pub const FIRE_COOLDOWN_MS: u64 = 300;

// ── Laser ─────────────────────────────────────────────────────────────────────

pub const LASER_SPEED: f32 = 400.0;

// ── Meteors ───────────────────────────────────────────────────────────────────

pub const METEOR_SPAWN_INTERVAL_MS: u64 = 400;
pub const METEOR_LIFETIME_MS: u64 = 4500;
pub const METEOR_SPAWN_Y_MIN: i32 = -200;
pub const METEOR_SPAWN_Y_MAX: i32 = -100;
pub const METEOR_DIR_X_MIN: f32 = -0.7;
pub const METEOR_DIR_X_MAX: f32 = 0.5;
pub const METEOR_SPEED_MIN: u32 = 200;
pub const METEOR_SPEED_MAX: u32 = 300;
/// Degrees per second.
pub const METEOR_ROTATION_MIN: u32 = 40;
pub const METEOR_ROTATION_MAX: u32 = 80;

// ── Effects ───────────────────────────────────────────────────────────────────

/// Explosion animation rate, frames per second.
pub const EXPLOSION_FPS: f32 = 20.0;
pub const DAMAGE_MESSAGE_MS: u64 = 1500;
/// Vertical drift of floating text, px/s (negative = up).
pub const DAMAGE_MESSAGE_SPEED: f32 = -100.0;
pub const STAR_COUNT: usize = 20;

// ── Screens ───────────────────────────────────────────────────────────────────

pub const GAME_OVER_DELAY_MS: u64 = 2000;

// ── Text ──────────────────────────────────────────────────────────────────────

pub const HUD_FONT_SIZE: f32 = 40.0;
pub const MESSAGE_FONT_SIZE: f32 = 30.0;
pub const MENU_FONT_SIZE: f32 = 60.0;

// ── Runtime configuration ─────────────────────────────────────────────────────

const ASSETS_ENV: &str = "METEOR_SHOOTER_ASSETS";
const LOG_ENV: &str = "METEOR_SHOOTER_LOG";

/// ≈60 FPS
const FRAME: Duration = Duration::from_millis(16);

#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Root of the `images/` and `audio/` directories.
    pub asset_dir: PathBuf,
    /// Target frame duration for pacing the main loop.
    pub frame: Duration,
    /// Where log records go. `None` disables logging (stderr is the game screen).
    pub log_file: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets"),
            frame: FRAME,
            log_file: None,
        }
    }
}

impl GameConfig {
    /// Defaults overridden by `METEOR_SHOOTER_ASSETS` and `METEOR_SHOOTER_LOG`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(dir) = lookup(ASSETS_ENV).filter(|s| !s.trim().is_empty()) {
            config.asset_dir = PathBuf::from(dir);
        }
        config.log_file = lookup(LOG_ENV)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);
        config
    }
}
