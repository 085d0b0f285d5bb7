//! Startup asset loading. Everything is read once and shared read-only.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{GameError, Result};
use crate::sprite::Sprite;

#[derive(Clone, Debug)]
pub struct Assets {
    pub player: Arc<Sprite>,
    pub meteor: Arc<Sprite>,
    pub laser: Arc<Sprite>,
    pub star: Arc<Sprite>,
    pub explosion: Arc<Vec<Sprite>>,
}

impl Assets {
    /// Load every image under `root/images`. Any missing or malformed file
    /// aborts the load.
    pub fn load(root: &Path) -> Result<Self> {
        let images = root.join("images");
        let explosion_dir = images.join("explosion");

        let explosion = load_animation(&explosion_dir)?;
        if explosion.is_empty() {
            return Err(GameError::EmptyAnimation {
                path: explosion_dir,
            });
        }

        let assets = Self {
            player: Arc::new(load_sprite(&images.join("player.txt"))?),
            meteor: Arc::new(load_sprite(&images.join("meteor.txt"))?),
            laser: Arc::new(load_sprite(&images.join("laser.txt"))?),
            star: Arc::new(load_sprite(&images.join("star.txt"))?),
            explosion: Arc::new(explosion),
        };
        log::info!(
            "loaded sprites from {} ({} explosion frames)",
            images.display(),
            assets.explosion.len()
        );
        Ok(assets)
    }
}

/// Consecutively numbered frames `0.txt`, `1.txt`, … up to the first gap.
pub fn load_animation(dir: &Path) -> Result<Vec<Sprite>> {
    let mut frames = Vec::new();
    loop {
        let path = dir.join(format!("{}.txt", frames.len()));
        if !path.is_file() {
            return Ok(frames);
        }
        frames.push(load_sprite(&path)?);
    }
}

pub fn load_sprite(path: &Path) -> Result<Sprite> {
    let text = read(path)?;
    Sprite::parse(&text).map_err(|e| GameError::Sprite {
        path: path.to_path_buf(),
        line: e.line,
        reason: e.reason,
    })
}

/// Raw bytes of a file under the asset root (sounds).
pub fn load_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| GameError::Asset {
        path: path.to_path_buf(),
        source,
    })
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| GameError::Asset {
        path: PathBuf::from(path),
        source,
    })
}
