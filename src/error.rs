use std::path::PathBuf;

use thiserror::Error;

/// Failures that can stop the game from starting. Gameplay itself never errors.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("cannot read asset {}: {source}", path.display())]
    Asset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bad sprite {} (line {line}): {reason}", path.display())]
    Sprite {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("animation in {} has no frames", path.display())]
    EmptyAnimation { path: PathBuf },

    #[error("audio: {0}")]
    Audio(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
