//! Meteor Shooter: dodge and shoot down falling meteors in the terminal.
//!
//! - `entities`: pure-ish data (player, arena of transient entities)
//! - `compute`: per-frame logic (movement, spawning, collisions)
//! - `app`: Menu / Playing / GameOver state machine
//! - `display`: terminal rendering
//! - `input`, `audio`, `assets`: collaborators at the edges

pub mod app;
pub mod assets;
pub mod audio;
pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod input;
pub mod sprite;
pub mod timer;

pub use error::{GameError, Result};
