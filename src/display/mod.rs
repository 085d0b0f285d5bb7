//! Rendering layer: all terminal output lives here.
//!
//! Each function receives a canvas and an immutable view of the application
//! state. No game logic is performed; this module only translates state into
//! pixels, text and finally terminal commands.

pub mod canvas;

use std::io::Write;

use glam::Vec2;

use crate::app::{App, MenuItem, Screen, MENU_TITLE};
use crate::compute::score;
use crate::config::{HUD_FONT_SIZE, MENU_FONT_SIZE, WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::entities::{EntityKind, GameState, Star, Visual};
use crate::geometry::{text_extent, FRect, Viewport};
use crate::sprite::Rgb;

pub use canvas::Canvas;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_TEXT: Rgb = Rgb::CREAM;
const C_START: Rgb = Rgb::GREEN;
const C_QUIT: Rgb = Rgb::QUIT_RED;
const C_HOVER: Rgb = Rgb::YELLOW;
const C_HINT: Rgb = Rgb(120, 130, 160);
const C_GAME_OVER: Rgb = Rgb::RED;

const HINT_FONT_SIZE: f32 = 20.0;

/// Draw order, back to front.
const LAYERS: [EntityKind; 5] = [
    EntityKind::Star,
    EntityKind::Meteor,
    EntityKind::Laser,
    EntityKind::Explosion,
    EntityKind::Message,
];

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame of whichever screen is active.
pub fn render<W: Write>(
    out: &mut W,
    app: &App,
    viewport: Viewport,
    now: u64,
) -> std::io::Result<()> {
    compose(app, viewport, now).flush(out)
}

/// Build the frame without touching the terminal.
pub fn compose(app: &App, viewport: Viewport, now: u64) -> Canvas {
    match (app.screen, app.game.as_ref()) {
        (Screen::Playing, Some(game)) => draw_game(viewport, game, now),
        (Screen::GameOver { .. }, Some(game)) => draw_game_over(viewport, game, now),
        _ => draw_menu(viewport, app),
    }
}

// ── Playing ───────────────────────────────────────────────────────────────────

fn draw_game(viewport: Viewport, game: &GameState, now: u64) -> Canvas {
    let mut canvas = Canvas::new(viewport, Rgb::SKY);

    for kind in LAYERS {
        for entity in game.of_kind(kind) {
            match entity.visual() {
                Some(Visual::Sprite(sprite)) => canvas.blit(sprite, entity.bounds()),
                Some(Visual::Text { text, color, size }) => {
                    canvas.text_centered(text, entity.bounds().center(), size, color)
                }
                None => {}
            }
        }
    }
    canvas.blit(game.player.image(), game.player.rect);

    draw_hud(&mut canvas, game, now);
    canvas
}

fn draw_hud(canvas: &mut Canvas, game: &GameState, now: u64) {
    canvas.text("Meteor Shooter", Vec2::new(5.0, 5.0), HUD_FONT_SIZE, C_TEXT);
    canvas.text(
        &format!("Lives: {}", game.player.lives),
        Vec2::new(10.0, 60.0),
        HUD_FONT_SIZE,
        C_TEXT,
    );

    // Score, centred near the bottom inside a rounded box
    let score_text = score(game, now).to_string();
    let rect = FRect::from_midbottom(
        Vec2::new(WINDOW_WIDTH / 2.0, WINDOW_HEIGHT - 50.0),
        text_extent(&score_text, HUD_FONT_SIZE),
    );
    canvas.text_centered(&score_text, rect.center(), HUD_FONT_SIZE, C_TEXT);
    canvas.frame(rect.inflate(40.0, 30.0), C_TEXT);
}

// ── Menu ──────────────────────────────────────────────────────────────────────

fn draw_menu(viewport: Viewport, app: &App) -> Canvas {
    let mut canvas = Canvas::new(viewport, Rgb::MENU_NIGHT);
    draw_stars(&mut canvas, &app.backdrop);

    let menu = &app.menu;
    let title = Vec2::new(menu.title.x, menu.title.y);
    canvas.text(MENU_TITLE, title, MENU_FONT_SIZE, C_TEXT);

    for (item, idle) in [(MenuItem::Start, C_START), (MenuItem::Quit, C_QUIT)] {
        let color = if app.hovered == Some(item) { C_HOVER } else { idle };
        let rect = menu.rect(item);
        canvas.text(item.label(), Vec2::new(rect.x, rect.y), MENU_FONT_SIZE, color);
    }

    canvas.text_centered(
        "Click Start (or press Enter)   Arrows/WASD: Move   SPACE: Shoot   Q: Quit",
        Vec2::new(WINDOW_WIDTH / 2.0, WINDOW_HEIGHT - 30.0),
        HINT_FONT_SIZE,
        C_HINT,
    );
    canvas
}

fn draw_stars(canvas: &mut Canvas, stars: &[Star]) {
    for star in stars {
        canvas.blit(star.image(), star.rect);
    }
}

// ── Game over ─────────────────────────────────────────────────────────────────

fn draw_game_over(viewport: Viewport, game: &GameState, now: u64) -> Canvas {
    let mut canvas = Canvas::new(viewport, Rgb::BLACK);
    canvas.text_centered(
        "Nice Try!",
        Vec2::new(WINDOW_WIDTH / 2.0, WINDOW_HEIGHT / 3.0),
        MENU_FONT_SIZE,
        C_GAME_OVER,
    );
    canvas.text_centered(
        &format!("Score: {}", score(game, now)),
        Vec2::new(WINDOW_WIDTH / 2.0, WINDOW_HEIGHT / 2.0),
        HUD_FONT_SIZE,
        C_TEXT,
    );
    canvas
}
