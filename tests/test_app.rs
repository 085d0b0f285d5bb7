mod common;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use glam::Vec2;

use meteor_shooter::app::*;
use meteor_shooter::compute::score;
use meteor_shooter::entities::{EntityKind, GameEvent, GameStatus};
use meteor_shooter::geometry::Viewport;
use meteor_shooter::input::{FrameInput, InputTracker};

use common::{block_assets, seeded_rng, still_meteor};

fn new_app() -> App {
    App::new(block_assets(), &mut seeded_rng())
}

fn step(app: &mut App, input: FrameInput, now: u64) -> (Flow, Vec<GameEvent>) {
    let mut events = Vec::new();
    let flow = app.update(&input, now, 0.0, &mut seeded_rng(), &mut events);
    (flow, events)
}

fn start() -> FrameInput {
    FrameInput {
        start: true,
        ..FrameInput::default()
    }
}

fn click(at: Vec2) -> FrameInput {
    FrameInput {
        pointer: Some(at),
        pointer_down: true,
        ..FrameInput::default()
    }
}

/// Puts a meteor on the ship with one life left, so the next frame ends the game.
fn doom(app: &mut App, now: u64) {
    let game = app.game.as_mut().unwrap();
    game.player.lives = 1;
    let center = game.player.rect.center();
    still_meteor(game, center, now);
}

// ── Menu ──────────────────────────────────────────────────────────────────────

#[test]
fn starts_on_menu_with_backdrop() {
    let app = new_app();
    assert_eq!(app.screen, Screen::Menu);
    assert!(app.game.is_none());
    assert_eq!(app.backdrop.len(), 20);
}

#[test]
fn menu_layout_positions() {
    let menu = MenuLayout::default();
    assert_eq!((menu.title.x, menu.title.y), (50.0, 100.0));
    assert_eq!((menu.start.x, menu.start.y), (100.0, 240.0));
    assert!((menu.quit.y - 720.0 / 2.3).abs() < 1e-3);
}

#[test]
fn hover_highlights_item() {
    let mut app = new_app();
    let hover = FrameInput {
        pointer: Some(Vec2::new(150.0, 260.0)),
        ..FrameInput::default()
    };
    step(&mut app, hover, 0);
    assert_eq!(app.hovered, Some(MenuItem::Start));
    assert_eq!(app.screen, Screen::Menu);

    step(&mut app, FrameInput::default(), 16);
    assert_eq!(app.hovered, None);
}

#[test]
fn click_start_begins_session() {
    let mut app = new_app();
    let (flow, _) = step(&mut app, click(Vec2::new(150.0, 260.0)), 500);
    assert_eq!(flow, Flow::Continue);
    assert_eq!(app.screen, Screen::Playing);

    let game = app.game.as_ref().unwrap();
    assert_eq!(game.started_at, 500);
    assert_eq!(game.player.lives, 5);
}

#[test]
fn click_quit_exits() {
    let mut app = new_app();
    let (flow, _) = step(&mut app, click(Vec2::new(150.0, 330.0)), 0);
    assert_eq!(flow, Flow::Quit);
}

#[test]
fn click_outside_items_does_nothing() {
    let mut app = new_app();
    let (flow, _) = step(&mut app, click(Vec2::new(1000.0, 600.0)), 0);
    assert_eq!(flow, Flow::Continue);
    assert_eq!(app.screen, Screen::Menu);
}

#[test]
fn keyboard_start() {
    let mut app = new_app();
    step(&mut app, start(), 0);
    assert_eq!(app.screen, Screen::Playing);
}

#[test]
fn quit_signal_wins_on_any_screen() {
    let quit = FrameInput {
        quit: true,
        ..FrameInput::default()
    };
    let mut app = new_app();
    assert_eq!(step(&mut app, quit.clone(), 0).0, Flow::Quit);

    let mut app = new_app();
    step(&mut app, start(), 0);
    assert_eq!(step(&mut app, quit, 16).0, Flow::Quit);
}

// ── Playing ───────────────────────────────────────────────────────────────────

#[test]
fn playing_forwards_game_events() {
    let mut app = new_app();
    step(&mut app, start(), 0);
    let fire = FrameInput {
        fire: true,
        ..FrameInput::default()
    };
    let (_, events) = step(&mut app, fire, 16);
    assert_eq!(events, vec![GameEvent::LaserFired]);
    assert_eq!(app.game.as_ref().unwrap().count(EntityKind::Laser), 1);
}

#[test]
fn start_key_ignored_while_playing() {
    let mut app = new_app();
    step(&mut app, start(), 0);
    step(&mut app, start(), 1000);
    assert_eq!(app.game.as_ref().unwrap().started_at, 0);
}

// ── Game over ─────────────────────────────────────────────────────────────────

#[test]
fn losing_last_life_shows_game_over() {
    let mut app = new_app();
    step(&mut app, start(), 0);
    doom(&mut app, 100);

    let (_, events) = step(&mut app, FrameInput::default(), 3000);
    assert_eq!(app.screen, Screen::GameOver { since: 3000 });
    assert!(events.contains(&GameEvent::GameOver));
    let game = app.game.as_ref().unwrap();
    assert_eq!(game.status, GameStatus::GameOver);
    assert_eq!(score(game, 9999), 30);
}

#[test]
fn game_over_returns_to_menu_after_two_seconds() {
    let mut app = new_app();
    step(&mut app, start(), 0);
    doom(&mut app, 100);
    step(&mut app, FrameInput::default(), 3000);

    // Input is ignored while the result is shown
    step(&mut app, start(), 4999);
    assert_eq!(app.screen, Screen::GameOver { since: 3000 });

    step(&mut app, FrameInput::default(), 5000);
    assert_eq!(app.screen, Screen::Menu);
}

#[test]
fn restart_gets_fresh_lives_and_score() {
    let mut app = new_app();
    step(&mut app, start(), 0);
    doom(&mut app, 100);
    step(&mut app, FrameInput::default(), 3000);
    step(&mut app, FrameInput::default(), 5000);

    step(&mut app, start(), 6000);
    assert_eq!(app.screen, Screen::Playing);
    let game = app.game.as_ref().unwrap();
    assert_eq!(game.player.lives, 5);
    assert_eq!(game.status, GameStatus::Playing);
    assert_eq!(score(game, 6000), 0);
    assert_eq!(game.count(EntityKind::Meteor), 0);
}

#[test]
fn holding_down_through_game_over_stays_on_menu() {
    let mut app = new_app();
    step(&mut app, start(), 0);
    app.screen = Screen::GameOver { since: 1000 };

    // Auto-repeat of the down key with no release events
    let mut tracker = InputTracker::new(false);
    let down = Event::Key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE));
    let mut reached_menu = false;
    for now in (1000..=4000).step_by(50) {
        tracker.handle(&down, now);
        let input = tracker.snapshot(now, &Viewport::new(128, 36));
        step(&mut app, input, now);
        reached_menu |= app.screen == Screen::Menu;
        if reached_menu {
            assert_eq!(app.screen, Screen::Menu, "left the menu at {now} ms");
        }
    }
    assert!(reached_menu);
}

#[test]
fn enter_held_through_game_over_needs_a_fresh_press() {
    let mut app = new_app();
    step(&mut app, start(), 0);
    app.screen = Screen::GameOver { since: 1000 };

    let mut tracker = InputTracker::new(false);
    let enter = Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    for now in (1000..=4000).step_by(50) {
        tracker.handle(&enter, now);
        let input = tracker.snapshot(now, &Viewport::new(128, 36));
        step(&mut app, input, now);
    }
    assert_eq!(app.screen, Screen::Menu);

    tracker.handle(&enter, 4300);
    step(&mut app, tracker.snapshot(4300, &Viewport::new(128, 36)), 4300);
    assert_eq!(app.screen, Screen::Playing);
}
