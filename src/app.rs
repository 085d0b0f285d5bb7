//! Screen state machine: Menu → Playing → GameOver → Menu.
//!
//! A single `App::update` per frame is the only scheduling authority; the
//! menu and game-over screens are states here, not nested loops.

use glam::Vec2;
use rand::Rng;

use crate::assets::Assets;
use crate::compute::{init_state, starfield, tick};
use crate::config::{GAME_OVER_DELAY_MS, MENU_FONT_SIZE, WINDOW_HEIGHT};
use crate::entities::{GameEvent, GameState, GameStatus, Star};
use crate::geometry::{text_extent, FRect};
use crate::input::FrameInput;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    /// Showing the final result since `since` (ms).
    GameOver { since: u64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuItem {
    Start,
    Quit,
}

impl MenuItem {
    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Start => "Start",
            MenuItem::Quit => "Quit",
        }
    }
}

pub const MENU_TITLE: &str = "METEOR SHOOTER";

/// World-space rectangles of the menu controls.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuLayout {
    pub title: FRect,
    pub start: FRect,
    pub quit: FRect,
}

impl Default for MenuLayout {
    fn default() -> Self {
        let control = |item: MenuItem, top: f32| {
            FRect::from_topleft(
                Vec2::new(100.0, top),
                text_extent(item.label(), MENU_FONT_SIZE),
            )
        };
        Self {
            title: FRect::from_topleft(
                Vec2::new(50.0, 100.0),
                text_extent(MENU_TITLE, MENU_FONT_SIZE),
            ),
            start: control(MenuItem::Start, WINDOW_HEIGHT / 3.0),
            quit: control(MenuItem::Quit, WINDOW_HEIGHT / 2.3),
        }
    }
}

impl MenuLayout {
    pub fn rect(&self, item: MenuItem) -> FRect {
        match item {
            MenuItem::Start => self.start,
            MenuItem::Quit => self.quit,
        }
    }

    pub fn hovered(&self, pointer: Option<Vec2>) -> Option<MenuItem> {
        let p = pointer?;
        [MenuItem::Start, MenuItem::Quit]
            .into_iter()
            .find(|item| self.rect(*item).contains_point(p))
    }
}

pub struct App {
    assets: Assets,
    pub screen: Screen,
    pub menu: MenuLayout,
    pub hovered: Option<MenuItem>,
    /// Current session, kept through GameOver so its score can be shown.
    pub game: Option<GameState>,
    /// Menu background.
    pub backdrop: Vec<Star>,
}

impl App {
    pub fn new(assets: Assets, rng: &mut impl Rng) -> Self {
        let backdrop = starfield(&assets.star, rng);
        Self {
            assets,
            screen: Screen::Menu,
            menu: MenuLayout::default(),
            hovered: None,
            game: None,
            backdrop,
        }
    }

    /// One frame of whichever screen is active. Game events produced while
    /// playing are appended to `events`.
    pub fn update(
        &mut self,
        input: &FrameInput,
        now: u64,
        dt: f32,
        rng: &mut impl Rng,
        events: &mut Vec<GameEvent>,
    ) -> Flow {
        if input.quit {
            log::info!("quit requested");
            return Flow::Quit;
        }

        match self.screen {
            Screen::Menu => {
                self.hovered = self.menu.hovered(input.pointer);
                let clicked = if input.pointer_down { self.hovered } else { None };
                match clicked {
                    Some(MenuItem::Quit) => {
                        log::info!("quit from menu");
                        return Flow::Quit;
                    }
                    Some(MenuItem::Start) => self.start(now, rng),
                    None if input.start => self.start(now, rng),
                    None => {}
                }
            }
            Screen::Playing => {
                if let Some(game) = self.game.as_mut() {
                    events.extend(tick(game, input, now, dt, rng));
                    if game.status == GameStatus::GameOver {
                        self.screen = Screen::GameOver { since: now };
                    }
                }
            }
            Screen::GameOver { since } => {
                if now.saturating_sub(since) >= GAME_OVER_DELAY_MS {
                    self.screen = Screen::Menu;
                    self.hovered = None;
                }
            }
        }
        Flow::Continue
    }

    fn start(&mut self, now: u64, rng: &mut impl Rng) {
        self.game = Some(init_state(&self.assets, now, rng));
        self.screen = Screen::Playing;
        self.hovered = None;
    }
}
