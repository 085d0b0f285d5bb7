//! Rectangles, text extents and the world ↔ terminal projection.

use glam::Vec2;

use crate::config::{WINDOW_HEIGHT, WINDOW_WIDTH};

/// Axis-aligned rectangle in world pixels, `(x, y)` is the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl FRect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(center.x - size.x / 2.0, center.y - size.y / 2.0, size.x, size.y)
    }

    pub fn from_midbottom(midbottom: Vec2, size: Vec2) -> Self {
        Self::new(midbottom.x - size.x / 2.0, midbottom.y - size.y, size.x, size.y)
    }

    pub fn from_topleft(topleft: Vec2, size: Vec2) -> Self {
        Self::new(topleft.x, topleft.y, size.x, size.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.x = center.x - self.w / 2.0;
        self.y = center.y - self.h / 2.0;
    }

    pub fn midtop(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y)
    }

    pub fn midbottom(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.bottom())
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Overlap with positive area; touching edges do not count.
    pub fn collides(&self, other: &FRect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Half-open: left/top edges inside, right/bottom edges outside.
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Grow (or shrink) around the centre.
    pub fn inflate(&self, dw: f32, dh: f32) -> FRect {
        FRect::new(self.x - dw / 2.0, self.y - dh / 2.0, self.w + dw, self.h + dh)
    }
}

// ── Text ──────────────────────────────────────────────────────────────────────

/// Advance of one glyph relative to the font size (monospace).
const GLYPH_ADVANCE: f32 = 0.6;
const LINE_HEIGHT: f32 = 1.2;

/// World-space extent of `text` set at `font_size`, one line per `\n`.
pub fn text_extent(text: &str, font_size: f32) -> Vec2 {
    let lines = text.lines().count().max(1);
    let widest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    Vec2::new(
        widest as f32 * font_size * GLYPH_ADVANCE,
        lines as f32 * font_size * LINE_HEIGHT,
    )
}

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Maps the fixed world onto a terminal of `cols × rows` cells. Each cell holds
/// two vertically stacked pixels, so the pixel grid is `cols × rows*2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }

    pub fn pixel_width(&self) -> usize {
        self.cols as usize
    }

    pub fn pixel_height(&self) -> usize {
        self.rows as usize * 2
    }

    /// Pixels per world unit, horizontally and vertically.
    pub fn pixel_scale(&self) -> Vec2 {
        Vec2::new(
            self.pixel_width() as f32 / WINDOW_WIDTH,
            self.pixel_height() as f32 / WINDOW_HEIGHT,
        )
    }

    /// Cell containing a world point. Points off the world give cells off
    /// the grid (possibly negative).
    pub fn world_to_cell(&self, p: Vec2) -> (i32, i32) {
        (
            (p.x / WINDOW_WIDTH * self.cols as f32).floor() as i32,
            (p.y / WINDOW_HEIGHT * self.rows as f32).floor() as i32,
        )
    }

    /// World point at the centre of a cell.
    pub fn cell_to_world(&self, col: u16, row: u16) -> Vec2 {
        Vec2::new(
            (col as f32 + 0.5) * WINDOW_WIDTH / self.cols as f32,
            (row as f32 + 0.5) * WINDOW_HEIGHT / self.rows as f32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_rects_do_not_collide() {
        let a = FRect::new(0.0, 0.0, 10.0, 10.0);
        let b = FRect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.collides(&b));
        assert!(a.collides(&FRect::new(9.5, 9.5, 1.0, 1.0)));
    }

    #[test]
    fn anchors_agree() {
        let r = FRect::from_midbottom(Vec2::new(50.0, 100.0), Vec2::new(10.0, 40.0));
        assert_eq!(r.midbottom(), Vec2::new(50.0, 100.0));
        assert_eq!(r.midtop(), Vec2::new(50.0, 60.0));
        assert_eq!(r.center(), Vec2::new(50.0, 80.0));
    }

    #[test]
    fn text_extent_counts_widest_line() {
        let size = text_extent("ab\nabcd", 10.0);
        assert!((size.x - 24.0).abs() < 1e-3);
        assert!((size.y - 24.0).abs() < 1e-3);
    }

    #[test]
    fn viewport_round_trips_cell_centres() {
        let vp = Viewport::new(128, 36);
        for (col, row) in [(0, 0), (64, 18), (127, 35)] {
            let back = vp.world_to_cell(vp.cell_to_world(col, row));
            assert_eq!(back, (col as i32, row as i32));
        }
        assert_eq!(vp.world_to_cell(Vec2::new(-50.0, 740.0)), (-5, 37));
    }
}
