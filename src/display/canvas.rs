//! Off-screen frame for one terminal redraw.
//!
//! Pixels are stored at twice the row resolution and flushed as upper-half
//! blocks (`▀`: foreground = top pixel, background = bottom pixel). Text is a
//! separate cell layer drawn over the pixels.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Colors, Print},
    QueueableCommand,
};
use glam::Vec2;

use crate::config::WINDOW_HEIGHT;
use crate::geometry::{text_extent, FRect, Viewport};
use crate::sprite::{Rgb, Sprite};

const HALF_BLOCK: char = '▀';

#[derive(Clone, Copy, Debug, PartialEq)]
struct Glyph {
    ch: char,
    color: Rgb,
}

pub struct Canvas {
    viewport: Viewport,
    pixels: Vec<Rgb>,
    glyphs: Vec<Option<Glyph>>,
}

impl Canvas {
    pub fn new(viewport: Viewport, background: Rgb) -> Self {
        Self {
            viewport,
            pixels: vec![background; viewport.pixel_width() * viewport.pixel_height()],
            glyphs: vec![None; viewport.cols as usize * viewport.rows as usize],
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.viewport.pixel_width() && y < self.viewport.pixel_height() {
            Some(self.pixels[y * self.viewport.pixel_width() + x])
        } else {
            None
        }
    }

    pub fn glyph(&self, col: u16, row: u16) -> Option<char> {
        if col < self.viewport.cols && row < self.viewport.rows {
            self.glyphs[row as usize * self.viewport.cols as usize + col as usize].map(|g| g.ch)
        } else {
            None
        }
    }

    /// Pixel span covered by `rect`, clipped to the canvas. Empty when off-screen.
    fn pixel_span(&self, rect: &FRect) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
        let scale = self.viewport.pixel_scale();
        let clip = |lo: f32, hi: f32, max: usize| {
            let a = lo.floor().max(0.0) as usize;
            let b = (hi.ceil().max(0.0) as usize).min(max);
            a..b.max(a)
        };
        (
            clip(rect.x * scale.x, rect.right() * scale.x, self.viewport.pixel_width()),
            clip(rect.y * scale.y, rect.bottom() * scale.y, self.viewport.pixel_height()),
        )
    }

    /// Draw `sprite` stretched over `rect`. Each canvas pixel samples the
    /// sprite at its own centre, clamped into the rect, so even a sprite
    /// narrower than one terminal pixel stays visible.
    pub fn blit(&mut self, sprite: &Sprite, rect: FRect) {
        if rect.w <= 0.0 || rect.h <= 0.0 || sprite.width() == 0 || sprite.height() == 0 {
            return;
        }
        let scale = self.viewport.pixel_scale();
        let (xs, ys) = self.pixel_span(&rect);
        let width = self.viewport.pixel_width();
        let max_x = (rect.right() - f32::EPSILON).max(rect.x);
        let max_y = (rect.bottom() - f32::EPSILON).max(rect.y);
        for y in ys {
            let wy = ((y as f32 + 0.5) / scale.y).clamp(rect.y, max_y);
            let sy = (((wy - rect.y) / rect.h) * sprite.height() as f32) as usize;
            for x in xs.clone() {
                let wx = ((x as f32 + 0.5) / scale.x).clamp(rect.x, max_x);
                let sx = (((wx - rect.x) / rect.w) * sprite.width() as f32) as usize;
                let sample = sprite.get(
                    sx.min(sprite.width() - 1),
                    sy.min(sprite.height() - 1),
                );
                if let Some(color) = sample {
                    self.pixels[y * width + x] = color;
                }
            }
        }
    }

    fn put(&mut self, col: i32, row: i32, ch: char, color: Rgb) {
        if col >= 0 && row >= 0 && col < self.viewport.cols as i32 && row < self.viewport.rows as i32
        {
            let index = row as usize * self.viewport.cols as usize + col as usize;
            self.glyphs[index] = Some(Glyph { ch, color });
        }
    }

    /// Rows between consecutive lines of text set at `font_size`, at least one.
    fn line_step(&self, font_size: f32) -> i32 {
        let cell_height = WINDOW_HEIGHT / self.viewport.rows as f32;
        ((text_extent("", font_size).y / cell_height).round() as i32).max(1)
    }

    /// Text with its first character in the cell under `topleft`; lines are
    /// spaced by the font's line height.
    pub fn text(&mut self, text: &str, topleft: Vec2, font_size: f32, color: Rgb) {
        let (col, row) = self.viewport.world_to_cell(topleft);
        let step = self.line_step(font_size);
        for (i, line) in text.lines().enumerate() {
            for (j, ch) in line.chars().enumerate() {
                self.put(col + j as i32, row + i as i32 * step, ch, color);
            }
        }
    }

    /// Text centred (per line) on a world point.
    pub fn text_centered(&mut self, text: &str, center: Vec2, font_size: f32, color: Rgb) {
        let (col, row) = self.viewport.world_to_cell(center);
        let step = self.line_step(font_size);
        let lines: Vec<&str> = text.lines().collect();
        let top = row - (lines.len() as i32 - 1) * step / 2;
        for (i, line) in lines.iter().enumerate() {
            let left = col - line.chars().count() as i32 / 2;
            for (j, ch) in line.chars().enumerate() {
                self.put(left + j as i32, top + i as i32 * step, ch, color);
            }
        }
    }

    /// Rounded box outline on the cells around `rect`.
    pub fn frame(&mut self, rect: FRect, color: Rgb) {
        let (left, top) = self.viewport.world_to_cell(Vec2::new(rect.x, rect.y));
        let (right, bottom) = self
            .viewport
            .world_to_cell(Vec2::new(rect.right(), rect.bottom()));
        let right = right.max(left + 1);
        let bottom = bottom.max(top + 1);

        for col in left + 1..right {
            self.put(col, top, '─', color);
            self.put(col, bottom, '─', color);
        }
        for row in top + 1..bottom {
            self.put(left, row, '│', color);
            self.put(right, row, '│', color);
        }
        self.put(left, top, '╭', color);
        self.put(right, top, '╮', color);
        self.put(left, bottom, '╰', color);
        self.put(right, bottom, '╯', color);
    }

    /// Write the whole frame, one terminal row at a time, switching colours
    /// only when they change.
    pub fn flush<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let width = self.viewport.pixel_width();
        let mut current: Option<(Rgb, Rgb)> = None;
        let mut run = String::new();

        for row in 0..self.viewport.rows {
            out.queue(cursor::MoveTo(0, row))?;
            for col in 0..self.viewport.cols {
                let top = self.pixels[(row as usize * 2) * width + col as usize];
                let bottom = self.pixels[(row as usize * 2 + 1) * width + col as usize];
                let glyph = self.glyphs[row as usize * self.viewport.cols as usize + col as usize];
                let (ch, colors) = match glyph {
                    Some(g) => (g.ch, (g.color, top)),
                    None => (HALF_BLOCK, (top, bottom)),
                };
                if current != Some(colors) {
                    if !run.is_empty() {
                        out.queue(Print(&run))?;
                        run.clear();
                    }
                    out.queue(style::SetColors(Colors::new(
                        to_color(colors.0),
                        to_color(colors.1),
                    )))?;
                    current = Some(colors);
                }
                run.push(ch);
            }
            if !run.is_empty() {
                out.queue(Print(&run))?;
                run.clear();
            }
        }

        out.queue(style::ResetColor)?;
        out.flush()
    }
}

fn to_color(c: Rgb) -> Color {
    Color::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}
