//! Pixel-art sprites, rotation and per-pixel collision masks.
//!
//! Sprites are small colour grids read from text files. One character is one
//! pixel; `.` (or a space) is transparent and letters pick a palette colour:
//!
//! ```text
//! # comment lines start with '#'
//! ..WW..
//! .WBBW.
//! WWWWWW
//! ```
//!
//! Every sprite pixel covers `PIXEL_SIZE × PIXEL_SIZE` world pixels.

use glam::Vec2;

use crate::config::PIXEL_SIZE;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const CREAM: Rgb = Rgb(240, 240, 220);
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const YELLOW: Rgb = Rgb(255, 255, 0);
    pub const GREEN: Rgb = Rgb(34, 214, 64);
    pub const QUIT_RED: Rgb = Rgb(240, 0, 0);
    pub const SKY: Rgb = Rgb(94, 122, 173);
    pub const MENU_NIGHT: Rgb = Rgb(18, 22, 46);
}

/// Palette used by the sprite text format.
fn palette(c: char) -> Option<Option<Rgb>> {
    let colour = match c {
        '.' | ' ' => return Some(None),
        'W' => Rgb(240, 240, 220),
        'L' => Rgb(200, 200, 210),
        'G' => Rgb(150, 150, 160),
        'D' => Rgb(90, 90, 100),
        'K' => Rgb(40, 40, 50),
        'R' => Rgb(220, 50, 50),
        'O' => Rgb(255, 140, 30),
        'Y' => Rgb(255, 220, 70),
        'B' => Rgb(70, 120, 230),
        'C' => Rgb(90, 220, 255),
        'M' => Rgb(200, 90, 210),
        'N' => Rgb(140, 90, 60),
        'T' => Rgb(110, 70, 45),
        _ => return None,
    };
    Some(Some(colour))
}

/// Why a sprite file was rejected. `line` is 1-based.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    width: usize,
    height: usize,
    pixels: Vec<Option<Rgb>>,
}

impl Sprite {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut width = None;
        let mut pixels = Vec::new();
        let mut height = 0;
        let mut last_line = 0;

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            last_line = line;
            let row = raw.trim_end();
            if row.is_empty() || row.starts_with('#') {
                continue;
            }
            let mut count = 0;
            for c in row.chars() {
                let px = palette(c).ok_or_else(|| ParseError {
                    line,
                    reason: format!("unknown colour '{}'", c),
                })?;
                pixels.push(px);
                count += 1;
            }
            match width {
                None => width = Some(count),
                Some(w) if w != count => {
                    return Err(ParseError {
                        line,
                        reason: format!("row has {} pixels, expected {}", count, w),
                    })
                }
                Some(_) => {}
            }
            height += 1;
        }

        match width {
            Some(width) => Ok(Self {
                width,
                height,
                pixels,
            }),
            None => Err(ParseError {
                line: last_line,
                reason: "no pixel rows".to_string(),
            }),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            None
        }
    }

    /// Size in world pixels.
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * PIXEL_SIZE,
            self.height as f32 * PIXEL_SIZE,
        )
    }

    /// Copy rotated counter-clockwise by `degrees` around its centre. The
    /// result grows to hold the whole rotated image; uncovered pixels are
    /// transparent.
    pub fn rotated(&self, degrees: f32) -> Sprite {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let (w, h) = (self.width as f32, self.height as f32);
        // The epsilon keeps 0°/90°/180° from growing a spurious row.
        let new_w = (w * cos.abs() + h * sin.abs() - 1e-3).ceil().max(1.0) as usize;
        let new_h = (w * sin.abs() + h * cos.abs() - 1e-3).ceil().max(1.0) as usize;
        let (cx, cy) = (w / 2.0, h / 2.0);
        let (ncx, ncy) = (new_w as f32 / 2.0, new_h as f32 / 2.0);

        let mut pixels = Vec::with_capacity(new_w * new_h);
        for y in 0..new_h {
            for x in 0..new_w {
                let dx = x as f32 + 0.5 - ncx;
                let dy = y as f32 + 0.5 - ncy;
                let sx = dx * cos - dy * sin + cx;
                let sy = dx * sin + dy * cos + cy;
                let px = if sx >= 0.0 && sy >= 0.0 && sx < w && sy < h {
                    self.get(sx as usize, sy as usize)
                } else {
                    None
                };
                pixels.push(px);
            }
        }

        Sprite {
            width: new_w,
            height: new_h,
            pixels,
        }
    }

    pub fn mask(&self) -> Mask {
        Mask {
            width: self.width,
            height: self.height,
            bits: self.pixels.iter().map(Option::is_some).collect(),
        }
    }
}

/// Opaque/transparent bitmap of a sprite, in sprite pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl Mask {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: i32, y: i32) -> bool {
        x >= 0
            && y >= 0
            && (x as usize) < self.width
            && (y as usize) < self.height
            && self.bits[y as usize * self.width + x as usize]
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// First pixel (in `self` coordinates) set in both masks when `other`'s
    /// top-left sits at `offset` relative to ours.
    pub fn overlap(&self, other: &Mask, offset: (i32, i32)) -> Option<(i32, i32)> {
        let (ox, oy) = offset;
        let x0 = ox.max(0);
        let y0 = oy.max(0);
        let x1 = (ox + other.width as i32).min(self.width as i32);
        let y1 = (oy + other.height as i32).min(self.height as i32);

        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - ox, y - oy) {
                    return Some((x, y));
                }
            }
        }
        None
    }
}
