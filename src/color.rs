// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Colors, themes and palettes.
//!
//! Colors are written the way a plotting library takes them: a CSS
//! name (`"gold"`, `"saddlebrown"`) or a hex string (`"#47C7FC"`).

use std::fmt;
use std::str::FromStr;

use image::Rgba;

use crate::errors::{LogoError, Result};

/// An opaque RGB color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Color {
    /// Constructor.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    /// As an image pixel with the given alpha.
    pub fn rgba(self, alpha: u8) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, alpha])
    }

    /// As a fully opaque image pixel.
    pub fn opaque(self) -> Rgba<u8> {
        self.rgba(255)
    }

    /// `RRGGBB`, upper case, without the leading `#`.
    pub fn hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.hex())
    }
}

// The CSS colors most likely to show up in a logo.
const NAMED: &[(&str, Color)] = &[
    ("black", Color::rgb(0, 0, 0)),
    ("white", Color::rgb(255, 255, 255)),
    ("red", Color::rgb(255, 0, 0)),
    ("green", Color::rgb(0, 128, 0)),
    ("lime", Color::rgb(0, 255, 0)),
    ("blue", Color::rgb(0, 0, 255)),
    ("navy", Color::rgb(0, 0, 128)),
    ("yellow", Color::rgb(255, 255, 0)),
    ("cyan", Color::rgb(0, 255, 255)),
    ("magenta", Color::rgb(255, 0, 255)),
    ("orange", Color::rgb(255, 165, 0)),
    ("purple", Color::rgb(128, 0, 128)),
    ("gray", Color::rgb(128, 128, 128)),
    ("grey", Color::rgb(128, 128, 128)),
    ("silver", Color::rgb(192, 192, 192)),
    ("gold", Color::rgb(255, 215, 0)),
    ("goldenrod", Color::rgb(218, 165, 32)),
    ("darkgoldenrod", Color::rgb(184, 134, 11)),
    ("saddlebrown", Color::rgb(139, 69, 19)),
    ("brown", Color::rgb(165, 42, 42)),
    ("sienna", Color::rgb(160, 82, 45)),
    ("chocolate", Color::rgb(210, 105, 30)),
    ("crimson", Color::rgb(220, 20, 60)),
    ("darkred", Color::rgb(139, 0, 0)),
    ("teal", Color::rgb(0, 128, 128)),
    ("skyblue", Color::rgb(135, 206, 235)),
    ("deepskyblue", Color::rgb(0, 191, 255)),
    ("dodgerblue", Color::rgb(30, 144, 255)),
    ("royalblue", Color::rgb(65, 105, 225)),
    ("midnightblue", Color::rgb(25, 25, 112)),
    ("indigo", Color::rgb(75, 0, 130)),
    ("violet", Color::rgb(238, 130, 238)),
    ("pink", Color::rgb(255, 192, 203)),
    ("salmon", Color::rgb(250, 128, 114)),
    ("coral", Color::rgb(255, 127, 80)),
    ("tomato", Color::rgb(255, 99, 71)),
    ("khaki", Color::rgb(240, 230, 140)),
    ("olive", Color::rgb(128, 128, 0)),
    ("maroon", Color::rgb(128, 0, 0)),
];

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn parse_hex(s: &str) -> Option<Color> {
    let digits: Option<Vec<u8>> = s.bytes().map(hex_digit).collect();
    match digits?.as_slice() {
        [r, g, b] => Some(Color::rgb(r * 17, g * 17, b * 17)),
        [r1, r2, g1, g2, b1, b2] => Some(Color::rgb(r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2)),
        _ => None,
    }
}

impl FromStr for Color {
    type Err = LogoError;

    fn from_str(s: &str) -> Result<Color> {
        let s = s.trim();
        let found = if s.starts_with('#') {
            parse_hex(&s[1..])
        } else {
            let lower = s.to_ascii_lowercase();
            NAMED
                .iter()
                .find(|(name, _)| *name == lower)
                .map(|(_, c)| *c)
        };
        found.ok_or_else(|| LogoError::config(format!("unknown color '{}'", s)))
    }
}

/// Parses a comma-separated list of colors.
pub fn parse_colors(s: &str) -> Result<Vec<Color>> {
    s.split(',').map(Color::from_str).collect()
}

/// Dark draws on black, light draws on white.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Theme {
    /// Black background.
    Dark,
    /// White background.
    Light,
}

impl Theme {
    /// `Dark` if `bg_black` is set.
    pub fn from_bg_black(bg_black: bool) -> Theme {
        if bg_black {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// The canvas fill for this theme.
    pub fn background(self) -> Color {
        match self {
            Theme::Dark => Color::rgb(0, 0, 0),
            Theme::Light => Color::rgb(255, 255, 255),
        }
    }
}

/// A non-empty list of colors handed out cyclically: trajectory `i`
/// is drawn in `colors[i % len]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette(Vec<Color>);

impl Palette {
    /// Fails on an empty list.
    pub fn new(colors: Vec<Color>) -> Result<Palette> {
        if colors.is_empty() {
            return Err(LogoError::config("at least one trajectory color is required"));
        }
        Ok(Palette(colors))
    }

    /// The color for trajectory `i`.
    pub fn color_for(&self, i: usize) -> Color {
        self.0[i % self.0.len()]
    }

    /// The colors for `n` trajectories.
    pub fn assign(&self, n: usize) -> Vec<Color> {
        self.0.iter().cycle().take(n).cloned().collect()
    }
}
