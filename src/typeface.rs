// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The caption font.  DejaVu Serif is compiled into the binary so the
//! logo renders the same everywhere, and glyphs are rasterized with
//! anti-aliasing by `imageproc` on top of `rusttype`.

use image::RgbaImage;
use imageproc::drawing::{draw_text_mut, text_size};
use rusttype::{Font, Scale};

use crate::color::Color;
use crate::errors::{LogoError, Result};

static SERIF: &[u8] = include_bytes!("../assets/DejaVuSerif.ttf");

/// A loaded font face.
#[derive(Clone)]
pub struct Typeface {
    font: Font<'static>,
}

impl Typeface {
    /// The built-in serif face.
    pub fn serif() -> Result<Typeface> {
        Typeface::from_bytes(SERIF)
    }

    /// Parses a TrueType or OpenType font.
    pub fn from_bytes(bytes: &'static [u8]) -> Result<Typeface> {
        let font = Font::try_from_bytes(bytes)
            .ok_or_else(|| LogoError::config("font data could not be parsed"))?;
        Ok(Typeface { font })
    }

    /// Width in pixels of `text` set at `px` pixels per em.
    pub fn text_width(&self, text: &str, px: f32) -> u32 {
        let (w, _) = text_size(Scale::uniform(px), &self.font, text);
        w.max(0) as u32
    }

    /// Distance from the baseline to the top of the tallest glyph.
    pub fn ascent(&self, px: f32) -> f32 {
        self.font.v_metrics(Scale::uniform(px)).ascent
    }

    /// Writes `text` centered on column `center_x` with its baseline on
    /// row `baseline`.  Glyphs that fall off the image are clipped.
    pub fn draw(
        &self,
        image: &mut RgbaImage,
        text: &str,
        center_x: f32,
        baseline: f32,
        px: f32,
        color: Color,
    ) {
        if text.is_empty() || !(px > 0.0) {
            return;
        }
        let scale = Scale::uniform(px);
        let width = self.text_width(text, px) as f32;
        let x = (center_x - width / 2.0).round() as i32;
        let y = (baseline - self.ascent(px)).round() as i32;
        draw_text_mut(image, color.opaque(), x, y, scale, &self.font, text);
    }
}
