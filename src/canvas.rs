// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A raster with a world window attached.  Trajectories are drawn as
//! anti-aliased polylines in (x, z) space; the label sits on the z = 0
//! line, centered on x = 0.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_antialiased_line_segment_mut;
use imageproc::pixelops::interpolate;
use itertools::Itertools;

use crate::color::Color;
use crate::errors::{LogoError, Result};
use crate::planes::{PlaneMapper, PlotArea, Window};
use crate::typeface::Typeface;

/// Dots per inch used to turn a font size in points into pixels.
pub const DPI: f64 = 100.0;

/// Text drawn under the attractor.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    /// What to write.
    pub text: String,
    /// Ink color.
    pub color: Color,
    /// Font size in points.
    pub size_pt: f64,
}

impl Label {
    /// The font size in pixels per em.
    pub fn pixels(&self) -> f32 {
        num::clamp(self.size_pt * DPI / 72.0, 0.0, 10_000.0) as f32
    }
}

/// A canvas and the mapping from the attractor's window onto it.
#[derive(Clone)]
pub struct Canvas {
    image: RgbaImage,
    mapper: PlaneMapper,
    background: Rgba<u8>,
}

impl Canvas {
    /// A `width` by `height` canvas filled with `background`, with the
    /// window mapped onto the default subplot box.
    pub fn new(width: u32, height: u32, window: Window, background: Rgba<u8>) -> Result<Canvas> {
        if width == 0 || height == 0 {
            return Err(LogoError::config(format!(
                "canvas size {}x{} has no pixels",
                width, height
            )));
        }
        let mapper = PlaneMapper::new(PlotArea::subplot(width, height), window)?;
        Ok(Canvas {
            image: RgbaImage::from_pixel(width, height, background),
            mapper,
            background,
        })
    }

    /// Paints over everything with the background.
    pub fn clear(&mut self) {
        let background = self.background;
        for p in self.image.pixels_mut() {
            *p = background;
        }
    }

    /// The world-to-pixel mapping.
    pub fn mapper(&self) -> &PlaneMapper {
        &self.mapper
    }

    /// Connects consecutive points with line segments.  A path with
    /// fewer than two points draws nothing.
    pub fn draw_path<I>(&mut self, points: I, color: Color, line_width: u32)
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let pixel = color.opaque();
        let mapper = &self.mapper;
        let image = &mut self.image;
        let rounded = points.into_iter().map(|p| {
            let (x, y) = mapper.point_to_pixel(p);
            (x.round() as i32, y.round() as i32)
        });
        for (start, end) in rounded.dedup().tuple_windows() {
            draw_thick_segment(image, start, end, pixel, line_width);
        }
    }

    /// Draws the label centered on x = 0 with its baseline on z = 0.
    pub fn draw_label(&mut self, label: &Label, face: &Typeface) {
        self.draw_text(&label.text, label.color, label.pixels(), face);
    }

    /// Draws a prefix or any other text in the label's place.
    pub fn draw_text(&mut self, text: &str, color: Color, px: f32, face: &Typeface) {
        let (cx, baseline) = self.mapper.point_to_pixel((0.0, 0.0));
        face.draw(&mut self.image, text, cx, baseline, px, color);
    }

    /// The pixels.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// The pixels, by value.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

// Thick lines are several one-pixel lines laid side by side along the
// segment's normal.
fn draw_thick_segment(
    image: &mut RgbaImage,
    start: (i32, i32),
    end: (i32, i32),
    color: Rgba<u8>,
    width: u32,
) {
    let width = width.max(1) as i32;
    if width == 1 {
        draw_antialiased_line_segment_mut(image, start, end, color, interpolate);
        return;
    }
    let (dx, dy) = ((end.0 - start.0) as f32, (end.1 - start.1) as f32);
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1e-3 {
        return;
    }
    let (nx, ny) = (-dy / len, dx / len);
    let half = width / 2;
    for k in -half..=(width - 1 - half) {
        let off = k as f32;
        let (ox, oy) = ((nx * off).round() as i32, (ny * off).round() as i32);
        draw_antialiased_line_segment_mut(
            image,
            (start.0 + ox, start.1 + oy),
            (end.0 + ox, end.1 + oy),
            color,
            interpolate,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test]
    fn empty_canvas_is_rejected() {
        assert!(Canvas::new(0, 10, Window::default(), BLACK).is_err());
    }

    #[test]
    fn horizontal_path_is_drawn_in_its_color() {
        let mut canvas = Canvas::new(400, 200, Window::default(), BLACK).unwrap();
        let red = Color::rgb(255, 0, 0);
        canvas.draw_path(vec![(-30.0, 25.0), (30.0, 25.0)], red, 1);
        let (x, y) = canvas.mapper().point_to_pixel((0.0, 25.0));
        assert_eq!(
            canvas.image().get_pixel(x.round() as u32, y.round() as u32),
            &red.opaque()
        );
    }

    #[test]
    fn single_point_draws_nothing() {
        let mut canvas = Canvas::new(100, 100, Window::default(), BLACK).unwrap();
        canvas.draw_path(vec![(0.0, 25.0)], Color::rgb(255, 255, 255), 3);
        assert!(canvas.image().pixels().all(|p| *p == BLACK));
    }

    #[test]
    fn clear_restores_the_background() {
        let mut canvas = Canvas::new(100, 100, Window::default(), BLACK).unwrap();
        canvas.draw_path(vec![(-10.0, 10.0), (10.0, 40.0)], Color::rgb(9, 9, 9), 2);
        canvas.clear();
        assert!(canvas.image().pixels().all(|p| *p == BLACK));
    }

    #[test]
    fn thirty_point_label_is_about_forty_pixels() {
        let label = Label {
            text: "THE SCIENCE CLUB".to_string(),
            color: Color::rgb(218, 165, 32),
            size_pt: 30.0,
        };
        assert!((label.pixels() - 41.666).abs() < 0.01);
    }

    #[test]
    fn label_sits_above_the_zero_line() {
        let mut canvas = Canvas::new(400, 300, Window::default(), BLACK).unwrap();
        let face = Typeface::serif().unwrap();
        canvas.draw_text("I", Color::rgb(255, 255, 255), 40.0, &face);
        let (cx, baseline) = canvas.mapper().point_to_pixel((0.0, 0.0));
        let (cx, baseline) = (cx.round() as u32, baseline.round() as u32);
        let lit = |y: u32| (cx - 8..=cx + 8).any(|x| canvas.image().get_pixel(x, y)[0] > 200);
        assert!(lit(baseline - 10));
        assert!((baseline + 2..300).all(|y| *canvas.image().get_pixel(cx, y) == BLACK));
    }
}
