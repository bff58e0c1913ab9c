// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle of pixels (the plot area of the canvas) and a
//! rectangle on the real plane (the x/z window the attractor is drawn
//! in).  Pixel rows grow downward while z grows upward, so the mapper
//! flips the vertical axis.

use crate::errors::{LogoError, Result};

/// The fraction of the canvas taken by the plot area, as
/// (left, right, bottom, top), measured from the lower left corner.
pub const SUBPLOT_BOX: (f64, f64, f64, f64) = (0.125, 0.9, 0.11, 0.88);

/// Describes a rectangle of pixels: the left and top offset of the
/// rectangle on the canvas, and its width and height.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlotArea {
    /// Column of the left edge.
    pub left: f64,
    /// Row of the top edge.
    pub top: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl PlotArea {
    /// The default subplot box of a `width` by `height` canvas.
    pub fn subplot(width: u32, height: u32) -> PlotArea {
        let (l, r, b, t) = SUBPLOT_BOX;
        let (w, h) = (f64::from(width), f64::from(height));
        PlotArea {
            left: l * w,
            top: (1.0 - t) * h,
            width: (r - l) * w,
            height: (t - b) * h,
        }
    }
}

/// The visible part of the real plane, as the left-lower and
/// right-upper corners.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Window {
    /// Left-lower corner (x, z).
    pub leftlower: (f64, f64),
    /// Right-upper corner (x, z).
    pub rightupper: (f64, f64),
}

impl Default for Window {
    /// x in [−40, 40], z in [0, 50].
    fn default() -> Self {
        Window {
            leftlower: (-40.0, 0.0),
            rightupper: (40.0, 50.0),
        }
    }
}

/// Maps points on the real plane onto sub-pixel positions in the
/// plot area, and back.
#[derive(Debug, Clone)]
pub struct PlaneMapper {
    /// The pixel rectangle.
    pub area: PlotArea,
    /// The real rectangle.
    pub window: Window,
    // Pixels per unit, horizontally and vertically.
    grid_factors: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Fails if the window's corners are the wrong way
    /// around or the pixel area is empty.
    pub fn new(area: PlotArea, window: Window) -> Result<PlaneMapper> {
        if window.rightupper.0 <= window.leftlower.0 {
            return Err(LogoError::config(
                "The left lower corner is not to the left of the right upper corner.",
            ));
        }
        if window.rightupper.1 <= window.leftlower.1 {
            return Err(LogoError::config(
                "The left lower corner is not lower than the right upper corner",
            ));
        }
        if !(area.width > 0.0) || !(area.height > 0.0) {
            return Err(LogoError::config("The plot area has no pixels"));
        }

        let grid_factors = (
            area.width / (window.rightupper.0 - window.leftlower.0),
            area.height / (window.rightupper.1 - window.leftlower.1),
        );

        Ok(PlaneMapper {
            area,
            window,
            grid_factors,
        })
    }

    /// Given a point on the real plane, return its position on the
    /// canvas, in (column, row) pixels.
    pub fn point_to_pixel(&self, point: (f64, f64)) -> (f32, f32) {
        let left = self.area.left + (point.0 - self.window.leftlower.0) * self.grid_factors.0;
        let top = self.area.top + (self.window.rightupper.1 - point.1) * self.grid_factors.1;
        (left as f32, top as f32)
    }

    /// Given a canvas position, return the matching point on the real
    /// plane.
    pub fn pixel_to_point(&self, pixel: (f32, f32)) -> (f64, f64) {
        (
            (f64::from(pixel.0) - self.area.left) / self.grid_factors.0 + self.window.leftlower.0,
            self.window.rightupper.1 - (f64::from(pixel.1) - self.area.top) / self.grid_factors.1,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_area(w: f64, h: f64) -> PlotArea {
        PlotArea {
            left: 0.0,
            top: 0.0,
            width: w,
            height: h,
        }
    }

    #[test]
    fn planemapper_fails_on_bad_shape() {
        let window = Window {
            leftlower: (1.0, 1.0),
            rightupper: (-1.0, -1.0),
        };
        assert!(PlaneMapper::new(unit_area(4.0, 4.0), window).is_err());
        assert!(PlaneMapper::new(unit_area(0.0, 4.0), Window::default()).is_err());
    }

    #[test]
    fn planemapper_passes_on_good_shape() {
        assert!(PlaneMapper::new(unit_area(4.0, 4.0), Window::default()).is_ok());
    }

    #[test]
    fn window_corners_land_on_area_corners() {
        let pm = PlaneMapper::new(unit_area(800.0, 500.0), Window::default()).unwrap();
        assert_eq!(pm.point_to_pixel((-40.0, 50.0)), (0.0, 0.0));
        assert_eq!(pm.point_to_pixel((40.0, 0.0)), (800.0, 500.0));
        assert_eq!(pm.point_to_pixel((0.0, 25.0)), (400.0, 250.0));
    }

    #[test]
    fn pixel_to_point_inverts_point_to_pixel() {
        let pm = PlaneMapper::new(PlotArea::subplot(1920, 1080), Window::default()).unwrap();
        let (x, z) = pm.pixel_to_point(pm.point_to_pixel((12.0, 30.0)));
        assert!((x - 12.0).abs() < 1e-3);
        assert!((z - 30.0).abs() < 1e-3);
    }

    #[test]
    fn subplot_box_is_inset_from_the_canvas() {
        let area = PlotArea::subplot(1000, 1000);
        assert_eq!(area.left, 125.0);
        assert!((area.top - 120.0).abs() < 1e-9);
        assert!((area.width - 775.0).abs() < 1e-9);
        assert!((area.height - 770.0).abs() < 1e-9);
    }
}
