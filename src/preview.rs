// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The `show` option.  With the `preview` feature this opens a window
//! and shows the picture (or plays the frames) until it is closed or
//! Escape is pressed.  Without it, `show` only logs a warning.

use image::RgbaImage;

use crate::errors::Result;

/// Widest preview window; larger canvases are scaled down to fit.
pub const MAX_PREVIEW_WIDTH: u32 = 1280;

/// Scales `size` down so the width fits the preview.
pub fn preview_size(size: (u32, u32)) -> (u32, u32) {
    let (w, h) = size;
    if w <= MAX_PREVIEW_WIDTH {
        return (w.max(1), h.max(1));
    }
    let h = (u64::from(h) * u64::from(MAX_PREVIEW_WIDTH) / u64::from(w)) as u32;
    (MAX_PREVIEW_WIDTH, h.max(1))
}

#[cfg(feature = "preview")]
mod window {
    use std::time::Duration;

    use image::RgbaImage;
    use minifb::{Key, Window, WindowOptions};

    use super::preview_size;
    use crate::errors::{LogoError, Result};

    /// An open preview window.
    pub struct Preview {
        window: Window,
        width: u32,
        height: u32,
        buffer: Vec<u32>,
    }

    fn failed<E: std::fmt::Display>(e: E) -> LogoError {
        LogoError::Preview {
            reason: e.to_string(),
        }
    }

    impl Preview {
        /// Opens a window sized for `size`, refreshing at most every
        /// `interval` milliseconds.
        pub fn open(title: &str, size: (u32, u32), interval: u64) -> Result<Option<Preview>> {
            let (width, height) = preview_size(size);
            let mut window = Window::new(
                title,
                width as usize,
                height as usize,
                WindowOptions::default(),
            )
            .map_err(failed)?;
            window.limit_update_rate(Some(Duration::from_millis(interval.max(1))));
            Ok(Some(Preview {
                window,
                width,
                height,
                buffer: vec![],
            }))
        }

        /// Shows `image`.  Returns false once the window is closed.
        pub fn present(&mut self, image: &RgbaImage) -> Result<bool> {
            if !self.window.is_open() || self.window.is_key_down(Key::Escape) {
                return Ok(false);
            }
            let small = image::imageops::thumbnail(image, self.width, self.height);
            self.buffer = small
                .pixels()
                .map(|p| (u32::from(p[0]) << 16) | (u32::from(p[1]) << 8) | u32::from(p[2]))
                .collect();
            self.window
                .update_with_buffer(&self.buffer, self.width as usize, self.height as usize)
                .map_err(failed)?;
            Ok(true)
        }

        /// Keeps showing `image` until the window is closed.
        pub fn hold(&mut self, image: &RgbaImage) -> Result<()> {
            while self.present(image)? {}
            Ok(())
        }
    }
}

#[cfg(not(feature = "preview"))]
mod window {
    use image::RgbaImage;

    use crate::errors::Result;

    /// No window can be opened without a window system, so there are
    /// no values of this type.
    pub enum Preview {}

    impl Preview {
        /// Logs that there is nothing to show with.
        pub fn open(title: &str, _size: (u32, u32), _interval: u64) -> Result<Option<Preview>> {
            warn!(
                "not showing '{}': built without the `preview` feature",
                title
            );
            Ok(None)
        }

        /// Unreachable.
        pub fn present(&mut self, _image: &RgbaImage) -> Result<bool> {
            match *self {}
        }

        /// Unreachable.
        pub fn hold(&mut self, _image: &RgbaImage) -> Result<()> {
            match *self {}
        }
    }
}

pub use self::window::Preview;

/// Shows one picture until the window is closed.
pub fn show(title: &str, image: &RgbaImage) -> Result<()> {
    match Preview::open(title, image.dimensions(), 16)? {
        Some(mut window) => window.hold(image),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn big_canvases_are_scaled_to_fit() {
        assert_eq!(preview_size((7680, 4320)), (1280, 720));
        assert_eq!(preview_size((640, 360)), (640, 360));
    }

    #[cfg(not(feature = "preview"))]
    #[test]
    fn no_window_without_the_feature() {
        assert!(Preview::open("test", (64, 36), 16).unwrap().is_none());
        assert!(show("test", &RgbaImage::new(4, 4)).is_ok());
    }
}
