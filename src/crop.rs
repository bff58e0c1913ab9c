// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Center-cropping a landscape image down to a square.

use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView, RgbaImage};

use crate::errors::{ensure_parent, LogoError, Result};

/// The horizontal offset of the square: floor(W/2) − floor(H/2).
/// Fails if the image is taller than it is wide.
pub fn square_offset(width: u32, height: u32) -> Result<u32> {
    if height > width {
        return Err(LogoError::Geometry { width, height });
    }
    Ok(width / 2 - height / 2)
}

/// Keeps the H x H block of columns centered on the middle of the
/// image.
pub fn crop_square(img: &DynamicImage) -> Result<DynamicImage> {
    let (width, height) = img.dimensions();
    let left = square_offset(width, height)?;
    Ok(img.crop_imm(left, 0, height, height))
}

/// `crop_square` for a bare RGBA buffer, used on animation frames.
pub fn crop_square_rgba(img: &RgbaImage) -> Result<RgbaImage> {
    let (width, height) = img.dimensions();
    let left = square_offset(width, height)?;
    Ok(image::imageops::crop_imm(img, left, 0, height, height).to_image())
}

/// `dir/name.ext` becomes `dir/name_square.ext`.
pub fn square_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}_square.{}", stem, ext.to_string_lossy()),
        None => format!("{}_square", stem),
    };
    path.with_file_name(name)
}

/// Reads `path`, crops it to a square, and writes the result next to
/// it.  Returns where the square went.  Nothing is written on failure.
pub fn crop_to_square(path: &Path) -> Result<PathBuf> {
    let img = image::open(path)?;
    let square = crop_square(&img)?;
    let out = square_path(path);
    ensure_parent(&out)?;
    square.save(&out)?;
    info!("wrote {}", out.display());
    Ok(out)
}
