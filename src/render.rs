// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The two generation calls: a still logo and an animated one.  Both
//! come in two flavours: one that integrates the scene itself, and a
//! `_from` variant that takes trajectories already solved, so a batch
//! can integrate once and render many times.

use std::path::PathBuf;

use image::RgbaImage;

use crate::canvas::Canvas;
use crate::config::{AnimationConfig, RenderConfig, Scene, Style};
use crate::crop::{crop_square_rgba, square_offset, square_path};
use crate::errors::{ensure_parent, Result};
use crate::frames::Animator;
use crate::lorenz::Trajectory;
use crate::preview::{self, Preview};
use crate::typeface::Typeface;
use crate::video::{self, VideoFormat};

const TITLE: &str = "lorenz-logo";

/// Draws every trajectory's (x, z) projection in its palette color,
/// then the label.
pub fn render_attractor(trajectories: &[Trajectory], style: &Style) -> Result<RgbaImage> {
    let (w, h) = style.size;
    let mut canvas = Canvas::new(w, h, style.window, style.background)?;
    let colors = style.palette.assign(trajectories.len());
    for (trajectory, color) in trajectories.iter().zip(colors) {
        canvas.draw_path(trajectory.projection_xz(), color, style.line_width);
    }
    if let Some(label) = &style.label {
        canvas.draw_label(label, &Typeface::serif()?);
    }
    Ok(canvas.into_image())
}

/// Integrates the scene and renders a still.  Returns the files
/// written: the image, then its square crop if one was asked for.
pub fn generate_attractor(scene: &Scene, cfg: &RenderConfig) -> Result<Vec<PathBuf>> {
    cfg.style()?;
    let trajectories = scene.solve()?;
    generate_attractor_from(&trajectories, cfg)
}

/// Renders a still from trajectories that are already solved.
pub fn generate_attractor_from(
    trajectories: &[Trajectory],
    cfg: &RenderConfig,
) -> Result<Vec<PathBuf>> {
    let style = cfg.style()?;
    if cfg.crop_to_sq && cfg.filename.is_some() {
        square_offset(cfg.width, cfg.height)?;
    }
    let image = render_attractor(trajectories, &style)?;
    let mut written = vec![];

    match &cfg.filename {
        Some(path) => {
            ensure_parent(path)?;
            image.save(path)?;
            info!("wrote {}", path.display());
            written.push(path.clone());

            if cfg.crop_to_sq {
                let square = crop_square_rgba(&image)?;
                let out = square_path(path);
                square.save(&out)?;
                info!("wrote {}", out.display());
                written.push(out);
            }
        }
        None if cfg.crop_to_sq => warn!("crop_to_sq ignored: no filename to crop"),
        None => {}
    }

    if cfg.show {
        preview::show(TITLE, &image)?;
    }
    Ok(written)
}

/// Integrates the scene and renders an animation.  Returns the output
/// path, if there was one.
pub fn animate_logo(scene: &Scene, cfg: &AnimationConfig) -> Result<Option<PathBuf>> {
    cfg.render.style()?;
    if let Some(path) = &cfg.render.filename {
        VideoFormat::for_path(path)?;
    }
    let trajectories = scene.solve()?;
    animate_logo_from(&trajectories, cfg)
}

/// Renders an animation from trajectories that are already solved.
/// Frames are streamed to the encoder (and the preview window) as
/// they are drawn.
pub fn animate_logo_from(
    trajectories: &[Trajectory],
    cfg: &AnimationConfig,
) -> Result<Option<PathBuf>> {
    let render = &cfg.render;
    let animator = Animator::new(
        trajectories,
        render.style()?,
        cfg.frames,
        cfg.batch_size,
        cfg.freeze_frames,
    )?;

    let size = if render.crop_to_sq {
        square_offset(render.width, render.height)?;
        (render.height, render.height)
    } else {
        (render.width, render.height)
    };

    let mut sink = match &render.filename {
        Some(path) => Some(video::open_sink(path, cfg.fps, size)?),
        None => None,
    };
    let mut window = if render.show {
        Preview::open(TITLE, size, cfg.interval)?
    } else {
        None
    };
    if sink.is_none() && window.is_none() {
        warn!("animation has no filename and show is off; nothing to do");
        return Ok(None);
    }

    let total = animator.plan().total_frames();
    let report_every = (total / 10).max(1);
    let mut state = animator.initial_state()?;
    let mut cropped: Option<RgbaImage> = None;

    for frame in 0..total {
        let rendered = animator.render_frame(frame, &mut state);
        if render.crop_to_sq && (rendered.changed || cropped.is_none()) {
            cropped = Some(crop_square_rgba(rendered.image)?);
        }
        let image = match (&cropped, render.crop_to_sq) {
            (Some(square), true) => square,
            _ => rendered.image,
        };

        if let Some(sink) = sink.as_mut() {
            sink.push(image)?;
        }
        let closed = match window.as_mut() {
            Some(w) => !w.present(image)?,
            None => false,
        };
        if closed {
            window = None;
        }

        if frame % report_every == 0 {
            debug!("frame {}/{}", frame, total);
        }
    }

    if let Some(sink) = sink {
        sink.finish()?;
    }
    if let Some(path) = &render.filename {
        info!("wrote {} ({} frames)", path.display(), total);
    }
    Ok(render.filename.clone())
}
