// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The option bags handed to each generation call, and the scene
//! (initial conditions plus solver settings) they are rendered from.

use std::path::{Path, PathBuf};

use image::Rgba;

use crate::canvas::Label;
use crate::color::{Color, Palette, Theme};
use crate::errors::{LogoError, Result};
use crate::lorenz::{self, InitialCondition, Point3, SolverConfig, Trajectory};
use crate::planes::Window;

/// Dark theme trajectory colors: gold and saddlebrown.
pub const DARK_COLORS: [Color; 2] = [Color::rgb(255, 215, 0), Color::rgb(139, 69, 19)];
/// Dark theme text: goldenrod.
pub const DARK_TEXT: Color = Color::rgb(218, 165, 32);
/// Light theme trajectory colors.
pub const LIGHT_COLORS: [Color; 2] = [Color::rgb(0x00, 0x0B, 0x8D), Color::rgb(0x47, 0xC7, 0xFC)];
/// Light theme text.
pub const LIGHT_TEXT: Color = Color::rgb(0x34, 0x94, 0xDE);
/// What the logo says.
pub const CLUB_NAME: &str = "THE SCIENCE CLUB";

/// The two starting points the club logo is drawn from.
pub fn default_inics() -> Vec<InitialCondition> {
    vec![
        Point3::new(6.05681151749362, 5.4634096640009275, 9.255399642632),
        Point3::new(5.172675812338344, 4.359837599867456, 8.641490104471675),
    ]
}

/// What to integrate: the initial conditions, the solver settings,
/// and how many threads may share the work.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// One trajectory per initial condition.
    pub inics: Vec<InitialCondition>,
    /// Integrator settings shared by every trajectory.
    pub solver: SolverConfig,
    /// Worker threads for integration.
    pub threads: usize,
}

impl Default for Scene {
    fn default() -> Self {
        Scene {
            inics: default_inics(),
            solver: SolverConfig::default(),
            threads: 1,
        }
    }
}

impl Scene {
    /// Integrates every initial condition.
    pub fn solve(&self) -> Result<Vec<Trajectory>> {
        if self.inics.is_empty() {
            return Err(LogoError::config("at least one initial condition is required"));
        }
        let trajectories = lorenz::solve_all(&self.inics, &self.solver, self.threads)?;
        info!(
            "integrated {} trajectories of {} points",
            trajectories.len(),
            self.solver.grid_len()
        );
        Ok(trajectories)
    }
}

/// Options for one rendered logo.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Where to write the result; nothing is written when unset.
    pub filename: Option<PathBuf>,
    /// Also write a center-cropped square copy (stills) or crop every
    /// frame (animations).
    pub crop_to_sq: bool,
    /// Open a preview window when done.
    pub show: bool,
    /// Trajectory colors, handed out cyclically.
    pub colors: Vec<Color>,
    /// Draw the label.
    pub show_text: bool,
    /// The label.
    pub text: String,
    /// Label color.
    pub text_color: Color,
    /// Label size in points.
    pub font_size: f64,
    /// Dark theme when set, light otherwise.
    pub bg_black: bool,
    /// Make the background fully transparent.
    pub transparent: bool,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Stroke width in pixels.
    pub line_width: u32,
    /// The part of the x/z plane on the canvas.
    pub window: Window,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            filename: None,
            crop_to_sq: false,
            show: false,
            colors: DARK_COLORS.to_vec(),
            show_text: true,
            text: CLUB_NAME.to_string(),
            text_color: DARK_TEXT,
            font_size: 30.0,
            bg_black: true,
            transparent: false,
            width: 7680,
            height: 4320,
            line_width: 1,
            window: Window::default(),
        }
    }
}

impl RenderConfig {
    /// Blue strokes on white.
    pub fn light() -> RenderConfig {
        RenderConfig {
            bg_black: false,
            ..RenderConfig::light_on_black()
        }
    }

    /// Blue strokes on black.
    pub fn light_on_black() -> RenderConfig {
        RenderConfig {
            colors: LIGHT_COLORS.to_vec(),
            text_color: LIGHT_TEXT,
            ..RenderConfig::default()
        }
    }

    /// Writes to `path`.
    pub fn with_filename<P: AsRef<Path>>(mut self, path: P) -> RenderConfig {
        self.filename = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the canvas size.
    pub fn sized(mut self, width: u32, height: u32) -> RenderConfig {
        self.width = width;
        self.height = height;
        self
    }

    /// Turns on the square crop.
    pub fn cropped(mut self) -> RenderConfig {
        self.crop_to_sq = true;
        self
    }

    /// Turns on the transparent background.
    pub fn transparent(mut self) -> RenderConfig {
        self.transparent = true;
        self
    }

    /// Turns off the label.
    pub fn without_text(mut self) -> RenderConfig {
        self.show_text = false;
        self
    }

    /// Resolves the options into what the canvas needs.
    pub fn style(&self) -> Result<Style> {
        let palette = Palette::new(self.colors.clone())?;
        if self.width == 0 || self.height == 0 {
            return Err(LogoError::config(format!(
                "canvas size {}x{} has no pixels",
                self.width, self.height
            )));
        }
        if self.show_text && !(self.font_size > 0.0) {
            return Err(LogoError::config("font size must be positive"));
        }
        let alpha = if self.transparent { 0 } else { 255 };
        let label = if self.show_text && !self.text.is_empty() {
            Some(Label {
                text: self.text.clone(),
                color: self.text_color,
                size_pt: self.font_size,
            })
        } else {
            None
        };
        Ok(Style {
            palette,
            background: Theme::from_bg_black(self.bg_black).background().rgba(alpha),
            label,
            line_width: self.line_width.max(1),
            window: self.window,
            size: (self.width, self.height),
        })
    }
}

/// A `RenderConfig` with the optional parts resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    /// Trajectory colors.
    pub palette: Palette,
    /// Canvas fill, alpha included.
    pub background: Rgba<u8>,
    /// The label, if one is drawn.
    pub label: Option<Label>,
    /// Stroke width in pixels.
    pub line_width: u32,
    /// The visible part of the x/z plane.
    pub window: Window,
    /// Canvas width and height.
    pub size: (u32, u32),
}

/// Options for one animation.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationConfig {
    /// Everything a still takes.
    pub render: RenderConfig,
    /// Target number of reveal points; sets the stride.
    pub frames: usize,
    /// Extra frames holding the finished picture.
    pub freeze_frames: usize,
    /// Strided points revealed per frame.
    pub batch_size: usize,
    /// Milliseconds between frames in the preview window.
    pub interval: u64,
    /// Frame rate of the encoded video.
    pub fps: u32,
}

/// Canvas size for animations.
pub const ANIMATION_SIZE: (u32, u32) = (1920, 1080);

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig::from_render(RenderConfig::default().sized(ANIMATION_SIZE.0, ANIMATION_SIZE.1))
    }
}

impl AnimationConfig {
    /// Wraps a still's options with the default animation settings.
    /// The canvas size is left as `render` has it.
    pub fn from_render(render: RenderConfig) -> AnimationConfig {
        AnimationConfig {
            render,
            frames: 6000,
            freeze_frames: 150,
            batch_size: 20,
            interval: 1,
            fps: 60,
        }
    }

    /// Reveals one strided point per frame.
    pub fn one_point_per_frame(mut self) -> AnimationConfig {
        self.batch_size = 1;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_dark_logo() {
        let cfg = RenderConfig::default();
        assert!(cfg.bg_black);
        assert_eq!(cfg.colors, DARK_COLORS.to_vec());
        assert_eq!((cfg.width, cfg.height), (7680, 4320));
        let style = cfg.style().unwrap();
        assert_eq!(style.background, Rgba([0, 0, 0, 255]));
        assert_eq!(style.label.unwrap().text, CLUB_NAME);
    }

    #[test]
    fn light_theme_is_white_and_blue() {
        let style = RenderConfig::light().transparent().style().unwrap();
        assert_eq!(style.background, Rgba([255, 255, 255, 0]));
        assert_eq!(style.palette.color_for(1), LIGHT_COLORS[1]);
    }

    #[test]
    fn no_text_means_no_label() {
        assert!(RenderConfig::default().without_text().style().unwrap().label.is_none());
    }

    #[test]
    fn empty_colors_are_rejected() {
        let cfg = RenderConfig {
            colors: vec![],
            ..RenderConfig::default()
        };
        assert!(cfg.style().is_err());
    }

    #[test]
    fn animations_default_to_hd() {
        let cfg = AnimationConfig::default();
        assert_eq!((cfg.render.width, cfg.render.height), (1920, 1080));
        assert_eq!((cfg.frames, cfg.freeze_frames, cfg.batch_size, cfg.fps), (6000, 150, 20, 60));
    }

    #[test]
    fn empty_scene_is_rejected() {
        let scene = Scene {
            inics: vec![],
            ..Scene::default()
        };
        assert!(scene.solve().is_err());
    }
}
