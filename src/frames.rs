// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Progressive reveal of trajectories for animation.
//!
//! A trajectory of N points is thinned to every k-th point, where
//! k = floor(N / frames).  Frame i shows the first i * batch_size
//! thinned points; once everything is shown the picture is held for
//! `freeze_frames` more frames.  The label is typed out alongside: one
//! more character every m frames, where m is the reveal length divided
//! by the label length.
//!
//! Rendering is an explicit function of the frame index and a
//! `RevealState` that the caller owns and threads through.

use image::RgbaImage;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::Style;
use crate::errors::{LogoError, Result};
use crate::lorenz::Trajectory;
use crate::typeface::Typeface;

/// What a single frame shows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Reveal {
    /// Thinned points shown per trajectory.
    pub points: usize,
    /// Label characters shown.
    pub chars: usize,
}

/// The frame schedule derived from a trajectory length and the
/// animation settings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FramePlan {
    stride: usize,
    sampled_len: usize,
    reveal_frames: usize,
    freeze_frames: usize,
    batch_size: usize,
    text_len: usize,
    title_every: usize,
}

impl FramePlan {
    /// Fails if `frames` or `batch_size` is zero, the batch is larger
    /// than `frames`, or the trajectory has fewer points than `frames`.
    pub fn new(
        trajectory_len: usize,
        frames: usize,
        batch_size: usize,
        freeze_frames: usize,
        text_len: usize,
    ) -> Result<FramePlan> {
        if frames == 0 {
            return Err(LogoError::config("frame count must be positive"));
        }
        if batch_size == 0 {
            return Err(LogoError::config("batch size must be positive"));
        }
        let stride = trajectory_len / frames;
        if stride == 0 {
            return Err(LogoError::config(format!(
                "a trajectory of {} points cannot fill {} frames",
                trajectory_len, frames
            )));
        }
        let sampled_len = (trajectory_len + stride - 1) / stride;
        let reveal_frames = frames / batch_size;
        if reveal_frames == 0 {
            return Err(LogoError::config(format!(
                "a batch of {} points leaves no frames to reveal {} frames in",
                batch_size, frames
            )));
        }
        let title_every = if text_len == 0 {
            1
        } else {
            (reveal_frames / text_len).max(1)
        };
        Ok(FramePlan {
            stride,
            sampled_len,
            reveal_frames,
            freeze_frames,
            batch_size,
            text_len,
            title_every,
        })
    }

    /// Keep every `stride()`-th point.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Points left after thinning.
    pub fn sampled_len(&self) -> usize {
        self.sampled_len
    }

    /// Last frame index that still reveals something.
    pub fn reveal_frames(&self) -> usize {
        self.reveal_frames
    }

    /// Frames per label character.
    pub fn title_every(&self) -> usize {
        self.title_every
    }

    /// Number of frames to encode.
    pub fn total_frames(&self) -> usize {
        self.reveal_frames + self.freeze_frames
    }

    /// What frame `frame` shows, or `None` for the freeze tail, where
    /// nothing changes.
    pub fn reveal(&self, frame: usize) -> Option<Reveal> {
        if frame > self.reveal_frames {
            return None;
        }
        Some(Reveal {
            points: (frame * self.batch_size).min(self.sampled_len),
            chars: (frame / self.title_every).min(self.text_len),
        })
    }
}

/// The mutable side of an animation: the trail drawn so far and the
/// last composed frame.
pub struct RevealState {
    trail: Canvas,
    drawn: Vec<usize>,
    chars: usize,
    composed: RgbaImage,
}

impl RevealState {
    /// The last composed frame.
    pub fn image(&self) -> &RgbaImage {
        &self.composed
    }
}

/// One frame as handed to an encoder.
pub struct RenderedFrame<'s> {
    /// Which frame this is.
    pub index: usize,
    /// The pixels.
    pub image: &'s RgbaImage,
    /// False when the frame repeats the previous one.
    pub changed: bool,
}

/// The immutable side of an animation: thinned paths, their colors,
/// and the schedule.
pub struct Animator {
    plan: FramePlan,
    paths: Vec<Vec<(f64, f64)>>,
    colors: Vec<Color>,
    style: Style,
    face: Option<Typeface>,
}

impl Animator {
    /// Thins every trajectory with the stride of the first.
    pub fn new(
        trajectories: &[Trajectory],
        style: Style,
        frames: usize,
        batch_size: usize,
        freeze_frames: usize,
    ) -> Result<Animator> {
        let first = trajectories
            .first()
            .ok_or_else(|| LogoError::config("nothing to animate"))?;
        let text_len = style
            .label
            .as_ref()
            .map(|l| l.text.chars().count())
            .unwrap_or(0);
        let plan = FramePlan::new(first.len(), frames, batch_size, freeze_frames, text_len)?;
        let paths = trajectories
            .iter()
            .map(|t| t.stride(plan.stride()).projection_xz().collect())
            .collect();
        let colors = style.palette.assign(trajectories.len());
        debug!(
            "animation plan: stride {}, {} points, {} reveal frames, {} total",
            plan.stride(),
            plan.sampled_len(),
            plan.reveal_frames(),
            plan.total_frames()
        );
        let face = match style.label {
            Some(_) => Some(Typeface::serif()?),
            None => None,
        };
        Ok(Animator {
            plan,
            paths,
            colors,
            style,
            face,
        })
    }

    /// The schedule.
    pub fn plan(&self) -> &FramePlan {
        &self.plan
    }

    /// A blank state to start rendering from.
    pub fn initial_state(&self) -> Result<RevealState> {
        let (w, h) = self.style.size;
        let trail = Canvas::new(w, h, self.style.window, self.style.background)?;
        let composed = trail.image().clone();
        Ok(RevealState {
            trail,
            drawn: vec![0; self.paths.len()],
            chars: 0,
            composed,
        })
    }

    /// Brings `state` up to frame `frame` and returns the picture.
    /// Frames are cheapest in ascending order; asking for an earlier
    /// frame than the state holds redraws the trail from scratch.
    pub fn render_frame<'s>(&self, frame: usize, state: &'s mut RevealState) -> RenderedFrame<'s> {
        let reveal = match self.plan.reveal(frame) {
            Some(reveal) => reveal,
            None => {
                return RenderedFrame {
                    index: frame,
                    image: &state.composed,
                    changed: false,
                }
            }
        };

        if state.drawn.iter().any(|d| reveal.points < *d) {
            state.trail.clear();
            for d in state.drawn.iter_mut() {
                *d = 0;
            }
        }

        let mut changed = false;
        for (i, path) in self.paths.iter().enumerate() {
            let target = reveal.points.min(path.len());
            if target > state.drawn[i] {
                let start = state.drawn[i].saturating_sub(1);
                state.trail.draw_path(
                    path[start..target].iter().cloned(),
                    self.colors[i],
                    self.style.line_width,
                );
                state.drawn[i] = target;
                changed = true;
            }
        }

        if changed || reveal.chars != state.chars {
            state.chars = reveal.chars;
            let mut canvas = state.trail.clone();
            if let (Some(label), Some(face)) = (&self.style.label, &self.face) {
                let prefix: String = label.text.chars().take(reveal.chars).collect();
                if !prefix.is_empty() {
                    canvas.draw_text(&prefix, label.color, label.pixels(), face);
                }
            }
            state.composed = canvas.into_image();
            changed = true;
        }

        RenderedFrame {
            index: frame,
            image: &state.composed,
            changed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::lorenz::Point3;

    #[test]
    fn sixty_thousand_points_over_six_thousand_frames() {
        let plan = FramePlan::new(60_000, 6000, 20, 150, 16).unwrap();
        assert_eq!(plan.stride(), 10);
        assert_eq!(plan.sampled_len(), 6000);
        assert_eq!(plan.reveal_frames(), 300);
        assert_eq!(plan.total_frames(), 450);
        assert_eq!(plan.title_every(), 18);
    }

    #[test]
    fn reveal_grows_by_batches_then_freezes() {
        let plan = FramePlan::new(60_000, 6000, 20, 150, 16).unwrap();
        assert_eq!(plan.reveal(0), Some(Reveal { points: 0, chars: 0 }));
        assert_eq!(plan.reveal(1), Some(Reveal { points: 20, chars: 0 }));
        assert_eq!(plan.reveal(18), Some(Reveal { points: 360, chars: 1 }));
        assert_eq!(plan.reveal(35), Some(Reveal { points: 700, chars: 1 }));
        assert_eq!(plan.reveal(300), Some(Reveal { points: 6000, chars: 16 }));
        assert_eq!(plan.reveal(301), None);
        assert_eq!(plan.reveal(449), None);
    }

    #[test]
    fn text_stops_at_its_length() {
        let plan = FramePlan::new(1000, 100, 1, 0, 3).unwrap();
        assert_eq!(plan.title_every(), 33);
        assert_eq!(plan.reveal(99).unwrap().chars, 3);
        assert_eq!(plan.reveal(100).unwrap().chars, 3);
    }

    #[test]
    fn long_text_types_one_character_per_frame() {
        let plan = FramePlan::new(100, 10, 5, 0, 40).unwrap();
        assert_eq!(plan.title_every(), 1);
    }

    #[test]
    fn impossible_plans_are_rejected() {
        assert!(FramePlan::new(100, 0, 1, 0, 0).is_err());
        assert!(FramePlan::new(100, 10, 0, 0, 0).is_err());
        assert!(FramePlan::new(5, 10, 1, 0, 0).is_err());
    }

    #[test]
    fn batch_larger_than_frames_is_rejected() {
        assert!(FramePlan::new(100, 2, 3, 1, 4).is_err());
        assert!(FramePlan::new(100, 2, 2, 1, 4).is_ok());
    }

    fn line(z: f64) -> Trajectory {
        Trajectory::from_points((0..100).map(|i| Point3::new(-30.0 + 0.6 * i as f64, 0.0, z)))
    }

    fn animator(text: bool) -> Animator {
        let mut cfg = RenderConfig::default().sized(160, 90);
        cfg.show_text = text;
        cfg.text = "AB".to_string();
        cfg.font_size = 5.0;
        Animator::new(&[line(10.0), line(40.0)], cfg.style().unwrap(), 10, 2, 3).unwrap()
    }

    #[test]
    fn frames_reveal_monotonically_and_freeze() {
        let anim = animator(false);
        assert_eq!(anim.plan().total_frames(), 8);
        let mut state = anim.initial_state().unwrap();
        let blank = state.image().clone();

        let f0 = anim.render_frame(0, &mut state);
        assert!(!f0.changed);
        assert_eq!(f0.image, &blank);

        let f1 = anim.render_frame(1, &mut state);
        assert!(f1.changed);
        let after_one = f1.image.clone();
        assert_ne!(after_one, blank);

        for frame in 2..=5 {
            assert!(anim.render_frame(frame, &mut state).changed);
        }
        let last = state.image().clone();
        let frozen = anim.render_frame(6, &mut state);
        assert!(!frozen.changed);
        assert_eq!(frozen.image, &last);
    }

    #[test]
    fn going_backwards_redraws_from_scratch() {
        let anim = animator(false);
        let mut forward = anim.initial_state().unwrap();
        anim.render_frame(1, &mut forward);
        let expected = forward.image().clone();

        let mut state = anim.initial_state().unwrap();
        anim.render_frame(5, &mut state);
        let again = anim.render_frame(1, &mut state);
        assert_eq!(again.image, &expected);
    }

    #[test]
    fn label_is_typed_out() {
        let anim = animator(true);
        // 5 reveal frames over 2 characters: one character every 2 frames.
        assert_eq!(anim.plan().title_every(), 2);
        assert_eq!(anim.plan().reveal(3).unwrap().chars, 1);
        assert_eq!(anim.plan().reveal(4).unwrap().chars, 2);

        let bare = animator(false);
        let mut plain = bare.initial_state().unwrap();
        let without = bare.render_frame(2, &mut plain).image.clone();
        let mut state = anim.initial_state().unwrap();
        let with = anim.render_frame(2, &mut state).image.clone();
        assert_ne!(without, with);
    }
}
