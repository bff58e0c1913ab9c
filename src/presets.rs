// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The club's standard output set, as a table of named presets grouped
//! by output directory, and a runner that renders a list of them from
//! one integration.

use std::path::{Path, PathBuf};

use crate::color::Color;
use crate::config::{AnimationConfig, RenderConfig, Scene, ANIMATION_SIZE, DARK_TEXT};
use crate::errors::{LogoError, Result};
use crate::lorenz::Trajectory;
use crate::render::{animate_logo_from, generate_attractor_from};

/// Preset groups, in the order `all` runs them.
pub const GROUPS: &[&str] = &[
    "logos",
    "logos-without-text",
    "animations",
    "animations-without-text",
    "color-trial",
];

/// Candidate strokes tried against each other on the light theme.
pub const TRIAL_COLORS: [Color; 3] = [
    Color::rgb(0x00, 0x0B, 0x8D),
    Color::rgb(0x1D, 0x19, 0xAC),
    Color::rgb(0x47, 0xC7, 0xFC),
];

/// What a preset produces.
#[derive(Clone, Debug, PartialEq)]
pub enum Job {
    /// A still image.
    Still(RenderConfig),
    /// An animation.
    Animation(AnimationConfig),
}

/// One named output.
#[derive(Clone, Debug, PartialEq)]
pub struct Preset {
    /// The group it belongs to.
    pub group: &'static str,
    /// File stem, unique within the group.
    pub name: String,
    /// What to render.
    pub job: Job,
}

impl Preset {
    /// Where the preset writes its main output.
    pub fn output(&self) -> Option<&Path> {
        match &self.job {
            Job::Still(cfg) => cfg.filename.as_deref(),
            Job::Animation(cfg) => cfg.render.filename.as_deref(),
        }
    }

    fn run(&self, trajectories: &[Trajectory]) -> Result<Vec<PathBuf>> {
        match &self.job {
            Job::Still(cfg) => generate_attractor_from(trajectories, cfg),
            Job::Animation(cfg) => Ok(animate_logo_from(trajectories, cfg)?.into_iter().collect()),
        }
    }
}

fn still_themes() -> Vec<(&'static str, RenderConfig)> {
    vec![
        ("science_club_logo", RenderConfig::default()),
        ("science_club_logo_transparent", RenderConfig::default().transparent()),
        ("science_club_logo_light", RenderConfig::light()),
        ("science_club_logo_light_transparent", RenderConfig::light().transparent()),
        ("science_club_logo_light_on_black", RenderConfig::light_on_black()),
    ]
}

fn animation_themes() -> Vec<(&'static str, RenderConfig)> {
    let (w, h) = ANIMATION_SIZE;
    vec![
        ("science_club_logo", RenderConfig::default().sized(w, h)),
        ("science_club_logo_light", RenderConfig::light().sized(w, h)),
        ("science_club_logo_light_on_black", RenderConfig::light_on_black().sized(w, h)),
    ]
}

fn logos(group: &'static str, dir: &Path, text: bool) -> Vec<Preset> {
    still_themes()
        .into_iter()
        .map(|(name, cfg)| {
            let cfg = cfg.with_filename(dir.join(format!("{}.png", name))).cropped();
            Preset {
                group,
                name: name.to_string(),
                job: Job::Still(if text { cfg } else { cfg.without_text() }),
            }
        })
        .collect()
}

fn animations(group: &'static str, dir: &Path, text: bool) -> Vec<Preset> {
    animation_themes()
        .into_iter()
        .map(|(name, cfg)| {
            let cfg = cfg.with_filename(dir.join(format!("{}.mp4", name)));
            let job = if text {
                AnimationConfig::from_render(cfg)
            } else {
                AnimationConfig::from_render(cfg.without_text()).one_point_per_frame()
            };
            Preset {
                group,
                name: name.to_string(),
                job: Job::Animation(job),
            }
        })
        .collect()
}

fn color_trial(dir: &Path) -> Vec<Preset> {
    iproduct!(TRIAL_COLORS.iter(), TRIAL_COLORS.iter())
        .map(|(a, b)| {
            let name = format!("{}-and-{}", a.hex(), b.hex());
            let cfg = RenderConfig {
                colors: vec![*a, *b],
                text_color: DARK_TEXT,
                ..RenderConfig::light()
            };
            Preset {
                group: "color-trial",
                job: Job::Still(cfg.with_filename(dir.join(format!("{}.png", name)))),
                name,
            }
        })
        .collect()
}

/// The presets of `name` (or of every group, for `all`), writing under
/// `root`.
pub fn group(name: &str, root: &Path) -> Result<Vec<Preset>> {
    let presets = match name {
        "all" => GROUPS
            .iter()
            .map(|g| group(g, root))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect(),
        "logos" => logos("logos", &root.join("logo_images"), true),
        "logos-without-text" => {
            logos("logos-without-text", &root.join("logo_images_without_text"), false)
        }
        "animations" => animations("animations", &root.join("logo_animations"), true),
        "animations-without-text" => animations(
            "animations-without-text",
            &root.join("logo_animations_without_text"),
            false,
        ),
        "color-trial" => color_trial(&root.join("color_trial")),
        other => {
            return Err(LogoError::config(format!(
                "no preset group '{}' (try one of: all, {})",
                other,
                GROUPS.join(", ")
            )))
        }
    };
    Ok(presets)
}

/// Every preset, writing under `root`.
pub fn presets(root: &Path) -> Vec<Preset> {
    GROUPS
        .iter()
        .filter_map(|g| group(g, root).ok())
        .flatten()
        .collect()
}

/// What a batch did.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Files written, in order.
    pub written: Vec<PathBuf>,
    /// Presets that failed, with why.
    pub failed: Vec<(String, LogoError)>,
}

impl BatchReport {
    /// True when nothing failed.
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Integrates the scene once and renders every preset from it.  A
/// failing preset is logged and recorded; the rest still run.  Only a
/// failed integration aborts the batch.
pub fn run_batch(scene: &Scene, presets: &[Preset]) -> Result<BatchReport> {
    let trajectories = scene.solve()?;
    let mut report = BatchReport::default();
    for preset in presets {
        info!("preset {}/{}", preset.group, preset.name);
        match preset.run(&trajectories) {
            Ok(written) => report.written.extend(written),
            Err(e) => {
                error!("preset {}/{} failed: {}", preset.group, preset.name, e);
                report.failed.push((format!("{}/{}", preset.group, preset.name), e));
            }
        }
    }
    info!(
        "batch done: {} files written, {} presets failed",
        report.written.len(),
        report.failed.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lorenz::SolverConfig;

    fn names(presets: &[Preset]) -> Vec<&str> {
        presets.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn logo_group_has_five_cropped_pngs() {
        let presets = group("logos", Path::new("out")).unwrap();
        assert_eq!(
            names(&presets),
            vec![
                "science_club_logo",
                "science_club_logo_transparent",
                "science_club_logo_light",
                "science_club_logo_light_transparent",
                "science_club_logo_light_on_black",
            ]
        );
        for p in &presets {
            match &p.job {
                Job::Still(cfg) => {
                    assert!(cfg.crop_to_sq && cfg.show_text);
                    assert!(p.output().unwrap().starts_with("out/logo_images"));
                }
                other => panic!("expected a still, got {:?}", other),
            }
        }
    }

    #[test]
    fn animations_without_text_reveal_one_point_a_frame() {
        let presets = group("animations-without-text", Path::new(".")).unwrap();
        assert_eq!(presets.len(), 3);
        for p in &presets {
            match &p.job {
                Job::Animation(cfg) => {
                    assert_eq!(cfg.batch_size, 1);
                    assert!(!cfg.render.show_text);
                    assert_eq!(p.output().unwrap().extension().unwrap(), "mp4");
                }
                other => panic!("expected an animation, got {:?}", other),
            }
        }
    }

    #[test]
    fn color_trial_is_every_pair() {
        let presets = group("color-trial", Path::new(".")).unwrap();
        assert_eq!(presets.len(), 9);
        assert_eq!(presets[1].name, "000B8D-and-1D19AC");
        assert_eq!(presets[8].name, "47C7FC-and-47C7FC");
    }

    #[test]
    fn color_trial_writes_goldenrod_on_white() {
        for preset in group("color-trial", Path::new(".")).unwrap() {
            match &preset.job {
                Job::Still(cfg) => {
                    assert_eq!(cfg.text_color, DARK_TEXT);
                    assert!(!cfg.bg_black);
                    assert_eq!(cfg.style().unwrap().label.unwrap().color, DARK_TEXT);
                }
                Job::Animation(_) => panic!("{} is not a still", preset.name),
            }
        }
    }

    #[test]
    fn all_is_every_group() {
        assert_eq!(group("all", Path::new(".")).unwrap().len(), 5 + 5 + 3 + 3 + 9);
        assert_eq!(presets(Path::new(".")).len(), 25);
        assert!(group("posters", Path::new(".")).is_err());
    }

    #[test]
    fn a_failing_preset_does_not_stop_the_batch() {
        let tmp = tempfile::tempdir().unwrap();
        let good = Preset {
            group: "test",
            name: "good".to_string(),
            job: Job::Still(
                RenderConfig::default()
                    .sized(48, 27)
                    .with_filename(tmp.path().join("good.png")),
            ),
        };
        let tall = Preset {
            group: "test",
            name: "tall".to_string(),
            job: Job::Still(
                RenderConfig::default()
                    .sized(27, 48)
                    .with_filename(tmp.path().join("tall.png"))
                    .cropped(),
            ),
        };
        let scene = Scene {
            solver: SolverConfig {
                tf: 2.0,
                ..SolverConfig::default()
            },
            ..Scene::default()
        };
        let report = run_batch(&scene, &[tall, good]).unwrap();
        assert!(!report.is_ok());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "test/tall");
        assert_eq!(report.written, vec![tmp.path().join("good.png")]);
        assert!(tmp.path().join("good.png").is_file());
        assert!(!tmp.path().join("tall.png").exists());
    }
}
