// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate lorenz_logo;
extern crate num_cpus;
extern crate rand;
#[macro_use]
extern crate tracing;
extern crate tracing_subscriber;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use lorenz_logo::color::{parse_colors, Color};
use lorenz_logo::lorenz::{Method, Point3};
use lorenz_logo::presets::{self, GROUPS};
use lorenz_logo::{
    animate_logo, crop_to_square, generate_attractor, run_batch, AnimationConfig, LogoError,
    RenderConfig, Result, Scene, SolverConfig,
};
use rand::distributions::{Distribution, Uniform};
use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> std::result::Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> std::result::Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_parse<T: FromStr>(s: &str) -> std::result::Result<(), String>
where
    T::Err: std::fmt::Display,
{
    T::from_str(s).map(|_| ()).map_err(|e| e.to_string())
}

const OUTPUT: &str = "output";
const FILE: &str = "file";
const GROUP: &str = "group";
const DIR: &str = "dir";
const CROP: &str = "crop";
const LIGHT: &str = "light";
const TRANSPARENT: &str = "transparent";
const NO_TEXT: &str = "no-text";
const SHOW: &str = "show";
const COLORS: &str = "colors";
const TEXT_COLOR: &str = "text-color";
const TEXT: &str = "text";
const SIZE: &str = "size";
const INIC: &str = "inic";
const RANDOM: &str = "random";
const METHOD: &str = "method";
const TF: &str = "tf";
const STEP: &str = "step";
const THREADS: &str = "threads";
const FRAMES: &str = "frames";
const FREEZE: &str = "freeze";
const BATCH: &str = "batch";
const FPS: &str = "fps";
const INTERVAL: &str = "interval";

fn scene_args<'a, 'b>() -> Vec<Arg<'a, 'b>> {
    let max_threads = num_cpus::get();
    vec![
        Arg::with_name(INIC)
            .long(INIC)
            .takes_value(true)
            .multiple(true)
            .number_of_values(1)
            .validator(|s| validate_parse::<Point3>(&s))
            .help("Initial condition x,y,z (repeatable)"),
        Arg::with_name(RANDOM)
            .long(RANDOM)
            .takes_value(true)
            .validator(|s| {
                validate_range(
                    &s,
                    1,
                    64,
                    "Could not parse point count",
                    "Random point count must be between 1 and 64",
                )
            })
            .help("Add N random initial conditions drawn from [0, 10)^3"),
        Arg::with_name(METHOD)
            .long(METHOD)
            .takes_value(true)
            .default_value("dopri5")
            .possible_values(&["dopri5", "rk45", "rk4"])
            .help("Integration method"),
        Arg::with_name(TF)
            .long(TF)
            .takes_value(true)
            .default_value("60")
            .validator(|s| {
                validate_range(
                    &s,
                    0.001,
                    10_000.0,
                    "Could not parse end time",
                    "End time must be between 0.001 and 10000",
                )
            })
            .help("End of the integration interval"),
        Arg::with_name(STEP)
            .long(STEP)
            .takes_value(true)
            .default_value("0.001")
            .validator(|s| {
                validate_range(
                    &s,
                    1e-6,
                    1.0,
                    "Could not parse step",
                    "Step must be between 0.000001 and 1",
                )
            })
            .help("Spacing of the output time grid"),
        Arg::with_name(THREADS)
            .long(THREADS)
            .short("t")
            .takes_value(true)
            .default_value("1")
            .validator(move |s| {
                validate_range(
                    &s,
                    1,
                    max_threads,
                    "Could not parse thread count",
                    &format!("Thread count must be between 1 and {}", max_threads),
                )
            })
            .help("Number of threads to use in solver"),
    ]
}

fn render_args<'a, 'b>() -> Vec<Arg<'a, 'b>> {
    vec![
        Arg::with_name(OUTPUT)
            .required(true)
            .long(OUTPUT)
            .short("o")
            .takes_value(true)
            .help("Output file"),
        Arg::with_name(CROP)
            .long(CROP)
            .help("Also write a centered square crop (stills) or crop every frame"),
        Arg::with_name(LIGHT)
            .long(LIGHT)
            .help("Blue strokes on white instead of gold on black"),
        Arg::with_name(TRANSPARENT)
            .long(TRANSPARENT)
            .help("Transparent background"),
        Arg::with_name(NO_TEXT).long(NO_TEXT).help("Leave out the caption"),
        Arg::with_name(SHOW)
            .long(SHOW)
            .help("Show the result in a window (needs the `preview` feature)"),
        Arg::with_name(COLORS)
            .long(COLORS)
            .takes_value(true)
            .validator(|s| parse_colors(&s).map(|_| ()).map_err(|e| e.to_string()))
            .help("Comma-separated trajectory colors, assigned cyclically"),
        Arg::with_name(TEXT_COLOR)
            .long(TEXT_COLOR)
            .takes_value(true)
            .validator(|s| validate_parse::<Color>(&s))
            .help("Caption color"),
        Arg::with_name(TEXT)
            .long(TEXT)
            .takes_value(true)
            .help("Caption text"),
        Arg::with_name(SIZE)
            .long(SIZE)
            .short("s")
            .takes_value(true)
            .validator(|s| validate_pair::<u32>(&s, 'x', "Could not parse output image size"))
            .help("Size of output image, WxH"),
    ]
}

fn frame_arg(
    name: &'static str,
    default: &'static str,
    high: usize,
    help: &'static str,
) -> Arg<'static, 'static> {
    Arg::with_name(name)
        .long(name)
        .takes_value(true)
        .default_value(default)
        .validator(move |s| {
            validate_range(
                &s,
                1,
                high,
                "Could not parse count",
                &format!("Value must be between 1 and {}", high),
            )
        })
        .help(help)
}

fn args<'a>() -> ArgMatches<'a> {
    App::new("lorenz-logo")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Lorenz attractor logo and animation generator")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("still")
                .about("Render the logo as a still image")
                .args(&render_args())
                .args(&scene_args()),
        )
        .subcommand(
            SubCommand::with_name("animate")
                .about("Render the logo being drawn, as a GIF, a video, or a frame directory")
                .args(&render_args())
                .args(&scene_args())
                .arg(frame_arg(FRAMES, "6000", 1_000_000, "Target number of revealed points"))
                .arg(
                    Arg::with_name(FREEZE)
                        .long(FREEZE)
                        .takes_value(true)
                        .default_value("150")
                        .validator(|s| validate_parse::<usize>(&s))
                        .help("Frames holding the finished picture"),
                )
                .arg(frame_arg(BATCH, "20", 1_000_000, "Points revealed per frame"))
                .arg(frame_arg(FPS, "60", 240, "Frame rate of the video"))
                .arg(frame_arg(INTERVAL, "1", 10_000, "Milliseconds between preview frames")),
        )
        .subcommand(
            SubCommand::with_name("crop")
                .about("Write a centered square crop next to an image")
                .arg(Arg::with_name(FILE).required(true).help("Image to crop")),
        )
        .subcommand(
            SubCommand::with_name("preset")
                .about("Render a preset group, or all of them")
                .arg(
                    Arg::with_name(GROUP)
                        .required(true)
                        .possible_values(&["all"])
                        .possible_values(GROUPS)
                        .help("Preset group"),
                )
                .arg(
                    Arg::with_name(DIR)
                        .long(DIR)
                        .takes_value(true)
                        .default_value(".")
                        .help("Directory the group directories are created in"),
                )
                .args(&scene_args()),
        )
        .subcommand(SubCommand::with_name("presets").about("List the preset groups"))
        .get_matches()
}

fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>> {
    match matches.value_of(name) {
        None => Ok(None),
        Some(s) => T::from_str(s)
            .map(Some)
            .map_err(|_| LogoError::config(format!("could not parse --{} '{}'", name, s))),
    }
}

fn scene(matches: &ArgMatches) -> Result<Scene> {
    let mut inics = match matches.values_of(INIC) {
        Some(values) => values.map(Point3::from_str).collect::<Result<Vec<_>>>()?,
        None => vec![],
    };
    if let Some(n) = value::<usize>(matches, RANDOM)? {
        let uniform = Uniform::new(0.0, 10.0);
        let mut rng = rand::thread_rng();
        for _ in 0..n {
            let p = Point3::new(
                uniform.sample(&mut rng),
                uniform.sample(&mut rng),
                uniform.sample(&mut rng),
            );
            info!("random initial condition: {},{},{}", p.x, p.y, p.z);
            inics.push(p);
        }
    }

    let mut scene = Scene::default();
    if !inics.is_empty() {
        scene.inics = inics;
    }
    scene.solver = SolverConfig {
        method: value::<Method>(matches, METHOD)?.unwrap_or(scene.solver.method),
        tf: value(matches, TF)?.unwrap_or(scene.solver.tf),
        step: value(matches, STEP)?.unwrap_or(scene.solver.step),
        ..scene.solver
    };
    scene.threads = value(matches, THREADS)?.unwrap_or(1);
    Ok(scene)
}

fn render_config(matches: &ArgMatches, base: RenderConfig) -> Result<RenderConfig> {
    let mut cfg = if matches.is_present(LIGHT) {
        RenderConfig::light().sized(base.width, base.height)
    } else {
        base
    };
    cfg = cfg.with_filename(matches.value_of(OUTPUT).unwrap_or_default());
    cfg.crop_to_sq = matches.is_present(CROP);
    cfg.transparent = matches.is_present(TRANSPARENT);
    cfg.show_text = !matches.is_present(NO_TEXT);
    cfg.show = matches.is_present(SHOW);
    if let Some(colors) = matches.value_of(COLORS) {
        cfg.colors = parse_colors(colors)?;
    }
    if let Some(color) = value::<Color>(matches, TEXT_COLOR)? {
        cfg.text_color = color;
    }
    if let Some(text) = matches.value_of(TEXT) {
        cfg.text = text.to_string();
    }
    if let Some((w, h)) = matches.value_of(SIZE).and_then(|s| parse_pair::<u32>(s, 'x')) {
        cfg = cfg.sized(w, h);
    }
    Ok(cfg)
}

fn count(matches: &ArgMatches, name: &str, default: usize) -> Result<usize> {
    Ok(value(matches, name)?.unwrap_or(default))
}

fn print_written(paths: &[PathBuf]) {
    for path in paths {
        println!("{}", path.display());
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        ("still", Some(m)) => {
            let cfg = render_config(m, RenderConfig::default())?;
            print_written(&generate_attractor(&scene(m)?, &cfg)?);
        }
        ("animate", Some(m)) => {
            let defaults = AnimationConfig::default();
            let cfg = AnimationConfig {
                render: render_config(m, defaults.render.clone())?,
                frames: count(m, FRAMES, defaults.frames)?,
                freeze_frames: count(m, FREEZE, defaults.freeze_frames)?,
                batch_size: count(m, BATCH, defaults.batch_size)?,
                interval: value(m, INTERVAL)?.unwrap_or(defaults.interval),
                fps: value(m, FPS)?.unwrap_or(defaults.fps),
            };
            if let Some(path) = animate_logo(&scene(m)?, &cfg)? {
                print_written(&[path]);
            }
        }
        ("crop", Some(m)) => {
            let file = m.value_of(FILE).unwrap_or_default();
            print_written(&[crop_to_square(Path::new(file))?]);
        }
        ("preset", Some(m)) => {
            let root = Path::new(m.value_of(DIR).unwrap_or("."));
            let batch = presets::group(m.value_of(GROUP).unwrap_or("all"), root)?;
            let report = run_batch(&scene(m)?, &batch)?;
            print_written(&report.written);
            if !report.is_ok() {
                for (name, e) in &report.failed {
                    eprintln!("error: {}: {}", name, e);
                }
                return Err(LogoError::Batch {
                    failed: report.failed.len(),
                    total: batch.len(),
                });
            }
        }
        ("presets", Some(_)) => {
            for preset in presets::presets(Path::new(".")) {
                let output = preset
                    .output()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                println!("{:<24} {:<40} {}", preset.group, preset.name, output);
            }
        }
        (other, _) => {
            return Err(LogoError::config(format!("unknown command '{}'", other)));
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lorenz_logo=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
