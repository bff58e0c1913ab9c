#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Lorenz attractor logo generator
//!
//! The Lorenz system is three coupled ordinary differential equations
//! whose solutions never settle down and never repeat, yet stay on a
//! butterfly-shaped set, the attractor.  Two starting points that are
//! close together separate quickly and trace the two wings in
//! different orders.
//!
//! This crate integrates a handful of such starting points, projects
//! each trajectory onto the x/z plane, and draws the curves onto a
//! fixed canvas, one color per trajectory, with a caption underneath.
//! The same curves can be revealed a few points per frame and written
//! out as an animation, and a landscape image can be cropped to a
//! centered square.  A table of presets reproduces the club's standard
//! set of logos and animations from one integration.

#[macro_use]
extern crate itertools;
#[macro_use]
extern crate tracing;

extern crate crossbeam;
extern crate failure;
extern crate image;
extern crate imageproc;
extern crate num;
extern crate rusttype;

pub mod canvas;
pub mod color;
pub mod config;
pub mod crop;
pub mod errors;
pub mod frames;
pub mod lorenz;
pub mod planes;
pub mod presets;
pub mod preview;
pub mod render;
pub mod typeface;
pub mod video;

pub use crate::config::{AnimationConfig, RenderConfig, Scene};
pub use crate::crop::crop_to_square;
pub use crate::errors::{LogoError, Result};
pub use crate::lorenz::{solve, solve_all, InitialCondition, Method, Point3, SolverConfig, Trajectory};
pub use crate::presets::{run_batch, BatchReport, Preset};
pub use crate::render::{animate_logo, generate_attractor};
