// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The Lorenz system and the integrators that trace it.
//!
//! The Lorenz equations
//!
//! ```text
//! dx/dt = σ(y − x)
//! dy/dt = x(ρ − z) − y
//! dz/dt = xy − βz
//! ```
//!
//! are solved from an initial condition and sampled on an evenly
//! spaced time grid.  Because the system is chaotic, two different
//! solvers will agree for a while and then wander apart; the only
//! thing we promise is that the same solver with the same settings
//! produces the same trajectory every time.

use std::ops::{Add, Mul, Sub};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use crate::errors::{LogoError, Result};

/// A point in phase space.  Initial conditions are just points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point3 {
    /// Convection intensity.
    pub x: f64,
    /// Horizontal temperature difference.
    pub y: f64,
    /// Vertical temperature difference.
    pub z: f64,
}

/// A starting point for the integrator.
pub type InitialCondition = Point3;

impl Point3 {
    /// Constructor.
    pub fn new(x: f64, y: f64, z: f64) -> Point3 {
        Point3 { x, y, z }
    }

    /// True if no component is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    fn abs_max(&self, other: &Point3) -> Point3 {
        Point3::new(
            self.x.abs().max(other.x.abs()),
            self.y.abs().max(other.y.abs()),
            self.z.abs().max(other.z.abs()),
        )
    }

    /// Root-mean-square of the components, each divided by the
    /// matching component of `scale`.
    fn rms_scaled(&self, scale: &Point3) -> f64 {
        let (a, b, c) = (self.x / scale.x, self.y / scale.y, self.z / scale.z);
        ((a * a + b * b + c * c) / 3.0).sqrt()
    }
}

impl Add for Point3 {
    type Output = Point3;
    fn add(self, o: Point3) -> Point3 {
        Point3::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }
}

impl Sub for Point3 {
    type Output = Point3;
    fn sub(self, o: Point3) -> Point3 {
        Point3::new(self.x - o.x, self.y - o.y, self.z - o.z)
    }
}

impl Mul<f64> for Point3 {
    type Output = Point3;
    fn mul(self, k: f64) -> Point3 {
        Point3::new(self.x * k, self.y * k, self.z * k)
    }
}

/// Parses `x,y,z`.
impl FromStr for Point3 {
    type Err = LogoError;

    fn from_str(s: &str) -> Result<Point3> {
        let parts: Vec<&str> = s.split(',').map(|p| p.trim()).collect();
        if parts.len() != 3 {
            return Err(LogoError::config(format!(
                "expected x,y,z but got '{}'",
                s
            )));
        }
        let mut values = [0.0_f64; 3];
        for (slot, part) in values.iter_mut().zip(parts.iter()) {
            *slot = f64::from_str(part)
                .map_err(|_| LogoError::config(format!("'{}' is not a number", part)))?;
        }
        Ok(Point3::new(values[0], values[1], values[2]))
    }
}

/// The three constants of the system.  The classical chaotic regime
/// is σ = 10, ρ = 28, β = 8/3.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LorenzParams {
    /// Prandtl number.
    pub sigma: f64,
    /// Rayleigh number.
    pub rho: f64,
    /// Geometric factor.
    pub beta: f64,
}

impl Default for LorenzParams {
    fn default() -> Self {
        LorenzParams {
            sigma: 10.0,
            rho: 28.0,
            beta: 8.0 / 3.0,
        }
    }
}

impl LorenzParams {
    /// The right-hand side of the system at `p`.
    #[inline]
    pub fn derivative(&self, p: &Point3) -> Point3 {
        Point3 {
            x: self.sigma * (p.y - p.x),
            y: p.x * (self.rho - p.z) - p.y,
            z: p.x * p.y - self.beta * p.z,
        }
    }
}

/// Which integrator to use.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Method {
    /// Dormand–Prince 5(4), adaptive, with dense output at the grid.
    Dopri5,
    /// Classic fourth-order Runge–Kutta at the grid step.
    Rk4,
}

impl FromStr for Method {
    type Err = LogoError;

    fn from_str(s: &str) -> Result<Method> {
        match s.to_ascii_lowercase().as_str() {
            "dopri5" | "rk45" => Ok(Method::Dopri5),
            "rk4" => Ok(Method::Rk4),
            _ => Err(LogoError::config(format!("unknown solver method '{}'", s))),
        }
    }
}

/// Everything the integrator needs besides the starting point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SolverConfig {
    /// System constants.
    pub params: LorenzParams,
    /// Start of the time span.
    pub t0: f64,
    /// End of the time span (exclusive on the output grid).
    pub tf: f64,
    /// Spacing of the output grid.
    pub step: f64,
    /// Integrator.
    pub method: Method,
    /// Relative tolerance for the adaptive method.
    pub rtol: f64,
    /// Absolute tolerance for the adaptive method.
    pub atol: f64,
    /// Upper bound on attempted adaptive steps.
    pub max_steps: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            params: LorenzParams::default(),
            t0: 0.0,
            tf: 60.0,
            step: 0.001,
            method: Method::Dopri5,
            rtol: 1e-3,
            atol: 1e-6,
            max_steps: 10_000_000,
        }
    }
}

impl SolverConfig {
    /// Number of grid points: floor((tf − t0) / step), where a ratio
    /// that lands within rounding noise of an integer counts as that
    /// integer.
    pub fn grid_len(&self) -> usize {
        let ratio = (self.tf - self.t0) / self.step;
        if !ratio.is_finite() || ratio <= 0.0 {
            return 0;
        }
        let nearest = ratio.round();
        if (ratio - nearest).abs() < 1e-9 * nearest.max(1.0) {
            nearest as usize
        } else {
            ratio.floor() as usize
        }
    }

    /// The time of grid point `i`.
    #[inline]
    pub fn grid_time(&self, i: usize) -> f64 {
        self.t0 + (i as f64) * self.step
    }

    /// Rejects settings the integrators cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.step > 0.0) || !self.step.is_finite() {
            return Err(LogoError::config("step must be a positive number"));
        }
        if !(self.tf > self.t0) || !self.tf.is_finite() || !self.t0.is_finite() {
            return Err(LogoError::config("time span must satisfy t0 < tf"));
        }
        if self.grid_len() == 0 {
            return Err(LogoError::config("time span is shorter than one step"));
        }
        if !(self.rtol > 0.0) || !(self.atol > 0.0) {
            return Err(LogoError::config("tolerances must be positive"));
        }
        Ok(())
    }
}

/// The sampled solution for one initial condition.  Read-only once
/// built.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    xs: Vec<f64>,
    ys: Vec<f64>,
    zs: Vec<f64>,
}

impl Trajectory {
    fn with_capacity(n: usize) -> Trajectory {
        Trajectory {
            xs: Vec::with_capacity(n),
            ys: Vec::with_capacity(n),
            zs: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, p: Point3) {
        self.xs.push(p.x);
        self.ys.push(p.y);
        self.zs.push(p.z);
    }

    /// Builds a trajectory from already-known points.
    pub fn from_points<I: IntoIterator<Item = Point3>>(points: I) -> Trajectory {
        let mut t = Trajectory::with_capacity(0);
        for p in points {
            t.push(p);
        }
        t
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// True if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// The x samples.
    pub fn x(&self) -> &[f64] {
        &self.xs
    }

    /// The y samples.
    pub fn y(&self) -> &[f64] {
        &self.ys
    }

    /// The z samples.
    pub fn z(&self) -> &[f64] {
        &self.zs
    }

    /// Sample `i`, if it exists.
    pub fn point(&self, i: usize) -> Option<Point3> {
        if i < self.len() {
            Some(Point3::new(self.xs[i], self.ys[i], self.zs[i]))
        } else {
            None
        }
    }

    /// The (x, z) projection the logo is drawn from.
    pub fn projection_xz(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().cloned().zip(self.zs.iter().cloned())
    }

    /// Every `k`-th sample, starting with the first.
    pub fn stride(&self, k: usize) -> Trajectory {
        let k = k.max(1);
        Trajectory {
            xs: self.xs.iter().step_by(k).cloned().collect(),
            ys: self.ys.iter().step_by(k).cloned().collect(),
            zs: self.zs.iter().step_by(k).cloned().collect(),
        }
    }

    /// Largest pointwise Euclidean distance to `other`, over the
    /// samples both trajectories have.
    pub fn max_deviation(&self, other: &Trajectory) -> f64 {
        (0..self.len().min(other.len()))
            .filter_map(|i| match (self.point(i), other.point(i)) {
                (Some(a), Some(b)) => {
                    let d = a - b;
                    Some((d.x * d.x + d.y * d.y + d.z * d.z).sqrt())
                }
                _ => None,
            })
            .fold(0.0, f64::max)
    }
}

/// Integrates the Lorenz system from `inic` and samples it on the
/// grid described by `cfg`.
pub fn solve(inic: InitialCondition, cfg: &SolverConfig) -> Result<Trajectory> {
    cfg.validate()?;
    if !inic.is_finite() {
        return Err(LogoError::config(format!(
            "initial condition {:?} is not finite",
            inic
        )));
    }
    match cfg.method {
        Method::Dopri5 => dopri5(inic, cfg),
        Method::Rk4 => rk4(inic, cfg),
    }
}

/// Integrates every initial condition, spreading the work across up
/// to `threads` scoped workers.  Results come back in input order; the
/// first failure wins.
pub fn solve_all(
    inics: &[InitialCondition],
    cfg: &SolverConfig,
    threads: usize,
) -> Result<Vec<Trajectory>> {
    let threads = threads.max(1).min(inics.len().max(1));
    if threads == 1 {
        return inics.iter().map(|inic| solve(*inic, cfg)).collect();
    }

    let work = Arc::new(Mutex::new(inics.iter().cloned().enumerate()));
    let mut solved: Vec<(usize, Result<Trajectory>)> = vec![];
    crossbeam::scope(|spawner| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let work = work.clone();
                spawner.spawn(move |_| {
                    let mut done = vec![];
                    loop {
                        let next = match work.lock() {
                            Ok(mut it) => it.next(),
                            Err(_) => None,
                        };
                        match next {
                            Some((index, inic)) => done.push((index, solve(inic, cfg))),
                            None => break,
                        }
                    }
                    done
                })
            })
            .collect();
        for handle in handles {
            match handle.join() {
                Ok(done) => solved.extend(done),
                Err(_) => solved.push((
                    usize::MAX,
                    Err(LogoError::Solver {
                        t: cfg.t0,
                        reason: "integration worker panicked".to_string(),
                    }),
                )),
            }
        }
    })
    .map_err(|_| LogoError::Solver {
        t: cfg.t0,
        reason: "integration worker panicked".to_string(),
    })?;

    solved.sort_by_key(|(index, _)| *index);
    solved.into_iter().map(|(_, r)| r).collect()
}

fn rk4(inic: InitialCondition, cfg: &SolverConfig) -> Result<Trajectory> {
    let n = cfg.grid_len();
    let h = cfg.step;
    let f = |p: &Point3| cfg.params.derivative(p);

    let mut out = Trajectory::with_capacity(n);
    let mut y = inic;
    out.push(y);
    for i in 1..n {
        let k1 = f(&y);
        let k2 = f(&(y + k1 * (h / 2.0)));
        let k3 = f(&(y + k2 * (h / 2.0)));
        let k4 = f(&(y + k3 * h));
        y = y + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (h / 6.0);
        if !y.is_finite() {
            return Err(LogoError::Solver {
                t: cfg.grid_time(i),
                reason: "state is no longer finite".to_string(),
            });
        }
        out.push(y);
    }
    Ok(out)
}

// Dormand–Prince 5(4) tableau.
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;
const A71: f64 = 35.0 / 384.0;
const A73: f64 = 500.0 / 1113.0;
const A74: f64 = 125.0 / 192.0;
const A75: f64 = -2187.0 / 6784.0;
const A76: f64 = 11.0 / 84.0;

// Fifth-order minus embedded fourth-order weights.
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

// Continuous extension (Hairer & Wanner).
const D1: f64 = -12715105075.0 / 11282082432.0;
const D3: f64 = 87487479700.0 / 32700410799.0;
const D4: f64 = -10690763975.0 / 1880347072.0;
const D5: f64 = 701980252875.0 / 199316789632.0;
const D6: f64 = -1453857185.0 / 822651844.0;
const D7: f64 = 69997945.0 / 29380423.0;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;

/// The coefficients of the interpolating polynomial over one accepted
/// step.
struct DenseStep {
    y0: Point3,
    delta: Point3,
    r3: Point3,
    r4: Point3,
    r5: Point3,
}

impl DenseStep {
    /// The solution at fraction `theta` of the step.
    fn at(&self, theta: f64) -> Point3 {
        let theta1 = 1.0 - theta;
        self.y0
            + (self.delta + (self.r3 + (self.r4 + self.r5 * theta1) * theta) * theta1) * theta
    }
}

fn initial_step(cfg: &SolverConfig, y0: &Point3, f0: &Point3) -> f64 {
    let scale = Point3::new(
        cfg.atol + y0.x.abs() * cfg.rtol,
        cfg.atol + y0.y.abs() * cfg.rtol,
        cfg.atol + y0.z.abs() * cfg.rtol,
    );
    let d0 = y0.rms_scaled(&scale);
    let d1 = f0.rms_scaled(&scale);
    let h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    };
    let y1 = *y0 + *f0 * h0;
    let f1 = cfg.params.derivative(&y1);
    let d2 = (f1 - *f0).rms_scaled(&scale) / h0;
    let h1 = if d1.max(d2) <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / d1.max(d2)).powf(1.0 / 5.0)
    };
    (100.0 * h0).min(h1).min(cfg.tf - cfg.t0)
}

fn dopri5(inic: InitialCondition, cfg: &SolverConfig) -> Result<Trajectory> {
    let n = cfg.grid_len();
    let f = |p: &Point3| cfg.params.derivative(p);

    let mut out = Trajectory::with_capacity(n);
    out.push(inic);
    let mut next = 1;

    let mut t = cfg.t0;
    let mut y = inic;
    let mut k1 = f(&y);
    let mut h = initial_step(cfg, &y, &k1);
    let (mut accepted, mut rejected) = (0usize, 0usize);

    while next < n {
        if accepted + rejected >= cfg.max_steps {
            return Err(LogoError::Solver {
                t,
                reason: format!("gave up after {} steps", cfg.max_steps),
            });
        }
        if h <= 16.0 * std::f64::EPSILON * t.abs().max(1.0) {
            return Err(LogoError::Solver {
                t,
                reason: "step size underflow".to_string(),
            });
        }

        let last = t + h >= cfg.tf;
        if last {
            h = cfg.tf - t;
        }

        let k2 = f(&(y + k1 * (h * A21)));
        let k3 = f(&(y + (k1 * A31 + k2 * A32) * h));
        let k4 = f(&(y + (k1 * A41 + k2 * A42 + k3 * A43) * h));
        let k5 = f(&(y + (k1 * A51 + k2 * A52 + k3 * A53 + k4 * A54) * h));
        let k6 = f(&(y + (k1 * A61 + k2 * A62 + k3 * A63 + k4 * A64 + k5 * A65) * h));
        let y1 = y + (k1 * A71 + k3 * A73 + k4 * A74 + k5 * A75 + k6 * A76) * h;
        let k7 = f(&y1);

        let err = (k1 * E1 + k3 * E3 + k4 * E4 + k5 * E5 + k6 * E6 + k7 * E7) * h;
        let bound = y.abs_max(&y1);
        let scale = Point3::new(
            cfg.atol + bound.x * cfg.rtol,
            cfg.atol + bound.y * cfg.rtol,
            cfg.atol + bound.z * cfg.rtol,
        );
        let err_norm = err.rms_scaled(&scale);

        if !y1.is_finite() || !err_norm.is_finite() || err_norm > 1.0 {
            rejected += 1;
            let factor = if err_norm.is_finite() {
                (SAFETY * err_norm.powf(-0.2)).max(MIN_FACTOR)
            } else {
                MIN_FACTOR
            };
            h *= factor;
            continue;
        }
        accepted += 1;

        let delta = y1 - y;
        let r3 = k1 * h - delta;
        let dense = DenseStep {
            y0: y,
            delta,
            r3,
            r4: delta - k7 * h - r3,
            r5: (k1 * D1 + k3 * D3 + k4 * D4 + k5 * D5 + k6 * D6 + k7 * D7) * h,
        };

        let t1 = t + h;
        while next < n && (last || cfg.grid_time(next) <= t1) {
            let theta = ((cfg.grid_time(next) - t) / h).min(1.0).max(0.0);
            out.push(dense.at(theta));
            next += 1;
        }

        t = t1;
        y = y1;
        k1 = k7;
        let factor = if err_norm == 0.0 {
            MAX_FACTOR
        } else {
            (SAFETY * err_norm.powf(-0.2)).min(MAX_FACTOR).max(MIN_FACTOR)
        };
        h *= factor;
    }

    debug!(
        "dopri5 from {:?}: {} samples, {} accepted, {} rejected",
        inic, n, accepted, rejected
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short(method: Method) -> SolverConfig {
        SolverConfig {
            tf: 2.0,
            method,
            ..SolverConfig::default()
        }
    }

    #[test]
    fn default_grid_has_sixty_thousand_points() {
        assert_eq!(SolverConfig::default().grid_len(), 60_000);
    }

    #[test]
    fn grid_len_floors_partial_steps() {
        let cfg = SolverConfig {
            tf: 1.0,
            step: 0.3,
            ..SolverConfig::default()
        };
        assert_eq!(cfg.grid_len(), 3);
    }

    #[test]
    fn trajectory_length_matches_grid() {
        let cfg = short(Method::Dopri5);
        let t = solve(Point3::new(1.0, 1.0, 1.0), &cfg).unwrap();
        assert_eq!(t.len(), 2000);
        assert_eq!(t.x().len(), t.z().len());
        assert_eq!(t.point(0), Some(Point3::new(1.0, 1.0, 1.0)));
    }

    #[test]
    fn same_settings_give_the_same_trajectory() {
        let cfg = SolverConfig {
            tf: 10.0,
            ..SolverConfig::default()
        };
        let inic = Point3::new(6.05681151749362, 5.4634096640009275, 9.255399642632);
        let a = solve(inic, &cfg).unwrap();
        let b = solve(inic, &cfg).unwrap();
        assert!(a.max_deviation(&b) < 1e-12);
    }

    #[test]
    fn dopri5_agrees_with_rk4_on_a_short_span() {
        let tight = SolverConfig {
            rtol: 1e-10,
            atol: 1e-12,
            ..short(Method::Dopri5)
        };
        let inic = Point3::new(1.0, 1.0, 1.0);
        let a = solve(inic, &tight).unwrap();
        let b = solve(inic, &short(Method::Rk4)).unwrap();
        assert_eq!(a.len(), b.len());
        assert!(a.max_deviation(&b) < 1e-4, "{}", a.max_deviation(&b));
    }

    #[test]
    fn fixed_points_stay_put() {
        let cfg = short(Method::Dopri5);
        let origin = Point3::new(0.0, 0.0, 0.0);
        let t = solve(origin, &cfg).unwrap();
        assert!(t.x().iter().chain(t.y()).chain(t.z()).all(|v| *v == 0.0));

        // Off the origin the derivative is zero only up to rounding, so
        // the adaptive solver may wander within its tolerances.
        let p = cfg.params;
        let c = (p.beta * (p.rho - 1.0)).sqrt();
        let eq = Point3::new(c, c, p.rho - 1.0);
        let t = solve(eq, &cfg).unwrap();
        let unit = Point3::new(1.0, 1.0, 1.0);
        for i in 0..t.len() {
            let drift = (t.point(i).unwrap() - eq).rms_scaled(&unit);
            assert!(drift < cfg.atol, "drift {} at sample {}", drift, i);
        }
        let t = solve(eq, &short(Method::Rk4)).unwrap();
        let last = t.point(t.len() - 1).unwrap();
        assert!((last - eq).rms_scaled(&unit) < 1e-9);
    }

    #[test]
    fn trajectory_stays_on_the_attractor() {
        let t = solve(Point3::new(5.0, 4.0, 8.0), &SolverConfig::default()).unwrap();
        assert!(t.x().iter().all(|x| x.abs() < 30.0));
        assert!(t.z().iter().all(|z| *z > -1.0 && *z < 60.0));
    }

    #[test]
    fn bad_settings_are_rejected() {
        let inic = Point3::new(1.0, 1.0, 1.0);
        let zero_step = SolverConfig {
            step: 0.0,
            ..SolverConfig::default()
        };
        assert!(solve(inic, &zero_step).is_err());
        let backwards = SolverConfig {
            tf: -1.0,
            ..SolverConfig::default()
        };
        assert!(solve(inic, &backwards).is_err());
        assert!(solve(Point3::new(std::f64::NAN, 0.0, 0.0), &SolverConfig::default()).is_err());
    }

    #[test]
    fn step_budget_is_enforced() {
        let cfg = SolverConfig {
            max_steps: 3,
            ..short(Method::Dopri5)
        };
        match solve(Point3::new(1.0, 1.0, 1.0), &cfg) {
            Err(LogoError::Solver { reason, .. }) => assert!(reason.contains("3 steps")),
            other => panic!("expected solver failure, got {:?}", other.map(|t| t.len())),
        }
    }

    #[test]
    fn solve_all_keeps_input_order() {
        let cfg = short(Method::Rk4);
        let inics = vec![
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 1.0, 1.0),
            Point3::new(3.0, 1.0, 1.0),
            Point3::new(4.0, 1.0, 1.0),
        ];
        let all = solve_all(&inics, &cfg, 3).unwrap();
        assert_eq!(all.len(), 4);
        for (t, inic) in all.iter().zip(inics.iter()) {
            assert_eq!(t.point(0), Some(*inic));
        }
    }

    #[test]
    fn solve_all_reports_a_failure_from_any_worker() {
        let cfg = short(Method::Rk4);
        let inics = vec![
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 1.0, 1.0),
            Point3::new(std::f64::NAN, 1.0, 1.0),
            Point3::new(4.0, 1.0, 1.0),
        ];
        assert!(solve_all(&inics, &cfg, 3).is_err());
        assert!(solve_all(&inics, &cfg, 1).is_err());
        assert!(solve_all(&inics[..2], &cfg, 3).is_ok());
    }

    #[test]
    fn rk4_stops_when_the_state_blows_up() {
        let huge = Point3::new(1e100, 1e100, 1e100);
        match solve(huge, &short(Method::Rk4)) {
            Err(LogoError::Solver { t, reason }) => {
                assert!(reason.contains("no longer finite"));
                assert!(t > 0.0);
            }
            other => panic!("expected solver failure, got {:?}", other.map(|t| t.len())),
        }
    }

    #[test]
    fn stride_keeps_every_kth_sample() {
        let t = Trajectory::from_points((0..10).map(|i| Point3::new(i as f64, 0.0, 0.0)));
        assert_eq!(t.stride(3).x(), &[0.0, 3.0, 6.0, 9.0]);
    }

    #[test]
    fn points_parse_from_triples() {
        let p: Point3 = "1.5, -2,3e1".parse().unwrap();
        assert_eq!(p, Point3::new(1.5, -2.0, 30.0));
        assert!("1,2".parse::<Point3>().is_err());
        assert!("1,b,3".parse::<Point3>().is_err());
    }
}
