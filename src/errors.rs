// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The error taxonomy.  Every failure aborts the single artifact being
//! generated; batch runners catch these per preset and carry on.

use failure::Fail;
use std::io;
use std::path::Path;

/// Everything that can go wrong while producing a logo.
#[derive(Debug, Fail)]
pub enum LogoError {
    /// The integrator could not advance the solution.
    #[fail(display = "integration failed at t = {}: {}", t, reason)]
    Solver {
        /// Simulation time at which the solver gave up.
        t: f64,
        /// What went wrong.
        reason: String,
    },

    /// A square crop was requested on an image that is taller than it
    /// is wide.
    #[fail(
        display = "cannot crop a {}x{} image to a square: image is taller than it is wide",
        width, height
    )]
    Geometry {
        /// Width of the offending image.
        width: u32,
        /// Height of the offending image.
        height: u32,
    },

    /// A file or directory could not be created, read, or written.
    #[fail(display = "{}: {}", path, cause)]
    Io {
        /// The path involved, for the message.
        path: String,
        /// The underlying error.
        #[cause]
        cause: io::Error,
    },

    /// The image codec refused to decode or encode.
    #[fail(display = "image error: {}", cause)]
    Image {
        /// The underlying error.
        #[cause]
        cause: image::ImageError,
    },

    /// The video encoder is missing or failed.
    #[fail(display = "video encoder: {}", reason)]
    Encoder {
        /// What went wrong.
        reason: String,
    },

    /// The preview window could not be opened or updated.
    #[fail(display = "preview window: {}", reason)]
    Preview {
        /// What went wrong.
        reason: String,
    },

    /// Some presets of a batch failed; each was reported as it happened.
    #[fail(display = "{} of {} presets failed", failed, total)]
    Batch {
        /// How many failed.
        failed: usize,
        /// How many were run.
        total: usize,
    },

    /// The caller handed us something we cannot render.
    #[fail(display = "invalid configuration: {}", reason)]
    Config {
        /// What was wrong with it.
        reason: String,
    },
}

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, LogoError>;

impl LogoError {
    pub(crate) fn io<P: AsRef<Path>>(path: P, cause: io::Error) -> LogoError {
        LogoError::Io {
            path: path.as_ref().display().to_string(),
            cause,
        }
    }

    /// A `Config` error with the given reason.
    pub fn config<S: Into<String>>(reason: S) -> LogoError {
        LogoError::Config {
            reason: reason.into(),
        }
    }

    pub(crate) fn encoder<S: Into<String>>(reason: S) -> LogoError {
        LogoError::Encoder {
            reason: reason.into(),
        }
    }
}

impl From<image::ImageError> for LogoError {
    fn from(cause: image::ImageError) -> LogoError {
        LogoError::Image { cause }
    }
}

/// Creates the parent directory of `path` if it does not exist yet.
pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => ensure_dir(dir),
        _ => Ok(()),
    }
}

/// Creates `dir` and any missing ancestors.
pub(crate) fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| LogoError::io(dir, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_message_names_the_shape() {
        let e = LogoError::Geometry {
            width: 3,
            height: 5,
        };
        assert!(e.to_string().contains("3x5"));
        assert!(e.to_string().contains("taller"));
    }

    #[test]
    fn io_errors_carry_their_cause() {
        let e = LogoError::io("out/x.png", io::Error::new(io::ErrorKind::Other, "disk full"));
        assert_eq!(e.to_string(), "out/x.png: disk full");
        assert!(e.cause().is_some());
    }

    #[test]
    fn ensure_parent_creates_nested_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("a").join("b").join("logo.png");
        ensure_parent(&target).unwrap();
        assert!(tmp.path().join("a").join("b").is_dir());
    }
}
