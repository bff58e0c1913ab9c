// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Frame sinks.  The output path's extension picks the encoder:
//! `.gif` is encoded in-process, `.mp4` and friends are piped to
//! `ffmpeg`, and a path with no extension becomes a directory of
//! numbered PNG frames.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use crate::errors::{ensure_dir, ensure_parent, LogoError, Result};

/// Something frames can be pushed into.
pub trait FrameSink {
    /// Appends one frame.
    fn push(&mut self, frame: &RgbaImage) -> Result<()>;

    /// Flushes and closes the output.
    fn finish(self: Box<Self>) -> Result<()>;
}

/// Output container, chosen from the file extension.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VideoFormat {
    /// Animated GIF, looping forever.
    Gif,
    /// Anything ffmpeg can mux from raw frames.
    Ffmpeg,
    /// A directory of `frame_NNNNNN.png` files.
    PngSequence,
}

impl VideoFormat {
    /// Picks a format for `path`.
    pub fn for_path(path: &Path) -> Result<VideoFormat> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());
        match ext.as_ref().map(|e| e.as_str()) {
            None => Ok(VideoFormat::PngSequence),
            Some("gif") => Ok(VideoFormat::Gif),
            Some("mp4") | Some("mov") | Some("mkv") | Some("webm") => Ok(VideoFormat::Ffmpeg),
            Some(other) => Err(LogoError::config(format!(
                "don't know how to write a '.{}' animation",
                other
            ))),
        }
    }
}

/// Opens the right sink for `path`.
pub fn open_sink(path: &Path, fps: u32, size: (u32, u32)) -> Result<Box<dyn FrameSink>> {
    if fps == 0 {
        return Err(LogoError::config("fps must be positive"));
    }
    let sink: Box<dyn FrameSink> = match VideoFormat::for_path(path)? {
        VideoFormat::Gif => Box::new(GifSink::create(path, fps)?),
        VideoFormat::Ffmpeg => Box::new(FfmpegSink::spawn(path, fps, size)?),
        VideoFormat::PngSequence => Box::new(PngSequenceSink::create(path)?),
    };
    Ok(sink)
}

/// In-process GIF encoder.
pub struct GifSink {
    encoder: GifEncoder<BufWriter<File>>,
    delay: Delay,
}

impl GifSink {
    /// Creates (or truncates) the file.
    pub fn create(path: &Path, fps: u32) -> Result<GifSink> {
        ensure_parent(path)?;
        let file = File::create(path).map_err(|e| LogoError::io(path, e))?;
        let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), 10);
        encoder.set_repeat(Repeat::Infinite)?;
        Ok(GifSink {
            encoder,
            delay: Delay::from_numer_denom_ms(1000, fps),
        })
    }
}

impl FrameSink for GifSink {
    fn push(&mut self, frame: &RgbaImage) -> Result<()> {
        let frame = Frame::from_parts(frame.clone(), 0, 0, self.delay);
        self.encoder.encode_frame(frame)?;
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<()> {
        // The trailer is written when the encoder is dropped.
        drop(self.encoder);
        Ok(())
    }
}

/// Streams raw RGBA frames into an `ffmpeg` child process.
pub struct FfmpegSink {
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    path: PathBuf,
    size: (u32, u32),
}

impl FfmpegSink {
    /// Starts ffmpeg.  Fails if it is not on the PATH.
    pub fn spawn(path: &Path, fps: u32, size: (u32, u32)) -> Result<FfmpegSink> {
        ensure_parent(path)?;
        let mut encoder = Command::new("ffmpeg");
        encoder
            .args(&["-y", "-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgba"])
            .arg("-s")
            .arg(format!("{}x{}", size.0, size.1))
            .arg("-r")
            .arg(fps.to_string())
            .args(&["-i", "-", "-vf", "pad=ceil(iw/2)*2:ceil(ih/2)*2"])
            .args(&["-c:v", "libx264", "-pix_fmt", "yuv420p"])
            .arg(path);
        FfmpegSink::with_command(encoder, path, size)
    }

    // Runs any encoder that reads raw RGBA frames on stdin.
    fn with_command(mut encoder: Command, path: &Path, size: (u32, u32)) -> Result<FfmpegSink> {
        let mut child = encoder
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| LogoError::encoder(format!("could not start ffmpeg: {}", e)))?;
        let stdin = child.stdin.take();
        Ok(FfmpegSink {
            child: Some(child),
            stdin,
            path: path.to_path_buf(),
            size,
        })
    }
}

// An unfinished sink (a failed push, say) still closes the pipe and
// reaps the encoder.
impl Drop for FfmpegSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.wait() {
                warn!("could not wait for ffmpeg: {}", e);
            }
        }
    }
}

impl FrameSink for FfmpegSink {
    fn push(&mut self, frame: &RgbaImage) -> Result<()> {
        if frame.dimensions() != self.size {
            return Err(LogoError::encoder(format!(
                "frame is {:?}, stream is {:?}",
                frame.dimensions(),
                self.size
            )));
        }
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| LogoError::encoder("ffmpeg input is closed"))?;
        stdin
            .write_all(frame.as_raw())
            .map_err(|e| LogoError::encoder(format!("ffmpeg stopped reading: {}", e)))
    }

    fn finish(mut self: Box<Self>) -> Result<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| LogoError::encoder("ffmpeg was already reaped"))?;
        let status = child
            .wait()
            .map_err(|e| LogoError::encoder(format!("ffmpeg vanished: {}", e)))?;
        if !status.success() {
            return Err(LogoError::encoder(format!(
                "ffmpeg failed writing {} ({})",
                self.path.display(),
                status
            )));
        }
        Ok(())
    }
}

/// Writes `frame_000000.png`, `frame_000001.png`, ... into a
/// directory.
pub struct PngSequenceSink {
    dir: PathBuf,
    next: usize,
}

impl PngSequenceSink {
    /// Creates the directory if needed.
    pub fn create(dir: &Path) -> Result<PngSequenceSink> {
        ensure_dir(dir)?;
        Ok(PngSequenceSink {
            dir: dir.to_path_buf(),
            next: 0,
        })
    }
}

impl FrameSink for PngSequenceSink {
    fn push(&mut self, frame: &RgbaImage) -> Result<()> {
        let path = self.dir.join(format!("frame_{:06}.png", self.next));
        frame.save(&path)?;
        self.next += 1;
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<()> {
        debug!("wrote {} frames to {}", self.next, self.dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn formats_follow_the_extension() {
        assert_eq!(VideoFormat::for_path(Path::new("a.GIF")).unwrap(), VideoFormat::Gif);
        assert_eq!(VideoFormat::for_path(Path::new("a/b.mp4")).unwrap(), VideoFormat::Ffmpeg);
        assert_eq!(
            VideoFormat::for_path(Path::new("frames")).unwrap(),
            VideoFormat::PngSequence
        );
        assert!(VideoFormat::for_path(Path::new("a.txt")).is_err());
    }

    #[cfg(unix)]
    fn stand_in_encoder(done: &Path) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg("cat > /dev/null; sleep 0.2; touch \"$0\"")
            .arg(done);
        cmd
    }

    #[cfg(unix)]
    #[test]
    fn dropped_encoder_is_waited_for() {
        let tmp = tempfile::tempdir().unwrap();
        let done = tmp.path().join("done");
        let mut sink =
            FfmpegSink::with_command(stand_in_encoder(&done), &tmp.path().join("a.mp4"), (2, 2))
                .unwrap();
        sink.push(&RgbaImage::new(2, 2)).unwrap();
        assert!(sink.push(&RgbaImage::new(3, 3)).is_err());
        drop(sink);
        assert!(done.exists());
    }

    #[cfg(unix)]
    #[test]
    fn finished_encoder_is_reaped_once() {
        let tmp = tempfile::tempdir().unwrap();
        let done = tmp.path().join("done");
        let sink: Box<dyn FrameSink> = Box::new(
            FfmpegSink::with_command(stand_in_encoder(&done), &tmp.path().join("a.mp4"), (2, 2))
                .unwrap(),
        );
        sink.finish().unwrap();
        assert!(done.exists());
    }

    #[test]
    fn png_sequence_numbers_its_frames() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("frames");
        let mut sink = open_sink(&dir, 30, (4, 4)).unwrap();
        let frame = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]));
        sink.push(&frame).unwrap();
        sink.push(&frame).unwrap();
        sink.finish().unwrap();
        assert!(dir.join("frame_000000.png").is_file());
        assert!(dir.join("frame_000001.png").is_file());
        assert!(!dir.join("frame_000002.png").exists());
    }

    #[test]
    fn gif_sink_writes_a_gif() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out").join("anim.gif");
        let mut sink = open_sink(&path, 60, (8, 8)).unwrap();
        sink.push(&RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255]))).unwrap();
        sink.push(&RgbaImage::from_pixel(8, 8, Rgba([0, 0, 255, 255]))).unwrap();
        sink.finish().unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], b"GIF");
    }

    #[test]
    fn zero_fps_is_rejected() {
        assert!(open_sink(Path::new("x.gif"), 0, (4, 4)).is_err());
    }
}
