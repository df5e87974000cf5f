//! Frame sources.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::CameraError;
use super::frame::Frame;

/// An open camera device.
pub trait FrameSource: Send {
    /// Block until the next frame is available.
    ///
    /// # Errors
    ///
    /// Returns `CameraError::ReadFailed` when no frame can be produced; the
    /// loop treats this as the end of capture.
    fn read(&mut self) -> Result<Frame, CameraError>;
}

/// Default pacing of [`ImageSequenceSource`], about 30 frames per second.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// A directory of still images played back as a camera.
///
/// Files with an image extension are read in file-name order and the
/// sequence repeats from the start. `read` waits out the frame interval
/// so playback runs at camera speed.
#[derive(Debug)]
pub struct ImageSequenceSource {
    frames: Vec<PathBuf>,
    next: usize,
    interval: Duration,
    last_read: Option<Instant>,
}

impl ImageSequenceSource {
    /// Open the image directory.
    ///
    /// # Errors
    ///
    /// Returns `CameraError::DeviceUnavailable` if the directory cannot be
    /// listed or holds no images.
    pub fn open(dir: &Path) -> Result<Self, CameraError> {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| CameraError::DeviceUnavailable(format!("{}: {e}", dir.display())))?;

        let mut frames: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| is_image(path))
            .collect();
        frames.sort();

        if frames.is_empty() {
            return Err(CameraError::DeviceUnavailable(format!(
                "{}: no frames",
                dir.display()
            )));
        }

        tracing::info!(dir = %dir.display(), frames = frames.len(), "Image sequence camera opened");
        Ok(Self {
            frames,
            next: 0,
            interval: DEFAULT_FRAME_INTERVAL,
            last_read: None,
        })
    }

    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for ImageSequenceSource {
    fn read(&mut self) -> Result<Frame, CameraError> {
        if let Some(last) = self.last_read {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                std::thread::sleep(self.interval - elapsed);
            }
        }
        self.last_read = Some(Instant::now());

        let path = self
            .frames
            .get(self.next)
            .ok_or_else(|| CameraError::ReadFailed("empty sequence".to_string()))?;
        let pixels = image::open(path)
            .map_err(|e| CameraError::ReadFailed(format!("{}: {e}", path.display())))?
            .to_rgb8();

        self.next = (self.next + 1) % self.frames.len();
        Ok(Frame::rgb(pixels))
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ["png", "jpg", "jpeg"]
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Open the configured camera.
///
/// # Errors
///
/// Returns `CameraError::DeviceUnavailable` when no camera is configured or
/// the configured one cannot be opened.
pub fn open_camera(dir: Option<&Path>) -> Result<Box<dyn FrameSource>, CameraError> {
    let dir = dir.ok_or_else(|| CameraError::DeviceUnavailable("no camera configured".to_string()))?;
    Ok(Box::new(ImageSequenceSource::open(dir)?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::*;

    fn write_frame(dir: &Path, name: &str, shade: u8) {
        RgbImage::from_pixel(4, 3, Rgb([shade, shade, shade]))
            .save(dir.join(name))
            .unwrap();
    }

    #[test]
    fn test_frames_play_in_name_order_and_repeat() {
        let dir = tempfile::tempdir().unwrap();
        write_frame(dir.path(), "b.png", 200);
        write_frame(dir.path(), "a.png", 100);
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut source = ImageSequenceSource::open(dir.path())
            .unwrap()
            .with_interval(Duration::ZERO);
        assert_eq!(source.len(), 2);

        let shades: Vec<u8> = (0..3)
            .map(|_| source.read().unwrap().pixels.get_pixel(0, 0).0[0])
            .collect();
        assert_eq!(shades, vec![100, 200, 100]);
    }

    #[test]
    fn test_empty_dir_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImageSequenceSource::open(dir.path()).unwrap_err();
        assert!(matches!(err, CameraError::DeviceUnavailable(_)));
    }

    #[test]
    fn test_no_camera_configured() {
        let err = open_camera(None).err().unwrap();
        assert_eq!(err.to_string(), "camera unavailable: no camera configured");
    }

    #[test]
    fn test_unreadable_frame_fails_read() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.png"), b"not a png").unwrap();

        let mut source = ImageSequenceSource::open(dir.path()).unwrap();
        assert!(matches!(source.read(), Err(CameraError::ReadFailed(_))));
    }
}
