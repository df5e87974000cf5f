//! The capture loop and its stop signal.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::body::Bytes;
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use tokio::sync::watch;

use super::CameraError;
use super::overlay::{CONNECTION_SPEC, LANDMARK_SPEC, draw_landmarks};
use super::pose::{POSE_CONNECTIONS, PoseEstimator};
use super::source::FrameSource;

/// JPEG quality of published frames.
const JPEG_QUALITY: u8 = 80;

/// Cloneable stop signal for a running loop.
///
/// The loop polls it between frames, so a stop takes effect after at most
/// one more frame.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stop_signal: Arc<AtomicBool>,
}

impl StopHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal the loop to stop.
    pub fn stop(&self) {
        self.stop_signal.store(true, Ordering::SeqCst);
    }

    /// Check if the stop signal has been sent.
    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.stop_signal.load(Ordering::SeqCst)
    }
}

/// How a loop ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopExit {
    /// Frames published before the stop signal.
    pub frames: u64,
}

/// Read, estimate, overlay, encode and publish until stopped.
pub struct CameraLoop {
    source: Box<dyn FrameSource>,
    estimator: Box<dyn PoseEstimator>,
    stop: StopHandle,
    publish: watch::Sender<Option<Bytes>>,
}

impl CameraLoop {
    #[must_use]
    pub fn new(
        source: Box<dyn FrameSource>,
        estimator: Box<dyn PoseEstimator>,
        stop: StopHandle,
        publish: watch::Sender<Option<Bytes>>,
    ) -> Self {
        Self {
            source,
            estimator,
            stop,
            publish,
        }
    }

    /// Run on the current thread until the stop signal or a failed read.
    ///
    /// Publishing replaces the previous frame; slow viewers skip frames.
    ///
    /// # Errors
    ///
    /// Returns the read or encode error that ended the loop.
    pub fn run(mut self) -> Result<LoopExit, CameraError> {
        let mut frames = 0;
        while !self.stop.should_stop() {
            let frame = self.source.read()?;
            let mut image = frame.into_rgb();
            if let Some(pose) = self.estimator.estimate(&image) {
                draw_landmarks(
                    &mut image,
                    &pose,
                    POSE_CONNECTIONS,
                    LANDMARK_SPEC,
                    CONNECTION_SPEC,
                );
            }
            self.publish.send_replace(Some(encode_jpeg(&image)?));
            frames += 1;
        }
        Ok(LoopExit { frames })
    }
}

/// Encode an RGB frame as JPEG.
///
/// # Errors
///
/// Returns `ImageError` if the encoder rejects the image.
pub fn encode_jpeg(image: &RgbImage) -> Result<Bytes, image::ImageError> {
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY).encode_image(image)?;
    Ok(Bytes::from(buffer))
}
