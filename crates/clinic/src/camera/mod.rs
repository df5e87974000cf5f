//! Pose-estimation camera loop for the Video page.
//!
//! # Pipeline (per frame)
//!
//! 1. [`FrameSource::read`] pulls a frame from the device
//! 2. [`Frame::into_rgb`] fixes the channel order (BGR devices)
//! 3. [`PoseEstimator::estimate`] finds body landmarks
//! 4. [`draw_landmarks`] overlays dots and connections
//! 5. The frame is JPEG-encoded and published to viewers
//!
//! The loop runs on a blocking thread and checks its [`StopHandle`] between
//! frames. Viewers only ever see the latest frame; nothing is buffered.
//!
//! Inference is not done here. [`NoopEstimator`] yields no landmarks, and a
//! real model plugs in by implementing [`PoseEstimator`].

mod capture;
mod frame;
mod hub;
mod overlay;
mod pose;
mod source;

use thiserror::Error;

pub use capture::{CameraLoop, LoopExit, StopHandle};
pub use frame::{ChannelOrder, Frame};
pub use hub::{CameraHub, CameraStatus, FrameReceiver, StartOutcome};
pub use overlay::{CONNECTION_SPEC, DrawingSpec, LANDMARK_SPEC, draw_landmarks};
pub use pose::{Landmark, NoopEstimator, POSE_CONNECTIONS, Pose, PoseEstimator};
pub use source::{FrameSource, ImageSequenceSource, open_camera};

/// Camera failures.
#[derive(Debug, Error)]
pub enum CameraError {
    /// The device could not be opened. Not retried.
    #[error("camera unavailable: {0}")]
    DeviceUnavailable(String),

    /// A frame could not be read; the loop stops.
    #[error("frame read failed: {0}")]
    ReadFailed(String),

    /// The processed frame could not be encoded.
    #[error("frame encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}
