//! Pose landmarks and the estimator seam.

use image::RgbImage;

/// One body landmark in normalized image coordinates (0.0 to 1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub visibility: f32,
}

/// Landmarks found in one frame, indexed like [`POSE_CONNECTIONS`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pose {
    pub landmarks: Vec<Landmark>,
}

/// Finds a body pose in an RGB frame.
///
/// Called once per frame from the camera thread.
pub trait PoseEstimator: Send {
    fn estimate(&mut self, image: &RgbImage) -> Option<Pose>;
}

/// Estimator that never finds a pose; frames pass through undecorated.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEstimator;

impl PoseEstimator for NoopEstimator {
    fn estimate(&mut self, _image: &RgbImage) -> Option<Pose> {
        None
    }
}

/// Landmark pairs joined by a line, for the 33-point body topology.
pub const POSE_CONNECTIONS: &[(usize, usize)] = &[
    // Face
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 7),
    (0, 4),
    (4, 5),
    (5, 6),
    (6, 8),
    (9, 10),
    // Arms and hands
    (11, 12),
    (11, 13),
    (13, 15),
    (15, 17),
    (15, 19),
    (15, 21),
    (17, 19),
    (12, 14),
    (14, 16),
    (16, 18),
    (16, 20),
    (16, 22),
    (18, 20),
    // Torso
    (11, 23),
    (12, 24),
    (23, 24),
    // Legs and feet
    (23, 25),
    (24, 26),
    (25, 27),
    (26, 28),
    (27, 29),
    (28, 30),
    (29, 31),
    (30, 32),
    (27, 31),
    (28, 32),
];
