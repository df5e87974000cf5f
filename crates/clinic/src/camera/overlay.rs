//! Landmark overlay drawing.

use image::{Rgb, RgbImage};

use super::pose::Pose;

/// Color and stroke for one kind of overlay mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawingSpec {
    pub color: Rgb<u8>,
    pub thickness: u32,
    pub circle_radius: u32,
}

/// Landmark dots.
pub const LANDMARK_SPEC: DrawingSpec = DrawingSpec {
    color: Rgb([0, 0, 255]),
    thickness: 2,
    circle_radius: 2,
};

/// Lines between connected landmarks.
pub const CONNECTION_SPEC: DrawingSpec = DrawingSpec {
    color: Rgb([0, 255, 0]),
    thickness: 2,
    circle_radius: 2,
};

/// Draw `pose` onto `image`: connections first, then landmark dots on top.
///
/// Connections naming a landmark the pose does not have are skipped.
pub fn draw_landmarks(
    image: &mut RgbImage,
    pose: &Pose,
    connections: &[(usize, usize)],
    landmark_spec: DrawingSpec,
    connection_spec: DrawingSpec,
) {
    let (width, height) = image.dimensions();
    let to_pixel = |index: usize| {
        pose.landmarks.get(index).map(|landmark| {
            (
                scale(landmark.x, width),
                scale(landmark.y, height),
            )
        })
    };

    for &(from, to) in connections {
        if let (Some(a), Some(b)) = (to_pixel(from), to_pixel(to)) {
            draw_line(image, a, b, connection_spec);
        }
    }

    for index in 0..pose.landmarks.len() {
        if let Some(center) = to_pixel(index) {
            let radius = i64::from(landmark_spec.circle_radius.max(1));
            fill_circle(image, center, radius, landmark_spec.color);
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn scale(normalized: f32, extent: u32) -> i64 {
    (f64::from(normalized) * f64::from(extent)).round() as i64
}

/// Bresenham line, stamped with a disk for thickness.
fn draw_line(image: &mut RgbImage, (x0, y0): (i64, i64), (x1, y1): (i64, i64), spec: DrawingSpec) {
    let radius = i64::from(spec.thickness / 2);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let (mut x, mut y) = (x0, y0);
    let mut err = dx + dy;

    loop {
        fill_circle(image, (x, y), radius, spec.color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn fill_circle(image: &mut RgbImage, (cx, cy): (i64, i64), radius: i64, color: Rgb<u8>) {
    for y in (cy - radius)..=(cy + radius) {
        for x in (cx - radius)..=(cx + radius) {
            if (x - cx).pow(2) + (y - cy).pow(2) <= radius.pow(2) {
                put(image, x, y, color);
            }
        }
    }
}

fn put(image: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
        return;
    };
    if x < image.width() && y < image.height() {
        image.put_pixel(x, y, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::pose::Landmark;

    fn landmark(x: f32, y: f32) -> Landmark {
        Landmark {
            x,
            y,
            visibility: 1.0,
        }
    }

    #[test]
    fn test_dots_and_line_use_their_colors() {
        let mut image = RgbImage::new(20, 20);
        let pose = Pose {
            landmarks: vec![landmark(0.25, 0.5), landmark(0.75, 0.5)],
        };

        draw_landmarks(&mut image, &pose, &[(0, 1)], LANDMARK_SPEC, CONNECTION_SPEC);

        assert_eq!(image.get_pixel(5, 10), &Rgb([0, 0, 255]));
        assert_eq!(image.get_pixel(15, 10), &Rgb([0, 0, 255]));
        assert_eq!(image.get_pixel(10, 10), &Rgb([0, 255, 0]));
        assert_eq!(image.get_pixel(10, 2), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_out_of_frame_landmarks_are_clipped() {
        let mut image = RgbImage::new(4, 4);
        let pose = Pose {
            landmarks: vec![landmark(-1.0, -1.0), landmark(2.0, 2.0)],
        };
        draw_landmarks(&mut image, &pose, &[(0, 1), (0, 5)], LANDMARK_SPEC, CONNECTION_SPEC);
        assert_eq!(image.get_pixel(2, 2), &Rgb([0, 255, 0]));
    }
}
