//! Raw camera frames.

use image::RgbImage;

/// Byte order of a frame's three channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgb,
    /// Blue first, as most capture devices deliver.
    Bgr,
}

/// One captured frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub pixels: RgbImage,
    pub order: ChannelOrder,
}

impl Frame {
    #[must_use]
    pub const fn rgb(pixels: RgbImage) -> Self {
        Self {
            pixels,
            order: ChannelOrder::Rgb,
        }
    }

    #[must_use]
    pub const fn bgr(pixels: RgbImage) -> Self {
        Self {
            pixels,
            order: ChannelOrder::Bgr,
        }
    }

    /// The frame with channels in RGB order.
    #[must_use]
    pub fn into_rgb(self) -> RgbImage {
        let mut pixels = self.pixels;
        if self.order == ChannelOrder::Bgr {
            for pixel in pixels.pixels_mut() {
                pixel.0.swap(0, 2);
            }
        }
        pixels
    }
}
