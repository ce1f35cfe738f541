//! Image preprocessing for the breed classifier.

use image::DynamicImage;
use image::imageops::FilterType;
use ndarray::Array4;

/// Memory layout the model expects for its image input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorLayout {
    /// Batch, height, width, channels.
    Nhwc,
    /// Batch, channels, height, width.
    Nchw,
}

/// Resizes an image to the model's input resolution and scales pixel values
/// into `[0, 1]`.
///
/// No mean/std shift is applied; the models this crate targets were trained
/// on plain `pixel / 255` inputs.
#[must_use]
pub fn image_to_tensor(
    image: &DynamicImage,
    height: u32,
    width: u32,
    layout: TensorLayout,
) -> Array4<f32> {
    let resized = image.resize_exact(width, height, FilterType::Triangle);
    let rgb = resized.to_rgb8();

    let (h, w) = (height as usize, width as usize);
    let mut tensor = match layout {
        TensorLayout::Nhwc => Array4::zeros((1, h, w, 3)),
        TensorLayout::Nchw => Array4::zeros((1, 3, h, w)),
    };

    for (x, y, pixel) in rgb.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        for channel in 0..3 {
            let value = f32::from(pixel[channel]) / 255.0;
            match layout {
                TensorLayout::Nhwc => tensor[[0, y, x, channel]] = value,
                TensorLayout::Nchw => tensor[[0, channel, y, x]] = value,
            }
        }
    }

    tensor
}
