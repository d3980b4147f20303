use crate::error::{Error, Result};
use image::{DynamicImage, ImageFormat, RgbImage, imageops::FilterType};
use ndarray::Array4;

/// Formats accepted by the upload control.
pub const SUPPORTED_FORMATS: [ImageFormat; 3] = [ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::Bmp];

/// File extensions matching [`SUPPORTED_FORMATS`].
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// How pixel values are mapped into the model's input range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalization {
    /// `value / 255`.
    Unit,
    /// `(value / 255 - mean) / std` per channel.
    MeanStd { mean: [f32; 3], std: [f32; 3] },
}

impl Default for Normalization {
    fn default() -> Self {
        Normalization::MeanStd {
            mean: IMAGENET_MEAN,
            std: IMAGENET_STD,
        }
    }
}

impl Normalization {
    fn apply(&self, value: u8, channel: usize) -> f32 {
        let v = value as f32 / 255.0;
        match self {
            Normalization::Unit => v,
            Normalization::MeanStd { mean, std } => (v - mean[channel]) / std[channel],
        }
    }
}

/// Decodes uploaded bytes, accepting only JPEG, PNG and BMP.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    let format = image::guess_format(bytes)
        .map_err(|_| Error::UnsupportedFormat("contenido no reconocido".to_string()))?;
    if !SUPPORTED_FORMATS.contains(&format) {
        return Err(Error::UnsupportedFormat(format!("{format:?}")));
    }
    Ok(image::load_from_memory_with_format(bytes, format)?)
}

pub fn is_supported_extension(ext: &str) -> bool {
    let ext = ext.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS.contains(&ext.as_str())
}

/// Drops any alpha channel.
pub fn to_rgb(image: &DynamicImage) -> RgbImage {
    image.to_rgb8()
}

/// Resizes to `size`×`size` without preserving the aspect ratio.
pub fn resize_exact(image: &DynamicImage, size: u32) -> RgbImage {
    let resized = image.resize_exact(size, size, FilterType::Triangle);
    to_rgb(&resized)
}

/// Fixed-shape preprocessing shared by every predictor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preprocessor {
    pub size: u32,
    pub normalization: Normalization,
}

impl Preprocessor {
    pub fn new(size: u32, normalization: Normalization) -> Self {
        Self {
            size,
            normalization,
        }
    }

    /// Produces an NCHW tensor of shape `(1, 3, size, size)`.
    pub fn to_tensor(&self, image: &DynamicImage) -> Array4<f32> {
        let rgb = resize_exact(image, self.size);
        let side = self.size as usize;
        Array4::from_shape_fn((1, 3, side, side), |(_, c, y, x)| {
            let pixel = rgb.get_pixel(x as u32, y as u32);
            self.normalization.apply(pixel[c], c)
        })
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(224, Normalization::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use image::{ImageBuffer, Rgb, Rgba};
    use rstest::rstest;
    use std::io::Cursor;

    fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[rstest]
    #[case(1, 1)]
    #[case(640, 480)]
    #[case(31, 997)]
    fn resize_always_yields_fixed_dimension(#[case] w: u32, #[case] h: u32) {
        let img = DynamicImage::new_rgb8(w, h);
        let out = resize_exact(&img, 224);
        assert_eq!(out.dimensions(), (224, 224));
    }

    #[test]
    fn alpha_channel_is_stripped() {
        let img = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(8, 8, Rgba([10, 20, 30, 0])));
        assert_eq!(img.color().channel_count(), 4);
        let rgb = to_rgb(&img);
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([10, 20, 30]));
        let tensor = Preprocessor::new(4, Normalization::Unit).to_tensor(&img);
        assert_eq!(tensor.shape(), &[1, 3, 4, 4]);
    }

    #[test]
    fn unit_normalization_scales_to_unit_range() {
        let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(10, 10, Rgb([255, 0, 128])));
        let tensor = Preprocessor::new(16, Normalization::Unit).to_tensor(&img);
        assert_relative_eq!(tensor[[0, 0, 3, 3]], 1.0);
        assert_relative_eq!(tensor[[0, 1, 3, 3]], 0.0);
        assert_relative_eq!(tensor[[0, 2, 3, 3]], 128.0 / 255.0, epsilon = 1e-6);
    }

    #[test]
    fn mean_std_normalization_uses_per_channel_stats() {
        let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(2, 2, Rgb([255, 255, 255])));
        let tensor = Preprocessor::default().to_tensor(&img);
        for c in 0..3 {
            let expected = (1.0 - IMAGENET_MEAN[c]) / IMAGENET_STD[c];
            assert_relative_eq!(tensor[[0, c, 0, 0]], expected, epsilon = 1e-5);
        }
    }

    #[rstest]
    #[case(ImageFormat::Png)]
    #[case(ImageFormat::Jpeg)]
    #[case(ImageFormat::Bmp)]
    fn decodes_supported_formats(#[case] format: ImageFormat) {
        let img = DynamicImage::new_rgb8(12, 7);
        let decoded = decode_image(&encode(&img, format)).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (12, 7));
    }

    #[test]
    fn rejects_garbage_and_foreign_formats() {
        assert!(matches!(
            decode_image(b"not an image at all"),
            Err(Error::UnsupportedFormat(_))
        ));
        // GIF magic bytes are recognised but not accepted.
        assert!(matches!(
            decode_image(b"GIF89a\x01\x00\x01\x00"),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn truncated_png_is_a_decode_error() {
        let bytes = encode(&DynamicImage::new_rgb8(4, 4), ImageFormat::Png);
        assert!(matches!(
            decode_image(&bytes[..bytes.len() / 2]),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(is_supported_extension("JPG"));
        assert!(is_supported_extension("bmp"));
        assert!(!is_supported_extension("gif"));
    }
}
