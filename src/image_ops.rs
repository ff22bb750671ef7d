//! Pixel work for `image::DynamicImage`: the scaled preview and the final crop.

use std::path::Path;

use image::DynamicImage;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::CropBox;
use crate::scale::ScaleResult;

/// Resampling filter used for the on-screen preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl From<ResampleFilter> for FilterType {
    fn from(filter: ResampleFilter) -> Self {
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Something a confirmed [`CropBox`] can be applied to.
pub trait CropTarget {
    type Output;

    /// `crop` is half-open and already clamped to the target's bounds.
    fn apply_crop(&self, crop: CropBox) -> Self::Output;
}

impl CropTarget for DynamicImage {
    type Output = DynamicImage;

    fn apply_crop(&self, crop: CropBox) -> DynamicImage {
        self.crop_imm(crop.x1, crop.y1, crop.width(), crop.height())
    }
}

/// Preview bitmap at display size. Returns `None` when no resampling is
/// needed and the source can be shown as-is.
pub fn preview_image(
    source: &DynamicImage,
    scale: &ScaleResult,
    filter: ResampleFilter,
) -> Option<DynamicImage> {
    if scale.is_identity() {
        return None;
    }
    Some(source.resize_exact(scale.display_width, scale.display_height, filter.into()))
}

/// Decodes the image at `path`; the format is guessed from its contents.
pub fn open_image(path: &Path) -> Result<DynamicImage> {
    let reader = image::ImageReader::open(path)?.with_guessed_format()?;
    Ok(reader.decode()?)
}

/// Writes `image` to `path`; the format follows the file extension.
pub fn save_image(image: &DynamicImage, path: &Path) -> Result<()> {
    image.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::scale::compute_scale;
    use image::{GenericImageView, Rgba, RgbaImage};
    use tempfile::tempdir;

    fn gradient(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(w, h, |x, y| {
            Rgba([x as u8, y as u8, 0, 255])
        }))
    }

    #[test]
    fn crop_uses_half_open_box() {
        let img = gradient(40, 30);
        let out = img.apply_crop(CropBox {
            x1: 5,
            y1: 7,
            x2: 15,
            y2: 10,
        });
        assert_eq!(out.dimensions(), (10, 3));
        assert_eq!(out.get_pixel(0, 0), Rgba([5, 7, 0, 255]));
        assert_eq!(out.get_pixel(9, 2), Rgba([14, 9, 0, 255]));
    }

    #[test]
    fn preview_skipped_when_image_fits() {
        let img = gradient(40, 30);
        let scale = compute_scale(40, 30, 100, 100);
        assert!(preview_image(&img, &scale, ResampleFilter::Nearest).is_none());
    }

    #[test]
    fn preview_has_display_size() {
        let img = gradient(200, 100);
        let scale = compute_scale(200, 100, 50, 50);
        let preview = preview_image(&img, &scale, ResampleFilter::Triangle).unwrap();
        assert_eq!(preview.dimensions(), (50, 25));
    }

    #[test]
    fn saved_crop_opens_with_same_pixels() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("cropped.png");
        let cropped = gradient(40, 30).apply_crop(CropBox {
            x1: 2,
            y1: 3,
            x2: 12,
            y2: 8,
        });

        save_image(&cropped, &path).expect("failed to save image");
        let loaded = open_image(&path).expect("failed to open image");
        assert_eq!(loaded.dimensions(), (10, 5));
        assert_eq!(loaded.get_pixel(0, 0), Rgba([2, 3, 0, 255]));
    }

    #[test]
    fn open_missing_file_is_io_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let err = open_image(&temp_dir.path().join("absent.png")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn open_garbage_is_image_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("garbage.png");
        std::fs::write(&path, b"definitely not an image").expect("failed to write file");
        let err = open_image(&path).unwrap_err();
        assert!(matches!(err, Error::Image(_)));
    }

    #[test]
    fn save_with_unknown_extension_is_image_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let err = save_image(&gradient(4, 4), &temp_dir.path().join("out.nope")).unwrap_err();
        assert!(matches!(err, Error::Image(_)));
    }
}
