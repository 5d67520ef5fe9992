use crate::error::Result;
use crate::fetch::{FetchedImage, ImageFormat};
use image::DynamicImage;
use image::imageops::FilterType;
use std::io::Cursor;

/// Linear scale factor applied when enlarging
pub const UPSCALE_FACTOR: u32 = 3;

/// Enlarge an image 3x in RGB and re-encode it in place
///
/// The encoding follows the file extension: png stays png, everything else
/// is written as jpeg.
pub fn upscale(image: &mut FetchedImage) -> Result<()> {
    let decoded = image::load_from_memory(&image.bytes)?;
    let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());

    let width = rgb.width() * UPSCALE_FACTOR;
    let height = rgb.height() * UPSCALE_FACTOR;
    ::log::debug!(
        "Resizing {} from {}x{} to {}x{}",
        image.filename,
        rgb.width(),
        rgb.height(),
        width,
        height
    );
    let resized = rgb.resize_exact(width, height, FilterType::Lanczos3);

    let output_format = match image.format {
        ImageFormat::Png => image::ImageFormat::Png,
        _ => image::ImageFormat::Jpeg,
    };
    let mut buffer = Cursor::new(Vec::new());
    resized.write_to(&mut buffer, output_format)?;
    image.bytes = buffer.into_inner();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use image::{GenericImageView, Rgba, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 128]));
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buffer, image::ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_upscale_png_triples_dimensions() {
        let mut fetched = FetchedImage::new(png_bytes(4, 2), ImageFormat::Png, "red");
        upscale(&mut fetched).unwrap();

        let result = image::load_from_memory(&fetched.bytes).unwrap();
        assert_eq!(result.dimensions(), (12, 6));
        assert_eq!(
            image::guess_format(&fetched.bytes).unwrap(),
            image::ImageFormat::Png
        );
        // Alpha is dropped by the RGB conversion
        assert!(!result.color().has_alpha());
    }

    #[test]
    fn test_upscale_relabeled_format_writes_jpeg() {
        let mut fetched = FetchedImage::new(png_bytes(3, 3), ImageFormat::Jpeg, "webp source");
        upscale(&mut fetched).unwrap();

        assert_eq!(
            image::guess_format(&fetched.bytes).unwrap(),
            image::ImageFormat::Jpeg
        );
        let result = image::load_from_memory(&fetched.bytes).unwrap();
        assert_eq!(result.dimensions(), (9, 9));
    }

    #[test]
    fn test_upscale_rejects_non_image_bytes() {
        let mut fetched = FetchedImage::new(b"<html></html>".to_vec(), ImageFormat::Jpeg, "x");
        let err = upscale(&mut fetched).unwrap_err();
        assert!(matches!(err, ScrapeError::Image(_)));
    }
}
