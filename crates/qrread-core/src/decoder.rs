//! Decoding pipeline: image bytes -> luminance bitmap -> QR text
//!
//! Each stage is exposed separately so its failures can be reported with
//! their own error class; [`RqrrDecoder`] chains them for the HTTP layer.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageReader};

use crate::error::{DecodeError, DecodeResult};

/// Decodes the text of a QR symbol from raw image bytes.
///
/// Implementations must be usable from many requests at once.
pub trait QrDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> DecodeResult<String>;
}

/// Luminance plane of an uploaded image, ready for thresholding
#[derive(Debug, Clone)]
pub struct Bitmap {
    luma: GrayImage,
}

impl Bitmap {
    pub fn width(&self) -> u32 {
        self.luma.width()
    }

    pub fn height(&self) -> u32 {
        self.luma.height()
    }
}

/// Decode image bytes, detecting the format from the stream's own markers.
pub fn load_image(bytes: &[u8]) -> DecodeResult<DynamicImage> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(image::ImageError::IoError)?;

    tracing::debug!(format = ?reader.format(), "Detected image format");

    Ok(reader.decode()?)
}

/// Convert a decoded image into the luminance bitmap the symbol reader needs.
pub fn to_bitmap(img: &DynamicImage) -> DecodeResult<Bitmap> {
    if img.width() == 0 || img.height() == 0 {
        return Err(DecodeError::Bitmap(format!(
            "cannot build bitmap from {}x{} image",
            img.width(),
            img.height()
        )));
    }

    Ok(Bitmap {
        luma: img.to_luma8(),
    })
}

/// Locate and decode a QR symbol with default options.
///
/// Every detected grid is tried in order and the first decoded text is
/// returned. If all grids fail, the first grid's error is reported.
pub fn read_symbol(bitmap: &Bitmap) -> DecodeResult<String> {
    let luma = &bitmap.luma;
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        luma.width() as usize,
        luma.height() as usize,
        |x, y| luma.get_pixel(x as u32, y as u32)[0],
    );

    let grids = prepared.detect_grids();
    tracing::debug!(grids = grids.len(), "Detected candidate symbols");

    let mut first_err = None;
    for grid in &grids {
        match grid.decode() {
            Ok((_meta, content)) => return Ok(content),
            Err(e) => {
                tracing::debug!(error = %e, "Candidate symbol failed to decode");
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
    }

    Err(match first_err {
        Some(e) => DecodeError::Symbol(e.to_string()),
        None => DecodeError::Symbol("no QR code found in image".to_string()),
    })
}

/// Production decoder backed by the `image` and `rqrr` crates
#[derive(Debug, Default, Clone, Copy)]
pub struct RqrrDecoder;

impl RqrrDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl QrDecoder for RqrrDecoder {
    fn decode(&self, bytes: &[u8]) -> DecodeResult<String> {
        let img = load_image(bytes)?;
        let bitmap = to_bitmap(&img)?;
        read_symbol(&bitmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{blank_png, encode_jpeg, encode_png, render_qr};
    use rstest::rstest;

    #[rstest]
    #[case("https://example.com/test")]
    #[case("Hello, world!")]
    #[case("0123456789")]
    fn decodes_png_symbols(#[case] text: &str) {
        let png = encode_png(&render_qr(text, 8));
        assert_eq!(RqrrDecoder::new().decode(&png).unwrap(), text);
    }

    #[test]
    fn decodes_jpeg_symbols() {
        let jpeg = encode_jpeg(&render_qr("jpeg payload", 10));
        assert_eq!(RqrrDecoder::new().decode(&jpeg).unwrap(), "jpeg payload");
    }

    #[test]
    fn format_is_sniffed_not_named() {
        let png = encode_png(&render_qr("sniffed", 8));
        let img = load_image(&png).unwrap();
        assert_eq!(img.width(), img.height());
    }

    #[test]
    fn garbage_bytes_are_image_errors() {
        let err = RqrrDecoder::new().decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, DecodeError::Image(_)));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn truncated_png_is_image_error() {
        let png = encode_png(&render_qr("truncated", 8));
        let err = RqrrDecoder::new().decode(&png[..png.len() / 2]).unwrap_err();
        assert!(matches!(err, DecodeError::Image(_)));
    }

    #[test]
    fn empty_image_is_bitmap_error() {
        let img = DynamicImage::new_luma8(0, 0);
        let err = to_bitmap(&img).unwrap_err();
        assert!(matches!(err, DecodeError::Bitmap(_)));
    }

    #[test]
    fn blank_image_has_no_symbol() {
        let err = RqrrDecoder::new().decode(&blank_png(64, 64)).unwrap_err();
        assert!(matches!(err, DecodeError::Symbol(_)));
        assert_eq!(err.status_code(), 400);
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn damaged_symbol_reports_decoder_error() {
        let scale = 8;
        let mut img = render_qr("damaged", scale);
        // Invert the bottom-right data area, clear of all finder patterns
        let quiet = 4;
        for my in 10..20 {
            for mx in 10..20 {
                for dy in 0..scale {
                    for dx in 0..scale {
                        let x = (quiet + mx) * scale + dx;
                        let y = (quiet + my) * scale + dy;
                        let px = img.get_pixel_mut(x, y);
                        px[0] = 255 - px[0];
                    }
                }
            }
        }

        let bitmap = to_bitmap(&DynamicImage::ImageLuma8(img)).unwrap();
        let err = read_symbol(&bitmap).unwrap_err();

        assert!(matches!(err, DecodeError::Symbol(_)));
        assert_eq!(err.status_code(), 400);
        assert_ne!(err.to_string(), "no QR code found in image");
    }

    #[test]
    fn first_of_several_symbols_wins() {
        let left = render_qr("left", 8);
        let right = render_qr("right", 8);
        let mut canvas = GrayImage::from_pixel(
            left.width() + right.width(),
            left.height().max(right.height()),
            image::Luma([255]),
        );
        image::imageops::replace(&mut canvas, &left, 0, 0);
        image::imageops::replace(&mut canvas, &right, left.width() as i64, 0);

        let bitmap = to_bitmap(&DynamicImage::ImageLuma8(canvas)).unwrap();
        assert_eq!(read_symbol(&bitmap).unwrap(), "left");
    }

    #[test]
    fn bitmap_keeps_dimensions() {
        let img = DynamicImage::new_rgb8(30, 20);
        let bitmap = to_bitmap(&img).unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (30, 20));
    }
}
