//! Test fixtures: rendered QR symbols and encoded upload bytes
//!
//! Only compiled for tests or with the `testing` feature.

use std::io::Cursor;

use image::{GrayImage, ImageFormat, Luma};
use qrcode::{Color, QrCode};

const QUIET_ZONE: u32 = 4;

/// Render `text` as a QR symbol, `scale` pixels per module, with a quiet zone.
pub fn render_qr(text: &str, scale: u32) -> GrayImage {
    let code = QrCode::new(text.as_bytes()).expect("text fits in a QR symbol");
    let modules = code.width() as u32;
    let colors = code.to_colors();
    let side = (modules + 2 * QUIET_ZONE) * scale;

    GrayImage::from_fn(side, side, |x, y| {
        let mx = (x / scale).checked_sub(QUIET_ZONE);
        let my = (y / scale).checked_sub(QUIET_ZONE);
        match (mx, my) {
            (Some(mx), Some(my)) if mx < modules && my < modules => {
                match colors[(my * modules + mx) as usize] {
                    Color::Dark => Luma([0]),
                    Color::Light => Luma([255]),
                }
            }
            _ => Luma([255]),
        }
    })
}

pub fn encode_png(img: &GrayImage) -> Vec<u8> {
    encode(img, ImageFormat::Png)
}

pub fn encode_jpeg(img: &GrayImage) -> Vec<u8> {
    encode(img, ImageFormat::Jpeg)
}

/// A valid white PNG with nothing to decode
pub fn blank_png(width: u32, height: u32) -> Vec<u8> {
    encode_png(&GrayImage::from_pixel(width, height, Luma([255])))
}

fn encode(img: &GrayImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format)
        .expect("in-memory encoding succeeds");
    buf
}
