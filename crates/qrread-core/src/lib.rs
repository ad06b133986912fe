//! qrread-core - QR decoding pipeline for the qrread service
//!
//! Turns raw uploaded bytes into the text of a QR symbol in three stages:
//! image decoding, bitmap preparation and symbol reading. The HTTP layer only
//! sees the [`QrDecoder`] trait, so alternative decoders can be swapped in.
//!
//! # Usage
//!
//! ```ignore
//! use qrread_core::{QrDecoder, RqrrDecoder};
//!
//! let text = RqrrDecoder::new().decode(&png_bytes)?;
//! ```

pub mod decoder;
pub mod error;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use decoder::{load_image, read_symbol, to_bitmap, Bitmap, QrDecoder, RqrrDecoder};
pub use error::{DecodeError, DecodeResult};
