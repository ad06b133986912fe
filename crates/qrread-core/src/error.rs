//! Error types for the decoding pipeline

use thiserror::Error;

/// Result type for decoding operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors raised while turning uploaded bytes into QR text
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Bytes are not a supported or intact image
    #[error("{0}")]
    Image(#[from] image::ImageError),

    /// Image could not be prepared as a binary bitmap
    #[error("{0}")]
    Bitmap(String),

    /// No QR symbol found, or the symbol could not be decoded
    #[error("{0}")]
    Symbol(String),
}

impl DecodeError {
    /// Returns the HTTP status code reported for this error
    pub fn status_code(&self) -> u16 {
        match self {
            DecodeError::Image(_) => 500,
            DecodeError::Bitmap(_) => 500,
            DecodeError::Symbol(_) => 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_errors_are_client_errors() {
        let err = DecodeError::Symbol("no QR code found in image".into());
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "no QR code found in image");
    }

    #[test]
    fn bitmap_errors_are_server_errors() {
        assert_eq!(DecodeError::Bitmap("empty".into()).status_code(), 500);
    }

    #[test]
    fn image_errors_are_server_errors() {
        let err = DecodeError::from(image::ImageError::Unsupported(
            image::error::UnsupportedError::from_format_and_kind(
                image::error::ImageFormatHint::Unknown,
                image::error::UnsupportedErrorKind::Format(image::error::ImageFormatHint::Unknown),
            ),
        ));
        assert_eq!(err.status_code(), 500);
    }
}
