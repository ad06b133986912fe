//! API error types and conversions

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use qrread_core::DecodeError;

use crate::response::json_error;

/// Message returned when the form has no `file` part
pub const MISSING_FILE_MESSAGE: &str = "Error Retrieving the File";

/// API error type that converts to JSON error responses
#[derive(Debug)]
pub enum ApiError {
    /// 500 - body is not a readable multipart form (includes oversize bodies)
    MultipartParse(String),
    /// 400 - form parsed but has no `file` part
    MissingFile,
    /// 400 or 500 depending on the decoding stage that failed
    Decode(DecodeError),
    /// 500 Internal Server Error
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MultipartParse(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MissingFile => StatusCode::BAD_REQUEST,
            ApiError::Decode(err) => StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::MultipartParse(_) => "multipart_parse",
            ApiError::MissingFile => "missing_file",
            ApiError::Decode(DecodeError::Image(_)) => "image_decode",
            ApiError::Decode(DecodeError::Bitmap(_)) => "bitmap_conversion",
            ApiError::Decode(DecodeError::Symbol(_)) => "symbol_decode",
            ApiError::Internal(_) => "internal_error",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::MultipartParse(msg) => format!("Could not parse multipart form: {}", msg),
            ApiError::MissingFile => MISSING_FILE_MESSAGE.to_string(),
            ApiError::Decode(err) => err.to_string(),
            ApiError::Internal(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        // Log errors at appropriate levels
        if status.is_server_error() {
            tracing::error!(error = self.kind(), %message, "API error");
        } else if status.is_client_error() {
            tracing::debug!(error = self.kind(), %message, "API client error");
        }

        json_error(message, status)
    }
}

impl From<DecodeError> for ApiError {
    fn from(err: DecodeError) -> Self {
        ApiError::Decode(err)
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::MultipartParse(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::MultipartParse(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ApiError::MultipartParse("bad boundary".into()), 500)]
    #[case(ApiError::MissingFile, 400)]
    #[case(ApiError::Decode(DecodeError::Bitmap("empty".into())), 500)]
    #[case(ApiError::Decode(DecodeError::Symbol("not found".into())), 400)]
    #[case(ApiError::Internal("join".into()), 500)]
    fn status_codes(#[case] err: ApiError, #[case] expected: u16) {
        assert_eq!(err.status_code().as_u16(), expected);
    }

    #[test]
    fn missing_file_message_is_fixed() {
        assert_eq!(ApiError::MissingFile.message(), "Error Retrieving the File");
    }

    #[test]
    fn parse_errors_carry_cause() {
        let err = ApiError::MultipartParse("stream ended early".into());
        assert_eq!(
            err.message(),
            "Could not parse multipart form: stream ended early"
        );
    }

    #[test]
    fn decode_errors_pass_message_through() {
        let err = ApiError::from(DecodeError::Symbol("no QR code found in image".into()));
        assert_eq!(err.message(), "no QR code found in image");
    }
}
