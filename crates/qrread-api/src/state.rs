//! Application state for the API

use std::sync::Arc;

use qrread_core::{QrDecoder, RqrrDecoder};

/// Largest accepted request body for uploads (10 MiB)
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    decoder: Arc<dyn QrDecoder>,
    max_upload_bytes: usize,
}

impl AppState {
    /// Create a new AppState with the given decoder and the default upload limit
    pub fn new(decoder: Arc<dyn QrDecoder>) -> Self {
        Self::with_upload_limit(decoder, MAX_UPLOAD_SIZE)
    }

    /// Create a new AppState with an explicit upload limit in bytes
    pub fn with_upload_limit(decoder: Arc<dyn QrDecoder>, max_upload_bytes: usize) -> Self {
        Self {
            decoder,
            max_upload_bytes,
        }
    }

    pub fn decoder(&self) -> Arc<dyn QrDecoder> {
        self.decoder.clone()
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(RqrrDecoder::new()))
    }
}
