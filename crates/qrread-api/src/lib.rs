//! qrread-api - REST API layer for the QR reading service
//!
//! Exposes the upload endpoint that decodes a QR symbol from an image and the
//! base route used for reachability checks. Decoding itself is delegated to a
//! [`qrread_core::QrDecoder`] held in [`AppState`].
//!
//! # Usage
//!
//! ```ignore
//! use qrread_api::{create_router, AppState};
//!
//! let router = create_router(AppState::default());
//! axum::serve(listener, router).await?;
//! ```

pub mod error;
pub mod handlers;
pub mod response;
pub mod state;

pub use error::ApiError;
pub use response::QrResponse;
pub use state::{AppState, MAX_UPLOAD_SIZE};

use axum::extract::DefaultBodyLimit;
use axum::routing::any;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Path of the QR upload endpoint
pub const READ_PATH: &str = "/api/v1/read";

/// Create the REST API router with the given application state
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Reachability check
        .route("/", any(handlers::root::base))
        // QR upload; non-multipart requests fail as parse errors
        .route(
            READ_PATH,
            any(handlers::read::read_qr_code)
                .layer(DefaultBodyLimit::max(state.max_upload_bytes())),
        )
        .fallback(handlers::root::base)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
