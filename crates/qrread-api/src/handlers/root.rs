//! Base route

/// ANY /
/// Fixed plaintext body used for reachability checks
pub async fn base() -> &'static str {
    "Base"
}
