//! HTTP request handlers

pub mod read;
pub mod root;
