//! Service-specific client implementations
//!
//! This module contains the HTTP client for the question-answering backend.

pub mod common;
pub mod query;

pub use common::UserAgent;
