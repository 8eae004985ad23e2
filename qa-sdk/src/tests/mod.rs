//! Unit tests for the QA SDK
//!
//! This module contains tests for various components of the SDK.

pub mod config_tests;
pub mod query_mock_tests;
