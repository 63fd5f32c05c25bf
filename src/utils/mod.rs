//! Utilities module
//!
//! Contains error handling and text helpers

pub mod error;
pub mod text;
