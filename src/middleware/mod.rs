//! Middleware module
//!
//! Request logging shared by all routes

pub mod logging;
