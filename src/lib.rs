//! Bookshelf application library
//!
//! Project modules plus the bootstrap that wires them into the HTTP server.

pub mod app;
pub mod modules;

/// Re-export commonly used types
pub use modules::*;
