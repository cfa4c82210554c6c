//! # Configuration
//!
//! Configuration structures shared by the Courier web client and its tests.

pub mod thread_view;

pub use thread_view::{ConfigError, ThreadViewConfig};
