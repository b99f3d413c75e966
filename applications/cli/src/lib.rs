//! Outport command line player
//!
//! Configuration loading and the test-tone source used by the `outport`
//! binary.

pub mod config;
pub mod error;
pub mod tone;

pub use self::config::{AppConfig, ToneSettings};
pub use error::{AppError, Result};
pub use tone::SineTone;
