//! Core types for structgen
//!
//! This crate provides the foundational types shared by the dump scanner,
//! the type resolver, and the header renderer.

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
