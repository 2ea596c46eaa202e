//! Configuration module for mdedit
//!
//! This module handles user preferences, their JSON serialization, and
//! persistent storage in platform-specific directories.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
