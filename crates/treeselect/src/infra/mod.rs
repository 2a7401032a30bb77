//! Infrastructure adapters for configuration, logging, and outline files.

pub mod config;
pub mod logging;
pub mod outline;
