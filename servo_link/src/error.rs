//! Error types for the servo link library.

use servo_common::config::ConfigError;
use thiserror::Error;

/// Errors raised outside the interrupt path.
#[derive(Debug, Clone, Error)]
pub enum LinkError {
    /// The transmit queue cannot hold the whole command.
    #[error("Transmit queue full: {needed} bytes needed, {free} free")]
    QueueFull { needed: usize, free: usize },

    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The simulated bus did not settle.
    #[error("Simulation error: {0}")]
    Simulation(String),
}
