//! Servo Link Common Library
//!
//! This crate provides the wire vocabulary, shared constants and configuration
//! loading utilities used by every crate of the servo link workspace.
//!
//! # Module Structure
//!
//! - [`bus`] - Addresses, command kinds, commands and bus events
//! - [`config`] - Configuration loading traits and types
//! - [`consts`] - Protocol limits and default values
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use servo_common::bus::{Address, Command};
//! use servo_common::config::{BusConfig, ConfigLoader};
//! ```

pub mod bus;
pub mod config;
pub mod consts;
pub mod prelude;
