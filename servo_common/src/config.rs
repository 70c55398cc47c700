//! Configuration loading traits and types.
//!
//! This module provides a standardized way to load TOML configuration files
//! for the servo link tools, plus the bus configuration shared by both ends
//! of the link.
//!
//! # Usage
//!
//! ```rust,no_run
//! use servo_common::config::{BusConfig, ConfigError, ConfigLoader, SharedConfig};
//! use serde::Deserialize;
//! use std::path::Path;
//!
//! #[derive(Debug, Deserialize)]
//! struct MyAppConfig {
//!     shared: SharedConfig,
//!     bus: BusConfig,
//! }
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = MyAppConfig::load(Path::new("servo_link.toml"))?;
//!     config.bus.validate()?;
//!     println!("Service: {}", config.shared.service_name);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::bus::{Encoding, LocalAddressMask};
use crate::consts::{
    DEFAULT_LOCAL_ADDRESS_BITS, DEFAULT_PWM_PERIOD, SLAVE_ADDRESS, SLAVE_ADDRESS_MASK,
};

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

impl LogLevel {
    /// Directive string understood by `EnvFilter`.
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Common configuration fields shared across all servo link tools.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "servo-link-sim"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Application instance identifier.
    pub service_name: String,
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// How a responder hands completed write commands to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    /// Invoke the registered handler from the bus interrupt.
    #[default]
    Synchronous,
    /// Push the command on the receive queue; the main loop drains it.
    Queued,
}

/// Bus protocol configuration shared by both ends of the link.
///
/// # TOML Example
///
/// ```toml
/// [bus]
/// encoding = "three_byte"
/// delivery = "queued"
/// local_address_bits = 1
/// slave_address = 12
/// address_mask = 252
/// pwm_period = 200
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BusConfig {
    /// Wire encoding (2 or 3 fields per command).
    #[serde(default)]
    pub encoding: Encoding,

    /// Command delivery mode on the responder.
    #[serde(default)]
    pub delivery: Delivery,

    /// Width of the local sub-address (1 or 2 bits).
    #[serde(default = "default_local_address_bits")]
    pub local_address_bits: u8,

    /// Base address byte of the responder (direction bit clear).
    #[serde(default = "default_slave_address")]
    pub slave_address: u8,

    /// Address match mask of the responder.
    #[serde(default = "default_address_mask")]
    pub address_mask: u8,

    /// PWM period register value; compare values never exceed it.
    #[serde(default = "default_pwm_period")]
    pub pwm_period: u8,
}

fn default_local_address_bits() -> u8 {
    DEFAULT_LOCAL_ADDRESS_BITS
}

fn default_slave_address() -> u8 {
    SLAVE_ADDRESS
}

fn default_address_mask() -> u8 {
    SLAVE_ADDRESS_MASK
}

fn default_pwm_period() -> u8 {
    DEFAULT_PWM_PERIOD
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            encoding: Encoding::default(),
            delivery: Delivery::default(),
            local_address_bits: DEFAULT_LOCAL_ADDRESS_BITS,
            slave_address: SLAVE_ADDRESS,
            address_mask: SLAVE_ADDRESS_MASK,
            pwm_period: DEFAULT_PWM_PERIOD,
        }
    }
}

impl BusConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - `local_address_bits` is not 1 or 2
    /// - `slave_address` has the direction bit set
    /// - `address_mask` would leave fewer address bits free than the local
    ///   sub-address needs
    /// - `pwm_period` is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        let local = LocalAddressMask::new(self.local_address_bits).ok_or_else(|| {
            ConfigError::ValidationError(format!(
                "local_address_bits must be 1 or 2, got {}",
                self.local_address_bits
            ))
        })?;

        if self.slave_address & 1 != 0 {
            return Err(ConfigError::ValidationError(format!(
                "slave_address {:#04x} must have the direction bit clear",
                self.slave_address
            )));
        }

        let local_bits_on_wire = local.mask() << 1;
        if self.address_mask & local_bits_on_wire != 0 {
            return Err(ConfigError::ValidationError(format!(
                "address_mask {:#04x} compares the local sub-address bits {:#04x}",
                self.address_mask, local_bits_on_wire
            )));
        }

        if self.pwm_period == 0 {
            return Err(ConfigError::ValidationError(
                "pwm_period must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Local sub-address mask. Falls back to one bit for an unvalidated width.
    pub fn local_mask(&self) -> LocalAddressMask {
        LocalAddressMask::new(self.local_address_bits).unwrap_or_default()
    }
}

/// Trait for loading configuration from TOML files.
///
/// This trait provides a default implementation that works with any type
/// implementing `serde::de::DeserializeOwned`.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_default() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }

    #[test]
    fn test_log_level_deserialization() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct TestWrapper {
            level: LogLevel,
        }

        for (text, level) in [
            ("trace", LogLevel::Trace),
            ("debug", LogLevel::Debug),
            ("info", LogLevel::Info),
            ("warn", LogLevel::Warn),
            ("error", LogLevel::Error),
        ] {
            let parsed = TestWrapper::from_toml(&format!("level = \"{text}\"")).unwrap();
            assert_eq!(parsed.level, level);
            assert_eq!(level.as_directive(), text);
        }
    }

    #[test]
    fn test_shared_config_validation() {
        let mut config = SharedConfig {
            log_level: LogLevel::Info,
            service_name: "servo-link".to_string(),
        };
        assert!(config.validate().is_ok());

        config.service_name.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_bus_config_defaults_are_valid() {
        let config = BusConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.encoding, Encoding::TwoByte);
        assert_eq!(config.delivery, Delivery::Synchronous);
        assert_eq!(config.local_mask(), LocalAddressMask::ONE_BIT);
    }

    #[test]
    fn test_bus_config_rejects_bad_local_bits() {
        let config = BusConfig {
            local_address_bits: 3,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_bus_config_rejects_read_base_address() {
        let config = BusConfig {
            slave_address: 0x0D,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bus_config_rejects_mask_over_local_bits() {
        // Two local bits need wire bits 1 and 2 free; 0xFC compares bit 2.
        let config = BusConfig {
            local_address_bits: 2,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = BusConfig {
            local_address_bits: 2,
            address_mask: 0xF8,
            slave_address: 0x08,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bus_config_rejects_zero_period() {
        let config = BusConfig {
            pwm_period: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bus_config_from_toml() {
        let config = BusConfig::from_toml(
            r#"
encoding = "three_byte"
delivery = "queued"
"#,
        )
        .unwrap();
        assert_eq!(config.encoding, Encoding::ThreeByte);
        assert_eq!(config.delivery, Delivery::Queued);
        assert_eq!(config.slave_address, SLAVE_ADDRESS);
        assert_eq!(config.pwm_period, DEFAULT_PWM_PERIOD);
    }

    #[test]
    fn test_bus_config_rejects_unknown_fields() {
        let result = BusConfig::from_toml("baud = 9600");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
