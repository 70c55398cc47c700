//! Simulation configuration.

use serde::{Deserialize, Serialize};
use servo_common::config::{BusConfig, ConfigError, SharedConfig};

/// Top-level configuration file of the `servo_link` binary.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// service_name = "servo-link-sim"
///
/// [bus]
/// encoding = "two_byte"
///
/// [simulation]
/// periods = 500
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    pub shared: SharedConfig,
    #[serde(default)]
    pub bus: BusConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl LinkConfig {
    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError::ValidationError` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.bus.validate()?;
        self.simulation.validate()
    }
}

/// Synthetic potentiometer: a triangle wave between `offset` and
/// `offset + amplitude`, moving `step` counts per sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaveformConfig {
    #[serde(default = "default_amplitude")]
    pub amplitude: u8,
    #[serde(default = "default_offset")]
    pub offset: u8,
    #[serde(default = "default_step")]
    pub step: u8,
}

fn default_amplitude() -> u8 {
    100
}

fn default_offset() -> u8 {
    50
}

fn default_step() -> u8 {
    5
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            amplitude: default_amplitude(),
            offset: default_offset(),
            step: default_step(),
        }
    }
}

impl WaveformConfig {
    /// Sample number `n` of the wave.
    pub fn sample(&self, n: u32) -> u8 {
        if self.amplitude == 0 || self.step == 0 {
            return self.offset;
        }
        let span = u32::from(self.amplitude);
        let pos = (n.wrapping_mul(u32::from(self.step))) % (2 * span);
        let level = if pos <= span { pos } else { 2 * span - pos };
        self.offset.saturating_add(level as u8)
    }
}

/// Simulation schedule, counted in PWM periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// PWM periods to simulate.
    #[serde(default = "default_periods")]
    pub periods: u32,
    /// Periods between two master samples.
    #[serde(default = "default_sample_interval")]
    pub sample_interval: u32,
    /// Periods between two remote potentiometer reads.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u32,
    /// Periods between two button presses toggling the target servo.
    #[serde(default = "default_toggle_interval")]
    pub toggle_interval: u32,
    #[serde(default)]
    pub waveform: WaveformConfig,
}

fn default_periods() -> u32 {
    500
}

fn default_sample_interval() -> u32 {
    10
}

fn default_poll_interval() -> u32 {
    25
}

fn default_toggle_interval() -> u32 {
    40
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            periods: default_periods(),
            sample_interval: default_sample_interval(),
            poll_interval: default_poll_interval(),
            toggle_interval: default_toggle_interval(),
            waveform: WaveformConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if an interval is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("sample_interval", self.sample_interval),
            ("poll_interval", self.poll_interval),
            ("toggle_interval", self.toggle_interval),
        ] {
            if value == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be non-zero"
                )));
            }
        }
        Ok(())
    }
}
