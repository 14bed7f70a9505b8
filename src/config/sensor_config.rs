use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::time::Duration;

use crate::errors::{ConfigError, ConfigResult};
use crate::registers::{Alert, DEFAULT_ADDRESS};
use crate::sensors::{AlertConfiguration, DeviceConfiguration, SensorConfiguration};

pub const DEFAULT_TIMEOUT_MS: u64 = crate::bus::DEFAULT_TIMEOUT.as_millis() as u64;
pub const DEFAULT_FREQUENCY_HZ: u32 = 4;
/// The fastest ADC setting converts in about 5 ms, so polling faster only repeats readings
pub const MAX_FREQUENCY_HZ: u32 = 1000;

/// Root configuration struct expecting `[[sensor]]` TOML array format
#[derive(Debug, Deserialize)]
pub struct SensorConfig {
    #[serde(rename = "sensor")]
    pub sensors: Vec<SensorEntry>,
}

/// One sensor entry, matching each `[[sensor]]` section
#[derive(Debug, Clone, Deserialize)]
pub struct SensorEntry {
    pub id: String,
    /// I2C character device, e.g. `/dev/i2c-1`
    pub bus: String,
    #[serde(default = "default_address")]
    pub address: u8,
    /// Per-call budget checked after the transfer returns, not a hard bound
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Poll rate in Hz
    pub frequency: Option<u32>,
    /// Raw THERMOCOUPLE SENSOR CONFIGURATION byte written at start-up
    pub sensor_config: Option<u8>,
    /// `[sensor.thermocouple]`, the same register as named fields
    pub thermocouple: Option<SensorConfiguration>,
    /// Raw DEVICE CONFIGURATION byte written at start-up
    pub device_config: Option<u8>,
    /// `[sensor.device]`, the same register as named fields
    pub device: Option<DeviceConfiguration>,
    #[serde(default, rename = "alert")]
    pub alerts: Vec<AlertEntry>,
}

/// `[[sensor.alert]]` section
#[derive(Debug, Clone, Deserialize)]
pub struct AlertEntry {
    /// 1 to 4
    pub channel: u8,
    pub limit_celsius: Option<f32>,
    pub hysteresis: Option<u8>,
    pub config: Option<u8>,
    /// `[sensor.alert.settings]`, alternative to the raw `config` byte
    pub settings: Option<AlertConfiguration>,
}

fn default_address() -> u8 {
    DEFAULT_ADDRESS
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl SensorEntry {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn frequency(&self) -> u32 {
        self.frequency.unwrap_or(DEFAULT_FREQUENCY_HZ)
    }

    /// Never zero, even for a frequency `validate` would reject
    pub fn poll_period(&self) -> Duration {
        let frequency = u64::from(self.frequency().clamp(1, MAX_FREQUENCY_HZ));
        Duration::from_micros(1_000_000 / frequency)
    }

    /// Byte for register 0x05, from either the raw value or the table
    pub fn sensor_register(&self) -> Option<u8> {
        self.sensor_config
            .or_else(|| self.thermocouple.map(SensorConfiguration::to_register))
    }

    /// Byte for register 0x06, from either the raw value or the table
    pub fn device_register(&self) -> Option<u8> {
        self.device_config
            .or_else(|| self.device.map(DeviceConfiguration::to_register))
    }
}

impl AlertEntry {
    pub fn alert(&self) -> Option<Alert> {
        Alert::from_channel(self.channel)
    }

    pub fn config_register(&self) -> Option<u8> {
        self.config
            .or_else(|| self.settings.map(AlertConfiguration::to_register))
    }
}

impl SensorConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        let mut ids = HashSet::new();
        for s in &self.sensors {
            let field = |name: &str| format!("sensor.{}.{}", s.id, name);

            if !ids.insert(s.id.as_str()) {
                return Err(invalid(format!("sensor.{}", s.id), "duplicate sensor id"));
            }
            if s.address > 0x7F {
                return Err(invalid(field("address"), "not a 7-bit I2C address"));
            }
            if s.timeout_ms == 0 {
                return Err(invalid(field("timeout_ms"), "must be greater than zero"));
            }
            if s.frequency == Some(0) {
                return Err(invalid(field("frequency"), "must be greater than zero"));
            }
            if s.frequency() > MAX_FREQUENCY_HZ {
                return Err(invalid(field("frequency"), "must be at most 1000 Hz"));
            }
            if s.sensor_config.is_some() && s.thermocouple.is_some() {
                return Err(invalid(field("thermocouple"), "conflicts with sensor_config"));
            }
            if s.thermocouple.is_some_and(|t| t.filter > 7) {
                return Err(invalid(field("thermocouple.filter"), "must be between 0 and 7"));
            }
            if s.device_config.is_some() && s.device.is_some() {
                return Err(invalid(field("device"), "conflicts with device_config"));
            }
            if s.device.is_some_and(|d| d.burst_samples_log2 > 7) {
                return Err(invalid(field("device.burst_samples_log2"), "must be between 0 and 7"));
            }
            for a in &s.alerts {
                if a.alert().is_none() {
                    return Err(invalid(field("alert.channel"), "must be between 1 and 4"));
                }
                if a.config.is_some() && a.settings.is_some() {
                    return Err(invalid(field("alert.settings"), "conflicts with config"));
                }
            }
        }
        Ok(())
    }
}

fn invalid(field: String, reason: &str) -> ConfigError {
    ConfigError::InvalidValue { field, reason: reason.to_string() }
}

/// Parses and validates TOML sensor configuration
pub fn parse_sensor_config(content: &str) -> ConfigResult<SensorConfig> {
    let parsed: SensorConfig = toml::from_str(content)?;
    parsed.validate()?;
    Ok(parsed)
}

/// Loads config from TOML file
pub fn load_sensor_config(path: &str) -> ConfigResult<SensorConfig> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::LoadError {
        path: path.to_string(),
        source,
    })?;
    parse_sensor_config(&content)
}
