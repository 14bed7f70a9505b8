use embedded_hal::i2c::ErrorKind;
use thiserror::Error;

use crate::registers::RegisterGroup;

/// Failure of a single transport call (one `transmit` or one `receive`)
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    #[error("I2C transfer with device {address:#04x} failed: {kind}")]
    Transfer { address: u8, kind: ErrorKind },

    #[error("I2C transfer with device {address:#04x} exceeded {timeout_ms}ms timeout")]
    Timeout { address: u8, timeout_ms: u64 },
}

/// Driver-level errors for the MCP9600
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SensorError {
    #[error("I2C communication failed: {0}")]
    Bus(#[from] BusError),

    #[error("register {register:#04x} is not a {group} register")]
    InvalidRegister { register: u8, group: RegisterGroup },

    #[error("register {register:#04x} read back {actual:#06x} after writing {expected:#06x}")]
    ReadbackMismatch { register: u8, expected: u16, actual: u16 },

    #[error("wrong chip ID: expected {expected:#04x}, got {actual:#04x}")]
    WrongChipId { expected: u8, actual: u8 },

    #[error("temperature {celsius}°C is outside the register range {min}..={max}°C")]
    TemperatureOutOfRange { celsius: f32, min: f32, max: f32 },
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from '{path}': {source}")]
    LoadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration format: {0}")]
    FormatError(#[from] toml::de::Error),

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Bring-up errors raised while opening buses and configuring sensors
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Configuration failed: {0}")]
    Config(#[from] ConfigError),

    #[error("Bus '{bus}' could not be opened: {reason}")]
    BusOpen { bus: String, reason: String },

    #[error("Sensor '{sensor}' {stage} failed: {source}")]
    Sensor {
        sensor: String,
        stage: &'static str,
        #[source]
        source: SensorError,
    },
}

/// Result type aliases for convenience
pub type BusResult<T> = Result<T, BusError>;
pub type SensorResult<T> = Result<T, SensorError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type RegistryResult<T> = Result<T, RegistryError>;
