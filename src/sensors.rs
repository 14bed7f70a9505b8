pub mod decode;
pub mod fields;
pub mod mcp9600;

pub use fields::{
    AdcResolution, AlertConfiguration, ColdJunctionResolution, DeviceConfiguration, DeviceId,
    SensorConfiguration, ShutdownMode, Status, ThermocoupleType,
};
pub use mcp9600::Mcp9600;

/// One polling sample from a thermocouple channel, all values in °C
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ThermocoupleFrame {
    pub hot_junction: f32,
    pub junction_delta: f32,
    pub cold_junction: f32,
    pub status: Status,
}
