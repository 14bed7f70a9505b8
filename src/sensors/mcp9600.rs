use tracing::{debug, warn};

use super::decode::{decode_adc, decode_temperature, encode_alert_limit};
use super::fields::{DeviceId, Status};
use super::ThermocoupleFrame;
use crate::bus::Transport;
use crate::errors::{SensorError, SensorResult};
use crate::registers::{Alert, Register, RegisterGroup, DEVICE_ID_MCP9600, DEVICE_ID_MCP9601};

/// MCP9600 thermocouple EMF to temperature converter
///
/// Every method is one independent exchange: write the register pointer
/// (with payload for setters), then read the register width. Setters read
/// the register back and fail unless it holds exactly what was written.
pub struct Mcp9600<T> {
    bus: T,
}

impl<T: Transport> Mcp9600<T> {
    pub fn new(bus: T) -> Self {
        Self { bus }
    }

    /// Give back the transport
    pub fn release(self) -> T {
        self.bus
    }

    /// Hot-junction (thermocouple) temperature in °C
    pub fn read_thermocouple_temperature(&mut self) -> SensorResult<f32> {
        self.read_temperature(Register::ThermocoupleTemperature)
    }

    /// Junction temperature delta (hot minus cold) in °C
    pub fn read_junction_temperature(&mut self) -> SensorResult<f32> {
        self.read_temperature(Register::JunctionTemperature)
    }

    /// Cold-junction (ambient) temperature in °C
    pub fn read_cold_junction_temperature(&mut self) -> SensorResult<f32> {
        self.read_temperature(Register::ColdJunctionTemperature)
    }

    /// Signed 24-bit raw ADC code
    pub fn read_raw_adc(&mut self) -> SensorResult<i32> {
        let bytes = self.read_register::<3>(Register::RawAdc)?;
        Ok(decode_adc(bytes))
    }

    pub fn read_status(&mut self) -> SensorResult<u8> {
        let [reg] = self.read_register::<1>(Register::Status)?;
        Ok(reg)
    }

    pub fn read_status_flags(&mut self) -> SensorResult<Status> {
        self.read_status().map(Status::from_register)
    }

    pub fn read_sensor_config(&mut self) -> SensorResult<u8> {
        let [reg] = self.read_register::<1>(Register::SensorConfig)?;
        Ok(reg)
    }

    pub fn set_sensor_config(&mut self, value: u8) -> SensorResult<()> {
        self.write_verified(RegisterGroup::SensorConfig, Register::SensorConfig.addr(), [value])
    }

    pub fn read_device_config(&mut self) -> SensorResult<u8> {
        let [reg] = self.read_register::<1>(Register::DeviceConfig)?;
        Ok(reg)
    }

    pub fn set_device_config(&mut self, value: u8) -> SensorResult<()> {
        self.write_verified(RegisterGroup::DeviceConfig, Register::DeviceConfig.addr(), [value])
    }

    /// Alert limit in °C; `register` must be one of 0x10..=0x13
    pub fn read_alert_limit(&mut self, register: u8) -> SensorResult<f32> {
        let register = RegisterGroup::AlertLimit.validate(register)?;
        self.read_temperature(register)
    }

    /// Write a raw 16-bit alert limit, most significant byte first
    pub fn set_alert_limit(&mut self, register: u8, value: u16) -> SensorResult<()> {
        self.write_verified(RegisterGroup::AlertLimit, register, value.to_be_bytes())
    }

    /// Write an alert limit in °C, rounded to the register's 0.25 °C step
    pub fn set_alert_limit_celsius(&mut self, alert: Alert, celsius: f32) -> SensorResult<()> {
        let bytes = encode_alert_limit(celsius)?;
        self.write_verified(RegisterGroup::AlertLimit, alert.limit_register().addr(), bytes)
    }

    /// `register` must be one of 0x0C..=0x0F
    pub fn read_alert_hysteresis(&mut self, register: u8) -> SensorResult<u8> {
        let register = RegisterGroup::AlertHysteresis.validate(register)?;
        let [reg] = self.read_register::<1>(register)?;
        Ok(reg)
    }

    pub fn set_alert_hysteresis(&mut self, register: u8, value: u8) -> SensorResult<()> {
        self.write_verified(RegisterGroup::AlertHysteresis, register, [value])
    }

    /// `register` must be one of 0x08..=0x0B
    pub fn read_alert_config(&mut self, register: u8) -> SensorResult<u8> {
        let register = RegisterGroup::AlertConfig.validate(register)?;
        let [reg] = self.read_register::<1>(register)?;
        Ok(reg)
    }

    pub fn set_alert_config(&mut self, register: u8, value: u8) -> SensorResult<()> {
        self.write_verified(RegisterGroup::AlertConfig, register, [value])
    }

    /// Raw device ID register: id byte in the high half, revision in the low
    pub fn read_device_id(&mut self) -> SensorResult<u16> {
        let bytes = self.read_register::<2>(Register::DeviceId)?;
        Ok(u16::from_be_bytes(bytes))
    }

    /// Check that an MCP9600 or MCP9601 answers at this address
    pub fn probe(&mut self) -> SensorResult<DeviceId> {
        let id = DeviceId::from_register(self.read_device_id()?);
        if id.id != DEVICE_ID_MCP9600 && id.id != DEVICE_ID_MCP9601 {
            return Err(SensorError::WrongChipId {
                expected: DEVICE_ID_MCP9600,
                actual: id.id,
            });
        }
        debug!(id = id.id, revision = id.revision, "MCP960x detected");
        Ok(id)
    }

    /// Read the three temperatures and the status byte
    pub fn read_frame(&mut self) -> SensorResult<ThermocoupleFrame> {
        Ok(ThermocoupleFrame {
            hot_junction: self.read_thermocouple_temperature()?,
            junction_delta: self.read_junction_temperature()?,
            cold_junction: self.read_cold_junction_temperature()?,
            status: self.read_status_flags()?,
        })
    }

    fn read_temperature(&mut self, register: Register) -> SensorResult<f32> {
        let bytes = self.read_register::<2>(register)?;
        Ok(decode_temperature(bytes))
    }

    fn read_register<const N: usize>(&mut self, register: Register) -> SensorResult<[u8; N]> {
        self.bus.transmit(&[register.addr()])?;
        let mut buf = [0u8; N];
        self.bus.receive(&mut buf)?;
        Ok(buf)
    }

    /// Write `[address, value..]` then read `N` bytes back and compare
    ///
    /// Nothing goes on the bus if `address` is not a member of `group`.
    fn write_verified<const N: usize>(
        &mut self,
        group: RegisterGroup,
        address: u8,
        value: [u8; N],
    ) -> SensorResult<()> {
        let register = group.validate(address)?;

        // Setters carry at most a two-byte payload.
        let mut frame = [0u8; 3];
        frame[0] = register.addr();
        frame[1..=N].copy_from_slice(&value);
        self.bus.transmit(&frame[..=N])?;

        // The pointer still selects `register`, so the read returns its contents.
        let mut readback = [0u8; N];
        self.bus.receive(&mut readback)?;

        if readback != value {
            let err = SensorError::ReadbackMismatch {
                register: register.addr(),
                expected: be_u16(&value),
                actual: be_u16(&readback),
            };
            warn!(%group, "{}", err);
            return Err(err);
        }

        debug!(%group, register = register.addr(), ?value, "register written");
        Ok(())
    }
}

fn be_u16(bytes: &[u8]) -> u16 {
    bytes.iter().fold(0, |acc, b| (acc << 8) | u16::from(*b))
}
