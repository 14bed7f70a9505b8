//! MCP9600 register map
//!
//! Every bus transaction starts by writing one of these pointer values.

use std::fmt;

use crate::errors::{SensorError, SensorResult};

/// Default 7-bit device address (ADDR pin tied high)
pub const DEFAULT_ADDRESS: u8 = 0x67;

/// Device ID byte reported by the MCP9600
pub const DEVICE_ID_MCP9600: u8 = 0x40;
/// Device ID byte reported by the MCP9601
pub const DEVICE_ID_MCP9601: u8 = 0x41;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Register {
    ThermocoupleTemperature = 0x00,
    JunctionTemperature = 0x01,
    ColdJunctionTemperature = 0x02,
    RawAdc = 0x03,
    Status = 0x04,
    SensorConfig = 0x05,
    DeviceConfig = 0x06,
    Alert1Config = 0x08,
    Alert2Config = 0x09,
    Alert3Config = 0x0A,
    Alert4Config = 0x0B,
    Alert1Hysteresis = 0x0C,
    Alert2Hysteresis = 0x0D,
    Alert3Hysteresis = 0x0E,
    Alert4Hysteresis = 0x0F,
    Alert1Limit = 0x10,
    Alert2Limit = 0x11,
    Alert3Limit = 0x12,
    Alert4Limit = 0x13,
    DeviceId = 0x20,
}

impl Register {
    pub const ALL: [Register; 20] = [
        Register::ThermocoupleTemperature,
        Register::JunctionTemperature,
        Register::ColdJunctionTemperature,
        Register::RawAdc,
        Register::Status,
        Register::SensorConfig,
        Register::DeviceConfig,
        Register::Alert1Config,
        Register::Alert2Config,
        Register::Alert3Config,
        Register::Alert4Config,
        Register::Alert1Hysteresis,
        Register::Alert2Hysteresis,
        Register::Alert3Hysteresis,
        Register::Alert4Hysteresis,
        Register::Alert1Limit,
        Register::Alert2Limit,
        Register::Alert3Limit,
        Register::Alert4Limit,
        Register::DeviceId,
    ];

    /// Pointer value written ahead of every access
    pub const fn addr(self) -> u8 {
        self as u8
    }

    /// Number of data bytes behind the pointer
    pub const fn width(self) -> usize {
        match self {
            Register::RawAdc => 3,
            Register::ThermocoupleTemperature
            | Register::JunctionTemperature
            | Register::ColdJunctionTemperature
            | Register::Alert1Limit
            | Register::Alert2Limit
            | Register::Alert3Limit
            | Register::Alert4Limit
            | Register::DeviceId => 2,
            _ => 1,
        }
    }

    pub fn from_addr(addr: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.addr() == addr)
    }
}

/// Categories of registers that accept writes
///
/// Each category is a fixed set; an address is accepted for a category
/// only if it is one of the members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterGroup {
    SensorConfig,
    DeviceConfig,
    AlertConfig,
    AlertHysteresis,
    AlertLimit,
}

impl RegisterGroup {
    pub const fn members(self) -> &'static [Register] {
        match self {
            RegisterGroup::SensorConfig => &[Register::SensorConfig],
            RegisterGroup::DeviceConfig => &[Register::DeviceConfig],
            RegisterGroup::AlertConfig => &[
                Register::Alert1Config,
                Register::Alert2Config,
                Register::Alert3Config,
                Register::Alert4Config,
            ],
            RegisterGroup::AlertHysteresis => &[
                Register::Alert1Hysteresis,
                Register::Alert2Hysteresis,
                Register::Alert3Hysteresis,
                Register::Alert4Hysteresis,
            ],
            RegisterGroup::AlertLimit => &[
                Register::Alert1Limit,
                Register::Alert2Limit,
                Register::Alert3Limit,
                Register::Alert4Limit,
            ],
        }
    }

    pub fn contains(self, addr: u8) -> bool {
        self.members().iter().any(|r| r.addr() == addr)
    }

    /// Resolve `addr` to a member register or fail with `InvalidRegister`
    pub fn validate(self, addr: u8) -> SensorResult<Register> {
        self.members()
            .iter()
            .copied()
            .find(|r| r.addr() == addr)
            .ok_or(SensorError::InvalidRegister { register: addr, group: self })
    }
}

impl fmt::Display for RegisterGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegisterGroup::SensorConfig => "sensor config",
            RegisterGroup::DeviceConfig => "device config",
            RegisterGroup::AlertConfig => "alert config",
            RegisterGroup::AlertHysteresis => "alert hysteresis",
            RegisterGroup::AlertLimit => "alert limit",
        };
        f.write_str(name)
    }
}

/// One of the four hardware alert outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alert {
    One,
    Two,
    Three,
    Four,
}

impl Alert {
    pub const ALL: [Alert; 4] = [Alert::One, Alert::Two, Alert::Three, Alert::Four];

    /// Map a 1-based channel number to an alert
    pub fn from_channel(channel: u8) -> Option<Self> {
        match channel {
            1 => Some(Alert::One),
            2 => Some(Alert::Two),
            3 => Some(Alert::Three),
            4 => Some(Alert::Four),
            _ => None,
        }
    }

    pub const fn channel(self) -> u8 {
        match self {
            Alert::One => 1,
            Alert::Two => 2,
            Alert::Three => 3,
            Alert::Four => 4,
        }
    }

    pub const fn config_register(self) -> Register {
        match self {
            Alert::One => Register::Alert1Config,
            Alert::Two => Register::Alert2Config,
            Alert::Three => Register::Alert3Config,
            Alert::Four => Register::Alert4Config,
        }
    }

    pub const fn hysteresis_register(self) -> Register {
        match self {
            Alert::One => Register::Alert1Hysteresis,
            Alert::Two => Register::Alert2Hysteresis,
            Alert::Three => Register::Alert3Hysteresis,
            Alert::Four => Register::Alert4Hysteresis,
        }
    }

    pub const fn limit_register(self) -> Register {
        match self {
            Alert::One => Register::Alert1Limit,
            Alert::Two => Register::Alert2Limit,
            Alert::Three => Register::Alert3Limit,
            Alert::Four => Register::Alert4Limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_match_datasheet() {
        assert_eq!(Register::ThermocoupleTemperature.addr(), 0x00);
        assert_eq!(Register::RawAdc.addr(), 0x03);
        assert_eq!(Register::DeviceConfig.addr(), 0x06);
        assert_eq!(Register::Alert1Config.addr(), 0x08);
        assert_eq!(Register::Alert4Hysteresis.addr(), 0x0F);
        assert_eq!(Register::Alert4Limit.addr(), 0x13);
        assert_eq!(Register::DeviceId.addr(), 0x20);
    }

    #[test]
    fn from_addr_rejects_gaps() {
        assert_eq!(Register::from_addr(0x07), None);
        assert_eq!(Register::from_addr(0x14), None);
        assert_eq!(Register::from_addr(0x12), Some(Register::Alert3Limit));
    }

    #[test]
    fn widths() {
        assert_eq!(Register::RawAdc.width(), 3);
        assert_eq!(Register::Alert2Limit.width(), 2);
        assert_eq!(Register::DeviceId.width(), 2);
        assert_eq!(Register::Alert2Hysteresis.width(), 1);
        assert_eq!(Register::Status.width(), 1);
    }

    #[test]
    fn groups_accept_only_their_members() {
        for addr in 0x10..=0x13 {
            assert!(RegisterGroup::AlertLimit.contains(addr));
            assert!(!RegisterGroup::AlertHysteresis.contains(addr));
        }
        assert!(!RegisterGroup::AlertLimit.contains(0x0F));
        assert!(!RegisterGroup::AlertLimit.contains(0x14));
        assert!(RegisterGroup::AlertConfig.contains(0x0B));
        assert!(!RegisterGroup::AlertConfig.contains(0x0C));
        assert!(RegisterGroup::SensorConfig.contains(0x05));
        assert!(!RegisterGroup::SensorConfig.contains(0x06));
    }

    #[test]
    fn validate_reports_group() {
        assert_eq!(
            RegisterGroup::AlertHysteresis.validate(0x08),
            Err(SensorError::InvalidRegister { register: 0x08, group: RegisterGroup::AlertHysteresis })
        );
        assert_eq!(RegisterGroup::AlertHysteresis.validate(0x0E), Ok(Register::Alert3Hysteresis));
    }

    #[test]
    fn alert_channels_map_to_registers() {
        for alert in Alert::ALL {
            assert_eq!(Alert::from_channel(alert.channel()), Some(alert));
            assert!(RegisterGroup::AlertConfig.contains(alert.config_register().addr()));
            assert!(RegisterGroup::AlertHysteresis.contains(alert.hysteresis_register().addr()));
            assert!(RegisterGroup::AlertLimit.contains(alert.limit_register().addr()));
        }
        assert_eq!(Alert::from_channel(0), None);
        assert_eq!(Alert::from_channel(5), None);
    }
}
