//! Typed views of the MCP9600 status and configuration bytes

use serde::{Deserialize, Serialize};

use crate::registers::Alert;

// STATUS (0x04)
const STATUS_BURST_COMPLETE: u8 = 1 << 7;
const STATUS_TH_UPDATE: u8 = 1 << 6;
const STATUS_SHORT_CIRCUIT: u8 = 1 << 5;
const STATUS_INPUT_RANGE: u8 = 1 << 4;

// ALERTn CONFIG (0x08..0x0B)
const ALERT_INT_CLEAR: u8 = 1 << 7;
const ALERT_MONITOR_COLD_JUNCTION: u8 = 1 << 4;
const ALERT_RISING: u8 = 1 << 3;
const ALERT_ACTIVE_HIGH: u8 = 1 << 2;
const ALERT_INTERRUPT_MODE: u8 = 1 << 1;
const ALERT_ENABLE: u8 = 1 << 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Status {
    pub burst_complete: bool,
    pub temperature_updated: bool,
    /// Thermocouple shorted to supply or ground (MCP9601 only)
    pub short_circuit: bool,
    pub input_range_exceeded: bool,
    /// Alert 1 to 4 output states, index 0 is alert 1
    pub alerts: [bool; 4],
}

impl Status {
    pub fn from_register(reg: u8) -> Self {
        Self {
            burst_complete: reg & STATUS_BURST_COMPLETE != 0,
            temperature_updated: reg & STATUS_TH_UPDATE != 0,
            short_circuit: reg & STATUS_SHORT_CIRCUIT != 0,
            input_range_exceeded: reg & STATUS_INPUT_RANGE != 0,
            alerts: [reg & 0x01 != 0, reg & 0x02 != 0, reg & 0x04 != 0, reg & 0x08 != 0],
        }
    }

    pub fn to_register(self) -> u8 {
        let mut reg = 0;
        if self.burst_complete {
            reg |= STATUS_BURST_COMPLETE;
        }
        if self.temperature_updated {
            reg |= STATUS_TH_UPDATE;
        }
        if self.short_circuit {
            reg |= STATUS_SHORT_CIRCUIT;
        }
        if self.input_range_exceeded {
            reg |= STATUS_INPUT_RANGE;
        }
        for (bit, active) in self.alerts.iter().enumerate() {
            if *active {
                reg |= 1 << bit;
            }
        }
        reg
    }

    pub fn alert(&self, alert: Alert) -> bool {
        self.alerts[usize::from(alert.channel() - 1)]
    }

    /// Input or wiring fault, as opposed to a threshold alert
    pub fn has_fault(&self) -> bool {
        self.short_circuit || self.input_range_exceeded
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThermocoupleType {
    #[default]
    K,
    J,
    T,
    N,
    S,
    E,
    B,
    R,
}

impl ThermocoupleType {
    const ORDER: [ThermocoupleType; 8] = [
        ThermocoupleType::K,
        ThermocoupleType::J,
        ThermocoupleType::T,
        ThermocoupleType::N,
        ThermocoupleType::S,
        ThermocoupleType::E,
        ThermocoupleType::B,
        ThermocoupleType::R,
    ];

    fn bits(self) -> u8 {
        self as u8
    }

    fn from_bits(bits: u8) -> Self {
        Self::ORDER[usize::from(bits & 0x07)]
    }
}

/// THERMOCOUPLE SENSOR CONFIGURATION (0x05)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SensorConfiguration {
    pub thermocouple_type: ThermocoupleType,
    /// Digital filter coefficient, 0 (off) to 7 (maximum)
    pub filter: u8,
}

impl SensorConfiguration {
    pub fn new(thermocouple_type: ThermocoupleType, filter: u8) -> Self {
        Self { thermocouple_type, filter: filter.min(7) }
    }

    pub fn from_register(reg: u8) -> Self {
        Self {
            thermocouple_type: ThermocoupleType::from_bits(reg >> 4),
            filter: reg & 0x07,
        }
    }

    pub fn to_register(self) -> u8 {
        (self.thermocouple_type.bits() << 4) | (self.filter & 0x07)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColdJunctionResolution {
    /// 0.0625 °C
    #[default]
    Fine,
    /// 0.25 °C
    Coarse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdcResolution {
    #[default]
    Bits18,
    Bits16,
    Bits14,
    Bits12,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownMode {
    #[default]
    Normal,
    Shutdown,
    Burst,
    /// Bit pattern 0b11, unimplemented by the device
    Reserved,
}

/// DEVICE CONFIGURATION (0x06)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceConfiguration {
    pub cold_junction_resolution: ColdJunctionResolution,
    pub adc_resolution: AdcResolution,
    /// Burst mode sample count as a power of two exponent, 0 (1 sample) to 7 (128 samples)
    pub burst_samples_log2: u8,
    pub shutdown_mode: ShutdownMode,
}

impl DeviceConfiguration {
    pub fn from_register(reg: u8) -> Self {
        let cold_junction_resolution = if reg & 0x80 != 0 {
            ColdJunctionResolution::Coarse
        } else {
            ColdJunctionResolution::Fine
        };
        let adc_resolution = match (reg >> 5) & 0x03 {
            0 => AdcResolution::Bits18,
            1 => AdcResolution::Bits16,
            2 => AdcResolution::Bits14,
            _ => AdcResolution::Bits12,
        };
        let shutdown_mode = match reg & 0x03 {
            0 => ShutdownMode::Normal,
            1 => ShutdownMode::Shutdown,
            2 => ShutdownMode::Burst,
            _ => ShutdownMode::Reserved,
        };
        Self {
            cold_junction_resolution,
            adc_resolution,
            burst_samples_log2: (reg >> 2) & 0x07,
            shutdown_mode,
        }
    }

    pub fn to_register(self) -> u8 {
        let resolution = match self.cold_junction_resolution {
            ColdJunctionResolution::Fine => 0,
            ColdJunctionResolution::Coarse => 0x80,
        };
        let adc = self.adc_resolution as u8;
        let mode = self.shutdown_mode as u8;
        resolution | (adc << 5) | ((self.burst_samples_log2 & 0x07) << 2) | mode
    }

    pub fn burst_samples(&self) -> u8 {
        1 << (self.burst_samples_log2 & 0x07)
    }
}

/// ALERTn CONFIGURATION (0x08..0x0B)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlertConfiguration {
    pub enabled: bool,
    /// Interrupt mode when set, comparator mode otherwise
    pub interrupt_mode: bool,
    pub active_high: bool,
    /// Trigger on rising temperature when set, falling otherwise
    pub rising: bool,
    /// Compare against the cold junction instead of the thermocouple
    pub monitor_cold_junction: bool,
    pub clear_interrupt: bool,
}

impl AlertConfiguration {
    pub fn from_register(reg: u8) -> Self {
        Self {
            enabled: reg & ALERT_ENABLE != 0,
            interrupt_mode: reg & ALERT_INTERRUPT_MODE != 0,
            active_high: reg & ALERT_ACTIVE_HIGH != 0,
            rising: reg & ALERT_RISING != 0,
            monitor_cold_junction: reg & ALERT_MONITOR_COLD_JUNCTION != 0,
            clear_interrupt: reg & ALERT_INT_CLEAR != 0,
        }
    }

    pub fn to_register(self) -> u8 {
        [
            (self.enabled, ALERT_ENABLE),
            (self.interrupt_mode, ALERT_INTERRUPT_MODE),
            (self.active_high, ALERT_ACTIVE_HIGH),
            (self.rising, ALERT_RISING),
            (self.monitor_cold_junction, ALERT_MONITOR_COLD_JUNCTION),
            (self.clear_interrupt, ALERT_INT_CLEAR),
        ]
        .iter()
        .filter(|(set, _)| *set)
        .fold(0, |reg, (_, bit)| reg | bit)
    }
}

/// DEVICE ID/REVISION (0x20)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceId {
    pub id: u8,
    pub revision: u8,
}

impl DeviceId {
    /// Split the big-endian register value into id and revision bytes
    pub fn from_register(reg: u16) -> Self {
        let [id, revision] = reg.to_be_bytes();
        Self { id, revision }
    }

    pub fn revision_major(&self) -> u8 {
        self.revision >> 4
    }

    pub fn revision_minor(&self) -> u8 {
        self.revision & 0x0F
    }
}
