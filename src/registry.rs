use std::time::Duration;

use tracing::info;

use crate::bus::Transport;
use crate::config::SensorEntry;
use crate::errors::{ConfigError, RegistryError, RegistryResult, SensorError};
use crate::sensors::{DeviceId, Mcp9600};

#[cfg(feature = "linux-hal")]
use crate::bus::linux::{self, LinuxTransport};
#[cfg(feature = "linux-hal")]
use crate::config::SensorConfig;

/// A probed and configured sensor ready to be polled
pub struct RegisteredSensor<T> {
    pub id: String,
    pub period: Duration,
    pub sensor: Mcp9600<T>,
}

/// Open every configured sensor's bus, probe it and apply its settings
#[cfg(feature = "linux-hal")]
pub fn init_all(sensor_config: &SensorConfig) -> RegistryResult<Vec<RegisteredSensor<LinuxTransport>>> {
    info!("[registry] initializing {} sensors...", sensor_config.sensors.len());

    let mut sensors = Vec::with_capacity(sensor_config.sensors.len());
    for s in sensor_config.sensors.iter() {
        let bus = linux::open(&s.bus, s.address, s.timeout()).map_err(|e| RegistryError::BusOpen {
            bus: s.bus.clone(),
            reason: e.to_string(),
        })?;
        let mut sensor = Mcp9600::new(bus);
        configure_sensor(s, &mut sensor)?;

        sensors.push(RegisteredSensor {
            id: s.id.clone(),
            period: s.poll_period(),
            sensor,
        });
    }

    Ok(sensors)
}

/// Probe the device, then write and verify each configured register
///
/// Alert limits and hysteresis go in before the alert configuration so an
/// alert is never enabled against stale thresholds.
pub fn configure_sensor<T: Transport>(
    entry: &SensorEntry,
    sensor: &mut Mcp9600<T>,
) -> RegistryResult<DeviceId> {
    let failed = |stage: &'static str| {
        move |source: SensorError| RegistryError::Sensor {
            sensor: entry.id.clone(),
            stage,
            source,
        }
    };

    let device = sensor.probe().map_err(failed("probe"))?;
    info!(
        "[registry] registering sensor: id={} bus={} address={:#04x} device={:#04x} rev={}.{}",
        entry.id,
        entry.bus,
        entry.address,
        device.id,
        device.revision_major(),
        device.revision_minor()
    );

    if let Some(value) = entry.sensor_register() {
        sensor.set_sensor_config(value).map_err(failed("sensor configuration"))?;
    }
    if let Some(value) = entry.device_register() {
        sensor.set_device_config(value).map_err(failed("device configuration"))?;
    }

    for a in &entry.alerts {
        let alert = a.alert().ok_or_else(|| ConfigError::InvalidValue {
            field: format!("sensor.{}.alert.channel", entry.id),
            reason: format!("no alert channel {}", a.channel),
        })?;
        if let Some(celsius) = a.limit_celsius {
            sensor
                .set_alert_limit_celsius(alert, celsius)
                .map_err(failed("alert limit"))?;
        }
        if let Some(value) = a.hysteresis {
            sensor
                .set_alert_hysteresis(alert.hysteresis_register().addr(), value)
                .map_err(failed("alert hysteresis"))?;
        }
        if let Some(value) = a.config_register() {
            sensor
                .set_alert_config(alert.config_register().addr(), value)
                .map_err(failed("alert configuration"))?;
        }
    }

    Ok(device)
}
