//! Linux `/dev/i2c-*` backend
//!
//! Kernel I2C adapters enforce their own transfer timeout; the transport's
//! configured timeout is checked on top of that.

use std::time::Duration;

use i2cdev::linux::LinuxI2CError;
use linux_embedded_hal::I2cdev;
use tracing::debug;

use super::i2c::I2cTransport;

pub type I2CError = LinuxI2CError;

/// Transport bound to one device on a Linux I2C character device
pub type LinuxTransport = I2cTransport<I2cdev>;

/// Open `path` and bind the transport to the 7-bit `address`
pub fn open(path: &str, address: u8, timeout: Duration) -> Result<LinuxTransport, I2CError> {
    let i2c = I2cdev::new(path)?;
    debug!(path, address, timeout_ms = timeout.as_millis() as u64, "opened I2C bus");
    Ok(I2cTransport::with_timeout(i2c, address, timeout))
}
