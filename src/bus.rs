pub mod i2c;
#[cfg(feature = "linux-hal")]
pub mod linux;

pub use i2c::{I2cTransport, Transport, DEFAULT_TIMEOUT};
