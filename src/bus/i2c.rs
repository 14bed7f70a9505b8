use std::time::{Duration, Instant};

use embedded_hal::i2c::{Error as _, I2c};
use tracing::trace;

use crate::errors::{BusError, BusResult};

/// Per-transaction timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(200);

/// Blocking byte transport to a single device on the bus
///
/// Each call is one complete bus transaction. Implementations never retry:
/// a NACK or an overrun timeout is returned to the caller as is.
pub trait Transport {
    /// Send `bytes` (register pointer, optionally followed by payload)
    fn transmit(&mut self, bytes: &[u8]) -> BusResult<()>;

    /// Fill `buffer` with `buffer.len()` bytes from the device
    fn receive(&mut self, buffer: &mut [u8]) -> BusResult<()>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn transmit(&mut self, bytes: &[u8]) -> BusResult<()> {
        (**self).transmit(bytes)
    }

    fn receive(&mut self, buffer: &mut [u8]) -> BusResult<()> {
        (**self).receive(buffer)
    }
}

/// Transport over any `embedded-hal` I2C controller
///
/// The device address is bound at construction so the driver above only
/// deals in register bytes.
///
/// The timeout is a budget checked once the call returns, not a bound on how
/// long it blocks; the kernel adapter's own timeout governs that. A call that
/// completes late is reported as `BusError::Timeout` and its data discarded.
pub struct I2cTransport<I2C> {
    i2c: I2C,
    address: u8,
    timeout: Duration,
}

impl<I2C: I2c> I2cTransport<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self::with_timeout(i2c, address, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(i2c: I2C, address: u8, timeout: Duration) -> Self {
        Self { i2c, address, timeout }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Give back the underlying controller
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn check(&self, started: Instant, result: Result<(), I2C::Error>) -> BusResult<()> {
        result.map_err(|e| BusError::Transfer {
            address: self.address,
            kind: e.kind(),
        })?;

        if started.elapsed() > self.timeout {
            return Err(BusError::Timeout {
                address: self.address,
                timeout_ms: self.timeout.as_millis() as u64,
            });
        }
        Ok(())
    }
}

impl<I2C: I2c> Transport for I2cTransport<I2C> {
    fn transmit(&mut self, bytes: &[u8]) -> BusResult<()> {
        trace!(address = self.address, ?bytes, "i2c write");
        let started = Instant::now();
        let result = self.i2c.write(self.address, bytes);
        self.check(started, result)
    }

    fn receive(&mut self, buffer: &mut [u8]) -> BusResult<()> {
        let started = Instant::now();
        let result = self.i2c.read(self.address, buffer);
        self.check(started, result)?;
        trace!(address = self.address, bytes = ?buffer, "i2c read");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = 0x67;

    #[test]
    fn transmit_and_receive_use_bound_address() {
        let expectations = [
            I2cTransaction::write(ADDR, vec![0x04]),
            I2cTransaction::read(ADDR, vec![0xC0]),
        ];
        let mut bus = I2cTransport::new(I2cMock::new(&expectations), ADDR);

        assert_eq!(bus.transmit(&[0x04]), Ok(()));
        let mut buf = [0u8; 1];
        assert_eq!(bus.receive(&mut buf), Ok(()));
        assert_eq!(buf, [0xC0]);

        bus.release().done();
    }

    #[test]
    fn driver_errors_map_to_transfer_failures() {
        let nack = ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address);
        let expectations = [
            I2cTransaction::write(ADDR, vec![0x00]).with_error(nack),
            I2cTransaction::read(ADDR, vec![0x00, 0x00]).with_error(ErrorKind::Other),
        ];
        let mut bus = I2cTransport::new(I2cMock::new(&expectations), ADDR);

        assert_eq!(
            bus.transmit(&[0x00]),
            Err(BusError::Transfer { address: ADDR, kind: nack })
        );
        let mut buf = [0u8; 2];
        assert_eq!(
            bus.receive(&mut buf),
            Err(BusError::Transfer { address: ADDR, kind: ErrorKind::Other })
        );

        bus.release().done();
    }

    struct SlowBus(Duration);

    impl embedded_hal::i2c::ErrorType for SlowBus {
        type Error = ErrorKind;
    }

    impl I2c for SlowBus {
        fn transaction(
            &mut self,
            _address: u8,
            _operations: &mut [embedded_hal::i2c::Operation<'_>],
        ) -> Result<(), Self::Error> {
            std::thread::sleep(self.0);
            Ok(())
        }
    }

    #[test]
    fn overrunning_the_timeout_fails_the_call() {
        let slow = SlowBus(Duration::from_millis(20));
        let mut bus = I2cTransport::with_timeout(slow, ADDR, Duration::from_millis(5));

        assert_eq!(
            bus.transmit(&[0x02]),
            Err(BusError::Timeout { address: ADDR, timeout_ms: 5 })
        );
        let mut buf = [0u8; 2];
        assert_eq!(
            bus.receive(&mut buf),
            Err(BusError::Timeout { address: ADDR, timeout_ms: 5 })
        );
    }

    #[test]
    fn late_read_is_discarded_even_when_it_completes() {
        let slow = SlowBus(Duration::from_millis(20));
        let mut bus = I2cTransport::with_timeout(slow, ADDR, Duration::from_millis(5));

        let mut buf = [0xAAu8; 1];
        assert!(matches!(bus.receive(&mut buf), Err(BusError::Timeout { .. })));
        assert_eq!(bus.timeout(), Duration::from_millis(5));
    }

    #[test]
    fn calls_within_the_timeout_succeed() {
        let mut bus = I2cTransport::with_timeout(SlowBus(Duration::ZERO), ADDR, Duration::from_secs(1));
        assert_eq!(bus.transmit(&[0x02]), Ok(()));
    }

    #[test]
    fn default_timeout_is_200ms() {
        let bus = I2cTransport::new(I2cMock::new(&[]), ADDR);
        assert_eq!(bus.timeout(), Duration::from_millis(200));
        assert_eq!(bus.address(), ADDR);
        bus.release().done();
    }
}
