//! Bit-level codecs for MCP9600 data registers

use crate::errors::{SensorError, SensorResult};

/// Degrees Celsius per LSB of the temperature registers
pub const TEMPERATURE_RESOLUTION: f32 = 0.0625;
/// Alert limit registers ignore the two lowest bits
pub const ALERT_LIMIT_RESOLUTION: f32 = 0.25;

pub const TEMPERATURE_MIN: f32 = -2048.0;
pub const TEMPERATURE_MAX: f32 = 2047.9375;
/// Largest value with bits 1:0 clear
pub const ALERT_LIMIT_MAX: f32 = 2047.75;

/// Decode a two-byte temperature register (`[msb, lsb]`) into °C
///
/// `msb * 16 + lsb / 16`, less 4096 when the sign bit of `msb` is set.
pub fn decode_temperature(bytes: [u8; 2]) -> f32 {
    let [msb, lsb] = bytes;
    let magnitude = f32::from(msb) * 16.0 + f32::from(lsb) / 16.0;
    if msb & 0x80 != 0 {
        magnitude - 4096.0
    } else {
        magnitude
    }
}

/// Encode °C into the two-byte temperature register format, rounded to 1/16 °C
pub fn encode_temperature(celsius: f32) -> SensorResult<[u8; 2]> {
    check_range(celsius)?;
    let raw = (celsius / TEMPERATURE_RESOLUTION).round() as i16;
    Ok(raw.to_be_bytes())
}

/// Encode °C for an alert limit register, rounded to 0.25 °C with bits 1:0 clear
pub fn encode_alert_limit(celsius: f32) -> SensorResult<[u8; 2]> {
    check_range(celsius)?;
    let stepped = (celsius / ALERT_LIMIT_RESOLUTION).round() * ALERT_LIMIT_RESOLUTION;
    encode_temperature(stepped.min(ALERT_LIMIT_MAX))
}

/// Decode the three-byte raw ADC register (`[upper, middle, lower]`)
///
/// The bytes are placed in the upper 24 bits of an `i32` and shifted back
/// arithmetically, which sign-extends negative readings.
pub fn decode_adc(bytes: [u8; 3]) -> i32 {
    let [upper, middle, lower] = bytes;
    i32::from_be_bytes([upper, middle, lower, 0]) >> 8
}

fn check_range(celsius: f32) -> SensorResult<()> {
    if (TEMPERATURE_MIN..=TEMPERATURE_MAX).contains(&celsius) {
        Ok(())
    } else {
        Err(SensorError::TemperatureOutOfRange {
            celsius,
            min: TEMPERATURE_MIN,
            max: TEMPERATURE_MAX,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_temperatures() {
        assert_eq!(decode_temperature([0x00, 0x00]), 0.0);
        assert_eq!(decode_temperature([0x01, 0x90]), 25.0);
        assert_eq!(decode_temperature([0x01, 0x94]), 25.25);
        assert_eq!(decode_temperature([0x00, 0x01]), 0.0625);
        assert_eq!(decode_temperature([0x7F, 0xFF]), 2047.9375);
    }

    #[test]
    fn negative_temperatures_subtract_4096() {
        assert_eq!(decode_temperature([0xFF, 0xF0]), -1.0);
        assert_eq!(decode_temperature([0xFF, 0xFF]), -0.0625);
        assert_eq!(decode_temperature([0xFE, 0x70]), -25.0);
        assert_eq!(decode_temperature([0x80, 0x00]), -2048.0);
    }

    #[test]
    fn decode_matches_formula_for_every_input() {
        for msb in 0..=u8::MAX {
            for lsb in 0..=u8::MAX {
                let formula = f32::from(msb) * 16.0 + f32::from(lsb) / 16.0;
                let expected = if msb & 0x80 != 0 { formula - 4096.0 } else { formula };
                assert_eq!(decode_temperature([msb, lsb]), expected);
                // Same value as a two's-complement 12.4 fixed point number.
                assert_eq!(expected, f32::from(i16::from_be_bytes([msb, lsb])) / 16.0);
            }
        }
    }

    #[test]
    fn encode_then_decode_stays_within_resolution() {
        for celsius in [-270.0, -40.3, -0.01, 0.0, 0.03, 21.7, 100.0, 1372.0, 2047.9] {
            let bytes = encode_temperature(celsius).unwrap();
            let decoded = decode_temperature(bytes);
            assert!(
                (decoded - celsius).abs() <= TEMPERATURE_RESOLUTION,
                "{celsius} -> {bytes:02x?} -> {decoded}"
            );
        }
    }

    #[test]
    fn encode_rejects_out_of_range() {
        assert!(matches!(
            encode_temperature(2048.0),
            Err(SensorError::TemperatureOutOfRange { .. })
        ));
        assert!(encode_temperature(-2048.1).is_err());
        assert!(encode_temperature(f32::NAN).is_err());
        assert_eq!(encode_temperature(-2048.0), Ok([0x80, 0x00]));
    }

    #[test]
    fn alert_limits_use_quarter_degree_steps() {
        assert_eq!(encode_alert_limit(100.0), Ok([0x06, 0x40]));
        assert_eq!(encode_alert_limit(100.1), Ok([0x06, 0x40]));
        assert_eq!(encode_alert_limit(100.2), Ok([0x06, 0x44]));
        assert_eq!(encode_alert_limit(-10.0), Ok([0xFF, 0x60]));
        assert_eq!(encode_alert_limit(2047.9375), Ok([0x7F, 0xFC]));
        assert_eq!(encode_alert_limit(-2048.0), Ok([0x80, 0x00]));
        assert!(encode_alert_limit(2048.0).is_err());
        for bytes in [encode_alert_limit(-3.3).unwrap(), encode_alert_limit(512.6).unwrap()] {
            assert_eq!(bytes[1] & 0x03, 0);
        }
    }

    #[test]
    fn adc_positive_values() {
        assert_eq!(decode_adc([0x00, 0x00, 0x00]), 0);
        assert_eq!(decode_adc([0x00, 0x01, 0x00]), 0x100);
        assert_eq!(decode_adc([0x12, 0x34, 0x56]), 0x12_3456);
        assert_eq!(decode_adc([0x7F, 0xFF, 0xFF]), 0x7F_FFFF);
    }

    #[test]
    fn adc_negative_values_are_sign_extended() {
        assert_eq!(decode_adc([0xFF, 0xFF, 0xFF]), -1);
        assert_eq!(decode_adc([0xFF, 0xFF, 0x00]), -256);
        assert_eq!(decode_adc([0x80, 0x00, 0x00]), -0x80_0000);
    }

    #[test]
    fn adc_sign_follows_top_bit() {
        for upper in 0..=u8::MAX {
            let value = decode_adc([upper, 0xA5, 0x5A]);
            let unsigned = (u32::from(upper) << 16) | 0xA55A;
            if upper & 0x80 != 0 {
                assert!(value < 0);
                assert_eq!(value, unsigned as i32 - 0x100_0000);
            } else {
                assert_eq!(value, unsigned as i32);
            }
        }
    }
}
