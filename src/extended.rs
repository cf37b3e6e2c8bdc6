//! IEEE 754 80-bit extended precision numbers, as stored big-endian in AIFF
//! `COMM` chunks: 1 sign bit, 15 exponent bits, 64 mantissa bits with an
//! explicit integer bit.

use byteorder::{BigEndian, ByteOrder};

const EXTENDED_BIAS: i32 = 16383;
const EXTENDED_EXP_MAX: i32 = 0x7FFF;
const DOUBLE_BIAS: i32 = 1023;
const DOUBLE_EXP_MAX: i32 = 0x7FF;
const DOUBLE_EXP_SHIFT: u32 = 52;

/// Decodes an 80-bit extended float into a double.
///
/// The mantissa is truncated to the 52 fraction bits a double can hold.
/// Values too small for a double become zero, values too large become
/// infinity.
pub fn extended_to_f64(bytes: [u8; 10]) -> f64 {
    let sign = u64::from(bytes[0] >> 7) << 63;
    let exponent = (i32::from(bytes[0] & 0x7F) << 8) | i32::from(bytes[1]);
    let mut mantissa = BigEndian::read_u64(&bytes[2..10]);

    if exponent == EXTENDED_EXP_MAX {
        return if mantissa << 1 == 0 {
            f64::from_bits(sign | ((DOUBLE_EXP_MAX as u64) << DOUBLE_EXP_SHIFT))
        } else {
            f64::NAN
        };
    }

    if exponent == 0 || mantissa == 0 {
        return f64::from_bits(sign);
    }

    // Unnormals have the integer bit cleared
    let shift = mantissa.leading_zeros() as i32;
    mantissa <<= shift;

    let exp = exponent - shift - EXTENDED_BIAS + DOUBLE_BIAS;

    if exp >= DOUBLE_EXP_MAX {
        return f64::from_bits(sign | ((DOUBLE_EXP_MAX as u64) << DOUBLE_EXP_SHIFT));
    }

    if exp <= -52 {
        return f64::from_bits(sign);
    }

    if exp <= 0 {
        // Double denormal, the integer bit becomes part of the fraction
        let fraction = mantissa >> (12 - exp) as u32;
        return f64::from_bits(sign | fraction);
    }

    let fraction = (mantissa << 1) >> 12;
    f64::from_bits(sign | ((exp as u64) << DOUBLE_EXP_SHIFT) | fraction)
}

/// Decodes an AIFF sample rate.
///
/// Infinity and NaN saturate to `u32::MAX`, negative rates become zero and
/// fractional rates are truncated.
pub fn extended_to_u32(bytes: [u8; 10]) -> u32 {
    let value = extended_to_f64(bytes);

    if value.is_nan() || value.is_infinite() {
        return u32::MAX;
    }

    value as u32
}

/// Encodes an integral sample rate as an 80-bit extended float.
pub fn u32_to_extended(value: u32) -> [u8; 10] {
    let mut out = [0u8; 10];

    if value == 0 {
        return out;
    }

    let shift = value.leading_zeros();
    let exponent = EXTENDED_BIAS as u32 + 31 - shift;
    let mantissa = u64::from(value) << (32 + shift);

    out[0] = ((exponent >> 8) & 0x7F) as u8;
    out[1] = exponent as u8;
    BigEndian::write_u64(&mut out[2..10], mantissa);

    out
}
