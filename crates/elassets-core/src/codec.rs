//! Numeric codecs used by packed vertex layouts
//!
//! - 16-bit IEEE-754 half floats (positions and UVs of compact static objects)
//! - 16-bit compressed unit normals
//!
//! Decoders work in source space; callers convert the results with
//! [`Vec3::to_y_up`] like any other vector.

use half::f16;

use crate::types::Vec3;

/// Sign bit of the x component of a compressed normal
const NORMAL_SIGN_X: u16 = 0x8000;
/// Sign bit of the y component of a compressed normal
const NORMAL_SIGN_Y: u16 = 0x4000;
/// Sign bit of the z component of a compressed normal
const NORMAL_SIGN_Z: u16 = 0x2000;
/// Sum of the three magnitudes of an encoded normal
const NORMAL_SCALE: f32 = 126.0;

/// Expand an IEEE-754 half float to `f32`.
///
/// Exponent 0 yields zero or a subnormal, exponent 31 infinity or NaN.
#[inline]
pub fn half_to_f32(bits: u16) -> f32 {
    f16::from_bits(bits).to_f32()
}

/// Narrow an `f32` to its nearest IEEE-754 half float bit pattern.
#[inline]
pub fn f32_to_half(value: f32) -> u16 {
    f16::from_f32(value).to_bits()
}

/// Decode a 16-bit compressed normal into a unit vector.
///
/// Layout: bits 15/14/13 hold the signs of x/y/z, bits 7..=12 the x
/// magnitude and bits 0..=6 the y magnitude. The z magnitude is implied by
/// `x + y + z == 126`; pairs with `x + y >= 127` are stored mirrored.
pub fn decode_compressed_normal(word: u16) -> Vec3 {
    let mut x = ((word >> 7) & 0x3F) as f32;
    let mut y = (word & 0x7F) as f32;

    if x + y >= 127.0 {
        x = 127.0 - x;
        y = 127.0 - y;
    }
    let mut z = NORMAL_SCALE - x - y;

    if word & NORMAL_SIGN_X != 0 {
        x = -x;
    }
    if word & NORMAL_SIGN_Y != 0 {
        y = -y;
    }
    if word & NORMAL_SIGN_Z != 0 {
        z = -z;
    }

    Vec3::new(x, y, z).normalize()
}

/// Encode a unit vector as a 16-bit compressed normal.
///
/// The inverse of [`decode_compressed_normal`] up to quantization. A zero
/// vector encodes as `+Z`.
pub fn encode_compressed_normal(normal: Vec3) -> u16 {
    let sum = normal.x.abs() + normal.y.abs() + normal.z.abs();
    if sum <= f32::EPSILON {
        return 0;
    }

    let mut xi = (normal.x.abs() * NORMAL_SCALE / sum).round() as u16;
    let mut yi = (normal.y.abs() * NORMAL_SCALE / sum).round() as u16;
    xi = xi.min(126);
    yi = yi.min(126 - xi);

    // x only has six bits; larger magnitudes go through the mirrored form
    let (x_field, y_field) = if xi <= 0x3F {
        (xi, yi)
    } else {
        (127 - xi, 127 - yi)
    };

    let mut word = (x_field << 7) | y_field;
    if normal.x < 0.0 {
        word |= NORMAL_SIGN_X;
    }
    if normal.y < 0.0 {
        word |= NORMAL_SIGN_Y;
    }
    if normal.z < 0.0 {
        word |= NORMAL_SIGN_Z;
    }
    word
}
