//! G.711 expansion according to ITU-T Recommendation G.711
//!
//! Bit-exact with the ITU-T Software Tools Library (STL) G.711 module.
//!
//! - A-law: even bits toggled (XOR 0x55), 1 sign bit, 3 exponent bits,
//!   4 mantissa bits, result scaled to 16-bit range.
//! - μ-law: bits inverted, bias of 33 removed after expansion.

/// Expand an 8-bit A-law code to a 16-bit linear PCM sample
pub fn alaw_expand(compressed: u8) -> i16 {
    let ix = ((compressed ^ 0x55) & 0x7F) as i16;
    let exponent = ix >> 4;
    let mut mantissa = ix & 0x0F;

    if exponent > 0 {
        mantissa += 16;
    }
    mantissa = (mantissa << 4) + 0x08;
    if exponent > 1 {
        mantissa <<= exponent - 1;
    }

    if compressed > 127 { mantissa } else { -mantissa }
}

/// Expand an 8-bit μ-law code to a 16-bit linear PCM sample
pub fn ulaw_expand(compressed: u8) -> i16 {
    let inverted = (!compressed) as i16;
    let exponent = (inverted >> 4) & 0x07;
    let mantissa = inverted & 0x0F;
    let step = 4 << (exponent + 1);

    let magnitude = (0x80 << exponent) + step * mantissa + step / 2 - 4 * 33;
    if compressed < 0x80 { -magnitude } else { magnitude }
}
