//! Parse 28-digit hex strings into 112-bit extended squitter messages.
//!
//! Responsibilities:
//! - Validate and store the raw 14 message bytes
//! - Bit-range extraction, indexed from the first transmitted bit (0..112)
//! - Downlink Format, ICAO address and Type Code accessors
//!
//! No CRC or DF filtering happens here: callers hand in ADS-B messages.

use std::fmt;
use std::str::FromStr;

use crate::types::{hex_decode, hex_encode, AdsbError, Result, TypeCodeBand};

/// Message length in bits.
pub const MSG_BITS: usize = 112;

/// Message length in hex digits.
pub const MSG_HEX_LEN: usize = MSG_BITS / 4;

/// Message length in bytes.
pub const MSG_BYTES: usize = MSG_BITS / 8;

/// A 112-bit ADS-B extended squitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Message([u8; MSG_BYTES]);

impl Message {
    /// Parse a 28-character hex string. Case-insensitive.
    pub fn from_hex(hex: &str) -> Result<Message> {
        let hex = hex.trim();
        if hex.len() != MSG_HEX_LEN {
            return Err(AdsbError::InvalidLength {
                expected: MSG_HEX_LEN,
                actual: hex.len(),
            });
        }
        let raw = hex_decode(hex).ok_or_else(|| AdsbError::InvalidHex(hex.to_string()))?;
        let mut bytes = [0u8; MSG_BYTES];
        bytes.copy_from_slice(&raw);
        Ok(Message(bytes))
    }

    pub fn from_bytes(bytes: [u8; MSG_BYTES]) -> Message {
        Message(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; MSG_BYTES] {
        &self.0
    }

    /// Single bit at `index`, counted from the first transmitted bit.
    pub fn bit(&self, index: usize) -> bool {
        (self.0[index / 8] >> (7 - index % 8)) & 1 == 1
    }

    /// Bits `start..end` as an unsigned integer, MSB first.
    pub fn bits(&self, start: usize, end: usize) -> u64 {
        debug_assert!(start <= end && end <= MSG_BITS && end - start <= 64);
        (start..end).fold(0u64, |acc, i| (acc << 1) | self.bit(i) as u64)
    }

    /// Uppercase hex representation.
    pub fn to_hex(&self) -> String {
        hex_encode(&self.0)
    }

    /// Copy of this message with bits `start..start + width` replaced by `value`.
    #[cfg(test)]
    pub(crate) fn with_bits(mut self, start: usize, width: usize, value: u64) -> Message {
        for k in 0..width {
            let i = start + k;
            let mask = 1u8 << (7 - i % 8);
            if (value >> (width - 1 - k)) & 1 == 1 {
                self.0[i / 8] |= mask;
            } else {
                self.0[i / 8] &= !mask;
            }
        }
        self
    }
}

impl FromStr for Message {
    type Err = AdsbError;

    fn from_str(s: &str) -> Result<Message> {
        Message::from_hex(s)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Field accessors
// ---------------------------------------------------------------------------

/// Downlink Format: first 5 bits.
pub fn downlink_format(msg: &Message) -> u8 {
    msg.bits(0, 5) as u8
}

/// 24-bit ICAO aircraft address (bits 8-31).
pub fn icao_address(msg: &Message) -> u32 {
    msg.bits(8, 32) as u32
}

/// ICAO address as a 6-char uppercase hex string.
pub fn icao_string(msg: &Message) -> String {
    format!("{:06X}", icao_address(msg))
}

/// ADS-B Type Code: first 5 bits of the ME field (bits 32-36).
///
/// Not validated here; each decoder checks the TC it accepts.
pub fn type_code(msg: &Message) -> u8 {
    msg.bits(32, 37) as u8
}

/// Message kind for this message's Type Code.
pub fn type_code_band(msg: &Message) -> TypeCodeBand {
    TypeCodeBand::of(type_code(msg))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
