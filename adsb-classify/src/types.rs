//! Shared types, error enum, and decoded value types for adsb-classify.

use serde::Serialize;
use thiserror::Error;

/// All errors produced by adsb-classify.
#[derive(Debug, Error)]
pub enum AdsbError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    #[error("invalid message length: expected {expected} hex digits, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    /// TC outside the domain of the called decoder.
    #[error("wrong message type: TC={tc}, expecting {expected}")]
    WrongMessageType { tc: u8, expected: &'static str },
    #[error("unsupported subtype {subtype} for TC={tc}")]
    UnsupportedSubtype { tc: u8, subtype: u8 },
    #[error("unsupported ADS-B version {0}")]
    UnsupportedVersion(u8),
    #[error("not a position message: TC={tc}")]
    NotPositionMessage { tc: u8 },
    /// Surface positions are ambiguous without a nearby reference.
    #[error("missing reference position: surface position requires a reference lat/lon")]
    MissingReference,
    #[error("incorrect or inconsistent message types: {0}")]
    InconsistentMessage(String),
}

pub type Result<T> = std::result::Result<T, AdsbError>;

// ---------------------------------------------------------------------------
// Hex utilities
// ---------------------------------------------------------------------------

/// Decode a hex string into bytes. Case-insensitive, must be even length.
pub fn hex_decode(hex: &str) -> Option<Vec<u8>> {
    let hex = hex.trim();
    if !hex.len().is_multiple_of(2) {
        return None;
    }
    let mut bytes = Vec::with_capacity(hex.len() / 2);
    for chunk in hex.as_bytes().chunks(2) {
        let high = hex_digit(chunk[0])?;
        let low = hex_digit(chunk[1])?;
        bytes.push((high << 4) | low);
    }
    Some(bytes)
}

/// Encode bytes as uppercase hex string.
pub fn hex_encode(data: &[u8]) -> String {
    let mut s = String::with_capacity(data.len() * 2);
    for &b in data {
        s.push(HEX_CHARS[(b >> 4) as usize] as char);
        s.push(HEX_CHARS[(b & 0x0F) as usize] as char);
    }
    s
}

const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// ADS-B callsign character set
// ---------------------------------------------------------------------------

/// ADS-B character set for callsign encoding (6 bits per character).
pub const CALLSIGN_CHARSET: &[u8; 64] =
    b"#ABCDEFGHIJKLMNOPQRSTUVWXYZ##### ###############0123456789######";

// ---------------------------------------------------------------------------
// Type code bands
// ---------------------------------------------------------------------------

/// Message kind selected by the ADS-B Type Code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TypeCodeBand {
    /// TC 0: no position information.
    NoPosition,
    /// TC 1-4
    Identification,
    /// TC 5-8
    SurfacePosition,
    /// TC 9-18
    AirborneBaro,
    /// TC 19
    AirborneVelocity,
    /// TC 20-22
    AirborneGnss,
    /// TC 29
    TargetState,
    /// TC 31
    OperationalStatus,
    /// TC 23-28 and 30: test, surface system, reserved, aircraft status.
    Other,
}

impl TypeCodeBand {
    /// Classify a 5-bit Type Code.
    pub fn of(tc: u8) -> Self {
        match tc {
            0 => TypeCodeBand::NoPosition,
            1..=4 => TypeCodeBand::Identification,
            5..=8 => TypeCodeBand::SurfacePosition,
            9..=18 => TypeCodeBand::AirborneBaro,
            19 => TypeCodeBand::AirborneVelocity,
            20..=22 => TypeCodeBand::AirborneGnss,
            29 => TypeCodeBand::TargetState,
            31 => TypeCodeBand::OperationalStatus,
            _ => TypeCodeBand::Other,
        }
    }

    /// True for surface and airborne (baro or GNSS) position bands.
    pub fn is_position(self) -> bool {
        matches!(
            self,
            TypeCodeBand::SurfacePosition | TypeCodeBand::AirborneBaro | TypeCodeBand::AirborneGnss
        )
    }
}

// ---------------------------------------------------------------------------
// ADS-B version
// ---------------------------------------------------------------------------

/// ADS-B protocol generation, as announced in TC 29/31 messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AdsbVersion {
    /// DO-260
    V0,
    /// DO-260A
    V1,
    /// DO-260B
    V2,
    /// Values 3-7 are reserved.
    Reserved(u8),
}

impl AdsbVersion {
    pub fn from_bits(value: u8) -> Self {
        match value {
            0 => AdsbVersion::V0,
            1 => AdsbVersion::V1,
            2 => AdsbVersion::V2,
            other => AdsbVersion::Reserved(other),
        }
    }

    pub fn number(self) -> u8 {
        match self {
            AdsbVersion::V0 => 0,
            AdsbVersion::V1 => 1,
            AdsbVersion::V2 => 2,
            AdsbVersion::Reserved(n) => n,
        }
    }
}

impl std::fmt::Display for AdsbVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdsbVersion::Reserved(n) => write!(f, "reserved ({n})"),
            v => write!(f, "{}", v.number()),
        }
    }
}

/// NIC supplement bits gathered from position and operational status messages.
///
/// NICa and NICc come from TC 31, NICb from the airborne position message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NicSupplements {
    pub a: bool,
    pub b: bool,
    pub c: bool,
}

// ---------------------------------------------------------------------------
// Velocity
// ---------------------------------------------------------------------------

/// Speed type for velocity messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpeedType {
    Ground,
    IAS,
    TAS,
}

impl SpeedType {
    /// True for indicated or true airspeed, false for ground speed.
    pub fn is_airspeed(self) -> bool {
        !matches!(self, SpeedType::Ground)
    }
}

impl std::fmt::Display for SpeedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeedType::Ground => write!(f, "ground"),
            SpeedType::IAS => write!(f, "IAS"),
            SpeedType::TAS => write!(f, "TAS"),
        }
    }
}

/// Decoded velocity from TC 19 (airborne) or TC 5-8 (surface movement).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Velocity {
    pub speed_kts: Option<f64>,
    /// Ground track for ground speed, heading for airspeed.
    pub track_deg: Option<f64>,
    pub vertical_rate_fpm: Option<i32>,
    pub speed_type: SpeedType,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
