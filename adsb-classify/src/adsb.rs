//! Type Code dispatch for position, altitude and velocity messages.
//!
//! Each entry point checks the TC band of its input and routes to the
//! matching CPR solver or velocity decoder:
//! - TC 5-8:   surface position (reference position required for pairs)
//! - TC 9-18:  airborne position, barometric altitude
//! - TC 19:    airborne velocity
//! - TC 20-22: airborne position, GNSS height

use tracing::trace;

use crate::cpr;
use crate::decode;
use crate::frame::{type_code, Message};
use crate::types::*;

/// Q-bit: 25 ft altitude encoding when set (bit 47).
const Q_BIT: usize = 47;

/// CPR format flag: 0 = even, 1 = odd (bit 53).
const CPR_FORMAT_BIT: usize = 53;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Decode a position from an even and an odd position message.
///
/// Both messages must sit in the same band: surface (TC 5-8), airborne
/// baro (TC 9-18) or airborne GNSS (TC 20-22). Surface pairs need the
/// reference position; airborne pairs ignore it. Timestamps are seconds and
/// go to the CPR solver unchecked.
///
/// `Ok(None)` means the pair is valid but cannot be resolved: stale, frames
/// not one even plus one odd, or straddling a latitude zone boundary.
pub fn decode_position_pair(
    msg_even: &Message,
    msg_odd: &Message,
    t_even: f64,
    t_odd: f64,
    ref_lat: Option<f64>,
    ref_lon: Option<f64>,
) -> Result<Option<(f64, f64)>> {
    let tc_even = type_code(msg_even);
    let tc_odd = type_code(msg_odd);

    match (TypeCodeBand::of(tc_even), TypeCodeBand::of(tc_odd)) {
        (TypeCodeBand::SurfacePosition, TypeCodeBand::SurfacePosition) => {
            let (Some(lat), Some(lon)) = (ref_lat, ref_lon) else {
                return Err(AdsbError::MissingReference);
            };
            trace!(tc_even, tc_odd, "surface position pair");
            Ok(cpr::surface_position(msg_even, msg_odd, t_even, t_odd, lat, lon))
        }
        (TypeCodeBand::AirborneBaro, TypeCodeBand::AirborneBaro)
        | (TypeCodeBand::AirborneGnss, TypeCodeBand::AirborneGnss) => {
            trace!(tc_even, tc_odd, "airborne position pair");
            Ok(cpr::airborne_position(msg_even, msg_odd, t_even, t_odd))
        }
        _ => Err(AdsbError::InconsistentMessage(format!(
            "TC={tc_even} and TC={tc_odd} are not a surface, airborne baro or airborne GNSS pair"
        ))),
    }
}

/// Decode a position from a single message and a nearby reference.
///
/// The reference must be within 180nm (airborne) or 45nm (surface) of the
/// true position; that is not checked here.
pub fn decode_position_single(msg: &Message, ref_lat: f64, ref_lon: f64) -> Result<(f64, f64)> {
    let tc = type_code(msg);
    match TypeCodeBand::of(tc) {
        TypeCodeBand::SurfacePosition => {
            trace!(tc, "surface position with reference");
            Ok(cpr::surface_position_with_ref(msg, ref_lat, ref_lon))
        }
        TypeCodeBand::AirborneBaro | TypeCodeBand::AirborneGnss => {
            trace!(tc, "airborne position with reference");
            Ok(cpr::airborne_position_with_ref(msg, ref_lat, ref_lon))
        }
        _ => Err(AdsbError::InconsistentMessage(format!(
            "TC={tc}, expecting 5-8, 9-18 or 20-22"
        ))),
    }
}

/// CPR format flag: 0 for an even frame, 1 for an odd frame.
pub fn odd_even_flag(msg: &Message) -> u8 {
    msg.bit(CPR_FORMAT_BIT) as u8
}

// ---------------------------------------------------------------------------
// Altitude
// ---------------------------------------------------------------------------

/// Altitude in feet from a position message.
///
/// Surface messages report 0. Airborne messages with the Q-bit set use
/// 25 ft steps: the 11 bits around the Q-bit, times 25, minus 1000.
/// With the Q-bit clear the altitude is Gillham coded and reported as
/// `None`.
pub fn decode_altitude(msg: &Message) -> Result<Option<i32>> {
    let tc = type_code(msg);
    match TypeCodeBand::of(tc) {
        TypeCodeBand::SurfacePosition => Ok(Some(0)),
        TypeCodeBand::AirborneBaro | TypeCodeBand::AirborneGnss => {
            if !msg.bit(Q_BIT) {
                return Ok(None);
            }
            let n = (msg.bits(40, Q_BIT) << 4) | msg.bits(Q_BIT + 1, 52);
            Ok(Some(n as i32 * 25 - 1000))
        }
        _ => Err(AdsbError::NotPositionMessage { tc }),
    }
}

// ---------------------------------------------------------------------------
// Velocity
// ---------------------------------------------------------------------------

/// Speed, track or heading, vertical rate and speed type.
///
/// TC 5-8 decodes surface movement, TC 19 airborne velocity.
pub fn decode_velocity(msg: &Message) -> Result<Velocity> {
    let tc = type_code(msg);
    match tc {
        5..=8 => {
            trace!(tc, "surface velocity");
            decode::surface_velocity(msg)
        }
        19 => {
            trace!(tc, "airborne velocity");
            decode::airborne_velocity(msg)
        }
        _ => Err(AdsbError::InconsistentMessage(format!(
            "TC={tc}, expecting TC 5-8 or 19"
        ))),
    }
}

/// Speed (kt) and track or heading (degrees) only.
pub fn decode_speed_heading(msg: &Message) -> Result<(Option<f64>, Option<f64>)> {
    let velocity = decode_velocity(msg)?;
    Ok((velocity.speed_kts, velocity.track_deg))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
