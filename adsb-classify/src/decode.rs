//! Field decoders the dispatchers delegate to.
//!
//! - TC 1-4:  Aircraft category and callsign
//! - TC 5-8:  Surface movement (ground speed) and ground track
//! - TC 19:   Airborne velocity (ground speed or airspeed, vertical rate)
//! - TC 19:   GNSS minus barometric altitude difference
//!
//! Bit offsets are absolute message indices (the ME field starts at bit 32).

use crate::frame::{type_code, Message};
use crate::types::*;

// ---------------------------------------------------------------------------
// Identification
// ---------------------------------------------------------------------------

fn require_identification(msg: &Message) -> Result<()> {
    let tc = type_code(msg);
    if !(1..=4).contains(&tc) {
        return Err(AdsbError::WrongMessageType {
            tc,
            expected: "identification message, TC 1-4",
        });
    }
    Ok(())
}

/// Aircraft category (ME bits 6-8). TC 1-4.
pub fn category(msg: &Message) -> Result<u8> {
    require_identification(msg)?;
    Ok(msg.bits(37, 40) as u8)
}

/// Callsign: 8 characters of 6 bits each (bits 40-87). TC 1-4.
pub fn callsign(msg: &Message) -> Result<String> {
    require_identification(msg)?;

    let mut callsign = String::with_capacity(8);
    for i in 0..8 {
        let start = 40 + i * 6;
        let idx = msg.bits(start, start + 6) as usize;
        callsign.push(CALLSIGN_CHARSET[idx] as char);
    }
    Ok(callsign)
}

// ---------------------------------------------------------------------------
// Airborne velocity
// ---------------------------------------------------------------------------

/// Decode TC 19: airborne velocity.
///
/// Subtypes 1/2 carry east-west and north-south ground speed components,
/// subtypes 3/4 carry airspeed and magnetic heading. Subtypes 2 and 4 are
/// supersonic (4 kt resolution).
pub fn airborne_velocity(msg: &Message) -> Result<Velocity> {
    let tc = type_code(msg);
    if tc != 19 {
        return Err(AdsbError::WrongMessageType {
            tc,
            expected: "airborne velocity message, TC 19",
        });
    }

    let subtype = msg.bits(37, 40) as u8;
    let factor = if matches!(subtype, 2 | 4) { 4 } else { 1 };
    let vertical_rate_fpm = vertical_rate(msg);

    match subtype {
        1 | 2 => Ok(decode_ground_velocity(msg, factor, vertical_rate_fpm)),
        3 | 4 => Ok(decode_airspeed(msg, factor, vertical_rate_fpm)),
        _ => Err(AdsbError::UnsupportedSubtype { tc, subtype }),
    }
}

fn decode_ground_velocity(msg: &Message, factor: i32, vertical_rate_fpm: Option<i32>) -> Velocity {
    let ew_dir = msg.bit(45); // true = West
    let ew_raw = msg.bits(46, 56) as i32;
    let ns_dir = msg.bit(56); // true = South
    let ns_raw = msg.bits(57, 67) as i32;

    let (speed, track) = if ew_raw > 0 && ns_raw > 0 {
        let ew = (ew_raw - 1) * factor;
        let ns = (ns_raw - 1) * factor;
        let vx = if ew_dir { -ew } else { ew } as f64;
        let vy = if ns_dir { -ns } else { ns } as f64;
        let spd = (vx * vx + vy * vy).sqrt();
        let trk = vx.atan2(vy).to_degrees().rem_euclid(360.0);
        (Some(round2(spd)), Some(round2(trk)))
    } else {
        (None, None)
    };

    Velocity {
        speed_kts: speed,
        track_deg: track,
        vertical_rate_fpm,
        speed_type: SpeedType::Ground,
    }
}

fn decode_airspeed(msg: &Message, factor: i32, vertical_rate_fpm: Option<i32>) -> Velocity {
    let heading = if msg.bit(45) {
        Some(round2(msg.bits(46, 56) as f64 * 360.0 / 1024.0))
    } else {
        None
    };

    let speed_raw = msg.bits(57, 67) as i32;
    let speed = if speed_raw > 0 {
        Some(((speed_raw - 1) * factor) as f64)
    } else {
        None
    };

    Velocity {
        speed_kts: speed,
        track_deg: heading,
        vertical_rate_fpm,
        speed_type: if msg.bit(56) {
            SpeedType::TAS
        } else {
            SpeedType::IAS
        },
    }
}

/// Vertical rate in ft/min (bits 68-77). `None` when unavailable.
fn vertical_rate(msg: &Message) -> Option<i32> {
    let down = msg.bit(68);
    let raw = msg.bits(69, 78) as i32;
    if raw == 0 {
        return None;
    }
    let rate = (raw - 1) * 64;
    Some(if down { -rate } else { rate })
}

/// GNSS height minus barometric altitude in feet (bits 80-87). TC 19.
pub fn altitude_diff(msg: &Message) -> Result<Option<i32>> {
    let tc = type_code(msg);
    if tc != 19 {
        return Err(AdsbError::WrongMessageType {
            tc,
            expected: "airborne velocity message, TC 19",
        });
    }

    let below = msg.bit(80);
    let raw = msg.bits(81, 88) as i32;
    if raw == 0 || raw == 127 {
        return Ok(None);
    }
    let diff = (raw - 1) * 25;
    Ok(Some(if below { -diff } else { diff }))
}

// ---------------------------------------------------------------------------
// Surface movement
// ---------------------------------------------------------------------------

/// Movement code breakpoints and their ground speeds (kt).
/// Speed is linear between breakpoints.
const MOVEMENT_STEPS: [(u32, f64); 7] = [
    (2, 0.125),
    (9, 1.0),
    (13, 2.0),
    (39, 15.0),
    (94, 70.0),
    (109, 100.0),
    (124, 175.0),
];

/// Ground speed in knots from the 7-bit movement field.
fn movement_speed(mov: u32) -> Option<f64> {
    match mov {
        0 | 125.. => None,
        1 => Some(0.0),
        124 => Some(175.0),
        _ => {
            let i = MOVEMENT_STEPS.iter().position(|&(code, _)| code > mov)?;
            let (code_lo, kts_lo) = MOVEMENT_STEPS[i - 1];
            let (code_hi, kts_hi) = MOVEMENT_STEPS[i];
            let step = (kts_hi - kts_lo) / (code_hi - code_lo) as f64;
            Some(round2(kts_lo + (mov - code_lo) as f64 * step))
        }
    }
}

/// Decode TC 5-8: surface movement and ground track.
///
/// Vertical rate is always 0 on the surface.
pub fn surface_velocity(msg: &Message) -> Result<Velocity> {
    let tc = type_code(msg);
    if !(5..=8).contains(&tc) {
        return Err(AdsbError::WrongMessageType {
            tc,
            expected: "surface position message, TC 5-8",
        });
    }

    let speed = movement_speed(msg.bits(37, 44) as u32);
    let track = if msg.bit(44) {
        Some(round2(msg.bits(45, 52) as f64 * 360.0 / 128.0))
    } else {
        None
    };

    Ok(Velocity {
        speed_kts: speed,
        track_deg: track,
        vertical_rate_fpm: Some(0),
        speed_type: SpeedType::Ground,
    })
}

/// Round to 2 decimal places, ties to even.
fn round2(val: f64) -> f64 {
    (val * 100.0).round_ties_even() / 100.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
