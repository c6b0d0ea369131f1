//! Compact Position Reporting — CPR decode for ADS-B positions.
//!
//! Two decode modes, each for airborne and surface messages:
//! - Global: requires an even+odd frame pair received close together.
//! - Local: single frame + reference position (~180nm airborne, ~45nm surface).
//!
//! Key constants:
//! - NZ = 15 (latitude zones per hemisphere for even frames)
//! - Nb = 17 (bits per coordinate)
//! - Dlat_even = 360 / (4 * NZ) = 6.0 degrees airborne, a quarter of that on the surface
//! - Dlat_odd = 360 / (4 * NZ - 1) ≈ 6.1017 degrees airborne
//!
//! Surface encoding spans 90 degrees instead of 360, so a surface pair
//! resolves to one of four longitudes and one of two hemispheres; the
//! reference position picks the candidate.

use crate::frame::Message;

/// Number of latitude zones per hemisphere.
const NZ: f64 = 15.0;

/// Bits per CPR coordinate.
const NB: u32 = 17;

/// Maximum CPR value (2^17 = 131072).
const CPR_MAX: f64 = (1u32 << NB) as f64;

/// Maximum time between even/odd airborne frames for global decode (seconds).
pub const MAX_PAIR_AGE: f64 = 10.0;

/// Maximum time between even/odd surface frames for global decode (seconds).
pub const MAX_SURFACE_PAIR_AGE: f64 = 50.0;

/// Angular extent of the CPR encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Span {
    Airborne,
    Surface,
}

impl Span {
    fn degrees(self) -> f64 {
        match self {
            Span::Airborne => 360.0,
            Span::Surface => 90.0,
        }
    }
}

// ---------------------------------------------------------------------------
// CPR fields
// ---------------------------------------------------------------------------

/// Raw CPR fields of a position message (TC 5-18, 20-22).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CprFrame {
    /// 17-bit encoded latitude (bits 54-70)
    pub lat: u32,
    /// 17-bit encoded longitude (bits 71-87)
    pub lon: u32,
    /// CPR format flag (bit 53): false = even, true = odd
    pub odd: bool,
}

impl CprFrame {
    pub fn from_message(msg: &Message) -> Self {
        CprFrame {
            lat: msg.bits(54, 71) as u32,
            lon: msg.bits(71, 88) as u32,
            odd: msg.bit(53),
        }
    }
}

// ---------------------------------------------------------------------------
// Zone math
// ---------------------------------------------------------------------------

/// Number of longitude zones at a given latitude (NL function).
///
/// Ranges from 1 near poles to 59 at equator.
pub fn nl(lat: f64) -> i32 {
    if lat.abs() >= 87.0 {
        return 1;
    }

    let a = 1.0 - (std::f64::consts::PI / (2.0 * NZ)).cos();
    let b = (std::f64::consts::PI / 180.0 * lat.abs()).cos().powi(2);
    let nl_val = (2.0 * std::f64::consts::PI / (1.0 - a / b).acos()).floor() as i32;
    nl_val.max(1)
}

/// Modulo that always returns a non-negative result.
fn modulo(x: f64, y: f64) -> f64 {
    x - y * (x / y).floor()
}

/// Candidate latitudes (even, odd) from a frame pair, before hemisphere fixing.
fn pair_latitudes(span: Span, lat_even_cpr: f64, lat_odd_cpr: f64) -> (f64, f64) {
    let dlat_even = span.degrees() / (4.0 * NZ);
    let dlat_odd = span.degrees() / (4.0 * NZ - 1.0);

    // Latitude zone index j
    let j = (59.0 * lat_even_cpr - 60.0 * lat_odd_cpr + 0.5).floor();

    let lat_e = dlat_even * (modulo(j, 60.0) + lat_even_cpr);
    let lat_o = dlat_odd * (modulo(j, 59.0) + lat_odd_cpr);
    (lat_e, lat_o)
}

/// Longitude from a frame pair, using the frame selected by `use_odd`.
fn pair_longitude(span: Span, lat: f64, lon_even_cpr: f64, lon_odd_cpr: f64, use_odd: bool) -> f64 {
    let nl_val = nl(lat);
    let (n_lon, lon_cpr) = if use_odd {
        ((nl_val - 1).max(1), lon_odd_cpr)
    } else {
        (nl_val.max(1), lon_even_cpr)
    };
    let dlon = span.degrees() / n_lon as f64;
    let m = (lon_even_cpr * (nl_val - 1) as f64 - lon_odd_cpr * nl_val as f64 + 0.5).floor();
    dlon * (modulo(m, n_lon as f64) + lon_cpr)
}

// ---------------------------------------------------------------------------
// Global decode
// ---------------------------------------------------------------------------

/// Global airborne CPR decode from an even/odd frame pair.
///
/// Returns `(latitude, longitude)` in degrees, or `None` if decode fails
/// (e.g., zone boundary crossing or pair too old).
pub fn global_decode(
    lat_even: u32,
    lon_even: u32,
    lat_odd: u32,
    lon_odd: u32,
    t_even: f64,
    t_odd: f64,
) -> Option<(f64, f64)> {
    if (t_even - t_odd).abs() > MAX_PAIR_AGE {
        return None;
    }

    let lon_even_cpr = lon_even as f64 / CPR_MAX;
    let lon_odd_cpr = lon_odd as f64 / CPR_MAX;

    let (mut lat_e, mut lat_o) = pair_latitudes(
        Span::Airborne,
        lat_even as f64 / CPR_MAX,
        lat_odd as f64 / CPR_MAX,
    );

    // Normalize to [-90, 90]
    if lat_e >= 270.0 {
        lat_e -= 360.0;
    }
    if lat_o >= 270.0 {
        lat_o -= 360.0;
    }

    // Both latitudes must give the same NL value
    if nl(lat_e) != nl(lat_o) {
        return None;
    }

    let use_odd = t_even < t_odd;
    let lat = if use_odd { lat_o } else { lat_e };
    let mut lon = pair_longitude(Span::Airborne, lat, lon_even_cpr, lon_odd_cpr, use_odd);

    // Normalize longitude to [-180, 180]
    if lon >= 180.0 {
        lon -= 360.0;
    }

    Some((round6(lat), round6(lon)))
}

/// Global surface CPR decode from an even/odd frame pair.
///
/// The reference position selects the hemisphere and the longitude quadrant.
#[allow(clippy::too_many_arguments)]
pub fn surface_global_decode(
    lat_even: u32,
    lon_even: u32,
    lat_odd: u32,
    lon_odd: u32,
    t_even: f64,
    t_odd: f64,
    ref_lat: f64,
    ref_lon: f64,
) -> Option<(f64, f64)> {
    if (t_even - t_odd).abs() > MAX_SURFACE_PAIR_AGE {
        return None;
    }

    let lon_even_cpr = lon_even as f64 / CPR_MAX;
    let lon_odd_cpr = lon_odd as f64 / CPR_MAX;

    let (mut lat_e, mut lat_o) = pair_latitudes(
        Span::Surface,
        lat_even as f64 / CPR_MAX,
        lat_odd as f64 / CPR_MAX,
    );

    // Northern solution is in [0, 90); southern one is 90 degrees below
    if ref_lat < 0.0 {
        lat_e -= 90.0;
        lat_o -= 90.0;
    }

    if nl(lat_e) != nl(lat_o) {
        return None;
    }

    let use_odd = t_even < t_odd;
    let lat = if use_odd { lat_o } else { lat_e };
    let lon = pair_longitude(Span::Surface, lat, lon_even_cpr, lon_odd_cpr, use_odd);

    // Four candidates 90 degrees apart; the closest to the reference wins
    let lon = (0..4)
        .map(|k| modulo(lon + k as f64 * 90.0 + 180.0, 360.0) - 180.0)
        .min_by(|a, b| (ref_lon - a).abs().total_cmp(&(ref_lon - b).abs()))
        .unwrap_or(lon);

    Some((round6(lat), round6(lon)))
}

// ---------------------------------------------------------------------------
// Local decode
// ---------------------------------------------------------------------------

fn local_decode_span(
    span: Span,
    cpr_lat: u32,
    cpr_lon: u32,
    cpr_odd: bool,
    ref_lat: f64,
    ref_lon: f64,
) -> (f64, f64) {
    let i = if cpr_odd { 1.0 } else { 0.0 };
    let dlat = span.degrees() / (4.0 * NZ - i);

    let cpr_lat_norm = cpr_lat as f64 / CPR_MAX;
    let cpr_lon_norm = cpr_lon as f64 / CPR_MAX;

    // Latitude zone index from reference
    let j = (ref_lat / dlat).floor()
        + (modulo(ref_lat, dlat) / dlat - cpr_lat_norm + 0.5).floor();
    let mut lat = dlat * (j + cpr_lat_norm);

    // Longitude zone size at this latitude
    let nl_val = nl(lat);
    let n_lon = (nl_val - i as i32).max(1);
    let dlon = span.degrees() / n_lon as f64;

    // Longitude zone index from reference
    let m = (ref_lon / dlon).floor()
        + (modulo(ref_lon, dlon) / dlon - cpr_lon_norm + 0.5).floor();
    let mut lon = dlon * (m + cpr_lon_norm);

    if lat > 90.0 {
        lat -= 360.0;
    }
    if lon >= 180.0 {
        lon -= 360.0;
    }

    (round6(lat), round6(lon))
}

/// Local airborne CPR decode using a reference position.
///
/// Valid when the aircraft is within ~180nm of the reference.
pub fn local_decode(
    cpr_lat: u32,
    cpr_lon: u32,
    cpr_odd: bool,
    ref_lat: f64,
    ref_lon: f64,
) -> (f64, f64) {
    local_decode_span(Span::Airborne, cpr_lat, cpr_lon, cpr_odd, ref_lat, ref_lon)
}

/// Local surface CPR decode. Valid within ~45nm of the reference.
pub fn surface_local_decode(
    cpr_lat: u32,
    cpr_lon: u32,
    cpr_odd: bool,
    ref_lat: f64,
    ref_lon: f64,
) -> (f64, f64) {
    local_decode_span(Span::Surface, cpr_lat, cpr_lon, cpr_odd, ref_lat, ref_lon)
}

// ---------------------------------------------------------------------------
// Message-level solvers
// ---------------------------------------------------------------------------

/// Resolve an airborne even/odd message pair. `None` if the frames are not
/// one even plus one odd, too far apart in time, or straddle a zone boundary.
pub fn airborne_position(
    msg_even: &Message,
    msg_odd: &Message,
    t_even: f64,
    t_odd: f64,
) -> Option<(f64, f64)> {
    let even = CprFrame::from_message(msg_even);
    let odd = CprFrame::from_message(msg_odd);
    if even.odd || !odd.odd {
        return None;
    }
    global_decode(even.lat, even.lon, odd.lat, odd.lon, t_even, t_odd)
}

/// Resolve a single airborne position message against a nearby reference.
pub fn airborne_position_with_ref(msg: &Message, ref_lat: f64, ref_lon: f64) -> (f64, f64) {
    let frame = CprFrame::from_message(msg);
    local_decode(frame.lat, frame.lon, frame.odd, ref_lat, ref_lon)
}

/// Resolve a surface even/odd message pair near the reference position.
pub fn surface_position(
    msg_even: &Message,
    msg_odd: &Message,
    t_even: f64,
    t_odd: f64,
    ref_lat: f64,
    ref_lon: f64,
) -> Option<(f64, f64)> {
    let even = CprFrame::from_message(msg_even);
    let odd = CprFrame::from_message(msg_odd);
    if even.odd || !odd.odd {
        return None;
    }
    surface_global_decode(
        even.lat, even.lon, odd.lat, odd.lon, t_even, t_odd, ref_lat, ref_lon,
    )
}

/// Resolve a single surface position message against a nearby reference.
pub fn surface_position_with_ref(msg: &Message, ref_lat: f64, ref_lon: f64) -> (f64, f64) {
    let frame = CprFrame::from_message(msg);
    surface_local_decode(frame.lat, frame.lon, frame.odd, ref_lat, ref_lon)
}

/// Round to 6 decimal places.
fn round6(val: f64) -> f64 {
    (val * 1_000_000.0).round() / 1_000_000.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
