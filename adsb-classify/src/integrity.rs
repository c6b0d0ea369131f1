//! Navigation integrity and accuracy: NIC, NACp, NACv, SIL and ADS-B version.
//!
//! NIC is not transmitted directly. It is implied by the position message
//! Type Code, refined by supplement bits whose meaning depends on the ADS-B
//! version announced in the operational status message (TC 31):
//!
//! | Version | Supplements               | Table        |
//! |---------|---------------------------|--------------|
//! | 0       | NICb (position msg)       | [`nic`]      |
//! | 1       | one supplement bit        | [`nic_v1`]   |
//! | 2       | NICa, NICc (TC 31), NICb  | [`nic_v2`]   |
//!
//! Every decoder rejects Type Codes outside its domain with
//! [`AdsbError::WrongMessageType`]. Type Codes inside the domain with no
//! defined category map to [`NIC_NOT_APPLICABLE`].

use crate::frame::{type_code, Message};
use crate::types::*;

/// Categorical "not applicable" result of the NIC tables and of SILs before version 2.
pub const NIC_NOT_APPLICABLE: i8 = -1;

const NIC_B_BIT: usize = 39;
const NIC_A_BIT: usize = 75;
// NICs (TC 31) occupies the same bit as NICa
const NIC_S_BIT: usize = 75;
const NIC_C_BIT: usize = 51;
const NAC_V: (usize, usize) = (42, 45);
const VERSION: (usize, usize) = (72, 75);

const AIRBORNE_POSITION: &str = "airborne position message, TC 9-18";
const ANY_POSITION: &str = "surface or airborne position message, TC 5-22";
const OPERATIONAL_STATUS: &str = "operational status message, TC 31";
const STATUS_OR_TARGET_STATE: &str = "target state and status or operational status message, TC 29 or 31";
const AIRBORNE_VELOCITY: &str = "airborne velocity message, TC 19";

fn require(msg: &Message, accept: impl Fn(u8) -> bool, expected: &'static str) -> Result<u8> {
    let tc = type_code(msg);
    if accept(tc) {
        Ok(tc)
    } else {
        Err(AdsbError::WrongMessageType { tc, expected })
    }
}

// ---------------------------------------------------------------------------
// NIC tables
// ---------------------------------------------------------------------------

fn nic_v0_table(tc: u8, nic_b: bool) -> i8 {
    match tc {
        0 | 18 | 22 => 0,
        17 => 1,
        16 => if nic_b { 3 } else { 2 },
        15 => 4,
        14 => 5,
        13 => 6,
        12 => 7,
        11 => if nic_b { 9 } else { 8 },
        10 | 21 => 10,
        9 | 20 => 11,
        _ => NIC_NOT_APPLICABLE,
    }
}

fn nic_v1_table(tc: u8, nic_sup: bool) -> i8 {
    match tc {
        0 | 8 | 18 | 22 => 0,
        17 => 1,
        16 => if nic_sup { 3 } else { 2 },
        15 => 4,
        14 => 5,
        // Supplement is read but both branches give 6.
        13 => match nic_sup {
            true => 6,
            false => 6,
        },
        12 => 7,
        11 => if nic_sup { 9 } else { 8 },
        6 | 10 | 21 => 10,
        5 | 9 | 20 => 11,
        7 => if nic_sup { 9 } else { 8 },
        _ => NIC_NOT_APPLICABLE,
    }
}

fn nic_v2_table(tc: u8, nic_a: bool, nic_b: bool, nic_c: bool) -> i8 {
    match tc {
        0 | 18 | 22 => 0,
        17 => 1,
        16 => if nic_a { 3 } else { 2 },
        15 => 4,
        14 => 5,
        // NICa and NICb are read but every branch gives 6.
        13 => match (nic_a, nic_b) {
            (true, _) => 6,
            (false, true) => 6,
            (false, false) => 6,
        },
        12 => 7,
        11 => if nic_a { 9 } else { 8 },
        6 | 10 | 21 => 10,
        5 | 9 | 20 => 11,
        8 => match (nic_a, nic_c) {
            (true, true) => 7,
            (true, false) => 6,
            (false, true) => 6,
            (false, false) => 0,
        },
        7 => if nic_a { 9 } else { 8 },
        _ => NIC_NOT_APPLICABLE,
    }
}

/// NIC (0-11) of an airborne position message, TC 9-18.
///
/// Uses the message's own NICb bit as the only supplement.
pub fn nic(msg: &Message) -> Result<i8> {
    let tc = require(msg, |tc| (9..=18).contains(&tc), AIRBORNE_POSITION)?;
    Ok(nic_v0_table(tc, msg.bit(NIC_B_BIT)))
}

/// Version 1 NIC of a position message, TC 5-22.
pub fn nic_v1(msg: &Message, nic_sup_b: bool) -> Result<i8> {
    let tc = require(msg, |tc| (5..=22).contains(&tc), ANY_POSITION)?;
    Ok(nic_v1_table(tc, nic_sup_b))
}

/// Version 2 NIC of a position message, TC 5-22.
pub fn nic_v2(msg: &Message, nic_a: bool, nic_b: bool, nic_c: bool) -> Result<i8> {
    let tc = require(msg, |tc| (5..=22).contains(&tc), ANY_POSITION)?;
    Ok(nic_v2_table(tc, nic_a, nic_b, nic_c))
}

/// NIC of a position message under the given ADS-B version.
///
/// Version 1 reads its single supplement from `supplements.b`.
pub fn nic_for_version(
    msg: &Message,
    version: AdsbVersion,
    supplements: NicSupplements,
) -> Result<i8> {
    match version {
        AdsbVersion::V0 => nic(msg),
        AdsbVersion::V1 => nic_v1(msg, supplements.b),
        AdsbVersion::V2 => nic_v2(msg, supplements.a, supplements.b, supplements.c),
        AdsbVersion::Reserved(n) => Err(AdsbError::UnsupportedVersion(n)),
    }
}

// ---------------------------------------------------------------------------
// NIC supplements
// ---------------------------------------------------------------------------

/// NICs supplement bit (bit 75) of an operational status message, TC 31.
pub fn nic_s(msg: &Message) -> Result<bool> {
    require(msg, |tc| tc == 31, OPERATIONAL_STATUS)?;
    Ok(msg.bit(NIC_S_BIT))
}

/// NICa (bit 75) and NICc (bit 51) of an operational status message, TC 31.
pub fn nic_a_and_c(msg: &Message) -> Result<(bool, bool)> {
    require(msg, |tc| tc == 31, OPERATIONAL_STATUS)?;
    Ok((msg.bit(NIC_A_BIT), msg.bit(NIC_C_BIT)))
}

/// NICb (bit 39) of an airborne position message, TC 9-18.
pub fn nic_b(msg: &Message) -> Result<bool> {
    require(msg, |tc| (9..=18).contains(&tc), AIRBORNE_POSITION)?;
    Ok(msg.bit(NIC_B_BIT))
}

// ---------------------------------------------------------------------------
// Accuracy and integrity levels
// ---------------------------------------------------------------------------

/// NACp, position accuracy category (0-11). TC 29 or 31.
pub fn nac_p(msg: &Message) -> Result<u8> {
    let tc = require(msg, |tc| tc == 29 || tc == 31, STATUS_OR_TARGET_STATE)?;
    let (start, end) = if tc == 29 { (71, 75) } else { (76, 80) };
    Ok(msg.bits(start, end) as u8)
}

/// NACv, velocity accuracy category (0-4). TC 19.
pub fn nac_v(msg: &Message) -> Result<u8> {
    require(msg, |tc| tc == 19, AIRBORNE_VELOCITY)?;
    Ok(msg.bits(NAC_V.0, NAC_V.1) as u8)
}

/// SIL and SILs. TC 29 or 31.
///
/// SILs only exists from version 2 on; earlier versions give
/// [`NIC_NOT_APPLICABLE`] for it.
pub fn sil(msg: &Message, version: AdsbVersion) -> Result<(u8, i8)> {
    let tc = require(msg, |tc| tc == 29 || tc == 31, STATUS_OR_TARGET_STATE)?;
    let (sil_range, sils_bit) = if tc == 29 { ((76, 78), 39) } else { ((82, 84), 86) };

    let sil = msg.bits(sil_range.0, sil_range.1) as u8;
    let sils = if version == AdsbVersion::V2 {
        msg.bit(sils_bit) as i8
    } else {
        NIC_NOT_APPLICABLE
    };
    Ok((sil, sils))
}

/// ADS-B version (bits 72-74). TC 29 or 31.
pub fn version(msg: &Message) -> Result<AdsbVersion> {
    require(msg, |tc| tc == 29 || tc == 31, STATUS_OR_TARGET_STATE)?;
    Ok(AdsbVersion::from_bits(msg.bits(VERSION.0, VERSION.1) as u8))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const NA: i8 = NIC_NOT_APPLICABLE;

    /// DF17 from ICAO 4840D6 with an all-zero ME field and the given TC.
    fn with_tc(tc: u8) -> Message {
        let mut bytes = [0u8; 14];
        bytes[..4].copy_from_slice(&[0x8D, 0x48, 0x40, 0xD6]);
        Message::from_bytes(bytes).with_bits(32, 5, tc as u64)
    }

    fn flag(value: bool) -> u64 {
        value as u64
    }

    // -- Version 0 --

    #[test]
    fn test_nic_table() {
        // (tc, nic with NICb = 0, nic with NICb = 1)
        let expected: [(u8, i8, i8); 10] = [
            (9, 11, 11),
            (10, 10, 10),
            (11, 8, 9),
            (12, 7, 7),
            (13, 6, 6),
            (14, 5, 5),
            (15, 4, 4),
            (16, 2, 3),
            (17, 1, 1),
            (18, 0, 0),
        ];
        for (tc, without, with) in expected {
            let msg = with_tc(tc);
            assert_eq!(nic(&msg).unwrap(), without, "TC={tc} NICb=0");
            assert_eq!(nic(&msg.with_bits(NIC_B_BIT, 1, 1)).unwrap(), with, "TC={tc} NICb=1");
        }
    }

    #[test]
    fn test_nic_known_frames() {
        let even: Message = "8D40621D58C382D690C8AC2863A7".parse().unwrap();
        assert_eq!(nic(&even).unwrap(), 8);
        assert!(!nic_b(&even).unwrap());
    }

    #[test]
    fn test_nic_outside_domain() {
        for tc in (0..9).chain(19..32) {
            let result = nic(&with_tc(tc));
            assert!(
                matches!(result, Err(AdsbError::WrongMessageType { tc: t, expected: AIRBORNE_POSITION }) if t == tc),
                "TC={tc}"
            );
        }
    }

    #[test]
    fn test_nic_v0_table_full() {
        // Table rows that the TC 9-18 domain never reaches
        assert_eq!(nic_v0_table(0, false), 0);
        assert_eq!(nic_v0_table(20, true), 11);
        assert_eq!(nic_v0_table(21, false), 10);
        assert_eq!(nic_v0_table(22, true), 0);
        assert_eq!(nic_v0_table(5, false), NA);
        assert_eq!(nic_v0_table(19, true), NA);
    }

    #[test]
    fn test_nic_depends_only_on_tc_and_nic_b() {
        let base = with_tc(11);
        // Scramble everything outside TC and NICb
        let noisy = base
            .with_bits(37, 2, 0b11)
            .with_bits(40, 48, 0xA5A5_A5A5_A5A5)
            .with_bits(88, 24, 0xFFFFFF);
        assert_eq!(nic(&noisy).unwrap(), nic(&base).unwrap());
    }

    // -- Version 1 --

    #[test]
    fn test_nic_v1_table() {
        // (tc, supplement = 0, supplement = 1), TC 5-22
        let expected: [(u8, i8, i8); 18] = [
            (5, 11, 11),
            (6, 10, 10),
            (7, 8, 9),
            (8, 0, 0),
            (9, 11, 11),
            (10, 10, 10),
            (11, 8, 9),
            (12, 7, 7),
            (13, 6, 6),
            (14, 5, 5),
            (15, 4, 4),
            (16, 2, 3),
            (17, 1, 1),
            (18, 0, 0),
            (19, NA, NA),
            (20, 11, 11),
            (21, 10, 10),
            (22, 0, 0),
        ];
        for (tc, without, with) in expected {
            let msg = with_tc(tc);
            assert_eq!(nic_v1(&msg, false).unwrap(), without, "TC={tc} sup=0");
            assert_eq!(nic_v1(&msg, true).unwrap(), with, "TC={tc} sup=1");
        }
    }

    #[test]
    fn test_nic_v1_tc13_supplement_has_no_effect() {
        // Degenerate branch kept as transmitted tables define it
        let msg = with_tc(13);
        assert_eq!(nic_v1(&msg, false).unwrap(), nic_v1(&msg, true).unwrap());
    }

    #[test]
    fn test_nic_v1_ignores_message_nic_b() {
        let msg = with_tc(11).with_bits(NIC_B_BIT, 1, 1);
        assert_eq!(nic_v1(&msg, false).unwrap(), 8);
    }

    #[test]
    fn test_nic_v1_outside_domain() {
        for tc in (0..5).chain(23..32) {
            assert!(
                matches!(nic_v1(&with_tc(tc), true), Err(AdsbError::WrongMessageType { expected: ANY_POSITION, .. })),
                "TC={tc}"
            );
        }
    }

    // -- Version 2 --

    fn expected_v2(tc: u8, a: bool, c: bool) -> i8 {
        match tc {
            5 | 9 | 20 => 11,
            6 | 10 | 21 => 10,
            7 | 11 => if a { 9 } else { 8 },
            8 => match (a, c) {
                (true, true) => 7,
                (true, false) | (false, true) => 6,
                (false, false) => 0,
            },
            12 => 7,
            13 => 6,
            14 => 5,
            15 => 4,
            16 => if a { 3 } else { 2 },
            17 => 1,
            18 | 22 => 0,
            _ => NA,
        }
    }

    #[test]
    fn test_nic_v2_table() {
        for tc in 5..=22 {
            let msg = with_tc(tc);
            for bits in 0..8u8 {
                let (a, b, c) = (bits & 4 != 0, bits & 2 != 0, bits & 1 != 0);
                assert_eq!(
                    nic_v2(&msg, a, b, c).unwrap(),
                    expected_v2(tc, a, c),
                    "TC={tc} a={a} b={b} c={c}"
                );
            }
        }
    }

    #[test]
    fn test_nic_v2_tc13_supplements_have_no_effect() {
        let msg = with_tc(13);
        for bits in 0..8u8 {
            let (a, b, c) = (bits & 4 != 0, bits & 2 != 0, bits & 1 != 0);
            assert_eq!(nic_v2(&msg, a, b, c).unwrap(), 6);
        }
    }

    #[test]
    fn test_nic_v2_tc8_nic_c() {
        let msg = with_tc(8);
        assert_eq!(nic_v2(&msg, true, false, true).unwrap(), 7);
        assert_eq!(nic_v2(&msg, true, false, false).unwrap(), 6);
        assert_eq!(nic_v2(&msg, false, false, true).unwrap(), 6);
        assert_eq!(nic_v2(&msg, false, false, false).unwrap(), 0);
    }

    #[test]
    fn test_nic_v2_outside_domain() {
        for tc in (0..5).chain(23..32) {
            assert!(nic_v2(&with_tc(tc), false, false, false).is_err(), "TC={tc}");
        }
    }

    #[test]
    fn test_nic_for_version() {
        let msg = with_tc(11).with_bits(NIC_B_BIT, 1, 1);
        let sup = NicSupplements { a: false, b: false, c: false };
        assert_eq!(nic_for_version(&msg, AdsbVersion::V0, sup).unwrap(), 9);
        assert_eq!(nic_for_version(&msg, AdsbVersion::V1, sup).unwrap(), 8);
        assert_eq!(nic_for_version(&msg, AdsbVersion::V2, sup).unwrap(), 8);

        let sup = NicSupplements { a: true, b: false, c: false };
        assert_eq!(nic_for_version(&msg, AdsbVersion::V2, sup).unwrap(), 9);

        assert!(matches!(
            nic_for_version(&msg, AdsbVersion::Reserved(3), sup),
            Err(AdsbError::UnsupportedVersion(3))
        ));
    }

    #[test]
    fn test_nic_for_version_surface_v0_rejected() {
        // Version 0 has no surface NIC
        assert!(nic_for_version(&with_tc(7), AdsbVersion::V0, NicSupplements::default()).is_err());
        assert_eq!(
            nic_for_version(&with_tc(7), AdsbVersion::V1, NicSupplements::default()).unwrap(),
            8
        );
    }

    // -- Supplements --

    #[test]
    fn test_nic_s() {
        let msg = with_tc(31);
        assert!(!nic_s(&msg).unwrap());
        assert!(nic_s(&msg.with_bits(NIC_S_BIT, 1, 1)).unwrap());
        assert!(matches!(
            nic_s(&with_tc(29)),
            Err(AdsbError::WrongMessageType { tc: 29, expected: OPERATIONAL_STATUS })
        ));
    }

    #[test]
    fn test_nic_a_and_c() {
        for (a, c) in [(false, false), (true, false), (false, true), (true, true)] {
            let msg = with_tc(31)
                .with_bits(NIC_A_BIT, 1, flag(a))
                .with_bits(NIC_C_BIT, 1, flag(c));
            assert_eq!(nic_a_and_c(&msg).unwrap(), (a, c));
        }
        assert!(nic_a_and_c(&with_tc(11)).is_err());
    }

    #[test]
    fn test_nic_b() {
        assert!(!nic_b(&with_tc(12)).unwrap());
        assert!(nic_b(&with_tc(12).with_bits(NIC_B_BIT, 1, 1)).unwrap());
        assert!(nic_b(&with_tc(20)).is_err());
        assert!(nic_b(&with_tc(31)).is_err());
    }

    // -- NACp / NACv --

    #[test]
    fn test_nac_p() {
        let msg = with_tc(29).with_bits(71, 4, 0b1010);
        assert_eq!(nac_p(&msg).unwrap(), 10);

        let msg = with_tc(31).with_bits(76, 4, 0b1001);
        assert_eq!(nac_p(&msg).unwrap(), 9);
        // TC 31 does not read the TC 29 offset
        let msg = with_tc(31).with_bits(71, 4, 0b1111);
        assert_eq!(nac_p(&msg).unwrap(), 0);

        assert!(matches!(
            nac_p(&with_tc(19)),
            Err(AdsbError::WrongMessageType { tc: 19, expected: STATUS_OR_TARGET_STATE })
        ));
    }

    #[test]
    fn test_nac_v() {
        let msg = with_tc(19).with_bits(42, 3, 0b011);
        assert_eq!(nac_v(&msg).unwrap(), 3);
        let velocity: Message = "8D485020994409940838175B284F".parse().unwrap();
        assert_eq!(nac_v(&velocity).unwrap(), 0);
        assert!(matches!(
            nac_v(&with_tc(11)),
            Err(AdsbError::WrongMessageType { tc: 11, expected: AIRBORNE_VELOCITY })
        ));
    }

    // -- SIL --

    #[test]
    fn test_sil_tc29() {
        let msg = with_tc(29).with_bits(76, 2, 0b11).with_bits(39, 1, 1);
        assert_eq!(sil(&msg, AdsbVersion::V2).unwrap(), (3, 1));
        assert_eq!(sil(&msg, AdsbVersion::V1).unwrap(), (3, NA));
        assert_eq!(sil(&msg, AdsbVersion::V0).unwrap(), (3, NA));
    }

    #[test]
    fn test_sil_tc31_reads_binary_field() {
        let msg = with_tc(31).with_bits(82, 2, 0b10).with_bits(86, 1, 0);
        assert_eq!(sil(&msg, AdsbVersion::V2).unwrap(), (2, 0));
        let msg = msg.with_bits(86, 1, 1);
        assert_eq!(sil(&msg, AdsbVersion::V2).unwrap(), (2, 1));
        assert_eq!(sil(&msg, AdsbVersion::V1).unwrap(), (2, NA));
    }

    #[test]
    fn test_sils_defined_for_v2_only() {
        for tc in [29u8, 31] {
            for raw in 0..=1u64 {
                let msg = with_tc(tc).with_bits(39, 1, raw).with_bits(86, 1, raw);
                let (_, sils) = sil(&msg, AdsbVersion::V2).unwrap();
                assert_ne!(sils, NA, "TC={tc}");
                for version in [AdsbVersion::V0, AdsbVersion::V1] {
                    assert_eq!(sil(&msg, version).unwrap().1, NA, "TC={tc} {version}");
                }
            }
        }
    }

    #[test]
    fn test_sil_outside_domain() {
        assert!(sil(&with_tc(30), AdsbVersion::V2).is_err());
        assert!(sil(&with_tc(11), AdsbVersion::V0).is_err());
    }

    // -- Version --

    #[test]
    fn test_version() {
        for (raw, expected) in [(0, AdsbVersion::V0), (1, AdsbVersion::V1), (2, AdsbVersion::V2)] {
            let msg = with_tc(31).with_bits(72, 3, raw);
            assert_eq!(version(&msg).unwrap(), expected);
        }
        let msg = with_tc(29).with_bits(72, 3, 2);
        assert_eq!(version(&msg).unwrap(), AdsbVersion::V2);
        assert!(matches!(
            version(&with_tc(19)),
            Err(AdsbError::WrongMessageType { tc: 19, .. })
        ));
    }

    #[test]
    fn test_decoders_are_pure() {
        let msg = with_tc(31).with_bits(72, 3, 2).with_bits(76, 4, 7);
        assert_eq!(version(&msg).unwrap(), version(&msg).unwrap());
        assert_eq!(nac_p(&msg).unwrap(), nac_p(&msg).unwrap());
        assert_eq!(sil(&msg, AdsbVersion::V2).unwrap(), sil(&msg, AdsbVersion::V2).unwrap());
    }
}
