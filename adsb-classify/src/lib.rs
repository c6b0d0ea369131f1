//! adsb-classify: Type Code dispatch and integrity decoding for ADS-B
//! extended squitter messages.
//!
//! Pure and stateless: every function maps a parsed [`Message`] (plus, for a
//! few, caller-supplied supplements or a reference position) to a value or an
//! [`AdsbError`].
//!
//! ```
//! use adsb_classify::{decode_altitude, nic, type_code, Message};
//!
//! let msg: Message = "8D40621D58C382D690C8AC2863A7".parse().unwrap();
//! assert_eq!(type_code(&msg), 11);
//! assert_eq!(decode_altitude(&msg).unwrap(), Some(38000));
//! assert_eq!(nic(&msg).unwrap(), 8);
//! ```

pub mod adsb;
pub mod cpr;
pub mod decode;
pub mod frame;
pub mod integrity;
pub mod types;

// Re-export commonly used items at crate root
pub use adsb::{
    decode_altitude, decode_position_pair, decode_position_single, decode_speed_heading,
    decode_velocity, odd_even_flag,
};
pub use frame::{downlink_format, icao_address, type_code, Message};
pub use integrity::{
    nac_p, nac_v, nic, nic_a_and_c, nic_b, nic_for_version, nic_s, nic_v1, nic_v2, sil, version,
    NIC_NOT_APPLICABLE,
};
pub use types::*;
