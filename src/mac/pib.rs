//! PAN Information Base: the device's own addressing identity and the
//! CSMA-CA/retry parameters it operates under.
#![allow(dead_code)]

use super::constants::*;

/// PAN Information Base (PIB), the subset of attributes this MAC sublayer
/// reads. Beacon-order, association and security attributes are out of
/// scope (see the crate-level Non-goals) and are not modeled.
pub struct Pib {
    /// The 8-octet extended address assigned to this device.
    pub(crate) extended_address: [u8; 8],
    /// The short address this device uses to communicate in the PAN.
    pub(crate) short_address: u16,
    /// The identifier of the PAN this device is operating on.
    pub(crate) pan_id: u16,
    /// The maximum value of the backoff exponent (BE) in CSMA-CA.
    pub(crate) max_be: u8,
    /// The minimum value of the backoff exponent (BE) in CSMA-CA.
    pub(crate) min_be: u8,
    /// The maximum number of retries allowed after a transmission failure.
    pub(crate) max_frame_retries: u8,
    /// The maximum number of backoffs CSMA-CA attempts before declaring a
    /// channel access failure.
    pub(crate) max_csma_backoffs: u8,
}

impl Default for Pib {
    fn default() -> Self {
        Self {
            extended_address: [0; 8],
            short_address: 0xffff,
            pan_id: MAC_PAN_ID,
            max_be: MAC_MAX_BE,
            min_be: MAC_MIN_BE,
            max_frame_retries: MAC_MAX_FRAME_RETRIES,
            max_csma_backoffs: MAC_MAX_CSMA_BACKOFFS,
        }
    }
}

impl Pib {
    /// Install the device's own addressing identity.
    pub fn set_address(&mut self, extended_address: [u8; 8], short_address: u16, pan_id: u16) {
        self.extended_address = extended_address;
        self.short_address = short_address;
        self.pan_id = pan_id;
    }
}
