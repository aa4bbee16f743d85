//! Small addressing predicates shared by the receive engine.

use crate::frame::{Address, AddressingFieldsRepr};

use super::constants::BROADCAST_PAN_ID;

/// Whether a frame with the given addressing fields is destined for this
/// device.
///
/// `short_address`/`pan_id` are this device's own identity (from the
/// [`super::pib::Pib`]). A destination PAN id of [`BROADCAST_PAN_ID`] always
/// matches, as does the broadcast short address.
pub(crate) fn is_frame_for_us(
    extended_address: &[u8; 8],
    short_address: u16,
    pan_id: u16,
    addressing: &AddressingFieldsRepr,
) -> bool {
    let dst_pan_id = addressing.dst_pan_id.unwrap_or(BROADCAST_PAN_ID);
    if dst_pan_id != pan_id && dst_pan_id != BROADCAST_PAN_ID {
        return false;
    }

    match addressing.dst_address {
        Some(addr) if addr.is_broadcast() => true,
        Some(Address::Short(raw)) => u16::from_le_bytes(raw) == short_address,
        Some(Address::Extended(raw)) => &raw == extended_address,
        Some(Address::Absent) | None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_destination_always_matches() {
        let addressing = AddressingFieldsRepr {
            dst_pan_id: Some(0xabcd),
            dst_address: Some(Address::BROADCAST),
            ..Default::default()
        };
        assert!(is_frame_for_us(&[0; 8], 0x0001, 0xabcd, &addressing));
    }

    #[test]
    fn mismatched_pan_is_rejected() {
        let addressing = AddressingFieldsRepr {
            dst_pan_id: Some(0xabcd),
            dst_address: Some(Address::Short([0x01, 0x00])),
            ..Default::default()
        };
        assert!(!is_frame_for_us(&[0; 8], 0x0001, 0x1234, &addressing));
    }

    #[test]
    fn matching_short_address() {
        let addressing = AddressingFieldsRepr {
            dst_pan_id: Some(0xabcd),
            dst_address: Some(Address::Short([0x01, 0x00])),
            ..Default::default()
        };
        assert!(is_frame_for_us(&[0; 8], 0x0001, 0xabcd, &addressing));
    }
}
