//! ACK builder: synthesises the minimal 802.15.4 acknowledgement frame the
//! MAC emits for auto-ACK and nothing else (no pending-frame indication, no
//! addressing, no security — see the two resolved Open Questions this
//! module freezes).

use crate::frame::repr::{AddressingFieldsRepr, FrameControlRepr};
use crate::frame::{AddressingMode, FrameType, FrameVersion};
use crate::MacError;

/// Build an immediate ACK for `sequence_number` into `buffer`. Returns the
/// number of octets written (always 3: frame control + sequence number),
/// or [`MacError::BufferOverflow`] if `buffer` is too small.
pub(crate) fn build(sequence_number: u8, buffer: &mut [u8]) -> Result<usize, MacError> {
    let frame_control = FrameControlRepr {
        frame_type: FrameType::Ack,
        security_enabled: false,
        frame_pending: false,
        ack_request: false,
        pan_id_compression: false,
        sequence_number_suppression: false,
        dst_addressing_mode: AddressingMode::Absent,
        src_addressing_mode: AddressingMode::Absent,
        frame_version: FrameVersion::Ieee802154_2003,
    };

    let repr = crate::frame::FrameRepr {
        frame_control,
        sequence_number: Some(sequence_number),
        addressing_fields: AddressingFieldsRepr::default(),
        payload: &[],
    };

    repr.emit_header(buffer).ok_or(MacError::BufferOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;

    #[test]
    fn ack_round_trips() {
        let mut buffer = [0u8; 3];
        let n = build(0x17, &mut buffer).unwrap();
        assert_eq!(n, 3);

        let frame = Frame::new(&buffer[..n]).unwrap();
        let fc = frame.frame_control();
        assert_eq!(fc.frame_type(), FrameType::Ack);
        assert_eq!(frame.sequence_number(), Some(0x17));
        assert_eq!(frame.addressing().len(&fc), 0);
    }

    #[test]
    fn rejects_undersized_buffer() {
        let mut buffer = [0u8; 2];
        assert_eq!(build(0x01, &mut buffer), Err(MacError::BufferOverflow));
    }
}
