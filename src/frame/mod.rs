//! Zero-copy read and write structures for the slice of the IEEE 802.15.4
//! frame format the MAC sublayer needs: the Frame Control field, the
//! sequence number, and the addressing fields. Information Elements,
//! auxiliary security headers and TSCH-specific frame shapes are out of
//! scope (see the crate-level Non-goals) and are not modeled here.
//!
//! [`Frame::new`] wraps a received octet buffer for reading; [`repr::FrameRepr`]
//! builds a header from scratch (used by the MAC's ACK builder).

mod addressing;
pub use addressing::{Address, AddressingFields, AddressingMode};

mod frame_control;
pub use frame_control::{FrameControl, FrameType, FrameVersion};

pub mod repr;
pub use repr::FrameRepr;

/// An error parsing or constructing an IEEE 802.15.4 frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Error;

/// A type alias for `Result<T, frame::Error>`.
pub type Result<T> = core::result::Result<T, Error>;

/// A reader/writer for an IEEE 802.15.4 frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> Frame<T> {
    /// Create a new IEEE 802.15.4 frame reader/writer.
    ///
    /// This is a combination of [`Frame::new_unchecked`] and a length check.
    pub fn new(data: T) -> Result<Self> {
        let frame = Self::new_unchecked(data);

        if !frame.check_len() {
            return Err(Error);
        }

        Ok(frame)
    }

    /// Create a new IEEE 802.15.4 frame reader/writer, without checking the
    /// buffer length.
    pub fn new_unchecked(data: T) -> Self {
        Self { buffer: data }
    }

    /// Check if the buffer is long enough to contain a valid IEEE 802.15.4
    /// frame header. Does not validate the frame contents.
    pub fn check_len(&self) -> bool {
        let buffer = self.buffer.as_ref();

        if buffer.len() < 2 {
            return false;
        }

        let fc = self.frame_control();
        if !fc.sequence_number_suppression() && buffer.len() < 3 {
            return false;
        }

        buffer.len() >= 2 + (!fc.sequence_number_suppression() as usize) + self.addressing().len(&fc)
    }

    /// Return a [`FrameControl`] reader.
    pub fn frame_control(&self) -> FrameControl<&'_ [u8]> {
        FrameControl::new_unchecked(&self.buffer.as_ref()[..2])
    }

    /// Return the sequence number, if not suppressed.
    pub fn sequence_number(&self) -> Option<u8> {
        if self.frame_control().sequence_number_suppression() {
            None
        } else {
            Some(self.buffer.as_ref()[2])
        }
    }

    /// Return an [`AddressingFields`] reader.
    pub fn addressing(&self) -> AddressingFields<&'_ [u8]> {
        let offset = 2 + (!self.frame_control().sequence_number_suppression() as usize);
        AddressingFields::new(&self.buffer.as_ref()[offset..])
    }
}

impl<'f, T: AsRef<[u8]> + ?Sized> Frame<&'f T> {
    /// Return the payload of the frame, if any bytes remain after the
    /// header.
    pub fn payload(&self) -> Option<&'f [u8]> {
        let fc = self.frame_control();
        let offset = 2
            + (!fc.sequence_number_suppression() as usize)
            + self.addressing().len(&fc);

        let buffer = self.buffer.as_ref();
        if buffer.len() <= offset {
            return None;
        }

        Some(&buffer[offset..])
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Frame<T> {
    /// Write the Frame Control field from a [`repr::FrameControlRepr`].
    pub fn set_frame_control(&mut self, fc: &repr::FrameControlRepr) {
        let mut w = FrameControl::new_unchecked(&mut self.buffer.as_mut()[..2]);
        fc.emit(&mut w);
    }

    /// Write the sequence number, clearing the suppression bit.
    pub fn set_sequence_number(&mut self, sequence_number: u8) {
        let mut w = FrameControl::new_unchecked(&mut self.buffer.as_mut()[..2]);
        w.set_sequence_number_suppression(false);
        self.buffer.as_mut()[2] = sequence_number;
    }

    /// Write the Addressing Fields from a [`repr::AddressingFieldsRepr`].
    pub fn set_addressing_fields(&mut self, fields: &repr::AddressingFieldsRepr) {
        let offset = 2 + (!self.frame_control().sequence_number_suppression() as usize);
        let mut w = AddressingFields::new(&mut self.buffer.as_mut()[offset..]);
        fields.emit(&mut w);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ack_frame() {
        // frame control (Ack, v2003, no addressing), seq=0x17
        let buf = [0x02, 0x00, 0x17];
        let frame = Frame::new(&buf[..]).unwrap();
        let fc = frame.frame_control();

        assert_eq!(fc.frame_type(), FrameType::Ack);
        assert_eq!(fc.frame_version(), FrameVersion::Ieee802154_2003);
        assert!(!fc.ack_request());
        assert_eq!(frame.sequence_number(), Some(0x17));
        assert_eq!(frame.addressing().len(&fc), 0);
        assert_eq!(frame.payload(), None);
    }

    #[test]
    fn short_buffer_is_rejected() {
        assert!(Frame::new(&[0x00][..]).is_err());
    }

    #[test]
    fn parse_data_frame_with_short_addressing() {
        // frame control: type=Data, dst=short, src=short, pan compression=0
        let mut fc_bits: u16 = FrameType::Data as u16;
        fc_bits |= (AddressingMode::Short as u16) << 10;
        fc_bits |= (AddressingMode::Short as u16) << 14;
        let fc_bytes = fc_bits.to_le_bytes();

        let buf = [
            fc_bytes[0], fc_bytes[1], // frame control
            0x2a,       // sequence number
            0xcd, 0xab, // dst pan id
            0x02, 0x00, // dst short addr
            0xef, 0xbe, // src pan id
            0x01, 0x00, // src short addr
            0xaa, 0xbb, // payload
        ];

        let frame = Frame::new(&buf[..]).unwrap();
        let fc = frame.frame_control();
        assert_eq!(frame.sequence_number(), Some(0x2a));

        let addressing = frame.addressing();
        assert_eq!(addressing.dst_pan_id(&fc), Some(0xabcd));
        assert_eq!(addressing.dst_address(&fc), Some(Address::Short([0x02, 0x00])));
        assert_eq!(addressing.src_pan_id(&fc), Some(0xbeef));
        assert_eq!(addressing.src_address(&fc), Some(Address::Short([0x01, 0x00])));
        assert_eq!(frame.payload(), Some(&[0xaa, 0xbb][..]));
    }
}
