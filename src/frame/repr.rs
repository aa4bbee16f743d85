//! High-level, owned representations of frame fields — the building-block
//! half of the codec (parse into these, or construct one and [`FrameRepr::emit`]
//! it into a buffer).

use super::{Address, AddressingFields, AddressingMode, Frame, FrameControl, FrameType, FrameVersion};

/// A high-level representation of the IEEE 802.15.4 Frame Control field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameControlRepr {
    pub frame_type: FrameType,
    pub security_enabled: bool,
    pub frame_pending: bool,
    pub ack_request: bool,
    pub pan_id_compression: bool,
    pub sequence_number_suppression: bool,
    pub dst_addressing_mode: AddressingMode,
    pub src_addressing_mode: AddressingMode,
    pub frame_version: FrameVersion,
}

impl FrameControlRepr {
    /// Parse a [`FrameControlRepr`] out of a [`FrameControl`] reader.
    pub fn parse(fc: FrameControl<impl AsRef<[u8]>>) -> Self {
        Self {
            frame_type: fc.frame_type(),
            security_enabled: fc.security_enabled(),
            frame_pending: fc.frame_pending(),
            ack_request: fc.ack_request(),
            pan_id_compression: fc.pan_id_compression(),
            sequence_number_suppression: fc.sequence_number_suppression(),
            dst_addressing_mode: fc.dst_addressing_mode(),
            src_addressing_mode: fc.src_addressing_mode(),
            frame_version: fc.frame_version(),
        }
    }

    /// The length, in octets, of the Frame Control field. Always 2.
    pub fn buffer_len(&self) -> usize {
        2
    }

    /// Emit this representation into a [`FrameControl`] writer.
    pub fn emit(&self, fc: &mut FrameControl<impl AsRef<[u8]> + AsMut<[u8]>>) {
        fc.set_frame_type(self.frame_type);
        fc.set_security_enabled(self.security_enabled);
        fc.set_frame_pending(self.frame_pending);
        fc.set_ack_request(self.ack_request);
        fc.set_pan_id_compression(self.pan_id_compression);
        fc.set_sequence_number_suppression(self.sequence_number_suppression);
        fc.set_dst_addressing_mode(self.dst_addressing_mode);
        fc.set_src_addressing_mode(self.src_addressing_mode);
        fc.set_frame_version(self.frame_version);
    }
}

/// A high-level representation of the IEEE 802.15.4 Addressing Fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressingFieldsRepr {
    pub dst_pan_id: Option<u16>,
    pub src_pan_id: Option<u16>,
    pub dst_address: Option<Address>,
    pub src_address: Option<Address>,
}

impl AddressingFieldsRepr {
    /// Parse the Addressing Fields from the given reader.
    pub fn parse(addressing: AddressingFields<impl AsRef<[u8]>>, fc: FrameControl<impl AsRef<[u8]>>) -> Self {
        Self {
            dst_pan_id: addressing.dst_pan_id(&fc),
            src_pan_id: addressing.src_pan_id(&fc),
            dst_address: addressing.dst_address(&fc),
            src_address: addressing.src_address(&fc),
        }
    }

    /// Return the length of the Addressing Fields in octets.
    pub fn buffer_len(&self) -> usize {
        (if self.dst_pan_id.is_some() { 2 } else { 0 })
            + self.dst_address.map(AddressingMode::from).map(|m| m.size()).unwrap_or(0)
            + (if self.src_pan_id.is_some() { 2 } else { 0 })
            + self.src_address.map(AddressingMode::from).map(|m| m.size()).unwrap_or(0)
    }

    /// Emit the Addressing Fields into the given writer.
    pub fn emit(&self, af: &mut AddressingFields<impl AsRef<[u8]> + AsMut<[u8]>>) {
        af.write_fields(self);
    }
}

/// A high-level, owned representation of an IEEE 802.15.4 frame header plus
/// payload, sufficient to reconstruct or emit the header octets this crate
/// touches (frame control, sequence number, addressing fields).
#[derive(Debug)]
pub struct FrameRepr<'p> {
    pub frame_control: FrameControlRepr,
    pub sequence_number: Option<u8>,
    pub addressing_fields: AddressingFieldsRepr,
    pub payload: &'p [u8],
}

impl<'f> FrameRepr<'f> {
    /// Parse a full frame into its high-level representation.
    pub fn parse(frame: &Frame<&'f [u8]>) -> Self {
        Self {
            frame_control: FrameControlRepr::parse(frame.frame_control()),
            sequence_number: frame.sequence_number(),
            addressing_fields: AddressingFieldsRepr::parse(frame.addressing(), frame.frame_control()),
            payload: frame.payload().unwrap_or(&[]),
        }
    }

    /// The length, in octets, of the header this representation describes
    /// (frame control + optional sequence number + addressing fields).
    pub fn header_len(&self) -> usize {
        self.frame_control.buffer_len()
            + (!self.frame_control.sequence_number_suppression as usize)
            + self.addressing_fields.buffer_len()
    }

    /// Emit the header (not the payload) into `buffer`. Returns the number
    /// of octets written, or `None` if `buffer` is too small.
    pub fn emit_header(&self, buffer: &mut [u8]) -> Option<usize> {
        let len = self.header_len();
        if buffer.len() < len {
            return None;
        }

        let mut fc = FrameControl::new_unchecked(&mut buffer[..2]);
        self.frame_control.emit(&mut fc);

        let mut offset = 2;
        if let Some(seq) = self.sequence_number {
            buffer[offset] = seq;
            offset += 1;
        }

        let mut af = AddressingFields::new(&mut buffer[offset..]);
        self.addressing_fields.emit(&mut af);

        Some(len)
    }
}
