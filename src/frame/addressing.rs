//! IEEE 802.15.4 addressing fields reader and writer.

use super::FrameControl;
use super::FrameVersion;

/// An IEEE 802.15.4 address.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Address {
    /// The address is absent.
    Absent,
    /// A short (16-bit) address.
    Short([u8; 2]),
    /// An extended (64-bit) address.
    Extended([u8; 8]),
}

impl Address {
    /// The broadcast short address, `0xffff`.
    pub const BROADCAST: Address = Address::Short([0xff; 2]);

    /// Query whether the address is a unicast address.
    pub fn is_unicast(&self) -> bool {
        !self.is_broadcast()
    }

    /// Query whether this address is the broadcast address.
    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }

    /// Query whether the address is absent.
    pub fn is_absent(&self) -> bool {
        matches!(self, Address::Absent)
    }
}

/// IEEE 802.15.4 addressing mode, as carried in the Frame Control field.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum AddressingMode {
    /// The address is absent.
    Absent = 0b00,
    /// The address is a short address.
    Short = 0b10,
    /// The address is an extended address.
    Extended = 0b11,
    /// Unknown addressing mode (the reserved `0b01` encoding).
    Unknown,
}

impl AddressingMode {
    /// Return the size of the address in octets.
    pub fn size(&self) -> usize {
        match self {
            Self::Absent => 0,
            Self::Short => 2,
            Self::Extended => 8,
            Self::Unknown => 0,
        }
    }
}

impl From<u8> for AddressingMode {
    fn from(value: u8) -> Self {
        match value {
            0b00 => Self::Absent,
            0b10 => Self::Short,
            0b11 => Self::Extended,
            _ => Self::Unknown,
        }
    }
}

impl From<Address> for AddressingMode {
    fn from(value: Address) -> Self {
        match value {
            Address::Absent => AddressingMode::Absent,
            Address::Short(_) => AddressingMode::Short,
            Address::Extended(_) => AddressingMode::Extended,
        }
    }
}

/// A reader/writer for the IEEE 802.15.4 Addressing Fields.
///
/// This crate only ever needs the pre-2020 (`Ieee802154_2003`/`Ieee802154_2006`)
/// PAN-ID-compression rules: if both addresses are present and PAN
/// compression is set, the source PAN ID is elided; if only one address is
/// present, its PAN ID is always carried.
pub struct AddressingFields<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> AddressingFields<T> {
    /// Create a new [`AddressingFields`] reader/writer from a given buffer,
    /// without checking the length (the caller is expected to have sized the
    /// buffer via [`AddressingFields::<&[u8]>::len`] first).
    pub fn new(buffer: T) -> Self {
        Self { buffer }
    }

    fn present_flags(fc: &FrameControl<impl AsRef<[u8]>>) -> (bool, AddressingMode, bool, AddressingMode) {
        use AddressingMode::*;
        let dst = fc.dst_addressing_mode();
        let src = fc.src_addressing_mode();
        let compressed = fc.pan_id_compression();

        match (dst, src, compressed) {
            (Absent, Absent, _) => (false, Absent, false, Absent),
            (d, Absent, _) => (true, d, false, Absent),
            (Absent, s, _) => (false, Absent, true, s),
            (d, s, false) => (true, d, true, s),
            (d, s, true) => (true, d, false, s),
        }
    }

    /// Return the length of the Addressing Fields in octets, given the
    /// frame's [`FrameControl`].
    pub fn len(&self, fc: &FrameControl<impl AsRef<[u8]>>) -> usize {
        let (dst_pan, dst, src_pan, src) = Self::present_flags(fc);
        (if dst_pan { 2 } else { 0 })
            + dst.size()
            + (if src_pan { 2 } else { 0 })
            + src.size()
    }

    /// Return the IEEE 802.15.4 destination [`Address`], if present.
    pub fn dst_address(&self, fc: &FrameControl<impl AsRef<[u8]>>) -> Option<Address> {
        let (dst_pan, dst, _, _) = Self::present_flags(fc);
        let offset = if dst_pan { 2 } else { 0 };
        Self::read_address(self.buffer.as_ref(), offset, dst)
    }

    /// Return the IEEE 802.15.4 source [`Address`], if present.
    pub fn src_address(&self, fc: &FrameControl<impl AsRef<[u8]>>) -> Option<Address> {
        let (dst_pan, dst, src_pan, src) = Self::present_flags(fc);
        let mut offset = if dst_pan { 2 } else { 0 };
        offset += dst.size();
        offset += if src_pan { 2 } else { 0 };
        Self::read_address(self.buffer.as_ref(), offset, src)
    }

    /// Return the IEEE 802.15.4 destination PAN ID, if not elided.
    pub fn dst_pan_id(&self, fc: &FrameControl<impl AsRef<[u8]>>) -> Option<u16> {
        let (dst_pan, _, _, _) = Self::present_flags(fc);
        dst_pan.then(|| {
            let b = &self.buffer.as_ref()[..2];
            u16::from_le_bytes([b[0], b[1]])
        })
    }

    /// Return the IEEE 802.15.4 source PAN ID, if not elided.
    pub fn src_pan_id(&self, fc: &FrameControl<impl AsRef<[u8]>>) -> Option<u16> {
        let (dst_pan, dst, src_pan, _) = Self::present_flags(fc);
        if !src_pan {
            return None;
        }
        let offset = (if dst_pan { 2 } else { 0 }) + dst.size();
        let b = &self.buffer.as_ref()[offset..][..2];
        Some(u16::from_le_bytes([b[0], b[1]]))
    }

    fn read_address(buf: &[u8], offset: usize, mode: AddressingMode) -> Option<Address> {
        match mode {
            AddressingMode::Absent => Some(Address::Absent),
            AddressingMode::Short => {
                let mut raw = [0u8; 2];
                raw.copy_from_slice(&buf[offset..offset + 2]);
                Some(Address::Short(raw))
            }
            AddressingMode::Extended => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(&buf[offset..offset + 8]);
                Some(Address::Extended(raw))
            }
            AddressingMode::Unknown => None,
        }
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> AddressingFields<T> {
    /// Write the addressing fields described by a [`super::repr::AddressingFieldsRepr`].
    pub fn write_fields(&mut self, fields: &super::repr::AddressingFieldsRepr) {
        let mut offset = 0;

        if let Some(id) = fields.dst_pan_id {
            self.buffer.as_mut()[offset..][..2].copy_from_slice(&id.to_le_bytes());
            offset += 2;
        }

        if let Some(addr) = fields.dst_address {
            offset += Self::write_address(&mut self.buffer.as_mut()[offset..], addr);
        }

        if let Some(id) = fields.src_pan_id {
            self.buffer.as_mut()[offset..][..2].copy_from_slice(&id.to_le_bytes());
            offset += 2;
        }

        if let Some(addr) = fields.src_address {
            Self::write_address(&mut self.buffer.as_mut()[offset..], addr);
        }
    }

    fn write_address(buf: &mut [u8], addr: Address) -> usize {
        match addr {
            Address::Absent => 0,
            Address::Short(value) => {
                buf[..2].copy_from_slice(&value);
                2
            }
            Address::Extended(value) => {
                buf[..8].copy_from_slice(&value);
                8
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_predicates() {
        assert!(Address::Absent.is_absent());
        assert!(Address::BROADCAST.is_broadcast());
        assert!(!Address::BROADCAST.is_unicast());
        assert!(Address::Short([0x01, 0x02]).is_unicast());
    }

    #[test]
    fn addressing_mode_from_bits() {
        assert_eq!(AddressingMode::from(0b00), AddressingMode::Absent);
        assert_eq!(AddressingMode::from(0b10), AddressingMode::Short);
        assert_eq!(AddressingMode::from(0b11), AddressingMode::Extended);
        assert_eq!(AddressingMode::from(0b01), AddressingMode::Unknown);
    }
}
