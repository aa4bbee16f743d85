//! MAC-level error type.

use crate::phy::PhyError;

/// An error produced by the MAC sublayer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MacError {
    /// A caller-supplied argument is invalid (e.g. a zero-length payload, or
    /// a payload larger than the PHY's maximum packet size).
    InvalidArgument,
    /// A received buffer did not parse as a well-formed IEEE 802.15.4 frame.
    InvalidFrame,
    /// A received or to-be-sent frame would not fit in the available buffer.
    BufferOverflow,
    /// A reliable transmission's acknowledgement did not arrive before the
    /// wait-for-ack window elapsed, after exhausting all retries.
    NoAck,
    /// A non-matching frame arrived during the ACK-wait window. Aborts the
    /// transmission immediately; unlike [`MacError::NoAck`] this is never
    /// retried (see `DESIGN.md`).
    Collision,
    /// CSMA-CA found the channel busy on every attempt up to
    /// `macMaxCsmaBackoffs`. Aborts the transmission immediately, without
    /// retry.
    ChannelAccessFailure,
    /// The underlying PHY reported an error.
    Phy(PhyError),
}

impl From<PhyError> for MacError {
    fn from(err: PhyError) -> Self {
        MacError::Phy(err)
    }
}

impl core::fmt::Display for MacError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MacError::InvalidArgument => write!(f, "invalid argument"),
            MacError::InvalidFrame => write!(f, "invalid frame"),
            MacError::BufferOverflow => write!(f, "buffer overflow"),
            MacError::NoAck => write!(f, "no acknowledgement received"),
            MacError::Collision => write!(f, "collision: unexpected frame during ack wait"),
            MacError::ChannelAccessFailure => write!(f, "channel access failure"),
            MacError::Phy(err) => write!(f, "phy error: {err}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MacError {}
