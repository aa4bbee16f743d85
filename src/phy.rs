//! The lower-layer collaborator trait the MAC drives: a blocking,
//! single-channel IEEE 802.15.4 radio.
//!
//! This is a deliberately narrow slice of a real transceiver driver surface
//! (compare the teacher's async `Radio` trait): on/off, send, read, a Clear
//! Channel Assessment primitive for CSMA-CA, and an ioctl passthrough for
//! everything else (channel, transmit power, address filters, ...) that the
//! MAC itself has no opinion about.

/// Outcome of a Clear Channel Assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CcaStatus {
    /// The channel is idle; it is safe to transmit.
    Idle,
    /// The channel is occupied by another transmission.
    ChannelBusy,
}

/// An error reported by the PHY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhyError {
    /// The radio is off and cannot perform the requested operation.
    NotOn,
    /// The supplied buffer is too small (on read) or too large (on send) for
    /// the radio's maximum packet size.
    InvalidLength,
    /// The ioctl command is not supported by this PHY implementation.
    UnsupportedIoctl,
    /// An implementation-specific transceiver fault.
    Transceiver,
}

impl core::fmt::Display for PhyError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PhyError::NotOn => write!(f, "radio is off"),
            PhyError::InvalidLength => write!(f, "invalid packet length"),
            PhyError::UnsupportedIoctl => write!(f, "unsupported ioctl"),
            PhyError::Transceiver => write!(f, "transceiver fault"),
        }
    }
}

/// A PHY-layer ioctl command, passed through verbatim by [`crate::mac::Mac::ioctl`]
/// for anything the MAC has no opinion about (channel selection, transmit
/// power, extended address, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhyIoctl {
    /// Select the IEEE 802.15.4 channel number.
    SetChannel(u8),
    /// Set the radio's transmit power, in dBm.
    SetTxPower(i8),
}

/// The blocking radio driver surface the MAC sublayer drives.
///
/// Implementations are expected to be non-reentrant: the MAC never calls
/// back into itself from within a `Phy` method, and never holds two `&mut
/// Phy` borrows at once.
pub trait Phy {
    /// Turn the radio on (RX idle).
    fn on(&mut self);

    /// Turn the radio off.
    fn off(&mut self);

    /// Transmit `buffer` as a single PHY packet. Returns once the packet has
    /// left the radio (not once any ACK has been received — ACK handling is
    /// the MAC's job).
    fn send(&mut self, buffer: &[u8]) -> Result<(), PhyError>;

    /// Perform a Clear Channel Assessment and report whether the channel is
    /// idle.
    fn cca(&mut self) -> Result<CcaStatus, PhyError>;

    /// `true` if a frame is currently being received (used by the MAC to
    /// decide whether it may start a CSMA-CA attempt).
    fn is_rx_busy(&mut self) -> bool;

    /// If a frame has been received since the last call, copy it into
    /// `buffer` and return its length. Returns `None` if nothing is pending.
    fn read_received(&mut self, buffer: &mut [u8]) -> Result<Option<usize>, PhyError>;

    /// Apply a PHY-specific ioctl.
    fn ioctl(&mut self, cmd: PhyIoctl) -> Result<(), PhyError>;
}
