//! The MAC core: transmit engine (CSMA-CA, PHY send, ACK wait, retry),
//! receive engine (parse, ACK correlation, auto-ACK, upper dispatch), and
//! the lifecycle/ioctl surface tying them together.

mod ack;
pub mod constants;
pub mod pib;
mod utils;

use embedded_hal::delay::DelayNs;
use rand_core::RngCore;

use crate::frame::repr::{AddressingFieldsRepr, FrameControlRepr};
use crate::frame::{Address, AddressingMode, Frame, FrameRepr, FrameType, FrameVersion};
use crate::phy::{Phy, PhyIoctl};
use crate::upper::UpperLayer;
use crate::{debug, trace, warn, MacError, Timer};

use constants::{PACKETBUF_SIZE, WFA_MS};
pub use pib::Pib;

/// A frame queued for transmission by the upper layer.
///
/// `sequence_number` is supplied by the caller (this crate does not own a
/// sequence-number generator, matching the original's `dsn`-is-upper-owned
/// convention).
pub struct TxRequest<'p> {
    pub payload: &'p [u8],
    pub dst_pan: u16,
    pub dst_addr: Address,
    pub reliable: bool,
    pub max_transmissions: u8,
    pub sequence_number: u8,
}

impl TxRequest<'_> {
    /// Whether this request targets the broadcast address.
    pub fn is_broadcast(&self) -> bool {
        self.dst_addr.is_broadcast()
    }
}

/// A command accepted by [`Mac::ioctl`].
pub enum MacIoctl {
    /// Install (or clear, with `None`) the TX-completion callback.
    TxCallbackSet(Option<fn(Result<(), MacError>)>),
    /// Forwarded verbatim to the PHY.
    Other(PhyIoctl),
}

/// Outcome of an ACK-wait window, as observed by the receive path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WaitOutcome {
    Ok,
    NoAck,
    Collision,
}

/// IEEE 802.15.4 MAC sublayer driver.
///
/// Generic over its three collaborators: the radio ([`Phy`]), a one-shot
/// millisecond timer plus microsecond busy-delay ([`Timer`] +
/// [`embedded_hal::delay::DelayNs`]), and a random number generator
/// ([`RngCore`]) used by CSMA-CA's backoff draw. Static dispatch throughout,
/// matching the teacher's own preference for generic collaborators over
/// trait objects.
pub struct Mac<P: Phy, T: Timer + DelayNs, R: RngCore> {
    phy: P,
    timer: T,
    rng: R,
    pib: Pib,
    awaiting_ack: bool,
    has_data: bool,
    /// Set by [`Mac::recv`] while `awaiting_ack` is true; consumed by
    /// [`Mac::wait_for_ack`] at the end of the window.
    wait_outcome: Option<WaitOutcome>,
    expected_seq: u8,
    tx_cb: Option<fn(Result<(), MacError>)>,
}

impl<P: Phy, T: Timer + DelayNs, R: RngCore> Mac<P, T, R> {
    /// Create a new MAC instance. `pib` should already carry the device's
    /// addressing identity (see [`Pib::set_address`]).
    pub fn new(pib: Pib, phy: P, timer: T, rng: R) -> Self {
        Self {
            phy,
            timer,
            rng,
            pib,
            awaiting_ack: false,
            has_data: false,
            wait_outcome: None,
            expected_seq: 0,
            tx_cb: None,
        }
    }

    /// Turn the radio on.
    pub fn on(&mut self) -> Result<(), MacError> {
        self.phy.on();
        Ok(())
    }

    /// Turn the radio off.
    pub fn off(&mut self) -> Result<(), MacError> {
        self.phy.off();
        Ok(())
    }

    /// Apply a MAC- or PHY-level ioctl.
    pub fn ioctl(&mut self, cmd: MacIoctl) -> Result<(), MacError> {
        match cmd {
            MacIoctl::TxCallbackSet(cb) => {
                self.tx_cb = cb;
                Ok(())
            }
            MacIoctl::Other(cmd) => Ok(self.phy.ioctl(cmd)?),
        }
    }

    /// Transmit `req`, running CSMA-CA, waiting for acknowledgement (if
    /// reliable and unicast), and retrying on timeout up to the PIB's
    /// `max_frame_retries` ceiling. On completion, `upper.tx_done` is called
    /// and the installed TX callback (if any) fires, both exactly once, with
    /// the same result.
    pub fn send(&mut self, upper: &mut impl UpperLayer, req: TxRequest<'_>) -> Result<(), MacError> {
        if req.payload.is_empty() || req.payload.len() > PACKETBUF_SIZE {
            return Err(MacError::InvalidArgument);
        }

        let is_broadcast = req.is_broadcast();
        let ack_required = req.reliable && !is_broadcast;
        // `max_transmissions` counts the first send; the retry budget is one less.
        let max_retries = req
            .max_transmissions
            .saturating_sub(1)
            .min(self.pib.max_frame_retries);

        enum State {
            Cca,
            Tx,
            WaitAck,
        }

        let mut state = State::Cca;
        let mut retries_used = 0u8;

        let result = loop {
            match state {
                State::Cca => {
                    match crate::csma::channel_access(
                        &mut self.phy,
                        &mut self.rng,
                        &mut self.timer,
                        self.pib.min_be,
                        self.pib.max_be,
                        self.pib.max_csma_backoffs,
                    ) {
                        Ok(()) => state = State::Tx,
                        Err(e) => break Err(e),
                    }
                }
                State::Tx => {
                    let mut buf = [0u8; PACKETBUF_SIZE];
                    let n = match self.build_data_frame(&req, ack_required, &mut buf) {
                        Ok(n) => n,
                        Err(e) => break Err(e),
                    };

                    if let Err(e) = self.phy.send(&buf[..n]) {
                        break Err(MacError::from(e));
                    }

                    if !ack_required {
                        break Ok(());
                    }

                    self.expected_seq = req.sequence_number;
                    self.awaiting_ack = true;
                    state = State::WaitAck;
                }
                State::WaitAck => match self.wait_for_ack(upper) {
                    WaitOutcome::Ok => break Ok(()),
                    WaitOutcome::Collision => break Err(MacError::Collision),
                    WaitOutcome::NoAck => {
                        if retries_used < max_retries {
                            retries_used += 1;
                            debug!("mac: ack timeout, retry {}/{}", retries_used, max_retries);
                            state = State::Cca;
                        } else {
                            break Err(MacError::NoAck);
                        }
                    }
                },
            }
        };

        self.awaiting_ack = false;
        if let Some(cb) = self.tx_cb {
            cb(result);
        }
        upper.tx_done(result);
        result
    }

    /// Deliver a frame read from the PHY. Invalid or oversize frames are
    /// silently dropped (not an error condition for the caller pumping the
    /// radio).
    pub fn recv(&mut self, upper: &mut impl UpperLayer, buf: &[u8]) -> Result<(), MacError> {
        if buf.is_empty() {
            return Err(MacError::InvalidArgument);
        }

        if buf.len() > PACKETBUF_SIZE {
            warn!("mac: oversize frame ({} bytes), dropping", buf.len());
            return Ok(());
        }

        let frame = match Frame::new(buf) {
            Ok(frame) => frame,
            Err(_) => {
                warn!("mac: header parse failed, dropping");
                return Ok(());
            }
        };

        let fc = frame.frame_control();
        self.has_data = true;

        if self.awaiting_ack {
            if fc.frame_type() == FrameType::Ack && frame.sequence_number() == Some(self.expected_seq) {
                trace!("mac: ack matched for seq {}", self.expected_seq);
                self.wait_outcome = Some(WaitOutcome::Ok);
            } else {
                debug!("mac: non-matching frame during ack wait, collision");
                self.wait_outcome = Some(WaitOutcome::Collision);
            }
            return Ok(());
        }

        match fc.frame_type() {
            FrameType::Data | FrameType::Command => {
                let addressing = AddressingFieldsRepr::parse(frame.addressing(), frame.frame_control());
                let for_us = utils::is_frame_for_us(
                    &self.pib.extended_address,
                    self.pib.short_address,
                    self.pib.pan_id,
                    &addressing,
                );
                let is_broadcast = addressing.dst_address.map(|a| a.is_broadcast()).unwrap_or(false);

                if fc.ack_request() && for_us && !is_broadcast {
                    if let Some(seq) = frame.sequence_number() {
                        self.send_ack(seq);
                    }
                }

                upper.received(frame.payload().unwrap_or(&[]));
            }
            FrameType::Ack => {
                trace!("mac: unsolicited ack, dropping");
            }
            _ => {
                warn!("mac: unsupported frame type, dropping");
            }
        }

        Ok(())
    }

    fn send_ack(&mut self, sequence_number: u8) {
        let mut buf = [0u8; 3];
        match ack::build(sequence_number, &mut buf) {
            Ok(n) => {
                if let Err(e) = self.phy.send(&buf[..n]) {
                    warn!("mac: ack send failed: {}", e);
                }
            }
            Err(_) => warn!("mac: ack buffer overflow"),
        }
    }

    fn wait_for_ack(&mut self, upper: &mut impl UpperLayer) -> WaitOutcome {
        self.timer.start(WFA_MS);
        self.has_data = false;
        self.wait_outcome = None;

        'outer: while self.timer.is_running() {
            if self.phy.is_rx_busy() {
                loop {
                    self.drain_one(upper);
                    if self.has_data {
                        break 'outer;
                    }
                }
            }
        }

        self.timer.stop();
        self.wait_outcome.take().unwrap_or(WaitOutcome::NoAck)
    }

    fn drain_one(&mut self, upper: &mut impl UpperLayer) {
        let mut buf = [0u8; PACKETBUF_SIZE];
        if let Ok(Some(n)) = self.phy.read_received(&mut buf) {
            let _ = self.recv(upper, &buf[..n]);
        }
    }

    fn build_data_frame(
        &self,
        req: &TxRequest<'_>,
        ack_required: bool,
        buf: &mut [u8],
    ) -> Result<usize, MacError> {
        let pan_id_compression = req.dst_pan == self.pib.pan_id;

        let frame_control = FrameControlRepr {
            frame_type: FrameType::Data,
            security_enabled: false,
            frame_pending: false,
            ack_request: ack_required,
            pan_id_compression,
            sequence_number_suppression: false,
            dst_addressing_mode: AddressingMode::from(req.dst_addr),
            src_addressing_mode: AddressingMode::Short,
            frame_version: FrameVersion::Ieee802154_2003,
        };

        let addressing_fields = AddressingFieldsRepr {
            dst_pan_id: Some(req.dst_pan),
            dst_address: Some(req.dst_addr),
            src_pan_id: if pan_id_compression { None } else { Some(self.pib.pan_id) },
            src_address: Some(Address::Short(self.pib.short_address.to_le_bytes())),
        };

        let repr = FrameRepr {
            frame_control,
            sequence_number: Some(req.sequence_number),
            addressing_fields,
            payload: req.payload,
        };

        let header_len = repr.emit_header(buf).ok_or(MacError::BufferOverflow)?;
        let total = header_len + req.payload.len();
        if total > buf.len() {
            return Err(MacError::BufferOverflow);
        }
        buf[header_len..total].copy_from_slice(req.payload);
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::ack;
    use crate::phy::{CcaStatus, PhyError};
    use crate::upper::tests::TestUpperLayer;
    use heapless::Vec;

    struct ScriptedPhy {
        cca: CcaStatus,
        send_results: Vec<Result<(), PhyError>, 8>,
        rx_queue: Vec<heapless::Vec<u8, 32>, 8>,
        rx_cursor: usize,
        send_count: usize,
        /// The rx queue is only considered non-empty once at least this many
        /// `send` calls have been observed, so a scripted ack can be made to
        /// "arrive" only on a retry rather than the first attempt.
        rx_ready_after_sends: usize,
    }

    impl Default for ScriptedPhy {
        fn default() -> Self {
            Self {
                cca: CcaStatus::Idle,
                send_results: Vec::new(),
                rx_queue: Vec::new(),
                rx_cursor: 0,
                send_count: 0,
                rx_ready_after_sends: 0,
            }
        }
    }

    impl Phy for ScriptedPhy {
        fn on(&mut self) {}
        fn off(&mut self) {}

        fn send(&mut self, _buffer: &[u8]) -> Result<(), PhyError> {
            self.send_count += 1;
            if self.send_results.is_empty() {
                Ok(())
            } else {
                self.send_results.remove(0)
            }
        }

        fn cca(&mut self) -> Result<CcaStatus, PhyError> {
            Ok(self.cca)
        }

        fn is_rx_busy(&mut self) -> bool {
            self.send_count >= self.rx_ready_after_sends && self.rx_cursor < self.rx_queue.len()
        }

        fn read_received(&mut self, buffer: &mut [u8]) -> Result<Option<usize>, PhyError> {
            if self.rx_cursor >= self.rx_queue.len() {
                return Ok(None);
            }
            let frame = &self.rx_queue[self.rx_cursor];
            self.rx_cursor += 1;
            buffer[..frame.len()].copy_from_slice(frame);
            Ok(Some(frame.len()))
        }

        fn ioctl(&mut self, _cmd: PhyIoctl) -> Result<(), PhyError> {
            Ok(())
        }
    }

    struct NoDelayTimer {
        running: bool,
    }

    impl Timer for NoDelayTimer {
        fn start(&mut self, _period_ms: u32) {
            self.running = true;
        }
        fn stop(&mut self) {
            self.running = false;
        }
        fn is_running(&mut self) -> bool {
            core::mem::take(&mut self.running)
        }
    }

    impl DelayNs for NoDelayTimer {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn test_mac(phy: ScriptedPhy) -> Mac<ScriptedPhy, NoDelayTimer, rand::rngs::mock::StepRng> {
        let mut pib = Pib::default();
        pib.set_address([0; 8], 0x0001, 0xabcd);
        Mac::new(pib, phy, NoDelayTimer { running: false }, rand::rngs::mock::StepRng::new(0, 1))
    }

    fn ack_frame(seq: u8) -> heapless::Vec<u8, 32> {
        let mut buf = [0u8; 3];
        let n = ack::build(seq, &mut buf).unwrap();
        heapless::Vec::from_slice(&buf[..n]).unwrap()
    }

    /// S1 — happy unicast: one send, one ack, Ok.
    #[test]
    fn happy_unicast() {
        let mut phy = ScriptedPhy::default();
        let _ = phy.rx_queue.push(ack_frame(0x17));
        let mut mac = test_mac(phy);
        let mut upper = TestUpperLayer::default();

        let result = mac.send(
            &mut upper,
            TxRequest {
                payload: &[0xaa; 40],
                dst_pan: 0xabcd,
                dst_addr: Address::Short([0x02, 0x00]),
                reliable: true,
                max_transmissions: 3,
                sequence_number: 0x17,
            },
        );

        assert_eq!(result, Ok(()));
        assert!(!mac.awaiting_ack);
    }

    /// S2 — retry then success: first wait times out empty, second attempt's
    /// ack arrives.
    #[test]
    fn retry_then_success() {
        let mut phy = ScriptedPhy::default();
        phy.rx_ready_after_sends = 2;
        let _ = phy.rx_queue.push(ack_frame(0x17));
        let mut mac = test_mac(phy);
        let mut upper = TestUpperLayer::default();

        let result = mac.send(
            &mut upper,
            TxRequest {
                payload: &[0xaa; 10],
                dst_pan: 0xabcd,
                dst_addr: Address::Short([0x02, 0x00]),
                reliable: true,
                max_transmissions: 3,
                sequence_number: 0x17,
            },
        );

        assert_eq!(result, Ok(()));
        assert_eq!(mac.phy.send_count, 2);
        assert_eq!(upper.tx_results.len(), 1);
        assert_eq!(upper.tx_results[0], Ok(()));
    }

    /// S3 — collision abort: non-ack frame arrives during wait, no retry.
    #[test]
    fn collision_aborts_without_retry() {
        let mut phy = ScriptedPhy::default();
        // a beacon-typed frame (not an ack) carrying seq 0x42
        let mut buf = [0u8; 3];
        let n = ack::build(0x42, &mut buf).unwrap();
        let mut raw = heapless::Vec::<u8, 32>::from_slice(&buf[..n]).unwrap();
        raw[0] &= !0b111; // clear frame-type bits: Ack(0b010) -> Beacon(0b000)
        let _ = phy.rx_queue.push(raw);

        let mut mac = test_mac(phy);
        let mut upper = TestUpperLayer::default();

        let result = mac.send(
            &mut upper,
            TxRequest {
                payload: &[0xaa; 10],
                dst_pan: 0xabcd,
                dst_addr: Address::Short([0x02, 0x00]),
                reliable: true,
                max_transmissions: 3,
                sequence_number: 0x17,
            },
        );

        assert_eq!(result, Err(MacError::Collision));
        assert_eq!(upper.received.len(), 0);
    }

    /// S4 — no-ack exhaustion: every wait window times out.
    #[test]
    fn no_ack_exhaustion() {
        let phy = ScriptedPhy::default();
        let mut mac = test_mac(phy);
        let mut upper = TestUpperLayer::default();

        let result = mac.send(
            &mut upper,
            TxRequest {
                payload: &[0xaa; 10],
                dst_pan: 0xabcd,
                dst_addr: Address::Short([0x02, 0x00]),
                reliable: true,
                max_transmissions: 2,
                sequence_number: 0x17,
            },
        );

        assert_eq!(result, Err(MacError::NoAck));
    }

    /// S6 — channel-access failure: CCA stays busy for every backoff, zero
    /// PHY-sends.
    #[test]
    fn channel_access_exhaustion_has_zero_sends() {
        let mut phy = ScriptedPhy::default();
        phy.cca = CcaStatus::ChannelBusy;
        let mut mac = test_mac(phy);
        let mut upper = TestUpperLayer::default();

        let result = mac.send(
            &mut upper,
            TxRequest {
                payload: &[0xaa; 10],
                dst_pan: 0xabcd,
                dst_addr: Address::Short([0x02, 0x00]),
                reliable: true,
                max_transmissions: 3,
                sequence_number: 0x17,
            },
        );

        assert_eq!(result, Err(MacError::ChannelAccessFailure));
        assert_eq!(mac.phy.send_count, 0);
    }

    /// Invariant 1: broadcasts never enter the ack-wait phase.
    #[test]
    fn broadcast_never_awaits_ack() {
        let phy = ScriptedPhy::default();
        let mut mac = test_mac(phy);
        let mut upper = TestUpperLayer::default();

        let result = mac.send(
            &mut upper,
            TxRequest {
                payload: &[0xaa; 10],
                dst_pan: 0xabcd,
                dst_addr: Address::BROADCAST,
                reliable: true,
                max_transmissions: 3,
                sequence_number: 0x01,
            },
        );

        assert_eq!(result, Ok(()));
        assert!(!mac.awaiting_ack);
    }

    #[test]
    fn zero_length_payload_is_invalid_argument() {
        let phy = ScriptedPhy::default();
        let mut mac = test_mac(phy);
        let mut upper = TestUpperLayer::default();

        let result = mac.send(
            &mut upper,
            TxRequest {
                payload: &[],
                dst_pan: 0xabcd,
                dst_addr: Address::Short([0x02, 0x00]),
                reliable: true,
                max_transmissions: 3,
                sequence_number: 0x01,
            },
        );

        assert_eq!(result, Err(MacError::InvalidArgument));
    }

    #[test]
    fn recv_rejects_empty_buffer() {
        let phy = ScriptedPhy::default();
        let mut mac = test_mac(phy);
        let mut upper = TestUpperLayer::default();

        assert_eq!(mac.recv(&mut upper, &[]), Err(MacError::InvalidArgument));
        assert_eq!(upper.received.len(), 0);
    }

    /// S5 — auto-ack on receive of an addressed data frame.
    #[test]
    fn auto_ack_on_receive() {
        let phy = ScriptedPhy::default();
        let mut mac = test_mac(phy);
        let mut upper = TestUpperLayer::default();

        let frame_control = FrameControlRepr {
            frame_type: FrameType::Data,
            security_enabled: false,
            frame_pending: false,
            ack_request: true,
            pan_id_compression: true,
            sequence_number_suppression: false,
            dst_addressing_mode: AddressingMode::Short,
            src_addressing_mode: AddressingMode::Short,
            frame_version: FrameVersion::Ieee802154_2003,
        };
        let addressing_fields = AddressingFieldsRepr {
            dst_pan_id: Some(0xabcd),
            dst_address: Some(Address::Short([0x01, 0x00])),
            src_pan_id: None,
            src_address: Some(Address::Short([0x02, 0x00])),
        };
        let repr = FrameRepr {
            frame_control,
            sequence_number: Some(0x55),
            addressing_fields,
            payload: &[0xde, 0xad],
        };
        let mut buf = [0u8; 32];
        let header_len = repr.emit_header(&mut buf).unwrap();
        buf[header_len..header_len + 2].copy_from_slice(&[0xde, 0xad]);

        let result = mac.recv(&mut upper, &buf[..header_len + 2]);
        assert_eq!(result, Ok(()));
        assert_eq!(upper.received.len(), 1);
        assert_eq!(&upper.received[0][..], &[0xde, 0xad]);
    }
}
