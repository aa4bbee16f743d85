//! IEEE 802.15.4 MAC sublayer: CSMA-CA medium access, unicast ACK reliability,
//! and automatic acknowledgement of incoming unicast frames.
//!
//! This crate implements only the MAC driver of an IEEE 802.15.4 stack: the
//! transmit state machine (CSMA-CA backoff, PHY send, ACK wait, retry),
//! the receive demultiplexer (header parse, ACK correlation, auto-ACK,
//! upper-layer dispatch), and the wait-for-ACK polling loop. The physical
//! radio, a one-shot timer, and the upper logical-link-control layer are
//! modeled as collaborator traits ([`phy::Phy`], [`Timer`], [`upper::UpperLayer`])
//! so the MAC can run against either real hardware or a scripted fake.
//!
//! Only unslotted CSMA-CA with immediate ACK is modeled: no beacon-enabled
//! PANs, no GTS, no security suite, no association protocol, no indirect
//! transmission to sleepy children.
#![allow(unused)]
#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[macro_use]
pub(crate) mod utils;

pub mod csma;
pub mod error;
pub mod frame;
pub mod mac;
pub mod phy;
pub mod upper;

pub use error::MacError;
pub use mac::{Mac, MacIoctl, TxRequest};
pub use phy::{CcaStatus, Phy, PhyError, PhyIoctl};

/// A one-shot countdown timer, millisecond resolution.
///
/// Modeled after the WFA (wait-for-acknowledgement) timer the MAC owns
/// exclusively: `start` (re)arms the timer for `period_ms` milliseconds,
/// `stop` disarms it, and `is_running` reports whether it is still counting
/// down. There is deliberately no "read remaining time" API: the MAC only
/// ever needs to know whether the window has elapsed.
pub trait Timer {
    /// Arm the timer for `period_ms` milliseconds, replacing any previous
    /// deadline.
    fn start(&mut self, period_ms: u32);

    /// Disarm the timer. Idempotent.
    fn stop(&mut self);

    /// `true` while the timer is armed and the deadline has not yet passed.
    fn is_running(&mut self) -> bool;
}
