//! Compile-time MAC parameters. Overridable at build time via
//! `DOT15D4_MAC_*` environment variables (see `build.rs`); fixed under
//! `#[cfg(test)]` so unit tests don't depend on the environment.
#![allow(dead_code)]

pub use customizable::*;

/// The PAN id reserved for broadcast addressing.
pub const BROADCAST_PAN_ID: u16 = 0xffff;

#[cfg(test)]
mod customizable {
    pub const MAC_MIN_BE: u8 = 0;
    pub const MAC_MAX_BE: u8 = 8;
    pub const MAC_MAX_CSMA_BACKOFFS: u8 = 16;
    pub const UNIT_BACKOFF_US: u32 = 320;
    pub const MAC_MAX_FRAME_RETRIES: u8 = 3;
    pub const WFA_MS: u32 = 5;
    pub const PACKETBUF_SIZE: usize = 127;
    pub const MAC_PAN_ID: u16 = 0xffff;
}

#[cfg(not(test))]
mod customizable {
    #![allow(unused)]
    include!(concat!(env!("OUT_DIR"), "/config.rs"));
}
