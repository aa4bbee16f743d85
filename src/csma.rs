//! Unslotted CSMA-CA channel access, as driven by the transmit engine
//! before every PHY send attempt.

use embedded_hal::delay::DelayNs;
use rand_core::RngCore;

use crate::phy::{CcaStatus, Phy};
use crate::{debug, trace};
use crate::MacError;

use crate::mac::constants::UNIT_BACKOFF_US;

/// Run one unslotted CSMA-CA channel access attempt.
///
/// `min_be`/`max_be`/`max_backoffs` come from the PIB (`macMinBE`,
/// `macMaxBE`, `macMaxCSMABackoffs`). `NB`/`BE` are reseeded fresh on every
/// call, matching the original's per-retry reset (see `DESIGN.md`).
pub(crate) fn channel_access<P, R, D>(
    phy: &mut P,
    rng: &mut R,
    delay: &mut D,
    min_be: u8,
    max_be: u8,
    max_backoffs: u8,
) -> Result<(), MacError>
where
    P: Phy,
    R: RngCore,
    D: DelayNs,
{
    let mut nb: u8 = 0;
    let mut be: u8 = min_be;

    loop {
        if nb > max_backoffs {
            debug!("csma: channel access failure after {} backoffs", nb);
            return Err(MacError::ChannelAccessFailure);
        }

        let max_backoff = (1u32 << be) - 1;
        let periods = rng.next_u32() % (max_backoff + 1);
        delay.delay_us(periods * UNIT_BACKOFF_US);

        match phy.cca()? {
            CcaStatus::Idle => {
                trace!("csma: channel idle after {} backoffs", nb);
                return Ok(());
            }
            CcaStatus::ChannelBusy if phy.is_rx_busy() => {
                trace!("csma: radio already receiving, deferring to receive path");
                return Ok(());
            }
            CcaStatus::ChannelBusy => {
                nb += 1;
                be = core::cmp::min(be + 1, max_be);
            }
        }
    }
}
