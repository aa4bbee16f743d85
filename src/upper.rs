//! The upper logical-link-control layer seam: the MAC dispatches received
//! frames upward and reports errors through this trait instead of a
//! hard-wired function pointer, so it can be driven in tests without a real
//! network stack above it.

use crate::MacError;

/// Collaborator invoked by the MAC's receive path and TX-completion
/// callback.
pub trait UpperLayer {
    /// A data or command frame addressed to this device has been received
    /// (and auto-ACKed, if applicable). `payload` is the frame's payload,
    /// excluding the MAC header.
    fn received(&mut self, payload: &[u8]);

    /// A transmission this layer requested has completed, successfully or
    /// not.
    fn tx_done(&mut self, result: Result<(), MacError>);
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use heapless::Vec;

    /// A scripted [`UpperLayer`] recording every dispatched frame and every
    /// TX-completion result, for use by the MAC's own unit tests.
    #[derive(Default)]
    pub(crate) struct TestUpperLayer {
        pub received: Vec<heapless::Vec<u8, 128>, 8>,
        pub tx_results: Vec<Result<(), MacError>, 8>,
    }

    impl UpperLayer for TestUpperLayer {
        fn received(&mut self, payload: &[u8]) {
            let _ = self.received.push(Vec::from_slice(payload).unwrap());
        }

        fn tx_done(&mut self, result: Result<(), MacError>) {
            let _ = self.tx_results.push(result);
        }
    }
}
