//! Wireless transceiver trait and error types.

use core::future::Future;

use crate::config::RadioConfig;

/// Maximum payload length of the transceiver, and size of the transfer buffer.
pub const MAX_PAYLOAD_LEN: usize = 32;

/// Error type for transceiver operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioError {
    /// SPI or control pin failure.
    Bus,
    /// Transmission not acknowledged after all retries.
    NoAck,
    /// Transceiver did not signal completion in time.
    Timeout,
    /// Received payload had an invalid length and was discarded.
    Corrupt,
}

/// Packet-oriented wireless transceiver.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait Radio {
    /// Check whether a received payload is waiting.
    fn available(&mut self) -> impl Future<Output = Result<bool, RadioError>>;

    /// Read exactly one received payload into `buf`.
    ///
    /// Returns the payload length.
    fn read_payload(
        &mut self,
        buf: &mut [u8; MAX_PAYLOAD_LEN],
    ) -> impl Future<Output = Result<usize, RadioError>>;

    /// Transmit `data` as one payload (at most [`MAX_PAYLOAD_LEN`] bytes).
    fn write_payload(&mut self, data: &[u8]) -> impl Future<Output = Result<(), RadioError>>;

    /// Program channel, addresses and data rate.
    fn configure(&mut self, config: &RadioConfig) -> impl Future<Output = Result<(), RadioError>>;
}
