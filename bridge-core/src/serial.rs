//! Host-facing serial port trait and error types.

use core::future::Future;

use heapless::Vec;

/// Error type for serial operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialError {
    /// Host not connected (e.g., USB not enumerated or port closed).
    Disconnected,
    /// Transfer failed on the wire.
    Io,
}

/// Byte-oriented serial transport towards the host.
///
/// Reading is non-blocking: the bridge polls [`available`](Self::available)
/// and only reads what is already buffered. Writes may await the transport
/// but must complete in bounded time.
///
/// Packet transports must not merge separate host writes into one read:
/// each read returns bytes from a single received packet (see
/// [`PacketReader`]), so a directive sent right after a payload is still
/// seen as a directive.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait SerialPort {
    /// Number of received bytes the next [`read`](Self::read) can return.
    ///
    /// Packet transports report what is left of the current packet, pulling
    /// the next queued packet once it is drained.
    fn available(&mut self) -> usize;

    /// Move up to `buf.len()` buffered bytes into `buf` without waiting.
    ///
    /// Returns the number of bytes copied. Bytes that do not fit stay
    /// buffered for the next call.
    fn read(&mut self, buf: &mut [u8]) -> usize;

    /// Queue `data` for transmission to the host.
    fn write(&mut self, data: &[u8]) -> impl Future<Output = Result<(), SerialError>>;

    /// Push any queued output to the host.
    fn flush(&mut self) -> impl Future<Output = Result<(), SerialError>>;
}

/// Read cursor over one received packet.
///
/// Hands out the bytes of the current packet across as many reads as the
/// caller needs, and reports empty once it is drained. A new packet is only
/// taken with [`load`](Self::load), so reads never span two packets.
#[derive(Debug, Clone, Default)]
pub struct PacketReader<const N: usize> {
    packet: Vec<u8, N>,
    pos: usize,
}

impl<const N: usize> PacketReader<N> {
    pub const fn new() -> Self {
        Self {
            packet: Vec::new(),
            pos: 0,
        }
    }

    /// Bytes of the current packet not yet read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.packet.len() - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Replace the current packet, dropping any unread bytes of the old one.
    pub fn load(&mut self, packet: Vec<u8, N>) {
        self.packet = packet;
        self.pos = 0;
    }

    /// Copy up to `buf.len()` bytes of the current packet into `buf`.
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        let rest = &self.packet[self.pos..];
        let len = rest.len().min(buf.len());
        buf[..len].copy_from_slice(&rest[..len]);
        self.pos += len;
        len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet(bytes: &[u8]) -> Vec<u8, 64> {
        Vec::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_reader_starts_empty() {
        let mut reader = PacketReader::<64>::new();
        let mut buf = [0u8; 8];
        assert!(reader.is_empty());
        assert_eq!(reader.read(&mut buf), 0);
    }

    #[test]
    fn test_reader_serves_one_packet() {
        let mut reader = PacketReader::new();
        reader.load(packet(b"abc"));
        assert_eq!(reader.remaining(), 3);

        let mut buf = [0u8; 32];
        assert_eq!(reader.read(&mut buf), 3);
        assert_eq!(&buf[..3], b"abc");
        assert!(reader.is_empty());
    }

    #[test]
    fn test_reader_splits_long_packet() {
        let data: [u8; 40] = core::array::from_fn(|i| i as u8);
        let mut reader = PacketReader::new();
        reader.load(packet(&data));

        let mut buf = [0u8; 32];
        assert_eq!(reader.read(&mut buf), 32);
        assert_eq!(buf, data[..32]);
        assert_eq!(reader.remaining(), 8);

        assert_eq!(reader.read(&mut buf), 8);
        assert_eq!(buf[..8], data[32..]);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_load_replaces_packet() {
        let mut reader = PacketReader::new();
        reader.load(packet(b"abcdef"));
        let mut buf = [0u8; 2];
        reader.read(&mut buf);

        reader.load(packet(b"!c05"));
        let mut buf = [0u8; 32];
        assert_eq!(reader.read(&mut buf), 4);
        assert_eq!(&buf[..4], b"!c05");
    }
}
