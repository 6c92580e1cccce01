//! Transceiver configuration state and its status report.

use core::fmt::Write;

use crate::hex::Hex;

/// Length of an nRF24L01+ pipe address in bytes.
pub const ADDRESS_LEN: usize = 5;

/// Highest valid RF channel (channels are 7 bits wide).
pub const MAX_CHANNEL: u8 = 0x7F;

/// Capacity of a rendered status report.
///
/// The longest report (data rate `250k`) is 116 characters.
pub const REPORT_CAPACITY: usize = 128;

/// Rendered status report text.
pub type Report = heapless::String<REPORT_CAPACITY>;

/// Over-the-air data rate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DataRate {
    /// 250 kbps.
    #[default]
    Kbps250 = 0,
    /// 1 Mbps.
    Mbps1 = 1,
    /// 2 Mbps.
    Mbps2 = 2,
}

impl DataRate {
    /// Map a raw selector to a rate, clamping anything above 2 to 2 Mbps.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => DataRate::Kbps250,
            1 => DataRate::Mbps1,
            _ => DataRate::Mbps2,
        }
    }

    /// Raw selector value (0, 1 or 2).
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// Label used in the status report, without the `bps` suffix.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            DataRate::Kbps250 => "250k",
            DataRate::Mbps1 => "1M",
            DataRate::Mbps2 => "2M",
        }
    }
}

/// Current transceiver configuration.
///
/// Setters normalize their input instead of rejecting it, so a `RadioConfig`
/// always holds a configuration the transceiver accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RadioConfig {
    channel: u8,
    tx_address: [u8; ADDRESS_LEN],
    rx_address: [u8; ADDRESS_LEN],
    data_rate: DataRate,
}

impl RadioConfig {
    /// Channel used when no configuration has been persisted.
    pub const DEFAULT_CHANNEL: u8 = 0x2A;
    /// Address used for both directions when no configuration has been persisted.
    pub const DEFAULT_ADDRESS: [u8; ADDRESS_LEN] = [0x7B, 0x27, 0x1F, 0x1F, 0x1F];

    /// Create a configuration, normalizing the channel into range.
    #[must_use]
    pub const fn new(
        channel: u8,
        tx_address: [u8; ADDRESS_LEN],
        rx_address: [u8; ADDRESS_LEN],
        data_rate: DataRate,
    ) -> Self {
        Self {
            channel: channel & MAX_CHANNEL,
            tx_address,
            rx_address,
            data_rate,
        }
    }

    /// RF channel (0-127).
    #[inline]
    #[must_use]
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// Address outgoing payloads are sent to.
    #[inline]
    #[must_use]
    pub const fn tx_address(&self) -> &[u8; ADDRESS_LEN] {
        &self.tx_address
    }

    /// Address listened on for incoming payloads.
    #[inline]
    #[must_use]
    pub const fn rx_address(&self) -> &[u8; ADDRESS_LEN] {
        &self.rx_address
    }

    /// Air data rate.
    #[inline]
    #[must_use]
    pub const fn data_rate(&self) -> DataRate {
        self.data_rate
    }

    /// Store the channel, masked to 7 bits.
    #[inline]
    pub fn set_channel(&mut self, raw: u8) {
        self.channel = raw & MAX_CHANNEL;
    }

    /// Store the TX address.
    #[inline]
    pub fn set_tx_address(&mut self, address: [u8; ADDRESS_LEN]) {
        self.tx_address = address;
    }

    /// Store the RX address.
    #[inline]
    pub fn set_rx_address(&mut self, address: [u8; ADDRESS_LEN]) {
        self.rx_address = address;
    }

    /// Store the data rate, clamping out-of-range selectors to 2 Mbps.
    #[inline]
    pub fn set_data_rate(&mut self, raw: u8) {
        self.data_rate = DataRate::from_raw(raw);
    }

    /// Render the status report sent back to the host after every directive.
    ///
    /// ```text
    /// # nRF24L01+ Configuration:
    /// # RF channel: 2A
    /// # TX address: 7B271F1F1F
    /// # RX address: 7B271F1F1F
    /// # Data rate:  250kbps
    /// ```
    #[must_use]
    pub fn report(&self) -> Report {
        let mut text = Report::new();
        // REPORT_CAPACITY covers the longest rendering, so this cannot overflow.
        let _ = write!(
            text,
            "# nRF24L01+ Configuration:\n\
             # RF channel: {}\n\
             # TX address: {}\n\
             # RX address: {}\n\
             # Data rate:  {}bps\n",
            Hex(&[self.channel]),
            Hex(&self.tx_address),
            Hex(&self.rx_address),
            self.data_rate.label(),
        );
        text
    }
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_CHANNEL,
            Self::DEFAULT_ADDRESS,
            Self::DEFAULT_ADDRESS,
            DataRate::Kbps250,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_channel_masks_to_seven_bits() {
        let mut config = RadioConfig::default();
        config.set_channel(0xFF);
        assert_eq!(config.channel(), 0x7F);
        config.set_channel(0x80);
        assert_eq!(config.channel(), 0x00);
        config.set_channel(0x4C);
        assert_eq!(config.channel(), 0x4C);
    }

    #[test]
    fn test_new_masks_channel() {
        let config = RadioConfig::new(0xAA, [0; 5], [0; 5], DataRate::Mbps1);
        assert_eq!(config.channel(), 0x2A);
    }

    #[test]
    fn test_set_data_rate_clamps() {
        let mut config = RadioConfig::default();
        config.set_data_rate(0x05);
        assert_eq!(config.data_rate(), DataRate::Mbps2);
        config.set_data_rate(0xFF);
        assert_eq!(config.data_rate(), DataRate::Mbps2);
        config.set_data_rate(1);
        assert_eq!(config.data_rate(), DataRate::Mbps1);
        config.set_data_rate(0);
        assert_eq!(config.data_rate(), DataRate::Kbps250);
    }

    #[test]
    fn test_data_rate_raw_roundtrip() {
        for rate in [DataRate::Kbps250, DataRate::Mbps1, DataRate::Mbps2] {
            assert_eq!(DataRate::from_raw(rate.raw()), rate);
        }
    }

    #[test]
    fn test_set_addresses_verbatim() {
        let mut config = RadioConfig::default();
        config.set_tx_address([1, 2, 3, 4, 5]);
        config.set_rx_address([6, 7, 8, 9, 10]);
        assert_eq!(config.tx_address(), &[1, 2, 3, 4, 5]);
        assert_eq!(config.rx_address(), &[6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_report_default() {
        let report = RadioConfig::default().report();
        assert_eq!(
            report.as_str(),
            "# nRF24L01+ Configuration:\n\
             # RF channel: 2A\n\
             # TX address: 7B271F1F1F\n\
             # RX address: 7B271F1F1F\n\
             # Data rate:  250kbps\n"
        );
        assert_eq!(report.len(), 116);
    }

    #[test]
    fn test_report_labels() {
        let mut config = RadioConfig::default();
        config.set_data_rate(1);
        assert!(config.report().ends_with("# Data rate:  1Mbps\n"));
        config.set_data_rate(2);
        assert!(config.report().ends_with("# Data rate:  2Mbps\n"));
    }

    #[test]
    fn test_report_addresses() {
        let config = RadioConfig::new(
            0x05,
            [0xDE, 0xAD, 0xBE, 0xEF, 0x01],
            [0x0A, 0x0B, 0x0C, 0x0D, 0x0E],
            DataRate::Mbps2,
        );
        let report = config.report();
        assert!(report.contains("# RF channel: 05\n"));
        assert!(report.contains("# TX address: DEADBEEF01\n"));
        assert!(report.contains("# RX address: 0A0B0C0D0E\n"));
    }
}
