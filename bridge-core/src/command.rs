//! In-band command protocol carried over the serial link.
//!
//! A serial chunk whose first byte is the command marker is a directive:
//!
//! ```text
//! !c<2 hex>    set RF channel (masked to 0x00-0x7F)
//! !t<10 hex>   set TX address, 5 bytes
//! !r<10 hex>   set RX address, 5 bytes
//! !s<2 hex>    set data rate: 00 = 250kbps, 01 = 1Mbps, 02 and above = 2Mbps
//! !            report the current configuration
//! ```
//!
//! Parsing never fails. Unknown selectors act as a query, and malformed hex
//! decodes leniently (see [`crate::hex`]). Every directive is answered with the
//! configuration report.

use crate::config::{RadioConfig, ADDRESS_LEN};
use crate::hex::{decode_address, decode_byte};

/// Default command marker.
pub const COMMAND_MARKER: u8 = b'!';

/// Offset of the selector letter within a directive.
const SELECTOR_OFFSET: usize = 1;

/// Offset of the first argument character within a directive.
const ARGUMENT_OFFSET: usize = 2;

/// A decoded directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Directive {
    /// `!c` - raw channel byte, masked when applied.
    SetChannel(u8),
    /// `!t` - transmit address.
    SetTxAddress([u8; ADDRESS_LEN]),
    /// `!r` - receive address.
    SetRxAddress([u8; ADDRESS_LEN]),
    /// `!s` - raw data rate selector, clamped when applied.
    SetDataRate(u8),
    /// Bare marker or unknown selector: no change, report only.
    Query,
}

impl Directive {
    /// Apply the directive to `config`.
    pub fn apply(self, config: &mut RadioConfig) {
        match self {
            Directive::SetChannel(raw) => config.set_channel(raw),
            Directive::SetTxAddress(address) => config.set_tx_address(address),
            Directive::SetRxAddress(address) => config.set_rx_address(address),
            Directive::SetDataRate(raw) => config.set_data_rate(raw),
            Directive::Query => {}
        }
    }

    /// Whether this directive only requests the report.
    #[inline]
    #[must_use]
    pub const fn is_query(&self) -> bool {
        matches!(self, Directive::Query)
    }
}

/// Check whether a serial chunk is a directive for the given marker.
#[inline]
#[must_use]
pub fn is_directive(buffer: &[u8], marker: u8) -> bool {
    buffer.first() == Some(&marker)
}

/// Parse a buffer that starts with the command marker.
///
/// The marker byte itself is not checked; callers route buffers here with
/// [`is_directive`].
///
/// # Example
///
/// ```
/// use nrf_bridge_core::command::{parse, Directive};
///
/// assert_eq!(parse(b"!c2A"), Directive::SetChannel(0x2A));
/// assert_eq!(parse(b"!"), Directive::Query);
/// ```
#[must_use]
pub fn parse(buffer: &[u8]) -> Directive {
    let args = buffer.get(ARGUMENT_OFFSET..).unwrap_or(&[]);

    match buffer.get(SELECTOR_OFFSET) {
        Some(b'c') => Directive::SetChannel(decode_byte(args)),
        Some(b't') => Directive::SetTxAddress(decode_address(args)),
        Some(b'r') => Directive::SetRxAddress(decode_address(args)),
        Some(b's') => Directive::SetDataRate(decode_byte(args)),
        _ => Directive::Query,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataRate;

    #[test]
    fn test_parse_channel() {
        assert_eq!(parse(b"!c2A"), Directive::SetChannel(0x2A));
        assert_eq!(parse(b"!c7f\n"), Directive::SetChannel(0x7F));
    }

    #[test]
    fn test_parse_tx_address() {
        assert_eq!(
            parse(b"!t7B271F1F1F"),
            Directive::SetTxAddress([0x7B, 0x27, 0x1F, 0x1F, 0x1F])
        );
    }

    #[test]
    fn test_parse_rx_address() {
        assert_eq!(
            parse(b"!rc2c2c2c2c2\r\n"),
            Directive::SetRxAddress([0xC2; 5])
        );
    }

    #[test]
    fn test_parse_data_rate() {
        assert_eq!(parse(b"!s01"), Directive::SetDataRate(0x01));
        assert_eq!(parse(b"!s05"), Directive::SetDataRate(0x05));
    }

    #[test]
    fn test_parse_bare_marker_is_query() {
        assert_eq!(parse(b"!"), Directive::Query);
        assert_eq!(parse(b"!\n"), Directive::Query);
    }

    #[test]
    fn test_parse_unknown_selector_is_query() {
        assert_eq!(parse(b"!x12"), Directive::Query);
        assert_eq!(parse(b"!C2A"), Directive::Query);
    }

    #[test]
    fn test_parse_missing_arguments_decode_as_zero() {
        assert_eq!(parse(b"!c"), Directive::SetChannel(0x00));
        assert_eq!(parse(b"!c5"), Directive::SetChannel(0x50));
        assert_eq!(parse(b"!t12"), Directive::SetTxAddress([0x12, 0, 0, 0, 0]));
    }

    #[test]
    fn test_parse_malformed_hex_is_lenient() {
        assert_eq!(parse(b"!cZZ"), Directive::SetChannel(0x00));
        assert_eq!(parse(b"!sq2"), Directive::SetDataRate(0x02));
    }

    #[test]
    fn test_is_directive() {
        assert!(is_directive(b"!c2A", COMMAND_MARKER));
        assert!(is_directive(b"!", COMMAND_MARKER));
        assert!(!is_directive(b"hello", COMMAND_MARKER));
        assert!(!is_directive(b" !", COMMAND_MARKER));
        assert!(!is_directive(b"", COMMAND_MARKER));
        assert!(is_directive(b"#c2A", b'#'));
    }

    #[test]
    fn test_apply_directives() {
        let mut config = RadioConfig::default();

        Directive::SetChannel(0xFF).apply(&mut config);
        assert_eq!(config.channel(), 0x7F);

        Directive::SetDataRate(0x05).apply(&mut config);
        assert_eq!(config.data_rate(), DataRate::Mbps2);

        Directive::SetTxAddress([1, 2, 3, 4, 5]).apply(&mut config);
        assert_eq!(config.tx_address(), &[1, 2, 3, 4, 5]);

        Directive::SetRxAddress([5, 4, 3, 2, 1]).apply(&mut config);
        assert_eq!(config.rx_address(), &[5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_apply_query_leaves_config_unchanged() {
        let mut config = RadioConfig::default();
        let before = config;
        Directive::Query.apply(&mut config);
        assert_eq!(config, before);
        assert!(Directive::Query.is_query());
        assert!(!Directive::SetChannel(1).is_query());
    }
}
