//! Platform-agnostic core of the USB-to-nRF24L01+ bridge.
//!
//! This crate contains everything with actual decision logic: the hex codec,
//! the transceiver configuration state, the in-band command protocol and the
//! bridge loop. Hardware is reached through small traits, so the whole crate
//! runs on host for testing.
//!
//! # Overview
//!
//! - [`hex`]: Lenient hex text codec ([`decode_byte`], [`decode_address`], [`Hex`])
//! - [`config`]: Configuration state ([`RadioConfig`], [`DataRate`]) and status report
//! - [`command`]: Directive parsing ([`parse`], [`Directive`])
//! - [`serial`]: Host serial port trait ([`SerialPort`])
//! - [`radio`]: Transceiver trait ([`Radio`])
//! - [`storage`]: Persistent configuration ([`ConfigStore`], record format)
//! - [`indicator`]: Activity indicator trait ([`Indicator`])
//! - [`bridge`]: The control loop ([`Bridge`])
//!
//! # Protocol
//!
//! Serial input starting with `!` is a directive, anything else is sent over
//! the air as one payload (at most 32 bytes):
//!
//! ```text
//! !c2A            set RF channel to 0x2A
//! !t7B271F1F1F    set TX address
//! !r7B271F1F1F    set RX address
//! !s01            set data rate (00 = 250k, 01 = 1M, 02 = 2M)
//! !               report only
//! ```
//!
//! Every directive is answered with the configuration report:
//!
//! ```text
//! # nRF24L01+ Configuration:
//! # RF channel: 2A
//! # TX address: 7B271F1F1F
//! # RX address: 7B271F1F1F
//! # Data rate:  250kbps
//! ```
//!
//! # Example
//!
//! ```rust
//! use nrf_bridge_core::{parse, RadioConfig};
//!
//! let mut config = RadioConfig::default();
//! parse(b"!c4C").apply(&mut config);
//! assert_eq!(config.channel(), 0x4C);
//! assert!(config.report().contains("# RF channel: 4C\n"));
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting and logging (for embedded targets)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod bridge;
pub mod command;
pub mod config;
pub mod hex;
pub mod indicator;
pub mod radio;
pub mod serial;
pub mod storage;

// Re-export main types at crate root
pub use bridge::{Activity, Bridge, BridgeError, SerialEvent};
pub use command::{is_directive, parse, Directive, COMMAND_MARKER};
pub use config::{DataRate, RadioConfig, Report, ADDRESS_LEN, MAX_CHANNEL};
pub use hex::{
    decode_address, decode_byte, decode_nibble, encode_address, encode_byte, encode_bytes, Hex,
};
pub use indicator::{Indicator, NoIndicator};
pub use radio::{Radio, RadioError, MAX_PAYLOAD_LEN};
pub use serial::{PacketReader, SerialError, SerialPort};
pub use storage::{
    decode_record, encode_record, ConfigStore, MemoryStore, StorageError, CONFIG_RECORD_LEN,
};
