//! nRF24L01+ transceiver driver for the USB-to-nRF24L01+ bridge.
//!
//! This crate is chip-agnostic: it talks to the transceiver through an
//! `embedded-hal-async` [`SpiDevice`](embedded_hal_async::spi::SpiDevice), an
//! `embedded-hal` [`OutputPin`](embedded_hal::digital::OutputPin) for CE and an
//! async delay, and implements [`nrf_bridge_core::Radio`] so it plugs straight
//! into the bridge loop.
//!
//! # Link Setup
//!
//! - 5-byte addresses, 2-byte CRC, 0 dBm
//! - Auto-acknowledge with up to 15 retransmissions (750 us apart)
//! - Dynamic payload length (1-32 bytes) on pipes 0 and 1
//! - Pipe 0 = TX address (receives acknowledgements), pipe 1 = RX address
//!
//! # Example
//!
//! ```ignore
//! use nrf24_radio::Nrf24;
//! use nrf_bridge_core::{Radio, RadioConfig};
//!
//! let mut radio = Nrf24::new(spi_device, ce_pin, embassy_time::Delay);
//! radio.init().await?;
//! radio.configure(&RadioConfig::default()).await?;
//! ```
//!
//! # SPI Configuration
//!
//! Mode 0 (CPOL = 0, CPHA = 0), MSB first, up to 10 MHz.

#![cfg_attr(not(feature = "std"), no_std)]

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod driver;
pub mod registers;

pub use driver::Nrf24;
pub use registers::rf_setup;

/// Maximum SPI clock supported by the nRF24L01+.
pub const MAX_SPI_FREQUENCY_HZ: u32 = 10_000_000;
