//! USB CDC to nRF24L01+ bridge for RP2040.
//!
//! This crate provides the embedded side of the bridge: a USB CDC-ACM serial
//! port, the activity LED and flash-backed configuration storage. The bridge
//! loop itself lives in [`nrf_bridge_core`] and the transceiver driver in
//! [`nrf24_radio`].
//!
//! # Wiring (Raspberry Pi Pico)
//!
//! | nRF24L01+ | RP2040        |
//! |-----------|---------------|
//! | SCK       | GP18 (SPI0)   |
//! | MOSI      | GP19 (SPI0)   |
//! | MISO      | GP16 (SPI0)   |
//! | CSN       | GP17          |
//! | CE        | GP20          |
//! | VCC       | 3V3           |
//!
//! The on-board LED on GP25 shows radio and serial traffic.

#![no_std]

// Re-export core types for convenience
pub use nrf24_radio::Nrf24;
pub use nrf_bridge_core::{
    Bridge, BridgeError, DataRate, Directive, Indicator, Radio, RadioConfig, SerialPort,
};

pub mod config;
pub mod flash_store;
pub mod led;
pub mod usb_serial;

pub use flash_store::{BoardFlash, FlashStore};
pub use led::LedIndicator;
pub use usb_serial::{
    configure_usb_serial, pump_usb_rx, SerialRxChannel, UsbDriver, UsbPacket, UsbSerialPort,
};
