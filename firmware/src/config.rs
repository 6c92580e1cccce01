//! Board and USB configuration.
//!
//! Pin assignments live in `bin/main.rs` next to the peripheral setup; see the
//! crate docs for the wiring table.

use embassy_rp::flash::ERASE_SIZE;
use nrf24_radio::MAX_SPI_FREQUENCY_HZ;

/// Shared VOTI VID/PID for CDC-ACM serial devices.
pub const USB_VID: u16 = 0x16C0;
pub const USB_PID: u16 = 0x27DD;

pub const USB_MANUFACTURER: &str = "nrf-bridge";
pub const USB_PRODUCT: &str = "USB to nRF24L01+ Bridge";
pub const USB_SERIAL_NUMBER: &str = "NRF2CDC-001";
pub const USB_MAX_POWER_MA: u16 = 100;

/// Full-speed bulk endpoint size.
pub const USB_PACKET_SIZE: usize = 64;

/// OUT packets buffered between the USB receive task and the bridge.
pub const SERIAL_RX_PACKETS: usize = 4;

/// Upper bound on how long one packet write may wait for the host.
pub const SERIAL_WRITE_TIMEOUT_MS: u64 = 100;

/// nRF24L01+ SPI clock.
pub const RADIO_SPI_FREQUENCY_HZ: u32 = 8_000_000;

const _: () = assert!(RADIO_SPI_FREQUENCY_HZ <= MAX_SPI_FREQUENCY_HZ);

/// Size of the on-board QSPI flash (Raspberry Pi Pico).
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Offset of the configuration sector: the last erase sector of flash.
pub const CONFIG_FLASH_OFFSET: u32 = (FLASH_SIZE - ERASE_SIZE) as u32;
