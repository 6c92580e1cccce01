//! nRF24L01+ SPI commands, register addresses and bit fields.

use nrf_bridge_core::DataRate;

/// SPI command bytes.
pub mod command {
    /// Read register; OR with the register address.
    pub const R_REGISTER: u8 = 0x00;
    /// Write register; OR with the register address.
    pub const W_REGISTER: u8 = 0x20;
    /// Mask for the register address within a register command.
    pub const REGISTER_MASK: u8 = 0x1F;
    /// Read width of the payload at the top of the RX FIFO.
    pub const R_RX_PL_WID: u8 = 0x60;
    /// Read the payload at the top of the RX FIFO.
    pub const R_RX_PAYLOAD: u8 = 0x61;
    /// Write a payload into the TX FIFO.
    pub const W_TX_PAYLOAD: u8 = 0xA0;
    pub const FLUSH_TX: u8 = 0xE1;
    pub const FLUSH_RX: u8 = 0xE2;
    /// No operation; returns STATUS.
    pub const NOP: u8 = 0xFF;
}

/// Register addresses.
pub mod reg {
    pub const CONFIG: u8 = 0x00;
    pub const EN_AA: u8 = 0x01;
    pub const EN_RXADDR: u8 = 0x02;
    pub const SETUP_AW: u8 = 0x03;
    pub const SETUP_RETR: u8 = 0x04;
    pub const RF_CH: u8 = 0x05;
    pub const RF_SETUP: u8 = 0x06;
    pub const STATUS: u8 = 0x07;
    pub const RX_ADDR_P0: u8 = 0x0A;
    pub const RX_ADDR_P1: u8 = 0x0B;
    pub const TX_ADDR: u8 = 0x10;
    pub const FIFO_STATUS: u8 = 0x17;
    pub const DYNPD: u8 = 0x1C;
    pub const FEATURE: u8 = 0x1D;
}

// CONFIG
pub const EN_CRC: u8 = 1 << 3;
pub const CRCO: u8 = 1 << 2;
pub const PWR_UP: u8 = 1 << 1;
pub const PRIM_RX: u8 = 1 << 0;

/// Powered up, 2-byte CRC, primary receiver.
pub const CONFIG_PRX: u8 = EN_CRC | CRCO | PWR_UP | PRIM_RX;
/// Powered up, 2-byte CRC, primary transmitter.
pub const CONFIG_PTX: u8 = EN_CRC | CRCO | PWR_UP;

// STATUS
pub const RX_DR: u8 = 1 << 6;
pub const TX_DS: u8 = 1 << 5;
pub const MAX_RT: u8 = 1 << 4;
pub const STATUS_IRQ_MASK: u8 = RX_DR | TX_DS | MAX_RT;

// FIFO_STATUS
pub const RX_EMPTY: u8 = 1 << 0;

// RF_SETUP
pub const RF_DR_LOW: u8 = 1 << 5;
pub const RF_DR_HIGH: u8 = 1 << 3;
pub const RF_PWR_0DBM: u8 = 0b11 << 1;

// FEATURE
pub const EN_DPL: u8 = 1 << 2;

/// SETUP_AW value for 5-byte addresses.
pub const ADDRESS_WIDTH_5: u8 = 0b11;

/// Pipes 0 (TX auto-ack) and 1 (RX address).
pub const PIPES_0_1: u8 = 0b11;

/// SETUP_RETR: 750 us auto-retransmit delay, 15 retries.
pub const RETRANSMIT_750US_15: u8 = (0x2 << 4) | 0xF;

/// RF_SETUP value for a data rate at 0 dBm output power.
#[must_use]
pub const fn rf_setup(rate: DataRate) -> u8 {
    RF_PWR_0DBM
        | match rate {
            DataRate::Kbps250 => RF_DR_LOW,
            DataRate::Mbps1 => 0,
            DataRate::Mbps2 => RF_DR_HIGH,
        }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rf_setup_bits() {
        assert_eq!(rf_setup(DataRate::Kbps250), 0x26);
        assert_eq!(rf_setup(DataRate::Mbps1), 0x06);
        assert_eq!(rf_setup(DataRate::Mbps2), 0x0E);
    }

    #[test]
    fn test_config_values() {
        assert_eq!(CONFIG_PRX, 0x0F);
        assert_eq!(CONFIG_PTX, 0x0E);
        assert_eq!(RETRANSMIT_750US_15, 0x2F);
    }
}
