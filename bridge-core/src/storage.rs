//! Persistent configuration storage: trait, error type and record format.
//!
//! The configuration is persisted as a fixed 15-byte record:
//!
//! | Offset | Size | Field                         |
//! |--------|------|-------------------------------|
//! | 0      | 1    | magic `0xA5`                  |
//! | 1      | 1    | record version                |
//! | 2      | 1    | channel                       |
//! | 3      | 5    | TX address                    |
//! | 8      | 5    | RX address                    |
//! | 13     | 1    | data rate selector            |
//! | 14     | 1    | CRC-8/SMBUS of bytes 0..14    |
//!
//! Erased flash (all `0xFF`) fails the magic check and loads as "no record".

use crc::{Crc, CRC_8_SMBUS};

use crate::config::{DataRate, RadioConfig, ADDRESS_LEN};

/// Size of an encoded configuration record.
pub const CONFIG_RECORD_LEN: usize = 15;

const RECORD_MAGIC: u8 = 0xA5;
const RECORD_VERSION: u8 = 1;

const CHANNEL_OFFSET: usize = 2;
const TX_OFFSET: usize = 3;
const RX_OFFSET: usize = TX_OFFSET + ADDRESS_LEN;
const RATE_OFFSET: usize = RX_OFFSET + ADDRESS_LEN;
const CRC_OFFSET: usize = RATE_OFFSET + 1;

const CRC8: Crc<u8> = Crc::<u8>::new(&CRC_8_SMBUS);

/// Error type for storage operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Underlying medium rejected the erase or write.
    Io,
}

/// Durable storage for the transceiver configuration.
pub trait ConfigStore {
    /// Load the persisted configuration, or `None` if nothing valid is stored.
    fn load(&mut self) -> Option<RadioConfig>;

    /// Persist `config` so it survives a power cycle.
    fn save(&mut self, config: &RadioConfig) -> Result<(), StorageError>;
}

/// Encode a configuration into its persisted record.
#[must_use]
pub fn encode_record(config: &RadioConfig) -> [u8; CONFIG_RECORD_LEN] {
    let mut record = [0u8; CONFIG_RECORD_LEN];
    record[0] = RECORD_MAGIC;
    record[1] = RECORD_VERSION;
    record[CHANNEL_OFFSET] = config.channel();
    record[TX_OFFSET..RX_OFFSET].copy_from_slice(config.tx_address());
    record[RX_OFFSET..RATE_OFFSET].copy_from_slice(config.rx_address());
    record[RATE_OFFSET] = config.data_rate().raw();
    record[CRC_OFFSET] = CRC8.checksum(&record[..CRC_OFFSET]);
    record
}

/// Decode a persisted record.
///
/// Returns `None` on a short buffer, unknown magic or version, or checksum
/// mismatch. Channel and data rate are normalized like directive input.
#[must_use]
pub fn decode_record(record: &[u8]) -> Option<RadioConfig> {
    let record = record.get(..CONFIG_RECORD_LEN)?;

    if record[0] != RECORD_MAGIC || record[1] != RECORD_VERSION {
        return None;
    }
    if CRC8.checksum(&record[..CRC_OFFSET]) != record[CRC_OFFSET] {
        return None;
    }

    let mut tx_address = [0u8; ADDRESS_LEN];
    let mut rx_address = [0u8; ADDRESS_LEN];
    tx_address.copy_from_slice(&record[TX_OFFSET..RX_OFFSET]);
    rx_address.copy_from_slice(&record[RX_OFFSET..RATE_OFFSET]);

    Some(RadioConfig::new(
        record[CHANNEL_OFFSET],
        tx_address,
        rx_address,
        DataRate::from_raw(record[RATE_OFFSET]),
    ))
}

/// RAM-backed store that forgets everything on reset.
///
/// Use this on boards without spare flash, or in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Option<[u8; CONFIG_RECORD_LEN]>,
    writes: usize,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            record: None,
            writes: 0,
        }
    }

    /// Create a store that already holds `config`.
    #[must_use]
    pub fn with_config(config: &RadioConfig) -> Self {
        Self {
            record: Some(encode_record(config)),
            writes: 0,
        }
    }

    /// Number of records written since creation.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }
}

impl ConfigStore for MemoryStore {
    fn load(&mut self) -> Option<RadioConfig> {
        self.record.as_ref().and_then(|record| decode_record(record))
    }

    fn save(&mut self, config: &RadioConfig) -> Result<(), StorageError> {
        let record = encode_record(config);
        if self.record != Some(record) {
            self.record = Some(record);
            self.writes += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> RadioConfig {
        RadioConfig::new(
            0x4C,
            [0x01, 0x02, 0x03, 0x04, 0x05],
            [0xA1, 0xA2, 0xA3, 0xA4, 0xA5],
            DataRate::Mbps1,
        )
    }

    #[test]
    fn test_record_roundtrip() {
        let config = sample_config();
        assert_eq!(decode_record(&encode_record(&config)), Some(config));
    }

    #[test]
    fn test_record_layout() {
        let record = encode_record(&sample_config());
        assert_eq!(record[0], 0xA5);
        assert_eq!(record[1], 1);
        assert_eq!(record[2], 0x4C);
        assert_eq!(&record[3..8], &[0x01, 0x02, 0x03, 0x04, 0x05]);
        assert_eq!(&record[8..13], &[0xA1, 0xA2, 0xA3, 0xA4, 0xA5]);
        assert_eq!(record[13], 1);
    }

    #[test]
    fn test_erased_flash_is_not_a_record() {
        assert_eq!(decode_record(&[0xFF; CONFIG_RECORD_LEN]), None);
        assert_eq!(decode_record(&[0x00; CONFIG_RECORD_LEN]), None);
    }

    #[test]
    fn test_corrupted_record_rejected() {
        let mut record = encode_record(&sample_config());
        record[4] ^= 0x10;
        assert_eq!(decode_record(&record), None);
    }

    #[test]
    fn test_wrong_version_rejected() {
        let mut record = encode_record(&sample_config());
        record[1] = 2;
        record[CRC_OFFSET] = CRC8.checksum(&record[..CRC_OFFSET]);
        assert_eq!(decode_record(&record), None);
    }

    #[test]
    fn test_short_record_rejected() {
        let record = encode_record(&sample_config());
        assert_eq!(decode_record(&record[..CONFIG_RECORD_LEN - 1]), None);
    }

    #[test]
    fn test_decode_normalizes_fields() {
        let mut record = encode_record(&sample_config());
        record[CHANNEL_OFFSET] = 0xFF;
        record[RATE_OFFSET] = 0x09;
        record[CRC_OFFSET] = CRC8.checksum(&record[..CRC_OFFSET]);

        let config = decode_record(&record).unwrap();
        assert_eq!(config.channel(), 0x7F);
        assert_eq!(config.data_rate(), DataRate::Mbps2);
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load(), None);

        let config = sample_config();
        store.save(&config).unwrap();
        assert_eq!(store.load(), Some(config));
        assert_eq!(store.writes(), 1);

        // Saving an identical record is skipped
        store.save(&config).unwrap();
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_memory_store_with_config() {
        let config = sample_config();
        let mut store = MemoryStore::with_config(&config);
        assert_eq!(store.load(), Some(config));
        assert_eq!(store.writes(), 0);
    }
}
