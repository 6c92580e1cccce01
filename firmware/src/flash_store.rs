//! Configuration persistence in on-chip flash.

use defmt::{debug, warn};
use embassy_rp::flash::{Blocking, Error as FlashError, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use nrf_bridge_core::{
    decode_record, encode_record, ConfigStore, RadioConfig, StorageError, CONFIG_RECORD_LEN,
};

use crate::config::{CONFIG_FLASH_OFFSET, FLASH_SIZE};

/// Blocking flash driver for the whole on-board flash.
pub type BoardFlash<'d> = Flash<'d, FLASH, Blocking, FLASH_SIZE>;

/// Stores the radio configuration record in a dedicated flash sector.
///
/// The sector is only erased and rewritten when the record changes, so
/// repeated directives that leave the configuration as it was cost no
/// flash wear.
pub struct FlashStore<'d> {
    flash: BoardFlash<'d>,
    offset: u32,
}

impl<'d> FlashStore<'d> {
    /// Store at the default sector ([`CONFIG_FLASH_OFFSET`]).
    pub fn new(flash: BoardFlash<'d>) -> Self {
        Self::at(flash, CONFIG_FLASH_OFFSET)
    }

    /// Store at a custom sector-aligned offset.
    pub fn at(flash: BoardFlash<'d>, offset: u32) -> Self {
        Self { flash, offset }
    }

    fn read_record(&mut self) -> Result<[u8; CONFIG_RECORD_LEN], FlashError> {
        let mut record = [0u8; CONFIG_RECORD_LEN];
        self.flash.blocking_read(self.offset, &mut record)?;
        Ok(record)
    }
}

fn storage_error(e: FlashError) -> StorageError {
    warn!("Flash error: {:?}", e);
    StorageError::Io
}

impl ConfigStore for FlashStore<'_> {
    fn load(&mut self) -> Option<RadioConfig> {
        match self.read_record() {
            Ok(record) => decode_record(&record),
            Err(e) => {
                warn!("Flash read failed: {:?}", e);
                None
            }
        }
    }

    fn save(&mut self, config: &RadioConfig) -> Result<(), StorageError> {
        let record = encode_record(config);
        if self.read_record().map_err(storage_error)? == record {
            debug!("Stored configuration unchanged");
            return Ok(());
        }

        let end = self.offset + ERASE_SIZE as u32;
        self.flash
            .blocking_erase(self.offset, end)
            .map_err(storage_error)?;
        self.flash
            .blocking_write(self.offset, &record)
            .map_err(storage_error)?;
        debug!("Stored configuration written");
        Ok(())
    }
}
