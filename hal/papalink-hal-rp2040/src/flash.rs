//! EEPROM emulation on RP2040 flash
//!
//! The RP2040 has no EEPROM, so each byte offset is stored as its own item
//! in a sequential-storage map in the last 64KB of flash. The map handles
//! wear leveling; offsets that were never written read back as erased.
//!
//! Flash operations are driven to completion with a blocking executor so
//! that [`ByteStore`] writes finish before they return.

use embassy_embedded_hal::adapter::BlockingAsync;
use embassy_futures::block_on;
use embassy_rp::flash::{Blocking, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use sequential_storage::cache::NoCache;
use sequential_storage::map::{self, Key, SerializationError};

use papalink_hal::eeprom::{EepromError, ERASED};
use papalink_hal::ByteStore;

/// Flash storage configuration
pub const FLASH_SIZE: usize = 2 * 1024 * 1024; // 2MB flash on the Pico
pub const EEPROM_PARTITION_SIZE: usize = 64 * 1024;
pub const EEPROM_PARTITION_START: usize = FLASH_SIZE - EEPROM_PARTITION_SIZE;

/// Flash erase size for RP2040
pub const FLASH_ERASE_SIZE: usize = ERASE_SIZE;

/// Flash range for the EEPROM partition
pub const EEPROM_RANGE: core::ops::Range<u32> =
    (EEPROM_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Emulated EEPROM size in bytes
pub const EEPROM_CAPACITY: u16 = 512;

/// Scratch space for one map item (key, value and header)
const ITEM_BUFFER: usize = 32;

/// Map key: the emulated EEPROM offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EepromOffset(pub u16);

impl Key for EepromOffset {
    fn serialize_into(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        if buffer.len() < 2 {
            return Err(SerializationError::BufferTooSmall);
        }
        buffer[..2].copy_from_slice(&self.0.to_le_bytes());
        Ok(2)
    }

    fn deserialize_from(buffer: &[u8]) -> Result<(Self, usize), SerializationError> {
        match buffer {
            [lo, hi, ..] => Ok((EepromOffset(u16::from_le_bytes([*lo, *hi])), 2)),
            _ => Err(SerializationError::BufferTooSmall),
        }
    }
}

type AsyncFlash<'d> = BlockingAsync<Flash<'d, FLASH, Blocking, FLASH_SIZE>>;

/// Flash-backed [`ByteStore`]
pub struct FlashEeprom<'d> {
    flash: AsyncFlash<'d>,
}

impl<'d> FlashEeprom<'d> {
    /// Create a new emulated EEPROM on the flash peripheral
    pub fn new(flash: Peri<'d, FLASH>) -> Self {
        Self {
            flash: BlockingAsync::new(Flash::new_blocking(flash)),
        }
    }

    fn check(offset: u16) -> Result<(), EepromError> {
        if offset < EEPROM_CAPACITY {
            Ok(())
        } else {
            Err(EepromError::OutOfRange)
        }
    }
}

impl ByteStore for FlashEeprom<'_> {
    fn capacity(&self) -> u16 {
        EEPROM_CAPACITY
    }

    fn read_byte(&mut self, offset: u16) -> Result<u8, EepromError> {
        Self::check(offset)?;
        let mut data_buffer = [0u8; ITEM_BUFFER];

        let result = block_on(map::fetch_item::<EepromOffset, &[u8], _>(
            &mut self.flash,
            EEPROM_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &EepromOffset(offset),
        ));

        match result {
            Ok(Some(data)) => Ok(data.first().copied().unwrap_or(ERASED)),
            Ok(None) => Ok(ERASED),
            Err(_) => Err(EepromError::Medium),
        }
    }

    fn write_byte(&mut self, offset: u16, value: u8) -> Result<(), EepromError> {
        Self::check(offset)?;
        let mut data_buffer = [0u8; ITEM_BUFFER];
        let data: &[u8] = &[value];

        block_on(map::store_item(
            &mut self.flash,
            EEPROM_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &EepromOffset(offset),
            &data,
        ))
        .map_err(|err| match err {
            sequential_storage::Error::FullStorage => EepromError::Full,
            _ => EepromError::Medium,
        })
    }
}
