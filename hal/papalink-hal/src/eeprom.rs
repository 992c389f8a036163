//! Byte-addressed non-volatile storage
//!
//! Models an EEPROM: every offset holds one byte, erased cells read `0xFF`.
//! Boards without an EEPROM emulate it on flash (see `papalink-hal-rp2040`).

/// Value of a cell that has never been written
pub const ERASED: u8 = 0xFF;

/// Errors from non-volatile storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EepromError {
    /// Offset is beyond the end of the medium
    OutOfRange,
    /// Underlying flash/EEPROM operation failed
    Medium,
    /// Storage is full
    Full,
}

/// Byte-wide non-volatile storage
///
/// Writes are synchronous and complete before returning. Implementations do
/// not coalesce repeated writes of the same value.
pub trait ByteStore {
    /// Number of addressable bytes
    fn capacity(&self) -> u16;

    /// Read the byte at `offset`
    fn read_byte(&mut self, offset: u16) -> Result<u8, EepromError>;

    /// Write the byte at `offset`
    fn write_byte(&mut self, offset: u16, value: u8) -> Result<(), EepromError>;
}

impl<T: ByteStore + ?Sized> ByteStore for &mut T {
    fn capacity(&self) -> u16 {
        (**self).capacity()
    }

    fn read_byte(&mut self, offset: u16) -> Result<u8, EepromError> {
        (**self).read_byte(offset)
    }

    fn write_byte(&mut self, offset: u16, value: u8) -> Result<(), EepromError> {
        (**self).write_byte(offset, value)
    }
}

/// RAM-backed byte store
///
/// Starts fully erased. Useful for boards without a persistent medium and
/// for host-side tests; it also counts writes so wear can be observed.
#[derive(Debug, Clone)]
pub struct RamEeprom<const SIZE: usize> {
    cells: [u8; SIZE],
    writes: u32,
}

impl<const SIZE: usize> Default for RamEeprom<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SIZE: usize> RamEeprom<SIZE> {
    /// Create an erased store
    pub const fn new() -> Self {
        Self {
            cells: [ERASED; SIZE],
            writes: 0,
        }
    }

    /// Total number of successful writes since creation
    pub fn write_count(&self) -> u32 {
        self.writes
    }

    /// Raw view of all cells
    pub fn cells(&self) -> &[u8; SIZE] {
        &self.cells
    }
}

impl<const SIZE: usize> ByteStore for RamEeprom<SIZE> {
    fn capacity(&self) -> u16 {
        SIZE.min(u16::MAX as usize) as u16
    }

    fn read_byte(&mut self, offset: u16) -> Result<u8, EepromError> {
        self.cells
            .get(offset as usize)
            .copied()
            .ok_or(EepromError::OutOfRange)
    }

    fn write_byte(&mut self, offset: u16, value: u8) -> Result<(), EepromError> {
        let cell = self
            .cells
            .get_mut(offset as usize)
            .ok_or(EepromError::OutOfRange)?;
        *cell = value;
        self.writes = self.writes.wrapping_add(1);
        Ok(())
    }
}
