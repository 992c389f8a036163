//! Register persistence
//!
//! Persistable registers (index 2 and up) each own one byte of non-volatile
//! storage at `base + index`. The raw byte `0xFF` is what an erased cell
//! reads, so it means "never written, keep the compiled default". Inside
//! this crate a cell is a [`PersistedByte`]; the sentinel only exists at the
//! [`ByteStore`] boundary.
//!
//! # Storage layout
//!
//! ```text
//! offset  0 ..= 19       reserved by the PapaLink framework
//! offset  base + 2       register 2
//! offset  base + 3       register 3
//!   ...
//! ```
//!
//! Storage faults never reach the caller. A failed read behaves like an
//! erased cell and a failed write leaves the register in RAM only; both are
//! counted in [`Persistence::faults`].

use heapless::Vec;
use papalink_hal::eeprom::{ByteStore, ERASED};

use crate::registers::{RegisterError, RegisterTable, RegisterValue, FIRST_PERSISTENT};

/// Bytes at the start of storage reserved by the framework
pub const RESERVED_BYTES: u16 = 20;

/// Offset of register 0's (unused) cell
pub const DEFAULT_BASE: u16 = RESERVED_BYTES;

/// Contents of one persisted cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PersistedByte {
    /// No override stored; use the compiled default
    Unset,
    /// Stored override (never `0xFF`)
    Stored(u8),
}

impl PersistedByte {
    /// Decode a raw cell
    pub fn from_raw(raw: u8) -> Self {
        if raw == ERASED {
            PersistedByte::Unset
        } else {
            PersistedByte::Stored(raw)
        }
    }

    /// Encode for the storage medium
    pub fn to_raw(self) -> u8 {
        match self {
            PersistedByte::Unset => ERASED,
            PersistedByte::Stored(value) => value,
        }
    }

    /// Cell contents for a register value
    ///
    /// `0..=254` are stored as-is. `255` is the sentinel, so writing it
    /// clears the override. Wider values cannot be represented in one cell
    /// and return `None`.
    pub fn from_value(value: RegisterValue) -> Option<Self> {
        u8::try_from(value).ok().map(Self::from_raw)
    }

    /// Stored override, if any
    pub fn value(self) -> Option<u8> {
        match self {
            PersistedByte::Unset => None,
            PersistedByte::Stored(value) => Some(value),
        }
    }
}

/// Byte-per-register persistence over a [`ByteStore`]
pub struct Persistence<S> {
    store: S,
    base: u16,
    faults: u16,
}

impl<S: ByteStore> Persistence<S> {
    /// Persistence at the framework's default base offset
    pub fn new(store: S) -> Self {
        Self::with_base(store, DEFAULT_BASE)
    }

    /// Persistence with register `i` at offset `base + i`
    pub fn with_base(store: S, base: u16) -> Self {
        Self {
            store,
            base,
            faults: 0,
        }
    }

    fn offset(&self, index: usize) -> Option<u16> {
        if index < FIRST_PERSISTENT {
            return None;
        }
        let offset = u16::try_from(index).ok()?.checked_add(self.base)?;
        (offset < self.store.capacity()).then_some(offset)
    }

    fn fault(&mut self) {
        self.faults = self.faults.saturating_add(1);
    }

    /// Read one register's cell
    pub fn read(&mut self, index: usize) -> PersistedByte {
        let Some(offset) = self.offset(index) else {
            return PersistedByte::Unset;
        };
        match self.store.read_byte(offset) {
            Ok(raw) => PersistedByte::from_raw(raw),
            Err(_) => {
                self.fault();
                PersistedByte::Unset
            }
        }
    }

    /// Read the stored overrides of a table with `N` registers
    ///
    /// Returns `(index, value)` pairs for every persistable register whose
    /// cell holds an override, in index order.
    pub fn load<const N: usize>(&mut self) -> Vec<(usize, u8), N> {
        let mut overrides = Vec::new();
        for index in FIRST_PERSISTENT..N {
            if let PersistedByte::Stored(value) = self.read(index) {
                // At most N - 2 entries, always fits
                let _ = overrides.push((index, value));
            }
        }
        overrides
    }

    /// Write one register's cell
    ///
    /// Every call reaches the medium, identical values included. Indices
    /// below 2 are never persisted.
    pub fn store(&mut self, index: usize, byte: PersistedByte) {
        let Some(offset) = self.offset(index) else {
            if index >= FIRST_PERSISTENT {
                self.fault();
            }
            return;
        };
        if self.store.write_byte(offset, byte.to_raw()).is_err() {
            self.fault();
        }
    }

    /// Number of storage faults seen so far
    pub fn faults(&self) -> u16 {
        self.faults
    }

    /// Offset of register 0
    pub fn base(&self) -> u16 {
        self.base
    }

    /// Underlying store
    pub fn store_ref(&self) -> &S {
        &self.store
    }

    /// Release the underlying store
    pub fn into_inner(self) -> S {
        self.store
    }
}

/// Write path of a register table
///
/// Wraps the shared [`RegisterTable`] together with the storage it is
/// persisted to. Reads go straight to the table.
pub struct PersistentRegisters<'a, S, const N: usize> {
    table: &'a RegisterTable<N>,
    persistence: Persistence<S>,
}

impl<'a, S: ByteStore, const N: usize> PersistentRegisters<'a, S, N> {
    /// Attach storage to a table
    pub fn new(table: &'a RegisterTable<N>, persistence: Persistence<S>) -> Self {
        Self { table, persistence }
    }

    /// The shared table
    pub fn table(&self) -> &'a RegisterTable<N> {
        self.table
    }

    /// The storage side
    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    /// Seed the table from storage
    ///
    /// Registers with a stored override take it; the rest keep their
    /// current (compiled default) value. Returns the number of overrides
    /// applied.
    pub fn restore(&mut self) -> usize {
        let overrides = self.persistence.load::<N>();
        for &(index, value) in &overrides {
            // Indices come from 2..N, always in the table
            let _ = self.table.set(index, RegisterValue::from(value));
        }
        overrides.len()
    }

    /// Current value of a register
    pub fn get(&self, index: usize) -> Option<RegisterValue> {
        self.table.get(index)
    }

    /// Update a register, persisting it when enabled
    ///
    /// A register from index 2 up is written to storage when register 1 is
    /// nonzero at the time of the call. Values that do not fit a cell
    /// (above 255) only change RAM.
    pub fn set(&mut self, index: usize, value: RegisterValue) -> Result<(), RegisterError> {
        if index >= N {
            return Err(RegisterError::UnknownRegister(index));
        }
        if self.table.is_persistable(index) && self.table.persistence_enabled() {
            if let Some(byte) = PersistedByte::from_value(value) {
                self.persistence.store(index, byte);
            }
        }
        self.table.set(index, value)
    }

    /// Release the storage
    pub fn into_persistence(self) -> Persistence<S> {
        self.persistence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::{BRIGHTNESS, SAVE_CHANGES};
    use papalink_hal::eeprom::{EepromError, RamEeprom};
    use proptest::prelude::*;

    type Eeprom = RamEeprom<64>;

    /// Store whose every operation fails
    struct BrokenStore;

    impl ByteStore for BrokenStore {
        fn capacity(&self) -> u16 {
            64
        }

        fn read_byte(&mut self, _offset: u16) -> Result<u8, EepromError> {
            Err(EepromError::Medium)
        }

        fn write_byte(&mut self, _offset: u16, _value: u8) -> Result<(), EepromError> {
            Err(EepromError::Medium)
        }
    }

    fn table() -> RegisterTable<5> {
        RegisterTable::new(["out", "_save", "a", "b", "c"], [0, 0, 3, 4, 5])
    }

    #[test]
    fn test_sentinel_encoding() {
        assert_eq!(PersistedByte::from_raw(0xFF), PersistedByte::Unset);
        assert_eq!(PersistedByte::from_raw(0), PersistedByte::Stored(0));
        assert_eq!(PersistedByte::Unset.to_raw(), 0xFF);
        assert_eq!(PersistedByte::from_value(254), Some(PersistedByte::Stored(254)));
        assert_eq!(PersistedByte::from_value(255), Some(PersistedByte::Unset));
        assert_eq!(PersistedByte::from_value(256), None);
    }

    #[test]
    fn test_cells_at_base_plus_index() {
        let mut persistence = Persistence::new(Eeprom::new());
        persistence.store(3, PersistedByte::Stored(9));
        assert_eq!(persistence.store_ref().cells()[23], 9);
        assert_eq!(persistence.base(), 20);

        // Framework bytes untouched
        assert!(persistence.store_ref().cells()[..20].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_reserved_indices_never_stored() {
        let mut persistence = Persistence::new(Eeprom::new());
        persistence.store(BRIGHTNESS, PersistedByte::Stored(1));
        persistence.store(SAVE_CHANGES, PersistedByte::Stored(1));
        assert_eq!(persistence.store_ref().write_count(), 0);
        assert_eq!(persistence.read(BRIGHTNESS), PersistedByte::Unset);
        assert_eq!(persistence.faults(), 0);
    }

    #[test]
    fn test_load_skips_unset_cells() {
        let mut persistence = Persistence::new(Eeprom::new());
        persistence.store(2, PersistedByte::Stored(0));
        persistence.store(4, PersistedByte::Stored(77));

        let overrides = persistence.load::<5>();
        assert_eq!(overrides.as_slice(), &[(2, 0), (4, 77)]);
    }

    #[test]
    fn test_restore_overrides_defaults() {
        let mut eeprom = Eeprom::new();
        eeprom.write_byte(22, 30).unwrap();

        let table = table();
        let mut registers = PersistentRegisters::new(&table, Persistence::new(eeprom));
        assert_eq!(registers.restore(), 1);
        assert_eq!(table.snapshot(), [0, 0, 30, 4, 5]);
    }

    #[test]
    fn test_set_gated_by_flag() {
        let table = table();
        let mut registers = PersistentRegisters::new(&table, Persistence::new(Eeprom::new()));

        registers.set(2, 10).unwrap();
        assert_eq!(table.get(2), Some(10));
        assert_eq!(registers.persistence().store_ref().write_count(), 0);

        registers.set(SAVE_CHANGES, 1).unwrap();
        registers.set(2, 11).unwrap();
        assert_eq!(registers.persistence().store_ref().cells()[22], 11);
        assert_eq!(registers.persistence().store_ref().write_count(), 1);
    }

    #[test]
    fn test_flag_and_output_never_persisted() {
        let table = table();
        let mut registers = PersistentRegisters::new(&table, Persistence::new(Eeprom::new()));
        registers.set(SAVE_CHANGES, 1).unwrap();
        registers.set(BRIGHTNESS, 100).unwrap();
        registers.set(SAVE_CHANGES, 1).unwrap();
        assert_eq!(registers.persistence().store_ref().write_count(), 0);
        assert_eq!(table.get(BRIGHTNESS), Some(100));
    }

    #[test]
    fn test_repeated_value_written_every_time() {
        let table = table();
        let mut registers = PersistentRegisters::new(&table, Persistence::new(Eeprom::new()));
        registers.set(SAVE_CHANGES, 1).unwrap();
        for _ in 0..3 {
            registers.set(3, 8).unwrap();
        }
        assert_eq!(registers.persistence().store_ref().write_count(), 3);
    }

    #[test]
    fn test_wide_value_stays_in_ram() {
        let table = table();
        let mut registers = PersistentRegisters::new(&table, Persistence::new(Eeprom::new()));
        registers.set(SAVE_CHANGES, 1).unwrap();
        registers.set(4, 300).unwrap();
        assert_eq!(table.get(4), Some(300));
        assert_eq!(registers.persistence().store_ref().write_count(), 0);
    }

    #[test]
    fn test_unknown_register_rejected() {
        let table = table();
        let mut registers = PersistentRegisters::new(&table, Persistence::new(Eeprom::new()));
        registers.set(SAVE_CHANGES, 1).unwrap();
        assert_eq!(registers.set(5, 1), Err(RegisterError::UnknownRegister(5)));
        assert_eq!(registers.persistence().store_ref().write_count(), 0);
    }

    #[test]
    fn test_faults_are_counted_not_raised() {
        let table = table();
        let mut registers = PersistentRegisters::new(&table, Persistence::new(BrokenStore));
        assert_eq!(registers.restore(), 0);
        assert_eq!(table.snapshot(), [0, 0, 3, 4, 5]);

        registers.set(SAVE_CHANGES, 1).unwrap();
        registers.set(2, 9).unwrap();
        assert_eq!(table.get(2), Some(9));
        // Three failed reads at restore, one failed write
        assert_eq!(registers.persistence().faults(), 4);
    }

    #[test]
    fn test_cell_beyond_capacity_is_a_fault() {
        let mut persistence = Persistence::new(RamEeprom::<22>::new());
        persistence.store(2, PersistedByte::Stored(1));
        assert_eq!(persistence.faults(), 1);
        assert_eq!(persistence.read(2), PersistedByte::Unset);
    }

    proptest! {
        #[test]
        fn prop_store_then_load(index in 2usize..5, value in 0u8..=254) {
            let mut persistence = Persistence::new(Eeprom::new());
            persistence.store(index, PersistedByte::Stored(value));
            let overrides = persistence.load::<5>();
            prop_assert_eq!(overrides.as_slice(), &[(index, value)]);
        }

        #[test]
        fn prop_sentinel_keeps_default(index in 2usize..5, earlier in 0u8..=254) {
            let table = table();
            let mut persistence = Persistence::new(Eeprom::new());
            persistence.store(index, PersistedByte::Stored(earlier));
            persistence.store(index, PersistedByte::from_raw(255));

            let mut registers = PersistentRegisters::new(&table, persistence);
            prop_assert_eq!(registers.restore(), 0);
            prop_assert_eq!(table.get(index), table.default_value(index));
        }
    }
}
