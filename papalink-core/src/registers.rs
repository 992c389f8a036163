//! Register table
//!
//! The register table is the device's whole bus-visible state: an ordered
//! list of named settings whose positions are fixed when the program is
//! built. Two positions are common to every device program:
//!
//! | index | role                                              |
//! |-------|---------------------------------------------------|
//! | 0     | output value, never persisted                     |
//! | 1     | persistence flag, writes to 2.. reach storage     |
//! | 2..   | program settings, persisted while the flag is set |
//!
//! Every value lives in its own atomic cell. A reader on another call path
//! (a bus read request, the tick task) always sees a whole value, and no
//! operation ever needs to update two cells together.

use portable_atomic::{AtomicU16, Ordering};

/// Index of the output value register
pub const BRIGHTNESS: usize = 0;

/// Index of the persistence flag register
pub const SAVE_CHANGES: usize = 1;

/// First index that is persisted
pub const FIRST_PERSISTENT: usize = 2;

/// Largest table a program may declare
///
/// Register indices 248-255 are reserved by the PapaLink framework.
pub const MAX_REGISTERS: usize = 248;

/// Register value as carried over the bus
pub type RegisterValue = u16;

/// Errors from register access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterError {
    /// Index is not part of this table
    UnknownRegister(usize),
}

/// One named setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Setting {
    /// Bus-visible key
    pub key: &'static str,
    /// Position in the table
    pub index: usize,
    /// Current value
    pub value: RegisterValue,
}

/// Fixed-size table of named settings
pub struct RegisterTable<const N: usize> {
    keys: [&'static str; N],
    defaults: [RegisterValue; N],
    values: [AtomicU16; N],
}

impl<const N: usize> RegisterTable<N> {
    const LAYOUT_OK: () = assert!(
        N >= FIRST_PERSISTENT && N <= MAX_REGISTERS,
        "register table must hold the two reserved registers and at most 248 keys"
    );

    /// Create a table holding the compiled defaults
    pub fn new(keys: [&'static str; N], defaults: [RegisterValue; N]) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::LAYOUT_OK;
        debug_assert!(
            keys.iter()
                .enumerate()
                .all(|(i, k)| keys[..i].iter().all(|other| other != k)),
            "register keys must be unique"
        );

        Self {
            keys,
            defaults,
            values: core::array::from_fn(|i| AtomicU16::new(defaults[i])),
        }
    }

    /// Number of registers
    pub const fn len(&self) -> usize {
        N
    }

    /// Always false; a table holds at least the reserved registers
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// All keys in index order
    pub fn keys(&self) -> &[&'static str; N] {
        &self.keys
    }

    /// Key of a register
    pub fn key(&self, index: usize) -> Option<&'static str> {
        self.keys.get(index).copied()
    }

    /// Resolve a key to its index
    ///
    /// Meant for configuration time; the runtime path works on indices.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| *k == key)
    }

    /// Whether writes to `index` are candidates for persistence
    pub fn is_persistable(&self, index: usize) -> bool {
        (FIRST_PERSISTENT..N).contains(&index)
    }

    /// Current value of a register
    pub fn get(&self, index: usize) -> Option<RegisterValue> {
        self.values.get(index).map(|v| v.load(Ordering::Relaxed))
    }

    /// Store a value in memory only
    ///
    /// This is a single atomic store; persistence is handled by
    /// [`crate::persistence::PersistentRegisters`].
    pub fn set(&self, index: usize, value: RegisterValue) -> Result<(), RegisterError> {
        let cell = self
            .values
            .get(index)
            .ok_or(RegisterError::UnknownRegister(index))?;
        cell.store(value, Ordering::Relaxed);
        Ok(())
    }

    /// Compiled default of a register
    pub fn default_value(&self, index: usize) -> Option<RegisterValue> {
        self.defaults.get(index).copied()
    }

    /// Put a register back to its compiled default
    pub fn reset(&self, index: usize) -> Result<(), RegisterError> {
        let value = self
            .default_value(index)
            .ok_or(RegisterError::UnknownRegister(index))?;
        self.set(index, value)
    }

    /// Whether register 1 currently enables persistence
    pub fn persistence_enabled(&self) -> bool {
        self.get(SAVE_CHANGES).unwrap_or(0) != 0
    }

    /// Key, index and value of one register
    pub fn setting(&self, index: usize) -> Option<Setting> {
        Some(Setting {
            key: self.key(index)?,
            index,
            value: self.get(index)?,
        })
    }

    /// Iterate over all settings in index order
    pub fn settings(&self) -> impl Iterator<Item = Setting> + '_ {
        (0..N).filter_map(move |i| self.setting(i))
    }

    /// Copy of every value, register by register
    pub fn snapshot(&self) -> [RegisterValue; N] {
        core::array::from_fn(|i| self.values[i].load(Ordering::Relaxed))
    }
}
