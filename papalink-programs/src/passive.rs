//! Passive register program
//!
//! The smallest useful device program: a register table that the host can
//! read and write, persisted under the usual rules, with no outputs and no
//! loop work. New device programs start from this one.

use papalink_core::persistence::{PersistentRegisters, Persistence};
use papalink_core::program::{DeviceProgram, ProgramError};
use papalink_core::registers::{RegisterTable, RegisterValue};
use papalink_hal::eeprom::ByteStore;

/// Register-only device program
pub struct PassiveProgram<'a, S, const N: usize> {
    name: &'static str,
    version: u8,
    registers: PersistentRegisters<'a, S, N>,
}

impl<'a, S: ByteStore, const N: usize> PassiveProgram<'a, S, N> {
    /// Program named `name` over `table`, persisted to `store`
    pub fn new(name: &'static str, version: u8, table: &'a RegisterTable<N>, store: S) -> Self {
        Self {
            name,
            version,
            registers: PersistentRegisters::new(table, Persistence::new(store)),
        }
    }

    /// The shared register table
    pub fn table(&self) -> &'a RegisterTable<N> {
        self.registers.table()
    }
}

impl<'a, S: ByteStore, const N: usize> DeviceProgram for PassiveProgram<'a, S, N> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn version(&self) -> u8 {
        self.version
    }

    fn keys(&self) -> &[&'static str] {
        self.table().keys()
    }

    fn register(&self, index: usize) -> Option<RegisterValue> {
        self.table().get(index)
    }

    fn initialize(&mut self) -> Result<(), ProgramError> {
        self.registers.restore();
        Ok(())
    }

    fn tick(&mut self) -> Result<(), ProgramError> {
        Ok(())
    }

    fn receive_update(&mut self, index: usize, value: RegisterValue) -> Result<(), ProgramError> {
        self.registers.set(index, value)?;
        Ok(())
    }
}
