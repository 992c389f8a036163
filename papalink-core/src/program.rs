//! Device program contract
//!
//! The host runtime drives a device program through three entry points:
//!
//! - [`DeviceProgram::initialize`] once at boot
//! - [`DeviceProgram::tick`] from the cooperative main loop
//! - [`DeviceProgram::receive_update`] whenever the bus writes a register
//!
//! All three run to completion. `receive_update` is called while a bus
//! transaction is in flight, so it may do at most one non-volatile byte
//! write and nothing slower.

use papalink_hal::adc::AdcError;

use crate::registers::{RegisterError, RegisterValue};
use crate::topology::TopologyError;

/// Errors reported by device program entry points
///
/// The bus has no error channel, so these are for logging only. An entry
/// point that returns an error has left the program in a consistent state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProgramError {
    /// Register index outside the table; nothing changed
    UnknownRegister(usize),
    /// Topology rejected; the register keeps its previous value
    InvalidTopology(TopologyError),
    /// Analog sampling failed; outputs unchanged this tick
    Sensor(AdcError),
}

impl From<RegisterError> for ProgramError {
    fn from(err: RegisterError) -> Self {
        match err {
            RegisterError::UnknownRegister(index) => ProgramError::UnknownRegister(index),
        }
    }
}

impl From<TopologyError> for ProgramError {
    fn from(err: TopologyError) -> Self {
        ProgramError::InvalidTopology(err)
    }
}

impl From<AdcError> for ProgramError {
    fn from(err: AdcError) -> Self {
        ProgramError::Sensor(err)
    }
}

/// A device program hosted by the PapaLink runtime
pub trait DeviceProgram {
    /// Program name reported to the host (e.g. `dj-logled-311`)
    fn name(&self) -> &'static str;

    /// Program version reported to the host
    fn version(&self) -> u8;

    /// Register keys in index order
    fn keys(&self) -> &[&'static str];

    /// Current value of a register
    fn register(&self, index: usize) -> Option<RegisterValue>;

    /// Configure outputs and seed the register table from storage
    ///
    /// An error means stored settings were unusable and compiled defaults
    /// are in effect; the program is still ready to run.
    fn initialize(&mut self) -> Result<(), ProgramError>;

    /// One iteration of the program's main loop
    fn tick(&mut self) -> Result<(), ProgramError>;

    /// Apply a register write from the bus
    fn receive_update(&mut self, index: usize, value: RegisterValue) -> Result<(), ProgramError>;
}
