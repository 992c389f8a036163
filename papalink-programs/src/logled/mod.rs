//! LogLED device program
//!
//! Drives a chain of LED current drivers with a 13-bit brightness value.
//! The value comes either from the bus (register 0) or, in BNC mode, from
//! two analog inputs sampled every tick.
//!
//! # Registers
//!
//! | index | key            | default | persisted |
//! |-------|----------------|---------|-----------|
//! | 0     | `brightness`   | 0       | no        |
//! | 1     | `_savechanges` | 0       | no        |
//! | 2     | `bnc`          | 0       | yes       |
//! | 3     | `safemode`     | 1       | yes       |
//! | 4     | `_nbits`       | variant | yes       |
//! | 5     | `_hbit`        | variant | yes       |
//! | 6     | `_ndrivs`      | variant | yes       |
//!
//! Registers 4-6 are the output topology. A write that would make the
//! topology invalid for the board is refused and nothing is stored.
//!
//! Each topology register is checked against the current values of the
//! other two, so the host has to order its writes so that every step is a
//! valid geometry: shrink `_ndrivs` before widening `_nbits`, and raise
//! `_hbit` before lengthening the run below it.

pub mod control;
pub mod variant;

use papalink_core::encoder::DriveValue;
use papalink_core::persistence::{PersistentRegisters, Persistence};
use papalink_core::program::{DeviceProgram, ProgramError};
use papalink_core::registers::{RegisterTable, RegisterValue, BRIGHTNESS};
use papalink_core::topology::Topology;
use papalink_core::writer::DriverBitWriter;
use papalink_hal::adc::AnalogInputs;
use papalink_hal::eeprom::ByteStore;
use papalink_hal::gpio::OutputBank;

pub use control::{ControlLoop, LoopMode};
pub use variant::{LogLedVariant, PROGRAM_VERSION};

/// Number of LogLED registers
pub const REGISTER_COUNT: usize = 7;

/// Register keys in index order
pub const KEYS: [&str; REGISTER_COUNT] = [
    "brightness",
    "_savechanges",
    "bnc",
    "safemode",
    "_nbits",
    "_hbit",
    "_ndrivs",
];

/// BNC (analog input) mode flag
pub const BNC: usize = 2;
/// Safe mode flag
pub const SAFEMODE: usize = 3;
/// Number of data bits
pub const NBITS: usize = 4;
/// Highest data line
pub const HBIT: usize = 5;
/// Number of chained drivers
pub const NDRIVS: usize = 6;

/// LogLED register table
pub type LogLedRegisters = RegisterTable<REGISTER_COUNT>;

/// Register table holding the compiled defaults of `variant`
pub fn registers(variant: LogLedVariant) -> LogLedRegisters {
    let (n_bits, high_bit, n_drivers) = variant.default_topology();
    RegisterTable::new(KEYS, [0, 0, 0, 1, n_bits, high_bit, n_drivers])
}

/// Board-level LogLED settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogLedConfig {
    /// Hardware variant
    pub variant: LogLedVariant,
    /// ADC channel of the value input
    pub value_channel: u8,
    /// ADC channel of the gain input
    pub gain_channel: u8,
}

impl Default for LogLedConfig {
    fn default() -> Self {
        Self {
            variant: LogLedVariant::default(),
            value_channel: 0,
            gain_channel: 1,
        }
    }
}

/// The LogLED program
pub struct LogLed<'a, B, A, S> {
    config: LogLedConfig,
    registers: PersistentRegisters<'a, S, REGISTER_COUNT>,
    writer: DriverBitWriter<B>,
    control: ControlLoop<A>,
    /// Validated copy of registers 4-6
    topology: Topology,
}

impl<'a, B, A, S> LogLed<'a, B, A, S>
where
    B: OutputBank,
    A: AnalogInputs,
    S: ByteStore,
{
    /// Assemble the program
    ///
    /// Fails if the variant's default topology does not fit `bank`.
    pub fn new(
        config: LogLedConfig,
        table: &'a LogLedRegisters,
        bank: B,
        adc: A,
        store: S,
    ) -> Result<Self, ProgramError> {
        let (n_bits, high_bit, n_drivers) = config.variant.default_topology();
        let topology = Topology::new(n_bits, high_bit, n_drivers, bank.data_lines())?;

        Ok(Self {
            config,
            registers: PersistentRegisters::new(table, Persistence::new(store)),
            writer: DriverBitWriter::new(bank),
            control: ControlLoop::new(adc, config.value_channel, config.gain_channel),
            topology,
        })
    }

    /// The shared register table
    pub fn table(&self) -> &'a LogLedRegisters {
        self.registers.table()
    }

    /// Topology used by the next write
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Current loop mode
    pub fn mode(&self) -> LoopMode {
        LoopMode::from_register(self.table().get(BNC).unwrap_or(0))
    }

    /// Output bank
    pub fn bank(&self) -> &B {
        self.writer.bank()
    }

    /// Persistence side, for fault counters and diagnostics
    pub fn persistence(&self) -> &Persistence<S> {
        self.registers.persistence()
    }

    fn value_of(&self, index: usize) -> RegisterValue {
        self.table().get(index).unwrap_or(0)
    }

    /// Topology with `index` set to `value`, validated for this board
    fn topology_with(&self, index: usize, value: RegisterValue) -> Result<Topology, ProgramError> {
        let pick = |i: usize| if i == index { value } else { self.value_of(i) };
        Topology::new(
            pick(NBITS),
            pick(HBIT),
            pick(NDRIVS),
            self.writer.bank().data_lines(),
        )
        .map_err(ProgramError::from)
    }

    /// Drive a value straight to the outputs
    pub fn drive(&mut self, value: DriveValue) {
        self.writer.write(value, self.topology, self.registers.table());
    }
}

impl<'a, B, A, S> DeviceProgram for LogLed<'a, B, A, S>
where
    B: OutputBank,
    A: AnalogInputs,
    S: ByteStore,
{
    fn name(&self) -> &'static str {
        self.config.variant.name()
    }

    fn version(&self) -> u8 {
        PROGRAM_VERSION
    }

    fn keys(&self) -> &[&'static str] {
        self.table().keys()
    }

    fn register(&self, index: usize) -> Option<RegisterValue> {
        self.table().get(index)
    }

    fn initialize(&mut self) -> Result<(), ProgramError> {
        self.registers.restore();

        // Stored topology that no longer fits the board falls back to the
        // compiled defaults so the outputs are always well defined.
        let result = match self.topology_with(NBITS, self.value_of(NBITS)) {
            Ok(topology) => {
                self.topology = topology;
                Ok(())
            }
            Err(err) => {
                for index in [NBITS, HBIT, NDRIVS] {
                    self.table().reset(index)?;
                }
                // Defaults were validated in `new`
                self.topology = self.topology_with(NBITS, self.value_of(NBITS))?;
                Err(err)
            }
        };

        self.writer.configure(self.topology);
        result
    }

    fn tick(&mut self) -> Result<(), ProgramError> {
        let mode = self.mode();
        self.control
            .run(mode, &mut self.writer, self.topology, self.registers.table())?;
        Ok(())
    }

    fn receive_update(&mut self, index: usize, value: RegisterValue) -> Result<(), ProgramError> {
        match index {
            BRIGHTNESS => {
                // Direct set, independent of the loop mode
                self.drive(DriveValue::saturating(i32::from(value)));
                return Ok(());
            }
            NBITS | HBIT | NDRIVS => {
                self.topology = self.topology_with(index, value)?;
            }
            _ => {}
        }
        self.registers.set(index, value)?;
        Ok(())
    }
}
