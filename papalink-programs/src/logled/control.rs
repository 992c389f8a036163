//! BNC sensing loop
//!
//! In sensing mode every tick samples the value and gain inputs and drives
//! the outputs from them. In idle mode the loop does nothing and the
//! outputs only change on direct register writes.

use papalink_core::encoder::{encode, DriveValue};
use papalink_core::registers::{RegisterTable, RegisterValue};
use papalink_core::topology::Topology;
use papalink_core::writer::DriverBitWriter;
use papalink_hal::adc::{AdcError, AnalogInputs};
use papalink_hal::gpio::OutputBank;

/// Loop state, read from the `bnc` register every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoopMode {
    /// Outputs follow register writes only
    Idle,
    /// Outputs follow the analog inputs
    Sensing,
}

impl LoopMode {
    /// Mode selected by a `bnc` register value
    pub fn from_register(value: RegisterValue) -> Self {
        if value == 0 {
            LoopMode::Idle
        } else {
            LoopMode::Sensing
        }
    }
}

/// Sampling side of the control loop
pub struct ControlLoop<A> {
    adc: A,
    value_channel: u8,
    gain_channel: u8,
}

impl<A: AnalogInputs> ControlLoop<A> {
    /// Loop sampling `value_channel` and `gain_channel` of `adc`
    pub fn new(adc: A, value_channel: u8, gain_channel: u8) -> Self {
        Self {
            adc,
            value_channel,
            gain_channel,
        }
    }

    /// Drive value for this tick, `None` when idle
    pub fn poll(&mut self, mode: LoopMode) -> Result<Option<DriveValue>, AdcError> {
        if mode == LoopMode::Idle {
            return Ok(None);
        }
        let value = self.adc.sample(self.value_channel)?;
        let gain = self.adc.sample(self.gain_channel)?;
        Ok(Some(encode(value, gain)))
    }

    /// One loop iteration: sample, encode and write
    ///
    /// Returns the value written, if any. A failed conversion leaves the
    /// outputs as they were.
    pub fn run<B: OutputBank, const N: usize>(
        &mut self,
        mode: LoopMode,
        writer: &mut DriverBitWriter<B>,
        topology: Topology,
        registers: &RegisterTable<N>,
    ) -> Result<Option<DriveValue>, AdcError> {
        let value = self.poll(mode)?;
        if let Some(value) = value {
            writer.write(value, topology, registers);
        }
        Ok(value)
    }

    /// The converter
    pub fn adc(&self) -> &A {
        &self.adc
    }

    /// The converter, mutably
    pub fn adc_mut(&mut self) -> &mut A {
        &mut self.adc
    }
}
