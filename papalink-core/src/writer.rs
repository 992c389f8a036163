//! Drive value bit writer
//!
//! Serializes a [`DriveValue`] onto an [`OutputBank`] using a [`Topology`]
//! snapshot: the low `n_bits` bits go to the data run in order of
//! increasing significance, the next bit to auxiliary channel A and the one
//! after that to channel B. Every line is driven to a level; nothing is
//! pulsed.

use papalink_hal::gpio::{OutputBank, OutputLine};

use crate::encoder::DriveValue;
use crate::registers::{RegisterTable, BRIGHTNESS};
use crate::topology::{DriverCount, Topology};

/// Bit writer over an output bank
pub struct DriverBitWriter<B> {
    bank: B,
    /// Geometry whose lines are currently configured as outputs
    configured: Option<Topology>,
}

impl<B: OutputBank> DriverBitWriter<B> {
    /// Wrap an output bank; no line is touched until [`Self::configure`]
    pub fn new(bank: B) -> Self {
        Self {
            bank,
            configured: None,
        }
    }

    /// Configure the lines of `topology` as outputs, all LOW
    ///
    /// Auxiliary channel A is configured for two or more drivers and
    /// channel B for three. Lines of the previous topology that the new one
    /// does not use are driven LOW.
    pub fn configure(&mut self, topology: Topology) {
        if let Some(old) = self.configured {
            for line in old.lines() {
                if !topology.lines().any(|l| l == line) {
                    self.bank.set_level(line, false);
                }
            }
        }

        if topology.drivers() != DriverCount::One {
            self.bank.make_output(OutputLine::AuxA);
        }
        if topology.drivers() == DriverCount::Three {
            self.bank.make_output(OutputLine::AuxB);
        }
        for bit in 0..topology.n_bits() {
            self.bank
                .make_output(OutputLine::Data(topology.first_line() + bit));
        }
        self.configured = Some(topology);
    }

    /// Geometry last configured
    pub fn configured(&self) -> Option<Topology> {
        self.configured
    }

    /// Drive `value` onto the outputs and cache it in register 0
    ///
    /// A geometry different from the configured one is configured first,
    /// so topology changes take effect on the next write.
    pub fn write<const N: usize>(
        &mut self,
        value: DriveValue,
        topology: Topology,
        registers: &RegisterTable<N>,
    ) {
        if self.configured != Some(topology) {
            self.configure(topology);
        }

        let mut rest = value.get();
        for bit in 0..topology.n_bits() {
            let line = OutputLine::Data(topology.first_line() + bit);
            self.bank.set_level(line, rest & 1 == 1);
            rest >>= 1;
        }

        for &line in topology.drivers().aux_lines() {
            self.bank.set_level(line, rest & 1 == 1);
            rest >>= 1;
        }

        // Register 0 is part of every table
        let _ = registers.set(BRIGHTNESS, value.get());
    }

    /// Value currently on the outputs, recombined in bit order
    pub fn read_back(&self, topology: Topology) -> u16 {
        topology
            .lines()
            .enumerate()
            .filter(|&(_, line)| self.bank.is_set_high(line))
            .fold(0u16, |acc, (bit, _)| acc | (1 << bit))
    }

    /// The output bank
    pub fn bank(&self) -> &B {
        &self.bank
    }

    /// Release the output bank
    pub fn into_inner(self) -> B {
        self.bank
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use papalink_hal::mock::MockBank;
    use proptest::prelude::*;

    fn table() -> RegisterTable<2> {
        RegisterTable::new(["brightness", "_savechanges"], [0, 0])
    }

    fn writer() -> DriverBitWriter<MockBank> {
        DriverBitWriter::new(MockBank::new(16))
    }

    #[test]
    fn test_configure_sets_lines_low() {
        let mut writer = writer();
        let topology = Topology::new(11, 12, 3, 16).unwrap();
        writer.configure(topology);

        let bank = writer.bank();
        assert!(bank.is_output(OutputLine::AuxA));
        assert!(bank.is_output(OutputLine::AuxB));
        assert!(!bank.is_output(OutputLine::Data(1)));
        for line in 2..=12 {
            assert!(bank.is_output(OutputLine::Data(line)));
            assert!(!bank.is_set_high(OutputLine::Data(line)));
        }
        assert!(!bank.is_output(OutputLine::Data(13)));
    }

    #[test]
    fn test_single_driver_leaves_aux_alone() {
        let mut writer = writer();
        writer.configure(Topology::new(11, 12, 1, 16).unwrap());
        assert!(!writer.bank().is_output(OutputLine::AuxA));
        assert!(!writer.bank().is_output(OutputLine::AuxB));
    }

    #[test]
    fn test_two_drivers_configure_only_aux_a() {
        let mut writer = writer();
        writer.configure(Topology::new(11, 12, 2, 16).unwrap());
        assert!(writer.bank().is_output(OutputLine::AuxA));
        assert!(!writer.bank().is_output(OutputLine::AuxB));
    }

    #[test]
    fn test_4096_on_three_drivers() {
        let table = table();
        let mut writer = writer();
        let topology = Topology::new(11, 12, 3, 16).unwrap();
        writer.write(DriveValue::new(4096).unwrap(), topology, &table);

        let bank = writer.bank();
        assert_eq!(bank.data_bits(2, 12), 0);
        assert!(!bank.is_set_high(OutputLine::AuxA));
        assert!(bank.is_set_high(OutputLine::AuxB));
        assert_eq!(table.get(BRIGHTNESS), Some(4096));
    }

    #[test]
    fn test_low_bits_ascending_on_lines() {
        let table = table();
        let mut writer = writer();
        let topology = Topology::new(11, 12, 3, 16).unwrap();
        writer.write(DriveValue::new(0b101_0000_0011).unwrap(), topology, &table);

        let bank = writer.bank();
        assert!(bank.is_set_high(OutputLine::Data(2)));
        assert!(bank.is_set_high(OutputLine::Data(3)));
        assert!(!bank.is_set_high(OutputLine::Data(4)));
        assert!(bank.is_set_high(OutputLine::Data(10)));
        assert!(bank.is_set_high(OutputLine::Data(12)));
    }

    #[test]
    fn test_topology_change_applies_on_next_write() {
        let table = table();
        let mut writer = writer();
        let before = Topology::new(11, 12, 3, 16).unwrap();
        writer.configure(before);

        let after = Topology::new(3, 15, 1, 16).unwrap();
        assert!(!writer.bank().is_output(OutputLine::Data(15)));

        writer.write(DriveValue::new(0b111).unwrap(), after, &table);
        assert_eq!(writer.configured(), Some(after));
        assert!(writer.bank().is_output(OutputLine::Data(15)));
        assert_eq!(writer.bank().data_bits(13, 15), 0b111);
    }

    #[test]
    fn test_retired_lines_released_low() {
        let table = table();
        let mut writer = writer();
        let three = Topology::new(11, 12, 3, 16).unwrap();
        writer.write(DriveValue::new(0b1_1000_0000_0001).unwrap(), three, &table);
        assert!(writer.bank().is_set_high(OutputLine::AuxA));
        assert!(writer.bank().is_set_high(OutputLine::AuxB));

        let one = Topology::new(10, 12, 1, 16).unwrap();
        writer.write(DriveValue::new(0).unwrap(), one, &table);
        assert!(!writer.bank().is_set_high(OutputLine::AuxA));
        assert!(!writer.bank().is_set_high(OutputLine::AuxB));
        // Data(2) dropped out of the run, still LOW
        assert!(!writer.bank().is_set_high(OutputLine::Data(2)));
        assert_eq!(writer.read_back(one), 0);
    }

    #[test]
    fn test_rewrite_does_not_reconfigure() {
        let table = table();
        let mut writer = writer();
        let topology = Topology::new(4, 3, 1, 16).unwrap();
        writer.write(DriveValue::new(0b1111).unwrap(), topology, &table);
        writer.write(DriveValue::new(0b1111).unwrap(), topology, &table);

        // A reconfigure would have dropped the line LOW between writes
        assert_eq!(writer.bank().writes(OutputLine::Data(0)), 2);
        assert!(writer.bank().is_set_high(OutputLine::Data(0)));
    }

    proptest! {
        #[test]
        fn prop_read_back_is_truncated_value(
            raw in 0u16..=8191,
            n_bits in 1u16..=13,
            drivers in 1u16..=3,
        ) {
            let table = table();
            let mut writer = writer();
            let topology = Topology::new(n_bits, 13, drivers, 16).unwrap();
            writer.write(DriveValue::new(raw).unwrap(), topology, &table);

            prop_assert_eq!(writer.read_back(topology), topology.truncate(raw));
            prop_assert_eq!(table.get(BRIGHTNESS), Some(raw));
        }
    }
}
