//! In-memory hardware for host-side tests
//!
//! Enabled with the `mock` feature. Nothing here touches real peripherals.

use crate::adc::{AdcError, AnalogInputs};
use crate::gpio::{OutputBank, OutputLine};

/// Maximum number of data lines a [`MockBank`] can model
pub const MOCK_DATA_LINES: usize = 32;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct LineState {
    output: bool,
    high: bool,
    writes: u16,
}

/// Output bank that records line modes, levels and level writes
#[derive(Debug, Clone)]
pub struct MockBank {
    data: [LineState; MOCK_DATA_LINES],
    data_lines: u8,
    aux_a: LineState,
    aux_b: LineState,
}

impl MockBank {
    /// Create a bank exposing `data_lines` data lines (capped at
    /// [`MOCK_DATA_LINES`]), every line an input reading LOW
    pub fn new(data_lines: u8) -> Self {
        Self {
            data: [LineState::default(); MOCK_DATA_LINES],
            data_lines: data_lines.min(MOCK_DATA_LINES as u8),
            aux_a: LineState::default(),
            aux_b: LineState::default(),
        }
    }

    fn state(&self, line: OutputLine) -> Option<&LineState> {
        match line {
            OutputLine::Data(n) if n < self.data_lines => self.data.get(n as usize),
            OutputLine::Data(_) => None,
            OutputLine::AuxA => Some(&self.aux_a),
            OutputLine::AuxB => Some(&self.aux_b),
        }
    }

    fn state_mut(&mut self, line: OutputLine) -> Option<&mut LineState> {
        match line {
            OutputLine::Data(n) if n < self.data_lines => self.data.get_mut(n as usize),
            OutputLine::Data(_) => None,
            OutputLine::AuxA => Some(&mut self.aux_a),
            OutputLine::AuxB => Some(&mut self.aux_b),
        }
    }

    /// Whether `line` has been configured as an output
    pub fn is_output(&self, line: OutputLine) -> bool {
        self.state(line).map(|s| s.output).unwrap_or(false)
    }

    /// Number of level writes made to `line` (configuration excluded)
    pub fn writes(&self, line: OutputLine) -> u16 {
        self.state(line).map(|s| s.writes).unwrap_or(0)
    }

    /// Levels of data lines `first..=last` packed LSB first
    pub fn data_bits(&self, first: u8, last: u8) -> u32 {
        let mut bits = 0u32;
        for (i, line) in (first..=last).enumerate() {
            if self.is_set_high(OutputLine::Data(line)) {
                bits |= 1 << i;
            }
        }
        bits
    }
}

impl OutputBank for MockBank {
    fn data_lines(&self) -> u8 {
        self.data_lines
    }

    fn make_output(&mut self, line: OutputLine) {
        if let Some(state) = self.state_mut(line) {
            state.output = true;
            state.high = false;
        }
    }

    fn set_level(&mut self, line: OutputLine, high: bool) {
        if let Some(state) = self.state_mut(line) {
            state.high = high;
            state.writes = state.writes.saturating_add(1);
        }
    }

    fn is_set_high(&self, line: OutputLine) -> bool {
        self.state(line).map(|s| s.high).unwrap_or(false)
    }
}

/// Analog converter returning preset values
#[derive(Debug, Clone)]
pub struct MockAdc<const C: usize> {
    values: [Result<u16, AdcError>; C],
    samples: u32,
}

impl<const C: usize> MockAdc<C> {
    /// Create a converter where every channel reads `value`
    pub fn new(value: u16) -> Self {
        Self {
            values: [Ok(value); C],
            samples: 0,
        }
    }

    /// Set the reading of one channel
    pub fn set(&mut self, channel: u8, value: u16) {
        if let Some(slot) = self.values.get_mut(channel as usize) {
            *slot = Ok(value);
        }
    }

    /// Make a channel fail its conversions
    pub fn fail(&mut self, channel: u8) {
        if let Some(slot) = self.values.get_mut(channel as usize) {
            *slot = Err(AdcError::ConversionError);
        }
    }

    /// Number of conversions performed
    pub fn samples(&self) -> u32 {
        self.samples
    }
}

impl<const C: usize> AnalogInputs for MockAdc<C> {
    fn sample(&mut self, channel: u8) -> Result<u16, AdcError> {
        self.samples = self.samples.wrapping_add(1);
        self.values
            .get(channel as usize)
            .copied()
            .unwrap_or(Err(AdcError::NoSuchChannel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_records_writes() {
        let mut bank = MockBank::new(4);
        bank.make_output(OutputLine::Data(1));
        assert!(bank.is_output(OutputLine::Data(1)));
        assert_eq!(bank.writes(OutputLine::Data(1)), 0);

        bank.set_level(OutputLine::Data(1), true);
        bank.set_level(OutputLine::Data(3), true);
        assert_eq!(bank.writes(OutputLine::Data(1)), 1);
        assert_eq!(bank.data_bits(0, 3), 0b1010);
    }

    #[test]
    fn test_bank_ignores_lines_beyond_width() {
        let mut bank = MockBank::new(2);
        bank.set_level(OutputLine::Data(5), true);
        assert!(!bank.is_set_high(OutputLine::Data(5)));
        assert_eq!(bank.writes(OutputLine::Data(5)), 0);
    }

    #[test]
    fn test_adc_channels() {
        let mut adc = MockAdc::<2>::new(512);
        adc.set(1, 10);
        assert_eq!(adc.sample(0), Ok(512));
        assert_eq!(adc.sample(1), Ok(10));
        assert_eq!(adc.sample(2), Err(AdcError::NoSuchChannel));

        adc.fail(0);
        assert_eq!(adc.sample(0), Err(AdcError::ConversionError));
        assert_eq!(adc.samples(), 4);
    }
}
