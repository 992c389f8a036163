//! GPIO output abstractions
//!
//! Device programs address their outputs as numbered *lines* rather than
//! chip pins. A board maps each line to a physical pin when it builds its
//! [`OutputBank`].

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Switch the pin into output mode
    ///
    /// Pins that are outputs from construction can keep the default no-op.
    fn make_output(&mut self) {}

    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// An output line as seen by a device program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputLine {
    /// Data line `n` of the contiguous driver run
    Data(u8),
    /// First auxiliary single-bit channel
    AuxA,
    /// Second auxiliary single-bit channel
    AuxB,
}

/// A set of output lines addressed by [`OutputLine`]
///
/// Writes to lines the bank does not have are ignored; a board that cannot
/// host a line reports it through [`OutputBank::data_lines`] so callers can
/// reject the geometry up front.
pub trait OutputBank {
    /// Number of data lines available (`Data(0)..Data(n-1)`)
    fn data_lines(&self) -> u8;

    /// Configure a line as an output and drive it LOW
    fn make_output(&mut self, line: OutputLine);

    /// Drive a line to the given level
    fn set_level(&mut self, line: OutputLine, high: bool);

    /// Current output level of a line (false for lines the bank lacks)
    fn is_set_high(&self, line: OutputLine) -> bool;
}

/// Output bank built from individual pins
///
/// `L` is the number of data lines; data line `n` is `data[n]`.
pub struct PinArray<P, const L: usize> {
    data: [P; L],
    aux_a: P,
    aux_b: P,
}

impl<P: OutputPin, const L: usize> PinArray<P, L> {
    /// Create a bank from data pins and the two auxiliary pins
    pub fn new(data: [P; L], aux_a: P, aux_b: P) -> Self {
        Self { data, aux_a, aux_b }
    }

    fn pin(&self, line: OutputLine) -> Option<&P> {
        match line {
            OutputLine::Data(n) => self.data.get(n as usize),
            OutputLine::AuxA => Some(&self.aux_a),
            OutputLine::AuxB => Some(&self.aux_b),
        }
    }

    fn pin_mut(&mut self, line: OutputLine) -> Option<&mut P> {
        match line {
            OutputLine::Data(n) => self.data.get_mut(n as usize),
            OutputLine::AuxA => Some(&mut self.aux_a),
            OutputLine::AuxB => Some(&mut self.aux_b),
        }
    }
}

impl<P: OutputPin, const L: usize> OutputBank for PinArray<P, L> {
    fn data_lines(&self) -> u8 {
        // Line numbers are u8; lines past Data(254) are never counted
        L.min(u8::MAX as usize) as u8
    }

    fn make_output(&mut self, line: OutputLine) {
        if let Some(pin) = self.pin_mut(line) {
            pin.make_output();
            pin.set_low();
        }
    }

    fn set_level(&mut self, line: OutputLine, high: bool) {
        if let Some(pin) = self.pin_mut(line) {
            pin.set_state(high);
        }
    }

    fn is_set_high(&self, line: OutputLine) -> bool {
        self.pin(line).map(|p| p.is_set_high()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock GPIO pin for testing
    struct MockPin {
        output: bool,
        high: bool,
    }

    impl MockPin {
        fn new() -> Self {
            Self {
                output: false,
                high: true,
            }
        }
    }

    impl OutputPin for MockPin {
        fn make_output(&mut self) {
            self.output = true;
        }

        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    fn bank() -> PinArray<MockPin, 4> {
        PinArray::new(
            [MockPin::new(), MockPin::new(), MockPin::new(), MockPin::new()],
            MockPin::new(),
            MockPin::new(),
        )
    }

    #[test]
    fn test_make_output_drives_low() {
        let mut bank = bank();
        assert!(bank.is_set_high(OutputLine::Data(2)));

        bank.make_output(OutputLine::Data(2));
        assert!(bank.data[2].output);
        assert!(!bank.is_set_high(OutputLine::Data(2)));

        // Untouched lines keep their state
        assert!(!bank.data[1].output);
        assert!(bank.is_set_high(OutputLine::Data(1)));
    }

    #[test]
    fn test_set_level_per_line() {
        let mut bank = bank();
        bank.set_level(OutputLine::AuxA, false);
        bank.set_level(OutputLine::AuxB, true);
        bank.set_level(OutputLine::Data(0), false);

        assert!(!bank.is_set_high(OutputLine::AuxA));
        assert!(bank.is_set_high(OutputLine::AuxB));
        assert!(!bank.is_set_high(OutputLine::Data(0)));
    }

    #[test]
    fn test_missing_line_is_ignored() {
        let mut bank = bank();
        assert_eq!(bank.data_lines(), 4);

        bank.set_level(OutputLine::Data(9), true);
        bank.make_output(OutputLine::Data(9));
        assert!(!bank.is_set_high(OutputLine::Data(9)));
    }

    #[test]
    fn test_wide_bank_line_count_saturates() {
        let bank: PinArray<MockPin, 256> =
            PinArray::new(core::array::from_fn(|_| MockPin::new()), MockPin::new(), MockPin::new());
        assert_eq!(bank.data_lines(), 255);
    }
}
