//! Output topology
//!
//! A drive value is spread over a contiguous run of `n_bits` data lines
//! ending at `high_bit`, plus up to two auxiliary single-bit channels when
//! the hardware chains more than one driver:
//!
//! ```text
//! value bit:   0    1   ...  n_bits-1 | n_bits | n_bits+1
//! output:     D(lo) D(lo+1) ... D(high_bit) | AuxA | AuxB
//!             lo = high_bit + 1 - n_bits    (drivers>=2)(drivers=3)
//! ```
//!
//! The geometry is register data and can change at runtime, so it is
//! validated once when it is configured and then used as an immutable
//! snapshot for each write.

use papalink_hal::gpio::OutputLine;

/// Widest value a topology may carry (data bits plus auxiliary bits)
pub const MAX_TOTAL_BITS: u8 = 16;

/// Number of chained drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DriverCount {
    /// Data lines only
    One,
    /// Data lines plus auxiliary channel A
    Two,
    /// Data lines plus auxiliary channels A and B
    Three,
}

impl DriverCount {
    /// Parse a register value; only 1, 2 and 3 are valid
    pub fn from_register(value: u16) -> Option<Self> {
        match value {
            1 => Some(DriverCount::One),
            2 => Some(DriverCount::Two),
            3 => Some(DriverCount::Three),
            _ => None,
        }
    }

    /// Count as an integer
    pub fn get(self) -> u8 {
        match self {
            DriverCount::One => 1,
            DriverCount::Two => 2,
            DriverCount::Three => 3,
        }
    }

    /// Auxiliary channels used, in bit order
    pub fn aux_lines(self) -> &'static [OutputLine] {
        match self {
            DriverCount::One => &[],
            DriverCount::Two => &[OutputLine::AuxA],
            DriverCount::Three => &[OutputLine::AuxA, OutputLine::AuxB],
        }
    }
}

/// Reasons a topology is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TopologyError {
    /// Driver count outside 1..=3
    InvalidDriverCount(u16),
    /// At least one data line is required
    NoDataBits,
    /// Data plus auxiliary bits exceed [`MAX_TOTAL_BITS`]
    TooManyBits(u16),
    /// Highest data line does not exist on this board
    HighBitOutOfRange(u16),
    /// Run of `n_bits` ending at `high_bit` would start below line 0
    RunBelowFirstLine,
}

/// Validated output geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Topology {
    n_bits: u8,
    high_bit: u8,
    drivers: DriverCount,
}

impl Topology {
    /// Validate register values against a board with `data_lines` lines
    pub fn new(
        n_bits: u16,
        high_bit: u16,
        n_drivers: u16,
        data_lines: u8,
    ) -> Result<Self, TopologyError> {
        let drivers =
            DriverCount::from_register(n_drivers).ok_or(TopologyError::InvalidDriverCount(n_drivers))?;

        if n_bits == 0 {
            return Err(TopologyError::NoDataBits);
        }
        let total = n_bits.saturating_add(u16::from(drivers.get()) - 1);
        if total > u16::from(MAX_TOTAL_BITS) {
            return Err(TopologyError::TooManyBits(total));
        }
        if high_bit >= u16::from(data_lines) {
            return Err(TopologyError::HighBitOutOfRange(high_bit));
        }
        if n_bits > high_bit + 1 {
            return Err(TopologyError::RunBelowFirstLine);
        }

        // Both bounded by data_lines (a u8) at this point
        Ok(Self {
            n_bits: n_bits as u8,
            high_bit: high_bit as u8,
            drivers,
        })
    }

    /// Number of data lines
    pub fn n_bits(self) -> u8 {
        self.n_bits
    }

    /// Highest data line
    pub fn high_bit(self) -> u8 {
        self.high_bit
    }

    /// Number of chained drivers
    pub fn drivers(self) -> DriverCount {
        self.drivers
    }

    /// Lowest data line, carrying bit 0
    pub fn first_line(self) -> u8 {
        self.high_bit + 1 - self.n_bits
    }

    /// Line carrying value bit `bit`
    pub fn line_for_bit(self, bit: u8) -> Option<OutputLine> {
        if bit < self.n_bits {
            Some(OutputLine::Data(self.first_line() + bit))
        } else {
            self.drivers.aux_lines().get((bit - self.n_bits) as usize).copied()
        }
    }

    /// Every line used, in bit order
    pub fn lines(self) -> impl Iterator<Item = OutputLine> {
        (0..self.total_bits()).filter_map(move |bit| self.line_for_bit(bit))
    }

    /// Number of value bits that reach an output
    pub fn total_bits(self) -> u8 {
        self.n_bits + self.drivers.get() - 1
    }

    /// Part of a value that the outputs represent
    pub fn truncate(self, value: u16) -> u16 {
        let mask = ((1u32 << self.total_bits()) - 1) as u16;
        value & mask
    }
}
