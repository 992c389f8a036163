//! Analog input abstractions

/// Resolution of the samples handed to device programs
///
/// Converters with a wider range must scale down to this width so that
/// program arithmetic (e.g. the 512 mid-scale offset) is board independent.
pub const SAMPLE_BITS: u8 = 10;

/// Largest sample value
pub const SAMPLE_MAX: u16 = (1 << SAMPLE_BITS) - 1;

/// Errors from analog conversions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcError {
    /// Conversion did not complete
    ConversionError,
    /// Channel is not wired on this board
    NoSuchChannel,
}

/// Multi-channel analog converter
///
/// Channels are numbered by the board; programs keep the channel numbers
/// they sample in their own configuration.
pub trait AnalogInputs {
    /// Sample one channel, returning a value in `0..=SAMPLE_MAX`
    fn sample(&mut self, channel: u8) -> Result<u16, AdcError>;
}

/// Scale a raw conversion of `raw_bits` width down to [`SAMPLE_BITS`]
pub fn to_sample(raw: u16, raw_bits: u8) -> u16 {
    if raw_bits > SAMPLE_BITS {
        (raw >> (raw_bits - SAMPLE_BITS)).min(SAMPLE_MAX)
    } else {
        (raw << (SAMPLE_BITS - raw_bits)).min(SAMPLE_MAX)
    }
}
