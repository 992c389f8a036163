//! Sample to drive value encoding
//!
//! Two analog samples control the output: a fine value centered on
//! mid-scale and a coarse gain worth 16 counts per step.
//!
//! ```text
//! raw   = (value - 512) + (gain - 10) * 16
//! drive = clamp(raw, 0, 8191)
//! ```

/// Mid-scale of the value sample
pub const VALUE_CENTER: i32 = 512;

/// Gain sample that adds no offset
pub const GAIN_ZERO: i32 = 10;

/// Drive counts per gain step
pub const GAIN_STEP: i32 = 16;

/// Clamped 13-bit output value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriveValue(u16);

impl DriveValue {
    /// Width of a drive value in bits
    pub const BITS: u8 = 13;

    /// Lowest drive value
    pub const MIN: DriveValue = DriveValue(0);

    /// Highest drive value
    pub const MAX: DriveValue = DriveValue((1 << Self::BITS) - 1);

    /// Drive value from any integer, saturating at both ends
    pub fn saturating(raw: i32) -> Self {
        DriveValue(raw.clamp(0, Self::MAX.0 as i32) as u16)
    }

    /// Exact drive value, `None` above [`DriveValue::MAX`]
    pub fn new(value: u16) -> Option<Self> {
        (value <= Self::MAX.0).then_some(DriveValue(value))
    }

    /// The value as an integer
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl From<DriveValue> for u16 {
    fn from(value: DriveValue) -> Self {
        value.0
    }
}

/// Map a value sample and a gain sample to a drive value
pub fn encode(sample_value: u16, sample_gain: u16) -> DriveValue {
    let raw = (i32::from(sample_value) - VALUE_CENTER)
        + (i32::from(sample_gain) - GAIN_ZERO) * GAIN_STEP;
    DriveValue::saturating(raw)
}
