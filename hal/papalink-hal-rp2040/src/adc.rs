//! ADC inputs
//!
//! The RP2040 converter is 12 bits wide; samples are scaled down to the
//! program resolution before they leave this module.

use embassy_rp::adc::{Adc, Blocking, Channel};
use papalink_hal::adc::{to_sample, AdcError};
use papalink_hal::AnalogInputs;

/// Native RP2040 conversion width
pub const RAW_BITS: u8 = 12;

/// Blocking ADC with a fixed set of channels
///
/// Program channel `n` is `channels[n]`.
pub struct Rp2040Adc<'d, const C: usize> {
    adc: Adc<'d, Blocking>,
    channels: [Channel<'d>; C],
}

impl<'d, const C: usize> Rp2040Adc<'d, C> {
    /// Create from a blocking converter and its channels
    pub fn new(adc: Adc<'d, Blocking>, channels: [Channel<'d>; C]) -> Self {
        Self { adc, channels }
    }
}

impl<const C: usize> AnalogInputs for Rp2040Adc<'_, C> {
    fn sample(&mut self, channel: u8) -> Result<u16, AdcError> {
        let ch = self
            .channels
            .get_mut(channel as usize)
            .ok_or(AdcError::NoSuchChannel)?;
        let raw = self
            .adc
            .blocking_read(ch)
            .map_err(|_| AdcError::ConversionError)?;
        Ok(to_sample(raw, RAW_BITS))
    }
}
