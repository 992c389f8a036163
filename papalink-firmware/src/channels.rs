//! Inter-task communication channels
//!
//! The bus transport pushes host register writes into [`UPDATE_CHANNEL`];
//! the program task drains it between ticks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

/// Channel capacity for register writes from the bus
const UPDATE_CHANNEL_SIZE: usize = 8;

/// A register write received from the bus host
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct RegisterUpdate {
    /// Register index as sent on the wire
    pub index: u8,
    /// New value
    pub value: u16,
}

/// Register writes waiting for the program task
pub static UPDATE_CHANNEL: Channel<CriticalSectionRawMutex, RegisterUpdate, UPDATE_CHANNEL_SIZE> =
    Channel::new();
