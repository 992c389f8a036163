//! PapaLink LogLED firmware
//!
//! Main firmware binary for RP2040-based LogLED boards. Hosts one LogLED
//! program, chosen at build time with the `logled-*` features, and runs it
//! from a single task fed by a tick signal and the bus update channel.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig};
use embassy_rp::gpio::Pull;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use papalink_hal::PinArray;
use papalink_hal_rp2040::{FlashEeprom, FlexPin, Rp2040Adc};
use papalink_programs::logled::{self, LogLed, LogLedRegisters};

mod board;
mod channels;
mod tasks;

// Register table shared with the bus transport (must live forever)
static REGISTERS: StaticCell<LogLedRegisters> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("PapaLink firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = board::config();
    info!("Variant: {}", config.variant);
    let table: &'static LogLedRegisters = REGISTERS.init(logled::registers(config.variant));

    let bank: board::Bank = PinArray::new(
        [
            FlexPin::new(p.PIN_0),
            FlexPin::new(p.PIN_1),
            FlexPin::new(p.PIN_2),
            FlexPin::new(p.PIN_3),
            FlexPin::new(p.PIN_4),
            FlexPin::new(p.PIN_5),
            FlexPin::new(p.PIN_6),
            FlexPin::new(p.PIN_7),
            FlexPin::new(p.PIN_8),
            FlexPin::new(p.PIN_9),
            FlexPin::new(p.PIN_10),
            FlexPin::new(p.PIN_11),
            FlexPin::new(p.PIN_12),
        ],
        FlexPin::new(p.PIN_13),
        FlexPin::new(p.PIN_14),
    );

    let adc = Rp2040Adc::new(
        Adc::new_blocking(p.ADC, AdcConfig::default()),
        [
            Channel::new_pin(p.PIN_26, Pull::None),
            Channel::new_pin(p.PIN_27, Pull::None),
        ],
    );

    let eeprom = FlashEeprom::new(p.FLASH);

    let program = match LogLed::new(config, table, bank, adc, eeprom) {
        Ok(program) => program,
        Err(err) => {
            // Only reachable with a variant wider than the board
            error!("Variant does not fit this board: {}", err);
            loop {
                cortex_m::asm::wfi();
            }
        }
    };

    spawner.spawn(tasks::tick_task()).unwrap();
    spawner.spawn(tasks::program_task(program)).unwrap();

    info!("All tasks spawned");
}
