//! Program task
//!
//! Owns the device program and is the only caller of its entry points, so
//! `tick` and `receive_update` never overlap.

use defmt::*;
use embassy_futures::select::{select, Either};

use papalink_core::DeviceProgram;

use crate::board::Program;
use crate::channels::UPDATE_CHANNEL;
use crate::tasks::tick::TICK_SIGNAL;

/// Program task - initialize once, then serve ticks and register writes
#[embassy_executor::task]
pub async fn program_task(mut program: Program) {
    info!(
        "Program task started: {} v{}",
        program.name(),
        program.version()
    );

    match program.initialize() {
        Ok(()) => info!("Topology: {}", program.topology()),
        Err(err) => warn!(
            "Stored settings rejected ({}), using defaults: {}",
            err,
            program.topology()
        ),
    }

    // Sensor faults repeat every tick; only report changes
    let mut tick_failing = false;
    let mut faults = program.persistence().faults();

    loop {
        match select(TICK_SIGNAL.wait(), UPDATE_CHANNEL.receive()).await {
            Either::First(_now_ms) => match program.tick() {
                Ok(()) if tick_failing => {
                    info!("Tick recovered");
                    tick_failing = false;
                }
                Ok(()) => {}
                Err(err) if !tick_failing => {
                    warn!("Tick failed: {}", err);
                    tick_failing = true;
                }
                Err(_) => {}
            },
            Either::Second(update) => {
                let index = usize::from(update.index);
                match program.receive_update(index, update.value) {
                    Ok(()) => debug!("Register {} = {}", index, update.value),
                    Err(err) => warn!("Update {} rejected: {}", update, err),
                }
            }
        }

        let now = program.persistence().faults();
        if now != faults {
            warn!("EEPROM write failed ({} total)", now);
            faults = now;
        }
    }
}
