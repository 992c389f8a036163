//! PapaLink device programs
//!
//! Concrete implementations of [`papalink_core::DeviceProgram`]:
//!
//! - [`logled`] - LED driver chain with bus and BNC (analog) control
//! - [`passive`] - plain persisted register table
//!
//! A firmware image hosts exactly one program, picked at build time.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod logled;
pub mod passive;

pub use logled::{LogLed, LogLedConfig, LogLedVariant};
pub use passive::PassiveProgram;
