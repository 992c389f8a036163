//! Board-agnostic core of PapaLink device programs
//!
//! This crate contains the logic shared by device programs that does not
//! depend on a specific board:
//!
//! - Register table shared between the bus and the main loop
//! - Byte-per-register persistence with the `0xFF` "unset" convention
//! - Sample to drive value encoding
//! - Output topology and the drive value bit writer
//! - The device program contract

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod encoder;
pub mod persistence;
pub mod program;
pub mod registers;
pub mod topology;
pub mod writer;

pub use encoder::{encode, DriveValue};
pub use persistence::{PersistedByte, Persistence, PersistentRegisters};
pub use program::{DeviceProgram, ProgramError};
pub use registers::{RegisterTable, RegisterValue, Setting};
pub use topology::{DriverCount, Topology, TopologyError};
pub use writer::DriverBitWriter;
