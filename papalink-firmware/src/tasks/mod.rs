//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod program;
pub mod tick;

pub use program::program_task;
pub use tick::tick_task;
