//! Core traits and types for cycle-budgeted emulation.
//!
//! The machine advances in caller-supplied cycle budgets. A device consumes
//! at most one discrete unit of work per granted cycle, which keeps every
//! component interruptible and resumable at single-cycle granularity.

mod bus;
mod clock;
mod cycles;
mod device;

pub use bus::{IoDevice, MemoryBus};
pub use clock::FrameClock;
pub use cycles::Cycles;
pub use device::CycleStepped;
