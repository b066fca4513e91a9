//! Core traits and types for cycle-accurate emulation.
//!
//! CPUs reach memory through [`Bus`]. Chips behind the bus implement
//! [`Device`].

mod bus;
mod cpu;
mod device;
mod observable;
mod serializer;

pub use bus::{Bus, SimpleBus};
pub use cpu::Cpu;
pub use device::Device;
pub use observable::{Observable, Value};
pub use serializer::{Serializer, StateError};
