//! CPU core trait.

use crate::Bus;

/// A CPU core.
///
/// CPUs execute instructions and access memory through a bus passed to each
/// call, so memory is touched on the cycle the hardware touches it.
///
/// CPUs expose their internal state for observation and debugging.
pub trait Cpu {
    /// The type used for register inspection.
    type Registers;

    /// The unrecoverable condition that stops execution.
    type Fault;

    /// Advance the CPU by one bus cycle.
    ///
    /// The bus is passed in, not owned, so it can be shared with other
    /// components (e.g., video chip).
    fn tick<B: Bus>(&mut self, bus: &mut B);

    /// Run cycles until the current instruction completes.
    ///
    /// Returns the number of cycles used, or the fault that stopped the CPU.
    fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32, Self::Fault>;

    /// Returns the current program counter.
    fn pc(&self) -> u16;

    /// Returns a snapshot of all registers for inspection.
    fn registers(&self) -> Self::Registers;

    /// Returns true if the CPU has stopped and cannot continue.
    fn is_halted(&self) -> bool;

    /// Reset the CPU and load the program counter from the reset vector.
    fn reset<B: Bus>(&mut self, bus: &mut B);
}
