//! CPU fault type.

use thiserror::Error;

/// A condition the CPU cannot execute past.
///
/// Once raised, the CPU stays stopped until reset; every further `step`
/// returns the same fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CpuError {
    /// One of the twelve JAM opcodes locked up the processor.
    #[error("CPU jammed by opcode {opcode:#04X} at {address:#06X}")]
    Jammed { opcode: u8, address: u16 },
}
