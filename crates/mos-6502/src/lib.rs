//! Cycle-accurate 6507 CPU emulator.
//!
//! The 6507 is the 28-pin 6502 used in the Atari 2600: same core, 13 address
//! lines, no IRQ or NMI pins. It executes one bus access per cycle. Each
//! `tick()` advances exactly one cycle, instructions take multiple cycles,
//! and the CPU tracks its internal state between cycles.
//!
//! Address masking is the bus's job; the core itself produces full 16-bit
//! addresses so it can be tested against a flat 64K bus.

mod cpu;
mod error;
pub mod flags;
mod registers;

pub use cpu::Mos6502;
pub use error::CpuError;
pub use flags::Status;
pub use registers::Registers;
