//! 6507 CPU registers.

use emu_core::{Serializer, StateError};

use crate::Status;
use crate::flags::I;

/// 6507 CPU register set.
///
/// The 6507 is a 6502 in a smaller package; the register file is identical:
/// - A: 8-bit accumulator
/// - X, Y: 8-bit index registers
/// - S: 8-bit stack pointer (stack is at $0100-$01FF, which the 2600 mirrors
///   onto RIOT RAM)
/// - PC: 16-bit program counter (only 13 bits reach the address bus)
/// - P: 8-bit processor status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    /// Accumulator.
    pub a: u8,
    /// X index register.
    pub x: u8,
    /// Y index register.
    pub y: u8,
    /// Stack pointer (points to next free location).
    pub s: u8,
    /// Program counter.
    pub pc: u16,
    /// Processor status flags.
    pub p: Status,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    /// Create registers in reset state.
    ///
    /// A, X and Y are undefined on hardware; we use 0. S is $FD and only I
    /// and the unused bit are set. PC is loaded from $FFFC-$FFFD by the CPU.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            s: 0xFD,
            pc: 0,
            p: Status::from_byte(I),
        }
    }

    /// Push a value onto the stack, return the address written.
    pub fn push(&mut self) -> u16 {
        let addr = 0x0100 | u16::from(self.s);
        self.s = self.s.wrapping_sub(1);
        addr
    }

    /// Pop a value from the stack, return the address to read.
    pub fn pop(&mut self) -> u16 {
        self.s = self.s.wrapping_add(1);
        0x0100 | u16::from(self.s)
    }

    /// Get the current stack address without modifying S.
    #[must_use]
    pub const fn stack_addr(&self) -> u16 {
        0x0100 | (self.s as u16)
    }

    pub(crate) fn save(&self, s: &mut Serializer) {
        s.put_u8(self.a);
        s.put_u8(self.x);
        s.put_u8(self.y);
        s.put_u8(self.s);
        s.put_u16(self.pc);
        s.put_u8(self.p.bits());
    }

    pub(crate) fn load(s: &mut Serializer) -> Result<Self, StateError> {
        Ok(Self {
            a: s.get_u8()?,
            x: s.get_u8()?,
            y: s.get_u8()?,
            s: s.get_u8()?,
            pc: s.get_u16()?,
            p: Status::from_byte(s.get_u8()?),
        })
    }
}
