//! 6507 CPU implementation.
//!
//! Cycle-accurate emulation where each `tick()` performs exactly one
//! bus access. Instructions are broken down into their component cycles,
//! including the dummy reads and writes the NMOS core performs, because
//! memory-mapped I/O on the 2600 sees every one of them.
//!
//! The whole opcode matrix is decoded. Undocumented instructions behave as
//! on NMOS silicon; the unstable ones (ANE, LXA) use the common $EE magic
//! constant. The twelve JAM opcodes stop the processor with a fault.

use emu_core::{Bus, Cpu, Observable, Serializer, StateError, Value};

use crate::flags::{C, D, I, N, V, Z};
use crate::{CpuError, Registers, Status};

/// Bits of A that leak into ANE and LXA results on most chips.
const UNSTABLE_MAGIC: u8 = 0xEE;

/// Internal state tracking instruction execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Fetching opcode byte.
    FetchOpcode,
    /// Executing instruction cycles.
    Execute,
    /// CPU is stopped (JAM instruction).
    Stopped,
}

impl State {
    const fn to_byte(self) -> u8 {
        match self {
            State::FetchOpcode => 0,
            State::Execute => 1,
            State::Stopped => 2,
        }
    }

    fn from_byte(value: u8) -> Result<Self, StateError> {
        match value {
            0 => Ok(State::FetchOpcode),
            1 => Ok(State::Execute),
            2 => Ok(State::Stopped),
            _ => Err(StateError::invalid("cpu state", value)),
        }
    }
}

/// The MOS 6507 CPU.
///
/// Implements cycle-accurate execution where each `tick()` advances
/// exactly one CPU cycle. The 6507 performs one bus access per cycle.
#[derive(Debug, Clone)]
pub struct Mos6502 {
    /// CPU registers.
    pub regs: Registers,

    /// Current execution state.
    state: State,

    /// Current opcode being executed.
    opcode: u8,

    /// Current cycle within the instruction (0 = opcode fetch).
    cycle: u8,

    /// Temporary address register for addressing modes.
    addr: u16,

    /// Temporary data register; doubles as the page-cross flag.
    data: u8,

    /// Pointer for indirect addressing, or the base high byte for SHx.
    pointer: u8,

    /// Address the current opcode was fetched from.
    instruction_pc: u16,

    /// Total cycles executed.
    total_cycles: u64,

    /// Set once a JAM opcode has stopped the CPU.
    fault: Option<CpuError>,
}

impl Default for Mos6502 {
    fn default() -> Self {
        Self::new()
    }
}

impl Mos6502 {
    /// Create a new CPU in reset state. PC is zero until [`Cpu::reset`]
    /// loads the vector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            state: State::FetchOpcode,
            opcode: 0,
            cycle: 0,
            addr: 0,
            data: 0,
            pointer: 0,
            instruction_pc: 0,
            total_cycles: 0,
            fault: None,
        }
    }

    /// True between instructions.
    #[must_use]
    pub fn is_instruction_complete(&self) -> bool {
        self.state == State::FetchOpcode
    }

    /// Cycles executed since construction.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.total_cycles
    }

    /// The fault that stopped the CPU, if any.
    #[must_use]
    pub fn fault(&self) -> Option<CpuError> {
        self.fault
    }

    /// Address of the instruction currently (or most recently) executing.
    #[must_use]
    pub fn instruction_pc(&self) -> u16 {
        self.instruction_pc
    }

    /// Write the complete CPU state, including any half-finished
    /// instruction.
    pub fn save(&self, s: &mut Serializer) {
        self.regs.save(s);
        s.put_u8(self.state.to_byte());
        s.put_u8(self.opcode);
        s.put_u8(self.cycle);
        s.put_u16(self.addr);
        s.put_u8(self.data);
        s.put_u8(self.pointer);
        s.put_u16(self.instruction_pc);
        s.put_u64(self.total_cycles);
        match self.fault {
            Some(CpuError::Jammed { opcode, address }) => {
                s.put_bool(true);
                s.put_u8(opcode);
                s.put_u16(address);
            }
            None => s.put_bool(false),
        }
    }

    /// Restore state written by [`Mos6502::save`]. Nothing is modified
    /// unless the whole record reads back.
    pub fn load(&mut self, s: &mut Serializer) -> Result<(), StateError> {
        let regs = Registers::load(s)?;
        let state = State::from_byte(s.get_u8()?)?;
        let opcode = s.get_u8()?;
        let cycle = s.get_u8()?;
        let addr = s.get_u16()?;
        let data = s.get_u8()?;
        let pointer = s.get_u8()?;
        let instruction_pc = s.get_u16()?;
        let total_cycles = s.get_u64()?;
        let fault = if s.get_bool()? {
            Some(CpuError::Jammed {
                opcode: s.get_u8()?,
                address: s.get_u16()?,
            })
        } else {
            None
        };

        *self = Self {
            regs,
            state,
            opcode,
            cycle,
            addr,
            data,
            pointer,
            instruction_pc,
            total_cycles,
            fault,
        };
        Ok(())
    }

    /// Execute one CPU cycle.
    fn execute_cycle<B: Bus>(&mut self, bus: &mut B) {
        self.total_cycles += 1;

        match self.state {
            State::FetchOpcode => {
                self.instruction_pc = self.regs.pc;
                self.opcode = bus.read(self.regs.pc);
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.cycle = 1;
                self.state = State::Execute;
            }
            State::Execute => {
                self.execute_instruction(bus);
            }
            State::Stopped => {
                // Locked up: the address bus sits at $FFFF
                let _ = bus.read(0xFFFF);
            }
        }
    }

    /// Execute one cycle of the current instruction.
    fn execute_instruction<B: Bus>(&mut self, bus: &mut B) {
        match self.opcode {
            // BRK - 7 cycles
            0x00 => self.op_brk(bus),

            // ORA (zp,X) - 6 cycles
            0x01 => self.addr_izx(bus, Self::do_ora),

            // SLO (zp,X) - 8 cycles
            0x03 => self.addr_izx_rmw(bus, Self::do_slo),

            // NOP zp - 3 cycles
            0x04 => self.addr_zp(bus, Self::do_nop),

            // ORA zp - 3 cycles
            0x05 => self.addr_zp(bus, Self::do_ora),

            // ASL zp - 5 cycles
            0x06 => self.addr_zp_rmw(bus, Self::do_asl),

            // SLO zp - 5 cycles
            0x07 => self.addr_zp_rmw(bus, Self::do_slo),

            // PHP - 3 cycles
            0x08 => self.op_php(bus),

            // ORA imm - 2 cycles
            0x09 => self.addr_imm(bus, Self::do_ora),

            // ASL A - 2 cycles
            0x0A => self.op_accumulator(bus, Self::do_asl),

            // ANC imm - 2 cycles
            0x0B | 0x2B => self.addr_imm(bus, Self::do_anc),

            // NOP abs - 4 cycles
            0x0C => self.addr_abs(bus, Self::do_nop),

            // ORA abs - 4 cycles
            0x0D => self.addr_abs(bus, Self::do_ora),

            // ASL abs - 6 cycles
            0x0E => self.addr_abs_rmw(bus, Self::do_asl),

            // SLO abs - 6 cycles
            0x0F => self.addr_abs_rmw(bus, Self::do_slo),

            // BPL rel - 2/3/4 cycles
            0x10 => self.op_branch(bus, !self.regs.p.is_set(N)),

            // ORA (zp),Y - 5/6 cycles
            0x11 => self.addr_izy(bus, Self::do_ora),

            // SLO (zp),Y - 8 cycles
            0x13 => self.addr_izy_rmw(bus, Self::do_slo),

            // NOP zp,X - 4 cycles
            0x14 | 0x34 | 0x54 | 0x74 | 0xD4 | 0xF4 => self.addr_zpx(bus, Self::do_nop),

            // ORA zp,X - 4 cycles
            0x15 => self.addr_zpx(bus, Self::do_ora),

            // ASL zp,X - 6 cycles
            0x16 => self.addr_zpx_rmw(bus, Self::do_asl),

            // SLO zp,X - 6 cycles
            0x17 => self.addr_zpx_rmw(bus, Self::do_slo),

            // CLC - 2 cycles
            0x18 => self.op_flag(bus, C, false),

            // ORA abs,Y - 4/5 cycles
            0x19 => self.addr_aby(bus, Self::do_ora),

            // NOP - 2 cycles
            0x1A | 0x3A | 0x5A | 0x7A | 0xDA | 0xEA | 0xFA => self.op_nop(bus),

            // SLO abs,Y - 7 cycles
            0x1B => self.addr_aby_rmw(bus, Self::do_slo),

            // NOP abs,X - 4/5 cycles
            0x1C | 0x3C | 0x5C | 0x7C | 0xDC | 0xFC => self.addr_abx(bus, Self::do_nop),

            // ORA abs,X - 4/5 cycles
            0x1D => self.addr_abx(bus, Self::do_ora),

            // ASL abs,X - 7 cycles
            0x1E => self.addr_abx_rmw(bus, Self::do_asl),

            // SLO abs,X - 7 cycles
            0x1F => self.addr_abx_rmw(bus, Self::do_slo),

            // JSR abs - 6 cycles
            0x20 => self.op_jsr(bus),

            // AND (zp,X) - 6 cycles
            0x21 => self.addr_izx(bus, Self::do_and),

            // RLA (zp,X) - 8 cycles
            0x23 => self.addr_izx_rmw(bus, Self::do_rla),

            // BIT zp - 3 cycles
            0x24 => self.addr_zp(bus, Self::do_bit),

            // AND zp - 3 cycles
            0x25 => self.addr_zp(bus, Self::do_and),

            // ROL zp - 5 cycles
            0x26 => self.addr_zp_rmw(bus, Self::do_rol),

            // RLA zp - 5 cycles
            0x27 => self.addr_zp_rmw(bus, Self::do_rla),

            // PLP - 4 cycles
            0x28 => self.op_plp(bus),

            // AND imm - 2 cycles
            0x29 => self.addr_imm(bus, Self::do_and),

            // ROL A - 2 cycles
            0x2A => self.op_accumulator(bus, Self::do_rol),

            // BIT abs - 4 cycles
            0x2C => self.addr_abs(bus, Self::do_bit),

            // AND abs - 4 cycles
            0x2D => self.addr_abs(bus, Self::do_and),

            // ROL abs - 6 cycles
            0x2E => self.addr_abs_rmw(bus, Self::do_rol),

            // RLA abs - 6 cycles
            0x2F => self.addr_abs_rmw(bus, Self::do_rla),

            // BMI rel - 2/3/4 cycles
            0x30 => self.op_branch(bus, self.regs.p.is_set(N)),

            // AND (zp),Y - 5/6 cycles
            0x31 => self.addr_izy(bus, Self::do_and),

            // RLA (zp),Y - 8 cycles
            0x33 => self.addr_izy_rmw(bus, Self::do_rla),

            // AND zp,X - 4 cycles
            0x35 => self.addr_zpx(bus, Self::do_and),

            // ROL zp,X - 6 cycles
            0x36 => self.addr_zpx_rmw(bus, Self::do_rol),

            // RLA zp,X - 6 cycles
            0x37 => self.addr_zpx_rmw(bus, Self::do_rla),

            // SEC - 2 cycles
            0x38 => self.op_flag(bus, C, true),

            // AND abs,Y - 4/5 cycles
            0x39 => self.addr_aby(bus, Self::do_and),

            // RLA abs,Y - 7 cycles
            0x3B => self.addr_aby_rmw(bus, Self::do_rla),

            // AND abs,X - 4/5 cycles
            0x3D => self.addr_abx(bus, Self::do_and),

            // ROL abs,X - 7 cycles
            0x3E => self.addr_abx_rmw(bus, Self::do_rol),

            // RLA abs,X - 7 cycles
            0x3F => self.addr_abx_rmw(bus, Self::do_rla),

            // RTI - 6 cycles
            0x40 => self.op_rti(bus),

            // EOR (zp,X) - 6 cycles
            0x41 => self.addr_izx(bus, Self::do_eor),

            // SRE (zp,X) - 8 cycles
            0x43 => self.addr_izx_rmw(bus, Self::do_sre),

            // NOP zp - 3 cycles
            0x44 | 0x64 => self.addr_zp(bus, Self::do_nop),

            // EOR zp - 3 cycles
            0x45 => self.addr_zp(bus, Self::do_eor),

            // LSR zp - 5 cycles
            0x46 => self.addr_zp_rmw(bus, Self::do_lsr),

            // SRE zp - 5 cycles
            0x47 => self.addr_zp_rmw(bus, Self::do_sre),

            // PHA - 3 cycles
            0x48 => self.op_pha(bus),

            // EOR imm - 2 cycles
            0x49 => self.addr_imm(bus, Self::do_eor),

            // LSR A - 2 cycles
            0x4A => self.op_accumulator(bus, Self::do_lsr),

            // ALR imm - 2 cycles
            0x4B => self.addr_imm(bus, Self::do_alr),

            // JMP abs - 3 cycles
            0x4C => self.op_jmp_abs(bus),

            // EOR abs - 4 cycles
            0x4D => self.addr_abs(bus, Self::do_eor),

            // LSR abs - 6 cycles
            0x4E => self.addr_abs_rmw(bus, Self::do_lsr),

            // SRE abs - 6 cycles
            0x4F => self.addr_abs_rmw(bus, Self::do_sre),

            // BVC rel - 2/3/4 cycles
            0x50 => self.op_branch(bus, !self.regs.p.is_set(V)),

            // EOR (zp),Y - 5/6 cycles
            0x51 => self.addr_izy(bus, Self::do_eor),

            // SRE (zp),Y - 8 cycles
            0x53 => self.addr_izy_rmw(bus, Self::do_sre),

            // EOR zp,X - 4 cycles
            0x55 => self.addr_zpx(bus, Self::do_eor),

            // LSR zp,X - 6 cycles
            0x56 => self.addr_zpx_rmw(bus, Self::do_lsr),

            // SRE zp,X - 6 cycles
            0x57 => self.addr_zpx_rmw(bus, Self::do_sre),

            // CLI - 2 cycles
            0x58 => self.op_flag(bus, I, false),

            // EOR abs,Y - 4/5 cycles
            0x59 => self.addr_aby(bus, Self::do_eor),

            // SRE abs,Y - 7 cycles
            0x5B => self.addr_aby_rmw(bus, Self::do_sre),

            // EOR abs,X - 4/5 cycles
            0x5D => self.addr_abx(bus, Self::do_eor),

            // LSR abs,X - 7 cycles
            0x5E => self.addr_abx_rmw(bus, Self::do_lsr),

            // SRE abs,X - 7 cycles
            0x5F => self.addr_abx_rmw(bus, Self::do_sre),

            // RTS - 6 cycles
            0x60 => self.op_rts(bus),

            // ADC (zp,X) - 6 cycles
            0x61 => self.addr_izx(bus, Self::do_adc),

            // RRA (zp,X) - 8 cycles
            0x63 => self.addr_izx_rmw(bus, Self::do_rra),

            // ADC zp - 3 cycles
            0x65 => self.addr_zp(bus, Self::do_adc),

            // ROR zp - 5 cycles
            0x66 => self.addr_zp_rmw(bus, Self::do_ror),

            // RRA zp - 5 cycles
            0x67 => self.addr_zp_rmw(bus, Self::do_rra),

            // PLA - 4 cycles
            0x68 => self.op_pla(bus),

            // ADC imm - 2 cycles
            0x69 => self.addr_imm(bus, Self::do_adc),

            // ROR A - 2 cycles
            0x6A => self.op_accumulator(bus, Self::do_ror),

            // ARR imm - 2 cycles
            0x6B => self.addr_imm(bus, Self::do_arr),

            // JMP (ind) - 5 cycles
            0x6C => self.op_jmp_ind(bus),

            // ADC abs - 4 cycles
            0x6D => self.addr_abs(bus, Self::do_adc),

            // ROR abs - 6 cycles
            0x6E => self.addr_abs_rmw(bus, Self::do_ror),

            // RRA abs - 6 cycles
            0x6F => self.addr_abs_rmw(bus, Self::do_rra),

            // BVS rel - 2/3/4 cycles
            0x70 => self.op_branch(bus, self.regs.p.is_set(V)),

            // ADC (zp),Y - 5/6 cycles
            0x71 => self.addr_izy(bus, Self::do_adc),

            // RRA (zp),Y - 8 cycles
            0x73 => self.addr_izy_rmw(bus, Self::do_rra),

            // ADC zp,X - 4 cycles
            0x75 => self.addr_zpx(bus, Self::do_adc),

            // ROR zp,X - 6 cycles
            0x76 => self.addr_zpx_rmw(bus, Self::do_ror),

            // RRA zp,X - 6 cycles
            0x77 => self.addr_zpx_rmw(bus, Self::do_rra),

            // SEI - 2 cycles
            0x78 => self.op_flag(bus, I, true),

            // ADC abs,Y - 4/5 cycles
            0x79 => self.addr_aby(bus, Self::do_adc),

            // RRA abs,Y - 7 cycles
            0x7B => self.addr_aby_rmw(bus, Self::do_rra),

            // ADC abs,X - 4/5 cycles
            0x7D => self.addr_abx(bus, Self::do_adc),

            // ROR abs,X - 7 cycles
            0x7E => self.addr_abx_rmw(bus, Self::do_ror),

            // RRA abs,X - 7 cycles
            0x7F => self.addr_abx_rmw(bus, Self::do_rra),

            // NOP imm - 2 cycles
            0x80 | 0x82 | 0x89 | 0xC2 | 0xE2 => self.addr_imm(bus, Self::do_nop),

            // STA (zp,X) - 6 cycles
            0x81 => self.addr_izx_w(bus, |cpu| cpu.regs.a),

            // SAX (zp,X) - 6 cycles
            0x83 => self.addr_izx_w(bus, |cpu| cpu.regs.a & cpu.regs.x),

            // STY zp - 3 cycles
            0x84 => self.addr_zp_w(bus, |cpu| cpu.regs.y),

            // STA zp - 3 cycles
            0x85 => self.addr_zp_w(bus, |cpu| cpu.regs.a),

            // STX zp - 3 cycles
            0x86 => self.addr_zp_w(bus, |cpu| cpu.regs.x),

            // SAX zp - 3 cycles
            0x87 => self.addr_zp_w(bus, |cpu| cpu.regs.a & cpu.regs.x),

            // DEY - 2 cycles
            0x88 => self.op_implied(bus, |cpu| {
                cpu.regs.y = cpu.regs.y.wrapping_sub(1);
                cpu.regs.p.update_nz(cpu.regs.y);
            }),

            // TXA - 2 cycles
            0x8A => self.op_implied(bus, |cpu| {
                cpu.regs.a = cpu.regs.x;
                cpu.regs.p.update_nz(cpu.regs.a);
            }),

            // ANE imm - 2 cycles
            0x8B => self.addr_imm(bus, Self::do_ane),

            // STY abs - 4 cycles
            0x8C => self.addr_abs_w(bus, |cpu| cpu.regs.y),

            // STA abs - 4 cycles
            0x8D => self.addr_abs_w(bus, |cpu| cpu.regs.a),

            // STX abs - 4 cycles
            0x8E => self.addr_abs_w(bus, |cpu| cpu.regs.x),

            // SAX abs - 4 cycles
            0x8F => self.addr_abs_w(bus, |cpu| cpu.regs.a & cpu.regs.x),

            // BCC rel - 2/3/4 cycles
            0x90 => self.op_branch(bus, !self.regs.p.is_set(C)),

            // STA (zp),Y - 6 cycles
            0x91 => self.addr_izy_w(bus, |cpu| cpu.regs.a),

            // SHA (zp),Y - 6 cycles
            0x93 => self.addr_sha_izy(bus),

            // STY zp,X - 4 cycles
            0x94 => self.addr_zpx_w(bus, |cpu| cpu.regs.y),

            // STA zp,X - 4 cycles
            0x95 => self.addr_zpx_w(bus, |cpu| cpu.regs.a),

            // STX zp,Y - 4 cycles
            0x96 => self.addr_zpy_w(bus, |cpu| cpu.regs.x),

            // SAX zp,Y - 4 cycles
            0x97 => self.addr_zpy_w(bus, |cpu| cpu.regs.a & cpu.regs.x),

            // TYA - 2 cycles
            0x98 => self.op_implied(bus, |cpu| {
                cpu.regs.a = cpu.regs.y;
                cpu.regs.p.update_nz(cpu.regs.a);
            }),

            // STA abs,Y - 5 cycles
            0x99 => self.addr_aby_w(bus, |cpu| cpu.regs.a),

            // TXS - 2 cycles (no flags)
            0x9A => self.op_implied(bus, |cpu| cpu.regs.s = cpu.regs.x),

            // TAS abs,Y - 5 cycles
            0x9B => {
                if self.cycle == 4 {
                    self.regs.s = self.regs.a & self.regs.x;
                }
                let y = self.regs.y;
                self.addr_sh(bus, y, |cpu| cpu.regs.s);
            }

            // SHY abs,X - 5 cycles
            0x9C => {
                let x = self.regs.x;
                self.addr_sh(bus, x, |cpu| cpu.regs.y);
            }

            // STA abs,X - 5 cycles
            0x9D => self.addr_abx_w(bus, |cpu| cpu.regs.a),

            // SHX abs,Y - 5 cycles
            0x9E => {
                let y = self.regs.y;
                self.addr_sh(bus, y, |cpu| cpu.regs.x);
            }

            // SHA abs,Y - 5 cycles
            0x9F => {
                let y = self.regs.y;
                self.addr_sh(bus, y, |cpu| cpu.regs.a & cpu.regs.x);
            }

            // LDY imm - 2 cycles
            0xA0 => self.addr_imm(bus, Self::do_ldy),

            // LDA (zp,X) - 6 cycles
            0xA1 => self.addr_izx(bus, Self::do_lda),

            // LDX imm - 2 cycles
            0xA2 => self.addr_imm(bus, Self::do_ldx),

            // LAX (zp,X) - 6 cycles
            0xA3 => self.addr_izx(bus, Self::do_lax),

            // LDY zp - 3 cycles
            0xA4 => self.addr_zp(bus, Self::do_ldy),

            // LDA zp - 3 cycles
            0xA5 => self.addr_zp(bus, Self::do_lda),

            // LDX zp - 3 cycles
            0xA6 => self.addr_zp(bus, Self::do_ldx),

            // LAX zp - 3 cycles
            0xA7 => self.addr_zp(bus, Self::do_lax),

            // TAY - 2 cycles
            0xA8 => self.op_implied(bus, |cpu| {
                cpu.regs.y = cpu.regs.a;
                cpu.regs.p.update_nz(cpu.regs.y);
            }),

            // LDA imm - 2 cycles
            0xA9 => self.addr_imm(bus, Self::do_lda),

            // TAX - 2 cycles
            0xAA => self.op_implied(bus, |cpu| {
                cpu.regs.x = cpu.regs.a;
                cpu.regs.p.update_nz(cpu.regs.x);
            }),

            // LXA imm - 2 cycles
            0xAB => self.addr_imm(bus, Self::do_lxa),

            // LDY abs - 4 cycles
            0xAC => self.addr_abs(bus, Self::do_ldy),

            // LDA abs - 4 cycles
            0xAD => self.addr_abs(bus, Self::do_lda),

            // LDX abs - 4 cycles
            0xAE => self.addr_abs(bus, Self::do_ldx),

            // LAX abs - 4 cycles
            0xAF => self.addr_abs(bus, Self::do_lax),

            // BCS rel - 2/3/4 cycles
            0xB0 => self.op_branch(bus, self.regs.p.is_set(C)),

            // LDA (zp),Y - 5/6 cycles
            0xB1 => self.addr_izy(bus, Self::do_lda),

            // LAX (zp),Y - 5/6 cycles
            0xB3 => self.addr_izy(bus, Self::do_lax),

            // LDY zp,X - 4 cycles
            0xB4 => self.addr_zpx(bus, Self::do_ldy),

            // LDA zp,X - 4 cycles
            0xB5 => self.addr_zpx(bus, Self::do_lda),

            // LDX zp,Y - 4 cycles
            0xB6 => self.addr_zpy(bus, Self::do_ldx),

            // LAX zp,Y - 4 cycles
            0xB7 => self.addr_zpy(bus, Self::do_lax),

            // CLV - 2 cycles
            0xB8 => self.op_flag(bus, V, false),

            // LDA abs,Y - 4/5 cycles
            0xB9 => self.addr_aby(bus, Self::do_lda),

            // TSX - 2 cycles
            0xBA => self.op_implied(bus, |cpu| {
                cpu.regs.x = cpu.regs.s;
                cpu.regs.p.update_nz(cpu.regs.x);
            }),

            // LAS abs,Y - 4/5 cycles
            0xBB => self.addr_aby(bus, Self::do_las),

            // LDY abs,X - 4/5 cycles
            0xBC => self.addr_abx(bus, Self::do_ldy),

            // LDA abs,X - 4/5 cycles
            0xBD => self.addr_abx(bus, Self::do_lda),

            // LDX abs,Y - 4/5 cycles
            0xBE => self.addr_aby(bus, Self::do_ldx),

            // LAX abs,Y - 4/5 cycles
            0xBF => self.addr_aby(bus, Self::do_lax),

            // CPY imm - 2 cycles
            0xC0 => self.addr_imm(bus, Self::do_cpy),

            // CMP (zp,X) - 6 cycles
            0xC1 => self.addr_izx(bus, Self::do_cmp),

            // DCP (zp,X) - 8 cycles
            0xC3 => self.addr_izx_rmw(bus, Self::do_dcp),

            // CPY zp - 3 cycles
            0xC4 => self.addr_zp(bus, Self::do_cpy),

            // CMP zp - 3 cycles
            0xC5 => self.addr_zp(bus, Self::do_cmp),

            // DEC zp - 5 cycles
            0xC6 => self.addr_zp_rmw(bus, Self::do_dec),

            // DCP zp - 5 cycles
            0xC7 => self.addr_zp_rmw(bus, Self::do_dcp),

            // INY - 2 cycles
            0xC8 => self.op_implied(bus, |cpu| {
                cpu.regs.y = cpu.regs.y.wrapping_add(1);
                cpu.regs.p.update_nz(cpu.regs.y);
            }),

            // CMP imm - 2 cycles
            0xC9 => self.addr_imm(bus, Self::do_cmp),

            // DEX - 2 cycles
            0xCA => self.op_implied(bus, |cpu| {
                cpu.regs.x = cpu.regs.x.wrapping_sub(1);
                cpu.regs.p.update_nz(cpu.regs.x);
            }),

            // SBX imm - 2 cycles
            0xCB => self.addr_imm(bus, Self::do_sbx),

            // CPY abs - 4 cycles
            0xCC => self.addr_abs(bus, Self::do_cpy),

            // CMP abs - 4 cycles
            0xCD => self.addr_abs(bus, Self::do_cmp),

            // DEC abs - 6 cycles
            0xCE => self.addr_abs_rmw(bus, Self::do_dec),

            // DCP abs - 6 cycles
            0xCF => self.addr_abs_rmw(bus, Self::do_dcp),

            // BNE rel - 2/3/4 cycles
            0xD0 => self.op_branch(bus, !self.regs.p.is_set(Z)),

            // CMP (zp),Y - 5/6 cycles
            0xD1 => self.addr_izy(bus, Self::do_cmp),

            // DCP (zp),Y - 8 cycles
            0xD3 => self.addr_izy_rmw(bus, Self::do_dcp),

            // CMP zp,X - 4 cycles
            0xD5 => self.addr_zpx(bus, Self::do_cmp),

            // DEC zp,X - 6 cycles
            0xD6 => self.addr_zpx_rmw(bus, Self::do_dec),

            // DCP zp,X - 6 cycles
            0xD7 => self.addr_zpx_rmw(bus, Self::do_dcp),

            // CLD - 2 cycles
            0xD8 => self.op_flag(bus, D, false),

            // CMP abs,Y - 4/5 cycles
            0xD9 => self.addr_aby(bus, Self::do_cmp),

            // DCP abs,Y - 7 cycles
            0xDB => self.addr_aby_rmw(bus, Self::do_dcp),

            // CMP abs,X - 4/5 cycles
            0xDD => self.addr_abx(bus, Self::do_cmp),

            // DEC abs,X - 7 cycles
            0xDE => self.addr_abx_rmw(bus, Self::do_dec),

            // DCP abs,X - 7 cycles
            0xDF => self.addr_abx_rmw(bus, Self::do_dcp),

            // CPX imm - 2 cycles
            0xE0 => self.addr_imm(bus, Self::do_cpx),

            // SBC (zp,X) - 6 cycles
            0xE1 => self.addr_izx(bus, Self::do_sbc),

            // ISB (zp,X) - 8 cycles
            0xE3 => self.addr_izx_rmw(bus, Self::do_isb),

            // CPX zp - 3 cycles
            0xE4 => self.addr_zp(bus, Self::do_cpx),

            // SBC zp - 3 cycles
            0xE5 => self.addr_zp(bus, Self::do_sbc),

            // INC zp - 5 cycles
            0xE6 => self.addr_zp_rmw(bus, Self::do_inc),

            // ISB zp - 5 cycles
            0xE7 => self.addr_zp_rmw(bus, Self::do_isb),

            // INX - 2 cycles
            0xE8 => self.op_implied(bus, |cpu| {
                cpu.regs.x = cpu.regs.x.wrapping_add(1);
                cpu.regs.p.update_nz(cpu.regs.x);
            }),

            // SBC imm - 2 cycles ($EB is the undocumented duplicate)
            0xE9 | 0xEB => self.addr_imm(bus, Self::do_sbc),

            // CPX abs - 4 cycles
            0xEC => self.addr_abs(bus, Self::do_cpx),

            // SBC abs - 4 cycles
            0xED => self.addr_abs(bus, Self::do_sbc),

            // INC abs - 6 cycles
            0xEE => self.addr_abs_rmw(bus, Self::do_inc),

            // ISB abs - 6 cycles
            0xEF => self.addr_abs_rmw(bus, Self::do_isb),

            // BEQ rel - 2/3/4 cycles
            0xF0 => self.op_branch(bus, self.regs.p.is_set(Z)),

            // SBC (zp),Y - 5/6 cycles
            0xF1 => self.addr_izy(bus, Self::do_sbc),

            // ISB (zp),Y - 8 cycles
            0xF3 => self.addr_izy_rmw(bus, Self::do_isb),

            // SBC zp,X - 4 cycles
            0xF5 => self.addr_zpx(bus, Self::do_sbc),

            // INC zp,X - 6 cycles
            0xF6 => self.addr_zpx_rmw(bus, Self::do_inc),

            // ISB zp,X - 6 cycles
            0xF7 => self.addr_zpx_rmw(bus, Self::do_isb),

            // SED - 2 cycles
            0xF8 => self.op_flag(bus, D, true),

            // SBC abs,Y - 4/5 cycles
            0xF9 => self.addr_aby(bus, Self::do_sbc),

            // ISB abs,Y - 7 cycles
            0xFB => self.addr_aby_rmw(bus, Self::do_isb),

            // SBC abs,X - 4/5 cycles
            0xFD => self.addr_abx(bus, Self::do_sbc),

            // INC abs,X - 7 cycles
            0xFE => self.addr_abx_rmw(bus, Self::do_inc),

            // ISB abs,X - 7 cycles
            0xFF => self.addr_abx_rmw(bus, Self::do_isb),

            // JAM: $02 $12 $22 $32 $42 $52 $62 $72 $92 $B2 $D2 $F2
            _ => self.op_jam(bus),
        }
    }

    /// Finish current instruction and return to opcode fetch.
    fn finish(&mut self) {
        self.state = State::FetchOpcode;
        self.cycle = 0;
    }

    // ========================================================================
    // Addressing mode helpers - read operations
    // ========================================================================

    /// Immediate addressing: operand is next byte.
    fn addr_imm<B: Bus>(&mut self, bus: &mut B, op: fn(&mut Self, u8)) {
        if self.cycle == 1 {
            self.data = bus.read(self.regs.pc);
            self.regs.pc = self.regs.pc.wrapping_add(1);
            op(self, self.data);
            self.finish();
        }
    }

    /// Zero page addressing: operand is at zero page address.
    fn addr_zp<B: Bus>(&mut self, bus: &mut B, op: fn(&mut Self, u8)) {
        match self.cycle {
            1 => {
                self.addr = u16::from(bus.read(self.regs.pc));
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.cycle = 2;
            }
            2 => {
                self.data = bus.read(self.addr);
                op(self, self.data);
                self.finish();
            }
            _ => unreachable!(),
        }
    }

    /// Zero page,X addressing.
    fn addr_zpx<B: Bus>(&mut self, bus: &mut B, op: fn(&mut Self, u8)) {
        let x = self.regs.x;
        self.addr_zp_indexed(bus, x, op);
    }

    /// Zero page,Y addressing.
    fn addr_zpy<B: Bus>(&mut self, bus: &mut B, op: fn(&mut Self, u8)) {
        let y = self.regs.y;
        self.addr_zp_indexed(bus, y, op);
    }

    fn addr_zp_indexed<B: Bus>(&mut self, bus: &mut B, index: u8, op: fn(&mut Self, u8)) {
        match self.cycle {
            1 => {
                self.pointer = bus.read(self.regs.pc);
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.cycle = 2;
            }
            2 => {
                // Dummy read of the unindexed address; index wraps in page zero
                let _ = bus.read(u16::from(self.pointer));
                self.addr = u16::from(self.pointer.wrapping_add(index));
                self.cycle = 3;
            }
            3 => {
                self.data = bus.read(self.addr);
                op(self, self.data);
                self.finish();
            }
            _ => unreachable!(),
        }
    }

    /// Absolute addressing: operand is at 16-bit address.
    fn addr_abs<B: Bus>(&mut self, bus: &mut B, op: fn(&mut Self, u8)) {
        match self.cycle {
            1 => {
                self.addr = u16::from(bus.read(self.regs.pc));
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.cycle = 2;
            }
            2 => {
                self.addr |= u16::from(bus.read(self.regs.pc)) << 8;
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.cycle = 3;
            }
            3 => {
                self.data = bus.read(self.addr);
                op(self, self.data);
                self.finish();
            }
            _ => unreachable!(),
        }
    }

    /// Absolute,X addressing with page crossing check.
    fn addr_abx<B: Bus>(&mut self, bus: &mut B, op: fn(&mut Self, u8)) {
        let x = self.regs.x;
        self.addr_abs_indexed(bus, x, op);
    }

    /// Absolute,Y addressing with page crossing check.
    fn addr_aby<B: Bus>(&mut self, bus: &mut B, op: fn(&mut Self, u8)) {
        let y = self.regs.y;
        self.addr_abs_indexed(bus, y, op);
    }

    fn addr_abs_indexed<B: Bus>(&mut self, bus: &mut B, index: u8, op: fn(&mut Self, u8)) {
        match self.cycle {
            1 => {
                self.addr = u16::from(bus.read(self.regs.pc));
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.cycle = 2;
            }
            2 => {
                self.fetch_indexed_high(bus, index);
                self.cycle = 3;
            }
            3 => {
                if self.data != 0 {
                    // Page crossed - read from the unfixed address, then fix
                    let _ = bus.read(self.addr);
                    self.addr = self.addr.wrapping_add(0x100);
                    self.cycle = 4;
                } else {
                    self.data = bus.read(self.addr);
                    op(self, self.data);
                    self.finish();
                }
            }
            4 => {
                self.data = bus.read(self.addr);
                op(self, self.data);
                self.finish();
            }
            _ => unreachable!(),
        }
    }

    /// Read the high address byte and add `index` to the low byte without
    /// carrying; `data` records whether the carry is still owed.
    fn fetch_indexed_high<B: Bus>(&mut self, bus: &mut B, index: u8) {
        let hi = bus.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        let lo = (self.addr as u8).wrapping_add(index);
        self.addr = u16::from(lo) | (u16::from(hi) << 8);
        self.pointer = hi;
        self.data = u8::from(lo < index);
    }

    /// Indexed indirect (zp,X) addressing.
    fn addr_izx<B: Bus>(&mut self, bus: &mut B, op: fn(&mut Self, u8)) {
        if self.cycle < 5 {
            self.izx_pointer(bus);
        } else {
            self.data = bus.read(self.addr);
            op(self, self.data);
            self.finish();
        }
    }

    /// Cycles 1-4 of (zp,X): leaves the effective address in `addr`.
    fn izx_pointer<B: Bus>(&mut self, bus: &mut B) {
        match self.cycle {
            1 => {
                self.pointer = bus.read(self.regs.pc);
                self.regs.pc = self.regs.pc.wrapping_add(1);
            }
            2 => {
                let _ = bus.read(u16::from(self.pointer));
                self.pointer = self.pointer.wrapping_add(self.regs.x);
            }
            3 => {
                self.addr = u16::from(bus.read(u16::from(self.pointer)));
            }
            4 => {
                // High byte wraps within page zero
                self.addr |= u16::from(bus.read(u16::from(self.pointer.wrapping_add(1)))) << 8;
            }
            _ => unreachable!(),
        }
        self.cycle += 1;
    }

    /// Cycles 1-3 of (zp),Y: leaves the uncarried address in `addr` and the
    /// pending carry in `data`.
    fn izy_pointer<B: Bus>(&mut self, bus: &mut B) {
        match self.cycle {
            1 => {
                self.pointer = bus.read(self.regs.pc);
                self.regs.pc = self.regs.pc.wrapping_add(1);
            }
            2 => {
                self.addr = u16::from(bus.read(u16::from(self.pointer)));
            }
            3 => {
                let hi = bus.read(u16::from(self.pointer.wrapping_add(1)));
                let lo = (self.addr as u8).wrapping_add(self.regs.y);
                self.addr = u16::from(lo) | (u16::from(hi) << 8);
                self.pointer = hi;
                self.data = u8::from(lo < self.regs.y);
            }
            _ => unreachable!(),
        }
        self.cycle += 1;
    }

    /// Indirect indexed (zp),Y addressing.
    fn addr_izy<B: Bus>(&mut self, bus: &mut B, op: fn(&mut Self, u8)) {
        match self.cycle {
            1..=3 => self.izy_pointer(bus),
            4 => {
                if self.data != 0 {
                    let _ = bus.read(self.addr);
                    self.addr = self.addr.wrapping_add(0x100);
                    self.cycle = 5;
                } else {
                    self.data = bus.read(self.addr);
                    op(self, self.data);
                    self.finish();
                }
            }
            5 => {
                self.data = bus.read(self.addr);
                op(self, self.data);
                self.finish();
            }
            _ => unreachable!(),
        }
    }

    // ========================================================================
    // Addressing mode helpers - write operations
    // ========================================================================

    /// Zero page write.
    fn addr_zp_w<B: Bus>(&mut self, bus: &mut B, val: fn(&Self) -> u8) {
        match self.cycle {
            1 => {
                self.addr = u16::from(bus.read(self.regs.pc));
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.cycle = 2;
            }
            2 => {
                bus.write(self.addr, val(self));
                self.finish();
            }
            _ => unreachable!(),
        }
    }

    /// Zero page,X write.
    fn addr_zpx_w<B: Bus>(&mut self, bus: &mut B, val: fn(&Self) -> u8) {
        let x = self.regs.x;
        self.addr_zp_indexed_w(bus, x, val);
    }

    /// Zero page,Y write.
    fn addr_zpy_w<B: Bus>(&mut self, bus: &mut B, val: fn(&Self) -> u8) {
        let y = self.regs.y;
        self.addr_zp_indexed_w(bus, y, val);
    }

    fn addr_zp_indexed_w<B: Bus>(&mut self, bus: &mut B, index: u8, val: fn(&Self) -> u8) {
        match self.cycle {
            1 => {
                self.pointer = bus.read(self.regs.pc);
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.cycle = 2;
            }
            2 => {
                let _ = bus.read(u16::from(self.pointer));
                self.addr = u16::from(self.pointer.wrapping_add(index));
                self.cycle = 3;
            }
            3 => {
                bus.write(self.addr, val(self));
                self.finish();
            }
            _ => unreachable!(),
        }
    }

    /// Absolute write.
    fn addr_abs_w<B: Bus>(&mut self, bus: &mut B, val: fn(&Self) -> u8) {
        match self.cycle {
            1 => {
                self.addr = u16::from(bus.read(self.regs.pc));
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.cycle = 2;
            }
            2 => {
                self.addr |= u16::from(bus.read(self.regs.pc)) << 8;
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.cycle = 3;
            }
            3 => {
                bus.write(self.addr, val(self));
                self.finish();
            }
            _ => unreachable!(),
        }
    }

    /// Absolute,X write (always 5 cycles, no page crossing optimization).
    fn addr_abx_w<B: Bus>(&mut self, bus: &mut B, val: fn(&Self) -> u8) {
        let x = self.regs.x;
        self.addr_abs_indexed_w(bus, x, val);
    }

    /// Absolute,Y write (always 5 cycles).
    fn addr_aby_w<B: Bus>(&mut self, bus: &mut B, val: fn(&Self) -> u8) {
        let y = self.regs.y;
        self.addr_abs_indexed_w(bus, y, val);
    }

    fn addr_abs_indexed_w<B: Bus>(&mut self, bus: &mut B, index: u8, val: fn(&Self) -> u8) {
        match self.cycle {
            1 => {
                self.addr = u16::from(bus.read(self.regs.pc));
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.cycle = 2;
            }
            2 => {
                self.fetch_indexed_high(bus, index);
                self.cycle = 3;
            }
            3 => {
                // Always dummy read for write operations
                let _ = bus.read(self.addr);
                if self.data != 0 {
                    self.addr = self.addr.wrapping_add(0x100);
                }
                self.cycle = 4;
            }
            4 => {
                bus.write(self.addr, val(self));
                self.finish();
            }
            _ => unreachable!(),
        }
    }

    /// Indexed indirect (zp,X) write.
    fn addr_izx_w<B: Bus>(&mut self, bus: &mut B, val: fn(&Self) -> u8) {
        if self.cycle < 5 {
            self.izx_pointer(bus);
        } else {
            bus.write(self.addr, val(self));
            self.finish();
        }
    }

    /// Indirect indexed (zp),Y write (always 6 cycles).
    fn addr_izy_w<B: Bus>(&mut self, bus: &mut B, val: fn(&Self) -> u8) {
        match self.cycle {
            1..=3 => self.izy_pointer(bus),
            4 => {
                let _ = bus.read(self.addr);
                if self.data != 0 {
                    self.addr = self.addr.wrapping_add(0x100);
                }
                self.cycle = 5;
            }
            5 => {
                bus.write(self.addr, val(self));
                self.finish();
            }
            _ => unreachable!(),
        }
    }

    /// SHA/SHX/SHY/TAS absolute indexed store (5 cycles).
    ///
    /// Stores `value & (H + 1)` where H is the unindexed high byte. When the
    /// index crosses a page, the stored value also replaces the high byte of
    /// the target address.
    fn addr_sh<B: Bus>(&mut self, bus: &mut B, index: u8, val: fn(&Self) -> u8) {
        match self.cycle {
            1 => {
                self.addr = u16::from(bus.read(self.regs.pc));
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.cycle = 2;
            }
            2 => {
                self.fetch_indexed_high(bus, index);
                self.cycle = 3;
            }
            3 => {
                let _ = bus.read(self.addr);
                self.cycle = 4;
            }
            4 => {
                self.store_sh(bus, val(self));
            }
            _ => unreachable!(),
        }
    }

    /// SHA (zp),Y (6 cycles).
    fn addr_sha_izy<B: Bus>(&mut self, bus: &mut B) {
        match self.cycle {
            1..=3 => self.izy_pointer(bus),
            4 => {
                let _ = bus.read(self.addr);
                self.cycle = 5;
            }
            5 => {
                let value = self.regs.a & self.regs.x;
                self.store_sh(bus, value);
            }
            _ => unreachable!(),
        }
    }

    fn store_sh<B: Bus>(&mut self, bus: &mut B, value: u8) {
        let value = value & self.pointer.wrapping_add(1);
        let addr = if self.data != 0 {
            (u16::from(value) << 8) | (self.addr & 0x00FF)
        } else {
            self.addr
        };
        bus.write(addr, value);
        self.finish();
    }

    // ========================================================================
    // Addressing mode helpers - read-modify-write operations
    // ========================================================================

    /// Shared tail of every read-modify-write: read, dummy write of the
    /// original value, write of the result.
    fn rmw_tail<B: Bus>(&mut self, bus: &mut B, first: u8, op: fn(&mut Self, u8) -> u8) {
        match self.cycle - first {
            0 => {
                self.data = bus.read(self.addr);
            }
            1 => {
                bus.write(self.addr, self.data);
                self.data = op(self, self.data);
            }
            2 => {
                bus.write(self.addr, self.data);
                self.finish();
                return;
            }
            _ => unreachable!(),
        }
        self.cycle += 1;
    }

    /// Zero page read-modify-write.
    fn addr_zp_rmw<B: Bus>(&mut self, bus: &mut B, op: fn(&mut Self, u8) -> u8) {
        if self.cycle == 1 {
            self.addr = u16::from(bus.read(self.regs.pc));
            self.regs.pc = self.regs.pc.wrapping_add(1);
            self.cycle = 2;
        } else {
            self.rmw_tail(bus, 2, op);
        }
    }

    /// Zero page,X read-modify-write.
    fn addr_zpx_rmw<B: Bus>(&mut self, bus: &mut B, op: fn(&mut Self, u8) -> u8) {
        match self.cycle {
            1 => {
                self.pointer = bus.read(self.regs.pc);
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.cycle = 2;
            }
            2 => {
                let _ = bus.read(u16::from(self.pointer));
                self.addr = u16::from(self.pointer.wrapping_add(self.regs.x));
                self.cycle = 3;
            }
            _ => self.rmw_tail(bus, 3, op),
        }
    }

    /// Absolute read-modify-write.
    fn addr_abs_rmw<B: Bus>(&mut self, bus: &mut B, op: fn(&mut Self, u8) -> u8) {
        match self.cycle {
            1 => {
                self.addr = u16::from(bus.read(self.regs.pc));
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.cycle = 2;
            }
            2 => {
                self.addr |= u16::from(bus.read(self.regs.pc)) << 8;
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.cycle = 3;
            }
            _ => self.rmw_tail(bus, 3, op),
        }
    }

    /// Absolute,X read-modify-write (always 7 cycles).
    fn addr_abx_rmw<B: Bus>(&mut self, bus: &mut B, op: fn(&mut Self, u8) -> u8) {
        let x = self.regs.x;
        self.addr_abs_indexed_rmw(bus, x, op);
    }

    /// Absolute,Y read-modify-write (always 7 cycles).
    fn addr_aby_rmw<B: Bus>(&mut self, bus: &mut B, op: fn(&mut Self, u8) -> u8) {
        let y = self.regs.y;
        self.addr_abs_indexed_rmw(bus, y, op);
    }

    fn addr_abs_indexed_rmw<B: Bus>(
        &mut self,
        bus: &mut B,
        index: u8,
        op: fn(&mut Self, u8) -> u8,
    ) {
        match self.cycle {
            1 => {
                self.addr = u16::from(bus.read(self.regs.pc));
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.cycle = 2;
            }
            2 => {
                self.fetch_indexed_high(bus, index);
                self.cycle = 3;
            }
            3 => {
                let _ = bus.read(self.addr);
                if self.data != 0 {
                    self.addr = self.addr.wrapping_add(0x100);
                }
                self.cycle = 4;
            }
            _ => self.rmw_tail(bus, 4, op),
        }
    }

    /// Indexed indirect (zp,X) read-modify-write (8 cycles, undocumented
    /// opcodes only).
    fn addr_izx_rmw<B: Bus>(&mut self, bus: &mut B, op: fn(&mut Self, u8) -> u8) {
        if self.cycle < 5 {
            self.izx_pointer(bus);
        } else {
            self.rmw_tail(bus, 5, op);
        }
    }

    /// Indirect indexed (zp),Y read-modify-write (8 cycles).
    fn addr_izy_rmw<B: Bus>(&mut self, bus: &mut B, op: fn(&mut Self, u8) -> u8) {
        match self.cycle {
            1..=3 => self.izy_pointer(bus),
            4 => {
                let _ = bus.read(self.addr);
                if self.data != 0 {
                    self.addr = self.addr.wrapping_add(0x100);
                }
                self.cycle = 5;
            }
            _ => self.rmw_tail(bus, 5, op),
        }
    }

    // ========================================================================
    // ALU operations
    // ========================================================================

    fn do_nop(&mut self, _val: u8) {}

    fn do_lda(&mut self, val: u8) {
        self.regs.a = val;
        self.regs.p.update_nz(val);
    }

    fn do_ldx(&mut self, val: u8) {
        self.regs.x = val;
        self.regs.p.update_nz(val);
    }

    fn do_ldy(&mut self, val: u8) {
        self.regs.y = val;
        self.regs.p.update_nz(val);
    }

    fn do_lax(&mut self, val: u8) {
        self.regs.a = val;
        self.regs.x = val;
        self.regs.p.update_nz(val);
    }

    fn do_las(&mut self, val: u8) {
        let result = val & self.regs.s;
        self.regs.a = result;
        self.regs.x = result;
        self.regs.s = result;
        self.regs.p.update_nz(result);
    }

    fn do_ora(&mut self, val: u8) {
        self.regs.a |= val;
        self.regs.p.update_nz(self.regs.a);
    }

    fn do_and(&mut self, val: u8) {
        self.regs.a &= val;
        self.regs.p.update_nz(self.regs.a);
    }

    fn do_eor(&mut self, val: u8) {
        self.regs.a ^= val;
        self.regs.p.update_nz(self.regs.a);
    }

    fn do_adc(&mut self, val: u8) {
        if self.regs.p.is_set(D) {
            self.do_adc_decimal(val);
        } else {
            self.do_adc_binary(val);
        }
    }

    fn do_adc_binary(&mut self, val: u8) {
        let a = self.regs.a;
        let carry = u16::from(self.regs.p.is_set(C));
        let sum = u16::from(a) + u16::from(val) + carry;
        let result = sum as u8;

        self.regs.p.set_if(C, sum > 0xFF);
        self.regs
            .p
            .set_if(V, (a ^ result) & (val ^ result) & 0x80 != 0);
        self.regs.a = result;
        self.regs.p.update_nz(result);
    }

    fn do_adc_decimal(&mut self, val: u8) {
        let a = self.regs.a;
        let carry = u8::from(self.regs.p.is_set(C));

        let mut lo = (a & 0x0F) + (val & 0x0F) + carry;
        if lo > 9 {
            lo += 6;
        }
        let mut hi = (a >> 4) + (val >> 4) + u8::from(lo > 0x0F);

        // NMOS: Z from the binary sum, N and V from the intermediate result
        let bin_result = a.wrapping_add(val).wrapping_add(carry);
        self.regs.p.set_if(Z, bin_result == 0);
        self.regs.p.set_if(N, hi & 0x08 != 0);
        let intermediate = (hi << 4) | (lo & 0x0F);
        self.regs
            .p
            .set_if(V, (a ^ intermediate) & !(a ^ val) & 0x80 != 0);

        if hi > 9 {
            hi += 6;
        }

        self.regs.p.set_if(C, hi > 0x0F);
        self.regs.a = (hi << 4) | (lo & 0x0F);
    }

    fn do_sbc(&mut self, val: u8) {
        if self.regs.p.is_set(D) {
            self.do_sbc_decimal(val);
        } else {
            // SBC is ADC with inverted operand
            self.do_adc_binary(!val);
        }
    }

    fn do_sbc_decimal(&mut self, val: u8) {
        let a = self.regs.a;
        let borrow = i16::from(!self.regs.p.is_set(C));

        // Flags come from the binary subtraction on NMOS parts
        let bin_result = i16::from(a) - i16::from(val) - borrow;
        self.regs.p.set_if(C, bin_result >= 0);
        self.regs.p.set_if(Z, (bin_result as u8) == 0);
        self.regs.p.set_if(N, bin_result & 0x80 != 0);
        self.regs.p.set_if(
            V,
            (i16::from(a) ^ bin_result) & (i16::from(a) ^ i16::from(val)) & 0x80 != 0,
        );

        let mut lo = i16::from(a & 0x0F) - i16::from(val & 0x0F) - borrow;
        let mut hi = i16::from(a >> 4) - i16::from(val >> 4);

        if lo < 0 {
            lo -= 6;
            hi -= 1;
        }
        if hi < 0 {
            hi -= 6;
        }

        self.regs.a = ((hi << 4) as u8) | ((lo & 0x0F) as u8);
    }

    fn compare(&mut self, reg: u8, val: u8) {
        self.regs.p.set_if(C, reg >= val);
        self.regs.p.update_nz(reg.wrapping_sub(val));
    }

    fn do_cmp(&mut self, val: u8) {
        self.compare(self.regs.a, val);
    }

    fn do_cpx(&mut self, val: u8) {
        self.compare(self.regs.x, val);
    }

    fn do_cpy(&mut self, val: u8) {
        self.compare(self.regs.y, val);
    }

    fn do_bit(&mut self, val: u8) {
        self.regs.p.set_if(Z, self.regs.a & val == 0);
        self.regs.p.set_if(N, val & 0x80 != 0);
        self.regs.p.set_if(V, val & 0x40 != 0);
    }

    fn do_asl(&mut self, val: u8) -> u8 {
        self.regs.p.set_if(C, val & 0x80 != 0);
        let result = val << 1;
        self.regs.p.update_nz(result);
        result
    }

    fn do_lsr(&mut self, val: u8) -> u8 {
        self.regs.p.set_if(C, val & 0x01 != 0);
        let result = val >> 1;
        self.regs.p.update_nz(result);
        result
    }

    fn do_rol(&mut self, val: u8) -> u8 {
        let carry = u8::from(self.regs.p.is_set(C));
        self.regs.p.set_if(C, val & 0x80 != 0);
        let result = (val << 1) | carry;
        self.regs.p.update_nz(result);
        result
    }

    fn do_ror(&mut self, val: u8) -> u8 {
        let carry = if self.regs.p.is_set(C) { 0x80 } else { 0 };
        self.regs.p.set_if(C, val & 0x01 != 0);
        let result = (val >> 1) | carry;
        self.regs.p.update_nz(result);
        result
    }

    fn do_inc(&mut self, val: u8) -> u8 {
        let result = val.wrapping_add(1);
        self.regs.p.update_nz(result);
        result
    }

    fn do_dec(&mut self, val: u8) -> u8 {
        let result = val.wrapping_sub(1);
        self.regs.p.update_nz(result);
        result
    }

    // Undocumented combined operations

    fn do_slo(&mut self, val: u8) -> u8 {
        let result = self.do_asl(val);
        self.do_ora(result);
        result
    }

    fn do_rla(&mut self, val: u8) -> u8 {
        let result = self.do_rol(val);
        self.do_and(result);
        result
    }

    fn do_sre(&mut self, val: u8) -> u8 {
        let result = self.do_lsr(val);
        self.do_eor(result);
        result
    }

    fn do_rra(&mut self, val: u8) -> u8 {
        let result = self.do_ror(val);
        self.do_adc(result);
        result
    }

    fn do_dcp(&mut self, val: u8) -> u8 {
        let result = val.wrapping_sub(1);
        self.do_cmp(result);
        result
    }

    fn do_isb(&mut self, val: u8) -> u8 {
        let result = val.wrapping_add(1);
        self.do_sbc(result);
        result
    }

    fn do_anc(&mut self, val: u8) {
        self.do_and(val);
        self.regs.p.set_if(C, self.regs.a & 0x80 != 0);
    }

    fn do_alr(&mut self, val: u8) {
        let masked = self.regs.a & val;
        self.regs.a = self.do_lsr(masked);
    }

    fn do_arr(&mut self, val: u8) {
        let t = self.regs.a & val;
        let carry_in = u8::from(self.regs.p.is_set(C));
        let mut result = (t >> 1) | (carry_in << 7);

        if self.regs.p.is_set(D) {
            self.regs.p.set_if(N, carry_in != 0);
            self.regs.p.set_if(Z, result == 0);
            self.regs.p.set_if(V, (t ^ result) & 0x40 != 0);

            let lo = t & 0x0F;
            let hi = t >> 4;
            if lo + (lo & 0x01) > 5 {
                result = (result & 0xF0) | (result.wrapping_add(6) & 0x0F);
            }
            let carry = hi + (hi & 0x01) > 5;
            if carry {
                result = result.wrapping_add(0x60);
            }
            self.regs.p.set_if(C, carry);
        } else {
            self.regs.p.update_nz(result);
            self.regs.p.set_if(C, result & 0x40 != 0);
            self.regs
                .p
                .set_if(V, ((result >> 6) ^ (result >> 5)) & 0x01 != 0);
        }
        self.regs.a = result;
    }

    fn do_sbx(&mut self, val: u8) {
        let ax = self.regs.a & self.regs.x;
        self.regs.p.set_if(C, ax >= val);
        self.regs.x = ax.wrapping_sub(val);
        self.regs.p.update_nz(self.regs.x);
    }

    fn do_ane(&mut self, val: u8) {
        self.regs.a = (self.regs.a | UNSTABLE_MAGIC) & self.regs.x & val;
        self.regs.p.update_nz(self.regs.a);
    }

    fn do_lxa(&mut self, val: u8) {
        let result = (self.regs.a | UNSTABLE_MAGIC) & val;
        self.regs.a = result;
        self.regs.x = result;
        self.regs.p.update_nz(result);
    }

    // ========================================================================
    // Individual instruction implementations
    // ========================================================================

    fn op_brk<B: Bus>(&mut self, bus: &mut B) {
        match self.cycle {
            1 => {
                // Padding byte (ignored but PC incremented)
                let _ = bus.read(self.regs.pc);
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.cycle = 2;
            }
            2 => {
                let addr = self.regs.push();
                bus.write(addr, (self.regs.pc >> 8) as u8);
                self.cycle = 3;
            }
            3 => {
                let addr = self.regs.push();
                bus.write(addr, self.regs.pc as u8);
                self.cycle = 4;
            }
            4 => {
                let addr = self.regs.push();
                bus.write(addr, self.regs.p.to_byte_brk());
                self.cycle = 5;
            }
            5 => {
                self.addr = u16::from(bus.read(0xFFFE));
                self.regs.p.set(I);
                self.cycle = 6;
            }
            6 => {
                self.addr |= u16::from(bus.read(0xFFFF)) << 8;
                self.regs.pc = self.addr;
                self.finish();
            }
            _ => unreachable!(),
        }
    }

    fn op_rti<B: Bus>(&mut self, bus: &mut B) {
        match self.cycle {
            1 => {
                let _ = bus.read(self.regs.pc);
                self.cycle = 2;
            }
            2 => {
                let _ = bus.read(self.regs.stack_addr());
                self.cycle = 3;
            }
            3 => {
                let addr = self.regs.pop();
                self.regs.p = Status::from_byte(bus.read(addr));
                self.cycle = 4;
            }
            4 => {
                let addr = self.regs.pop();
                self.addr = u16::from(bus.read(addr));
                self.cycle = 5;
            }
            5 => {
                let addr = self.regs.pop();
                self.addr |= u16::from(bus.read(addr)) << 8;
                self.regs.pc = self.addr;
                self.finish();
            }
            _ => unreachable!(),
        }
    }

    fn op_rts<B: Bus>(&mut self, bus: &mut B) {
        match self.cycle {
            1 => {
                let _ = bus.read(self.regs.pc);
                self.cycle = 2;
            }
            2 => {
                let _ = bus.read(self.regs.stack_addr());
                self.cycle = 3;
            }
            3 => {
                let addr = self.regs.pop();
                self.addr = u16::from(bus.read(addr));
                self.cycle = 4;
            }
            4 => {
                let addr = self.regs.pop();
                self.addr |= u16::from(bus.read(addr)) << 8;
                self.cycle = 5;
            }
            5 => {
                // RTS returns to the pushed address + 1
                let _ = bus.read(self.addr);
                self.regs.pc = self.addr.wrapping_add(1);
                self.finish();
            }
            _ => unreachable!(),
        }
    }

    fn op_jsr<B: Bus>(&mut self, bus: &mut B) {
        match self.cycle {
            1 => {
                self.addr = u16::from(bus.read(self.regs.pc));
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.cycle = 2;
            }
            2 => {
                // Internal operation (stack read)
                let _ = bus.read(self.regs.stack_addr());
                self.cycle = 3;
            }
            3 => {
                let addr = self.regs.push();
                bus.write(addr, (self.regs.pc >> 8) as u8);
                self.cycle = 4;
            }
            4 => {
                let addr = self.regs.push();
                bus.write(addr, self.regs.pc as u8);
                self.cycle = 5;
            }
            5 => {
                self.addr |= u16::from(bus.read(self.regs.pc)) << 8;
                self.regs.pc = self.addr;
                self.finish();
            }
            _ => unreachable!(),
        }
    }

    fn op_jmp_abs<B: Bus>(&mut self, bus: &mut B) {
        match self.cycle {
            1 => {
                self.addr = u16::from(bus.read(self.regs.pc));
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.cycle = 2;
            }
            2 => {
                self.addr |= u16::from(bus.read(self.regs.pc)) << 8;
                self.regs.pc = self.addr;
                self.finish();
            }
            _ => unreachable!(),
        }
    }

    fn op_jmp_ind<B: Bus>(&mut self, bus: &mut B) {
        match self.cycle {
            1 => {
                self.addr = u16::from(bus.read(self.regs.pc));
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.cycle = 2;
            }
            2 => {
                self.addr |= u16::from(bus.read(self.regs.pc)) << 8;
                self.cycle = 3;
            }
            3 => {
                self.data = bus.read(self.addr);
                self.cycle = 4;
            }
            4 => {
                // NMOS bug: the pointer's high byte is fetched without carry
                let hi_addr = (self.addr & 0xFF00) | (self.addr.wrapping_add(1) & 0x00FF);
                let hi = bus.read(hi_addr);
                self.regs.pc = u16::from(self.data) | (u16::from(hi) << 8);
                self.finish();
            }
            _ => unreachable!(),
        }
    }

    fn op_branch<B: Bus>(&mut self, bus: &mut B, taken: bool) {
        match self.cycle {
            1 => {
                self.data = bus.read(self.regs.pc);
                self.regs.pc = self.regs.pc.wrapping_add(1);
                if taken {
                    self.cycle = 2;
                } else {
                    self.finish();
                }
            }
            2 => {
                let _ = bus.read(self.regs.pc);
                let offset = i16::from(self.data as i8);
                let new_pc = self.regs.pc.wrapping_add_signed(offset);
                if (new_pc ^ self.regs.pc) & 0xFF00 != 0 {
                    // Page crossed - one more cycle to fix PCH
                    self.addr = new_pc;
                    self.cycle = 3;
                } else {
                    self.regs.pc = new_pc;
                    self.finish();
                }
            }
            3 => {
                let _ = bus.read((self.regs.pc & 0xFF00) | (self.addr & 0x00FF));
                self.regs.pc = self.addr;
                self.finish();
            }
            _ => unreachable!(),
        }
    }

    fn op_php<B: Bus>(&mut self, bus: &mut B) {
        match self.cycle {
            1 => {
                let _ = bus.read(self.regs.pc);
                self.cycle = 2;
            }
            2 => {
                let addr = self.regs.push();
                bus.write(addr, self.regs.p.to_byte_brk());
                self.finish();
            }
            _ => unreachable!(),
        }
    }

    fn op_plp<B: Bus>(&mut self, bus: &mut B) {
        match self.cycle {
            1 => {
                let _ = bus.read(self.regs.pc);
                self.cycle = 2;
            }
            2 => {
                let _ = bus.read(self.regs.stack_addr());
                self.cycle = 3;
            }
            3 => {
                let addr = self.regs.pop();
                self.regs.p = Status::from_byte(bus.read(addr));
                self.finish();
            }
            _ => unreachable!(),
        }
    }

    fn op_pha<B: Bus>(&mut self, bus: &mut B) {
        match self.cycle {
            1 => {
                let _ = bus.read(self.regs.pc);
                self.cycle = 2;
            }
            2 => {
                let addr = self.regs.push();
                bus.write(addr, self.regs.a);
                self.finish();
            }
            _ => unreachable!(),
        }
    }

    fn op_pla<B: Bus>(&mut self, bus: &mut B) {
        match self.cycle {
            1 => {
                let _ = bus.read(self.regs.pc);
                self.cycle = 2;
            }
            2 => {
                let _ = bus.read(self.regs.stack_addr());
                self.cycle = 3;
            }
            3 => {
                let addr = self.regs.pop();
                self.regs.a = bus.read(addr);
                self.regs.p.update_nz(self.regs.a);
                self.finish();
            }
            _ => unreachable!(),
        }
    }

    fn op_flag<B: Bus>(&mut self, bus: &mut B, flag: u8, set: bool) {
        self.op_implied(bus, |cpu| cpu.regs.p.set_if(flag, set));
    }

    fn op_nop<B: Bus>(&mut self, bus: &mut B) {
        self.op_implied(bus, |_| {});
    }

    /// Two-cycle register-only instruction: dummy read of the next byte.
    fn op_implied<B: Bus>(&mut self, bus: &mut B, op: impl FnOnce(&mut Self)) {
        if self.cycle == 1 {
            let _ = bus.read(self.regs.pc);
            op(self);
            self.finish();
        }
    }

    /// Accumulator shift/rotate.
    fn op_accumulator<B: Bus>(&mut self, bus: &mut B, op: fn(&mut Self, u8) -> u8) {
        self.op_implied(bus, |cpu| cpu.regs.a = op(cpu, cpu.regs.a));
    }

    fn op_jam<B: Bus>(&mut self, bus: &mut B) {
        let _ = bus.read(self.regs.pc);
        self.state = State::Stopped;
        self.cycle = 0;
        self.fault = Some(CpuError::Jammed {
            opcode: self.opcode,
            address: self.instruction_pc,
        });
    }
}

// ============================================================================
// Trait implementations
// ============================================================================

impl Cpu for Mos6502 {
    type Registers = Registers;
    type Fault = CpuError;

    fn tick<B: Bus>(&mut self, bus: &mut B) {
        self.execute_cycle(bus);
    }

    fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32, CpuError> {
        if let Some(fault) = self.fault {
            return Err(fault);
        }
        let start = self.total_cycles;
        loop {
            self.execute_cycle(bus);
            if let Some(fault) = self.fault {
                return Err(fault);
            }
            if self.state == State::FetchOpcode {
                break;
            }
        }
        Ok((self.total_cycles - start) as u32)
    }

    fn pc(&self) -> u16 {
        self.regs.pc
    }

    fn registers(&self) -> Self::Registers {
        self.regs
    }

    fn is_halted(&self) -> bool {
        self.state == State::Stopped
    }

    fn reset<B: Bus>(&mut self, bus: &mut B) {
        let total_cycles = self.total_cycles;
        *self = Self::new();
        self.total_cycles = total_cycles;
        let lo = bus.read(0xFFFC);
        let hi = bus.read(0xFFFD);
        self.regs.pc = u16::from_le_bytes([lo, hi]);
    }
}

impl Observable for Mos6502 {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "pc" => Some(self.regs.pc.into()),
            "a" => Some(self.regs.a.into()),
            "x" => Some(self.regs.x.into()),
            "y" => Some(self.regs.y.into()),
            "s" | "sp" => Some(self.regs.s.into()),
            "p" | "status" => Some(self.regs.p.bits().into()),
            "flags.c" | "c" => Some(self.regs.p.is_set(C).into()),
            "flags.z" | "z" => Some(self.regs.p.is_set(Z).into()),
            "flags.i" | "i" => Some(self.regs.p.is_set(I).into()),
            "flags.d" | "d" => Some(self.regs.p.is_set(D).into()),
            "flags.v" | "v" => Some(self.regs.p.is_set(V).into()),
            "flags.n" | "n" => Some(self.regs.p.is_set(N).into()),
            "opcode" => Some(self.opcode.into()),
            "instruction_pc" => Some(self.instruction_pc.into()),
            "cycle" => Some(Value::U64(self.total_cycles)),
            "halted" => Some(self.is_halted().into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "pc",
            "a",
            "x",
            "y",
            "s",
            "p",
            "flags.c",
            "flags.z",
            "flags.i",
            "flags.d",
            "flags.v",
            "flags.n",
            "opcode",
            "instruction_pc",
            "cycle",
            "halted",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emu_core::SimpleBus;

    fn cpu_at(bus: &mut SimpleBus, program: &[u8]) -> Mos6502 {
        bus.load(0x0200, program);
        let mut cpu = Mos6502::new();
        cpu.regs.pc = 0x0200;
        cpu
    }

    #[test]
    fn test_lda_immediate() {
        let mut bus = SimpleBus::new();
        let mut cpu = cpu_at(&mut bus, &[0xA9, 0x42]);

        // Cycle 1: fetch opcode
        cpu.tick(&mut bus);
        assert!(!cpu.is_instruction_complete());
        // Cycle 2: fetch operand, execute
        cpu.tick(&mut bus);

        assert_eq!(cpu.regs.a, 0x42);
        assert_eq!(cpu.regs.pc, 0x0202);
        assert!(cpu.is_instruction_complete());
    }

    #[test]
    fn test_reset_loads_vector() {
        let mut bus = SimpleBus::new();
        bus.load(0xFFFC, &[0x00, 0xF0]);
        let mut cpu = Mos6502::new();
        cpu.regs.a = 0x55;
        cpu.reset(&mut bus);

        assert_eq!(cpu.regs.pc, 0xF000);
        assert_eq!(cpu.regs.s, 0xFD);
        assert_eq!(cpu.regs.a, 0);
        assert_eq!(cpu.regs.p.bits(), crate::flags::U | I);
    }

    #[test]
    fn test_jam_is_a_fault_not_a_nop() {
        let mut bus = SimpleBus::new();
        let mut cpu = cpu_at(&mut bus, &[0x02, 0xEA]);

        let err = cpu.step(&mut bus).expect_err("JAM must fault");
        assert_eq!(
            err,
            CpuError::Jammed {
                opcode: 0x02,
                address: 0x0200
            }
        );
        assert!(cpu.is_halted());
        // Further steps keep failing and never reach the NOP
        assert_eq!(cpu.step(&mut bus), Err(err));
        assert_eq!(cpu.regs.pc, 0x0201);
    }

    #[test]
    fn test_reset_clears_fault() {
        let mut bus = SimpleBus::new();
        bus.load(0xFFFC, &[0x00, 0x02]);
        let mut cpu = cpu_at(&mut bus, &[0xB2]);
        assert!(cpu.step(&mut bus).is_err());
        cpu.reset(&mut bus);
        assert!(cpu.fault().is_none());
        assert!(!cpu.is_halted());
    }

    #[test]
    fn test_rmw_performs_dummy_write() {
        let mut bus = SimpleBus::new();
        // INC $10
        let mut cpu = cpu_at(&mut bus, &[0xE6, 0x10]);
        bus.poke(0x0010, 0x7F);

        assert_eq!(cpu.step(&mut bus), Ok(5));
        assert_eq!(bus.peek(0x0010), 0x80);
        // 5 cycles = 5 bus accesses, including the dummy write
        assert_eq!(bus.accesses(), 5);
    }

    #[test]
    fn test_save_load_mid_instruction() {
        let mut bus = SimpleBus::new();
        // LDA $1234,X with page cross
        let mut cpu = cpu_at(&mut bus, &[0xBD, 0xFF, 0x12]);
        cpu.regs.x = 0x01;
        bus.poke(0x1300, 0x99);

        cpu.tick(&mut bus);
        cpu.tick(&mut bus);

        let mut s = Serializer::new();
        cpu.save(&mut s);
        let mut restored = Mos6502::new();
        let mut r = Serializer::from_bytes(s.into_bytes());
        restored.load(&mut r).expect("load");
        r.finish().expect("fully consumed");

        let mut bus2 = bus.clone();
        let a = cpu.step(&mut bus);
        let b = restored.step(&mut bus2);
        assert_eq!(a, b);
        assert_eq!(cpu.regs, restored.regs);
        assert_eq!(restored.regs.a, 0x99);
    }

    #[test]
    fn test_truncated_load_leaves_cpu_untouched() {
        let mut cpu = Mos6502::new();
        cpu.regs.a = 0x12;
        let mut r = Serializer::from_bytes(vec![0xFF, 0xFF, 0xFF]);
        assert!(cpu.load(&mut r).is_err());
        assert_eq!(cpu.regs.a, 0x12);
    }
}
