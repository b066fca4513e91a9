//! Instruction behaviour tests on a flat 64K bus.

use emu_core::{Bus, Cpu, SimpleBus};
use mos_6502::{CpuError, Mos6502, flags};

/// Load a program at $F000 and point PC at it.
fn setup_program(bus: &mut SimpleBus, cpu: &mut Mos6502, program: &[u8]) {
    bus.load(0xF000, program);
    cpu.regs.pc = 0xF000;
}

/// Run `count` whole instructions, returning the cycles each one took.
fn run(cpu: &mut Mos6502, bus: &mut SimpleBus, count: usize) -> Vec<u32> {
    (0..count)
        .map(|_| cpu.step(bus).expect("no JAM in test program"))
        .collect()
}

#[test]
fn test_stack_pha_pla() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    let program = [
        0xA9, 0x42, // LDA #$42
        0xA2, 0xFF, // LDX #$FF
        0x9A, // TXS
        0x48, // PHA
        0xA9, 0x00, // LDA #$00
        0x68, // PLA
    ];
    setup_program(&mut bus, &mut cpu, &program);

    let cycles = run(&mut cpu, &mut bus, 6);

    assert_eq!(cycles, [2, 2, 2, 3, 2, 4]);
    assert_eq!(cpu.regs.a, 0x42, "PLA should restore A");
    assert_eq!(cpu.regs.s, 0xFF);
}

#[test]
fn test_stack_php_plp() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    let program = [
        0xA2, 0xFF, // LDX #$FF
        0x9A, // TXS
        0x38, // SEC
        0x08, // PHP
        0x18, // CLC
        0x28, // PLP
    ];
    setup_program(&mut bus, &mut cpu, &program);
    run(&mut cpu, &mut bus, 6);

    assert!(cpu.regs.p.is_set(flags::C), "PLP should restore carry");
    // PHP always pushes B and U
    assert_eq!(bus.peek(0x01FF) & 0x30, 0x30);
}

#[test]
fn test_brk_stack_layout() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    bus.write(0xFFFE, 0x00);
    bus.write(0xFFFF, 0xF8);

    let program = [
        0xA2, 0xFF, // LDX #$FF    @ $F000
        0x9A, // TXS         @ $F002
        0x58, // CLI         @ $F003
        0x00, // BRK         @ $F004
        0xEA, // padding     @ $F005
    ];
    setup_program(&mut bus, &mut cpu, &program);
    let cycles = run(&mut cpu, &mut bus, 4);

    assert_eq!(cycles[3], 7);
    assert_eq!(cpu.pc(), 0xF800);
    assert_eq!(cpu.regs.s, 0xFC);
    assert!(cpu.regs.p.is_set(flags::I));

    // Return address skips the padding byte
    assert_eq!(bus.peek(0x01FF), 0xF0);
    assert_eq!(bus.peek(0x01FE), 0x06);
    let pushed_p = bus.peek(0x01FD);
    assert_eq!(pushed_p & 0x30, 0x30, "pushed P has B and U");
    assert_eq!(pushed_p & flags::I, 0, "pushed P is pre-BRK (after CLI)");
}

#[test]
fn test_brk_rti_round_trip() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    bus.write(0xFFFE, 0x00);
    bus.write(0xFFFF, 0xF8);
    bus.write(0xF800, 0x40); // RTI

    let program = [
        0xA2, 0xFF, // LDX #$FF
        0x9A, // TXS
        0x00, 0xEA, // BRK + padding
        0xA9, 0x77, // LDA #$77
    ];
    setup_program(&mut bus, &mut cpu, &program);
    let cycles = run(&mut cpu, &mut bus, 5);

    assert_eq!(cycles[3], 6, "RTI is 6 cycles");
    assert_eq!(cpu.regs.a, 0x77);
    assert_eq!(cpu.regs.s, 0xFF);
}

#[test]
fn test_jsr_rts() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    bus.load(0xF100, &[0xA0, 0x09, 0x60]); // LDY #$09; RTS
    let program = [
        0xA2, 0xFF, // LDX #$FF
        0x9A, // TXS
        0x20, 0x00, 0xF1, // JSR $F100
        0xC8, // INY
    ];
    setup_program(&mut bus, &mut cpu, &program);
    let cycles = run(&mut cpu, &mut bus, 6);

    assert_eq!(cycles, [2, 2, 6, 2, 6, 2]);
    assert_eq!(cpu.regs.y, 0x0A);
    assert_eq!(cpu.pc(), 0xF007);
    // JSR pushes the address of its last byte
    assert_eq!(bus.peek(0x01FF), 0xF0);
    assert_eq!(bus.peek(0x01FE), 0x05);
}

#[test]
fn test_jmp_indirect_page_wrap_bug() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    bus.write(0x02FF, 0x34);
    bus.write(0x0200, 0x12); // fetched instead of $0300
    bus.write(0x0300, 0x99);
    setup_program(&mut bus, &mut cpu, &[0x6C, 0xFF, 0x02]);

    assert_eq!(run(&mut cpu, &mut bus, 1), [5]);
    assert_eq!(cpu.pc(), 0x1234);
}

#[test]
fn test_branch_timing() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    // BNE not taken (Z set by LDA #0), then BEQ taken forward, then a
    // BEQ taken across a page boundary.
    bus.load(0xF0F0, &[0xA9, 0x00, 0xD0, 0x10, 0xF0, 0x00, 0xF0, 0x10]);
    cpu.regs.pc = 0xF0F0;

    let cycles = run(&mut cpu, &mut bus, 4);
    assert_eq!(cycles, [2, 2, 3, 4]);
    assert_eq!(cpu.pc(), 0xF108);
}

#[test]
fn test_absolute_x_page_cross_costs_a_cycle() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    bus.write(0x1280, 0x11);
    bus.write(0x1301, 0x22);
    let program = [
        0xA2, 0x80, // LDX #$80
        0xBD, 0x00, 0x12, // LDA $1200,X (no cross)
        0xBD, 0x81, 0x12, // LDA $1281,X (cross)
        0x9D, 0x00, 0x12, // STA $1200,X (always 5)
    ];
    setup_program(&mut bus, &mut cpu, &program);

    let cycles = run(&mut cpu, &mut bus, 4);
    assert_eq!(cycles, [2, 4, 5, 5]);
    assert_eq!(cpu.regs.a, 0x22);
    assert_eq!(bus.peek(0x1280), 0x22);
}

#[test]
fn test_indirect_y_wraps_pointer_in_zero_page() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    bus.write(0x00FF, 0x00);
    bus.write(0x0000, 0x13); // high byte comes from $00, not $0100
    bus.write(0x1305, 0x5A);
    let program = [
        0xA0, 0x05, // LDY #$05
        0xB1, 0xFF, // LDA ($FF),Y
    ];
    setup_program(&mut bus, &mut cpu, &program);

    assert_eq!(run(&mut cpu, &mut bus, 2), [2, 5]);
    assert_eq!(cpu.regs.a, 0x5A);
}

#[test]
fn test_zero_page_x_wraps() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    bus.write(0x007F, 0x66);
    let program = [
        0xA2, 0xFF, // LDX #$FF
        0xB5, 0x80, // LDA $80,X -> $7F
    ];
    setup_program(&mut bus, &mut cpu, &program);

    assert_eq!(run(&mut cpu, &mut bus, 2), [2, 4]);
    assert_eq!(cpu.regs.a, 0x66);
}

#[test]
fn test_adc_decimal() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    let program = [
        0xF8, // SED
        0x18, // CLC
        0xA9, 0x58, // LDA #$58
        0x69, 0x46, // ADC #$46
    ];
    setup_program(&mut bus, &mut cpu, &program);
    run(&mut cpu, &mut bus, 4);

    assert_eq!(cpu.regs.a, 0x04);
    assert!(cpu.regs.p.is_set(flags::C));
}

#[test]
fn test_sbc_decimal() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    let program = [
        0xF8, // SED
        0x38, // SEC
        0xA9, 0x40, // LDA #$40
        0xE9, 0x13, // SBC #$13
    ];
    setup_program(&mut bus, &mut cpu, &program);
    run(&mut cpu, &mut bus, 4);

    assert_eq!(cpu.regs.a, 0x27);
    assert!(cpu.regs.p.is_set(flags::C));
}

#[test]
fn test_adc_overflow() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    let program = [
        0x18, // CLC
        0xA9, 0x7F, // LDA #$7F
        0x69, 0x01, // ADC #$01
    ];
    setup_program(&mut bus, &mut cpu, &program);
    run(&mut cpu, &mut bus, 3);

    assert_eq!(cpu.regs.a, 0x80);
    assert!(cpu.regs.p.is_set(flags::V));
    assert!(cpu.regs.p.is_set(flags::N));
    assert!(!cpu.regs.p.is_set(flags::C));
}

// ============================================================================
// Undocumented opcodes
// ============================================================================

#[test]
fn test_illegal_lax_zeropage() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    bus.write(0x0080, 0x9C);
    setup_program(&mut bus, &mut cpu, &[0xA7, 0x80]);

    assert_eq!(run(&mut cpu, &mut bus, 1), [3]);
    assert_eq!(cpu.regs.a, 0x9C);
    assert_eq!(cpu.regs.x, 0x9C);
    assert!(cpu.regs.p.is_set(flags::N));
}

#[test]
fn test_illegal_sax_zeropage() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    let program = [
        0xA9, 0xF0, // LDA #$F0
        0xA2, 0x3C, // LDX #$3C
        0x87, 0x80, // SAX $80
    ];
    setup_program(&mut bus, &mut cpu, &program);
    run(&mut cpu, &mut bus, 3);

    assert_eq!(bus.peek(0x0080), 0x30);
}

#[test]
fn test_illegal_slo_zeropage() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    bus.write(0x0080, 0x81);
    let program = [
        0xA9, 0x02, // LDA #$02
        0x07, 0x80, // SLO $80
    ];
    setup_program(&mut bus, &mut cpu, &program);

    assert_eq!(run(&mut cpu, &mut bus, 2), [2, 5]);
    assert_eq!(bus.peek(0x0080), 0x02);
    assert_eq!(cpu.regs.a, 0x02);
    assert!(cpu.regs.p.is_set(flags::C));
}

#[test]
fn test_illegal_rla_zeropage() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    bus.write(0x0080, 0x40);
    let program = [
        0x38, // SEC
        0xA9, 0xFF, // LDA #$FF
        0x27, 0x80, // RLA $80
    ];
    setup_program(&mut bus, &mut cpu, &program);
    run(&mut cpu, &mut bus, 3);

    assert_eq!(bus.peek(0x0080), 0x81);
    assert_eq!(cpu.regs.a, 0x81);
    assert!(!cpu.regs.p.is_set(flags::C));
}

#[test]
fn test_illegal_dcp_zeropage() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    bus.write(0x0080, 0x43);
    let program = [
        0xA9, 0x42, // LDA #$42
        0xC7, 0x80, // DCP $80
    ];
    setup_program(&mut bus, &mut cpu, &program);
    run(&mut cpu, &mut bus, 2);

    assert_eq!(bus.peek(0x0080), 0x42);
    assert!(cpu.regs.p.is_set(flags::Z));
    assert!(cpu.regs.p.is_set(flags::C));
}

#[test]
fn test_illegal_isb_zeropage() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    bus.write(0x0080, 0x0F);
    let program = [
        0x38, // SEC
        0xA9, 0x20, // LDA #$20
        0xE7, 0x80, // ISB $80
    ];
    setup_program(&mut bus, &mut cpu, &program);
    run(&mut cpu, &mut bus, 3);

    assert_eq!(bus.peek(0x0080), 0x10);
    assert_eq!(cpu.regs.a, 0x10);
}

#[test]
fn test_illegal_rmw_indirect_timing() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    bus.write(0x0090, 0x00);
    bus.write(0x0091, 0x03);
    bus.write(0x0300, 0x01);
    let program = [
        0xA2, 0x10, // LDX #$10
        0xA0, 0x00, // LDY #$00
        0x03, 0x80, // SLO ($80,X)
        0x13, 0x90, // SLO ($90),Y
        0x1B, 0x00, 0x03, // SLO $0300,Y
    ];
    setup_program(&mut bus, &mut cpu, &program);

    assert_eq!(run(&mut cpu, &mut bus, 5), [2, 2, 8, 8, 7]);
    assert_eq!(bus.peek(0x0300), 0x08);
}

#[test]
fn test_illegal_anc_immediate() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    let program = [
        0xA9, 0xFF, // LDA #$FF
        0x0B, 0x80, // ANC #$80
    ];
    setup_program(&mut bus, &mut cpu, &program);
    run(&mut cpu, &mut bus, 2);

    assert_eq!(cpu.regs.a, 0x80);
    assert!(cpu.regs.p.is_set(flags::C), "ANC copies N into C");
}

#[test]
fn test_illegal_alr_immediate() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    let program = [
        0xA9, 0xFF, // LDA #$FF
        0x4B, 0x03, // ALR #$03
    ];
    setup_program(&mut bus, &mut cpu, &program);
    run(&mut cpu, &mut bus, 2);

    assert_eq!(cpu.regs.a, 0x01);
    assert!(cpu.regs.p.is_set(flags::C));
}

#[test]
fn test_illegal_arr_binary() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    let program = [
        0x38, // SEC
        0xA9, 0xFF, // LDA #$FF
        0x6B, 0xC0, // ARR #$C0
    ];
    setup_program(&mut bus, &mut cpu, &program);
    run(&mut cpu, &mut bus, 3);

    // ($FF & $C0) >> 1 | $80 = $E0; C = bit 6, V = bit 6 ^ bit 5
    assert_eq!(cpu.regs.a, 0xE0);
    assert!(cpu.regs.p.is_set(flags::C));
    assert!(!cpu.regs.p.is_set(flags::V));
    assert!(cpu.regs.p.is_set(flags::N));
}

#[test]
fn test_illegal_sbx_immediate() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    let program = [
        0xA9, 0x0F, // LDA #$0F
        0xA2, 0x3C, // LDX #$3C
        0xCB, 0x02, // SBX #$02
    ];
    setup_program(&mut bus, &mut cpu, &program);
    run(&mut cpu, &mut bus, 3);

    assert_eq!(cpu.regs.x, 0x0A);
    assert!(cpu.regs.p.is_set(flags::C));
}

#[test]
fn test_illegal_las() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    bus.write(0x0380, 0x5F);
    let program = [
        0xA2, 0xF3, // LDX #$F3
        0x9A, // TXS
        0xA0, 0x80, // LDY #$80
        0xBB, 0x00, 0x03, // LAS $0300,Y
    ];
    setup_program(&mut bus, &mut cpu, &program);
    run(&mut cpu, &mut bus, 4);

    assert_eq!(cpu.regs.a, 0x53);
    assert_eq!(cpu.regs.x, 0x53);
    assert_eq!(cpu.regs.s, 0x53);
}

#[test]
fn test_illegal_shx_masks_with_high_byte() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    let program = [
        0xA2, 0xFF, // LDX #$FF
        0xA0, 0x10, // LDY #$10
        0x9E, 0x00, 0x03, // SHX $0300,Y
    ];
    setup_program(&mut bus, &mut cpu, &program);

    assert_eq!(run(&mut cpu, &mut bus, 3), [2, 2, 5]);
    // X & (H + 1) = $FF & $04
    assert_eq!(bus.peek(0x0310), 0x04);
}

#[test]
fn test_illegal_shy_page_cross_corrupts_high_byte() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    let program = [
        0xA0, 0x05, // LDY #$05
        0xA2, 0x20, // LDX #$20
        0x9C, 0xF0, 0x02, // SHY $02F0,X
    ];
    setup_program(&mut bus, &mut cpu, &program);
    run(&mut cpu, &mut bus, 3);

    // Value = $05 & $03 = $01; high byte becomes the value
    assert_eq!(bus.peek(0x0110), 0x01);
    assert_eq!(bus.peek(0x0310), 0x00);
}

#[test]
fn test_illegal_nop_variants_consume_operands() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    let program = [
        0x1A, // NOP
        0x80, 0xFF, // NOP #imm
        0x04, 0x80, // NOP zp
        0x14, 0x80, // NOP zp,X
        0x0C, 0x00, 0x03, // NOP abs
        0x1C, 0x00, 0x03, // NOP abs,X
        0xA9, 0x42, // LDA #$42
    ];
    setup_program(&mut bus, &mut cpu, &program);

    let cycles = run(&mut cpu, &mut bus, 7);
    assert_eq!(cycles, [2, 2, 3, 4, 4, 4, 2]);
    assert_eq!(cpu.regs.a, 0x42);
}

#[test]
fn test_eb_is_sbc() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6502::new();

    let program = [
        0x38, // SEC
        0xA9, 0x10, // LDA #$10
        0xEB, 0x01, // SBC #$01 (undocumented encoding)
    ];
    setup_program(&mut bus, &mut cpu, &program);
    run(&mut cpu, &mut bus, 3);

    assert_eq!(cpu.regs.a, 0x0F);
}

#[test]
fn test_every_jam_opcode_faults() {
    for opcode in [
        0x02, 0x12, 0x22, 0x32, 0x42, 0x52, 0x62, 0x72, 0x92, 0xB2, 0xD2, 0xF2,
    ] {
        let mut bus = SimpleBus::new();
        let mut cpu = Mos6502::new();
        setup_program(&mut bus, &mut cpu, &[opcode, 0xA9, 0x42]);

        assert_eq!(
            cpu.step(&mut bus),
            Err(CpuError::Jammed {
                opcode,
                address: 0xF000
            })
        );
        assert!(cpu.is_halted());

        // Ticking a jammed CPU never executes the next instruction
        let pc = cpu.pc();
        for _ in 0..10 {
            cpu.tick(&mut bus);
        }
        assert_eq!(cpu.pc(), pc);
        assert_ne!(cpu.regs.a, 0x42);
    }
}

/// Base cycles per opcode with no page crossing. The flags of a fresh CPU
/// make BPL, BVC, BCC and BNE taken. JAMs are 0.
const CYCLES: [u8; 256] = [
    7, 6, 0, 8, 3, 3, 5, 5, 3, 2, 2, 2, 4, 4, 6, 6, // 0x
    3, 5, 0, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7, // 1x
    6, 6, 0, 8, 3, 3, 5, 5, 4, 2, 2, 2, 4, 4, 6, 6, // 2x
    2, 5, 0, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7, // 3x
    6, 6, 0, 8, 3, 3, 5, 5, 3, 2, 2, 2, 3, 4, 6, 6, // 4x
    3, 5, 0, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7, // 5x
    6, 6, 0, 8, 3, 3, 5, 5, 4, 2, 2, 2, 5, 4, 6, 6, // 6x
    2, 5, 0, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7, // 7x
    2, 6, 2, 6, 3, 3, 3, 3, 2, 2, 2, 2, 4, 4, 4, 4, // 8x
    3, 6, 0, 6, 4, 4, 4, 4, 2, 5, 2, 5, 5, 5, 5, 5, // 9x
    2, 6, 2, 6, 3, 3, 3, 3, 2, 2, 2, 2, 4, 4, 4, 4, // Ax
    2, 5, 0, 5, 4, 4, 4, 4, 2, 4, 2, 4, 4, 4, 4, 4, // Bx
    2, 6, 2, 8, 3, 3, 5, 5, 2, 2, 2, 2, 4, 4, 6, 6, // Cx
    3, 5, 0, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7, // Dx
    2, 6, 2, 8, 3, 3, 5, 5, 2, 2, 2, 2, 4, 4, 6, 6, // Ex
    2, 5, 0, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7, // Fx
];

/// Instruction length in bytes.
const LENGTHS: [u8; 256] = [
    2, 2, 1, 2, 2, 2, 2, 2, 1, 2, 1, 2, 3, 3, 3, 3, // 0x
    2, 2, 1, 2, 2, 2, 2, 2, 1, 3, 1, 3, 3, 3, 3, 3, // 1x
    3, 2, 1, 2, 2, 2, 2, 2, 1, 2, 1, 2, 3, 3, 3, 3, // 2x
    2, 2, 1, 2, 2, 2, 2, 2, 1, 3, 1, 3, 3, 3, 3, 3, // 3x
    1, 2, 1, 2, 2, 2, 2, 2, 1, 2, 1, 2, 3, 3, 3, 3, // 4x
    2, 2, 1, 2, 2, 2, 2, 2, 1, 3, 1, 3, 3, 3, 3, 3, // 5x
    1, 2, 1, 2, 2, 2, 2, 2, 1, 2, 1, 2, 3, 3, 3, 3, // 6x
    2, 2, 1, 2, 2, 2, 2, 2, 1, 3, 1, 3, 3, 3, 3, 3, // 7x
    2, 2, 2, 2, 2, 2, 2, 2, 1, 2, 1, 2, 3, 3, 3, 3, // 8x
    2, 2, 1, 2, 2, 2, 2, 2, 1, 3, 1, 3, 3, 3, 3, 3, // 9x
    2, 2, 2, 2, 2, 2, 2, 2, 1, 2, 1, 2, 3, 3, 3, 3, // Ax
    2, 2, 1, 2, 2, 2, 2, 2, 1, 3, 1, 3, 3, 3, 3, 3, // Bx
    2, 2, 2, 2, 2, 2, 2, 2, 1, 2, 1, 2, 3, 3, 3, 3, // Cx
    2, 2, 1, 2, 2, 2, 2, 2, 1, 3, 1, 3, 3, 3, 3, 3, // Dx
    2, 2, 2, 2, 2, 2, 2, 2, 1, 2, 1, 2, 3, 3, 3, 3, // Ex
    2, 2, 1, 2, 2, 2, 2, 2, 1, 3, 1, 3, 3, 3, 3, 3, // Fx
];

const JAMS: [u8; 12] = [
    0x02, 0x12, 0x22, 0x32, 0x42, 0x52, 0x62, 0x72, 0x92, 0xB2, 0xD2, 0xF2,
];

/// Where PC lands for opcodes that transfer control, given the test setup.
fn control_target(opcode: u8) -> Option<u16> {
    match opcode {
        // BRK, JSR and JMP abs all reach $0400
        0x00 | 0x20 | 0x4C => Some(0x0400),
        // RTI and JMP ($0400) read zeroed memory
        0x40 | 0x6C => Some(0x0000),
        // RTS adds one to the pulled address
        0x60 => Some(0x0001),
        _ => None,
    }
}

#[test]
fn test_every_opcode_matches_cycle_and_length_tables() {
    for opcode in 0..=0xFFu8 {
        if JAMS.contains(&opcode) {
            continue;
        }
        let mut bus = SimpleBus::new();
        let mut cpu = Mos6502::new();
        bus.load(0xFFFA, &[0x00, 0x04, 0x00, 0x04, 0x00, 0x04]);
        setup_program(&mut bus, &mut cpu, &[opcode, 0x00, 0x04]);

        let cycles = cpu
            .step(&mut bus)
            .unwrap_or_else(|e| panic!("opcode {opcode:#04X} faulted: {e}"));
        let op = usize::from(opcode);
        assert_eq!(cycles, u32::from(CYCLES[op]), "cycles of {opcode:#04X}");
        let expected_pc =
            control_target(opcode).unwrap_or(0xF000 + u16::from(LENGTHS[op]));
        assert_eq!(cpu.pc(), expected_pc, "PC after {opcode:#04X}");
    }
}

#[test]
fn test_indexed_reads_pay_for_page_crossing() {
    // (opcode, cycles) with X = Y = $FF and a base of $0401
    let cases: &[(u8, u32)] = &[
        // abs,X reads, NOP abs,X included
        (0x1D, 5), (0x3D, 5), (0x5D, 5), (0x7D, 5), (0xBD, 5), (0xDD, 5), (0xFD, 5),
        (0xBC, 5),
        (0x1C, 5), (0x3C, 5), (0x5C, 5), (0x7C, 5), (0xDC, 5), (0xFC, 5),
        // abs,Y reads, LAX and LAS included
        (0x19, 5), (0x39, 5), (0x59, 5), (0x79, 5), (0xB9, 5), (0xD9, 5), (0xF9, 5),
        (0xBE, 5), (0xBF, 5), (0xBB, 5),
        // (zp),Y reads
        (0x11, 6), (0x31, 6), (0x51, 6), (0x71, 6), (0xB1, 6), (0xD1, 6), (0xF1, 6),
        (0xB3, 6),
        // Writes and read-modify-writes always take the fixed count
        (0x9D, 5), (0x99, 5), (0x91, 6), (0x1E, 7), (0xDB, 7), (0x13, 8),
    ];
    for &(opcode, expected) in cases {
        let mut bus = SimpleBus::new();
        let mut cpu = Mos6502::new();
        // ($01) points at $0401
        bus.load(0x0001, &[0x01, 0x04]);
        setup_program(&mut bus, &mut cpu, &[opcode, 0x01, 0x04]);
        cpu.regs.x = 0xFF;
        cpu.regs.y = 0xFF;

        let cycles = cpu.step(&mut bus).expect("no JAM");
        assert_eq!(cycles, expected, "cycles of {opcode:#04X} across a page");
        assert_eq!(cpu.pc(), 0xF000 + u16::from(LENGTHS[usize::from(opcode)]));
    }
}
