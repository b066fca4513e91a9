//! Property-based tests for CPU invariants.

use emu_core::{Cpu, Serializer, SimpleBus};
use mos_6502::{Mos6502, flags};
use proptest::prelude::*;

const JAMS: [u8; 12] = [
    0x02, 0x12, 0x22, 0x32, 0x42, 0x52, 0x62, 0x72, 0x92, 0xB2, 0xD2, 0xF2,
];

fn non_jam_opcode() -> impl Strategy<Value = u8> {
    any::<u8>().prop_filter("JAM opcodes stop the CPU", |op| !JAMS.contains(op))
}

fn setup(program: &[u8], a: u8, x: u8, y: u8) -> (Mos6502, SimpleBus) {
    let mut bus = SimpleBus::new();
    bus.load(0xF000, program);
    bus.load(0xFFFA, &[0x00, 0xF8, 0x00, 0xF0, 0x00, 0xF8]);
    let mut cpu = Mos6502::new();
    cpu.regs.pc = 0xF000;
    cpu.regs.a = a;
    cpu.regs.x = x;
    cpu.regs.y = y;
    (cpu, bus)
}

proptest! {
    #[test]
    fn every_cycle_is_exactly_one_bus_access(
        opcode in non_jam_opcode(),
        lo in any::<u8>(),
        hi in any::<u8>(),
        a in any::<u8>(),
        x in any::<u8>(),
        y in any::<u8>(),
    ) {
        let (mut cpu, mut bus) = setup(&[opcode, lo, hi], a, x, y);
        let cycles = cpu.step(&mut bus);
        prop_assert!(cycles.is_ok());
        prop_assert_eq!(bus.accesses(), u64::from(cycles.unwrap_or(0)));
        prop_assert_eq!(cpu.cycles(), bus.accesses());
    }

    #[test]
    fn unused_flag_always_reads_set(
        opcode in non_jam_opcode(),
        lo in any::<u8>(),
        hi in any::<u8>(),
        a in any::<u8>(),
    ) {
        let (mut cpu, mut bus) = setup(&[opcode, lo, hi], a, 0, 0);
        let _ = cpu.step(&mut bus);
        prop_assert!(cpu.regs.p.is_set(flags::U));
    }

    #[test]
    fn adc_binary_matches_wide_arithmetic(a in any::<u8>(), m in any::<u8>(), carry in any::<bool>()) {
        let set_carry = if carry { 0x38 } else { 0x18 };
        let (mut cpu, mut bus) = setup(&[0xD8, set_carry, 0x69, m], a, 0, 0);
        for _ in 0..3 {
            prop_assert!(cpu.step(&mut bus).is_ok());
        }
        let sum = u16::from(a) + u16::from(m) + u16::from(carry);
        prop_assert_eq!(cpu.regs.a, sum as u8);
        prop_assert_eq!(cpu.regs.p.is_set(flags::C), sum > 0xFF);
        prop_assert_eq!(cpu.regs.p.is_set(flags::Z), sum as u8 == 0);
    }

    #[test]
    fn save_load_mid_instruction_is_seamless(
        opcode in non_jam_opcode(),
        lo in any::<u8>(),
        hi in any::<u8>(),
        x in any::<u8>(),
        ticks in 1usize..4,
    ) {
        let (mut cpu, mut bus) = setup(&[opcode, lo, hi, 0xEA], 0x5A, x, 0x10);
        for _ in 0..ticks {
            cpu.tick(&mut bus);
        }

        let mut s = Serializer::new();
        cpu.save(&mut s);
        let mut copy = Mos6502::new();
        let mut r = Serializer::from_bytes(s.into_bytes());
        prop_assert!(copy.load(&mut r).is_ok());
        prop_assert!(r.finish().is_ok());

        let mut bus_copy = bus.clone();
        for _ in 0..12 {
            cpu.tick(&mut bus);
            copy.tick(&mut bus_copy);
        }
        prop_assert_eq!(cpu.regs, copy.regs);
        prop_assert_eq!(cpu.cycles(), copy.cycles());
    }
}
