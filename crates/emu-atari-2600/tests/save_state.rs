//! Save states: round trips reproduce execution, bad input changes nothing.

use emu_atari_2600::{Atari2600, Atari2600Config, Atari2600Error, Joystick};
use emu_core::StateError;

/// A kernel that keeps every chip busy: frame timing through the RIOT
/// timer, a moving player, sound, and RAM traffic.
fn busy_rom() -> Vec<u8> {
    let code: &[u8] = &[
        0xA9, 0x02, //       LDA #2            ; $F000 frame:
        0x85, 0x00, //       STA VSYNC
        0x85, 0x02, //       STA WSYNC
        0x85, 0x02, //       STA WSYNC
        0x85, 0x02, //       STA WSYNC
        0xA9, 0x00, //       LDA #0
        0x85, 0x00, //       STA VSYNC
        0xA9, 0x2B, //       LDA #43
        0x8D, 0x96, 0x02, // STA TIM64T
        0xE6, 0x80, //       INC $80
        0xA5, 0x80, //       LDA $80
        0x85, 0x06, //       STA COLUP0
        0x85, 0x1B, //       STA GRP0
        0x85, 0x17, //       STA AUDF0
        0xA9, 0x0F, //       LDA #15
        0x85, 0x19, //       STA AUDV0
        0x85, 0x15, //       STA AUDC0
        0xA9, 0x10, //       LDA #$10
        0x85, 0x20, //       STA HMP0
        0x85, 0x02, //       STA WSYNC
        0x85, 0x2A, //       STA HMOVE
        0xAD, 0x84, 0x02, // wait: LDA INTIM
        0xD0, 0xFB, //       BNE wait
        0xA2, 0xE4, //       LDX #228
        0x85, 0x02, // lines: STA WSYNC
        0xCA, //             DEX
        0xD0, 0xFB, //       BNE lines
        0x4C, 0x00, 0xF0, // JMP frame
    ];
    let mut rom = vec![0xEA; 4096];
    rom[..code.len()].copy_from_slice(code);
    rom[0xFFC] = 0x00;
    rom[0xFFD] = 0xF0;
    rom
}

fn boot() -> Atari2600 {
    Atari2600::new(&Atari2600Config::new(busy_rom())).expect("4K cartridge")
}

/// PC, A and the cycle counter after each of `steps` instructions.
fn trace(console: &mut Atari2600, steps: usize) -> Vec<(u16, u8, u64)> {
    (0..steps)
        .map(|_| {
            console.step().expect("no jam");
            (
                console.cpu().regs.pc,
                console.cpu().regs.a,
                console.cycles(),
            )
        })
        .collect()
}

#[test]
fn fresh_console_continues_identically_after_load() {
    let mut original = boot();
    original.set_joystick(
        1,
        Joystick {
            fire: true,
            ..Joystick::default()
        },
    );
    for _ in 0..3 {
        original.run_frame().expect("frame");
    }
    // Stop mid-line, away from any frame boundary
    trace(&mut original, 17);
    let state = original.save_state();

    let mut copy = boot();
    copy.load_state(&state).expect("state loads");
    assert_eq!(copy.save_state(), state);

    assert_eq!(trace(&mut original, 5000), trace(&mut copy, 5000));
    original.run_frame().expect("frame");
    copy.run_frame().expect("frame");
    assert_eq!(original.framebuffer(), copy.framebuffer());
    assert_eq!(original.save_state(), copy.save_state());
}

#[test]
fn truncated_state_changes_nothing() {
    let mut console = boot();
    console.run_frame().expect("frame");
    let state = console.save_state();
    console.run_frame().expect("frame");
    let before = console.save_state();

    let result = console.load_state(&state[..state.len() - 10]);
    assert!(matches!(
        result,
        Err(Atari2600Error::State(StateError::Truncated { .. }))
    ));
    assert_eq!(console.save_state(), before);
}

#[test]
fn header_is_checked() {
    let mut console = boot();
    let mut state = console.save_state();

    state[0] = b'X';
    assert_eq!(
        console.load_state(&state),
        Err(Atari2600Error::State(StateError::BadMagic))
    );
    assert_eq!(
        console.load_state(b"A2"),
        Err(Atari2600Error::State(StateError::BadMagic))
    );

    state[0] = b'A';
    state[4] = 9;
    assert!(matches!(
        console.load_state(&state),
        Err(Atari2600Error::State(StateError::UnsupportedVersion { found: 9, .. }))
    ));
}

#[test]
fn state_from_another_cartridge_is_refused() {
    let state = boot().save_state();
    let mut other_rom = busy_rom();
    other_rom[0x800] = 0x00;
    let mut other = Atari2600::new(&Atari2600Config::new(other_rom)).expect("4K");
    let before = other.save_state();
    assert!(matches!(
        other.load_state(&state),
        Err(Atari2600Error::State(StateError::CartridgeMismatch { .. }))
    ));
    assert_eq!(other.save_state(), before);
}

#[test]
fn trailing_bytes_are_refused() {
    let mut console = boot();
    let mut state = console.save_state();
    state.push(0);
    assert_eq!(
        console.load_state(&state),
        Err(Atari2600Error::State(StateError::TrailingBytes(1)))
    );
}
