//! Playfield: 20 bits drawn at four clocks each, repeated or reflected on
//! the right half of the line.

use emu_core::{Serializer, StateError};

/// CTRLPF D0: mirror the right half.
pub(crate) const CTRLPF_REFLECT: u8 = 0x01;
/// CTRLPF D1: colour each half with the matching player colour.
pub(crate) const CTRLPF_SCORE: u8 = 0x02;
/// CTRLPF D2: playfield and ball in front of the players.
pub(crate) const CTRLPF_PRIORITY: u8 = 0x04;

#[derive(Debug, Clone)]
pub(crate) struct Playfield {
    pub pf0: u8,
    pub pf1: u8,
    pub pf2: u8,
    /// Bit n is column n of the left half.
    pattern: u32,
    pub reflect: bool,
}

impl Playfield {
    pub fn new() -> Self {
        Self {
            pf0: 0,
            pf1: 0,
            pf2: 0,
            pattern: 0,
            reflect: false,
        }
    }

    pub fn set_pf0(&mut self, value: u8) {
        self.pf0 = value;
        self.rebuild();
    }

    pub fn set_pf1(&mut self, value: u8) {
        self.pf1 = value;
        self.rebuild();
    }

    pub fn set_pf2(&mut self, value: u8) {
        self.pf2 = value;
        self.rebuild();
    }

    /// PF0 D4-D7, then PF1 D7-D0, then PF2 D0-D7.
    fn rebuild(&mut self) {
        let pf0 = u32::from(self.pf0 >> 4);
        let pf1 = u32::from(self.pf1.reverse_bits());
        let pf2 = u32::from(self.pf2);
        self.pattern = pf0 | (pf1 << 4) | (pf2 << 12);
    }

    pub fn pattern(&self) -> u32 {
        self.pattern
    }

    /// Whether visible pixel `x` (0-159) is set.
    pub fn pixel(&self, x: u8) -> bool {
        let column = u32::from(x / 4);
        let bit = if column < 20 {
            column
        } else if self.reflect {
            39 - column
        } else {
            column - 20
        };
        self.pattern & (1 << bit) != 0
    }

    pub fn save(&self, s: &mut Serializer) {
        s.put_u8(self.pf0);
        s.put_u8(self.pf1);
        s.put_u8(self.pf2);
        s.put_bool(self.reflect);
    }

    pub fn load(&mut self, s: &mut Serializer) -> Result<(), StateError> {
        self.pf0 = s.get_u8()?;
        self.pf1 = s.get_u8()?;
        self.pf2 = s.get_u8()?;
        self.reflect = s.get_bool()?;
        self.rebuild();
        Ok(())
    }
}
