//! Position counter shared by the five movable objects.
//!
//! Each object owns a divide-by-160 counter clocked on every visible colour
//! clock. Copies of the object are drawn when the counter passes fixed
//! decode values, so moving an object means adding or withholding clocks.

use emu_core::{Serializer, StateError};

/// Counter period in colour clocks.
pub const PERIOD: u8 = 160;

/// Start decode for the main copy.
pub const MAIN_START: u8 = 156;

/// Counter value loaded by a reset strobe during horizontal blank.
pub const RESET_HBLANK: u8 = 157;
/// Counter value loaded by a reset strobe during the visible line.
pub const RESET_VISIBLE: u8 = 156;

/// Start decodes for each NUSIZ copy mode.
pub const COPY_STARTS: [&[u8]; 8] = [
    &[MAIN_START],
    &[MAIN_START, 12],
    &[MAIN_START, 28],
    &[MAIN_START, 12, 28],
    &[MAIN_START, 60],
    &[MAIN_START],
    &[MAIN_START, 28, 60],
    &[MAIN_START],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Counter {
    pub value: u8,
    /// Motion register, upper nibble as written.
    pub hm: u8,
    /// Still receiving HMOVE pulses.
    pub moving: bool,
}

impl Counter {
    pub fn new() -> Self {
        Self {
            value: 0,
            hm: 0,
            moving: false,
        }
    }

    pub fn tick(&mut self) {
        self.value = (self.value + 1) % PERIOD;
    }

    pub fn reset(&mut self, in_hblank: bool) {
        self.value = if in_hblank {
            RESET_HBLANK
        } else {
            RESET_VISIBLE
        };
    }

    /// One step of the HMOVE ripple counter. The object keeps taking
    /// pulses until the step matches its motion value with D7 inverted.
    pub fn motion_step(&mut self, step: u8, in_hblank: bool) {
        if !self.moving {
            return;
        }
        if step == (self.hm >> 4) ^ 0x08 {
            self.moving = false;
        } else if in_hblank {
            self.tick();
        }
    }

    /// Clocks since the copy starting at decode `start` began drawing,
    /// `delay` clocks after the decode.
    pub fn since(&self, start: u8, delay: u8) -> u8 {
        let first = (u16::from(start) + u16::from(delay)) % u16::from(PERIOD);
        ((u16::from(self.value) + u16::from(PERIOD) - first) % u16::from(PERIOD)) as u8
    }

    pub fn save(&self, s: &mut Serializer) {
        s.put_u8(self.value);
        s.put_u8(self.hm);
        s.put_bool(self.moving);
    }

    pub fn load(&mut self, s: &mut Serializer) -> Result<(), StateError> {
        let value = s.get_u8()?;
        if value >= PERIOD {
            return Err(StateError::invalid("tia object counter", value));
        }
        self.value = value;
        self.hm = s.get_u8()?;
        self.moving = s.get_bool()?;
        Ok(())
    }
}
