//! The ball.

use crate::counter::{Counter, MAIN_START};
use emu_core::{Serializer, StateError};

const DRAW_DELAY: u8 = 4;

/// Ball object. Width comes from CTRLPF D4-D5.
#[derive(Debug, Clone)]
pub struct Ball {
    pub(crate) counter: Counter,
    pub(crate) width_shift: u8,
    /// ENABL as last written.
    pub(crate) enabled_new: bool,
    /// ENABL copied on a GRP1 write.
    pub(crate) enabled_old: bool,
    pub(crate) vdel: bool,
}

impl Ball {
    pub(crate) fn new() -> Self {
        Self {
            counter: Counter::new(),
            width_shift: 0,
            enabled_new: false,
            enabled_old: false,
            vdel: false,
        }
    }

    pub(crate) fn enabled(&self) -> bool {
        if self.vdel {
            self.enabled_old
        } else {
            self.enabled_new
        }
    }

    pub(crate) fn pixel(&self) -> bool {
        self.enabled() && self.counter.since(MAIN_START, DRAW_DELAY) < 1 << self.width_shift
    }

    /// Current horizontal counter value.
    #[must_use]
    pub fn position(&self) -> u8 {
        self.counter.value
    }

    pub(crate) fn save(&self, s: &mut Serializer) {
        self.counter.save(s);
        s.put_u8(self.width_shift);
        s.put_bool(self.enabled_new);
        s.put_bool(self.enabled_old);
        s.put_bool(self.vdel);
    }

    pub(crate) fn load(&mut self, s: &mut Serializer) -> Result<(), StateError> {
        self.counter.load(s)?;
        let width_shift = s.get_u8()?;
        if width_shift > 3 {
            return Err(StateError::invalid("tia ball width", width_shift));
        }
        self.width_shift = width_shift;
        self.enabled_new = s.get_bool()?;
        self.enabled_old = s.get_bool()?;
        self.vdel = s.get_bool()?;
        Ok(())
    }
}
