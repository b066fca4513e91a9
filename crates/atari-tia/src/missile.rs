//! Missile objects.

use crate::counter::{COPY_STARTS, Counter, PERIOD};
use crate::player::Player;
use emu_core::{Serializer, StateError};

/// Clocks from a start decode to the first missile pixel.
const DRAW_DELAY: u8 = 4;

/// One of the two missiles. Copies follow the player's NUSIZ copy mode.
#[derive(Debug, Clone)]
pub struct Missile {
    pub(crate) counter: Counter,
    /// NUSIZx of the owning player. D4-D5 select the width.
    pub(crate) nusiz: u8,
    pub(crate) enabled: bool,
    /// Locked to the player centre and hidden.
    pub(crate) reset_to_player: bool,
}

impl Missile {
    pub(crate) fn new() -> Self {
        Self {
            counter: Counter::new(),
            nusiz: 0,
            enabled: false,
            reset_to_player: false,
        }
    }

    fn width(&self) -> u8 {
        1 << ((self.nusiz >> 4) & 0x03)
    }

    pub(crate) fn pixel(&self) -> bool {
        if !self.enabled || self.reset_to_player {
            return false;
        }
        let width = self.width();
        COPY_STARTS[usize::from(self.nusiz & 0x07)]
            .iter()
            .any(|&start| self.counter.since(start, DRAW_DELAY) < width)
    }

    /// Follow the player so that the missile starts on its centre pixel.
    pub(crate) fn lock_to(&mut self, player: &Player) {
        let lead = player.draw_delay() - DRAW_DELAY + player.centre();
        let period = u16::from(PERIOD);
        self.counter.value =
            ((u16::from(player.counter.value) + period - u16::from(lead)) % period) as u8;
    }

    /// Current horizontal counter value.
    #[must_use]
    pub fn position(&self) -> u8 {
        self.counter.value
    }

    pub(crate) fn save(&self, s: &mut Serializer) {
        self.counter.save(s);
        s.put_u8(self.nusiz);
        s.put_bool(self.enabled);
        s.put_bool(self.reset_to_player);
    }

    pub(crate) fn load(&mut self, s: &mut Serializer) -> Result<(), StateError> {
        self.counter.load(s)?;
        self.nusiz = s.get_u8()?;
        self.enabled = s.get_bool()?;
        self.reset_to_player = s.get_bool()?;
        Ok(())
    }
}
