//! Player graphics objects.

use crate::counter::{COPY_STARTS, Counter};
use emu_core::{Serializer, StateError};

/// One of the two 8-pixel player objects.
#[derive(Debug, Clone)]
pub struct Player {
    pub(crate) counter: Counter,
    /// NUSIZx, D0-D2 copies and width.
    pub(crate) nusiz: u8,
    /// GRPx as last written.
    pub(crate) grp_new: u8,
    /// GRPx copied when the other player's GRP is written.
    pub(crate) grp_old: u8,
    pub(crate) vdel: bool,
    pub(crate) reflect: bool,
}

impl Player {
    pub(crate) fn new() -> Self {
        Self {
            counter: Counter::new(),
            nusiz: 0,
            grp_new: 0,
            grp_old: 0,
            vdel: false,
            reflect: false,
        }
    }

    /// Pixels per graphics bit, as a shift.
    fn scale(&self) -> u8 {
        match self.nusiz & 0x07 {
            5 => 1,
            7 => 2,
            _ => 0,
        }
    }

    /// Clocks from a start decode to the first drawn pixel.
    pub(crate) fn draw_delay(&self) -> u8 {
        if self.scale() == 0 { 5 } else { 6 }
    }

    /// Pixel offset of the player centre, used by RESMP.
    pub(crate) fn centre(&self) -> u8 {
        match self.scale() {
            0 => 3,
            1 => 6,
            _ => 10,
        }
    }

    pub(crate) fn graphics(&self) -> u8 {
        if self.vdel { self.grp_old } else { self.grp_new }
    }

    /// Whether the player puts a pixel out at the current counter value.
    pub(crate) fn pixel(&self) -> bool {
        let graphics = self.graphics();
        if graphics == 0 {
            return false;
        }
        let scale = self.scale();
        let delay = self.draw_delay();
        COPY_STARTS[usize::from(self.nusiz & 0x07)]
            .iter()
            .any(|&start| {
                let offset = self.counter.since(start, delay);
                if offset >= 8 << scale {
                    return false;
                }
                let bit = offset >> scale;
                let mask = if self.reflect { 1 << bit } else { 0x80 >> bit };
                graphics & mask != 0
            })
    }

    /// Current horizontal counter value.
    #[must_use]
    pub fn position(&self) -> u8 {
        self.counter.value
    }

    pub(crate) fn save(&self, s: &mut Serializer) {
        self.counter.save(s);
        s.put_u8(self.nusiz);
        s.put_u8(self.grp_new);
        s.put_u8(self.grp_old);
        s.put_bool(self.vdel);
        s.put_bool(self.reflect);
    }

    pub(crate) fn load(&mut self, s: &mut Serializer) -> Result<(), StateError> {
        self.counter.load(s)?;
        self.nusiz = s.get_u8()?;
        self.grp_new = s.get_u8()?;
        self.grp_old = s.get_u8()?;
        self.vdel = s.get_bool()?;
        self.reflect = s.get_bool()?;
        Ok(())
    }
}
