//! INPT0-INPT5: paddle capacitor inputs and the two fire buttons.
//!
//! Each paddle is a potentiometer in series with 1.8 kΩ charging a 68 nF
//! capacitor. VBLANK D7 grounds the capacitors; once released, the input
//! reads high when the capacitor voltage passes the trip point, so the time
//! taken is proportional to the paddle resistance.

#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

use emu_core::{Serializer, StateError};

/// Fixed series resistance in ohms.
const SERIES_OHMS: f64 = 1_800.0;
/// Timing capacitor in farads.
const CAPACITANCE: f64 = 68e-9;
/// `ln(1 / (1 - 0.3))`: the input trips at 1.5 V of a 5 V supply.
const TRIP_FACTOR: f64 = 0.356_674_943_938_732_4;

#[derive(Debug, Clone)]
pub(crate) struct Inputs {
    /// Pot resistance in ohms, `None` when nothing is plugged in.
    resistance: [Option<u32>; 4],
    /// Capacitors held at ground by VBLANK D7.
    dumped: bool,
    /// TIA clock at which the capacitors were released.
    charge_start: u64,
    /// Buttons currently held, INPT4 then INPT5.
    pressed: [bool; 2],
    /// VBLANK D6: buttons latch low once pressed.
    latch_enabled: bool,
    latched: [bool; 2],
    clock_hz: u32,
}

impl Inputs {
    pub fn new(clock_hz: u32) -> Self {
        Self {
            resistance: [None; 4],
            dumped: false,
            charge_start: 0,
            pressed: [false; 2],
            latch_enabled: false,
            latched: [false; 2],
            clock_hz,
        }
    }

    pub fn set_resistance(&mut self, index: usize, ohms: Option<u32>) {
        if let Some(slot) = self.resistance.get_mut(index) {
            *slot = ohms;
        }
    }

    pub fn resistance(&self, index: usize) -> Option<u32> {
        self.resistance.get(index).copied().flatten()
    }

    pub fn set_button(&mut self, index: usize, pressed: bool) {
        if index < 2 {
            self.pressed[index] = pressed;
            if self.latch_enabled && pressed {
                self.latched[index] = true;
            }
        }
    }

    /// VBLANK D7 and D6.
    pub fn set_vblank(&mut self, value: u8, now: u64) {
        let dump = value & 0x80 != 0;
        if self.dumped && !dump {
            self.charge_start = now;
        }
        self.dumped = dump;

        self.latch_enabled = value & 0x40 != 0;
        if !self.latch_enabled {
            self.latched = [false; 2];
        }
    }

    /// Colour clocks for a pot of `ohms` to charge past the trip point.
    pub fn charge_clocks(&self, ohms: u32) -> u64 {
        let seconds = (f64::from(ohms) + SERIES_OHMS) * CAPACITANCE * TRIP_FACTOR;
        (seconds * f64::from(self.clock_hz)) as u64
    }

    /// INPT0-3 D7.
    pub fn pot_high(&self, index: usize, now: u64) -> bool {
        if self.dumped {
            return false;
        }
        match self.resistance(index) {
            Some(ohms) => now.saturating_sub(self.charge_start) >= self.charge_clocks(ohms),
            None => false,
        }
    }

    /// INPT4/5 D7. Buttons are active low.
    pub fn button_high(&self, index: usize) -> bool {
        let low = self.pressed[index & 1] || (self.latch_enabled && self.latched[index & 1]);
        !low
    }

    pub fn save(&self, s: &mut Serializer) {
        for ohms in self.resistance {
            s.put_bool(ohms.is_some());
            s.put_u32(ohms.unwrap_or(0));
        }
        s.put_bool(self.dumped);
        s.put_u64(self.charge_start);
        for i in 0..2 {
            s.put_bool(self.pressed[i]);
            s.put_bool(self.latched[i]);
        }
        s.put_bool(self.latch_enabled);
    }

    pub fn load(&mut self, s: &mut Serializer) -> Result<(), StateError> {
        for slot in &mut self.resistance {
            let connected = s.get_bool()?;
            let ohms = s.get_u32()?;
            *slot = connected.then_some(ohms);
        }
        self.dumped = s.get_bool()?;
        self.charge_start = s.get_u64()?;
        for i in 0..2 {
            self.pressed[i] = s.get_bool()?;
            self.latched[i] = s.get_bool()?;
        }
        self.latch_enabled = s.get_bool()?;
        Ok(())
    }
}
