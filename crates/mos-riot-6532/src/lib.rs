//! MOS 6532 RAM-I/O-Timer (RIOT).
//!
//! The 6532 gives the Atari 2600 its only RAM (128 bytes), the two I/O
//! ports that read the joysticks and console switches, and an 8-bit
//! interval timer that games use to pace the vertical blank and overscan.
//!
//! # Registers (A9 = 1)
//!
//! | Addr  | Read             | Write                         |
//! |-------|------------------|-------------------------------|
//! | $280  | SWCHA port A     | port A output                 |
//! | $281  | SWACNT DDR A     | DDR A (1 = output)            |
//! | $282  | SWCHB port B     | port B output                 |
//! | $283  | SWBCNT DDR B     | DDR B                         |
//! | $284  | INTIM            | PA7 edge control (A4 = 0)     |
//! | $285  | TIMINT flags     | PA7 edge control (A4 = 0)     |
//! | $294+ | INTIM / TIMINT   | TIM1T TIM8T TIM64T T1024T     |
//!
//! With A9 = 0 the chip answers from RAM, mirrored on A0-A6.
//!
//! # Timing
//!
//! The timer is pull-based. The owner calls [`Riot6532::update`] with the
//! current CPU cycle before every register access, and the chip catches up
//! in one step instead of being ticked every cycle.

use emu_core::{Device, Observable, Serializer, StateError, Value};

/// Timer flag in TIMINT.
const FLAG_TIMER: u8 = 0x80;
/// PA7 edge flag in TIMINT.
const FLAG_PA7: u8 = 0x40;

/// Prescaler intervals selected by A0-A1 of a timer write.
const INTERVALS: [u16; 4] = [1, 8, 64, 1024];

/// MOS 6532 RIOT.
#[derive(Debug, Clone)]
pub struct Riot6532 {
    /// 128 bytes of RAM.
    ram: [u8; 128],

    /// Port A output register.
    ora: u8,
    /// Port A data direction register (1 = output).
    ddra: u8,
    /// Port B output register.
    orb: u8,
    /// Port B data direction register.
    ddrb: u8,
    /// Levels driven onto port A by the controllers.
    pins_a: u8,
    /// Levels driven onto port B by the console switches.
    pins_b: u8,

    /// Timer value.
    timer: u8,
    /// Cycles between decrements before underflow.
    interval: u16,
    /// Cycles until the next decrement.
    prescale_count: u16,
    /// Timer has underflowed and now decrements every cycle.
    expired: bool,
    /// TIMINT D7, cleared by a timer write or an INTIM read.
    timer_flag: bool,

    /// TIMINT D6, cleared by a TIMINT read.
    pa7_flag: bool,
    /// Detect rising (true) or falling (false) PA7 edges.
    pa7_positive_edge: bool,
    /// PA7 level at the last check.
    pa7_level: bool,

    /// CPU cycle the timer was last brought up to.
    last_update: u64,
}

impl Default for Riot6532 {
    fn default() -> Self {
        Self::new()
    }
}

impl Riot6532 {
    /// Create a RIOT in its power-on state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ram: [0; 128],
            ora: 0,
            ddra: 0,
            orb: 0,
            ddrb: 0,
            pins_a: 0xFF,
            pins_b: 0xFF,
            timer: 0,
            interval: 1024,
            prescale_count: 1024,
            expired: false,
            timer_flag: false,
            pa7_flag: false,
            pa7_positive_edge: false,
            pa7_level: true,
            last_update: 0,
        }
    }

    /// Reset registers and timer. RAM and the external pin levels survive,
    /// as they do when the console's reset line is pulled.
    pub fn reset(&mut self, now: u64) {
        let ram = self.ram;
        let (pins_a, pins_b) = (self.pins_a, self.pins_b);
        *self = Self::new();
        self.ram = ram;
        self.pins_a = pins_a;
        self.pins_b = pins_b;
        self.pa7_level = self.port_a() & 0x80 != 0;
        self.last_update = now;
    }

    /// Bring the timer up to CPU cycle `now`.
    ///
    /// Calls with a `now` earlier than the last one are ignored.
    pub fn update(&mut self, now: u64) {
        if now <= self.last_update {
            return;
        }
        let elapsed = now - self.last_update;
        self.last_update = now;
        self.advance(elapsed);
    }

    fn advance(&mut self, mut cycles: u64) {
        while cycles > 0 {
            if self.expired {
                // One decrement per cycle, wrapping through $FF
                self.timer = self.timer.wrapping_sub((cycles & 0xFF) as u8);
                return;
            }
            let pending = u64::from(self.prescale_count);
            if cycles < pending {
                self.prescale_count -= cycles as u16;
                return;
            }
            cycles -= pending;
            if self.timer == 0 {
                self.timer = 0xFF;
                self.expired = true;
                self.timer_flag = true;
                self.prescale_count = 1;
            } else {
                self.timer -= 1;
                self.prescale_count = self.interval;
            }
        }
    }

    /// Set the levels the controllers drive onto port A (SWCHA).
    pub fn set_port_a_pins(&mut self, value: u8) {
        self.pins_a = value;
        self.check_pa7_edge();
    }

    /// Set the levels the console switches drive onto port B (SWCHB).
    pub fn set_port_b_pins(&mut self, value: u8) {
        self.pins_b = value;
    }

    /// Port A as the CPU reads it.
    #[must_use]
    pub fn port_a(&self) -> u8 {
        (self.ora & self.ddra) | (self.pins_a & !self.ddra)
    }

    /// Port B as the CPU reads it.
    #[must_use]
    pub fn port_b(&self) -> u8 {
        (self.orb & self.ddrb) | (self.pins_b & !self.ddrb)
    }

    /// Current timer value, without the INTIM side effect.
    #[must_use]
    pub fn timer(&self) -> u8 {
        self.timer
    }

    /// RAM contents.
    #[must_use]
    pub fn ram(&self) -> &[u8; 128] {
        &self.ram
    }

    fn flags(&self) -> u8 {
        let mut value = 0;
        if self.timer_flag {
            value |= FLAG_TIMER;
        }
        if self.pa7_flag {
            value |= FLAG_PA7;
        }
        value
    }

    fn check_pa7_edge(&mut self) {
        let level = self.port_a() & 0x80 != 0;
        if level != self.pa7_level && level == self.pa7_positive_edge {
            self.pa7_flag = true;
        }
        self.pa7_level = level;
    }

    fn write_timer(&mut self, address: u16, value: u8) {
        self.timer = value;
        self.interval = INTERVALS[usize::from(address & 0x03)];
        // First decrement happens on the following cycle
        self.prescale_count = 1;
        self.expired = false;
        self.timer_flag = false;
    }

    /// Write the complete chip state.
    pub fn save(&self, s: &mut Serializer) {
        s.put_bytes(&self.ram);
        s.put_u8(self.ora);
        s.put_u8(self.ddra);
        s.put_u8(self.orb);
        s.put_u8(self.ddrb);
        s.put_u8(self.pins_a);
        s.put_u8(self.pins_b);
        s.put_u8(self.timer);
        s.put_u16(self.interval);
        s.put_u16(self.prescale_count);
        s.put_bool(self.expired);
        s.put_bool(self.timer_flag);
        s.put_bool(self.pa7_flag);
        s.put_bool(self.pa7_positive_edge);
        s.put_bool(self.pa7_level);
        s.put_u64(self.last_update);
    }

    /// Restore state written by [`Riot6532::save`]. On error the chip is
    /// left as it was.
    pub fn load(&mut self, s: &mut Serializer) -> Result<(), StateError> {
        let mut ram = [0u8; 128];
        s.get_bytes(&mut ram)?;
        let ora = s.get_u8()?;
        let ddra = s.get_u8()?;
        let orb = s.get_u8()?;
        let ddrb = s.get_u8()?;
        let pins_a = s.get_u8()?;
        let pins_b = s.get_u8()?;
        let timer = s.get_u8()?;
        let interval = s.get_u16()?;
        if !INTERVALS.contains(&interval) {
            return Err(StateError::invalid("riot interval", interval));
        }
        let prescale_count = s.get_u16()?;
        if prescale_count == 0 || prescale_count > interval {
            return Err(StateError::invalid("riot prescale", prescale_count));
        }

        *self = Self {
            ram,
            ora,
            ddra,
            orb,
            ddrb,
            pins_a,
            pins_b,
            timer,
            interval,
            prescale_count,
            expired: s.get_bool()?,
            timer_flag: s.get_bool()?,
            pa7_flag: s.get_bool()?,
            pa7_positive_edge: s.get_bool()?,
            pa7_level: s.get_bool()?,
            last_update: s.get_u64()?,
        };
        Ok(())
    }
}

impl Device for Riot6532 {
    fn peek(&mut self, address: u16) -> u8 {
        if address & 0x0200 == 0 {
            return self.ram[usize::from(address & 0x7F)];
        }
        if address & 0x04 == 0 {
            return match address & 0x03 {
                0 => self.port_a(),
                1 => self.ddra,
                2 => self.port_b(),
                _ => self.ddrb,
            };
        }
        if address & 0x01 == 0 {
            // INTIM
            self.timer_flag = false;
            self.timer
        } else {
            // TIMINT
            let value = self.flags();
            self.pa7_flag = false;
            value
        }
    }

    fn poke(&mut self, address: u16, value: u8) {
        if address & 0x0200 == 0 {
            self.ram[usize::from(address & 0x7F)] = value;
            return;
        }
        if address & 0x04 == 0 {
            match address & 0x03 {
                0 => self.ora = value,
                1 => self.ddra = value,
                2 => self.orb = value,
                _ => self.ddrb = value,
            }
            if address & 0x02 == 0 {
                self.check_pa7_edge();
            }
        } else if address & 0x10 != 0 {
            self.write_timer(address, value);
        } else {
            self.pa7_positive_edge = address & 0x01 != 0;
        }
    }
}

impl Observable for Riot6532 {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "swcha" => Some(self.port_a().into()),
            "swacnt" => Some(self.ddra.into()),
            "swchb" => Some(self.port_b().into()),
            "swbcnt" => Some(self.ddrb.into()),
            "timer" | "intim" => Some(self.timer.into()),
            "interval" => Some(self.interval.into()),
            "timint" => Some(self.flags().into()),
            "timer_flag" => Some(self.timer_flag.into()),
            "pa7_flag" => Some(self.pa7_flag.into()),
            "expired" => Some(self.expired.into()),
            "ram" => Some(self.ram.as_slice().into()),
            _ => {
                // ram.XX for a single byte, XX in hex from 80 to FF
                let offset = path.strip_prefix("ram.")?;
                let addr = u16::from_str_radix(offset, 16).ok()?;
                (0x80..=0xFF)
                    .contains(&addr)
                    .then(|| self.ram[usize::from(addr & 0x7F)].into())
            }
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "swcha",
            "swacnt",
            "swchb",
            "swbcnt",
            "timer",
            "interval",
            "timint",
            "timer_flag",
            "pa7_flag",
            "expired",
            "ram",
            "ram.<80-FF>",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SWCHA: u16 = 0x0280;
    const SWACNT: u16 = 0x0281;
    const SWCHB: u16 = 0x0282;
    const INTIM: u16 = 0x0284;
    const TIMINT: u16 = 0x0285;
    const TIM1T: u16 = 0x0294;
    const TIM8T: u16 = 0x0295;
    const TIM64T: u16 = 0x0296;
    const T1024T: u16 = 0x0297;

    #[test]
    fn ram_is_mirrored_on_low_seven_bits() {
        let mut riot = Riot6532::new();
        riot.poke(0x0080, 0x42);
        assert_eq!(riot.peek(0x0080), 0x42);
        assert_eq!(riot.peek(0x0180), 0x42);
        assert_eq!(riot.peek(0x0000), 0x42);
        riot.poke(0x01FF, 0x99);
        assert_eq!(riot.peek(0x00FF), 0x99);
    }

    #[test]
    fn timer_decrements_on_next_cycle_then_per_interval() {
        let mut riot = Riot6532::new();
        riot.poke(TIM8T, 5);
        assert_eq!(riot.peek(INTIM), 5);

        riot.update(1);
        assert_eq!(riot.peek(INTIM), 4);
        riot.update(8);
        assert_eq!(riot.peek(INTIM), 4);
        riot.update(9);
        assert_eq!(riot.peek(INTIM), 3);
    }

    #[test]
    fn timer_underflow_wraps_and_runs_every_cycle() {
        let mut riot = Riot6532::new();
        riot.poke(TIM64T, 1);

        riot.update(1); // 1 -> 0
        assert_eq!(riot.timer(), 0);
        assert_eq!(riot.peek(TIMINT) & FLAG_TIMER, 0);

        riot.update(65); // 0 -> $FF, flag set
        assert_eq!(riot.timer(), 0xFF);
        assert_eq!(riot.peek(TIMINT) & FLAG_TIMER, FLAG_TIMER);

        riot.update(70);
        assert_eq!(riot.timer(), 0xFA);
    }

    #[test]
    fn intim_read_clears_timer_flag() {
        let mut riot = Riot6532::new();
        riot.poke(TIM1T, 0);
        riot.update(1);
        assert_eq!(riot.peek(TIMINT) & FLAG_TIMER, FLAG_TIMER);
        // TIMINT alone leaves the timer flag alone
        assert_eq!(riot.peek(TIMINT) & FLAG_TIMER, FLAG_TIMER);
        let _ = riot.peek(INTIM);
        assert_eq!(riot.peek(TIMINT) & FLAG_TIMER, 0);
    }

    #[test]
    fn timer_write_clears_flag_and_expiry() {
        let mut riot = Riot6532::new();
        riot.poke(TIM1T, 0);
        riot.update(10);
        riot.poke(T1024T, 2);
        assert_eq!(riot.peek(TIMINT) & FLAG_TIMER, 0);
        riot.update(11);
        assert_eq!(riot.timer(), 1);
        riot.update(11 + 1023);
        assert_eq!(riot.timer(), 1);
        riot.update(11 + 1024);
        assert_eq!(riot.timer(), 0);
    }

    #[test]
    fn long_gap_matches_cycle_by_cycle() {
        let mut bulk = Riot6532::new();
        let mut stepped = Riot6532::new();
        bulk.poke(TIM64T, 3);
        stepped.poke(TIM64T, 3);

        bulk.update(5000);
        for now in 1..=5000 {
            stepped.update(now);
        }
        assert_eq!(bulk.timer(), stepped.timer());
        assert_eq!(bulk.flags(), stepped.flags());
    }

    #[test]
    fn port_reads_merge_output_and_pins() {
        let mut riot = Riot6532::new();
        riot.set_port_a_pins(0xC3);
        riot.poke(SWACNT, 0x0F);
        riot.poke(SWCHA, 0xAA);
        // Output bits from ORA, input bits from the pins
        assert_eq!(riot.peek(SWCHA), 0xCA);

        riot.set_port_b_pins(0x0B);
        assert_eq!(riot.peek(SWCHB), 0x0B);
    }

    #[test]
    fn pa7_negative_edge_sets_flag() {
        let mut riot = Riot6532::new();
        riot.poke(0x0284, 0); // negative edge
        riot.set_port_a_pins(0x7F);
        assert_eq!(riot.peek(TIMINT) & FLAG_PA7, FLAG_PA7);
        // Read cleared it
        assert_eq!(riot.peek(TIMINT) & FLAG_PA7, 0);
        // Rising edge is ignored in this mode
        riot.set_port_a_pins(0xFF);
        assert_eq!(riot.peek(TIMINT) & FLAG_PA7, 0);
    }

    #[test]
    fn pa7_positive_edge_sets_flag() {
        let mut riot = Riot6532::new();
        riot.poke(0x0285, 0); // positive edge
        riot.set_port_a_pins(0x7F);
        assert_eq!(riot.peek(TIMINT) & FLAG_PA7, 0);
        riot.set_port_a_pins(0xFF);
        assert_eq!(riot.peek(TIMINT) & FLAG_PA7, FLAG_PA7);
    }

    #[test]
    fn save_load_round_trip() {
        let mut riot = Riot6532::new();
        riot.poke(0x0090, 0x5A);
        riot.poke(TIM8T, 9);
        riot.update(20);

        let mut s = Serializer::new();
        riot.save(&mut s);
        let mut copy = Riot6532::new();
        let mut r = Serializer::from_bytes(s.into_bytes());
        copy.load(&mut r).expect("load");
        assert_eq!(r.finish(), Ok(()));

        riot.update(300);
        copy.update(300);
        assert_eq!(copy.peek(INTIM), riot.peek(INTIM));
        assert_eq!(copy.peek(0x0090), 0x5A);
    }

    #[test]
    fn load_rejects_bad_interval() {
        let mut s = Serializer::new();
        Riot6532::new().save(&mut s);
        let mut bytes = s.into_bytes();
        // Interval follows RAM, six port bytes and the timer byte
        bytes[128 + 7] = 3;
        bytes[128 + 8] = 0;
        let mut riot = Riot6532::new();
        riot.poke(0x0080, 1);
        let err = riot.load(&mut Serializer::from_bytes(bytes));
        assert!(matches!(err, Err(StateError::InvalidValue { .. })));
        assert_eq!(riot.peek(0x0080), 1);
    }

    #[test]
    fn observable_ram_byte() {
        let mut riot = Riot6532::new();
        riot.poke(0x00A0, 0x33);
        assert_eq!(riot.query("ram.A0"), Some(Value::U8(0x33)));
        assert_eq!(riot.query("ram.10"), None);
        assert_eq!(riot.query("interval"), Some(Value::U16(1024)));
    }
}
