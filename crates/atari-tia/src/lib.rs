//! Atari TIA (Television Interface Adapter).
//!
//! The TIA generates the 2600's video one colour clock at a time, with no
//! frame buffer of its own: the CPU rewrites the object and playfield
//! registers as the beam moves. It also produces the two audio channels and
//! reads the paddle and fire button inputs.
//!
//! # Timing
//!
//! A scanline is 228 colour clocks: 68 of horizontal blank then 160 visible
//! pixels. The CPU runs at one third of the colour clock, so the bus calls
//! [`Tia::tick`] three times per CPU cycle. A write to WSYNC drops RDY
//! until the start of the next line.
//!
//! # Objects
//!
//! Two players, two missiles and the ball each have a position counter that
//! counts the visible clocks. HMOVE adds extra clocks during horizontal
//! blank to move them, and blanks the first eight pixels of the line when it
//! is strobed in horizontal blank.
//!
//! # Reads
//!
//! Only D7 and D6 are driven. The caller fills the other bits from the
//! data bus.

mod audio;
mod ball;
mod counter;
mod delay_queue;
mod frame;
mod input;
mod missile;
mod palette;
mod player;
mod playfield;

use audio::Audio;
use delay_queue::DelayQueue;
use emu_core::{Device, Observable, Serializer, StateError, Value};
use frame::FrameBuffer;
use input::Inputs;
use log::debug;
use playfield::{CTRLPF_PRIORITY, CTRLPF_REFLECT, CTRLPF_SCORE, Playfield};

pub use audio::CLOCKS_PER_SAMPLE;
pub use ball::Ball;
pub use frame::{FRAME_WIDTH, FrameEnd, MAX_FRAME_HEIGHT, VSYNC_TIMEOUT_LINES};
pub use missile::Missile;
pub use palette::{NTSC_PALETTE, ntsc_argb};
pub use player::Player;

/// Colour clocks per scanline.
pub const CLOCKS_PER_LINE: u16 = 228;
/// Colour clocks of horizontal blank.
pub const HBLANK_CLOCKS: u8 = 68;
/// Horizontal blank after an HMOVE strobed during blank.
const HMOVE_HBLANK_CLOCKS: u8 = HBLANK_CLOCKS + 8;
/// NTSC colour clock in Hz.
pub const NTSC_CLOCK_HZ: u32 = 3_579_545;
/// Default audio output rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
/// RSYNC moves the beam this close to the end of the line.
const RSYNC_HCLOCK: u8 = 225;

// Write registers
const VSYNC: u8 = 0x00;
const VBLANK: u8 = 0x01;
const WSYNC: u8 = 0x02;
const RSYNC: u8 = 0x03;
const NUSIZ0: u8 = 0x04;
const NUSIZ1: u8 = 0x05;
const COLUP0: u8 = 0x06;
const COLUP1: u8 = 0x07;
const COLUPF: u8 = 0x08;
const COLUBK: u8 = 0x09;
const CTRLPF: u8 = 0x0A;
const REFP0: u8 = 0x0B;
const REFP1: u8 = 0x0C;
const PF0: u8 = 0x0D;
const PF1: u8 = 0x0E;
const PF2: u8 = 0x0F;
const RESP0: u8 = 0x10;
const RESP1: u8 = 0x11;
const RESM0: u8 = 0x12;
const RESM1: u8 = 0x13;
const RESBL: u8 = 0x14;
const AUDC0: u8 = 0x15;
const AUDC1: u8 = 0x16;
const AUDF0: u8 = 0x17;
const AUDF1: u8 = 0x18;
const AUDV0: u8 = 0x19;
const AUDV1: u8 = 0x1A;
const GRP0: u8 = 0x1B;
const GRP1: u8 = 0x1C;
const ENAM0: u8 = 0x1D;
const ENAM1: u8 = 0x1E;
const ENABL: u8 = 0x1F;
const HMP0: u8 = 0x20;
const HMP1: u8 = 0x21;
const HMM0: u8 = 0x22;
const HMM1: u8 = 0x23;
const HMBL: u8 = 0x24;
const VDELP0: u8 = 0x25;
const VDELP1: u8 = 0x26;
const VDELBL: u8 = 0x27;
const RESMP0: u8 = 0x28;
const RESMP1: u8 = 0x29;
const HMOVE: u8 = 0x2A;
const HMCLR: u8 = 0x2B;
const CXCLR: u8 = 0x2C;

// Object bits for collision lookup
const OBJ_P0: u8 = 0x01;
const OBJ_P1: u8 = 0x02;
const OBJ_M0: u8 = 0x04;
const OBJ_M1: u8 = 0x08;
const OBJ_BL: u8 = 0x10;
const OBJ_PF: u8 = 0x20;

/// Object pairs and their latch bit. Read register `n` returns latch bits
/// `2n + 1` and `2n` in D7 and D6.
const COLLISION_PAIRS: [(u8, u8, u8); 15] = [
    (OBJ_M0, OBJ_P1, 1),
    (OBJ_M0, OBJ_P0, 0),
    (OBJ_M1, OBJ_P0, 3),
    (OBJ_M1, OBJ_P1, 2),
    (OBJ_P0, OBJ_PF, 5),
    (OBJ_P0, OBJ_BL, 4),
    (OBJ_P1, OBJ_PF, 7),
    (OBJ_P1, OBJ_BL, 6),
    (OBJ_M0, OBJ_PF, 9),
    (OBJ_M0, OBJ_BL, 8),
    (OBJ_M1, OBJ_PF, 11),
    (OBJ_M1, OBJ_BL, 10),
    (OBJ_BL, OBJ_PF, 13),
    (OBJ_P0, OBJ_P1, 15),
    (OBJ_M0, OBJ_M1, 14),
];

const fn collision_table() -> [u16; 64] {
    let mut table = [0u16; 64];
    let mut objects = 0;
    while objects < 64 {
        let mut latches = 0u16;
        let mut i = 0;
        while i < COLLISION_PAIRS.len() {
            let (a, b, bit) = COLLISION_PAIRS[i];
            if objects as u8 & a != 0 && objects as u8 & b != 0 {
                latches |= 1 << bit;
            }
            i += 1;
        }
        table[objects] = latches;
        objects += 1;
    }
    table
}

/// Latches set by each combination of visible objects.
const COLLISIONS: [u16; 64] = collision_table();

/// Clocks a write waits before it lands.
fn write_delay(register: u8) -> u8 {
    match register {
        PF0 | PF1 | PF2 | HMP0..=HMBL | HMCLR => 2,
        VBLANK | REFP0 | REFP1 | GRP0 | GRP1 | ENAM0 | ENAM1 | ENABL => 1,
        _ => 0,
    }
}

/// Atari TIA.
#[derive(Debug, Clone)]
pub struct Tia {
    /// Horizontal position, 0-227.
    hclock: u8,
    /// Colour clocks since power-on.
    clocks: u64,
    /// CPU ready line, dropped by WSYNC.
    rdy: bool,
    /// HMOVE was strobed in blank on this line.
    hmove_blank: bool,
    /// HMOVE ripple counter is running.
    movement: bool,
    /// HMOVE ripple counter step, 0-15.
    motion_clock: u8,

    vsync: bool,
    vblank: u8,
    colup0: u8,
    colup1: u8,
    colupf: u8,
    colubk: u8,
    ctrlpf: u8,

    playfield: Playfield,
    p0: Player,
    p1: Player,
    m0: Missile,
    m1: Missile,
    ball: Ball,
    collisions: u16,

    delayed: DelayQueue,
    audio: Audio,
    inputs: Inputs,
    frame: FrameBuffer,

    clock_hz: u32,
    sample_rate: u32,
}

impl Default for Tia {
    fn default() -> Self {
        Self::new()
    }
}

impl Tia {
    /// NTSC TIA with the default audio output rate.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rates(NTSC_CLOCK_HZ, DEFAULT_SAMPLE_RATE)
    }

    /// TIA running at colour clock `clock_hz`, resampling audio to
    /// `sample_rate`.
    #[must_use]
    pub fn with_rates(clock_hz: u32, sample_rate: u32) -> Self {
        Self {
            hclock: 0,
            clocks: 0,
            rdy: true,
            hmove_blank: false,
            movement: false,
            motion_clock: 0,
            vsync: false,
            vblank: 0,
            colup0: 0,
            colup1: 0,
            colupf: 0,
            colubk: 0,
            ctrlpf: 0,
            playfield: Playfield::new(),
            p0: Player::new(),
            p1: Player::new(),
            m0: Missile::new(),
            m1: Missile::new(),
            ball: Ball::new(),
            collisions: 0,
            delayed: DelayQueue::new(),
            audio: Audio::new(clock_hz, sample_rate),
            inputs: Inputs::new(clock_hz),
            frame: FrameBuffer::new(),
            clock_hz,
            sample_rate,
        }
    }

    /// Return to the power-on register state. Connected controllers and the
    /// frame counter are kept.
    pub fn reset(&mut self) {
        let inputs = self.inputs.clone();
        let frames = self.frame.frames;
        *self = Self::with_rates(self.clock_hz, self.sample_rate);
        self.inputs = inputs;
        self.frame.frames = frames;
    }

    fn hblank_end(&self) -> u8 {
        if self.hmove_blank {
            HMOVE_HBLANK_CLOCKS
        } else {
            HBLANK_CLOCKS
        }
    }

    /// Advance one colour clock.
    pub fn tick(&mut self) {
        if !self.delayed.is_empty() {
            for write in self.delayed.tick() {
                self.apply(write.register, write.value);
            }
        }

        self.audio.clock(self.hclock);

        if self.movement && self.hclock & 0x03 == 0 {
            self.motion_step();
        }

        if self.hclock >= self.hblank_end() {
            self.p0.counter.tick();
            self.p1.counter.tick();
            self.m0.counter.tick();
            self.m1.counter.tick();
            self.ball.counter.tick();
            self.lock_missiles();

            let x = self.hclock - HBLANK_CLOCKS;
            let objects = self.objects(x);
            self.collisions |= COLLISIONS[usize::from(objects)];
            let colour = if self.vblank & 0x02 != 0 {
                0
            } else {
                self.colour(x, objects)
            };
            self.frame.put(x, colour);
        } else if self.hclock >= HBLANK_CLOCKS {
            // HMOVE bar
            self.frame.put(self.hclock - HBLANK_CLOCKS, 0);
        }

        self.clocks += 1;
        self.hclock += 1;
        if u16::from(self.hclock) == CLOCKS_PER_LINE {
            self.end_line();
        }
    }

    fn end_line(&mut self) {
        self.hclock = 0;
        self.hmove_blank = false;
        self.rdy = true;
        self.frame.line += 1;
        if self.frame.line >= VSYNC_TIMEOUT_LINES {
            debug!(
                "TIA: no VSYNC for {VSYNC_TIMEOUT_LINES} lines, closing frame {}",
                self.frame.frames
            );
            self.frame.finish(FrameEnd::Timeout);
        }
    }

    fn motion_step(&mut self) {
        let step = self.motion_clock;
        let in_hblank = self.hclock < self.hblank_end();
        self.p0.counter.motion_step(step, in_hblank);
        self.p1.counter.motion_step(step, in_hblank);
        self.m0.counter.motion_step(step, in_hblank);
        self.m1.counter.motion_step(step, in_hblank);
        self.ball.counter.motion_step(step, in_hblank);
        self.lock_missiles();

        self.motion_clock += 1;
        if self.motion_clock == 16 {
            self.movement = false;
        }
    }

    fn lock_missiles(&mut self) {
        if self.m0.reset_to_player {
            self.m0.lock_to(&self.p0);
        }
        if self.m1.reset_to_player {
            self.m1.lock_to(&self.p1);
        }
    }

    fn objects(&self, x: u8) -> u8 {
        let mut objects = 0;
        if self.p0.pixel() {
            objects |= OBJ_P0;
        }
        if self.p1.pixel() {
            objects |= OBJ_P1;
        }
        if self.m0.pixel() {
            objects |= OBJ_M0;
        }
        if self.m1.pixel() {
            objects |= OBJ_M1;
        }
        if self.ball.pixel() {
            objects |= OBJ_BL;
        }
        if self.playfield.pixel(x) {
            objects |= OBJ_PF;
        }
        objects
    }

    fn colour(&self, x: u8, objects: u8) -> u8 {
        let playfield_colour = if self.ctrlpf & CTRLPF_SCORE == 0 {
            self.colupf
        } else if x < 80 {
            self.colup0
        } else {
            self.colup1
        };
        let field = if objects & OBJ_PF != 0 {
            Some(playfield_colour)
        } else if objects & OBJ_BL != 0 {
            Some(self.colupf)
        } else {
            None
        };
        let players = if objects & (OBJ_P0 | OBJ_M0) != 0 {
            Some(self.colup0)
        } else if objects & (OBJ_P1 | OBJ_M1) != 0 {
            Some(self.colup1)
        } else {
            None
        };

        if self.ctrlpf & CTRLPF_PRIORITY != 0 {
            field.or(players).unwrap_or(self.colubk)
        } else {
            players.or(field).unwrap_or(self.colubk)
        }
    }

    fn apply(&mut self, register: u8, value: u8) {
        match register {
            VSYNC => {
                let on = value & 0x02 != 0;
                if self.vsync && !on {
                    self.frame.finish(FrameEnd::Vsync);
                }
                self.vsync = on;
            }
            VBLANK => {
                self.vblank = value;
                self.inputs.set_vblank(value, self.clocks);
            }
            WSYNC => self.rdy = false,
            RSYNC => self.hclock = RSYNC_HCLOCK,
            NUSIZ0 => {
                self.p0.nusiz = value;
                self.m0.nusiz = value;
            }
            NUSIZ1 => {
                self.p1.nusiz = value;
                self.m1.nusiz = value;
            }
            COLUP0 => self.colup0 = value & 0xFE,
            COLUP1 => self.colup1 = value & 0xFE,
            COLUPF => self.colupf = value & 0xFE,
            COLUBK => self.colubk = value & 0xFE,
            CTRLPF => {
                self.ctrlpf = value;
                self.playfield.reflect = value & CTRLPF_REFLECT != 0;
                self.ball.width_shift = (value >> 4) & 0x03;
            }
            REFP0 => self.p0.reflect = value & 0x08 != 0,
            REFP1 => self.p1.reflect = value & 0x08 != 0,
            PF0 => self.playfield.set_pf0(value),
            PF1 => self.playfield.set_pf1(value),
            PF2 => self.playfield.set_pf2(value),
            RESP0 | RESP1 | RESM0 | RESM1 | RESBL => {
                let in_hblank = self.hclock < self.hblank_end();
                match register {
                    RESP0 => self.p0.counter.reset(in_hblank),
                    RESP1 => self.p1.counter.reset(in_hblank),
                    RESM0 => self.m0.counter.reset(in_hblank),
                    RESM1 => self.m1.counter.reset(in_hblank),
                    _ => self.ball.counter.reset(in_hblank),
                }
            }
            AUDC0 => self.audio.channels[0].audc = value & 0x0F,
            AUDC1 => self.audio.channels[1].audc = value & 0x0F,
            AUDF0 => self.audio.channels[0].audf = value & 0x1F,
            AUDF1 => self.audio.channels[1].audf = value & 0x1F,
            AUDV0 => self.audio.channels[0].audv = value & 0x0F,
            AUDV1 => self.audio.channels[1].audv = value & 0x0F,
            GRP0 => {
                self.p0.grp_new = value;
                self.p1.grp_old = self.p1.grp_new;
            }
            GRP1 => {
                self.p1.grp_new = value;
                self.p0.grp_old = self.p0.grp_new;
                self.ball.enabled_old = self.ball.enabled_new;
            }
            ENAM0 => self.m0.enabled = value & 0x02 != 0,
            ENAM1 => self.m1.enabled = value & 0x02 != 0,
            ENABL => self.ball.enabled_new = value & 0x02 != 0,
            HMP0 => self.p0.counter.hm = value & 0xF0,
            HMP1 => self.p1.counter.hm = value & 0xF0,
            HMM0 => self.m0.counter.hm = value & 0xF0,
            HMM1 => self.m1.counter.hm = value & 0xF0,
            HMBL => self.ball.counter.hm = value & 0xF0,
            VDELP0 => self.p0.vdel = value & 0x01 != 0,
            VDELP1 => self.p1.vdel = value & 0x01 != 0,
            VDELBL => self.ball.vdel = value & 0x01 != 0,
            RESMP0 => {
                self.m0.reset_to_player = value & 0x02 != 0;
                self.lock_missiles();
            }
            RESMP1 => {
                self.m1.reset_to_player = value & 0x02 != 0;
                self.lock_missiles();
            }
            HMOVE => {
                self.movement = true;
                self.motion_clock = 0;
                for counter in [
                    &mut self.p0.counter,
                    &mut self.p1.counter,
                    &mut self.m0.counter,
                    &mut self.m1.counter,
                    &mut self.ball.counter,
                ] {
                    counter.moving = true;
                }
                if self.hclock < HBLANK_CLOCKS {
                    self.hmove_blank = true;
                }
            }
            HMCLR => {
                self.p0.counter.hm = 0;
                self.p1.counter.hm = 0;
                self.m0.counter.hm = 0;
                self.m1.counter.hm = 0;
                self.ball.counter.hm = 0;
            }
            CXCLR => self.collisions = 0,
            _ => {}
        }
    }

    fn read_register(&self, register: u8) -> u8 {
        match register {
            0x00..=0x07 => (((self.collisions >> (register * 2)) & 0x03) as u8) << 6,
            0x08..=0x0B if self.inputs.pot_high(usize::from(register - 0x08), self.clocks) => {
                0x80
            }
            0x0C | 0x0D if self.inputs.button_high(usize::from(register - 0x0C)) => 0x80,
            _ => 0,
        }
    }

    /// CPU ready line. Low from a WSYNC write until the end of the line.
    #[must_use]
    pub fn rdy(&self) -> bool {
        self.rdy
    }

    /// Horizontal colour clock, 0-227.
    #[must_use]
    pub fn hclock(&self) -> u8 {
        self.hclock
    }

    /// Lines since the current frame started.
    #[must_use]
    pub fn line(&self) -> u16 {
        self.frame.line
    }

    /// Colour clocks since power-on.
    #[must_use]
    pub fn clocks(&self) -> u64 {
        self.clocks
    }

    /// Returns true once per completed frame.
    pub fn take_frame_ready(&mut self) -> bool {
        std::mem::take(&mut self.frame.ready)
    }

    /// Last completed frame, [`FRAME_WIDTH`] colour register values per row.
    #[must_use]
    pub fn framebuffer(&self) -> &[u8] {
        self.frame.front()
    }

    /// The frame being drawn, [`MAX_FRAME_HEIGHT`] rows.
    #[must_use]
    pub fn current_frame(&self) -> &[u8] {
        self.frame.back()
    }

    /// Rows in the last completed frame.
    #[must_use]
    pub fn frame_height(&self) -> u16 {
        self.frame.height
    }

    /// Frames completed since power-on.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame.frames
    }

    /// How the last frame ended.
    #[must_use]
    pub fn last_frame_end(&self) -> FrameEnd {
        self.frame.last_end
    }

    /// Take the resampled audio (drains it). Mono f32 in 0.0 to 1.0.
    pub fn take_audio_buffer(&mut self) -> Vec<f32> {
        self.audio.take_buffer()
    }

    /// Connect a paddle pot of `ohms` to INPT0-3, or disconnect it.
    pub fn set_paddle_resistance(&mut self, index: usize, ohms: Option<u32>) {
        self.inputs.set_resistance(index, ohms);
    }

    /// Press or release the fire button on INPT4 (0) or INPT5 (1).
    pub fn set_fire(&mut self, index: usize, pressed: bool) {
        self.inputs.set_button(index, pressed);
    }

    /// Player 0 or 1.
    #[must_use]
    pub fn player(&self, index: usize) -> &Player {
        if index == 0 { &self.p0 } else { &self.p1 }
    }

    /// Missile 0 or 1.
    #[must_use]
    pub fn missile(&self, index: usize) -> &Missile {
        if index == 0 { &self.m0 } else { &self.m1 }
    }

    #[must_use]
    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    /// All 15 collision latches.
    #[must_use]
    pub fn collisions(&self) -> u16 {
        self.collisions
    }

    /// Write the complete chip state. The last completed frame is output
    /// and is not saved.
    pub fn save(&self, s: &mut Serializer) {
        s.put_u8(self.hclock);
        s.put_u64(self.clocks);
        s.put_bool(self.rdy);
        s.put_bool(self.hmove_blank);
        s.put_bool(self.movement);
        s.put_u8(self.motion_clock);
        s.put_bool(self.vsync);
        s.put_u8(self.vblank);
        s.put_u8(self.colup0);
        s.put_u8(self.colup1);
        s.put_u8(self.colupf);
        s.put_u8(self.colubk);
        s.put_u8(self.ctrlpf);
        self.playfield.save(s);
        self.p0.save(s);
        self.p1.save(s);
        self.m0.save(s);
        self.m1.save(s);
        self.ball.save(s);
        s.put_u16(self.collisions);
        self.delayed.save(s);
        self.audio.save(s);
        self.inputs.save(s);
        self.frame.save(s);
    }

    /// Restore state written by [`Tia::save`]. On error the chip is left as
    /// it was.
    pub fn load(&mut self, s: &mut Serializer) -> Result<(), StateError> {
        let mut next = self.clone();
        next.hclock = s.get_u8()?;
        if u16::from(next.hclock) >= CLOCKS_PER_LINE {
            return Err(StateError::invalid("tia hclock", next.hclock));
        }
        next.clocks = s.get_u64()?;
        next.rdy = s.get_bool()?;
        next.hmove_blank = s.get_bool()?;
        next.movement = s.get_bool()?;
        next.motion_clock = s.get_u8()?;
        if next.motion_clock > 16 {
            return Err(StateError::invalid("tia motion clock", next.motion_clock));
        }
        next.vsync = s.get_bool()?;
        next.vblank = s.get_u8()?;
        next.colup0 = s.get_u8()?;
        next.colup1 = s.get_u8()?;
        next.colupf = s.get_u8()?;
        next.colubk = s.get_u8()?;
        next.ctrlpf = s.get_u8()?;
        next.playfield.load(s)?;
        next.p0.load(s)?;
        next.p1.load(s)?;
        next.m0.load(s)?;
        next.m1.load(s)?;
        next.ball.load(s)?;
        next.collisions = s.get_u16()?;
        next.delayed.load(s)?;
        next.audio.load(s)?;
        next.inputs.load(s)?;
        next.frame.load(s)?;
        *self = next;
        Ok(())
    }
}

impl Device for Tia {
    fn peek(&mut self, address: u16) -> u8 {
        self.read_register((address & 0x0F) as u8)
    }

    fn poke(&mut self, address: u16, value: u8) {
        let register = (address & 0x3F) as u8;
        match write_delay(register) {
            0 => self.apply(register, value),
            delay => self.delayed.push(register, value, delay),
        }
    }
}

fn player_query(player: &Player, field: &str) -> Option<Value> {
    match field {
        "position" => Some(player.position().into()),
        "grp" => Some(player.grp_new.into()),
        "grp_old" => Some(player.grp_old.into()),
        "nusiz" => Some(player.nusiz.into()),
        "hm" => Some(player.counter.hm.into()),
        "reflect" => Some(player.reflect.into()),
        "vdel" => Some(player.vdel.into()),
        _ => None,
    }
}

fn missile_query(missile: &Missile, field: &str) -> Option<Value> {
    match field {
        "position" => Some(missile.position().into()),
        "enabled" => Some(missile.enabled.into()),
        "hm" => Some(missile.counter.hm.into()),
        "resmp" => Some(missile.reset_to_player.into()),
        _ => None,
    }
}

impl Observable for Tia {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(field) = path.strip_prefix("p0.") {
            return player_query(&self.p0, field);
        }
        if let Some(field) = path.strip_prefix("p1.") {
            return player_query(&self.p1, field);
        }
        if let Some(field) = path.strip_prefix("m0.") {
            return missile_query(&self.m0, field);
        }
        if let Some(field) = path.strip_prefix("m1.") {
            return missile_query(&self.m1, field);
        }
        match path {
            "hclock" => Some(self.hclock.into()),
            "line" => Some(self.frame.line.into()),
            "clocks" => Some(self.clocks.into()),
            "rdy" => Some(self.rdy.into()),
            "vsync" => Some(self.vsync.into()),
            "vblank" => Some(self.vblank.into()),
            "hmove_blank" => Some(self.hmove_blank.into()),
            "colup0" => Some(self.colup0.into()),
            "colup1" => Some(self.colup1.into()),
            "colupf" => Some(self.colupf.into()),
            "colubk" => Some(self.colubk.into()),
            "ctrlpf" => Some(self.ctrlpf.into()),
            "pf0" => Some(self.playfield.pf0.into()),
            "pf1" => Some(self.playfield.pf1.into()),
            "pf2" => Some(self.playfield.pf2.into()),
            "pf" => Some(self.playfield.pattern().into()),
            "bl.position" => Some(self.ball.position().into()),
            "bl.enabled" => Some(self.ball.enabled().into()),
            "bl.hm" => Some(self.ball.counter.hm.into()),
            "collisions" => Some(self.collisions.into()),
            "cxm0p" | "cxm1p" | "cxp0fb" | "cxp1fb" | "cxm0fb" | "cxm1fb" | "cxblpf"
            | "cxppmm" => {
                let names = [
                    "cxm0p", "cxm1p", "cxp0fb", "cxp1fb", "cxm0fb", "cxm1fb", "cxblpf", "cxppmm",
                ];
                let index = names.iter().position(|&n| n == path)?;
                Some(self.read_register(index as u8).into())
            }
            "delayed_writes" => Some((self.delayed.len() as u8).into()),
            "frame.count" => Some(self.frame.frames.into()),
            "frame.height" => Some(self.frame.height.into()),
            "frame.end" => Some(
                match self.frame.last_end {
                    FrameEnd::None => "none",
                    FrameEnd::Vsync => "vsync",
                    FrameEnd::Timeout => "timeout",
                }
                .into(),
            ),
            "audio.audc0" => Some(self.audio.channels[0].audc.into()),
            "audio.audf0" => Some(self.audio.channels[0].audf.into()),
            "audio.audv0" => Some(self.audio.channels[0].audv.into()),
            "audio.audc1" => Some(self.audio.channels[1].audc.into()),
            "audio.audf1" => Some(self.audio.channels[1].audf.into()),
            "audio.audv1" => Some(self.audio.channels[1].audv.into()),
            "audio.buffered" => Some((self.audio.buffered() as u64).into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "hclock",
            "line",
            "clocks",
            "rdy",
            "vsync",
            "vblank",
            "hmove_blank",
            "colup0",
            "colup1",
            "colupf",
            "colubk",
            "ctrlpf",
            "pf0",
            "pf1",
            "pf2",
            "pf",
            "p0.<position|grp|grp_old|nusiz|hm|reflect|vdel>",
            "p1.<position|grp|grp_old|nusiz|hm|reflect|vdel>",
            "m0.<position|enabled|hm|resmp>",
            "m1.<position|enabled|hm|resmp>",
            "bl.position",
            "bl.enabled",
            "bl.hm",
            "collisions",
            "cxm0p",
            "cxm1p",
            "cxp0fb",
            "cxp1fb",
            "cxm0fb",
            "cxm1fb",
            "cxblpf",
            "cxppmm",
            "delayed_writes",
            "frame.count",
            "frame.height",
            "frame.end",
            "audio.audc0",
            "audio.audf0",
            "audio.audv0",
            "audio.audc1",
            "audio.audf1",
            "audio.audv1",
            "audio.buffered",
        ]
    }
}
