//! Top-level Atari 2600 system.
//!
//! There is no separate master clock: the CPU drives the machine, and each
//! of its bus cycles advances the TIA by three colour clocks. A frame ends
//! when the TIA sees VSYNC (or gives up waiting for it), so frames vary in
//! length with the cartridge.

use atari_2600_cartridge::{Cartridge, Scheme, detect_scheme};
use atari_tia::{FRAME_WIDTH, FrameEnd, Tia, ntsc_argb};
use emu_core::{Cpu, Observable, Serializer, StateError, Value};
use log::{debug, error, info};
use mos_6502::Mos6502;
use mos_riot_6532::Riot6532;

use crate::bus::Atari2600Bus;
use crate::config::{Atari2600Config, ControllerKind, PaddleSettings, Region};
use crate::controller::{Joystick, Paddle, detect_controller, paddle_fire_bit};
use crate::error::Atari2600Error;
use crate::rewind::RewindBuffer;
use crate::switches::ConsoleSwitches;

/// Save-state header.
const STATE_MAGIC: &[u8; 4] = b"A26S";
const STATE_VERSION: u16 = 1;

/// Atari 2600 system.
#[derive(Debug)]
pub struct Atari2600 {
    cpu: Mos6502,
    bus: Atari2600Bus,
    region: Region,
    controllers: [ControllerKind; 2],
    paddle_settings: PaddleSettings,
    joysticks: [Joystick; 2],
    paddles: [Paddle; 4],
    switches: ConsoleSwitches,
    /// Frames completed by [`Atari2600::run_frame`].
    frame_count: u64,
    rewind: RewindBuffer,
}

impl Atari2600 {
    /// Build a console and reset it.
    ///
    /// # Errors
    ///
    /// Returns an error if no bankswitching scheme fits the ROM.
    pub fn new(config: &Atari2600Config) -> Result<Self, Atari2600Error> {
        let scheme = match config.scheme {
            Some(scheme) => scheme,
            None => detect_scheme(&config.rom)?,
        }
        .with_swapped_hotspots(config.swap_ua_hotspots);
        let cartridge = Cartridge::new(&config.rom, Some(scheme))?;

        let controllers = [0, 1].map(|port| match config.controllers[port] {
            ControllerKind::Auto => detect_controller(&config.rom, port),
            kind => kind,
        });

        let tia = Tia::with_rates(config.region.colour_clock_hz(), config.sample_rate);
        let bus = Atari2600Bus::new(tia, Riot6532::new(), cartridge);

        info!(
            "Atari 2600: {:?}, {} cartridge, controllers {:?}/{:?}",
            config.region, scheme, controllers[0], controllers[1]
        );

        let mut console = Self {
            cpu: Mos6502::new(),
            bus,
            region: config.region,
            controllers,
            paddle_settings: config.paddles.clamped(),
            joysticks: [Joystick::default(); 2],
            paddles: [Paddle::new(); 4],
            switches: ConsoleSwitches::default(),
            frame_count: 0,
            rewind: RewindBuffer::new(config.rewind_depth, config.rewind_interval),
        };
        console.reset();
        Ok(console)
    }

    /// Power-on state for every chip, then the CPU reset sequence. Inputs
    /// and switches keep their positions.
    pub fn reset(&mut self) {
        self.bus.tia.reset();
        self.bus.riot.reset(self.bus.cycles());
        self.bus.cartridge.reset();
        self.apply_inputs();
        self.cpu.reset(&mut self.bus);
    }

    /// Execute one instruction. Returns the CPU cycles it took, including
    /// any time spent halted by WSYNC.
    ///
    /// # Errors
    ///
    /// Returns the CPU fault once the processor has jammed.
    pub fn step(&mut self) -> Result<u64, Atari2600Error> {
        let start = self.bus.cycles();
        match self.cpu.step(&mut self.bus) {
            Ok(_) => Ok(self.bus.cycles() - start),
            Err(fault) => {
                error!("Atari 2600: {fault}");
                Err(fault.into())
            }
        }
    }

    /// Run until the TIA finishes a frame. Returns the CPU cycles executed.
    ///
    /// # Errors
    ///
    /// Returns the CPU fault if the processor jams mid-frame.
    pub fn run_frame(&mut self) -> Result<u64, Atari2600Error> {
        let start = self.bus.cycles();
        self.bus.tia.take_frame_ready();
        while !self.bus.tia.take_frame_ready() {
            self.step()?;
        }
        self.frame_count += 1;
        if self.bus.tia.last_frame_end() == FrameEnd::Timeout {
            debug!(
                "Atari 2600: frame {} ended without VSYNC",
                self.frame_count
            );
        }
        if self.rewind.frame_finished() {
            let state = self.save_state();
            self.rewind.push(state);
        }
        Ok(self.bus.cycles() - start)
    }

    /// Last completed frame as colour register values, [`FRAME_WIDTH`] per
    /// row.
    #[must_use]
    pub fn framebuffer(&self) -> &[u8] {
        self.bus.tia.framebuffer()
    }

    /// Last completed frame as ARGB32.
    #[must_use]
    pub fn framebuffer_argb(&self) -> Vec<u32> {
        self.framebuffer().iter().map(|&c| ntsc_argb(c)).collect()
    }

    #[must_use]
    pub fn framebuffer_width(&self) -> u32 {
        FRAME_WIDTH as u32
    }

    /// Rows in the last completed frame.
    #[must_use]
    pub fn framebuffer_height(&self) -> u32 {
        u32::from(self.bus.tia.frame_height())
    }

    /// How the last frame ended.
    #[must_use]
    pub fn last_frame_end(&self) -> FrameEnd {
        self.bus.tia.last_frame_end()
    }

    /// Take the audio output buffer (drains it).
    ///
    /// Returns mono f32 samples in the range 0.0 to 1.0, at the configured
    /// output rate.
    pub fn take_audio_buffer(&mut self) -> Vec<f32> {
        self.bus.tia.take_audio_buffer()
    }

    #[must_use]
    pub fn region(&self) -> Region {
        self.region
    }

    #[must_use]
    pub fn scheme(&self) -> Scheme {
        self.bus.cartridge.scheme()
    }

    /// Controllers in the left and right ports.
    #[must_use]
    pub fn controllers(&self) -> [ControllerKind; 2] {
        self.controllers
    }

    #[must_use]
    pub fn cpu(&self) -> &Mos6502 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Mos6502 {
        &mut self.cpu
    }

    #[must_use]
    pub fn bus(&self) -> &Atari2600Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Atari2600Bus {
        &mut self.bus
    }

    /// CPU cycles since power-on.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.bus.cycles()
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Set the joystick in `port` (0 left, 1 right).
    pub fn set_joystick(&mut self, port: usize, joystick: Joystick) {
        self.joysticks[port & 1] = joystick;
        self.apply_inputs();
    }

    /// Turn paddle 0-3 to `position`, from 0.0 (left) to 1.0 (right).
    pub fn set_paddle_position(&mut self, index: usize, position: f32) {
        self.paddles[index & 3].set_position(position, &self.paddle_settings);
        self.apply_inputs();
    }

    /// Turn paddle 0-3 by `steps` digital nudges, positive to the right.
    pub fn nudge_paddle(&mut self, index: usize, steps: i32) {
        self.paddles[index & 3].nudge(steps, &self.paddle_settings);
        self.apply_inputs();
    }

    pub fn set_paddle_fire(&mut self, index: usize, pressed: bool) {
        self.paddles[index & 3].fire = pressed;
        self.apply_inputs();
    }

    #[must_use]
    pub fn switches(&self) -> ConsoleSwitches {
        self.switches
    }

    pub fn set_switches(&mut self, switches: ConsoleSwitches) {
        self.switches = switches;
        self.apply_inputs();
    }

    /// Drive the controller and switch pins from the current input state.
    fn apply_inputs(&mut self) {
        let mut swcha = 0xFF;
        for port in 0..2 {
            let shift = if port == 0 { 4 } else { 0 };
            let pots = [port * 2, port * 2 + 1];
            if self.controllers[port] == ControllerKind::Paddles {
                for index in pots {
                    let paddle = self.paddles[index];
                    if paddle.fire {
                        swcha &= !paddle_fire_bit(index);
                    }
                    self.bus
                        .tia
                        .set_paddle_resistance(index, Some(paddle.resistance()));
                }
                self.bus.tia.set_fire(port, false);
            } else {
                let joystick = self.joysticks[port];
                swcha &= (joystick.nibble() << shift) | !(0x0F << shift);
                self.bus.tia.set_fire(port, joystick.fire);
                for index in pots {
                    self.bus.tia.set_paddle_resistance(index, None);
                }
            }
        }
        self.bus.riot.set_port_a_pins(swcha);
        self.bus.riot.set_port_b_pins(self.switches.swchb());
    }

    /// Serialize the whole machine.
    #[must_use]
    pub fn save_state(&self) -> Vec<u8> {
        let mut s = Serializer::new();
        s.put_bytes(STATE_MAGIC);
        s.put_u16(STATE_VERSION);
        s.put_str(self.bus.cartridge.md5());
        self.cpu.save(&mut s);
        self.bus.save(&mut s);
        s.put_u64(self.frame_count);
        s.put_u8(self.switches.swchb());
        for joystick in &self.joysticks {
            joystick.save(&mut s);
        }
        for paddle in &self.paddles {
            paddle.save(&mut s);
        }
        debug!(
            "Atari 2600: saved {} bytes at cycle {}",
            s.len(),
            self.bus.cycles()
        );
        s.into_bytes()
    }

    /// Restore a state written by [`Atari2600::save_state`] for the same
    /// cartridge. Nothing changes unless the whole state reads back.
    ///
    /// # Errors
    ///
    /// Returns [`Atari2600Error::State`] for a foreign, truncated or
    /// corrupt state.
    pub fn load_state(&mut self, data: &[u8]) -> Result<(), Atari2600Error> {
        let mut s = Serializer::from_bytes(data.to_vec());

        let mut magic = [0u8; 4];
        s.get_bytes(&mut magic).map_err(|_| StateError::BadMagic)?;
        if &magic != STATE_MAGIC {
            return Err(StateError::BadMagic.into());
        }
        let version = s.get_u16()?;
        if version != STATE_VERSION {
            return Err(StateError::UnsupportedVersion {
                found: version,
                expected: STATE_VERSION,
            }
            .into());
        }
        let md5 = s.get_string()?;
        if md5 != self.bus.cartridge.md5() {
            return Err(StateError::CartridgeMismatch { found: md5 }.into());
        }

        let mut cpu = self.cpu.clone();
        cpu.load(&mut s)?;
        let mut bus = self.bus.clone();
        bus.load(&mut s)?;
        let frame_count = s.get_u64()?;
        let switches = ConsoleSwitches::from_swchb(s.get_u8()?);
        let joysticks = [Joystick::load(&mut s)?, Joystick::load(&mut s)?];
        let mut paddles = self.paddles;
        for paddle in &mut paddles {
            paddle.load(&mut s)?;
        }
        s.finish()?;

        self.cpu = cpu;
        self.bus = bus;
        self.frame_count = frame_count;
        self.switches = switches;
        self.joysticks = joysticks;
        self.paddles = paddles;
        debug!("Atari 2600: loaded state at cycle {}", self.bus.cycles());
        Ok(())
    }

    /// Snapshots held for rewinding.
    #[must_use]
    pub fn rewind_len(&self) -> usize {
        self.rewind.len()
    }

    /// Step back to the newest rewind snapshot. Returns false if there is
    /// none.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot does not load; the console is then
    /// unchanged.
    pub fn rewind(&mut self) -> Result<bool, Atari2600Error> {
        let Some(state) = self.rewind.pop() else {
            return Ok(false);
        };
        self.load_state(&state)?;
        Ok(true)
    }
}

fn controller_name(kind: ControllerKind) -> &'static str {
    match kind {
        ControllerKind::Auto => "auto",
        ControllerKind::Joystick => "joystick",
        ControllerKind::Paddles => "paddles",
    }
}

impl Observable for Atari2600 {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("cpu.") {
            self.cpu.query(rest)
        } else if let Some(rest) = path.strip_prefix("tia.") {
            self.bus.tia.query(rest)
        } else if let Some(rest) = path.strip_prefix("riot.") {
            self.bus.riot.query(rest)
        } else if let Some(rest) = path.strip_prefix("cart.") {
            self.bus.cartridge.query(rest)
        } else if let Some(rest) = path.strip_prefix("memory.") {
            match rest {
                "data_bus" => Some(self.bus.data_bus().into()),
                "cycles" => Some(self.bus.cycles().into()),
                _ => {
                    let hex = rest
                        .strip_prefix("0x")
                        .or_else(|| rest.strip_prefix("0X"))
                        .or_else(|| rest.strip_prefix('$'));
                    let addr = match hex {
                        Some(hex) => u16::from_str_radix(hex, 16).ok(),
                        None => rest.parse().ok(),
                    };
                    addr.and_then(|a| self.bus.peek_ram(a)).map(Value::U8)
                }
            }
        } else {
            match path {
                "frame_count" => Some(self.frame_count.into()),
                "cycles" => Some(self.bus.cycles().into()),
                "region" => Some(format!("{:?}", self.region).into()),
                "controllers.left" => Some(controller_name(self.controllers[0]).into()),
                "controllers.right" => Some(controller_name(self.controllers[1]).into()),
                "switches.swchb" => Some(self.switches.swchb().into()),
                "rewind.len" => Some((self.rewind.len() as u64).into()),
                _ => None,
            }
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "cpu.<6502_paths>",
            "tia.<tia_paths>",
            "riot.<riot_paths>",
            "cart.<cartridge_paths>",
            "memory.data_bus",
            "memory.cycles",
            "memory.<ram address>",
            "frame_count",
            "cycles",
            "region",
            "controllers.left",
            "controllers.right",
            "switches.swchb",
            "rewind.len",
        ]
    }
}
