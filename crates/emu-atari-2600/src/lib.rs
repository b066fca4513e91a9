//! Cycle-accurate Atari 2600 emulator.
//!
//! The NTSC colour clock runs at 3,579,545 Hz. The TIA ticks once per
//! colour clock and the 6507 once every three, giving 1,193,182 Hz.
//!
//! One NTSC line = 228 colour clocks = 76 CPU cycles. The cartridge decides
//! how many lines make a frame; a well-behaved one sends VSYNC every 262.

mod atari2600;
mod bus;
mod config;
pub mod controller;
mod error;
mod rewind;
mod switches;

pub use atari2600::Atari2600;
pub use bus::Atari2600Bus;
pub use config::{
    Atari2600Config, ControllerKind, MAX_DIGITAL_SENSITIVITY, PaddleSettings, Region,
};
pub use controller::Joystick;
pub use error::Atari2600Error;
pub use rewind::RewindBuffer;
pub use switches::{ConsoleSwitches, Difficulty};

pub use atari_2600_cartridge::{Cartridge, CartridgeError, Scheme};
pub use atari_tia::FrameEnd;
