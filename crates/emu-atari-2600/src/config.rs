//! Atari 2600 configuration.

use atari_2600_cartridge::Scheme;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Video standard. Sets the colour clock and the expected frame shape.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Region {
    /// NTSC: 60 Hz, 262 lines, 3,579,545 Hz colour clock.
    #[default]
    Ntsc,
    /// PAL: 50 Hz, 312 lines, 3,546,894 Hz colour clock.
    Pal,
    /// SECAM: 50 Hz, 312 lines, 3,562,500 Hz colour clock.
    Secam,
}

impl Region {
    /// TIA colour clock in Hz.
    #[must_use]
    pub const fn colour_clock_hz(self) -> u32 {
        match self {
            Self::Ntsc => 3_579_545,
            Self::Pal => 3_546_894,
            Self::Secam => 3_562_500,
        }
    }

    /// CPU clock in Hz, one third of the colour clock.
    #[must_use]
    pub const fn cpu_hz(self) -> u32 {
        self.colour_clock_hz() / 3
    }

    /// Lines in a frame from a well-behaved cartridge.
    #[must_use]
    pub const fn lines_per_frame(self) -> u16 {
        match self {
            Self::Ntsc => 262,
            Self::Pal | Self::Secam => 312,
        }
    }

    /// Nominal frame rate.
    #[must_use]
    pub const fn frames_per_second(self) -> u32 {
        match self {
            Self::Ntsc => 60,
            Self::Pal | Self::Secam => 50,
        }
    }
}

/// What is plugged into a controller port.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ControllerKind {
    /// Look at the ROM to decide.
    #[default]
    Auto,
    Joystick,
    /// A pair of paddles.
    Paddles,
}

/// Most extreme digital sensitivity.
pub const MAX_DIGITAL_SENSITIVITY: u8 = 20;

/// Paddle response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PaddleSettings {
    /// Speed of digital nudges, 1 to [`MAX_DIGITAL_SENSITIVITY`].
    pub digital_sensitivity: u8,
    /// Share of the pot's travel in use, 1 to 100 percent.
    pub range_percent: u8,
    /// Turn the knob the other way round.
    pub swap_direction: bool,
}

impl Default for PaddleSettings {
    fn default() -> Self {
        Self {
            digital_sensitivity: 10,
            range_percent: 100,
            swap_direction: false,
        }
    }
}

impl PaddleSettings {
    /// Same settings with every field inside its legal range.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            digital_sensitivity: self.digital_sensitivity.clamp(1, MAX_DIGITAL_SENSITIVITY),
            range_percent: self.range_percent.clamp(1, 100),
            swap_direction: self.swap_direction,
        }
    }
}

/// Atari 2600 configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Atari2600Config {
    /// Cartridge image.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub rom: Vec<u8>,
    /// Bankswitching scheme. Detected from the image when `None`.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub scheme: Option<Scheme>,
    /// Treat a UA cartridge as having its hotspots swapped.
    pub swap_ua_hotspots: bool,
    /// Video standard. Defaults to NTSC.
    pub region: Region,
    /// Left and right controller ports.
    pub controllers: [ControllerKind; 2],
    pub paddles: PaddleSettings,
    /// Audio output rate in Hz.
    pub sample_rate: u32,
    /// Snapshots kept for rewinding. Zero disables rewind.
    pub rewind_depth: usize,
    /// Frames between rewind snapshots.
    pub rewind_interval: u32,
}

impl Default for Atari2600Config {
    fn default() -> Self {
        Self {
            rom: Vec::new(),
            scheme: None,
            swap_ua_hotspots: false,
            region: Region::default(),
            controllers: [ControllerKind::Auto; 2],
            paddles: PaddleSettings::default(),
            sample_rate: atari_tia::DEFAULT_SAMPLE_RATE,
            rewind_depth: 0,
            rewind_interval: 60,
        }
    }
}

impl Atari2600Config {
    /// Default settings for `rom`.
    #[must_use]
    pub fn new(rom: Vec<u8>) -> Self {
        Self {
            rom,
            ..Self::default()
        }
    }
}
