//! Joysticks, paddles and guessing which one a cartridge expects.
//!
//! Both controllers share SWCHA: the left port drives D7-D4 and the right
//! port D3-D0, all active low. Joystick fire buttons go to INPT4/INPT5.
//! Paddles put a pot on INPT0-INPT3 and their fire buttons on SWCHA.

use atari_2600_cartridge::find_signature;
use emu_core::{Serializer, StateError};

use crate::config::{ControllerKind, PaddleSettings};

/// Full scale of the paddle charge.
pub const PADDLE_STEPS: u32 = 4096;
/// Pot resistance at the end of its travel.
pub const MAX_RESISTANCE: u32 = 1_000_000;

/// A joystick's switches.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Joystick {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

impl Joystick {
    /// Direction switches as a SWCHA nibble (right, left, down, up from the
    /// top bit), active low.
    #[must_use]
    pub fn nibble(self) -> u8 {
        let mut value = 0x0F;
        if self.right {
            value &= !0x08;
        }
        if self.left {
            value &= !0x04;
        }
        if self.down {
            value &= !0x02;
        }
        if self.up {
            value &= !0x01;
        }
        value
    }

    fn to_bits(self) -> u8 {
        u8::from(self.up)
            | u8::from(self.down) << 1
            | u8::from(self.left) << 2
            | u8::from(self.right) << 3
            | u8::from(self.fire) << 4
    }

    pub fn save(&self, s: &mut Serializer) {
        s.put_u8(self.to_bits());
    }

    pub fn load(s: &mut Serializer) -> Result<Self, StateError> {
        let bits = s.get_u8()?;
        if bits > 0x1F {
            return Err(StateError::invalid("joystick", bits));
        }
        Ok(Self {
            up: bits & 0x01 != 0,
            down: bits & 0x02 != 0,
            left: bits & 0x04 != 0,
            right: bits & 0x08 != 0,
            fire: bits & 0x10 != 0,
        })
    }
}

/// SWCHA bit for the fire button of paddle 0-3.
#[must_use]
pub fn paddle_fire_bit(index: usize) -> u8 {
    [0x80, 0x40, 0x08, 0x04][index & 3]
}

/// Position of one paddle knob as a charge on a [`PADDLE_STEPS`] scale.
///
/// Zero is fully clockwise (no resistance).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paddle {
    charge: u32,
    pub fire: bool,
}

impl Default for Paddle {
    fn default() -> Self {
        Self::new()
    }
}

impl Paddle {
    #[must_use]
    pub fn new() -> Self {
        Self {
            charge: PADDLE_STEPS / 2,
            fire: false,
        }
    }

    /// Charge steps the settings allow.
    fn range(settings: &PaddleSettings) -> u32 {
        PADDLE_STEPS * u32::from(settings.range_percent.clamp(1, 100)) / 100
    }

    #[must_use]
    pub fn charge(&self) -> u32 {
        self.charge
    }

    /// Set the knob from a position between 0.0 (left) and 1.0 (right).
    pub fn set_position(&mut self, position: f32, settings: &PaddleSettings) {
        let range = Self::range(settings);
        let position = position.clamp(0.0, 1.0);
        let position = if settings.swap_direction {
            position
        } else {
            1.0 - position
        };
        self.charge = (position * range as f32).round() as u32;
    }

    /// Turn the knob by `steps` digital nudges, positive to the right.
    pub fn nudge(&mut self, steps: i32, settings: &PaddleSettings) {
        let range = Self::range(settings) as i64;
        let sensitivity = settings.digital_sensitivity.clamp(1, 20);
        let distance = 20 + (i64::from(sensitivity) << 3);
        let delta = i64::from(steps) * distance;
        let delta = if settings.swap_direction { delta } else { -delta };
        self.charge = (i64::from(self.charge) + delta).clamp(0, range) as u32;
    }

    /// Pot resistance for the current charge.
    #[must_use]
    pub fn resistance(&self) -> u32 {
        (u64::from(MAX_RESISTANCE) * u64::from(self.charge) / u64::from(PADDLE_STEPS)) as u32
    }

    pub fn save(&self, s: &mut Serializer) {
        s.put_u32(self.charge);
        s.put_bool(self.fire);
    }

    pub fn load(&mut self, s: &mut Serializer) -> Result<(), StateError> {
        let charge = s.get_u32()?;
        if charge > PADDLE_STEPS {
            return Err(StateError::invalid("paddle charge", charge));
        }
        let fire = s.get_bool()?;
        *self = Self { charge, fire };
        Ok(())
    }
}

/// Reads of INPT4/INPT5 that only joystick games make.
const JOYSTICK_FIRE_LEFT: &[&[u8]] = &[
    &[0x24, 0x0C, 0x10],
    &[0x24, 0x0C, 0x30],
    &[0xA5, 0x0C, 0x10],
    &[0xA5, 0x0C, 0x30],
    &[0xB5, 0x0C, 0x10],
    &[0xB5, 0x0C, 0x30],
    &[0x24, 0x3C, 0x10],
    &[0x24, 0x3C, 0x30],
    &[0xA5, 0x3C, 0x10],
    &[0xA5, 0x3C, 0x30],
    &[0xB5, 0x3C, 0x10],
    &[0xB5, 0x3C, 0x30],
    &[0xB4, 0x0C, 0x30],
    &[0xA5, 0x3C, 0x2A],
    &[0xA6, 0x3C, 0x8E],
    &[0xA4, 0x3C, 0x8C],
    &[0xA5, 0x0C, 0x8D],
    &[0xA4, 0x0C, 0x30],
    &[0xA4, 0x3C, 0x30],
    &[0xA5, 0x0C, 0x25],
    &[0xA6, 0x3C, 0x30],
    &[0xA6, 0x0C, 0x30],
    &[0xA5, 0x0C, 0x0A],
    &[0xB9, 0x0C, 0x00, 0x10],
    &[0xB9, 0x0C, 0x00, 0x30],
    &[0xB9, 0x3C, 0x00, 0x10],
    &[0xB9, 0x3C, 0x00, 0x30],
    &[0xA5, 0x0C, 0x0A, 0xB0],
    &[0xB5, 0x0C, 0x29, 0x80],
    &[0xB5, 0x3C, 0x29, 0x80],
    &[0xA5, 0x0C, 0x29, 0x80],
    &[0xA5, 0x3C, 0x29, 0x80],
    &[0xA5, 0x0C, 0x25, 0x0D, 0x10],
    &[0xA5, 0x0C, 0x25, 0x0D, 0x30],
    &[0xA5, 0x3C, 0x25, 0x3D, 0x10],
    &[0xA5, 0x3C, 0x25, 0x3D, 0x30],
    &[0xB5, 0x38, 0x29, 0x80, 0xD0],
    &[0xA9, 0x80, 0x24, 0x0C, 0xD0],
    &[0xA5, 0x0C, 0x29, 0x80, 0xD0],
    &[0xA5, 0x3C, 0x29, 0x80, 0xD0],
    &[0xAD, 0x0C, 0x00, 0x29, 0x80],
];

const JOYSTICK_FIRE_RIGHT: &[&[u8]] = &[
    &[0x24, 0x0D, 0x10],
    &[0x24, 0x0D, 0x30],
    &[0xA5, 0x0D, 0x10],
    &[0xA5, 0x0D, 0x30],
    &[0xB5, 0x0C, 0x10],
    &[0xB5, 0x0C, 0x30],
    &[0x24, 0x3D, 0x10],
    &[0x24, 0x3D, 0x30],
    &[0xA5, 0x3D, 0x10],
    &[0xA5, 0x3D, 0x30],
    &[0xB5, 0x3C, 0x10],
    &[0xB5, 0x3C, 0x30],
    &[0xA4, 0x3D, 0x30],
    &[0xA5, 0x0D, 0x25],
    &[0xA6, 0x3D, 0x30],
    &[0xA6, 0x0D, 0x30],
    &[0xB9, 0x0C, 0x00, 0x10],
    &[0xB9, 0x0C, 0x00, 0x30],
    &[0xB9, 0x3C, 0x00, 0x10],
    &[0xB9, 0x3C, 0x00, 0x30],
    &[0xB5, 0x0C, 0x29, 0x80],
    &[0xB5, 0x3C, 0x29, 0x80],
    &[0xA5, 0x3D, 0x29, 0x80],
    &[0xB5, 0x38, 0x29, 0x80, 0xD0],
    &[0xA9, 0x80, 0x24, 0x0D, 0xD0],
    &[0xAD, 0x0D, 0x00, 0x29, 0x80],
];

/// Pot reads through INPT0/INPT1.
const PADDLE_LEFT: &[&[u8]] = &[
    &[0xA5, 0x08, 0x10],
    &[0xA5, 0x08, 0x30],
    &[0xB5, 0x08, 0x30],
    &[0x24, 0x38, 0x10],
    &[0x24, 0x38, 0x30],
    &[0xA5, 0x38, 0x10],
    &[0xA5, 0x38, 0x30],
    &[0xB5, 0x38, 0x10],
    &[0xB5, 0x38, 0x30],
    &[0x68, 0x48, 0x10],
    &[0xA5, 0x08, 0x4C],
    &[0xA4, 0x38, 0x30],
    &[0xB9, 0x08, 0x00, 0x30],
    &[0xB9, 0x38, 0x00, 0x30],
    &[0x24, 0x08, 0x30, 0x02],
    &[0xB5, 0x38, 0x29, 0x80, 0xD0],
    &[0x24, 0x38, 0x85, 0x08, 0x10],
    &[0xB5, 0x38, 0x49, 0xFF, 0x0A],
    &[0xB1, 0xF2, 0x30, 0x02, 0xE6],
];

/// Pot reads through INPT2/INPT3, or INPT0 indexed by port.
const PADDLE_RIGHT: &[&[u8]] = &[
    &[0x24, 0x0A, 0x10],
    &[0x24, 0x0A, 0x30],
    &[0xA5, 0x0A, 0x10],
    &[0xA5, 0x0A, 0x30],
    &[0xB5, 0x0A, 0x10],
    &[0xB5, 0x0A, 0x30],
    &[0xB5, 0x08, 0x10],
    &[0xB5, 0x08, 0x30],
    &[0x24, 0x3A, 0x10],
    &[0x24, 0x3A, 0x30],
    &[0xA5, 0x3A, 0x10],
    &[0xA5, 0x3A, 0x30],
    &[0xB5, 0x3A, 0x10],
    &[0xB5, 0x3A, 0x30],
    &[0xB5, 0x38, 0x10],
    &[0xB5, 0x38, 0x30],
    &[0xA4, 0x3A, 0x30],
    &[0xA5, 0x3B, 0x30],
    &[0xB9, 0x38, 0x00, 0x30],
    &[0xB5, 0x38, 0x29, 0x80, 0xD0],
    &[0x24, 0x38, 0x85, 0x08, 0x10],
    &[0xB5, 0x38, 0x49, 0xFF, 0x0A],
];

fn any_signature(image: &[u8], signatures: &[&[u8]]) -> bool {
    signatures
        .iter()
        .any(|signature| find_signature(image, signature, 1))
}

/// Guess the controller on `port` (0 left, 1 right) from the code in
/// `image`. A game that reads the joystick fire button keeps a joystick;
/// otherwise pot reads mean paddles.
#[must_use]
pub fn detect_controller(image: &[u8], port: usize) -> ControllerKind {
    let (fire, pots) = if port == 0 {
        (JOYSTICK_FIRE_LEFT, PADDLE_LEFT)
    } else {
        (JOYSTICK_FIRE_RIGHT, PADDLE_RIGHT)
    };
    if !any_signature(image, fire) && any_signature(image, pots) {
        ControllerKind::Paddles
    } else {
        ControllerKind::Joystick
    }
}
