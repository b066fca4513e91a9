//! The closed set of supported bankswitching schemes.

use crate::error::CartridgeError;
use std::fmt;
use std::str::FromStr;

/// Bankswitching scheme of a cartridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// 2K or smaller, mirrored through the 4K window.
    TwoK,
    /// Plain 4K.
    FourK,
    /// CommaVid: 2K ROM plus 1K of RAM.
    Cv,
    /// Atari 8K, hotspots $1FF8-$1FF9.
    F8,
    /// Atari 16K, hotspots $1FF6-$1FF9.
    F6,
    /// Atari 32K, hotspots $1FF4-$1FFB.
    F4,
    /// F8 with 128 bytes of Superchip RAM.
    F8Sc,
    /// F6 with 128 bytes of Superchip RAM.
    F6Sc,
    /// F4 with 128 bytes of Superchip RAM.
    F4Sc,
    /// CBS RAM Plus: 12K, hotspots $1FF8-$1FFA, 256 bytes of RAM.
    Fa,
    /// Parker Bros: four 1K segments, the last one fixed.
    E0,
    /// M-Network: 16K ROM and 2K of RAM.
    E7,
    /// Tigervision: 2K banks selected by writes to $00-$3F.
    ThreeF,
    /// UA Limited: $0220 selects bank 0, $0240 bank 1.
    Ua,
    /// UA with the two hotspots swapped.
    UaSwapped,
    /// Two 4K banks selected by $0800 and $0840.
    Ox0840,
}

impl Scheme {
    /// Every scheme.
    pub const ALL: [Scheme; 16] = [
        Scheme::TwoK,
        Scheme::FourK,
        Scheme::Cv,
        Scheme::F8,
        Scheme::F6,
        Scheme::F4,
        Scheme::F8Sc,
        Scheme::F6Sc,
        Scheme::F4Sc,
        Scheme::Fa,
        Scheme::E0,
        Scheme::E7,
        Scheme::ThreeF,
        Scheme::Ua,
        Scheme::UaSwapped,
        Scheme::Ox0840,
    ];

    /// The conventional short name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Scheme::TwoK => "2K",
            Scheme::FourK => "4K",
            Scheme::Cv => "CV",
            Scheme::F8 => "F8",
            Scheme::F6 => "F6",
            Scheme::F4 => "F4",
            Scheme::F8Sc => "F8SC",
            Scheme::F6Sc => "F6SC",
            Scheme::F4Sc => "F4SC",
            Scheme::Fa => "FA",
            Scheme::E0 => "E0",
            Scheme::E7 => "E7",
            Scheme::ThreeF => "3F",
            Scheme::Ua => "UA",
            Scheme::UaSwapped => "UASW",
            Scheme::Ox0840 => "0840",
        }
    }

    /// Whether an image of `size` bytes can use this scheme.
    #[must_use]
    pub fn fits(self, size: usize) -> bool {
        match self {
            Scheme::TwoK => (1..=2048).contains(&size),
            Scheme::Cv => size == 2048,
            Scheme::FourK => size == 4096,
            Scheme::F8
            | Scheme::F8Sc
            | Scheme::E0
            | Scheme::Ua
            | Scheme::UaSwapped
            | Scheme::Ox0840 => size == 8192,
            Scheme::Fa => size == 12288,
            Scheme::F6 | Scheme::F6Sc | Scheme::E7 => size == 16384,
            Scheme::F4 | Scheme::F4Sc => size == 32768,
            Scheme::ThreeF => size >= 2048 && size.is_multiple_of(2048) && size / 2048 <= 256,
        }
    }

    /// UA becomes UASW when `swapped` is set. Every other scheme, UASW
    /// included, is returned unchanged.
    #[must_use]
    pub fn with_swapped_hotspots(self, swapped: bool) -> Self {
        match (self, swapped) {
            (Scheme::Ua, true) => Scheme::UaSwapped,
            (scheme, _) => scheme,
        }
    }

    pub(crate) fn to_byte(self) -> u8 {
        Scheme::ALL
            .iter()
            .position(|&s| s == self)
            .map_or(0, |i| i as u8)
    }

    pub(crate) fn from_byte(value: u8) -> Option<Self> {
        Scheme::ALL.get(usize::from(value)).copied()
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scheme {
    type Err = CartridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scheme::ALL
            .iter()
            .copied()
            .find(|scheme| scheme.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CartridgeError::UnknownScheme(s.to_string()))
    }
}
