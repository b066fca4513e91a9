//! Per-scheme bank state and address decode.
//!
//! Each variant holds only what its scheme needs. Offsets are always
//! reduced into the image, whatever the bank registers hold.

use crate::scheme::Scheme;
use emu_core::{Serializer, StateError};

/// Bank state for one cartridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Banking {
    /// 2K and 4K images.
    Fixed,
    /// CommaVid: 1K RAM, read at $1000-$13FF and written at $1400-$17FF.
    CommaVid { ram: Vec<u8> },
    /// Hotspots at the top of the 4K window select a 4K bank. Optional RAM
    /// is written through the bottom of the window and read just above.
    Hotspot {
        first: u16,
        bank: u16,
        count: u16,
        ram: Vec<u8>,
    },
    /// Four 1K segments. The last always shows slice 7.
    Segmented { segments: [u8; 4] },
    /// 2K ROM slice or 1K RAM in the low half, 256-byte RAM bank above it.
    MNetwork {
        slice: u8,
        ram_bank: u8,
        ram: Vec<u8>,
    },
    /// 2K bank at $1000-$17FF, last 2K fixed at $1800-$1FFF.
    Tigervision { bank: u16, count: u16 },
    /// 4K banks switched from outside the cartridge window.
    External { bank: u16, scheme: Scheme },
}

/// Start bank for the plain hotspot schemes.
fn hotspot_start(scheme: Scheme) -> u16 {
    match scheme {
        Scheme::F8 | Scheme::F8Sc => 1,
        _ => 0,
    }
}

impl Banking {
    pub fn new(scheme: Scheme, size: usize) -> Self {
        let hotspot = |first: u16, count: u16, ram: usize| Banking::Hotspot {
            first,
            bank: hotspot_start(scheme),
            count,
            ram: vec![0; ram],
        };
        match scheme {
            Scheme::TwoK | Scheme::FourK => Banking::Fixed,
            Scheme::Cv => Banking::CommaVid { ram: vec![0; 1024] },
            Scheme::F8 => hotspot(0x1FF8, 2, 0),
            Scheme::F6 => hotspot(0x1FF6, 4, 0),
            Scheme::F4 => hotspot(0x1FF4, 8, 0),
            Scheme::F8Sc => hotspot(0x1FF8, 2, 128),
            Scheme::F6Sc => hotspot(0x1FF6, 4, 128),
            Scheme::F4Sc => hotspot(0x1FF4, 8, 128),
            Scheme::Fa => hotspot(0x1FF8, 3, 256),
            Scheme::E0 => Banking::Segmented {
                segments: [4, 5, 6, 7],
            },
            Scheme::E7 => Banking::MNetwork {
                slice: 0,
                ram_bank: 0,
                ram: vec![0; 2048],
            },
            Scheme::ThreeF => Banking::Tigervision {
                bank: 0,
                count: (size / 2048).max(1) as u16,
            },
            Scheme::Ua | Scheme::UaSwapped | Scheme::Ox0840 => {
                Banking::External { bank: 0, scheme }
            }
        }
    }

    pub fn bank_count(&self) -> u16 {
        match self {
            Banking::Fixed | Banking::CommaVid { .. } => 1,
            Banking::Hotspot { count, .. } | Banking::Tigervision { count, .. } => *count,
            Banking::Segmented { .. } | Banking::MNetwork { .. } => 8,
            Banking::External { .. } => 2,
        }
    }

    /// Current bank, or the first segment's slice for segmented schemes.
    pub fn current(&self) -> u16 {
        match self {
            Banking::Fixed | Banking::CommaVid { .. } => 0,
            Banking::Hotspot { bank, .. }
            | Banking::Tigervision { bank, .. }
            | Banking::External { bank, .. } => *bank,
            Banking::Segmented { segments } => u16::from(segments[0]),
            Banking::MNetwork { slice, .. } => u16::from(*slice),
        }
    }

    /// Select `index`, which the caller has checked against the count.
    pub fn select(&mut self, index: u16) {
        match self {
            Banking::Fixed | Banking::CommaVid { .. } => {}
            Banking::Hotspot { bank, .. }
            | Banking::Tigervision { bank, .. }
            | Banking::External { bank, .. } => *bank = index,
            Banking::Segmented { segments } => segments[0] = index as u8,
            Banking::MNetwork { slice, .. } => *slice = index as u8,
        }
    }

    /// Switch banks if `address` (13-bit, inside the window) is a hotspot.
    fn check_hotspot(&mut self, address: u16) {
        match self {
            Banking::Hotspot {
                first, bank, count, ..
            } if (*first..*first + *count).contains(&address) => {
                *bank = address - *first;
            }
            Banking::Segmented { segments } => match address {
                0x1FE0..=0x1FE7 => segments[0] = (address & 0x07) as u8,
                0x1FE8..=0x1FEF => segments[1] = (address & 0x07) as u8,
                0x1FF0..=0x1FF7 => segments[2] = (address & 0x07) as u8,
                _ => {}
            },
            Banking::MNetwork {
                slice, ram_bank, ..
            } => match address {
                0x1FE0..=0x1FE7 => *slice = (address & 0x07) as u8,
                0x1FE8..=0x1FEB => *ram_bank = (address & 0x03) as u8,
                _ => {}
            },
            _ => {}
        }
    }

    /// Read from the 4K window.
    pub fn peek(&mut self, rom: &[u8], address: u16) -> u8 {
        self.check_hotspot(address);
        let offset = usize::from(address & 0x0FFF);
        match self {
            Banking::Fixed => rom[offset % rom.len()],
            Banking::CommaVid { ram } => match offset {
                0x000..=0x3FF => ram[offset],
                0x400..=0x7FF => ram[offset & 0x3FF],
                _ => rom[(offset - 0x800) % rom.len()],
            },
            Banking::Hotspot { bank, ram, .. } => {
                let ram_size = ram.len();
                if ram_size > 0 && offset < ram_size * 2 {
                    ram[offset % ram_size]
                } else {
                    rom[(usize::from(*bank) * 4096 + offset) % rom.len()]
                }
            }
            Banking::Segmented { segments } => {
                let slice = usize::from(segments[offset >> 10]);
                rom[(slice * 1024 + (offset & 0x3FF)) % rom.len()]
            }
            Banking::MNetwork {
                slice,
                ram_bank,
                ram,
            } => match offset {
                0x000..=0x7FF if *slice == 7 => ram[offset & 0x3FF],
                0x000..=0x7FF => rom[usize::from(*slice) * 2048 + offset],
                0x800..=0x9FF => ram[1024 + usize::from(*ram_bank) * 256 + (offset & 0xFF)],
                _ => rom[0x3000 + offset],
            },
            Banking::Tigervision { bank, .. } => {
                if offset < 0x800 {
                    rom[(usize::from(*bank) * 2048 + offset) % rom.len()]
                } else {
                    rom[rom.len() - 2048 + (offset - 0x800)]
                }
            }
            Banking::External { bank, .. } => {
                rom[(usize::from(*bank) * 4096 + offset) % rom.len()]
            }
        }
    }

    /// Write to the 4K window. Only RAM write ports and hotspots react.
    pub fn poke(&mut self, address: u16, value: u8) {
        self.check_hotspot(address);
        let offset = usize::from(address & 0x0FFF);
        match self {
            Banking::CommaVid { ram } if (0x400..0x800).contains(&offset) => {
                ram[offset & 0x3FF] = value;
            }
            Banking::Hotspot { ram, .. } if offset < ram.len() => {
                ram[offset] = value;
            }
            Banking::MNetwork {
                slice,
                ram_bank,
                ram,
            } => match offset {
                0x000..=0x3FF if *slice == 7 => ram[offset] = value,
                0x800..=0x8FF => ram[1024 + usize::from(*ram_bank) * 256 + offset - 0x800] = value,
                _ => {}
            },
            _ => {}
        }
    }

    /// Whether accesses to the 64-byte page at `base` outside the window
    /// must be shown to the cartridge.
    pub fn claims_page(&self, base: u16) -> bool {
        match self {
            Banking::Tigervision { .. } => base < 0x0040,
            Banking::External {
                scheme: Scheme::Ox0840,
                ..
            } => base & 0x1800 == 0x0800,
            Banking::External { .. } => base & 0x1200 == 0x0200,
            _ => false,
        }
    }

    /// An access outside the window, on a claimed page.
    pub fn snoop(&mut self, address: u16, written: Option<u8>) {
        match self {
            Banking::Tigervision { bank, count } => {
                match written {
                    Some(value) if address < 0x0040 => *bank = u16::from(value) % *count,
                    _ => {}
                }
            }
            Banking::External { bank, scheme } => {
                let (zero, one) = match scheme {
                    Scheme::Ox0840 => ((0x1840, 0x0800), (0x1840, 0x0840)),
                    _ => ((0x1260, 0x0220), (0x1260, 0x0240)),
                };
                let swapped = *scheme == Scheme::UaSwapped;
                if address & zero.0 == zero.1 {
                    *bank = u16::from(swapped);
                } else if address & one.0 == one.1 {
                    *bank = u16::from(!swapped);
                }
            }
            _ => {}
        }
    }

    /// Cartridge RAM, if the scheme has any.
    pub fn ram(&self) -> Option<&[u8]> {
        match self {
            Banking::CommaVid { ram } | Banking::MNetwork { ram, .. } => Some(ram),
            Banking::Hotspot { ram, .. } if !ram.is_empty() => Some(ram),
            _ => None,
        }
    }

    pub fn save(&self, s: &mut Serializer) {
        match self {
            Banking::Fixed => {}
            Banking::CommaVid { ram } => s.put_bytes(ram),
            Banking::Hotspot { bank, ram, .. } => {
                s.put_u16(*bank);
                s.put_bytes(ram);
            }
            Banking::Segmented { segments } => s.put_bytes(segments),
            Banking::MNetwork {
                slice,
                ram_bank,
                ram,
            } => {
                s.put_u8(*slice);
                s.put_u8(*ram_bank);
                s.put_bytes(ram);
            }
            Banking::Tigervision { bank, .. } | Banking::External { bank, .. } => s.put_u16(*bank),
        }
    }

    /// Load into `self`, which already has the right variant and sizes.
    pub fn load(&mut self, s: &mut Serializer) -> Result<(), StateError> {
        let count = self.bank_count();
        let check_bank = |bank: u16| {
            if bank < count {
                Ok(bank)
            } else {
                Err(StateError::invalid("cartridge bank", bank))
            }
        };
        match self {
            Banking::Fixed => {}
            Banking::CommaVid { ram } => s.get_bytes(ram)?,
            Banking::Hotspot { bank, ram, .. } => {
                *bank = check_bank(s.get_u16()?)?;
                s.get_bytes(ram)?;
            }
            Banking::Segmented { segments } => {
                s.get_bytes(segments)?;
                if let Some(&slice) = segments.iter().find(|&&slice| slice > 7) {
                    return Err(StateError::invalid("cartridge segment", slice));
                }
                segments[3] = 7;
            }
            Banking::MNetwork {
                slice,
                ram_bank,
                ram,
            } => {
                *slice = check_bank(u16::from(s.get_u8()?))? as u8;
                let bank = s.get_u8()?;
                if bank > 3 {
                    return Err(StateError::invalid("cartridge ram bank", bank));
                }
                *ram_bank = bank;
                s.get_bytes(ram)?;
            }
            Banking::Tigervision { bank, .. } | Banking::External { bank, .. } => {
                *bank = check_bank(s.get_u16()?)?;
            }
        }
        Ok(())
    }
}
