//! Atari 2600 cartridges.
//!
//! The 6507 only sees 4K of cartridge space at $1000-$1FFF, so anything
//! larger is split into banks that the program selects by touching
//! "hotspot" addresses. This crate detects the scheme an image uses and
//! decodes bus accesses against the active banks.
//!
//! Most hotspots live inside the cartridge window. A few schemes watch
//! addresses elsewhere (UA at $0220/$0240, 0840 at $0800/$0840 and
//! Tigervision writes to $00-$3F). For those the bus asks
//! [`Cartridge::claims_page`] when it builds its page table and forwards
//! accesses on claimed pages through [`Cartridge::snoop`] before the
//! device that owns the page sees them.

mod bankswitch;
mod detect;
mod error;
mod scheme;

use bankswitch::Banking;
use emu_core::{Device, Observable, Serializer, StateError, Value};
use log::{info, warn};
use md5::{Digest, Md5};
use std::fmt::Write;

pub use detect::{detect_scheme, find_signature};
pub use error::CartridgeError;
pub use scheme::Scheme;

/// A cartridge image with its bankswitching hardware.
#[derive(Debug, Clone)]
pub struct Cartridge {
    rom: Vec<u8>,
    scheme: Scheme,
    md5: String,
    banking: Banking,
}

impl Cartridge {
    /// Build a cartridge from `image`. With `scheme` set the image must fit
    /// that scheme; otherwise the scheme is detected.
    pub fn new(image: &[u8], scheme: Option<Scheme>) -> Result<Self, CartridgeError> {
        if image.is_empty() {
            return Err(CartridgeError::Empty);
        }
        let scheme = match scheme {
            Some(scheme) if scheme.fits(image.len()) => scheme,
            Some(scheme) => {
                return Err(CartridgeError::SizeMismatch {
                    scheme,
                    size: image.len(),
                });
            }
            None => detect_scheme(image)?,
        };
        let md5 = md5_hex(image);
        info!(
            "Cartridge: {} bytes, scheme {scheme}, md5 {md5}",
            image.len()
        );
        Ok(Self {
            rom: image.to_vec(),
            scheme,
            md5,
            banking: Banking::new(scheme, image.len()),
        })
    }

    #[must_use]
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Lower-case hex MD5 of the image.
    #[must_use]
    pub fn md5(&self) -> &str {
        &self.md5
    }

    #[must_use]
    pub fn rom(&self) -> &[u8] {
        &self.rom
    }

    /// Cartridge RAM, if the scheme has any.
    #[must_use]
    pub fn ram(&self) -> Option<&[u8]> {
        self.banking.ram()
    }

    /// Power-on bank selection with cleared RAM.
    pub fn reset(&mut self) {
        self.banking = Banking::new(self.scheme, self.rom.len());
    }

    /// Select bank `index`. Requests past the last bank are refused and the
    /// mapping is left alone. For segmented schemes this sets the first
    /// segment.
    pub fn bank(&mut self, index: u16) -> bool {
        let count = self.bank_count();
        if index >= count {
            warn!(
                "Cartridge: bank {index} requested, {} has {count}",
                self.scheme
            );
            return false;
        }
        self.banking.select(index);
        true
    }

    /// Currently selected bank.
    #[must_use]
    pub fn get_bank(&self) -> u16 {
        self.banking.current()
    }

    #[must_use]
    pub fn bank_count(&self) -> u16 {
        self.banking.bank_count()
    }

    /// Whether the 64-byte page at `base`, outside $1000-$1FFF, holds a
    /// hotspot for this scheme.
    #[must_use]
    pub fn claims_page(&self, base: u16) -> bool {
        base & 0x1000 == 0 && self.banking.claims_page(base & 0x1FC0)
    }

    /// Show the cartridge an access to a claimed page. `written` is the
    /// value for writes and `None` for reads.
    pub fn snoop(&mut self, address: u16, written: Option<u8>) {
        self.banking.snoop(address & 0x1FFF, written);
    }

    /// Write banking state. The image itself is identified by its MD5.
    pub fn save(&self, s: &mut Serializer) {
        s.put_u8(self.scheme.to_byte());
        self.banking.save(s);
    }

    /// Restore state written by [`Cartridge::save`]. On error the
    /// cartridge is left as it was.
    pub fn load(&mut self, s: &mut Serializer) -> Result<(), StateError> {
        let byte = s.get_u8()?;
        if Scheme::from_byte(byte) != Some(self.scheme) {
            return Err(StateError::invalid("cartridge scheme", byte));
        }
        let mut banking = Banking::new(self.scheme, self.rom.len());
        banking.load(s)?;
        self.banking = banking;
        Ok(())
    }
}

fn md5_hex(image: &[u8]) -> String {
    let digest = Md5::digest(image);
    let mut hex = String::with_capacity(32);
    for byte in digest {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

impl Device for Cartridge {
    fn peek(&mut self, address: u16) -> u8 {
        self.banking.peek(&self.rom, address & 0x1FFF)
    }

    fn poke(&mut self, address: u16, value: u8) {
        self.banking.poke(address & 0x1FFF, value);
    }
}

impl Observable for Cartridge {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "scheme" => Some(self.scheme.name().into()),
            "md5" => Some(self.md5.as_str().into()),
            "size" => Some((self.rom.len() as u32).into()),
            "bank" => Some(self.get_bank().into()),
            "bank_count" => Some(self.bank_count().into()),
            "ram" => self.ram().map(Value::from),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &["scheme", "md5", "size", "bank", "bank_count", "ram"]
    }
}
