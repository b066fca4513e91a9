//! Memory and I/O bus interface.

/// Memory and I/O bus interface.
///
/// CPUs access memory and peripherals through this trait. Every call is one
/// bus cycle: implementations advance the rest of the machine as part of the
/// access, so a read or write is never free.
pub trait Bus {
    /// Read a byte from the given address.
    fn read(&mut self, address: u16) -> u8;

    /// Write a byte to the given address.
    fn write(&mut self, address: u16, value: u8);
}

/// Flat 64K RAM bus for CPU tests.
///
/// No side effects, no mirroring. Counts accesses so tests can check the
/// number of bus cycles an instruction used.
#[derive(Debug, Clone)]
pub struct SimpleBus {
    ram: Vec<u8>,
    accesses: u64,
}

impl Default for SimpleBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ram: vec![0; 0x1_0000],
            accesses: 0,
        }
    }

    /// Copy `data` into memory starting at `address`, wrapping at $FFFF.
    pub fn load(&mut self, address: u16, data: &[u8]) {
        for (i, &byte) in data.iter().enumerate() {
            let addr = address.wrapping_add(i as u16);
            self.ram[usize::from(addr)] = byte;
        }
    }

    /// Read memory without counting a bus cycle.
    #[must_use]
    pub fn peek(&self, address: u16) -> u8 {
        self.ram[usize::from(address)]
    }

    /// Write memory without counting a bus cycle.
    pub fn poke(&mut self, address: u16, value: u8) {
        self.ram[usize::from(address)] = value;
    }

    /// Number of reads and writes performed through [`Bus`].
    #[must_use]
    pub fn accesses(&self) -> u64 {
        self.accesses
    }
}

impl Bus for SimpleBus {
    fn read(&mut self, address: u16) -> u8 {
        self.accesses += 1;
        self.ram[usize::from(address)]
    }

    fn write(&mut self, address: u16, value: u8) {
        self.accesses += 1;
        self.ram[usize::from(address)] = value;
    }
}
