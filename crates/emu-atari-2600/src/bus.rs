//! Atari 2600 bus: CPU address routing and the cycle clock.
//!
//! The 6507 drives 13 address lines. Decode uses three of them:
//!
//! | A12 | A9 | A7 | Device          |
//! |-----|----|----|-----------------|
//! | 1   | -  | -  | cartridge       |
//! | 0   | -  | 0  | TIA             |
//! | 0   | 0  | 1  | RIOT RAM        |
//! | 0   | 1  | 1  | RIOT registers  |
//!
//! Every access is one CPU cycle and three TIA colour clocks. The clocks run
//! before the access, so a register write lands after the TIA has caught up
//! with the cycle it was made on. While the TIA holds RDY low the CPU is
//! parked on its next read and the clocks keep running.

use atari_2600_cartridge::Cartridge;
use atari_tia::Tia;
use emu_core::{Bus, Device, Serializer, StateError};
use mos_riot_6532::Riot6532;

/// Address lines the 6507 brings out.
pub const ADDRESS_MASK: u16 = 0x1FFF;
/// Bytes per page table entry.
const PAGE_SHIFT: u16 = 6;
const PAGE_COUNT: usize = 0x2000 >> PAGE_SHIFT;
/// TIA reads drive D7 and D6 only.
const TIA_UNDRIVEN: u8 = 0x3F;

/// Chip that answers a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Tia,
    Ram,
    Riot,
    Cartridge,
}

/// Page table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Page {
    target: Target,
    /// The cartridge watches this page for bankswitch hotspots.
    snoop: bool,
}

fn decode(address: u16) -> Target {
    if address & 0x1000 != 0 {
        Target::Cartridge
    } else if address & 0x0080 == 0 {
        Target::Tia
    } else if address & 0x0200 == 0 {
        Target::Ram
    } else {
        Target::Riot
    }
}

fn build_pages(cartridge: &Cartridge) -> [Page; PAGE_COUNT] {
    let mut pages = [Page {
        target: Target::Tia,
        snoop: false,
    }; PAGE_COUNT];
    for (index, page) in pages.iter_mut().enumerate() {
        let base = (index as u16) << PAGE_SHIFT;
        *page = Page {
            target: decode(base),
            snoop: cartridge.claims_page(base),
        };
    }
    pages
}

/// The Atari 2600 bus, implementing `emu_core::Bus`.
#[derive(Debug, Clone)]
pub struct Atari2600Bus {
    pub tia: Tia,
    pub riot: Riot6532,
    pub cartridge: Cartridge,
    pages: [Page; PAGE_COUNT],
    /// CPU cycles since power-on, including RDY stalls.
    cycles: u64,
    /// Last value on the data bus.
    data_bus: u8,
}

impl Atari2600Bus {
    #[must_use]
    pub fn new(tia: Tia, riot: Riot6532, cartridge: Cartridge) -> Self {
        let pages = build_pages(&cartridge);
        Self {
            tia,
            riot,
            cartridge,
            pages,
            cycles: 0,
            data_bus: 0,
        }
    }

    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    #[must_use]
    pub fn data_bus(&self) -> u8 {
        self.data_bus
    }

    /// Read RIOT RAM at `address` without side effects. `None` if the
    /// address does not decode to RAM.
    #[must_use]
    pub fn peek_ram(&self, address: u16) -> Option<u8> {
        let address = address & ADDRESS_MASK;
        (decode(address) == Target::Ram).then(|| self.riot.ram()[usize::from(address & 0x7F)])
    }

    fn clock(&mut self) {
        self.cycles += 1;
        self.tia.tick();
        self.tia.tick();
        self.tia.tick();
    }

    fn page(&self, address: u16) -> Page {
        self.pages[usize::from(address >> PAGE_SHIFT)]
    }

    /// Write the chips and the bus clock.
    pub fn save(&self, s: &mut Serializer) {
        self.tia.save(s);
        self.riot.save(s);
        self.cartridge.save(s);
        s.put_u64(self.cycles);
        s.put_u8(self.data_bus);
    }

    /// Restore state written by [`Atari2600Bus::save`]. On error the bus
    /// is left as it was.
    pub fn load(&mut self, s: &mut Serializer) -> Result<(), StateError> {
        let mut tia = self.tia.clone();
        tia.load(s)?;
        let mut riot = self.riot.clone();
        riot.load(s)?;
        let mut cartridge = self.cartridge.clone();
        cartridge.load(s)?;
        let cycles = s.get_u64()?;
        let data_bus = s.get_u8()?;
        self.tia = tia;
        self.riot = riot;
        self.cartridge = cartridge;
        self.cycles = cycles;
        self.data_bus = data_bus;
        Ok(())
    }
}

impl Bus for Atari2600Bus {
    fn read(&mut self, address: u16) -> u8 {
        while !self.tia.rdy() {
            self.clock();
        }
        self.clock();

        let address = address & ADDRESS_MASK;
        let page = self.page(address);
        if page.snoop {
            self.cartridge.snoop(address, None);
        }
        let value = match page.target {
            Target::Tia => self.tia.peek(address) | (self.data_bus & TIA_UNDRIVEN),
            Target::Ram => self.riot.peek(address),
            Target::Riot => {
                self.riot.update(self.cycles);
                self.riot.peek(address)
            }
            Target::Cartridge => self.cartridge.peek(address),
        };
        self.data_bus = value;
        value
    }

    fn write(&mut self, address: u16, value: u8) {
        self.clock();

        let address = address & ADDRESS_MASK;
        let page = self.page(address);
        if page.snoop {
            self.cartridge.snoop(address, Some(value));
        }
        match page.target {
            Target::Tia => self.tia.poke(address, value),
            Target::Ram => self.riot.poke(address, value),
            Target::Riot => {
                self.riot.update(self.cycles);
                self.riot.poke(address, value);
            }
            Target::Cartridge => self.cartridge.poke(address, value),
        }
        self.data_bus = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bus(image: &[u8]) -> Atari2600Bus {
        let cartridge = Cartridge::new(image, None).expect("cartridge");
        Atari2600Bus::new(Tia::new(), Riot6532::new(), cartridge)
    }

    #[test]
    fn decode_follows_a12_a9_a7() {
        assert_eq!(decode(0x0000), Target::Tia);
        assert_eq!(decode(0x0080), Target::Ram);
        assert_eq!(decode(0x0180), Target::Ram);
        assert_eq!(decode(0x0280), Target::Riot);
        assert_eq!(decode(0x0200), Target::Tia);
        assert_eq!(decode(0x1000), Target::Cartridge);
        assert_eq!(decode(0x1FFF), Target::Cartridge);
    }

    #[test]
    fn ram_is_mirrored_and_addresses_wrap_at_13_bits() {
        let mut bus = make_bus(&[0xEA; 4096]);
        bus.write(0x0080, 0x42);
        assert_eq!(bus.read(0x0180), 0x42);
        assert_eq!(bus.read(0x2080), 0x42);
        assert_eq!(bus.peek_ram(0x00FF), Some(0));
        assert_eq!(bus.peek_ram(0x0080), Some(0x42));
        assert_eq!(bus.peek_ram(0x0000), None);
        assert_eq!(bus.read(0xF000), 0xEA);
    }

    #[test]
    fn each_access_is_one_cycle_and_three_colour_clocks() {
        let mut bus = make_bus(&[0xEA; 4096]);
        bus.read(0xF000);
        bus.write(0x0080, 1);
        assert_eq!(bus.cycles(), 2);
        assert_eq!(bus.tia.clocks(), 6);
    }

    #[test]
    fn wsync_stalls_the_next_read_until_the_line_ends() {
        let mut bus = make_bus(&[0xEA; 4096]);
        bus.write(0x0002, 0);
        assert_eq!(bus.cycles(), 1);
        assert!(!bus.tia.rdy());
        bus.read(0xF000);
        // 76 cycles per line: the stall runs out the line, then the read
        assert_eq!(bus.cycles(), 77);
        assert_eq!(bus.tia.hclock(), 3);
    }

    #[test]
    fn tia_reads_keep_undriven_bits_from_the_data_bus() {
        let mut bus = make_bus(&[0xEA; 4096]);
        bus.read(0xF000);
        // CXM0P is clear; the low six bits float at $EA
        assert_eq!(bus.read(0x0000), 0x2A);
    }

    #[test]
    fn riot_timer_sees_the_bus_clock() {
        let mut bus = make_bus(&[0xEA; 4096]);
        bus.write(0x0295, 10); // TIM8T
        for _ in 0..16 {
            bus.read(0xF000);
        }
        // Written at cycle 1, first decrement at 2, then every 8
        assert_eq!(bus.read(0x0284), 7);
    }

    #[test]
    fn claimed_pages_are_shown_to_the_cartridge() {
        let mut image = vec![0u8; 8192];
        image[4096..].fill(1);
        let cartridge = Cartridge::new(&image, Some(atari_2600_cartridge::Scheme::Ua))
            .expect("UA cartridge");
        let mut bus = Atari2600Bus::new(Tia::new(), Riot6532::new(), cartridge);
        assert_eq!(bus.read(0x1000), 0);
        bus.read(0x0240);
        assert_eq!(bus.read(0x1000), 1);
        bus.write(0x0220, 0);
        assert_eq!(bus.read(0x1000), 0);
    }
}
