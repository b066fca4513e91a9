//! Memory-mapped device interface.

/// A chip or cartridge that answers bus accesses in some address range.
///
/// The machine's bus decodes the address and forwards the access here; the
/// device decodes whatever low address bits it cares about. Both calls take
/// `&mut self` because reads have side effects on real hardware (clearing
/// flags, switching banks).
pub trait Device {
    /// Read the byte the device drives for `address`.
    fn peek(&mut self, address: u16) -> u8;

    /// Write `value` at `address`.
    fn poke(&mut self, address: u16, value: u8);
}
