//! 1-Wire device discovery
//!
//! Bus timing, byte I/O and CRC come from `one-wire-bus`. Discovery walks
//! the ROM search tree here so that one device with a corrupt ROM code
//! costs only that device: the search state has already moved past it
//! when the CRC check fails, so the next call carries on with the rest.
//!
//! For every bit the master reads the bit and its complement as driven by
//! all still-participating devices (wired-AND), picks a branch, and writes
//! it back so devices on the other branch drop out. The deepest branch
//! point where `0` was taken is revisited with `1` on the next pass.

use embedded_hal_02::blocking::delay::DelayUs;
use embedded_hal_02::digital::v2::{InputPin, OutputPin};
use one_wire_bus::crc::check_crc8;
use one_wire_bus::{Address, OneWire, OneWireError, OneWireResult};

#[cfg(test)]
pub(crate) mod sim;

/// Enumerate ROM codes
pub const SEARCH_ROM: u8 = 0xF0;

/// Iterative ROM search state
#[derive(Debug, Clone, Default)]
pub struct RomSearch {
    rom: u64,
    last_discrepancy: u8,
    done: bool,
}

impl RomSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once every branch has been visited
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Find the next device, or `None` once every device has been seen
    ///
    /// A ROM code failing its CRC is reported as
    /// [`OneWireError::CrcMismatch`]; calling again continues after it.
    pub fn next_device<P, E, D>(
        &mut self,
        bus: &mut OneWire<P>,
        delay: &mut D,
    ) -> OneWireResult<Option<Address>, E>
    where
        P: InputPin<Error = E> + OutputPin<Error = E>,
        D: DelayUs<u16>,
    {
        if self.done {
            return Ok(None);
        }
        if !bus.reset(delay)? {
            self.done = true;
            return Ok(None);
        }
        bus.write_byte(SEARCH_ROM, delay)?;

        let mut last_zero = 0u8;
        for bit_number in 1..=64u8 {
            let id_bit = bus.read_bit(delay)?;
            let cmp_bit = bus.read_bit(delay)?;
            if id_bit && cmp_bit {
                // Every device dropped out
                self.done = true;
                return Ok(None);
            }

            let mask = 1u64 << (bit_number - 1);
            let direction = if id_bit != cmp_bit {
                id_bit
            } else {
                let take_one = if bit_number < self.last_discrepancy {
                    self.rom & mask != 0
                } else {
                    bit_number == self.last_discrepancy
                };
                if !take_one {
                    last_zero = bit_number;
                }
                take_one
            };

            if direction {
                self.rom |= mask;
            } else {
                self.rom &= !mask;
            }
            bus.write_bit(direction, delay)?;
        }

        self.last_discrepancy = last_zero;
        if last_zero == 0 {
            self.done = true;
        }

        check_crc8::<E>(&self.rom.to_le_bytes())?;
        Ok(Some(Address(self.rom)))
    }
}

/// Every valid ROM code on the bus, in search order
///
/// Corrupt ROM codes are skipped. Any other bus error ends the search and
/// keeps what was found so far.
pub fn scan<P, E, D, F>(bus: &mut OneWire<P>, delay: &mut D, mut found: F)
where
    P: InputPin<Error = E> + OutputPin<Error = E>,
    D: DelayUs<u16>,
    F: FnMut(Address),
{
    let mut search = RomSearch::new();
    loop {
        match search.next_device(bus, delay) {
            Ok(Some(address)) => found(address),
            Ok(None) => break,
            Err(OneWireError::CrcMismatch) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("skipping device with corrupt ROM code");
            }
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("ROM search aborted");
                break;
            }
        }
    }
}
