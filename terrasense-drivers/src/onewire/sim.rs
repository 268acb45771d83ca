//! Simulated 1-Wire bus for host tests
//!
//! Devices watch the line the way real ones do: the length of each low
//! pulse tells a reset from a written 0 or 1, and during a read slot a
//! device sending 0 holds the line low past the master's sample point.
//! Time only moves when the driver delays.

use core::convert::Infallible;
use std::cell::{RefCell, RefMut};
use std::rc::Rc;

use embedded_hal_02::blocking::delay::DelayUs;
use embedded_hal_02::digital::v2::{InputPin, OutputPin};
use one_wire_bus::OneWire;

use super::SEARCH_ROM;

const MATCH_ROM: u8 = 0x55;
const SKIP_ROM: u8 = 0xCC;
const CONVERT_T: u8 = 0x44;
const READ_SCRATCHPAD: u8 = 0xBE;
const WRITE_SCRATCHPAD: u8 = 0x4E;

/// Shortest low pulse taken as a reset
const RESET_MIN_US: u64 = 480;
/// Low pulses shorter than this write a 1
const WRITE_ONE_MAX_US: u64 = 15;
/// Presence pulse window after a reset ends
const PRESENCE_US: core::ops::Range<u64> = 15..240;
/// How long a device holds a 0 from the start of a read slot
const READ_ZERO_HOLD_US: u64 = 45;

pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        let mut b = byte;
        for _ in 0..8 {
            let mix = (crc ^ b) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= 0x8C;
            }
            b >>= 1;
        }
    }
    crc
}

/// Build a ROM code with a valid CRC, family in the low byte
pub fn rom_with_serial(family: u8, serial: u64) -> u64 {
    let mut bytes = [0u8; 8];
    bytes[0] = family;
    bytes[1..7].copy_from_slice(&serial.to_le_bytes()[..6]);
    bytes[7] = crc8(&bytes[..7]);
    u64::from_le_bytes(bytes)
}

/// One simulated DS18B20
#[derive(Debug, Clone)]
pub struct SimDevice {
    pub rom: u64,
    pub scratchpad: [u8; 9],
    /// Whether the device is still on the bus
    pub present: bool,
    /// Temperature latched by the next conversion, 1/16 °C
    pub temperature_raw: i16,
    /// Number of upcoming scratchpad reads to corrupt
    pub corrupt_reads: u32,
    pub conversions: u32,
}

impl SimDevice {
    /// A device in its power-on state (85 °C in the scratchpad)
    pub fn ds18b20(rom: u64, celsius: f32) -> Self {
        let mut device = Self {
            rom,
            scratchpad: [0x50, 0x05, 0x4B, 0x46, 0x7F, 0xFF, 0x0C, 0x10, 0x00],
            present: true,
            temperature_raw: 0,
            corrupt_reads: 0,
            conversions: 0,
        };
        device.set_celsius(celsius);
        device.seal();
        device
    }

    pub fn set_celsius(&mut self, celsius: f32) {
        self.temperature_raw = (celsius * 16.0).round() as i16;
    }

    pub fn config(&self) -> u8 {
        self.scratchpad[4]
    }

    pub fn seal(&mut self) {
        self.scratchpad[8] = crc8(&self.scratchpad[..8]);
    }

    fn convert(&mut self) {
        let unused_bits = 3 - ((self.config() >> 5) & 0x03);
        let mask = !((1i16 << unused_bits) - 1);
        let bytes = (self.temperature_raw & mask).to_le_bytes();
        self.scratchpad[0] = bytes[0];
        self.scratchpad[1] = bytes[1];
        self.conversions += 1;
        self.seal();
    }

    fn rom_bit(&self, bit: u8) -> bool {
        (self.rom >> bit) & 0x01 != 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Idle,
    RomCommand,
    MatchRom(Vec<u8>),
    Function,
    Search { bit: u8, reads: u8 },
    ReadScratchpad { pos: usize, bit: u8 },
    WriteScratchpad(usize),
}

/// Bus state shared by the pin, the delay and the test
#[derive(Debug)]
pub struct SimState {
    pub devices: Vec<SimDevice>,
    pub resets: u32,
    /// Number of CONVERT T commands seen
    pub convert_commands: u32,
    now_us: u64,
    low_since: Option<u64>,
    presence_from: Option<u64>,
    hold_low_until: u64,
    phase: Phase,
    selected: Vec<usize>,
    corrupting: bool,
    rx_byte: u8,
    rx_bits: u8,
}

impl SimState {
    fn line_is_high(&self) -> bool {
        if self.low_since.is_some() {
            return false;
        }
        if let Some(from) = self.presence_from {
            if PRESENCE_US.contains(&(self.now_us - from)) {
                return false;
            }
        }
        self.now_us >= self.hold_low_until
    }

    fn pull_low(&mut self) {
        if self.low_since.is_none() {
            self.low_since = Some(self.now_us);
        }
    }

    fn release(&mut self) {
        let Some(since) = self.low_since.take() else {
            return;
        };
        let low = self.now_us - since;
        if low >= RESET_MIN_US {
            self.reset_pulse();
        } else if let Some(bit) = self.transmit_bit() {
            if !bit {
                self.hold_low_until = since + READ_ZERO_HOLD_US;
            }
        } else {
            self.receive_bit(low < WRITE_ONE_MAX_US);
        }
    }

    fn reset_pulse(&mut self) {
        self.resets += 1;
        self.selected = (0..self.devices.len())
            .filter(|&i| self.devices[i].present)
            .collect();
        let present = !self.selected.is_empty();
        self.presence_from = present.then_some(self.now_us);
        self.phase = if present {
            Phase::RomCommand
        } else {
            Phase::Idle
        };
        self.rx_bits = 0;
        self.rx_byte = 0;
    }

    fn wired_and(&self, bit: u8, complement: bool) -> bool {
        self.selected
            .iter()
            .all(|&i| self.devices[i].rom_bit(bit) != complement)
    }

    /// The bit devices drive in this slot, if they are sending
    fn transmit_bit(&mut self) -> Option<bool> {
        match self.phase {
            Phase::Search { bit, reads } if reads < 2 => {
                let value = self.wired_and(bit, reads == 1);
                self.phase = Phase::Search {
                    bit,
                    reads: reads + 1,
                };
                Some(value)
            }
            Phase::ReadScratchpad { pos, bit } if pos < 9 => {
                let byte = match self.selected.as_slice() {
                    [only] => {
                        let mut byte = self.devices[*only].scratchpad[pos];
                        if self.corrupting && pos == 0 {
                            byte ^= 0x01;
                        }
                        byte
                    }
                    _ => 0xFF,
                };
                self.phase = if bit == 7 {
                    Phase::ReadScratchpad { pos: pos + 1, bit: 0 }
                } else {
                    Phase::ReadScratchpad { pos, bit: bit + 1 }
                };
                Some((byte >> bit) & 0x01 != 0)
            }
            _ => None,
        }
    }

    fn receive_bit(&mut self, bit: bool) {
        if let Phase::Search { bit: n, .. } = self.phase {
            let devices = &self.devices;
            self.selected.retain(|&i| devices[i].rom_bit(n) == bit);
            self.phase = if n == 63 {
                Phase::Idle
            } else {
                Phase::Search {
                    bit: n + 1,
                    reads: 0,
                }
            };
            return;
        }

        if bit {
            self.rx_byte |= 1 << self.rx_bits;
        }
        self.rx_bits += 1;
        if self.rx_bits == 8 {
            let byte = self.rx_byte;
            self.rx_bits = 0;
            self.rx_byte = 0;
            self.receive_byte(byte);
        }
    }

    fn receive_byte(&mut self, byte: u8) {
        let phase = core::mem::replace(&mut self.phase, Phase::Idle);
        self.phase = match phase {
            Phase::RomCommand => match byte {
                SKIP_ROM => Phase::Function,
                MATCH_ROM => Phase::MatchRom(Vec::new()),
                SEARCH_ROM => Phase::Search { bit: 0, reads: 0 },
                _ => Phase::Idle,
            },
            Phase::MatchRom(mut rom) => {
                rom.push(byte);
                if rom.len() == 8 {
                    let mut bytes = [0u8; 8];
                    bytes.copy_from_slice(&rom);
                    let wanted = u64::from_le_bytes(bytes);
                    let devices = &self.devices;
                    self.selected.retain(|&i| devices[i].rom == wanted);
                    Phase::Function
                } else {
                    Phase::MatchRom(rom)
                }
            }
            Phase::Function => match byte {
                CONVERT_T => {
                    self.convert_commands += 1;
                    for &i in &self.selected {
                        self.devices[i].convert();
                    }
                    Phase::Idle
                }
                READ_SCRATCHPAD => {
                    self.corrupting = false;
                    if let [only] = self.selected.as_slice() {
                        let device = &mut self.devices[*only];
                        if device.corrupt_reads > 0 {
                            device.corrupt_reads -= 1;
                            self.corrupting = true;
                        }
                    }
                    Phase::ReadScratchpad { pos: 0, bit: 0 }
                }
                WRITE_SCRATCHPAD => Phase::WriteScratchpad(0),
                _ => Phase::Idle,
            },
            Phase::WriteScratchpad(pos) => {
                // Only the resolution bits of the config register are writable
                let value = if pos == 2 { (byte & 0x60) | 0x1F } else { byte };
                for &i in &self.selected {
                    self.devices[i].scratchpad[2 + pos] = value;
                    self.devices[i].seal();
                }
                if pos == 2 {
                    Phase::Idle
                } else {
                    Phase::WriteScratchpad(pos + 1)
                }
            }
            other => other,
        };
    }
}

/// A bus populated with simulated devices
#[derive(Debug, Clone)]
pub struct SimBus(Rc<RefCell<SimState>>);

impl SimBus {
    pub fn new(devices: Vec<SimDevice>) -> Self {
        Self(Rc::new(RefCell::new(SimState {
            devices,
            resets: 0,
            convert_commands: 0,
            now_us: 0,
            low_since: None,
            presence_from: None,
            hold_low_until: 0,
            phase: Phase::Idle,
            selected: Vec::new(),
            corrupting: false,
            rx_byte: 0,
            rx_bits: 0,
        })))
    }

    pub fn state(&self) -> RefMut<'_, SimState> {
        self.0.borrow_mut()
    }

    pub fn pin(&self) -> SimPin {
        SimPin(self.0.clone())
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay(self.0.clone())
    }

    /// A `one-wire-bus` master wired to this bus
    pub fn attach(&self) -> (OneWire<SimPin>, SimDelay) {
        let bus = OneWire::new(self.pin()).unwrap();
        (bus, self.delay())
    }
}

/// The master's open-drain data pin
#[derive(Debug)]
pub struct SimPin(Rc<RefCell<SimState>>);

impl OutputPin for SimPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().pull_low();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().release();
        Ok(())
    }
}

impl InputPin for SimPin {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Infallible> {
        Ok(self.0.borrow().line_is_high())
    }

    fn is_low(&self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

/// Advances simulated time
#[derive(Debug)]
pub struct SimDelay(Rc<RefCell<SimState>>);

impl DelayUs<u16> for SimDelay {
    fn delay_us(&mut self, us: u16) {
        self.0.borrow_mut().now_us += u64::from(us);
    }
}
