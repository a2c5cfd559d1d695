//   Copyright 2026 Martin Åkesson
//
//   Licensed under the Apache License, Version 2.0 (the "License");
//   you may not use this file except in compliance with the License.
//   You may obtain a copy of the License at
//
//       http://www.apache.org/licenses/LICENSE-2.0
//
//   Unless required by applicable law or agreed to in writing, software
//   distributed under the License is distributed on an "AS IS" BASIS,
//   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//   See the License for the specific language governing permissions and
//   limitations under the License.

//! Packed bus pin word for the 6502.
//!
//! One [`Pins`] word captures one bus cycle: the 16 address lines, the
//! 8 data lines, the R/W strobe, the SYNC opcode-fetch marker and the
//! IRQ/NMI/RDY/RES input lines. The CPU drives address, data, RW and
//! SYNC; the host owns the input lines and the data lines on reads.
//!
//! All input lines are represented asserted-high: a set bit means the
//! line is active. RDY set means the host is ready; a cleared RDY
//! during a read cycle stalls the CPU on that cycle.

use std::fmt;

/// R/W strobe. Set = read cycle, cleared = write cycle.
const PIN_RW: u64 = 1 << 24;
/// Asserted during the cycle that fetches the first byte of an instruction.
const PIN_SYNC: u64 = 1 << 25;
/// Maskable interrupt request (level-sensitive).
const PIN_IRQ: u64 = 1 << 26;
/// Non-maskable interrupt request (edge-sensitive, latched on assertion).
const PIN_NMI: u64 = 1 << 27;
/// Ready. Cleared during a read cycle, it stalls the CPU on that cycle.
const PIN_RDY: u64 = 1 << 28;
/// Reset request. Arms the reset sequence at the next instruction boundary.
const PIN_RES: u64 = 1 << 30;

const ADDR_MASK: u64 = 0xFFFF;
const DATA_SHIFT: u64 = 16;
const DATA_MASK: u64 = 0xFF << DATA_SHIFT;

/// One cycle of the 6502 bus, packed into a single word.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Pins(u64);

impl Pins {
    /// Idle bus state: read strobe high, host ready, all requests clear.
    pub const fn new() -> Self {
        Self(PIN_RW | PIN_RDY)
    }

    /// Raw pin word.
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Rebuild from a raw pin word.
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    // ---- address / data ----

    /// Address lines A0..A15.
    pub const fn addr(self) -> u16 {
        (self.0 & ADDR_MASK) as u16
    }

    pub fn set_addr(&mut self, addr: u16) {
        self.0 = (self.0 & !ADDR_MASK) | addr as u64;
    }

    /// Data lines D0..D7.
    pub const fn data(self) -> u8 {
        ((self.0 & DATA_MASK) >> DATA_SHIFT) as u8
    }

    pub fn set_data(&mut self, data: u8) {
        self.0 = (self.0 & !DATA_MASK) | ((data as u64) << DATA_SHIFT);
    }

    // ---- R/W strobe ----

    pub const fn is_read(self) -> bool {
        self.0 & PIN_RW != 0
    }

    pub fn set_read(&mut self) {
        self.0 |= PIN_RW;
    }

    pub fn set_write(&mut self) {
        self.0 &= !PIN_RW;
    }

    // ---- SYNC ----

    pub const fn sync(self) -> bool {
        self.0 & PIN_SYNC != 0
    }

    pub fn set_sync(&mut self, active: bool) {
        self.set_bit(PIN_SYNC, active);
    }

    // ---- input lines ----

    pub const fn irq(self) -> bool {
        self.0 & PIN_IRQ != 0
    }

    pub fn set_irq(&mut self, active: bool) {
        self.set_bit(PIN_IRQ, active);
    }

    pub const fn nmi(self) -> bool {
        self.0 & PIN_NMI != 0
    }

    pub fn set_nmi(&mut self, active: bool) {
        self.set_bit(PIN_NMI, active);
    }

    pub const fn rdy(self) -> bool {
        self.0 & PIN_RDY != 0
    }

    pub fn set_rdy(&mut self, ready: bool) {
        self.set_bit(PIN_RDY, ready);
    }

    pub const fn res(self) -> bool {
        self.0 & PIN_RES != 0
    }

    pub fn set_res(&mut self, active: bool) {
        self.set_bit(PIN_RES, active);
    }

    fn set_bit(&mut self, mask: u64, active: bool) {
        if active {
            self.0 |= mask;
        } else {
            self.0 &= !mask;
        }
    }
}

impl Default for Pins {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Pins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pins({:04X} {:02X} {}{}{}{}{}{})",
            self.addr(),
            self.data(),
            if self.is_read() { 'r' } else { 'w' },
            if self.sync() { 'S' } else { '.' },
            if self.irq() { 'I' } else { '.' },
            if self.nmi() { 'N' } else { '.' },
            if self.rdy() { '.' } else { 'H' },
            if self.res() { 'R' } else { '.' },
        )
    }
}
