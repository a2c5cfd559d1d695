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

use std::fmt;

use bitflags::bitflags;

// ---------------------------------------------------------------------------
// Status register
// ---------------------------------------------------------------------------

bitflags! {
    /// The 6502 processor status register P, bit layout `N V X B D I Z C`.
    ///
    /// Bit 5 (X, "unused") reads as 1 on the real chip. The emulator
    /// keeps it set at all times: it is forced on power-on, on reset
    /// and whenever P is restored from the stack.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u8 {
        /// Carry
        const C = 0x01;
        /// Zero
        const Z = 0x02;
        /// Interrupt disable
        const I = 0x04;
        /// Decimal mode
        const D = 0x08;
        /// Break — only meaningful in the copy of P pushed on the stack
        const B = 0x10;
        /// Unused, always reads as 1
        const X = 0x20;
        /// Overflow
        const V = 0x40;
        /// Negative
        const N = 0x80;
    }
}

impl Status {
    /// Power-on value: I, X and B set, everything else clear.
    pub const fn power_on() -> Self {
        Self::from_bits_retain(0x34)
    }

    /// Set N from bit 7 of `val` and Z from `val == 0`.
    pub fn set_nz(&mut self, val: u8) {
        self.set(Status::N, val & 0x80 != 0);
        self.set(Status::Z, val == 0);
    }

    /// The byte pushed on the stack by PHP/BRK (`brk` true, B=1) or by
    /// a hardware interrupt (`brk` false, B=0). X is always set.
    pub fn to_pushed(self, brk: bool) -> u8 {
        let mut p = self | Status::X;
        p.set(Status::B, brk);
        p.bits()
    }

    /// Restore P from a byte pulled off the stack (PLP, RTI). B keeps
    /// its current value — it is not a writable flag — and X is forced.
    pub fn from_pulled(self, val: u8) -> Self {
        let mut p = Status::from_bits_retain(val);
        p.set(Status::B, self.contains(Status::B));
        p | Status::X
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P({:02X} {}{}{}{}{}{}{})",
            self.bits(),
            if self.contains(Status::N) { 'N' } else { '.' },
            if self.contains(Status::V) { 'V' } else { '.' },
            if self.contains(Status::B) { 'B' } else { '.' },
            if self.contains(Status::D) { 'D' } else { '.' },
            if self.contains(Status::I) { 'I' } else { '.' },
            if self.contains(Status::Z) { 'Z' } else { '.' },
            if self.contains(Status::C) { 'C' } else { '.' },
        )
    }
}

// ---------------------------------------------------------------------------
// Register file
// ---------------------------------------------------------------------------

/// The 6502 programmer-visible register set.
///
/// The stack pointer `s` indexes page 1: the next free slot is at
/// `0x0100 | s`. Pushes store first and then decrement, pulls
/// increment first and then load.
#[derive(Clone, Copy, Debug)]
pub struct Registers {
    /// Accumulator
    pub a: u8,
    /// Index register X
    pub x: u8,
    /// Index register Y
    pub y: u8,
    /// Stack pointer (page 1 offset)
    pub s: u8,
    /// Program counter
    pub pc: u16,
    /// Status flags
    pub p: Status,
}

impl Registers {
    /// Power-on register state.
    pub const fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            s: 0xFD,
            pc: 0,
            p: Status::power_on(),
        }
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PC={:04X} A={:02X} X={:02X} Y={:02X} S={:02X} {}",
            self.pc, self.a, self.x, self.y, self.s, self.p,
        )
    }
}
