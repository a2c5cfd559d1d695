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

//! # mos6502-core
//!
//! A cycle-accurate MOS 6502 CPU emulator core.
//!
//! Provides a [`Cpu`] that executes 6502 instructions against any host
//! implementing the [`Bus`] trait. The CPU drives one [`Pins`] word per
//! emulated bus cycle — address, data, R/W strobe, SYNC marker and the
//! IRQ/NMI/RES/RDY input lines — so dummy reads, read-modify-write
//! double stores and page-crossing penalty cycles are all visible to
//! the host exactly as the silicon would drive them.
//!
//! ## Example
//!
//! ```rust
//! use mos6502_core::{Bus, Cpu, Pins};
//!
//! struct FlatRam([u8; 65536]);
//!
//! impl Bus for FlatRam {
//!     fn tick(&mut self, mut pins: Pins) -> Pins {
//!         let addr = pins.addr() as usize;
//!         if pins.is_read() {
//!             pins.set_data(self.0[addr]);
//!         } else {
//!             self.0[addr] = pins.data();
//!         }
//!         pins
//!     }
//! }
//!
//! let mut bus = FlatRam([0; 65536]);
//! // Point the reset vector at 0x0400 (low byte first)
//! bus.0[0xFFFC] = 0x00;
//! bus.0[0xFFFD] = 0x04;
//! // Place a NOP at 0x0400
//! bus.0[0x0400] = 0xEA;
//!
//! let mut cpu = Cpu::new();
//! cpu.reset(&mut bus);
//! assert_eq!(cpu.reg.pc, 0x0400);
//! let cycles = cpu.step(&mut bus);
//! assert_eq!(cpu.reg.pc, 0x0401);
//! assert_eq!(cycles, 2);
//! ```

pub mod addressing;
pub mod alu;
pub mod bus;
mod cpu;
pub mod pins;
pub mod registers;

pub use bus::Bus;
pub use cpu::Cpu;
pub use pins::Pins;
pub use registers::{Registers, Status};

#[cfg(test)]
mod tests;
