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

use tracing::trace;

use crate::bus::Bus;
use crate::pins::Pins;
use crate::registers::{Registers, Status};

mod opcodes;

// ---------------------------------------------------------------------------
// Interrupt vector addresses
// ---------------------------------------------------------------------------

pub const VEC_NMI: u16 = 0xFFFA;
pub const VEC_RESET: u16 = 0xFFFC;
pub const VEC_IRQ: u16 = 0xFFFE;

// ---------------------------------------------------------------------------
// CPU state
// ---------------------------------------------------------------------------

/// MOS 6502 CPU emulator.
///
/// Every architectural bus cycle goes through [`Bus::tick`] as one pin
/// word, and interrupt/reset lines are sampled from the word the host
/// returns. One instance per emulated core; the host owns all memory.
pub struct Cpu {
    /// Programmer-visible registers.
    pub reg: Registers,
    /// Most recently latched opcode.
    pub ir: u8,
    /// Total elapsed cycles since power-on.
    pub cycles: u64,

    /// Last pin state, carried between cycles so host-driven lines stick.
    pins: Pins,

    // ---- interrupt state ----
    /// Previous NMI line level, for edge detection.
    nmi_line: bool,
    /// An NMI edge was seen and not yet committed.
    nmi_latch: bool,
    /// IRQ line level as of the last cycle.
    irq_line: bool,
    /// Committed interrupts, serviced at the next instruction boundary.
    nmi_pending: bool,
    irq_pending: bool,
    /// RES pin was asserted; run the reset sequence at the next boundary.
    res_pending: bool,
    /// Interrupt poll pipeline. The decision committed at an instruction
    /// boundary is the poll result from the penultimate cycle.
    poll_prev: bool,
    poll_now: bool,
}

impl Cpu {
    /// Create a new CPU in the power-on state.
    pub fn new() -> Self {
        Self {
            reg: Registers::new(),
            ir: 0,
            cycles: 0,
            pins: Pins::new(),
            nmi_line: false,
            nmi_latch: false,
            irq_line: false,
            nmi_pending: false,
            irq_pending: false,
            res_pending: false,
            poll_prev: false,
            poll_now: false,
        }
    }

    /// Last pin state driven on the bus.
    pub fn pins(&self) -> Pins {
        self.pins
    }

    /// Hardware reset: run the 8-cycle reset sequence through the bus.
    ///
    /// Three cycles idle on the address bus, three suppressed-push
    /// cycles walk S down to 0xFD (reads, the writes are inhibited),
    /// then PC is loaded from the reset vector. I and X are set in P;
    /// A, X and Y keep their values on a warm reset.
    pub fn reset(&mut self, bus: &mut impl Bus) {
        self.reset_sequence(bus);
    }

    /// Execute a single instruction, or service a pending interrupt or
    /// reset request. Returns the number of bus cycles consumed.
    pub fn step(&mut self, bus: &mut impl Bus) -> u64 {
        let start = self.cycles;

        if self.res_pending {
            self.reset_sequence(bus);
        } else if self.nmi_pending || self.irq_pending {
            self.interrupt(bus);
        } else {
            let opcode = self.fetch_opcode(bus);
            self.ir = opcode;
            opcodes::execute(self, bus, opcode);
        }

        self.commit_poll();
        self.cycles - start
    }

    /// Run whole instructions until at least `budget` cycles have been
    /// consumed. A budget of 0 executes exactly one instruction.
    /// Returns the exact number of cycles consumed.
    pub fn exec(&mut self, bus: &mut impl Bus, budget: u64) -> u64 {
        let start = self.cycles;
        loop {
            self.step(bus);
            if self.cycles - start >= budget {
                break;
            }
        }
        self.cycles - start
    }

    // ---- cycle primitives ----
    //
    // Each of these drives exactly one pin word per emulated cycle.
    // Host-driven line state (IRQ/NMI/RDY/RES, stale data bits) is
    // carried over from the previous returned word.

    /// One read cycle. Re-issues the identical read while the host
    /// holds RDY low; every re-issue is a counted cycle.
    pub(crate) fn read(&mut self, bus: &mut impl Bus, addr: u16) -> u8 {
        self.read_cycle(bus, addr, false)
    }

    fn read_cycle(&mut self, bus: &mut impl Bus, addr: u16, sync: bool) -> u8 {
        loop {
            let mut pins = self.pins;
            pins.set_addr(addr);
            pins.set_read();
            pins.set_sync(sync);
            let out = bus.tick(pins);
            self.cycles += 1;
            self.pins = out;
            self.sample(out);
            if out.rdy() {
                return out.data();
            }
        }
    }

    /// One write cycle. RDY is ignored on writes.
    pub(crate) fn write(&mut self, bus: &mut impl Bus, addr: u16, val: u8) {
        let mut pins = self.pins;
        pins.set_addr(addr);
        pins.set_data(val);
        pins.set_write();
        pins.set_sync(false);
        let out = bus.tick(pins);
        self.cycles += 1;
        self.pins = out;
        self.sample(out);
    }

    /// The opcode-fetch cycle: read at PC with SYNC asserted, then
    /// advance PC.
    fn fetch_opcode(&mut self, bus: &mut impl Bus) -> u8 {
        let val = self.read_cycle(bus, self.reg.pc, true);
        self.reg.pc = self.reg.pc.wrapping_add(1);
        val
    }

    /// Fetch an operand byte from [PC] and advance PC.
    pub(crate) fn fetch_byte(&mut self, bus: &mut impl Bus) -> u8 {
        let val = self.read(bus, self.reg.pc);
        self.reg.pc = self.reg.pc.wrapping_add(1);
        val
    }

    // ---- stack helpers ----

    /// Push a byte: write at `0x0100 | S`, then decrement S.
    pub(crate) fn push(&mut self, bus: &mut impl Bus, val: u8) {
        self.write(bus, 0x0100 | self.reg.s as u16, val);
        self.reg.s = self.reg.s.wrapping_sub(1);
    }

    /// Pull a byte: increment S, then read at `0x0100 | S`.
    pub(crate) fn pull(&mut self, bus: &mut impl Bus) -> u8 {
        self.reg.s = self.reg.s.wrapping_add(1);
        self.read(bus, 0x0100 | self.reg.s as u16)
    }

    // ---- interrupt logic ----

    /// Sample the host-driven lines from a returned pin word and step
    /// the poll pipeline.
    fn sample(&mut self, out: Pins) {
        if out.nmi() && !self.nmi_line {
            self.nmi_latch = true;
        }
        self.nmi_line = out.nmi();
        self.irq_line = out.irq();
        if out.res() {
            self.res_pending = true;
        }
        self.poll_prev = self.poll_now;
        self.poll_now =
            self.nmi_latch || (self.irq_line && !self.reg.p.contains(Status::I));
    }

    /// Commit the poll result observed at the penultimate cycle of the
    /// instruction that just finished. A committed interrupt hijacks
    /// the next opcode fetch.
    fn commit_poll(&mut self) {
        if self.poll_prev {
            if self.nmi_latch {
                self.nmi_latch = false;
                self.nmi_pending = true;
            } else {
                self.irq_pending = true;
            }
        }
    }

    /// Service a committed IRQ or NMI: the 7-cycle BRK sequence with
    /// the opcode fetch hijacked (IR forced to 0x00, PC held) and B
    /// pushed clear. NMI wins when both are pending.
    fn interrupt(&mut self, bus: &mut impl Bus) {
        let nmi = self.nmi_pending;
        self.nmi_pending = false;
        self.irq_pending = false;

        self.read_cycle(bus, self.reg.pc, true);
        self.ir = 0x00;
        self.read(bus, self.reg.pc);
        self.push(bus, (self.reg.pc >> 8) as u8);
        self.push(bus, self.reg.pc as u8);
        self.push(bus, self.reg.p.to_pushed(false));
        self.reg.p.insert(Status::I);
        let vector = if nmi { VEC_NMI } else { VEC_IRQ };
        let lo = self.read(bus, vector) as u16;
        let hi = self.read(bus, vector.wrapping_add(1)) as u16;
        self.reg.pc = (hi << 8) | lo;
        trace!(
            "{} taken, pc={:04X}",
            if nmi { "NMI" } else { "IRQ" },
            self.reg.pc
        );
    }

    /// The 8-cycle reset sequence. S restarts its power-on walk from
    /// 0x00 so it always lands on 0xFD; the three push cycles are
    /// driven as reads (R/W held high).
    fn reset_sequence(&mut self, bus: &mut impl Bus) {
        self.res_pending = false;
        self.pins.set_res(false);
        self.ir = 0;

        self.read(bus, self.reg.pc);
        self.read(bus, self.reg.pc);
        self.read(bus, self.reg.pc);
        self.reg.s = 0x00;
        for _ in 0..3 {
            self.read(bus, 0x0100 | self.reg.s as u16);
            self.reg.s = self.reg.s.wrapping_sub(1);
        }
        self.reg.p.insert(Status::I | Status::X);
        let lo = self.read(bus, VEC_RESET) as u16;
        let hi = self.read(bus, VEC_RESET.wrapping_add(1)) as u16;
        self.reg.pc = (hi << 8) | lo;

        // Pending interrupt state does not survive a reset.
        self.nmi_latch = false;
        self.nmi_pending = false;
        self.irq_pending = false;
        self.res_pending = false;
        self.poll_prev = false;
        self.poll_now = false;
        trace!("reset, pc={:04X}", self.reg.pc);
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Cpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} cyc={}", self.reg, self.cycles)
    }
}

use std::fmt;
