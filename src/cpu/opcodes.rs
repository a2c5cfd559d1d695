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

//! Opcode implementations for the 6502.
//!
//! The opcode has already been fetched (cycle 1, SYNC); each arm
//! issues the remaining architectural cycles of its instruction
//! through the bus. The 6502 has a single opcode page, so the whole
//! instruction set is one exhaustive match.

use tracing::trace;

use crate::addressing::{self, Penalty};
use crate::alu;
use crate::bus::Bus;
use crate::cpu::{Cpu, VEC_IRQ};
use crate::registers::Status;

pub(crate) fn execute(cpu: &mut Cpu, bus: &mut impl Bus, opcode: u8) {
    match opcode {
        // =================================================================
        // Loads
        // =================================================================
        0xA9 => {
            // LDA immediate
            let m = cpu.fetch_byte(bus);
            cpu.reg.a = m;
            cpu.reg.p.set_nz(m);
        }
        0xA5 => {
            // LDA zero page
            let ea = addressing::zp(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.a = m;
            cpu.reg.p.set_nz(m);
        }
        0xB5 => {
            // LDA zero page,X
            let ea = addressing::zp_x(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.a = m;
            cpu.reg.p.set_nz(m);
        }
        0xAD => {
            // LDA absolute
            let ea = addressing::abs(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.a = m;
            cpu.reg.p.set_nz(m);
        }
        0xBD => {
            // LDA absolute,X
            let ea = addressing::abs_x(cpu, bus, Penalty::PageCross);
            let m = cpu.read(bus, ea);
            cpu.reg.a = m;
            cpu.reg.p.set_nz(m);
        }
        0xB9 => {
            // LDA absolute,Y
            let ea = addressing::abs_y(cpu, bus, Penalty::PageCross);
            let m = cpu.read(bus, ea);
            cpu.reg.a = m;
            cpu.reg.p.set_nz(m);
        }
        0xA1 => {
            // LDA (zp,X)
            let ea = addressing::ind_x(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.a = m;
            cpu.reg.p.set_nz(m);
        }
        0xB1 => {
            // LDA (zp),Y
            let ea = addressing::ind_y(cpu, bus, Penalty::PageCross);
            let m = cpu.read(bus, ea);
            cpu.reg.a = m;
            cpu.reg.p.set_nz(m);
        }
        0xA2 => {
            // LDX immediate
            let m = cpu.fetch_byte(bus);
            cpu.reg.x = m;
            cpu.reg.p.set_nz(m);
        }
        0xA6 => {
            // LDX zero page
            let ea = addressing::zp(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.x = m;
            cpu.reg.p.set_nz(m);
        }
        0xB6 => {
            // LDX zero page,Y
            let ea = addressing::zp_y(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.x = m;
            cpu.reg.p.set_nz(m);
        }
        0xAE => {
            // LDX absolute
            let ea = addressing::abs(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.x = m;
            cpu.reg.p.set_nz(m);
        }
        0xBE => {
            // LDX absolute,Y
            let ea = addressing::abs_y(cpu, bus, Penalty::PageCross);
            let m = cpu.read(bus, ea);
            cpu.reg.x = m;
            cpu.reg.p.set_nz(m);
        }
        0xA0 => {
            // LDY immediate
            let m = cpu.fetch_byte(bus);
            cpu.reg.y = m;
            cpu.reg.p.set_nz(m);
        }
        0xA4 => {
            // LDY zero page
            let ea = addressing::zp(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.y = m;
            cpu.reg.p.set_nz(m);
        }
        0xB4 => {
            // LDY zero page,X
            let ea = addressing::zp_x(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.y = m;
            cpu.reg.p.set_nz(m);
        }
        0xAC => {
            // LDY absolute
            let ea = addressing::abs(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.y = m;
            cpu.reg.p.set_nz(m);
        }
        0xBC => {
            // LDY absolute,X
            let ea = addressing::abs_x(cpu, bus, Penalty::PageCross);
            let m = cpu.read(bus, ea);
            cpu.reg.y = m;
            cpu.reg.p.set_nz(m);
        }

        // =================================================================
        // Stores — no flag changes, no page-cross discount
        // =================================================================
        0x85 => {
            // STA zero page
            let ea = addressing::zp(cpu, bus);
            cpu.write(bus, ea, cpu.reg.a);
        }
        0x95 => {
            // STA zero page,X
            let ea = addressing::zp_x(cpu, bus);
            cpu.write(bus, ea, cpu.reg.a);
        }
        0x8D => {
            // STA absolute
            let ea = addressing::abs(cpu, bus);
            cpu.write(bus, ea, cpu.reg.a);
        }
        0x9D => {
            // STA absolute,X
            let ea = addressing::abs_x(cpu, bus, Penalty::Always);
            cpu.write(bus, ea, cpu.reg.a);
        }
        0x99 => {
            // STA absolute,Y
            let ea = addressing::abs_y(cpu, bus, Penalty::Always);
            cpu.write(bus, ea, cpu.reg.a);
        }
        0x81 => {
            // STA (zp,X)
            let ea = addressing::ind_x(cpu, bus);
            cpu.write(bus, ea, cpu.reg.a);
        }
        0x91 => {
            // STA (zp),Y
            let ea = addressing::ind_y(cpu, bus, Penalty::Always);
            cpu.write(bus, ea, cpu.reg.a);
        }
        0x86 => {
            // STX zero page
            let ea = addressing::zp(cpu, bus);
            cpu.write(bus, ea, cpu.reg.x);
        }
        0x96 => {
            // STX zero page,Y
            let ea = addressing::zp_y(cpu, bus);
            cpu.write(bus, ea, cpu.reg.x);
        }
        0x8E => {
            // STX absolute
            let ea = addressing::abs(cpu, bus);
            cpu.write(bus, ea, cpu.reg.x);
        }
        0x84 => {
            // STY zero page
            let ea = addressing::zp(cpu, bus);
            cpu.write(bus, ea, cpu.reg.y);
        }
        0x94 => {
            // STY zero page,X
            let ea = addressing::zp_x(cpu, bus);
            cpu.write(bus, ea, cpu.reg.y);
        }
        0x8C => {
            // STY absolute
            let ea = addressing::abs(cpu, bus);
            cpu.write(bus, ea, cpu.reg.y);
        }

        // =================================================================
        // Register transfers
        // =================================================================
        0xAA => {
            // TAX
            cpu.read(bus, cpu.reg.pc);
            cpu.reg.x = cpu.reg.a;
            cpu.reg.p.set_nz(cpu.reg.x);
        }
        0x8A => {
            // TXA
            cpu.read(bus, cpu.reg.pc);
            cpu.reg.a = cpu.reg.x;
            cpu.reg.p.set_nz(cpu.reg.a);
        }
        0xA8 => {
            // TAY
            cpu.read(bus, cpu.reg.pc);
            cpu.reg.y = cpu.reg.a;
            cpu.reg.p.set_nz(cpu.reg.y);
        }
        0x98 => {
            // TYA
            cpu.read(bus, cpu.reg.pc);
            cpu.reg.a = cpu.reg.y;
            cpu.reg.p.set_nz(cpu.reg.a);
        }
        0xBA => {
            // TSX
            cpu.read(bus, cpu.reg.pc);
            cpu.reg.x = cpu.reg.s;
            cpu.reg.p.set_nz(cpu.reg.x);
        }
        0x9A => {
            // TXS — the one transfer that sets no flags
            cpu.read(bus, cpu.reg.pc);
            cpu.reg.s = cpu.reg.x;
        }

        // =================================================================
        // Stack operations
        // =================================================================
        0x48 => {
            // PHA
            cpu.read(bus, cpu.reg.pc);
            cpu.push(bus, cpu.reg.a);
        }
        0x08 => {
            // PHP — pushes with B and X set
            cpu.read(bus, cpu.reg.pc);
            let p = cpu.reg.p.to_pushed(true);
            cpu.push(bus, p);
        }
        0x68 => {
            // PLA
            cpu.read(bus, cpu.reg.pc);
            cpu.read(bus, 0x0100 | cpu.reg.s as u16);
            let m = cpu.pull(bus);
            cpu.reg.a = m;
            cpu.reg.p.set_nz(m);
        }
        0x28 => {
            // PLP — restores all flags except B, forces X
            cpu.read(bus, cpu.reg.pc);
            cpu.read(bus, 0x0100 | cpu.reg.s as u16);
            let m = cpu.pull(bus);
            cpu.reg.p = cpu.reg.p.from_pulled(m);
        }

        // =================================================================
        // Logic
        // =================================================================
        0x29 => {
            // AND immediate
            let m = cpu.fetch_byte(bus);
            cpu.reg.a = alu::and(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x25 => {
            // AND zero page
            let ea = addressing::zp(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::and(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x35 => {
            // AND zero page,X
            let ea = addressing::zp_x(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::and(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x2D => {
            // AND absolute
            let ea = addressing::abs(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::and(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x3D => {
            // AND absolute,X
            let ea = addressing::abs_x(cpu, bus, Penalty::PageCross);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::and(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x39 => {
            // AND absolute,Y
            let ea = addressing::abs_y(cpu, bus, Penalty::PageCross);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::and(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x21 => {
            // AND (zp,X)
            let ea = addressing::ind_x(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::and(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x31 => {
            // AND (zp),Y
            let ea = addressing::ind_y(cpu, bus, Penalty::PageCross);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::and(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x09 => {
            // ORA immediate
            let m = cpu.fetch_byte(bus);
            cpu.reg.a = alu::ora(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x05 => {
            // ORA zero page
            let ea = addressing::zp(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::ora(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x15 => {
            // ORA zero page,X
            let ea = addressing::zp_x(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::ora(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x0D => {
            // ORA absolute
            let ea = addressing::abs(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::ora(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x1D => {
            // ORA absolute,X
            let ea = addressing::abs_x(cpu, bus, Penalty::PageCross);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::ora(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x19 => {
            // ORA absolute,Y
            let ea = addressing::abs_y(cpu, bus, Penalty::PageCross);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::ora(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x01 => {
            // ORA (zp,X)
            let ea = addressing::ind_x(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::ora(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x11 => {
            // ORA (zp),Y
            let ea = addressing::ind_y(cpu, bus, Penalty::PageCross);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::ora(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x49 => {
            // EOR immediate
            let m = cpu.fetch_byte(bus);
            cpu.reg.a = alu::eor(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x45 => {
            // EOR zero page
            let ea = addressing::zp(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::eor(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x55 => {
            // EOR zero page,X
            let ea = addressing::zp_x(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::eor(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x4D => {
            // EOR absolute
            let ea = addressing::abs(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::eor(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x5D => {
            // EOR absolute,X
            let ea = addressing::abs_x(cpu, bus, Penalty::PageCross);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::eor(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x59 => {
            // EOR absolute,Y
            let ea = addressing::abs_y(cpu, bus, Penalty::PageCross);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::eor(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x41 => {
            // EOR (zp,X)
            let ea = addressing::ind_x(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::eor(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x51 => {
            // EOR (zp),Y
            let ea = addressing::ind_y(cpu, bus, Penalty::PageCross);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::eor(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x24 => {
            // BIT zero page
            let ea = addressing::zp(cpu, bus);
            let m = cpu.read(bus, ea);
            alu::bit(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x2C => {
            // BIT absolute
            let ea = addressing::abs(cpu, bus);
            let m = cpu.read(bus, ea);
            alu::bit(cpu.reg.a, m, &mut cpu.reg.p);
        }

        // =================================================================
        // Arithmetic
        // =================================================================
        0x69 => {
            // ADC immediate
            let m = cpu.fetch_byte(bus);
            cpu.reg.a = alu::adc(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x65 => {
            // ADC zero page
            let ea = addressing::zp(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::adc(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x75 => {
            // ADC zero page,X
            let ea = addressing::zp_x(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::adc(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x6D => {
            // ADC absolute
            let ea = addressing::abs(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::adc(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x7D => {
            // ADC absolute,X
            let ea = addressing::abs_x(cpu, bus, Penalty::PageCross);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::adc(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x79 => {
            // ADC absolute,Y
            let ea = addressing::abs_y(cpu, bus, Penalty::PageCross);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::adc(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x61 => {
            // ADC (zp,X)
            let ea = addressing::ind_x(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::adc(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x71 => {
            // ADC (zp),Y
            let ea = addressing::ind_y(cpu, bus, Penalty::PageCross);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::adc(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0xE9 => {
            // SBC immediate
            let m = cpu.fetch_byte(bus);
            cpu.reg.a = alu::sbc(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0xE5 => {
            // SBC zero page
            let ea = addressing::zp(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::sbc(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0xF5 => {
            // SBC zero page,X
            let ea = addressing::zp_x(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::sbc(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0xED => {
            // SBC absolute
            let ea = addressing::abs(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::sbc(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0xFD => {
            // SBC absolute,X
            let ea = addressing::abs_x(cpu, bus, Penalty::PageCross);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::sbc(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0xF9 => {
            // SBC absolute,Y
            let ea = addressing::abs_y(cpu, bus, Penalty::PageCross);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::sbc(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0xE1 => {
            // SBC (zp,X)
            let ea = addressing::ind_x(cpu, bus);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::sbc(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0xF1 => {
            // SBC (zp),Y
            let ea = addressing::ind_y(cpu, bus, Penalty::PageCross);
            let m = cpu.read(bus, ea);
            cpu.reg.a = alu::sbc(cpu.reg.a, m, &mut cpu.reg.p);
        }

        // =================================================================
        // Compares
        // =================================================================
        0xC9 => {
            // CMP immediate
            let m = cpu.fetch_byte(bus);
            alu::cmp(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0xC5 => {
            // CMP zero page
            let ea = addressing::zp(cpu, bus);
            let m = cpu.read(bus, ea);
            alu::cmp(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0xD5 => {
            // CMP zero page,X
            let ea = addressing::zp_x(cpu, bus);
            let m = cpu.read(bus, ea);
            alu::cmp(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0xCD => {
            // CMP absolute
            let ea = addressing::abs(cpu, bus);
            let m = cpu.read(bus, ea);
            alu::cmp(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0xDD => {
            // CMP absolute,X
            let ea = addressing::abs_x(cpu, bus, Penalty::PageCross);
            let m = cpu.read(bus, ea);
            alu::cmp(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0xD9 => {
            // CMP absolute,Y
            let ea = addressing::abs_y(cpu, bus, Penalty::PageCross);
            let m = cpu.read(bus, ea);
            alu::cmp(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0xC1 => {
            // CMP (zp,X)
            let ea = addressing::ind_x(cpu, bus);
            let m = cpu.read(bus, ea);
            alu::cmp(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0xD1 => {
            // CMP (zp),Y
            let ea = addressing::ind_y(cpu, bus, Penalty::PageCross);
            let m = cpu.read(bus, ea);
            alu::cmp(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0xE0 => {
            // CPX immediate
            let m = cpu.fetch_byte(bus);
            alu::cmp(cpu.reg.x, m, &mut cpu.reg.p);
        }
        0xE4 => {
            // CPX zero page
            let ea = addressing::zp(cpu, bus);
            let m = cpu.read(bus, ea);
            alu::cmp(cpu.reg.x, m, &mut cpu.reg.p);
        }
        0xEC => {
            // CPX absolute
            let ea = addressing::abs(cpu, bus);
            let m = cpu.read(bus, ea);
            alu::cmp(cpu.reg.x, m, &mut cpu.reg.p);
        }
        0xC0 => {
            // CPY immediate
            let m = cpu.fetch_byte(bus);
            alu::cmp(cpu.reg.y, m, &mut cpu.reg.p);
        }
        0xC4 => {
            // CPY zero page
            let ea = addressing::zp(cpu, bus);
            let m = cpu.read(bus, ea);
            alu::cmp(cpu.reg.y, m, &mut cpu.reg.p);
        }
        0xCC => {
            // CPY absolute
            let ea = addressing::abs(cpu, bus);
            let m = cpu.read(bus, ea);
            alu::cmp(cpu.reg.y, m, &mut cpu.reg.p);
        }

        // =================================================================
        // Shifts and rotates
        // =================================================================
        0x0A => {
            // ASL A
            cpu.read(bus, cpu.reg.pc);
            cpu.reg.a = alu::asl(cpu.reg.a, &mut cpu.reg.p);
        }
        0x06 => {
            // ASL zero page
            let ea = addressing::zp(cpu, bus);
            rmw(cpu, bus, ea, alu::asl);
        }
        0x16 => {
            // ASL zero page,X
            let ea = addressing::zp_x(cpu, bus);
            rmw(cpu, bus, ea, alu::asl);
        }
        0x0E => {
            // ASL absolute
            let ea = addressing::abs(cpu, bus);
            rmw(cpu, bus, ea, alu::asl);
        }
        0x1E => {
            // ASL absolute,X
            let ea = addressing::abs_x(cpu, bus, Penalty::Always);
            rmw(cpu, bus, ea, alu::asl);
        }
        0x4A => {
            // LSR A
            cpu.read(bus, cpu.reg.pc);
            cpu.reg.a = alu::lsr(cpu.reg.a, &mut cpu.reg.p);
        }
        0x46 => {
            // LSR zero page
            let ea = addressing::zp(cpu, bus);
            rmw(cpu, bus, ea, alu::lsr);
        }
        0x56 => {
            // LSR zero page,X
            let ea = addressing::zp_x(cpu, bus);
            rmw(cpu, bus, ea, alu::lsr);
        }
        0x4E => {
            // LSR absolute
            let ea = addressing::abs(cpu, bus);
            rmw(cpu, bus, ea, alu::lsr);
        }
        0x5E => {
            // LSR absolute,X
            let ea = addressing::abs_x(cpu, bus, Penalty::Always);
            rmw(cpu, bus, ea, alu::lsr);
        }
        0x2A => {
            // ROL A
            cpu.read(bus, cpu.reg.pc);
            cpu.reg.a = alu::rol(cpu.reg.a, &mut cpu.reg.p);
        }
        0x26 => {
            // ROL zero page
            let ea = addressing::zp(cpu, bus);
            rmw(cpu, bus, ea, alu::rol);
        }
        0x36 => {
            // ROL zero page,X
            let ea = addressing::zp_x(cpu, bus);
            rmw(cpu, bus, ea, alu::rol);
        }
        0x2E => {
            // ROL absolute
            let ea = addressing::abs(cpu, bus);
            rmw(cpu, bus, ea, alu::rol);
        }
        0x3E => {
            // ROL absolute,X
            let ea = addressing::abs_x(cpu, bus, Penalty::Always);
            rmw(cpu, bus, ea, alu::rol);
        }
        0x6A => {
            // ROR A
            cpu.read(bus, cpu.reg.pc);
            cpu.reg.a = alu::ror(cpu.reg.a, &mut cpu.reg.p);
        }
        0x66 => {
            // ROR zero page
            let ea = addressing::zp(cpu, bus);
            rmw(cpu, bus, ea, alu::ror);
        }
        0x76 => {
            // ROR zero page,X
            let ea = addressing::zp_x(cpu, bus);
            rmw(cpu, bus, ea, alu::ror);
        }
        0x6E => {
            // ROR absolute
            let ea = addressing::abs(cpu, bus);
            rmw(cpu, bus, ea, alu::ror);
        }
        0x7E => {
            // ROR absolute,X
            let ea = addressing::abs_x(cpu, bus, Penalty::Always);
            rmw(cpu, bus, ea, alu::ror);
        }

        // =================================================================
        // Increment / decrement
        // =================================================================
        0xE6 => {
            // INC zero page
            let ea = addressing::zp(cpu, bus);
            rmw(cpu, bus, ea, alu::inc);
        }
        0xF6 => {
            // INC zero page,X
            let ea = addressing::zp_x(cpu, bus);
            rmw(cpu, bus, ea, alu::inc);
        }
        0xEE => {
            // INC absolute
            let ea = addressing::abs(cpu, bus);
            rmw(cpu, bus, ea, alu::inc);
        }
        0xFE => {
            // INC absolute,X
            let ea = addressing::abs_x(cpu, bus, Penalty::Always);
            rmw(cpu, bus, ea, alu::inc);
        }
        0xC6 => {
            // DEC zero page
            let ea = addressing::zp(cpu, bus);
            rmw(cpu, bus, ea, alu::dec);
        }
        0xD6 => {
            // DEC zero page,X
            let ea = addressing::zp_x(cpu, bus);
            rmw(cpu, bus, ea, alu::dec);
        }
        0xCE => {
            // DEC absolute
            let ea = addressing::abs(cpu, bus);
            rmw(cpu, bus, ea, alu::dec);
        }
        0xDE => {
            // DEC absolute,X
            let ea = addressing::abs_x(cpu, bus, Penalty::Always);
            rmw(cpu, bus, ea, alu::dec);
        }
        0xE8 => {
            // INX
            cpu.read(bus, cpu.reg.pc);
            cpu.reg.x = alu::inc(cpu.reg.x, &mut cpu.reg.p);
        }
        0xCA => {
            // DEX
            cpu.read(bus, cpu.reg.pc);
            cpu.reg.x = alu::dec(cpu.reg.x, &mut cpu.reg.p);
        }
        0xC8 => {
            // INY
            cpu.read(bus, cpu.reg.pc);
            cpu.reg.y = alu::inc(cpu.reg.y, &mut cpu.reg.p);
        }
        0x88 => {
            // DEY
            cpu.read(bus, cpu.reg.pc);
            cpu.reg.y = alu::dec(cpu.reg.y, &mut cpu.reg.p);
        }

        // =================================================================
        // Flag operations
        // =================================================================
        0x18 => {
            // CLC
            cpu.read(bus, cpu.reg.pc);
            cpu.reg.p.remove(Status::C);
        }
        0x38 => {
            // SEC
            cpu.read(bus, cpu.reg.pc);
            cpu.reg.p.insert(Status::C);
        }
        0x58 => {
            // CLI
            cpu.read(bus, cpu.reg.pc);
            cpu.reg.p.remove(Status::I);
        }
        0x78 => {
            // SEI
            cpu.read(bus, cpu.reg.pc);
            cpu.reg.p.insert(Status::I);
        }
        0xB8 => {
            // CLV
            cpu.read(bus, cpu.reg.pc);
            cpu.reg.p.remove(Status::V);
        }
        0xD8 => {
            // CLD
            cpu.read(bus, cpu.reg.pc);
            cpu.reg.p.remove(Status::D);
        }
        0xF8 => {
            // SED
            cpu.read(bus, cpu.reg.pc);
            cpu.reg.p.insert(Status::D);
        }

        // =================================================================
        // Branches
        // =================================================================
        0x10 => {
            // BPL
            let taken = !cpu.reg.p.contains(Status::N);
            branch(cpu, bus, taken);
        }
        0x30 => {
            // BMI
            let taken = cpu.reg.p.contains(Status::N);
            branch(cpu, bus, taken);
        }
        0x50 => {
            // BVC
            let taken = !cpu.reg.p.contains(Status::V);
            branch(cpu, bus, taken);
        }
        0x70 => {
            // BVS
            let taken = cpu.reg.p.contains(Status::V);
            branch(cpu, bus, taken);
        }
        0x90 => {
            // BCC
            let taken = !cpu.reg.p.contains(Status::C);
            branch(cpu, bus, taken);
        }
        0xB0 => {
            // BCS
            let taken = cpu.reg.p.contains(Status::C);
            branch(cpu, bus, taken);
        }
        0xD0 => {
            // BNE
            let taken = !cpu.reg.p.contains(Status::Z);
            branch(cpu, bus, taken);
        }
        0xF0 => {
            // BEQ
            let taken = cpu.reg.p.contains(Status::Z);
            branch(cpu, bus, taken);
        }

        // =================================================================
        // Jumps and subroutines
        // =================================================================
        0x4C => {
            // JMP absolute
            cpu.reg.pc = addressing::abs(cpu, bus);
        }
        0x6C => {
            // JMP (ind) — with the page-wrap bug
            cpu.reg.pc = addressing::ind_jmp(cpu, bus);
        }
        0x20 => {
            // JSR — pushes the address of its own last byte
            let lo = cpu.fetch_byte(bus) as u16;
            cpu.read(bus, 0x0100 | cpu.reg.s as u16);
            cpu.push(bus, (cpu.reg.pc >> 8) as u8);
            cpu.push(bus, cpu.reg.pc as u8);
            let hi = cpu.fetch_byte(bus) as u16;
            cpu.reg.pc = (hi << 8) | lo;
        }
        0x60 => {
            // RTS — pulls PC and resumes after it
            cpu.read(bus, cpu.reg.pc);
            cpu.read(bus, 0x0100 | cpu.reg.s as u16);
            let lo = cpu.pull(bus) as u16;
            let hi = cpu.pull(bus) as u16;
            cpu.reg.pc = (hi << 8) | lo;
            cpu.read(bus, cpu.reg.pc);
            cpu.reg.pc = cpu.reg.pc.wrapping_add(1);
        }
        0x40 => {
            // RTI — pulls P then PC, no increment
            cpu.read(bus, cpu.reg.pc);
            cpu.read(bus, 0x0100 | cpu.reg.s as u16);
            let p = cpu.pull(bus);
            cpu.reg.p = cpu.reg.p.from_pulled(p);
            let lo = cpu.pull(bus) as u16;
            let hi = cpu.pull(bus) as u16;
            cpu.reg.pc = (hi << 8) | lo;
        }

        // =================================================================
        // Misc
        // =================================================================
        0xEA => {
            // NOP
            cpu.read(bus, cpu.reg.pc);
        }
        0x00 => {
            // BRK — pushes PC past the padding byte, P with B set, then
            // vectors through 0xFFFE
            cpu.fetch_byte(bus);
            cpu.push(bus, (cpu.reg.pc >> 8) as u8);
            cpu.push(bus, cpu.reg.pc as u8);
            let p = cpu.reg.p.to_pushed(true);
            cpu.push(bus, p);
            cpu.reg.p.insert(Status::I);
            let lo = cpu.read(bus, VEC_IRQ) as u16;
            let hi = cpu.read(bus, VEC_IRQ.wrapping_add(1)) as u16;
            cpu.reg.pc = (hi << 8) | lo;
        }

        // =================================================================
        // Undocumented opcodes — the stable NOP family executes with
        // its real addressing behavior; everything else falls through
        // to a 2-cycle NOP.
        // =================================================================
        0xEB => {
            // SBC immediate (mirror of 0xE9)
            let m = cpu.fetch_byte(bus);
            cpu.reg.a = alu::sbc(cpu.reg.a, m, &mut cpu.reg.p);
        }
        0x1A | 0x3A | 0x5A | 0x7A | 0xDA | 0xFA => {
            // NOP implied
            cpu.read(bus, cpu.reg.pc);
        }
        0x80 | 0x82 | 0x89 | 0xC2 | 0xE2 => {
            // NOP immediate
            cpu.fetch_byte(bus);
        }
        0x04 | 0x44 | 0x64 => {
            // NOP zero page
            let ea = addressing::zp(cpu, bus);
            cpu.read(bus, ea);
        }
        0x14 | 0x34 | 0x54 | 0x74 | 0xD4 | 0xF4 => {
            // NOP zero page,X
            let ea = addressing::zp_x(cpu, bus);
            cpu.read(bus, ea);
        }
        0x0C => {
            // NOP absolute
            let ea = addressing::abs(cpu, bus);
            cpu.read(bus, ea);
        }
        0x1C | 0x3C | 0x5C | 0x7C | 0xDC | 0xFC => {
            // NOP absolute,X
            let ea = addressing::abs_x(cpu, bus, Penalty::PageCross);
            cpu.read(bus, ea);
        }
        _ => {
            trace!(
                "illegal opcode {:02X} at {:04X}",
                opcode,
                cpu.reg.pc.wrapping_sub(1)
            );
            cpu.read(bus, cpu.reg.pc);
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Conditional branch. 2 cycles not taken; +1 taken; +1 more when the
/// target lies on a different page than the instruction after the
/// branch. The extra cycles are dummy reads, the second at the target
/// address before the page carry has propagated.
fn branch(cpu: &mut Cpu, bus: &mut impl Bus, taken: bool) {
    let offset = cpu.fetch_byte(bus) as i8 as i16 as u16;
    if taken {
        cpu.read(bus, cpu.reg.pc);
        let target = cpu.reg.pc.wrapping_add(offset);
        if target & 0xFF00 != cpu.reg.pc & 0xFF00 {
            cpu.read(bus, (cpu.reg.pc & 0xFF00) | (target & 0x00FF));
        }
        cpu.reg.pc = target;
    }
}

/// Read-modify-write bus pattern: read the old value, write it back
/// unchanged, then write the new value. All three accesses hit EA.
fn rmw(cpu: &mut Cpu, bus: &mut impl Bus, ea: u16, op: fn(u8, &mut Status) -> u8) {
    let old = cpu.read(bus, ea);
    cpu.write(bus, ea, old);
    let new = op(old, &mut cpu.reg.p);
    cpu.write(bus, ea, new);
}
