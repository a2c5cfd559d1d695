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

use crate::pins::Pins;

/// Memory bus trait for the 6502 CPU.
///
/// The CPU calls [`tick`](Bus::tick) exactly once per emulated bus
/// cycle, handing over the pin word it drives for that cycle. The host
/// resolves the access and returns the (possibly updated) pin word:
///
/// - on read cycles ([`Pins::is_read`]) it must place the byte at the
///   addressed location on the data lines;
/// - on write cycles it must latch the data lines at the addressed
///   location;
/// - it may assert or release IRQ, NMI, RES and RDY on the returned
///   word. A host that leaves those bits untouched keeps the CPU
///   running uninterrupted.
///
/// Returning RDY cleared on a read cycle makes the CPU re-issue the
/// identical read on the next cycle until RDY is set again; write
/// cycles ignore RDY. The CPU must not be re-entered from inside
/// `tick`.
pub trait Bus {
    /// Resolve one bus cycle and return the resulting pin state.
    fn tick(&mut self, pins: Pins) -> Pins;
}

/// Any `FnMut(Pins) -> Pins` closure is a valid bus, which keeps
/// single-purpose hosts (flat RAM, test fixtures) to a one-liner.
impl<F: FnMut(Pins) -> Pins> Bus for F {
    fn tick(&mut self, pins: Pins) -> Pins {
        self(pins)
    }
}
