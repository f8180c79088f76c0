/* Copyright (C) 2022 Antmicro
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     https://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! The scan chain shifted into the chip: one bit per `PROBE<n>` register.

use bitvec::prelude::*;

use crate::chip_data::{SizingRegisters, SwitchMatrix};
use crate::circuit::{Circuit, Sizes};
use crate::common::{ProbeValues, SCAN_CHAIN_LENGTH};
use crate::error::Result;
#[allow(unused)]
use crate::log::*;
use crate::netlist::read_probe_values;
use crate::sizing::sizing_probe_values;
use crate::switch_matrix::resolve_switch_matrix;

/// Register levels addressed by probe number, `1 ..= len()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanChain {
    /* bits[n - 1] holds PROBE<n> */
    bits: BitVec,
    /// Number of register assignments the chain was built from, including
    /// ones that fell outside of it.
    assigned: usize,
}

impl ScanChain {
    pub fn new(len: usize) -> Self {
        Self { bits: bitvec![0; len], assigned: 0 }
    }

    /// Builds a chain from register levels. Registers outside `1 ..= len`
    /// don't exist on the chip and are dropped.
    pub fn from_probe_values(len: usize, values: &ProbeValues) -> Self {
        let mut chain = Self::new(len);
        for (&probe, &level) in values {
            if !chain.set(probe, level) {
                dbg_log!(DBG_INFO, "PROBE<{}> is outside of the scan chain, ignoring", probe);
            }
        }
        chain.assigned = values.len();
        chain
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn assigned(&self) -> usize {
        self.assigned
    }

    fn index(&self, probe: u32) -> Option<usize> {
        let probe = probe as usize;
        if probe >= 1 && probe <= self.bits.len() {
            Some(probe - 1)
        } else {
            None
        }
    }

    /// Sets `PROBE<probe>`. Returns `false` if the chain has no such register.
    pub fn set(&mut self, probe: u32, level: bool) -> bool {
        match self.index(probe) {
            Some(idx) => {
                self.bits.set(idx, level);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, probe: u32) -> Option<bool> {
        self.index(probe).map(|idx| self.bits[idx])
    }

    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    /// Levels in shift order: `PROBE<len>` first, `PROBE<1>` last.
    pub fn shift_order(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().by_vals().rev()
    }

    /// One `0`/`1` per line, in shift order.
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity(self.len() * 2);
        for level in self.shift_order() {
            text.push(if level { '1' } else { '0' });
            text.push('\n');
        }
        text
    }
}

/// Merges two sets of register levels. On a shared register `winner` decides.
pub fn merge_probe_values(loser: ProbeValues, winner: ProbeValues) -> ProbeValues {
    let mut merged = loser;
    merged.extend(winner);
    merged
}

/// Scan chain programming both the device sizes and the switch matrix.
/// Where both drive a register the switch matrix takes precedence.
pub fn generate_scan_chain(
    sizing: &SizingRegisters,
    matrix: &SwitchMatrix,
    circuit: &Circuit,
    sizes: &Sizes,
    diag: &mut Diagnostics
) -> Result<ScanChain> {
    let sizing_values = sizing_probe_values(sizing, sizes, diag);
    let switch_values = resolve_switch_matrix(matrix, circuit, diag)?.probe_values();
    dbg_log!(
        DBG_INFO,
        "{} sizing registers, {} switch matrix registers",
        sizing_values.len(),
        switch_values.len()
    );

    let all = merge_probe_values(sizing_values, switch_values);
    Ok(ScanChain::from_probe_values(SCAN_CHAIN_LENGTH, &all))
}

/// Scan chain recovered from a previously generated switch matrix netlist
/// and sizes netlist. Where both drive a register the sizes netlist takes
/// precedence.
pub fn combine_probe_netlists(sw_matrix_netlist: &str, sizes_netlist: &str) -> ScanChain {
    let sw_values = read_probe_values(sw_matrix_netlist);
    let size_values = read_probe_values(sizes_netlist);
    dbg_log!(
        DBG_INFO,
        "Extracted {} switch matrix and {} sizing probe values",
        sw_values.len(),
        size_values.len()
    );

    let all = merge_probe_values(sw_values, size_values);
    ScanChain::from_probe_values(SCAN_CHAIN_LENGTH, &all)
}
