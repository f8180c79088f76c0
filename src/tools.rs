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

//! File-to-file drivers behind each subcommand: load the inputs, run the
//! conversion, write the output.

use std::path::{Path, PathBuf};

use crate::chip_data::{ChipDataDir, SubcktTemplate};
use crate::circuit::{Circuit, Sizes};
use crate::error::Result;
use crate::exporter::FileExporter;
use crate::loader::{self, OpenOpts};
#[allow(unused)]
use crate::log::*;
use crate::netlist::{self, Header, Timestamp};
use crate::scan_chain::{self, ScanChain};
use crate::switch_matrix::resolve_switch_matrix;

#[derive(Clone, Debug)]
pub struct ToolOpts {
    pub open: OpenOpts,
    pub timestamp: Timestamp,
}

impl Default for ToolOpts {
    fn default() -> Self {
        Self { open: OpenOpts::default(), timestamp: Timestamp::Now }
    }
}

#[derive(Debug)]
pub struct Outcome {
    pub output: PathBuf,
    pub diagnostics: Diagnostics,
    /// For scan chains: how many registers the inputs assigned.
    pub registers_set: Option<usize>,
}

fn header(source: &Path, opts: &ToolOpts) -> Header {
    Header::new(source.display(), &opts.timestamp)
}

fn write_netlist(output: &Path, text: &str, diagnostics: Diagnostics) -> Result<Outcome> {
    let exporter = FileExporter::new(output);
    exporter.export(text)?;
    Ok(Outcome { output: output.to_path_buf(), diagnostics, registers_set: None })
}

pub fn sizes_subckt(
    chip: &ChipDataDir,
    sizes_path: &Path,
    output: &Path,
    opts: &ToolOpts
) -> Result<Outcome> {
    let registers = chip.sizing_registers()?;
    let template = chip.template(SubcktTemplate::Sizes)?;
    let sizes: Sizes = loader::open_document(sizes_path, opts.open)?;
    let mut diag = Diagnostics::new();

    let text = netlist::sizes_subckt(
        &registers, &sizes, &template, &header(sizes_path, opts), &mut diag
    );
    write_netlist(output, &text, diag)
}

pub fn pins_subckt(
    chip: &ChipDataDir,
    circuit_path: &Path,
    output: &Path,
    opts: &ToolOpts
) -> Result<Outcome> {
    let pins = chip.pin_numbers()?;
    let template = chip.template(SubcktTemplate::PinsToBuses)?;
    let circuit: Circuit = loader::open_document(circuit_path, opts.open)?;
    let mut diag = Diagnostics::new();

    let text = netlist::pins_subckt(
        &pins, &circuit, &template, &header(circuit_path, opts), &mut diag
    )?;
    write_netlist(output, &text, diag)
}

pub fn switch_matrix_subckt(
    chip: &ChipDataDir,
    circuit_path: &Path,
    output: &Path,
    opts: &ToolOpts
) -> Result<Outcome> {
    let matrix = chip.switch_matrix()?;
    let template = chip.template(SubcktTemplate::SwitchMatrix)?;
    let circuit: Circuit = loader::open_document(circuit_path, opts.open)?;
    let mut diag = Diagnostics::new();

    let settings = resolve_switch_matrix(&matrix, &circuit, &mut diag)?;
    let text = netlist::switch_matrix_subckt(&settings, &template, &header(circuit_path, opts));
    write_netlist(output, &text, diag)
}

pub fn nodes_subckt(
    chip: &ChipDataDir,
    circuit_path: &Path,
    output: &Path,
    opts: &ToolOpts
) -> Result<Outcome> {
    let pins = chip.pin_numbers()?;
    let template = chip.template(SubcktTemplate::Nodes)?;
    let circuit: Circuit = loader::open_document(circuit_path, opts.open)?;
    let mut diag = Diagnostics::new();

    let text = netlist::nodes_subckt(
        &pins, &circuit, &template, &header(circuit_path, opts), &mut diag
    )?;
    write_netlist(output, &text, diag)
}

pub fn scan_chain_input(
    chip: &ChipDataDir,
    circuit_path: &Path,
    sizes_path: &Path,
    output: &Path,
    opts: &ToolOpts
) -> Result<Outcome> {
    let sizing = chip.sizing_registers()?;
    let matrix = chip.switch_matrix()?;
    let circuit: Circuit = loader::open_document(circuit_path, opts.open)?;
    let sizes: Sizes = loader::open_document(sizes_path, opts.open)?;
    let mut diag = Diagnostics::new();

    let chain = scan_chain::generate_scan_chain(&sizing, &matrix, &circuit, &sizes, &mut diag)?;
    FileExporter::new(output).export(&chain)?;

    Ok(Outcome {
        output: output.to_path_buf(),
        diagnostics: diag,
        registers_set: Some(chain.assigned()),
    })
}

fn probe_range(chain: &ScanChain, probes: impl Iterator<Item = u32>) -> String {
    probes
        .map(|p| format!("PROBE<{}>={}", p, chain.get(p).map_or('?', |b| if b { '1' } else { '0' })))
        .collect::<Vec<_>>()
        .join(" ")
}

/* Both ends of the chain, in shift order */
fn log_chain_ends(chain: &ScanChain) {
    let len = chain.len() as u32;
    let head = probe_range(chain, (len.saturating_sub(8) ..= len).rev());
    let tail = probe_range(chain, (1 ..= 8.min(len)).rev());
    dbg_log!(DBG_INFO, "First values: {}", head);
    dbg_log!(DBG_INFO, "Last values: {}", tail);
}

/// Needs no chip data: everything comes from the two netlists.
pub fn combine_probes(
    sw_matrix_path: &Path,
    sizes_path: &Path,
    output: &Path,
    opts: &ToolOpts
) -> Result<Outcome> {
    let sw_matrix = loader::read_text(sw_matrix_path, opts.open)?;
    let sizes = loader::read_text(sizes_path, opts.open)?;

    let chain = scan_chain::combine_probe_netlists(&sw_matrix, &sizes);
    log_chain_ends(&chain);
    FileExporter::new(output).export(&chain)?;

    Ok(Outcome {
        output: output.to_path_buf(),
        diagnostics: Diagnostics::new(),
        registers_set: Some(chain.assigned()),
    })
}
