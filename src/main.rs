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

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use mosbius::chip_data::ChipDataDir;
use mosbius::dbg_log;
use mosbius::error::Error;
use mosbius::loader::OpenOpts;
#[allow(unused)]
use mosbius::log::*;
use mosbius::netlist::Timestamp;
use mosbius::tools::{self, Outcome, ToolOpts};

#[derive(Parser, Debug)]
#[command(
    author = "Antmicro",
    version,
    about = "MOSbius chip configuration tools: SPICE subcircuits and scan chains from JSON descriptions",
    long_about = None
)]
struct Args {
    #[arg(
        long,
        global = true,
        env = "MOSBIUS_CHIP_DATA",
        help = "Directory with the chip lookup tables and subcircuit templates"
    )]
    chip_data: Option<PathBuf>,
    #[arg(long, global = true, help = "Never try to decompress gzipped inputs")]
    raw: bool,
    #[arg(long, global = true, help = "Leave the creation time out of generated netlists")]
    no_timestamp: bool,
    #[arg(short, long, global = true, action = ArgAction::Count, help = "Log more (repeatable)")]
    verbose: u8,
    #[command(subcommand)]
    command: SubCommands,
}

#[derive(Parser, Debug)]
struct SizesSubcktCmd {
    #[arg(help = "JSON file with device sizes")]
    sizes: PathBuf,
    #[arg(help = "Output SPICE netlist")]
    output: PathBuf,
}

#[derive(Parser, Debug)]
struct CircuitSubcktCmd {
    #[arg(help = "Circuit description JSON file")]
    circuit: PathBuf,
    #[arg(help = "Output SPICE netlist")]
    output: PathBuf,
}

#[derive(Parser, Debug)]
struct ScanChainCmd {
    #[arg(help = "Circuit description JSON file")]
    circuit: PathBuf,
    #[arg(help = "JSON file with device sizes")]
    sizes: PathBuf,
    #[arg(help = "Output text file, one bit per line from PROBE<2008> to PROBE<1>")]
    output: PathBuf,
}

#[derive(Parser, Debug)]
struct CombineProbesCmd {
    #[arg(help = "Switch matrix SPICE netlist (.cir)")]
    sw_matrix: PathBuf,
    #[arg(help = "Device sizes SPICE netlist (.cir)")]
    sizes: PathBuf,
    #[arg(help = "Output text file, one bit per line from PROBE<2008> to PROBE<1>")]
    output: PathBuf,
}

#[derive(Subcommand, Debug)]
enum SubCommands {
    /// Subcircuit tying the device sizing registers to VDD/VSS
    SizesSubckt(SizesSubcktCmd),
    /// Subcircuit connecting routing and switched buses to package pins
    PinsSubckt(CircuitSubcktCmd),
    /// Subcircuit programming the switch matrix registers
    SwitchMatrixSubckt(CircuitSubcktCmd),
    /// Subcircuit shorting pins to supplies and external nodes
    NodesSubckt(CircuitSubcktCmd),
    /// Scan chain bits for both the switch matrix and the device sizes
    ScanChain(ScanChainCmd),
    /// Scan chain bits read back from generated switch matrix and sizes netlists
    CombineProbes(CombineProbesCmd),
}

fn run(args: Args) -> Result<Outcome, Error> {
    let opts = ToolOpts {
        open: OpenOpts { raw: args.raw },
        timestamp: Timestamp::from_env(args.no_timestamp),
    };
    let chip = || ChipDataDir::locate(args.chip_data.as_deref(), opts.open);

    match args.command {
        SubCommands::SizesSubckt(c) =>
            tools::sizes_subckt(&chip()?, &c.sizes, &c.output, &opts),
        SubCommands::PinsSubckt(c) =>
            tools::pins_subckt(&chip()?, &c.circuit, &c.output, &opts),
        SubCommands::SwitchMatrixSubckt(c) =>
            tools::switch_matrix_subckt(&chip()?, &c.circuit, &c.output, &opts),
        SubCommands::NodesSubckt(c) =>
            tools::nodes_subckt(&chip()?, &c.circuit, &c.output, &opts),
        SubCommands::ScanChain(c) =>
            tools::scan_chain_input(&chip()?, &c.circuit, &c.sizes, &c.output, &opts),
        SubCommands::CombineProbes(c) =>
            tools::combine_probes(&c.sw_matrix, &c.sizes, &c.output, &opts),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    raise_log_level(args.verbose as usize);

    match run(args) {
        Ok(outcome) => {
            println!("Output written to {}", outcome.output.display());
            if let Some(count) = outcome.registers_set {
                println!("Total registers set: {}", count);
            }
            let warnings = outcome.diagnostics.warnings().len();
            if warnings != 0 {
                println!("{} warning(s), see above", warnings);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            dbg_log!(DBG_CRITICAL, "{}", e);
            ExitCode::FAILURE
        }
    }
}
