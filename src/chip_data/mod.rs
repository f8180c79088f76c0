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

//! Static lookup tables describing the chip: which scan-chain registers size
//! each device, which package pin carries each signal, and which registers
//! close each switch of the switch matrix.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::common::{parse_u32, TableNumber};
use crate::error::{Error, Result};
use crate::loader::{self, OpenOpts};
#[allow(unused)]
use crate::log::*;

pub const CHIP_DATA_DIR_NAME: &str = "chip_config_data";
pub const TEMPLATES_DIR_NAME: &str = "subckt_templates";

pub const SIZING_REGISTERS_FILE: &str = "device_name_to_sizing_registers.json";
pub const PIN_NUMBERS_FILE: &str = "pin_name_to_number.json";
pub const SWITCH_MATRIX_PINS_FILE: &str = "pin_name_to_sw_matrix_pin_number.json";
pub const SWITCH_MATRIX_REGISTERS_FILE: &str = "switch_matrix_register_map.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubcktTemplate {
    Sizes,
    PinsToBuses,
    SwitchMatrix,
    Nodes,
}

impl SubcktTemplate {
    pub fn file_name(self) -> &'static str {
        match self {
            SubcktTemplate::Sizes => "PK_set_sizes_template.cir",
            SubcktTemplate::PinsToBuses => "PK_pins_to_RBUS_SWBUS_template.cir",
            SubcktTemplate::SwitchMatrix => "PK_set_SWMATRIX_template.cir",
            SubcktTemplate::Nodes => "PK_NODE_external_connections_template.cir",
        }
    }
}

/// Device name -> sizing registers, one per bit of the 5-bit size.
#[derive(Debug, Clone, Default)]
pub struct SizingRegisters {
    devices: IndexMap<String, Vec<SizingBit>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizingBit {
    /// Weight of the bit in the size word (1, 2, 4, 8 or 16).
    pub weight: u32,
    pub register: u32,
}

impl SizingRegisters {
    /// Devices in table order. Bits of every device are sorted by weight.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SizingBit])> {
        self.devices.iter().map(|(dev, bits)| (dev.as_str(), bits.as_slice()))
    }

    pub fn get(&self, device: &str) -> Option<&[SizingBit]> {
        self.devices.get(device).map(|bits| bits.as_slice())
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl<'de> Deserialize<'de> for SizingRegisters {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error> where
        D: Deserializer<'de>
    {
        use serde::de::Error as _;

        let raw = IndexMap::<String, IndexMap<String, TableNumber>>::deserialize(deserializer)?;
        let mut devices = IndexMap::with_capacity(raw.len());
        for (device, bits) in raw {
            let mut bits = bits.into_iter()
                .map(|(weight, register)| match parse_u32(&weight) {
                    Some(weight) => Ok(SizingBit { weight, register: register.0 }),
                    None => Err(D::Error::custom(format!(
                        "bit weight \"{}\" of device {} is not a number", weight, device
                    ))),
                })
                .collect::<std::result::Result<Vec<_>, _>>()?;
            bits.sort_by_key(|bit| bit.weight);
            devices.insert(device, bits);
        }
        Ok(Self { devices })
    }
}

/// Pin name -> number, used both for package pins and switch-matrix pins.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct PinNumbers {
    pins: IndexMap<String, TableNumber>,
}

impl PinNumbers {
    pub fn get(&self, pin: &str) -> Option<u32> {
        self.pins.get(pin).map(|n| n.0)
    }
}

/* Switch-matrix pins are usually numbers, but some are named. Numbers are
 * normalized to their decimal spelling, which is how the register map is keyed. */
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatrixPin(pub String);

impl<'de> Deserialize<'de> for MatrixPin {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error> where
        D: Deserializer<'de>
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(u64),
            Float(f64),
            Str(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(i) => Ok(MatrixPin(i.to_string())),
            Raw::Float(f) if f.fract() == 0.0 && f >= 0.0 => Ok(MatrixPin((f as u64).to_string())),
            Raw::Float(f) => Err(serde::de::Error::custom(format!(
                "switch matrix pin {} is not an integer", f
            ))),
            Raw::Str(s) => Ok(MatrixPin(s)),
        }
    }
}

impl std::fmt::Display for MatrixPin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct SwitchMatrixPins {
    pins: IndexMap<String, MatrixPin>,
}

impl SwitchMatrixPins {
    pub fn get(&self, pin: &str) -> Option<&MatrixPin> {
        self.pins.get(pin)
    }
}

/// Switch-matrix pin -> bus switch name (`RBUS3`, `SBUS2a`, ...) -> register.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct SwitchMatrixRegisters {
    map: IndexMap<String, IndexMap<String, TableNumber>>,
}

impl SwitchMatrixRegisters {
    pub fn get(&self, pin: &MatrixPin, switch: &str) -> Option<u32> {
        self.map.get(&pin.0)
            .and_then(|switches| switches.get(switch))
            .map(|n| n.0)
    }
}

/// Tables needed to resolve bus connections through the switch matrix.
#[derive(Debug, Clone, Default)]
pub struct SwitchMatrix {
    pub pins: SwitchMatrixPins,
    pub registers: SwitchMatrixRegisters,
}

/// Location of the chip data. Tables are loaded on demand so every tool only
/// reads (and requires) the files it actually uses.
#[derive(Debug, Clone)]
pub struct ChipDataDir {
    root: PathBuf,
    opts: OpenOpts,
}

impl ChipDataDir {
    pub fn open<P>(root: P, opts: OpenOpts) -> Result<Self> where
        P: AsRef<Path>
    {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(Error::MissingChipData(root));
        }
        dbg_log!(DBG_INFO, "Using chip data from {}", root.display());
        Ok(Self { root, opts })
    }

    /// Picks the chip data directory: an explicit path wins, then
    /// `chip_config_data` next to the executable, then in the working directory.
    pub fn locate(explicit: Option<&Path>, opts: OpenOpts) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::open(path, opts);
        }

        let beside_exe = std::env::current_exe().ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(CHIP_DATA_DIR_NAME)));
        let candidates = beside_exe.into_iter()
            .chain(std::iter::once(PathBuf::from(CHIP_DATA_DIR_NAME)));
        Self::first_existing(candidates, opts)
    }

    /// Opens the first candidate that is a directory. When none is, the last
    /// one tried is reported as missing.
    fn first_existing<I>(candidates: I, opts: OpenOpts) -> Result<Self> where
        I: IntoIterator<Item = PathBuf>
    {
        let mut tried = None;
        for dir in candidates {
            if dir.is_dir() {
                return Self::open(dir, opts);
            }
            dbg_log!(DBG_EXTRA, "No chip data at {}", dir.display());
            tried = Some(dir);
        }
        Err(Error::MissingChipData(tried.unwrap_or_else(|| PathBuf::from(CHIP_DATA_DIR_NAME))))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn table_path(&self, file: &str) -> PathBuf {
        let path = self.root.join(file);
        dbg_log!(DBG_INFO, "Looking for {} at: {}", file, path.display());
        path
    }

    pub fn sizing_registers(&self) -> Result<SizingRegisters> {
        loader::open_document(self.table_path(SIZING_REGISTERS_FILE), self.opts)
    }

    pub fn pin_numbers(&self) -> Result<PinNumbers> {
        loader::open_document(self.table_path(PIN_NUMBERS_FILE), self.opts)
    }

    pub fn switch_matrix(&self) -> Result<SwitchMatrix> {
        Ok(SwitchMatrix {
            pins: loader::open_document(self.table_path(SWITCH_MATRIX_PINS_FILE), self.opts)?,
            registers: loader::open_document(
                self.table_path(SWITCH_MATRIX_REGISTERS_FILE),
                self.opts
            )?,
        })
    }

    pub fn template(&self, which: SubcktTemplate) -> Result<String> {
        let path = self.root.join(TEMPLATES_DIR_NAME).join(which.file_name());
        dbg_log!(DBG_INFO, "Looking for template file at: {}", path.display());
        if !path.is_file() {
            return Err(Error::MissingTemplate(path));
        }
        loader::read_text(path, self.opts)
    }
}
