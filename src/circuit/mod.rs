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

//! User-provided descriptions: the circuit (what connects to which bus) and
//! the device sizes.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::log::Diagnostics;

/// Largest size a device can be programmed with (5-bit size word).
pub const MAX_DEVICE_SIZE: u32 = 31;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BusName {
    /// Routing bus, `RBUS<n>`.
    Rbus(u32),
    /// Switched bus, `SBUS<n>`, driven by a pair of switches (a and b).
    Sbus(u32),
    /// External node, `NODE<n>` or `NODEn`.
    Node(u32),
    Vdd,
    Vss,
    Other,
}

impl BusName {
    pub fn parse(name: &str) -> Self {
        match name {
            "VDD" => return BusName::Vdd,
            "VSS" => return BusName::Vss,
            _ => (),
        }

        if let Some(n) = name.strip_prefix("RBUS") {
            return n.parse().map(BusName::Rbus).unwrap_or(BusName::Other);
        }
        if let Some(n) = name.strip_prefix("SBUS") {
            return n.parse().map(BusName::Sbus).unwrap_or(BusName::Other);
        }
        match name.strip_prefix("NODE") {
            Some(n) => n.trim_matches(|c| c == '<' || c == '>')
                .parse()
                .map(BusName::Node)
                .unwrap_or(BusName::Other),
            None => BusName::Other,
        }
    }
}

/// State of the switch pair joining a terminal to a switched bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwitchState {
    On,
    Phi1,
    Phi2,
    Off,
}

impl SwitchState {
    /// Unrecognized keys leave the switches open.
    pub fn from_key(key: &str) -> Self {
        match key {
            "ON" => SwitchState::On,
            "PHI1" => SwitchState::Phi1,
            "PHI2" => SwitchState::Phi2,
            _ => SwitchState::Off,
        }
    }

    /// Levels of the `a` and `b` switch registers.
    pub fn levels(self) -> (bool, bool) {
        match self {
            SwitchState::On => (true, true),
            SwitchState::Phi1 => (true, false),
            SwitchState::Phi2 => (false, true),
            SwitchState::Off => (false, false),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct SwitchEntry {
    pub terminal: String,
    pub connection: String,
}

impl SwitchEntry {
    pub fn state(&self) -> SwitchState {
        SwitchState::from_key(&self.connection)
    }
}

/// Bus name -> connections, in the order they appear in the description.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct Circuit {
    buses: IndexMap<String, Value>,
}

impl Circuit {
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    pub fn buses(&self) -> impl Iterator<Item = (&str, BusName)> {
        self.buses.keys().map(|name| (name.as_str(), BusName::parse(name)))
    }

    /// Pin names listed under `bus`. A bus that is absent has no pins.
    pub fn pins(&self, bus: &str) -> Result<Vec<&str>> {
        let entries = match self.buses.get(bus) {
            Some(v) => v,
            None => return Ok(Vec::new()),
        };
        let bad = |msg: &str| Error::BadCircuitEntry { bus: bus.to_string(), msg: msg.to_string() };

        entries.as_array()
            .ok_or_else(|| bad("expected a list of pin names"))?
            .iter()
            .map(|pin| pin.as_str().ok_or_else(|| bad("pin names must be strings")))
            .collect()
    }

    /// Terminal/connection records listed under a switched bus.
    pub fn switches(&self, bus: &str) -> Result<Vec<SwitchEntry>> {
        match self.buses.get(bus) {
            Some(v) => Vec::<SwitchEntry>::deserialize(v).map_err(|e| Error::BadCircuitEntry {
                bus: bus.to_string(),
                msg: e.to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }
}

/// Device name -> size. The size is either a bare integer or a list whose
/// first element is the size.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct Sizes {
    devices: IndexMap<String, Value>,
}

impl Sizes {
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    fn raw_size(&self, device: &str) -> Option<&Value> {
        match self.devices.get(device)? {
            Value::Array(values) => values.first(),
            v => Some(v),
        }
    }

    /// The size as written in the description, for netlist comments.
    pub fn display_size(&self, device: &str) -> String {
        match self.raw_size(device) {
            Some(Value::String(s)) => s.clone(),
            Some(v) => v.to_string(),
            None if self.devices.contains_key(device) => String::from("?"),
            None => String::from("0"),
        }
    }

    /// Effective size of `device`. Absent devices are size 0. Anything that
    /// isn't a 5-bit number is reported and replaced with 0.
    pub fn size_of(&self, device: &str, diag: &mut Diagnostics) -> u32 {
        if !self.devices.contains_key(device) {
            return 0;
        }

        let size = self.raw_size(device)
            .and_then(Value::as_i64)
            .filter(|size| (0 ..= MAX_DEVICE_SIZE as i64).contains(size));

        match size {
            Some(size) => size as u32,
            None => {
                diag.warn(format!(
                    "Size {} for device {} is not a 5-bit number.",
                    self.display_size(device), device
                ));
                0
            }
        }
    }
}

#[cfg(test)]
mod tests;
