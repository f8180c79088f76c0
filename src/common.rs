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

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Number of probe registers driven by the full scan chain.
pub const SCAN_CHAIN_LENGTH: usize = 2008;

/// Number of probe registers belonging to the switch matrix.
pub const SWITCH_MATRIX_PROBE_COUNT: usize = 1888;

/// Register number mapped to the level it must be programmed with.
pub type ProbeValues = BTreeMap<u32, bool>;

/* Lookup tables were written by hand and by scripts, so the same number shows
 * up as `12`, `12.0` or `"12"`. */
#[derive(Deserialize)]
#[serde(untagged)]
enum AnyNumber {
    Int(i64),
    Float(f64),
    Str(String),
}

impl AnyNumber {
    fn as_u32(&self) -> Option<u32> {
        match self {
            AnyNumber::Int(i) => u32::try_from(*i).ok(),
            AnyNumber::Float(f) => float_to_u32(*f),
            AnyNumber::Str(s) => parse_u32(s),
        }
    }
}

fn float_to_u32(f: f64) -> Option<u32> {
    if f.fract() == 0.0 && f >= 0.0 && f <= u32::MAX as f64 {
        Some(f as u32)
    } else {
        None
    }
}

/// Parses a decimal number, tolerating surrounding whitespace and an integral
/// float spelling such as `"7.0"`.
pub fn parse_u32(s: &str) -> Option<u32> {
    let s = s.trim();
    s.parse::<u32>().ok()
        .or_else(|| s.parse::<f64>().ok().and_then(float_to_u32))
}

/// A non-negative integer read from a lookup table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableNumber(pub u32);

impl<'de> Deserialize<'de> for TableNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error> where
        D: Deserializer<'de>
    {
        let any = AnyNumber::deserialize(deserializer)?;
        any.as_u32()
            .map(TableNumber)
            .ok_or_else(|| serde::de::Error::custom(
                "expected a non-negative integer (number or decimal string)"
            ))
    }
}

impl std::fmt::Display for TableNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Level a probe register is tied to in a generated netlist.
pub fn supply_name(level: bool) -> &'static str {
    if level { "VDD" } else { "VSS" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_number_spellings() {
        let nums: Vec<TableNumber> =
            serde_json::from_str(r#"[12, 12.0, "12", " 12 ", "12.0"]"#).unwrap();
        assert!(nums.iter().all(|n| *n == TableNumber(12)));
    }

    #[test]
    fn test_table_number_rejects_garbage() {
        assert!(serde_json::from_str::<TableNumber>("-1").is_err());
        assert!(serde_json::from_str::<TableNumber>("1.5").is_err());
        assert!(serde_json::from_str::<TableNumber>(r#""twelve""#).is_err());
    }

    #[test]
    fn test_supply_name() {
        assert_eq!(supply_name(true), "VDD");
        assert_eq!(supply_name(false), "VSS");
    }
}
