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

use regex::Regex;

use crate::common::ProbeValues;
#[allow(unused)]
use crate::log::*;

lazy_static! {
    static ref PROBE_NET: Regex = Regex::new(r"^PROBE<(\d+)>$").unwrap();
}

fn probe_number(net: &str) -> Option<u32> {
    PROBE_NET.captures(net)
        .and_then(|caps| caps[1].parse().ok())
}

fn supply_level(net: &str) -> Option<bool> {
    match net {
        "VDD" => Some(true),
        "VSS" => Some(false),
        _ => None,
    }
}

/// Reads back which probe registers a netlist ties to VDD or VSS.
///
/// Only voltage sources (`V...`) between a `PROBE<n>` net and a supply count.
/// Comment and continuation lines are skipped. The last assignment of a
/// probe wins.
pub fn read_probe_values(netlist: &str) -> ProbeValues {
    let mut values = ProbeValues::new();

    for line in netlist.lines() {
        let line = line.trim();
        if !line.starts_with('V') {
            continue;
        }

        let mut tokens = line.split_whitespace().skip(1);
        let (plus, minus) = match (tokens.next(), tokens.next()) {
            (Some(p), Some(m)) => (p, m),
            _ => continue,
        };

        let found = match (probe_number(plus), probe_number(minus)) {
            (Some(probe), None) => supply_level(minus).map(|level| (probe, level)),
            (None, Some(probe)) => supply_level(plus).map(|level| (probe, level)),
            _ => None,
        };

        match found {
            Some((probe, level)) => {
                values.insert(probe, level);
            }
            None if line.contains("PROBE<") => {
                dbg_log!(DBG_INFO, "Not a probe assignment: {}", line);
            }
            None => (),
        }
    }

    values
}
