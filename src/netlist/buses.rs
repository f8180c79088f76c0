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

use crate::chip_data::PinNumbers;
use crate::circuit::{BusName, Circuit};
use crate::error::Result;
#[allow(unused)]
use crate::log::*;

use super::{Header, SubcktWriter};

/// Number of switched buses brought out to package pins.
pub const SWITCHED_BUS_COUNT: u32 = 6;

/* The last switched bus doubles as the scan data line, hence its pin name. */
fn switched_bus_pin_name(bus: u32) -> String {
    if bus == SWITCHED_BUS_COUNT {
        format!("DATA_SBUS{}", bus)
    } else {
        format!("SBUS{}", bus)
    }
}

/// Subcircuit wiring each routing bus to the package pin of the first pin
/// listed for it, plus the fixed switched-bus pins.
pub fn pins_subckt(
    pins: &PinNumbers,
    circuit: &Circuit,
    template: &str,
    header: &Header,
    diag: &mut Diagnostics
) -> Result<String> {
    let mut w = SubcktWriter::new(header);
    w.template(template, true);

    for (bus, kind) in circuit.buses() {
        let rbus = match kind {
            BusName::Rbus(n) => n,
            /* Switched buses are fixed below and nodes have their own subcircuit */
            BusName::Sbus(_) | BusName::Node(_) => continue,
            _ => {
                diag.warn(format!("'{}' is not a routing bus, skipping", bus));
                continue;
            }
        };

        let selected = match circuit.pins(bus)?.first() {
            Some(pin) => pin.to_string(),
            None => {
                diag.warn(format!("No pins listed for {}", bus));
                continue;
            }
        };
        let number = match pins.get(&selected) {
            Some(n) => n,
            None => {
                diag.warn(format!("Pin name '{}' not found in pin mapping", selected));
                continue;
            }
        };

        w.short(
            format_args!("V{}_to_pin{}", bus, number),
            format_args!("RBUS<{}>", rbus),
            format_args!("pin<{}>", number)
        );
        w.comment(format_args!("{} connected to {} (pin<{}>)", bus, selected, number));
    }

    for sbus in 1 ..= SWITCHED_BUS_COUNT {
        let name = switched_bus_pin_name(sbus);
        let number = match pins.get(&name) {
            Some(n) => n,
            None => {
                diag.warn(format!("Pin name '{}' not found in pin mapping", name));
                continue;
            }
        };
        w.short(
            format_args!("V{}_to_pin{}", name, number),
            format_args!("SWBUS<{}>", sbus),
            format_args!("pin<{}>", number)
        );
    }

    Ok(w.finish())
}
