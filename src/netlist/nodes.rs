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

/// Package pin carrying the positive supply.
pub const VDD_PIN: u32 = 13;
/// Package pin carrying ground.
pub const VSS_PIN: u32 = 1;

/// Subcircuit shorting pins to the supplies and to external nodes.
pub fn nodes_subckt(
    pins: &PinNumbers,
    circuit: &Circuit,
    template: &str,
    header: &Header,
    diag: &mut Diagnostics
) -> Result<String> {
    let mut w = SubcktWriter::new(header);
    w.blank();
    w.template(template, true);

    for (supply, supply_pin) in [("VDD", VDD_PIN), ("VSS", VSS_PIN)] {
        for pin in circuit.pins(supply)? {
            match pins.get(pin) {
                Some(number) => {
                    w.comment(format_args!("{} connected to {}", pin, supply));
                    w.short(
                        format_args!("Vshort_{}_{}", supply, pin),
                        format_args!("pin<{}>", number),
                        format_args!("pin<{}>", supply_pin)
                    );
                }
                None => diag.warn(format!("Pin name '{}' not found in pin mapping", pin)),
            }
        }
    }

    for (bus, kind) in circuit.buses() {
        let node = match kind {
            BusName::Vdd | BusName::Vss => continue,
            BusName::Node(n) => n,
            _ => {
                diag.warn(format!("Invalid node format '{}', expected NODE<n>", bus));
                continue;
            }
        };

        for pin in circuit.pins(bus)? {
            match pins.get(pin) {
                Some(number) => {
                    w.comment(format_args!("{} connected to NODE<{}>", pin, node));
                    w.short(
                        format_args!("Vshort_NODE_{}_{}", node, pin),
                        format_args!("NODE<{}>", node),
                        format_args!("pin<{}>", number)
                    );
                }
                None => diag.warn(format!("Pin name '{}' not found in pin mapping", pin)),
            }
        }
    }

    Ok(w.finish())
}
