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

//! Resolution of bus connections to the switch-matrix registers that make
//! them.

use crate::chip_data::{MatrixPin, SwitchMatrix};
use crate::circuit::{BusName, Circuit, SwitchState};
use crate::common::ProbeValues;
use crate::error::Result;
#[allow(unused)]
use crate::log::*;

/// One resolved connection of the circuit description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Connection {
    /// A pin joined to a routing bus by a single switch.
    Rbus {
        bus: String,
        pin: String,
        matrix_pin: MatrixPin,
        register: u32,
    },
    /// A terminal joined to a switched bus by an `a`/`b` switch pair.
    Sbus {
        bus: String,
        terminal: String,
        /// Connection key as written in the description.
        key: String,
        state: SwitchState,
        register_a: u32,
        register_b: u32,
    },
}

impl Connection {
    /// Registers this connection drives, with their levels.
    pub fn probe_levels(&self) -> Vec<(u32, bool)> {
        match self {
            Connection::Rbus { register, .. } => vec![(*register, true)],
            Connection::Sbus { state, register_a, register_b, .. } => {
                let (a, b) = state.levels();
                vec![(*register_a, a), (*register_b, b)]
            }
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SwitchMatrixSettings {
    /// Connections in description order.
    pub connections: Vec<Connection>,
}

impl SwitchMatrixSettings {
    /// Later connections override earlier ones on a shared register.
    pub fn probe_values(&self) -> ProbeValues {
        self.connections.iter()
            .flat_map(Connection::probe_levels)
            .collect()
    }
}

fn lookup_matrix_pin<'m>(
    matrix: &'m SwitchMatrix,
    pin: &str,
    diag: &mut Diagnostics
) -> Option<&'m MatrixPin> {
    let matrix_pin = matrix.pins.get(pin);
    if matrix_pin.is_none() {
        diag.warn(format!("Pin '{}' not found in pin-to-switch matrix mapping", pin));
    }
    matrix_pin
}

/// Resolves every `RBUS`/`SBUS` connection of `circuit`. Connections whose
/// pin or register is unknown are reported and left out.
pub fn resolve_switch_matrix(
    matrix: &SwitchMatrix,
    circuit: &Circuit,
    diag: &mut Diagnostics
) -> Result<SwitchMatrixSettings> {
    let mut connections = Vec::new();

    for (bus, kind) in circuit.buses() {
        match kind {
            BusName::Rbus(_) => {
                for pin in circuit.pins(bus)? {
                    let matrix_pin = match lookup_matrix_pin(matrix, pin, diag) {
                        Some(p) => p,
                        None => continue,
                    };
                    let register = match matrix.registers.get(matrix_pin, bus) {
                        Some(r) => r,
                        None => {
                            diag.warn(format!(
                                "Register not found for sw_matrix_pin '{}' and bus '{}'",
                                matrix_pin, bus
                            ));
                            continue;
                        }
                    };
                    dbg_log!(DBG_EXTRA, "{} -> {} via register {}", pin, bus, register);
                    connections.push(Connection::Rbus {
                        bus: bus.to_string(),
                        pin: pin.to_string(),
                        matrix_pin: matrix_pin.clone(),
                        register,
                    });
                }
            }
            BusName::Sbus(_) => {
                let switch_a = format!("{}a", bus);
                let switch_b = format!("{}b", bus);
                for entry in circuit.switches(bus)? {
                    let matrix_pin = match lookup_matrix_pin(matrix, &entry.terminal, diag) {
                        Some(p) => p,
                        None => continue,
                    };
                    let registers = (
                        matrix.registers.get(matrix_pin, &switch_a),
                        matrix.registers.get(matrix_pin, &switch_b),
                    );
                    let (register_a, register_b) = match registers {
                        (Some(a), Some(b)) => (a, b),
                        _ => {
                            diag.warn(format!(
                                "Register not found for sw_matrix_pin '{}' and buses '{} and {}'",
                                matrix_pin, switch_a, switch_b
                            ));
                            continue;
                        }
                    };
                    let state = entry.state();
                    connections.push(Connection::Sbus {
                        bus: bus.to_string(),
                        terminal: entry.terminal,
                        key: entry.connection,
                        state,
                        register_a,
                        register_b,
                    });
                }
            }
            _ => {
                dbg_log!(DBG_EXTRA, "Bus {} does not go through the switch matrix", bus);
            }
        }
    }

    Ok(SwitchMatrixSettings { connections })
}
