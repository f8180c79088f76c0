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

use std::collections::HashSet;

use crate::common::{supply_name, SWITCH_MATRIX_PROBE_COUNT};
use crate::switch_matrix::{Connection, SwitchMatrixSettings};

use super::{Header, SubcktWriter};

/// Subcircuit driving the switch-matrix registers. Registers closing a
/// connection come first, in description order; every other switch-matrix
/// register is tied to VSS.
pub fn switch_matrix_subckt(
    settings: &SwitchMatrixSettings,
    template: &str,
    header: &Header
) -> String {
    let mut w = SubcktWriter::new(header);
    w.template(template, false);

    let mut connected = HashSet::new();

    for conn in &settings.connections {
        match conn {
            Connection::Rbus { bus, pin, matrix_pin, register } => {
                w.comment(format_args!(
                    "Connection: {}, Pin: {}, sw_matrix_pin: {}, Register: {}",
                    bus, pin, matrix_pin, register
                ));
                w.short(
                    format_args!("V{}_to_{}", pin, bus),
                    format_args!("PROBE<{}>", register),
                    supply_name(true)
                );
            }
            Connection::Sbus { bus, terminal, key, state, register_a, register_b } => {
                let (level_a, level_b) = state.levels();
                w.comment(format_args!(
                    "Connection: {}, Terminal: {}, Connection Key: {}",
                    bus, terminal, key
                ));
                w.short(
                    format_args!("V{}_to_{}", register_a, terminal),
                    format_args!("PROBE<{}>", register_a),
                    supply_name(level_a)
                );
                w.short(
                    format_args!("V{}_to_{}", register_b, terminal),
                    format_args!("PROBE<{}>", register_b),
                    supply_name(level_b)
                );
            }
        }
        connected.extend(conn.probe_levels().into_iter().map(|(register, _)| register));
    }

    for probe in 1 ..= SWITCH_MATRIX_PROBE_COUNT as u32 {
        if !connected.contains(&probe) {
            w.short(
                format_args!("Vprobe_{}_to_VSS", probe),
                format_args!("PROBE<{}>", probe),
                supply_name(false)
            );
        }
    }

    w.finish()
}
