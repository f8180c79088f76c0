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

use crate::chip_data::SizingRegisters;
use crate::circuit::Sizes;
use crate::common::supply_name;
use crate::log::Diagnostics;
use crate::sizing::sizing_probe_values;

use super::{Header, SubcktWriter};

/// Subcircuit tying every sizing register to VDD or VSS according to the
/// device sizes. Devices are listed by name, their bits by ascending weight.
pub fn sizes_subckt(
    registers: &SizingRegisters,
    sizes: &Sizes,
    template: &str,
    header: &Header,
    diag: &mut Diagnostics
) -> String {
    let values = sizing_probe_values(registers, sizes, diag);

    let mut w = SubcktWriter::new(header);
    w.template(template, true);

    let mut devices: Vec<_> = registers.iter().collect();
    devices.sort_by(|(a, _), (b, _)| a.cmp(b));

    for (device, bits) in devices {
        w.comment(format_args!("Device: {} Size: {}", device, sizes.display_size(device)));
        for bit in bits {
            let level = values.get(&bit.register).copied().unwrap_or(false);
            w.short(
                format_args!("V_{}_{}", device, bit.register),
                format_args!("PROBE<{}>", bit.register),
                supply_name(level)
            );
        }
        w.blank();
    }

    w.finish()
}
