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
use crate::common::ProbeValues;
#[allow(unused)]
use crate::log::*;

/// Register levels programming every device in `registers` with its size.
///
/// Devices are visited in table order, so when two devices share a register
/// the one listed later decides its level.
pub fn sizing_probe_values(
    registers: &SizingRegisters,
    sizes: &Sizes,
    diag: &mut Diagnostics
) -> ProbeValues {
    let mut values = ProbeValues::new();

    for (device, bits) in registers.iter() {
        let size = sizes.size_of(device, diag);
        dbg_log!(DBG_EXTRA, "Device {} sized {}", device, size);
        for bit in bits {
            values.insert(bit.register, bit.weight & size != 0);
        }
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::Diagnostics;

    fn registers() -> SizingRegisters {
        serde_json::from_str(r#"{
            "MN1": {"16": 5, "1": 1, "2": 2, "4": 3, "8": 4},
            "MP1": {"1": 6, "2": 7, "4": 8, "8": 9, "16": 10}
        }"#).unwrap()
    }

    #[test]
    fn test_size_bits_land_on_registers() {
        let sizes = Sizes::from_json_str(r#"{"MN1": [5], "MP1": [18]}"#).unwrap();
        let mut diag = Diagnostics::new();
        let values = sizing_probe_values(&registers(), &sizes, &mut diag);

        let expected: Vec<(u32, bool)> = vec![
            (1, true), (2, false), (3, true), (4, false), (5, false),
            (6, false), (7, true), (8, false), (9, false), (10, true),
        ];
        assert_eq!(values.into_iter().collect::<Vec<_>>(), expected);
        assert!(diag.is_clean());
    }

    #[test]
    fn test_unsized_and_out_of_range_devices_are_zero() {
        let sizes = Sizes::from_json_str(r#"{"MP1": [40]}"#).unwrap();
        let mut diag = Diagnostics::new();
        let values = sizing_probe_values(&registers(), &sizes, &mut diag);

        assert_eq!(values.len(), 10);
        assert!(values.values().all(|v| !*v));
        assert_eq!(diag.warnings().len(), 1);
    }

    #[test]
    fn test_later_device_wins_shared_register() {
        let registers: SizingRegisters = serde_json::from_str(r#"{
            "A": {"1": 100},
            "B": {"1": 100}
        }"#).unwrap();
        let sizes = Sizes::from_json_str(r#"{"A": [1], "B": [0]}"#).unwrap();
        let values = sizing_probe_values(&registers, &sizes, &mut Diagnostics::new());

        assert_eq!(values.get(&100), Some(&false));
    }
}
