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

use std::sync::atomic::{AtomicUsize, Ordering};

pub const DBG_CRITICAL: usize = 0;
pub const DBG_WARN: usize = 1;
pub const DBG_INFO: usize = 2;
pub const DBG_EXTRA: usize = 3;

pub const LOG_LVL_STR: &'static [&'static str] = &[
    /* 0 */ "CRITICAL",
    /* 1 */ "WARNING",
    /* 2 */ "INFO",
    /* 3 */ "EXTRA INFO"
];

fn level_from_env(var: &str, default: usize) -> usize {
    match std::env::var(var) {
        Ok(lvl) => usize::from_str_radix(lvl.trim(), 10).unwrap_or(default),
        Err(_) => default,
    }
}

lazy_static! {
    pub static ref DBG_LOG_LEVEL: AtomicUsize =
        AtomicUsize::new(level_from_env("MOSBIUS_DBG_LOG_LEVEL", DBG_WARN));

    pub static ref DBG_PRINT_CODE_INFO: usize =
        level_from_env("MOSBIUS_PRINT_CODE_INFO", 0);
}

pub fn log_level() -> usize {
    DBG_LOG_LEVEL.load(Ordering::Relaxed)
}

/// Raises the log level by `steps` over whatever the environment selected.
/// Used by the repeatable `-v` flag.
pub fn raise_log_level(steps: usize) {
    let lvl = (log_level() + steps).min(LOG_LVL_STR.len() - 1);
    DBG_LOG_LEVEL.store(lvl, Ordering::Relaxed);
}

/* Unlike a debug-only trace, warnings about unresolved pins and clamped sizes
 * are part of the tools' output, so the macro stays active in release builds. */
#[macro_export]
macro_rules! dbg_log {
    ($lvl:expr, $fmt:literal $(, $v:expr )*) => {
        let lvl = ($crate::log::LOG_LVL_STR.len() - 1).min($lvl);
        if $crate::log::log_level() >= lvl {
            if *$crate::log::DBG_PRINT_CODE_INFO != 0 {
                eprintln!(
                    concat!("[{}:{}] {}: ", $fmt),
                    file!(), line!(), $crate::log::LOG_LVL_STR[lvl] $(, $v )*
                );
            } else {
                eprintln!(
                    concat!("{}: ", $fmt),
                    $crate::log::LOG_LVL_STR[lvl] $(, $v )*
                );
            }
        }
    };
}

/// Warnings raised while resolving a description against the chip data.
///
/// Every warning is logged as it happens and also kept, so callers (and
/// tests) can tell whether a conversion was lossy.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    warnings: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, msg: String) {
        dbg_log!(DBG_WARN, "{}", msg);
        self.warnings.push(msg);
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raise_log_level_clamps() {
        raise_log_level(100);
        assert_eq!(log_level(), DBG_EXTRA);
        assert_eq!(LOG_LVL_STR[log_level()], "EXTRA INFO");
    }

    #[test]
    fn test_diagnostics_keep_warnings() {
        let mut diag = Diagnostics::new();
        assert!(diag.is_clean());
        diag.warn(String::from("Pin 'X' not found"));
        assert_eq!(diag.warnings(), ["Pin 'X' not found"]);
    }
}
