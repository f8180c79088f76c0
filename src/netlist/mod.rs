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

//! SPICE subcircuit fragments. Every fragment is a header naming its source,
//! the subcircuit template from the chip data, a body of zero-volt sources
//! tying nets together, and `.ENDS`.

use chrono::NaiveDateTime;
use std::fmt::Display;

mod buses;
mod matrix;
mod nodes;
mod probes;
mod sizes;

pub use buses::pins_subckt;
pub use matrix::switch_matrix_subckt;
pub use nodes::nodes_subckt;
pub use probes::read_probe_values;
pub use sizes::sizes_subckt;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Timestamp {
    /// Local wall clock at the time the header is built.
    Now,
    At(NaiveDateTime),
    /// Leave the creation line out altogether.
    Omit,
}

impl Timestamp {
    /// `SOURCE_DATE_EPOCH` pins the timestamp for reproducible outputs.
    pub fn from_env(omit: bool) -> Self {
        if omit {
            return Timestamp::Omit;
        }
        let epoch = std::env::var("SOURCE_DATE_EPOCH").ok()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .and_then(|secs| chrono::DateTime::<chrono::Utc>::from_timestamp(secs, 0));
        match epoch {
            Some(at) => Timestamp::At(at.naive_utc()),
            None => Timestamp::Now,
        }
    }

    fn render(&self) -> Option<String> {
        match self {
            Timestamp::Now => Some(chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()),
            Timestamp::At(at) => Some(at.format(TIMESTAMP_FORMAT).to_string()),
            Timestamp::Omit => None,
        }
    }
}

/// Provenance comment opening every generated netlist.
#[derive(Clone, Debug)]
pub struct Header {
    created: Option<String>,
    source: String,
}

impl Header {
    pub fn new<S>(source: S, timestamp: &Timestamp) -> Self where
        S: Display
    {
        Self { created: timestamp.render(), source: source.to_string() }
    }
}

struct SubcktWriter {
    out: String,
}

impl SubcktWriter {
    fn new(header: &Header) -> Self {
        let mut out = String::new();
        if let Some(created) = &header.created {
            out.push_str(&format!("* File created on: {}\n", created));
        }
        out.push_str(&format!("* From {}\n", header.source));
        Self { out }
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Templates are pasted verbatim. Most of them don't end with a newline,
    /// so callers usually ask for one.
    fn template(&mut self, template: &str, newline: bool) {
        self.out.push_str(template);
        if newline {
            self.out.push('\n');
        }
    }

    fn comment<D>(&mut self, text: D) where
        D: Display
    {
        self.out.push_str(&format!("* {}\n", text));
    }

    /// Zero-volt source shorting `plus` to `minus`.
    fn short<N, P, M>(&mut self, name: N, plus: P, minus: M) where
        N: Display,
        P: Display,
        M: Display
    {
        self.out.push_str(&format!("{} {} {} 0\n", name, plus, minus));
    }

    fn finish(mut self) -> String {
        self.out.push_str(".ENDS\n");
        self.out
    }
}

#[cfg(test)]
mod tests;
