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

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("can't open {}: {source}", path.display())]
    CantOpenFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("can't write {}: {source}", path.display())]
    CantWriteFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{} is not valid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{} is not valid YAML: {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("bad entry for {bus} in circuit description: {msg}")]
    BadCircuitEntry {
        bus: String,
        msg: String,
    },
    #[error("chip data directory {} does not exist", .0.display())]
    MissingChipData(PathBuf),
    #[error("subcircuit template {} does not exist", .0.display())]
    MissingTemplate(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;
