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

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
#[allow(unused)]
use crate::log::*;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocFormat {
    Json,
    Yaml,
}

impl DocFormat {
    /// Guesses the format from the file name, looking through a trailing `.gz`.
    pub fn from_path(path: &Path) -> Self {
        let name = path.file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let name = name.strip_suffix(".gz").unwrap_or(&name);

        if name.ends_with(".yaml") || name.ends_with(".yml") {
            DocFormat::Yaml
        } else {
            DocFormat::Json
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OpenOpts {
    /// Never try to gunzip inputs, even when they start with the gzip magic.
    pub raw: bool,
}

/// Reads a file into memory, transparently decompressing gzip unless
/// `opts.raw` is set.
pub fn read_bytes<P>(path: P, opts: OpenOpts) -> Result<Vec<u8>> where
    P: AsRef<Path>
{
    let path = path.as_ref();
    let cant_open = |source| Error::CantOpenFile { path: path.to_path_buf(), source };

    let mut raw_data = Vec::new();
    File::open(path)
        .and_then(|f| BufReader::new(f).read_to_end(&mut raw_data))
        .map_err(cant_open)?;

    if opts.raw || !raw_data.starts_with(&GZIP_MAGIC) {
        return Ok(raw_data);
    }

    dbg_log!(DBG_EXTRA, "Decompressing {}", path.display());
    let mut data = Vec::new();
    GzDecoder::new(raw_data.as_slice())
        .read_to_end(&mut data)
        .map_err(cant_open)?;
    Ok(data)
}

pub fn read_text<P>(path: P, opts: OpenOpts) -> Result<String> where
    P: AsRef<Path>
{
    let path = path.as_ref();
    let data = read_bytes(path, opts)?;
    String::from_utf8(data).map_err(|e| Error::CantOpenFile {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })
}

/// Loads a JSON or YAML document and deserializes it into `T`.
pub fn open_document<T, P>(path: P, opts: OpenOpts) -> Result<T> where
    T: DeserializeOwned,
    P: AsRef<Path>
{
    let path = path.as_ref();
    dbg_log!(DBG_INFO, "Loading {}", path.display());
    let data = read_bytes(path, opts)?;

    match DocFormat::from_path(path) {
        DocFormat::Json => serde_json::from_slice(&data)
            .map_err(|source| Error::Json { path: path.to_path_buf(), source }),
        DocFormat::Yaml => serde_yaml::from_slice(&data)
            .map_err(|source| Error::Yaml { path: path.to_path_buf(), source }),
    }
}
