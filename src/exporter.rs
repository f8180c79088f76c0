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
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{Error, Result};
#[allow(unused)]
use crate::log::*;
use crate::scan_chain::ScanChain;

pub trait AsBytes {
    fn as_bytes<'s>(&'s self) -> std::borrow::Cow<'s, [u8]>;
}

impl AsBytes for str {
    fn as_bytes<'s>(&'s self) -> std::borrow::Cow<'s, [u8]> {
        str::as_bytes(self).into()
    }
}

impl AsBytes for ScanChain {
    fn as_bytes<'s>(&'s self) -> std::borrow::Cow<'s, [u8]> {
        self.to_text().into_bytes().into()
    }
}

/// Writes one generated artifact. A `.gz` output name gets gzip-compressed.
pub struct FileExporter {
    path: PathBuf,
    compression: Option<Compression>,
}

impl FileExporter {
    pub fn new<P>(path: P) -> Self where
        P: AsRef<Path>
    {
        let path = path.as_ref().to_path_buf();
        let compression = match path.extension() {
            Some(ext) if ext == "gz" => Some(Compression::default()),
            _ => None,
        };
        Self { path, compression }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn export<D>(&self, data: &D) -> Result<()> where
        D: AsBytes + ?Sized
    {
        let cant_write = |source| Error::CantWriteFile { path: self.path.clone(), source };
        let file = File::create(&self.path).map_err(cant_write)?;
        let bytes = data.as_bytes();

        dbg_log!(DBG_EXTRA, "Writing {} bytes to {}", bytes.len(), self.path.display());
        match self.compression {
            Some(level) => {
                let mut enc = GzEncoder::new(BufWriter::new(file), level);
                enc.write_all(&bytes).map_err(cant_write)?;
                enc.finish()
                    .and_then(|mut w| w.flush())
                    .map_err(cant_write)
            }
            None => {
                let mut w = BufWriter::new(file);
                w.write_all(&bytes)
                    .and_then(|_| w.flush())
                    .map_err(cant_write)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{read_text, OpenOpts};

    #[test]
    fn test_plain_and_gzip_outputs() {
        let dir = tempfile::tempdir().unwrap();

        let plain = FileExporter::new(dir.path().join("out.cir"));
        plain.export("V1 a b 0\n").unwrap();
        assert_eq!(std::fs::read_to_string(plain.path()).unwrap(), "V1 a b 0\n");

        let chain = ScanChain::new(3);
        let packed = FileExporter::new(dir.path().join("chain.txt.gz"));
        packed.export(&chain).unwrap();
        let raw = std::fs::read(packed.path()).unwrap();
        assert_eq!(&raw[.. 2], &[0x1f, 0x8b]);
        assert_eq!(read_text(packed.path(), OpenOpts::default()).unwrap(), "0\n0\n0\n");
    }

    #[test]
    fn test_unwritable_output() {
        let res = FileExporter::new("/nonexistent/dir/out.cir").export("x");
        assert!(matches!(res, Err(Error::CantWriteFile { .. })));
    }
}
