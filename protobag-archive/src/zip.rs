// MIT License
//
// Copyright (c) 2024 The protobag developers
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.

//! An [`Archive`] implementation backed by a zip file with deflate
//! compression.
//!
//! Like the tar implementation the writer owns one open stream for the
//! whole session; reads re-open the file per operation.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use log::warn;
use zip::read::ZipArchive as ZipReader;
use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};
use crate::spec::{resolve_write_path, ArchiveSpec, Mode};
use crate::{canonical_entryname, display_entryname, Archive};

/// The [`Archive`] implementation itself.
pub struct ZipArchive {
    path: PathBuf,
    writer: Option<ZipWriter<File>>,
    written: Vec<String>,
}

impl ZipArchive {
    /// Opens a zip archive as described by `spec`.
    pub fn open(spec: &ArchiveSpec) -> Result<ZipArchive> {
        match spec.mode {
            Mode::Read => {
                if !spec.path.is_file() {
                    return Err(Error::Io(io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("no such archive: {}", spec.path.display()),
                    )));
                }

                Ok(ZipArchive {
                    path: spec.path.clone(),
                    writer: None,
                    written: vec![],
                })
            }
            Mode::Write => {
                let path = resolve_write_path(spec, Some(".zip"))?;
                let file = File::create(&path)?;

                Ok(ZipArchive {
                    path,
                    writer: Some(ZipWriter::new(file)),
                    written: vec![],
                })
            }
        }
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Archive for ZipArchive {
    fn namelist(&mut self) -> Result<Vec<String>> {
        if self.writer.is_some() {
            return Ok(self.written.clone());
        }

        let reader = ZipReader::new(File::open(&self.path)?)?;

        Ok(reader.file_names().map(display_entryname).collect())
    }

    fn read_as_bytes(&mut self, entryname: &str) -> Result<Vec<u8>> {
        if self.writer.is_some() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::Other,
                "zip archive is open for writing",
            )));
        }

        let mut reader = ZipReader::new(File::open(&self.path)?)?;

        let result = match reader.by_name(canonical_entryname(entryname)) {
            Ok(mut file) => {
                let mut data = Vec::with_capacity(file.size() as usize);
                file.read_to_end(&mut data)?;

                Ok(data)
            }
            Err(ZipError::FileNotFound) => Err(Error::NotFound(entryname.to_string())),
            Err(err) => Err(err.into()),
        };
        result
    }

    fn write(&mut self, entryname: &str, data: &[u8]) -> Result<()> {
        let writer = self.writer.as_mut().ok_or(Error::Closed)?;
        let name = canonical_entryname(entryname);

        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        writer.start_file(name, options)?;
        writer.write_all(data)?;
        self.written.push(display_entryname(name));

        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.finish()?;
        }

        Ok(())
    }
}

impl Drop for ZipArchive {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!("failed to close zip archive {:?}: {}", self.path, err);
        }
    }
}
