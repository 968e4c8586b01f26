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

//! An [`Archive`] implementation backed by a tar file.
//!
//! The write side keeps one open stream for the whole session; entries are
//! appended and cannot be rewritten. The tar format has no entry index, so
//! reads are linear scans and every read re-opens the file to reset the
//! cursor.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use log::warn;
use tar::{Builder, Header};

use crate::error::{Error, Result};
use crate::spec::{resolve_write_path, ArchiveSpec, Mode};
use crate::{canonical_entryname, display_entryname, Archive};

/// The [`Archive`] implementation itself.
pub struct TarArchive {
    path: PathBuf,
    writer: Option<Builder<File>>,
    written: Vec<String>,
}

impl TarArchive {
    /// Opens a tar archive as described by `spec`.
    ///
    /// In read mode the file must exist. In write mode the file is created
    /// (the [`TEMPFILE_PATH`](crate::TEMPFILE_PATH) sentinel allocates a
    /// fresh temporary file) and owned until [`close`](Archive::close).
    pub fn open(spec: &ArchiveSpec) -> Result<TarArchive> {
        match spec.mode {
            Mode::Read => {
                if !spec.path.is_file() {
                    return Err(Error::Io(io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("no such archive: {}", spec.path.display()),
                    )));
                }

                Ok(TarArchive {
                    path: spec.path.clone(),
                    writer: None,
                    written: vec![],
                })
            }
            Mode::Write => {
                let path = resolve_write_path(spec, Some(".tar"))?;
                let file = File::create(&path)?;

                Ok(TarArchive {
                    path,
                    writer: Some(Builder::new(file)),
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

impl Archive for TarArchive {
    fn namelist(&mut self) -> Result<Vec<String>> {
        if self.writer.is_some() {
            return Ok(self.written.clone());
        }

        let mut names = vec![];
        let mut reader = tar::Archive::new(File::open(&self.path)?);

        for entry in reader.entries()? {
            let entry = entry?;

            if entry.header().entry_type().is_file() {
                names.push(display_entryname(&entry.path()?.to_string_lossy()));
            }
        }

        Ok(names)
    }

    fn read_as_bytes(&mut self, entryname: &str) -> Result<Vec<u8>> {
        if self.writer.is_some() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::Other,
                "tar archive is open for writing",
            )));
        }

        let wanted = canonical_entryname(entryname);
        let mut reader = tar::Archive::new(File::open(&self.path)?);

        for entry in reader.entries()? {
            let mut entry = entry?;

            if !entry.header().entry_type().is_file() {
                continue;
            }

            if entry.path()?.to_string_lossy() == wanted {
                let mut data = Vec::with_capacity(entry.size() as usize);
                entry.read_to_end(&mut data)?;

                return Ok(data);
            }
        }

        Err(Error::NotFound(entryname.to_string()))
    }

    fn write(&mut self, entryname: &str, data: &[u8]) -> Result<()> {
        let writer = self.writer.as_mut().ok_or(Error::Closed)?;
        let name = canonical_entryname(entryname);

        let mut header = Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();

        writer.append_data(&mut header, name, data)?;
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

impl Drop for TarArchive {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!("failed to close tar archive {:?}: {}", self.path, err);
        }
    }
}
