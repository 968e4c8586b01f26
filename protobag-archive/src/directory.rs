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

//! An [`Archive`] implementation backed by a filesystem directory.
//!
//! Every entry is a regular file below the root directory; the entry name
//! is its path relative to the root. Subdirectories are created on demand
//! when entries are written.

use std::path::{Path, PathBuf};
use std::{fs, io};

use crate::error::{Error, Result};
use crate::spec::{resolve_write_path, ArchiveSpec, Mode};
use crate::{canonical_entryname, Archive};

#[cfg(test)]
mod tests;

/// The [`Archive`] implementation itself.
#[derive(Debug)]
pub struct DirectoryArchive {
    root: PathBuf,
}

impl DirectoryArchive {
    /// Opens a directory archive as described by `spec`.
    ///
    /// In read mode the directory must exist. In write mode the directory
    /// is created if missing; the [`TEMPFILE_PATH`](crate::TEMPFILE_PATH)
    /// sentinel allocates a fresh temporary directory.
    pub fn open(spec: &ArchiveSpec) -> Result<DirectoryArchive> {
        let root = match spec.mode {
            Mode::Read => {
                if !spec.path.is_dir() {
                    return Err(Error::Io(io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("no such directory: {}", spec.path.display()),
                    )));
                }

                spec.path.clone()
            }
            Mode::Write => {
                let root = resolve_write_path(spec, None)?;

                fs::create_dir_all(&root)?;
                root
            }
        };

        Ok(DirectoryArchive { root })
    }

    /// Returns the root directory of the archive.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<String>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let path = entry.path();

        if file_type.is_dir() {
            collect_files(root, &path, out)?;
        } else if file_type.is_file() {
            let rel = match path.strip_prefix(root) {
                Ok(rel) => rel,
                Err(_) => continue,
            };

            out.push(format!("/{}", rel.to_string_lossy()));
        }
    }

    Ok(())
}

impl Archive for DirectoryArchive {
    fn namelist(&mut self) -> Result<Vec<String>> {
        let mut names = vec![];

        collect_files(&self.root, &self.root, &mut names)?;
        names.sort();

        Ok(names)
    }

    fn read_as_bytes(&mut self, entryname: &str) -> Result<Vec<u8>> {
        let path = self.root.join(canonical_entryname(entryname));

        if !path.is_file() {
            return Err(Error::NotFound(entryname.to_string()));
        }

        Ok(fs::read(path)?)
    }

    fn write(&mut self, entryname: &str, data: &[u8]) -> Result<()> {
        let path = self.root.join(canonical_entryname(entryname));

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, data)?;

        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
