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

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::memory::MemoryArchive;

/// Path sentinel: in write mode the implementation allocates a unique
/// temporary path instead.
pub const TEMPFILE_PATH: &str = "<tempfile>";

/// Whether an archive is opened for reading or for writing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Read,
    Write,
}

/// The container format of an archive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Memory,
    Directory,
    Tar,
    Zip,
}

impl fmt::Display for Format {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Format::Memory => "memory",
            Format::Directory => "directory",
            Format::Tar => "tar",
            Format::Zip => "zip",
        };

        fmt.write_str(name)
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "memory" => Ok(Format::Memory),
            "directory" => Ok(Format::Directory),
            "tar" => Ok(Format::Tar),
            "zip" => Ok(Format::Zip),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Describes how to open an archive.
#[derive(Clone, Debug)]
pub struct ArchiveSpec {
    pub mode: Mode,

    /// A local path, or [`TEMPFILE_PATH`] in write mode.
    pub path: PathBuf,

    /// Explicit format; when `None` the format is inferred from the path
    /// with [`infer_format`].
    pub format: Option<Format>,

    /// When using the memory format, reuse this archive instead of creating
    /// a fresh one. Lets a caller keep a handle on the data across a
    /// session.
    pub memory_archive: Option<MemoryArchive>,
}

impl ArchiveSpec {
    /// A spec that opens the archive at `path` for reading.
    pub fn read<P: Into<PathBuf>>(path: P) -> ArchiveSpec {
        ArchiveSpec {
            mode: Mode::Read,
            path: path.into(),
            format: None,
            memory_archive: None,
        }
    }

    /// A spec that opens the archive at `path` for writing.
    pub fn write<P: Into<PathBuf>>(path: P) -> ArchiveSpec {
        ArchiveSpec {
            mode: Mode::Write,
            path: path.into(),
            format: None,
            memory_archive: None,
        }
    }

    /// A spec that writes a directory archive into a fresh temporary
    /// directory.
    pub fn write_to_tempdir() -> ArchiveSpec {
        ArchiveSpec::write(TEMPFILE_PATH).with_format(Format::Directory)
    }

    /// Overrides the format, bypassing inference.
    pub fn with_format(mut self, format: Format) -> ArchiveSpec {
        self.format = Some(format);
        self
    }

    /// Uses (and shares) the given memory archive.
    pub fn with_memory_archive(mut self, archive: MemoryArchive) -> ArchiveSpec {
        self.format = Some(Format::Memory);
        self.memory_archive = Some(archive);
        self
    }
}

impl Default for ArchiveSpec {
    fn default() -> ArchiveSpec {
        ArchiveSpec::write_to_tempdir()
    }
}

/// Infers the archive format from a path: an existing directory is
/// [`Format::Directory`], otherwise the filename suffix selects
/// [`Format::Tar`] or [`Format::Zip`]. Returns `None` when nothing matches.
pub fn infer_format(path: &Path) -> Option<Format> {
    if path.is_dir() {
        return Some(Format::Directory);
    }

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("tar") => Some(Format::Tar),
        Some("zip") => Some(Format::Zip),
        _ => None,
    }
}

/// Resolves the target path of a write-mode spec, allocating a unique
/// temporary path when it is the [`TEMPFILE_PATH`] sentinel. `suffix` is
/// `None` for directory targets and the filename suffix otherwise.
pub(crate) fn resolve_write_path(spec: &ArchiveSpec, suffix: Option<&str>) -> Result<PathBuf> {
    if spec.path != Path::new(TEMPFILE_PATH) {
        return Ok(spec.path.clone());
    }

    let builder = {
        let mut builder = tempfile::Builder::new();
        builder.prefix("protobag");
        builder
    };

    match suffix {
        None => Ok(builder.tempdir()?.into_path()),
        Some(suffix) => {
            let mut builder = builder;
            builder.suffix(suffix);

            let path = builder
                .tempfile()?
                .into_temp_path()
                .keep()
                .map_err(|err| err.error)?;

            Ok(path)
        }
    }
}
