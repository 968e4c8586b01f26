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

//! Byte-keyed archive containers for protobag.
//!
//! An [`Archive`] maps path-like entry names to byte blobs. Four
//! implementations are provided and selected at open time from an
//! [`ArchiveSpec`]:
//!
//! * [`MemoryArchive`]: an in-process map, mainly for testing.
//! * [`DirectoryArchive`]: a filesystem directory treated as an archive.
//! * [`TarArchive`]: a streaming tar file.
//! * [`ZipArchive`]: a zip file with deflate compression.
//!
//! Entry names are canonicalized identically by every implementation: a
//! leading path separator is stripped before the name is used as a key, and
//! [`Archive::namelist`] re-emits names with the leading separator. Bytes
//! written under a name through one implementation are therefore readable
//! under the same name through any other.

mod directory;
mod error;
mod memory;
mod spec;
mod tar;
mod util;
mod zip;

use log::debug;

pub use crate::directory::DirectoryArchive;
pub use crate::error::{Error, Result};
pub use crate::memory::MemoryArchive;
pub use crate::spec::{infer_format, ArchiveSpec, Format, Mode, TEMPFILE_PATH};
pub use crate::tar::TarArchive;
pub use crate::util::{
    all_files_recursive, create_archive_at_path, create_archive_from_dir, is_directory,
    unpack_archive_to_dir,
};
pub use crate::zip::ZipArchive;

/// A byte-keyed container of named entries.
///
/// Writes are append-only; an entry cannot be rewritten. [`Archive::close`]
/// flushes pending state and is idempotent; implementations also close
/// themselves when dropped.
pub trait Archive {
    /// Returns the names of all regular entries, each with a leading path
    /// separator. The ordering is unspecified but stable within a call.
    fn namelist(&mut self) -> Result<Vec<String>>;

    /// Reads the bytes stored under `entryname`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such entry exists; the caller may
    /// choose to tolerate it.
    fn read_as_bytes(&mut self, entryname: &str) -> Result<Vec<u8>>;

    /// Stores `data` under `entryname`, creating intermediate containers
    /// (subdirectories, archive member headers) as needed.
    fn write(&mut self, entryname: &str, data: &[u8]) -> Result<()>;

    /// Flushes pending state. Idempotent.
    fn close(&mut self) -> Result<()>;
}

/// Opens the archive described by `spec`, dispatching on its format.
///
/// A missing format is inferred from the path with [`infer_format`]; an
/// explicit format bypasses inference.
pub fn open_archive(spec: &ArchiveSpec) -> Result<Box<dyn Archive>> {
    let format = match spec.format {
        Some(format) => format,
        None => infer_format(&spec.path)
            .ok_or_else(|| Error::UnsupportedFormat(spec.path.display().to_string()))?,
    };

    debug!("opening {} archive at {:?}", format, spec.path);

    match format {
        Format::Memory => match &spec.memory_archive {
            Some(archive) => Ok(Box::new(archive.clone())),
            None => Ok(Box::new(MemoryArchive::new())),
        },
        Format::Directory => Ok(Box::new(DirectoryArchive::open(spec)?)),
        Format::Tar => Ok(Box::new(TarArchive::open(spec)?)),
        Format::Zip => Ok(Box::new(ZipArchive::open(spec)?)),
    }
}

/// Strips the leading path separator, turning a display name into the
/// internal key. All implementations must use this before touching storage.
pub(crate) fn canonical_entryname(entryname: &str) -> &str {
    entryname.strip_prefix('/').unwrap_or(entryname)
}

/// Turns an internal key back into the display form emitted by `namelist`.
pub(crate) fn display_entryname(canonical: &str) -> String {
    format!("/{}", canonical)
}
