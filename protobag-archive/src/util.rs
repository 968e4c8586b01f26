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

//! Bulk pack/unpack helpers for tar and zip archives.
//!
//! Every entry is copied between its source reader and destination writer
//! in bounded-size chunks, so no entry is ever held in memory as a whole.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tar::{Builder, Header};
use zip::read::ZipArchive as ZipReader;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};
use crate::spec::{infer_format, Format};
use crate::canonical_entryname;

const COPY_CHUNK_SIZE: usize = 8192;

fn copy_chunked<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> Result<u64> {
    let mut buf = [0; COPY_CHUNK_SIZE];
    let mut num_bytes = 0;

    loop {
        let n = reader.read(&mut buf)?;

        if n == 0 {
            break;
        }

        writer.write_all(&buf[..n])?;
        num_bytes += n as u64;
    }

    Ok(num_bytes)
}

/// Tests whether `path` is an existing directory.
pub fn is_directory(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// Collects all regular files below `dir`, recursively.
pub fn all_files_recursive(dir: &Path) -> Result<Vec<PathBuf>> {
    fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;

            if file_type.is_dir() {
                walk(&entry.path(), out)?;
            } else if file_type.is_file() {
                out.push(entry.path());
            }
        }

        Ok(())
    }

    let mut files = vec![];
    walk(dir, &mut files)?;

    Ok(files)
}

fn packed_format(path: &Path, format: Option<Format>) -> Result<Format> {
    let format = match format {
        Some(format) => format,
        None => infer_format(path)
            .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))?,
    };

    match format {
        Format::Tar | Format::Zip => Ok(format),
        _ => Err(Error::UnsupportedFormat(format.to_string())),
    }
}

/// Unpacks every entry of the tar/zip archive at `archive_path` into
/// `dest_dir`, creating directories as needed.
pub fn unpack_archive_to_dir(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    fs::create_dir_all(dest_dir)?;

    match packed_format(archive_path, None)? {
        Format::Tar => {
            let mut reader = tar::Archive::new(File::open(archive_path)?);

            for entry in reader.entries()? {
                let mut entry = entry?;

                if !entry.header().entry_type().is_file() {
                    continue;
                }

                let dest = dest_dir.join(entry.path()?);

                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }

                let mut file = File::create(dest)?;
                copy_chunked(&mut entry, &mut file)?;
            }
        }
        Format::Zip => {
            let mut reader = ZipReader::new(File::open(archive_path)?)?;

            for i in 0..reader.len() {
                let mut entry = reader.by_index(i)?;

                if !entry.is_file() {
                    continue;
                }

                let name = match entry.enclosed_name() {
                    Some(name) => name.to_path_buf(),
                    None => continue,
                };

                let dest = dest_dir.join(name);

                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }

                let mut file = File::create(dest)?;
                copy_chunked(&mut entry, &mut file)?;
            }
        }
        _ => unreachable!(),
    }

    Ok(())
}

fn entryname_for(path: &Path, base_dir: Option<&Path>) -> String {
    let rel = match base_dir {
        Some(base) => path.strip_prefix(base).unwrap_or(path),
        None => path,
    };

    canonical_entryname(&rel.to_string_lossy()).to_string()
}

/// Builds a tar/zip archive at `destination` from `files`. Entry names are
/// the file paths relative to `base_dir` when given.
pub fn create_archive_at_path(
    files: &[PathBuf],
    destination: &Path,
    format: Option<Format>,
    base_dir: Option<&Path>,
) -> Result<()> {
    match packed_format(destination, format)? {
        Format::Tar => {
            let mut writer = Builder::new(File::create(destination)?);

            for path in files {
                let file = File::open(path)?;
                let len = file.metadata()?.len();

                let mut header = Header::new_gnu();
                header.set_size(len);
                header.set_mode(0o644);
                header.set_cksum();

                writer.append_data(&mut header, entryname_for(path, base_dir), file)?;
            }

            writer.finish()?;
        }
        Format::Zip => {
            let mut writer = ZipWriter::new(File::create(destination)?);
            let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

            for path in files {
                writer.start_file(entryname_for(path, base_dir), options)?;
                copy_chunked(&mut File::open(path)?, &mut writer)?;
            }

            writer.finish()?;
        }
        _ => unreachable!(),
    }

    Ok(())
}

/// Builds a tar/zip archive at `destination` from every file below
/// `src_dir`; entry names are relative to `src_dir`.
pub fn create_archive_from_dir(
    src_dir: &Path,
    destination: &Path,
    format: Option<Format>,
) -> Result<()> {
    let files = all_files_recursive(src_dir)?;

    create_archive_at_path(&files, destination, format, Some(src_dir))
}
