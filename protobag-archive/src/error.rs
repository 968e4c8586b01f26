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

use std::{io, result};

use thiserror::Error;

/// Error type of this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error has occured in the backing storage.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The named entry is not in the archive.
    ///
    /// This is a first-class variant so callers can choose to tolerate a
    /// missing entry.
    #[error("no such entry: {0}")]
    NotFound(String),

    /// The archive format is unknown or not supported.
    #[error("unsupported archive format for {0}")]
    UnsupportedFormat(String),

    /// The archive was closed (or never opened for writing) and cannot
    /// accept the operation.
    #[error("archive is not open for writing")]
    Closed,

    /// An error reported by the zip codec.
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

/// The [`Result`](result::Result) type of this crate.
pub type Result<T> = result::Result<T, Error>;
