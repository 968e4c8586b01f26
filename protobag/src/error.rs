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

use std::result;

use thiserror::Error;

/// Error type of this crate.
///
/// Note that end-of-sequence is *not* an error: iteration APIs signal it
/// with `Ok(None)`.
#[derive(Debug, Error)]
pub enum Error {
    /// The backing archive failed.
    #[error(transparent)]
    Archive(protobag_archive::Error),

    /// A specific entry name is absent from the bag.
    ///
    /// Read sessions surface this only when their plan requires every
    /// entry; otherwise the missing entry is skipped.
    #[error("no such entry: {0}")]
    NotFound(String),

    /// A write was attempted with neither an entry name nor a topic.
    #[error("invalid entry: {0}")]
    InvalidEntry(String),

    /// Envelope bytes could not be parsed as either binary or text.
    #[error("could not decode {name}: {reason}")]
    Decode { name: String, reason: String },

    /// The selection carries no supported criterion.
    #[error("unsupported selection")]
    UnsupportedSelection,

    /// The read plan required entries or coordinates that are not in the
    /// bag.
    #[error("missing required entries: {0:?}")]
    MissingRequired(Vec<String>),

    /// The bag has no index entry; unindexed bags cannot be read.
    #[error("bag has no index")]
    IndexAbsent,

    /// The session was closed and cannot accept further operations.
    #[error("session is closed")]
    SessionClosed,
}

impl Error {
    pub(crate) fn decode<S: ToString, R: ToString>(name: S, reason: R) -> Error {
        Error::Decode {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<protobag_archive::Error> for Error {
    fn from(cause: protobag_archive::Error) -> Self {
        // Keep NotFound first-class at this level so read plans can match
        // on it.
        match cause {
            protobag_archive::Error::NotFound(name) => Error::NotFound(name),
            cause => Error::Archive(cause),
        }
    }
}

/// The [`Result`](result::Result) type of this crate.
pub type Result<T> = result::Result<T, Error>;
