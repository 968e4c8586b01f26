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

use std::path::PathBuf;

use protobag_proto::{BagIndex, Selection};

use crate::error::Result;
use crate::read::{ReadSession, ReadSessionSpec};
use crate::write::{WriteSession, WriteSessionSpec};

/// Convenience handle on a bag at a fixed path.
#[derive(Clone, Debug)]
pub struct Protobag {
    pub path: PathBuf,
}

impl Protobag {
    pub fn new<P: Into<PathBuf>>(path: P) -> Protobag {
        Protobag { path: path.into() }
    }

    /// Starts a write session into this bag with default indexing.
    pub fn write_session(&self) -> Result<WriteSession> {
        WriteSession::open(WriteSessionSpec::for_path(&self.path))
    }

    /// Starts a read session over the selected subset of this bag.
    pub fn read_entries(&self, selection: Selection) -> Result<ReadSession> {
        ReadSession::open(ReadSessionSpec::for_path(&self.path, selection))
    }

    /// Reads the bag's latest index.
    pub fn index(&self) -> Result<BagIndex> {
        ReadSession::index_for_path(&self.path)
    }

    /// Lists the bag's indexed topics, sorted.
    pub fn topics(&self) -> Result<Vec<String>> {
        ReadSession::all_topics(&self.path)
    }
}
