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

//! An [`Archive`] implementation which stores all entries in memory.
//!
//! **This implementation is mainly used for testing and documentation.**

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::{canonical_entryname, display_entryname, Archive};


/// The [`Archive`] implementation itself.
///
/// Entry bytes live in a map shared by all clones of the handle, so a
/// caller can hold on to the data while a session owns another clone.
/// Sessions are single-threaded by contract, hence the plain `Rc`.
#[derive(Clone, Debug, Default)]
pub struct MemoryArchive {
    entries: Rc<RefCell<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryArchive {
    /// Creates a new, empty archive.
    pub fn new() -> MemoryArchive {
        MemoryArchive::default()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Tests whether the archive has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Receives a copy of the bytes stored under `entryname`, or [`None`]
    /// if there is no such entry.
    pub fn get(&self, entryname: &str) -> Option<Vec<u8>> {
        self.entries
            .borrow()
            .get(canonical_entryname(entryname))
            .cloned()
    }
}

impl Archive for MemoryArchive {
    fn namelist(&mut self) -> Result<Vec<String>> {
        Ok(self
            .entries
            .borrow()
            .keys()
            .map(|name| display_entryname(name))
            .collect())
    }

    fn read_as_bytes(&mut self, entryname: &str) -> Result<Vec<u8>> {
        self.entries
            .borrow()
            .get(canonical_entryname(entryname))
            .cloned()
            .ok_or_else(|| Error::NotFound(entryname.to_string()))
    }

    fn write(&mut self, entryname: &str, data: &[u8]) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(canonical_entryname(entryname).to_string(), data.to_vec());

        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
