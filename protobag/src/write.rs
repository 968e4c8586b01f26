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

use chrono::prelude::*;
use log::{debug, warn};
use prost_types::Timestamp;
use protobag_archive::{open_archive, Archive, ArchiveSpec};

use crate::entry::{Entry, PROTOBAG_INDEX_TOPIC};
use crate::error::{Error, Result};
use crate::index::BagIndexBuilder;
use crate::pb::{encode_any, Encoding};
use crate::time::ts;

fn now() -> Timestamp {
    let now = if cfg!(test) {
        Utc.with_ymd_and_hms(2020, 5, 17, 9, 10, 11).unwrap()
    } else {
        Utc::now()
    };

    ts(now.timestamp(), now.timestamp_subsec_nanos() as i32)
}

/// Configuration of a [`WriteSession`].
#[derive(Clone, Debug)]
pub struct WriteSessionSpec {
    pub archive_spec: ArchiveSpec,

    /// Record every stamped entry's coordinate in the index.
    pub save_timeseries_index: bool,

    /// Record descriptor closures in the index so readers can decode
    /// payloads without the producer's message definitions.
    pub save_descriptor_index: bool,
}

impl WriteSessionSpec {
    /// A spec that writes the bag at `path` with both indexing features
    /// enabled.
    pub fn for_path<P: Into<std::path::PathBuf>>(path: P) -> WriteSessionSpec {
        WriteSessionSpec {
            archive_spec: ArchiveSpec::write(path),
            ..Default::default()
        }
    }

    fn should_do_indexing(&self) -> bool {
        self.save_timeseries_index || self.save_descriptor_index
    }
}

impl Default for WriteSessionSpec {
    fn default() -> WriteSessionSpec {
        WriteSessionSpec {
            archive_spec: ArchiveSpec::default(),
            save_timeseries_index: true,
            save_descriptor_index: true,
        }
    }
}

/// Streams entries into a bag.
///
/// Entries are serialized and appended to the backing archive; every stored
/// entry is observed into a [`BagIndexBuilder`]. [`close`](WriteSession::close)
/// seals the index into the bag as a stamped entry on the reserved
/// [`PROTOBAG_INDEX_TOPIC`] and invalidates the session.
pub struct WriteSession {
    archive: Option<Box<dyn Archive>>,
    indexer: Option<BagIndexBuilder>,
}

impl WriteSession {
    /// Opens the backing archive and prepares the index builder.
    pub fn open(spec: WriteSessionSpec) -> Result<WriteSession> {
        let archive = open_archive(&spec.archive_spec)?;

        let indexer = if spec.should_do_indexing() {
            let mut indexer = BagIndexBuilder::new();
            indexer.enable_timeseries_indexing(spec.save_timeseries_index);
            indexer.enable_descriptor_indexing(spec.save_descriptor_index);
            Some(indexer)
        } else {
            None
        };

        Ok(WriteSession {
            archive: Some(archive),
            indexer,
        })
    }

    /// Writes an entry in the default binary encoding. Returns the final
    /// entry name.
    pub fn write_entry(&mut self, entry: Entry) -> Result<String> {
        self.write_entry_as(entry, Encoding::Binary)
    }

    /// Writes an entry in the given encoding. Returns the final entry name.
    ///
    /// An entry without a name must carry a topic; its name is derived as
    /// `{topic}/{secs}.{nanos}.stampedmsg.{suffix}`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidEntry`] when neither an entry name nor a topic is
    /// available; [`Error::SessionClosed`] after [`close`](Self::close).
    pub fn write_entry_as(&mut self, entry: Entry, encoding: Encoding) -> Result<String> {
        let archive = self.archive.as_mut().ok_or(Error::SessionClosed)?;

        let entryname = if entry.entryname.is_empty() {
            derive_entryname(&entry, encoding)?
        } else {
            entry.entryname.clone()
        };

        let data = encode_any(&entry.msg, encoding);

        archive.write(&entryname, &data)?;

        if let Some(indexer) = &mut self.indexer {
            indexer.observe(&entry, &entryname);
        }

        Ok(entryname)
    }

    /// Seals the bag: completes the index, writes it as a single stamped
    /// entry at the current wall clock and closes the archive. Idempotent;
    /// the session accepts no further writes afterwards.
    ///
    /// An index-write failure is reported here but does not retroactively
    /// fail earlier writes.
    pub fn close(&mut self) -> Result<()> {
        let mut result = Ok(());

        if let Some(indexer) = self.indexer.take() {
            let index = indexer.complete();

            debug!(
                "sealing index: {} time-ordered entries over {} topics",
                index.time_ordered_entries.len(),
                index.topic_to_stats.len()
            );

            let entry = Entry::stamped_at(PROTOBAG_INDEX_TOPIC, now(), &index);

            if let Err(err) = self.write_entry(entry) {
                result = Err(err);
            }
        }

        if let Some(mut archive) = self.archive.take() {
            if let Err(err) = archive.close() {
                if result.is_ok() {
                    result = Err(err.into());
                }
            }
        }

        result
    }
}

impl Drop for WriteSession {
    fn drop(&mut self) {
        if self.archive.is_some() {
            if let Err(err) = self.close() {
                warn!("failed to close write session: {}", err);
            }
        }
    }
}

fn derive_entryname(entry: &Entry, encoding: Encoding) -> Result<String> {
    let tt = entry.topic_time().ok_or_else(|| {
        Error::InvalidEntry("entry needs an entryname or a topic and timestamp".to_string())
    })?;

    if tt.topic.is_empty() {
        return Err(Error::InvalidEntry(
            "entry must have an entryname or a topic".to_string(),
        ));
    }

    let stamp = tt.timestamp.unwrap_or_default();

    Ok(format!(
        "{}/{}.{}.stampedmsg.{}",
        tt.topic,
        stamp.seconds,
        stamp.nanos,
        encoding.suffix()
    ))
}
