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

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::path::Path;

use log::debug;
use protobag_archive::{open_archive, Archive, ArchiveSpec};
use protobag_proto::selection::Criteria;
use protobag_proto::{BagIndex, Selection};

use crate::entry::{entry_is_in_topic, Entry, PROTOBAG_INDEX_TOPIC};
use crate::error::{Error, Result};
use crate::pb::{decode_any, unpack_any};
use crate::select;
use crate::time::{event_key, ts_key};

/// Configuration of a [`ReadSession`].
#[derive(Clone, Debug)]
pub struct ReadSessionSpec {
    pub archive_spec: ArchiveSpec,

    /// Which subset of the bag to read.
    pub selection: Selection,

    /// Peel stamped carriers before yielding, so entries carry their topic
    /// and timestamp in the context.
    pub unpack_stamped_messages: bool,
}

impl ReadSessionSpec {
    /// A spec that reads every entry of the bag at `path`.
    pub fn read_all_from_path<P: Into<std::path::PathBuf>>(path: P) -> ReadSessionSpec {
        ReadSessionSpec {
            archive_spec: ArchiveSpec::read(path),
            selection: select::all(),
            unpack_stamped_messages: true,
        }
    }

    /// A spec that reads the selected subset of the bag at `path`.
    pub fn for_path<P: Into<std::path::PathBuf>>(path: P, selection: Selection) -> ReadSessionSpec {
        ReadSessionSpec {
            archive_spec: ArchiveSpec::read(path),
            selection,
            unpack_stamped_messages: true,
        }
    }
}

/// The compiled form of a [`Selection`]: a FIFO of entry names to read.
#[derive(Debug)]
struct ReadPlan {
    entries_to_read: VecDeque<String>,

    /// A missing name is a hard error rather than skipped.
    require_all: bool,

    /// Skip envelope decoding and yield raw bytes.
    raw_mode: bool,
}

/// Replays a selected subset of a bag.
///
/// The plan is compiled lazily on the first pull: the session locates the
/// latest index entry, compiles the selection against it and then emits
/// entries in plan order. For Events and Window selections that order is
/// ascending `(timestamp, topic, entryname)`.
///
/// [`next_entry`](ReadSession::next_entry) returns `Ok(None)` at the end of
/// the sequence; the session also implements [`Iterator`].
pub struct ReadSession {
    archive: Box<dyn Archive>,
    spec: ReadSessionSpec,
    plan: Option<ReadPlan>,
}

impl ReadSession {
    /// Opens the backing archive. The bag's index is not touched until the
    /// first pull.
    pub fn open(spec: ReadSessionSpec) -> Result<ReadSession> {
        let archive = open_archive(&spec.archive_spec)?;

        Ok(ReadSession {
            archive,
            spec,
            plan: None,
        })
    }

    /// Pulls the next entry of the plan, or `Ok(None)` at the end of the
    /// sequence.
    ///
    /// # Errors
    ///
    /// [`Error::IndexAbsent`] when the bag has no index entry;
    /// [`Error::NotFound`] when a required entry is missing (a missing
    /// entry is silently skipped unless the plan requires it); decoding
    /// and archive errors are passed through.
    pub fn next_entry(&mut self) -> Result<Option<Entry>> {
        if self.plan.is_none() {
            let plan = self.compile_plan()?;

            debug!("compiled read plan with {} entries", plan.entries_to_read.len());
            self.plan = Some(plan);
        }

        loop {
            let (entryname, raw_mode, require_all) = {
                let plan = match self.plan.as_mut() {
                    Some(plan) => plan,
                    None => return Ok(None),
                };

                match plan.entries_to_read.pop_front() {
                    Some(entryname) => (entryname, plan.raw_mode, plan.require_all),
                    None => return Ok(None),
                }
            };

            let unpack = self.spec.unpack_stamped_messages;

            match read_entry_from(self.archive.as_mut(), &entryname, raw_mode, unpack) {
                Ok(entry) => return Ok(Some(entry)),
                Err(Error::NotFound(name)) => {
                    if require_all {
                        return Err(Error::NotFound(name));
                    }

                    // Tolerated; advance to the next name.
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Reads the latest index of the bag at `path` without replaying any
    /// entries.
    pub fn index_for_path(path: &Path) -> Result<BagIndex> {
        let mut archive = open_archive(&ArchiveSpec::read(path))?;

        read_latest_index(archive.as_mut())
    }

    /// Lists the indexed topics of the bag at `path`, sorted.
    pub fn all_topics(path: &Path) -> Result<Vec<String>> {
        let index = ReadSession::index_for_path(path)?;

        let mut topics: Vec<String> = index.topic_to_stats.keys().cloned().collect();
        topics.sort();

        Ok(topics)
    }

    fn compile_plan(&mut self) -> Result<ReadPlan> {
        let index = read_latest_index(self.archive.as_mut())?;

        match &self.spec.selection.criteria {
            Some(Criteria::SelectAll(all)) => {
                // Indexed entries first, in time order; everything else
                // (index entries, raw entries) after, in namelist order.
                let mut entries_to_read: VecDeque<String> = index
                    .time_ordered_entries
                    .iter()
                    .map(|tt| tt.entryname.clone())
                    .collect();

                // Compare names with the leading separator stripped; the
                // index records what the writer passed, the namelist emits
                // the display form.
                let indexed: HashSet<&str> = index
                    .time_ordered_entries
                    .iter()
                    .map(|tt| tt.entryname.as_str().trim_start_matches('/'))
                    .collect();

                for name in self.archive.namelist()? {
                    if !indexed.contains(name.trim_start_matches('/')) {
                        entries_to_read.push_back(name);
                    }
                }

                Ok(ReadPlan {
                    entries_to_read,
                    require_all: false,
                    raw_mode: all.all_entries_are_raw,
                })
            }
            Some(Criteria::Entrynames(sel)) => Ok(ReadPlan {
                entries_to_read: sel.entrynames.iter().cloned().collect(),
                require_all: !sel.ignore_missing_entries,
                raw_mode: sel.entries_are_raw,
            }),
            Some(Criteria::Events(sel)) => {
                // Match on (topic, timestamp) only; entry names are ignored.
                let events: BTreeSet<_> = sel.events.iter().map(event_key).collect();

                let mut entries_to_read = VecDeque::new();
                let mut matched = BTreeSet::new();

                for tt in &index.time_ordered_entries {
                    let key = event_key(tt);

                    if events.contains(&key) {
                        entries_to_read.push_back(tt.entryname.clone());
                        matched.insert(key);
                    }
                }

                if sel.require_all && matched.len() < events.len() {
                    let missing: Vec<String> = events
                        .difference(&matched)
                        .map(|(seconds, nanos, topic)| {
                            format!("({}, {}.{})", topic, seconds, nanos)
                        })
                        .collect();

                    return Err(Error::MissingRequired(missing));
                }

                Ok(ReadPlan {
                    entries_to_read,
                    require_all: sel.require_all,
                    raw_mode: false,
                })
            }
            Some(Criteria::Window(sel)) => {
                let include: HashSet<&str> = sel.topics.iter().map(String::as_str).collect();
                let exclude: HashSet<&str> =
                    sel.exclude_topics.iter().map(String::as_str).collect();

                let mut entries_to_read = VecDeque::new();

                for tt in &index.time_ordered_entries {
                    if exclude.contains(tt.topic.as_str()) {
                        continue;
                    }

                    if !include.is_empty() && !include.contains(tt.topic.as_str()) {
                        continue;
                    }

                    let key = ts_key(&tt.timestamp);

                    if let Some(start) = &sel.start {
                        if key < ts_key(&Some(start.clone())) {
                            continue;
                        }
                    }

                    if let Some(end) = &sel.end {
                        if ts_key(&Some(end.clone())) < key {
                            continue;
                        }
                    }

                    entries_to_read.push_back(tt.entryname.clone());
                }

                Ok(ReadPlan {
                    entries_to_read,
                    require_all: false,
                    raw_mode: false,
                })
            }
            None => Err(Error::UnsupportedSelection),
        }
    }
}

impl Iterator for ReadSession {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().transpose()
    }
}

/// Reads one entry from the archive, optionally decoding the envelope and
/// unwrapping a stamped carrier.
fn read_entry_from(
    archive: &mut dyn Archive,
    entryname: &str,
    raw_mode: bool,
    unpack_stamped: bool,
) -> Result<Entry> {
    let data = archive.read_as_bytes(entryname)?;

    if raw_mode {
        return Ok(Entry::raw_from_bytes(entryname, data));
    }

    let any = decode_any(entryname, &data)?;
    let entry = Entry {
        entryname: entryname.to_string(),
        msg: any,
        ctx: None,
    };

    if unpack_stamped && entry.is_stamped() {
        entry.unpack_stamped()
    } else {
        Ok(entry)
    }
}

/// Scans the bag for index entries and returns the one with the latest
/// stamp.
///
/// # Errors
///
/// [`Error::IndexAbsent`] when the bag carries no readable index entry.
pub(crate) fn read_latest_index(archive: &mut dyn Archive) -> Result<BagIndex> {
    let mut latest: Option<Entry> = None;

    for entryname in archive.namelist()? {
        if !entry_is_in_topic(&entryname, PROTOBAG_INDEX_TOPIC) {
            continue;
        }

        // Unreadable index entries are skipped; any other index entry may
        // still serve.
        let entry = match read_entry_from(archive, &entryname, false, true) {
            Ok(entry) => entry,
            Err(_) => continue,
        };

        let stamp = match &entry.ctx {
            Some(ctx) => ts_key(&ctx.stamp),
            None => continue,
        };

        let newer = match &latest {
            Some(current) => {
                let current_stamp = current
                    .ctx
                    .as_ref()
                    .map(|ctx| ts_key(&ctx.stamp))
                    .unwrap_or((0, 0));

                stamp > current_stamp
            }
            None => true,
        };

        if newer {
            latest = Some(entry);
        }
    }

    match latest {
        Some(entry) => unpack_any(&entry.msg),
        None => Err(Error::IndexAbsent),
    }
}
