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

use std::collections::{HashMap, HashSet, VecDeque};

use prost::Name;
use prost_types::{DescriptorProto, EnumDescriptorProto, FileDescriptorProto, FileDescriptorSet};
use protobag_proto::descriptor::stamped_message_descriptor_set;
use protobag_proto::{bag_index, BagIndex, StampedMessage, TopicTime};

use crate::entry::Entry;
use crate::pb::type_name_from_url;
use crate::time::{coord_cmp, max_timestamp, min_timestamp, ts_key};

#[cfg(test)]
mod tests;

/// Pseudo entry name under which the stamped-carrier type itself is
/// indexed, so readers can always decode the outer envelope.
const STAMPED_MESSAGE_PSEUDO_ENTRY: &str = "_protobag.StampedMessage";

/// Accumulates a [`BagIndex`] while a write session streams entries.
///
/// The write session calls [`observe`](BagIndexBuilder::observe) for every
/// entry it stores and finally [`complete`](BagIndexBuilder::complete),
/// which consumes the builder and returns the finished index.
pub struct BagIndexBuilder {
    index: BagIndex,
    do_timeseries: bool,
    do_descriptors: bool,
    pending: Vec<TopicTime>,
    type_url_to_fds: HashMap<String, FileDescriptorSet>,
    entryname_to_type_url: HashMap<String, String>,
}

impl BagIndexBuilder {
    /// Creates a builder with both indexing features enabled.
    ///
    /// The time bounds start out inverted (`start` at the maximum
    /// timestamp, `end` at the minimum) and tighten as stamped entries are
    /// observed.
    pub fn new() -> BagIndexBuilder {
        BagIndexBuilder {
            index: BagIndex {
                start: Some(max_timestamp()),
                end: Some(min_timestamp()),
                protobag_version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            do_timeseries: true,
            do_descriptors: true,
            pending: vec![],
            type_url_to_fds: HashMap::new(),
            entryname_to_type_url: HashMap::new(),
        }
    }

    /// Enables or disables timeseries indexing.
    pub fn enable_timeseries_indexing(&mut self, enabled: bool) {
        self.do_timeseries = enabled;
    }

    /// Enables or disables descriptor indexing.
    pub fn enable_descriptor_indexing(&mut self, enabled: bool) {
        self.do_descriptors = enabled;
    }

    /// Observes one stored entry under its final entry name. An empty
    /// `final_entryname` falls back to the entry's own name.
    pub fn observe(&mut self, entry: &Entry, final_entryname: &str) {
        let entryname = if final_entryname.is_empty() {
            entry.entryname.as_str()
        } else {
            final_entryname
        };

        if self.do_timeseries && entry.is_stamped() {
            if let Some(mut tt) = entry.topic_time() {
                tt.entryname = entryname.to_string();

                let stats = self
                    .index
                    .topic_to_stats
                    .entry(tt.topic.clone())
                    .or_insert_with(bag_index::TopicStats::default);
                stats.n_messages += 1;

                let key = ts_key(&tt.timestamp);

                if key < ts_key(&self.index.start) {
                    self.index.start = tt.timestamp.clone();
                }
                if key > ts_key(&self.index.end) {
                    self.index.end = tt.timestamp.clone();
                }

                self.pending.push(tt);
            }
        }

        if self.do_descriptors {
            if let Some(ctx) = &entry.ctx {
                if let Some(fds) = &ctx.descriptor_data {
                    self.observe_descriptors(entryname, &ctx.inner_type_url, fds);
                }

                if entry.is_stamped() {
                    // Index the carrier type once so readers can always
                    // decode the outer envelope.
                    let fds = stamped_message_descriptor_set();
                    self.observe_descriptors(
                        STAMPED_MESSAGE_PSEUDO_ENTRY,
                        &StampedMessage::type_url(),
                        &fds,
                    );
                }
            }
        }
    }

    fn observe_descriptors(&mut self, entryname: &str, type_url: &str, fds: &FileDescriptorSet) {
        if entryname.is_empty() || type_url.is_empty() {
            return;
        }

        self.entryname_to_type_url
            .insert(entryname.to_string(), type_url.to_string());

        if self.type_url_to_fds.contains_key(type_url) {
            // Don't re-index.
            return;
        }

        let closure = file_closure_for_type(fds, type_name_from_url(type_url))
            .unwrap_or_else(|| fds.clone());

        self.type_url_to_fds.insert(type_url.to_string(), closure);
    }

    /// Finishes the index: drains and sorts the pending coordinates, moves
    /// the descriptor maps and returns the index. The builder is consumed.
    pub fn complete(self) -> BagIndex {
        let mut index = self.index;

        if self.do_timeseries {
            let mut entries = self.pending;
            entries.sort_by(coord_cmp);
            index.time_ordered_entries = entries;
        }

        if self.do_descriptors
            && !(self.type_url_to_fds.is_empty() && self.entryname_to_type_url.is_empty())
        {
            index.descriptor_pool_data = Some(bag_index::DescriptorPoolData {
                type_url_to_descriptor: self.type_url_to_fds,
                entryname_to_type_url: self.entryname_to_type_url,
            });
        }

        index
    }
}

impl Default for BagIndexBuilder {
    fn default() -> Self {
        BagIndexBuilder::new()
    }
}

/// Computes the schema-file closure of `type_name` within `fds`: the file
/// defining the type plus, transitively, every dependency present in
/// `fds`, each exactly once. Returns [`None`] when no file in `fds`
/// defines the type.
fn file_closure_for_type(fds: &FileDescriptorSet, type_name: &str) -> Option<FileDescriptorSet> {
    let by_name: HashMap<&str, &FileDescriptorProto> =
        fds.file.iter().map(|file| (file.name(), file)).collect();

    let root = fds.file.iter().find(|file| file_defines(file, type_name))?;

    // Breadth-first over the dependency graph; the visited set keeps the
    // walk out of cycles.
    let mut queue: VecDeque<&FileDescriptorProto> = VecDeque::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut collected = vec![];

    queue.push_back(root);

    while let Some(current) = queue.pop_front() {
        if !visited.insert(current.name().to_string()) {
            continue;
        }

        collected.push(current.clone());

        for dep in &current.dependency {
            if let Some(file) = by_name.get(dep.as_str()) {
                queue.push_back(file);
            }
        }
    }

    Some(FileDescriptorSet { file: collected })
}

fn file_defines(file: &FileDescriptorProto, type_name: &str) -> bool {
    let relative = if file.package().is_empty() {
        Some(type_name)
    } else {
        type_name
            .strip_prefix(file.package())
            .and_then(|rest| rest.strip_prefix('.'))
    };

    match relative {
        Some(relative) => scope_defines(&file.message_type, &file.enum_type, relative),
        None => false,
    }
}

fn scope_defines(
    messages: &[DescriptorProto],
    enums: &[EnumDescriptorProto],
    relative: &str,
) -> bool {
    match relative.split_once('.') {
        None => {
            messages.iter().any(|msg| msg.name() == relative)
                || enums.iter().any(|en| en.name() == relative)
        }
        Some((head, rest)) => messages
            .iter()
            .find(|msg| msg.name() == head)
            .map(|msg| scope_defines(&msg.nested_type, &msg.enum_type, rest))
            .unwrap_or(false),
    }
}
