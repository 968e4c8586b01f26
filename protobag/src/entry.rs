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

use prost::{Message, Name};
use prost_types::{Any, FileDescriptorSet, Timestamp};
use protobag_proto::{StampedMessage, TopicTime};

use crate::error::{Error, Result};
use crate::pb::{pack_any, type_name_from_url, unpack_any};
use crate::time::ts;


/// The reserved topic carrying bag-index entries. Any entry under
/// `/_protobag_index/` is bag-internal; user topics must not start with
/// that prefix.
pub const PROTOBAG_INDEX_TOPIC: &str = "/_protobag_index/bag_index";

/// The topic of an entry name: its parent path.
pub fn topic_from_entryname(entryname: &str) -> String {
    match entryname.rsplit_once('/') {
        Some(("", _)) if entryname.starts_with('/') => "/".to_string(),
        Some((parent, _)) => parent.to_string(),
        None => String::new(),
    }
}

/// Tests whether `entryname` lies under `topic`.
pub fn entry_is_in_topic(entryname: &str, topic: &str) -> bool {
    entryname.starts_with(topic)
}

/// Tests whether `topic` belongs to the reserved bag-internal namespace.
pub fn is_index_topic(topic: &str) -> bool {
    entry_is_in_topic(topic, "/_protobag_index")
}

/// Optional context of an entry, mainly for timeseries and descriptor
/// indexing.
#[derive(Clone, Debug, Default)]
pub struct Context {
    /// For timeseries data: the topic, a path-like string grouping a
    /// sequence of messages of one type.
    pub topic: String,

    /// For timeseries data: the time associated with the message.
    pub stamp: Option<Timestamp>,

    /// The type URL of the innermost message, once any stamped carrier is
    /// peeled.
    pub inner_type_url: String,

    /// For descriptor indexing: the schema files defining the innermost
    /// message type (and, transitively, everything it depends on). Only
    /// meaningful at write time; readers cannot populate it.
    pub descriptor_data: Option<FileDescriptorSet>,
}

/// A single bag record: a name, a typed payload envelope, and optional
/// timeseries context.
#[derive(Clone, Debug)]
pub struct Entry {
    /// The name of this entry, similar to a file path relative to the root
    /// of an archive. Never empty on read; if empty on write, a name is
    /// derived from the context's topic and time.
    pub entryname: String,

    /// The payload. An empty `type_url` marks a *raw* entry that skips all
    /// envelope decoding and indexing.
    pub msg: Any,

    pub ctx: Option<Context>,
}

impl Entry {
    /// Creates an entry carrying a typed message.
    pub fn packed<M, S>(entryname: S, msg: &M) -> Entry
    where
        M: Message + Name,
        S: Into<String>,
    {
        Entry {
            entryname: entryname.into(),
            msg: pack_any(msg),
            ctx: Some(Context {
                inner_type_url: M::type_url(),
                ..Default::default()
            }),
        }
    }

    /// Creates an entry from pre-encoded message bytes and their type URL.
    /// Whether `value` really is a message of that type is not checked.
    pub fn packed_unchecked<S, U>(entryname: S, type_url: U, value: Vec<u8>) -> Entry
    where
        S: Into<String>,
        U: Into<String>,
    {
        let type_url = type_url.into();

        Entry {
            entryname: entryname.into(),
            msg: Any {
                type_url: type_url.clone(),
                value,
            },
            ctx: Some(Context {
                inner_type_url: type_url,
                ..Default::default()
            }),
        }
    }

    /// Creates a raw entry: plain bytes with no type URL, no context and no
    /// indexing.
    pub fn raw_from_bytes<S: Into<String>>(entryname: S, value: Vec<u8>) -> Entry {
        Entry {
            entryname: entryname.into(),
            msg: Any {
                type_url: String::new(),
                value,
            },
            ctx: None,
        }
    }

    /// Creates a stamped entry: the message is packed into a
    /// [`StampedMessage`] carrier on `topic` at the given time. The entry
    /// name is left empty and derived at write time.
    pub fn stamped<M, S>(topic: S, seconds: i64, nanos: i32, msg: &M) -> Entry
    where
        M: Message + Name,
        S: Into<String>,
    {
        Entry::stamped_at(topic, ts(seconds, nanos), msg)
    }

    /// Like [`Entry::stamped`], with an explicit timestamp value.
    pub fn stamped_at<M, S>(topic: S, stamp: Timestamp, msg: &M) -> Entry
    where
        M: Message + Name,
        S: Into<String>,
    {
        let inner = pack_any(msg);
        let inner_type_url = inner.type_url.clone();
        let carrier = StampedMessage {
            timestamp: Some(stamp.clone()),
            msg: Some(inner),
        };

        Entry {
            entryname: String::new(),
            msg: pack_any(&carrier),
            ctx: Some(Context {
                topic: topic.into(),
                stamp: Some(stamp),
                inner_type_url,
                descriptor_data: None,
            }),
        }
    }

    /// Creates a stamped entry from pre-encoded message bytes, their type
    /// URL and an optional descriptor closure for indexing. Whether `value`
    /// really is a message of type `type_url` is not checked.
    pub fn stamped_unchecked<S, U>(
        topic: S,
        seconds: i64,
        nanos: i32,
        type_url: U,
        value: Vec<u8>,
        descriptor_data: Option<FileDescriptorSet>,
    ) -> Entry
    where
        S: Into<String>,
        U: Into<String>,
    {
        let type_url = type_url.into();
        let stamp = ts(seconds, nanos);
        let carrier = StampedMessage {
            timestamp: Some(stamp.clone()),
            msg: Some(Any {
                type_url: type_url.clone(),
                value,
            }),
        };

        Entry {
            entryname: String::new(),
            msg: pack_any(&carrier),
            ctx: Some(Context {
                topic: topic.into(),
                stamp: Some(stamp),
                inner_type_url: type_url,
                descriptor_data,
            }),
        }
    }

    /// Attaches a descriptor closure for indexing.
    pub fn with_descriptor_data(mut self, descriptor_data: FileDescriptorSet) -> Entry {
        self.ctx
            .get_or_insert_with(Default::default)
            .descriptor_data = Some(descriptor_data);
        self
    }

    /// Tests whether this is a raw entry (no type URL).
    pub fn is_raw(&self) -> bool {
        self.msg.type_url.is_empty()
    }

    /// Tests whether the payload is a message of type `M`.
    pub fn is_a<M: Name>(&self) -> bool {
        self.msg.type_url == M::type_url()
    }

    /// Tests whether this entry is (or was unwrapped from) a stamped
    /// message.
    pub fn is_stamped(&self) -> bool {
        self.is_a::<StampedMessage>() || self.has_topic()
    }

    /// Tests whether this entry carries a non-empty topic.
    pub fn has_topic(&self) -> bool {
        self.topic_time()
            .map(|tt| !tt.topic.is_empty())
            .unwrap_or(false)
    }

    /// The `(topic, timestamp)` coordinate of this entry, if any. The
    /// coordinate's entry name is left empty.
    pub fn topic_time(&self) -> Option<TopicTime> {
        if let Some(ctx) = &self.ctx {
            return Some(TopicTime {
                topic: ctx.topic.clone(),
                timestamp: ctx.stamp.clone(),
                entryname: String::new(),
            });
        }

        if self.is_a::<StampedMessage>() {
            return self.unpack_stamped().ok().and_then(|e| e.topic_time());
        }

        None
    }

    /// Peels a stamped carrier: returns an entry whose payload is the inner
    /// envelope and whose context carries the topic (derived from the entry
    /// name's parent path), the stamp and the inner type URL.
    pub fn unpack_stamped(&self) -> Result<Entry> {
        if !self.is_stamped() {
            return Err(Error::InvalidEntry(format!(
                "entry {} is not a stamped message",
                self.entryname
            )));
        }

        let carrier: StampedMessage = unpack_any(&self.msg)?;
        let inner = carrier.msg.unwrap_or_default();
        let inner_type_url = inner.type_url.clone();

        Ok(Entry {
            entryname: self.entryname.clone(),
            msg: inner,
            ctx: Some(Context {
                topic: topic_from_entryname(&self.entryname),
                stamp: carrier.timestamp,
                inner_type_url,
                descriptor_data: None,
            }),
        })
    }

    /// Decodes the payload as a message of type `M`, validating the type
    /// URL first.
    pub fn decode_as<M: Message + Name + Default>(&self) -> Result<M> {
        if self.is_raw() {
            return Err(Error::decode(
                &self.entryname,
                format!(
                    "entry is raw and has no type_url; expected a {}",
                    M::full_name()
                ),
            ));
        }

        unpack_any(&self.msg)
    }

    /// Decodes the payload as a message of type `M` without looking at the
    /// type URL. The caller accepts that the wrong protocol may be cast
    /// upon the buffer.
    pub fn decode_as_unchecked<M: Message + Default>(&self) -> Result<M> {
        M::decode(self.msg.value.as_slice()).map_err(|err| Error::decode(&self.entryname, err))
    }

    /// The bare type name of the payload's type URL.
    pub fn type_name(&self) -> &str {
        type_name_from_url(&self.msg.type_url)
    }

    /// Compares name, type URL and payload bytes; the context is ignored.
    pub fn data_eq(&self, other: &Entry) -> bool {
        self.entryname == other.entryname
            && self.msg.type_url == other.msg.type_url
            && self.msg.value == other.msg.value
    }
}
