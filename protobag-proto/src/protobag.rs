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

use std::collections::HashMap;

/// A timestamped carrier for an arbitrary typed payload.
///
/// Stamped entries in a bag store one of these as their outer envelope; the
/// user payload is packed into `msg`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StampedMessage {
    #[prost(message, optional, tag = "1")]
    pub timestamp: ::core::option::Option<::prost_types::Timestamp>,
    #[prost(message, optional, tag = "2")]
    pub msg: ::core::option::Option<::prost_types::Any>,
}

/// A `(topic, timestamp, entryname)` coordinate of a stamped entry.
///
/// Coordinates are totally ordered by `(timestamp, topic, entryname)`; for
/// equality matching in queries the `entryname` field may be cleared.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TopicTime {
    #[prost(string, tag = "1")]
    pub topic: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "2")]
    pub timestamp: ::core::option::Option<::prost_types::Timestamp>,
    #[prost(string, tag = "3")]
    pub entryname: ::prost::alloc::string::String,
}

/// The persisted summary of a bag: time bounds, per-topic statistics, the
/// time-ordered entry coordinates and the descriptor pool.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BagIndex {
    /// Smallest timestamp of any stamped entry; the max-timestamp sentinel
    /// when the bag has no stamped entries.
    #[prost(message, optional, tag = "1")]
    pub start: ::core::option::Option<::prost_types::Timestamp>,
    /// Largest timestamp of any stamped entry; the min-timestamp sentinel
    /// when the bag has no stamped entries.
    #[prost(message, optional, tag = "2")]
    pub end: ::core::option::Option<::prost_types::Timestamp>,
    #[prost(map = "string, message", tag = "3")]
    pub topic_to_stats: HashMap<::prost::alloc::string::String, bag_index::TopicStats>,
    /// All stamped-entry coordinates, ascending by
    /// `(timestamp, topic, entryname)`.
    #[prost(message, repeated, tag = "4")]
    pub time_ordered_entries: ::prost::alloc::vec::Vec<TopicTime>,
    #[prost(message, optional, tag = "5")]
    pub descriptor_pool_data: ::core::option::Option<bag_index::DescriptorPoolData>,
    /// Version string of the producer.
    #[prost(string, tag = "6")]
    pub protobag_version: ::prost::alloc::string::String,
}

/// Nested message and map types of [`BagIndex`].
pub mod bag_index {
    use std::collections::HashMap;

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct TopicStats {
        #[prost(uint64, tag = "1")]
        pub n_messages: u64,
    }

    /// Schema data that lets readers decode payloads without the producer's
    /// message definitions.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct DescriptorPoolData {
        /// Type URL to the serialized schema-file closure defining the type.
        #[prost(map = "string, message", tag = "1")]
        pub type_url_to_descriptor:
            HashMap<::prost::alloc::string::String, ::prost_types::FileDescriptorSet>,
        /// Entry name to the type URL of its (innermost) payload.
        #[prost(map = "string, string", tag = "2")]
        pub entryname_to_type_url:
            HashMap<::prost::alloc::string::String, ::prost::alloc::string::String>,
    }
}

/// A query describing which subset of a bag to read.
///
/// Exactly one criterion is present; a `Selection` with no criterion is
/// rejected by readers as unsupported.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Selection {
    #[prost(oneof = "selection::Criteria", tags = "1, 2, 3, 4")]
    pub criteria: ::core::option::Option<selection::Criteria>,
}

/// Nested criterion types of [`Selection`].
pub mod selection {
    /// Select every entry in the bag.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SelectAll {
        /// Skip envelope decoding; yield raw bytes.
        #[prost(bool, tag = "1")]
        pub all_entries_are_raw: bool,
    }

    /// Select entries by exact entry name.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Entrynames {
        #[prost(string, repeated, tag = "1")]
        pub entrynames: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
        /// Silently skip names that are not in the bag.
        #[prost(bool, tag = "2")]
        pub ignore_missing_entries: bool,
        /// Skip envelope decoding; yield raw bytes.
        #[prost(bool, tag = "3")]
        pub entries_are_raw: bool,
    }

    /// Select stamped entries by exact `(topic, timestamp)` coordinates;
    /// the `entryname` field of each event is ignored.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Events {
        #[prost(message, repeated, tag = "1")]
        pub events: ::prost::alloc::vec::Vec<super::TopicTime>,
        /// Fail unless every requested coordinate matched an indexed entry.
        #[prost(bool, tag = "2")]
        pub require_all: bool,
    }

    /// Select stamped entries by topic filter and inclusive time window.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Window {
        /// Topics to include; empty means all topics.
        #[prost(string, repeated, tag = "1")]
        pub topics: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
        #[prost(string, repeated, tag = "2")]
        pub exclude_topics: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
        /// Inclusive lower bound; unset means unbounded.
        #[prost(message, optional, tag = "3")]
        pub start: ::core::option::Option<::prost_types::Timestamp>,
        /// Inclusive upper bound; unset means unbounded.
        #[prost(message, optional, tag = "4")]
        pub end: ::core::option::Option<::prost_types::Timestamp>,
    }

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Criteria {
        #[prost(message, tag = "1")]
        SelectAll(SelectAll),
        #[prost(message, tag = "2")]
        Entrynames(Entrynames),
        #[prost(message, tag = "3")]
        Events(Events),
        #[prost(message, tag = "4")]
        Window(Window),
    }
}

const TYPE_URL_PREFIX: &str = "type.googleapis.com";

macro_rules! impl_name {
    ($type:ty, $name:literal) => {
        impl ::prost::Name for $type {
            const NAME: &'static str = $name;
            const PACKAGE: &'static str = "protobag";

            fn full_name() -> ::prost::alloc::string::String {
                concat!("protobag.", $name).into()
            }

            fn type_url() -> ::prost::alloc::string::String {
                concat!("type.googleapis.com/protobag.", $name).into()
            }
        }
    };
}

impl_name!(StampedMessage, "StampedMessage");
impl_name!(TopicTime, "TopicTime");
impl_name!(BagIndex, "BagIndex");
impl_name!(Selection, "Selection");

/// Returns the `type.googleapis.com/...` URL prefix used by this crate's
/// [`prost::Name`] implementations.
pub fn type_url_prefix() -> &'static str {
    TYPE_URL_PREFIX
}
