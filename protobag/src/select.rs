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

//! Constructors for [`Selection`] values.

use prost_types::Timestamp;
use protobag_proto::selection::{Criteria, Entrynames, Events, SelectAll, Window};
use protobag_proto::{Selection, TopicTime};

/// Selects every entry in the bag.
pub fn all() -> Selection {
    Selection {
        criteria: Some(Criteria::SelectAll(SelectAll {
            all_entries_are_raw: false,
        })),
    }
}

/// Selects every entry in the bag as raw bytes, skipping envelope decoding.
pub fn all_raw() -> Selection {
    Selection {
        criteria: Some(Criteria::SelectAll(SelectAll {
            all_entries_are_raw: true,
        })),
    }
}

/// Selects entries by name. Missing names are skipped when
/// `ignore_missing_entries` is set, and a hard error otherwise.
pub fn entrynames<I, S>(names: I, ignore_missing_entries: bool) -> Selection
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Selection {
        criteria: Some(Criteria::Entrynames(Entrynames {
            entrynames: names.into_iter().map(Into::into).collect(),
            ignore_missing_entries,
            entries_are_raw: false,
        })),
    }
}

/// Selects stamped entries by exact `(topic, timestamp)` coordinates.
pub fn events<I>(events: I, require_all: bool) -> Selection
where
    I: IntoIterator<Item = TopicTime>,
{
    Selection {
        criteria: Some(Criteria::Events(Events {
            events: events.into_iter().collect(),
            require_all,
        })),
    }
}

/// Selects stamped entries on `topics` (empty means all) within the
/// inclusive window `[start, end]`; `None` bounds are unbounded.
pub fn window<I, S>(topics: I, start: Option<Timestamp>, end: Option<Timestamp>) -> Selection
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Selection {
        criteria: Some(Criteria::Window(Window {
            topics: topics.into_iter().map(Into::into).collect(),
            exclude_topics: vec![],
            start,
            end,
        })),
    }
}

/// Selects stamped entries on every topic except `exclude_topics`, within
/// the inclusive window `[start, end]`.
pub fn window_excluding<I, S>(
    exclude_topics: I,
    start: Option<Timestamp>,
    end: Option<Timestamp>,
) -> Selection
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Selection {
        criteria: Some(Criteria::Window(Window {
            topics: vec![],
            exclude_topics: exclude_topics.into_iter().map(Into::into).collect(),
            start,
            end,
        })),
    }
}
