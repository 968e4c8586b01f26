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

//! Timestamp and topic-time ordering helpers.
//!
//! Protobuf timestamps carry no ordering of their own; everything here
//! compares `(seconds, nanos)` pairs. Topic-time coordinates are totally
//! ordered by `(timestamp, topic, entryname)`.

use std::cmp::Ordering;

use prost_types::Timestamp;
use protobag_proto::TopicTime;

/// Smallest representable protobuf timestamp (0001-01-01T00:00:00Z).
pub const TIMESTAMP_MIN_SECONDS: i64 = -62_135_596_800;

/// Largest representable protobuf timestamp (9999-12-31T23:59:59Z).
pub const TIMESTAMP_MAX_SECONDS: i64 = 253_402_300_799;

/// Builds a timestamp from seconds and nanoseconds.
pub fn ts(seconds: i64, nanos: i32) -> Timestamp {
    Timestamp { seconds, nanos }
}

/// The smallest representable timestamp; used as the `start` sentinel of an
/// empty index.
pub fn min_timestamp() -> Timestamp {
    ts(TIMESTAMP_MIN_SECONDS, 0)
}

/// The largest representable timestamp; used as the `end` sentinel of an
/// empty index.
pub fn max_timestamp() -> Timestamp {
    ts(TIMESTAMP_MAX_SECONDS, 0)
}

/// Sort key of a timestamp. A missing timestamp counts as the proto
/// default, i.e. the epoch.
pub fn ts_key(t: &Option<Timestamp>) -> (i64, i32) {
    match t {
        Some(t) => (t.seconds, t.nanos),
        None => (0, 0),
    }
}

/// Total nanoseconds of a timestamp key, for spread arithmetic.
pub fn key_nanos(key: (i64, i32)) -> i128 {
    key.0 as i128 * 1_000_000_000 + key.1 as i128
}

/// The total order over topic-time coordinates:
/// `lex(timestamp, topic, entryname)`.
pub fn coord_cmp(a: &TopicTime, b: &TopicTime) -> Ordering {
    (ts_key(&a.timestamp), &a.topic, &a.entryname)
        .cmp(&(ts_key(&b.timestamp), &b.topic, &b.entryname))
}

/// Equality key of a coordinate with the entry name cleared, used to match
/// events by `(topic, timestamp)` only.
pub fn event_key(tt: &TopicTime) -> (i64, i32, String) {
    let (seconds, nanos) = ts_key(&tt.timestamp);

    (seconds, nanos, tt.topic.clone())
}
