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

use std::time::Duration;

use protobag_archive::{ArchiveSpec, MemoryArchive};

use super::*;
use crate::read::ReadSessionSpec;
use crate::select;
use crate::write::{WriteSession, WriteSessionSpec};
use crate::Entry;

fn bag_with(entries: &[(&str, i64, i32)]) -> MemoryArchive {
    let handle = MemoryArchive::new();

    let mut writer = WriteSession::open(WriteSessionSpec {
        archive_spec: ArchiveSpec::write("unused").with_memory_archive(handle.clone()),
        ..Default::default()
    })
    .unwrap();

    for (topic, seconds, nanos) in entries {
        writer
            .write_entry(Entry::stamped_unchecked(
                *topic,
                *seconds,
                *nanos,
                "type.googleapis.com/test.Payload",
                vec![0x01],
                None,
            ))
            .unwrap();
    }

    writer.close().unwrap();
    handle
}

fn read_all(handle: MemoryArchive) -> ReadSession {
    ReadSession::open(ReadSessionSpec {
        archive_spec: ArchiveSpec::read("unused").with_memory_archive(handle),
        selection: select::all(),
        unpack_stamped_messages: true,
    })
    .unwrap()
}

fn bundle_stamps(bundle: &EntryBundle) -> Vec<(String, i64, i32)> {
    bundle
        .iter()
        .map(|entry| {
            let tt = entry.topic_time().unwrap();
            let (seconds, nanos) = ts_key(&tt.timestamp);
            (tt.topic, seconds, nanos)
        })
        .collect()
}

#[test]
fn bundles_minimize_spread_and_respect_slop() {
    let handle = bag_with(&[
        ("/x", 1, 0),
        ("/x", 1, 500_000_000),
        ("/x", 2, 0),
        ("/y", 1, 50_000_000),
        ("/y", 1, 550_000_000),
        ("/y", 3, 0),
    ]);

    let mut sync = MaxSlopTimeSync::new(
        read_all(handle),
        SyncSpec {
            topics: vec!["/x".to_string(), "/y".to_string()],
            max_slop: Duration::from_millis(200),
            max_queue_size: 3,
        },
    );

    let first = sync.next_bundle().unwrap().unwrap();
    assert_eq!(
        bundle_stamps(&first),
        [("/x".to_string(), 1, 0), ("/y".to_string(), 1, 50_000_000)]
    );

    let second = sync.next_bundle().unwrap().unwrap();
    assert_eq!(
        bundle_stamps(&second),
        [
            ("/x".to_string(), 1, 500_000_000),
            ("/y".to_string(), 1, 550_000_000)
        ]
    );

    // The (2.00, 3.00) candidate is over the slop bound and is suppressed.
    assert!(sync.next_bundle().unwrap().is_none());
}

#[test]
fn every_bundle_stays_within_the_slop_bound() {
    let handle = bag_with(&[
        ("/a", 1, 0),
        ("/a", 2, 0),
        ("/a", 3, 0),
        ("/b", 1, 10_000_000),
        ("/b", 2, 20_000_000),
        ("/b", 5, 0),
    ]);

    let max_slop = Duration::from_millis(100);
    let mut sync = MaxSlopTimeSync::new(
        read_all(handle),
        SyncSpec {
            topics: vec!["/a".to_string(), "/b".to_string()],
            max_slop,
            max_queue_size: 5,
        },
    );

    let mut bundles = 0;

    while let Some(bundle) = sync.next_bundle().unwrap() {
        let stamps: Vec<i128> = bundle
            .iter()
            .map(|entry| key_nanos(ts_key(&entry.topic_time().unwrap().timestamp)))
            .collect();
        let spread = stamps.iter().max().unwrap() - stamps.iter().min().unwrap();

        assert!(spread <= max_slop.as_nanos() as i128);
        bundles += 1;
    }

    assert_eq!(bundles, 2);
}

#[test]
fn matching_streams_bundle_once_per_timestamp() {
    let handle = bag_with(&[
        ("/l", 1, 0),
        ("/l", 2, 0),
        ("/l", 3, 0),
        ("/r", 1, 0),
        ("/r", 2, 0),
        ("/r", 3, 0),
    ]);

    let mut sync = MaxSlopTimeSync::new(
        read_all(handle),
        SyncSpec {
            topics: vec!["/l".to_string(), "/r".to_string()],
            max_slop: Duration::from_millis(1),
            max_queue_size: 5,
        },
    );

    for seconds in 1..=3 {
        let bundle = sync.next_bundle().unwrap().unwrap();
        assert_eq!(
            bundle_stamps(&bundle),
            [("/l".to_string(), seconds, 0), ("/r".to_string(), seconds, 0)]
        );
    }

    assert!(sync.next_bundle().unwrap().is_none());
}

#[test]
fn overflowing_queues_evict_the_oldest_entry() {
    // /y never arrives, so /x entries pile up in a queue of capacity 2;
    // after the stream ends no bundle was ever possible.
    let handle = bag_with(&[("/x", 1, 0), ("/x", 2, 0), ("/x", 3, 0)]);

    let mut sync = MaxSlopTimeSync::new(
        read_all(handle),
        SyncSpec {
            topics: vec!["/x".to_string(), "/y".to_string()],
            max_slop: Duration::from_secs(10),
            max_queue_size: 2,
        },
    );

    assert!(sync.next_bundle().unwrap().is_none());

    let remaining: Vec<(i64, i32)> = sync.queues["/x"].keys().copied().collect();
    assert_eq!(remaining, [(2, 0), (3, 0)]);
}

#[test]
fn undeclared_topics_are_ignored() {
    let handle = bag_with(&[("/x", 1, 0), ("/noise", 1, 0), ("/y", 1, 0)]);

    let mut sync = MaxSlopTimeSync::new(
        read_all(handle),
        SyncSpec {
            topics: vec!["/x".to_string(), "/y".to_string()],
            max_slop: Duration::from_secs(1),
            max_queue_size: 3,
        },
    );

    let bundle = sync.next_bundle().unwrap().unwrap();
    assert_eq!(bundle.len(), 2);
    assert!(bundle.iter().all(|entry| {
        let topic = entry.topic_time().unwrap().topic;
        topic == "/x" || topic == "/y"
    }));
}
