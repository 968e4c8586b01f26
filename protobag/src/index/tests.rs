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

use super::*;
use crate::time::ts;

fn stamped(topic: &str, seconds: i64, nanos: i32) -> (Entry, String) {
    let entry = Entry::stamped_unchecked(
        topic,
        seconds,
        nanos,
        "type.googleapis.com/test.Payload",
        vec![0x01],
        None,
    );
    let entryname = format!("{}/{}.{}.stampedmsg.protobin", topic, seconds, nanos);

    (entry, entryname)
}

#[test]
fn time_ordered_entries_are_sorted_and_complete() {
    let mut builder = BagIndexBuilder::new();

    // Observe out of order; the completed index must be sorted.
    for (topic, seconds, nanos) in &[("/a", 2i64, 0i32), ("/b", 1, 100), ("/a", 1, 0)] {
        let (entry, entryname) = stamped(topic, *seconds, *nanos);
        builder.observe(&entry, &entryname);
    }

    let index = builder.complete();

    let coords: Vec<(String, i64, i32)> = index
        .time_ordered_entries
        .iter()
        .map(|tt| {
            let (s, n) = ts_key(&tt.timestamp);
            (tt.topic.clone(), s, n)
        })
        .collect();

    assert_eq!(
        coords,
        [
            ("/a".to_string(), 1, 0),
            ("/b".to_string(), 1, 100),
            ("/a".to_string(), 2, 0),
        ]
    );

    assert_eq!(index.start, Some(ts(1, 0)));
    assert_eq!(index.end, Some(ts(2, 0)));
    assert_eq!(index.topic_to_stats["/a"].n_messages, 2);
    assert_eq!(index.topic_to_stats["/b"].n_messages, 1);

    for tt in &index.time_ordered_entries {
        assert!(!tt.entryname.is_empty());
    }
}

#[test]
fn empty_builder_keeps_inverted_bounds() {
    let index = BagIndexBuilder::new().complete();

    assert_eq!(index.start, Some(max_timestamp()));
    assert_eq!(index.end, Some(min_timestamp()));
    assert!(index.time_ordered_entries.is_empty());
    assert_eq!(index.protobag_version, env!("CARGO_PKG_VERSION"));
}

#[test]
fn timeseries_indexing_can_be_disabled() {
    let mut builder = BagIndexBuilder::new();
    builder.enable_timeseries_indexing(false);

    let (entry, entryname) = stamped("/a", 1, 0);
    builder.observe(&entry, &entryname);

    let index = builder.complete();

    assert!(index.time_ordered_entries.is_empty());
    assert!(index.topic_to_stats.is_empty());
}

fn file(name: &str, package: &str, messages: &[&str], deps: &[&str]) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.to_string()),
        package: Some(package.to_string()),
        dependency: deps.iter().map(|d| d.to_string()).collect(),
        message_type: messages
            .iter()
            .map(|m| DescriptorProto {
                name: Some(m.to_string()),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

#[test]
fn descriptor_closure_is_transitive_and_cycle_free() {
    // a.proto defines the type and depends on b.proto; b depends on c and,
    // to form a cycle, c depends on a again. d is unrelated.
    let fds = FileDescriptorSet {
        file: vec![
            file("a.proto", "test", &["Payload"], &["b.proto"]),
            file("b.proto", "test", &["Inner"], &["c.proto"]),
            file("c.proto", "test", &["Leaf"], &["a.proto"]),
            file("d.proto", "test", &["Unrelated"], &[]),
        ],
    };

    let mut builder = BagIndexBuilder::new();
    let entry = Entry::stamped_unchecked(
        "/a",
        1,
        0,
        "type.googleapis.com/test.Payload",
        vec![0x01],
        Some(fds),
    );
    builder.observe(&entry, "/a/1.0.stampedmsg.protobin");

    let index = builder.complete();
    let pool = index.descriptor_pool_data.unwrap();

    let closure = &pool.type_url_to_descriptor["type.googleapis.com/test.Payload"];
    let mut names: Vec<&str> = closure.file.iter().map(|f| f.name()).collect();
    names.sort();

    assert_eq!(names, ["a.proto", "b.proto", "c.proto"]);

    assert_eq!(
        pool.entryname_to_type_url["/a/1.0.stampedmsg.protobin"],
        "type.googleapis.com/test.Payload"
    );
}

#[test]
fn stamped_carrier_type_is_indexed_once() {
    let mut builder = BagIndexBuilder::new();

    for (topic, seconds, nanos) in &[("/a", 1i64, 0i32), ("/a", 2, 0)] {
        let (entry, entryname) = stamped(topic, *seconds, *nanos);
        builder.observe(&entry, &entryname);
    }

    let index = builder.complete();
    let pool = index.descriptor_pool_data.unwrap();

    let url = StampedMessage::type_url();
    assert!(pool.type_url_to_descriptor.contains_key(&url));
    assert_eq!(pool.entryname_to_type_url[STAMPED_MESSAGE_PSEUDO_ENTRY], url);
}

#[test]
fn unlocatable_type_stores_the_provided_set_verbatim() {
    // A writer from another language may ship an exact closure whose
    // defining file we cannot pinpoint; the set is kept as-is.
    let fds = FileDescriptorSet {
        file: vec![file("x.proto", "other", &["Thing"], &[])],
    };

    let mut builder = BagIndexBuilder::new();
    let entry = Entry::stamped_unchecked(
        "/a",
        1,
        0,
        "type.googleapis.com/mystery.Type",
        vec![0x01],
        Some(fds.clone()),
    );
    builder.observe(&entry, "/a/1.0.stampedmsg.protobin");

    let index = builder.complete();
    let pool = index.descriptor_pool_data.unwrap();

    assert_eq!(
        pool.type_url_to_descriptor["type.googleapis.com/mystery.Type"],
        fds
    );
}

#[test]
fn nested_types_are_located() {
    let fds = FileDescriptorSet {
        file: vec![FileDescriptorProto {
            name: Some("nested.proto".to_string()),
            package: Some("test".to_string()),
            message_type: vec![DescriptorProto {
                name: Some("Outer".to_string()),
                nested_type: vec![DescriptorProto {
                    name: Some("Inner".to_string()),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        }],
    };

    assert!(file_closure_for_type(&fds, "test.Outer.Inner").is_some());
    assert!(file_closure_for_type(&fds, "test.Outer.Missing").is_none());
}
