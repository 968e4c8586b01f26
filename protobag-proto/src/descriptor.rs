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

//! Hand-materialized schema descriptors for the stamped-carrier types.
//!
//! Writers embed the descriptor closure of every indexed type into the bag
//! so that readers can decode payloads without the producer's message
//! definitions. prost has no runtime reflection, so the closure for
//! `protobag/stamped.proto` (and its transitive dependencies
//! `google/protobuf/timestamp.proto` and `google/protobuf/any.proto`) is
//! built here by hand and must be kept in sync with the message structs.

use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, FieldDescriptorProto, FileDescriptorProto, FileDescriptorSet,
};

fn scalar_field(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        ..Default::default()
    }
}

fn message_field(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(Type::Message as i32),
        type_name: Some(type_name.to_string()),
        ..Default::default()
    }
}

fn timestamp_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("google/protobuf/timestamp.proto".to_string()),
        package: Some("google.protobuf".to_string()),
        message_type: vec![DescriptorProto {
            name: Some("Timestamp".to_string()),
            field: vec![
                scalar_field("seconds", 1, Type::Int64),
                scalar_field("nanos", 2, Type::Int32),
            ],
            ..Default::default()
        }],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

fn any_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("google/protobuf/any.proto".to_string()),
        package: Some("google.protobuf".to_string()),
        message_type: vec![DescriptorProto {
            name: Some("Any".to_string()),
            field: vec![
                scalar_field("type_url", 1, Type::String),
                scalar_field("value", 2, Type::Bytes),
            ],
            ..Default::default()
        }],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

fn stamped_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("protobag/stamped.proto".to_string()),
        package: Some("protobag".to_string()),
        dependency: vec![
            "google/protobuf/timestamp.proto".to_string(),
            "google/protobuf/any.proto".to_string(),
        ],
        message_type: vec![
            DescriptorProto {
                name: Some("StampedMessage".to_string()),
                field: vec![
                    message_field("timestamp", 1, ".google.protobuf.Timestamp"),
                    message_field("msg", 2, ".google.protobuf.Any"),
                ],
                ..Default::default()
            },
            DescriptorProto {
                name: Some("TopicTime".to_string()),
                field: vec![
                    scalar_field("topic", 1, Type::String),
                    message_field("timestamp", 2, ".google.protobuf.Timestamp"),
                    scalar_field("entryname", 3, Type::String),
                ],
                ..Default::default()
            },
        ],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

/// The complete schema-file closure for [`StampedMessage`](crate::StampedMessage):
/// the defining file plus every file it transitively depends on, each exactly
/// once.
pub fn stamped_message_descriptor_set() -> FileDescriptorSet {
    FileDescriptorSet {
        file: vec![stamped_file(), timestamp_file(), any_file()],
    }
}
