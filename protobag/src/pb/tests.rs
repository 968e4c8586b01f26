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

use prost_types::Any;
use protobag_proto::{StampedMessage, TopicTime};

use super::*;
use crate::time::ts;

fn sample_any() -> Any {
    Any {
        type_url: "type.googleapis.com/test.Payload".to_string(),
        value: vec![0x00, 0x01, b'"', b'\\', b'\n', 0x7f, 0xff],
    }
}

#[test]
fn binary_roundtrip() {
    let any = sample_any();

    let bytes = encode_any(&any, Encoding::Binary);
    let decoded = decode_any("sample", &bytes).unwrap();

    assert_eq!(decoded, any);
}

#[test]
fn text_roundtrip() {
    let any = sample_any();

    let bytes = encode_any(&any, Encoding::Text);
    let text = std::str::from_utf8(&bytes).unwrap();

    assert!(text.starts_with("type_url: \""));

    let decoded = any_from_text(text).unwrap();

    assert_eq!(decoded, any);
}

#[test]
fn decode_falls_back_to_text() {
    let any = sample_any();

    // decode_any only ever sees bytes; it must recover the text form after
    // the binary parse fails.
    let bytes = encode_any(&any, Encoding::Text);
    let decoded = decode_any("sample", &bytes).unwrap();

    assert_eq!(decoded, any);
}

#[test]
fn garbage_is_a_decode_error() {
    let err = decode_any("garbage", b"neither binary nor text").unwrap_err();

    assert!(matches!(err, crate::Error::Decode { .. }));
}

#[test]
fn empty_fields_are_omitted_from_text() {
    let raw = Any {
        type_url: String::new(),
        value: vec![1, 2, 3],
    };

    let text = any_to_text(&raw);

    assert!(!text.contains("type_url"));
    assert_eq!(any_from_text(&text).unwrap(), raw);
}

#[test]
fn escape_covers_octal_and_specials() {
    let bytes = vec![0x00, b'a', b'"', b'\\', b'\t', 0xfe];

    let escaped = escape_bytes(&bytes);

    assert_eq!(escaped, "\\000a\\\"\\\\\\t\\376");
    assert_eq!(unescape_bytes(&escaped).unwrap(), bytes);
}

#[test]
fn typed_pack_unpack_validates_type_url() {
    let stamped = StampedMessage {
        timestamp: Some(ts(3, 14)),
        msg: None,
    };

    let any = pack_any(&stamped);
    assert_eq!(any.type_url, "type.googleapis.com/protobag.StampedMessage");

    let back: StampedMessage = unpack_any(&any).unwrap();
    assert_eq!(back, stamped);

    let err = unpack_any::<TopicTime>(&any).unwrap_err();
    assert!(matches!(err, crate::Error::Decode { .. }));
}
