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

//! Envelope encoding and decoding.
//!
//! Entries are stored as a two-field `Any` envelope `{type_url, value}` in
//! one of two wire encodings: a compact binary form (the default) and a
//! human-readable text form in protobuf text-format style. Decoding tries
//! binary first and falls back to text; the input is a byte slice, so a
//! failed binary parse consumes nothing.

use std::fmt::Write as _;

use prost::{Message, Name};
use prost_types::Any;

use crate::error::{Error, Result};

/// The wire encoding of an envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    /// Compact binary protobuf; entry names carry the `.protobin` suffix.
    Binary,
    /// Human-readable text form; entry names carry the `.prototxt` suffix.
    Text,
}

impl Encoding {
    /// The entry-name suffix of this encoding.
    pub fn suffix(self) -> &'static str {
        match self {
            Encoding::Binary => "protobin",
            Encoding::Text => "prototxt",
        }
    }
}

impl Default for Encoding {
    fn default() -> Self {
        Encoding::Binary
    }
}

/// The bare type name of a type URL: everything after the final `/`.
pub fn type_name_from_url(type_url: &str) -> &str {
    type_url.rsplit('/').next().unwrap_or(type_url)
}

/// Packs a typed message into an `Any` envelope under its canonical type
/// URL.
pub fn pack_any<M: Message + Name>(msg: &M) -> Any {
    Any {
        type_url: M::type_url(),
        value: msg.encode_to_vec(),
    }
}

/// Unpacks a typed message from an `Any` envelope, validating the type URL.
pub fn unpack_any<M: Message + Name + Default>(any: &Any) -> Result<M> {
    let expected = M::full_name();

    if type_name_from_url(&any.type_url) != expected {
        return Err(Error::decode(
            &any.type_url,
            format!("expected a {}", expected),
        ));
    }

    M::decode(any.value.as_slice()).map_err(|err| Error::decode(&any.type_url, err))
}

/// Encodes an envelope in the given wire encoding.
pub fn encode_any(any: &Any, encoding: Encoding) -> Vec<u8> {
    match encoding {
        Encoding::Binary => any.encode_to_vec(),
        Encoding::Text => any_to_text(any).into_bytes(),
    }
}

/// Decodes an envelope, trying the binary form first and falling back to
/// the text form. `name` is only used in error messages.
pub fn decode_any(name: &str, data: &[u8]) -> Result<Any> {
    match Any::decode(data) {
        Ok(any) => Ok(any),
        Err(binary_err) => match std::str::from_utf8(data).ok().and_then(any_from_text) {
            Some(any) => Ok(any),
            None => Err(Error::decode(name, binary_err)),
        },
    }
}

/// Renders an envelope in protobuf text-format style. Fields at their
/// default are omitted.
pub fn any_to_text(any: &Any) -> String {
    let mut out = String::new();

    if !any.type_url.is_empty() {
        out.push_str("type_url: \"");
        out.push_str(&escape_bytes(any.type_url.as_bytes()));
        out.push_str("\"\n");
    }

    if !any.value.is_empty() {
        out.push_str("value: \"");
        out.push_str(&escape_bytes(&any.value));
        out.push_str("\"\n");
    }

    out
}

/// Parses the text form produced by [`any_to_text`]. Returns [`None`] on
/// anything that is not a well-formed envelope rendering.
pub fn any_from_text(text: &str) -> Option<Any> {
    let mut any = Any::default();

    for line in text.lines() {
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        let (key, value) = line.split_once(':')?;
        let value = value.trim();

        if value.len() < 2 || !value.starts_with('"') || !value.ends_with('"') {
            return None;
        }

        let unescaped = unescape_bytes(&value[1..value.len() - 1])?;

        match key.trim() {
            "type_url" => any.type_url = String::from_utf8(unescaped).ok()?,
            "value" => any.value = unescaped,
            _ => return None,
        }
    }

    Some(any)
}

fn escape_bytes(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len());

    for &byte in data {
        match byte {
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7e => out.push(byte as char),
            _ => {
                let _ = write!(out, "\\{:03o}", byte);
            }
        }
    }

    out
}

fn unescape_bytes(text: &str) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len());
    let mut chars = text.bytes().peekable();

    while let Some(byte) = chars.next() {
        if byte != b'\\' {
            out.push(byte);
            continue;
        }

        match chars.next()? {
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'"' => out.push(b'"'),
            b'\'' => out.push(b'\''),
            b'\\' => out.push(b'\\'),
            digit @ b'0'..=b'7' => {
                let mut value = (digit - b'0') as u32;

                for _ in 0..2 {
                    match chars.peek() {
                        Some(&next) if (b'0'..=b'7').contains(&next) => {
                            value = value * 8 + (next - b'0') as u32;
                            chars.next();
                        }
                        _ => break,
                    }
                }

                if value > 0xff {
                    return None;
                }

                out.push(value as u8);
            }
            _ => return None,
        }
    }

    Some(out)
}

#[cfg(test)]
mod tests;
