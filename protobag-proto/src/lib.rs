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

//! Wire messages of the protobag container format.
//!
//! The schema is small and stable, so the [prost] message types are
//! maintained by hand in generated-code style instead of being produced by
//! `protoc` at build time. Conceptually the schema is split over two files:
//!
//! * `protobag/stamped.proto`: [`StampedMessage`] and [`TopicTime`], the
//!   types that appear inside archive entries.
//! * `protobag/bag_index.proto`: [`BagIndex`] and [`Selection`], the types
//!   exchanged between writers and readers.
//!
//! All top-level messages implement [`prost::Name`] with the
//! `type.googleapis.com/` URL prefix, so they can be packed into a
//! [`prost_types::Any`] and recovered by type URL.
//!
//! [prost]: https://docs.rs/prost

mod protobag;

pub mod descriptor;

pub use crate::protobag::*;
