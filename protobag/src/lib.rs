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

//! A container format and runtime for recording and replaying
//! heterogeneous, timestamped, typed messages.
//!
//! A *bag* is an archive (a directory, a tar or zip file, or an in-memory
//! store) of named entries, each carrying a typed payload in a protobuf
//! `Any` envelope. Producers append entries through a [`WriteSession`],
//! which derives entry names from `(topic, timestamp)`, observes every
//! entry into a [`BagIndexBuilder`] and seals the resulting index into the
//! bag on close. Consumers open a [`ReadSession`] with a [`Selection`]
//! describing the subset to read; the session compiles the selection
//! against the bag's index into a read plan and replays matching entries,
//! in time order for stamped messages, without needing the producer's
//! message definitions.
//!
//! ```no_run
//! use protobag::{Entry, Protobag, select};
//!
//! # fn main() -> protobag::Result<()> {
//! let bag = Protobag::new("example.zip");
//!
//! let mut writer = bag.write_session()?;
//! writer.write_entry(Entry::stamped_unchecked(
//!     "/camera",
//!     1,
//!     0,
//!     "type.googleapis.com/my.Image",
//!     vec![0x01, 0x02],
//!     None,
//! ))?;
//! writer.close()?;
//!
//! for entry in bag.read_entries(select::all())? {
//!     let entry = entry?;
//!     println!("{}", entry.entryname);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! On top of the read side, [`MaxSlopTimeSync`] bundles one message per
//! topic across several topics into tuples whose timestamp spread is
//! bounded and minimal.

mod bag;
mod entry;
mod error;
mod index;
mod products;
mod read;
mod sync;
mod write;

pub mod pb;
pub mod select;
pub mod time;

pub use protobag_archive as archive;
pub use protobag_proto as proto;

pub use crate::bag::Protobag;
pub use crate::entry::{
    entry_is_in_topic, is_index_topic, topic_from_entryname, Context, Entry, PROTOBAG_INDEX_TOPIC,
};
pub use crate::error::{Error, Result};
pub use crate::index::BagIndexBuilder;
pub use crate::products::IterProducts;
pub use crate::read::{ReadSession, ReadSessionSpec};
pub use crate::sync::{EntryBundle, MaxSlopTimeSync, SyncSpec};
pub use crate::write::{WriteSession, WriteSessionSpec};

pub use protobag_proto::{BagIndex, Selection, StampedMessage, TopicTime};
