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

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::entry::Entry;
use crate::error::Result;
use crate::products::IterProducts;
use crate::read::ReadSession;
use crate::time::{key_nanos, ts_key};

#[cfg(test)]
mod tests;

/// A bundle of entries, one per declared topic, in canonical
/// (lexicographic) topic order.
pub type EntryBundle = Vec<Entry>;

/// Configuration of a [`MaxSlopTimeSync`].
#[derive(Clone, Debug)]
pub struct SyncSpec {
    /// The topics to bundle. Entries on other topics are ignored.
    pub topics: Vec<String>,

    /// Upper bound on the timestamp spread within a bundle.
    pub max_slop: Duration,

    /// Per-topic buffer capacity; the oldest entry is evicted on overflow.
    pub max_queue_size: usize,
}

/// Bundles one message per topic across several topics, minimizing the
/// timestamp spread of each bundle and keeping it within `max_slop`.
///
/// Entries are pulled from an upstream [`ReadSession`] (which must unpack
/// stamped messages, so each entry carries its topic and timestamp) and
/// buffered in per-topic, time-ordered queues. A bundle is emitted as soon
/// as every declared topic has at least one buffered entry and some
/// combination of buffered entries has a spread within the slop bound;
/// among qualifying combinations the one with the smallest spread wins.
pub struct MaxSlopTimeSync {
    reader: ReadSession,
    topics: Vec<String>,
    queues: HashMap<String, BTreeMap<(i64, i32), Entry>>,
    max_slop_nanos: i128,
    max_queue_size: usize,
}

impl MaxSlopTimeSync {
    /// Creates a synchronizer pulling from `reader`. Topics are put in
    /// canonical order once, here.
    pub fn new(reader: ReadSession, spec: SyncSpec) -> MaxSlopTimeSync {
        let mut topics = spec.topics;
        topics.sort();
        topics.dedup();

        let queues = topics
            .iter()
            .map(|topic| (topic.clone(), BTreeMap::new()))
            .collect();

        MaxSlopTimeSync {
            reader,
            topics,
            queues,
            max_slop_nanos: spec.max_slop.as_nanos() as i128,
            max_queue_size: spec.max_queue_size.max(1),
        }
    }

    /// Pulls the next bundle, or `Ok(None)` when the upstream session is
    /// exhausted. Buffered entries that never formed a bundle are
    /// discarded at that point.
    pub fn next_bundle(&mut self) -> Result<Option<EntryBundle>> {
        loop {
            if let Some(bundle) = self.try_emit() {
                return Ok(Some(bundle));
            }

            match self.reader.next_entry()? {
                Some(entry) => self.enqueue(entry),
                None => return Ok(None),
            }
        }
    }

    fn enqueue(&mut self, entry: Entry) {
        let tt = match entry.topic_time() {
            Some(tt) => tt,
            None => return,
        };

        let queue = match self.queues.get_mut(&tt.topic) {
            Some(queue) => queue,
            None => return,
        };

        if queue.len() >= self.max_queue_size {
            // The oldest entry will never bundle with future data.
            let oldest = queue.keys().next().copied();

            if let Some(oldest) = oldest {
                queue.remove(&oldest);
            }
        }

        // On duplicate stamps the first entry wins.
        queue
            .entry(ts_key(&tt.timestamp))
            .or_insert(entry);
    }

    fn try_emit(&mut self) -> Option<EntryBundle> {
        if self.topics.is_empty() {
            return None;
        }

        let stamps: Vec<Vec<(i64, i32)>> = self
            .topics
            .iter()
            .map(|topic| self.queues[topic].keys().copied().collect())
            .collect();

        if stamps.iter().any(|queue| queue.is_empty()) {
            return None;
        }

        let selected = find_min_spread_bundle(&stamps, self.max_slop_nanos)?;

        let mut bundle = Vec::with_capacity(self.topics.len());

        for (topic, key) in self.topics.iter().zip(selected) {
            let entry = self
                .queues
                .get_mut(topic)
                .and_then(|queue| queue.remove(&key))?;

            bundle.push(entry);
        }

        Some(bundle)
    }
}

/// Examines every combination of buffered stamps (one per queue) and
/// returns the combination with the smallest spread no greater than
/// `max_slop_nanos`, or [`None`] when no combination qualifies.
fn find_min_spread_bundle(
    stamps: &[Vec<(i64, i32)>],
    max_slop_nanos: i128,
) -> Option<Vec<(i64, i32)>> {
    let pool_sizes: Vec<usize> = stamps.iter().map(|queue| queue.len()).collect();

    let mut best: Option<(i128, Vec<(i64, i32)>)> = None;

    for indices in IterProducts::new(pool_sizes) {
        let candidate: Vec<(i64, i32)> = indices
            .iter()
            .enumerate()
            .map(|(queue_id, &stamp_id)| stamps[queue_id][stamp_id])
            .collect();

        let min = candidate.iter().map(|&key| key_nanos(key)).min()?;
        let max = candidate.iter().map(|&key| key_nanos(key)).max()?;
        let spread = max - min;

        if spread > max_slop_nanos {
            continue;
        }

        let better = match &best {
            Some((best_spread, _)) => spread < *best_spread,
            None => true,
        };

        if better {
            best = Some((spread, candidate));
        }
    }

    best.map(|(_, candidate)| candidate)
}
