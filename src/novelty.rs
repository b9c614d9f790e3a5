//! Novelty detection: which items of a feed have not been seen before.
//!
//! A [`Watermark`] is the bounded list of GUIDs captured from a fetch,
//! stored oldest first so the newest entries sit at the tail. Dropping the
//! tail ([`Watermark::without_newest`]) models "the consumer already took
//! the newest N items", and [`find_new`] reports every feed item whose GUID
//! is not in what remains.
//!
//! # Example
//!
//! ```
//! use feedwatch::feed::{Feed, Item};
//! use feedwatch::novelty::{find_new, Watermark};
//!
//! let feed = Feed {
//!     items: ["c", "b", "a"]
//!         .iter()
//!         .map(|g| Item { guid: g.to_string(), ..Item::default() })
//!         .collect(),
//!     ..Feed::default()
//! };
//!
//! let watermark = Watermark::capture(&feed, 128);
//! assert_eq!(watermark.guids(), ["a", "b", "c"]);
//!
//! let known = watermark.without_newest(1);
//! let new_items = find_new(&feed, &known.known());
//! assert_eq!(new_items.len(), 1);
//! assert_eq!(new_items[0].guid, "c");
//! ```

use std::collections::HashSet;

use serde::Serialize;

use crate::feed::{Feed, Item};

/// Default number of GUIDs captured per fetch.
pub const DEFAULT_MAX_GUIDS: usize = 128;

/// Default number of newest GUIDs treated as not yet delivered.
pub const DEFAULT_RETAIN: usize = 5;

/// GUIDs seen in a fetch, ordered oldest to newest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Watermark {
    guids: Vec<String>,
}

/// Hash set of GUIDs borrowed from a [`Watermark`], built once per comparison.
pub type KnownGuids<'a> = HashSet<&'a str>;

impl Watermark {
    /// Captures the GUIDs of the first `max_count` items of `feed`.
    ///
    /// Item 0 is the newest by RSS convention, so the result is the first
    /// `min(max_count, len)` GUIDs in reverse: `items[k-1]` first,
    /// `items[0]` last. Duplicate GUIDs are kept as they appear.
    pub fn capture(feed: &Feed, max_count: usize) -> Self {
        let k = max_count.min(feed.items.len());
        let guids = feed.items[..k]
            .iter()
            .rev()
            .map(|item| item.guid.clone())
            .collect();
        Self { guids }
    }

    /// Builds a watermark from GUIDs already ordered oldest to newest.
    pub fn from_oldest_first<I, S>(guids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            guids: guids.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns a copy without the `retain` newest GUIDs.
    ///
    /// With a capture of `total` GUIDs the result keeps the `total - retain`
    /// oldest. `retain >= total` yields an empty watermark.
    pub fn without_newest(&self, retain: usize) -> Self {
        let keep = self.guids.len().saturating_sub(retain);
        Self {
            guids: self.guids[..keep].to_vec(),
        }
    }

    /// GUIDs oldest to newest.
    pub fn guids(&self) -> &[String] {
        &self.guids
    }

    pub fn newest(&self) -> Option<&str> {
        self.guids.last().map(String::as_str)
    }

    pub fn oldest(&self) -> Option<&str> {
        self.guids.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.guids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guids.is_empty()
    }

    /// Set view for O(1) membership tests.
    pub fn known(&self) -> KnownGuids<'_> {
        self.guids.iter().map(String::as_str).collect()
    }
}

/// Items of `feed`, in document order, whose GUID is absent from `known`.
///
/// Each occurrence is checked on its own, so duplicate GUIDs that are not
/// known are all reported.
pub fn find_new<'a>(feed: &'a Feed, known: &KnownGuids<'_>) -> Vec<&'a Item> {
    feed.items
        .iter()
        .filter(|item| !known.contains(item.guid.as_str()))
        .collect()
}

/// Result of running the capture, truncate and diff policy on one fetch.
#[derive(Debug, Clone, Serialize)]
pub struct NoveltyReport<'a> {
    /// Fresh capture of up to `max_count` GUIDs from this fetch.
    pub watermark: Watermark,
    /// The capture with the `retain` newest GUIDs removed.
    pub known: Watermark,
    /// Items absent from `known`, in feed order.
    pub new_items: Vec<&'a Item>,
}

impl<'a> NoveltyReport<'a> {
    pub fn compute(feed: &'a Feed, max_count: usize, retain: usize) -> Self {
        let watermark = Watermark::capture(feed, max_count);
        let known = watermark.without_newest(retain);
        let new_items = find_new(feed, &known.known());

        tracing::debug!(
            items = feed.items.len(),
            captured = watermark.len(),
            known = known.len(),
            new = new_items.len(),
            "Computed novelty"
        );

        Self {
            watermark,
            known,
            new_items,
        }
    }
}
