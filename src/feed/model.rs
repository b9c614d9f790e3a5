use serde::Serialize;

/// One article within a feed.
///
/// Every text field is an empty string when the feed omits it; the `N/A`
/// placeholder belongs to presentation, not to the data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Item {
    pub title: String,
    pub link: String,
    /// Sole identity key. Compared byte-for-byte, no normalization.
    pub guid: String,
    pub description: String,
    /// Publication date exactly as the feed wrote it (usually RFC 2822).
    pub pub_date: String,
    /// From `<author>` or `<dc:creator>`, whichever came last.
    pub author: String,
    /// Repeatable; document order, duplicates kept.
    pub categories: Vec<String>,
}

/// One RSS channel: metadata plus its items in document order.
///
/// By RSS convention the first item is the most recent, but nothing here
/// relies on that beyond document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Feed {
    pub title: String,
    pub link: String,
    pub description: String,
    pub items: Vec<Item>,
}

impl Feed {
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
