//! Console rendering of feeds and new-item lists.
//!
//! Empty fields print as `N/A`. All feed text passes through
//! [`strip_control_chars`] first, since it comes straight from the network.

use std::borrow::Cow;

use crate::feed::{Feed, Item};
use crate::util::{strip_control_chars, truncate_to_width};

const MISSING: &str = "N/A";
const ITEM_PREFIX: &str = "    |_ ";
const RULE: &str = "----------------------------------------";

/// Plain-text renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Presenter {
    /// Maximum description width in columns, 0 for unlimited.
    pub description_width: usize,
}

impl Presenter {
    pub fn new(description_width: usize) -> Self {
        Self { description_width }
    }

    /// Channel metadata followed by every item.
    pub fn feed(&self, feed: &Feed) -> String {
        let mut out = String::new();
        out.push_str(&format!("- Title: {}\n", field(&feed.title)));
        out.push_str(&format!("- Link: {}\n", field(&feed.link)));
        out.push_str(&format!(
            "- Description: {}\n",
            self.description(&feed.description)
        ));
        out.push_str(&format!("- Items ({}):\n", feed.item_count()));
        for (i, item) in feed.items.iter().enumerate() {
            out.push_str(&format!("    Item {}:\n", i + 1));
            self.write_item(&mut out, item, ITEM_PREFIX);
        }
        out
    }

    /// Header naming the feed, then each new item.
    pub fn new_items(&self, feed: &Feed, items: &[&Item]) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "New articles from <{}>\n",
            strip_control_chars(&feed.title)
        ));
        out.push_str(RULE);
        out.push('\n');
        if items.is_empty() {
            out.push_str("(no new articles)\n");
        }
        for (i, item) in items.iter().enumerate() {
            out.push_str(&format!("- item {i}\n"));
            self.write_item(&mut out, item, ITEM_PREFIX);
        }
        out
    }

    /// One item, each line starting with `prefix`.
    pub fn item(&self, item: &Item, prefix: &str) -> String {
        let mut out = String::new();
        self.write_item(&mut out, item, prefix);
        out
    }

    fn write_item(&self, out: &mut String, item: &Item, prefix: &str) {
        out.push_str(&format!("{prefix}Title: {}\n", field(&item.title)));
        out.push_str(&format!("{prefix}Link: {}\n", field(&item.link)));
        out.push_str(&format!("{prefix}GUID: {}\n", field(&item.guid)));
        out.push_str(&format!(
            "{prefix}Description: {}\n",
            self.description(&item.description)
        ));
        out.push_str(&format!(
            "{prefix}Publication Date: {}\n",
            field(&item.pub_date)
        ));
        out.push_str(&format!("{prefix}Author: {}\n", field(&item.author)));

        let categories: Vec<_> = item
            .categories
            .iter()
            .map(|c| strip_control_chars(c))
            .collect();
        out.push_str(&format!(
            "{prefix}Categories ({}): {}\n",
            categories.len(),
            categories.join(" ")
        ));
    }

    fn description<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match field(text) {
            Cow::Borrowed(s) => truncate_to_width(s, self.description_width),
            Cow::Owned(s) => {
                Cow::Owned(truncate_to_width(&s, self.description_width).into_owned())
            }
        }
    }
}

fn field(text: &str) -> Cow<'_, str> {
    if text.is_empty() {
        Cow::Borrowed(MISSING)
    } else {
        strip_control_chars(text)
    }
}
