//! RSS feed fetching and parsing.
//!
//! - **Parsing**: Convert RSS XML into an owned [`Feed`] of [`Item`]s
//! - **Fetching**: HTTP retrieval with timeout, size limit and retry
//!
//! # Architecture
//!
//! - [`cdata`] - Unwraps `<![CDATA[ ... ]]>` text
//! - [`xml`] - Scoped XML tree built with `quick-xml`
//! - [`parser`] - Channel and item extraction from the tree
//! - [`fetcher`] - HTTP fetching with `reqwest`
//!
//! # Example
//!
//! ```ignore
//! use feedwatch::feed::{fetch_and_parse, FetchOptions};
//!
//! let client = reqwest::Client::new();
//! let feed = fetch_and_parse(&client, "https://example.com/rss", &FetchOptions::default()).await?;
//! println!("{} items", feed.item_count());
//! ```

pub mod cdata;
pub mod fetcher;
mod model;
pub mod parser;
pub mod xml;

pub use cdata::extract_cdata;
pub use fetcher::{
    build_client, fetch_and_parse, fetch_feed, validate_feed_url, FetchError, FetchOptions,
};
pub use model::{Feed, Item};
pub use parser::{parse_feed, parse_item, ParseError};
