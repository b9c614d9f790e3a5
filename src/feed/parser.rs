use thiserror::Error;

use super::cdata::extract_cdata;
use super::model::{Feed, Item};
use super::xml::{Document, Element};

/// Errors that make a feed document unusable.
///
/// A malformed document cannot be trusted to yield a correct item list, so
/// any of these fails the whole parse; no partial [`Feed`] is returned.
#[derive(Debug, Error)]
pub enum ParseError {
    /// XML syntax error reported by the reader (bad tag, mismatched end
    /// tag, unknown entity, ...)
    #[error("XML parse error: {0}")]
    Xml(String),
    /// Input cannot be decoded in its declared (or default UTF-8) encoding
    #[error("Feed text is not valid in its declared encoding")]
    Encoding,
    /// Document ended with an element still open
    #[error("Unclosed element <{0}>")]
    UnclosedElement(String),
    /// Document contains no element at all
    #[error("No root element found")]
    NoRootElement,
    /// A second top-level element follows the root
    #[error("More than one root element")]
    MultipleRoots,
    /// Non-whitespace text outside the root element
    #[error("Text content outside the root element")]
    TextOutsideRoot,
    /// Element nesting exceeds the safety limit
    #[error("XML nesting depth exceeds maximum of {0} levels")]
    MaxDepthExceeded(usize),
    /// The root element has no `<channel>` child
    #[error("No <channel> element found")]
    MissingChannel,
}

/// Parses a full RSS document into a [`Feed`].
///
/// Reads the first `<channel>` under the root element. Channel `title`,
/// `link` and `description` are last-value-wins; each `<item>` becomes an
/// [`Item`] in document order. Other channel children (`image`,
/// `lastBuildDate`, `atom:link`, ...) are ignored.
///
/// # Errors
///
/// Returns [`ParseError`] if the bytes are not a well-formed XML document
/// or the root has no `<channel>` child.
pub fn parse_feed(bytes: &[u8]) -> Result<Feed, ParseError> {
    let document = Document::parse(bytes)?;
    let channel = document
        .root()
        .first_child("channel")
        .ok_or(ParseError::MissingChannel)?;

    let mut feed = Feed::default();
    for child in channel.child_elements() {
        match child.name() {
            "title" => feed.title = field_text(child),
            "link" => feed.link = field_text(child),
            "description" => feed.description = field_text(child),
            "item" => feed.items.push(parse_item(child)),
            _ => {}
        }
    }

    tracing::debug!(
        title = %feed.title,
        items = feed.items.len(),
        "Parsed feed"
    );
    Ok(feed)
}

/// Builds an [`Item`] from the children of an `<item>` element.
///
/// Singular fields are last-value-wins; `<category>` accumulates.
/// `<author>` and `<dc:creator>` (any prefix) share the author field.
/// Unknown and other namespaced tags are skipped, and no field is required.
pub fn parse_item(element: &Element) -> Item {
    let mut item = Item::default();

    for child in element.child_elements() {
        let name = match child.prefix() {
            None => child.name(),
            // WordPress and friends put the author in dc:creator
            Some(_) if child.local_name() == "creator" => "creator",
            Some(_) => continue,
        };

        match name {
            "title" => item.title = field_text(child),
            "link" => item.link = field_text(child),
            "guid" => item.guid = field_text(child),
            "description" => item.description = field_text(child),
            "pubDate" => item.pub_date = field_text(child),
            "author" | "creator" => item.author = field_text(child),
            "category" => item.categories.push(field_text(child)),
            _ => {}
        }
    }

    item
}

fn field_text(element: &Element) -> String {
    extract_cdata(&element.text_content()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item_from(xml: &str) -> Item {
        let document = Document::parse(xml.as_bytes()).unwrap();
        parse_item(document.root())
    }

    #[test]
    fn test_item_all_fields() {
        let item = item_from(
            "<item>\
                <title>T</title><link>https://example.com/a</link><guid>g</guid>\
                <description>D</description><pubDate>Mon, 02 Feb 2026 10:00:00 GMT</pubDate>\
                <author>A</author><category>x</category>\
            </item>",
        );
        assert_eq!(
            item,
            Item {
                title: "T".into(),
                link: "https://example.com/a".into(),
                guid: "g".into(),
                description: "D".into(),
                pub_date: "Mon, 02 Feb 2026 10:00:00 GMT".into(),
                author: "A".into(),
                categories: vec!["x".into()],
            }
        );
    }

    #[test]
    fn test_item_last_value_wins() {
        let item = item_from("<item><title>A</title><title>B</title></item>");
        assert_eq!(item.title, "B");
    }

    #[test]
    fn test_item_categories_accumulate() {
        let item = item_from(
            "<item><category>rust</category><category>xml</category><category>rust</category></item>",
        );
        assert_eq!(item.categories, vec!["rust", "xml", "rust"]);
    }

    #[test]
    fn test_item_creator_aliases_author() {
        let item = item_from("<item><author>first</author><dc:creator>second</dc:creator></item>");
        assert_eq!(item.author, "second");

        let item = item_from("<item><dc:creator>first</dc:creator><author>second</author></item>");
        assert_eq!(item.author, "second");

        let item = item_from("<item><creator>plain</creator></item>");
        assert_eq!(item.author, "plain");
    }

    #[test]
    fn test_item_namespaced_lookalikes_ignored() {
        let item = item_from("<item><title>real</title><media:title>other</media:title></item>");
        assert_eq!(item.title, "real");
    }

    #[test]
    fn test_item_unknown_tags_ignored() {
        let item = item_from("<item><comments>c</comments><enclosure url=\"x\"/><guid>g</guid></item>");
        assert_eq!(item.guid, "g");
        assert_eq!(item.title, "");
    }

    #[test]
    fn test_item_empty_is_valid() {
        assert_eq!(item_from("<item/>"), Item::default());
    }

    #[test]
    fn test_item_cdata_fields() {
        let item = item_from(
            "<item><title><![CDATA[Hello]]></title><description>&lt;![CDATA[<b>hi</b>]]&gt;</description></item>",
        );
        assert_eq!(item.title, "Hello");
        assert_eq!(item.description, "<b>hi</b>");
    }

    #[test]
    fn test_item_guid_whitespace_preserved() {
        let item = item_from("<item><guid> g1 </guid></item>");
        assert_eq!(item.guid, " g1 ");
    }

    #[test]
    fn test_feed_end_to_end() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>Example</title>
<item><title><![CDATA[Hello]]></title><guid>g1</guid></item>
</channel></rss>"#;
        let feed = parse_feed(xml.as_bytes()).unwrap();
        assert_eq!(
            feed,
            Feed {
                title: "Example".into(),
                items: vec![Item {
                    title: "Hello".into(),
                    guid: "g1".into(),
                    ..Item::default()
                }],
                ..Feed::default()
            }
        );
        assert_eq!(feed.item_count(), 1);
    }

    #[test]
    fn test_feed_items_in_document_order() {
        let xml = "<rss><channel>\
            <item><guid>1</guid></item><item><guid>2</guid></item><item><guid>3</guid></item>\
        </channel></rss>";
        let feed = parse_feed(xml.as_bytes()).unwrap();
        let guids: Vec<_> = feed.items.iter().map(|i| i.guid.as_str()).collect();
        assert_eq!(guids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_feed_atom_link_does_not_clobber_link() {
        let xml = r#"<rss xmlns:atom="http://www.w3.org/2005/Atom"><channel>
            <link>https://example.com</link>
            <atom:link href="https://example.com/feed" rel="self" type="application/rss+xml"/>
            <description>About</description>
            <image><title>logo</title></image>
        </channel></rss>"#;
        let feed = parse_feed(xml.as_bytes()).unwrap();
        assert_eq!(feed.link, "https://example.com");
        assert_eq!(feed.description, "About");
        assert_eq!(feed.title, "");
    }

    #[test]
    fn test_feed_first_channel_only() {
        let xml = "<rss><channel><title>one</title></channel><channel><title>two</title></channel></rss>";
        let feed = parse_feed(xml.as_bytes()).unwrap();
        assert_eq!(feed.title, "one");
    }

    #[test]
    fn test_feed_empty_channel() {
        let feed = parse_feed(b"<rss><channel></channel></rss>").unwrap();
        assert!(feed.is_empty());
        assert_eq!(feed, Feed::default());
    }

    #[test]
    fn test_feed_missing_channel() {
        let err = parse_feed(b"<feed xmlns=\"http://www.w3.org/2005/Atom\"/>").unwrap_err();
        assert!(matches!(err, ParseError::MissingChannel));
    }

    #[test]
    fn test_feed_channel_must_be_direct_child() {
        let err = parse_feed(b"<rss><wrapper><channel/></wrapper></rss>").unwrap_err();
        assert!(matches!(err, ParseError::MissingChannel));
    }

    #[test]
    fn test_feed_malformed() {
        assert!(parse_feed(b"<channel><unclosed>").is_err());
        assert!(parse_feed(b"<not valid xml").is_err());
        assert!(matches!(
            parse_feed(b"").unwrap_err(),
            ParseError::NoRootElement
        ));
    }

    #[test]
    fn test_feed_latin1_encoding() {
        let feed = parse_feed(
            b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><rss><channel><title>Caf\xE9</title></channel></rss>",
        )
        .unwrap();
        assert_eq!(feed.title, "Caf\u{e9}");
    }
}
