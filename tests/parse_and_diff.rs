//! Integration tests for the parse-then-diff pipeline.
//!
//! Feeds are parsed from literal XML and run through the novelty engine
//! the same way the binary does after a fetch.

use feedwatch::feed::{parse_feed, Feed, ParseError};
use feedwatch::novelty::{find_new, NoveltyReport, Watermark};
use pretty_assertions::assert_eq;

const WORDPRESS_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"
    xmlns:content="http://purl.org/rss/1.0/modules/content/"
    xmlns:dc="http://purl.org/dc/elements/1.1/"
    xmlns:atom="http://www.w3.org/2005/Atom">
<channel>
    <title>Field Notes</title>
    <atom:link href="https://notes.example.com/feed/" rel="self" type="application/rss+xml" />
    <link>https://notes.example.com</link>
    <description><![CDATA[Weather & climate]]></description>
    <lastBuildDate>Thu, 05 Feb 2026 09:00:00 +0000</lastBuildDate>
    <image><url>https://notes.example.com/logo.png</url><title>Logo</title></image>
    <item>
        <title><![CDATA[Snow in [March]]]></title>
        <link>https://notes.example.com/snow</link>
        <dc:creator><![CDATA[Jo Park]]></dc:creator>
        <pubDate>Thu, 05 Feb 2026 08:00:00 +0000</pubDate>
        <category><![CDATA[Weather]]></category>
        <category><![CDATA[Seoul]]></category>
        <guid isPermaLink="false">https://notes.example.com/?p=3</guid>
        <description><![CDATA[<p>Heavy snow expected.</p>]]></description>
        <content:encoded><![CDATA[<p>Full text</p>]]></content:encoded>
    </item>
    <item>
        <title>Rainfall &amp; rivers</title>
        <link>https://notes.example.com/rain</link>
        <author>editor@example.com</author>
        <guid isPermaLink="false">https://notes.example.com/?p=2</guid>
    </item>
    <item>
        <title>First post</title>
        <guid isPermaLink="false">https://notes.example.com/?p=1</guid>
    </item>
</channel>
</rss>"#;

fn numbered_feed(count: usize) -> String {
    let mut xml = String::from("<rss version=\"2.0\"><channel><title>Numbers</title>");
    for i in 0..count {
        xml.push_str(&format!(
            "<item><title>Post {i}</title><guid>post-{i}</guid></item>"
        ));
    }
    xml.push_str("</channel></rss>");
    xml
}

fn guids(feed: &Feed) -> Vec<&str> {
    feed.items.iter().map(|i| i.guid.as_str()).collect()
}

#[test]
fn test_wordpress_feed_metadata() {
    let feed = parse_feed(WORDPRESS_FEED.as_bytes()).unwrap();
    assert_eq!(feed.title, "Field Notes");
    assert_eq!(feed.link, "https://notes.example.com");
    assert_eq!(feed.description, "Weather & climate");
    assert_eq!(feed.item_count(), 3);
}

#[test]
fn test_wordpress_feed_items() {
    let feed = parse_feed(WORDPRESS_FEED.as_bytes()).unwrap();

    let snow = &feed.items[0];
    assert_eq!(snow.title, "Snow in [March]");
    assert_eq!(snow.author, "Jo Park");
    assert_eq!(snow.categories, vec!["Weather", "Seoul"]);
    assert_eq!(snow.description, "<p>Heavy snow expected.</p>");
    assert_eq!(snow.pub_date, "Thu, 05 Feb 2026 08:00:00 +0000");

    let rain = &feed.items[1];
    assert_eq!(rain.title, "Rainfall & rivers");
    assert_eq!(rain.author, "editor@example.com");
    assert!(rain.categories.is_empty());
    assert_eq!(rain.description, "");

    assert_eq!(
        guids(&feed),
        vec![
            "https://notes.example.com/?p=3",
            "https://notes.example.com/?p=2",
            "https://notes.example.com/?p=1",
        ]
    );
}

#[test]
fn test_previous_fetch_minus_newest() {
    let feed = parse_feed(numbered_feed(10).as_bytes()).unwrap();
    let known = Watermark::capture(&feed, 10).without_newest(3);

    assert_eq!(known.len(), 7);
    assert_eq!(known.oldest(), Some("post-9"));
    assert_eq!(known.newest(), Some("post-3"));

    let new_items = find_new(&feed, &known.known());
    let new_guids: Vec<_> = new_items.iter().map(|i| i.guid.as_str()).collect();
    assert_eq!(new_guids, vec!["post-0", "post-1", "post-2"]);
}

#[test]
fn test_watermark_from_earlier_fetch() {
    // Earlier fetch saw posts 0..5; the current one has two more on top
    let earlier = parse_feed(numbered_feed(5).as_bytes()).unwrap();
    let watermark = Watermark::capture(&earlier, 128);

    let current_xml = "<rss><channel>\
        <item><guid>post-new-b</guid></item>\
        <item><guid>post-new-a</guid></item>\
        <item><guid>post-0</guid></item>\
        <item><guid>post-1</guid></item>\
    </channel></rss>";
    let current = parse_feed(current_xml.as_bytes()).unwrap();

    let new_items = find_new(&current, &watermark.known());
    let new_guids: Vec<_> = new_items.iter().map(|i| i.guid.as_str()).collect();
    assert_eq!(new_guids, vec!["post-new-b", "post-new-a"]);
}

#[test]
fn test_reference_run_defaults() {
    let feed = parse_feed(numbered_feed(20).as_bytes()).unwrap();
    let report = NoveltyReport::compute(&feed, 128, 5);

    assert_eq!(report.watermark.len(), 20);
    assert_eq!(report.known.len(), 15);
    let new_guids: Vec<_> = report.new_items.iter().map(|i| i.guid.as_str()).collect();
    assert_eq!(
        new_guids,
        vec!["post-0", "post-1", "post-2", "post-3", "post-4"]
    );
}

#[test]
fn test_report_serializes_to_json() {
    let feed = parse_feed(numbered_feed(2).as_bytes()).unwrap();
    let report = NoveltyReport::compute(&feed, 128, 1);
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["watermark"]["guids"], serde_json::json!(["post-1", "post-0"]));
    assert_eq!(json["known"]["guids"], serde_json::json!(["post-1"]));
    assert_eq!(json["new_items"][0]["guid"], "post-0");
    assert_eq!(json["new_items"][0]["pub_date"], "");
}

#[test]
fn test_malformed_feed_yields_no_partial_result() {
    let truncated = &WORDPRESS_FEED[..WORDPRESS_FEED.len() / 2];
    assert!(parse_feed(truncated.as_bytes()).is_err());

    let err = parse_feed(b"<channel><unclosed>").unwrap_err();
    assert!(matches!(
        err,
        ParseError::UnclosedElement(_) | ParseError::Xml(_)
    ));
}
