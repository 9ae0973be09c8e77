use anyhow::{Context, Result};
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::{Cursor, Write};
use std::path::Path;

use super::model::{FeedDocument, FeedItem};
use crate::util::{replace_file, strip_control_chars};

/// Spaces per nesting level in the rendered document.
const INDENT_SIZE: usize = 4;

fn start<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .with_context(|| format!("Failed to write {name} element"))
}

fn end<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<()> {
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .with_context(|| format!("Failed to write {name} end"))
}

/// Writes `<name>text</name>` on one line, escaping `<`, `>` and `&`.
fn text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    start(writer, name)?;
    let clean = strip_control_chars(text);
    writer
        .write_event(Event::Text(BytesText::from_escaped(partial_escape(&*clean))))
        .with_context(|| format!("Failed to write {name} text"))?;
    end(writer, name)
}

fn write_item<W: Write>(writer: &mut Writer<W>, item: &FeedItem) -> Result<()> {
    start(writer, "item")?;
    text_element(writer, "title", &item.title)?;
    text_element(writer, "pubDate", &item.pub_date)?;
    text_element(writer, "link", &item.link)?;
    text_element(writer, "description", &item.description)?;
    end(writer, "item")
}

/// Renders the feed as an RSS 2.0 XML string.
///
/// Channel fields come first (title, link, description, language, image),
/// followed by one `<item>` per release in document order.
pub fn render_rss(doc: &FeedDocument) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', INDENT_SIZE);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .context("Failed to write XML declaration")?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    writer
        .write_event(Event::Start(rss))
        .context("Failed to write rss element")?;

    let channel = &doc.channel;
    start(&mut writer, "channel")?;
    text_element(&mut writer, "title", &channel.title)?;
    text_element(&mut writer, "link", &channel.link)?;
    text_element(&mut writer, "description", &channel.description)?;
    text_element(&mut writer, "language", &channel.language)?;
    start(&mut writer, "image")?;
    text_element(&mut writer, "url", &channel.image_url)?;
    end(&mut writer, "image")?;

    for item in &doc.items {
        write_item(&mut writer, item)?;
    }

    end(&mut writer, "channel")?;
    end(&mut writer, "rss")?;

    let result = writer.into_inner().into_inner();
    String::from_utf8(result).context("Generated feed contains invalid UTF-8")
}

/// Renders the feed and writes it to `path` atomically.
///
/// An existing file at `path` is replaced; it is never left half-written.
pub fn write_to_file(doc: &FeedDocument, path: &Path) -> Result<()> {
    let content = render_rss(doc)?;
    replace_file(path, content.as_bytes())?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "Wrote feed file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeedConfig;
    use crate::feed::model::Channel;

    fn sample_doc() -> FeedDocument {
        let mut doc = FeedDocument::new(Channel::from_config(&FeedConfig::default()));
        doc.push(FeedItem {
            title: "05 Jan 2024: Freedoom 0.13.0 released".to_string(),
            pub_date: "05 Jan 2024".to_string(),
            link: "https://freedoom.github.io/news.html#freedoom-0.13.0".to_string(),
            description: "\n        > Engine\n        <br/>\n".to_string(),
        });
        doc
    }

    #[test]
    fn test_render_structure() {
        let xml = render_rss(&sample_doc()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("\n<rss version=\"2.0\">"));
        assert!(xml.contains("\n    <channel>"));
        assert!(xml.contains("\n        <title>Freedoom Feed</title>"));
        assert!(xml.contains("\n        <language>en-us</language>"));
        assert!(xml.contains(
            "\n        <image>\n            <url>https://freedoom.github.io/img/favicon.png</url>\n        </image>"
        ));
        assert!(xml.contains("\n            <title>05 Jan 2024: Freedoom 0.13.0 released</title>"));
        assert!(xml.contains("\n            <pubDate>05 Jan 2024</pubDate>"));
        assert!(xml.ends_with("</rss>"));
    }

    #[test]
    fn test_item_field_order() {
        let xml = render_rss(&sample_doc()).unwrap();
        let item = &xml[xml.find("<item>").unwrap()..];
        let title = item.find("<title>").unwrap();
        let date = item.find("<pubDate>").unwrap();
        let link = item.find("<link>").unwrap();
        let description = item.find("<description>").unwrap();
        assert!(title < date && date < link && link < description);
    }

    #[test]
    fn test_description_is_escaped() {
        let xml = render_rss(&sample_doc()).unwrap();
        assert!(xml.contains("<description>\n        &gt; Engine\n        &lt;br/&gt;\n</description>"));
    }

    #[test]
    fn test_control_chars_stripped() {
        let mut doc = sample_doc();
        doc.items[0].title = "bad\x07title & more".to_string();
        let xml = render_rss(&doc).unwrap();
        assert!(xml.contains("<title>badtitle &amp; more</title>"));
    }

    #[test]
    fn test_empty_feed_has_channel() {
        let doc = FeedDocument::new(Channel::from_config(&FeedConfig::default()));
        let xml = render_rss(&doc).unwrap();
        assert!(xml.contains("<channel>"));
        assert!(!xml.contains("<item>"));
    }

    #[test]
    fn test_write_to_file_overwrites() {
        let dir = std::env::temp_dir().join("freedoom_feed_writer_overwrite");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("feed.rss");
        std::fs::write(&path, "stale contents").unwrap();

        write_to_file(&sample_doc(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, render_rss(&sample_doc()).unwrap());
        let leftovers = std::fs::read_dir(&dir).unwrap().count();
        assert_eq!(leftovers, 1, "temporary file should be renamed away");

        std::fs::remove_dir_all(&dir).ok();
    }
}
