use crate::changelog::Release;
use crate::config::FeedConfig;

/// Indentation applied to every description line, independent of where the
/// `<description>` element sits in the document.
pub const DESCRIPTION_INDENT: &str = "        ";

/// Product named in every item title.
pub const PRODUCT: &str = "Freedoom";

/// Paragraph break emitted after every non-empty description line.
pub const PARAGRAPH_BREAK: &str = "<br/>";

/// Channel-level metadata written once at the top of the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub title: String,
    pub link: String,
    pub description: String,
    pub language: String,
    pub image_url: String,
}

impl Channel {
    pub fn from_config(config: &FeedConfig) -> Self {
        Self {
            title: config.title.clone(),
            link: config.link.clone(),
            description: config.description.clone(),
            language: config.language.clone(),
            image_url: config.image_url.clone(),
        }
    }
}

/// One `<item>` of the feed, built from a completed release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub pub_date: String,
    pub link: String,
    pub description: String,
}

impl FeedItem {
    pub fn from_release(release: &Release, config: &FeedConfig) -> Self {
        let entry = &release.entry;
        Self {
            title: format!(
                "{}: {PRODUCT} {} released",
                entry.formatted_date, entry.version
            ),
            pub_date: entry.formatted_date.clone(),
            link: config.release_link(&entry.version),
            description: render_description(&release.lines),
        }
    }
}

/// Joins description lines into one indented block.
///
/// Each non-empty line becomes an indented line followed by an indented
/// paragraph break; separators become bare blank lines. The block begins
/// and ends with a newline.
pub fn render_description(lines: &[String]) -> String {
    let mut out = String::from("\n");
    for line in lines {
        if line.is_empty() {
            out.push('\n');
        } else {
            out.push_str(DESCRIPTION_INDENT);
            out.push_str(line);
            out.push('\n');
            out.push_str(DESCRIPTION_INDENT);
            out.push_str(PARAGRAPH_BREAK);
            out.push('\n');
        }
    }
    out
}

/// The whole feed: channel metadata plus items in changelog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedDocument {
    pub channel: Channel,
    pub items: Vec<FeedItem>,
}

impl FeedDocument {
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, item: FeedItem) {
        self.items.push(item);
    }
}
