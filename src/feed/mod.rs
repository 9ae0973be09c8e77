//! Feed building and RSS output.
//!
//! - [`model`] - Channel, item and document types
//! - [`writer`] - RSS 2.0 rendering with `quick-xml` and atomic file output
//!
//! [`build_feed`] ties the changelog parser to the builder: every completed
//! release becomes one [`FeedItem`], in changelog order.

pub mod model;
pub mod writer;

pub use model::{render_description, Channel, FeedDocument, FeedItem};
pub use writer::{render_rss, write_to_file};

use crate::changelog::{parse_changelog, ChangelogError};
use crate::config::FeedConfig;

/// Parses changelog text into a complete feed document.
pub fn build_feed(text: &str, config: &FeedConfig) -> Result<FeedDocument, ChangelogError> {
    let mut doc = FeedDocument::new(Channel::from_config(config));
    let releases = parse_changelog(text, |release| {
        doc.push(FeedItem::from_release(&release, config));
    })?;
    tracing::debug!(releases, "Built feed");
    Ok(doc)
}
