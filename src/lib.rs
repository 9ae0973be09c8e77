//! Turn the Freedoom changelog into an RSS 2.0 feed of releases.
//!
//! ```no_run
//! use freedoom_feed::config::FeedConfig;
//! use freedoom_feed::feed::{build_feed, write_to_file};
//!
//! let text = std::fs::read_to_string("NEWS.adoc")?;
//! let doc = build_feed(&text, &FeedConfig::default())?;
//! write_to_file(&doc, std::path::Path::new("feed.rss"))?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod changelog;
pub mod config;
pub mod feed;
pub mod util;
