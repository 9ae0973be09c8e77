//! Helpers shared by the feed writer: XML-safe text and atomic file output.

mod fs;
mod text;

pub use fs::replace_file;
pub use text::strip_control_chars;
