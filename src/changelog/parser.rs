use chrono::NaiveDate;

use super::{classify, ChangelogError, Line};

const SECTION_QUOTE: &str = "> ";
const NESTING_MARKER: &str = "- ";

/// Version and dates taken from a marker line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionEntry {
    pub version: String,
    /// `YYYY-MM-DD` exactly as written in the changelog.
    pub iso_date: String,
    /// `DD Mon YYYY`, e.g. `05 Jan 2024`.
    pub formatted_date: String,
}

impl VersionEntry {
    fn from_marker(version: &str, iso_date: &str, line: usize) -> Result<Self, ChangelogError> {
        let date = NaiveDate::parse_from_str(iso_date, "%Y-%m-%d").map_err(|source| {
            ChangelogError::InvalidDate {
                line,
                date: iso_date.to_string(),
                source,
            }
        })?;

        Ok(Self {
            version: version.to_string(),
            iso_date: iso_date.to_string(),
            formatted_date: date.format("%d %b %Y").to_string(),
        })
    }
}

/// A finished release section: its marker plus rendered description lines.
///
/// An empty string in `lines` is a blank separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub entry: VersionEntry,
    pub lines: Vec<String>,
}

#[derive(Debug)]
struct OpenRelease {
    entry: VersionEntry,
    lines: Vec<String>,
    bullet: Option<String>,
    first_section: bool,
}

impl OpenRelease {
    fn new(entry: VersionEntry) -> Self {
        Self {
            entry,
            lines: Vec::new(),
            bullet: None,
            first_section: true,
        }
    }

    fn flush_bullet(&mut self) -> bool {
        match self.bullet.take() {
            Some(bullet) => {
                self.lines.push(bullet);
                true
            }
            None => false,
        }
    }

    fn ends_with_separator(&self) -> bool {
        self.lines.last().is_some_and(|l| l.is_empty())
    }

    fn section_header(&mut self, text: &str) {
        self.flush_bullet();
        if !self.first_section && !self.lines.is_empty() && !self.ends_with_separator() {
            self.lines.push(String::new());
        }
        self.lines.push(format!("{SECTION_QUOTE}{text}"));
        self.first_section = false;
    }

    fn bullet(&mut self, depth: usize, text: &str) {
        self.flush_bullet();
        self.bullet = Some(format!("{}{}", NESTING_MARKER.repeat(depth), text));
        self.first_section = false;
    }

    fn continuation(&mut self, text: &str) {
        match self.bullet.as_mut() {
            Some(bullet) => {
                bullet.push(' ');
                bullet.push_str(text);
            }
            None => self.bullet = Some(text.to_string()),
        }
    }

    fn blank(&mut self) {
        if self.flush_bullet() {
            self.lines.push(String::new());
        }
    }

    /// Shared by the next-marker and end-of-file paths.
    fn finalize(mut self) -> Release {
        self.flush_bullet();
        while self.ends_with_separator() {
            self.lines.pop();
        }
        tracing::debug!(
            version = %self.entry.version,
            date = %self.entry.iso_date,
            lines = self.lines.len(),
            "Completed release"
        );
        Release {
            entry: self.entry,
            lines: self.lines,
        }
    }
}

#[derive(Debug)]
enum State {
    NoVersionOpen,
    VersionOpen(OpenRelease),
}

/// Line-by-line changelog accumulator.
///
/// Feed it lines with [`push_line`](Self::push_line); every version marker
/// after the first one completes the previous release. Call
/// [`finish`](Self::finish) at end of input to complete the last one.
#[derive(Debug)]
pub struct ChangelogParser {
    state: State,
    line_no: usize,
}

impl Default for ChangelogParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangelogParser {
    pub fn new() -> Self {
        Self {
            state: State::NoVersionOpen,
            line_no: 0,
        }
    }

    /// Number of lines consumed so far.
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Consumes one physical line, returning the release it completed, if any.
    pub fn push_line(&mut self, raw: &str) -> Result<Option<Release>, ChangelogError> {
        self.line_no += 1;
        let version_open = matches!(self.state, State::VersionOpen(_));
        let line = classify(raw.trim_end(), self.line_no, version_open)?;

        if let Line::VersionMarker { version, date } = line {
            let entry = VersionEntry::from_marker(version, date, self.line_no)?;
            let previous =
                std::mem::replace(&mut self.state, State::VersionOpen(OpenRelease::new(entry)));
            return Ok(match previous {
                State::VersionOpen(open) => Some(open.finalize()),
                State::NoVersionOpen => None,
            });
        }

        let State::VersionOpen(open) = &mut self.state else {
            tracing::trace!(line = self.line_no, "Skipping preamble line");
            return Ok(None);
        };

        match line {
            Line::SectionHeader(text) => open.section_header(text),
            Line::Bullet { depth, text } => open.bullet(depth, text),
            Line::Continuation(text) => open.continuation(text),
            Line::Blank => open.blank(),
            Line::Preamble | Line::VersionMarker { .. } => {}
        }
        Ok(None)
    }

    /// Completes the last open release.
    ///
    /// # Errors
    ///
    /// [`ChangelogError::NoVersion`] if no version marker was ever seen.
    pub fn finish(self) -> Result<Release, ChangelogError> {
        match self.state {
            State::VersionOpen(open) => Ok(open.finalize()),
            State::NoVersionOpen => Err(ChangelogError::NoVersion),
        }
    }
}

/// Parses a whole changelog, handing each completed release to `sink` in
/// document order. Returns the number of releases.
pub fn parse_changelog<F>(text: &str, mut sink: F) -> Result<usize, ChangelogError>
where
    F: FnMut(Release),
{
    let mut parser = ChangelogParser::new();
    let mut count = 0;

    for raw in text.lines() {
        if let Some(release) = parser.push_line(raw)? {
            sink(release);
            count += 1;
        }
    }

    sink(parser.finish()?);
    Ok(count + 1)
}
