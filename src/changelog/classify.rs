use once_cell::sync::Lazy;
use regex::Regex;

use super::ChangelogError;

/// `== 0.13.0 (2024-01-05)`: optional leading whitespace, then at least one
/// whitespace character after `==` and before the date.
static VERSION_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*==\s+(\d+(?:\.\d+)*)\s+\((\d{4}-\d{2}-\d{2})\)")
        .expect("version marker pattern is valid")
});

const SECTION_PREFIX: &str = "=== ";
const BULLET_MARKER: char = '*';

/// One classified changelog line, borrowing its text from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    /// Opens a new release section.
    VersionMarker { version: &'a str, date: &'a str },
    /// `=== Heading` inside a release.
    SectionHeader(&'a str),
    /// `* item`, `** nested item`, ...
    Bullet { depth: usize, text: &'a str },
    /// Plain text continuing the previous bullet.
    Continuation(&'a str),
    /// Whitespace-only line.
    Blank,
    /// Anything seen before the first version marker.
    Preamble,
}

/// Classifies a single line.
///
/// `version_open` tells whether a release section has been opened yet;
/// until then only version markers are recognized and everything else is
/// [`Line::Preamble`].
///
/// # Errors
///
/// - [`ChangelogError::MarkerCaptures`] if the marker pattern matched
///   without yielding both the version and the date
/// - [`ChangelogError::MalformedBullet`] if a bullet line has no space
pub fn classify(
    raw: &str,
    line_no: usize,
    version_open: bool,
) -> Result<Line<'_>, ChangelogError> {
    if let Some(caps) = VERSION_MARKER.captures(raw) {
        return match (caps.get(1), caps.get(2)) {
            (Some(version), Some(date)) => Ok(Line::VersionMarker {
                version: version.as_str(),
                date: date.as_str(),
            }),
            _ => Err(ChangelogError::MarkerCaptures { line: line_no }),
        };
    }

    if !version_open {
        return Ok(Line::Preamble);
    }

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Line::Blank);
    }

    if let Some(header) = trimmed.strip_prefix(SECTION_PREFIX) {
        return Ok(Line::SectionHeader(header));
    }

    if trimmed.starts_with(BULLET_MARKER) {
        let space = trimmed
            .find(' ')
            .ok_or(ChangelogError::MalformedBullet { line: line_no })?;
        // The asterisk run sets the depth: "* " is 0, "** " is 1.
        return Ok(Line::Bullet {
            depth: space.saturating_sub(1),
            text: trimmed[space + 1..].trim_start(),
        });
    }

    Ok(Line::Continuation(trimmed))
}
