use std::borrow::Cow;

/// Returns true for characters XML 1.0 does not allow in text content.
fn is_xml_illegal(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}')
}

/// Removes characters that cannot appear in an XML document.
///
/// Tabs, newlines and carriage returns are kept. Returns `Cow::Borrowed`
/// when nothing had to be removed.
///
/// # Examples
///
/// ```
/// use freedoom_feed::util::strip_control_chars;
///
/// assert_eq!(strip_control_chars("clean\ttext"), "clean\ttext");
/// assert_eq!(strip_control_chars("bell\x07ringer"), "bellringer");
/// ```
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_xml_illegal) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.chars().filter(|&c| !is_xml_illegal(c)).collect())
}
