//! Section Locator: finds the span of a conventional CV section by its header line.
//!
//! Headers match case-insensitively at the start of a line, optionally followed by
//! whitespace and a colon. The section runs from the end of the header match to the
//! earliest terminator header, or `max_span_chars` characters when none follows.

use regex::Regex;

/// Byte span `[start, end)` of a located section within the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpan {
    pub start: usize,
    pub end: usize,
}

impl SectionSpan {
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Compiled header/terminator set for one section kind.
#[derive(Debug)]
pub struct SectionLocator {
    headers: Vec<Regex>,
    terminators: Vec<Regex>,
    max_span_chars: usize,
}

impl SectionLocator {
    /// Builds a locator from regex fragments such as `academic\s+background`.
    /// Header synonyms are tried in the given order.
    pub fn new(
        headers: &[&str],
        terminators: &[&str],
        max_span_chars: usize,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            headers: headers
                .iter()
                .map(|h| header_line_regex(h))
                .collect::<Result<_, _>>()?,
            terminators: terminators
                .iter()
                .map(|t| header_line_regex(t))
                .collect::<Result<_, _>>()?,
            max_span_chars,
        })
    }

    pub fn locate(&self, text: &str) -> Option<SectionSpan> {
        let header = self.headers.iter().find_map(|re| re.find(text))?;
        let start = header.end();

        // Smallest offset wins, not the first terminator pattern that matches.
        let end = self
            .terminators
            .iter()
            .filter_map(|re| re.find_at(text, start))
            .map(|m| m.start())
            .min()
            .unwrap_or_else(|| advance_chars(text, start, self.max_span_chars));

        Some(SectionSpan { start, end })
    }

    /// Located section text, trimmed; empty when the header is absent.
    pub fn section_text<'a>(&self, text: &'a str) -> &'a str {
        self.locate(text)
            .map(|span| span.slice(text).trim())
            .unwrap_or("")
    }
}

/// One-shot form of [`SectionLocator::locate`].
pub fn locate_section(
    text: &str,
    headers: &[&str],
    terminators: &[&str],
    max_span_chars: usize,
) -> Result<Option<SectionSpan>, regex::Error> {
    Ok(SectionLocator::new(headers, terminators, max_span_chars)?.locate(text))
}

fn header_line_regex(fragment: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?im)^[ \t]*(?:{fragment})[ \t]*(?::|\r?$)"))
}

/// Byte offset `n` characters after `from`, clamped to the end of `text`.
pub fn advance_chars(text: &str, from: usize, n: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(n)
        .map(|(i, _)| from + i)
        .unwrap_or(text.len())
}

/// Byte offset `n` characters before `from`, clamped to the start of `text`.
pub fn retreat_chars(text: &str, from: usize, n: usize) -> usize {
    if n == 0 {
        return from;
    }
    text[..from]
        .char_indices()
        .rev()
        .nth(n - 1)
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// The match at `[start, end)` widened by `radius` characters on each side.
pub fn context_window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    &text[retreat_chars(text, start, radius)..advance_chars(text, end, radius)]
}

/// Builds a stand-in section from `radius`-character windows around every match of
/// each pattern (pattern order, then document order), joined with spaces.
/// `keep` filters windows; windows it rejects are dropped.
pub fn synthetic_section(
    text: &str,
    patterns: &[Regex],
    radius: usize,
    keep: impl Fn(&str) -> bool,
) -> String {
    let mut section = String::new();
    for re in patterns {
        for m in re.find_iter(text) {
            let window = context_window(text, m.start(), m.end(), radius);
            if keep(window) {
                section.push_str(window);
                section.push(' ');
            }
        }
    }
    section
}

/// First `max_chars` characters of `s`, with `...` appended when truncated.
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let cut = advance_chars(s, 0, max_chars);
        format!("{}...", &s[..cut])
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDU_HEADERS: &[&str] = &["education", r"academic\s+background"];
    const EDU_TERMINATORS: &[&str] = &["experience", "skills"];

    #[test]
    fn test_section_ends_at_next_header_offset() {
        let text = "Jane Doe\nEducation\nBS Physics, State University, 2012\nExperience\nAnalyst at Foo";
        let span = locate_section(text, EDU_HEADERS, EDU_TERMINATORS, 1000)
            .unwrap()
            .unwrap();
        let experience_offset = text.find("Experience").unwrap();
        assert_eq!(span.end, experience_offset);
        assert_eq!(span.slice(text).trim(), "BS Physics, State University, 2012");
    }

    #[test]
    fn test_earliest_terminator_wins_over_pattern_order() {
        // "skills" appears before "experience" in the text but after it in the list.
        let text = "Education\nMSc Chemistry\nSkills\nTitration\nExperience\nLab work";
        let span = locate_section(text, EDU_HEADERS, EDU_TERMINATORS, 1000)
            .unwrap()
            .unwrap();
        assert_eq!(span.end, text.find("Skills").unwrap());
    }

    #[test]
    fn test_header_requires_line_start() {
        let text = "My education was great\nNothing else here";
        assert!(locate_section(text, EDU_HEADERS, EDU_TERMINATORS, 1000)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_header_is_case_insensitive_and_accepts_colon() {
        let text = "  EDUCATION:  BA History\n";
        let span = locate_section(text, EDU_HEADERS, EDU_TERMINATORS, 1000)
            .unwrap()
            .unwrap();
        assert_eq!(span.slice(text).trim(), "BA History");
    }

    #[test]
    fn test_max_span_cap_without_terminator() {
        let text = format!("Education\n{}", "x".repeat(5000));
        let span = locate_section(&text, EDU_HEADERS, EDU_TERMINATORS, 100)
            .unwrap()
            .unwrap();
        assert_eq!(text[span.start..span.end].chars().count(), 100);
    }

    #[test]
    fn test_cap_counts_characters_not_bytes() {
        let text = format!("Education\n{}", "é".repeat(50));
        let span = locate_section(&text, EDU_HEADERS, EDU_TERMINATORS, 20)
            .unwrap()
            .unwrap();
        assert_eq!(span.slice(&text).chars().count(), 20);
    }

    #[test]
    fn test_header_priority_order() {
        let text = "Academic Background\nPhD\nEducation\nBSc";
        let span = locate_section(text, EDU_HEADERS, EDU_TERMINATORS, 1000)
            .unwrap()
            .unwrap();
        // "education" is tried first even though it appears later.
        assert_eq!(span.slice(text).trim(), "BSc");
    }

    #[test]
    fn test_context_window_is_char_safe() {
        let text = "ééé keyword ééé";
        let start = text.find("keyword").unwrap();
        let window = context_window(text, start, start + 7, 2);
        assert_eq!(window, "é keyword é");
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("short", 10), "short");
        assert_eq!(truncate_with_ellipsis("abcdefghij", 4), "abcd...");
    }
}
