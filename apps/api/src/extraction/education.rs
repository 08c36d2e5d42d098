use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::extraction::models::EducationEntry;
use crate::extraction::sections::{synthetic_section, truncate_with_ellipsis, SectionLocator};

const HEADERS: &[&str] = &[
    "education",
    r"academic\s+background",
    r"academic\s+qualifications",
    "qualifications",
    r"educational\s+history",
];

const TERMINATORS: &[&str] = &[
    r"(?:work\s+|professional\s+)?experience",
    r"employment\s+history",
    r"work\s+history",
    r"(?:technical\s+)?skills",
    "projects",
    "achievements",
    "interests",
    "certifications",
    "publications",
];

const MAX_SECTION_CHARS: usize = 1000;
const KEYWORD_WINDOW: usize = 50;
const MIN_ITEM_CHARS: usize = 10;

const KEYWORDS: &[&str] = &[
    "bachelor", "master", "phd", "doctorate", "bs", "ba", "ms", "ma", "mba", "degree",
    "university", "college", "institute", "school", "graduated",
];

const INSTITUTION_KEYWORDS: &[&str] = &["university", "college", "institute", "school", "academy"];

const LOOSE_LINE_KEYWORDS: &[&str] = &["degree", "university", "college", "graduated", "education"];

/// Longer alternatives precede their prefixes so `bachelor's` is not cut at `ba`.
const DEGREES: &str = r"bachelor(?:'s|s)?|master(?:'s|s)?|ph\.?d|doctorate|undergraduate|postgraduate|graduate|b\.tech|m\.tech|m\.b\.a|b\.s|b\.a|m\.s|m\.a|mba|bs|ba|ms|ma";

static LOCATOR: Lazy<SectionLocator> = Lazy::new(|| {
    SectionLocator::new(HEADERS, TERMINATORS, MAX_SECTION_CHARS)
        .expect("valid education section patterns")
});

static KEYWORD_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    KEYWORDS
        .iter()
        .map(|kw| Regex::new(&format!(r"(?i)\b{kw}\b")).expect("valid education keyword"))
        .collect()
});

static ITEM_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\n•]+").expect("valid item split"));

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("valid year"));

static DEGREE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{DEGREES})\b[^,.\n]{{0,30}}")).expect("valid degree pattern")
});

static FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:{DEGREES})\b[^,.\n]{{0,30}}\s+(?:in|of)\s+([^,.\n]{{3,40}})"
    ))
    .expect("valid field pattern")
});

static INSTITUTION_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    INSTITUTION_KEYWORDS
        .iter()
        .map(|kw| {
            let re = Regex::new(&format!(r"(?i)[^,.\n]{{0,40}}{kw}[^,.\n]{{0,40}}"))
                .expect("valid institution pattern");
            (*kw, re)
        })
        .collect()
});

static PART_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,|]").expect("valid part split"));

/// Education entries from the located section, or from keyword context windows
/// when no section header exists. Never empty.
pub fn extract_education(text: &str) -> Vec<EducationEntry> {
    let mut section = LOCATOR.section_text(text).to_string();
    if section.is_empty() {
        section = synthetic_section(text, &KEYWORD_PATTERNS, KEYWORD_WINDOW, |_| true);
    }

    let entries: Vec<EducationEntry> = ITEM_SPLIT
        .split(&section)
        .filter(|item| item.trim().chars().count() >= MIN_ITEM_CHARS)
        .filter_map(parse_item)
        .collect();
    if !entries.is_empty() {
        return entries;
    }

    debug!("no structured education entries, trying loose mention");
    loose_mention(text).unwrap_or_else(|| vec![EducationEntry::unidentified()])
}

fn parse_item(item: &str) -> Option<EducationEntry> {
    let mut entry = EducationEntry::default();

    let years: Vec<&str> = YEAR.find_iter(item).map(|m| m.as_str()).collect();
    entry.years = match years.as_slice() {
        [] => String::new(),
        [only] => only.to_string(),
        [first, second, ..] => format!("{first} - {second}"),
    };

    if let Some(degree) = DEGREE.find(item) {
        entry.degree = degree.as_str().trim().to_string();
        if let Some(caps) = FIELD.captures(item) {
            entry.field = caps[1].trim().to_string();
        }
    }

    let lowered = item.to_lowercase();
    entry.institution = INSTITUTION_PATTERNS
        .iter()
        .filter(|(kw, _)| lowered.contains(kw))
        .find_map(|(_, re)| re.find(item))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    // "BS Computer Science, MIT, 2018": a bare capitalised part next to a degree.
    if entry.institution.is_empty() && !entry.degree.is_empty() {
        entry.institution = bare_institution(item).unwrap_or_default();
    }

    if entry.institution.is_empty() && entry.degree.is_empty() {
        return None;
    }
    if !entry.degree.is_empty() && entry.field.is_empty() {
        entry.field = "Not specified".to_string();
    }
    Some(entry)
}

fn bare_institution(item: &str) -> Option<String> {
    PART_SPLIT
        .split(item)
        .map(str::trim)
        .find(|part| {
            part.chars().count() >= 2
                && part.chars().next().is_some_and(char::is_uppercase)
                && !DEGREE.is_match(part)
                && !YEAR.is_match(part)
        })
        .map(String::from)
}

fn loose_mention(text: &str) -> Option<Vec<EducationEntry>> {
    let line = text.split('\n').find(|line| {
        let lowered = line.to_lowercase();
        LOOSE_LINE_KEYWORDS.iter().any(|kw| lowered.contains(kw))
    })?;
    Some(vec![EducationEntry {
        institution: truncate_with_ellipsis(line, 50),
        degree: "Education information found, see CV for details".to_string(),
        ..EducationEntry::default()
    }])
}
