use once_cell::sync::Lazy;
use regex::Regex;

use crate::extraction::models::INTERESTS_PLACEHOLDER;

const HEADINGS: &[&str] = &["interests", "hobbies", "activities", "personal interests"];
const SECTION_ENDS: &[&str] = &["skills", "education", "experience", "projects", "references"];
const COMMON_HOBBIES: &[&str] = &[
    "reading",
    "travel",
    "photography",
    "coding",
    "programming",
    "hiking",
    "music",
    "sports",
    "cooking",
    "writing",
    "gaming",
];
const MIN_ITEM_CHARS: usize = 4;

fn literal(word: &str) -> Regex {
    Regex::new(&format!("(?i){}", regex::escape(word))).expect("escaped literal is a valid pattern")
}

static HEADING_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| HEADINGS.iter().map(|h| literal(h)).collect());

static END_PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| SECTION_ENDS.iter().map(|e| literal(e)).collect());

static HOBBY_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    COMMON_HOBBIES
        .iter()
        .map(|h| {
            let re = Regex::new(&format!(r"(?i)\b{h}\b")).expect("valid hobby pattern");
            (*h, re)
        })
        .collect()
});

static ITEM_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,•\n]").expect("valid interest separator"));

/// Items listed after an interests-like heading, else well-known hobby words
/// found anywhere, else the placeholder. Section items keep their original case.
pub fn extract_interests(text: &str) -> Vec<String> {
    if let Some(section) = interests_section(text) {
        let items: Vec<String> = ITEM_SEPARATORS
            .split(section)
            .map(str::trim)
            .filter(|item| item.chars().count() >= MIN_ITEM_CHARS)
            .map(String::from)
            .collect();
        if !items.is_empty() {
            return items;
        }
    }

    let hobbies: Vec<String> = HOBBY_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(hobby, _)| hobby.to_string())
        .collect();
    if !hobbies.is_empty() {
        return hobbies;
    }

    vec![INTERESTS_PLACEHOLDER.to_string()]
}

/// Text after the first heading that occurs anywhere, cut at each later section
/// word in turn. Headings are not required to start a line.
fn interests_section(text: &str) -> Option<&str> {
    let heading = HEADING_PATTERNS.iter().find_map(|re| re.find(text))?;
    let mut section = &text[heading.end()..];
    for end in END_PATTERNS.iter() {
        if let Some(m) = end.find(section) {
            section = &section[..m.start()];
        }
    }
    let section = section.trim().trim_start_matches(':').trim();
    (!section.is_empty()).then_some(section)
}
