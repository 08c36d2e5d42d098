//! Work-experience extraction.
//!
//! Entries are cut from the experience section at "job markers" (a date range,
//! a capitalised line, or a seniority/title word at line start). Each marker is
//! paired with the text up to the next marker and its header line is split into
//! role and company. When that yields nothing the extractor degrades through
//! coarser strategies, tried in order, down to a fixed placeholder.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::extraction::models::ExperienceEntry;
use crate::extraction::sections::{context_window, synthetic_section, SectionLocator};

const HEADERS: &[&str] = &[
    r"(?:work\s+)?experience",
    r"employment\s+history",
    r"work\s+history",
    r"professional\s+experience",
    r"work\s+experience",
    r"career\s+history",
];

const TERMINATORS: &[&str] = &[
    "education",
    r"(?:technical\s+)?skills",
    "projects",
    "achievements",
    "interests",
    "hobbies",
    "certifications",
    "references",
];

const MAX_SECTION_CHARS: usize = 2000;
const SYNTHETIC_MIN_TEXT_CHARS: usize = 100;
const TITLE_WINDOW: usize = 100;
const MENTION_WINDOW: usize = 50;
const MIN_ENTRY_CHARS: usize = 10;

const TITLE_KEYWORDS: &[&str] = &[
    "developer",
    "engineer",
    "manager",
    "director",
    "analyst",
    "designer",
    "coordinator",
    "specialist",
    "consultant",
    "associate",
    "assistant",
];

const COMPANY_INDICATORS: &[&str] = &[
    "inc",
    "llc",
    "ltd",
    "corporation",
    "corp",
    "group",
    "technologies",
];

type ExperienceStrategy = fn(&str, &str) -> Option<Vec<ExperienceEntry>>;

/// Each strategy receives the whole text and the (possibly empty) section.
const STRATEGIES: &[(&str, ExperienceStrategy)] = &[
    ("entries", from_job_entries),
    ("summary", from_titles_and_companies),
    ("mentions", from_mentions),
];

static LOCATOR: Lazy<SectionLocator> = Lazy::new(|| {
    SectionLocator::new(HEADERS, TERMINATORS, MAX_SECTION_CHARS)
        .expect("valid experience section patterns")
});

static TITLE_KEYWORD_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    TITLE_KEYWORDS
        .iter()
        .map(|kw| Regex::new(&format!(r"(?i)\b{kw}\b")).expect("valid title keyword"))
        .collect()
});

static ANY_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(19|20)\d{2}").expect("valid year"));

static JOB_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?:^|\n)\s*(?:19|20)\d{2}\s*[-–—]\s*(?:(?:19|20)\d{2}|present|current)",
        r"|(?:^|\n)\s*[A-Z][a-zA-Z\s]+(?:Inc\.|LLC|Ltd\.)?(?:\s*[-|,]\s*)?",
        r"|(?:^|\n)\s*(?:Senior|Junior|Lead|Chief|Director|Manager|Engineer|Developer|Designer|Consultant)",
    ))
    .expect("valid job marker pattern")
});

static YEAR_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)((?:19|20)\d{2})\s*[-–—]\s*((?:19|20)\d{2}|present|current)")
        .expect("valid year range pattern")
});

/// `(pattern, role_group, company_group)` in priority order.
static SEPARATOR_SHAPES: Lazy<Vec<(Regex, usize, usize)>> = Lazy::new(|| {
    [
        (r"(.+?)\s+at\s+(.+)", 1, 2),
        (r"(.+?)\s+for\s+(.+)", 1, 2),
        (r"(.+?)\s*[-–|]\s*(.+)", 2, 1),
        (r"(.+?),\s*(.+)", 1, 2),
    ]
    .into_iter()
    .map(|(p, role, company)| (Regex::new(p).expect("valid separator shape"), role, company))
    .collect()
});

static TITLES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:senior|junior|lead)?\s*(?:developer|engineer|manager|director|analyst|designer|coordinator|specialist|consultant)")
        .expect("valid title pattern")
});

static COMPANIES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:[A-Z][a-zA-Z]+\s*)+(?:Inc\.|LLC|Ltd\.|\bInc\b|\bLLC\b|\bLtd\b)")
        .expect("valid company pattern")
});

static MENTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(?:developer|engineer|manager|director|analyst|designer|coordinator|specialist|consultant)",
        r"(?i)(?:19|20)\d{2}\s*[-–—]\s*(?:(?:19|20)\d{2}|present|current)",
        r"(?i)(?:worked|work|position|role)\s+(?:at|for|with)\s+([A-Z][a-zA-Z\s]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid mention pattern"))
    .collect()
});

/// Work-experience entries, best strategy first. Never empty.
pub fn extract_experience(text: &str) -> Vec<ExperienceEntry> {
    let mut section = LOCATOR.section_text(text).to_string();
    if section.is_empty() && text.chars().count() > SYNTHETIC_MIN_TEXT_CHARS {
        section = synthetic_section(text, &TITLE_KEYWORD_PATTERNS, TITLE_WINDOW, |window| {
            ANY_YEAR.is_match(window)
        });
    }

    for (strategy, run) in STRATEGIES {
        if let Some(entries) = run(text, &section) {
            debug!(strategy, entries = entries.len(), "experience resolved");
            return entries;
        }
    }
    vec![ExperienceEntry::unidentified()]
}

fn from_job_entries(_text: &str, section: &str) -> Option<Vec<ExperienceEntry>> {
    let markers: Vec<_> = JOB_MARKER.find_iter(section).collect();
    let entries: Vec<ExperienceEntry> = markers
        .iter()
        .enumerate()
        .filter_map(|(i, marker)| {
            let end = markers.get(i + 1).map_or(section.len(), |next| next.start());
            let body = &section[marker.end()..end];
            if body.trim().chars().count() < MIN_ENTRY_CHARS {
                return None;
            }
            parse_job(marker.as_str(), body)
        })
        .collect();
    (!entries.is_empty()).then_some(entries)
}

fn parse_job(marker: &str, body: &str) -> Option<ExperienceEntry> {
    let combined = format!("{} {}", marker.trim_start(), body);
    let mut entry = ExperienceEntry {
        years: YEAR_RANGE
            .find(&combined)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default(),
        ..ExperienceEntry::default()
    };

    let mut lines = combined.split('\n');
    let first_line = lines.next().unwrap_or_default();
    let header = YEAR_RANGE.replace_all(first_line, "");
    let header = header
        .trim()
        .trim_end_matches(|c: char| c.is_whitespace() || ",;|-–—".contains(c));

    let (role, company) = split_header(header);
    entry.role = role;
    entry.company = company;
    entry.description = lines
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    (!entry.role.is_empty() || !entry.company.is_empty()).then_some(entry)
}

/// `(role, company)` from a header line such as "Engineer at Acme" or "Acme - Engineer".
fn split_header(header: &str) -> (String, String) {
    for (shape, role, company) in SEPARATOR_SHAPES.iter() {
        if let Some(caps) = shape.captures(header) {
            return (
                caps[*role].trim().to_string(),
                caps[*company].trim().to_string(),
            );
        }
    }

    if header.split_whitespace().count() < 2 {
        return (String::new(), String::new());
    }
    let lowered = header.to_lowercase();
    if COMPANY_INDICATORS.iter().any(|ind| lowered.contains(ind)) {
        (String::new(), header.to_string())
    } else {
        (header.to_string(), String::new())
    }
}

fn from_titles_and_companies(_text: &str, section: &str) -> Option<Vec<ExperienceEntry>> {
    if section.is_empty() {
        return None;
    }
    let title = TITLES.find(section).map(|m| m.as_str().trim().to_string());
    let company = COMPANIES.find(section).map(|m| m.as_str().trim().to_string());
    if title.is_none() && company.is_none() {
        return None;
    }
    Some(vec![ExperienceEntry {
        role: title.unwrap_or_else(|| "Position details in CV".to_string()),
        company: company.unwrap_or_else(|| "Company details in CV".to_string()),
        description: "See full CV for detailed work experience description.".to_string(),
        ..ExperienceEntry::default()
    }])
}

fn from_mentions(text: &str, _section: &str) -> Option<Vec<ExperienceEntry>> {
    let context = MENTION_PATTERNS
        .iter()
        .find_map(|re| re.find(text))
        .map(|m| context_window(text, m.start(), m.end(), MENTION_WINDOW))?;
    Some(vec![ExperienceEntry {
        company: "Work experience details present in CV".to_string(),
        role: "See full CV for specific roles and companies".to_string(),
        description: format!("{context}..."),
        ..ExperienceEntry::default()
    }])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_at_company_with_range() {
        let text = "Experience\nSoftware Engineer at Acme Corp, 2018 - 2022\nBuilt internal tools.\n\nSkills\nPython";
        let entries = extract_experience(text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].role, "Software Engineer");
        assert_eq!(entries[0].company, "Acme Corp");
        assert_eq!(entries[0].years, "2018 - 2022");
    }

    #[test]
    fn test_company_dash_role() {
        let text = "Work Experience:\nGlobex Ltd - Data Analyst, 2016 - 2019\nEducation\nBA";
        let entries = extract_experience(text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].role, "Data Analyst");
        assert_eq!(entries[0].company, "Globex Ltd");
        assert_eq!(entries[0].years, "2016 - 2019");
    }

    #[test]
    fn test_open_ended_range() {
        let text = "Professional Experience\nLead Engineer at Hooli, 2020 - Present\nEducation";
        let entries = extract_experience(text);
        assert_eq!(entries[0].role, "Lead Engineer");
        assert_eq!(entries[0].company, "Hooli");
        assert_eq!(entries[0].years, "2020 - Present");
    }

    #[test]
    fn test_split_header_shapes() {
        assert_eq!(
            split_header("Consultant for Umbrella"),
            ("Consultant".to_string(), "Umbrella".to_string())
        );
        assert_eq!(
            split_header("Designer, Wayne Enterprises"),
            ("Designer".to_string(), "Wayne Enterprises".to_string())
        );
        assert_eq!(
            split_header("Stark Technologies"),
            (String::new(), "Stark Technologies".to_string())
        );
        assert_eq!(
            split_header("Backend Developer"),
            ("Backend Developer".to_string(), String::new())
        );
        assert_eq!(split_header("Freelance"), (String::new(), String::new()));
    }

    #[test]
    fn test_title_summary_when_entries_unparseable() {
        let text = "Experience\nsenior developer\n";
        let entries = extract_experience(text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].role, "senior developer");
        assert_eq!(entries[0].company, "Company details in CV");
    }

    #[test]
    fn test_mentions_without_section() {
        let text = "Worked at Initech as a consultant.";
        let entries = extract_experience(text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].company, "Work experience details present in CV");
        assert_eq!(entries[0].description, format!("{text}..."));
    }

    #[test]
    fn test_unidentified() {
        assert_eq!(
            extract_experience("hello world"),
            vec![ExperienceEntry::unidentified()]
        );
        assert_eq!(extract_experience(""), vec![ExperienceEntry::unidentified()]);
    }
}
