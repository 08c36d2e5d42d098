use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::extraction::models::ProjectEntry;
use crate::extraction::sections::{synthetic_section, truncate_with_ellipsis, SectionLocator};

const HEADERS: &[&str] = &[
    "projects",
    r"personal\s+projects",
    "portfolio",
    r"project\s+experience",
    r"key\s+projects",
    r"recent\s+projects",
    r"selected\s+projects",
];

const TERMINATORS: &[&str] = &[
    r"(?:technical\s+)?skills",
    "education",
    r"(?:work\s+|professional\s+)?experience",
    "interests",
    "hobbies",
    "certifications",
    "references",
    "publications",
];

const MAX_SECTION_CHARS: usize = 1500;
const INDICATOR_WINDOW: usize = 100;
const MIN_ENTRY_CHARS: usize = 15;
const MAX_HEADER_LINE_CHARS: usize = 100;
const MAX_DERIVED_NAME_CHARS: usize = 60;

const PRESENT_NAME: &str = "Project details present in CV";
const LOOSE_KEYWORDS: &[&str] = &[
    "developed",
    "created",
    "built",
    "designed",
    "implemented",
    "github",
    "project",
];

static LOCATOR: Lazy<SectionLocator> = Lazy::new(|| {
    SectionLocator::new(HEADERS, TERMINATORS, MAX_SECTION_CHARS)
        .expect("valid projects section patterns")
});

static INDICATORS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(?:developed|created|built|designed|implemented|led|managed)\s+(?:a|an|the)?\s+(?:\w+\s+){0,3}(?:project|application|website|system|platform)",
        r"(?i)github\.com/[\w-]+/[\w-]+",
        r"(?i)project name\s*:",
        r"(?i)(?:key|notable|major|significant)\s+(?:project|achievement)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid project indicator"))
    .collect()
});

/// Blank lines, then bullets, then numbered items.
static SEPARATORS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"\n\s*\n", r"\n\s*[•●\-*]\s+", r"\n\s*\d+\.\s+"]
        .iter()
        .map(|p| Regex::new(p).expect("valid project separator"))
        .collect()
});

static NAME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"(?i)"([^"]+)""#,
        r"(?i)project:\s*(.+)",
        r"(?i)([A-Z][a-zA-Z0-9\s]+(?:System|Platform|Website|Application|Portal|Dashboard|Tool))",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid project name pattern"))
    .collect()
});

static TECH_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(?:technologies|tech stack|tools|languages)(?:\s+used)?(?:\s*:|\s+include|\s+including)\s+(.+)",
        r"(?i)\b(?:using|with|in)\s+([A-Za-z0-9,\s/+]*(?:React|Angular|Vue|Node\.js|Django|Rails|PHP|Python|Java|JavaScript))",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid technology pattern"))
    .collect()
});

static TECH_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,/&\s]+").expect("valid tech split"));

static SECTION_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Z][a-zA-Z0-9\s]{2,30}(?:System|Platform|Website|Application|Portal|Dashboard|Tool))")
        .expect("valid section name pattern")
});

/// Project entries from the projects section, or from windows around project
/// indicators when there is no section. Never empty.
pub fn extract_projects(text: &str) -> Vec<ProjectEntry> {
    let mut section = LOCATOR.section_text(text).to_string();
    if section.is_empty() {
        section = synthetic_section(text, &INDICATORS, INDICATOR_WINDOW, |_| true)
            .trim()
            .to_string();
    }

    if section.is_empty() {
        debug!("no projects section or indicators, checking keywords");
        let lowered = text.to_lowercase();
        return if LOOSE_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
            vec![ProjectEntry {
                name: PRESENT_NAME.to_string(),
                description: "See full CV for details".to_string(),
                technologies: vec![],
            }]
        } else {
            vec![ProjectEntry::not_found()]
        };
    }

    let projects: Vec<ProjectEntry> = split_entries(&section)
        .into_iter()
        .filter_map(parse_entry)
        .collect();
    if !projects.is_empty() {
        return projects;
    }
    debug!("projects section had no parseable entries, summarising it");

    let name = SECTION_NAME
        .captures(&section)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| PRESENT_NAME.to_string());
    vec![ProjectEntry {
        name,
        description: "See full CV for project details and implementations.".to_string(),
        technologies: vec![],
    }]
}

/// First separator that splits the section into several non-blank parts.
fn split_entries(section: &str) -> Vec<&str> {
    SEPARATORS
        .iter()
        .map(|re| re.split(section).collect::<Vec<_>>())
        .find(|parts| parts.len() > 1 && parts.iter().all(|p| !p.trim().is_empty()))
        .unwrap_or_else(|| vec![section])
}

fn parse_entry(raw: &str) -> Option<ProjectEntry> {
    // The first bullet of a list keeps its marker after splitting.
    let entry = raw.trim().trim_start_matches(['•', '●', '-', '*']).trim();
    if entry.chars().count() < MIN_ENTRY_CHARS {
        return None;
    }

    let mut lines = entry.split('\n');
    let first = lines.next().unwrap_or_default().trim();
    let name = if first.chars().count() < MAX_HEADER_LINE_CHARS && first.chars().any(char::is_uppercase)
    {
        first.to_string()
    } else {
        derived_name(first)
    };
    if name.chars().count() <= 2 {
        return None;
    }

    let description = lines
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    Some(ProjectEntry {
        name,
        description,
        technologies: technologies(entry),
    })
}

fn derived_name(line: &str) -> String {
    NAME_PATTERNS
        .iter()
        .find_map(|re| re.captures(line))
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_else(|| truncate_with_ellipsis(line, MAX_DERIVED_NAME_CHARS))
}

fn technologies(entry: &str) -> Vec<String> {
    TECH_PATTERNS
        .iter()
        .find_map(|re| re.captures(entry))
        .map(|caps| {
            TECH_SPLIT
                .split(&caps[1])
                .map(str::trim)
                .filter(|tech| tech.chars().count() > 1)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line_separated_projects() {
        let text = "Projects\nInventory System\nTracks stock levels using Python, Django\n\nWeather Dashboard\nBuilt with React\n\nSkills\nPython";
        let projects = extract_projects(text);
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].name, "Inventory System");
        assert_eq!(projects[0].description, "Tracks stock levels using Python, Django");
        assert_eq!(projects[0].technologies, vec!["Python", "Django"]);
        assert_eq!(projects[1].name, "Weather Dashboard");
        assert_eq!(projects[1].technologies, vec!["React"]);
    }

    #[test]
    fn test_bulleted_projects() {
        let text = "Projects:\n- Chat App using Node.js\n- Portfolio Website with Vue\nEducation\nBSc";
        let projects = extract_projects(text);
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].name, "Chat App using Node.js");
        assert_eq!(projects[0].technologies, vec!["Node.js"]);
        assert_eq!(projects[1].name, "Portfolio Website with Vue");
    }

    #[test]
    fn test_technology_label() {
        let entry = "Ledger Tool\nTech stack: Rust, Postgres & Redis";
        let project = parse_entry(entry).unwrap();
        assert_eq!(project.technologies, vec!["Rust", "Postgres", "Redis"]);
    }

    #[test]
    fn test_indicator_windows_without_section() {
        let text = "developed a booking platform for hotels, see github.com/jane/booker";
        let projects = extract_projects(text);
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "developed a booking platform");
    }

    #[test]
    fn test_quoted_name_for_long_first_line() {
        let line = format!("built the \"Pathfinder\" route planner {}", "x".repeat(100));
        assert_eq!(derived_name(&line), "Pathfinder");
    }

    #[test]
    fn test_short_section_degrades() {
        let projects = extract_projects("Projects\nShort one\n\nEducation\nBA");
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, PRESENT_NAME);
        assert_eq!(
            projects[0].description,
            "See full CV for project details and implementations."
        );
    }

    #[test]
    fn test_keyword_only_and_not_found() {
        let projects = extract_projects("I built things");
        assert_eq!(projects[0].name, PRESENT_NAME);
        assert_eq!(projects[0].description, "See full CV for details");

        assert_eq!(
            extract_projects("Jane Doe, accountant"),
            vec![ProjectEntry::not_found()]
        );
    }
}
