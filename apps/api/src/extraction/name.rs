//! Name extraction: an ordered cascade of strategies, first success wins.
//!
//! 1. label       : "Name:" / "Full name:" / "Candidate:" in the first 30 lines
//! 2. heuristic   : quality score over the first 7 lines, first line scoring ≥ 5
//! 3. personal    : name inside a "Personal/Contact Information" block
//! 4. pattern     : capitalised name shapes in the first 15 lines
//! 5. last_resort : first plausible line among the first 5

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::extraction::models::NAME_NOT_DETECTED;

type NameStrategy = fn(&[&str]) -> Option<String>;

const STRATEGIES: &[(&str, NameStrategy)] = &[
    ("label", from_label),
    ("heuristic", from_heuristic_score),
    ("personal", from_personal_info_block),
    ("pattern", from_name_shapes),
    ("last_resort", from_first_plausible_line),
];

const HEURISTIC_THRESHOLD: i32 = 5;

/// Exact-match (lowercased) headings that are never a person's name.
const EXCLUDED_EXACT: &[&str] = &[
    "about me",
    "profile",
    "personal profile",
    "curriculum vitae",
    "resume",
    "professional profile",
    "personal information",
    "contact information",
    "personal details",
    "professional summary",
    "career summary",
    "career objective",
    "professional experience",
    "education",
    "skills",
    "experience",
    "summary",
    "objective",
    "professional objective",
    "contact details",
    "personal statement",
    "professional background",
    "career profile",
    "about",
    "bio",
    "biography",
    "qualification profile",
];

static EXCLUDE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^(?:RESUME|CURRICULUM\s+VITAE|CV)$",
        r"(?i)^(?:ABOUT\s+ME|ABOUT|PROFILE|BIO|BIOGRAPHY|SUMMARY|PERSONAL\s+PROFILE)$",
        r"(?i)^(?:PERSONAL\s+INFORMATION|CONTACT|CONTACT\s+INFORMATION|OBJECTIVE|CAREER\s+OBJECTIVE)$",
        r"(?i)^(?:PROFESSIONAL\s+SUMMARY|CAREER\s+SUMMARY|EXPERIENCE\s+SUMMARY)$",
        r"@",
        r"^\+?\d",
        r"(?i)^http",
        r"(?i)^www\.",
        // All-caps banner lines; case-sensitive on purpose.
        r"^[A-Z\s]{7,}$",
        r"(?i)\b(?:docx|pdf|doc)\b",
        r"(?i)\b(?:Page|Home|Contact|Resume|CV)\b",
        r"(?i)\b(?:LinkedIn|GitHub|Twitter|Facebook|Instagram)\b",
        r"^[^a-zA-Z]*$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid name exclusion pattern"))
    .collect()
});

static LABEL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(?:name|full name)[:\s-]+([^,\n]{2,40})",
        r"(?i)(?:candidate|applicant)[:\s-]+([^,\n]{2,40})",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid name label pattern"))
    .collect()
});

static PERSONAL_INFO_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)personal\s+information|contact\s+information|personal\s+details")
        .expect("valid personal info pattern")
});

static NON_NAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z\s.'-]").expect("valid non-name pattern"));

/// First Last [Middle…], First M. Last, Title + Name.
static NAME_SHAPES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,3})\b",
        r"\b([A-Z][a-z]+\s+[A-Z]\.\s+[A-Z][a-z]+)\b",
        r"\b((?:Mr\.|Ms\.|Mrs\.|Dr\.|Prof\.)\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+){0,3})\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid name shape pattern"))
    .collect()
});

pub fn extract_name(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return NAME_NOT_DETECTED.to_string();
    }
    let lines: Vec<&str> = trimmed.split('\n').collect();

    for (tier, strategy) in STRATEGIES {
        if let Some(name) = strategy(&lines) {
            debug!(tier, "name resolved");
            return name;
        }
    }
    NAME_NOT_DETECTED.to_string()
}

fn is_denylisted(candidate: &str) -> bool {
    EXCLUDED_EXACT.contains(&candidate.to_lowercase().as_str())
}

fn is_excluded(candidate: &str) -> bool {
    EXCLUDE_PATTERNS.iter().any(|re| re.is_match(candidate)) || is_denylisted(candidate)
}

fn starts_uppercase(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

/// Has at least one cased character and no lowercase ones.
fn is_all_uppercase(s: &str) -> bool {
    let mut cased = false;
    for c in s.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

fn from_label(lines: &[&str]) -> Option<String> {
    for re in LABEL_PATTERNS.iter() {
        for line in lines.iter().take(30) {
            let Some(caps) = re.captures(line) else {
                continue;
            };
            let candidate = caps[1].trim();
            if candidate.chars().count() <= 3 || is_excluded(candidate) {
                continue;
            }
            let words: Vec<&str> = candidate.split_whitespace().collect();
            if (1..=5).contains(&words.len()) && words.iter().any(|w| starts_uppercase(w)) {
                return Some(candidate.to_string());
            }
        }
    }
    None
}

/// Integer quality score of `line` as a name, `index` being its line number.
pub(crate) fn name_quality_score(line: &str, index: usize) -> i32 {
    let words: Vec<&str> = line.split_whitespace().collect();
    let len = line.chars().count();
    let mut score = 0;

    score += match words.len() {
        2..=4 => 3,
        1 if (4..=20).contains(&len) => 1,
        _ => -2,
    };

    let capitalized = words.iter().filter(|w| starts_uppercase(w)).count();
    if capitalized == words.len() && words.len() >= 2 {
        score += 3;
    } else if capitalized >= 1 {
        score += 1;
    }

    if (10..=35).contains(&len) {
        score += 2;
    } else if len > 35 {
        score -= 2;
    }

    if NON_NAME_CHARS.is_match(line) {
        score -= 3;
    }

    if index < 5 {
        score += 5 - index as i32;
    }
    score
}

fn from_heuristic_score(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .take(7)
        .enumerate()
        .map(|(i, line)| (i, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !is_excluded(line))
        .find(|(i, line)| name_quality_score(line, *i) >= HEURISTIC_THRESHOLD)
        .map(|(_, line)| line.to_string())
}

fn from_personal_info_block(lines: &[&str]) -> Option<String> {
    let label = &LABEL_PATTERNS[0];
    for (i, line) in lines.iter().enumerate() {
        if !PERSONAL_INFO_HEADER.is_match(line) {
            continue;
        }
        for candidate_line in lines.iter().skip(i + 1).take(7) {
            if let Some(caps) = label.captures(candidate_line) {
                let candidate = caps[1].trim();
                if !candidate.is_empty() && !is_denylisted(candidate) {
                    return Some(candidate.to_string());
                }
            }

            let bare = candidate_line.trim();
            let words: Vec<&str> = bare.split_whitespace().collect();
            if (2..=4).contains(&words.len())
                && words
                    .iter()
                    .filter(|w| w.chars().count() > 1)
                    .all(|w| starts_uppercase(w))
                && bare.chars().count() <= 40
                && !is_denylisted(bare)
            {
                return Some(bare.to_string());
            }
        }
    }
    None
}

fn acceptable_shape_match(candidate: &str) -> bool {
    let len = candidate.chars().count();
    len > 4 && len <= 40 && !is_denylisted(candidate)
}

fn from_name_shapes(lines: &[&str]) -> Option<String> {
    for re in NAME_SHAPES.iter() {
        for (i, line) in lines.iter().take(15).enumerate() {
            if i == 0 {
                // The first line gets every match a chance, later lines only their first.
                let found = re
                    .captures_iter(line)
                    .map(|caps| caps[1].trim().to_string())
                    .find(|c| acceptable_shape_match(c));
                if found.is_some() {
                    return found;
                }
            } else if let Some(caps) = re.captures(line) {
                let candidate = caps[1].trim();
                if acceptable_shape_match(candidate) {
                    return Some(candidate.to_string());
                }
            }
        }
    }
    None
}

fn from_first_plausible_line(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .take(5)
        .map(|line| line.trim())
        .find(|line| {
            let len = line.chars().count();
            (4..=40).contains(&len)
                && !is_all_uppercase(line)
                && line.contains(' ')
                && !is_excluded(line)
                && line.split_whitespace().any(starts_uppercase)
        })
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_label_in_personal_block_is_skipped() {
        let lines = ["Personal Information", "Name:   ", "Priya Raman"];
        assert_eq!(
            from_personal_info_block(&lines),
            Some("Priya Raman".to_string())
        );
    }

    #[test]
    fn test_label_tier_beats_heuristic() {
        let text = "Title\nName: Jane A. Doe\nSoftware Engineer";
        assert_eq!(extract_name(text), "Jane A. Doe");
    }

    #[test]
    fn test_heuristic_top_line() {
        let text = "John Smith\njohn@example.com\n555-123-4567";
        assert_eq!(extract_name(text), "John Smith");
    }

    #[test]
    fn test_heuristic_skips_headers_and_contacts() {
        let text = "CURRICULUM VITAE\nabout me\njane@example.com\nMaria Garcia Lopez";
        assert_eq!(extract_name(text), "Maria Garcia Lopez");
    }

    #[test]
    fn test_quality_score_components() {
        // 2 words +3, all capitalised +3, 10 chars +2, index 0 bonus +5
        assert_eq!(name_quality_score("John Smith", 0), 13);
        // 1 word of length 4-20 +1, capitalised +1, short +0, no bonus at index 6
        assert_eq!(name_quality_score("Alexandra", 6), 2);
        // digits and punctuation cost 3
        assert_eq!(name_quality_score("Room 42, Floor 3", 6), 3 + 1 + 2 - 3);
    }

    #[test]
    fn test_short_circuit_returns_first_line_over_threshold() {
        // Both lines qualify; the earlier one is returned, not the higher scoring one.
        let text = "Sam Lee\nJonathan Edward Blackwood";
        assert_eq!(extract_name(text), "Sam Lee");
    }

    #[test]
    fn test_personal_information_block() {
        // Leading digits exclude the filler lines from the heuristic tier.
        let mut lines: Vec<String> = (0..8).map(|i| format!("{i}0% complete")).collect();
        lines.push("Personal Information".to_string());
        lines.push("Priya Raman".to_string());
        let text = lines.join("\n");
        assert_eq!(extract_name(&text), "Priya Raman");
    }

    #[test]
    fn test_title_shape_in_later_line() {
        let mut lines: Vec<String> = (0..7).map(|i| format!("{i}. (x) ##")).collect();
        lines.push("Referee: Dr. Helen Park, 2019".to_string());
        let text = lines.join("\n");
        assert_eq!(extract_name(&text), "Helen Park");
    }

    #[test]
    fn test_sentinel_for_empty_and_symbols() {
        assert_eq!(extract_name(""), NAME_NOT_DETECTED);
        assert_eq!(extract_name("   \n\t  "), NAME_NOT_DETECTED);
        assert_eq!(extract_name("### --- ***\n!!!"), NAME_NOT_DETECTED);
    }

    #[test]
    fn test_candidate_label() {
        assert_eq!(
            extract_name("JOHNATHAN SMITH\nCandidate: Lee Wong"),
            "Lee Wong"
        );
    }

    #[test]
    fn test_is_all_uppercase() {
        assert!(is_all_uppercase("ABC DEF"));
        assert!(!is_all_uppercase("Abc"));
        assert!(!is_all_uppercase("123"));
    }
}
