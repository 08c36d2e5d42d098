use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const NAME_NOT_DETECTED: &str = "Name not detected";
pub const EMAIL_NOT_DETECTED: &str = "Email not detected";
pub const PHONE_NOT_DETECTED: &str = "Phone not detected";
pub const SKILLS_PLACEHOLDER: &str = "Skills extraction requires full API";
pub const INTERESTS_PLACEHOLDER: &str = "Interests not specifically identified";

/// Structured profile produced for one parse call, either by the rule engine
/// or deserialised from the AI extractor's JSON.
///
/// Every field is always populated: absence of real data is carried by the
/// sentinel strings above or a single placeholder entry, never by an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedProfile {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub skills: Vec<String>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub work_experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub interests: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default, alias = "school", deserialize_with = "lenient_string")]
    pub institution: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub degree: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub field: String,
    #[serde(default, alias = "year", alias = "date", deserialize_with = "lenient_string")]
    pub years: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub company: String,
    #[serde(
        default,
        alias = "position",
        alias = "title",
        deserialize_with = "lenient_string"
    )]
    pub role: String,
    #[serde(
        default,
        alias = "duration",
        alias = "date",
        deserialize_with = "lenient_string"
    )]
    pub years: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, alias = "tech_stack", deserialize_with = "lenient_string_list")]
    pub technologies: Vec<String>,
}

impl ParsedProfile {
    /// Profile with every field at its "attempted, found nothing" value.
    pub fn undetected() -> Self {
        Self {
            name: NAME_NOT_DETECTED.to_string(),
            email: EMAIL_NOT_DETECTED.to_string(),
            phone: PHONE_NOT_DETECTED.to_string(),
            skills: vec![SKILLS_PLACEHOLDER.to_string()],
            education: vec![EducationEntry::unidentified()],
            work_experience: vec![ExperienceEntry::unidentified()],
            projects: vec![ProjectEntry::not_found()],
            interests: vec![INTERESTS_PLACEHOLDER.to_string()],
        }
    }
}

impl EducationEntry {
    pub fn unidentified() -> Self {
        Self {
            institution: "Education section not clearly identified".to_string(),
            degree: "See full CV for details".to_string(),
            ..Self::default()
        }
    }
}

impl ExperienceEntry {
    pub fn unidentified() -> Self {
        Self {
            company: "Experience section not clearly identified".to_string(),
            role: "See full CV for details".to_string(),
            ..Self::default()
        }
    }
}

impl ProjectEntry {
    pub fn not_found() -> Self {
        Self {
            name: "No project information found".to_string(),
            description: "Consider adding projects to showcase your practical experience."
                .to_string(),
            technologies: vec![],
        }
    }
}

// Model output is loosely typed: years arrive as numbers, descriptions as
// arrays of bullet strings, missing values as null.
fn value_to_string(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Array(items) => items
            .into_iter()
            .map(value_to_string)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(Value::deserialize(deserializer)?))
}

fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let list = match Value::deserialize(deserializer)? {
        Value::Null => vec![],
        Value::Array(items) => items
            .into_iter()
            .map(value_to_string)
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        other => vec![other.to_string()],
    };
    Ok(list)
}
