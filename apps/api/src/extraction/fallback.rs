use once_cell::sync::Lazy;
use tracing::debug;

use crate::extraction::contact::{extract_email, extract_phone};
use crate::extraction::education::extract_education;
use crate::extraction::experience::extract_experience;
use crate::extraction::interests::extract_interests;
use crate::extraction::models::ParsedProfile;
use crate::extraction::name::extract_name;
use crate::extraction::projects::extract_projects;
use crate::extraction::skills::SkillTable;

static DEFAULT_ENGINE: Lazy<FallbackEngine> = Lazy::new(|| {
    FallbackEngine::standard().expect("built-in extraction patterns compile")
});

/// Deterministic rule-based profile extractor.
///
/// Pure function of its input: no I/O, no shared mutable state, and every field
/// of the result is populated (with sentinels when nothing was found). Safe to
/// call from many threads at once.
#[derive(Debug, Clone)]
pub struct FallbackEngine {
    skills: SkillTable,
}

impl FallbackEngine {
    pub fn new(skills: SkillTable) -> Self {
        Self { skills }
    }

    pub fn standard() -> Result<Self, regex::Error> {
        Ok(Self::new(SkillTable::standard()?))
    }

    pub fn extract(&self, text: &str) -> ParsedProfile {
        let text = text.replace("\r\n", "\n");

        let profile = ParsedProfile {
            name: extract_name(&text),
            email: extract_email(&text),
            phone: extract_phone(&text),
            skills: self.skills.extract(&text),
            education: extract_education(&text),
            work_experience: extract_experience(&text),
            projects: extract_projects(&text),
            interests: extract_interests(&text),
        };
        debug!(
            chars = text.chars().count(),
            skills = profile.skills.len(),
            education = profile.education.len(),
            experience = profile.work_experience.len(),
            "fallback extraction finished"
        );
        profile
    }
}

/// Runs the built-in engine over `text`.
pub fn extract_fallback_profile(text: &str) -> ParsedProfile {
    DEFAULT_ENGINE.extract(text)
}
