use once_cell::sync::Lazy;
use regex::Regex;

use crate::extraction::models::SKILLS_PLACEHOLDER;

/// Primary skill patterns, in discovery order. Each fragment is matched
/// case-insensitively as a whole word.
pub const TECHNICAL_SKILLS: &[(&str, &str)] = &[
    // Languages
    ("python", "Python"),
    ("javascript", "JavaScript"),
    ("typescript", "TypeScript"),
    ("java", "Java"),
    (r"c\+\+", "C++"),
    ("c#", "C#"),
    ("php", "PHP"),
    ("ruby", "Ruby"),
    ("swift", "Swift"),
    ("kotlin", "Kotlin"),
    (r"go(lang)?\b", "Go"),
    ("rust", "Rust"),
    ("scala", "Scala"),
    ("perl", "Perl"),
    (r"r\b", "R"),
    ("objective(-)?c", "Objective-C"),
    ("assembly", "Assembly"),
    ("shell scripting", "Shell Scripting"),
    ("bash", "Bash"),
    ("powershell", "PowerShell"),
    ("dart", "Dart"),
    ("haskell", "Haskell"),
    ("lua", "Lua"),
    // Frontend
    ("html", "HTML"),
    ("css", "CSS"),
    ("sass", "Sass"),
    ("less", "Less"),
    ("bootstrap", "Bootstrap"),
    ("tailwind", "Tailwind CSS"),
    ("material(-)?ui", "Material UI"),
    ("react", "React"),
    (r"vue(\.js)?", "Vue.js"),
    ("angular", "Angular"),
    ("jquery", "jQuery"),
    ("redux", "Redux"),
    ("svelte", "Svelte"),
    ("webpack", "Webpack"),
    ("responsive design", "Responsive Design"),
    ("webassembly", "WebAssembly"),
    // Backend
    (r"node(\.js)?", "Node.js"),
    (r"express(\.js)?", "Express.js"),
    ("django", "Django"),
    ("flask", "Flask"),
    ("fastapi", "FastAPI"),
    ("spring", "Spring"),
    ("spring boot", "Spring Boot"),
    ("laravel", "Laravel"),
    (r"asp\.net", "ASP.NET"),
    ("ruby on rails", "Ruby on Rails"),
    ("graphql", "GraphQL"),
    ("rest", "REST APIs"),
    ("api", "API Development"),
    // Databases
    ("sql", "SQL"),
    ("mysql", "MySQL"),
    ("postgresql", "PostgreSQL"),
    ("mongodb", "MongoDB"),
    ("firebase", "Firebase"),
    ("redis", "Redis"),
    ("nosql", "NoSQL"),
    ("oracle", "Oracle"),
    ("sqlite", "SQLite"),
    ("cassandra", "Cassandra"),
    ("elasticsearch", "Elasticsearch"),
    // DevOps and cloud
    ("aws", "AWS"),
    ("azure", "Azure"),
    ("google cloud", "Google Cloud"),
    ("docker", "Docker"),
    ("kubernetes", "Kubernetes"),
    ("jenkins", "Jenkins"),
    ("ci/cd", "CI/CD"),
    ("terraform", "Terraform"),
    ("ansible", "Ansible"),
    ("vagrant", "Vagrant"),
    ("serverless", "Serverless"),
    // Version control
    ("git", "Git"),
    ("github", "GitHub"),
    ("gitlab", "GitLab"),
    ("bitbucket", "Bitbucket"),
    // Testing
    ("unit testing", "Unit Testing"),
    ("integration testing", "Integration Testing"),
    ("jest", "Jest"),
    ("mocha", "Mocha"),
    ("selenium", "Selenium"),
    ("cypress", "Cypress"),
    ("junit", "JUnit"),
    ("pytest", "PyTest"),
    // Mobile
    ("android", "Android"),
    ("ios", "iOS"),
    ("react native", "React Native"),
    ("flutter", "Flutter"),
    ("xamarin", "Xamarin"),
    ("ionic", "Ionic"),
    ("cordova", "Cordova"),
    // Data and ML
    ("machine learning", "Machine Learning"),
    ("deep learning", "Deep Learning"),
    ("nlp", "Natural Language Processing"),
    ("computer vision", "Computer Vision"),
    ("data analysis", "Data Analysis"),
    ("tensorflow", "TensorFlow"),
    ("pytorch", "PyTorch"),
    ("scikit(-)?learn", "scikit-learn"),
    ("pandas", "Pandas"),
    ("numpy", "NumPy"),
    ("tableau", "Tableau"),
    ("power bi", "Power BI"),
    // Methodologies
    ("agile", "Agile"),
    ("scrum", "Scrum"),
    ("kanban", "Kanban"),
    ("waterfall", "Waterfall"),
    ("jira", "Jira"),
    ("trello", "Trello"),
    ("asana", "Asana"),
];

pub const SOFT_SKILLS: &[(&str, &str)] = &[
    ("communication", "Communication"),
    ("teamwork", "Teamwork"),
    ("leadership", "Leadership"),
    ("problem solving", "Problem Solving"),
    ("critical thinking", "Critical Thinking"),
    ("time management", "Time Management"),
    ("adaptability", "Adaptability"),
    ("creativity", "Creativity"),
    ("conflict resolution", "Conflict Resolution"),
    ("emotional intelligence", "Emotional Intelligence"),
];

/// Multi-word and variant patterns, checked against the whole document after
/// the primary table. Used verbatim apart from the case-insensitive flag.
pub const COMPOUND_SKILLS: &[(&str, &str)] = &[
    (r"\bui/ux\b|\buser\s+interface\b|\buser\s+experience\b", "UI/UX Design"),
    (r"\bresponsive\s+design\b|\bmobile\s+first\b", "Responsive Design"),
    (r"\bcloud\s+computing\b|\bcloud\s+architecture\b", "Cloud Computing"),
    (r"\brestful\s+api|\brest\s+api\b|\bapi\s+development\b", "RESTful APIs"),
    (r"\bmicro[-\s]?services\b", "Microservices"),
    (r"\bagile\s+development\b|\bagile\s+methodology\b", "Agile Development"),
    (r"\bdevops\b", "DevOps"),
    (r"\bci/cd\b|\bcontinuous\s+integration\b|\bcontinuous\s+deployment\b", "CI/CD"),
    (r"\btdd\b|\btest[-\s]driven\s+development\b", "Test-Driven Development"),
    (r"\bsecurity\b|\bcyber[-\s]?security\b|\bapplication\s+security\b", "Security"),
    (r"\bdatabase\s+design\b|\bdatabase\s+management\b", "Database Design"),
    (r"\bdata\s+modeling\b|\bentity\s+relationship\b", "Data Modeling"),
    (r"\bbig\s+data\b", "Big Data"),
    (r"\bdata\s+warehousing\b|\bdata\s+lake\b", "Data Warehousing"),
    (r"\bsoftware\s+architecture\b|\bsystem\s+design\b", "Software Architecture"),
    (r"\bobject[-\s]?oriented\s+programming\b|\boop\b", "Object-Oriented Programming"),
    (r"\bfunctional\s+programming\b", "Functional Programming"),
    (r"\bsystem\s+administration\b|\bsysadmin\b", "System Administration"),
    (r"\bnetworking\b|\bnetwork\s+security\b", "Networking"),
];

const SECTION_HEADERS: &[&str] = &[
    "skills",
    "technical skills",
    "competencies",
    "expertise",
    "proficiencies",
];

static SECTION_HEADER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    SECTION_HEADERS
        .iter()
        .map(|h| {
            Regex::new(&format!(r"(?i)(?:^|\n)[ \t]*\b{h}\b\s*:?")).expect("valid skills header")
        })
        .collect()
});

/// A `Label:` line ends the skills section.
static LABEL_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\w+[ \t]*:").expect("valid label line pattern"));

static ITEM_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,•\n|]").expect("valid item separator pattern"));

static STANDARD_SKILLS: Lazy<SkillTable> = Lazy::new(|| {
    SkillTable::standard().expect("built-in skill patterns compile")
});

#[derive(Debug, Clone)]
pub struct SkillPattern {
    pub pattern: Regex,
    pub name: &'static str,
}

/// Ordered pattern → canonical-name mapping, compiled once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct SkillTable {
    primary: Vec<SkillPattern>,
    compound: Vec<SkillPattern>,
}

impl SkillTable {
    pub fn new(
        primary: &[(&str, &'static str)],
        compound: &[(&str, &'static str)],
    ) -> Result<Self, regex::Error> {
        let primary = primary
            .iter()
            .map(|&(fragment, name)| {
                Ok(SkillPattern {
                    pattern: Regex::new(&whole_word(fragment))?,
                    name,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        let compound = compound
            .iter()
            .map(|&(pattern, name)| {
                Ok(SkillPattern {
                    pattern: Regex::new(&format!("(?i){pattern}"))?,
                    name,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { primary, compound })
    }

    /// Technical and soft skills followed by the compound variants.
    pub fn standard() -> Result<Self, regex::Error> {
        let primary: Vec<(&str, &'static str)> = TECHNICAL_SKILLS
            .iter()
            .chain(SOFT_SKILLS)
            .copied()
            .collect();
        Self::new(&primary, COMPOUND_SKILLS)
    }

    /// Canonical skill names in discovery order: the skills section first, then
    /// the whole document, then compound variants. Never empty.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let mut found: Vec<&'static str> = Vec::new();
        let mut record = |name: &'static str| {
            if !found.contains(&name) {
                found.push(name);
            }
        };

        if let Some(section) = skills_section(text) {
            for item in ITEM_SEPARATORS.split(section) {
                let item = item.trim().to_lowercase();
                if item.chars().count() < 2 {
                    continue;
                }
                for skill in &self.primary {
                    if skill.pattern.is_match(&item) {
                        record(skill.name);
                    }
                }
            }
        }

        for skill in self.primary.iter().chain(&self.compound) {
            if skill.pattern.is_match(text) {
                record(skill.name);
            }
        }

        if found.is_empty() {
            return vec![SKILLS_PLACEHOLDER.to_string()];
        }
        found.into_iter().map(String::from).collect()
    }
}

pub fn extract_skills(text: &str) -> Vec<String> {
    STANDARD_SKILLS.extract(text)
}

// `\b` cannot follow a non-word character, so fragments like `c\+\+` and `c#`
// are closed by a non-word character or end of text instead.
fn whole_word(fragment: &str) -> String {
    if fragment.ends_with(r"\+") || fragment.ends_with('#') {
        format!(r"(?i)\b(?:{fragment})(?:\W|$)")
    } else {
        format!(r"(?i)\b(?:{fragment})\b")
    }
}

/// Text after the first matching skills header, up to the next `Label:` line.
fn skills_section(text: &str) -> Option<&str> {
    let header = SECTION_HEADER_PATTERNS
        .iter()
        .find_map(|re| re.find(text))?;
    let rest = &text[header.end()..];
    let end = LABEL_LINE.find(rest).map_or(rest.len(), |m| m.start());
    let section = rest[..end].trim();
    (!section.is_empty()).then_some(section)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_skills_come_first() {
        let text = "Worked with Docker daily.\nSkills: Rust, Python\nLanguages: English";
        assert_eq!(extract_skills(text), vec!["Rust", "Python", "Docker"]);
    }

    #[test]
    fn test_section_on_own_line() {
        let text = "Skills\nPython, React, Docker";
        assert_eq!(extract_skills(text), vec!["Python", "React", "Docker"]);
    }

    #[test]
    fn test_canonical_names_deduplicated() {
        let text = "I use node.js and Node every day; also NODE.JS";
        assert_eq!(extract_skills(text), vec!["Node.js"]);
    }

    #[test]
    fn test_mixed_case_repeats_collapse() {
        let text = "Python scripts, python tooling, Python tests and more Python";
        assert_eq!(extract_skills(text), vec!["Python"]);
    }

    #[test]
    fn test_symbol_suffixed_languages() {
        let skills = extract_skills("Fluent in C++ and C#, some Java.");
        assert!(skills.contains(&"C++".to_string()));
        assert!(skills.contains(&"C#".to_string()));
        assert!(skills.contains(&"Java".to_string()));
        assert!(!skills.contains(&"JavaScript".to_string()));
    }

    #[test]
    fn test_whole_word_matching() {
        // "javascript" must not yield "Java", "restaurant" must not yield "REST APIs".
        let skills = extract_skills("javascript at a restaurant");
        assert_eq!(skills, vec!["JavaScript"]);
    }

    #[test]
    fn test_compound_variants() {
        let skills = extract_skills("Designed micro-services with test driven development");
        assert_eq!(skills, vec!["Microservices", "Test-Driven Development"]);
    }

    #[test]
    fn test_soft_skills() {
        let skills = extract_skills("Strong leadership and problem solving");
        assert_eq!(skills, vec!["Leadership", "Problem Solving"]);
    }

    #[test]
    fn test_placeholder_when_nothing_matches() {
        assert_eq!(extract_skills("gardening and knitting"), vec![SKILLS_PLACEHOLDER]);
        assert_eq!(extract_skills(""), vec![SKILLS_PLACEHOLDER]);
    }

    #[test]
    fn test_custom_table() {
        let table = SkillTable::new(&[("cobol", "COBOL")], &[]).unwrap();
        assert_eq!(table.extract("Maintained COBOL batch jobs"), vec!["COBOL"]);
        assert_eq!(table.extract("Python"), vec![SKILLS_PLACEHOLDER]);
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        assert!(SkillTable::new(&[("(", "Broken")], &[]).is_err());
    }
}
