// LLM prompts for CV parsing.

/// System prompt for CV parsing. Enforces JSON-only output.
pub const CV_PARSE_SYSTEM: &str = "You are an expert CV and resume analyst. \
    Extract structured information from the CV text you are given. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// CV parsing prompt template. Replace `{cv_text}` before sending.
pub const CV_PARSE_PROMPT_TEMPLATE: &str = r#"Extract structured information from the following CV.

Return a JSON object with this EXACT schema (no extra fields):
{
  "name": "Jane Doe",
  "email": "jane@example.com",
  "phone": "+1 555 123 4567",
  "education": [
    {"institution": "MIT", "degree": "BSc", "field": "Computer Science", "years": "2015 - 2019"}
  ],
  "skills": ["Python", "Leadership"],
  "work_experience": [
    {"company": "Acme Corp", "role": "Software Engineer", "years": "2019 - Present", "description": "Built data pipelines"}
  ],
  "projects": [
    {"name": "Booking Platform", "description": "Hotel booking web app", "technologies": ["React", "Node.js"]}
  ],
  "interests": ["Chess", "Hiking"]
}

Rules:
- "name" is the person's full name, never a section heading such as "About Me", "Profile" or "Personal Information".
- Use an empty string for a missing email or phone. Do NOT invent contact details.
- Use empty arrays for sections the CV does not contain.
- Copy dates as written in the CV ("2019 - Present", "Jan 2020 - Mar 2022").
- "skills" lists technical and soft skills, one per item, without duplicates.

CV TEXT:
{cv_text}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_demands_bare_json() {
        assert!(CV_PARSE_SYSTEM.contains("valid JSON only"));
        assert!(CV_PARSE_SYSTEM.contains("Do NOT use markdown code fences"));
    }

    #[test]
    fn test_template_has_single_placeholder() {
        assert_eq!(CV_PARSE_PROMPT_TEMPLATE.matches("{cv_text}").count(), 1);
    }
}
