use std::io::{Cursor, Read};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use zip::result::ZipError;

use crate::documents::DocumentError;

const BODY_PART: &str = "word/document.xml";

/// Text runs, tabs and line breaks inside one `<w:p>` paragraph.
static RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|<w:tab\s*/>|<w:br(?:\s[^>]*)?/>")
        .expect("valid docx run pattern")
});

static NUMERIC_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").expect("valid entity pattern"));

pub fn extract(data: &[u8]) -> Result<String, DocumentError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
    let mut xml = String::new();
    match archive.by_name(BODY_PART) {
        Ok(mut part) => {
            part.read_to_string(&mut xml)?;
        }
        Err(ZipError::FileNotFound) => return Err(DocumentError::MissingBody),
        Err(e) => return Err(e.into()),
    }
    Ok(document_xml_to_text(&xml))
}

/// One output line per paragraph, empty paragraphs included.
pub fn document_xml_to_text(xml: &str) -> String {
    let mut paragraphs: Vec<&str> = xml.split("</w:p>").collect();
    // Whatever follows the last paragraph (section properties, closing tags) has no text.
    paragraphs.pop();

    paragraphs
        .into_iter()
        .map(paragraph_text)
        .collect::<Vec<_>>()
        .join("\n")
}

fn paragraph_text(paragraph: &str) -> String {
    let mut text = String::new();
    for caps in RUN.captures_iter(paragraph) {
        match caps.get(1) {
            Some(run) => text.push_str(&unescape(run.as_str())),
            None if caps[0].starts_with("<w:tab") => text.push('\t'),
            None => text.push('\n'),
        }
    }
    text
}

fn unescape(s: &str) -> String {
    let named = s
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'");
    let numeric = NUMERIC_ENTITY.replace_all(&named, |caps: &Captures| {
        let code = &caps[1];
        let value = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        value
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });
    // `&amp;` last so "&amp;lt;" stays "&lt;".
    numeric.replace("&amp;", "&")
}
