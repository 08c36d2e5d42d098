// Document-to-text: resolves an uploaded file or a path on disk to plain text.
// Parsing is CPU-bound and runs inside tokio::task::spawn_blocking.

pub mod docx;
pub mod pdf;

use std::path::{Path, PathBuf};

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("DOCX archive has no word/document.xml")]
    MissingBody,

    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Where the document comes from. Both variants are resolved to bytes before parsing.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    Bytes { data: Bytes, filename: String },
    Path(PathBuf),
}

impl DocumentSource {
    pub fn filename(&self) -> &str {
        match self {
            DocumentSource::Bytes { filename, .. } => filename,
            DocumentSource::Path(path) => path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Kind by extension, case-insensitive. `None` for anything but `.pdf` / `.docx`.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())?
            .to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            _ => None,
        }
    }
}

/// Plain text of the document. Unsupported extensions yield an empty string.
pub async fn extract_text(source: DocumentSource) -> Result<String, DocumentError> {
    let Some(kind) = DocumentKind::from_filename(source.filename()) else {
        debug!(filename = source.filename(), "unsupported document type");
        return Ok(String::new());
    };

    let data = match source {
        DocumentSource::Bytes { data, .. } => data,
        DocumentSource::Path(path) => Bytes::from(tokio::fs::read(&path).await?),
    };

    let text = tokio::task::spawn_blocking(move || extract_text_from_bytes(kind, &data)).await??;
    debug!(?kind, chars = text.chars().count(), "document text extracted");
    Ok(text)
}

pub fn extract_text_from_bytes(kind: DocumentKind, data: &[u8]) -> Result<String, DocumentError> {
    match kind {
        DocumentKind::Pdf => pdf::extract(data),
        DocumentKind::Docx => docx::extract(data),
    }
}
