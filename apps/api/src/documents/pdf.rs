use crate::documents::DocumentError;

pub fn extract(data: &[u8]) -> Result<String, DocumentError> {
    pdf_extract::extract_text_from_mem(data).map_err(|e| DocumentError::Pdf(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_pdf_bytes() {
        assert!(matches!(extract(b"%NOTPDF"), Err(DocumentError::Pdf(_))));
    }
}
