use axum::{
    extract::{multipart::MultipartError, rejection::QueryRejection, Multipart, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cv::pipeline::{ParseOptions, ParseOutcome};
use crate::documents::{extract_text, DocumentKind, DocumentSource};
use crate::errors::AppError;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

#[derive(Deserialize)]
pub struct ParseTextRequest {
    pub text: String,
    #[serde(default)]
    pub use_ai: Option<bool>,
}

/// POST /api/v1/cv/parse?use_ai=<bool>
pub async fn handle_parse_upload(
    State(state): State<AppState>,
    options: Result<Query<ParseOptions>, QueryRejection>,
    mut multipart: Multipart,
) -> Result<Json<ParseOutcome>, AppError> {
    let Query(options) = options.map_err(|e| AppError::Validation(e.body_text()))?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if DocumentKind::from_filename(&filename).is_none() {
            return Err(AppError::Validation(
                "Only PDF and DOCX files are supported".to_string(),
            ));
        }

        let data = field.bytes().await.map_err(multipart_error)?;
        let upload_id = Uuid::new_v4();
        info!(%upload_id, filename = %filename, bytes = data.len(), "CV upload received");

        // Unreadable documents degrade to empty text and a partial result.
        let text = match extract_text(DocumentSource::Bytes {
            data,
            filename: filename.clone(),
        })
        .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!(%upload_id, filename = %filename, error = %e, "text extraction failed");
                String::new()
            }
        };

        return Ok(Json(state.pipeline.parse(&text, options).await));
    }

    Err(AppError::Validation(format!(
        "Missing multipart field '{FILE_FIELD}'"
    )))
}

/// POST /api/v1/cv/parse-text
pub async fn handle_parse_text(
    State(state): State<AppState>,
    Json(req): Json<ParseTextRequest>,
) -> Result<Json<ParseOutcome>, AppError> {
    let options = ParseOptions {
        use_ai: req.use_ai.unwrap_or(true),
    };
    Ok(Json(state.pipeline.parse(&req.text, options).await))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(e.body_text())
    }
}
