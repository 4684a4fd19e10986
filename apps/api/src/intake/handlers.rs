use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use tracing::{info, warn};

use crate::cv;
use crate::errors::AppError;
use crate::intake::{ApplicationRecord, FileStore};
use crate::scheduler::FollowUpRequest;
use crate::state::AppState;
use crate::storage;

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: String,
    pub cv_link: String,
}

#[derive(Debug, Default)]
struct SubmissionForm {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    timezone: Option<String>,
    cv: Option<(String, bytes::Bytes)>,
}

/// POST /api/v1/applications
///
/// Accepts the application form plus résumé, records it downstream, and
/// queues the follow-up email. The sheet append and webhook are best-effort;
/// the response never waits on the scheduler.
pub async fn handle_submit(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SubmitResponse>, AppError> {
    let form = read_form(multipart).await?;

    let (name, email, phone) = match (form.name, form.email, form.phone) {
        (Some(n), Some(e), Some(p)) if !n.is_empty() && !e.is_empty() && !p.is_empty() => {
            (n, e, p)
        }
        _ => return Err(AppError::Validation("Missing required fields".to_string())),
    };
    let (filename, data) = form
        .cv
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    if !FileStore::allowed_file(&filename) {
        return Err(AppError::Validation(
            "Invalid file type. Only PDF allowed.".to_string(),
        ));
    }

    info!(%email, "processing application submission");

    let stored_name = state.files.save(&filename, &data).await?;
    let file_path = state.files.path_of(&stored_name);

    let cv_link = storage::upload_resume(
        &state.s3,
        &state.config.s3_bucket,
        &stored_name,
        data.to_vec(),
    )
    .await
    .map_err(|e| AppError::Storage(e.to_string()))?;

    // Extraction is CPU-bound; keep it off the async workers.
    let extractor = Arc::clone(&state.extractor);
    let cv_data = tokio::task::spawn_blocking(move || {
        extractor
            .extract(&file_path)
            .map(|text| cv::segment(&text))
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?
    .map_err(|e| AppError::CvParse(e.to_string()))?;

    let record = ApplicationRecord {
        name: name.clone(),
        email: email.clone(),
        phone,
        cv_link: cv_link.clone(),
        cv_data,
    };

    if let Err(e) = state.sheets.append_application(&record).await {
        warn!(error = %e, "sheet append failed");
    }
    if let Err(e) = state.webhook.notify(&record, "prod").await {
        warn!(error = %e, "webhook notification failed");
    }

    state.scheduler.schedule(FollowUpRequest {
        email,
        name,
        timezone: form.timezone,
    });

    info!("application submission successful");
    Ok(Json(SubmitResponse {
        message: "Application submitted successfully!".to_string(),
        cv_link,
    }))
}

/// GET /api/v1/applications/files/:filename
///
/// Serves a previously uploaded résumé as an attachment.
pub async fn handle_download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    // Anything that could climb out of the upload directory is treated as
    // not found.
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return Err(AppError::NotFound(filename));
    }

    let path = state.files.path_of(&filename);
    let data = tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::NotFound(filename.clone()))?;

    let headers = [
        (header::CONTENT_TYPE, "application/octet-stream".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, data))
}

async fn read_form(mut multipart: Multipart) -> Result<SubmissionForm, AppError> {
    let mut form = SubmissionForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("name") => form.name = Some(text_field(field).await?),
            Some("email") => form.email = Some(text_field(field).await?),
            Some("phone") => form.phone = Some(text_field(field).await?),
            Some("timezone") => form.timezone = Some(text_field(field).await?),
            Some("cv") => {
                let filename = field.file_name().unwrap_or("cv.pdf").to_string();
                let data = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Invalid file upload: {e}"))
                })?;
                form.cv = Some((filename, data));
            }
            // Unknown fields are ignored rather than rejected.
            _ => {}
        }
    }
    Ok(form)
}

async fn text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map(|value| value.trim().to_string())
        .map_err(|e| AppError::Validation(format!("Invalid form field: {e}")))
}
