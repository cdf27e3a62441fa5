//! Job centre admin handlers: CSV bulk upload, listing and template download

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Multipart, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use super::AppState;
use crate::db::queries;
use crate::services::import::csv_row::template_csv;
use crate::services::import::{import_job_centres, ImportError, ImportOptions, UploadedFile};
use crate::types::{ErrorResponse, ImportResponse, ListJobCentresQuery, ListResponse};

const CSV_FILE_FIELD: &str = "csv_file";
const SKIP_DUPLICATES_FIELD: &str = "skip_duplicates";
const TEMPLATE_FILE_NAME: &str = "job_centres_template.csv";

impl IntoResponse for ImportError {
    fn into_response(self) -> Response {
        let status = if self.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

/// Fields of the bulk upload form
#[derive(Debug)]
struct UploadForm {
    file: UploadedFile,
    skip_duplicates: bool,
}

/// Drain the multipart body. `skip_duplicates` counts as set when the field
/// is present at all, whatever its value.
async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, ImportError> {
    let mut file: Option<UploadedFile> = None;
    let mut skip_duplicates = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ImportError::UploadFailed(e.body_text()))?
    {
        let key = field.name().unwrap_or("").to_string();
        match key.as_str() {
            CSV_FILE_FIELD => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content = field
                    .bytes()
                    .await
                    .map_err(|e| ImportError::UploadFailed(e.body_text()))?
                    .to_vec();

                // Browsers send an empty, unnamed part when no file was chosen
                if file_name.is_empty() && content.is_empty() {
                    continue;
                }
                file = Some(UploadedFile::new(file_name, content));
            }
            SKIP_DUPLICATES_FIELD => skip_duplicates = true,
            _ => {}
        }
    }

    let file = file.ok_or(ImportError::MissingFile)?;
    Ok(UploadForm {
        file,
        skip_duplicates,
    })
}

/// POST /admin/api/job-centres/bulk-upload
pub async fn bulk_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ImportResponse>, ImportError> {
    let multipart = multipart.map_err(|e| {
        warn!("Bulk upload without a multipart body: {}", e);
        ImportError::UploadFailed(e.body_text())
    })?;

    let form = read_upload_form(multipart).await.inspect_err(|e| {
        warn!("Bulk upload rejected: {}", e);
    })?;

    let options = ImportOptions {
        skip_duplicates: form.skip_duplicates,
        max_error_details: state.max_error_details,
    };

    let result = import_job_centres(&state.pool, &form.file, &options)
        .await
        .inspect_err(|e| {
            if e.is_validation() {
                warn!("Bulk upload '{}' rejected: {}", form.file.file_name, e);
            }
        })?;

    Ok(Json(ImportResponse::from(result)))
}

/// GET /admin/api/job-centres
pub async fn list_job_centres(
    State(state): State<AppState>,
    query: Result<Query<ListJobCentresQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query.normalized(),
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.body_text()))).into_response();
        }
    };

    let items = queries::job_centre::list_job_centres(&state.pool, &query).await;
    let total = queries::job_centre::count_job_centres(&state.pool, &query).await;

    match (items, total) {
        (Ok(items), Ok(total)) => Json(ListResponse {
            success: true,
            items,
            total,
            limit: query.limit,
            offset: query.offset,
        })
        .into_response(),
        (Err(e), _) | (_, Err(e)) => {
            error!("Failed to list job centres: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to load job centres")),
            )
                .into_response()
        }
    }
}

/// GET /admin/api/job-centres/template
pub async fn download_template() -> Response {
    match template_csv() {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", TEMPLATE_FILE_NAME),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to build CSV template: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to build template")),
            )
                .into_response()
        }
    }
}
