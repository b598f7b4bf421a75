use super::error::ApiError;
use super::AppState;
use crate::auth;
use crate::jobs::{sanitize_filename, JobStore};
use crate::tools::{self, ToolOutput, ToolSpec};
use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio_util::io::StreamReader;

#[derive(Debug, Deserialize)]
pub struct ApiKeyParams {
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub job_id: String,
    pub filename: String,
    pub created_at: u64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub time: u64,
}

fn check_api_key(state: &AppState, provided: &str) -> Result<(), ApiError> {
    if auth::verify_api_key(provided, &state.config.auth.api_key) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

fn epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub async fn upload_evidence(
    State(state): State<AppState>,
    Query(params): Query<ApiKeyParams>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    check_api_key(&state, &params.api_key)?;

    let mut stored = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadUpload(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .ok_or_else(|| ApiError::BadUpload("missing filename".to_string()))?
            .to_string();

        // Validate before touching storage so a bad name leaves nothing
        // behind, not even an empty job directory.
        sanitize_filename(&filename)?;

        let job_id = state.jobs.create_job().await?;
        let reader = StreamReader::new(field.map_err(std::io::Error::other));
        state
            .jobs
            .store_evidence(&job_id, &filename, Box::pin(reader))
            .await?;

        tracing::info!("Uploaded evidence {} to job {}", filename, job_id);
        stored = Some((job_id, filename));
        break;
    }

    let (job_id, filename) =
        stored.ok_or_else(|| ApiError::BadUpload("missing file field".to_string()))?;

    Ok(Json(UploadResponse {
        job_id,
        filename,
        created_at: epoch_seconds(),
    }))
}

async fn invoke_tool(
    state: &AppState,
    job_id: &str,
    spec: ToolSpec,
) -> Result<Json<ToolOutput>, ApiError> {
    let evidence = state.jobs.evidence_file(job_id).await?;
    let output = tools::run(&spec, &evidence).await?;
    Ok(Json(output))
}

pub async fn run_tsk_fls(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Query(params): Query<ApiKeyParams>,
) -> Result<Json<ToolOutput>, ApiError> {
    check_api_key(&state, &params.api_key)?;
    invoke_tool(&state, &job_id, ToolSpec::tsk_fls(&state.config.tools)).await
}

pub async fn run_volatility_pslist(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Query(params): Query<ApiKeyParams>,
) -> Result<Json<ToolOutput>, ApiError> {
    check_api_key(&state, &params.api_key)?;
    invoke_tool(
        &state,
        &job_id,
        ToolSpec::volatility_pslist(&state.config.tools),
    )
    .await
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        time: epoch_seconds(),
    })
}
