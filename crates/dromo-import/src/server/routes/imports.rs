//! Import start and status endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{ImportRecord, StartImportRequest, StartImportResponse};

/// POST /import-file - Start a headless import from an S3 object
pub async fn start_import(
    State(state): State<AppState>,
    payload: std::result::Result<Json<StartImportRequest>, JsonRejection>,
) -> Result<Json<StartImportResponse>> {
    let Json(request) = payload.map_err(|e| Error::validation(e.body_text()))?;
    let (s3_key, filename) = request.validate()?;

    let record = state.importer().start_import(&s3_key, &filename).await?;
    Ok(Json(StartImportResponse::from(&record)))
}

/// GET /import-status/:import_id - Get one import record
pub async fn get_import_status(
    State(state): State<AppState>,
    Path(import_id): Path<String>,
) -> Result<Json<ImportRecord>> {
    state
        .store()
        .get(&import_id)
        .map(Json)
        .ok_or(Error::NotFound(import_id))
}

/// GET /imports - List all import records
pub async fn list_imports(State(state): State<AppState>) -> Json<Vec<ImportRecord>> {
    Json(state.store().list())
}
