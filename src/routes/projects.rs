/**
 * Project Routes
 * Stored projects, or curated examples when none can be read
 */
use axum::{extract::State, Json};

use crate::db::{
    models::{fallback_projects, Project, RawProject, PROJECT_COLLECTION},
    StoreError, StoreHandle,
};
use crate::state::AppState;

/// Maximum number of stored projects returned
const PROJECT_LIMIT: usize = 12;

async fn fetch_projects(store: &StoreHandle) -> Result<Vec<Project>, StoreError> {
    store
        .get_documents(PROJECT_COLLECTION, PROJECT_LIMIT)
        .await?
        .into_iter()
        .take(PROJECT_LIMIT)
        .map(|doc| -> Result<Project, StoreError> {
            Ok(RawProject::from_document(doc)?.into())
        })
        .collect()
}

/// GET /api/projects
pub async fn list_projects(State(state): State<AppState>) -> Json<Vec<Project>> {
    match fetch_projects(&state.store).await {
        Ok(projects) if !projects.is_empty() => return Json(projects),
        Ok(_) => tracing::debug!("No stored projects, using curated examples"),
        Err(StoreError::Unavailable) => {
            tracing::debug!("Document store unavailable, using curated examples")
        }
        Err(e) => tracing::error!("Failed to load projects: {}", e),
    }

    Json(fallback_projects())
}
