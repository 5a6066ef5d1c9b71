/**
 * Contact Routes
 * Contact-form submissions
 */
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::db::{
    models::{Contact, CONTACT_COLLECTION},
    StoreError, StoreHandle,
};
use crate::routes::validated::ValidatedJson;
use crate::state::AppState;

const STORAGE_DISABLED_NOTE: &str =
    "Stored in-memory fallback not enabled. DB may be disabled in this environment.";

/// Response for POST /api/contact
#[derive(Debug, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

async fn save_contact(store: &StoreHandle, contact: &Contact) -> Result<String, StoreError> {
    let document = serde_json::to_value(contact)?;
    store.insert_document(CONTACT_COLLECTION, document).await
}

/// POST /api/contact
///
/// A submission that could not be stored still reports success, with a
/// note and no id, so the contact form never shows an error to visitors.
pub async fn submit_contact(
    State(state): State<AppState>,
    ValidatedJson(contact): ValidatedJson<Contact>,
) -> Json<ContactResponse> {
    match save_contact(&state.store, &contact).await {
        Ok(id) => {
            tracing::info!(id = %id, "contact message stored");
            Json(ContactResponse {
                success: true,
                id: Some(id),
                note: None,
            })
        }
        Err(e) => {
            tracing::warn!(error = %e, "contact message not stored");
            Json(ContactResponse {
                success: true,
                id: None,
                note: Some(STORAGE_DISABLED_NOTE.to_string()),
            })
        }
    }
}
