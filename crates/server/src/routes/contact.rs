use axum::{extract::State, Json};
use serde::Deserialize;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub reason: String,
}

pub async fn send_contact(
    State(state): State<AppState>,
    Json(body): Json<ContactRequest>,
) -> &'static str {
    match state
        .mailer
        .send_contact(&body.name, &body.email, &body.reason)
        .await
    {
        Ok(()) => "Mail sent successfully",
        Err(e) => {
            tracing::warn!("contact mail failed: {e}");
            "Something went wrong"
        }
    }
}
