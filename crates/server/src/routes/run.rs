use axum::{extract::State, http::HeaderMap, Json};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;

use crate::{
    auth,
    error::{AppError, Result},
    services::runner::RunOutcome,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct RunRequest {
    pub code: String,
}

pub async fn run_code(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<RunRequest>,
) -> Result<Json<RunOutcome>> {
    let bytes = BASE64
        .decode(body.code.as_bytes())
        .map_err(|_| AppError::Validation("Invalid base64 payload".to_string()))?;
    let source = String::from_utf8(bytes)
        .map_err(|_| AppError::Validation("Program text is not valid UTF-8".to_string()))?;

    // Count the run when the caller is identified; anonymous runs are allowed
    if let Some(user) = auth::user_from_headers(&headers, &state.config.jwt_secret) {
        if let Err(e) = sqlx::query("UPDATE users SET daily_runs = daily_runs + 1 WHERE id = ?")
            .bind(&user.id)
            .execute(&state.db.pool)
            .await
        {
            tracing::warn!("failed to count run for user {}: {e}", user.id);
        }
    }

    let outcome = state.runner.run(&source).await?;
    Ok(Json(outcome))
}
