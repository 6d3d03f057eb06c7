use async_graphql::{Context, Object, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    auth::require_user,
    db::{models::Report, ownership},
    error::AppError,
};

#[derive(Default)]
pub struct ReportQuery;

#[Object]
impl ReportQuery {
    async fn get_all_reports(&self, ctx: &Context<'_>) -> Result<Vec<Report>> {
        require_user(ctx)?;
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(
            sqlx::query_as::<_, Report>("SELECT * FROM reports ORDER BY created_at DESC")
                .fetch_all(pool)
                .await?,
        )
    }
}

#[derive(Default)]
pub struct ReportMutation;

#[Object]
impl ReportMutation {
    async fn add_report(
        &self,
        ctx: &Context<'_>,
        content: String,
        project_id: String,
    ) -> Result<Report> {
        let caller = require_user(ctx)?.clone();
        let pool = ctx.data_unchecked::<SqlitePool>();

        if content.is_empty() {
            return Err(AppError::Validation("No empty comment".to_string()).into());
        }

        let owner_id = ownership::project_owner(pool, &project_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => {
                    AppError::NotFound("No project found with this projectId".to_string())
                }
                other => other,
            })?;
        if owner_id == caller.id {
            return Err(AppError::Forbidden(
                "The owner of the project cannot report himself".to_string(),
            )
            .into());
        }

        let report_id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO reports (id, reporter_id, project_id, content, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&report_id)
        .bind(&caller.id)
        .bind(&project_id)
        .bind(&content)
        .bind(Utc::now())
        .execute(pool)
        .await
        .map_err(|_| AppError::Internal("Error while saving report".to_string()))?;

        Ok(
            sqlx::query_as::<_, Report>("SELECT * FROM reports WHERE id = ?")
                .bind(&report_id)
                .fetch_one(pool)
                .await?,
        )
    }
}
