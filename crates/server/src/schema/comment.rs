use async_graphql::{Context, Object, Result};
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{auth::require_user, config::Config, db::models::Comment, error::AppError};

async fn fetch_comment(pool: &SqlitePool, id: &str) -> Result<Comment, AppError> {
    sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("No comment found with this id".to_string()))
}

#[derive(Default)]
pub struct CommentQuery;

#[Object]
impl CommentQuery {
    async fn get_all_comments(&self, ctx: &Context<'_>) -> Result<Vec<Comment>> {
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(
            sqlx::query_as::<_, Comment>("SELECT * FROM comments ORDER BY created_at DESC")
                .fetch_all(pool)
                .await?,
        )
    }

    async fn get_all_comments_by_project_id(
        &self,
        ctx: &Context<'_>,
        project_id: String,
    ) -> Result<Vec<Comment>> {
        require_user(ctx)?;
        let pool = ctx.data_unchecked::<SqlitePool>();

        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects WHERE id = ?")
            .bind(&project_id)
            .fetch_one(pool)
            .await?;
        if exists == 0 {
            return Err(
                AppError::NotFound("No project found with this projectId".to_string()).into(),
            );
        }

        Ok(sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE project_id = ? ORDER BY created_at DESC",
        )
        .bind(&project_id)
        .fetch_all(pool)
        .await?)
    }

    /// Caller's comments within the trailing window. The window length is
    /// configurable; the default matches the original 24-hour behavior.
    async fn get_monthly_comments_by_user(&self, ctx: &Context<'_>) -> Result<Vec<Comment>> {
        let caller = require_user(ctx)?.clone();
        let pool = ctx.data_unchecked::<SqlitePool>();
        let config = ctx.data_unchecked::<Config>();

        let cutoff = Utc::now() - Duration::hours(config.comment_window_hours);
        Ok(sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE author_id = ? AND created_at > ? \
             ORDER BY created_at DESC",
        )
        .bind(&caller.id)
        .bind(cutoff)
        .fetch_all(pool)
        .await?)
    }
}

#[derive(Default)]
pub struct CommentMutation;

#[Object]
impl CommentMutation {
    async fn add_comment(
        &self,
        ctx: &Context<'_>,
        comment: String,
        project_id: String,
    ) -> Result<Comment> {
        let caller = require_user(ctx)?.clone();
        let pool = ctx.data_unchecked::<SqlitePool>();

        if comment.is_empty() {
            return Err(AppError::Validation("No empty comment".to_string()).into());
        }

        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects WHERE id = ?")
            .bind(&project_id)
            .fetch_one(pool)
            .await?;
        if exists == 0 {
            return Err(
                AppError::NotFound("No project found with this projectId".to_string()).into(),
            );
        }

        let comment_id = Uuid::new_v4().to_string();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO comments (id, author_id, project_id, content, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&comment_id)
        .bind(&caller.id)
        .bind(&project_id)
        .bind(&comment)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .map_err(|_| AppError::Internal("Error while saving comment".to_string()))?;

        Ok(fetch_comment(pool, &comment_id).await?)
    }

    async fn modify_comment(
        &self,
        ctx: &Context<'_>,
        comment_id: String,
        content: String,
    ) -> Result<Comment> {
        let caller = require_user(ctx)?.clone();
        let pool = ctx.data_unchecked::<SqlitePool>();

        if content.is_empty() {
            return Err(AppError::Validation("No empty content".to_string()).into());
        }

        let mut comment = fetch_comment(pool, &comment_id).await?;
        if comment.author_id != caller.id {
            return Err(AppError::Forbidden(
                "This user isn't the owner of the comment".to_string(),
            )
            .into());
        }

        comment.content = content;
        comment.updated_at = Utc::now();

        sqlx::query("UPDATE comments SET content = ?, updated_at = ? WHERE id = ?")
            .bind(&comment.content)
            .bind(comment.updated_at)
            .bind(&comment.id)
            .execute(pool)
            .await
            .map_err(|_| AppError::Internal("Error while modifying the comment".to_string()))?;

        Ok(comment)
    }

    async fn delete_comment(&self, ctx: &Context<'_>, comment_id: String) -> Result<String> {
        let caller = require_user(ctx)?.clone();
        let pool = ctx.data_unchecked::<SqlitePool>();

        let comment = fetch_comment(pool, &comment_id).await?;
        if comment.author_id != caller.id {
            return Err(AppError::Forbidden(
                "This user isn't the owner of the comment".to_string(),
            )
            .into());
        }

        sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(&comment_id)
            .execute(pool)
            .await
            .map_err(|_| AppError::Internal("Error while deleting comment".to_string()))?;

        Ok("Comment deleted".to_string())
    }
}
