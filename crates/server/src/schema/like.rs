use async_graphql::{Context, Object, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    auth::require_user,
    db::{models::Like, ownership},
    error::AppError,
};

async fn project_exists(pool: &SqlitePool, project_id: &str) -> Result<(), AppError> {
    let found = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects WHERE id = ?")
        .bind(project_id)
        .fetch_one(pool)
        .await?;
    if found == 0 {
        return Err(AppError::NotFound(
            "No project found with this projectId".to_string(),
        ));
    }
    Ok(())
}

#[derive(Default)]
pub struct LikeQuery;

#[Object]
impl LikeQuery {
    async fn get_all_likes(&self, ctx: &Context<'_>) -> Result<Vec<Like>> {
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(sqlx::query_as::<_, Like>("SELECT * FROM likes")
            .fetch_all(pool)
            .await?)
    }

    async fn get_all_likes_by_user(&self, ctx: &Context<'_>) -> Result<Vec<Like>> {
        let caller = require_user(ctx)?.clone();
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(
            sqlx::query_as::<_, Like>("SELECT * FROM likes WHERE user_id = ?")
                .bind(&caller.id)
                .fetch_all(pool)
                .await?,
        )
    }

    async fn project_is_liked(&self, ctx: &Context<'_>, project_id: String) -> Result<bool> {
        let caller = require_user(ctx)?.clone();
        let pool = ctx.data_unchecked::<SqlitePool>();
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM likes WHERE user_id = ? AND project_id = ?",
        )
        .bind(&caller.id)
        .bind(&project_id)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }
}

#[derive(Default)]
pub struct LikeMutation;

#[Object]
impl LikeMutation {
    async fn add_like(&self, ctx: &Context<'_>, project_id: String) -> Result<Like> {
        let caller = require_user(ctx)?.clone();
        let pool = ctx.data_unchecked::<SqlitePool>();

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
                "The owner of the project cannot like himself".to_string(),
            )
            .into());
        }

        let already = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM likes WHERE user_id = ? AND project_id = ?",
        )
        .bind(&caller.id)
        .bind(&project_id)
        .fetch_one(pool)
        .await?;
        if already > 0 {
            return Err(AppError::Conflict(
                "Like already existing with this user on this project".to_string(),
            )
            .into());
        }

        let like_id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO likes (id, user_id, project_id, created_at) VALUES (?, ?, ?, ?)")
            .bind(&like_id)
            .bind(&caller.id)
            .bind(&project_id)
            .bind(Utc::now())
            .execute(pool)
            .await
            .map_err(|e| {
                AppError::saving(
                    e,
                    "Like already existing with this user on this project",
                    "Error while saving like on this project",
                )
            })?;

        Ok(sqlx::query_as::<_, Like>("SELECT * FROM likes WHERE id = ?")
            .bind(&like_id)
            .fetch_one(pool)
            .await?)
    }

    async fn delete_like(&self, ctx: &Context<'_>, project_id: String) -> Result<String> {
        let caller = require_user(ctx)?.clone();
        let pool = ctx.data_unchecked::<SqlitePool>();

        project_exists(pool, &project_id).await?;

        let result = sqlx::query("DELETE FROM likes WHERE user_id = ? AND project_id = ?")
            .bind(&caller.id)
            .bind(&project_id)
            .execute(pool)
            .await
            .map_err(|_| {
                AppError::Internal("Error while deleting like on this project".to_string())
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(
                "No like to delete with this user on this project".to_string(),
            )
            .into());
        }

        Ok("Like deleted".to_string())
    }
}
