use async_graphql::{Context, Object, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    auth::require_user,
    db::{models::Folder, ownership},
    error::AppError,
};

#[derive(Default)]
pub struct FolderQuery;

#[Object]
impl FolderQuery {
    async fn get_all_folders_by_project_id(
        &self,
        ctx: &Context<'_>,
        project_id: String,
    ) -> Result<Vec<Folder>> {
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

        Ok(
            sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE project_id = ?")
                .bind(&project_id)
                .fetch_all(pool)
                .await?,
        )
    }
}

#[derive(Default)]
pub struct FolderMutation;

#[Object]
impl FolderMutation {
    async fn add_folder(
        &self,
        ctx: &Context<'_>,
        name: String,
        parent_folder_id: String,
    ) -> Result<Folder> {
        let caller = require_user(ctx)?.clone();
        let pool = ctx.data_unchecked::<SqlitePool>();

        if name.is_empty() {
            return Err(AppError::Validation("No empty folder name".to_string()).into());
        }

        let (project_id, owner_id) = ownership::folder_owner(pool, &parent_folder_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => {
                    AppError::NotFound("No folder found with this parentFolderId".to_string())
                }
                other => other,
            })?;
        if owner_id != caller.id {
            return Err(AppError::Forbidden(
                "This user isn't the owner of the folder/project".to_string(),
            )
            .into());
        }

        let duplicate = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM folders WHERE parent_id = ? AND name = ?",
        )
        .bind(&parent_folder_id)
        .bind(&name)
        .fetch_one(pool)
        .await?;
        if duplicate > 0 {
            return Err(AppError::Conflict(
                "Folder with same name and same parentFolder already exists".to_string(),
            )
            .into());
        }

        let folder_id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO folders (id, project_id, parent_id, name) VALUES (?, ?, ?, ?)")
            .bind(&folder_id)
            .bind(&project_id)
            .bind(&parent_folder_id)
            .bind(&name)
            .execute(pool)
            .await
            .map_err(|e| {
                AppError::saving(
                    e,
                    "Folder with same name and same parentFolder already exists",
                    "Error while saving folder",
                )
            })?;

        Ok(
            sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = ?")
                .bind(&folder_id)
                .fetch_one(pool)
                .await?,
        )
    }

    async fn rename_folder(
        &self,
        ctx: &Context<'_>,
        folder_id: String,
        name: Option<String>,
    ) -> Result<Folder> {
        let caller = require_user(ctx)?.clone();
        let pool = ctx.data_unchecked::<SqlitePool>();

        if name.as_deref() == Some("") {
            return Err(AppError::Validation("No empty folder name".to_string()).into());
        }

        ownership::require_folder_owner(pool, &folder_id, &caller.id).await?;

        if let Some(name) = &name {
            sqlx::query("UPDATE folders SET name = ? WHERE id = ?")
                .bind(name)
                .bind(&folder_id)
                .execute(pool)
                .await
                .map_err(|e| {
                    AppError::saving(
                        e,
                        "Folder with same name and same parentFolder already exists",
                        "Error while renaming folder",
                    )
                })?;
        }

        Ok(
            sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = ?")
                .bind(&folder_id)
                .fetch_one(pool)
                .await?,
        )
    }

    async fn delete_folder(&self, ctx: &Context<'_>, folder_id: String) -> Result<String> {
        let caller = require_user(ctx)?.clone();
        let pool = ctx.data_unchecked::<SqlitePool>();

        ownership::require_folder_owner(pool, &folder_id, &caller.id).await?;

        sqlx::query("DELETE FROM folders WHERE id = ?")
            .bind(&folder_id)
            .execute(pool)
            .await
            .map_err(|_| AppError::Internal("Error while deleting folder".to_string()))?;

        Ok("Folder deleted".to_string())
    }
}
