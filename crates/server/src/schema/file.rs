use async_graphql::{Context, Object, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    auth::require_user,
    db::{models::File, ownership},
    error::AppError,
    validate,
};

const INVALID_FILE_NAME: &str =
    "File name format: only letters (upper and lower case) with numbers are allowed";
const INVALID_EXTENSION: &str = "Extension format: only lowerCase letters are allowed";

async fn fetch_file(pool: &SqlitePool, id: &str) -> Result<File, AppError> {
    sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("No file found with this fileId".to_string()))
}

#[derive(Default)]
pub struct FileQuery;

#[Object]
impl FileQuery {
    async fn get_all_files_by_project_id(
        &self,
        ctx: &Context<'_>,
        project_id: String,
    ) -> Result<Vec<File>> {
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

        Ok(sqlx::query_as::<_, File>(
            "SELECT fi.* FROM files fi \
             JOIN folders fo ON fo.id = fi.folder_id \
             WHERE fo.project_id = ?",
        )
        .bind(&project_id)
        .fetch_all(pool)
        .await?)
    }

    async fn get_all_files_by_folder_id(
        &self,
        ctx: &Context<'_>,
        folder_id: String,
    ) -> Result<Vec<File>> {
        require_user(ctx)?;
        let pool = ctx.data_unchecked::<SqlitePool>();

        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM folders WHERE id = ?")
            .bind(&folder_id)
            .fetch_one(pool)
            .await?;
        if exists == 0 {
            return Err(
                AppError::NotFound("No folder found with this folderId".to_string()).into(),
            );
        }

        Ok(
            sqlx::query_as::<_, File>("SELECT * FROM files WHERE folder_id = ?")
                .bind(&folder_id)
                .fetch_all(pool)
                .await?,
        )
    }
}

#[derive(Default)]
pub struct FileMutation;

#[Object]
impl FileMutation {
    async fn add_file(
        &self,
        ctx: &Context<'_>,
        name: String,
        extension: String,
        folder_id: String,
        content: Option<String>,
    ) -> Result<File> {
        let caller = require_user(ctx)?.clone();
        let pool = ctx.data_unchecked::<SqlitePool>();

        if name.is_empty() {
            return Err(AppError::Validation("No empty file name".to_string()).into());
        }
        if extension.is_empty() {
            return Err(AppError::Validation("No empty file extension".to_string()).into());
        }
        if !validate::file_name(&name) {
            return Err(AppError::Validation(INVALID_FILE_NAME.to_string()).into());
        }
        if !validate::extension(&extension) {
            return Err(AppError::Validation(INVALID_EXTENSION.to_string()).into());
        }

        ownership::require_folder_owner(pool, &folder_id, &caller.id).await?;

        let duplicate = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM files WHERE folder_id = ? AND name = ?",
        )
        .bind(&folder_id)
        .bind(&name)
        .fetch_one(pool)
        .await?;
        if duplicate > 0 {
            return Err(AppError::Conflict(
                "File with same name in the same folder already exists".to_string(),
            )
            .into());
        }

        let file_id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO files (id, folder_id, name, extension, content) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&file_id)
        .bind(&folder_id)
        .bind(&name)
        .bind(&extension)
        .bind(content.unwrap_or_default())
        .execute(pool)
        .await
        .map_err(|e| {
            AppError::saving(
                e,
                "File with same name in the same folder already exists",
                "Error while saving file",
            )
        })?;

        Ok(fetch_file(pool, &file_id).await?)
    }

    async fn modify_file(
        &self,
        ctx: &Context<'_>,
        file_id: String,
        name: Option<String>,
        content: Option<String>,
        extension: Option<String>,
    ) -> Result<File> {
        let caller = require_user(ctx)?.clone();
        let pool = ctx.data_unchecked::<SqlitePool>();

        if name.as_deref() == Some("") {
            return Err(AppError::Validation("No empty file name".to_string()).into());
        }
        if extension.as_deref() == Some("") {
            return Err(AppError::Validation("No empty file extension".to_string()).into());
        }

        ownership::require_file_owner(pool, &file_id, &caller.id).await?;
        let mut file = fetch_file(pool, &file_id).await?;

        if let Some(name) = name {
            if !validate::file_name(&name) {
                return Err(AppError::Validation(INVALID_FILE_NAME.to_string()).into());
            }
            file.name = name;
        }
        if let Some(extension) = extension {
            if !validate::extension(&extension) {
                return Err(AppError::Validation(INVALID_EXTENSION.to_string()).into());
            }
            file.extension = extension;
        }
        if let Some(content) = content {
            file.content = content;
        }

        sqlx::query("UPDATE files SET name = ?, extension = ?, content = ? WHERE id = ?")
            .bind(&file.name)
            .bind(&file.extension)
            .bind(&file.content)
            .bind(&file.id)
            .execute(pool)
            .await
            .map_err(|e| {
                AppError::saving(
                    e,
                    "File with same name in the same folder already exists",
                    "Error while saving the file",
                )
            })?;

        Ok(file)
    }

    async fn delete_file(&self, ctx: &Context<'_>, file_id: String) -> Result<String> {
        let caller = require_user(ctx)?.clone();
        let pool = ctx.data_unchecked::<SqlitePool>();

        ownership::require_file_owner(pool, &file_id, &caller.id).await?;

        sqlx::query("DELETE FROM files WHERE id = ?")
            .bind(&file_id)
            .execute(pool)
            .await
            .map_err(|_| AppError::Internal("Error while deleting this file".to_string()))?;

        Ok("File deleted".to_string())
    }
}
