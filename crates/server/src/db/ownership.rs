//! Consolidated ownership predicates. Every mutating resolver resolves the
//! resource's owner chain through one of these instead of repeating the
//! lookup inline.

use sqlx::SqlitePool;

use crate::error::{AppError, Result};

/// Resolves a project's owner, failing NotFound when the id is unknown.
pub async fn project_owner(pool: &SqlitePool, project_id: &str) -> Result<String> {
    let owner = sqlx::query_scalar::<_, String>("SELECT owner_id FROM projects WHERE id = ?")
        .bind(project_id)
        .fetch_optional(pool)
        .await?;
    owner.ok_or_else(|| AppError::NotFound(format!("No project found with id: {project_id}")))
}

pub async fn require_project_owner(
    pool: &SqlitePool,
    project_id: &str,
    user_id: &str,
) -> Result<()> {
    if project_owner(pool, project_id).await? != user_id {
        return Err(AppError::Forbidden(
            "This user isn't the owner of the project".to_string(),
        ));
    }
    Ok(())
}

/// Folder → project → owner chain. Returns (project_id, owner_id).
pub async fn folder_owner(pool: &SqlitePool, folder_id: &str) -> Result<(String, String)> {
    let row = sqlx::query_as::<_, (String, String)>(
        "SELECT f.project_id, p.owner_id FROM folders f \
         JOIN projects p ON p.id = f.project_id WHERE f.id = ?",
    )
    .bind(folder_id)
    .fetch_optional(pool)
    .await?;
    row.ok_or_else(|| AppError::NotFound("No folder found with this folderId".to_string()))
}

pub async fn require_folder_owner(
    pool: &SqlitePool,
    folder_id: &str,
    user_id: &str,
) -> Result<String> {
    let (project_id, owner_id) = folder_owner(pool, folder_id).await?;
    if owner_id != user_id {
        return Err(AppError::Forbidden(
            "This user isn't the owner of the folder/project".to_string(),
        ));
    }
    Ok(project_id)
}

/// File → folder → project → owner chain. Returns the owning folder id.
pub async fn require_file_owner(pool: &SqlitePool, file_id: &str, user_id: &str) -> Result<String> {
    let row = sqlx::query_as::<_, (String, String)>(
        "SELECT fi.folder_id, p.owner_id FROM files fi \
         JOIN folders fo ON fo.id = fi.folder_id \
         JOIN projects p ON p.id = fo.project_id WHERE fi.id = ?",
    )
    .bind(file_id)
    .fetch_optional(pool)
    .await?;
    let (folder_id, owner_id) =
        row.ok_or_else(|| AppError::NotFound("No file found with this fileId".to_string()))?;
    if owner_id != user_id {
        return Err(AppError::Forbidden(
            "This user isn't the owner of the file/project".to_string(),
        ));
    }
    Ok(folder_id)
}
