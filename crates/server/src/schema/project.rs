use async_graphql::{Context, Enum, Object, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    auth::require_user,
    db::{models::Project, ownership},
    error::AppError,
};

/// Seed file created with every new project.
const SEED_FILE_NAME: &str = "index";
const SEED_FILE_EXTENSION: &str = "js";
const SEED_FILE_CONTENT: &str = "console.log('Hello World')";

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
pub enum ProjectOrderBy {
    CreatedAt,
    Likes,
    Comments,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
pub enum SortOrder {
    Asc,
    Desc,
}

async fn fetch_project(pool: &SqlitePool, id: &str) -> Result<Project, AppError> {
    sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))
}

async fn user_exists(pool: &SqlitePool, user_id: &str) -> Result<(), AppError> {
    let found = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    if found == 0 {
        return Err(AppError::NotFound("User not found...".to_string()));
    }
    Ok(())
}

#[derive(Default)]
pub struct ProjectQuery;

#[Object]
impl ProjectQuery {
    async fn get_all_projects(&self, ctx: &Context<'_>) -> Result<Vec<Project>> {
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(
            sqlx::query_as::<_, Project>("SELECT * FROM projects ORDER BY created_at DESC")
                .fetch_all(pool)
                .await?,
        )
    }

    /// Public projects only, paginated, ordered by creation date or by
    /// aggregate like/comment count.
    async fn get_shared_projects(
        &self,
        ctx: &Context<'_>,
        limit: i64,
        offset: i64,
        order_by: Option<ProjectOrderBy>,
        order: Option<SortOrder>,
        user_search: Option<String>,
        project_name: Option<String>,
    ) -> Result<Vec<Project>> {
        let pool = ctx.data_unchecked::<SqlitePool>();

        // SQLite treats a negative LIMIT as unbounded
        if limit < 0 || offset < 0 {
            return Err(
                AppError::Validation("limit and offset must not be negative".to_string()).into(),
            );
        }

        let order_expr = match order_by.unwrap_or(ProjectOrderBy::CreatedAt) {
            ProjectOrderBy::CreatedAt => "p.created_at",
            ProjectOrderBy::Likes => "COUNT(DISTINCT l.id)",
            ProjectOrderBy::Comments => "COUNT(DISTINCT c.id)",
        };
        let direction = match order.unwrap_or(SortOrder::Asc) {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };

        let mut sql = String::from(
            "SELECT p.id, p.owner_id, p.name, p.description, p.is_public, \
             p.created_at, p.updated_at \
             FROM projects p \
             JOIN users u ON u.id = p.owner_id \
             LEFT JOIN likes l ON l.project_id = p.id \
             LEFT JOIN comments c ON c.project_id = p.id \
             WHERE p.is_public = 1",
        );
        if user_search.is_some() {
            sql.push_str(" AND u.pseudo = ?");
        }
        if project_name.is_some() {
            sql.push_str(" AND p.name LIKE ?");
        }
        sql.push_str(&format!(
            " GROUP BY p.id ORDER BY {order_expr} {direction} LIMIT ? OFFSET ?"
        ));

        let mut query = sqlx::query_as::<_, Project>(&sql);
        if let Some(pseudo) = &user_search {
            query = query.bind(pseudo);
        }
        if let Some(name) = &project_name {
            query = query.bind(format!("%{name}%"));
        }
        Ok(query.bind(limit).bind(offset).fetch_all(pool).await?)
    }

    async fn get_one_project(&self, ctx: &Context<'_>, id: String) -> Result<Project> {
        require_user(ctx)?;
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(fetch_project(pool, &id).await?)
    }

    async fn get_projects_by_user_id(
        &self,
        ctx: &Context<'_>,
        user_id: String,
    ) -> Result<Vec<Project>> {
        require_user(ctx)?;
        let pool = ctx.data_unchecked::<SqlitePool>();
        user_exists(pool, &user_id).await?;
        Ok(sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE owner_id = ? ORDER BY created_at DESC",
        )
        .bind(&user_id)
        .fetch_all(pool)
        .await?)
    }

    /// Projects the given user has liked.
    async fn get_projects_supported(
        &self,
        ctx: &Context<'_>,
        user_id: String,
    ) -> Result<Vec<Project>> {
        require_user(ctx)?;
        let pool = ctx.data_unchecked::<SqlitePool>();
        user_exists(pool, &user_id).await?;
        Ok(sqlx::query_as::<_, Project>(
            "SELECT p.* FROM projects p \
             JOIN likes l ON l.project_id = p.id \
             WHERE l.user_id = ? ORDER BY l.created_at DESC",
        )
        .bind(&user_id)
        .fetch_all(pool)
        .await?)
    }
}

#[derive(Default)]
pub struct ProjectMutation;

#[Object]
impl ProjectMutation {
    async fn create_project(
        &self,
        ctx: &Context<'_>,
        is_public: bool,
        name: String,
        description: String,
    ) -> Result<Project> {
        let caller = require_user(ctx)?.clone();
        let pool = ctx.data_unchecked::<SqlitePool>();

        if name.is_empty() {
            return Err(AppError::Validation("No empty project name".to_string()).into());
        }
        if description.is_empty() {
            return Err(AppError::Validation("No empty project description".to_string()).into());
        }

        let duplicate = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM projects WHERE owner_id = ? AND name = ?",
        )
        .bind(&caller.id)
        .bind(&name)
        .fetch_one(pool)
        .await?;
        if duplicate > 0 {
            return Err(AppError::Conflict(
                "Project with same user and same name already exists".to_string(),
            )
            .into());
        }

        let project_id = Uuid::new_v4().to_string();
        let folder_id = Uuid::new_v4().to_string();
        let file_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        // Project, root folder and seed file are created atomically
        let save = |e| {
            AppError::saving(
                e,
                "Project with same user and same name already exists",
                "Error while saving new project",
            )
        };
        let mut tx = pool.begin().await.map_err(AppError::from)?;
        sqlx::query(
            "INSERT INTO projects (id, owner_id, name, description, is_public, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&project_id)
        .bind(&caller.id)
        .bind(&name)
        .bind(&description)
        .bind(is_public)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(save)?;

        sqlx::query("INSERT INTO folders (id, project_id, parent_id, name) VALUES (?, ?, NULL, ?)")
            .bind(&folder_id)
            .bind(&project_id)
            .bind(&name)
            .execute(&mut *tx)
            .await
            .map_err(save)?;

        sqlx::query(
            "INSERT INTO files (id, folder_id, name, extension, content) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&file_id)
        .bind(&folder_id)
        .bind(SEED_FILE_NAME)
        .bind(SEED_FILE_EXTENSION)
        .bind(SEED_FILE_CONTENT)
        .execute(&mut *tx)
        .await
        .map_err(save)?;

        tx.commit().await.map_err(AppError::from)?;

        Ok(fetch_project(pool, &project_id).await?)
    }

    async fn modify_project(
        &self,
        ctx: &Context<'_>,
        id: String,
        name: Option<String>,
        description: Option<String>,
        is_public: Option<bool>,
    ) -> Result<Project> {
        let caller = require_user(ctx)?.clone();
        let pool = ctx.data_unchecked::<SqlitePool>();

        if name.is_none() && description.is_none() && is_public.is_none() {
            return Err(AppError::Validation(format!(
                "No change, specify argument to change for the project {id}"
            ))
            .into());
        }
        if name.as_deref() == Some("") {
            return Err(AppError::Validation("No empty project name".to_string()).into());
        }
        if description.as_deref() == Some("") {
            return Err(AppError::Validation("No empty project description".to_string()).into());
        }

        ownership::require_project_owner(pool, &id, &caller.id).await?;
        let mut project = fetch_project(pool, &id).await?;

        if let Some(is_public) = is_public {
            project.is_public = is_public;
        }
        if let Some(description) = description {
            project.description = description;
        }
        let renamed = name.is_some();
        if let Some(name) = name {
            project.name = name;
        }
        project.updated_at = Utc::now();

        // The project row and its root folder's name move together
        let mut tx = pool.begin().await.map_err(AppError::from)?;
        sqlx::query(
            "UPDATE projects SET name = ?, description = ?, is_public = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.is_public)
        .bind(project.updated_at)
        .bind(&project.id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::saving(
                e,
                "Project with same user and same name already exists",
                "Error while saving modifications of projects",
            )
        })?;

        if renamed {
            sqlx::query("UPDATE folders SET name = ? WHERE project_id = ? AND parent_id IS NULL")
                .bind(&project.name)
                .bind(&project.id)
                .execute(&mut *tx)
                .await
                .map_err(|_| {
                    AppError::Internal("Error while saving modifications of projects".to_string())
                })?;
        }
        tx.commit().await.map_err(AppError::from)?;

        Ok(project)
    }

    async fn delete_project(&self, ctx: &Context<'_>, id: String) -> Result<String> {
        let caller = require_user(ctx)?.clone();
        let pool = ctx.data_unchecked::<SqlitePool>();

        ownership::require_project_owner(pool, &id, &caller.id).await?;

        sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(&id)
            .execute(pool)
            .await
            .map_err(|_| AppError::Internal("Error while deleting project".to_string()))?;

        Ok("Project deleted".to_string())
    }
}
