//! Entity structs double as database rows and GraphQL objects; relation
//! subtrees are resolved on demand from the pool in the request context.

use async_graphql::{ComplexObject, Context, Result, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, SimpleObject)]
#[graphql(complex)]
pub struct User {
    pub id: String,
    pub email: String,
    pub pseudo: String,
    #[serde(skip_serializing)]
    #[graphql(skip)]
    pub password_hash: String,
    pub premium: bool,
    pub daily_runs: i64,
    pub created_at: DateTime<Utc>,
}

#[ComplexObject]
impl User {
    async fn projects(&self, ctx: &Context<'_>) -> Result<Vec<Project>> {
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE owner_id = ? ORDER BY created_at DESC",
        )
        .bind(&self.id)
        .fetch_all(pool)
        .await?)
    }

    async fn likes(&self, ctx: &Context<'_>) -> Result<Vec<Like>> {
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(
            sqlx::query_as::<_, Like>("SELECT * FROM likes WHERE user_id = ?")
                .bind(&self.id)
                .fetch_all(pool)
                .await?,
        )
    }

    async fn comments(&self, ctx: &Context<'_>) -> Result<Vec<Comment>> {
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE author_id = ? ORDER BY created_at DESC",
        )
        .bind(&self.id)
        .fetch_all(pool)
        .await?)
    }

    async fn reports(&self, ctx: &Context<'_>) -> Result<Vec<Report>> {
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(
            sqlx::query_as::<_, Report>("SELECT * FROM reports WHERE reporter_id = ?")
                .bind(&self.id)
                .fetch_all(pool)
                .await?,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, SimpleObject)]
#[graphql(complex)]
pub struct Project {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[ComplexObject]
impl Project {
    async fn owner(&self, ctx: &Context<'_>) -> Result<User> {
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(&self.owner_id)
            .fetch_one(pool)
            .await?)
    }

    async fn folders(&self, ctx: &Context<'_>) -> Result<Vec<Folder>> {
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(
            sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE project_id = ?")
                .bind(&self.id)
                .fetch_all(pool)
                .await?,
        )
    }

    async fn likes(&self, ctx: &Context<'_>) -> Result<Vec<Like>> {
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(
            sqlx::query_as::<_, Like>("SELECT * FROM likes WHERE project_id = ?")
                .bind(&self.id)
                .fetch_all(pool)
                .await?,
        )
    }

    async fn comments(&self, ctx: &Context<'_>) -> Result<Vec<Comment>> {
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE project_id = ? ORDER BY created_at DESC",
        )
        .bind(&self.id)
        .fetch_all(pool)
        .await?)
    }

    async fn reports(&self, ctx: &Context<'_>) -> Result<Vec<Report>> {
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(
            sqlx::query_as::<_, Report>("SELECT * FROM reports WHERE project_id = ?")
                .bind(&self.id)
                .fetch_all(pool)
                .await?,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, SimpleObject)]
#[graphql(complex)]
pub struct Folder {
    pub id: String,
    pub project_id: String,
    pub parent_id: Option<String>,
    pub name: String,
}

#[ComplexObject]
impl Folder {
    async fn files(&self, ctx: &Context<'_>) -> Result<Vec<File>> {
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(
            sqlx::query_as::<_, File>("SELECT * FROM files WHERE folder_id = ? ORDER BY name ASC")
                .bind(&self.id)
                .fetch_all(pool)
                .await?,
        )
    }

    async fn parent_folder(&self, ctx: &Context<'_>) -> Result<Option<Folder>> {
        let Some(parent_id) = &self.parent_id else {
            return Ok(None);
        };
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(
            sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = ?")
                .bind(parent_id)
                .fetch_optional(pool)
                .await?,
        )
    }

    async fn child_folders(&self, ctx: &Context<'_>) -> Result<Vec<Folder>> {
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(
            sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE parent_id = ?")
                .bind(&self.id)
                .fetch_all(pool)
                .await?,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, SimpleObject)]
#[graphql(complex)]
pub struct File {
    pub id: String,
    pub folder_id: String,
    pub name: String,
    pub extension: String,
    pub content: String,
}

#[ComplexObject]
impl File {
    async fn folder(&self, ctx: &Context<'_>) -> Result<Folder> {
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(
            sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = ?")
                .bind(&self.folder_id)
                .fetch_one(pool)
                .await?,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, SimpleObject)]
#[graphql(complex)]
pub struct Like {
    pub id: String,
    pub user_id: String,
    pub project_id: String,
    pub created_at: DateTime<Utc>,
}

#[ComplexObject]
impl Like {
    async fn user(&self, ctx: &Context<'_>) -> Result<User> {
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(&self.user_id)
            .fetch_one(pool)
            .await?)
    }

    async fn project(&self, ctx: &Context<'_>) -> Result<Project> {
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(
            sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
                .bind(&self.project_id)
                .fetch_one(pool)
                .await?,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, SimpleObject)]
#[graphql(complex)]
pub struct Comment {
    pub id: String,
    pub author_id: String,
    pub project_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[ComplexObject]
impl Comment {
    async fn author(&self, ctx: &Context<'_>) -> Result<User> {
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(&self.author_id)
            .fetch_one(pool)
            .await?)
    }

    async fn project(&self, ctx: &Context<'_>) -> Result<Project> {
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(
            sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
                .bind(&self.project_id)
                .fetch_one(pool)
                .await?,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, SimpleObject)]
#[graphql(complex)]
pub struct Report {
    pub id: String,
    pub reporter_id: String,
    pub project_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[ComplexObject]
impl Report {
    async fn reporter(&self, ctx: &Context<'_>) -> Result<User> {
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(&self.reporter_id)
            .fetch_one(pool)
            .await?)
    }

    async fn project(&self, ctx: &Context<'_>) -> Result<Project> {
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(
            sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
                .bind(&self.project_id)
                .fetch_one(pool)
                .await?,
        )
    }
}
