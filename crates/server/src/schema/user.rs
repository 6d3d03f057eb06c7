use async_graphql::{Context, Object, Result, SimpleObject};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    auth::{self, require_user},
    config::Config,
    db::models::User,
    error::AppError,
    validate,
};

const INVALID_PASSWORD: &str = "Invalid password: must be one uppercase letter, one lowercase \
     letter and one number. Be at min 8 and max 25 characters long. Accept special character.";

#[derive(SimpleObject)]
pub struct TokenWithUser {
    pub token: String,
    pub user: User,
}

async fn fetch_user(pool: &SqlitePool, id: &str) -> Result<User, AppError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found...".to_string()))
}

// UNIQUE backstop behind the pre-checks; names the field that collided
fn saving_user(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            if db.message().contains("users.pseudo") {
                AppError::Conflict("Pseudo already used".to_string())
            } else {
                AppError::Conflict("Email already used".to_string())
            }
        }
        _ => AppError::Internal("Error while saving user".to_string()),
    }
}

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    async fn get_all_users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        require_user(ctx)?;
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(
            sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at ASC")
                .fetch_all(pool)
                .await?,
        )
    }

    async fn get_one_user(&self, ctx: &Context<'_>, id: String) -> Result<User> {
        require_user(ctx)?;
        let pool = ctx.data_unchecked::<SqlitePool>();
        Ok(fetch_user(pool, &id).await?)
    }

    async fn get_token_with_user(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> Result<TokenWithUser> {
        let pool = ctx.data_unchecked::<SqlitePool>();
        let config = ctx.data_unchecked::<Config>();

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email.to_lowercase())
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound("No user matches with this email...".to_string()))?;

        if !auth::verify_password(&password, &user.password_hash)? {
            return Err(AppError::Forbidden("Wrong password for this user".to_string()).into());
        }

        let token = auth::sign_token(&user.id, &user.email, &config.jwt_secret)?;
        Ok(TokenWithUser { token, user })
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
        pseudo: String,
    ) -> Result<TokenWithUser> {
        let pool = ctx.data_unchecked::<SqlitePool>();
        let config = ctx.data_unchecked::<Config>();

        if !validate::email(&email) {
            return Err(AppError::Validation("Invalid email".to_string()).into());
        }
        if !validate::password(&password) {
            return Err(AppError::Validation(INVALID_PASSWORD.to_string()).into());
        }
        if !validate::pseudo(&pseudo) {
            return Err(
                AppError::Validation("Invalid pseudo: only letters and numbers".to_string()).into(),
            );
        }

        let email = email.to_lowercase();

        let email_taken = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(&email)
            .fetch_one(pool)
            .await?;
        if email_taken > 0 {
            return Err(AppError::Conflict("Email already used".to_string()).into());
        }

        let pseudo_taken =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE pseudo = ?")
                .bind(&pseudo)
                .fetch_one(pool)
                .await?;
        if pseudo_taken > 0 {
            return Err(AppError::Conflict("Pseudo already used".to_string()).into());
        }

        let password_hash = auth::hash_password(&password)?;
        let user_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO users (id, email, pseudo, password_hash, premium, daily_runs, created_at) \
             VALUES (?, ?, ?, ?, 0, 0, ?)",
        )
        .bind(&user_id)
        .bind(&email)
        .bind(&pseudo)
        .bind(&password_hash)
        .bind(now)
        .execute(pool)
        .await
        .map_err(saving_user)?;

        let token = auth::sign_token(&user_id, &email, &config.jwt_secret)?;
        let user = fetch_user(pool, &user_id).await?;
        Ok(TokenWithUser { token, user })
    }

    async fn modify_user(
        &self,
        ctx: &Context<'_>,
        email: Option<String>,
        password: Option<String>,
        pseudo: Option<String>,
    ) -> Result<TokenWithUser> {
        // Identity comes from the context, never from an argument
        let caller = require_user(ctx)?.clone();
        let pool = ctx.data_unchecked::<SqlitePool>();
        let config = ctx.data_unchecked::<Config>();

        let mut user = fetch_user(pool, &caller.id).await?;

        if let Some(pseudo) = pseudo {
            if !validate::pseudo(&pseudo) {
                return Err(AppError::Validation(
                    "Invalid pseudo: only letters and numbers".to_string(),
                )
                .into());
            }
            user.pseudo = pseudo;
        }
        if let Some(password) = password {
            if !validate::password(&password) {
                return Err(AppError::Validation(INVALID_PASSWORD.to_string()).into());
            }
            user.password_hash = auth::hash_password(&password)?;
        }
        if let Some(email) = email {
            if !validate::email(&email) {
                return Err(AppError::Validation("Invalid email".to_string()).into());
            }
            user.email = email.to_lowercase();
        }

        sqlx::query("UPDATE users SET email = ?, pseudo = ?, password_hash = ? WHERE id = ?")
            .bind(&user.email)
            .bind(&user.pseudo)
            .bind(&user.password_hash)
            .bind(&user.id)
            .execute(pool)
            .await
            .map_err(|e| {
                AppError::saving(
                    e,
                    "Email or pseudo already used",
                    "Error while saving new data on this user",
                )
            })?;

        let token = auth::sign_token(&user.id, &user.email, &config.jwt_secret)?;
        Ok(TokenWithUser { token, user })
    }

    async fn delete_user(&self, ctx: &Context<'_>) -> Result<String> {
        let caller = require_user(ctx)?.clone();
        let pool = ctx.data_unchecked::<SqlitePool>();

        // Confirm the row still exists before deleting
        fetch_user(pool, &caller.id).await?;

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(&caller.id)
            .execute(pool)
            .await
            .map_err(|_| AppError::Internal("Error while deleting user".to_string()))?;

        Ok("User deleted".to_string())
    }
}
