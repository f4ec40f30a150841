//! User Repository
//!
//! Accounts and their hashed bearer tokens. Deleting a user cascades to its
//! statements and tokens through foreign keys.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use bankdoc_models::{AccessToken, NewUser, User};
use bankdoc_utils::BankdocResult;

use crate::store::UserStore;

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create_user(&self, user: NewUser) -> BankdocResult<User> {
        let row: User = sqlx::query_as(
            r#"
            INSERT INTO users (id, email, hashed_password)
            VALUES ($1, $2, $3)
            RETURNING id, email, hashed_password
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.hashed_password)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_user_by_email(&self, email: &str) -> BankdocResult<Option<User>> {
        let row: Option<User> = sqlx::query_as(
            "SELECT id, email, hashed_password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_user_by_id(&self, id: Uuid) -> BankdocResult<Option<User>> {
        let row: Option<User> = sqlx::query_as(
            "SELECT id, email, hashed_password FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete_user(&self, id: Uuid) -> BankdocResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn store_token(&self, token: AccessToken) -> BankdocResult<()> {
        sqlx::query(
            r#"
            INSERT INTO access_tokens (token_hash, user_id, issued_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&token.token_hash)
        .bind(token.user_id)
        .bind(token.issued_at)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_token(&self, token_hash: &str) -> BankdocResult<Option<AccessToken>> {
        let row: Option<AccessToken> = sqlx::query_as(
            r#"
            SELECT token_hash, user_id, issued_at, expires_at
            FROM access_tokens
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
