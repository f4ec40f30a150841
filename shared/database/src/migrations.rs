use anyhow::Result;
use sqlx::PgPool;

use bankdoc_utils::{STATEMENT_HASH_CONSTRAINT, USER_EMAIL_CONSTRAINT};

/// Create the schema if it is missing. Idempotent; there is no versioning.
pub async fn run_postgres_migrations(pool: &PgPool) -> Result<()> {
    tracing::info!("Running PostgreSQL migrations");

    // Create users table
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            email VARCHAR(254) NOT NULL,
            hashed_password TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CONSTRAINT {} UNIQUE (email)
        )
        "#,
        USER_EMAIL_CONSTRAINT
    ))
    .execute(pool)
    .await?;

    // Create access_tokens table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS access_tokens (
            token_hash VARCHAR(64) PRIMARY KEY,
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            issued_at TIMESTAMPTZ NOT NULL,
            expires_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create bank_statements table; content_hash is unique across all owners
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS bank_statements (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            content_hash VARCHAR(64) NOT NULL,
            statement_date TEXT,
            contract_number TEXT,
            account_number TEXT,
            card TEXT,
            branch_of_the_bank TEXT,
            main_currency TEXT,
            period TEXT,
            client_name TEXT,
            transaction TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CONSTRAINT {} UNIQUE (content_hash)
        )
        "#,
        STATEMENT_HASH_CONSTRAINT
    ))
    .execute(pool)
    .await?;

    // Create indexes for better performance
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_bank_statements_user_id ON bank_statements(user_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_access_tokens_user_id ON access_tokens(user_id)")
        .execute(pool)
        .await?;

    tracing::info!("PostgreSQL migrations completed successfully");
    Ok(())
}
