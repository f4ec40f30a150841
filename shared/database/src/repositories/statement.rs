//! Bank Statement Repository
//!
//! Insert-and-read access to `bank_statements`. Rows are never updated;
//! they disappear only when their owner is deleted.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use bankdoc_models::{BankStatement, NewBankStatement};
use bankdoc_utils::{BankdocError, BankdocResult, ContentHash};

use crate::store::StatementStore;

const STATEMENT_COLUMNS: &str = "id, user_id, content_hash, statement_date, contract_number, \
     account_number, card, branch_of_the_bank, main_currency, period, client_name, \
     transaction, created_at";

pub struct StatementRepository {
    pool: PgPool,
}

impl StatementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatementStore for StatementRepository {
    async fn insert(&self, statement: NewBankStatement) -> BankdocResult<BankStatement> {
        let NewBankStatement {
            user_id,
            content_hash,
            fields,
        } = statement;

        let sql = format!(
            r#"
            INSERT INTO bank_statements
                (id, user_id, content_hash, statement_date, contract_number,
                 account_number, card, branch_of_the_bank, main_currency,
                 period, client_name, transaction)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            STATEMENT_COLUMNS
        );

        sqlx::query_as::<_, BankStatement>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(&content_hash)
            .bind(&fields.statement_date)
            .bind(&fields.contract_number)
            .bind(&fields.account_number)
            .bind(&fields.card)
            .bind(&fields.branch_of_the_bank)
            .bind(&fields.main_currency)
            .bind(&fields.period)
            .bind(&fields.client_name)
            .bind(&fields.transaction)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match BankdocError::from(e) {
                BankdocError::Duplicate { .. } => BankdocError::duplicate(content_hash.clone()),
                other => other,
            })
    }

    async fn find_by_hash(&self, content_hash: &ContentHash) -> BankdocResult<Vec<BankStatement>> {
        let sql = format!(
            "SELECT {} FROM bank_statements WHERE content_hash = $1",
            STATEMENT_COLUMNS
        );

        let rows = sqlx::query_as::<_, BankStatement>(&sql)
            .bind(content_hash.as_str())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn list_by_owner(&self, user_id: Uuid) -> BankdocResult<Vec<BankStatement>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM bank_statements
            WHERE user_id = $1
            ORDER BY contract_number COLLATE "C" ASC NULLS LAST, created_at ASC
            "#,
            STATEMENT_COLUMNS
        );

        let rows = sqlx::query_as::<_, BankStatement>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn health_check(&self) -> BankdocResult<()> {
        crate::postgres::health_check(&self.pool)
            .await
            .map_err(|e| BankdocError::database(e.to_string()))
    }
}
