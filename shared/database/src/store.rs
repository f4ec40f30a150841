//! Store interfaces
//!
//! The ingestion pipeline and the HTTP layer only see these traits; Postgres
//! and the in-process store both implement them.

use async_trait::async_trait;
use uuid::Uuid;

use bankdoc_models::{AccessToken, BankStatement, NewBankStatement, NewUser, User};
use bankdoc_utils::{BankdocResult, ContentHash};

#[async_trait]
pub trait StatementStore: Send + Sync {
    /// Insert one statement. A content hash that is already stored yields
    /// `BankdocError::Duplicate`, whether caught by a lookup or by the
    /// uniqueness constraint.
    async fn insert(&self, statement: NewBankStatement) -> BankdocResult<BankStatement>;

    async fn find_by_hash(&self, content_hash: &ContentHash) -> BankdocResult<Vec<BankStatement>>;

    /// Statements owned by `user_id`, by contract number ascending
    /// (byte order, missing numbers last).
    async fn list_by_owner(&self, user_id: Uuid) -> BankdocResult<Vec<BankStatement>>;

    async fn health_check(&self) -> BankdocResult<()> {
        Ok(())
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// `BankdocError::Conflict` when the email is taken.
    async fn create_user(&self, user: NewUser) -> BankdocResult<User>;

    async fn find_user_by_email(&self, email: &str) -> BankdocResult<Option<User>>;

    async fn find_user_by_id(&self, id: Uuid) -> BankdocResult<Option<User>>;

    /// Removes the user together with its statements and tokens.
    async fn delete_user(&self, id: Uuid) -> BankdocResult<bool>;

    async fn store_token(&self, token: AccessToken) -> BankdocResult<()>;

    async fn find_token(&self, token_hash: &str) -> BankdocResult<Option<AccessToken>>;
}
