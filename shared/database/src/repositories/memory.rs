//! In-process store
//!
//! Keeps users, tokens and statements behind one lock so the uniqueness and
//! cascade rules hold exactly as they do in Postgres. Used by tests and by the
//! `memory` database backend.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use bankdoc_models::{AccessToken, BankStatement, NewBankStatement, NewUser, User};
use bankdoc_utils::{BankdocError, BankdocResult, ContentHash};

use crate::store::{StatementStore, UserStore};

#[derive(Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    tokens: HashMap<String, AccessToken>,
    statements: Vec<BankStatement>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn statement_count(&self) -> usize {
        self.state.read().await.statements.len()
    }
}

#[async_trait]
impl StatementStore for MemoryStore {
    async fn insert(&self, statement: NewBankStatement) -> BankdocResult<BankStatement> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&statement.user_id) {
            return Err(BankdocError::database(format!(
                "owner {} does not exist",
                statement.user_id
            )));
        }

        if state
            .statements
            .iter()
            .any(|existing| existing.content_hash == statement.content_hash)
        {
            return Err(BankdocError::duplicate(statement.content_hash));
        }

        let record = BankStatement::from_new(statement);
        state.statements.push(record.clone());
        Ok(record)
    }

    async fn find_by_hash(&self, content_hash: &ContentHash) -> BankdocResult<Vec<BankStatement>> {
        let state = self.state.read().await;
        Ok(state
            .statements
            .iter()
            .filter(|s| s.content_hash == content_hash.as_str())
            .cloned()
            .collect())
    }

    async fn list_by_owner(&self, user_id: Uuid) -> BankdocResult<Vec<BankStatement>> {
        let state = self.state.read().await;
        let mut owned: Vec<BankStatement> = state
            .statements
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();

        owned.sort_by(|a, b| {
            (a.contract_number.is_none(), &a.contract_number, a.created_at)
                .cmp(&(b.contract_number.is_none(), &b.contract_number, b.created_at))
        });
        Ok(owned)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> BankdocResult<User> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.email == user.email) {
            return Err(BankdocError::conflict("Email is already registered"));
        }

        let record = User {
            id: Uuid::new_v4(),
            email: user.email,
            hashed_password: user.hashed_password,
        };
        state.users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_user_by_email(&self, email: &str) -> BankdocResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> BankdocResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn delete_user(&self, id: Uuid) -> BankdocResult<bool> {
        let mut state = self.state.write().await;
        let removed = state.users.remove(&id).is_some();
        if removed {
            state.statements.retain(|s| s.user_id != id);
            state.tokens.retain(|_, t| t.user_id != id);
        }
        Ok(removed)
    }

    async fn store_token(&self, token: AccessToken) -> BankdocResult<()> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&token.user_id) {
            return Err(BankdocError::database(format!(
                "owner {} does not exist",
                token.user_id
            )));
        }
        state.tokens.insert(token.token_hash.clone(), token);
        Ok(())
    }

    async fn find_token(&self, token_hash: &str) -> BankdocResult<Option<AccessToken>> {
        Ok(self.state.read().await.tokens.get(token_hash).cloned())
    }
}
