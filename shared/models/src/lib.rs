//! # Bankdoc Core Domain Models
//!
//! Domain records for the bank statement intake service. Rows map onto the
//! Postgres schema through `sqlx::FromRow`; request and response bodies are
//! plain serde types.
//!
//! ## Key Models
//!
//! - **User**: account with a unique email and an argon2 password hash
//! - **AccessToken**: hashed bearer token tied to a user
//! - **BankStatement**: one accepted statement, keyed by its content hash
//! - **StatementFields**: the values sliced out of a statement's text
//! - **ProcessStatementResponse**: the success-or-error upload envelope

pub mod user;
pub mod statement;
pub mod responses;


pub use user::*;
pub use statement::*;
pub use responses::*;
