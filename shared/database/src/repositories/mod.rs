//! Repository module for database access
//!
//! Postgres repositories plus the in-process store, all behind the traits in
//! [`crate::store`].

pub mod statement;
pub mod user;
pub mod memory;

pub use statement::StatementRepository;
pub use user::UserRepository;
pub use memory::MemoryStore;
