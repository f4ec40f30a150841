pub mod auth;
pub mod health;
pub mod statements;
pub mod users;

pub use auth::*;
pub use health::*;
pub use statements::*;
pub use users::*;
