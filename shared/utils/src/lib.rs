pub mod config;
pub mod logging;
pub mod error;
pub mod validation;
pub mod fingerprint;
pub mod credentials;
pub mod statement;

pub use config::*;
pub use logging::*;
pub use error::*;
pub use validation::*;
pub use fingerprint::*;
pub use credentials::*;
pub use statement::*;
