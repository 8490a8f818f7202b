pub mod config;
pub mod credentials;

pub use config::Config;
pub use credentials::{CredentialError, InstalledSecret, StoredToken, TokenStorage};
