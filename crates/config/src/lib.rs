// Configuration loading

pub mod credentials;
pub mod settings;

pub use credentials::{resolve_login, CredentialSource, Login};
pub use settings::{ConfigError, Settings};
