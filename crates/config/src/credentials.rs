// Account credentials
//
// Email/password are resolved per field, in order:
// 1. Explicit value (command line, SheetOptions)
// 2. Environment variables (GSHEET_EMAIL / GSHEET_PASSWORD)
// 3. Settings default_email (email only)
// 4. System keychain, keyed by email (password only)
//
// Passwords are NEVER stored in settings.json

use std::env;

/// Environment variable holding the account email
pub const EMAIL_ENV: &str = "GSHEET_EMAIL";
/// Environment variable holding the account password
pub const PASSWORD_ENV: &str = "GSHEET_PASSWORD";

/// Service name for keychain storage
const KEYCHAIN_SERVICE: &str = "gsheet";

/// Where the password of a resolved login came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Explicit,
    Environment,
    Keychain,
}

impl CredentialSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialSource::Explicit => "explicit",
            CredentialSource::Environment => "environment",
            CredentialSource::Keychain => "keychain",
        }
    }
}

/// A complete email/password pair ready for ClientLogin
#[derive(Clone, PartialEq, Eq)]
pub struct Login {
    pub email: String,
    pub password: String,
    pub source: CredentialSource,
}

impl std::fmt::Debug for Login {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Login")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Resolve a login from explicit values, the environment, and the keychain.
///
/// Returns `None` when no complete pair can be assembled; the caller then
/// works anonymously.
pub fn resolve_login(
    email: Option<&str>,
    password: Option<&str>,
    default_email: Option<&str>,
) -> Option<Login> {
    resolve_login_with(email, password, default_email, env_value, get_password)
}

fn resolve_login_with(
    email: Option<&str>,
    password: Option<&str>,
    default_email: Option<&str>,
    env_lookup: impl Fn(&str) -> Option<String>,
    keychain_lookup: impl Fn(&str) -> Option<String>,
) -> Option<Login> {
    let email = non_empty(email)
        .or_else(|| env_lookup(EMAIL_ENV))
        .or_else(|| non_empty(default_email))?;

    let (password, source) = if let Some(pw) = non_empty(password) {
        (pw, CredentialSource::Explicit)
    } else if let Some(pw) = env_lookup(PASSWORD_ENV) {
        (pw, CredentialSource::Environment)
    } else if let Some(pw) = keychain_lookup(&email) {
        (pw, CredentialSource::Keychain)
    } else {
        log::debug!("no password for {}; continuing anonymously", email);
        return None;
    };

    Some(Login { email, password, source })
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(String::from)
}

fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Look up the stored password for an account in the system keychain
#[cfg(feature = "keychain")]
pub fn get_password(email: &str) -> Option<String> {
    keyring::Entry::new(KEYCHAIN_SERVICE, email)
        .ok()?
        .get_password()
        .ok()
}

#[cfg(not(feature = "keychain"))]
pub fn get_password(_email: &str) -> Option<String> {
    None
}

/// Store an account password in the system keychain
#[cfg(feature = "keychain")]
pub fn set_password(email: &str, password: &str) -> Result<(), String> {
    let entry = keyring::Entry::new(KEYCHAIN_SERVICE, email)
        .map_err(|e| format!("Failed to create keychain entry: {}", e))?;

    entry
        .set_password(password)
        .map_err(|e| format!("Failed to store password in keychain: {}", e))
}

#[cfg(not(feature = "keychain"))]
pub fn set_password(_email: &str, _password: &str) -> Result<(), String> {
    Err(format!("Keychain support not enabled. Set {} instead.", PASSWORD_ENV))
}

/// Delete an account password from the system keychain
#[cfg(feature = "keychain")]
pub fn delete_password(email: &str) -> Result<(), String> {
    let entry = keyring::Entry::new(KEYCHAIN_SERVICE, email)
        .map_err(|e| format!("Failed to access keychain entry: {}", e))?;

    entry
        .delete_credential()
        .map_err(|e| format!("Failed to delete password from keychain: {}", e))
}

#[cfg(not(feature = "keychain"))]
pub fn delete_password(_email: &str) -> Result<(), String> {
    Err("Keychain support not enabled.".to_string())
}

/// Check if keychain support is available
pub fn keychain_available() -> bool {
    #[cfg(feature = "keychain")]
    {
        keyring::Entry::new(KEYCHAIN_SERVICE, "test").is_ok()
    }
    #[cfg(not(feature = "keychain"))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn no_keychain(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_explicit_wins_over_environment() {
        let env = lookup(&[(EMAIL_ENV, "env@example.com"), (PASSWORD_ENV, "env-pw")]);
        let login = resolve_login_with(Some("me@example.com"), Some("pw"), None, env, no_keychain).unwrap();
        assert_eq!(login.email, "me@example.com");
        assert_eq!(login.password, "pw");
        assert_eq!(login.source, CredentialSource::Explicit);
    }

    #[test]
    fn test_environment_fallback() {
        let env = lookup(&[(EMAIL_ENV, "env@example.com"), (PASSWORD_ENV, "env-pw")]);
        let login = resolve_login_with(None, None, None, env, no_keychain).unwrap();
        assert_eq!(login.email, "env@example.com");
        assert_eq!(login.source, CredentialSource::Environment);
    }

    #[test]
    fn test_fields_resolve_independently() {
        // Explicit email, password from the environment
        let env = lookup(&[(PASSWORD_ENV, "env-pw")]);
        let login = resolve_login_with(Some("me@example.com"), None, None, env, no_keychain).unwrap();
        assert_eq!(login.email, "me@example.com");
        assert_eq!(login.password, "env-pw");
    }

    #[test]
    fn test_default_email_and_keychain() {
        let keychain = lookup(&[("saved@example.com", "kc-pw")]);
        let login = resolve_login_with(None, None, Some("saved@example.com"), lookup(&[]), keychain).unwrap();
        assert_eq!(login.email, "saved@example.com");
        assert_eq!(login.password, "kc-pw");
        assert_eq!(login.source, CredentialSource::Keychain);
    }

    #[test]
    fn test_missing_password_is_anonymous() {
        assert!(resolve_login_with(Some("me@example.com"), None, None, lookup(&[]), no_keychain).is_none());
        assert!(resolve_login_with(None, Some("pw"), None, lookup(&[]), no_keychain).is_none());
        assert!(resolve_login_with(Some("  "), Some("pw"), None, lookup(&[]), no_keychain).is_none());
    }

    #[test]
    fn test_debug_redacts_password() {
        let login = Login {
            email: "me@example.com".into(),
            password: "hunter2".into(),
            source: CredentialSource::Explicit,
        };
        assert!(!format!("{:?}", login).contains("hunter2"));
    }
}
