//! ClientLogin — trade an email/password for a GoogleLogin token.
//!
//! The token is kept in memory only; a new process logs in again.

use crate::error::FeedError;

pub const DEFAULT_LOGIN_URL: &str = "https://www.google.com/accounts/ClientLogin";

/// Service name of the spreadsheets API in ClientLogin.
pub const LOGIN_SERVICE: &str = "wise";

/// Account credentials for ClientLogin.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Log in and return the `Auth=` token.
pub fn client_login(
    http: &reqwest::blocking::Client,
    login_url: &str,
    creds: &Credentials,
    source: &str,
) -> Result<String, FeedError> {
    log::debug!("ClientLogin for {}", creds.email);

    let response = http.post(login_url)
        .form(&[
            ("accountType", "HOSTED_OR_GOOGLE"),
            ("Email", creds.email.as_str()),
            ("Passwd", creds.password.as_str()),
            ("service", LOGIN_SERVICE),
            ("source", source),
        ])
        .send()?;

    let status = response.status().as_u16();
    let body = response.text().unwrap_or_default();

    if !(200..300).contains(&status) {
        // Failures come back as 403 with "Error=BadAuthentication"
        let reason = response_value(&body, "Error").unwrap_or(body.as_str());
        return Err(FeedError::Auth(format!("{} ({})", reason, status)));
    }

    response_value(&body, "Auth")
        .map(String::from)
        .ok_or_else(|| FeedError::Parse("Missing Auth in ClientLogin response".into()))
}

/// Find `name=value` in a ClientLogin line-oriented response body.
fn response_value<'a>(body: &'a str, name: &str) -> Option<&'a str> {
    body.lines()
        .filter_map(|line| line.split_once('='))
        .find(|(k, _)| k.trim() == name)
        .map(|(_, v)| v.trim())
}
