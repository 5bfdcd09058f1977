//! Spreadsheets list-feed HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required). Reads use
//! `alt=json`; writes send an Atom entry and ask for the result as JSON.

use std::time::Duration;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use reqwest::blocking::{RequestBuilder, Response};

use crate::api::{FeedApi, Projection, Visibility};
use crate::auth::{client_login, Credentials, DEFAULT_LOGIN_URL};
use crate::error::FeedError;
use crate::model::{Entry, Fields, ListFeed, WorksheetsFeed};

pub const DEFAULT_FEEDS_BASE: &str = "https://spreadsheets.google.com/feeds";
pub const DEFAULT_SOURCE: &str = concat!("gsheet-", env!("CARGO_PKG_VERSION"));

const GDATA_VERSION: &str = "3.0";
const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
const GSX_NS: &str = "http://schemas.google.com/spreadsheets/2006/extended";

/// Endpoints and transport settings.
#[derive(Debug, Clone)]
pub struct FeedClientConfig {
    /// Feeds root, e.g. "https://spreadsheets.google.com/feeds"
    pub feeds_base: String,
    pub login_url: String,
    /// Application name reported at login
    pub source: String,
    pub timeout: Duration,
}

impl Default for FeedClientConfig {
    fn default() -> Self {
        Self {
            feeds_base: DEFAULT_FEEDS_BASE.to_string(),
            login_url: DEFAULT_LOGIN_URL.to_string(),
            source: DEFAULT_SOURCE.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl FeedClientConfig {
    /// Point both the feeds and the login endpoint at one host (tests, proxies).
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            feeds_base: format!("{}/feeds", base),
            login_url: format!("{}/accounts/ClientLogin", base),
            ..Self::default()
        }
    }
}

/// List-feed API client (blocking).
#[derive(Clone)]
pub struct FeedClient {
    http: reqwest::blocking::Client,
    feeds_base: String,
    token: Option<String>,
}

impl std::fmt::Debug for FeedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedClient")
            .field("feeds_base", &self.feeds_base)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl FeedClient {
    /// Client without a login; can only read published spreadsheets.
    pub fn anonymous(config: &FeedClientConfig) -> Result<Self, FeedError> {
        Ok(Self {
            http: build_http(config)?,
            feeds_base: config.feeds_base.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Log in with ClientLogin and keep the token for every later request.
    pub fn login(config: &FeedClientConfig, creds: &Credentials) -> Result<Self, FeedError> {
        let http = build_http(config)?;
        let token = client_login(&http, &config.login_url, creds, &config.source)?;
        Ok(Self {
            http,
            feeds_base: config.feeds_base.trim_end_matches('/').to_string(),
            token: Some(token),
        })
    }

    fn list_url(&self, key: &str, worksheet: &str, visibility: Visibility, projection: Projection) -> String {
        format!(
            "{}/list/{}/{}/{}/{}",
            self.feeds_base, key, worksheet, visibility.as_str(), projection.as_str(),
        )
    }

    // ── Internal helpers ────────────────────────────────────────────

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        let req = req.header("GData-Version", GDATA_VERSION);
        match &self.token {
            Some(token) => req.header("Authorization", format!("GoogleLogin auth={}", token)),
            None => req,
        }
    }

    fn send(&self, req: RequestBuilder) -> Result<Response, FeedError> {
        let response = self.authorize(req).send()?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FeedError::from_status(status, body));
        }

        Ok(response)
    }

    fn get_json(&self, url: &str) -> Result<serde_json::Value, FeedError> {
        log::debug!("GET {}", url);
        let resp = self.send(self.http.get(url).query(&[("alt", "json")]))?;
        resp.json().map_err(|e| FeedError::Parse(e.to_string()))
    }

    fn require_auth(&self) -> Result<(), FeedError> {
        if self.token.is_none() {
            return Err(FeedError::NotAuthenticated);
        }
        Ok(())
    }
}

impl FeedApi for FeedClient {
    fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn list_feed(
        &self,
        key: &str,
        worksheet: &str,
        visibility: Visibility,
        projection: Projection,
    ) -> Result<ListFeed, FeedError> {
        let json = self.get_json(&self.list_url(key, worksheet, visibility, projection))?;
        ListFeed::from_json(&json)
    }

    fn worksheets_feed(
        &self,
        key: &str,
        visibility: Visibility,
        projection: Projection,
    ) -> Result<WorksheetsFeed, FeedError> {
        let url = format!(
            "{}/worksheets/{}/{}/{}",
            self.feeds_base, key, visibility.as_str(), projection.as_str(),
        );
        let json = self.get_json(&url)?;
        WorksheetsFeed::from_json(&json)
    }

    fn insert_row(&self, key: &str, worksheet: &str, fields: &Fields) -> Result<Entry, FeedError> {
        self.require_auth()?;
        let url = self.list_url(key, worksheet, Visibility::Private, Projection::Full);
        log::debug!("POST {}", url);

        let body = atom_entry(None, fields)?;
        let resp = self.send(
            self.http.post(&url)
                .query(&[("alt", "json")])
                .header("Content-Type", "application/atom+xml")
                .body(body),
        )?;

        let json: serde_json::Value = resp.json().map_err(|e| FeedError::Parse(e.to_string()))?;
        Entry::from_response(&json)
    }

    fn update_row(&self, entry: &Entry, fields: &Fields) -> Result<Entry, FeedError> {
        self.require_auth()?;
        let url = edit_url(entry)?;
        log::debug!("PUT {}", url);

        let body = atom_entry(Some(&entry.id), fields)?;
        let resp = self.send(
            self.http.put(url)
                .query(&[("alt", "json")])
                .header("Content-Type", "application/atom+xml")
                .header("If-Match", entry.etag.as_deref().unwrap_or("*"))
                .body(body),
        )?;

        let json: serde_json::Value = resp.json().map_err(|e| FeedError::Parse(e.to_string()))?;
        Entry::from_response(&json)
    }

    fn delete_row(&self, entry: &Entry) -> Result<(), FeedError> {
        self.require_auth()?;
        let url = edit_url(entry)?;
        log::debug!("DELETE {}", url);

        self.send(
            self.http.delete(url)
                .header("If-Match", entry.etag.as_deref().unwrap_or("*")),
        )?;
        Ok(())
    }
}

// ── Free functions ──────────────────────────────────────────────────

fn build_http(config: &FeedClientConfig) -> Result<reqwest::blocking::Client, FeedError> {
    reqwest::blocking::Client::builder()
        .user_agent(config.source.as_str())
        .timeout(config.timeout)
        .build()
        .map_err(|e| FeedError::Network(format!("Failed to create HTTP client: {}", e)))
}

fn xml_err(e: impl std::fmt::Display) -> FeedError {
    FeedError::Parse(format!("failed to build entry XML: {}", e))
}

fn edit_url(entry: &Entry) -> Result<&str, FeedError> {
    entry.edit_url.as_deref().ok_or_else(|| {
        FeedError::Parse(format!("entry {} has no edit link (read from a values feed?)", entry.id))
    })
}

/// Serialize a row as an Atom `<entry>` with one `gsx:` element per column.
fn atom_entry(id: Option<&str>, fields: &Fields) -> Result<String, FeedError> {
    let mut writer = Writer::new(Vec::new());

    let mut root = BytesStart::new("entry");
    root.push_attribute(("xmlns", ATOM_NS));
    root.push_attribute(("xmlns:gsx", GSX_NS));
    writer.write_event(Event::Start(root)).map_err(xml_err)?;

    if let Some(id) = id {
        writer.write_event(Event::Start(BytesStart::new("id"))).map_err(xml_err)?;
        writer.write_event(Event::Text(BytesText::new(id))).map_err(xml_err)?;
        writer.write_event(Event::End(BytesEnd::new("id"))).map_err(xml_err)?;
    }

    for (column, value) in fields {
        let tag = format!("gsx:{}", column);
        writer.write_event(Event::Start(BytesStart::new(tag.as_str()))).map_err(xml_err)?;
        writer.write_event(Event::Text(BytesText::new(value))).map_err(xml_err)?;
        writer.write_event(Event::End(BytesEnd::new(tag.as_str()))).map_err(xml_err)?;
    }

    writer.write_event(Event::End(BytesEnd::new("entry"))).map_err(xml_err)?;

    String::from_utf8(writer.into_inner())
        .map_err(|e| FeedError::Parse(format!("entry XML is not UTF-8: {}", e)))
}
