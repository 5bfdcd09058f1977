use gsheet_config::ConfigError;
use gsheet_feed::FeedError;
use thiserror::Error;

/// Everything that can go wrong opening or editing a sheet.
///
/// Local checks (URL, readonly, field edits) fail before any request is made.
/// Remote failures are wrapped in [`SheetError::Remote`] unchanged.
#[derive(Debug, Error)]
pub enum SheetError {
    /// URL without an extractable `key=` parameter
    #[error("not a valid spreadsheet url: {0}")]
    InvalidUrl(String),
    /// Neither a URL nor a key was given
    #[error("no spreadsheet key: pass a url containing key=... or an explicit key")]
    MissingKey,
    /// Mutation attempted on a read-only sheet
    #[error("sheet is read-only")]
    ReadOnly,
    /// Operation the row mapping does not support
    #[error("{0}")]
    Unsupported(&'static str),
    /// Assignment to a column the row does not have
    #[error("unknown column '{0}'")]
    UnknownField(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Remote(#[from] FeedError),
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl SheetError {
    /// True for an optimistic-concurrency rejection from the server.
    pub fn is_conflict(&self) -> bool {
        matches!(self, SheetError::Remote(FeedError::Conflict(..)))
    }

    /// True when the server refused access.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, SheetError::Remote(FeedError::Forbidden(_)))
    }
}
