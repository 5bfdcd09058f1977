use crate::error::FeedError;
use crate::model::{Entry, Fields, ListFeed, WorksheetsFeed};

/// Feed visibility segment of a feed URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Requires a login; sees unpublished spreadsheets
    Private,
    /// Anonymous; only published spreadsheets
    Public,
}

impl Visibility {
    pub fn for_auth(authenticated: bool) -> Self {
        if authenticated { Visibility::Private } else { Visibility::Public }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Public => "public",
        }
    }
}

/// Feed projection segment of a feed URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Entries carry edit links and etags
    Full,
    /// Values only, read-only
    Values,
}

impl Projection {
    pub fn for_auth(authenticated: bool) -> Self {
        if authenticated { Projection::Full } else { Projection::Values }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Projection::Full => "full",
            Projection::Values => "values",
        }
    }
}

/// The spreadsheet list-feed API as seen by `gsheet`.
///
/// `FeedClient` talks HTTP; tests substitute an in-memory implementation.
/// Implementations must not retry: every error goes back to the caller as-is.
pub trait FeedApi {
    /// Whether this client carries a login token.
    fn is_authenticated(&self) -> bool;

    /// Fetch every row entry of one worksheet, in sheet order.
    fn list_feed(
        &self,
        key: &str,
        worksheet: &str,
        visibility: Visibility,
        projection: Projection,
    ) -> Result<ListFeed, FeedError>;

    /// Fetch the worksheets (tabs) of a spreadsheet.
    fn worksheets_feed(
        &self,
        key: &str,
        visibility: Visibility,
        projection: Projection,
    ) -> Result<WorksheetsFeed, FeedError>;

    /// Append a row at the end of the worksheet; returns the created entry.
    fn insert_row(&self, key: &str, worksheet: &str, fields: &Fields) -> Result<Entry, FeedError>;

    /// Replace all values of an existing row; returns the server's new entry.
    fn update_row(&self, entry: &Entry, fields: &Fields) -> Result<Entry, FeedError>;

    /// Remove a row.
    fn delete_row(&self, entry: &Entry) -> Result<(), FeedError>;
}
