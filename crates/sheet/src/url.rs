//! Spreadsheet URL parsing.
//!
//! Accepts the browser URL of a spreadsheet, e.g.
//! `https://docs.google.com/spreadsheet/ccc?key=0AqSs84L...#gid=2`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::SheetError;
use crate::options::SheetOptions;

static KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"key=([0-9A-Za-z_\-]+)").unwrap());
static GID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#gid=(\d+)").unwrap());

/// Key and worksheet index found in a spreadsheet URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetUrl {
    pub key: String,
    /// Position of the worksheet in the worksheets feed (`#gid=N`)
    pub worksheet_index: Option<usize>,
}

impl SheetUrl {
    pub fn parse(url: &str) -> Result<Self, SheetError> {
        let key = KEY_RE
            .captures(url)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| SheetError::InvalidUrl(url.to_string()))?;

        let worksheet_index = GID_RE
            .captures(url)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok());

        Ok(Self { key, worksheet_index })
    }

    /// Target of a set of options: the URL when given, else the bare key.
    /// Purely local, so callers run it before logging in.
    pub(crate) fn resolve(options: &SheetOptions) -> Result<Self, SheetError> {
        if let Some(url) = options.url.as_deref() {
            return Self::parse(url);
        }
        match options.key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(Self { key: key.to_string(), worksheet_index: None }),
            _ => Err(SheetError::MissingKey),
        }
    }
}

/// Extract just the spreadsheet key from a URL.
pub fn parse_key(url: &str) -> Result<String, SheetError> {
    SheetUrl::parse(url).map(|u| u.key)
}

/// Browser link for a key, used when the feed carries no html link.
pub fn browse_url(key: &str) -> String {
    format!("https://docs.google.com/spreadsheet/ccc?key={}", key)
}
