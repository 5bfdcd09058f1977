//! Feed model and the GData JSON (`alt=json`) decoding.
//!
//! Row values arrive as `gsx$<column>` members of each entry:
//!
//! ```text
//! {"feed": {"title": {"$t": "Sheet1"},
//!           "entry": [{"id": {"$t": ".../cokwr"},
//!                      "gd$etag": "\"W0MHRE...\"",
//!                      "link": [{"rel": "edit", "href": ".../cokwr/2nd6"}],
//!                      "gsx$name": {"$t": "A"}}]}}
//! ```
//!
//! Column order is the member order of the entry object, so serde_json must be
//! built with `preserve_order`.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::FeedError;

/// Column name → cell text, in column order.
pub type Fields = IndexMap<String, String>;

const FIELD_PREFIX: &str = "gsx$";

/// One row of a list feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: String,
    /// Concurrency token; sent back as `If-Match` on update/delete
    pub etag: Option<String>,
    /// Only present in the `full` projection
    pub edit_url: Option<String>,
    pub fields: Fields,
}

/// Rows of one worksheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFeed {
    /// Worksheet title
    pub title: String,
    /// Browser link to the spreadsheet
    pub html_url: Option<String>,
    pub entries: Vec<Entry>,
}

/// One worksheet (tab) of a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worksheet {
    /// Short id used in feed URLs (e.g. "od6")
    pub id: String,
    pub title: String,
}

/// Worksheets of a spreadsheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorksheetsFeed {
    /// Spreadsheet display name
    pub title: String,
    pub entries: Vec<Worksheet>,
}

impl ListFeed {
    pub(crate) fn from_json(json: &Value) -> Result<Self, FeedError> {
        let feed = json.get("feed")
            .ok_or_else(|| FeedError::Parse("Missing feed in response".into()))?;

        let entries = feed_entries(feed)?
            .iter()
            .map(Entry::from_json)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            title: text(&feed["title"]).unwrap_or_default().to_string(),
            html_url: link_href(feed, "alternate").map(String::from),
            entries,
        })
    }
}

impl WorksheetsFeed {
    pub(crate) fn from_json(json: &Value) -> Result<Self, FeedError> {
        let feed = json.get("feed")
            .ok_or_else(|| FeedError::Parse("Missing feed in response".into()))?;

        let entries = feed_entries(feed)?
            .iter()
            .map(|e| {
                let id = text(&e["id"])
                    .and_then(|id| id.rsplit('/').next())
                    .filter(|id| !id.is_empty())
                    .ok_or_else(|| FeedError::Parse("Missing id in worksheet entry".into()))?;
                Ok(Worksheet {
                    id: id.to_string(),
                    title: text(&e["title"]).unwrap_or_default().to_string(),
                })
            })
            .collect::<Result<Vec<_>, FeedError>>()?;

        Ok(Self {
            title: text(&feed["title"]).unwrap_or_default().to_string(),
            entries,
        })
    }

    /// `(id, title)` pairs in tab order.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.entries.iter().map(|w| (w.id.clone(), w.title.clone())).collect()
    }
}

impl Entry {
    pub(crate) fn from_json(e: &Value) -> Result<Self, FeedError> {
        let id = text(&e["id"])
            .ok_or_else(|| FeedError::Parse("Missing id in entry".into()))?
            .to_string();

        let mut fields = Fields::new();
        if let Some(obj) = e.as_object() {
            for (key, value) in obj {
                if let Some(column) = key.strip_prefix(FIELD_PREFIX) {
                    fields.insert(column.to_string(), text(value).unwrap_or_default().to_string());
                }
            }
        }

        Ok(Self {
            id,
            etag: e["gd$etag"].as_str().map(String::from),
            edit_url: link_href(e, "edit").map(String::from),
            fields,
        })
    }

    /// Decode a single-entry response (`{"entry": {...}}`), as returned by
    /// insert and update.
    pub(crate) fn from_response(json: &Value) -> Result<Self, FeedError> {
        let entry = json.get("entry")
            .ok_or_else(|| FeedError::Parse("Missing entry in response".into()))?;
        Self::from_json(entry)
    }
}

/// `feed.entry` is absent on an empty worksheet.
fn feed_entries(feed: &Value) -> Result<&[Value], FeedError> {
    match feed.get("entry") {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(FeedError::Parse("feed.entry is not an array".into())),
    }
}

fn text(v: &Value) -> Option<&str> {
    v["$t"].as_str()
}

fn link_href<'a>(v: &'a Value, rel: &str) -> Option<&'a str> {
    v["link"].as_array()?
        .iter()
        .find(|l| l["rel"].as_str() == Some(rel))
        .and_then(|l| l["href"].as_str())
}
