//! Google spreadsheets that read like a dict reader.
//!
//! Open a worksheet from its browser URL (or key), iterate its rows, edit
//! them in place:
//!
//! ```no_run
//! use gsheet::{ClientPool, Sheet, SheetOptions};
//!
//! # fn main() -> Result<(), gsheet::SheetError> {
//! let pool = ClientPool::default();
//! let mut sheet = Sheet::open(
//!     SheetOptions::from_key("tuTazWC8sZ_r0cddKj8qfFg")
//!         .worksheet("od6")
//!         .credentials("foo@example.com", "12345"),
//!     &pool,
//! )?;
//!
//! let mut last = None;
//! while let Some(mut row) = sheet.next() {
//!     if row.get("deleteme").is_some_and(|v| !v.is_empty()) {
//!         row.delete()?;
//!         continue;
//!     }
//!     let hash = format!("{:x}", row["name"].len());
//!     row.set("hash", hash)?;
//!     last = Some(row.copy());
//! }
//!
//! if let Some(data) = last {
//!     sheet.append(&data)?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Remote errors (conflicts, permissions, transport) are returned unchanged;
//! nothing is retried.

mod error;
mod options;
mod pool;
mod row;
mod sheet;
mod url;

#[cfg(test)]
mod memory;

pub use error::SheetError;
pub use options::{SheetOptions, DEFAULT_WORKSHEET};
pub use pool::ClientPool;
pub use row::Row;
pub use sheet::Sheet;
pub use url::{browse_url, parse_key, SheetUrl};

pub use gsheet_feed::{Credentials, Entry, FeedApi, FeedError, Fields};
