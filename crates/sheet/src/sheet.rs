//! A worksheet as an iterator of rows.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use gsheet_feed::{Entry, FeedApi, Fields, ListFeed, Projection, Visibility, WorksheetsFeed};

use crate::error::SheetError;
use crate::options::SheetOptions;
use crate::pool::ClientPool;
use crate::row::Row;
use crate::url::{browse_url, SheetUrl};

/// State every [`Row`] of a sheet shares with it.
///
/// `entries` is the cached feed. Rows write the server's answer back into it,
/// so the sheet's snapshot follows every save and delete.
pub(crate) struct SheetContext {
    pub(crate) client: Rc<dyn FeedApi>,
    readonly: Cell<bool>,
    pub(crate) deferred_save: bool,
    entries: RefCell<Vec<Entry>>,
    cursor: Cell<usize>,
}

impl SheetContext {
    pub(crate) fn is_readonly(&self) -> bool {
        self.readonly.get()
    }

    /// Replace the cached entry with the same id.
    pub(crate) fn store(&self, entry: &Entry) {
        if let Some(cached) = self.entries.borrow_mut().iter_mut().find(|e| e.id == entry.id) {
            *cached = entry.clone();
        }
    }

    /// Drop a deleted entry from the cache. The cursor moves back when the
    /// entry was already yielded, so no unvisited row is skipped.
    pub(crate) fn forget(&self, id: &str) {
        let mut entries = self.entries.borrow_mut();
        if let Some(index) = entries.iter().position(|e| e.id == id) {
            entries.remove(index);
            if index < self.cursor.get() {
                self.cursor.set(self.cursor.get() - 1);
            }
        }
    }
}

/// One worksheet of a Google spreadsheet, read through its list feed.
///
/// The rows are fetched once when the sheet is opened. `Sheet` is itself a
/// single-pass iterator over them: once exhausted it yields nothing more until
/// [`Sheet::refresh`] fetches the feed again.
///
/// ```no_run
/// use gsheet::{ClientPool, Sheet, SheetOptions};
///
/// # fn main() -> Result<(), gsheet::SheetError> {
/// let pool = ClientPool::default();
/// let sheet = Sheet::open(
///     SheetOptions::from_url("https://docs.google.com/spreadsheet/ccc?key=0AqSs84LBQ21#gid=0"),
///     &pool,
/// )?;
/// for mut row in sheet {
///     let upper = row["name"].to_uppercase();
///     row.set("name", upper)?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct Sheet {
    ctx: Rc<SheetContext>,
    key: String,
    worksheet: String,
    /// Title and link of the last fetch; its rows live in `ctx.entries`
    feed: ListFeed,
    fieldnames: Vec<String>,
    worksheets: Option<WorksheetsFeed>,
}

impl Sheet {
    /// Open a sheet, taking the client from `pool`.
    pub fn open(options: SheetOptions, pool: &ClientPool) -> Result<Self, SheetError> {
        // Bad URLs and missing keys fail before any login
        let target = SheetUrl::resolve(&options)?;
        let client = pool.client_for(&options)?;
        Self::build(options, target, client)
    }

    /// Open a sheet with a client the caller already holds.
    pub fn with_client(options: SheetOptions, client: Rc<dyn FeedApi>) -> Result<Self, SheetError> {
        let target = SheetUrl::resolve(&options)?;
        Self::build(options, target, client)
    }

    fn build(
        options: SheetOptions,
        target: SheetUrl,
        client: Rc<dyn FeedApi>,
    ) -> Result<Self, SheetError> {
        let mut sheet = Self {
            ctx: Rc::new(SheetContext {
                client,
                readonly: Cell::new(options.readonly),
                deferred_save: options.deferred_save,
                entries: RefCell::new(Vec::new()),
                cursor: Cell::new(0),
            }),
            key: target.key,
            worksheet: options.worksheet_or_default(),
            feed: ListFeed::default(),
            fieldnames: Vec::new(),
            worksheets: None,
        };

        if let Some(index) = target.worksheet_index {
            sheet.select_worksheet_index(index);
        }

        sheet.refresh()?;
        Ok(sheet)
    }

    /// Switch to the worksheet at `index` in the worksheets feed. Any failure
    /// keeps the current worksheet.
    fn select_worksheet_index(&mut self, index: usize) {
        match self.list_worksheets() {
            Ok(worksheets) => match worksheets.into_iter().nth(index) {
                Some((id, _title)) => self.worksheet = id,
                None => log::debug!("no worksheet at index {}; using '{}'", index, self.worksheet),
            },
            Err(e) => log::debug!("cannot list worksheets ({}); using '{}'", e, self.worksheet),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn worksheet(&self) -> &str {
        &self.worksheet
    }

    pub fn client(&self) -> Rc<dyn FeedApi> {
        Rc::clone(&self.ctx.client)
    }

    pub fn is_authenticated(&self) -> bool {
        self.ctx.client.is_authenticated()
    }

    pub fn is_readonly(&self) -> bool {
        self.ctx.is_readonly()
    }

    /// Applies to rows already handed out as well.
    pub fn set_readonly(&self, readonly: bool) {
        self.ctx.readonly.set(readonly);
    }

    pub fn deferred_save(&self) -> bool {
        self.ctx.deferred_save
    }

    /// Fetch the worksheet's list feed. Does not touch the cached feed.
    pub fn get_feed(&self) -> Result<ListFeed, SheetError> {
        let authed = self.is_authenticated();
        let feed = self.ctx.client.list_feed(
            &self.key,
            &self.worksheet,
            Visibility::for_auth(authed),
            Projection::for_auth(authed),
        )?;
        Ok(feed)
    }

    /// Re-fetch the feed and restart iteration from the first row.
    pub fn refresh(&mut self) -> Result<(), SheetError> {
        let mut feed = self.get_feed()?;
        self.fieldnames = feed.entries
            .first()
            .map(|e| e.fields.keys().cloned().collect())
            .unwrap_or_default();
        *self.ctx.entries.borrow_mut() = std::mem::take(&mut feed.entries);
        self.ctx.cursor.set(0);
        self.feed = feed;
        Ok(())
    }

    fn worksheets_feed(&mut self) -> Result<&WorksheetsFeed, SheetError> {
        let feed = match self.worksheets.take() {
            Some(feed) => feed,
            None => {
                let authed = self.is_authenticated();
                self.ctx.client.worksheets_feed(
                    &self.key,
                    Visibility::for_auth(authed),
                    Projection::for_auth(authed),
                )?
            }
        };
        Ok(self.worksheets.insert(feed))
    }

    /// `(worksheet id, worksheet title)` for every tab, fetched once.
    ///
    /// Any id can be passed back as `SheetOptions::worksheet`.
    pub fn list_worksheets(&mut self) -> Result<Vec<(String, String)>, SheetError> {
        Ok(self.worksheets_feed()?.pairs())
    }

    /// Spreadsheet display name; known once the worksheets were listed.
    pub fn spreadsheet_name(&self) -> Option<&str> {
        self.worksheets.as_ref().map(|w| w.title.as_str())
    }

    /// Worksheet title from the list feed.
    pub fn title(&self) -> &str {
        &self.feed.title
    }

    /// Column names of the first row; empty when the worksheet has no rows.
    pub fn fieldnames(&self) -> &[String] {
        &self.fieldnames
    }

    /// Rows in the cached feed, consumed or not.
    pub fn len(&self) -> usize {
        self.ctx.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ctx.entries.borrow().is_empty()
    }

    /// Link to browse the spreadsheet.
    pub fn absolute_url(&self) -> String {
        self.feed.html_url.clone().unwrap_or_else(|| browse_url(&self.key))
    }

    /// Insert a row at the end of the worksheet and return it.
    ///
    /// The new row is also appended to the cached feed, so an unfinished
    /// iteration will reach it.
    pub fn append(&mut self, row: &Fields) -> Result<Row, SheetError> {
        if self.is_readonly() {
            return Err(SheetError::ReadOnly);
        }

        let entry = self.ctx.client.insert_row(&self.key, &self.worksheet, row)?;
        self.ctx.entries.borrow_mut().push(entry.clone());
        if self.fieldnames.is_empty() {
            self.fieldnames = entry.fields.keys().cloned().collect();
        }
        Ok(Row::new(entry, Rc::clone(&self.ctx)))
    }

    /// Every cached row as a plain mapping, in sheet order.
    ///
    /// Saves and deletes made through this sheet's rows are reflected; unsaved
    /// edits are not.
    pub fn records(&self) -> Vec<Fields> {
        self.ctx.entries.borrow().iter().map(|e| e.fields.clone()).collect()
    }

    /// JSON array of every cached row.
    pub fn to_json(&self) -> Result<String, SheetError> {
        Ok(serde_json::to_string(&self.records())?)
    }
}

impl Iterator for Sheet {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        let cursor = self.ctx.cursor.get();
        let entry = self.ctx.entries.borrow().get(cursor)?.clone();
        self.ctx.cursor.set(cursor + 1);
        Some(Row::new(entry, Rc::clone(&self.ctx)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.len().saturating_sub(self.ctx.cursor.get());
        (left, Some(left))
    }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.spreadsheet_name() {
            Some(name) => write!(f, "GSpreadsheet: {} ({})", name, self.feed.title),
            None => write!(f, "GSpreadsheet: {}", self.feed.title),
        }
    }
}

impl fmt::Debug for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sheet")
            .field("key", &self.key)
            .field("worksheet", &self.worksheet)
            .field("rows", &self.len())
            .field("cursor", &self.ctx.cursor.get())
            .field("readonly", &self.is_readonly())
            .field("deferred_save", &self.ctx.deferred_save)
            .finish()
    }
}
