//! In-memory `FeedApi` for tests. Counts every call and enforces etags the
//! way the server does.

use std::cell::{Cell, RefCell};

use gsheet_feed::{
    Entry, FeedApi, FeedError, Fields, ListFeed, Projection, Visibility, Worksheet, WorksheetsFeed,
};

#[derive(Debug, Default)]
pub(crate) struct Calls {
    pub list: Cell<usize>,
    pub worksheets: Cell<usize>,
    pub insert: Cell<usize>,
    pub update: Cell<usize>,
    pub delete: Cell<usize>,
}

impl Calls {
    pub fn writes(&self) -> usize {
        self.insert.get() + self.update.get() + self.delete.get()
    }
}

fn bump(counter: &Cell<usize>) {
    counter.set(counter.get() + 1);
}

pub(crate) struct MemoryFeed {
    pub authenticated: bool,
    pub title: String,
    pub spreadsheet: String,
    pub tabs: Vec<Worksheet>,
    pub rows: RefCell<Vec<Entry>>,
    pub calls: Calls,
    /// (worksheet, visibility, projection) of the last list_feed call
    pub last_list: RefCell<Option<(String, Visibility, Projection)>>,
    /// Error returned by the next update or delete
    pub fail_next: RefCell<Option<FeedError>>,
    next_id: Cell<usize>,
}

impl MemoryFeed {
    pub fn new(authenticated: bool) -> Self {
        Self {
            authenticated,
            title: "Sheet1".into(),
            spreadsheet: "Test spreadsheet".into(),
            tabs: vec![
                Worksheet { id: "od6".into(), title: "Sheet1".into() },
                Worksheet { id: "od7".into(), title: "Archive".into() },
            ],
            rows: RefCell::new(Vec::new()),
            calls: Calls::default(),
            last_list: RefCell::new(None),
            fail_next: RefCell::new(None),
            next_id: Cell::new(0),
        }
    }

    /// Authenticated feed holding one row per `name` value.
    pub fn with_names(names: &[&str]) -> Self {
        let feed = Self::new(true);
        for name in names {
            feed.push(&[("name", name), ("value", "")]);
        }
        feed
    }

    pub fn push(&self, pairs: &[(&str, &str)]) {
        let entry = self.make_entry(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect());
        self.rows.borrow_mut().push(entry);
    }

    /// Current remote value of a cell.
    pub fn remote(&self, index: usize, column: &str) -> Option<String> {
        self.rows.borrow().get(index).and_then(|e| e.fields.get(column).cloned())
    }

    /// Simulate someone else editing a row: its etag changes.
    pub fn touch(&self, index: usize) {
        if let Some(entry) = self.rows.borrow_mut().get_mut(index) {
            entry.etag = Some(format!("\"touched-{}\"", index));
        }
    }

    fn make_entry(&self, fields: Fields) -> Entry {
        let n = self.next_id.get();
        self.next_id.set(n + 1);
        Entry {
            id: format!("row{}", n),
            etag: Some("\"v0\"".into()),
            edit_url: Some(format!("memory://row{}", n)),
            fields,
        }
    }

    fn take_failure(&self) -> Result<(), FeedError> {
        match self.fail_next.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl FeedApi for MemoryFeed {
    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn list_feed(
        &self,
        _key: &str,
        worksheet: &str,
        visibility: Visibility,
        projection: Projection,
    ) -> Result<ListFeed, FeedError> {
        bump(&self.calls.list);
        *self.last_list.borrow_mut() = Some((worksheet.to_string(), visibility, projection));
        Ok(ListFeed {
            title: self.title.clone(),
            html_url: None,
            entries: self.rows.borrow().clone(),
        })
    }

    fn worksheets_feed(
        &self,
        _key: &str,
        _visibility: Visibility,
        _projection: Projection,
    ) -> Result<WorksheetsFeed, FeedError> {
        bump(&self.calls.worksheets);
        Ok(WorksheetsFeed {
            title: self.spreadsheet.clone(),
            entries: self.tabs.clone(),
        })
    }

    fn insert_row(&self, _key: &str, _worksheet: &str, fields: &Fields) -> Result<Entry, FeedError> {
        bump(&self.calls.insert);
        if !self.authenticated {
            return Err(FeedError::NotAuthenticated);
        }
        let entry = self.make_entry(fields.clone());
        self.rows.borrow_mut().push(entry.clone());
        Ok(entry)
    }

    fn update_row(&self, entry: &Entry, fields: &Fields) -> Result<Entry, FeedError> {
        bump(&self.calls.update);
        self.take_failure()?;

        let mut rows = self.rows.borrow_mut();
        let stored = rows
            .iter_mut()
            .find(|e| e.id == entry.id)
            .ok_or_else(|| FeedError::Http(404, format!("no row {}", entry.id)))?;

        if stored.etag != entry.etag {
            return Err(FeedError::Conflict(412, format!("etag mismatch on {}", entry.id)));
        }

        stored.fields = fields.clone();
        stored.etag = Some(format!("\"v{}\"", self.calls.update.get()));
        Ok(stored.clone())
    }

    fn delete_row(&self, entry: &Entry) -> Result<(), FeedError> {
        bump(&self.calls.delete);
        self.take_failure()?;

        let mut rows = self.rows.borrow_mut();
        let before = rows.len();
        rows.retain(|e| e.id != entry.id);
        if rows.len() == before {
            return Err(FeedError::Http(404, format!("no row {}", entry.id)));
        }
        Ok(())
    }
}
