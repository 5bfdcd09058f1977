//! One row of a worksheet, as a mapping of column name to cell text.

use std::rc::Rc;

use gsheet_feed::{Entry, Fields};

use crate::error::SheetError;
use crate::sheet::SheetContext;

/// A cached, editable view over one list-feed entry.
///
/// Edits go to an in-memory copy. Unless the sheet was opened with
/// `deferred_save`, every `set` that changes a value is written back at once;
/// otherwise call [`Row::save`] when done. The copy and the remote row only
/// agree again after a successful save, which also updates the sheet's
/// cached rows; a successful delete drops the row from that cache.
pub struct Row {
    entry: Entry,
    data: Fields,
    changed: bool,
    ctx: Rc<SheetContext>,
}

impl Row {
    pub(crate) fn new(entry: Entry, ctx: Rc<SheetContext>) -> Self {
        let data = entry.fields.clone();
        Self { entry, data, changed: false, ctx }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.data.get(column).map(String::as_str)
    }

    pub fn contains_key(&self, column: &str) -> bool {
        self.data.contains_key(column)
    }

    /// Column names, in sheet order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Unsaved local edits exist.
    pub fn is_dirty(&self) -> bool {
        self.changed
    }

    /// The entry as last received from the server.
    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    /// Assign a cell. Saves immediately unless the sheet defers saves.
    ///
    /// Columns are fixed by the sheet; assigning one the row does not have is
    /// an error, as is any assignment on a read-only sheet.
    pub fn set(&mut self, column: &str, value: impl Into<String>) -> Result<(), SheetError> {
        if self.ctx.is_readonly() {
            return Err(SheetError::ReadOnly);
        }

        let value = value.into();
        let slot = self.data
            .get_mut(column)
            .ok_or_else(|| SheetError::UnknownField(column.to_string()))?;

        if *slot != value {
            *slot = value;
            self.changed = true;
        }

        if !self.ctx.deferred_save {
            self.save()?;
        }
        Ok(())
    }

    /// Rows cannot lose columns; only whole-row deletion exists.
    pub fn remove(&mut self, _column: &str) -> Result<String, SheetError> {
        Err(SheetError::Unsupported("deleting values not allowed"))
    }

    /// Write local edits back. Returns `false` when there was nothing to save.
    ///
    /// Conflicts (the row changed remotely) and permission errors are
    /// returned as-is; the local edits stay in place and the row stays dirty.
    pub fn save(&mut self) -> Result<bool, SheetError> {
        if self.ctx.is_readonly() {
            return Err(SheetError::ReadOnly);
        }
        if !self.changed {
            return Ok(false);
        }

        log::debug!("saving row {}", self.entry.id);
        self.entry = self.ctx.client.update_row(&self.entry, &self.data)?;
        self.ctx.store(&self.entry);
        self.changed = false;
        Ok(true)
    }

    /// Delete this row from the worksheet.
    pub fn delete(self) -> Result<(), SheetError> {
        if self.ctx.is_readonly() {
            return Err(SheetError::ReadOnly);
        }

        log::debug!("deleting row {}", self.entry.id);
        self.ctx.client.delete_row(&self.entry)?;
        self.ctx.forget(&self.entry.id);
        Ok(())
    }

    /// Detached snapshot of the current values.
    pub fn copy(&self) -> Fields {
        self.data.clone()
    }
}

impl std::ops::Index<&str> for Row {
    type Output = str;

    fn index(&self, column: &str) -> &str {
        match self.data.get(column) {
            Some(value) => value,
            None => panic!("no column '{}' in row", column),
        }
    }
}

impl std::fmt::Debug for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Row")
            .field("id", &self.entry.id)
            .field("data", &self.data)
            .field("changed", &self.changed)
            .finish()
    }
}
