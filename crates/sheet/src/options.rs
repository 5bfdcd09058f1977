use gsheet_config::Settings;

/// Worksheet used when neither the options nor the URL name one.
pub const DEFAULT_WORKSHEET: &str = "default";

/// Everything a [`Sheet`](crate::Sheet) can be opened with.
///
/// `url` wins over `key` when both are given; a `#gid=N` fragment in the URL
/// wins over `worksheet` when it resolves.
#[derive(Clone, Default)]
pub struct SheetOptions {
    /// Browser URL containing `key=<id>` and optionally `#gid=<n>`
    pub url: Option<String>,
    /// Spreadsheet key, when no URL is given
    pub key: Option<String>,
    /// Worksheet id or name (e.g. "od6"); defaults to "default"
    pub worksheet: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Refuse every write (set, save, delete, append)
    pub readonly: bool,
    /// Buffer row edits until `Row::save`
    pub deferred_save: bool,
}

impl SheetOptions {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self { url: Some(url.into()), ..Self::default() }
    }

    pub fn from_key(key: impl Into<String>) -> Self {
        Self { key: Some(key.into()), ..Self::default() }
    }

    /// Start from the `readonly` / `deferred_save` defaults of a settings file.
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.readonly |= settings.readonly;
        self.deferred_save |= settings.deferred_save;
        self
    }

    pub fn worksheet(mut self, worksheet: impl Into<String>) -> Self {
        self.worksheet = Some(worksheet.into());
        self
    }

    pub fn credentials(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self.password = Some(password.into());
        self
    }

    pub fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    pub fn deferred_save(mut self, deferred: bool) -> Self {
        self.deferred_save = deferred;
        self
    }

    pub(crate) fn worksheet_or_default(&self) -> String {
        self.worksheet
            .as_deref()
            .filter(|w| !w.is_empty())
            .unwrap_or(DEFAULT_WORKSHEET)
            .to_string()
    }
}

impl std::fmt::Debug for SheetOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetOptions")
            .field("url", &self.url)
            .field("key", &self.key)
            .field("worksheet", &self.worksheet)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("readonly", &self.readonly)
            .field("deferred_save", &self.deferred_save)
            .finish()
    }
}
