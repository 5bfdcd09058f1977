//! Client pool.
//!
//! Logging in costs a round trip, so clients are kept per account and handed
//! out by reference. The pool is created once by the caller (usually at
//! startup), passed to every [`Sheet::open`](crate::Sheet::open), and its
//! sessions end when it is dropped.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use gsheet_config::{resolve_login, Settings};
use gsheet_feed::{Credentials, FeedApi, FeedClient, FeedClientConfig};

use crate::error::SheetError;
use crate::options::SheetOptions;

pub struct ClientPool {
    config: FeedClientConfig,
    default_email: Option<String>,
    anonymous: RefCell<Option<Rc<dyn FeedApi>>>,
    sessions: RefCell<HashMap<String, Rc<dyn FeedApi>>>,
}

impl ClientPool {
    pub fn new(config: FeedClientConfig) -> Self {
        Self {
            config,
            default_email: None,
            anonymous: RefCell::new(None),
            sessions: RefCell::new(HashMap::new()),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let config = FeedClientConfig {
            feeds_base: settings.feeds_base.clone(),
            login_url: settings.login_url.clone(),
            source: settings.source.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
        };
        Self {
            default_email: settings.default_email.clone(),
            ..Self::new(config)
        }
    }

    pub fn config(&self) -> &FeedClientConfig {
        &self.config
    }

    /// Client for the account the options resolve to, or an anonymous one.
    pub fn client_for(&self, options: &SheetOptions) -> Result<Rc<dyn FeedApi>, SheetError> {
        match resolve_login(
            options.email.as_deref(),
            options.password.as_deref(),
            self.default_email.as_deref(),
        ) {
            Some(login) => {
                log::debug!("using {} credentials for {}", login.source.as_str(), login.email);
                self.login(&Credentials::new(login.email, login.password))
            }
            None => self.anonymous(),
        }
    }

    /// Logged-in client for an account; logs in only the first time.
    pub fn login(&self, creds: &Credentials) -> Result<Rc<dyn FeedApi>, SheetError> {
        if let Some(client) = self.sessions.borrow().get(&creds.email) {
            return Ok(Rc::clone(client));
        }

        let client: Rc<dyn FeedApi> = Rc::new(FeedClient::login(&self.config, creds)?);
        self.sessions.borrow_mut().insert(creds.email.clone(), Rc::clone(&client));
        Ok(client)
    }

    pub fn anonymous(&self) -> Result<Rc<dyn FeedApi>, SheetError> {
        if let Some(client) = self.anonymous.borrow().as_ref() {
            return Ok(Rc::clone(client));
        }

        let client: Rc<dyn FeedApi> = Rc::new(FeedClient::anonymous(&self.config)?);
        *self.anonymous.borrow_mut() = Some(Rc::clone(&client));
        Ok(client)
    }

    /// Register an already logged-in client for an account.
    pub fn insert(&self, email: impl Into<String>, client: Rc<dyn FeedApi>) {
        self.sessions.borrow_mut().insert(email.into(), client);
    }

    /// Number of cached logins.
    pub fn session_count(&self) -> usize {
        self.sessions.borrow().len()
    }

    /// Forget every cached client.
    pub fn clear(&self) {
        self.sessions.borrow_mut().clear();
        self.anonymous.borrow_mut().take();
    }
}

impl Default for ClientPool {
    fn default() -> Self {
        Self::new(FeedClientConfig::default())
    }
}
