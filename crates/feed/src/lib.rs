//! Google Spreadsheets list-feed client.
//!
//! This crate is the remote side of `gsheet`: read a worksheet's list feed,
//! list worksheets, insert / update / delete a row, ClientLogin.
//!
//! Blocking reqwest, one round trip per call. No retries, no caching.

mod api;
mod auth;
mod client;
mod error;
mod model;

pub use api::{FeedApi, Projection, Visibility};
pub use auth::{client_login, Credentials, DEFAULT_LOGIN_URL, LOGIN_SERVICE};
pub use client::{FeedClient, FeedClientConfig, DEFAULT_FEEDS_BASE, DEFAULT_SOURCE};
pub use error::FeedError;
pub use model::{Entry, Fields, ListFeed, Worksheet, WorksheetsFeed};
