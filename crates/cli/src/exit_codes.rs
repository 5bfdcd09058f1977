//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Success                                                  |
//! | 1    | General error (unspecified)                              |
//! | 2    | Usage error (bad args, bad URL, no key, bad config file) |
//! | 3    | Sheet is read-only                                       |
//! | 4    | Row changed remotely since it was read                   |
//! | 5    | Account has no access to the spreadsheet                 |
//! | 6    | Login failed, or a write was attempted anonymously       |
//! | 7    | Network failure or unexpected server response            |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `sheet_exit_code`

use gsheet::{FeedError, SheetError};

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unparseable URL, missing key, broken settings.
pub const EXIT_USAGE: u8 = 2;

/// A write was refused because the sheet was opened read-only.
pub const EXIT_READONLY: u8 = 3;

/// Optimistic-concurrency rejection (HTTP 409/412).
pub const EXIT_CONFLICT: u8 = 4;

/// Server refused access (HTTP 403).
pub const EXIT_FORBIDDEN: u8 = 5;

/// ClientLogin failed, or a write needs a login that was not given.
pub const EXIT_AUTH: u8 = 6;

/// Transport failure, other HTTP status, or undecodable response.
pub const EXIT_UPSTREAM: u8 = 7;

/// Map a sheet error to its exit code.
pub fn sheet_exit_code(err: &SheetError) -> u8 {
    match err {
        SheetError::InvalidUrl(_)
        | SheetError::MissingKey
        | SheetError::UnknownField(_)
        | SheetError::Unsupported(_)
        | SheetError::Config(_) => EXIT_USAGE,
        SheetError::ReadOnly => EXIT_READONLY,
        SheetError::Remote(remote) => match remote {
            FeedError::Conflict(..) => EXIT_CONFLICT,
            FeedError::Forbidden(_) => EXIT_FORBIDDEN,
            FeedError::Auth(_) | FeedError::NotAuthenticated => EXIT_AUTH,
            FeedError::Http(..) | FeedError::Network(_) | FeedError::Parse(_) => EXIT_UPSTREAM,
        },
        SheetError::Json(_) => EXIT_ERROR,
    }
}
