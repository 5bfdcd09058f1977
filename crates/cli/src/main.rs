// gsheet CLI - read and edit Google spreadsheet worksheets from the shell

mod exit_codes;
mod sheet_ops;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use gsheet::SheetError;
use gsheet_config::{ConfigError, Settings};

use exit_codes::{sheet_exit_code, EXIT_AUTH, EXIT_ERROR, EXIT_READONLY, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "gsheet")]
#[command(about = "Read and edit Google spreadsheet worksheets row by row")]
#[command(version)]
struct Cli {
    /// Settings file (default: <config dir>/gsheet/settings.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log remote calls to stderr (same as RUST_LOG=debug)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Which spreadsheet and worksheet to open, and as whom.
#[derive(Args, Clone)]
pub struct ConnectArgs {
    /// Spreadsheet URL containing key=<id> (and optionally #gid=<n>)
    pub url: Option<String>,

    /// Spreadsheet key, instead of a URL
    #[arg(long, conflicts_with = "url")]
    pub key: Option<String>,

    /// Worksheet id (e.g. od6); defaults to "default", the feed's alias for the first tab
    #[arg(long, short = 'w')]
    pub worksheet: Option<String>,

    /// Account email (falls back to GSHEET_EMAIL, then settings default_email)
    #[arg(long)]
    pub email: Option<String>,

    /// Account password (falls back to GSHEET_PASSWORD, then the keychain)
    #[arg(long)]
    pub password: Option<String>,

    /// Refuse every write
    #[arg(long)]
    pub readonly: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every row as a JSON array of objects
    #[command(after_help = "\
Examples:
  gsheet dump 'https://docs.google.com/spreadsheet/ccc?key=0AqSs84L#gid=0'
  gsheet dump --key 0AqSs84L -w od6 --pretty --out rows.json")]
    Dump {
        #[command(flatten)]
        conn: ConnectArgs,

        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Indent the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// List the worksheets (tabs) of a spreadsheet
    Worksheets {
        #[command(flatten)]
        conn: ConnectArgs,

        /// Output as JSON for machine parsing
        #[arg(long)]
        json: bool,
    },

    /// Add a row at the end of the worksheet
    #[command(after_help = "\
Examples:
  gsheet append --key 0AqSs84L --set date=2012-01-01 --set value=42")]
    Append {
        #[command(flatten)]
        conn: ConnectArgs,

        /// Cell value as column=value (repeatable)
        #[arg(long = "set", value_name = "COLUMN=VALUE", required = true)]
        set: Vec<String>,
    },

    /// Change cells of one row, saved in a single update
    #[command(after_help = "\
Examples:
  gsheet set --key 0AqSs84L --row 3 --set name=Alice --set hash=9f2c")]
    Set {
        #[command(flatten)]
        conn: ConnectArgs,

        /// Row number, 1 = first data row
        #[arg(long)]
        row: usize,

        /// Cell value as column=value (repeatable)
        #[arg(long = "set", value_name = "COLUMN=VALUE", required = true)]
        set: Vec<String>,
    },

    /// Delete one row
    Delete {
        #[command(flatten)]
        conn: ConnectArgs,

        /// Row number, 1 = first data row
        #[arg(long)]
        row: usize,
    },

    /// Check a password and store it in the system keychain
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long, env = "GSHEET_PASSWORD", hide_env_values = true)]
        password: String,

        /// Also make this the settings default_email
        #[arg(long)]
        default: bool,
    },

    /// Remove a stored password from the system keychain
    Logout {
        /// Account email
        #[arg(long)]
        email: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = load_settings(cli.config.as_deref()).and_then(|settings| {
        match cli.command {
            Commands::Dump { conn, out, pretty } => sheet_ops::cmd_dump(&settings, &conn, out, pretty),
            Commands::Worksheets { conn, json } => sheet_ops::cmd_worksheets(&settings, &conn, json),
            Commands::Append { conn, set } => sheet_ops::cmd_append(&settings, &conn, &set),
            Commands::Set { conn, row, set } => sheet_ops::cmd_set(&settings, &conn, row, &set),
            Commands::Delete { conn, row } => sheet_ops::cmd_delete(&settings, &conn, row),
            Commands::Login { email, password, default } => {
                sheet_ops::cmd_login(settings, cli.config.as_deref(), &email, &password, default)
            }
            Commands::Logout { email } => sheet_ops::cmd_logout(&email),
        }
    });

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// An explicit `--config` must exist and parse; the default location may be
/// missing or broken.
fn load_settings(path: Option<&std::path::Path>) -> Result<Settings, CliError> {
    match path {
        Some(path) => Settings::load_from(path).map_err(CliError::config),
        None => Ok(Settings::load()),
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn config(err: ConfigError) -> Self {
        Self { code: EXIT_USAGE, message: err.to_string(), hint: None }
    }

    /// Keychain access failed.
    pub fn keychain(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
            .with_hint("set GSHEET_PASSWORD instead")
    }

    /// Create error from a sheet error with proper exit code.
    pub fn sheet(err: SheetError) -> Self {
        let code = sheet_exit_code(&err);
        let hint = match &err {
            SheetError::InvalidUrl(_) => {
                Some("copy the URL from the browser; it must contain key=...".to_string())
            }
            SheetError::MissingKey => Some("pass a spreadsheet URL or --key".to_string()),
            SheetError::ReadOnly => {
                Some("drop --readonly (or set \"readonly\": false in settings.json)".to_string())
            }
            _ if err.is_conflict() => {
                Some("the row changed since it was read; run the command again".to_string())
            }
            _ if err.is_forbidden() => {
                Some("the account has no write access to this spreadsheet".to_string())
            }
            _ if code == EXIT_AUTH => {
                Some("pass --email/--password, set GSHEET_EMAIL/GSHEET_PASSWORD, or run `gsheet login`".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<SheetError> for CliError {
    fn from(err: SheetError) -> Self {
        Self::sheet(err)
    }
}
