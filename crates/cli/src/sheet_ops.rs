// Sheet commands: dump, worksheets, append, set, delete, login, logout

use std::io::Write;
use std::path::{Path, PathBuf};

use gsheet::{ClientPool, Credentials, Fields, Sheet, SheetOptions};
use gsheet_config::{credentials, Settings};

use crate::{CliError, ConnectArgs};

// ============================================================================
// Connection
// ============================================================================

fn sheet_options(settings: &Settings, conn: &ConnectArgs) -> SheetOptions {
    SheetOptions {
        url: conn.url.clone(),
        key: conn.key.clone(),
        worksheet: conn.worksheet.clone(),
        email: conn.email.clone(),
        password: conn.password.clone(),
        readonly: conn.readonly,
        deferred_save: false,
    }
    .with_settings(settings)
}

fn open(pool: &ClientPool, options: SheetOptions) -> Result<Sheet, CliError> {
    let sheet = Sheet::open(options, pool)?;
    log::debug!("opened {} ({} rows)", sheet, sheet.len());
    Ok(sheet)
}

/// Parse repeated `column=value` arguments, keeping their order.
pub fn parse_assignments(args: &[String]) -> Result<Fields, CliError> {
    let mut fields = Fields::new();
    for arg in args {
        let (column, value) = arg.split_once('=').ok_or_else(|| {
            CliError::args(format!("invalid --set '{}': expected COLUMN=VALUE", arg))
                .with_hint("column names are the lowercase headers without spaces, e.g. --set name=Alice")
        })?;
        let column = column.trim();
        if column.is_empty() {
            return Err(CliError::args(format!("invalid --set '{}': empty column name", arg)));
        }
        fields.insert(column.to_string(), value.to_string());
    }
    Ok(fields)
}

/// Convert a 1-based row number to an index, checking it against the sheet.
fn row_index(row: usize, rows: usize) -> Result<usize, CliError> {
    if row == 0 || row > rows {
        return Err(CliError::args(format!("row {} out of range (worksheet has {} rows)", row, rows)));
    }
    Ok(row - 1)
}

fn print_json(value: &impl serde::Serialize) -> Result<(), CliError> {
    let json = serde_json::to_string(value).map_err(|e| CliError::io(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

// ============================================================================
// dump
// ============================================================================

pub fn cmd_dump(
    settings: &Settings,
    conn: &ConnectArgs,
    out: Option<PathBuf>,
    pretty: bool,
) -> Result<(), CliError> {
    let pool = ClientPool::from_settings(settings);
    let sheet = open(&pool, sheet_options(settings, conn))?;

    let records = sheet.records();
    let json = if pretty {
        serde_json::to_string_pretty(&records)
    } else {
        serde_json::to_string(&records)
    }
    .map_err(|e| CliError::io(e.to_string()))?;

    match out {
        Some(path) => {
            std::fs::write(&path, json + "\n")
                .map_err(|e| CliError::io(format!("cannot write {}: {}", path.display(), e)))?;
            eprintln!("wrote {} rows to {}", records.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", json).map_err(|e| CliError::io(e.to_string()))?;
        }
    }
    Ok(())
}

// ============================================================================
// worksheets
// ============================================================================

pub fn cmd_worksheets(settings: &Settings, conn: &ConnectArgs, json: bool) -> Result<(), CliError> {
    let pool = ClientPool::from_settings(settings);
    let mut sheet = open(&pool, sheet_options(settings, conn))?;
    let worksheets = sheet.list_worksheets()?;

    if json {
        let items: Vec<serde_json::Value> = worksheets
            .iter()
            .map(|(id, title)| serde_json::json!({ "id": id, "title": title }))
            .collect();
        return print_json(&serde_json::json!({
            "spreadsheet": sheet.spreadsheet_name(),
            "worksheets": items,
        }));
    }

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    if let Some(name) = sheet.spreadsheet_name() {
        writeln!(handle, "# {}", name).map_err(|e| CliError::io(e.to_string()))?;
    }
    for (id, title) in worksheets {
        writeln!(handle, "{}\t{}", id, title).map_err(|e| CliError::io(e.to_string()))?;
    }
    Ok(())
}

// ============================================================================
// append / set / delete
// ============================================================================

pub fn cmd_append(settings: &Settings, conn: &ConnectArgs, set: &[String]) -> Result<(), CliError> {
    let fields = parse_assignments(set)?;
    let pool = ClientPool::from_settings(settings);
    let mut sheet = open(&pool, sheet_options(settings, conn))?;

    let row = sheet.append(&fields)?;
    print_json(&row.copy())
}

pub fn cmd_set(settings: &Settings, conn: &ConnectArgs, row: usize, set: &[String]) -> Result<(), CliError> {
    let fields = parse_assignments(set)?;
    let pool = ClientPool::from_settings(settings);
    // Buffer every assignment, then write once
    let options = sheet_options(settings, conn).deferred_save(true);
    let mut sheet = open(&pool, options)?;

    let index = row_index(row, sheet.len())?;
    let mut target = sheet
        .nth(index)
        .ok_or_else(|| CliError::args(format!("row {} out of range", row)))?;

    for (column, value) in &fields {
        target.set(column, value.as_str())?;
    }
    if !target.save()? {
        eprintln!("row {} unchanged", row);
    }
    print_json(&target.copy())
}

pub fn cmd_delete(settings: &Settings, conn: &ConnectArgs, row: usize) -> Result<(), CliError> {
    let pool = ClientPool::from_settings(settings);
    let mut sheet = open(&pool, sheet_options(settings, conn))?;

    let index = row_index(row, sheet.len())?;
    let target = sheet
        .nth(index)
        .ok_or_else(|| CliError::args(format!("row {} out of range", row)))?;

    target.delete()?;
    eprintln!("deleted row {}", row);
    Ok(())
}

// ============================================================================
// login / logout
// ============================================================================

pub fn cmd_login(
    mut settings: Settings,
    config: Option<&Path>,
    email: &str,
    password: &str,
    make_default: bool,
) -> Result<(), CliError> {
    let pool = ClientPool::from_settings(&settings);
    pool.login(&Credentials::new(email, password))?;

    credentials::set_password(email, password).map_err(CliError::keychain)?;
    eprintln!("password for {} stored in keychain", email);

    if make_default {
        settings.default_email = Some(email.to_string());
        match config {
            Some(path) => settings.save_to(path),
            None => settings.save(),
        }
        .map_err(CliError::config)?;
        eprintln!("{} is now the default account", email);
    }
    Ok(())
}

pub fn cmd_logout(email: &str) -> Result<(), CliError> {
    credentials::delete_password(email).map_err(CliError::keychain)?;
    eprintln!("password for {} removed from keychain", email);
    Ok(())
}
