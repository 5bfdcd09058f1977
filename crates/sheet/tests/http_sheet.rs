//! End-to-end tests: Sheet → ClientPool → FeedClient against a mock server.

use std::rc::Rc;

use gsheet::{ClientPool, Fields, Sheet, SheetError, SheetOptions};
use gsheet_feed::{FeedApi, FeedClient, FeedClientConfig};
use httpmock::prelude::*;
use serde_json::{json, Value};

fn fields(pairs: &[(&str, &str)]) -> Fields {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn entry(server: &MockServer, row: &str, etag: &str, pairs: &[(&str, &str)]) -> Value {
    let mut entry = json!({
        "id": {"$t": server.url(format!("/feeds/list/K/od6/private/full/{}", row))},
        "gd$etag": etag,
        "link": [
            {"rel": "edit", "href": server.url(format!("/feeds/list/K/od6/private/full/{}/v1", row))}
        ]
    });
    for (k, v) in pairs {
        entry[format!("gsx${}", k)] = json!({"$t": v});
    }
    entry
}

fn mock_login(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(POST)
            .path("/accounts/ClientLogin")
            .body_includes("service=wise");
        then.status(200).body("SID=x\nLSID=y\nAuth=tok\n");
    })
}

fn mock_worksheets(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(GET).path("/feeds/worksheets/K/private/full");
        then.status(200).json_body(json!({
            "feed": {
                "title": {"$t": "Budget"},
                "entry": [
                    {"id": {"$t": server.url("/feeds/worksheets/K/private/full/od6")}, "title": {"$t": "Sheet1"}},
                    {"id": {"$t": server.url("/feeds/worksheets/K/private/full/od7")}, "title": {"$t": "Archive"}}
                ]
            }
        }));
    })
}

fn pool(server: &MockServer) -> ClientPool {
    ClientPool::new(FeedClientConfig::with_base_url(&server.base_url()))
}

#[test]
fn test_open_by_url_and_edit_rows() {
    let server = MockServer::start();
    let login = mock_login(&server);
    let worksheets = mock_worksheets(&server);

    let list = server.mock(|when, then| {
        when.method(GET)
            .path("/feeds/list/K/od6/private/full")
            .query_param("alt", "json")
            .header("Authorization", "GoogleLogin auth=tok");
        then.status(200).json_body(json!({
            "feed": {
                "title": {"$t": "Sheet1"},
                "entry": [
                    entry(&server, "r1", "\"a1\"", &[("name", "A"), ("value", "")]),
                    entry(&server, "r2", "\"b1\"", &[("name", "B"), ("value", "")])
                ]
            }
        }));
    });

    let put = server.mock(|when, then| {
        when.method(PUT)
            .path("/feeds/list/K/od6/private/full/r1/v1")
            .header("If-Match", "\"a1\"")
            .body_includes("<gsx:name>A</gsx:name>")
            .body_includes("<gsx:value>done</gsx:value>");
        then.status(200).json_body(json!({
            "entry": entry(&server, "r1", "\"a2\"", &[("name", "A"), ("value", "done")])
        }));
    });

    let delete = server.mock(|when, then| {
        when.method(DELETE)
            .path("/feeds/list/K/od6/private/full/r2/v1")
            .header("If-Match", "\"b1\"");
        then.status(200);
    });

    let pool = pool(&server);
    let mut sheet = Sheet::open(
        SheetOptions::from_url("https://docs.google.com/spreadsheet/ccc?key=K#gid=0")
            .credentials("me@example.com", "pw")
            .deferred_save(true),
        &pool,
    )
    .unwrap();

    login.assert();
    worksheets.assert();
    list.assert();
    assert_eq!(sheet.worksheet(), "od6");
    assert_eq!(sheet.to_string(), "GSpreadsheet: Budget (Sheet1)");

    let mut a = sheet.next().unwrap();
    a.set("value", "done").unwrap();
    put.assert_calls(0);
    assert!(a.save().unwrap());
    put.assert();
    assert_eq!(a.entry().etag.as_deref(), Some("\"a2\""));

    let b = sheet.next().unwrap();
    assert_eq!(b.get("name"), Some("B"));
    b.delete().unwrap();
    delete.assert();

    assert!(sheet.next().is_none());
}

#[test]
fn test_append_posts_new_row() {
    let server = MockServer::start();
    mock_login(&server);

    server.mock(|when, then| {
        when.method(GET).path("/feeds/list/K/od6/private/full");
        then.status(200).json_body(json!({"feed": {"title": {"$t": "Sheet1"}}}));
    });
    let insert = server.mock(|when, then| {
        when.method(POST)
            .path("/feeds/list/K/od6/private/full")
            .body_includes("<gsx:date>2012-01-01</gsx:date>");
        then.status(201).json_body(json!({
            "entry": entry(&server, "r9", "\"n1\"", &[("date", "2012-01-01"), ("value", "7")])
        }));
    });

    let pool = pool(&server);
    let mut sheet = Sheet::open(
        SheetOptions::from_key("K").worksheet("od6").credentials("me@example.com", "pw"),
        &pool,
    )
    .unwrap();
    assert!(sheet.is_empty());

    let data = fields(&[("date", "2012-01-01"), ("value", "7")]);
    let row = sheet.append(&data).unwrap();

    insert.assert();
    assert_eq!(row.copy(), data);
    assert_eq!(sheet.fieldnames(), ["date", "value"]);
}

#[test]
fn test_anonymous_sheet_reads_public_values() {
    let server = MockServer::start();
    let list = server.mock(|when, then| {
        when.method(GET).path("/feeds/list/K/default/public/values");
        then.status(200).json_body(json!({
            "feed": {
                "title": {"$t": "Sheet1"},
                "link": [{"rel": "alternate", "href": "https://docs.google.com/spreadsheet/pub?key=K"}],
                "entry": [{"id": {"$t": "r1"}, "gsx$name": {"$t": "A"}}]
            }
        }));
    });

    let client: Rc<dyn FeedApi> =
        Rc::new(FeedClient::anonymous(&FeedClientConfig::with_base_url(&server.base_url())).unwrap());
    let sheet = Sheet::with_client(SheetOptions::from_key("K"), client).unwrap();

    list.assert();
    assert!(!sheet.is_authenticated());
    assert_eq!(sheet.absolute_url(), "https://docs.google.com/spreadsheet/pub?key=K");
    assert_eq!(sheet.to_json().unwrap(), r#"[{"name":"A"}]"#);
}

#[test]
fn test_conflict_on_save_is_returned() {
    let server = MockServer::start();
    mock_login(&server);

    server.mock(|when, then| {
        when.method(GET).path("/feeds/list/K/od6/private/full");
        then.status(200).json_body(json!({
            "feed": {"title": {"$t": "Sheet1"}, "entry": [entry(&server, "r1", "\"stale\"", &[("name", "A")])]}
        }));
    });
    let put = server.mock(|when, then| {
        when.method(PUT).path("/feeds/list/K/od6/private/full/r1/v1");
        then.status(412).body("Mismatch: etags = [\"stale\"], version = [2nd6]");
    });

    let pool = pool(&server);
    let mut sheet = Sheet::open(
        SheetOptions::from_key("K").worksheet("od6").credentials("me@example.com", "pw"),
        &pool,
    )
    .unwrap();

    let mut row = sheet.next().unwrap();
    let err = row.set("name", "Z").unwrap_err();

    put.assert_calls(1);
    assert!(err.is_conflict());
    match &err {
        SheetError::Remote(remote) => assert_eq!(remote.status(), Some(412)),
        other => panic!("expected a remote error, got {:?}", other),
    }
    assert!(row.is_dirty());
}

#[test]
fn test_missing_key_fails_before_login() {
    let server = MockServer::start();
    let login = mock_login(&server);

    let pool = pool(&server);
    let err = Sheet::open(SheetOptions::default().credentials("me@example.com", "pw"), &pool).unwrap_err();

    assert!(matches!(err, SheetError::MissingKey));
    login.assert_calls(0);
}

#[test]
fn test_invalid_url_fails_before_login() {
    let server = MockServer::start();
    let login = mock_login(&server);

    let pool = pool(&server);
    let options = SheetOptions::from_url("https://docs.google.com/spreadsheet/ccc?id=abc")
        .credentials("me@example.com", "pw");
    let err = Sheet::open(options, &pool).unwrap_err();

    assert!(matches!(err, SheetError::InvalidUrl(_)));
    login.assert_calls(0);
}

#[test]
fn test_readonly_sheet_sends_no_writes() {
    let server = MockServer::start();
    mock_login(&server);

    server.mock(|when, then| {
        when.method(GET).path("/feeds/list/K/od6/private/full");
        then.status(200).json_body(json!({
            "feed": {"title": {"$t": "Sheet1"}, "entry": [entry(&server, "r1", "\"e\"", &[("name", "A")])]}
        }));
    });
    let writes = server.mock(|when, then| {
        when.path_includes("/r1/");
        then.status(200);
    });
    let inserts = server.mock(|when, then| {
        when.method(POST).path("/feeds/list/K/od6/private/full");
        then.status(201);
    });

    let pool = pool(&server);
    let mut sheet = Sheet::open(
        SheetOptions::from_key("K")
            .worksheet("od6")
            .credentials("me@example.com", "pw")
            .readonly(true),
        &pool,
    )
    .unwrap();

    let mut row = sheet.next().unwrap();
    assert!(row.set("name", "Z").is_err());
    assert!(row.save().is_err());
    assert!(row.delete().is_err());
    assert!(sheet.append(&fields(&[("name", "B")])).is_err());

    writes.assert_calls(0);
    inserts.assert_calls(0);
}
