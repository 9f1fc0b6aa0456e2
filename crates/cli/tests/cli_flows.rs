//! End-to-end runs of the `tally` binary against a temp workbook and a
//! mocked document store.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::OnceLock;

use httpmock::prelude::*;

fn tally(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tally"))
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("binary runs")
}

fn assert_success(out: &Output) {
    assert!(
        out.status.success(),
        "exit {:?}, stderr: {}",
        out.status.code(),
        String::from_utf8_lossy(&out.stderr),
    );
}

fn write_config(dir: &Path, api_base: Option<&str>, creds: &Path) -> PathBuf {
    let mut config = format!(
        "[store]\nproject_id = \"demo\"\ncollection = \"transactions\"\nlimit = 50\ncredentials = \"{}\"\n",
        creds.display(),
    );
    if let Some(base) = api_base {
        config.push_str(&format!("api_base = \"{base}\"\n"));
    }
    config.push_str(&format!(
        "\n[workbook]\npath = \"{}\"\n",
        dir.join("workbook").display(),
    ));
    let path = dir.join("tally.toml");
    std::fs::write(&path, config).unwrap();
    path
}

fn test_key_pem() -> &'static str {
    use rsa::pkcs8::EncodePrivateKey;
    static PEM: OnceLock<String> = OnceLock::new();
    PEM.get_or_init(|| {
        rsa::RsaPrivateKey::new(&mut rand::thread_rng(), 2048)
            .expect("keygen")
            .to_pkcs8_pem(rsa::pkcs8::LineEnding::LF)
            .unwrap()
            .to_string()
    })
}

fn write_creds(dir: &Path, token_uri: &str) -> PathBuf {
    let creds = serde_json::json!({
        "type": "service_account",
        "client_email": "sync@demo.iam.gserviceaccount.com",
        "private_key": test_key_pem(),
        "token_uri": token_uri,
    });
    let path = dir.join("service-account.json");
    std::fs::write(&path, creds.to_string()).unwrap();
    path
}

fn document(user: &str, discount: &str, date: &str) -> serde_json::Value {
    serde_json::json!({
        "document": {
            "name": format!("projects/demo/databases/(default)/documents/transactions/{user}"),
            "fields": {
                "email": { "stringValue": format!("{user}@x.com") },
                "userId": { "stringValue": user },
                "sku": { "stringValue": "sku-1" },
                "status": { "stringValue": "paid" },
                "discount": { "stringValue": discount },
                "date": { "stringValue": date }
            }
        },
        "readTime": "2026-03-10T00:00:00Z"
    })
}

fn read_sheet(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join("workbook").join(format!("{name}.csv"))).unwrap()
}

#[test]
fn init_track_report_flow() {
    let dir = tempfile::tempdir().unwrap();
    let creds = dir.path().join("unused.json");
    let config = write_config(dir.path(), None, &creds);

    assert_success(&tally(&config, &["init", "-q"]));
    assert_success(&tally(&config, &["sheet-add", "Welcome_Tracker", "-q"]));

    // Seed the ledger directly; track and report never touch the network.
    let today = chrono::Local::now().date_naive();
    let recent = (today - chrono::Duration::days(1)).format("%d/%m/%Y").to_string();
    let old = (today - chrono::Duration::days(40)).format("%d/%m/%Y").to_string();
    std::fs::write(
        dir.path().join("workbook/Transactions.csv"),
        format!(
            "email,userId,sku,status,discount,date\n\
             a@x.com,1,sku-1,paid,SAVE10,{old}\n\
             a@x.com,1,sku-2,paid,\"SAVE10,WELCOME\",{recent}\n\
             b@x.com,2,sku-3,pending,WELCOME,{recent}\n",
        ),
    )
    .unwrap();

    assert_success(&tally(&config, &["track", "--marker", "WELCOME", "--out", "Welcome_Tracker", "-q"]));
    let tracker = read_sheet(dir.path(), "Welcome_Tracker");
    assert!(tracker.contains("sku-2"), "tracker: {tracker}");
    assert!(tracker.contains("sku-3"), "tracker: {tracker}");
    // One row per user: user 1's plain SAVE10 row is never tracked.
    assert!(!tracker.contains("sku-1,"), "tracker: {tracker}");

    assert_success(&tally(&config, &["sheet-add", "Weekly", "-q"]));
    assert_success(&tally(&config, &["report", "--days", "7", "--where", "status=paid", "--out", "Weekly", "-q"]));
    let weekly = read_sheet(dir.path(), "Weekly");
    assert!(weekly.contains("sku-2"), "weekly: {weekly}");
    assert!(!weekly.contains("sku-1,"), "weekly: {weekly}");
    assert!(!weekly.contains("sku-3"), "weekly: {weekly}");

    // An impossible filter clears the body down to the header.
    assert_success(&tally(&config, &["report", "--where", "status=refunded", "--out", "Weekly", "-q"]));
    assert_eq!(read_sheet(dir.path(), "Weekly").trim(), "email,userId,sku,status,discount,date");
}

#[test]
fn sync_appends_then_goes_quiet() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(200)
            .json_body(serde_json::json!({ "access_token": "tok_e2e" }));
    });
    server.mock(|when, then| {
        when.method(POST)
            .path_includes("documents:runQuery")
            .header("authorization", "Bearer tok_e2e");
        then.status(200).json_body(serde_json::json!([
            document("u2", "WELCOME", "2026-03-04"),
            document("u1", "", "2026-03-03"),
            { "readTime": "2026-03-10T00:00:00Z" }
        ]));
    });

    let dir = tempfile::tempdir().unwrap();
    let creds = write_creds(dir.path(), &server.url("/token"));
    let config = write_config(dir.path(), Some(&server.base_url()), &creds);

    assert_success(&tally(&config, &["init", "-q"]));

    let out = tally(&config, &["sync", "--json"]);
    assert_success(&out);
    let summary: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("stdout is a JSON summary");
    assert_eq!(summary["fetched"], 2);
    assert_eq!(summary["appended"], 2);
    assert_eq!(summary["anchor_missing"], false);

    // Ledger is oldest-first with display-form dates; staging mirrors the
    // raw page newest-first.
    let ledger = read_sheet(dir.path(), "Transactions");
    let lines: Vec<&str> = ledger.lines().collect();
    assert_eq!(lines[0], "email,userId,sku,status,discount,date");
    assert!(lines[1].starts_with("u1@x.com,u1,"), "ledger: {ledger}");
    assert!(lines[1].ends_with("03/03/2026"), "ledger: {ledger}");
    assert!(lines[2].starts_with("u2@x.com,u2,"), "ledger: {ledger}");
    assert!(lines[2].ends_with("04/03/2026"), "ledger: {ledger}");

    let staging = read_sheet(dir.path(), "Staging");
    let staging_lines: Vec<&str> = staging.lines().collect();
    assert!(staging_lines[0].starts_with("u2@x.com,u2,"), "staging: {staging}");
    assert!(staging_lines[0].ends_with("2026-03-04"), "staging: {staging}");

    // Same page again: the anchor sits at the newest position, so the
    // second run appends nothing.
    let out = tally(&config, &["sync", "--json"]);
    assert_success(&out);
    let summary: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(summary["fetched"], 2);
    assert_eq!(summary["appended"], 0);
    assert_eq!(read_sheet(dir.path(), "Transactions").lines().count(), 3);
}

#[test]
fn sync_aborts_before_fetch_when_a_sheet_is_missing() {
    let server = MockServer::start();
    let token_mock = server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(200)
            .json_body(serde_json::json!({ "access_token": "tok" }));
    });

    let dir = tempfile::tempdir().unwrap();
    let creds = write_creds(dir.path(), &server.url("/token"));
    let config = write_config(dir.path(), Some(&server.base_url()), &creds);

    assert_success(&tally(&config, &["init", "-q"]));
    std::fs::remove_file(dir.path().join("workbook/Staging.csv")).unwrap();

    let out = tally(&config, &["sync", "-q"]);
    assert_eq!(out.status.code(), Some(11), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    token_mock.assert_hits(0);
}

#[test]
fn rejected_token_exchange_exits_with_auth_code() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(400).json_body(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Invalid JWT signature."
        }));
    });

    let dir = tempfile::tempdir().unwrap();
    let creds = write_creds(dir.path(), &server.url("/token"));
    let config = write_config(dir.path(), Some(&server.base_url()), &creds);

    assert_success(&tally(&config, &["init", "-q"]));
    let out = tally(&config, &["sync", "-q"]);
    assert_eq!(out.status.code(), Some(20));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Invalid JWT signature."), "stderr: {stderr}");
    // Nothing was fetched, so the ledger is untouched.
    assert_eq!(read_sheet(dir.path(), "Transactions").lines().count(), 1);
}

#[test]
fn usage_and_config_errors_have_their_own_codes() {
    let dir = tempfile::tempdir().unwrap();
    let creds = dir.path().join("unused.json");
    let config = write_config(dir.path(), None, &creds);
    assert_success(&tally(&config, &["init", "-q"]));

    // Malformed --where is a usage error.
    let out = tally(&config, &["report", "--where", "nonsense", "--out", "Weekly", "-q"]);
    assert_eq!(out.status.code(), Some(2));

    // Unparseable config file.
    let bad = dir.path().join("bad.toml");
    std::fs::write(&bad, "not toml [").unwrap();
    let out = tally(&bad, &["sync", "-q"]);
    assert_eq!(out.status.code(), Some(10));
}
