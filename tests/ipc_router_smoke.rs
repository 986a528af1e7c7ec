mod test_support;

use serde_json::json;
use std::io::{BufRead, Write};
use test_support::{error_code, request, request_ok, spawn_sidecar_with_env, temp_dir};

#[test]
fn router_dispatch_smoke_covers_handler_families() {
    let downloads = temp_dir("schoold-router-smoke");
    let (_child, mut stdin, mut reader) = spawn_sidecar_with_env(&[(
        "SCHOOLD_DOWNLOADS_DIR",
        downloads.to_str().expect("utf8 path"),
    )]);

    let health = request_ok(&mut stdin, &mut reader, "1", "health", json!({}));
    assert_eq!(
        health.get("seed").and_then(|v| v.as_u64()),
        Some(test_support::TEST_SEED.parse().expect("seed"))
    );

    let summary = request_ok(&mut stdin, &mut reader, "2", "data.summary", json!({}));
    assert_eq!(summary["cities"], 3);
    assert_eq!(summary["classes"], 24);
    assert_eq!(summary["subjects"], 24 * 12);
    assert_eq!(summary["rosterEntries"], 720);

    let cities = request_ok(&mut stdin, &mut reader, "3", "cities.list", json!({}));
    assert_eq!(cities["kind"], "city");
    let classes = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "classes.list",
        json!({ "city": "Kraków" }),
    );
    assert_eq!(classes["title"], "Kraków");
    let subjects = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "subjects.list",
        json!({ "city": "Kraków", "className": "Class 3" }),
    );
    let subject = subjects["rows"][0]["key"]
        .as_str()
        .expect("subject key")
        .to_string();
    let path = json!({ "city": "Kraków", "className": "Class 3", "subject": subject });

    let students = request_ok(&mut stdin, &mut reader, "6", "students.list", path.clone());
    assert_eq!(students["exportable"], "grades");
    let first = students["rows"][0]["key"].as_str().expect("student key").to_string();
    let record = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "students.get",
        json!({ "name": first }),
    );
    assert_eq!(record["grades"].as_object().map(|m| m.len()), Some(12));

    let attendance = request_ok(&mut stdin, &mut reader, "8", "attendance.list", path.clone());
    assert_eq!(attendance["exportable"], "attendance");

    let _ = request_ok(&mut stdin, &mut reader, "9", "settings.get", json!({}));
    let _ = request_ok(&mut stdin, &mut reader, "10", "nav.current", json!({}));
    let _ = request_ok(&mut stdin, &mut reader, "11", "nav.history", json!({}));
    let _ = request_ok(&mut stdin, &mut reader, "12", "nav.back", json!({}));
    let _ = request_ok(&mut stdin, &mut reader, "13", "nav.reset", json!({}));
    let exported = request_ok(&mut stdin, &mut reader, "14", "reports.gradesPdf", path);
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "15",
        "reports.inspect",
        json!({ "path": exported["path"] }),
    );

    let unknown = request(&mut stdin, &mut reader, "16", "grades.delete", json!({}));
    assert_eq!(error_code(&unknown), Some("not_implemented"));

    let _ = std::fs::remove_dir_all(downloads);
}

#[test]
fn malformed_line_gets_bad_json_and_loop_continues() {
    let (_child, mut stdin, mut reader) = spawn_sidecar_with_env(&[]);

    writeln!(stdin, "{{not json").expect("write garbage");
    stdin.flush().expect("flush");
    let mut line = String::new();
    reader.read_line(&mut line).expect("read error line");
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("json");
    assert_eq!(value["ok"], false);
    assert_eq!(error_code(&value), Some("bad_json"));

    let _ = request_ok(&mut stdin, &mut reader, "after", "health", json!({}));
}

#[test]
fn missing_params_are_bad_params() {
    let (_child, mut stdin, mut reader) = spawn_sidecar_with_env(&[]);

    let resp = request(&mut stdin, &mut reader, "1", "classes.list", json!({}));
    assert_eq!(error_code(&resp), Some("bad_params"));

    let resp = request(
        &mut stdin,
        &mut reader,
        "2",
        "students.list",
        json!({ "city": "Kraków", "className": "Class 1" }),
    );
    assert_eq!(error_code(&resp), Some("bad_params"));

    let resp = request(
        &mut stdin,
        &mut reader,
        "3",
        "classes.list",
        json!({ "city": "Gdańsk" }),
    );
    assert_eq!(error_code(&resp), Some("not_found"));

    let resp = request(
        &mut stdin,
        &mut reader,
        "4",
        "students.get",
        json!({ "name": "Nobody Here" }),
    );
    assert_eq!(error_code(&resp), Some("not_found"));
}
