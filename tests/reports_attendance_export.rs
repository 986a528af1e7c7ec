mod test_support;

use serde_json::json;
use test_support::{error_code, request, request_ok, row_keys, spawn_sidecar_with_env, temp_dir};

#[test]
fn attendance_export_fabricates_numbers_by_default() {
    let downloads = temp_dir("schoold-attendance-default");
    let (_child, mut stdin, mut reader) = spawn_sidecar_with_env(&[(
        "SCHOOLD_DOWNLOADS_DIR",
        downloads.to_str().expect("utf8 path"),
    )]);

    let subjects = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "subjects.list",
        json!({ "city": "Warszawa", "className": "Class 2" }),
    );
    let subject = row_keys(&subjects)[3].clone();
    let exported = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "reports.attendancePdf",
        json!({ "city": "Warszawa", "className": "Class 2", "subject": subject }),
    );
    assert_eq!(
        exported["fileName"],
        format!("Warszawa_Class 2_{}_attendance.pdf", subject).as_str()
    );
    assert!(exported["message"]
        .as_str()
        .expect("message")
        .starts_with("Attendance downloaded: "));

    let inspected = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "reports.inspect",
        json!({ "path": exported["path"] }),
    );
    let lines = inspected["lines"].as_array().expect("lines");
    assert_eq!(
        lines[0],
        format!("Attendance for Warszawa - Class 2 - {}", subject).as_str()
    );
    for line in &lines[1..] {
        let n: u32 = line
            .as_str()
            .and_then(|l| l.rsplit(": ").next())
            .and_then(|v| v.parse().ok())
            .expect("fabricated number");
        assert!((50..=100).contains(&n));
    }

    let _ = std::fs::remove_dir_all(downloads);
}

#[test]
fn class_scope_and_recorded_attendance_follow_settings() {
    let downloads = temp_dir("schoold-attendance-recorded");
    let (_child, mut stdin, mut reader) = spawn_sidecar_with_env(&[(
        "SCHOOLD_DOWNLOADS_DIR",
        downloads.to_str().expect("utf8 path"),
    )]);

    let settings = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "settings.update",
        json!({ "rosterScope": "class", "attendanceSource": "recorded" }),
    );
    assert_eq!(settings["rosterScope"], "class");
    assert_eq!(settings["attendanceSource"], "recorded");

    let subjects = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "subjects.list",
        json!({ "city": "Rzeszów", "className": "Class 6" }),
    );
    let subject = row_keys(&subjects)[0].clone();
    let path = json!({ "city": "Rzeszów", "className": "Class 6", "subject": subject });

    let listed = request_ok(&mut stdin, &mut reader, "3", "attendance.list", path.clone());
    let rows = listed["rows"].as_array().expect("rows");
    assert!(!rows.is_empty() && rows.len() <= 30);

    let exported = request_ok(&mut stdin, &mut reader, "4", "reports.attendancePdf", path);
    assert_eq!(exported["lines"], rows.len() + 1);
    let inspected = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "reports.inspect",
        json!({ "path": exported["path"] }),
    );
    let lines = inspected["lines"].as_array().expect("lines");
    for line in &lines[1..] {
        let text = line.as_str().expect("line");
        assert!(text.ends_with(": Present") || text.ends_with(": Absent"), "{}", text);
    }

    let bad = request(
        &mut stdin,
        &mut reader,
        "6",
        "settings.update",
        json!({ "rosterScope": "school" }),
    );
    assert_eq!(error_code(&bad), Some("bad_params"));
    let unchanged = request_ok(&mut stdin, &mut reader, "7", "settings.get", json!({}));
    assert_eq!(unchanged["rosterScope"], "class");

    let _ = std::fs::remove_dir_all(downloads);
}

#[test]
fn export_failure_is_reported_and_state_kept() {
    let scratch = temp_dir("schoold-attendance-fail");
    let blocker = scratch.join("downloads");
    std::fs::write(&blocker, b"not a directory").expect("write blocker");
    let (_child, mut stdin, mut reader) = spawn_sidecar_with_env(&[(
        "SCHOOLD_DOWNLOADS_DIR",
        blocker.to_str().expect("utf8 path"),
    )]);

    let _ = request_ok(&mut stdin, &mut reader, "1", "nav.select", json!({ "key": "Kraków" }));
    let timetable = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "nav.select",
        json!({ "key": "Class 1" }),
    );
    let subject = row_keys(&timetable["view"])[0].clone();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "nav.select",
        json!({ "key": subject, "action": "attendance" }),
    );

    let failed = request(&mut stdin, &mut reader, "4", "nav.export", json!({}));
    assert_eq!(error_code(&failed), Some("export_failed"));
    assert_eq!(failed["error"]["message"], "Error downloading attendance");

    let current = request_ok(&mut stdin, &mut reader, "5", "nav.current", json!({}));
    assert_eq!(current["screen"]["screen"], "attendanceList");
    assert_eq!(current["depth"], 3);

    let moved = scratch.join("out");
    let selected = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "downloads.select",
        json!({ "path": moved.to_string_lossy() }),
    );
    assert!(selected["downloadsDir"].as_str().is_some());
    let exported = request_ok(&mut stdin, &mut reader, "7", "nav.export", json!({}));
    assert!(std::path::Path::new(exported["path"].as_str().expect("path")).is_file());

    let _ = std::fs::remove_dir_all(scratch);
}
