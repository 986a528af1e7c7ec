use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{present_err, required_str, subject_path, to_json};
use crate::ipc::types::{AppState, Request};
use crate::pdf;
use crate::report::{ReportDocument, ReportKind, ReportOptions};
use serde_json::json;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Build and write one report into the downloads directory.
///
/// Write failures come back as `export_failed` with the short user-facing
/// message; the cause goes to the log and into `details`.
pub fn export_report(
    state: &mut AppState,
    req: &Request,
    city: &str,
    class_name: &str,
    subject: &str,
    kind: ReportKind,
) -> serde_json::Value {
    let opts = ReportOptions {
        roster_scope: state.config.roster_scope,
        attendance_source: state.config.attendance_source,
    };
    let doc = match ReportDocument::build(
        &state.store,
        city,
        class_name,
        subject,
        kind,
        opts,
        &mut state.rng,
    ) {
        Ok(d) => d,
        Err(e) => return present_err(req, e),
    };

    match doc.export(&state.config.downloads_dir) {
        Ok(summary) => {
            let mut body = match to_json(req, &summary) {
                Ok(v) => v,
                Err(e) => return e,
            };
            body["title"] = json!(doc.title);
            body["message"] = json!(kind.success_message(&summary.path));
            ok(&req.id, body)
        }
        Err(e) => {
            tracing::warn!(
                error = %format!("{e:#}"),
                file = %doc.file_name(),
                "report export failed"
            );
            err(
                &req.id,
                "export_failed",
                kind.failure_message(),
                Some(json!({ "cause": format!("{e:#}") })),
            )
        }
    }
}

fn handle_export(state: &mut AppState, req: &Request, kind: ReportKind) -> serde_json::Value {
    let (city, class_name, subject) = match subject_path(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    export_report(state, req, &city, &class_name, &subject, kind)
}

/// A missing file is `not_found`; any other read failure is `io_failed`.
fn read_err(req: &Request, e: std::io::Error, what: &str) -> serde_json::Value {
    let code = if e.kind() == ErrorKind::NotFound {
        "not_found"
    } else {
        "io_failed"
    };
    err(&req.id, code, format!("cannot read {}: {}", what, e), None)
}

/// Resolve `raw` against the downloads directory. Relative paths are taken
/// from inside it; anything that resolves outside it is refused.
fn resolve_in_downloads(
    req: &Request,
    downloads: &Path,
    raw: &str,
) -> Result<PathBuf, serde_json::Value> {
    let root = std::fs::canonicalize(downloads)
        .map_err(|e| read_err(req, e, &downloads.to_string_lossy()))?;
    let requested = Path::new(raw);
    let requested = if requested.is_absolute() {
        requested.to_path_buf()
    } else {
        root.join(requested)
    };
    let resolved = std::fs::canonicalize(&requested).map_err(|e| read_err(req, e, raw))?;
    if !resolved.starts_with(&root) {
        tracing::warn!(path = %raw, "refused to read outside the downloads directory");
        return Err(err(
            &req.id,
            "bad_params",
            "path is outside the downloads directory",
            Some(json!({ "path": raw, "downloadsDir": root.to_string_lossy() })),
        ));
    }
    Ok(resolved)
}

fn handle_reports_inspect(state: &mut AppState, req: &Request) -> serde_json::Value {
    let raw = match required_str(req, "path") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let path = match resolve_in_downloads(req, &state.config.downloads_dir, &raw) {
        Ok(p) => p,
        Err(e) => return e,
    };
    match std::fs::read(&path) {
        Ok(bytes) => ok(
            &req.id,
            json!({ "path": path.to_string_lossy(), "lines": pdf::extract_text(&bytes) }),
        ),
        Err(e) => read_err(req, e, &path.to_string_lossy()),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "reports.gradesPdf" => Some(handle_export(state, req, ReportKind::Grades)),
        "reports.attendancePdf" => Some(handle_export(state, req, ReportKind::Attendance)),
        "reports.inspect" => Some(handle_reports_inspect(state, req)),
        _ => None,
    }
}
