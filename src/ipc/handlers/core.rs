use crate::config::{AttendanceSource, RosterScope};
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{optional_str, required_str, to_json};
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use std::path::PathBuf;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "downloadsDir": state.config.downloads_dir.to_string_lossy(),
            "seed": state.seed,
        }),
    )
}

fn handle_data_summary(state: &mut AppState, req: &Request) -> serde_json::Value {
    match to_json(req, &state.store.summary()) {
        Ok(v) => ok(&req.id, v),
        Err(e) => e,
    }
}

fn handle_settings_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    match to_json(req, &state.config) {
        Ok(v) => ok(&req.id, v),
        Err(e) => e,
    }
}

fn handle_settings_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let scope = match optional_str(req, "rosterScope") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let source = match optional_str(req, "attendanceSource") {
        Ok(v) => v,
        Err(e) => return e,
    };

    // Validate everything before touching the config.
    let scope = match scope.as_deref().map(RosterScope::parse) {
        None => None,
        Some(Some(v)) => Some(v),
        Some(None) => {
            return err(
                &req.id,
                "bad_params",
                "rosterScope must be one of: global, class",
                Some(json!({ "rosterScope": scope })),
            )
        }
    };
    let source = match source.as_deref().map(AttendanceSource::parse) {
        None => None,
        Some(Some(v)) => Some(v),
        Some(None) => {
            return err(
                &req.id,
                "bad_params",
                "attendanceSource must be one of: fabricated, recorded",
                Some(json!({ "attendanceSource": source })),
            )
        }
    };

    if let Some(v) = scope {
        state.config.roster_scope = v;
    }
    if let Some(v) = source {
        state.config.attendance_source = v;
    }
    tracing::info!(
        roster_scope = ?state.config.roster_scope,
        attendance_source = ?state.config.attendance_source,
        "settings updated"
    );
    handle_settings_get(state, req)
}

fn handle_downloads_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let path = match required_str(req, "path") {
        Ok(v) => PathBuf::from(v),
        Err(e) => return e,
    };
    if let Err(e) = std::fs::create_dir_all(&path) {
        return err(
            &req.id,
            "io_failed",
            format!("cannot use {}: {}", path.to_string_lossy(), e),
            None,
        );
    }
    let path = std::fs::canonicalize(&path).unwrap_or(path);
    tracing::info!(path = %path.to_string_lossy(), "downloads directory selected");
    state.config.downloads_dir = path.clone();
    ok(&req.id, json!({ "downloadsDir": path.to_string_lossy() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "data.summary" => Some(handle_data_summary(state, req)),
        "settings.get" => Some(handle_settings_get(state, req)),
        "settings.update" => Some(handle_settings_update(state, req)),
        "downloads.select" => Some(handle_downloads_select(state, req)),
        _ => None,
    }
}
