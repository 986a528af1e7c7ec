use crate::ipc::error::err;
use crate::ipc::types::{AppState, Request};
use crate::listing::{self, ListView, PresentError};
use crate::nav::Screen;
use serde::Serialize;
use serde_json::json;

pub fn required_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.to_string())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

pub fn optional_str(req: &Request, key: &str) -> Result<Option<String>, serde_json::Value> {
    match req.params.get(key) {
        None => Ok(None),
        Some(v) if v.is_null() => Ok(None),
        Some(v) => v
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| {
                err(
                    &req.id,
                    "bad_params",
                    format!("{} must be a string", key),
                    None,
                )
            }),
    }
}

/// `(city, className, subject)` from params.
pub fn subject_path(req: &Request) -> Result<(String, String, String), serde_json::Value> {
    Ok((
        required_str(req, "city")?,
        required_str(req, "className")?,
        required_str(req, "subject")?,
    ))
}

pub fn to_json<T: Serialize>(
    req: &Request,
    value: &T,
) -> Result<serde_json::Value, serde_json::Value> {
    serde_json::to_value(value).map_err(|e| err(&req.id, "internal_error", e.to_string(), None))
}

pub fn present_err(req: &Request, e: PresentError) -> serde_json::Value {
    if let PresentError::MissingRecord { student, subject } = &e {
        tracing::error!(%student, %subject, "student record missing subject");
        return err(
            &req.id,
            e.code(),
            e.to_string(),
            Some(json!({ "student": student, "subject": subject })),
        );
    }
    err(&req.id, e.code(), e.to_string(), None)
}

pub fn render(
    state: &AppState,
    req: &Request,
    screen: &Screen,
) -> Result<ListView, serde_json::Value> {
    listing::present(&state.store, screen, state.config.roster_scope)
        .map_err(|e| present_err(req, e))
}

/// Response body for a plain list request.
pub fn view_response(
    state: &AppState,
    req: &Request,
    screen: &Screen,
) -> Result<serde_json::Value, serde_json::Value> {
    let view = render(state, req, screen)?;
    to_json(req, &view)
}
