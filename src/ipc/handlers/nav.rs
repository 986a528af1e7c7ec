use crate::ipc::error::{err, ok};
use crate::ipc::handlers::reports::export_report;
use crate::ipc::helpers::{optional_str, render, required_str, to_json};
use crate::ipc::types::{AppState, Request};
use crate::listing::RowAction;
use crate::nav::BackOutcome;
use serde_json::json;

/// Current screen, history depth and the rendered list, as one response body.
fn snapshot(state: &AppState, req: &Request) -> Result<serde_json::Value, serde_json::Value> {
    let screen = state.nav.current();
    let view = to_json(req, &render(state, req, screen)?)?;
    let screen = to_json(req, screen)?;
    Ok(json!({
        "screen": screen,
        "depth": state.nav.depth(),
        "view": view,
    }))
}

fn respond(state: &AppState, req: &Request) -> serde_json::Value {
    match snapshot(state, req) {
        Ok(v) => ok(&req.id, v),
        Err(e) => e,
    }
}

fn handle_nav_current(state: &mut AppState, req: &Request) -> serde_json::Value {
    respond(state, req)
}

fn handle_nav_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let key = match required_str(req, "key") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let action = match optional_str(req, "action") {
        Ok(None) => None,
        Ok(Some(raw)) => match RowAction::parse(&raw) {
            Some(a) => Some(a),
            None => {
                return err(
                    &req.id,
                    "bad_params",
                    "action must be one of: open, grades, attendance",
                    Some(json!({ "action": raw })),
                )
            }
        },
        Err(e) => return e,
    };

    if let Err(e) = state.nav.select(&state.store, &key, action) {
        return err(&req.id, e.code(), e.to_string(), Some(json!({ "key": key })));
    }
    respond(state, req)
}

fn handle_nav_back(state: &mut AppState, req: &Request) -> serde_json::Value {
    let fallthrough = matches!(state.nav.back(), BackOutcome::Fallthrough);
    if fallthrough {
        tracing::debug!("back with empty history; leaving it to the host");
    }
    match snapshot(state, req) {
        Ok(mut v) => {
            v["fallthrough"] = json!(fallthrough);
            ok(&req.id, v)
        }
        Err(e) => e,
    }
}

fn handle_nav_reset(state: &mut AppState, req: &Request) -> serde_json::Value {
    state.nav.reset();
    respond(state, req)
}

fn handle_nav_history(state: &mut AppState, req: &Request) -> serde_json::Value {
    let current = match to_json(req, state.nav.current()) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let history = match to_json(req, &state.nav.history()) {
        Ok(v) => v,
        Err(e) => return e,
    };
    ok(&req.id, json!({ "current": current, "history": history }))
}

fn handle_nav_export(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some((city, class_name, subject, kind)) = state
        .nav
        .current()
        .export_target()
        .map(|(c, k, s, kind)| (c.to_string(), k.to_string(), s.to_string(), kind))
    else {
        return err(
            &req.id,
            "not_exportable",
            "current screen has nothing to export",
            None,
        );
    };
    export_report(state, req, &city, &class_name, &subject, kind)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "nav.current" => Some(handle_nav_current(state, req)),
        "nav.select" => Some(handle_nav_select(state, req)),
        "nav.back" => Some(handle_nav_back(state, req)),
        "nav.reset" => Some(handle_nav_reset(state, req)),
        "nav.history" => Some(handle_nav_history(state, req)),
        "nav.export" => Some(handle_nav_export(state, req)),
        _ => None,
    }
}
