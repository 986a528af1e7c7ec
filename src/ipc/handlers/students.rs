use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{required_str, subject_path, to_json, view_response};
use crate::ipc::types::{AppState, Request};
use crate::nav::Screen;

fn handle_students_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let (city, class_name, subject) = match subject_path(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let screen = Screen::StudentList {
        city,
        class_name,
        subject,
    };
    match view_response(state, req, &screen) {
        Ok(v) => ok(&req.id, v),
        Err(e) => e,
    }
}

/// Full record for one name, including the class it was generated under.
fn handle_students_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let name = match required_str(req, "name") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some(record) = state.store.record(&name) else {
        return err(&req.id, "not_found", format!("student {:?} not found", name), None);
    };
    match to_json(req, record) {
        Ok(v) => ok(&req.id, v),
        Err(e) => e,
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_students_list(state, req)),
        "students.get" => Some(handle_students_get(state, req)),
        _ => None,
    }
}
