use crate::ipc::error::ok;
use crate::ipc::helpers::{subject_path, view_response};
use crate::ipc::types::{AppState, Request};
use crate::nav::Screen;

fn handle_attendance_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let (city, class_name, subject) = match subject_path(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let screen = Screen::AttendanceList {
        city,
        class_name,
        subject,
    };
    match view_response(state, req, &screen) {
        Ok(v) => ok(&req.id, v),
        Err(e) => e,
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "attendance.list" => Some(handle_attendance_list(state, req)),
        _ => None,
    }
}
