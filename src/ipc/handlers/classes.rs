use crate::ipc::error::ok;
use crate::ipc::helpers::{required_str, view_response};
use crate::ipc::types::{AppState, Request};
use crate::nav::Screen;

fn respond(state: &AppState, req: &Request, screen: Screen) -> serde_json::Value {
    match view_response(state, req, &screen) {
        Ok(v) => ok(&req.id, v),
        Err(e) => e,
    }
}

fn handle_cities_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    respond(state, req, Screen::CityList)
}

fn handle_classes_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let city = match required_str(req, "city") {
        Ok(v) => v,
        Err(e) => return e,
    };
    respond(state, req, Screen::ClassList { city })
}

fn handle_subjects_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let city = match required_str(req, "city") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let class_name = match required_str(req, "className") {
        Ok(v) => v,
        Err(e) => return e,
    };
    respond(state, req, Screen::Timetable { city, class_name })
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "cities.list" => Some(handle_cities_list(state, req)),
        "classes.list" => Some(handle_classes_list(state, req)),
        "subjects.list" => Some(handle_subjects_list(state, req)),
        _ => None,
    }
}
