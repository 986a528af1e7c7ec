//! Screen state and back-navigation history.
//!
//! Each forward selection pushes the screen being left; `back` pops it. The
//! history is plain data so the frontend can ask for it and render
//! breadcrumbs.

use crate::data::DataStore;
use crate::listing::RowAction;
use crate::report::ReportKind;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "screen", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Screen {
    CityList,
    ClassList {
        city: String,
    },
    Timetable {
        city: String,
        class_name: String,
    },
    StudentList {
        city: String,
        class_name: String,
        subject: String,
    },
    AttendanceList {
        city: String,
        class_name: String,
        subject: String,
    },
}

impl Screen {
    /// `(city, class, subject)` and report kind for the two leaf screens.
    pub fn export_target(&self) -> Option<(&str, &str, &str, ReportKind)> {
        match self {
            Screen::StudentList {
                city,
                class_name,
                subject,
            } => Some((city, class_name, subject, ReportKind::Grades)),
            Screen::AttendanceList {
                city,
                class_name,
                subject,
            } => Some((city, class_name, subject, ReportKind::Attendance)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    NotSelectable,
    UnknownKey(String),
    UnknownAction(RowAction),
}

impl NavError {
    pub fn code(&self) -> &'static str {
        match self {
            NavError::NotSelectable => "not_selectable",
            NavError::UnknownKey(_) => "not_found",
            NavError::UnknownAction(_) => "bad_params",
        }
    }
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavError::NotSelectable => write!(f, "current screen has no selectable rows"),
            NavError::UnknownKey(k) => write!(f, "no row with key {:?} on this screen", k),
            NavError::UnknownAction(a) => {
                write!(f, "action {} is not available on this screen", a.as_str())
            }
        }
    }
}

impl std::error::Error for NavError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackOutcome {
    Restored(Screen),
    /// History was empty; the host decides what an empty back means.
    Fallthrough,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    current: Screen,
    history: Vec<Screen>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            current: Screen::CityList,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &Screen {
        &self.current
    }

    pub fn history(&self) -> &[Screen] {
        &self.history
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }

    /// Activate row `key` on the current screen. On error nothing changes.
    pub fn select(
        &mut self,
        store: &DataStore,
        key: &str,
        action: Option<RowAction>,
    ) -> Result<&Screen, NavError> {
        let next = next_screen(store, &self.current, key, action)?;
        let prev = std::mem::replace(&mut self.current, next);
        self.history.push(prev);
        tracing::debug!(depth = self.history.len(), screen = ?self.current, "navigated forward");
        Ok(&self.current)
    }

    pub fn back(&mut self) -> BackOutcome {
        match self.history.pop() {
            Some(prev) => {
                self.current = prev;
                BackOutcome::Restored(self.current.clone())
            }
            None => BackOutcome::Fallthrough,
        }
    }

    pub fn reset(&mut self) {
        self.current = Screen::CityList;
        self.history.clear();
    }
}

fn next_screen(
    store: &DataStore,
    current: &Screen,
    key: &str,
    action: Option<RowAction>,
) -> Result<Screen, NavError> {
    let unknown = || NavError::UnknownKey(key.to_string());
    match current {
        Screen::CityList => {
            expect_open(action)?;
            if !store.cities().iter().any(|c| c == key) {
                return Err(unknown());
            }
            Ok(Screen::ClassList {
                city: key.to_string(),
            })
        }
        Screen::ClassList { city } => {
            expect_open(action)?;
            let known = store
                .classes(city)
                .map(|cs| cs.iter().any(|c| c == key))
                .unwrap_or(false);
            if !known {
                return Err(unknown());
            }
            Ok(Screen::Timetable {
                city: city.clone(),
                class_name: key.to_string(),
            })
        }
        Screen::Timetable { city, class_name } => {
            if !store.has_subject(city, class_name, key) {
                return Err(unknown());
            }
            let (city, class_name, subject) = (city.clone(), class_name.clone(), key.to_string());
            match action {
                None | Some(RowAction::Grades) => Ok(Screen::StudentList {
                    city,
                    class_name,
                    subject,
                }),
                Some(RowAction::Attendance) => Ok(Screen::AttendanceList {
                    city,
                    class_name,
                    subject,
                }),
                Some(other) => Err(NavError::UnknownAction(other)),
            }
        }
        Screen::StudentList { .. } | Screen::AttendanceList { .. } => {
            Err(NavError::NotSelectable)
        }
    }
}

fn expect_open(action: Option<RowAction>) -> Result<(), NavError> {
    match action {
        None | Some(RowAction::Open) => Ok(()),
        Some(other) => Err(NavError::UnknownAction(other)),
    }
}
