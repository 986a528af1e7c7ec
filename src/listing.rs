//! Flat labeled lists for every screen.
//!
//! All five screens share one shape: an ordered list of rows, each with a key
//! the frontend sends back on activation, a label and optional detail text.

use crate::config::RosterScope;
use crate::data::DataStore;
use crate::nav::Screen;
use crate::report::ReportKind;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RowAction {
    Open,
    Grades,
    Attendance,
}

impl RowAction {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "grades" => Some(Self::Grades),
            "attendance" => Some(Self::Attendance),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Grades => "grades",
            Self::Attendance => "attendance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ListKind {
    City,
    Class,
    Subject,
    Student,
    Attendance,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub key: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub actions: Vec<RowAction>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListView {
    pub title: String,
    pub kind: ListKind,
    pub rows: Vec<Row>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exportable: Option<ReportKind>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentError {
    NotFound(String),
    /// A student in scope has no entry for the subject. The generator
    /// guarantees this cannot happen, so it is reported as internal.
    MissingRecord { student: String, subject: String },
}

impl PresentError {
    pub fn code(&self) -> &'static str {
        match self {
            PresentError::NotFound(_) => "not_found",
            PresentError::MissingRecord { .. } => "internal_error",
        }
    }
}

impl fmt::Display for PresentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresentError::NotFound(what) => write!(f, "{} not found", what),
            PresentError::MissingRecord { student, subject } => {
                write!(f, "no record for student {:?} in subject {:?}", student, subject)
            }
        }
    }
}

impl std::error::Error for PresentError {}

/// Build rows from any item sequence. `describe` returns `(key, label, detail)`.
fn rows_of<T, F>(
    items: impl IntoIterator<Item = T>,
    actions: &[RowAction],
    mut describe: F,
) -> Result<Vec<Row>, PresentError>
where
    F: FnMut(T) -> Result<(String, String, Option<String>), PresentError>,
{
    items
        .into_iter()
        .map(|item| {
            let (key, label, detail) = describe(item)?;
            Ok(Row {
                key,
                label,
                detail,
                actions: actions.to_vec(),
            })
        })
        .collect()
}

fn plain(item: &String) -> Result<(String, String, Option<String>), PresentError> {
    Ok((item.clone(), item.clone(), None))
}

/// Students shown for a class, depending on the configured scope.
pub fn students_in_scope(
    store: &DataStore,
    city: &str,
    class_name: &str,
    scope: RosterScope,
) -> Vec<String> {
    match scope {
        RosterScope::Global => store.student_names(),
        RosterScope::Class => store.roster(city, class_name).unwrap_or_default(),
    }
}

pub fn join_grades(grades: &[u8]) -> String {
    grades
        .iter()
        .map(|g| g.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn present(
    store: &DataStore,
    screen: &Screen,
    scope: RosterScope,
) -> Result<ListView, PresentError> {
    match screen {
        Screen::CityList => Ok(ListView {
            title: "Cities".to_string(),
            kind: ListKind::City,
            rows: rows_of(store.cities(), &[RowAction::Open], plain)?,
            exportable: None,
        }),
        Screen::ClassList { city } => {
            let classes = store
                .classes(city)
                .ok_or_else(|| PresentError::NotFound(format!("city {:?}", city)))?;
            Ok(ListView {
                title: city.clone(),
                kind: ListKind::Class,
                rows: rows_of(classes, &[RowAction::Open], plain)?,
                exportable: None,
            })
        }
        Screen::Timetable { city, class_name } => {
            let subjects = subjects_of(store, city, class_name)?;
            Ok(ListView {
                title: class_name.clone(),
                kind: ListKind::Subject,
                rows: rows_of(
                    subjects,
                    &[RowAction::Grades, RowAction::Attendance],
                    plain,
                )?,
                exportable: None,
            })
        }
        Screen::StudentList {
            city,
            class_name,
            subject,
        } => {
            ensure_subject(store, city, class_name, subject)?;
            let students = students_in_scope(store, city, class_name, scope);
            let rows = rows_of(students, &[], |name: String| {
                let grades = store.grades(&name, subject).ok_or_else(|| {
                    PresentError::MissingRecord {
                        student: name.clone(),
                        subject: subject.clone(),
                    }
                })?;
                let detail = join_grades(grades);
                Ok((name.clone(), name, Some(detail)))
            })?;
            Ok(ListView {
                title: subject.clone(),
                kind: ListKind::Student,
                rows,
                exportable: Some(ReportKind::Grades),
            })
        }
        Screen::AttendanceList {
            city,
            class_name,
            subject,
        } => {
            ensure_subject(store, city, class_name, subject)?;
            let students = students_in_scope(store, city, class_name, scope);
            let rows = rows_of(students, &[], |name: String| {
                let present = store.attendance(&name, subject).ok_or_else(|| {
                    PresentError::MissingRecord {
                        student: name.clone(),
                        subject: subject.clone(),
                    }
                })?;
                let detail = if present { "Present" } else { "Absent" };
                Ok((name.clone(), name, Some(detail.to_string())))
            })?;
            Ok(ListView {
                title: subject.clone(),
                kind: ListKind::Attendance,
                rows,
                exportable: Some(ReportKind::Attendance),
            })
        }
    }
}

fn subjects_of<'a>(
    store: &'a DataStore,
    city: &str,
    class_name: &str,
) -> Result<&'a [String], PresentError> {
    store
        .subjects(city, class_name)
        .ok_or_else(|| PresentError::NotFound(format!("class {:?} in {:?}", class_name, city)))
}

fn ensure_subject(
    store: &DataStore,
    city: &str,
    class_name: &str,
    subject: &str,
) -> Result<(), PresentError> {
    subjects_of(store, city, class_name)?;
    if !store.has_subject(city, class_name, subject) {
        return Err(PresentError::NotFound(format!("subject {:?}", subject)));
    }
    Ok(())
}
