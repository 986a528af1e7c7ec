use crate::config::{AttendanceSource, RosterScope};
use crate::data::DataStore;
use crate::listing::{join_grades, students_in_scope, PresentError};
use crate::pdf::{PdfPage, A4_HEIGHT, A4_WIDTH};
use crate::rng::SeededRng;
use anyhow::Context;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const FONT_SIZE: f32 = 12.0;
pub const MARGIN_X: f32 = 50.0;
pub const TITLE_Y: f32 = 50.0;
pub const BODY_START_Y: f32 = 100.0;
pub const LINE_STEP: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportKind {
    Grades,
    Attendance,
}

impl ReportKind {
    pub fn suffix(self) -> &'static str {
        match self {
            ReportKind::Grades => "grades",
            ReportKind::Attendance => "attendance",
        }
    }

    fn heading(self) -> &'static str {
        match self {
            ReportKind::Grades => "Grades",
            ReportKind::Attendance => "Attendance",
        }
    }

    pub fn success_message(self, path: &Path) -> String {
        format!("{} downloaded: {}", self.heading(), path.to_string_lossy())
    }

    pub fn failure_message(self) -> String {
        format!("Error downloading {}", self.suffix())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    pub roster_scope: RosterScope,
    pub attendance_source: AttendanceSource,
}

#[derive(Debug, Clone)]
pub struct ReportDocument {
    pub kind: ReportKind,
    pub city: String,
    pub class_name: String,
    pub subject: String,
    pub title: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub path: PathBuf,
    pub file_name: String,
    pub bytes: usize,
    pub sha256: String,
    pub lines: usize,
}

impl ReportDocument {
    /// Title plus one line per student in scope.
    ///
    /// Fabricated attendance draws a new number per student on every call, so
    /// two exports of the same subject differ.
    pub fn build(
        store: &DataStore,
        city: &str,
        class_name: &str,
        subject: &str,
        kind: ReportKind,
        opts: ReportOptions,
        rng: &mut SeededRng,
    ) -> Result<Self, PresentError> {
        if store.subjects(city, class_name).is_none() {
            return Err(PresentError::NotFound(format!(
                "class {:?} in {:?}",
                class_name, city
            )));
        }
        if !store.has_subject(city, class_name, subject) {
            return Err(PresentError::NotFound(format!("subject {:?}", subject)));
        }

        let missing = |student: &str| PresentError::MissingRecord {
            student: student.to_string(),
            subject: subject.to_string(),
        };

        let mut lines = Vec::new();
        for name in students_in_scope(store, city, class_name, opts.roster_scope) {
            let line = match (kind, opts.attendance_source) {
                (ReportKind::Grades, _) => {
                    let grades = store
                        .grades(&name, subject)
                        .ok_or_else(|| missing(name.as_str()))?;
                    format!("{}: [{}]", name, join_grades(grades))
                }
                (ReportKind::Attendance, AttendanceSource::Fabricated) => {
                    format!("{}: {}", name, rng.gen_range(50..=100))
                }
                (ReportKind::Attendance, AttendanceSource::Recorded) => {
                    let present = store
                        .attendance(&name, subject)
                        .ok_or_else(|| missing(name.as_str()))?;
                    format!("{}: {}", name, if present { "Present" } else { "Absent" })
                }
            };
            lines.push(line);
        }

        Ok(Self {
            kind,
            city: city.to_string(),
            class_name: class_name.to_string(),
            subject: subject.to_string(),
            title: format!(
                "{} for {} - {} - {}",
                kind.heading(),
                city,
                class_name,
                subject
            ),
            lines,
        })
    }

    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_{}_{}.pdf",
            self.city,
            self.class_name,
            self.subject,
            self.kind.suffix()
        )
    }

    /// One A4 page. Body lines past the bottom edge are still drawn.
    pub fn render(&self) -> PdfPage {
        let mut page = PdfPage::new(A4_WIDTH, A4_HEIGHT);
        page.text(MARGIN_X, TITLE_Y, FONT_SIZE, self.title.clone());
        let mut y = BODY_START_Y;
        for line in &self.lines {
            page.text(MARGIN_X, y, FONT_SIZE, line.clone());
            y += LINE_STEP;
        }
        page
    }

    pub fn export(&self, dir: &Path) -> anyhow::Result<ExportSummary> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.to_string_lossy()))?;

        let file_name = self.file_name();
        let out_path = dir.join(&file_name);
        let tmp_path = dir.join(format!("{}.partial", file_name));
        let bytes = self.render().to_bytes();

        if let Err(e) = write_all(&tmp_path, &bytes) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e);
        }
        if let Err(e) = std::fs::rename(&tmp_path, &out_path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e).with_context(|| {
                format!("failed to move report to {}", out_path.to_string_lossy())
            });
        }

        let path = std::fs::canonicalize(&out_path).unwrap_or(out_path);
        let sha256 = format!("{:x}", Sha256::digest(&bytes));
        tracing::info!(
            path = %path.to_string_lossy(),
            bytes = bytes.len(),
            lines = self.lines.len(),
            "exported {} report",
            self.kind.suffix()
        );

        Ok(ExportSummary {
            path,
            file_name,
            bytes: bytes.len(),
            sha256,
            lines: self.lines.len() + 1,
        })
    }
}

/// The handle is dropped at the end of this function on every path.
fn write_all(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let mut f = File::create(path)
        .with_context(|| format!("failed to create output file {}", path.to_string_lossy()))?;
    f.write_all(bytes)
        .with_context(|| format!("failed to write {}", path.to_string_lossy()))?;
    f.sync_all()
        .with_context(|| format!("failed to flush {}", path.to_string_lossy()))?;
    Ok(())
}
