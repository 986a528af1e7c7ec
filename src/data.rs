use crate::rng::SeededRng;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub const CITIES: [&str; 3] = ["Warszawa", "Kraków", "Rzeszów"];

pub const CLASS_NAMES: [&str; 8] = [
    "Class 1", "Class 2", "Class 3", "Class 4", "Class 5", "Class 6", "Class 7", "Class 8",
];

pub const SUBJECT_CATALOG: [&str; 12] = [
    "Mathematics",
    "Physics",
    "English",
    "History",
    "Geography",
    "Art",
    "Music",
    "Physical Education",
    "Computer Science",
    "Biology",
    "Chemistry",
    "German",
];

pub const FIRST_NAMES: [&str; 10] = [
    "Michał",
    "Paweł",
    "Karol",
    "Kacper",
    "Rysiu",
    "Radek",
    "Artur",
    "Maksymilian",
    "Krystian",
    "Adrian",
];

pub const LAST_NAMES: [&str; 10] = [
    "Urban",
    "Rzeszutek",
    "Łojszczyk",
    "Bucki",
    "Baran",
    "Połeć",
    "Kępa",
    "Pociask",
    "Kalita",
    "Krupa",
];

pub const STUDENTS_PER_CLASS: usize = 30;
pub const GRADES_PER_SUBJECT: usize = 4;
pub const MIN_GRADE: u8 = 1;
pub const MAX_GRADE: u8 = 5;
pub const PRESENT_PROBABILITY: f64 = 0.9;

/// A school class is only unique together with its city.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassKey {
    pub city: String,
    pub class_name: String,
}

impl ClassKey {
    pub fn new(city: &str, class_name: &str) -> Self {
        Self {
            city: city.to_string(),
            class_name: class_name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub name: String,
    /// Class the surviving record was generated under.
    pub home: ClassKey,
    pub grades: BTreeMap<String, Vec<u8>>,
    pub attendance: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSummary {
    pub cities: usize,
    pub classes: usize,
    pub subjects: usize,
    pub roster_entries: usize,
    pub unique_students: usize,
}

/// The whole mock dataset. Built once at startup, read-only afterwards.
///
/// Student records are keyed by full name across every city and class, so a
/// name generated twice keeps only the later record. Rosters still list every
/// name generated for a class.
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    cities: Vec<String>,
    classes: BTreeMap<String, Vec<String>>,
    subjects: HashMap<ClassKey, Vec<String>>,
    rosters: HashMap<ClassKey, Vec<String>>,
    students: BTreeMap<String, StudentRecord>,
}

impl DataStore {
    pub fn generate(rng: &mut SeededRng) -> Self {
        let mut store = DataStore::default();

        for city in CITIES {
            store.cities.push(city.to_string());
            let class_names: Vec<String> = CLASS_NAMES.iter().map(|c| c.to_string()).collect();
            for class_name in &class_names {
                let mut shuffled: Vec<String> =
                    SUBJECT_CATALOG.iter().map(|s| s.to_string()).collect();
                rng.shuffle(&mut shuffled);
                store
                    .subjects
                    .insert(ClassKey::new(city, class_name), shuffled);
            }
            store.classes.insert(city.to_string(), class_names);
        }

        for city in CITIES {
            for class_name in CLASS_NAMES {
                let key = ClassKey::new(city, class_name);
                let subjects = store.subjects.get(&key).cloned().unwrap_or_default();
                let mut roster = Vec::with_capacity(STUDENTS_PER_CLASS);
                for _ in 0..STUDENTS_PER_CLASS {
                    let record = generate_student(rng, &key, &subjects);
                    roster.push(record.name.clone());
                    store.students.insert(record.name.clone(), record);
                }
                store.rosters.insert(key, roster);
            }
        }

        tracing::debug!(
            cities = store.cities.len(),
            unique_students = store.students.len(),
            "generated mock dataset"
        );
        store
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn classes(&self, city: &str) -> Option<&[String]> {
        self.classes.get(city).map(|v| v.as_slice())
    }

    pub fn subjects(&self, city: &str, class_name: &str) -> Option<&[String]> {
        self.subjects
            .get(&ClassKey::new(city, class_name))
            .map(|v| v.as_slice())
    }

    pub fn has_subject(&self, city: &str, class_name: &str, subject: &str) -> bool {
        self.subjects(city, class_name)
            .map(|s| s.iter().any(|x| x == subject))
            .unwrap_or(false)
    }

    /// Names generated for one class, in generation order, without repeats.
    pub fn roster(&self, city: &str, class_name: &str) -> Option<Vec<String>> {
        let raw = self.rosters.get(&ClassKey::new(city, class_name))?;
        let mut out: Vec<String> = Vec::with_capacity(raw.len());
        for name in raw {
            if !out.contains(name) {
                out.push(name.clone());
            }
        }
        Some(out)
    }

    /// Every known student, sorted by name.
    pub fn student_names(&self) -> Vec<String> {
        self.students.keys().cloned().collect()
    }

    pub fn record(&self, student: &str) -> Option<&StudentRecord> {
        self.students.get(student)
    }

    pub fn grades(&self, student: &str, subject: &str) -> Option<&[u8]> {
        self.students
            .get(student)?
            .grades
            .get(subject)
            .map(|g| g.as_slice())
    }

    pub fn attendance(&self, student: &str, subject: &str) -> Option<bool> {
        self.students.get(student)?.attendance.get(subject).copied()
    }

    pub fn summary(&self) -> DataSummary {
        DataSummary {
            cities: self.cities.len(),
            classes: self.classes.values().map(|c| c.len()).sum(),
            subjects: self.subjects.values().map(|s| s.len()).sum(),
            roster_entries: self.rosters.values().map(|r| r.len()).sum(),
            unique_students: self.students.len(),
        }
    }

    #[cfg(test)]
    pub(crate) fn records(&self) -> impl Iterator<Item = &StudentRecord> {
        self.students.values()
    }

    #[cfg(test)]
    pub(crate) fn clear_students(&mut self) {
        self.students.clear();
        for roster in self.rosters.values_mut() {
            roster.clear();
        }
    }
}

fn generate_student(rng: &mut SeededRng, home: &ClassKey, subjects: &[String]) -> StudentRecord {
    let first = rng.choose(&FIRST_NAMES).copied().unwrap_or("Anon");
    let last = rng.choose(&LAST_NAMES).copied().unwrap_or("Anon");

    let mut grades = BTreeMap::new();
    let mut attendance = BTreeMap::new();
    for subject in subjects {
        let marks: Vec<u8> = (0..GRADES_PER_SUBJECT)
            .map(|_| rng.gen_range(u32::from(MIN_GRADE)..=u32::from(MAX_GRADE)) as u8)
            .collect();
        grades.insert(subject.clone(), marks);
        attendance.insert(subject.clone(), rng.gen_bool(PRESENT_PROBABILITY));
    }

    StudentRecord {
        name: format!("{} {}", first, last),
        home: home.clone(),
        grades,
        attendance,
    }
}
