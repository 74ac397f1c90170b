//! Student profiles
//!
//! A profile keeps a snapshot of the student's course together with the
//! units they have completed, so eligibility can be answered offline. It is
//! stored as one JSON document; loading re-validates the course and the
//! completed set.

use std::collections::{BTreeSet, HashSet};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Course;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Student name is empty")]
    EmptyStudent,

    #[error("Unit not in course: {0}")]
    UnknownUnit(String),

    #[error("Unit already completed: {0}")]
    AlreadyCompleted(String),
}

/// A student enrolled in one course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProfileRecord", into = "ProfileRecord")]
pub struct Profile {
    pub student: String,
    pub course: Course,
    pub completed: BTreeSet<String>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(student: impl Into<String>, course: Course) -> Result<Self, ProfileError> {
        let student = student.into();
        if student.trim().is_empty() {
            return Err(ProfileError::EmptyStudent);
        }

        Ok(Self {
            student,
            course,
            completed: BTreeSet::new(),
            updated_at: Utc::now(),
        })
    }

    /// Marks a unit of the course as completed
    pub fn complete(&mut self, unit: &str) -> Result<(), ProfileError> {
        if !self.course.contains(unit) {
            return Err(ProfileError::UnknownUnit(unit.to_string()));
        }
        if !self.completed.insert(unit.to_string()) {
            return Err(ProfileError::AlreadyCompleted(unit.to_string()));
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Removes a unit from the completed set, returning whether it was there
    pub fn undo(&mut self, unit: &str) -> bool {
        let removed = self.completed.remove(unit);
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    /// Completed units as a lookup set for the eligibility resolver
    pub fn completed_set(&self) -> HashSet<String> {
        self.completed.iter().cloned().collect()
    }

    /// Credit hours of the completed units of the course
    pub fn completed_hours(&self) -> u32 {
        self.completed
            .iter()
            .filter_map(|name| self.course.unit(name))
            .map(|unit| unit.credit_hours())
            .sum()
    }
}

/// Serialized shape of a profile; checked like [`Profile::new`] and
/// [`Profile::complete`] on load
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProfileRecord {
    student: String,
    course: Course,
    completed: BTreeSet<String>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRecord> for Profile {
    type Error = ProfileError;

    fn try_from(record: ProfileRecord) -> Result<Self, Self::Error> {
        let mut profile = Profile::new(record.student, record.course)?;
        if let Some(unknown) = record.completed.iter().find(|name| !profile.course.contains(name)) {
            return Err(ProfileError::UnknownUnit(unknown.clone()));
        }
        profile.completed = record.completed;
        profile.updated_at = record.updated_at;
        Ok(profile)
    }
}

impl From<Profile> for ProfileRecord {
    fn from(profile: Profile) -> Self {
        Self {
            student: profile.student,
            course: profile.course,
            completed: profile.completed,
            updated_at: profile.updated_at,
        }
    }
}

/// Store for one profile file
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads the profile under a shared lock
    pub fn load(&self) -> Result<Profile> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open profile: {}", self.path.display()))?;

        file.lock_shared()
            .context("Failed to acquire read lock on profile")?;

        // Lock is released when file is dropped
        serde_json::from_reader(BufReader::new(&file))
            .with_context(|| format!("Failed to parse profile: {}", self.path.display()))
    }

    /// Writes the profile atomically (temp file + rename)
    pub fn save(&self, profile: &Profile) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let temp_path = self.path.with_extension("json.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .context("Failed to acquire write lock on profile")?;

            let mut writer = BufWriter::new(&file);
            serde_json::to_writer_pretty(&mut writer, profile)
                .context("Failed to serialize profile")?;
            writeln!(writer).context("Failed to write profile")?;
            writer.flush().context("Failed to flush profile")?;
        }

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })
    }
}
