//! Course document sources
//!
//! The graph builder never talks to the academic-records site itself. A
//! [`CourseSource`] hands it already-fetched documents; [`DirectorySource`]
//! reads pages saved to disk with the site's own layout:
//!
//! ```text
//! pages/
//! ├── view/1906.html          # /cursos/view/1906
//! └── prerequisito/1906.html  # /cursos/prerequisito/1906
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::builder::{BuildError, BuildOutcome, GraphBuilder};
use super::html;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Course {0} page has no title")]
    MissingTitle(u32),

    #[error("Course {0} has no prerequisite table")]
    MissingTable(u32),
}

/// Provider of the two documents describing a course
pub trait CourseSource {
    /// Returns true if the course id is known to the records site
    fn course_exists(&self, id: u32) -> Result<bool, SourceError>;

    /// Returns the display name of the course
    fn course_name(&self, id: u32) -> Result<String, SourceError>;

    /// Returns the prerequisite table rows, in document order
    fn prerequisite_rows(&self, id: u32) -> Result<Vec<Vec<String>>, SourceError>;
}

/// Source reading saved HTML pages from a directory
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the course view page
    pub fn view_path(&self, id: u32) -> PathBuf {
        self.root.join("view").join(format!("{}.html", id))
    }

    /// Path of the prerequisite table page
    pub fn table_path(&self, id: u32) -> PathBuf {
        self.root.join("prerequisito").join(format!("{}.html", id))
    }

    fn read(path: &Path) -> Result<String, SourceError> {
        fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl CourseSource for DirectorySource {
    fn course_exists(&self, id: u32) -> Result<bool, SourceError> {
        Ok(self.view_path(id).is_file())
    }

    fn course_name(&self, id: u32) -> Result<String, SourceError> {
        let page = Self::read(&self.view_path(id))?;
        html::course_title(&page).ok_or(SourceError::MissingTitle(id))
    }

    fn prerequisite_rows(&self, id: u32) -> Result<Vec<Vec<String>>, SourceError> {
        let path = self.table_path(id);
        if !path.is_file() {
            return Err(SourceError::MissingTable(id));
        }
        let page = Self::read(&path)?;
        Ok(html::table_rows(&page))
    }
}

/// Loads and builds one course from a source
///
/// The existence check runs before any document is parsed, so an unknown id
/// fails with [`BuildError::CourseNotFound`] without touching the table.
pub fn load_course<S: CourseSource + ?Sized>(
    source: &S,
    id: u32,
    builder: &GraphBuilder,
) -> Result<BuildOutcome, BuildError> {
    if !source.course_exists(id)? {
        return Err(BuildError::CourseNotFound(id));
    }

    let name = source.course_name(id)?;
    let rows = source.prerequisite_rows(id)?;
    debug!(course = id, name = %name, rows = rows.len(), "loaded course documents");

    builder.build(id, &name, &rows)
}
