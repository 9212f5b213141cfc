//! Downloadable CSV artifacts built from extracted tables.
//!
//! The extractor only produces a blob; naming it and putting it somewhere is
//! done here, with the current time supplied by a [`Clock`] so callers and
//! tests decide what "now" is.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::table;

/// MIME type of exported tables.
pub const CSV_MIME: &str = "text/csv";

/// Prefix of exported file names.
pub const FILE_PREFIX: &str = "nova-table";

/// Errors that can occur while writing an artifact.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Export directory does not exist: {0}")]
    MissingDirectory(PathBuf),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Source of the local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// [`Clock`] reading the system time in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// [`Clock`] that always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// A CSV file ready to be offered to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvArtifact {
    pub file_name: String,
    pub mime: &'static str,
    pub contents: String,
}

impl CsvArtifact {
    /// Extracts the table in `reply` and names the result after the current
    /// time. Returns `None` when the reply has no table lines.
    pub fn from_reply(reply: &str, clock: &dyn Clock) -> Option<Self> {
        let contents = table::extract(reply)?;
        Some(Self {
            file_name: file_name_at(clock.now()),
            mime: CSV_MIME,
            contents,
        })
    }

    /// Writes the artifact into `dir` and returns the full path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        if !dir.is_dir() {
            return Err(ExportError::MissingDirectory(dir.to_path_buf()));
        }

        let path = dir.join(&self.file_name);
        std::fs::write(&path, self.contents.as_bytes()).map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::info!(path = %path.display(), bytes = self.contents.len(), "exported table");
        Ok(path)
    }
}

/// File name for an export made at `at`, e.g. `nova-table-20240131-235959.csv`.
pub fn file_name_at(at: NaiveDateTime) -> String {
    format!("{}-{}.csv", FILE_PREFIX, at.format("%Y%m%d-%H%M%S"))
}
