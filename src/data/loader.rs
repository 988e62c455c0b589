// ============================================================
// Layer 4 — Session Folder Loader
// ============================================================
// Reads the transcript corpus from disk.
//
// Expected layout:
//   <corpus>/
//     Session 01 - 1946/
//       AFG_01_1946.txt
//       ALB_01_1946.txt
//       ...
//     Session 02 - 1947/
//       ...
//
// One session per year, numbered from 1946 (session 01), so the
// folder for a year is "Session {year - 1945:02} - {year}".
// The first three characters of a file name are the country
// code, which becomes the document id.
//
// Only *.txt files are read. A file that cannot be read (bad
// permissions, invalid UTF-8) is an error for that document
// only; enumeration itself never fails because of one file.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use regex::Regex;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::document::{Document, DocumentKey};
use crate::domain::traits::{CorpusSource, DocumentEntry, SessionListing};

/// The year numbered as session 01.
pub const FIRST_SESSION_YEAR: i32 = 1946;

/// Loads transcripts from "Session NN - YYYY" folders.
pub struct SessionFolderSource {
    /// Directory containing the session folders
    root: PathBuf,
    folder_pattern: Regex,
}

impl SessionFolderSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            folder_pattern: Regex::new(r"^Session (\d{2,}) - (\d{4})$")
                .expect("session folder pattern is a valid regex"),
        }
    }

    /// Session number for a year, zero-padded to two digits.
    /// None for years before the first session.
    pub fn session_id_for(year: i32) -> Option<String> {
        let number = year.checked_sub(FIRST_SESSION_YEAR)?.checked_add(1)?;
        (number >= 1).then(|| format!("{:02}", number))
    }

    /// Folder where the session for `year` is expected to live.
    pub fn session_dir(&self, year: i32) -> Option<PathBuf> {
        let session_id = Self::session_id_for(year)?;
        Some(self.root.join(format!("Session {} - {}", session_id, year)))
    }

    /// Parse (session_id, year) out of a folder name.
    fn parse_folder(&self, name: &str) -> Option<(String, i32)> {
        let caps = self.folder_pattern.captures(name)?;
        let year = caps[2].parse().ok()?;
        Some((caps[1].to_string(), year))
    }

    /// Every session folder under the root as (year, session_id, path).
    fn scan(&self) -> Result<Vec<(i32, String, PathBuf)>> {
        let mut found = Vec::new();

        for entry in fs::read_dir(&self.root)
            .with_context(|| format!("Cannot read corpus directory '{}'", self.root.display()))?
        {
            let entry = entry?;
            let path  = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some((session_id, year)) = self.parse_folder(name) {
                found.push((year, session_id, path));
            }
        }

        found.sort();
        Ok(found)
    }

    /// Locate the folder for `year`: the conventional name first,
    /// then any folder whose name carries that year.
    fn locate(&self, year: i32) -> Result<Option<(String, PathBuf)>> {
        if let (Some(session_id), Some(expected)) = (Self::session_id_for(year), self.session_dir(year)) {
            if expected.is_dir() {
                return Ok(Some((session_id, expected)));
            }
        }
        if !self.root.is_dir() {
            return Ok(None);
        }
        Ok(self
            .scan()?
            .into_iter()
            .find(|(y, _, _)| *y == year)
            .map(|(_, session_id, path)| (session_id, path)))
    }
}

/// Country code from a transcript file name ("AFG_01_1946.txt" → "AFG").
fn country_code(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let code: String = stem.chars().take(3).collect();
    if code.is_empty() { None } else { Some(code) }
}

impl CorpusSource for SessionFolderSource {
    fn years(&self) -> Result<Vec<i32>> {
        if !self.root.is_dir() {
            tracing::warn!(
                "Corpus directory '{}' does not exist, returning no years",
                self.root.display()
            );
            return Ok(Vec::new());
        }
        let mut years: Vec<i32> = self.scan()?.into_iter().map(|(y, _, _)| y).collect();
        years.dedup();
        Ok(years)
    }

    fn session(&self, year: i32) -> Result<Option<SessionListing>> {
        let Some((session_id, dir)) = self.locate(year)? else {
            return Ok(None);
        };

        let mut entries = Vec::new();
        for entry in fs::read_dir(&dir)
            .with_context(|| format!("Cannot read session folder '{}'", dir.display()))?
        {
            let path = entry?.path();

            // Only process files with the .txt extension
            if path.extension().and_then(|e| e.to_str()) != Some("txt") || !path.is_file() {
                continue;
            }
            match country_code(&path) {
                Some(code) => entries.push(DocumentEntry {
                    key:      DocumentKey::new(year, session_id.clone(), code),
                    location: path,
                }),
                None => tracing::warn!("Skipping '{}': no country code in name", path.display()),
            }
        }

        // read_dir order is platform dependent
        entries.sort_by(|a, b| a.location.cmp(&b.location));

        tracing::debug!("Session {} ({}) has {} documents", session_id, year, entries.len());
        Ok(Some(SessionListing { year, session_id, entries }))
    }

    fn read(&self, entry: &DocumentEntry) -> Result<Document> {
        let text = fs::read_to_string(&entry.location)
            .with_context(|| format!("Cannot read '{}'", entry.location.display()))?;
        Ok(Document::new(entry.key.clone(), text))
    }
}
