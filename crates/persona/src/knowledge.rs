//! Knowledge Loader
//!
//! Reads the persona's background documents once at startup: a plain-text
//! summary plus resume and profile PDFs. Nothing here is refreshed while the
//! process runs.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{PersonaError, Result};

/// Where the background documents live
#[derive(Clone, Debug)]
pub struct KnowledgeSources {
    pub summary: PathBuf,
    pub resume: PathBuf,
    pub profile: PathBuf,
}

impl Default for KnowledgeSources {
    fn default() -> Self {
        Self {
            summary: PathBuf::from("summary.txt"),
            resume: PathBuf::from("resume.pdf"),
            profile: PathBuf::from("Profile.pdf"),
        }
    }
}

impl KnowledgeSources {
    /// Defaults relative to the working directory, overridable with
    /// `PERSONA_SUMMARY_PATH`, `PERSONA_RESUME_PATH`, `PERSONA_PROFILE_PATH`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let path = |key: &str, default: PathBuf| {
            lookup(key)
                .filter(|p| !p.is_empty())
                .map_or(default, PathBuf::from)
        };

        Self {
            summary: path("PERSONA_SUMMARY_PATH", defaults.summary),
            resume: path("PERSONA_RESUME_PATH", defaults.resume),
            profile: path("PERSONA_PROFILE_PATH", defaults.profile),
        }
    }
}

/// The persona's background, as plain text
#[derive(Clone, Debug, Serialize)]
pub struct Knowledge {
    pub summary: String,
    pub resume: String,
    pub profile: String,
    pub loaded_at: DateTime<Utc>,
}

impl Knowledge {
    pub fn new(
        summary: impl Into<String>,
        resume: impl Into<String>,
        profile: impl Into<String>,
    ) -> Self {
        Self {
            summary: summary.into(),
            resume: resume.into(),
            profile: profile.into(),
            loaded_at: Utc::now(),
        }
    }
}

/// Load every source. Any missing or unreadable document fails the load.
pub fn load(sources: &KnowledgeSources) -> Result<Knowledge> {
    let summary = read_text(&sources.summary)?;
    let resume = read_pdf(&sources.resume)?;
    let profile = read_pdf(&sources.profile)?;

    tracing::info!(
        summary_chars = summary.len(),
        resume_chars = resume.len(),
        profile_chars = profile.len(),
        "Loaded persona knowledge"
    );

    Ok(Knowledge::new(summary, resume, profile))
}

/// Full contents of a UTF-8 text file
pub fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| PersonaError::startup_load(path, e))
}

/// Extractable text of every page, in page order
pub fn read_pdf(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| PersonaError::startup_load(path, e))?;
    let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes)
        .map_err(|e| PersonaError::startup_load(path, e))?;

    let text = join_pages(pages);
    if text.is_empty() {
        tracing::warn!(path = %path.display(), "Document has no extractable text");
    }
    Ok(text)
}

/// Pages with no text (image-only or blank) contribute nothing
fn join_pages(pages: impl IntoIterator<Item = String>) -> String {
    pages
        .into_iter()
        .filter(|page| !page.trim().is_empty())
        .collect()
}
