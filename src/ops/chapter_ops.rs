//! Chapter creation and JSON export/import.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{info, warn};

use crate::error::{ChapterError, ChapterResult};
use crate::store::{ChapterStore, Storage};
use crate::types::chapter::{Chapter, ChapterId, ChapterList};

/// File name offered for exported chapter lists.
pub const EXPORT_FILE_NAME: &str = "chapters.json";

/// Largest id that survives a round trip through a JSON number (2^53 - 1).
pub const MAX_CHAPTER_ID: ChapterId = (1 << 53) - 1;

/// Hands out chapter ids from the millisecond wall clock, never repeating
/// and never going backwards even when called within the same millisecond.
#[derive(Debug, Clone, Default)]
pub struct ChapterIdGenerator {
    last: ChapterId,
}

impl ChapterIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures future ids are larger than every id in `chapters`.
    pub fn observe(&mut self, chapters: &[Chapter]) {
        if let Some(max) = chapters.iter().map(|c| c.id).max() {
            self.last = self.last.max(max);
        }
    }

    pub fn next_id(&mut self) -> ChapterResult<ChapterId> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as ChapterId)
            .unwrap_or(0);
        let next = self
            .last
            .checked_add(1)
            .map(|bumped| now.max(bumped))
            .filter(|id| *id <= MAX_CHAPTER_ID)
            .ok_or(ChapterError::IdsExhausted)?;
        self.last = next;
        Ok(next)
    }
}

/// Checks a chapter range: finite, non-negative, and `start < end`.
pub fn validate_range(start: f64, end: f64) -> ChapterResult<()> {
    if !start.is_finite() || !end.is_finite() || start < 0.0 || start >= end {
        return Err(ChapterError::InvalidChapterRange { start, end });
    }
    Ok(())
}

/// Validates user input and builds a chapter with a fresh id.
pub fn validate_and_build(
    ids: &mut ChapterIdGenerator,
    title: &str,
    start: f64,
    end: f64,
) -> ChapterResult<Chapter> {
    if title.trim().is_empty() {
        return Err(ChapterError::MissingTitle);
    }
    validate_range(start, end)?;
    Ok(Chapter::new(ids.next_id()?, title, start, end))
}

/// Pretty-printed (2-space indent) JSON array of the chapters.
pub fn export_to_json(chapters: &[Chapter]) -> ChapterResult<String> {
    Ok(serde_json::to_string_pretty(chapters)?)
}

/// Parses an import document. Nothing is applied here; the whole document
/// is rejected if any entry is malformed.
pub fn parse_import(document: &str) -> ChapterResult<ChapterList> {
    let chapters: ChapterList = serde_json::from_str(document)
        .map_err(|e| ChapterError::MalformedImport(e.to_string()))?;

    let mut seen = HashSet::new();
    for (index, chapter) in chapters.iter().enumerate() {
        if validate_range(chapter.start, chapter.end).is_err() {
            return Err(ChapterError::MalformedImport(format!(
                "entry {index} has an invalid range {}..{}",
                chapter.start, chapter.end
            )));
        }
        if chapter.id > MAX_CHAPTER_ID {
            return Err(ChapterError::MalformedImport(format!(
                "entry {index} has an out-of-range id {}",
                chapter.id
            )));
        }
        if !seen.insert(chapter.id) {
            return Err(ChapterError::MalformedImport(format!(
                "duplicate chapter id {}",
                chapter.id
            )));
        }
    }
    Ok(chapters)
}

/// Editor-side operations over the store's chapter list.
#[derive(Debug, Default)]
pub struct ChapterEditor {
    ids: ChapterIdGenerator,
}

impl ChapterEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and appends a new chapter to the store's list.
    pub fn add_chapter<S: Storage>(
        &mut self,
        store: &mut ChapterStore<S>,
        title: &str,
        start: f64,
        end: f64,
    ) -> ChapterResult<Chapter> {
        self.ids.observe(store.chapters());
        let chapter = validate_and_build(&mut self.ids, title, start, end)?;

        let mut chapters = store.chapters().to_vec();
        chapters.push(chapter.clone());
        store.set_chapters(chapters);
        Ok(chapter)
    }

    pub fn export_json<S: Storage>(&self, store: &ChapterStore<S>) -> ChapterResult<String> {
        export_to_json(store.chapters())
    }

    /// Replaces the store's list with the imported one. On failure the
    /// existing list is left untouched.
    pub fn import_json<S: Storage>(
        &mut self,
        store: &mut ChapterStore<S>,
        document: &str,
    ) -> ChapterResult<usize> {
        let chapters = match parse_import(document) {
            Ok(chapters) => chapters,
            Err(e) => {
                warn!(error = %e, "Rejected chapter import");
                return Err(e);
            }
        };
        let count = chapters.len();
        self.ids.observe(&chapters);
        store.set_chapters(chapters);
        info!(count, "Imported chapters");
        Ok(count)
    }

    /// Writes `chapters.json` into `dir` and returns its path.
    pub fn export_to_file<S: Storage>(
        &self,
        store: &ChapterStore<S>,
        dir: &Path,
    ) -> ChapterResult<PathBuf> {
        let json = self.export_json(store)?;
        fs::create_dir_all(dir)?;
        let path = dir.join(EXPORT_FILE_NAME);
        fs::write(&path, json)?;
        info!(path = %path.display(), count = store.chapters().len(), "Exported chapters");
        Ok(path)
    }

    pub fn import_from_file<S: Storage>(
        &mut self,
        store: &mut ChapterStore<S>,
        path: &Path,
    ) -> ChapterResult<usize> {
        let document = fs::read_to_string(path)?;
        self.import_json(store, &document)
    }
}
