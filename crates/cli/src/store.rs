//! Saved-test history on disk.
//!
//! Each language keeps its saved tests in one pretty-printed JSON array
//! (`./data/<lang>/tests.json` by default). Exam sessions live next to it,
//! one file per exam under `exams/`.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use quizrag_core::{AppConfig, AppError, AppResult, ExamSession, Language, SavedTest};

/// JSON store for one language's saved tests and exams.
pub struct TestStore {
    path: PathBuf,
}

impl TestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the configured storage path for `language`.
    pub fn for_language(config: &AppConfig, language: Language) -> Self {
        Self::new(config.storage_path(language))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All saved tests. A missing file is an empty history.
    pub fn load(&self) -> AppResult<Vec<SavedTest>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let tests: Vec<SavedTest> = serde_json::from_str(&content).map_err(|e| {
            AppError::Serialization(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;

        tracing::debug!("Loaded {} saved tests from {:?}", tests.len(), self.path);
        Ok(tests)
    }

    fn write(&self, tests: &[SavedTest]) -> AppResult<()> {
        write_atomic(&self.path, &serde_json::to_string_pretty(tests)?)
    }

    /// Append tests, renaming ids that are already taken.
    ///
    /// Returns the ids as stored.
    pub fn append(&self, tests: Vec<SavedTest>) -> AppResult<Vec<String>> {
        let mut all = self.load()?;
        let mut taken: HashSet<String> = all.iter().map(|t| t.id.clone()).collect();
        let mut stored = Vec::with_capacity(tests.len());

        for mut test in tests {
            if taken.contains(&test.id) {
                let base = test.id.clone();
                let mut n = 1;
                while taken.contains(&format!("{}_{}", base, n)) {
                    n += 1;
                }
                test.id = format!("{}_{}", base, n);
            }
            taken.insert(test.id.clone());
            stored.push(test.id.clone());
            all.push(test);
        }

        self.write(&all)?;
        tracing::info!("Saved {} tests to {:?}", stored.len(), self.path);
        Ok(stored)
    }

    pub fn get(&self, id: &str) -> AppResult<Option<SavedTest>> {
        Ok(self.load()?.into_iter().find(|t| t.id == id))
    }

    /// Remove a saved test. Returns false when the id was not stored.
    pub fn delete(&self, id: &str) -> AppResult<bool> {
        let mut all = self.load()?;
        let before = all.len();
        all.retain(|t| t.id != id);

        if all.len() == before {
            return Ok(false);
        }

        self.write(&all)?;
        tracing::debug!("Deleted saved test {}", id);
        Ok(true)
    }

    /// Directory holding exam sessions.
    pub fn exams_dir(&self) -> PathBuf {
        self.path
            .parent()
            .map(|dir| dir.join("exams"))
            .unwrap_or_else(|| PathBuf::from("exams"))
    }

    fn exam_path(&self, id: &str) -> PathBuf {
        self.exams_dir().join(format!("{}.json", id))
    }

    pub fn save_exam(&self, exam: &ExamSession) -> AppResult<PathBuf> {
        let path = self.exam_path(&exam.id);
        write_atomic(&path, &serde_json::to_string_pretty(exam)?)?;
        tracing::debug!("Wrote exam {} to {:?}", exam.id, path);
        Ok(path)
    }

    pub fn load_exam(&self, id: &str) -> AppResult<ExamSession> {
        let path = self.exam_path(id);
        if !path.exists() {
            return Err(AppError::InvalidInput(format!("Exam not found: {}", id)));
        }

        let content = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// All exams, oldest first.
    pub fn list_exams(&self) -> AppResult<Vec<ExamSession>> {
        let dir = self.exams_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut exams = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            match std::fs::read_to_string(&path)
                .map_err(AppError::from)
                .and_then(|content| Ok(serde_json::from_str::<ExamSession>(&content)?))
            {
                Ok(exam) => exams.push(exam),
                Err(e) => tracing::warn!("Skipping unreadable exam {:?}: {}", path, e),
            }
        }

        exams.sort_by_key(|exam| exam.created_at);
        Ok(exams)
    }
}

/// Replace `path` with `contents` through a synced temp file in the same
/// directory, so readers see either the old or the new file.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> AppResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| AppError::Io(e.error))?;
    Ok(())
}
