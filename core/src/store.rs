use crate::vocabulary::Vocabulary;
use crate::{Error, KeywordCountTable, Result};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Component, Path, PathBuf};

const STORE_VERSION: u32 = 1;

/// Store-level metadata, written once when the store directory is created.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreMeta {
    pub version: u32,
    pub created_at: String,
}

/// One persisted index: the keyword counts for a single project, stamped
/// with the fingerprint of the vocabulary they were computed under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRecord {
    pub project_path: String,
    pub vocabulary_fingerprint: String,
    pub created_at: String,
    pub counts: KeywordCountTable,
}

/// Durable CRUD for per-project index records, keyed by normalized project
/// path. One record file per project under `records/`, committed by
/// write-to-temp-then-rename so readers never observe a partial write.
pub struct IndexStore {
    root: PathBuf,
    fingerprint: String,
}

impl IndexStore {
    /// Open a store rooted at `root`, creating the directory layout and
    /// `meta.json` on first use.
    pub fn open(root: impl AsRef<Path>, vocabulary: &Vocabulary) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("records"))?;

        let meta_path = root.join("meta.json");
        if meta_path.is_file() {
            let meta: StoreMeta = serde_json::from_str(&fs::read_to_string(&meta_path)?)?;
            if meta.version != STORE_VERSION {
                return Err(Error::UnsupportedVersion(meta.version));
            }
        } else {
            let meta = StoreMeta { version: STORE_VERSION, created_at: now_rfc3339() };
            let mut f = File::create(&meta_path)?;
            f.write_all(serde_json::to_string_pretty(&meta)?.as_bytes())?;
        }

        Ok(Self { root, fingerprint: vocabulary.fingerprint().to_string() })
    }

    fn record_path(&self, path: &Path) -> PathBuf {
        let mut hasher = Sha1::new();
        hasher.update(path.to_string_lossy().as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        self.root.join("records").join(format!("{digest}.bin"))
    }

    pub fn exists(&self, path: &Path) -> bool {
        self.record_path(path).is_file()
    }

    /// Persist `counts` for `path` only if no record exists yet. Returns
    /// `false`, leaving storage untouched, when one does.
    pub fn create(&self, path: &Path, counts: &KeywordCountTable) -> Result<bool> {
        if self.exists(path) {
            return Ok(false);
        }
        self.write_record(path, counts)?;
        tracing::debug!(path = %path.display(), "index record created");
        Ok(true)
    }

    /// Read the stored record for `path`; `NotFound` when none exists.
    pub fn read(&self, path: &Path) -> Result<IndexRecord> {
        let file = self.record_path(path);
        if !file.is_file() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let mut buf = Vec::new();
        File::open(&file)?.read_to_end(&mut buf)?;
        let record: IndexRecord = bincode::deserialize(&buf)?;
        if record.vocabulary_fingerprint != self.fingerprint {
            tracing::warn!(
                path = %path.display(),
                "stored index was built under a different vocabulary; rerun update to refresh it"
            );
        }
        Ok(record)
    }

    /// Overwrite whatever is stored for `path`, creating a record if absent.
    pub fn replace(&self, path: &Path, counts: &KeywordCountTable) -> Result<bool> {
        self.write_record(path, counts)?;
        tracing::debug!(path = %path.display(), "index record replaced");
        Ok(true)
    }

    /// Remove the record for `path`. Returns `false` when none existed.
    pub fn delete(&self, path: &Path) -> Result<bool> {
        let file = self.record_path(path);
        if !file.is_file() {
            return Ok(false);
        }
        fs::remove_file(&file)?;
        tracing::debug!(path = %path.display(), "index record deleted");
        Ok(true)
    }

    fn write_record(&self, path: &Path, counts: &KeywordCountTable) -> Result<()> {
        let record = IndexRecord {
            project_path: path.to_string_lossy().into_owned(),
            vocabulary_fingerprint: self.fingerprint.clone(),
            created_at: now_rfc3339(),
            counts: counts.clone(),
        };
        let bytes = bincode::serialize(&record)?;

        let file = self.record_path(path);
        let tmp = file.with_extension("bin.tmp");
        let mut f = File::create(&tmp)?;
        f.write_all(&bytes)?;
        f.sync_all()?;
        drop(f);
        fs::rename(&tmp, &file)?;
        Ok(())
    }
}

fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default()
}

/// Normalize a caller-supplied project path into the canonical key used for
/// storage and locking. Prefers the filesystem's canonical form so distinct
/// spellings of one location share a record; falls back to a lexical cleanup
/// when the path does not (or no longer) exist, so retrieve and delete keep
/// addressing the record of a removed project directory.
pub fn normalize_project_path(raw: &str) -> Result<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidPath("empty path".into()));
    }

    let path = Path::new(trimmed);
    if let Ok(canonical) = fs::canonicalize(path) {
        return Ok(canonical);
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn create_is_idempotent_and_read_round_trips() {
        let dir = tempdir().unwrap();
        let vocab = Vocabulary::new(["if"]);
        let store = IndexStore::open(dir.path().join("store"), &vocab).unwrap();

        let project = Path::new("/some/project");
        let mut counts = KeywordCountTable::new();
        counts.insert("if".to_string(), 3);

        assert!(store.create(project, &counts).unwrap());
        assert!(!store.create(project, &KeywordCountTable::new()).unwrap());
        assert_eq!(store.read(project).unwrap().counts, counts);
    }

    #[test]
    fn delete_on_absent_is_noop() {
        let dir = tempdir().unwrap();
        let vocab = Vocabulary::new(["if"]);
        let store = IndexStore::open(dir.path().join("store"), &vocab).unwrap();
        assert!(!store.delete(Path::new("/never/indexed")).unwrap());
    }

    #[test]
    fn normalization_rejects_empty_input() {
        assert!(matches!(
            normalize_project_path("   "),
            Err(Error::InvalidPath(_))
        ));
    }

    #[test]
    fn normalization_collapses_dot_components() {
        let a = normalize_project_path("/no/such/dir/./x").unwrap();
        let b = normalize_project_path("/no/such/dir/y/../x").unwrap();
        assert_eq!(a, b);
    }
}
