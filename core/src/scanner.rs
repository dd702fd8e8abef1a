use crate::tokenizer::tokenize;
use crate::vocabulary::Vocabulary;
use crate::{Error, KeywordCountTable, Result};
use std::fs;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// File extensions treated as project source files.
const SOURCE_EXTENSIONS: &[&str] = &[
    "c", "cc", "cpp", "cs", "go", "h", "hpp", "java", "js", "jsx", "kt",
    "m", "php", "py", "rb", "rs", "scala", "swift", "ts", "tsx",
];

/// Walks a project tree and aggregates keyword occurrence counts.
///
/// Every scan is a fresh, complete walk; nothing is cached between calls.
pub struct Scanner {
    vocabulary: Vocabulary,
}

impl Scanner {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Count keyword occurrences across every eligible source file under
    /// `root`. Fails with `NotFound` unless `root` is an existing directory;
    /// individual unreadable files are skipped, never fatal.
    pub fn scan(&self, root: &Path) -> Result<KeywordCountTable> {
        if !root.is_dir() {
            return Err(Error::NotFound(root.to_path_buf()));
        }

        let mut table = KeywordCountTable::new();
        let mut scanned: usize = 0;
        let mut skipped: usize = 0;

        // Symlinks are not followed, so link cycles cannot recurse.
        let walker = WalkDir::new(root).follow_links(false).into_iter();
        for entry in walker.filter_entry(|e| !is_hidden(e)) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(%err, "failed to read directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_source_file(entry.path()) {
                continue;
            }
            match fs::read_to_string(entry.path()) {
                Ok(text) => {
                    for token in tokenize(&text) {
                        if self.vocabulary.contains(token) {
                            *table.entry(token.to_string()).or_insert(0) += 1;
                        }
                    }
                    scanned += 1;
                }
                Err(err) => {
                    tracing::warn!(path = %entry.path().display(), %err, "skipping unreadable file");
                    skipped += 1;
                }
            }
        }

        tracing::info!(
            root = %root.display(),
            scanned,
            skipped,
            keywords = table.len(),
            "scan complete"
        );
        Ok(table)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SOURCE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}
