use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name that holds candidate patterns instead of benchmarks.
pub const CANDIDATES_FILE: &str = "_candidates.txt";

#[derive(Debug, Clone)]
pub struct Corpus {
    pub root: PathBuf,
    pub benchmark_files: Vec<PathBuf>,
    pub candidate_files: Vec<PathBuf>,
}

impl Corpus {
    pub fn is_empty(&self) -> bool {
        self.benchmark_files.is_empty() && self.candidate_files.is_empty()
    }
}

fn is_txt(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "txt")
}

fn is_candidates_file(path: &Path) -> bool {
    path.file_name().is_some_and(|n| n == CANDIDATES_FILE)
}

fn is_private(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|n| n.to_string_lossy().starts_with('_'))
}

/// Find benchmark and candidate files under `root`.
///
/// `root` may also be a single benchmark file, in which case a
/// `_candidates.txt` next to it is picked up as well.
pub fn discover_corpus(root: &Path) -> Result<Corpus> {
    if !root.exists() {
        return Err(Error::ReadCorpus {
            path: root.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or directory"),
        });
    }

    let mut benchmark_files = Vec::new();
    let mut candidate_files = Vec::new();

    if root.is_file() {
        if is_candidates_file(root) {
            candidate_files.push(root.to_path_buf());
        } else {
            benchmark_files.push(root.to_path_buf());
            let sibling = root
                .parent()
                .map(|p| p.join(CANDIDATES_FILE))
                .filter(|p| p.is_file());
            candidate_files.extend(sibling);
        }
    } else {
        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() || !is_txt(path) {
                continue;
            }
            if is_candidates_file(path) {
                candidate_files.push(path.to_path_buf());
            } else if !is_private(path) {
                benchmark_files.push(path.to_path_buf());
            }
        }
    }

    tracing::debug!(
        root = %root.display(),
        benchmarks = benchmark_files.len(),
        candidates = candidate_files.len(),
        "discovered corpus files"
    );

    Ok(Corpus {
        root: root.to_path_buf(),
        benchmark_files,
        candidate_files,
    })
}
