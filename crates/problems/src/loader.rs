//! Filesystem scan of `<root>/problems/<pattern>/<id>.json`.

use std::path::Path;

use scales_domain::error::{Error, Result};
use scales_domain::trace::TraceEvent;

use crate::model::Problem;

/// Load and validate a single problem file.
pub fn load_problem(path: &Path) -> Result<Problem> {
    let raw = std::fs::read_to_string(path)?;
    let problem: Problem = serde_json::from_str(&raw).map_err(|e| Error::InvalidFormat {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    problem.validate().map_err(|message| Error::InvalidFormat {
        path: path.display().to_string(),
        message,
    })?;
    Ok(problem)
}

/// Scan the problems root and load every parseable problem file.
///
/// A missing root is an empty library, not an error.  A file that fails to
/// parse or validate is skipped with a warning; the scan never aborts.
/// Duplicates across pattern directories are expected; deduplication by id
/// happens in the store.
pub fn scan_problems(problems_root: &Path) -> Result<Vec<Problem>> {
    let mut problems = Vec::new();
    let mut files_seen = 0usize;
    let mut skipped = 0usize;

    if !problems_root.exists() {
        return Ok(problems);
    }

    for pattern_entry in std::fs::read_dir(problems_root)? {
        let pattern_dir = pattern_entry?.path();
        if !pattern_dir.is_dir() {
            continue;
        }
        for file_entry in std::fs::read_dir(&pattern_dir)? {
            let path = file_entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            files_seen += 1;
            match load_problem(&path) {
                Ok(problem) => problems.push(problem),
                Err(e) => {
                    skipped += 1;
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "skipping unloadable problem file"
                    );
                    TraceEvent::ProblemSkipped {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    }
                    .emit();
                }
            }
        }
    }

    TraceEvent::ProblemsLoaded {
        total: problems.len(),
        files_seen,
        skipped,
    }
    .emit();

    Ok(problems)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_root_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let problems = scan_problems(&tmp.path().join("nope")).unwrap();
        assert!(problems.is_empty());
    }

    #[test]
    fn malformed_file_is_skipped_not_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("hash-map");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("broken.json"), "{ not json").unwrap();
        std::fs::write(
            dir.join("ok.json"),
            crate::store::tests::problem_json("ok", "hash-map", "easy"),
        )
        .unwrap();
        let problems = scan_problems(tmp.path()).unwrap();
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].id, "ok");
    }

    #[test]
    fn single_load_reports_invalid_format() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.json");
        std::fs::write(&path, "{}").unwrap();
        assert!(matches!(
            load_problem(&path),
            Err(Error::InvalidFormat { .. })
        ));
    }
}
