//! Indexed, read-only problem store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use rand::seq::SliceRandom;

use scales_domain::error::{Error, Result};
use scales_domain::types::Difficulty;

use crate::loader;
use crate::model::Problem;

/// In-memory problem library, deduplicated by id and ordered
/// lexicographically.  Reads are safe to call concurrently.
pub struct ProblemStore {
    problems_root: PathBuf,
    problems: RwLock<BTreeMap<String, Arc<Problem>>>,
}

impl ProblemStore {
    /// Load every problem under `problems_root`.
    pub fn load(problems_root: &Path) -> Result<Self> {
        let scanned = loader::scan_problems(problems_root)?;
        let mut problems: BTreeMap<String, Arc<Problem>> = BTreeMap::new();
        for problem in scanned {
            // The same id under several pattern directories is one problem.
            problems
                .entry(problem.id.clone())
                .or_insert_with(|| Arc::new(problem));
        }
        tracing::info!(
            problems = problems.len(),
            path = %problems_root.display(),
            "problem store loaded"
        );
        Ok(Self {
            problems_root: problems_root.to_path_buf(),
            problems: RwLock::new(problems),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.problems.read().is_empty()
    }

    pub fn len(&self) -> usize {
        self.problems.read().len()
    }

    /// All problems, deduplicated, in lexicographic id order.
    pub fn list_all(&self) -> Vec<Arc<Problem>> {
        self.problems.read().values().cloned().collect()
    }

    pub fn get_by_id(&self, id: &str) -> Result<Arc<Problem>> {
        self.problems
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("problem '{id}'")))
    }

    /// pattern tag → problems carrying it, in id order.
    pub fn list_by_pattern(&self) -> BTreeMap<String, Vec<Arc<Problem>>> {
        let mut map: BTreeMap<String, Vec<Arc<Problem>>> = BTreeMap::new();
        for problem in self.problems.read().values() {
            for pattern in &problem.patterns {
                map.entry(pattern.clone()).or_default().push(problem.clone());
            }
        }
        map
    }

    pub fn list_by_difficulty(&self) -> BTreeMap<Difficulty, Vec<Arc<Problem>>> {
        let mut map: BTreeMap<Difficulty, Vec<Arc<Problem>>> = BTreeMap::new();
        for problem in self.problems.read().values() {
            map.entry(problem.difficulty).or_default().push(problem.clone());
        }
        map
    }

    pub fn list_by_company(&self) -> BTreeMap<String, Vec<Arc<Problem>>> {
        let mut map: BTreeMap<String, Vec<Arc<Problem>>> = BTreeMap::new();
        for problem in self.problems.read().values() {
            for company in &problem.companies {
                map.entry(company.clone()).or_default().push(problem.clone());
            }
        }
        map
    }

    /// Uniform random pick over the filtered set.
    pub fn random(
        &self,
        pattern: Option<&str>,
        difficulty: Option<Difficulty>,
    ) -> Result<Arc<Problem>> {
        let candidates: Vec<Arc<Problem>> = self
            .problems
            .read()
            .values()
            .filter(|p| pattern.map_or(true, |tag| p.has_pattern(tag)))
            .filter(|p| difficulty.map_or(true, |d| p.difficulty == d))
            .cloned()
            .collect();

        candidates
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| {
                Error::NoMatch(format!(
                    "pattern={} difficulty={}",
                    pattern.unwrap_or("any"),
                    difficulty.map(|d| d.tag()).unwrap_or("any"),
                ))
            })
    }

    /// Re-scan the problems root, replacing the in-memory index.
    pub fn reload(&self) -> Result<usize> {
        let scanned = loader::scan_problems(&self.problems_root)?;
        let mut problems: BTreeMap<String, Arc<Problem>> = BTreeMap::new();
        for problem in scanned {
            problems
                .entry(problem.id.clone())
                .or_insert_with(|| Arc::new(problem));
        }
        let count = problems.len();
        *self.problems.write() = problems;
        Ok(count)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal valid problem JSON for fixtures.
    pub(crate) fn problem_json(id: &str, pattern: &str, difficulty: &str) -> String {
        format!(
            r#"{{
  "id": "{id}",
  "title": "{id} title",
  "difficulty": "{difficulty}",
  "patterns": ["{pattern}"],
  "companies": ["acme"],
  "estimated_time": 15,
  "description": "desc",
  "examples": [{{"input": "[1]", "output": "[1]"}}],
  "constraints": ["n >= 1"],
  "pattern_explanation": "explained",
  "solution_walkthrough": ["step one"],
  "starter_code": {{"python": "def solve(x):\n    pass\n"}},
  "solutions": {{"python": "def solve(x):\n    return x\n"}},
  "test_cases": [{{"input": "[1]", "expected": "[1]"}}]
}}"#
        )
    }

    fn seed(root: &Path, id: &str, pattern: &str, difficulty: &str) {
        let dir = root.join(pattern);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("{id}.json")), problem_json(id, pattern, difficulty))
            .unwrap();
    }

    #[test]
    fn duplicate_ids_across_patterns_collapse() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path(), "alpha", "hash-map", "easy");
        seed(tmp.path(), "alpha", "two-pointers", "easy");
        seed(tmp.path(), "beta", "hash-map", "medium");
        let store = ProblemStore::load(tmp.path()).unwrap();
        assert_eq!(store.len(), 2);
        let ids: Vec<String> = store.list_all().iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, vec!["alpha", "beta"]);
    }

    #[test]
    fn get_by_id_miss_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ProblemStore::load(tmp.path()).unwrap();
        assert!(matches!(store.get_by_id("missing"), Err(Error::NotFound(_))));
    }

    #[test]
    fn by_pattern_index_covers_every_tag() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path(), "alpha", "hash-map", "easy");
        seed(tmp.path(), "beta", "dfs", "hard");
        let store = ProblemStore::load(tmp.path()).unwrap();
        let by_pattern = store.list_by_pattern();
        assert_eq!(by_pattern["hash-map"].len(), 1);
        assert_eq!(by_pattern["dfs"].len(), 1);
    }

    #[test]
    fn random_honors_filters() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path(), "alpha", "hash-map", "easy");
        seed(tmp.path(), "beta", "dfs", "hard");
        let store = ProblemStore::load(tmp.path()).unwrap();

        let picked = store.random(Some("dfs"), None).unwrap();
        assert_eq!(picked.id, "beta");

        let picked = store.random(None, Some(Difficulty::Easy)).unwrap();
        assert_eq!(picked.id, "alpha");

        assert!(matches!(
            store.random(Some("dfs"), Some(Difficulty::Easy)),
            Err(Error::NoMatch(_))
        ));
    }
}
