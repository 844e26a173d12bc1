//! Name analysis against files already under the root.
//!
//! Scaffolding into a live tree tends to recreate files that already exist
//! under another directory, or near-misses of them (`PlayerController.h`
//! vs `Player_Controller.h`). The reconciler runs planned file names against
//! a scan of existing files and records [`PlanWarning`]s; it never blocks.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::plan::PlanWarning;

/// Tuning for the analysis pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisOptions {
    /// Similarity ratio at or above which a near-miss is reported.
    pub similarity_threshold: f64,
    /// Disable to skip the similarity pass entirely (duplicates still run).
    pub enable_similarity: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.86,
            enable_similarity: true,
        }
    }
}

/// Compare planned files against existing ones, producing warnings.
///
/// `existing` is plain data gathered by the caller (the core does no I/O).
/// An empty scan produces no warnings.
pub(crate) fn analyze(
    planned_files: &[PathBuf],
    existing: &[PathBuf],
    options: &AnalysisOptions,
) -> Vec<PlanWarning> {
    if existing.is_empty() {
        return Vec::new();
    }

    // Group existing paths by file name once.
    let mut by_name: HashMap<&str, Vec<&Path>> = HashMap::new();
    for path in existing {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            by_name.entry(name).or_default().push(path);
        }
    }

    let mut warnings = Vec::new();
    for planned in planned_files {
        let Some(name) = planned.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        // Same name under a different directory.
        if let Some(paths) = by_name.get(name) {
            let others: Vec<PathBuf> = paths
                .iter()
                .filter(|p| **p != planned.as_path())
                .map(|p| p.to_path_buf())
                .collect();
            if !others.is_empty() {
                warnings.push(PlanWarning::DuplicateName {
                    planned: planned.clone(),
                    existing: others,
                });
            }
        }

        if !options.enable_similarity {
            continue;
        }

        // Near-miss names; exact matches are covered above.
        let planned_norm = normalize_name(name);
        if planned_norm.is_empty() {
            continue;
        }
        let mut candidates: Vec<(&Path, f64)> = Vec::new();
        for (exist_name, paths) in &by_name {
            if *exist_name == name {
                continue;
            }
            let exist_norm = normalize_name(exist_name);
            if exist_norm.is_empty() {
                continue;
            }
            let ratio = name_similarity(&planned_norm, &exist_norm);
            if ratio >= options.similarity_threshold {
                for path in paths {
                    candidates.push((path, ratio));
                }
            }
        }
        candidates.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        for (path, ratio) in candidates {
            warnings.push(PlanWarning::SimilarName {
                planned: planned.clone(),
                existing: path.to_path_buf(),
                ratio,
            });
        }
    }

    warnings
}

/// Lowercase and strip everything but ASCII letters and digits.
fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Similarity of two strings as 2·matches / total length.
///
/// Matches are counted Ratcliff/Obershelp style: the longest common
/// substring, then recursively the pieces to its left and right. Equal
/// strings score 1.0, fully disjoint strings 0.0.
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (a_start, b_start, len) = longest_common_run(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..a_start], &b[..b_start])
        + matching_chars(&a[a_start + len..], &b[b_start + len..])
}

fn longest_common_run(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    if a.is_empty() || b.is_empty() {
        return best;
    }
    // run_ending[j] = length of the common run ending at a[i], b[j]
    let mut prev = vec![0usize; b.len()];
    for (i, ca) in a.iter().enumerate() {
        let mut current = vec![0usize; b.len()];
        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                let len = if j == 0 { 1 } else { prev[j - 1] + 1 };
                current[j] = len;
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            }
        }
        prev = current;
    }
    best
}
