//! Applies a validator repair plan to a tickets directory.
//!
//! Order of operations is read-all, write-all, then remove stale files: an
//! issue's corrected filename may collide with another issue's current file
//! (`1.md {id: 5}` next to an id-less `5.md`), so every affected document is
//! decoded before the first write, and an old file is only removed when the
//! pass did not itself write it. The corrected documents always exist on disk
//! before anything is deleted, so a crash mid-repair can leave extra files
//! behind (which the next validate pass reports again) but never loses data.
use super::error::StoreError;
use super::validate::{validate, Issue};
use crate::frontmatter;
use serde_yaml::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Repair every invariant violation in `dir`; returns the applied plan.
///
/// With no violations this performs no filesystem writes, so a second
/// consecutive call always returns an empty list.
pub fn fix(dir: &Path, prefix: Option<&str>) -> Result<Vec<Issue>, StoreError> {
    let issues = validate(dir, prefix)?;

    let mut docs = Vec::with_capacity(issues.len());
    for issue in &issues {
        let raw = fs::read_to_string(dir.join(&issue.file))?;
        docs.push(frontmatter::decode(&raw));
    }

    let written: HashSet<PathBuf> = issues
        .iter()
        .map(|issue| dir.join(format!("{}.md", issue.fixed_slug)))
        .collect();

    for (issue, mut doc) in issues.iter().zip(docs) {
        frontmatter::set_field(&mut doc.meta, "id", Value::Number(issue.fixed_id.into()));
        let new_path = dir.join(format!("{}.md", issue.fixed_slug));
        fs::write(&new_path, frontmatter::encode(&doc.meta, &doc.body)?)?;
        tracing::info!(
            file = %issue.file,
            fixed_id = issue.fixed_id,
            fixed_slug = %issue.fixed_slug,
            "repaired ticket"
        );
    }

    for issue in &issues {
        let old_path = dir.join(&issue.file);
        if !written.contains(&old_path) && old_path.exists() {
            fs::remove_file(&old_path)?;
        }
    }
    Ok(issues)
}

#[cfg(test)]
#[path = "repair_tests.rs"]
mod tests;
