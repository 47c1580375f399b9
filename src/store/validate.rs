//! Consistency validation of a tickets directory.
//!
//! A ticket is well-formed iff its id is positive, unique within the
//! directory, and its filename stem equals the slug derived from that id.
//! Everything else becomes an [`Issue`] carrying a proposed minimal-change
//! repair. For a fixed directory snapshot the plan is fully deterministic:
//! the tie-break is the scanner's lexicographic filename order.
use super::error::StoreError;
use super::scan::scan_documents;
use crate::frontmatter;
use crate::ticket::slug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// One validator finding: a ticket's current filename/id pair and the
/// corrected pair a repair would apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub file: String,
    pub current_id: u64,
    pub current_slug: String,
    pub fixed_id: u64,
    pub fixed_slug: String,
}

/// Find every ticket in `dir` violating the naming invariant.
///
/// Returns an empty list iff all tickets are well-formed.
pub fn validate(dir: &Path, prefix: Option<&str>) -> Result<Vec<Issue>, StoreError> {
    let docs = scan_documents(dir)?;

    let ids: Vec<u64> = docs
        .iter()
        .map(|scanned| frontmatter::id_field(&scanned.doc.meta))
        .collect();
    let mut counts: HashMap<u64, usize> = HashMap::new();
    for &id in &ids {
        if id > 0 {
            *counts.entry(id).or_insert(0) += 1;
        }
    }

    // Ids held by well-formed tickets are reserved and never reassigned.
    let mut claimed: BTreeSet<u64> = BTreeSet::new();
    let mut broken = Vec::new();
    for (scanned, &id) in docs.iter().zip(&ids) {
        let duplicate = id > 0 && counts.get(&id).copied().unwrap_or(0) > 1;
        let missing = id == 0;
        let mismatched = id > 0 && !duplicate && scanned.stem != slug(id, prefix);
        if duplicate || missing || mismatched {
            broken.push((scanned, id));
        } else {
            claimed.insert(id);
        }
    }

    // Assign corrected ids in listing order. An issue keeps its own id when
    // that id is positive and still unclaimed (first holder of a duplicate,
    // prefix mismatches); otherwise it takes the smallest unclaimed id.
    let mut issues = Vec::with_capacity(broken.len());
    let mut next_free: u64 = 1;
    for (scanned, id) in broken {
        let fixed_id = if id > 0 && !claimed.contains(&id) {
            id
        } else {
            while claimed.contains(&next_free) {
                next_free += 1;
            }
            next_free
        };
        claimed.insert(fixed_id);
        issues.push(Issue {
            file: scanned.file.clone(),
            current_id: id,
            current_slug: scanned.stem.clone(),
            fixed_id,
            fixed_slug: slug(fixed_id, prefix),
        });
    }
    Ok(issues)
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
