//! Directory scanning into decoded documents and typed tickets.
//!
//! Entries are sorted lexicographically by filename so every downstream
//! consumer (listing, validation, repair) sees one deterministic order
//! regardless of platform `read_dir` behavior.
use super::error::StoreError;
use crate::frontmatter::{self, Document};
use crate::ticket::{ticket_from_document, Ticket};
use std::fs;
use std::path::{Path, PathBuf};

/// One scanned file: path, filename stem, and decoded document.
#[derive(Debug)]
pub struct ScannedDoc {
    pub path: PathBuf,
    pub file: String,
    pub stem: String,
    pub doc: Document,
}

/// List and decode every `*.md` directly inside `dir` (non-recursive).
///
/// A missing directory is an empty scan, not an error: a board may reference
/// a tickets directory that has not been created yet.
pub fn scan_documents(dir: &Path) -> Result<Vec<ScannedDoc>, StoreError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if !name.ends_with(".md") || !entry.path().is_file() {
            continue;
        }
        names.push(name);
    }
    names.sort();

    let mut docs = Vec::with_capacity(names.len());
    for name in names {
        let path = dir.join(&name);
        let raw = fs::read_to_string(&path)?;
        let stem = name.trim_end_matches(".md").to_string();
        docs.push(ScannedDoc {
            path,
            file: name,
            stem,
            doc: frontmatter::decode(&raw),
        });
    }
    Ok(docs)
}

/// Scan `dir` (relative to the site root) into wire-format tickets.
pub fn scan(root: &Path, dir: &str) -> Result<Vec<Ticket>, StoreError> {
    let docs = scan_documents(&root.join(dir))?;
    Ok(docs
        .iter()
        .map(|scanned| ticket_from_document(dir, &scanned.stem, &scanned.doc))
        .collect())
}

/// Highest ticket id found in `dir`, or 0 when empty or absent.
///
/// This is the authoritative basis for id allocation and is recomputed from
/// disk immediately before any write that claims a new id.
pub fn max_id(dir: &Path) -> Result<u64, StoreError> {
    let docs = scan_documents(dir)?;
    Ok(docs
        .iter()
        .map(|scanned| frontmatter::id_field(&scanned.doc.meta))
        .max()
        .unwrap_or(0))
}
