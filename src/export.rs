//! Build-time snapshot export.
//!
//! Walks the site root for board documents (`board: true` in frontmatter)
//! and emits one static JSON artifact per distinct referenced tickets
//! directory, containing the full scan result in wire format. The rendered
//! site reads these snapshots instead of the dev server.
use crate::frontmatter;
use crate::store::scan;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Export snapshots for every board under `root` into `out_dir`.
///
/// Directories are deduplicated: the first board document (in sorted walk
/// order) referencing a given tickets directory triggers its export. A board
/// pointing at a not-yet-created directory produces an empty snapshot, never
/// an error. Returns the written artifact paths.
pub fn export_snapshots(root: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let documents = collect_markdown_recursive(root)?;
    let mut seen: Vec<String> = Vec::new();
    let mut written = Vec::new();

    for path in documents {
        let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        let doc = frontmatter::decode(&raw);
        if !frontmatter::bool_field(&doc.meta, "board") {
            continue;
        }

        let tickets_dir = frontmatter::str_field(&doc.meta, "ticketsDir")
            .map(|dir| dir.trim().trim_matches('/').to_string())
            .filter(|dir| !dir.is_empty())
            .unwrap_or_else(|| crate::ticket::DEFAULT_TICKETS_DIR.to_string());

        // ticketsDir is relative to the board document's directory; express
        // it relative to the site root for scanning and url derivation.
        let board_dir = path.parent().unwrap_or(root);
        let dir_rel = match board_dir.strip_prefix(root) {
            Ok(rel) if rel.as_os_str().is_empty() => tickets_dir.clone(),
            Ok(rel) => format!("{}/{}", rel.to_string_lossy().replace('\\', "/"), tickets_dir),
            Err(_) => tickets_dir.clone(),
        };
        if seen.contains(&dir_rel) {
            continue;
        }
        seen.push(dir_rel.clone());

        let tickets = scan(root, &dir_rel)
            .with_context(|| format!("scan tickets directory {dir_rel}"))?;
        let artifact = out_dir.join(snapshot_name(&dir_rel));
        if let Some(parent) = artifact.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&tickets).context("serialize snapshot")?;
        fs::write(&artifact, json).with_context(|| format!("write {}", artifact.display()))?;
        tracing::info!(
            dir = %dir_rel,
            artifact = %artifact.display(),
            count = tickets.len(),
            "exported snapshot"
        );
        written.push(artifact);
    }
    Ok(written)
}

/// Deterministic artifact name for a tickets directory: path separators
/// become underscores, e.g. `docs/tickets` -> `docs_tickets.json`.
pub fn snapshot_name(dir_rel: &str) -> String {
    format!("{}.json", dir_rel.replace('/', "_"))
}

fn collect_markdown_recursive(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if !root.exists() {
        return Ok(files);
    }
    let mut entries = Vec::new();
    for entry in fs::read_dir(root).with_context(|| format!("read {}", root.display()))? {
        entries.push(entry?.path());
    }
    entries.sort();
    for path in entries {
        if path.is_dir() {
            files.extend(collect_markdown_recursive(&path)?);
        } else if path.extension().and_then(|ext| ext.to_str()) == Some("md") {
            files.push(path);
        }
    }
    Ok(files)
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
