//! The ticket store: scan, allocate, create, update, validate, fix.
//!
//! Each operation runs to completion as one synchronous unit of work. The
//! store holds no ticket cache; the only persistent in-memory state is the
//! allocator's high-water mark, scoped to the store instance.
mod alloc;
mod error;
mod repair;
mod scan;
mod validate;

pub use alloc::IdAllocator;
pub use error::StoreError;
pub use scan::{max_id, scan, scan_documents, ScannedDoc};
pub use validate::Issue;

use crate::frontmatter;
use crate::ticket::{slug, Priority, Ticket, DEFAULT_STATUS, DEFAULT_TICKETS_DIR};
use serde::Deserialize;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Fields accepted by [`TicketStore::create`]; everything beyond `dir` and
/// `prefix` is merged over the ticket defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTicket {
    #[serde(default)]
    pub dir: Option<String>,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// Orchestrating façade over one site root.
///
/// Tickets directories are addressed by root-relative path strings; the
/// allocator is keyed by the resolved directory so different boards under
/// the same root get independent counters.
#[derive(Debug)]
pub struct TicketStore {
    root: PathBuf,
    allocator: IdAllocator,
}

impl TicketStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            allocator: IdAllocator::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan a tickets directory, refreshing the allocator's high-water mark
    /// as a side effect.
    pub fn list(&mut self, dir: &str) -> Result<Vec<Ticket>, StoreError> {
        let (dir_rel, dir_abs) = self.resolve_dir(dir)?;
        let tickets = scan::scan(&self.root, &dir_rel)?;
        let max_id = tickets.iter().map(|ticket| ticket.id).max().unwrap_or(0);
        self.allocator.observe(&dir_abs, max_id);
        Ok(tickets)
    }

    /// Create a new well-formed ticket with a freshly allocated id.
    pub fn create(&mut self, request: &CreateTicket) -> Result<Ticket, StoreError> {
        let dir_param = request.dir.as_deref().unwrap_or("");
        let (dir_rel, dir_abs) = self.resolve_dir(dir_param)?;
        fs::create_dir_all(&dir_abs)?;

        let id = self.allocator.allocate(&dir_abs)?;
        let title = request
            .title
            .clone()
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| "New ticket".to_string());
        let status = request
            .status
            .clone()
            .filter(|status| !status.is_empty())
            .unwrap_or_else(|| DEFAULT_STATUS.to_string());
        let priority = request
            .priority
            .as_deref()
            .map(Priority::parse)
            .unwrap_or_default();
        let body = request.body.clone().unwrap_or_default();

        let mut meta = serde_yaml::Mapping::new();
        frontmatter::set_field(&mut meta, "id", Value::Number(id.into()));
        frontmatter::set_field(&mut meta, "title", Value::String(title.clone()));
        frontmatter::set_field(&mut meta, "status", Value::String(status.clone()));
        frontmatter::set_field(
            &mut meta,
            "priority",
            Value::String(priority.as_str().to_string()),
        );
        frontmatter::set_field(
            &mut meta,
            "tags",
            Value::Sequence(
                request
                    .tags
                    .iter()
                    .map(|tag| Value::String(tag.clone()))
                    .collect(),
            ),
        );

        let stem = slug(id, request.prefix.as_deref());
        let path = dir_abs.join(format!("{stem}.md"));
        fs::write(&path, frontmatter::encode(&meta, &body)?)?;
        tracing::info!(id, path = %path.display(), "created ticket");

        Ok(Ticket {
            id,
            title,
            status,
            priority,
            tags: request.tags.clone(),
            body: body.trim().to_string(),
            url: format!("/{dir_rel}/{stem}.html"),
        })
    }

    /// Merge a patch into an existing document resolved from its url.
    ///
    /// The `body` key replaces the document body; every other key lands in
    /// the metadata block. The file is rewritten in place, never renamed,
    /// even when the patch changes `id` — the resulting mismatch is left
    /// for validate/fix.
    pub fn update(
        &self,
        url: &str,
        updates: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<(), StoreError> {
        let path = self.resolve_url(url)?;
        if !path.is_file() {
            return Err(StoreError::NotFound { path });
        }

        let raw = fs::read_to_string(&path)?;
        let mut doc = frontmatter::decode(&raw);
        for (key, value) in updates {
            if key == "body" {
                doc.body = match value.as_str() {
                    Some(text) => text.to_string(),
                    None => value.to_string(),
                };
            } else {
                frontmatter::set_field(&mut doc.meta, key, serde_yaml::to_value(value)?);
            }
        }
        fs::write(&path, frontmatter::encode(&doc.meta, &doc.body)?)?;
        Ok(())
    }

    /// Report every naming-invariant violation in a tickets directory.
    pub fn validate(&self, dir: &str, prefix: Option<&str>) -> Result<Vec<Issue>, StoreError> {
        let (_, dir_abs) = self.resolve_dir(dir)?;
        validate::validate(&dir_abs, prefix)
    }

    /// Repair every naming-invariant violation in a tickets directory.
    pub fn fix(&self, dir: &str, prefix: Option<&str>) -> Result<Vec<Issue>, StoreError> {
        let (_, dir_abs) = self.resolve_dir(dir)?;
        repair::fix(&dir_abs, prefix)
    }

    fn resolve_dir(&self, dir: &str) -> Result<(String, PathBuf), StoreError> {
        let dir = dir.trim().trim_matches('/');
        let dir = if dir.is_empty() {
            DEFAULT_TICKETS_DIR
        } else {
            dir
        };
        if dir.contains("..") || dir.contains('\\') {
            return Err(StoreError::BadRequest("invalid tickets directory"));
        }
        Ok((dir.to_string(), self.root.join(dir)))
    }

    fn resolve_url(&self, url: &str) -> Result<PathBuf, StoreError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(StoreError::BadRequest("missing url"));
        }
        if url.contains("..") || url.contains('\\') {
            return Err(StoreError::BadRequest("malformed url"));
        }
        let rel = url.strip_prefix('/').unwrap_or(url);
        let rel = rel
            .strip_suffix(".html")
            .ok_or(StoreError::BadRequest("url must end in .html"))?;
        if rel.is_empty() {
            return Err(StoreError::BadRequest("malformed url"));
        }
        Ok(self.root.join(format!("{rel}.md")))
    }
}
