//! Ticket wire types and slug derivation.
//!
//! A `Ticket` is derived fresh from its file on every scan; the filesystem is
//! the single source of truth and nothing here caches.
use crate::frontmatter::{self, Document};
use serde::{Deserialize, Serialize};

/// Status assigned to tickets whose metadata omits one.
pub const DEFAULT_STATUS: &str = "backlog";

/// Directory scanned when a request omits `dir`.
pub const DEFAULT_TICKETS_DIR: &str = "tickets";

/// Ticket priority; unknown strings fall back to `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Return the stable string used in frontmatter and JSON records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Parse a frontmatter value, recovering unknown input as the default.
    pub fn parse(raw: &str) -> Priority {
        match raw.trim() {
            "critical" => Priority::Critical,
            "high" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Medium,
        }
    }
}

/// One work-item record in wire format.
///
/// `id == 0` denotes an unassigned or corrupt identifier; the validator
/// reports such tickets as missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: u64,
    pub title: String,
    pub status: String,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub body: String,
    pub url: String,
}

/// Canonical filename stem for a ticket id under an optional prefix.
pub fn slug(id: u64, prefix: Option<&str>) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}-{id}"),
        _ => id.to_string(),
    }
}

/// Derive a ticket from a decoded document, applying field defaults.
///
/// `dir` is the directory path relative to the site root (forward slashes),
/// used only for the derived `url`.
pub fn ticket_from_document(dir: &str, stem: &str, doc: &Document) -> Ticket {
    let title = frontmatter::str_field(&doc.meta, "title").unwrap_or_else(|| stem.to_string());
    let status =
        frontmatter::str_field(&doc.meta, "status").unwrap_or_else(|| DEFAULT_STATUS.to_string());
    let priority = frontmatter::str_field(&doc.meta, "priority")
        .map(|raw| Priority::parse(&raw))
        .unwrap_or_default();
    Ticket {
        id: frontmatter::id_field(&doc.meta),
        title,
        status,
        priority,
        tags: frontmatter::tags_field(&doc.meta),
        body: doc.body.trim().to_string(),
        url: format!("/{dir}/{stem}.html"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::decode;

    #[test]
    fn slug_uses_prefix_when_configured() {
        assert_eq!(slug(7, None), "7");
        assert_eq!(slug(7, Some("")), "7");
        assert_eq!(slug(7, Some("PROJ")), "PROJ-7");
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let doc = decode("No metadata at all.\n");
        let ticket = ticket_from_document("tickets", "scratch", &doc);
        assert_eq!(ticket.id, 0);
        assert_eq!(ticket.title, "scratch");
        assert_eq!(ticket.status, DEFAULT_STATUS);
        assert_eq!(ticket.priority, Priority::Medium);
        assert!(ticket.tags.is_empty());
        assert_eq!(ticket.body, "No metadata at all.");
        assert_eq!(ticket.url, "/tickets/scratch.html");
    }

    #[test]
    fn unknown_priority_recovers_to_medium() {
        let doc = decode("---\nid: 1\npriority: urgent\n---\nx\n");
        let ticket = ticket_from_document("tickets", "1", &doc);
        assert_eq!(ticket.priority, Priority::Medium);
    }
}
