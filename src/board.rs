//! Board document configuration.
//!
//! A board is any markdown document whose frontmatter carries `board: true`.
//! Its other keys configure the store for that board: `columns`,
//! `ticketsDir`, and `ticketPrefix`. Loading is best-effort — a missing or
//! unreadable board document falls back to the built-in defaults, because
//! the store must work before the user has written any board page.
use crate::frontmatter::{self, Document};
use crate::ticket::DEFAULT_TICKETS_DIR;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One board column: a status key plus display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub color: String,
}

/// Per-directory board configuration, loaded once per request or build and
/// never mutated by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub columns: Vec<Column>,
    pub tickets_dir: String,
    pub ticket_prefix: Option<String>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            tickets_dir: DEFAULT_TICKETS_DIR.to_string(),
            ticket_prefix: None,
        }
    }
}

/// Built-in columns used when a board document does not define any.
pub fn default_columns() -> Vec<Column> {
    [
        ("backlog", "Backlog", "#999999"),
        ("doing", "Doing", "#3b82f6"),
        ("done", "Done", "#22c55e"),
    ]
    .into_iter()
    .map(|(key, label, color)| Column {
        key: key.to_string(),
        label: label.to_string(),
        color: color.to_string(),
    })
    .collect()
}

/// Extract board configuration from a decoded document's metadata.
pub fn board_config_from_document(doc: &Document) -> BoardConfig {
    let mut config = BoardConfig::default();
    if let Some(dir) = frontmatter::str_field(&doc.meta, "ticketsDir") {
        if !dir.trim().is_empty() {
            config.tickets_dir = dir.trim().trim_matches('/').to_string();
        }
    }
    config.ticket_prefix =
        frontmatter::str_field(&doc.meta, "ticketPrefix").filter(|prefix| !prefix.is_empty());
    if let Some(value) = doc
        .meta
        .get(serde_yaml::Value::String("columns".to_string()))
    {
        if let Ok(columns) = serde_yaml::from_value::<Vec<Column>>(value.clone()) {
            if !columns.is_empty() {
                config.columns = columns;
            }
        }
    }
    config
}

/// Load the configuration from `<site_dir>/board.md`, defaulting on any
/// missing file or unreadable frontmatter.
pub fn load_board_config(site_dir: &Path) -> BoardConfig {
    let board_path = site_dir.join("board.md");
    match fs::read_to_string(&board_path) {
        Ok(raw) => board_config_from_document(&frontmatter::decode(&raw)),
        Err(_) => BoardConfig::default(),
    }
}
