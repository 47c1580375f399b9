//! Markdown ticket board store.
//!
//! Tickets live as individual markdown documents with a YAML frontmatter
//! block; the filesystem is the single source of truth. This library holds
//! the store core (codec, scanner, allocator, validator, repair engine and
//! the orchestrating façade) plus the dev request surface and the build-time
//! snapshot exporter that consume it.
pub mod board;
pub mod cli;
pub mod export;
pub mod frontmatter;
pub mod server;
pub mod store;
pub mod ticket;
