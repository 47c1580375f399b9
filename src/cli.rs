//! CLI argument parsing for the ticket store.
//!
//! The CLI is intentionally thin: every subcommand routes straight into the
//! store so the same core logic serves the dev server and the exporter.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default port for the development server.
pub const DEFAULT_PORT: u16 = 5174;

/// Root CLI entrypoint for the ticket store.
#[derive(Parser, Debug)]
#[command(
    name = "tkb",
    version,
    about = "Markdown ticket board: store, repair tooling, dev server",
    after_help = "Examples:\n  tkb ticket \"Fix login flow\" --priority high --tags auth,ui\n  tkb list --dir tickets --json\n  tkb validate --dir tickets --prefix PROJ\n  tkb fix --dir tickets --prefix PROJ\n  tkb serve --root docs --port 5174\n  tkb export --root docs --out dist/data",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new ticket with a freshly allocated sequential id
    Ticket(TicketArgs),
    /// List tickets in a directory
    List(ListArgs),
    /// Report tickets violating the id/filename naming invariant
    Validate(ValidateArgs),
    /// Repair every naming-invariant violation
    Fix(FixArgs),
    /// Serve the ticket API for local development
    Serve(ServeArgs),
    /// Export static ticket snapshots for every board document
    Export(ExportArgs),
}

/// Ticket creation inputs.
#[derive(Parser, Debug)]
#[command(about = "Create a new ticket")]
pub struct TicketArgs {
    /// Ticket title
    pub title: String,

    /// Tickets directory, relative to the current directory
    #[arg(long, value_name = "DIR", default_value = "tickets")]
    pub dir: String,

    /// Initial status (column key)
    #[arg(long, value_name = "STATUS")]
    pub status: Option<String>,

    /// Priority: critical, high, medium, low
    #[arg(long, value_name = "PRI")]
    pub priority: Option<String>,

    /// Comma-separated tags
    #[arg(long, value_name = "TAGS")]
    pub tags: Option<String>,

    /// Ticket body/description (markdown)
    #[arg(long, value_name = "TEXT")]
    pub body: Option<String>,

    /// Ticket id prefix (overrides the board document's ticketPrefix)
    #[arg(long, value_name = "PFX")]
    pub prefix: Option<String>,
}

/// Listing inputs.
#[derive(Parser, Debug)]
#[command(about = "List tickets in a directory")]
pub struct ListArgs {
    /// Tickets directory, relative to the current directory
    #[arg(long, value_name = "DIR", default_value = "tickets")]
    pub dir: String,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

/// Validation inputs.
#[derive(Parser, Debug)]
#[command(about = "Report naming-invariant violations")]
pub struct ValidateArgs {
    /// Tickets directory, relative to the current directory
    #[arg(long, value_name = "DIR", default_value = "tickets")]
    pub dir: String,

    /// Ticket id prefix expected in filenames
    #[arg(long, value_name = "PFX")]
    pub prefix: Option<String>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

/// Repair inputs.
#[derive(Parser, Debug)]
#[command(about = "Repair naming-invariant violations")]
pub struct FixArgs {
    /// Tickets directory, relative to the current directory
    #[arg(long, value_name = "DIR", default_value = "tickets")]
    pub dir: String,

    /// Ticket id prefix expected in filenames
    #[arg(long, value_name = "PFX")]
    pub prefix: Option<String>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

/// Dev server inputs.
#[derive(Parser, Debug)]
#[command(about = "Serve the ticket API for local development")]
pub struct ServeArgs {
    /// Site root containing boards and tickets directories
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Port to listen on (127.0.0.1 only)
    #[arg(long, value_name = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

/// Snapshot export inputs.
#[derive(Parser, Debug)]
#[command(about = "Export static ticket snapshots")]
pub struct ExportArgs {
    /// Site root to walk for board documents
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Output directory for snapshot artifacts
    #[arg(long, value_name = "DIR", default_value = "dist/data")]
    pub out: PathBuf,
}
