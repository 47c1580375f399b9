use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::Path;
use ticket_board::board::load_board_config;
use ticket_board::cli::{
    Command, ExportArgs, FixArgs, ListArgs, RootArgs, ServeArgs, TicketArgs, ValidateArgs,
};
use ticket_board::export::export_snapshots;
use ticket_board::server::{serve, ServeConfig};
use ticket_board::store::{CreateTicket, Issue, TicketStore};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = RootArgs::parse();
    match args.command {
        Command::Ticket(args) => cmd_ticket(args),
        Command::List(args) => cmd_list(args),
        Command::Validate(args) => cmd_validate(args),
        Command::Fix(args) => cmd_fix(args),
        Command::Serve(args) => cmd_serve(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn cmd_ticket(args: TicketArgs) -> Result<()> {
    let root = std::env::current_dir().context("resolve current directory")?;
    // The board document's ticketPrefix applies unless overridden on the
    // command line; the board lives next to the tickets directory.
    let prefix = match args.prefix {
        Some(prefix) => Some(prefix).filter(|p| !p.is_empty()),
        None => {
            let site_dir = Path::new(&args.dir).parent().map_or_else(
                || root.clone(),
                |parent| {
                    if parent.as_os_str().is_empty() {
                        root.clone()
                    } else {
                        root.join(parent)
                    }
                },
            );
            load_board_config(&site_dir).ticket_prefix
        }
    };

    let tags = args
        .tags
        .as_deref()
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let mut store = TicketStore::new(root);
    let ticket = store.create(&CreateTicket {
        dir: Some(args.dir.clone()),
        prefix,
        title: Some(args.title),
        status: args.status,
        priority: args.priority,
        tags,
        body: args.body,
    })?;

    let slug = ticket
        .url
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .trim_end_matches(".html");
    println!("Created {slug}: {}", ticket.title);
    println!("  File: {}/{slug}.md", args.dir.trim_end_matches('/'));
    Ok(())
}

fn cmd_list(args: ListArgs) -> Result<()> {
    let root = std::env::current_dir().context("resolve current directory")?;
    let mut store = TicketStore::new(root);
    let tickets = store.list(&args.dir)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&tickets)?);
        return Ok(());
    }
    if tickets.is_empty() {
        println!("No tickets in {}.", args.dir);
        return Ok(());
    }
    for ticket in &tickets {
        println!(
            "#{:<4} [{}] {} ({})",
            ticket.id,
            ticket.status,
            ticket.title,
            ticket.priority.as_str()
        );
    }
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> Result<()> {
    let root = std::env::current_dir().context("resolve current directory")?;
    let store = TicketStore::new(root);
    let issues = store.validate(&args.dir, args.prefix.as_deref())?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&issues)?);
    } else {
        print_issues(&issues);
    }
    if issues.is_empty() {
        Ok(())
    } else {
        bail!("{} ticket(s) violate the naming invariant", issues.len());
    }
}

fn cmd_fix(args: FixArgs) -> Result<()> {
    let root = std::env::current_dir().context("resolve current directory")?;
    let store = TicketStore::new(root);
    let applied = store.fix(&args.dir, args.prefix.as_deref())?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&applied)?);
        return Ok(());
    }
    if applied.is_empty() {
        println!("Nothing to fix in {}.", args.dir);
        return Ok(());
    }
    for issue in &applied {
        println!(
            "Fixed {} -> {}.md (id {} -> {})",
            issue.file, issue.fixed_slug, issue.current_id, issue.fixed_id
        );
    }
    Ok(())
}

fn cmd_serve(args: ServeArgs) -> Result<()> {
    let root = args
        .root
        .canonicalize()
        .with_context(|| format!("resolve site root {}", args.root.display()))?;
    serve(ServeConfig {
        root,
        port: args.port,
    })
}

fn cmd_export(args: ExportArgs) -> Result<()> {
    let root = args
        .root
        .canonicalize()
        .with_context(|| format!("resolve site root {}", args.root.display()))?;
    let written = export_snapshots(&root, &args.out)?;
    for path in &written {
        println!("Wrote {}", path.display());
    }
    if written.is_empty() {
        println!("No board documents found under {}.", root.display());
    }
    Ok(())
}

fn print_issues(issues: &[Issue]) {
    if issues.is_empty() {
        println!("All tickets are well-formed.");
        return;
    }
    for issue in issues {
        println!(
            "{}: id {} (slug {}) -> id {} (slug {})",
            issue.file, issue.current_id, issue.current_slug, issue.fixed_id, issue.fixed_slug
        );
    }
}
