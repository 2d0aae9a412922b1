//! Script-Pager CLI: plain-text page preview
//! The main interface is the library and its WASM bindings.

use clap::Parser;
use script_pager::{FormatConfig, LineItem, Paginator, Result, TokenKind};
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Width of the left column when a dual-dialogue block is printed side by side
const DUAL_COLUMN: usize = 34;

#[derive(Parser)]
#[command(name = "script-pager")]
#[command(version)]
#[command(about = "Paginate a screenplay token list and print a plain-text preview")]
struct Cli {
    /// Token list (JSON array of tokens)
    tokens: PathBuf,

    /// Format config (JSON); US Letter defaults when omitted
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Logs go to stderr so the preview stays clean on stdout
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => FormatConfig::from_json(&fs::read_to_string(path)?)?,
        None => FormatConfig::default(),
    };
    tracing::info!(lines_per_page = config.lines_per_page, "loaded config");

    let mut paginator = Paginator::new(config);
    paginator.run_json(&fs::read_to_string(&cli.tokens)?)?;

    for span in paginator.pages() {
        if span.page_index > 0 {
            println!("--- page {} ---", span.page_index + 1);
        }
        if let Some(rows) = paginator.page(span.page_index) {
            print_page(rows);
        }
        if span.scene_split {
            println!("{:>width$}", "(CONTINUED)", width = 58);
        }
    }

    Ok(())
}

fn print_page(rows: &[LineItem]) {
    let mut right: VecDeque<&LineItem> = VecDeque::new();

    for row in rows {
        if let Some(column) = &row.right_column {
            right = column.iter().collect();
        }

        let indent = indent_for(row.kind, row.position.is_some());
        let left = format!("{}{}", " ".repeat(indent), row.text);
        match right.pop_front() {
            Some(r) => {
                let text = format!("{}{}", " ".repeat(indent_for(r.kind, true)), r.text);
                println!("{left:<width$}{text}", width = DUAL_COLUMN);
            }
            None => println!("{}", left.trim_end()),
        }
    }

    // A right column taller than the rows left on the page
    for r in right {
        let text = format!("{}{}", " ".repeat(indent_for(r.kind, true)), r.text);
        println!("{:width$}{text}", "", width = DUAL_COLUMN);
    }
}

fn indent_for(kind: TokenKind, dual: bool) -> usize {
    let indent = match kind {
        TokenKind::Character | TokenKind::More => 22,
        TokenKind::Parenthetical => 16,
        TokenKind::Dialogue | TokenKind::Lyrics => 10,
        TokenKind::Transition => 45,
        TokenKind::Centered => 20,
        _ => 0,
    };
    if dual {
        indent / 2
    } else {
        indent
    }
}
