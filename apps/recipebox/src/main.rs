//! # RecipeBox
//!
//! The main binary for browsing the recipe catalog from a terminal.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                apps/recipebox (THE BINARY)             │
//! │                                                       │
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐  │
//! │  │    CLI      │   │   Config    │   │  JSON file  │  │
//! │  │   (clap)    │   │   (toml)    │   │    store    │  │
//! │  └──────┬──────┘   └──────┬──────┘   └──────┬──────┘  │
//! │         └─────────────────┼─────────────────┘         │
//! │                           ▼                           │
//! │                  ┌────────────────┐                   │
//! │                  │ recipebox-core │                   │
//! │                  │  (THE LOGIC)   │                   │
//! │                  └────────────────┘                   │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! recipebox search --text soup --max-time 45
//! recipebox search --ingredient basil --dietary vegan
//! recipebox show thai-green-curry --servings 6
//! recipebox favorite tomato-soup
//! recipebox rate tomato-soup 5
//! recipebox favorites
//! ```

use clap::Parser;
use recipebox::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Initialize tracing. RECIPEBOX_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("RECIPEBOX_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "recipebox=debug,recipebox_core=debug"
    } else {
        "recipebox=info,recipebox_core=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the RecipeBox startup banner.
fn print_banner() {
    println!(
        r#"
  RecipeBox v{}
  Search • Filter • Favorite • Rate
"#,
        env!("CARGO_PKG_VERSION")
    );
}
