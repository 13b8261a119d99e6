//! Conversation Transformer - command-line entry point
//!
//! Reads a transcript (a JSON array of messages or a chat-completions request
//! body) from a file, or from stdin when the path is `-`, and prints the
//! display turns as JSON on stdout.
//!
//! ```text
//! conversation-transformer transcript.json
//! cat transcript.json | conversation-transformer - --compact
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use conversation_transformer::{
    core::{init_logging, AppConfig},
    ConversationTransformer, Transcript,
};

/// Turn a raw chat transcript into display turns.
#[derive(Debug, Parser)]
#[command(name = "conversation-transformer", version)]
struct Args {
    /// Transcript path, or - for stdin
    source: String,

    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load .env file if present (before reading any environment variables)
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    init_logging(&config.logging)?;

    let transcript = if args.source == "-" {
        Transcript::from_reader(std::io::stdin().lock(), "<stdin>")?
    } else {
        Transcript::from_path(&args.source)?
    };

    let transformed = transcript.transform(&ConversationTransformer::new());

    tracing::info!(
        source = %args.source,
        turns = transformed.turns.len(),
        pending = transformed.pending_call_ids.len(),
        warnings = transformed.warnings().count(),
        errors = transformed.errors().count(),
        "Transcript transformed"
    );

    let output = if config.output.pretty && !args.compact {
        serde_json::to_string_pretty(&transformed.turns)?
    } else {
        serde_json::to_string(&transformed.turns)?
    };
    println!("{}", output);

    Ok(())
}
