//! Flutterdocs CLI
//!
//! Command-line interface for token counting and documentation truncation.
//! Designed for scripting against the doc server's processing core.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use flutterdocs_lib::{
    approximate_tokens, count_tokens, counting_mode, estimate_markdown, AdaptiveTruncator,
    TruncationMetadata, DEFAULT_MAX_TOKENS,
};

#[derive(Parser)]
#[command(name = "flutterdocs")]
#[command(about = "Flutterdocs CLI - Token-budgeted documentation truncation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Token counting commands
    Tokens {
        #[command(subcommand)]
        action: TokensAction,
    },
    /// Truncate a documentation page to a token budget
    Truncate {
        /// Markdown file to truncate (or - to read from stdin)
        file: String,
        /// Token budget for the result
        #[arg(short, long, default_value_t = DEFAULT_MAX_TOKENS)]
        max_tokens: usize,
        /// Truncation strategy: balanced, signatures, examples, minimal
        #[arg(short, long, default_value = "balanced")]
        strategy: String,
        /// Class name used for the title when one must be synthesized
        #[arg(long)]
        subject: Option<String>,
    },
}

#[derive(Subcommand)]
enum TokensAction {
    /// Count tokens in text
    Count {
        /// Text to count (or - to read from stdin)
        text: String,
        /// Force exact counting via the cl100k_base encoder
        #[arg(short, long)]
        accurate: bool,
    },
    /// Char-based markdown estimate, as used by the truncation engine
    Estimate {
        /// Text to estimate (or - to read from stdin)
        text: String,
    },
}

// ============ Output Types ============

#[derive(Serialize)]
struct TokenCountOutput {
    tokens: usize,
    mode: String,
}

#[derive(Serialize)]
struct EstimateOutput {
    tokens: usize,
    approximate_word_tokens: usize,
}

#[derive(Serialize)]
struct TruncateOutput {
    content: String,
    metadata: TruncationMetadata,
}

#[derive(Serialize)]
struct ErrorOutput {
    error: String,
}

// ============ Main ============

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Tokens { action } => handle_tokens(action),
        Commands::Truncate {
            file,
            max_tokens,
            strategy,
            subject,
        } => handle_truncate(&file, max_tokens, &strategy, subject),
    };

    match result {
        Ok(json) => println!("{}", json),
        Err(e) => {
            let error = ErrorOutput {
                error: e.to_string(),
            };
            println!("{}", serde_json::to_string(&error).unwrap());
            std::process::exit(1);
        }
    }
}

// ============ Handlers ============

fn handle_tokens(action: TokensAction) -> Result<String, Box<dyn std::error::Error>> {
    match action {
        TokensAction::Count { text, accurate } => {
            let text = read_input(&text)?;
            let output = TokenCountOutput {
                tokens: count_tokens(&text, accurate),
                mode: if accurate {
                    "accurate".to_string()
                } else {
                    counting_mode().to_string()
                },
            };
            Ok(serde_json::to_string(&output)?)
        }

        TokensAction::Estimate { text } => {
            let text = read_input(&text)?;
            let output = EstimateOutput {
                tokens: estimate_markdown(&text),
                approximate_word_tokens: approximate_tokens(&text),
            };
            Ok(serde_json::to_string(&output)?)
        }
    }
}

fn handle_truncate(
    file: &str,
    max_tokens: usize,
    strategy: &str,
    subject: Option<String>,
) -> Result<String, Box<dyn std::error::Error>> {
    let content = read_input(file)?;
    let subject = subject.unwrap_or_else(|| subject_from_path(file));

    let truncator = AdaptiveTruncator::new(max_tokens);
    let (content, metadata) =
        truncator.truncate_with_strategy(&content, &subject, "widgets", strategy)?;

    let output = TruncateOutput { content, metadata };
    Ok(serde_json::to_string(&output)?)
}

/// Read a positional input: a file path, or stdin when given `-`.
fn read_input(arg: &str) -> Result<String, std::io::Error> {
    if arg == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(arg)
    }
}

fn subject_from_path(file: &str) -> String {
    if file == "-" {
        return "Document".to_string();
    }
    Path::new(file)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Document".to_string())
}
