use clap::{ArgEnum, Parser};
use fragparse::pos::SourceLocator;
use fragparse::{ParseError, Session};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
enum CommandError {
    #[error("I/O error")]
    Io(
        #[from]
        #[source]
        std::io::Error,
    ),
    #[error("JSON error")]
    Json(
        #[from]
        #[source]
        serde_json::Error,
    ),
    #[error("Detected one or more errors")]
    HasError,
}

fn main() -> Result<(), CommandError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut has_error = false;
    for file in &cli.files {
        let source = std::fs::read(file)?;
        info!(file = %file.display(), len = source.len(), "parsing");
        let mut session = Session::with_extra_keywords(&cli.keywords);
        let result = catch_unwind(AssertUnwindSafe(|| session.parse(&source)));
        let result = match result {
            Ok(result) => result,
            Err(e) => {
                let msg = if let Some(&e) = e.downcast_ref::<&'static str>() {
                    e
                } else if let Some(e) = e.downcast_ref::<String>() {
                    &e[..]
                } else {
                    "Box<Any>"
                };
                has_error = true;
                eprintln!("{}: {}", file.display(), msg);
                continue;
            }
        };
        match result {
            Ok(root) => {
                let sexp = fragparse::sexp::to_sexp(&root, session.interner());
                match cli.format {
                    Format::Sexp => println!("{}", sexp),
                    Format::Json => println!("{}", serde_json::to_string_pretty(&sexp)?),
                }
            }
            Err(error) => {
                has_error = true;
                report(file, &source, &error);
            }
        }
    }
    if has_error {
        return Err(CommandError::HasError);
    }
    Ok(())
}

fn report(file: &Path, source: &[u8], error: &ParseError) {
    let locator = SourceLocator::new(source);
    let start = locator.position(error.range().0);
    eprintln!(
        "{}:{}:{}: {}",
        file.display(),
        start.line + 1,
        start.column + 1,
        error
    );
}

#[derive(Debug, Clone, Copy, ArgEnum)]
enum Format {
    Sexp,
    Json,
}

/// Parses JavaScript-like source files and prints their syntax trees.
#[derive(Debug, Parser)]
#[clap(version)]
struct Cli {
    /// Output format for successfully parsed files
    #[clap(long, arg_enum, default_value = "sexp")]
    format: Format,
    /// Treat WORD as a keyword in addition to the standard ones
    #[clap(long = "keyword", value_name = "WORD")]
    keywords: Vec<String>,
    files: Vec<PathBuf>,
}
