//! tmplx CLI
//!
//! Applies, upgrades and removes element templates on a JSON document

use clap::{Parser, Subcommand};
use tmplx_core::logging_facility::{self, Profile};
use tmplx_core::{ExError, TmplxError};
use tmplx_core_types::RequestId;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "tmplx")]
#[command(about = "tmplx - Element template reconciliation", long_about = None)]
struct Cli {
    /// Emit JSON logs (production profile)
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply or upgrade a template on an element
    Apply(commands::apply::ApplyArgs),
    /// Remove the element's template, keeping its content
    Remove(commands::remove::RemoveArgs),
    /// Apply the default template registered for the element's kind
    ApplyDefault(commands::apply_default::ApplyDefaultArgs),
}

fn main() {
    let cli = Cli::parse();

    logging_facility::init(if cli.log_json {
        Profile::Production
    } else {
        Profile::Development
    });

    let request_id = RequestId::new();
    let span = tracing::info_span!("tmplx", request_id = %request_id);
    let (op, result) = span.in_scope(|| match cli.command {
        Commands::Apply(args) => ("apply", commands::apply::execute(args)),
        Commands::Remove(args) => ("remove", commands::remove::execute(args)),
        Commands::ApplyDefault(args) => ("apply_default", commands::apply_default::execute(args)),
    });

    if let Err(e) = result {
        match e.downcast_ref::<TmplxError>() {
            Some(err) => eprintln!(
                "Error: {}",
                ExError::from(err).with_op(op).with_request_id(request_id)
            ),
            None => eprintln!("Error: {}", e),
        }
        std::process::exit(1);
    }
}
