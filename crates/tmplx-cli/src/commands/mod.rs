pub mod apply;
pub mod apply_default;
pub mod remove;

use clap::Args;
use std::path::{Path, PathBuf};

use tmplx_core::{Document, TemplateCatalog};

/// Arguments every subcommand shares
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Document JSON file
    #[arg(short, long)]
    pub document: PathBuf,

    /// Template catalogue JSON file (array of templates)
    #[arg(short, long)]
    pub templates: PathBuf,

    /// Node id of the element to reconcile
    #[arg(short, long)]
    pub element: String,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Read the document and template catalogue named by `args`
pub fn load(args: &TargetArgs) -> Result<(Document, TemplateCatalog), Box<dyn std::error::Error>> {
    let document = Document::from_json(&std::fs::read_to_string(&args.document)?)?;
    let catalog = TemplateCatalog::from_json(&std::fs::read_to_string(&args.templates)?)?;
    Ok((document, catalog))
}

/// Write the document to `output`, or to stdout
///
/// The command history is dropped with the run, so nodes detached by the
/// change are collected first.
pub fn save(document: &mut Document, output: Option<&Path>) -> CliResult {
    document.collect_garbage();
    let json = document.to_json_pretty()?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            println!("✓ Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
