//! Apply command
//!
//! Usage: tmplx apply --document <FILE> --templates <FILE> --element <ID> --template <ID> [--version <N>]

use clap::Args;

use tmplx_core::{ChangeTemplateHandler, CommandStack};

use super::{load, save, CliResult, TargetArgs};

#[derive(Debug, Args)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Template id to apply
    #[arg(long)]
    pub template: String,

    /// Template version (default: latest)
    #[arg(long)]
    pub version: Option<u32>,
}

/// Execute apply command
pub fn execute(args: ApplyArgs) -> CliResult {
    let (mut document, catalog) = load(&args.target)?;
    let new = catalog.get(&args.template, args.version)?;
    let old = catalog.applied_to(&document, &args.target.element)?;

    let mut stack = CommandStack::new();
    let element = ChangeTemplateHandler::new().execute(
        &mut document,
        &mut stack,
        &args.target.element,
        old,
        Some(new),
    )?;
    tracing::info!(
        element_id = %element,
        template_id = %new.id,
        command_count = stack.command_count(),
        "template applied"
    );

    save(&mut document, args.target.output.as_deref())
}
