//! Apply-default command
//!
//! Usage: tmplx apply-default --document <FILE> --templates <FILE> --element <ID>

use clap::Args;

use tmplx_core::{apply_default_template, ChangeTemplateHandler, CommandStack};

use super::{load, save, CliResult, TargetArgs};

#[derive(Debug, Args)]
pub struct ApplyDefaultArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Execute apply-default command
pub fn execute(args: ApplyDefaultArgs) -> CliResult {
    let (mut document, catalog) = load(&args.target)?;

    let mut stack = CommandStack::new();
    let applied = apply_default_template(
        &ChangeTemplateHandler::new(),
        &mut document,
        &mut stack,
        &catalog,
        &args.target.element,
    )?;
    match &applied {
        Some(element) => tracing::info!(element_id = %element, "default template applied"),
        None => tracing::info!(element_id = %args.target.element, "no default template applied"),
    }

    save(&mut document, args.target.output.as_deref())
}
