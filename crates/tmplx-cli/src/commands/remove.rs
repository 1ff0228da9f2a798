//! Remove command
//!
//! Usage: tmplx remove --document <FILE> --templates <FILE> --element <ID>

use clap::Args;

use tmplx_core::{ChangeTemplateHandler, CommandStack};

use super::{load, save, CliResult, TargetArgs};

#[derive(Debug, Args)]
pub struct RemoveArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Execute remove command
pub fn execute(args: RemoveArgs) -> CliResult {
    let (mut document, catalog) = load(&args.target)?;
    let old = catalog.applied_to(&document, &args.target.element)?;
    if old.is_none() {
        tracing::warn!(element_id = %args.target.element, "element carries no template");
    }

    let mut stack = CommandStack::new();
    ChangeTemplateHandler::new().execute(
        &mut document,
        &mut stack,
        &args.target.element,
        old,
        None,
    )?;

    save(&mut document, args.target.output.as_deref())
}
