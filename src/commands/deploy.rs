use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use fsdeploy::DeploySummary;

use super::CommandContext;
use crate::ui;

pub fn cmd_deploy(ctx: &CommandContext, file: Option<&Path>, strict: bool) -> Result<()> {
    let summary = match file {
        Some(file) => deploy_single(ctx, file)?,
        None => deploy_workspace(ctx)?,
    };

    if !ctx.ui.json {
        eprint!("{}", ui::console::render_summary(&summary));
    }

    if strict && summary.files_failed > 0 {
        bail!("{} file(s) failed to deploy", summary.files_failed);
    }
    Ok(())
}

fn deploy_single(ctx: &CommandContext, file: &Path) -> Result<DeploySummary> {
    let (orchestrator, _) = ctx.orchestrator()?;
    let sink = ui::event_sink(&ctx.ui);
    let path = ctx.file_path(file)?;

    let summary = orchestrator.deploy_file(&path, sink.as_ref())?;
    if summary.is_noop() && !ctx.ui.json {
        eprintln!("'{}' is not covered by any deploy rule", path.display());
    }
    Ok(summary)
}

fn deploy_workspace(ctx: &CommandContext) -> Result<DeploySummary> {
    let (orchestrator, _) = ctx.orchestrator()?;
    let sink = ui::event_sink(&ctx.ui);

    let task = Arc::new(orchestrator).spawn_workspace(sink)?;
    let cancel = task.cancellation_token().clone();
    ctrlc::set_handler(move || cancel.cancel()).context("Error setting Ctrl+C handler")?;

    Ok(task.join()?)
}
