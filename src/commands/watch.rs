use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

use fsdeploy::{watch, WatchEvent, WatchOptions};

use super::CommandContext;
use crate::ui;

pub fn cmd_watch(ctx: &CommandContext) -> Result<()> {
    let (orchestrator, config) = ctx.orchestrator()?;
    let json = ctx.ui.json;
    let options = WatchOptions::new(&ctx.workspace_root)
        .with_debounce_ms(config.watch.debounce_ms)
        .with_json(json);

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("Error setting Ctrl+C handler")?;

    let sink = ui::event_sink(&ctx.ui);
    watch(options, &orchestrator, running, sink.as_ref(), |event| {
        if json {
            println!("{}", event.to_json());
            return;
        }
        let rendered = ui::console::render_watch_event(&ui::console::timestamp(), &event);
        match event {
            WatchEvent::Error { .. } => eprint!("{rendered}"),
            _ => print!("{rendered}"),
        }
    })?;

    Ok(())
}
