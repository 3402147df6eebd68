use std::path::Path;

use anyhow::Result;

use fsdeploy::domain::ports::RuleSource;
use fsdeploy::domain::services::{
    describe_rule, normalize_path, resolve_rules, rules_for_file, rules_for_workspace,
    DeployStatus,
};

use super::CommandContext;

pub fn cmd_status(ctx: &CommandContext, file: Option<&Path>) -> Result<()> {
    let rules = ctx.rule_source().load_rules()?;
    let resolved = resolve_rules(&rules, &ctx.workspace_root);
    let workspace_rules = rules_for_workspace(&resolved, &ctx.workspace_root);

    let file_rules = match file {
        Some(file) => {
            let path = normalize_path(&ctx.file_path(file)?);
            rules_for_file(&resolved, &path)
        }
        None => Vec::new(),
    };

    // Without a file the workspace alone decides.
    let status = match file {
        Some(_) => DeployStatus::classify(workspace_rules.len(), file_rules.len()),
        None => DeployStatus::classify(workspace_rules.len(), workspace_rules.len()),
    };

    let workspace_lines: Vec<String> = workspace_rules.iter().map(|r| describe_rule(r)).collect();
    let file_lines: Vec<String> = file_rules.iter().map(|r| describe_rule(r)).collect();

    if ctx.ui.json {
        let output = serde_json::json!({
            "event": "status",
            "status": status,
            "description": status.description(),
            "workspace_rules": workspace_lines,
            "file_rules": file_lines,
        });
        println!("{}", output);
        return Ok(());
    }

    println!("{}", status);
    if !workspace_lines.is_empty() {
        println!("\nWorkspace:");
        for line in &workspace_lines {
            println!("  {}", line);
        }
    }
    if !file_lines.is_empty() {
        println!("\nFile:");
        for line in &file_lines {
            println!("  {}", line);
        }
    }
    Ok(())
}
