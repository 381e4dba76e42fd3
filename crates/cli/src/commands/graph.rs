use anyhow::Result;
use colored::*;
use stagehand_core::deploy_manager::DeployManager;

pub fn execute(manager: &DeployManager) -> Result<()> {
    println!("{}", "Task Hooks:".bold().underline());

    let result = manager.get_hook_graph();
    if result.entries.is_empty() {
        println!("No hooks declared");
        return Ok(());
    }

    for entry in &result.entries {
        println!("{}", entry.task.blue().bold());

        if !entry.hooks.before.is_empty() {
            println!("  {} {}", "before:".dimmed(), entry.hooks.before.join(", "));
        }
        if !entry.hooks.after.is_empty() {
            println!("  {} {}", "after:".dimmed(), entry.hooks.after.join(", "));
        }
        println!();
    }

    Ok(())
}
