use anyhow::Result;
use colored::*;
use stagehand_core::deploy_manager::DeployManager;

pub fn execute(manager: &DeployManager) -> Result<()> {
    let result = manager.list_stages();
    println!("{}", "Stages".bold().underline());

    if result.stages.is_empty() {
        println!(
            "  {} {}",
            "No stages configured, using".dimmed(),
            manager.stage.name.cyan()
        );
        return Ok(());
    }

    for stage in &result.stages {
        let marker = if stage.is_selected { "*".green().bold() } else { " ".normal() };
        let mut line = format!("{} {}", marker, stage.name.blue().bold());
        if stage.is_default {
            line.push_str(&format!(" {}", "[default]".green()));
        }
        println!("{}", line);

        for (key, value) in &stage.params {
            println!("    {} {}", format!("{}:", key).dimmed(), value);
        }
    }

    Ok(())
}
