use anyhow::Result;
use colored::*;
use stagehand_core::deploy_manager::DeployManager;

pub fn execute(manager: &DeployManager, task: &str) -> Result<()> {
    println!(
        "{} {} {}",
        "Running task".bold(),
        task.cyan(),
        format!("on {}", manager.stage.name).dimmed()
    );

    let report = manager
        .run_task(task)
        .map_err(|e| anyhow::anyhow!("Failed to run task: {}", e))?;

    println!();
    println!(
        "{} {} {}",
        "✓".green().bold(),
        format!("{} tasks completed successfully!", report.completed.len()).green().bold(),
        format!("({:.1}s)", report.total_duration().as_secs_f64()).dimmed()
    );

    Ok(())
}
