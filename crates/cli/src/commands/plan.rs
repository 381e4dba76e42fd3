use anyhow::Result;
use colored::*;
use stagehand_core::deploy_manager::DeployManager;
use stagehand_core::tasks::styled_task_name;

pub fn execute(manager: &DeployManager, task: &str) -> Result<()> {
    println!(
        "{} {} {}",
        "Execution plan for".bold(),
        task.cyan(),
        format!("({})", manager.stage.name).dimmed()
    );

    let plan = manager
        .get_execution_plan(task)
        .map_err(|e| anyhow::anyhow!("Failed to get execution plan: {}", e))?;

    println!("\n{}:", "Execution order".bold());
    for (i, name) in plan.order.iter().enumerate() {
        println!("  {}. {}", i + 1, styled_task_name(name));
    }

    Ok(())
}
