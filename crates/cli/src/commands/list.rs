use anyhow::Result;
use colored::*;
use stagehand_core::deploy_manager::DeployManager;
use stagehand_core::tasks::styled_task_name;

pub fn execute(manager: &DeployManager) -> Result<()> {
    let result = manager.list_tasks();

    let heading = match &result.application {
        Some(application) => format!("Tasks for {}", application),
        None => "Tasks".to_string(),
    };
    println!("{}", heading.bold().underline());

    if result.tasks.is_empty() {
        println!("  {}", "No tasks found".dimmed());
        return Ok(());
    }

    let width = result
        .tasks
        .iter()
        .map(|task| task.name.len())
        .max()
        .unwrap_or(0);

    for task in &result.tasks {
        let padding = " ".repeat(width - task.name.len());
        let description = match (&task.description, task.is_anchor) {
            (Some(description), _) => description.dimmed().to_string(),
            (None, true) => "(anchor for hooks)".dimmed().italic().to_string(),
            (None, false) => String::new(),
        };
        println!(
            "  {}{}  {}",
            styled_task_name(&task.name),
            padding,
            description
        );
    }

    Ok(())
}
