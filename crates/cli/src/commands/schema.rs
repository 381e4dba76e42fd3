use anyhow::Result;
use stagehand_core::configs::deploy::deploy_config_schema;

pub fn execute() -> Result<()> {
    let schema = deploy_config_schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
