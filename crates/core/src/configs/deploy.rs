use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::configs::stages::{select_stage, validate_stages, Stage, StageConfig};
use crate::configs::tasks::{HookConfig, TaskConfig};
use crate::types::StagehandResult;

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeployConfig {
    pub application: Option<String>,
    pub description: Option<String>,
    /// Stage used when none is given on the command line. Defaults to the first stage.
    pub default_stage: Option<String>,
    #[serde(default)]
    pub stages: Vec<StageConfig>,
    #[serde(default)]
    pub tasks: Vec<TaskConfig>,
    #[serde(default)]
    pub hooks: Vec<HookConfig>,
}

impl DeployConfig {
    pub fn validate(&self) -> StagehandResult<()> {
        validate_stages(&self.stages, self.default_stage.as_deref())?;
        for task in &self.tasks {
            task.validate()?;
        }
        for hook in &self.hooks {
            hook.target()?;
        }
        Ok(())
    }

    /// Select a stage and add the built-in `stage` and `application` variables
    pub fn select_stage(&self, requested: Option<&str>) -> StagehandResult<Stage> {
        let mut stage = select_stage(&self.stages, self.default_stage.as_deref(), requested)?;
        stage
            .variables
            .insert("stage".to_string(), stage.name.clone());
        if let Some(application) = &self.application {
            stage
                .variables
                .insert("application".to_string(), application.clone());
        }
        Ok(stage)
    }
}

pub fn parse_deploy_config(yaml_str: &str) -> StagehandResult<DeployConfig> {
    let config: DeployConfig = serde_yaml::from_str(yaml_str)?;
    config.validate()?;
    Ok(config)
}

/// JSON Schema for the deploy file, for editor integration
pub fn deploy_config_schema() -> schemars::Schema {
    schemars::schema_for!(DeployConfig)
}
