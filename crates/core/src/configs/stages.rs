use std::collections::{BTreeMap, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::{StagehandError, StagehandResult};

/// Stage name used when the deploy file declares no stages
pub const IMPLICIT_STAGE: &str = "default";

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StageConfig {
    pub name: String,
    /// Values substituted into `{{placeholders}}` of task commands
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

/// The stage selected for a run, with its full variable table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub name: String,
    pub variables: BTreeMap<String, String>,
}

impl Stage {
    /// Replace every `{{key}}` in `input` with the stage variable of that name
    pub fn render(&self, input: &str) -> StagehandResult<String> {
        let mut output = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(start) = rest.find("{{") {
            output.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];
            let end = after_open.find("}}").ok_or_else(|| {
                StagehandError::Config(format!("Unterminated placeholder in '{}'", input))
            })?;

            let key = after_open[..end].trim();
            let value = self.variables.get(key).ok_or_else(|| {
                StagehandError::Config(format!(
                    "Unknown placeholder '{{{{{}}}}}' in '{}' for stage '{}'",
                    key, input, self.name
                ))
            })?;
            output.push_str(value);
            rest = &after_open[end + 2..];
        }

        output.push_str(rest);
        Ok(output)
    }
}

/// Check stage names are unique and the default stage exists
pub fn validate_stages(stages: &[StageConfig], default_stage: Option<&str>) -> StagehandResult<()> {
    let mut seen = HashSet::new();
    for stage in stages {
        if stage.name.trim().is_empty() {
            return Err(StagehandError::Config("Stage name cannot be empty".to_string()));
        }
        if !seen.insert(stage.name.as_str()) {
            return Err(StagehandError::Config(format!(
                "Stage '{}' is declared more than once",
                stage.name
            )));
        }
    }

    if let Some(default) = default_stage {
        if !seen.contains(default) {
            return Err(StagehandError::Config(format!(
                "Default stage '{}' is not one of the declared stages",
                default
            )));
        }
    }

    Ok(())
}

/// Pick the stage to run with: the requested one, else the default, else the first declared
pub fn select_stage(
    stages: &[StageConfig],
    default_stage: Option<&str>,
    requested: Option<&str>,
) -> StagehandResult<Stage> {
    if stages.is_empty() {
        return match requested {
            Some(name) if name != IMPLICIT_STAGE => Err(StagehandError::Config(format!(
                "Stage '{}' requested but no stages are configured",
                name
            ))),
            _ => Ok(Stage {
                name: IMPLICIT_STAGE.to_string(),
                variables: BTreeMap::new(),
            }),
        };
    }

    let wanted = requested.or(default_stage);
    let config = match wanted {
        Some(name) => stages.iter().find(|s| s.name == name).ok_or_else(|| {
            let known = stages
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            StagehandError::Config(format!("Unknown stage '{}' (known stages: {})", name, known))
        })?,
        None => &stages[0],
    };

    Ok(Stage {
        name: config.name.clone(),
        variables: config.params.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stages() -> Vec<StageConfig> {
        ["development", "staging", "production"]
            .iter()
            .map(|name| StageConfig {
                name: name.to_string(),
                params: BTreeMap::from([("host".to_string(), format!("{}.example.com", name))]),
            })
            .collect()
    }

    #[test]
    fn test_requested_stage_wins() {
        let stage = select_stage(&stages(), Some("development"), Some("production")).unwrap();
        assert_eq!(stage.name, "production");
        assert_eq!(stage.variables["host"], "production.example.com");
    }

    #[test]
    fn test_default_stage_used_when_none_requested() {
        let stage = select_stage(&stages(), Some("staging"), None).unwrap();
        assert_eq!(stage.name, "staging");
    }

    #[test]
    fn test_first_stage_when_no_default() {
        let stage = select_stage(&stages(), None, None).unwrap();
        assert_eq!(stage.name, "development");
    }

    #[test]
    fn test_unknown_stage_lists_known_ones() {
        let err = select_stage(&stages(), None, Some("qa")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Unknown stage 'qa' (known stages: development, staging, production)"
        );
    }

    #[test]
    fn test_no_stages_gives_implicit_stage() {
        let stage = select_stage(&[], None, None).unwrap();
        assert_eq!(stage.name, IMPLICIT_STAGE);
        assert!(stage.variables.is_empty());
        assert!(select_stage(&[], None, Some("production")).is_err());
    }

    #[test]
    fn test_validate_rejects_duplicates_and_missing_default() {
        let mut duplicated = stages();
        duplicated.push(duplicated[0].clone());
        assert!(validate_stages(&duplicated, None).is_err());
        assert!(validate_stages(&stages(), Some("qa")).is_err());
        assert!(validate_stages(&stages(), Some("staging")).is_ok());
    }

    #[test]
    fn test_render_substitutes_variables() {
        let stage = Stage {
            name: "production".to_string(),
            variables: BTreeMap::from([
                ("host".to_string(), "ftp.example.com".to_string()),
                ("appPath".to_string(), "/var/www/illiad".to_string()),
            ]),
        };
        let rendered = stage
            .render("lftp -e \"cd {{appPath}}; exit\" {{ host }}")
            .unwrap();
        assert_eq!(rendered, "lftp -e \"cd /var/www/illiad; exit\" ftp.example.com");
        assert_eq!(stage.render("no placeholders").unwrap(), "no placeholders");
    }

    #[test]
    fn test_render_rejects_unknown_and_unterminated() {
        let stage = Stage {
            name: "development".to_string(),
            variables: BTreeMap::new(),
        };
        let err = stage.render("cd {{appPath}}").unwrap_err();
        assert!(err.to_string().contains("Unknown placeholder '{{appPath}}'"));
        assert!(stage.render("cd {{appPath").is_err());
    }
}
