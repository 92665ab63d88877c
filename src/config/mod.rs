//! Configuration system for konfluxctl
//!
//! A single YAML file plus environment overrides; command line flags win
//! over both.

pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::Config;

/// Get a configuration value by key
pub fn get_config_value(config: &schema::Config, key: &str) -> anyhow::Result<String> {
    match key {
        "admissionNamespace" => Ok(config.admission_namespace.clone()),
        "outputFormat" => Ok(config.output_format.to_string()),
        "context" => Ok(config.context.clone().unwrap_or_default()),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}

/// Set a configuration value by key
pub fn set_config_value(config: &mut schema::Config, key: &str, value: &str) -> anyhow::Result<()> {
    match key {
        "admissionNamespace" => {
            if value.is_empty() {
                return Err(anyhow::anyhow!("admissionNamespace must not be empty"));
            }
            config.admission_namespace = value.to_string();
        }
        "outputFormat" => {
            config.output_format = value.parse()?;
        }
        "context" => {
            if value.is_empty() {
                config.context = None;
            } else {
                config.context = Some(value.to_string());
            }
        }
        _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provenance::OutputFormat;

    #[test]
    fn test_get_and_set() {
        let mut config = Config::default();
        set_config_value(&mut config, "outputFormat", "json").unwrap();
        set_config_value(&mut config, "context", "stage").unwrap();
        set_config_value(&mut config, "admissionNamespace", "managed").unwrap();

        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(get_config_value(&config, "outputFormat").unwrap(), "json");
        assert_eq!(get_config_value(&config, "context").unwrap(), "stage");
        assert_eq!(
            get_config_value(&config, "admissionNamespace").unwrap(),
            "managed"
        );
    }

    #[test]
    fn test_clear_context() {
        let mut config = Config {
            context: Some("stage".to_string()),
            ..Default::default()
        };
        set_config_value(&mut config, "context", "").unwrap();
        assert!(config.context.is_none());
    }

    #[test]
    fn test_invalid_values() {
        let mut config = Config::default();
        assert!(set_config_value(&mut config, "outputFormat", "xml").is_err());
        assert!(set_config_value(&mut config, "admissionNamespace", "").is_err());
        assert!(set_config_value(&mut config, "unknown", "x").is_err());
        assert!(get_config_value(&config, "unknown").is_err());
    }
}
