use crate::error::{DashboardError, Result};
use super::settings::Settings;
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::OnceLock;

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"))
}

/// Replaces `${VAR}` with the variable's value. Unset or empty variables are left as
/// written so validation can point at them.
pub fn expand_env_vars(content: &str) -> String {
    env_var_pattern()
        .replace_all(content, |caps: &Captures| match std::env::var(&caps[1]) {
            Ok(value) if !value.is_empty() => value,
            _ => caps[0].to_string(),
        })
        .into_owned()
}

pub fn parse_config(content: &str) -> Result<Settings> {
    let expanded = expand_env_vars(content);
    let settings: Settings = toml::from_str(&expanded)?;

    settings.validate().map_err(DashboardError::Config)?;
    Ok(settings)
}

pub fn load_config(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Err(DashboardError::Config(format!(
            "Config file not found at {:?}",
            path
        )));
    }

    let content = std::fs::read_to_string(path)?;
    let settings = parse_config(&content)?;
    tracing::info!(
        path = %path.display(),
        projects = settings.projects.len(),
        "configuration loaded"
    );
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const VALID_CONFIG: &str = r#"
        [azure_devops]
        organization = "contoso"
        pat = "test-token-123"

        [[projects]]
        name = "Web"
        branches = ["main"]
    "#;

    #[test]
    fn test_load_valid_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, VALID_CONFIG).unwrap();

        let settings = load_config(&config_path).unwrap();
        assert_eq!(settings.azure_devops.pat, "test-token-123");
        assert_eq!(settings.projects[0].name, "Web");
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "this is not valid toml { ] }").unwrap();

        let result = load_config(&config_path);
        assert!(matches!(result, Err(DashboardError::TomlParse(_))));
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("missing.toml");

        match load_config(&config_path) {
            Err(DashboardError::Config(msg)) => assert!(msg.contains("not found")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let content = r#"
            [azure_devops]
            organization = "contoso"
        "#;

        match parse_config(content) {
            Err(DashboardError::Config(msg)) => {
                assert!(msg.contains("azure_devops.pat is required"));
                assert!(msg.contains("at least one project"));
            }
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_expand_env_vars() {
        std::env::set_var("AZDO_DASH_TEST_PAT", "from-env");
        let expanded = expand_env_vars(r#"pat = "${AZDO_DASH_TEST_PAT}""#);
        assert_eq!(expanded, r#"pat = "from-env""#);
    }

    #[test]
    fn test_unset_env_vars_are_left_verbatim() {
        std::env::remove_var("AZDO_DASH_TEST_UNSET");
        let expanded = expand_env_vars("pat = \"${AZDO_DASH_TEST_UNSET}\" cost = \"$5\"");
        assert_eq!(expanded, "pat = \"${AZDO_DASH_TEST_UNSET}\" cost = \"$5\"");
    }

    #[test]
    fn test_parse_config_uses_expanded_token() {
        std::env::set_var("AZDO_DASH_TEST_TOKEN", "expanded-token");
        let content = r#"
            [azure_devops]
            organization = "contoso"
            pat = "${AZDO_DASH_TEST_TOKEN}"

            [[projects]]
            name = "Web"
        "#;

        let settings = parse_config(content).unwrap();
        assert_eq!(settings.azure_devops.pat, "expanded-token");
    }
}
