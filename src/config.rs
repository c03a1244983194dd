//! Configuration
//!
//! Settings for a verification run, read from an optional `groundcheck.toml`
//! in the repository root with environment-variable overrides. A missing
//! file is not an error; a malformed file or override is.

use std::path::Path;

use serde::Deserialize;

use groundcheck_core::{CoreError, CoreResult};

/// Name of the optional config file looked up in the repository root.
pub const CONFIG_FILE: &str = "groundcheck.toml";

/// Settings for a verification run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifySettings {
    /// Maximum tool-invocation rounds per answering call
    pub max_tool_rounds: u32,
    /// Emit progress lines on stderr
    pub show_progress: bool,
    /// Model hint passed through to the embedding application's provider
    pub model: Option<String>,
}

impl Default for VerifySettings {
    fn default() -> Self {
        Self {
            max_tool_rounds: 8,
            show_progress: true,
            model: None,
        }
    }
}

/// Load settings for `repo_path`: defaults, then `groundcheck.toml` if
/// present, then environment overrides (`GROUNDCHECK_MAX_TOOL_ROUNDS`,
/// `GROUNDCHECK_SHOW_PROGRESS`, `GROUNDCHECK_MODEL`).
pub fn load_settings(repo_path: &Path) -> CoreResult<VerifySettings> {
    let mut settings = read_config_file(repo_path)?;
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn read_config_file(repo_path: &Path) -> CoreResult<VerifySettings> {
    let path = repo_path.join(CONFIG_FILE);
    if !path.is_file() {
        return Ok(VerifySettings::default());
    }
    let text = std::fs::read_to_string(&path)?;
    toml::from_str(&text)
        .map_err(|e| CoreError::config(format!("invalid {}: {}", CONFIG_FILE, e)))
}

/// Apply environment overrides via an injectable lookup.
fn apply_env_overrides(
    settings: &mut VerifySettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> CoreResult<()> {
    if let Some(value) = lookup("GROUNDCHECK_MAX_TOOL_ROUNDS") {
        settings.max_tool_rounds = value.parse().map_err(|_| {
            CoreError::config(format!(
                "GROUNDCHECK_MAX_TOOL_ROUNDS must be an integer, got {:?}",
                value
            ))
        })?;
    }
    if let Some(value) = lookup("GROUNDCHECK_SHOW_PROGRESS") {
        settings.show_progress = match value.as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            other => {
                return Err(CoreError::config(format!(
                    "GROUNDCHECK_SHOW_PROGRESS must be a boolean, got {:?}",
                    other
                )))
            }
        };
    }
    if let Some(value) = lookup("GROUNDCHECK_MODEL") {
        settings.model = Some(value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_no_file() {
        let dir = TempDir::new().unwrap();
        let settings = load_settings(dir.path()).unwrap();
        assert_eq!(settings, VerifySettings::default());
        assert_eq!(settings.max_tool_rounds, 8);
    }

    #[test]
    fn test_reads_config_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "max_tool_rounds = 3\nshow_progress = false\nmodel = \"test-model\"\n",
        )
        .unwrap();
        let settings = read_config_file(dir.path()).unwrap();
        assert_eq!(settings.max_tool_rounds, 3);
        assert!(!settings.show_progress);
        assert_eq!(settings.model.as_deref(), Some("test-model"));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "max_tool_rounds = \"lots\"\n").unwrap();
        let err = read_config_file(dir.path()).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn test_unknown_key_is_config_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "max_rounds = 3\n").unwrap();
        assert!(read_config_file(dir.path()).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = VerifySettings::default();
        apply_env_overrides(&mut settings, |key| match key {
            "GROUNDCHECK_MAX_TOOL_ROUNDS" => Some("12".to_string()),
            "GROUNDCHECK_SHOW_PROGRESS" => Some("false".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(settings.max_tool_rounds, 12);
        assert!(!settings.show_progress);
        assert_eq!(settings.model, None);
    }

    #[test]
    fn test_invalid_env_override_is_config_error() {
        let mut settings = VerifySettings::default();
        let err = apply_env_overrides(&mut settings, |key| {
            (key == "GROUNDCHECK_MAX_TOOL_ROUNDS").then(|| "many".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }
}
