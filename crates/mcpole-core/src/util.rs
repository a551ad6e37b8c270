//! Utility functions for mcpole
//!
//! Environment-file loading shared by the binary and tests.

use std::path::{Path, PathBuf};

/// Candidate locations for the mcpole env file, in search order:
/// 1. /usr/local/etc/mcpole/mcpole.env
/// 2. User's config directory/mcpole/mcpole.env
/// 3. ~/.config/mcpole/mcpole.env
pub fn env_file_candidates() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/usr/local/etc/mcpole/mcpole.env")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("mcpole").join("mcpole.env"));
    }
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config").join("mcpole").join("mcpole.env"));
    }
    paths
}

/// Load environment variables from the first mcpole env file found.
/// Variables that are already set are left untouched.
pub fn load_env_file() {
    for path in env_file_candidates() {
        if load_env_file_from(&path) {
            break;
        }
    }
}

/// Load one env file; returns `false` when the file does not exist
pub fn load_env_file_from(path: &Path) -> bool {
    if !path.exists() {
        return false;
    }
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            tracing::debug!("Loading environment from {:?}", path);
            parse_env_file(&contents);
        }
        Err(e) => tracing::warn!("Failed to read env file {:?}: {}", path, e),
    }
    true
}

/// Parse env file contents and set environment variables (only if not already set).
/// Supports formats:
/// - `KEY=value`
/// - `export KEY=value`
/// - `KEY="quoted value"`
/// - `KEY='single quoted'`
/// - Comments starting with #
pub fn parse_env_file(contents: &str) {
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if std::env::var(key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_file() {
        std::env::remove_var("TEST_MCPOLE_VAR1");
        std::env::remove_var("TEST_MCPOLE_VAR2");
        std::env::remove_var("TEST_MCPOLE_VAR3");

        let contents = r#"
            # This is a comment
            TEST_MCPOLE_VAR1=value1
            export TEST_MCPOLE_VAR2="quoted value"
            TEST_MCPOLE_VAR3='single quoted'
        "#;

        parse_env_file(contents);

        assert_eq!(std::env::var("TEST_MCPOLE_VAR1").unwrap(), "value1");
        assert_eq!(std::env::var("TEST_MCPOLE_VAR2").unwrap(), "quoted value");
        assert_eq!(std::env::var("TEST_MCPOLE_VAR3").unwrap(), "single quoted");

        std::env::remove_var("TEST_MCPOLE_VAR1");
        std::env::remove_var("TEST_MCPOLE_VAR2");
        std::env::remove_var("TEST_MCPOLE_VAR3");
    }

    #[test]
    fn test_parse_env_file_keeps_existing() {
        std::env::set_var("TEST_MCPOLE_EXISTING", "original");
        parse_env_file("TEST_MCPOLE_EXISTING=overwritten");
        assert_eq!(std::env::var("TEST_MCPOLE_EXISTING").unwrap(), "original");
        std::env::remove_var("TEST_MCPOLE_EXISTING");
    }

    #[test]
    fn test_load_env_file_from_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!load_env_file_from(&dir.path().join("absent.env")));
    }

    #[test]
    fn test_load_env_file_from_disk() {
        std::env::remove_var("TEST_MCPOLE_DISK");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mcpole.env");
        std::fs::write(&path, "TEST_MCPOLE_DISK=42\n").unwrap();

        assert!(load_env_file_from(&path));
        assert_eq!(std::env::var("TEST_MCPOLE_DISK").unwrap(), "42");
        std::env::remove_var("TEST_MCPOLE_DISK");
    }
}
