use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Table filtering: a table survives when it is not on the skip list and
/// the allowlist is either empty or contains it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FilterConfig {
    #[serde(default)]
    pub target_tables: Vec<String>,
    #[serde(default)]
    pub skip_tables: Vec<String>,
}

impl FilterConfig {
    /// Reads the YAML config format: two optional keys, `target_tables`
    /// and `skip_tables`, each a newline-separated string of table names.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(FilterConfig::default());
        }

        #[derive(Default, Deserialize)]
        #[serde(rename_all = "snake_case")]
        struct Raw {
            #[serde(default)]
            target_tables: Option<String>,
            #[serde(default)]
            skip_tables: Option<String>,
        }

        let raw: Raw = serde_yaml::from_str(text)?;
        Ok(FilterConfig {
            target_tables: split_lines(raw.target_tables),
            skip_tables: split_lines(raw.skip_tables),
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        FilterConfig::from_yaml(&fs::read_to_string(path)?)
    }

    pub fn is_empty(&self) -> bool {
        self.target_tables.is_empty() && self.skip_tables.is_empty()
    }

    pub fn retains(&self, table: &str) -> bool {
        if self.skip_tables.iter().any(|t| t == table) {
            return false;
        }
        self.target_tables.is_empty() || self.target_tables.iter().any(|t| t == table)
    }
}

fn split_lines(value: Option<String>) -> Vec<String> {
    value
        .map(|text| {
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_retains_everything() {
        let config = FilterConfig::from_yaml("").unwrap();
        assert!(config.is_empty());
        assert!(config.retains("Users"));
    }

    #[test]
    fn parses_newline_separated_lists() {
        let config = FilterConfig::from_yaml("target_tables: \"Users\\nPosts\\n\"\n").unwrap();
        assert_eq!(config.target_tables, vec!["Users", "Posts"]);
        assert!(config.skip_tables.is_empty());
    }

    #[test]
    fn parses_block_scalars() {
        let config = FilterConfig::from_yaml("skip_tables: |\n  Logs\n  Metrics\n").unwrap();
        assert_eq!(config.skip_tables, vec!["Logs", "Metrics"]);
    }

    #[test]
    fn skip_list_wins_over_allowlist() {
        let config = FilterConfig {
            target_tables: vec!["Users".into()],
            skip_tables: vec!["Users".into()],
        };
        assert!(!config.retains("Users"));
    }

    #[test]
    fn allowlist_excludes_unlisted_tables() {
        let config = FilterConfig {
            target_tables: vec!["Users".into()],
            skip_tables: vec![],
        };
        assert!(config.retains("Users"));
        assert!(!config.retains("Posts"));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filter.yml");
        fs::write(&path, "target_tables: \"Users\"\nskip_tables: \"Posts\"\n").unwrap();
        let config = FilterConfig::load(&path).unwrap();
        assert_eq!(config.target_tables, vec!["Users"]);
        assert_eq!(config.skip_tables, vec!["Posts"]);
    }
}
