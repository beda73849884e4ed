//! Configuration loading from tagaudit.toml.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::TagauditError;

/// Name of the optional configuration file looked up in the audit root.
pub const CONFIG_FILE: &str = "tagaudit.toml";

/// Main configuration structure for tagaudit.toml.
///
/// Every field is optional; command-line flags win over the file and the
/// file wins over built-in defaults.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TagauditConfig {
    /// Identifiers to audit instead of the embedded list.
    pub identifiers: Option<Vec<String>>,
    /// Flags table path, relative to the root.
    pub table: Option<String>,
    /// File type filter name (e.g. "cpp").
    pub file_type: Option<String>,
    /// Search backend: "external" or "builtin".
    pub backend: Option<String>,
    /// Extra directory names skipped by the builtin backend.
    pub exclude: Option<Vec<String>>,
    /// Highlight matches in the builtin detail dump.
    pub color: Option<bool>,
}

/// Loads configuration from tagaudit.toml if it exists.
pub fn load_config(root: &Path) -> Result<Option<TagauditConfig>> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let cfg = toml::from_str(&content)
        .map_err(|e| TagauditError::config(&path, e.message()))
        .context("Invalid tagaudit.toml")?;
    Ok(Some(cfg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_root() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!(
            "tagaudit_config_test_{}_{}",
            std::process::id(),
            id
        ));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_config_is_none() {
        let root = temp_root();
        assert_eq!(load_config(&root).unwrap(), None);
        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_parses_all_fields() {
        let root = temp_root();
        fs::write(
            root.join(CONFIG_FILE),
            r#"
identifiers = ["HcalBarrelClusters", "EcalEndcapNRawHits"]
table = "flags/reco_flags.py"
file_type = "cpp"
backend = "builtin"
exclude = ["third_party"]
color = false
"#,
        )
        .unwrap();

        let cfg = load_config(&root).unwrap().unwrap();
        assert_eq!(
            cfg.identifiers.as_deref(),
            Some(&["HcalBarrelClusters".to_string(), "EcalEndcapNRawHits".to_string()][..])
        );
        assert_eq!(cfg.table.as_deref(), Some("flags/reco_flags.py"));
        assert_eq!(cfg.backend.as_deref(), Some("builtin"));
        assert_eq!(cfg.exclude, Some(vec!["third_party".to_string()]));
        assert_eq!(cfg.color, Some(false));
        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_malformed_config_is_error() {
        let root = temp_root();
        fs::write(root.join(CONFIG_FILE), "identifiers = 3\n").unwrap();
        let err = load_config(&root).unwrap_err();
        assert!(err.to_string().contains("Invalid tagaudit.toml"));
        assert!(matches!(
            err.downcast_ref::<TagauditError>(),
            Some(TagauditError::Config { .. })
        ));
        fs::remove_dir_all(&root).ok();
    }
}
