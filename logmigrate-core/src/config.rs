//! Configuration loading from logmigrate.toml.

use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::{IoResultExt, MigrateError, MigrateResult};

/// Name of the optional config file looked up in the library root.
pub const CONFIG_FILE_NAME: &str = "logmigrate.toml";

/// Main configuration structure for logmigrate.toml.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MigrateConfig {
    /// File extensions to scan, without the leading dot.
    pub extensions: Option<Vec<String>>,
    /// Only emit the logging config when the main header was found.
    pub require_header: Option<bool>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
}

impl MigrateConfig {
    /// Whether the usage map should also be printed as JSON.
    pub fn wants_json(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

/// Loads configuration from `logmigrate.toml` in `root` if it exists.
pub fn load_config(root: &Path) -> MigrateResult<Option<MigrateConfig>> {
    let path = root.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}

/// Loads configuration from an explicit file path.
pub fn load_config_file(path: &Path) -> MigrateResult<MigrateConfig> {
    let content = fs::read_to_string(path).with_path(path)?;
    let cfg: MigrateConfig = toml::from_str(&content)
        .map_err(|e| MigrateError::config(path, format!("Invalid {}: {}", CONFIG_FILE_NAME, e)))?;

    if let Some(format) = cfg.output.as_ref().and_then(|o| o.format.as_deref()) {
        if !matches!(format.to_ascii_lowercase().as_str(), "plain" | "json") {
            return Err(MigrateError::config(
                path,
                format!("unknown output format '{}', expected \"plain\" or \"json\"", format),
            ));
        }
    }

    if let Some(exts) = &cfg.extensions {
        if let Some(bad) = exts.iter().find(|e| e.is_empty() || e.starts_with('.')) {
            return Err(MigrateError::config(
                path,
                format!("extension '{}' must be non-empty and given without a leading dot", bad),
            ));
        }
    }

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_temp_dir(name: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir()
            .join("logmigrate_config_test")
            .join(format!("{}_{}_{}", name, std::process::id(), id));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_config_is_none() {
        let dir = create_temp_dir("none");
        assert_eq!(load_config(&dir).unwrap(), None);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let dir = create_temp_dir("full");
        fs::write(
            dir.join(CONFIG_FILE_NAME),
            "extensions = [\"c\", \"cpp\", \"h\", \"hpp\"]\nrequire_header = true\n\n[output]\nformat = \"json\"\n",
        )
        .unwrap();

        let cfg = load_config(&dir).unwrap().unwrap();
        assert_eq!(
            cfg.extensions,
            Some(vec!["c".into(), "cpp".into(), "h".into(), "hpp".into()])
        );
        assert_eq!(cfg.require_header, Some(true));
        assert!(cfg.wants_json());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_malformed_config_is_config_error() {
        let dir = create_temp_dir("malformed");
        fs::write(dir.join(CONFIG_FILE_NAME), "extensions = \"cpp\"").unwrap();

        let err = load_config(&dir).unwrap_err();
        assert!(matches!(err, MigrateError::Config { .. }));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_format_rejected() {
        let dir = create_temp_dir("format");
        fs::write(dir.join(CONFIG_FILE_NAME), "[output]\nformat = \"xml\"\n").unwrap();
        assert!(load_config(&dir).is_err());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_dotted_extension_rejected() {
        let dir = create_temp_dir("dotted");
        fs::write(dir.join(CONFIG_FILE_NAME), "extensions = [\".cpp\"]\n").unwrap();
        assert!(load_config(&dir).is_err());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_plain_is_default() {
        assert!(!MigrateConfig::default().wants_json());
    }
}
