//! Builder API that runs the whole migration pipeline.
//!
//! ```rust,ignore
//! use logmigrate_core::prelude::*;
//!
//! let outcome = Migration::new("Widget", "../Widget")
//!     .backup(false)
//!     .analyze_only(true)
//!     .run()?;
//!
//! println!("{} call sites", outcome.usage.total_calls());
//! ```
//!
//! Stages run strictly in order: backup, scan, report, then (unless
//! analyze-only) header lookup and config emission. Every stage overwrites
//! its own previous output and nothing is rolled back on failure.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use tracing::{info, info_span, warn};

use crate::backup::{create_backup, verify_backup, BackupVerification};
use crate::config::MigrateConfig;
use crate::emit::write_logging_config;
use crate::error::{MigrateError, MigrateResult};
use crate::header::{find_main_header, HeaderLookup};
use crate::library::{Library, REPORT_FILE};
use crate::logging::log_warn;
use crate::report::{generate_report, print_json};
use crate::scan::{analyze_usage_with_extensions, UsageReport, DEFAULT_EXTENSIONS};
use crate::tree::{FsTree, SourceTree};

const RULE_WIDTH: usize = 50;

const OPERATOR_NEXT_STEPS: &[&str] = &[
    "Review the migration report",
    "Add logging configuration to your main header",
    "Use search & replace to update logger calls",
    "Remove Logger includes from source files",
    "Test both configurations",
];

/// The generated macro snippet and where it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedConfig {
    pub path: PathBuf,
    pub snippet: String,
}

/// Everything a pipeline run produced.
#[derive(Debug, Clone)]
pub struct MigrationOutcome {
    /// Backup directory, when one was created
    pub backup: Option<PathBuf>,
    /// Backup comparison, when verification was requested
    pub backup_verification: Option<BackupVerification>,
    /// Scanner output
    pub usage: UsageReport,
    /// Where the Markdown report was written
    pub report_path: PathBuf,
    /// Header lookup result; `None` in analyze-only mode
    pub header: Option<HeaderLookup>,
    /// Emitted snippet; `None` in analyze-only mode or when gated on a missing header
    pub config: Option<EmittedConfig>,
}

/// Builder for configuring and running a logger migration.
#[derive(Debug, Clone)]
pub struct Migration {
    library: Library,
    backup: bool,
    analyze_only: bool,
    require_header: bool,
    verify_backup: bool,
    json: bool,
    extensions: Vec<String>,
    quiet: bool,
}

impl Migration {
    /// Create a new migration for the named library at `path`.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            library: Library::new(name, path),
            backup: true,
            analyze_only: false,
            require_header: false,
            verify_backup: false,
            json: false,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            quiet: false,
        }
    }

    /// Create or skip the timestamped backup copy.
    pub fn backup(mut self, enabled: bool) -> Self {
        self.backup = enabled;
        self
    }

    /// Only scan and report; no backup and no config emission.
    pub fn analyze_only(mut self, enabled: bool) -> Self {
        self.analyze_only = enabled;
        self
    }

    /// Emit the config snippet only when the main header was found.
    pub fn require_header(mut self, enabled: bool) -> Self {
        self.require_header = enabled;
        self
    }

    /// Hash-compare the backup against the source after copying.
    pub fn verify_backup(mut self, enabled: bool) -> Self {
        self.verify_backup = enabled;
        self
    }

    /// Print the usage map as JSON after the scan.
    pub fn json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }

    /// Replace the scanned extension allow-list.
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Suppress terminal progress output.
    pub fn quiet(mut self, enabled: bool) -> Self {
        self.quiet = enabled;
        self
    }

    /// Apply values from a `logmigrate.toml`. Unset values are left alone.
    pub fn with_config(mut self, config: &MigrateConfig) -> Self {
        if let Some(exts) = &config.extensions {
            self.extensions = exts.clone();
        }
        if let Some(require) = config.require_header {
            self.require_header = require;
        }
        if config.wants_json() {
            self.json = true;
        }
        self
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn requires_header(&self) -> bool {
        self.require_header
    }

    /// Run the full pipeline against the real filesystem.
    pub fn run(&self) -> MigrateResult<MigrationOutcome> {
        let _span = info_span!("migration", library = %self.library.name).entered();

        if !self.library.exists() {
            return Err(MigrateError::LibraryNotFound {
                path: self.library.path.clone(),
            });
        }
        if !self.library.path.is_dir() {
            return Err(MigrateError::not_a_directory(&self.library.path));
        }

        self.print_banner();

        let mut backup = None;
        let mut backup_verification = None;
        if self.backup && !self.analyze_only {
            let dest = create_backup(&self.library.path)?;
            self.say(format!("✓ Created backup at: {}", dest.display()));

            if self.verify_backup {
                let verification = verify_backup(&self.library.path, &dest)?;
                if !verification.is_identical() {
                    return Err(MigrateError::io_message(
                        &dest,
                        format!(
                            "backup verification failed: {} missing, {} differing",
                            verification.missing.len(),
                            verification.mismatched.len()
                        ),
                    ));
                }
                self.say(format!(
                    "✓ Verified backup: {} files identical",
                    verification.files_checked
                ));
                backup_verification = Some(verification);
            }
            backup = Some(dest);
        }

        let mut tree = FsTree::new(&self.library.path);
        let mut outcome = self.run_stages(&mut tree)?;
        outcome.backup = backup;
        outcome.backup_verification = backup_verification;
        Ok(outcome)
    }

    /// Run scan, report and emit against any tree. No backup is made.
    pub fn run_with_tree<T: SourceTree + ?Sized>(&self, tree: &mut T) -> MigrateResult<MigrationOutcome> {
        let _span = info_span!("migration", library = %self.library.name).entered();
        self.print_banner();
        self.run_stages(tree)
    }

    fn run_stages<T: SourceTree + ?Sized>(&self, tree: &mut T) -> MigrateResult<MigrationOutcome> {
        let name = &self.library.name;

        self.say("\n📊 Analyzing logger usage...");
        let usage = analyze_usage_with_extensions(&*tree, &self.extensions)?;
        info!(calls = usage.total_calls(), "scan finished");
        if self.json {
            print_json(&usage);
        }

        let report = generate_report(name, &usage);
        let report_path = tree.write(Path::new(REPORT_FILE), &report)?;
        self.say(format!("✓ Generated report: {}", report_path.display()));

        let mut outcome = MigrationOutcome {
            backup: None,
            backup_verification: None,
            usage,
            report_path,
            header: None,
            config: None,
        };

        if self.analyze_only {
            self.say("\n✅ Analysis complete (--analyze-only mode)");
            return Ok(outcome);
        }

        self.say("\n🔍 Finding main header file...");
        let header = find_main_header(&*tree, &self.library)?;
        match &header {
            HeaderLookup::Found(path) => {
                self.say(format!("✓ Found main header: {}", tree.display_path(path).display()));
            }
            HeaderLookup::NotFound { headers } => {
                if !headers.is_empty() {
                    self.say(format!(
                        "Could not find main header. Found: {}",
                        header_list(headers)
                    ));
                }
                self.say("❌ Could not find main header file. Please add logging configuration manually.");
                log_warn(&format!("no main header found for {}", name));
            }
        }

        if header.is_found() || !self.require_header {
            let (path, snippet) = write_logging_config(tree, name)?;
            self.say(format!("✓ Generated logging configuration: {}", path.display()));
            self.say("\n📋 Add this to your main header file before the class definition:");
            self.say("-".repeat(RULE_WIDTH));
            self.say(&snippet);
            self.say("-".repeat(RULE_WIDTH));
            outcome.config = Some(EmittedConfig { path, snippet });
        } else {
            warn!("config emission skipped, main header required");
            self.say("Skipped logging configuration: main header required but not found");
        }
        outcome.header = Some(header);

        self.say("\n✅ Migration preparation complete!");
        self.say("\n📚 Next steps:");
        for (i, step) in OPERATOR_NEXT_STEPS.iter().enumerate() {
            self.say(format!("{}. {}", i + 1, step));
        }

        Ok(outcome)
    }

    fn print_banner(&self) {
        self.say(format!("\n🔧 Logger Migration Helper for {}", self.library.name));
        self.say("=".repeat(RULE_WIDTH));
    }

    fn say(&self, line: impl Display) {
        if !self.quiet {
            println!("{}", line);
        }
    }
}

/// Header names as a bracketed, single-quoted list: `['a.h', 'b.h']`.
fn header_list(headers: &[String]) -> String {
    let quoted: Vec<String> = headers.iter().map(|h| format!("'{}'", h)).collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::CONFIG_FILE;
    use crate::scan::{UsageCategory, UsageEntry};
    use crate::tree::MemoryTree;

    fn widget_tree() -> MemoryTree {
        MemoryTree::new()
            .with_file("src/Widget.h", "#pragma once\n#include \"Logger.h\"\n")
            .with_file(
                "src/impl.cpp",
                "void f() {\n  LOG_WARN(TAG, \"a\");\n  LOG_WARN(TAG, \"b\");\n}\n",
            )
    }

    #[test]
    fn test_full_run_on_memory_tree() {
        let mut tree = widget_tree();
        let outcome = Migration::new("Widget", "/unused")
            .quiet(true)
            .run_with_tree(&mut tree)
            .unwrap();

        assert_eq!(
            outcome.usage.entries(UsageCategory::LogWarn),
            &[UsageEntry::Counted {
                file: "impl.cpp".into(),
                count: 2
            }]
        );
        assert_eq!(
            outcome.header,
            Some(HeaderLookup::Found(PathBuf::from("src/Widget.h")))
        );
        let report = tree.get(REPORT_FILE).unwrap();
        assert!(report.contains("### LOG_WARN\n- impl.cpp: 2 occurrences\n"));
        assert!(report.contains("### Logger includes\n- Widget.h\n"));
        let config = tree.get(CONFIG_FILE).unwrap();
        assert!(config.contains("#define WIDGET_LOG_TAG \"Widget\""));
        assert_eq!(outcome.config.unwrap().snippet, config);
    }

    #[test]
    fn test_analyze_only_skips_config() {
        let mut tree = widget_tree();
        let outcome = Migration::new("Widget", "/unused")
            .quiet(true)
            .analyze_only(true)
            .run_with_tree(&mut tree)
            .unwrap();

        assert!(tree.get(REPORT_FILE).is_some());
        assert!(tree.get(CONFIG_FILE).is_none());
        assert!(outcome.header.is_none());
        assert!(outcome.config.is_none());
    }

    #[test]
    fn test_config_emitted_without_header_by_default() {
        let mut tree = MemoryTree::new().with_file("src/other.h", "");
        let outcome = Migration::new("Widget", "/unused")
            .quiet(true)
            .run_with_tree(&mut tree)
            .unwrap();

        assert_eq!(
            outcome.header,
            Some(HeaderLookup::NotFound {
                headers: vec!["other.h".to_string()]
            })
        );
        assert!(tree.get(CONFIG_FILE).is_some());
    }

    #[test]
    fn test_require_header_gates_emission() {
        let mut tree = MemoryTree::new().with_file("src/other.h", "");
        let outcome = Migration::new("Widget", "/unused")
            .quiet(true)
            .require_header(true)
            .run_with_tree(&mut tree)
            .unwrap();

        assert!(outcome.config.is_none());
        assert!(tree.get(CONFIG_FILE).is_none());
    }

    #[test]
    fn test_with_config_overrides_defaults() {
        let config = MigrateConfig {
            extensions: Some(vec!["hpp".to_string()]),
            require_header: Some(true),
            output: None,
        };
        let mut tree = MemoryTree::new()
            .with_file("src/a.hpp", "LOG_DEBUG(TAG, \"x\");")
            .with_file("src/b.cpp", "LOG_DEBUG(TAG, \"y\");");

        let outcome = Migration::new("Widget", "/unused")
            .quiet(true)
            .with_config(&config)
            .run_with_tree(&mut tree)
            .unwrap();

        let files: Vec<_> = outcome
            .usage
            .entries(UsageCategory::LogDebug)
            .iter()
            .map(|e| e.file().to_string())
            .collect();
        assert_eq!(files, vec!["a.hpp".to_string()]);
        assert!(outcome.config.is_none());
    }

    #[test]
    fn test_extensions_builder() {
        let mut tree = MemoryTree::new()
            .with_file("src/sketch.ino", "LOG_ERROR(TAG, \"x\");")
            .with_file("src/impl.cpp", "LOG_ERROR(TAG, \"y\");");

        let outcome = Migration::new("Widget", "/unused")
            .quiet(true)
            .analyze_only(true)
            .extensions(["ino"])
            .run_with_tree(&mut tree)
            .unwrap();

        assert_eq!(outcome.usage.total_calls(), 1);
        assert_eq!(outcome.usage.entries(UsageCategory::LogError)[0].file(), "sketch.ino");
    }

    #[test]
    fn test_missing_library_path() {
        let err = Migration::new("Widget", "/definitely/not/here/Widget")
            .quiet(true)
            .run()
            .unwrap_err();
        assert!(matches!(err, MigrateError::LibraryNotFound { .. }));
    }

    #[test]
    fn test_library_path_that_is_a_file() {
        let file = std::env::temp_dir().join(format!(
            "logmigrate_not_a_dir_{}.txt",
            std::process::id()
        ));
        std::fs::write(&file, "").unwrap();

        let err = Migration::new("Widget", &file).quiet(true).run().unwrap_err();
        assert!(matches!(err, MigrateError::InvalidArgument { .. }));
        assert!(err.to_string().contains("is not a directory"));

        std::fs::remove_file(&file).ok();
    }

    #[test]
    fn test_header_list_format() {
        assert_eq!(header_list(&[]), "[]");
        assert_eq!(header_list(&["a.h".to_string()]), "['a.h']");
        assert_eq!(
            header_list(&["Helpers.h".to_string(), "Types.h".to_string()]),
            "['Helpers.h', 'Types.h']"
        );
    }
}
