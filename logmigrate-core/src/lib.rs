//! logmigrate-core: legacy logger usage scanner and migration scaffolding.
//!
//! Helps a C/C++ library move from a mandatory custom logger
//! (`LOG_ERROR(TAG, ...)`, `#include <Logger.h>`, `getLogger()`) to optional,
//! tag-based logging macros namespaced by the library name.
//!
//! # Pipeline
//!
//! 1. **Backup**: copy the library next to itself, stamped with the time
//! 2. **Scan**: count legacy call sites per file under `src/`
//! 3. **Report**: write `LOGGER_MIGRATION_REPORT.md`
//! 4. **Emit**: locate the main header and write `logging_config.txt`
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use logmigrate_core::prelude::*;
//!
//! let outcome = Migration::new("MyLibrary", "../MyLibrary")
//!     .backup(false)
//!     .run()?;
//!
//! for (category, entries) in outcome.usage.non_empty() {
//!     println!("{}: {} files", category, entries.len());
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`library`]: library descriptor and macro prefix derivation
//! - [`tree`]: filesystem abstraction shared by the stages
//! - [`backup`]: timestamped backup copy and verification
//! - [`scan`]: legacy usage scanner
//! - [`report`]: Markdown and JSON rendering
//! - [`header`]: main header lookup
//! - [`emit`]: logging macro snippet generation
//! - [`migration`]: builder API running the whole pipeline
//! - [`config`]: `logmigrate.toml` loading
//! - [`error`]: typed error handling

pub mod backup;
pub mod config;
pub mod emit;
pub mod error;
pub mod header;
pub mod library;
pub mod logging;
pub mod migration;
pub mod prelude;
pub mod report;
pub mod scan;
pub mod tree;

// Error types
pub use error::{IoResultExt, MigrateError, MigrateResult};

// Library descriptor
pub use library::{macro_prefix, Library, CONFIG_FILE, REPORT_FILE, SRC_DIR};

// Backup
pub use backup::{
    backup_path, create_backup, create_backup_at, file_hash, verify_backup, BackupVerification,
    BACKUP_TIMESTAMP_FORMAT,
};

// Configuration
pub use config::{load_config, load_config_file, MigrateConfig, OutputConfig, CONFIG_FILE_NAME};

// Scanning
pub use scan::{
    analyze_usage, analyze_usage_with_extensions, UsageCategory, UsageEntry, UsagePatterns,
    UsageReport, DEFAULT_EXTENSIONS,
};

// Reporting
pub use report::{generate_report, print_json, usage_to_json};

// Header lookup and emission
pub use emit::{create_logging_config, write_logging_config};
pub use header::{find_main_header, header_candidates, HeaderLookup};

// Pipeline
pub use migration::{EmittedConfig, Migration, MigrationOutcome};

// Filesystem abstraction
pub use tree::{FsTree, MemoryTree, SourceTree};

// Logging
pub use logging::{init_structured_logging, log_error, log_info, log_warn};
