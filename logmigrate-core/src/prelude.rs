//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use logmigrate_core::prelude::*;
//! ```

pub use crate::error::{MigrateError, MigrateResult};
pub use crate::library::{macro_prefix, Library};

// Pipeline
pub use crate::migration::{Migration, MigrationOutcome};

// Individual stages
pub use crate::backup::create_backup;
pub use crate::emit::create_logging_config;
pub use crate::header::{find_main_header, HeaderLookup};
pub use crate::report::generate_report;
pub use crate::scan::{analyze_usage, UsageCategory, UsageEntry, UsageReport};

pub use crate::config::{load_config, MigrateConfig};
pub use crate::tree::{FsTree, MemoryTree, SourceTree};
