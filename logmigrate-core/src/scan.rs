//! Legacy logger usage scanning.
//!
//! Walks `src/` of a library and matches every source file against a fixed
//! set of textual patterns:
//!
//! - five call-site categories (`LOG_ERROR(...)` .. `LOG_VERBOSE(...)`),
//!   recorded per file with their match count
//! - two presence categories (legacy `Logger` includes and `getLogger()`
//!   calls), recorded as bare file names
//!
//! Matching is regex/substring based, not a C++ parse. A call-site match
//! stops at the first `)`, so `LOG_INFO(TAG, f(x))` is counted once but
//! only covers `LOG_INFO(TAG, f(x)`. Counts depend on this and it is kept
//! on purpose.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::error::{MigrateError, MigrateResult};
use crate::library::SRC_DIR;
use crate::tree::SourceTree;

/// File extensions scanned by default.
pub const DEFAULT_EXTENSIONS: &[&str] = &["cpp", "h", "c"];

/// One of the seven fixed pattern categories, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum UsageCategory {
    #[serde(rename = "LOG_ERROR")]
    LogError,
    #[serde(rename = "LOG_WARN")]
    LogWarn,
    #[serde(rename = "LOG_INFO")]
    LogInfo,
    #[serde(rename = "LOG_DEBUG")]
    LogDebug,
    #[serde(rename = "LOG_VERBOSE")]
    LogVerbose,
    #[serde(rename = "Logger includes")]
    LoggerIncludes,
    #[serde(rename = "getLogger calls")]
    GetLoggerCalls,
}

impl UsageCategory {
    pub const ALL: [UsageCategory; 7] = [
        Self::LogError,
        Self::LogWarn,
        Self::LogInfo,
        Self::LogDebug,
        Self::LogVerbose,
        Self::LoggerIncludes,
        Self::GetLoggerCalls,
    ];

    pub const CALL_FORMS: [UsageCategory; 5] = [
        Self::LogError,
        Self::LogWarn,
        Self::LogInfo,
        Self::LogDebug,
        Self::LogVerbose,
    ];

    /// Heading used in the report and the JSON output.
    pub fn label(self) -> &'static str {
        match self {
            Self::LogError => "LOG_ERROR",
            Self::LogWarn => "LOG_WARN",
            Self::LogInfo => "LOG_INFO",
            Self::LogDebug => "LOG_DEBUG",
            Self::LogVerbose => "LOG_VERBOSE",
            Self::LoggerIncludes => "Logger includes",
            Self::GetLoggerCalls => "getLogger calls",
        }
    }

    /// Legacy macro keyword for call-site categories.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Self::LogError => Some("LOG_ERROR"),
            Self::LogWarn => Some("LOG_WARN"),
            Self::LogInfo => Some("LOG_INFO"),
            Self::LogDebug => Some("LOG_DEBUG"),
            Self::LogVerbose => Some("LOG_VERBOSE"),
            Self::LoggerIncludes | Self::GetLoggerCalls => None,
        }
    }

    /// Single-letter severity suffix of the replacement macro (`E`, `W`, ...).
    pub fn severity_suffix(self) -> Option<char> {
        match self {
            Self::LogError => Some('E'),
            Self::LogWarn => Some('W'),
            Self::LogInfo => Some('I'),
            Self::LogDebug => Some('D'),
            Self::LogVerbose => Some('V'),
            Self::LoggerIncludes | Self::GetLoggerCalls => None,
        }
    }

    pub fn is_call_form(self) -> bool {
        self.keyword().is_some()
    }
}

impl fmt::Display for UsageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A file recorded under a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum UsageEntry {
    /// Call-site category: file plus number of matches in it.
    Counted { file: String, count: usize },
    /// Presence category: the file matched at least once.
    Present { file: String },
}

impl UsageEntry {
    pub fn file(&self) -> &str {
        match self {
            Self::Counted { file, .. } | Self::Present { file } => file,
        }
    }

    pub fn count(&self) -> Option<usize> {
        match self {
            Self::Counted { count, .. } => Some(*count),
            Self::Present { .. } => None,
        }
    }
}

/// Scan result: every category mapped to its entries in walk order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UsageReport {
    categories: BTreeMap<UsageCategory, Vec<UsageEntry>>,
}

impl Default for UsageReport {
    fn default() -> Self {
        Self {
            categories: UsageCategory::ALL
                .iter()
                .map(|&c| (c, Vec::new()))
                .collect(),
        }
    }
}

impl UsageReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self, category: UsageCategory) -> &[UsageEntry] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn push(&mut self, category: UsageCategory, entry: UsageEntry) {
        self.categories.entry(category).or_default().push(entry);
    }

    /// Categories in report order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (UsageCategory, &[UsageEntry])> {
        self.categories.iter().map(|(c, e)| (*c, e.as_slice()))
    }

    /// Categories that recorded at least one file.
    pub fn non_empty(&self) -> impl Iterator<Item = (UsageCategory, &[UsageEntry])> {
        self.iter().filter(|(_, e)| !e.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.non_empty().next().is_none()
    }

    /// Sum of call-site matches across all files and severities.
    pub fn total_calls(&self) -> usize {
        self.iter()
            .flat_map(|(_, entries)| entries.iter())
            .filter_map(UsageEntry::count)
            .sum()
    }
}

/// Pre-compiled call-site patterns, one per severity.
pub struct UsagePatterns {
    calls: Vec<(UsageCategory, Regex)>,
}

impl UsagePatterns {
    pub fn new() -> MigrateResult<Self> {
        let calls = UsageCategory::CALL_FORMS
            .iter()
            .filter_map(|&c| c.keyword().map(|k| (c, k)))
            .map(|(category, keyword)| {
                let pattern = format!(r"{}\s*\([^)]+\)", regex::escape(keyword));
                Regex::new(&pattern)
                    .map(|re| (category, re))
                    .map_err(|e| MigrateError::pattern(e.to_string()))
            })
            .collect::<MigrateResult<Vec<_>>>()?;
        Ok(Self { calls })
    }

    /// Match one file's content, returning the count per call-site category.
    pub fn count_calls(&self, content: &str) -> Vec<(UsageCategory, usize)> {
        self.calls
            .iter()
            .map(|(category, re)| (*category, re.find_iter(content).count()))
            .filter(|(_, n)| *n > 0)
            .collect()
    }
}

fn has_logger_include(content: &str) -> bool {
    content.contains("#include \"Logger") || content.contains("#include <Logger")
}

fn has_get_logger_call(content: &str) -> bool {
    content.contains("getLogger()")
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|allowed| allowed == ext))
}

/// Name recorded for a file: its bare file name, whatever its depth below `src/`.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Scan `src/` with the default extension allow-list.
pub fn analyze_usage<T: SourceTree + ?Sized>(tree: &T) -> MigrateResult<UsageReport> {
    let extensions: Vec<String> = DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect();
    analyze_usage_with_extensions(tree, &extensions)
}

/// Scan `src/`, considering only files whose extension is in `extensions`.
///
/// Any unreadable file aborts the whole scan.
pub fn analyze_usage_with_extensions<T: SourceTree + ?Sized>(
    tree: &T,
    extensions: &[String],
) -> MigrateResult<UsageReport> {
    let patterns = UsagePatterns::new()?;
    let src = PathBuf::from(SRC_DIR);
    let mut report = UsageReport::new();

    for path in tree.walk_files(&src)? {
        if !has_extension(&path, extensions) {
            continue;
        }

        let content = tree.read_to_string(&path)?;
        let file = display_name(&path);

        for (category, count) in patterns.count_calls(&content) {
            debug!(file = %file, category = %category, count, "call sites matched");
            report.push(
                category,
                UsageEntry::Counted {
                    file: file.clone(),
                    count,
                },
            );
        }

        if has_logger_include(&content) {
            report.push(UsageCategory::LoggerIncludes, UsageEntry::Present { file: file.clone() });
        }

        if has_get_logger_call(&content) {
            report.push(UsageCategory::GetLoggerCalls, UsageEntry::Present { file });
        }
    }

    Ok(report)
}
