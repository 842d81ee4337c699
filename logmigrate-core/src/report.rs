//! Migration report rendering - Markdown and JSON.

use std::fmt::Write as _;

use crate::error::{MigrateError, MigrateResult};
use crate::library::macro_prefix;
use crate::scan::{UsageCategory, UsageEntry, UsageReport};

const NEXT_STEPS: &[&str] = &[
    "Add logging configuration to main header",
    "Replace logger calls with new macros",
    "Remove Logger includes from source files",
    "Test both configurations",
    "Update documentation",
];

/// Renders the Markdown migration report.
///
/// Categories without entries get no section at all. The suggested
/// replacements, build flag and next steps are always present.
pub fn generate_report(lib_name: &str, usage: &UsageReport) -> String {
    let prefix = macro_prefix(lib_name);
    let mut report = format!("# Logger Migration Report for {lib_name}\n\n## Analysis Results\n\n");

    // Writing into a String cannot fail.
    for (category, entries) in usage.non_empty() {
        let _ = writeln!(report, "### {category}");
        for entry in entries {
            match entry {
                UsageEntry::Counted { file, count } => {
                    let _ = writeln!(report, "- {file}: {count} occurrences");
                }
                UsageEntry::Present { file } => {
                    let _ = writeln!(report, "- {file}");
                }
            }
        }
        report.push('\n');
    }

    report.push_str("\n## Suggested Replacements\n\n");
    for category in UsageCategory::CALL_FORMS {
        if let (Some(keyword), Some(suffix)) = (category.keyword(), category.severity_suffix()) {
            let _ = writeln!(report, "- {keyword}(TAG, ...) → {prefix}_LOG_{suffix}(...)");
        }
    }

    let _ = write!(
        report,
        "\n## Build Configuration\n\n\
         To use with custom logger:\n\
         ```ini\n\
         build_flags = -D {prefix}_USE_CUSTOM_LOGGER\n\
         ```\n\
         \n## Next Steps\n\n"
    );
    for (i, step) in NEXT_STEPS.iter().enumerate() {
        let _ = writeln!(report, "{}. {}", i + 1, step);
    }

    report
}

/// Renders the usage map as pretty-printed JSON.
pub fn usage_to_json(usage: &UsageReport) -> MigrateResult<String> {
    serde_json::to_string_pretty(usage).map_err(|e| MigrateError::Internal {
        message: format!("JSON serialization failed: {e}"),
    })
}

/// Prints the usage map as JSON to stdout.
pub fn print_json(usage: &UsageReport) {
    match usage_to_json(usage) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("[WARN] {}", e),
    }
}
