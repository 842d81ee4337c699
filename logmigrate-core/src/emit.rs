//! Generation of the tag-based logging macro snippet.

use std::path::{Path, PathBuf};

use crate::error::MigrateResult;
use crate::library::{macro_prefix, CONFIG_FILE};
use crate::scan::UsageCategory;
use crate::tree::SourceTree;

/// Renders the macro definitions to paste into the library's main header.
pub fn create_logging_config(lib_name: &str) -> String {
    let prefix = macro_prefix(lib_name);
    let mut out = String::from("// Logging configuration using LogInterface\n#include <LogInterface.h>\n\n");
    out.push_str(&format!("#define {prefix}_LOG_TAG \"{lib_name}\"\n"));

    // Each severity forwards to the global macro of the same name.
    for category in UsageCategory::CALL_FORMS {
        if let (Some(target), Some(suffix)) = (category.keyword(), category.severity_suffix()) {
            out.push_str(&format!(
                "#define {prefix}_LOG_{suffix}(...) {target}({prefix}_LOG_TAG, __VA_ARGS__)\n"
            ));
        }
    }

    out
}

/// Writes the snippet to `logging_config.txt`, returning the written path.
pub fn write_logging_config<T: SourceTree + ?Sized>(
    tree: &mut T,
    lib_name: &str,
) -> MigrateResult<(PathBuf, String)> {
    let snippet = create_logging_config(lib_name);
    let path = tree.write(Path::new(CONFIG_FILE), &snippet)?;
    Ok((path, snippet))
}
