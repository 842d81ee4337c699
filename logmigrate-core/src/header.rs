//! Main header detection for a library.
//!
//! The main header is probed by name under `src/`, in priority order:
//!
//! 1. `<Name>.h`
//! 2. `<name lowercased>.h`
//! 3. `<macro prefix lowercased>.h`
//!
//! Not finding one is a normal outcome, not an error.

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::MigrateResult;
use crate::library::{Library, SRC_DIR};
use crate::tree::SourceTree;

/// Outcome of a main header lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderLookup {
    /// Path of the header, relative to the library root.
    Found(PathBuf),
    /// No candidate matched; every `.h` file directly in `src/`, sorted.
    NotFound { headers: Vec<String> },
}

impl HeaderLookup {
    pub fn found(&self) -> Option<&Path> {
        match self {
            Self::Found(path) => Some(path.as_path()),
            Self::NotFound { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        self.found().is_some()
    }
}

/// Candidate header file names, highest priority first.
pub fn header_candidates(library: &Library) -> [String; 3] {
    [
        format!("{}.h", library.name),
        format!("{}.h", library.name.to_lowercase()),
        format!("{}.h", library.macro_prefix().to_lowercase()),
    ]
}

/// Locate the library's main header.
pub fn find_main_header<T: SourceTree + ?Sized>(
    tree: &T,
    library: &Library,
) -> MigrateResult<HeaderLookup> {
    let src = Path::new(SRC_DIR);

    for candidate in header_candidates(library) {
        let path = src.join(&candidate);
        trace!(candidate = %path.display(), "probing header candidate");
        if tree.exists(&path) {
            return Ok(HeaderLookup::Found(path));
        }
    }

    let mut headers: Vec<String> = tree
        .list_dir(src)?
        .into_iter()
        .filter(|name| name.ends_with(".h"))
        .collect();
    headers.sort();

    Ok(HeaderLookup::NotFound { headers })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MemoryTree;

    #[test]
    fn test_candidates_order() {
        let lib = Library::new("MyLibrary", "/libs/MyLibrary");
        assert_eq!(
            header_candidates(&lib),
            [
                "MyLibrary.h".to_string(),
                "mylibrary.h".to_string(),
                "my_library.h".to_string()
            ]
        );
    }

    #[test]
    fn test_exact_name_wins_over_lowercase() {
        let tree = MemoryTree::new()
            .with_file("src/my_library.h", "")
            .with_file("src/mylibrary.h", "")
            .with_file("src/MyLibrary.h", "");
        let lib = Library::new("MyLibrary", "/libs/MyLibrary");

        let lookup = find_main_header(&tree, &lib).unwrap();
        assert_eq!(lookup, HeaderLookup::Found(PathBuf::from("src/MyLibrary.h")));
    }

    #[test]
    fn test_lowercase_wins_over_prefix() {
        let tree = MemoryTree::new()
            .with_file("src/my_library.h", "")
            .with_file("src/mylibrary.h", "");
        let lib = Library::new("MyLibrary", "/libs/MyLibrary");

        let lookup = find_main_header(&tree, &lib).unwrap();
        assert_eq!(lookup.found(), Some(Path::new("src/mylibrary.h")));
    }

    #[test]
    fn test_prefix_candidate() {
        let tree = MemoryTree::new().with_file("src/my_library.h", "");
        let lib = Library::new("MyLibrary", "/libs/MyLibrary");

        let lookup = find_main_header(&tree, &lib).unwrap();
        assert_eq!(lookup.found(), Some(Path::new("src/my_library.h")));
    }

    #[test]
    fn test_not_found_lists_headers() {
        let tree = MemoryTree::new()
            .with_file("src/Util.h", "")
            .with_file("src/impl.cpp", "")
            .with_file("src/Types.h", "")
            .with_file("src/detail/Deep.h", "");
        let lib = Library::new("MyLibrary", "/libs/MyLibrary");

        let lookup = find_main_header(&tree, &lib).unwrap();
        assert_eq!(
            lookup,
            HeaderLookup::NotFound {
                headers: vec!["Types.h".to_string(), "Util.h".to_string()]
            }
        );
        assert!(!lookup.is_found());
    }

    #[test]
    fn test_not_found_without_src() {
        let tree = MemoryTree::new().with_file("README.md", "");
        let lib = Library::new("Widget", "/libs/Widget");

        let lookup = find_main_header(&tree, &lib).unwrap();
        assert_eq!(lookup, HeaderLookup::NotFound { headers: Vec::new() });
    }
}
