//! logmigrate CLI - logger migration helper for C/C++ libraries.
//!
//! Scans a library for legacy `LOG_*` calls, writes a migration report and
//! generates tag-based logging macros for the library's main header.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use logmigrate_core::{
    init_structured_logging, load_config, load_config_file, log_error, log_info, MigrateConfig,
    MigrateError, Migration,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Logger Migration Helper")]
pub struct Cli {
    /// Library name (e.g., MyLibrary)
    #[arg(long)]
    lib_name: String,

    /// Path to library
    #[arg(long)]
    lib_path: PathBuf,

    /// Skip backup creation
    #[arg(long)]
    no_backup: bool,

    /// Only analyze, do not modify
    #[arg(long)]
    analyze_only: bool,

    /// Print the usage analysis as JSON
    #[arg(long)]
    json: bool,

    /// Verify the backup copy with SHA-256 hashes
    #[arg(long)]
    verify_backup: bool,

    /// Only generate the logging configuration when the main header is found
    #[arg(long)]
    require_header: bool,

    /// Config file to use instead of <lib-path>/logmigrate.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Loads the explicit config file, or the library's own one if present.
fn resolve_config(cli: &Cli) -> Result<Option<MigrateConfig>> {
    match &cli.config {
        Some(path) => load_config_file(path)
            .map(Some)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => load_config(&cli.lib_path)
            .with_context(|| format!("Failed to load config from: {}", cli.lib_path.display())),
    }
}

fn build_migration(cli: &Cli, config: Option<&MigrateConfig>) -> Migration {
    let mut migration = Migration::new(cli.lib_name.as_str(), cli.lib_path.as_path());
    if let Some(cfg) = config {
        migration = migration.with_config(cfg);
    }

    // Flags only ever switch behavior on, so they win over the config file.
    migration = migration
        .backup(!cli.no_backup)
        .analyze_only(cli.analyze_only)
        .verify_backup(cli.verify_backup);
    if cli.json {
        migration = migration.json(true);
    }
    if cli.require_header {
        migration = migration.require_header(true);
    }
    migration
}

/// Message printed for errors caused by bad input, which exit with code 1
/// instead of an error chain.
fn user_error_message(err: &MigrateError) -> Option<String> {
    err.is_user_error().then(|| format!("Error: {err}"))
}

fn exit_with(message: &str) -> ! {
    println!("{message}");
    std::process::exit(1);
}

fn main() -> Result<()> {
    init_structured_logging();

    let cli = Cli::parse();

    if !cli.lib_path.exists() {
        let err = MigrateError::LibraryNotFound {
            path: cli.lib_path.clone(),
        };
        exit_with(&format!("Error: {err}"));
    }

    let config = resolve_config(&cli)?;
    let migration = build_migration(&cli, config.as_ref());
    log_info(&format!(
        "starting migration of {} at {}",
        cli.lib_name,
        cli.lib_path.display()
    ));

    match migration.run() {
        Ok(_) => Ok(()),
        Err(e) => {
            log_error(&e.to_string());
            match user_error_message(&e) {
                Some(message) => exit_with(&message),
                None => Err(e).with_context(|| format!("Migration of {} failed", cli.lib_name)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_required_and_optional_flags() {
        let cli = Cli::try_parse_from([
            "logmigrate",
            "--lib-name",
            "MyLibrary",
            "--lib-path",
            "../MyLibrary",
            "--no-backup",
            "--analyze-only",
        ])
        .unwrap();

        assert_eq!(cli.lib_name, "MyLibrary");
        assert_eq!(cli.lib_path, PathBuf::from("../MyLibrary"));
        assert!(cli.no_backup);
        assert!(cli.analyze_only);
        assert!(!cli.json);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_lib_name_is_required() {
        assert!(Cli::try_parse_from(["logmigrate", "--lib-path", "."]).is_err());
    }

    #[test]
    fn test_lib_path_is_required() {
        assert!(Cli::try_parse_from(["logmigrate", "--lib-name", "Widget"]).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "logmigrate",
            "--lib-name",
            "Widget",
            "--lib-path",
            "/libs/Widget",
            "--require-header",
        ])
        .unwrap();
        let config = MigrateConfig {
            require_header: Some(false),
            ..MigrateConfig::default()
        };

        let migration = build_migration(&cli, Some(&config));
        assert_eq!(migration.library().name, "Widget");
        assert_eq!(migration.library().path, PathBuf::from("/libs/Widget"));
        assert!(migration.requires_header());
    }

    #[test]
    fn test_user_error_messages() {
        let missing = MigrateError::LibraryNotFound {
            path: PathBuf::from("../Missing"),
        };
        assert_eq!(
            user_error_message(&missing).as_deref(),
            Some("Error: Library path '../Missing' does not exist")
        );

        let file = MigrateError::not_a_directory("../Widget.zip");
        assert_eq!(
            user_error_message(&file).as_deref(),
            Some("Error: Invalid argument: '../Widget.zip' is not a directory")
        );

        let io = MigrateError::io_message("../Widget/src/bad.cpp", "stream did not contain valid UTF-8");
        assert!(user_error_message(&io).is_none());
    }
}
