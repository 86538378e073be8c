//! Subcommands and the project layout they share.

use std::path::{Path, PathBuf};

pub mod build;
pub mod init;

/// Translation documents, relative to the project root.
pub const TRANSLATIONS_DIR: &str = "tools/translations";

/// The nearest directory at or above `start` that holds `config` or the
/// translations directory, else `start` itself.
pub fn discover_root(start: &Path, config: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join(config).is_file() || dir.join(TRANSLATIONS_DIR).is_dir())
        .unwrap_or(start)
        .to_path_buf()
}
