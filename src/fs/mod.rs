//! Filesystem module.
//!
//! Provides:
//! - Output-directory management
//! - Display-name sanitization
//! - Transfer-evidence probes
//!
//! Transfer evidence is read purely from filesystem side effects of the
//! browser's download manager: Chromium streams into `<name>.crdownload`
//! and renames it to `<name>` in place on completion.

pub mod naming;

pub use naming::sanitize_display_name;

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Suffix Chromium appends to in-flight downloads.
pub const PARTIAL_SUFFIX: &str = ".crdownload";

/// The in-progress sibling of a final download path.
pub fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(PARTIAL_SUFFIX);
    dest.with_file_name(name)
}

/// Transfer-begin evidence: the final file or its in-progress sibling exists.
pub fn transfer_begun(dest: &Path) -> bool {
    dest.exists() || partial_path(dest).exists()
}

/// Completion evidence: the final file exists and the sibling is gone.
pub fn transfer_complete(dest: &Path) -> bool {
    dest.exists() && !partial_path(dest).exists()
}

/// Create the directory (and parents) if needed.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    Ok(())
}
