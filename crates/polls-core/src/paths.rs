use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const POLLS_DIR: &str = ".polls";
pub const CONFIG_FILE: &str = ".polls/config.yaml";
pub const DEFAULT_DATABASE_FILE: &str = "polls.db";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn polls_dir(root: &Path) -> PathBuf {
    root.join(POLLS_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Resolve a database path from config. Relative paths live under `.polls/`.
pub fn database_path(root: &Path, configured: &str) -> PathBuf {
    let p = Path::new(configured);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        polls_dir(root).join(p)
    }
}
