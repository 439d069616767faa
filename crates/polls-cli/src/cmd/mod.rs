pub mod choice;
pub mod init;
pub mod question;
pub mod serve;

use anyhow::Context;
use polls_core::{config::Config, store::QuestionDb};
use std::path::Path;

/// Load the site config and open its database for administrative writes.
pub(crate) fn open_db(root: &Path) -> anyhow::Result<QuestionDb> {
    let config = Config::load(root).context("failed to load config")?;
    let path = config.database_path(root);
    QuestionDb::open(&path).with_context(|| format!("failed to open {}", path.display()))
}
