use anyhow::Context;
use polls_core::{config::Config, io, paths, store::QuestionDb};
use std::path::Path;

pub fn run(root: &Path, title: Option<&str>) -> anyhow::Result<()> {
    let title = title.map(str::to_string).unwrap_or_else(|| {
        root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "polls".to_string())
    });

    println!("Initializing polls in: {}", root.display());

    let dir = paths::polls_dir(root);
    io::ensure_dir(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let config_path = paths::config_path(root);
    let config = if !config_path.exists() {
        let cfg = Config::new(&title);
        cfg.save(root).context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
        cfg
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
        Config::load(root).context("failed to load config")?
    };

    for w in config.validate() {
        tracing::warn!("config: {}", w.message);
    }

    let db_path = config.database_path(root);
    let existed = db_path.exists();
    QuestionDb::open(&db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    if existed {
        println!("  exists:  {}", db_path.display());
    } else {
        println!("  created: {}", db_path.display());
    }

    println!("\nDone. Add a question with `polls question create \"What's up?\"`.");
    Ok(())
}
