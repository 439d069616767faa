use anyhow::{anyhow, Context};
use polls_core::config::{Config, WarnLevel};
use polls_server::state::AppState;
use std::path::Path;

pub fn run(
    root: &Path,
    host: Option<&str>,
    port: Option<u16>,
    open_browser: bool,
) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;

    let mut fatal = Vec::new();
    for w in config.validate() {
        match w.level {
            WarnLevel::Warning => tracing::warn!("config: {}", w.message),
            WarnLevel::Error => fatal.push(w.message),
        }
    }
    if !fatal.is_empty() {
        return Err(anyhow!("invalid config: {}", fatal.join("; ")));
    }

    let host = host.unwrap_or(config.server.host.as_str()).to_string();
    let port = port.unwrap_or(config.server.port);
    let state = AppState::open(root, &config).context("failed to open database")?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("{host}:{port}"))
            .await
            .with_context(|| format!("failed to bind {host}:{port}"))?;
        let actual_port = listener.local_addr()?.port();

        println!(
            "Serving '{}' at http://{host}:{actual_port}/polls/  (PID {})",
            config.site.title,
            std::process::id()
        );

        tokio::select! {
            res = polls_server::serve_on(state, listener, open_browser) => res,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                Ok(())
            }
        }
    })
}
