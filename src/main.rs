// src/main.rs
use anyhow::Context;
use std::path::PathBuf;
use tracing::info;

use termleek::app::AppController;
use termleek::compositor::WindowCompositor;
use termleek::config::ShellConfig;
use termleek::constants::DEFAULT_CONFIG_PATH;
use termleek::events;
use termleek::headless::HeadlessSurface;
use termleek::image::BilinearScaler;
use termleek::terminal::PtyTerminalHost;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    if let Err(e) = run(config_path) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

fn run(config_path: PathBuf) -> anyhow::Result<()> {
    let config = ShellConfig::load(&config_path)
        .with_context(|| format!("cannot start from {}", config_path.display()))?;

    let (events, receiver) = events::channel();
    let compositor = WindowCompositor::new(
        &config,
        HeadlessSurface::new(),
        BilinearScaler::new(),
        PtyTerminalHost::new(events),
    )?;

    let reason = AppController::new(compositor, receiver).run()?;
    info!("exiting after {:?}", reason);
    Ok(())
}
