//! Entry point for lumen3d.

use anyhow::Result;

mod config;

use config::Config;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = Config::from_env();
    log::info!(
        "Starting lumen3d. Stage: {}, backend: {:?}, show_fps={}, window_size={}x{}, models={}",
        cfg.stage,
        cfg.backends,
        cfg.show_fps,
        cfg.width,
        cfg.height,
        cfg.models.len()
    );

    platform::run(cfg.into_viewer_options())?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}
