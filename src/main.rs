use std::path::PathBuf;

use chadd_scene::{AppConfig, ChaddApp};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = AppConfig::resolve(config_path.as_deref())?;

    let app = ChaddApp::new(config)?;
    if let Err(error) = app.run() {
        log::error!("Fatal: {}", error);
        return Err(error.into());
    }
    Ok(())
}
