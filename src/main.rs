use log::{error, info, warn, LevelFilter};
use simple_logger::SimpleLogger;

use roguelike_gl::config::{load_or_create_config, AppConfig};

fn main() {
    // Config is read before the logger exists, so its failure is reported afterwards
    let (config, config_error) = match load_or_create_config() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    let level = config.level_filter().unwrap_or(LevelFilter::Info);
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("Failed to initialize logger: {}", e);
    }

    if let Some(e) = config_error {
        warn!("Using default config: {:#}", e);
    }
    if config.level_filter().is_none() {
        warn!("Unknown log level '{}', using info", config.log_level);
    }

    info!("Initializing application...");

    if let Err(e) = roguelike_gl::app::run(config) {
        error!("{:#}", e);
        std::process::exit(-1);
    }
}
