#![deny(rust_2018_compatibility)]
// #![windows_subsystem = "windows"]

extern crate nalgebra_glm as glm;

mod camera;
mod config;
mod error;
mod geometry;
mod gl_wrappers;
mod image;
mod input;
mod level;
mod lighting;
mod logging;
mod player;
mod runtime;
mod tiles;
mod window;

use config::{DemoConfig, DEFAULT_CONFIG_PATH};
use logging::LoggingConfig;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    // The config may not parse, so install a default logger first when that
    // happens and report through it.
    let (config, found) = match DemoConfig::load(&config_path) {
        Ok(Some(config)) => (config, true),
        Ok(None) => (DemoConfig::default(), false),
        Err(err) => {
            logging::init_logging(LoggingConfig::default());
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };
    logging::init_logging(LoggingConfig {
        env_filter: config.logging.filter.clone(),
        ..Default::default()
    });
    if !found {
        log::warn!("{} not found, using default config", config_path);
    }

    match runtime::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
