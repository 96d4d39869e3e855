//! log4rs setup.
//!
//! A `log4rs.yml` in the working directory (or at `IPBLOCKS_LOG_CONFIG`) wins.
//! Without one, records go to stderr so stdout stays clean for the ranges.
//! `-v` raises the root level to debug in both cases.

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;
use std::path::{Path, PathBuf};

/// Default location of the log4rs config file.
pub const DEFAULT_LOG_CONFIG: &str = "log4rs.yml";

const STDERR_PATTERN: &str = "{d(%H:%M:%S%.3f)} {h({l:5})} {t} - {m}{n}";

/// Path of the log4rs config file to load.
pub fn log_config_path() -> PathBuf {
    std::env::var_os("IPBLOCKS_LOG_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_CONFIG))
}

/// Initialize logging, from file when one exists, else to stderr.
pub fn init(verbose: bool) -> Result<(), Box<dyn Error>> {
    let path = log_config_path();
    if path.exists() {
        log4rs::init_config(file_config(&path, verbose)?)?;
        log::debug!("log4rs config loaded from {}", path.display());
    } else {
        log4rs::init_config(stderr_config(level(verbose))?)?;
    }
    Ok(())
}

/// Load a log4rs config file, raising the root level to debug when verbose.
fn file_config(path: &Path, verbose: bool) -> Result<Config, Box<dyn Error>> {
    let mut config = log4rs::config::load_config_file(path, Default::default())
        .map_err(|e| format!("Error initializing log4rs from {}: {e}", path.display()))?;
    if verbose && config.root().level() < LevelFilter::Debug {
        config.root_mut().set_level(LevelFilter::Debug);
    }
    Ok(config)
}

fn level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

fn stderr_config(level: LevelFilter) -> Result<Config, Box<dyn Error>> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(STDERR_PATTERN)))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))?;
    Ok(config)
}
