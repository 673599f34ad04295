//! `upq config` – show where the config lives and what is in effect.

use anyhow::Result;
use upq_core::config::{self, UpqConfig, API_BASE_ENV};
use upq_core::logging;

pub fn run_config(cfg: &UpqConfig) -> Result<()> {
    let endpoints = cfg.endpoints()?;
    println!("config file: {}", config::config_path()?.display());
    println!("log file:    {}", logging::log_file_path()?.display());
    println!("upload url:  {}", endpoints.upload_url());
    println!("push url:    {}", endpoints.ws_url());
    if std::env::var_os(API_BASE_ENV).is_some() {
        println!("(api_base overridden by {API_BASE_ENV})");
    }
    println!();
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
