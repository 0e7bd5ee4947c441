//! Environment readiness check.

use crate::config::{Config, TOKEN_ENV};
use crate::renderer::chromium::find_chromium;
use anyhow::Result;

/// Report Chromium availability and configuration.
pub async fn run() -> Result<()> {
    let config = Config::from_env();

    println!("Slant Doctor");
    println!("============");
    println!();
    println!("OS:   {}", std::env::consts::OS);
    println!("Arch: {}", std::env::consts::ARCH);
    println!();

    let chromium = find_chromium();
    match &chromium {
        Some(path) => println!("[OK] Chromium found: {}", path.display()),
        None => println!("[!!] Chromium NOT found. URL requests will fail; text requests still work."),
    }

    if config.has_token() {
        println!("[OK] {TOKEN_ENV} is set");
    } else {
        println!("[!!] {TOKEN_ENV} is not set");
    }

    println!("[..] Listen port: {}", config.port);
    println!("[..] Inference endpoint: {}", config.inference_url);

    println!();
    if chromium.is_some() && config.has_token() {
        println!("Status: READY");
    } else {
        println!("Status: DEGRADED");
    }

    Ok(())
}
