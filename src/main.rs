//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `hoprequest` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All request handling is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::process;

use hoprequest::app::{build_request_options, render_error, render_response};
use hoprequest::config::Opt;
use hoprequest::initialization::{init_crypto_provider, init_logger_with};
use hoprequest::request;

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();

    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    // Initialize crypto provider for TLS operations
    init_crypto_provider();

    let options = build_request_options(&opt).context("Invalid request options")?;

    match request(options).await {
        Ok(response) => {
            let rendered = render_response(&response, opt.include);
            if rendered.ends_with('\n') {
                print!("{rendered}");
            } else {
                println!("{rendered}");
            }
            Ok(())
        }
        Err(e) => {
            eprint!("{}", render_error(&e).red());
            process::exit(1);
        }
    }
}
