//! Binary crate for the `weather` desktop app.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - The Slint window: text, icon, forecast cards and the animated cityscape

use clap::Parser;

mod cli;
mod ui;
mod window;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::default()
        .filter_level(if cfg!(debug_assertions) {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .parse_default_env()
        .init();

    let cmd = cli::Cli::parse();
    cmd.run()
}
