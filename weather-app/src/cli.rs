use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use std::io::Write;
use weather_core::{
    Config, Units, WeatherProvider, build_cards, provider_from_config, validate_city,
};

use crate::window;

/// Top-level CLI struct. Without a subcommand the weather window opens.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather with an animated cityscape")]
pub struct Cli {
    /// City to look up as soon as the window opens.
    #[arg(long)]
    pub city: Option<String>,

    /// OpenWeather API key; overrides the one in the config file.
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set the API key, units and language.
    Configure,

    /// Print current weather and the forecast for a city to the terminal.
    Show {
        /// City name, e.g. "Moscow" or "London,GB".
        city: String,
    },
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?.with_api_key_override(self.api_key);

        match self.command {
            None => window::run(config, self.city),
            Some(Command::Configure) => configure(config),
            Some(Command::Show { city }) => {
                let runtime = tokio::runtime::Builder::new_multi_thread()
                    .enable_all()
                    .build()
                    .context("Failed to start async runtime")?;
                runtime.block_on(show(&config, &city))
            }
        }
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    let current_units = Units::all()
        .iter()
        .position(|u| *u == config.units)
        .unwrap_or(0);
    config.units = Select::new("Units:", Units::all().to_vec())
        .with_starting_cursor(current_units)
        .prompt()?;

    config.lang = Text::new("Language for descriptions:")
        .with_default(&config.lang)
        .prompt()?;

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

async fn show(config: &Config, city: &str) -> anyhow::Result<()> {
    let city = validate_city(city)?;
    let provider = provider_from_config(config)?;
    let mut out = std::io::stdout().lock();
    print_weather(provider.as_ref(), config, city, &mut out).await
}

async fn print_weather(
    provider: &dyn WeatherProvider,
    config: &Config,
    city: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let snapshot = provider
        .current(city)
        .await
        .context("Failed to get current weather")?;
    let labels = snapshot.labels(config.units);

    writeln!(out, "{}: {}, {}", snapshot.city, labels.temperature, labels.description)?;
    for line in [labels.feels_like, labels.humidity, labels.pressure, labels.wind, labels.sun] {
        writeln!(out, "  {line}")?;
    }

    let entries = provider
        .forecast(city)
        .await
        .context("Failed to get forecast")?;

    writeln!(out)?;
    for card in build_cards(&entries, config.units, &config.lang) {
        writeln!(out, "  {:<8} {:>6}  {}", card.date, card.temperature, card.icon_code)?;
    }

    Ok(())
}
