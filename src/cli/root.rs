use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use super::book::BookCommand;
use crate::config::{parse_millis, Config, ConfigOverrides, ForcedOutcome};
use crate::tui;

/// Ozzirap Rideshare - book a ride from your terminal
#[derive(Parser, Debug)]
#[command(
    name = "ozzirap",
    version,
    about = "Ozzirap Rideshare - book a ride from your terminal",
    long_about = r#"Ozzirap is a ride booking form for the terminal. Bookings are simulated:
each request waits a short delay and then succeeds or fails at random.

Examples:
  ozzirap                                            # Open the booking form
  ozzirap book --pickup Ikeja --destination Yaba     # Book without the form
  ozzirap --outcome failure                          # Try the failure path
  ozzirap --iteration 1                              # The very first version of the form"#
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    /// Simulated network delay, e.g. `2s` or `500ms`
    #[arg(long = "delay", global = true, value_parser = parse_millis)]
    pub delay_ms: Option<u64>,

    /// Probability that a booking succeeds (0.0 - 1.0)
    #[arg(long = "success-rate", global = true)]
    pub success_rate: Option<f64>,

    /// Seed the random outcome for reproducible runs
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Always succeed or always fail
    #[arg(long, global = true, value_enum)]
    pub outcome: Option<ForcedOutcome>,

    /// Form iteration to emulate (1-4)
    #[arg(long, global = true, value_parser = clap::value_parser!(u8).range(1..=4))]
    pub iteration: Option<u8>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit one booking non-interactively
    Book(BookCommand),
}

impl Cli {
    /// Command line flags as the last configuration layer
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            iteration: self.iteration,
            submit_delay_ms: self.delay_ms,
            success_rate: self.success_rate,
            seed: self.seed,
            outcome: self.outcome,
            ..ConfigOverrides::default()
        }
    }

    /// Interactive mode draws on the terminal, so logs must go elsewhere
    pub fn is_interactive(&self) -> bool {
        self.command.is_none()
    }

    pub async fn execute(self, config: Config) -> Result<()> {
        if self.debug {
            debug!("Debug logging enabled");
        }

        match &config.source {
            Some(path) => debug!("Loaded configuration from: {}", path.display()),
            None => debug!("No configuration file found"),
        }
        config.validate().context("Invalid configuration")?;
        debug!(?config, "Configuration initialized");

        match self.command {
            Some(Commands::Book(book_cmd)) => book_cmd.execute(&config).await,
            None => {
                info!("Starting interactive mode");
                tui::run(&config).await?;
                info!("Application finished");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "ozzirap",
            "--delay",
            "500ms",
            "--success-rate",
            "0.5",
            "--outcome",
            "failure",
            "--iteration",
            "2",
        ])
        .unwrap();
        assert!(cli.is_interactive());

        let overrides = cli.overrides();
        assert_eq!(overrides.submit_delay_ms, Some(500));
        assert_eq!(overrides.success_rate, Some(0.5));
        assert_eq!(overrides.outcome, Some(ForcedOutcome::Failure));
        assert_eq!(overrides.iteration, Some(2));
    }

    #[test]
    fn test_book_subcommand() {
        let cli = Cli::try_parse_from([
            "ozzirap",
            "book",
            "--pickup",
            "Ikeja",
            "--destination",
            "Yaba",
            "--ride-type",
            "group",
            "--seed",
            "3",
        ])
        .unwrap();
        assert!(!cli.is_interactive());
        assert_eq!(cli.seed, Some(3));
        let Some(Commands::Book(book)) = cli.command else {
            panic!("expected book subcommand");
        };
        assert_eq!(book.pickup, "Ikeja");
        assert_eq!(book.ride_type, Some(crate::booking::RideType::Group));
    }

    #[test]
    fn test_iteration_flag_keeps_env_delay() {
        let cli = Cli::try_parse_from(["ozzirap", "--iteration", "4"]).unwrap();
        let env_layer =
            Config::overrides_from_env(|key| (key == "OZZIRAP_SUBMIT_DELAY").then(|| "500".to_string())).unwrap();

        let config = Config::from_layers(vec![env_layer, cli.overrides()]).unwrap();
        assert_eq!(config.submit_delay_ms, 500);
        assert!(config.show_summary);
    }

    #[test]
    fn test_iteration_out_of_range_is_rejected() {
        assert!(Cli::try_parse_from(["ozzirap", "--iteration", "9"]).is_err());
    }
}
