use anyhow::{anyhow, Result};
use clap::Args;
use tracing::debug;

use crate::booking::{BookingSession, BookingState, Field, FormEvent, OutcomeKind, RideType};
use crate::config::Config;

/// Submit one booking non-interactively
#[derive(Args, Debug)]
pub struct BookCommand {
    /// Pickup location
    #[arg(short = 'p', long)]
    pub pickup: String,

    /// Destination
    #[arg(short = 't', long)]
    pub destination: String,

    /// Ride type (single, group, standard or premium)
    #[arg(short = 'r', long = "ride-type")]
    pub ride_type: Option<RideType>,
}

impl BookCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        debug!("Executing book command");

        let state = BookingState::new(config.form_settings());
        let mut session = BookingSession::new(state, config.backend(), config.banner_timeout());

        session.dispatch(FormEvent::Edit(Field::Pickup, self.pickup.clone()));
        session.dispatch(FormEvent::Edit(Field::Destination, self.destination.clone()));
        if let Some(ride) = self.ride_type {
            if !config.ride_types.contains(ride) {
                let offered: Vec<&str> = config.ride_types.options().iter().map(|r| r.as_str()).collect();
                return Err(anyhow!("Ride type '{}' is not offered (choose {})", ride.as_str(), offered.join(" or ")));
            }
            session.dispatch(FormEvent::SelectRide(ride));
        }

        session.dispatch(FormEvent::Submit);
        if !session.state().is_loading() {
            for (_, error) in session.state().errors().iter() {
                eprintln!("{}", error);
            }
            return Err(anyhow!("Booking details are invalid"));
        }

        eprintln!("Booking...");
        session.settle().await;

        let state = session.state();
        let (title, message) = match (state.dialog(), state.banner()) {
            (Some(dialog), _) => (&dialog.title, &dialog.message),
            (None, Some(banner)) => (&banner.title, &banner.message),
            (None, None) => return Err(anyhow!("Booking finished without a result")),
        };
        println!("{}", title);
        println!("{}", message);

        if state.last_outcome() != Some(OutcomeKind::Success) {
            return Err(anyhow!("Booking was not completed"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForcedOutcome;

    fn command(pickup: &str, destination: &str, ride_type: Option<RideType>) -> BookCommand {
        BookCommand {
            pickup: pickup.to_string(),
            destination: destination.to_string(),
            ride_type,
        }
    }

    fn config(outcome: ForcedOutcome) -> Config {
        Config {
            submit_delay_ms: 0,
            outcome: Some(outcome),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_successful_booking() {
        let result = command("Ikeja", "Yaba", Some(RideType::Group))
            .execute(&config(ForcedOutcome::Success))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_failed_booking_is_an_error() {
        let result = command("Ikeja", "Yaba", None)
            .execute(&config(ForcedOutcome::Failure))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_invalid_details_are_rejected() {
        let result = command("Lagos", "lagos", None)
            .execute(&config(ForcedOutcome::Success))
            .await;
        assert_eq!(result.unwrap_err().to_string(), "Booking details are invalid");
    }

    #[tokio::test]
    async fn test_ride_type_must_be_offered() {
        let result = command("Ikeja", "Yaba", Some(RideType::Premium))
            .execute(&config(ForcedOutcome::Success))
            .await;
        assert!(result.unwrap_err().to_string().contains("not offered"));
    }
}
