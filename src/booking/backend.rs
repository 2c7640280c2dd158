//! Booking backends
//!
//! The form never talks to a real service. A backend is anything that can take a
//! request and eventually say yes or no; the simulated one waits a fixed delay
//! and rolls the dice.

use super::draft::BookingDraft;
use super::error::{BookingError, BookingResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Identifies one submission; resolutions for any other ticket are ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BookingTicket(pub Uuid);

impl BookingTicket {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BookingTicket {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BookingTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated draft on its way to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub ticket: BookingTicket,
    pub draft: BookingDraft,
}

/// What a successful booking hands back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingReceipt {
    pub ticket: BookingTicket,
    pub draft: BookingDraft,
    pub booked_at: DateTime<Utc>,
}

impl BookingReceipt {
    pub fn for_request(request: &BookingRequest) -> Self {
        Self {
            ticket: request.ticket,
            draft: request.draft.clone(),
            booked_at: Utc::now(),
        }
    }
}

/// Capability to place a booking
#[async_trait]
pub trait BookingBackend: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    async fn book(&self, request: &BookingRequest) -> BookingResult<BookingReceipt>;
}

/// Fixed delay followed by a random outcome
pub struct SimulatedBackend {
    delay: Duration,
    success_rate: f64,
    rng: Mutex<StdRng>,
}

impl SimulatedBackend {
    pub fn new(delay: Duration, success_rate: f64) -> Self {
        Self {
            delay,
            success_rate: success_rate.clamp(0.0, 1.0),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible outcomes for a given seed
    pub fn with_seed(delay: Duration, success_rate: f64, seed: u64) -> Self {
        Self {
            delay,
            success_rate: success_rate.clamp(0.0, 1.0),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Draw the outcome for one call
    fn roll(&self) -> bool {
        match self.rng.lock() {
            Ok(mut rng) => rng.gen_bool(self.success_rate),
            Err(poisoned) => poisoned.into_inner().gen_bool(self.success_rate),
        }
    }
}

#[async_trait]
impl BookingBackend for SimulatedBackend {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn book(&self, request: &BookingRequest) -> BookingResult<BookingReceipt> {
        // The draw happens at call time, before the delay
        let succeeds = self.roll();
        debug!(ticket = %request.ticket, succeeds, delay_ms = self.delay.as_millis() as u64, "Simulating booking call");

        tokio::time::sleep(self.delay).await;

        if succeeds {
            Ok(BookingReceipt::for_request(request))
        } else {
            Err(BookingError::Unavailable("simulated network failure".to_string()))
        }
    }
}

/// Deterministic outcome after the same delay
pub struct FixedOutcomeBackend {
    delay: Duration,
    succeed: bool,
}

impl FixedOutcomeBackend {
    pub fn succeeding(delay: Duration) -> Self {
        Self { delay, succeed: true }
    }

    pub fn failing(delay: Duration) -> Self {
        Self { delay, succeed: false }
    }
}

#[async_trait]
impl BookingBackend for FixedOutcomeBackend {
    fn name(&self) -> &str {
        if self.succeed {
            "always-succeed"
        } else {
            "always-fail"
        }
    }

    async fn book(&self, request: &BookingRequest) -> BookingResult<BookingReceipt> {
        tokio::time::sleep(self.delay).await;
        if self.succeed {
            Ok(BookingReceipt::for_request(request))
        } else {
            Err(BookingError::Unavailable("forced failure".to_string()))
        }
    }
}
