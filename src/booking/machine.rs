//! Booking form state machine
//!
//! `BookingState::apply` is the whole form: it takes the current state and one
//! event and returns the next state plus the side effects the caller has to run.
//! Nothing here sleeps, spawns or draws random numbers, so every path of the
//! validate/submit/resolve sequence can be exercised directly.

use super::backend::{BookingReceipt, BookingRequest, BookingTicket};
use super::draft::{BookingDraft, RideSummary};
use super::error::{BookingError, BookingResult};
use super::ride::{RideType, RideTypeSet};
use super::validation::{self, Field, ValidationErrors, ValidationProfile, SAME_LOCATION_MESSAGE};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const SUCCESS_TITLE: &str = "Booking Successful";
pub const FAILURE_TITLE: &str = "Booking Unsuccessful";
pub const FAILURE_MESSAGE: &str = "Something went wrong while booking your ride. Please try again.";
pub const FIXED_SUCCESS_TITLE: &str = "Booking Successful!";
pub const FIXED_SUCCESS_MESSAGE: &str = "Your ride has been booked successfully.";

/// How the outcome of a booking is surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStyle {
    /// Modal confirmation dialog, dismissed by the user
    #[default]
    Dialog,
    /// Inline banner that disappears on its own
    Banner,
    /// Inline banner that stays until the next submission
    InlineBanner,
}

/// Wording of the success confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationWording {
    /// Same text for every booking
    Fixed,
    /// Names the booked ride type
    #[default]
    RideSpecific,
}

/// Behaviour switches of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormSettings {
    pub profile: ValidationProfile,
    pub rides: RideTypeSet,
    pub feedback: FeedbackStyle,
    pub wording: ConfirmationWording,
    pub show_summary: bool,
}

/// Title and message of the confirmation dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogContent {
    pub title: String,
    pub message: String,
}

pub type BannerId = u64;

/// Whether a finished booking went through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    Failure,
}

/// Inline outcome notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub id: BannerId,
    pub kind: OutcomeKind,
    pub title: String,
    pub message: String,
}

/// Inputs to the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// A location field changed to the given text
    Edit(Field, String),
    SelectRide(RideType),
    Submit,
    /// The booking for `ticket` finished
    Resolved {
        ticket: BookingTicket,
        outcome: BookingResult<BookingReceipt>,
    },
    DismissDialog,
    BannerExpired(BannerId),
}

/// Side effects requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Place the booking and report back with `FormEvent::Resolved`
    Book(BookingRequest),
    /// Report back with `FormEvent::BannerExpired` once the banner timeout passes
    DismissBannerAfter(BannerId),
}

/// Complete form state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingState {
    settings: FormSettings,
    draft: BookingDraft,
    errors: ValidationErrors,
    pending: Option<BookingTicket>,
    dialog: Option<DialogContent>,
    banner: Option<Banner>,
    last_outcome: Option<OutcomeKind>,
    next_banner: BannerId,
}

impl BookingState {
    /// Fresh, empty form
    pub fn new(settings: FormSettings) -> Self {
        Self {
            settings,
            draft: BookingDraft::empty(settings.rides),
            errors: ValidationErrors::default(),
            pending: None,
            dialog: None,
            banner: None,
            last_outcome: None,
            next_banner: 1,
        }
    }

    pub fn settings(&self) -> &FormSettings {
        &self.settings
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// A booking is in flight
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_ticket(&self) -> Option<BookingTicket> {
        self.pending
    }

    pub fn dialog(&self) -> Option<&DialogContent> {
        self.dialog.as_ref()
    }

    pub fn is_dialog_open(&self) -> bool {
        self.dialog.is_some()
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Result of the most recent completed booking
    pub fn last_outcome(&self) -> Option<OutcomeKind> {
        self.last_outcome
    }

    /// Submit control is usable
    pub fn can_submit(&self) -> bool {
        !self.is_loading()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_loading() {
            "Booking..."
        } else {
            "Book Ride"
        }
    }

    /// Live preview of the draft, when enabled and both locations are filled in
    pub fn summary(&self) -> Option<RideSummary> {
        if !self.settings.show_summary {
            return None;
        }
        self.draft.summary()
    }

    /// State × Event → State'
    pub fn apply(mut self, event: FormEvent) -> (Self, Vec<Command>) {
        let commands = match event {
            FormEvent::Edit(field, value) => {
                self.edit(field, value);
                Vec::new()
            }
            FormEvent::SelectRide(ride) => {
                if self.settings.rides.contains(ride) {
                    self.draft.ride_type = ride;
                } else {
                    warn!(ride = ride.as_str(), "Ride type not offered by this form");
                }
                Vec::new()
            }
            FormEvent::Submit => self.submit(),
            FormEvent::Resolved { ticket, outcome } => self.resolve(ticket, outcome),
            FormEvent::DismissDialog => {
                self.dialog = None;
                Vec::new()
            }
            FormEvent::BannerExpired(id) => {
                if self.banner.as_ref().map(|b| b.id) == Some(id) {
                    self.banner = None;
                }
                Vec::new()
            }
        };
        (self, commands)
    }

    fn edit(&mut self, field: Field, value: String) {
        let profile = self.settings.profile;
        match field {
            Field::Pickup => {
                self.draft.pickup = value;
                self.errors.pickup = validation::validate_field(Field::Pickup, &self.draft.pickup, profile);

                // A duplicate-location error depends on both fields
                let stale_duplicate = self.errors.destination.as_deref() == Some(SAME_LOCATION_MESSAGE);
                let typed_and_clean = self.errors.destination.is_none() && !self.draft.destination.is_empty();
                if stale_duplicate || typed_and_clean {
                    self.errors.destination = validation::validate_destination(&self.draft, profile);
                }
            }
            Field::Destination => {
                self.draft.destination = value;
                self.errors.destination = validation::validate_destination(&self.draft, profile);
            }
        }
    }

    fn submit(&mut self) -> Vec<Command> {
        if self.is_loading() {
            debug!("Submit ignored while a booking is pending");
            return Vec::new();
        }

        self.errors.clear();
        let errors = validation::validate_draft(&self.draft, self.settings.profile);
        if !errors.is_empty() {
            debug!(?errors, "Booking blocked by validation");
            self.errors = errors;
            return Vec::new();
        }

        info!(
            pickup = %self.draft.pickup,
            destination = %self.draft.destination,
            ride_type = self.draft.ride_type.as_str(),
            "Booking details"
        );

        let ticket = BookingTicket::new();
        self.pending = Some(ticket);
        self.banner = None;
        vec![Command::Book(BookingRequest {
            ticket,
            draft: self.draft.clone(),
        })]
    }

    fn resolve(&mut self, ticket: BookingTicket, outcome: BookingResult<BookingReceipt>) -> Vec<Command> {
        if self.pending != Some(ticket) {
            debug!(%ticket, "Ignoring resolution for a booking that is no longer pending");
            return Vec::new();
        }
        self.pending = None;

        let (kind, title, message) = match outcome {
            Ok(receipt) => {
                info!(
                    %ticket,
                    ride_type = receipt.draft.ride_type.as_str(),
                    booked_at = %receipt.booked_at.to_rfc3339(),
                    "Booking confirmed"
                );
                self.draft = BookingDraft::empty(self.settings.rides);
                self.errors.clear();
                let (title, message) = self.success_text(receipt.draft.ride_type);
                (OutcomeKind::Success, title, message)
            }
            Err(BookingError::Cancelled) => {
                debug!(%ticket, "Booking cancelled");
                return Vec::new();
            }
            Err(error) => {
                warn!(%ticket, %error, "Booking failed");
                (OutcomeKind::Failure, FAILURE_TITLE.to_string(), FAILURE_MESSAGE.to_string())
            }
        };

        self.last_outcome = Some(kind);
        match self.settings.feedback {
            FeedbackStyle::Dialog => {
                self.dialog = Some(DialogContent { title, message });
                Vec::new()
            }
            FeedbackStyle::Banner | FeedbackStyle::InlineBanner => {
                let id = self.next_banner;
                self.next_banner += 1;
                self.banner = Some(Banner { id, kind, title, message });
                if self.settings.feedback == FeedbackStyle::Banner {
                    vec![Command::DismissBannerAfter(id)]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn success_text(&self, ride: RideType) -> (String, String) {
        match self.settings.wording {
            ConfirmationWording::Fixed => (FIXED_SUCCESS_TITLE.to_string(), FIXED_SUCCESS_MESSAGE.to_string()),
            ConfirmationWording::RideSpecific => (
                SUCCESS_TITLE.to_string(),
                format!("Your {} ride has been booked successfully!", ride.label()),
            ),
        }
    }
}

impl Default for BookingState {
    fn default() -> Self {
        Self::new(FormSettings {
            show_summary: true,
            ..FormSettings::default()
        })
    }
}
