//! Booking domain: draft, validation, the form state machine and the simulated
//! booking service it talks to.

pub mod backend;
pub mod draft;
pub mod error;
pub mod machine;
pub mod ride;
pub mod session;
pub mod validation;

pub use backend::{BookingBackend, FixedOutcomeBackend, SimulatedBackend};
pub use draft::RideSummary;
pub use machine::{Banner, BookingState, ConfirmationWording, DialogContent, FeedbackStyle, FormEvent, FormSettings, OutcomeKind};
pub use ride::{RideType, RideTypeSet};
pub use session::BookingSession;
pub use validation::{Field, ValidationProfile};
