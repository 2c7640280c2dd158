use super::ride::{RideType, RideTypeSet};
use serde::{Deserialize, Serialize};

/// The in-progress, not yet submitted booking values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub pickup: String,
    pub destination: String,
    pub ride_type: RideType,
}

impl BookingDraft {
    /// Empty draft with the default ride of the given set
    pub fn empty(rides: RideTypeSet) -> Self {
        Self {
            pickup: String::new(),
            destination: String::new(),
            ride_type: rides.default_ride(),
        }
    }

    #[cfg(test)]
    pub fn new(pickup: impl Into<String>, destination: impl Into<String>, ride_type: RideType) -> Self {
        Self {
            pickup: pickup.into(),
            destination: destination.into(),
            ride_type,
        }
    }

    /// Read-only preview, available once both locations have been typed
    pub fn summary(&self) -> Option<RideSummary> {
        if self.pickup.is_empty() || self.destination.is_empty() {
            return None;
        }
        Some(RideSummary {
            pickup: self.pickup.clone(),
            destination: self.destination.clone(),
            ride_type: self.ride_type,
        })
    }
}

/// Snapshot of the draft rendered beneath the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RideSummary {
    pub pickup: String,
    pub destination: String,
    pub ride_type: RideType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_requires_both_fields() {
        let mut draft = BookingDraft::empty(RideTypeSet::Shared);
        assert!(draft.summary().is_none());

        draft.pickup = "Ikeja".to_string();
        assert!(draft.summary().is_none());

        // No validation gating on the preview
        draft.destination = "1".to_string();
        let summary = draft.summary().unwrap();
        assert_eq!(summary.pickup, "Ikeja");
        assert_eq!(summary.destination, "1");
        assert_eq!(summary.ride_type, RideType::Single);
    }
}
