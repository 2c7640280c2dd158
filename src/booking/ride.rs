//! Ride type selection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Categorical ride selection. Only the confirmation text depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideType {
    Standard,
    Premium,
    Single,
    Group,
}

impl RideType {
    /// Identifier used on the command line and in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            RideType::Standard => "standard",
            RideType::Premium => "premium",
            RideType::Single => "single",
            RideType::Group => "group",
        }
    }

    /// Human readable label shown in the form and confirmation text
    pub fn label(&self) -> &'static str {
        match self {
            RideType::Standard => "Standard",
            RideType::Premium => "Premium",
            RideType::Single => "Single Passenger",
            RideType::Group => "Group Passenger",
        }
    }
}

impl fmt::Display for RideType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RideType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(RideType::Standard),
            "premium" => Ok(RideType::Premium),
            "single" => Ok(RideType::Single),
            "group" => Ok(RideType::Group),
            other => Err(format!("unknown ride type '{}'", other)),
        }
    }
}

/// The fixed set of ride types offered by the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideTypeSet {
    /// Standard / Premium
    Classic,
    /// Single / Group passenger
    #[default]
    Shared,
}

impl RideTypeSet {
    pub fn options(&self) -> &'static [RideType] {
        match self {
            RideTypeSet::Classic => &[RideType::Standard, RideType::Premium],
            RideTypeSet::Shared => &[RideType::Single, RideType::Group],
        }
    }

    pub fn default_ride(&self) -> RideType {
        self.options()[0]
    }

    pub fn contains(&self, ride: RideType) -> bool {
        self.options().contains(&ride)
    }

    /// Next option, wrapping around
    pub fn next(&self, current: RideType) -> RideType {
        let options = self.options();
        let index = options.iter().position(|r| *r == current).unwrap_or(0);
        options[(index + 1) % options.len()]
    }

    /// Previous option, wrapping around
    pub fn previous(&self, current: RideType) -> RideType {
        let options = self.options();
        let index = options.iter().position(|r| *r == current).unwrap_or(0);
        options[(index + options.len() - 1) % options.len()]
    }
}
