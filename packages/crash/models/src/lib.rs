#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Crash record domain types and severity classification.
//!
//! This crate defines the canonical crash record shape shared across the
//! crash-map system, the three-level severity taxonomy derived from injury
//! counts, and the named time-of-day windows used for filtering.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Severity level of a crash, derived from its injury counts.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// No reported injuries.
    Minor,
    /// Non-incapacitating injuries only.
    Moderate,
    /// At least one fatality or incapacitating injury.
    Severe,
}

impl Severity {
    /// Classifies injury counts into a severity level.
    ///
    /// Rules are evaluated in priority order, first match wins:
    /// 1. any fatal or incapacitating injury → [`Self::Severe`]
    /// 2. any non-incapacitating injury → [`Self::Moderate`]
    /// 3. otherwise → [`Self::Minor`]
    #[must_use]
    pub const fn from_injuries(fatal: u32, incapacitating: u32, non_incapacitating: u32) -> Self {
        if fatal > 0 || incapacitating > 0 {
            Self::Severe
        } else if non_incapacitating > 0 {
            Self::Moderate
        } else {
            Self::Minor
        }
    }

    /// Human-readable label (e.g. for the map legend).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Minor => "Minor",
            Self::Moderate => "Moderate",
            Self::Severe => "Severe",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Minor, Self::Moderate, Self::Severe]
    }
}

/// A named time-of-day window used to filter crashes by `crash_hour`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeWindow {
    /// No filtering; every record passes.
    All,
    /// Hours 6 through 11.
    Morning,
    /// Hours 12 through 17.
    Afternoon,
    /// Hour 18 onward, plus hours 0 through 5.
    Night,
}

impl TimeWindow {
    /// Returns whether the given hour of day (0-23) falls in this window.
    #[must_use]
    pub const fn contains_hour(self, hour: u8) -> bool {
        match self {
            Self::All => true,
            Self::Morning => hour >= 6 && hour <= 11,
            Self::Afternoon => hour >= 12 && hour <= 17,
            Self::Night => hour >= 18 || hour <= 5,
        }
    }

    /// Human-readable label for the window selector.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Morning => "Morning (6-11 AM)",
            Self::Afternoon => "Afternoon (12-5 PM)",
            Self::Night => "Night (6 PM-5 AM)",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::All, Self::Morning, Self::Afternoon, Self::Night]
    }
}

/// One traffic-crash record with usable coordinates.
///
/// Records are constructed once at load time and never mutated. Severity is
/// not stored; it is derived on demand via [`CrashRecord::severity`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrashRecord {
    /// Latitude (WGS84). Always present; rows without it are dropped at load.
    pub latitude: f64,
    /// Longitude (WGS84). Always present; rows without it are dropped at load.
    pub longitude: f64,
    /// Hour of day the crash was recorded (0-23).
    pub crash_hour: u8,
    /// Number of fatal injuries.
    pub injuries_fatal: u32,
    /// Number of incapacitating injuries.
    pub injuries_incapacitating: u32,
    /// Number of non-incapacitating injuries.
    pub injuries_non_incapacitating: u32,
}

impl CrashRecord {
    /// Derives the severity level for this record from its injury counts.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        Severity::from_injuries(
            self.injuries_fatal,
            self.injuries_incapacitating,
            self.injuries_non_incapacitating,
        )
    }
}
