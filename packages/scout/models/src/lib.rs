#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Search parameter and scouted area types.
//!
//! These types are shared by the AI query builder, the search session and
//! the view layer. Field names serialize in camelCase so that the JSON
//! produced by the model and the JSON served to the frontend use the same
//! contract.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Meters in one statute mile.
pub const METERS_PER_MILE: f64 = 1609.34;

/// Meters in one kilometer.
pub const METERS_PER_KILOMETER: f64 = 1000.0;

/// Unit of the requested search radius.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DistanceUnit {
    /// Kilometers.
    #[default]
    Km,
    /// Statute miles.
    Miles,
}

impl DistanceUnit {
    /// Converts a distance in this unit to meters.
    #[must_use]
    pub fn to_meters(self, value: f64) -> f64 {
        match self {
            Self::Km => value * METERS_PER_KILOMETER,
            Self::Miles => value * METERS_PER_MILE,
        }
    }

    /// Human-readable label used in form selectors.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Km => "Kilometers",
            Self::Miles => "Miles",
        }
    }
}

/// A single location search as submitted by the scout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Base location, free text (e.g. "Paris, France").
    pub location: String,
    /// Search radius in `unit`.
    pub radius: f64,
    /// Unit of `radius`.
    pub unit: DistanceUnit,
    /// Free-text list of desired scene features. May be empty.
    #[serde(default)]
    pub desired_features: String,
    /// Approximate number of crew members.
    pub crew_size: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            location: "Paris, France".to_string(),
            radius: 5.0,
            unit: DistanceUnit::Km,
            desired_features: "historic architecture with cobblestone streets".to_string(),
            crew_size: 50,
        }
    }
}

impl SearchParams {
    /// Whether the scout asked for any specific features.
    #[must_use]
    pub fn has_desired_features(&self) -> bool {
        !self.desired_features.trim().is_empty()
    }

    /// The requested search radius in meters.
    #[must_use]
    pub fn radius_in_meters(&self) -> f64 {
        self.unit.to_meters(self.radius)
    }

    /// Checks that the parameters describe a searchable query.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSearchParams`] if the location is blank, the radius
    /// is not a positive finite number, or the crew size is zero.
    pub fn validate(&self) -> Result<(), InvalidSearchParams> {
        if self.location.trim().is_empty() {
            return Err(InvalidSearchParams::EmptyLocation);
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(InvalidSearchParams::Radius {
                radius: self.radius,
            });
        }
        if self.crew_size == 0 {
            return Err(InvalidSearchParams::CrewSize);
        }
        Ok(())
    }
}

/// Reasons a [`SearchParams`] cannot be submitted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidSearchParams {
    /// The location text is empty or whitespace.
    #[error("location must not be empty")]
    EmptyLocation,

    /// The radius is zero, negative or not a number.
    #[error("radius must be a positive number, got {radius}")]
    Radius {
        /// The rejected radius.
        radius: f64,
    },

    /// The crew size is zero.
    #[error("crew size must be at least 1")]
    CrewSize,
}

/// Presence judgment for one requested feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureAnalysis {
    /// Feature name as interpreted by the model.
    pub feature: String,
    /// Whether the feature is present in the area.
    pub present: bool,
}

/// An available/total count pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    /// Units estimated to be available.
    pub available: f64,
    /// Total units in the area.
    pub total: f64,
}

impl Availability {
    /// Creates a new availability pair.
    #[must_use]
    pub const fn new(available: f64, total: f64) -> Self {
        Self { available, total }
    }

    /// Fraction of `total` that is available. Zero when `total` is zero.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.total > 0.0 {
            self.available / self.total
        } else {
            0.0
        }
    }
}

/// A suggested hotel with its price band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelInfo {
    /// Hotel name.
    pub name: String,
    /// Price band, e.g. "$150-$250/night".
    pub price_range: String,
}

/// Logistics estimates for an area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaScores {
    /// Hotel rooms available out of total rooms.
    pub accommodation: Availability,
    /// Suitable catering services available out of total.
    pub catering: Availability,
    /// Large lots or garages available out of total suitable lots.
    pub parking: Availability,
    /// Text estimate of how many people can be accommodated.
    #[serde(default)]
    pub accommodation_capacity: String,
    /// Example hotels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_hotels: Option<Vec<HotelInfo>>,
    /// Example caterers or large restaurants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_catering: Option<Vec<String>>,
    /// Example parking garages or lots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_parking: Option<Vec<String>>,
}

/// An area exactly as returned by the model, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaDraft {
    /// Area or neighborhood name.
    pub name: String,
    /// Suitability summary.
    pub summary: String,
    /// Per-feature presence. Empty when no features were requested.
    pub feature_analysis: Vec<FeatureAnalysis>,
    /// Central latitude.
    pub lat: f64,
    /// Central longitude.
    pub lng: f64,
    /// Radius of the area itself, in meters.
    pub area_radius: f64,
    /// Logistics estimates.
    pub scores: AreaScores,
}

impl AreaDraft {
    /// Checks the values the schema cannot express and repairs the ones
    /// that are merely inconsistent.
    ///
    /// `available` counts larger than their `total` are clamped down to
    /// the total.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArea`] if the coordinates are outside WGS84 bounds,
    /// the area radius is negative, or any count is negative or not finite.
    pub fn normalized(mut self) -> Result<Self, InvalidArea> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(InvalidArea::Latitude {
                name: self.name,
                lat: self.lat,
            });
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(InvalidArea::Longitude {
                name: self.name,
                lng: self.lng,
            });
        }
        if !self.area_radius.is_finite() || self.area_radius < 0.0 {
            return Err(InvalidArea::Radius {
                name: self.name,
                radius: self.area_radius,
            });
        }

        for (kind, availability) in [
            ("accommodation", &mut self.scores.accommodation),
            ("catering", &mut self.scores.catering),
            ("parking", &mut self.scores.parking),
        ] {
            let Availability { available, total } = *availability;
            if !available.is_finite() || !total.is_finite() || available < 0.0 || total < 0.0 {
                return Err(InvalidArea::Availability {
                    name: self.name,
                    kind,
                    available,
                    total,
                });
            }
            if available > total {
                log::warn!(
                    "{}: {kind} availability {available} exceeds total {total}; clamping",
                    self.name
                );
                availability.available = total;
            }
        }

        Ok(self)
    }

    /// Attaches an identifier, producing an [`Area`].
    #[must_use]
    pub fn into_area(self, id: String) -> Area {
        Area {
            id,
            name: self.name,
            summary: self.summary,
            feature_analysis: self.feature_analysis,
            lat: self.lat,
            lng: self.lng,
            area_radius: self.area_radius,
            scores: self.scores,
        }
    }
}

/// A values-level violation in a model-produced area.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidArea {
    /// Latitude outside `[-90, 90]`.
    #[error("{name}: latitude {lat} out of range")]
    Latitude {
        /// Area name.
        name: String,
        /// Offending latitude.
        lat: f64,
    },

    /// Longitude outside `[-180, 180]`.
    #[error("{name}: longitude {lng} out of range")]
    Longitude {
        /// Area name.
        name: String,
        /// Offending longitude.
        lng: f64,
    },

    /// Negative or non-finite area radius.
    #[error("{name}: invalid area radius {radius}")]
    Radius {
        /// Area name.
        name: String,
        /// Offending radius.
        radius: f64,
    },

    /// Negative or non-finite availability counts.
    #[error("{name}: invalid {kind} availability {available}/{total}")]
    Availability {
        /// Area name.
        name: String,
        /// Which score ("accommodation", "catering", "parking").
        kind: &'static str,
        /// Reported available count.
        available: f64,
        /// Reported total count.
        total: f64,
    },
}

/// One AI-proposed shoot location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    /// Client-generated identifier.
    pub id: String,
    /// Area or neighborhood name.
    pub name: String,
    /// Suitability summary.
    pub summary: String,
    /// Per-feature presence. Empty when no features were requested.
    pub feature_analysis: Vec<FeatureAnalysis>,
    /// Central latitude.
    pub lat: f64,
    /// Central longitude.
    pub lng: f64,
    /// Radius of the area itself, in meters.
    pub area_radius: f64,
    /// Logistics estimates.
    pub scores: AreaScores,
}

impl Area {
    /// The area's center as `(lat, lng)`.
    #[must_use]
    pub const fn position(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

/// Map camera state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapViewState {
    /// Center as `(lat, lng)`.
    pub center: (f64, f64),
    /// Zoom level.
    pub zoom: u8,
}

impl Default for MapViewState {
    fn default() -> Self {
        Self {
            center: (48.8566, 2.3522),
            zoom: 12,
        }
    }
}

/// Overall search extent derived from a completed search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCircle {
    /// Centroid of all returned areas as `(lat, lng)`.
    pub center: (f64, f64),
    /// Requested search radius in meters.
    pub radius_m: f64,
}
