//! Details panel for the selected area.

use scenebay_scout_models::{Area, Availability, HotelInfo};
use serde::Serialize;
use strum_macros::{AsRefStr, Display};

use crate::encode_component;

/// Hotel search endpoint used for "Check Availability" links.
pub const BOOKING_SEARCH_URL: &str = "https://www.booking.com/searchresults.html";

/// Status color of an availability gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AvailabilityTier {
    /// At least 60% available.
    Green,
    /// At least 30% available.
    Yellow,
    /// Less than 30% available.
    Red,
}

impl AvailabilityTier {
    #[must_use]
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= 0.6 {
            Self::Green
        } else if ratio >= 0.3 {
            Self::Yellow
        } else {
            Self::Red
        }
    }

    /// Tier of an available/total pair. A zero total is red.
    #[must_use]
    pub fn of(availability: &Availability) -> Self {
        Self::from_ratio(availability.ratio())
    }
}

/// One availability gauge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gauge {
    pub label: &'static str,
    pub unit_label: &'static str,
    pub available: f64,
    pub total: f64,
    pub tier: AvailabilityTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Gauge {
    fn new(
        label: &'static str,
        unit_label: &'static str,
        availability: &Availability,
        description: Option<String>,
    ) -> Self {
        Self {
            label,
            unit_label,
            available: availability.available,
            total: availability.total,
            tier: AvailabilityTier::of(availability),
            description,
        }
    }
}

/// A suggested hotel with its booking search link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelLink {
    pub name: String,
    pub price_range: String,
    pub booking_url: String,
}

impl HotelLink {
    fn new(hotel: &HotelInfo, area_name: &str) -> Self {
        Self {
            name: hotel.name.clone(),
            price_range: hotel.price_range.clone(),
            booking_url: booking_url(&hotel.name, area_name),
        }
    }
}

/// Catering section; examples are only listed while it is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CateringSection {
    pub shown: bool,
    pub examples: Vec<String>,
}

/// Everything the details panel shows for one area.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsView {
    pub id: String,
    pub name: String,
    pub summary: String,
    pub accommodation: Gauge,
    pub hotels: Vec<HotelLink>,
    pub parking: Gauge,
    pub parking_examples: Vec<String>,
    pub catering: CateringSection,
}

/// Booking search link for a hotel, qualified by the area name.
#[must_use]
pub fn booking_url(hotel_name: &str, area_name: &str) -> String {
    format!(
        "{BOOKING_SEARCH_URL}?ss={}",
        encode_component(&format!("{hotel_name} {area_name}"))
    )
}

/// Builds the details panel for `area`.
#[must_use]
pub fn details_view(area: &Area, catering_shown: bool) -> DetailsView {
    let scores = &area.scores;
    let capacity = Some(scores.accommodation_capacity.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    DetailsView {
        id: area.id.clone(),
        name: area.name.clone(),
        summary: area.summary.clone(),
        accommodation: Gauge::new(
            "Accommodation",
            "Rooms Available",
            &scores.accommodation,
            capacity,
        ),
        hotels: scores
            .example_hotels
            .iter()
            .flatten()
            .map(|hotel| HotelLink::new(hotel, &area.name))
            .collect(),
        parking: Gauge::new("Parking", "Lots / Garages", &scores.parking, None),
        parking_examples: scores.example_parking.clone().unwrap_or_default(),
        catering: CateringSection {
            shown: catering_shown,
            examples: if catering_shown {
                scores.example_catering.clone().unwrap_or_default()
            } else {
                Vec::new()
            },
        },
    }
}
