//! Map geometry derived from search results.

use geo::{Centroid, MultiPoint, Point};
use scenebay_scout_models::{Area, MapViewState, SearchCircle, SearchParams};

/// Zoom level after a search completes.
pub const SEARCH_ZOOM: u8 = 13;

/// Zoom level when an area is selected.
pub const DETAIL_ZOOM: u8 = 14;

/// Arithmetic mean of all area centers as `(lat, lng)`.
///
/// Every area has equal weight regardless of its own radius. Returns
/// `None` for an empty slice.
#[must_use]
pub fn centroid(areas: &[Area]) -> Option<(f64, f64)> {
    let points: MultiPoint<f64> = areas.iter().map(|a| Point::new(a.lng, a.lat)).collect();
    points.centroid().map(|p| (p.y(), p.x()))
}

/// The overall search extent: the centroid of `areas` with the requested
/// search radius converted to meters.
#[must_use]
pub fn search_circle(areas: &[Area], params: &SearchParams) -> Option<SearchCircle> {
    centroid(areas).map(|center| SearchCircle {
        center,
        radius_m: params.radius_in_meters(),
    })
}

/// Camera framing a completed search.
#[must_use]
pub const fn search_view(circle: &SearchCircle) -> MapViewState {
    MapViewState {
        center: circle.center,
        zoom: SEARCH_ZOOM,
    }
}

/// Camera focused on a single area.
#[must_use]
pub const fn detail_view(area: &Area) -> MapViewState {
    MapViewState {
        center: area.position(),
        zoom: DETAIL_ZOOM,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use scenebay_scout_models::{AreaScores, Availability, DistanceUnit};

    use super::*;

    pub fn area(id: &str, lat: f64, lng: f64, radius: f64) -> Area {
        Area {
            id: id.to_string(),
            name: format!("Area {id}"),
            summary: String::new(),
            feature_analysis: Vec::new(),
            lat,
            lng,
            area_radius: radius,
            scores: AreaScores {
                accommodation: Availability::new(10.0, 20.0),
                catering: Availability::new(1.0, 2.0),
                parking: Availability::new(0.0, 3.0),
                accommodation_capacity: String::new(),
                example_hotels: None,
                example_catering: None,
                example_parking: None,
            },
        }
    }

    fn params(radius: f64, unit: DistanceUnit) -> SearchParams {
        SearchParams {
            radius,
            unit,
            ..SearchParams::default()
        }
    }

    fn assert_close(actual: (f64, f64), expected: (f64, f64)) {
        assert!(
            (actual.0 - expected.0).abs() < 1e-9 && (actual.1 - expected.1).abs() < 1e-9,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn centroid_is_unweighted_mean() {
        let areas = [
            area("a", 48.0, 2.0, 100.0),
            area("b", 49.0, 3.0, 5000.0),
            area("c", 50.0, 7.0, 1.0),
        ];
        assert_close(centroid(&areas).unwrap(), (49.0, 4.0));
    }

    #[test]
    fn centroid_of_nothing_is_none() {
        assert!(centroid(&[]).is_none());
        assert!(search_circle(&[], &params(5.0, DistanceUnit::Km)).is_none());
    }

    #[test]
    fn circle_radius_follows_requested_unit() {
        let areas = [area("a", 40.0, -74.0, 300.0)];
        let km = search_circle(&areas, &params(5.0, DistanceUnit::Km)).unwrap();
        assert!((km.radius_m - 5000.0).abs() < 1e-9);

        let miles = search_circle(&areas, &params(2.0, DistanceUnit::Miles)).unwrap();
        assert!((miles.radius_m - 3218.68).abs() < 1e-9);
    }

    #[test]
    fn views_use_fixed_zoom_levels() {
        let circle = SearchCircle {
            center: (1.0, 2.0),
            radius_m: 10.0,
        };
        assert_eq!(search_view(&circle).zoom, SEARCH_ZOOM);

        let view = detail_view(&area("a", 3.0, 4.0, 1.0));
        assert_eq!(view.center, (3.0, 4.0));
        assert_eq!(view.zoom, DETAIL_ZOOM);
    }
}
