//! Map layer description.
//!
//! [`map_layers`] describes what the map shows: the basemap for the current
//! theme, the camera, the overall search circle and, per area, a marker and
//! an accommodation perimeter. The frontend draws it with Leaflet; nothing
//! here knows about the rendering library.

use scenebay_scout_models::{Area, MapViewState, SearchCircle};
use scenebay_session::SearchSession;
use scenebay_theme::Theme;
use serde::Serialize;

const OSM_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

const CARTO_ATTRIBUTION: &str = "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>";

const LIGHT_TILES: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const DARK_TILES: &str = "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png";

/// CSS class applied to the popup pane in dark mode.
pub const DARK_POPUP_CLASS: &str = "dark-theme-popup";

/// Pin icon size in pixels.
pub const MARKER_SIZE: (u32, u32) = (36, 36);
/// Pin tip, relative to the icon's top-left corner.
pub const MARKER_ANCHOR: (i32, i32) = (18, 36);
/// Popup offset relative to the pin tip.
pub const MARKER_POPUP_ANCHOR: (i32, i32) = (0, -36);

/// Tile source and its attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Basemap {
    pub url: &'static str,
    pub attribution: &'static str,
}

impl Basemap {
    #[must_use]
    pub const fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                url: LIGHT_TILES,
                attribution: OSM_ATTRIBUTION,
            },
            Theme::Dark => Self {
                url: DARK_TILES,
                attribution: CARTO_ATTRIBUTION,
            },
        }
    }
}

/// Stroke and fill of a circle overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStyle {
    pub color: &'static str,
    pub fill_color: &'static str,
    pub fill_opacity: f64,
    pub weight: u32,
    pub dash_array: &'static str,
}

impl PathStyle {
    /// Dashed green outline of the overall search extent.
    #[must_use]
    pub const fn search_circle(theme: Theme) -> Self {
        let color = match theme {
            Theme::Light => "#16a34a",
            Theme::Dark => "#22c55e",
        };
        Self {
            color,
            fill_color: color,
            fill_opacity: 0.05,
            weight: 2,
            dash_array: "10, 5",
        }
    }

    /// Dashed orange accommodation perimeter of a single area.
    #[must_use]
    pub const fn perimeter(theme: Theme) -> Self {
        let color = match theme {
            Theme::Light => "#f97316",
            Theme::Dark => "#fb923c",
        };
        Self {
            color,
            fill_color: color,
            fill_opacity: 0.1,
            weight: 2,
            dash_array: "5, 10",
        }
    }
}

/// A circle on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleLayer {
    pub center: (f64, f64),
    pub radius_m: f64,
    pub style: PathStyle,
}

/// Pin marker for one area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub color: &'static str,
    pub selected: bool,
    pub size: (u32, u32),
    pub anchor: (i32, i32),
    pub popup_anchor: (i32, i32),
}

impl Marker {
    #[must_use]
    pub const fn new(selected: bool, theme: Theme) -> Self {
        let color = match (theme, selected) {
            (Theme::Light, true) => "#4f46e5",
            (Theme::Light, false) => "#818cf8",
            (Theme::Dark, true) => "#a5b4fc",
            (Theme::Dark, false) => "#6366f1",
        };
        Self {
            color,
            selected,
            size: MARKER_SIZE,
            anchor: MARKER_ANCHOR,
            popup_anchor: MARKER_POPUP_ANCHOR,
        }
    }
}

/// Marker, perimeter and popup for one area. Clicking either the marker
/// or the perimeter selects `id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaLayer {
    pub id: String,
    pub position: (f64, f64),
    pub marker: Marker,
    pub perimeter: CircleLayer,
    pub tooltip: String,
    pub popup_title: String,
    pub popup_body: String,
}

impl AreaLayer {
    fn new(area: &Area, selected: bool, theme: Theme) -> Self {
        Self {
            id: area.id.clone(),
            position: area.position(),
            marker: Marker::new(selected, theme),
            perimeter: CircleLayer {
                center: area.position(),
                radius_m: area.area_radius,
                style: PathStyle::perimeter(theme),
            },
            tooltip: perimeter_tooltip(area.area_radius),
            popup_title: area.name.clone(),
            popup_body: area.summary.clone(),
        }
    }
}

/// Everything drawn on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLayers {
    pub theme: Theme,
    pub basemap: Basemap,
    pub camera: MapViewState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_circle: Option<CircleLayer>,
    pub areas: Vec<AreaLayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup_class: Option<&'static str>,
}

/// Tooltip of an accommodation perimeter, e.g. `"Radius: 1.25 km"`.
#[must_use]
pub fn perimeter_tooltip(radius_m: f64) -> String {
    format!("Radius: {:.2} km", radius_m / 1000.0)
}

fn search_circle_layer(circle: SearchCircle, theme: Theme) -> CircleLayer {
    CircleLayer {
        center: circle.center,
        radius_m: circle.radius_m,
        style: PathStyle::search_circle(theme),
    }
}

/// Describes the map for the current session and theme.
#[must_use]
pub fn map_layers(session: &SearchSession, theme: Theme) -> MapLayers {
    let selected_id = session.selected_id();

    MapLayers {
        theme,
        basemap: Basemap::for_theme(theme),
        camera: session.map_view(),
        search_circle: session
            .search_circle()
            .map(|circle| search_circle_layer(circle, theme)),
        areas: session
            .areas()
            .iter()
            .map(|area| AreaLayer::new(area, selected_id == Some(area.id.as_str()), theme))
            .collect(),
        popup_class: theme.is_dark().then_some(DARK_POPUP_CLASS),
    }
}
