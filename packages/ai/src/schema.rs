//! Structured-output schema for location search responses.
//!
//! [`response_schema`] is the canonical JSON Schema of the expected
//! response: an array of areas. Providers that speak a different dialect
//! derive theirs from it with [`to_gemini_schema`] or [`wrap_in_object`].

use serde_json::{Map, Value, json};

/// Property name used when the array has to be wrapped in an object.
pub const WRAPPED_ARRAY_KEY: &str = "areas";

fn availability(description: &str) -> Value {
    json!({
        "type": "object",
        "description": description,
        "properties": {
            "available": { "type": "number" },
            "total": { "type": "number" }
        },
        "required": ["available", "total"]
    })
}

/// Returns the JSON Schema every model response must conform to.
#[must_use]
pub fn response_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "The name of the area or neighborhood."
                },
                "summary": {
                    "type": "string",
                    "description": "A detailed summary of the area's suitability for a film shoot, for use in a details view."
                },
                "featureAnalysis": {
                    "type": "array",
                    "description": "The presence of each requested feature at the location.",
                    "items": {
                        "type": "object",
                        "properties": {
                            "feature": { "type": "string" },
                            "present": { "type": "boolean" }
                        },
                        "required": ["feature", "present"]
                    }
                },
                "lat": {
                    "type": "number",
                    "description": "The central latitude of the area."
                },
                "lng": {
                    "type": "number",
                    "description": "The central longitude of the area."
                },
                "areaRadius": {
                    "type": "number",
                    "description": "The radius of the area in meters."
                },
                "scores": {
                    "type": "object",
                    "properties": {
                        "accommodation": availability("Estimated available and total hotel rooms."),
                        "catering": availability("Estimated available and total suitable catering services."),
                        "parking": availability("Estimated available large parking lots or garages out of all suitable lots or garages in the area."),
                        "accommodationCapacity": {
                            "type": "string",
                            "description": "Text estimate of how many people can be accommodated."
                        },
                        "exampleHotels": {
                            "type": "array",
                            "description": "2-3 real-world hotels with their estimated price range.",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "name": { "type": "string" },
                                    "priceRange": { "type": "string" }
                                },
                                "required": ["name", "priceRange"]
                            }
                        },
                        "exampleCatering": {
                            "type": "array",
                            "description": "2-3 real-world catering services or large restaurants.",
                            "items": { "type": "string" }
                        },
                        "exampleParking": {
                            "type": "array",
                            "description": "2-3 real-world parking garages or large lots.",
                            "items": { "type": "string" }
                        }
                    },
                    "required": ["accommodation", "catering", "parking", "accommodationCapacity"]
                }
            },
            "required": ["name", "summary", "featureAnalysis", "lat", "lng", "areaRadius", "scores"]
        }
    })
}

/// Rewrites a JSON Schema into Gemini's `responseSchema` dialect, which
/// spells type names in upper case (`ARRAY`, `OBJECT`, `STRING`, ...).
#[must_use]
pub fn to_gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => {
            let converted: Map<String, Value> = map
                .iter()
                .map(|(key, value)| {
                    let value = match (key.as_str(), value) {
                        ("type", Value::String(name)) => Value::String(name.to_uppercase()),
                        ("properties", Value::Object(props)) => Value::Object(
                            props
                                .iter()
                                .map(|(name, prop)| (name.clone(), to_gemini_schema(prop)))
                                .collect(),
                        ),
                        ("items", items) => to_gemini_schema(items),
                        _ => value.clone(),
                    };
                    (key.clone(), value)
                })
                .collect();
            Value::Object(converted)
        }
        other => other.clone(),
    }
}

/// Wraps an array schema as `{ "areas": <schema> }` for APIs that require
/// an object at the root.
#[must_use]
pub fn wrap_in_object(schema: Value) -> Value {
    let mut properties = Map::new();
    properties.insert(WRAPPED_ARRAY_KEY.to_string(), schema);
    json!({
        "type": "object",
        "properties": properties,
        "required": [WRAPPED_ARRAY_KEY]
    })
}

/// Extracts the array from a response produced against
/// [`wrap_in_object`]'s schema. A bare array is passed through unchanged.
#[must_use]
pub fn unwrap_object(value: Value) -> Value {
    match value {
        Value::Object(mut map) => map.remove(WRAPPED_ARRAY_KEY).unwrap_or(Value::Object(map)),
        other => other,
    }
}
