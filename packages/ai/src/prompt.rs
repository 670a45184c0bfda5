//! Prompt construction for location searches.

use scenebay_scout_models::SearchParams;

/// Number of areas the model is asked for, as the prompt words it.
const RESULT_COUNT: &str = "3 to 5";

/// Builds the instruction text for a search.
///
/// The wording branches on whether the scout listed any desired features:
/// with features the model must judge each one per area, without them it
/// must return an empty `featureAnalysis` array.
#[must_use]
pub fn build_prompt(params: &SearchParams) -> String {
    let SearchParams {
        location,
        radius,
        unit,
        desired_features,
        crew_size,
    } = params;

    let mut prompt = format!(
        r#"You are an assistant for a film location scout. Identify public areas or neighborhoods that would suit a film shoot.
Search within a {radius} {unit} radius of "{location}".
The production crew is approximately {crew_size} people. This matters: areas whose infrastructure cannot support a crew of this size must score lower.
"#
    );

    if params.has_desired_features() {
        prompt.push_str(&format!(
            r#"
The scene needs the following features: "{features}".

For every area, provide 'featureAnalysis': an array with one object per distinct requested feature, holding the 'feature' name (string) and 'present' (boolean) stating whether the area has it.
Also provide a 'summary' paragraph of 3-4 sentences explaining how well the area suits the scene and the production logistics for this crew size. It is shown on a details page.

List {RESULT_COUNT} realistic public areas or neighborhoods that best match these criteria.
"#,
            features = desired_features.trim(),
        ));
    } else {
        prompt.push_str(&format!(
            r"
List {RESULT_COUNT} interesting or notable public areas or neighborhoods inside the search radius that would suit a film shoot.

For each 'summary', explain why the area is notable and why it is logistically viable for this crew size. No features were requested, so 'featureAnalysis' must be an empty array.
"
        ));
    }

    prompt.push_str(&format!(
        r#"
For each area provide:
1. 'name': a concise name (e.g. "Le Marais District, Paris" or "Downtown Core, Vancouver").
2. 'featureAnalysis' as described above.
3. 'summary' as described above.
4. 'lat' and 'lng': the central latitude and longitude.
5. 'areaRadius': a radius for the area in meters (e.g. 500 for a small neighborhood, 1500 for a larger district).
6. 'scores': your estimated availability of the following resources for a crew of {crew_size}. Each is an object with 'available' and 'total' counts.
   - 'accommodation': hotel rooms available out of all rooms in the area. Add 'accommodationCapacity', a text estimate of how many people can be housed (e.g. "Capacity for over 300 people"), and 'exampleHotels', 2-3 real hotels as objects with 'name' and 'priceRange' (e.g. "$150-$250/night").
   - 'catering': catering services or large restaurants able to serve a film crew that are available, out of all such services in the area. Add 'exampleCatering', 2-3 real examples.
   - 'parking': large parking lots or garages suitable for production vehicles that are likely available, out of all suitable lots and garages. Count whole lots or garages, not individual spaces. Add 'exampleParking', 2-3 real examples.

Return ONLY a JSON array of objects that conforms to the provided JSON schema. Do not add any other text, explanation, or markdown formatting.
"#
    ));

    prompt
}

#[cfg(test)]
mod tests {
    use scenebay_scout_models::DistanceUnit;

    use super::*;

    fn params(features: &str) -> SearchParams {
        SearchParams {
            location: "Paris, France".to_string(),
            radius: 5.0,
            unit: DistanceUnit::Km,
            desired_features: features.to_string(),
            crew_size: 50,
        }
    }

    #[test]
    fn blank_features_ask_for_empty_analysis() {
        for features in ["", "   ", "\n\t"] {
            let prompt = build_prompt(&params(features));
            assert!(prompt.contains("'featureAnalysis' must be an empty array"));
            assert!(!prompt.contains("The scene needs the following features"));
        }
    }

    #[test]
    fn requested_features_are_quoted_and_analyzed() {
        let prompt = build_prompt(&params("  quiet parks, old bridges "));
        assert!(prompt.contains(r#"The scene needs the following features: "quiet parks, old bridges"."#));
        assert!(prompt.contains("one object per distinct requested feature"));
        assert!(!prompt.contains("must be an empty array"));
    }

    #[test]
    fn prompt_carries_search_area_and_crew_size() {
        let prompt = build_prompt(&SearchParams {
            unit: DistanceUnit::Miles,
            radius: 2.5,
            crew_size: 120,
            ..params("")
        });
        assert!(prompt.contains(r#"2.5 miles radius of "Paris, France""#));
        assert!(prompt.contains("approximately 120 people"));
        assert!(prompt.contains("for a crew of 120"));
        assert!(prompt.contains("3 to 5"));
        assert!(prompt.contains("Return ONLY a JSON array"));
    }
}
