//! Wire formats of the provider APIs and their mapping into domain types
//!
//! Each response is decoded into a transport DTO first and mapped in one pass.
//! Records with missing or non-finite coordinates are dropped, never fatal.

use std::collections::BTreeMap;

use domain::geo::haversine_km;
use domain::{GeoPoint, GeocodeProvider, GeocodeResult, PointOfInterest};
use serde::Deserialize;

/// OSM tag keys that classify a point of interest, most specific first
const POI_CATEGORY_KEYS: [&str; 8] = [
    "tourism",
    "amenity",
    "natural",
    "leisure",
    "shop",
    "public_transport",
    "railway",
    "highway",
];

// --- swisstopo GeoAdmin -----------------------------------------------------

/// `SearchServer` response with `geometryFormat=geojson`
#[derive(Debug, Deserialize)]
pub(crate) struct SwissSearchResponse {
    #[serde(default)]
    pub(crate) features: Vec<SwissSearchFeature>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SwissSearchFeature {
    pub(crate) properties: SwissSearchProperties,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SwissSearchProperties {
    #[serde(default)]
    pub(crate) label: String,
    pub(crate) lat: Option<f64>,
    pub(crate) lon: Option<f64>,
    #[serde(default)]
    pub(crate) weight: f64,
}

impl SwissSearchResponse {
    /// Map features to results; confidence is the weight relative to the best hit
    pub(crate) fn into_results(self) -> Vec<GeocodeResult> {
        let max_weight = self
            .features
            .iter()
            .map(|f| f.properties.weight)
            .fold(0.0_f64, f64::max);

        self.features
            .into_iter()
            .enumerate()
            .filter_map(|(index, feature)| {
                let props = feature.properties;
                let position = point(props.lat?, props.lon?)?;
                let confidence = if max_weight > 0.0 {
                    props.weight / max_weight
                } else {
                    rank_confidence(index)
                };
                Some(GeocodeResult::new(
                    position,
                    strip_markup(&props.label),
                    confidence,
                    GeocodeProvider::Swiss,
                ))
            })
            .collect()
    }
}

/// `MapServer/identify` response against the building register layer
#[derive(Debug, Deserialize)]
pub(crate) struct SwissIdentifyResponse {
    #[serde(default)]
    pub(crate) results: Vec<SwissIdentifyResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SwissIdentifyResult {
    pub(crate) geometry: Option<GeoJsonPoint>,
    #[serde(alias = "attributes")]
    pub(crate) properties: SwissBuildingProperties,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeoJsonPoint {
    #[serde(default)]
    pub(crate) coordinates: Vec<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SwissBuildingProperties {
    pub(crate) strname_deinr: Option<String>,
    pub(crate) dplz4: Option<serde_json::Value>,
    pub(crate) dplzname: Option<String>,
    pub(crate) label: Option<String>,
}

impl SwissBuildingProperties {
    /// "Street 1, 3011 Bern", falling back to the register label
    fn address(&self) -> Option<String> {
        let postcode = self.dplz4.as_ref().map(|v| match v {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        });

        match (&self.strname_deinr, postcode, &self.dplzname) {
            (Some(street), Some(code), Some(town)) if !street.is_empty() => {
                Some(format!("{street}, {code} {town}"))
            },
            _ => self.label.clone().filter(|l| !l.is_empty()),
        }
    }
}

impl SwissIdentifyResponse {
    /// Map register hits to results; hits without geometry use `query`
    pub(crate) fn into_results(self, query: &GeoPoint) -> Vec<GeocodeResult> {
        self.results
            .into_iter()
            .enumerate()
            .filter_map(|(index, hit)| {
                let label = hit.properties.address()?;
                let position = hit
                    .geometry
                    .and_then(|g| match g.coordinates.as_slice() {
                        [lon, lat, ..] => point(*lat, *lon),
                        _ => None,
                    })
                    .unwrap_or(*query);
                Some(GeocodeResult::new(
                    position,
                    label,
                    rank_confidence(index),
                    GeocodeProvider::Swiss,
                ))
            })
            .collect()
    }
}

// --- Nominatim --------------------------------------------------------------

/// One `/search` or `/reverse` record (format `jsonv2`)
#[derive(Debug, Deserialize)]
pub(crate) struct NominatimPlace {
    pub(crate) lat: Option<String>,
    pub(crate) lon: Option<String>,
    pub(crate) display_name: Option<String>,
    pub(crate) importance: Option<f64>,
    /// Set by `/reverse` when nothing is found
    pub(crate) error: Option<String>,
}

impl NominatimPlace {
    pub(crate) fn into_result(self, index: usize) -> Option<GeocodeResult> {
        if self.error.is_some() {
            return None;
        }
        let lat = self.lat?.parse().ok()?;
        let lon = self.lon?.parse().ok()?;
        let position = point(lat, lon)?;
        let label = self.display_name.filter(|n| !n.is_empty())?;
        let confidence = self.importance.unwrap_or_else(|| rank_confidence(index));
        Some(GeocodeResult::new(
            position,
            label,
            confidence,
            GeocodeProvider::Generic,
        ))
    }
}

// --- Overpass ---------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct OverpassResponse {
    #[serde(default)]
    pub(crate) elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OverpassElement {
    pub(crate) lat: Option<f64>,
    pub(crate) lon: Option<f64>,
    pub(crate) center: Option<OverpassCenter>,
    #[serde(default)]
    pub(crate) tags: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OverpassCenter {
    pub(crate) lat: f64,
    pub(crate) lon: f64,
}

impl OverpassElement {
    fn position(&self) -> Option<GeoPoint> {
        match (self.lat, self.lon, &self.center) {
            (Some(lat), Some(lon), _) => point(lat, lon),
            (_, _, Some(center)) => point(center.lat, center.lon),
            _ => None,
        }
    }

    fn category(&self) -> String {
        POI_CATEGORY_KEYS
            .iter()
            .find_map(|key| self.tags.get(*key))
            .cloned()
            .unwrap_or_else(|| "place".to_string())
    }
}

impl OverpassResponse {
    /// Named elements as POIs, sorted by distance from `origin` and truncated
    pub(crate) fn into_pois(self, origin: &GeoPoint, limit: usize) -> Vec<PointOfInterest> {
        let mut pois: Vec<PointOfInterest> = self
            .elements
            .into_iter()
            .filter_map(|element| {
                let position = element.position()?;
                let category = element.category();
                let name = element.tags.get("name").filter(|n| !n.is_empty())?.clone();
                Some(PointOfInterest {
                    name,
                    category,
                    distance_m: haversine_km(origin, &position) * 1000.0,
                    position,
                })
            })
            .collect();

        pois.sort_by(|a, b| {
            a.distance_m
                .total_cmp(&b.distance_m)
                .then_with(|| a.name.cmp(&b.name))
        });
        pois.dedup_by(|a, b| a.name == b.name && a.category == b.category);
        pois.truncate(limit);
        pois
    }
}

// --- helpers ----------------------------------------------------------------

fn point(lat: f64, lon: f64) -> Option<GeoPoint> {
    GeoPoint::new(lat, lon).ok()
}

/// Confidence for providers that only give an ordering
fn rank_confidence(index: usize) -> f64 {
    let step = f64::from(u32::try_from(index).unwrap_or(u32::MAX));
    (1.0 - 0.1 * step).max(0.1)
}

/// Drop HTML tags from a GeoAdmin label
fn strip_markup(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut in_tag = false;
    for c in label.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {},
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swiss_search_strips_markup_and_scores_by_weight() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {"properties": {"label": "Bundesplatz 3 <b>3011 Bern</b>", "lat": 46.9466, "lon": 7.4440, "weight": 8}},
                {"properties": {"label": "Bundesgasse 1 <b>3011 Bern</b>", "lat": 46.9470, "lon": 7.4430, "weight": 4}},
                {"properties": {"label": "broken", "weight": 9}}
            ]
        }"#;
        let response: SwissSearchResponse = serde_json::from_str(json).unwrap();
        let results = response.into_results();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].label, "Bundesplatz 3 3011 Bern");
        assert_eq!(results[0].source_provider, GeocodeProvider::Swiss);
        // weight is relative to the best feature, including the dropped one
        assert!((results[0].confidence - 8.0 / 9.0).abs() < 1e-9);
        assert!((results[1].confidence - 4.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn swiss_identify_builds_address_label() {
        let json = r#"{
            "results": [{
                "geometry": {"type": "Point", "coordinates": [7.4441, 46.9467]},
                "properties": {"strname_deinr": "Bundesplatz 3", "dplz4": 3011, "dplzname": "Bern", "label": "Bundesplatz 3"}
            }, {
                "attributes": {"strname_deinr": "Kochergasse 4", "dplz4": "3011", "dplzname": "Bern"}
            }]
        }"#;
        let response: SwissIdentifyResponse = serde_json::from_str(json).unwrap();
        let query = GeoPoint::bern();
        let results = response.into_results(&query);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].label, "Bundesplatz 3, 3011 Bern");
        assert!((results[0].position.latitude() - 46.9467).abs() < 1e-9);
        assert_eq!(results[1].label, "Kochergasse 4, 3011 Bern");
        assert_eq!(results[1].position, query);
        assert!(results[0].confidence > results[1].confidence);
    }

    #[test]
    fn nominatim_place_parses_string_coordinates() {
        let json = r#"[{"lat": "46.2331", "lon": "7.3606", "display_name": "Sion, Valais, Schweiz", "importance": 0.62}]"#;
        let places: Vec<NominatimPlace> = serde_json::from_str(json).unwrap();
        let result = places.into_iter().next().unwrap().into_result(0).unwrap();

        assert_eq!(result.label, "Sion, Valais, Schweiz");
        assert!((result.confidence - 0.62).abs() < 1e-9);
        assert_eq!(result.source_provider, GeocodeProvider::Generic);
    }

    #[test]
    fn nominatim_reverse_error_yields_nothing() {
        let place: NominatimPlace =
            serde_json::from_str(r#"{"error": "Unable to geocode"}"#).unwrap();
        assert!(place.into_result(0).is_none());
    }

    #[test]
    fn overpass_elements_become_sorted_named_pois() {
        let json = r#"{
            "elements": [
                {"type": "node", "id": 1, "lat": 46.2400, "lon": 7.3606, "tags": {"name": "Far Hut", "tourism": "alpine_hut"}},
                {"type": "way", "id": 2, "center": {"lat": 46.2335, "lon": 7.3606}, "tags": {"name": "Parking Nord", "amenity": "parking"}},
                {"type": "node", "id": 3, "lat": 46.2332, "lon": 7.3606, "tags": {"amenity": "bench"}},
                {"type": "node", "id": 4, "lat": 46.2333, "lon": 7.3606, "tags": {"name": "Spring"}}
            ]
        }"#;
        let response: OverpassResponse = serde_json::from_str(json).unwrap();
        let pois = response.into_pois(&GeoPoint::sion(), 10);

        let names: Vec<&str> = pois.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Spring", "Parking Nord", "Far Hut"]);
        assert_eq!(pois[0].category, "place");
        assert_eq!(pois[1].category, "parking");
        assert_eq!(pois[2].category, "alpine_hut");
        assert!(pois[0].distance_m < pois[1].distance_m);
    }

    #[test]
    fn overpass_limit_truncates() {
        let json = r#"{"elements": [
            {"lat": 46.2332, "lon": 7.3606, "tags": {"name": "A"}},
            {"lat": 46.2333, "lon": 7.3606, "tags": {"name": "B"}}
        ]}"#;
        let response: OverpassResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.into_pois(&GeoPoint::sion(), 1).len(), 1);
    }

    #[test]
    fn markup_is_stripped() {
        assert_eq!(strip_markup("<b>Sion</b>  (VS)"), "Sion (VS)");
        assert_eq!(strip_markup("plain"), "plain");
    }
}
