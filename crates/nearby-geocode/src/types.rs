use serde::Deserialize;

/// JSON body returned by the geocoding endpoint.
///
/// Success responses carry `lat`/`lng`; failures carry `error`. Both shapes
/// share one struct so a single decode step handles either.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
}
