use serde::Deserialize;

/// Query parameters for creating a fixture
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFixtureRequest {
    pub date: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub home_score: String,
    #[serde(default)]
    pub away_score: String,
    pub man_of_the_match: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
