use serde::Deserialize;

/// Query parameters for `/api/fixture/addstat`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStatQuery {
    pub fixture_id: String,
    pub player_id: String,
    pub stat: String,
}

/// Query parameters for the fixed-kind shortcuts (`addgoalscorer`, `addassist`)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixturePlayerQuery {
    pub fixture_id: String,
    pub player_id: String,
}
