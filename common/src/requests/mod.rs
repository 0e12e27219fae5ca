use serde::Deserialize;

/// Body of `POST /api/campaigns/`.
///
/// Everything else on a campaign (dates, status, owner) is stamped by the
/// server and ignored if present.
#[derive(Debug, Clone, Deserialize)]
pub struct CampaignRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub template: String,
}

/// Body of `POST /api/groups/`.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub targets: Vec<TargetRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetRequest {
    pub email: String,
}
