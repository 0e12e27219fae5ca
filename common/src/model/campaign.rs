use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a phishing-simulation campaign.
///
/// The wire and storage form is the human-readable label (`"In progress"`,
/// `"Waiting"`, ...). New campaigns always start as `InProgress`; later
/// statuses are set by campaign execution, which lives outside this API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CampaignStatus {
    #[serde(rename = "In progress")]
    InProgress,
    Waiting,
    Completed,
    Error,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::InProgress => "In progress",
            CampaignStatus::Waiting => "Waiting",
            CampaignStatus::Completed => "Completed",
            CampaignStatus::Error => "Error",
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "In progress" => Ok(CampaignStatus::InProgress),
            "Waiting" => Ok(CampaignStatus::Waiting),
            "Completed" => Ok(CampaignStatus::Completed),
            "Error" => Ok(CampaignStatus::Error),
            other => Err(format!("unknown campaign status '{}'", other)),
        }
    }
}

/// A campaign as returned by the API.
///
/// `completed_date` stays `None` until the campaign finishes. `uid` is only
/// populated on the record returned from creation; listings and lookups are
/// already scoped to the caller and omit it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: i64,
    pub name: String,
    pub created_date: DateTime<Utc>,
    pub completed_date: Option<DateTime<Utc>>,
    pub status: CampaignStatus,
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<i64>,
}
