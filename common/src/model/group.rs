use crate::model::target::Target;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named, reusable collection of recipients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub modified_date: DateTime<Utc>,
    pub targets: Vec<Target>,
}

/// Result of creating a group: the persisted group plus what happened to
/// every submitted target, in submission order.
///
/// Serialized flat, so clients that only know the `Group` shape keep working
/// and the extra `results` array reports the entries that were dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupReceipt {
    #[serde(flatten)]
    pub group: Group,
    pub results: Vec<TargetOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetOutcome {
    pub email: String,
    pub status: OutcomeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<SkipReason>,
}

impl TargetOutcome {
    pub fn added(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            status: OutcomeStatus::Added,
            reason: None,
        }
    }

    pub fn skipped(email: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            email: email.into(),
            status: OutcomeStatus::Skipped,
            reason: Some(reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Added,
    Skipped,
}

/// Why a submitted target did not make it into the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Not a valid RFC 5322 mailbox.
    InvalidEmail,
    /// Resolved to a target already added earlier in the same request.
    Duplicate,
    /// The store rejected one of the writes for this entry.
    Persistence,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InvalidEmail => f.write_str("invalid email"),
            SkipReason::Duplicate => f.write_str("duplicate email"),
            SkipReason::Persistence => f.write_str("database error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_serializes_flat() {
        let receipt = GroupReceipt {
            group: Group {
                id: 3,
                name: "Test Group".to_string(),
                modified_date: Utc::now(),
                targets: vec![Target {
                    id: 1,
                    email: "test@example.com".to_string(),
                }],
            },
            results: vec![
                TargetOutcome::added("test@example.com"),
                TargetOutcome::skipped("nope", SkipReason::InvalidEmail),
            ],
        };

        let value = serde_json::to_value(&receipt).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["name"], "Test Group");
        assert_eq!(value["targets"][0]["email"], "test@example.com");
        assert_eq!(value["results"][0]["status"], "added");
        assert!(value["results"][0].get("reason").is_none());
        assert_eq!(value["results"][1]["reason"], "invalid_email");
    }
}
