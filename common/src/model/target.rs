use serde::{Deserialize, Serialize};

/// A recipient address. Targets are shared between groups and deduplicated
/// by email, so the same `id` shows up in every group that references it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub id: i64,
    pub email: String,
}
