use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MemberRole {
    Lead,
    CoLead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MemberStatus {
    Pending,
    Active,
    Suspended,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberUser {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Row of `GET /project/members`. Removed members are never returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMember {
    pub id: i64,
    pub funded_project_id: i64,
    pub user_id: String,
    pub role: MemberRole,
    pub status: MemberStatus,
    #[serde(default)]
    pub user: Option<MemberUser>,
}

impl ProjectMember {
    pub fn is_active_co_lead(&self) -> bool {
        self.role == MemberRole::CoLead && self.status == MemberStatus::Active
    }

    /// Display name, or the user id when the user relation is missing.
    pub fn display_name(&self) -> String {
        match &self.user {
            Some(user) => format!("{} {}", user.first_name, user.last_name)
                .trim()
                .to_string(),
            None => self.user_id.clone(),
        }
    }
}

/// Comma-separated names of the active co-leads, `None` when there are none.
pub fn co_lead_names(members: &[ProjectMember]) -> Option<String> {
    let names: Vec<String> = members
        .iter()
        .filter(|m| m.is_active_co_lead())
        .map(ProjectMember::display_name)
        .filter(|name| !name.is_empty())
        .collect();

    if names.is_empty() {
        None
    } else {
        Some(names.join(", "))
    }
}
