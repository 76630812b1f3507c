//! User roles, login buckets, and the role → designation/permission table.

use serde::{Deserialize, Serialize};

/// Role of a health-system user.
///
/// The set is closed: every value a token or database row may carry is one of
/// these variants, and deserialization of anything else fails outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    DistrictHealthOfficer,
    HealthStaff,
    AshaWorker,
    Anm,
    Nurse,
    GovernmentOfficial,
}

impl Role {
    /// Classify the role into its login bucket.
    pub fn category(self) -> RoleCategory {
        match self {
            Role::Admin => RoleCategory::Admin,
            _ => RoleCategory::Staff,
        }
    }

    /// Human-readable designation shown in login responses.
    pub fn designation(self) -> &'static str {
        match self.category() {
            RoleCategory::Admin => "Government Official",
            RoleCategory::Staff => "Health Worker",
        }
    }

    /// Permissions granted to the role.
    pub fn permissions(self) -> &'static [&'static str] {
        match self.category() {
            RoleCategory::Admin => &[
                "view_all_reports",
                "manage_users",
                "view_analytics",
                "manage_alerts",
                "view_predictions",
            ],
            RoleCategory::Staff => &["view_reports", "submit_water_tests", "distribute_medicine"],
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Role::Admin => "ADMIN",
            Role::DistrictHealthOfficer => "DISTRICT_HEALTH_OFFICER",
            Role::HealthStaff => "HEALTH_STAFF",
            Role::AshaWorker => "ASHA_WORKER",
            Role::Anm => "ANM",
            Role::Nurse => "NURSE",
            Role::GovernmentOfficial => "GOVERNMENT_OFFICIAL",
        };
        f.write_str(name)
    }
}

/// Coarse login bucket a client selects at the login screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleCategory {
    Admin,
    Staff,
}

impl std::fmt::Display for RoleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoleCategory::Admin => f.write_str("admin"),
            RoleCategory::Staff => f.write_str("staff"),
        }
    }
}

impl std::str::FromStr for RoleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(RoleCategory::Admin),
            "staff" => Ok(RoleCategory::Staff),
            _ => Err(format!("unknown role category: {}", s)),
        }
    }
}
