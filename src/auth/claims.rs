//! JWT claims carried by HealthNet access tokens.

use serde::{Deserialize, Serialize};

use super::roles::Role;

/// Signed claims bundle.
///
/// `iat` and `exp` are Unix seconds per JWT convention; the server restart
/// timestamp is Unix milliseconds, matching the process epoch it is compared
/// against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's email.
    pub sub: String,

    /// Database ID of the user.
    #[serde(rename = "userId")]
    pub user_id: String,

    /// Role at issuance time.
    pub role: Role,

    /// District of the user's posting.
    pub district: String,

    /// State of the user's posting.
    pub state: String,

    /// Issued at (Unix seconds).
    pub iat: i64,

    /// Expiration time (Unix seconds).
    pub exp: i64,

    /// Process epoch the token was minted under (Unix milliseconds).
    /// Tokens from an earlier epoch are rejected wholesale.
    #[serde(rename = "serverRestartTimestamp")]
    pub server_restart_at: i64,
}
