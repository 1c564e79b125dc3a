//! User profile record and the simulated-auth constructors.
//!
//! Authentication is simulated: signing in or up just mints a profile record
//! from the submitted credentials, with no credential checking beyond the
//! validation gates in `validation`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session/profile record; presence in the store implies authenticated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Credentials submitted to sign-in/sign-up.
///
/// The password is only inspected by the validation gates and is never
/// stored.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl User {
    /// Mint a profile for validated credentials.
    ///
    /// When no display name was given, the local part of the email stands in
    /// for it.
    pub fn from_credentials(credentials: &Credentials, now: DateTime<Utc>) -> Self {
        let name = match &credentials.name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => credentials
                .email
                .split('@')
                .next()
                .unwrap_or(credentials.email.as_str())
                .to_string(),
        };

        Self {
            id: Uuid::new_v4(),
            email: credentials.email.trim().to_string(),
            name,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_falls_back_to_email_local_part() {
        let user = User::from_credentials(
            &Credentials {
                email: "sam@example.com".to_string(),
                password: "hunter22x".to_string(),
                name: None,
            },
            Utc::now(),
        );
        assert_eq!(user.name, "sam");
        assert_eq!(user.email, "sam@example.com");
    }

    #[test]
    fn test_explicit_name_wins() {
        let user = User::from_credentials(
            &Credentials {
                email: "sam@example.com".to_string(),
                password: "hunter22x".to_string(),
                name: Some("  Sam Doe ".to_string()),
            },
            Utc::now(),
        );
        assert_eq!(user.name, "Sam Doe");
    }
}
