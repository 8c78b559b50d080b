//! Account models

use serde::{Deserialize, Serialize};

/// Profile fields of the signed-in user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "lastName", default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// Registration payload
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct SignUpRequest {
    pub name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for SignUpRequest {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SignUpRequest")
            .field("name", &self.name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Body of `PUT /modificarnombre`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ProfileUpdateBody<'a> {
    #[serde(rename = "newName")]
    pub new_name: &'a str,
    #[serde(rename = "newLastName")]
    pub new_last_name: &'a str,
    #[serde(rename = "newEmail")]
    pub new_email: &'a str,
    #[serde(rename = "newUsername")]
    pub new_username: &'a str,
}

impl<'a> From<&'a UserProfile> for ProfileUpdateBody<'a> {
    fn from(profile: &'a UserProfile) -> Self {
        Self {
            new_name: &profile.name,
            new_last_name: &profile.last_name,
            new_email: &profile.email,
            new_username: &profile.username,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_up_debug_redacts_password() {
        let request = SignUpRequest {
            name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            username: "ada".to_string(),
            password: "hunter2".to_string(),
        };
        let rendered = format!("{request:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn profile_update_body_uses_new_prefixed_fields() {
        let profile = UserProfile {
            name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
        };
        let value = serde_json::to_value(ProfileUpdateBody::from(&profile)).unwrap();
        assert_eq!(value["newName"], "Ada");
        assert_eq!(value["newLastName"], "Lovelace");
        assert_eq!(value["newEmail"], "ada@example.com");
        assert_eq!(value["newUsername"], "ada");
    }
}
