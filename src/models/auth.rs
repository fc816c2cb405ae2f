use serde::{Deserialize, Serialize};

use super::enums::Role;
use super::envelope::{require, Validate};

/// `POST /login` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
    pub user_type: Role,
}

impl LoginCredentials {
    pub fn new(email: &str, password: &str, user_type: Role) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            user_type,
        }
    }

    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        if self.password.is_empty() {
            missing.push("password");
        }
        missing
    }
}

/// `POST /register` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterCredentials {
    pub name: String,
    pub email: String,
    pub password: String,
    pub user_type: Role,
}

impl RegisterCredentials {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        if self.password.is_empty() {
            missing.push("password");
        }
        missing
    }

    /// Credentials for logging in with the account just created.
    pub fn login(&self) -> LoginCredentials {
        LoginCredentials::new(&self.email, &self.password, self.user_type)
    }
}

/// User block of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_type: Option<Role>,
}

/// `POST /login` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub token: String,
    pub user: AuthUser,
}

impl Validate for LoginResponse {
    fn validate(&self) -> Result<(), String> {
        require("token", &self.token)?;
        require("user.name", &self.user.name)
    }
}

/// `POST /profile/update-password` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    #[serde(default)]
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_serialize_with_user_type() {
        let creds = LoginCredentials::new("a@b.com", "x", Role::Member);
        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["user_type"], "member");
    }

    #[test]
    fn blank_credentials_report_missing_fields() {
        let creds = LoginCredentials::new("  ", "", Role::Payer);
        assert_eq!(creds.missing_fields(), vec!["email", "password"]);
    }

    #[test]
    fn register_requires_name() {
        let creds = RegisterCredentials {
            name: String::new(),
            email: "a@b.com".into(),
            password: "pw".into(),
            user_type: Role::Provider,
        };
        assert_eq!(creds.missing_fields(), vec!["name"]);
        assert_eq!(creds.login().user_type, Role::Provider);
    }

    #[test]
    fn login_response_accepts_minimal_user() {
        let parsed: LoginResponse =
            serde_json::from_str(r#"{"token":"T1","user":{"name":"A"}}"#).unwrap();
        assert!(parsed.validate().is_ok());
        assert_eq!(parsed.user.email, None);
    }

    #[test]
    fn empty_token_fails_validation() {
        let parsed: LoginResponse =
            serde_json::from_str(r#"{"token":"","user":{"name":"A"}}"#).unwrap();
        assert!(parsed.validate().unwrap_err().contains("token"));
    }
}
