use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FieldError;

/// Request body for registration and login.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response returned after login, register or refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
}

const MIN_PASSWORD_LEN: usize = 8;

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

impl Credentials {
    pub fn normalize(&mut self) {
        self.email = self.email.trim().to_lowercase();
    }

    /// Checks used by registration. Login only needs a well-formed email.
    pub fn validate_new(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = self.validate_email();
        if self.password.len() < MIN_PASSWORD_LEN {
            errors.push(FieldError::body(
                "password",
                "Please enter a password with 8 or more characters",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn validate_login(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = self.validate_email();
        if self.password.is_empty() {
            errors.push(FieldError::body("password", "Password is required"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_email(&self) -> Vec<FieldError> {
        if is_valid_email(&self.email) {
            Vec::new()
        } else {
            vec![FieldError::body("email", "Please include a valid email")]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(email: &str, password: &str) -> Credentials {
        let mut c = Credentials {
            email: email.into(),
            password: password.into(),
        };
        c.normalize();
        c
    }

    #[test]
    fn email_is_normalized() {
        assert_eq!(creds("  Ada@Example.COM ", "x").email, "ada@example.com");
    }

    #[test]
    fn registration_reports_every_bad_field() {
        let errs = creds("nope", "short").validate_new().unwrap_err();
        let params: Vec<_> = errs.iter().map(|e| e.param.as_str()).collect();
        assert_eq!(params, vec!["email", "password"]);
        assert!(creds("ada@example.com", "longenough").validate_new().is_ok());
    }

    #[test]
    fn login_requires_password() {
        let errs = creds("ada@example.com", "").validate_login().unwrap_err();
        assert_eq!(errs[0].param, "password");
    }
}
